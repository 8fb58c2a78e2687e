//! Single-row charge prediction from dropdown choices.

pub mod adapter;
pub mod encoding;
pub mod model;
pub mod train;

pub use adapter::{predict_charge, Prediction};
pub use encoding::{
    AgeRange, BmiRange, EncodeError, PredictionForm, PredictionInput, QueryRecord, Region, Sex, Smoker,
    MODEL_COLUMNS,
};
pub use model::{ChargeModel, ModelArtifact, PredictError, Regressor};
pub use train::{train, ModelKind, TrainError};
