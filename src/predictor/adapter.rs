use crate::currency::format_currency;
use crate::predictor::encoding::{PredictionForm, QueryRecord};
use crate::predictor::model::{ChargeModel, PredictError};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub record: QueryRecord,
    pub charge: f64,
    pub formatted: String,
}

/// Encodes the choices, runs one inference and formats the estimate.
pub fn predict_charge(model: &dyn ChargeModel, form: &PredictionForm) -> Result<Prediction, PredictError> {
    let record = form.encode();
    let charge = model.predict(&record)?;
    tracing::debug!(?record, charge, "Predicted charge");

    Ok(Prediction {
        record,
        charge,
        formatted: format_currency(charge, 2),
    })
}
