//! The charge model behind the predictor.
//!
//! The predictor only relies on [`ChargeModel`]: one encoded row in, one
//! charge out. [`ModelArtifact`] is the on-disk form, a JSON document with
//! the column order the model was trained on and a serialized smartcore
//! regressor.

use crate::error::StartupError;
use crate::predictor::encoding::{QueryRecord, MODEL_COLUMNS};

use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::RandomForestRegressor;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::linear_regression::LinearRegression;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictError {
    #[error("model inference failed: {0}")]
    Inference(String),

    #[error("model returned no prediction")]
    Empty,
}

/// Single-row inference over the encoded predictor record.
pub trait ChargeModel: Send + Sync {
    fn predict(&self, record: &QueryRecord) -> Result<f64, PredictError>;
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Regressor {
    RandomForest {
        model: RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>,
    },
    Linear {
        model: LinearRegression<f64, f64, DenseMatrix<f64>, Vec<f64>>,
    },
}

impl Regressor {
    pub fn kind(&self) -> &'static str {
        match self {
            Regressor::RandomForest { .. } => "random_forest",
            Regressor::Linear { .. } => "linear",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub columns: Vec<String>,
    pub model: Regressor,
}

impl ModelArtifact {
    pub fn new(model: Regressor) -> Self {
        Self {
            columns: MODEL_COLUMNS.iter().map(|c| c.to_string()).collect(),
            model,
        }
    }

    /// Reads and checks an artifact. A missing file and an unreadable or
    /// mis-ordered one are both fatal at startup.
    pub fn load(path: &Path) -> Result<Self, StartupError> {
        if !path.is_file() {
            return Err(StartupError::ModelMissing { path: path.to_path_buf() });
        }
        let corrupt = |reason: String| StartupError::ModelCorrupt {
            path: path.to_path_buf(),
            reason,
        };

        let reader = BufReader::new(File::open(path)?);
        let artifact: ModelArtifact =
            serde_json::from_reader(reader).map_err(|e| corrupt(e.to_string()))?;

        if artifact.columns != MODEL_COLUMNS {
            return Err(corrupt(format!(
                "expected columns {:?}, found {:?}",
                MODEL_COLUMNS, artifact.columns
            )));
        }

        tracing::info!(path = %path.display(), kind = artifact.model.kind(), "Model loaded");
        Ok(artifact)
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, self)?;
        Ok(())
    }
}

impl ChargeModel for ModelArtifact {
    fn predict(&self, record: &QueryRecord) -> Result<f64, PredictError> {
        let x = DenseMatrix::new(1, MODEL_COLUMNS.len(), record.to_row().to_vec(), false);
        let predictions = match &self.model {
            Regressor::RandomForest { model } => model.predict(&x),
            Regressor::Linear { model } => model.predict(&x),
        }
        .map_err(|e| PredictError::Inference(e.to_string()))?;

        predictions.first().copied().ok_or(PredictError::Empty)
    }
}
