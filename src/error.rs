use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use polars::prelude::PolarsError;
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort process start.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("{path:?} not found. Place your dataset in the app folder.")]
    DatasetMissing { path: PathBuf },

    #[error("dataset is missing required column {0:?}")]
    MissingColumn(String),

    #[error("unsupported dataset format {path:?} (expected .csv or .parquet)")]
    DatasetFormat { path: PathBuf },

    #[error("failed to read dataset: {0}")]
    Dataset(#[from] PolarsError),

    #[error("model artifact not found at {path:?}")]
    ModelMissing { path: PathBuf },

    #[error("model artifact {path:?} is corrupt: {reason}")]
    ModelCorrupt { path: PathBuf, reason: String },

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a raw row was left out of the working dataset.
///
/// Rejections are never surfaced per row; the loader only counts them.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecordRejected {
    #[error("age is missing or outside every age bracket")]
    AgeBracket,
    #[error("bmi is missing or outside every bmi bracket")]
    BmiBracket,
    #[error("charges is missing or not numeric")]
    Charges,
}

/// Errors surfaced by the web layer.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Prediction failed: {0}")]
    Prediction(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Prediction(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Prediction(_) => "PREDICTION_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();

        tracing::warn!(
            error_code = error_code,
            status_code = status.as_u16(),
            message = %message,
            "Request error"
        );

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
                "status": status.as_u16(),
            }
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
