use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// An encoder method requiring a prior `fit` was called first
    #[error("Encoder has not been fitted yet")]
    NotFitted,

    /// Predict or rank was invoked before the preference model was trained
    #[error("Model has not been trained yet")]
    ModelNotTrained,

    #[error("Not enough history to recommend: have {have} dish ratings, need at least {need}")]
    InsufficientHistory { have: usize, need: usize },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// A table file could not be parsed or written
    #[error("Table format error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) | AppError::NotFitted | AppError::ModelNotTrained => {
                StatusCode::BAD_REQUEST
            }
            AppError::InsufficientHistory { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Storage(_) | AppError::Csv(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = match self {
            AppError::NotFound(msg) | AppError::InvalidInput(msg) => msg,
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
