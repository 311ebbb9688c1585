use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::db::StoreError;
use crate::validation::ValidationErrors;

pub const NOT_FOUND_MESSAGE: &str = "Item not found";
pub const MALFORMED_BODY_MESSAGE: &str = "The given data was invalid.";

#[derive(Debug, Error)]
pub enum AppError {
    /// Field-level rejection; nothing was persisted.
    #[error("{0}")]
    Validation(ValidationErrors),

    /// The body could not be read as a JSON object.
    #[error("The given data was invalid.")]
    MalformedBody,

    #[error("Item not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => AppError::NotFound,
            StoreError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "message": errors.summary(), "errors": errors }),
            ),
            AppError::MalformedBody => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "message": MALFORMED_BODY_MESSAGE }),
            ),
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                json!({ "message": NOT_FOUND_MESSAGE }),
            ),
            AppError::Database(e) => {
                error!(error = %e, "Storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
