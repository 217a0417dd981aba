use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rentix_core::{RentError, ValidationError};
use serde::Serialize;

/// Error envelope every non-validation failure is rendered as.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub title: String,
    pub detail: String,
}

#[derive(Debug)]
pub enum ApiError {
    /// Field violations keep their own shape: a flat field -> message map.
    Validation(ValidationError),
    NotFound(String),
    Internal(String),
}

impl From<RentError> for ApiError {
    fn from(err: RentError) -> Self {
        match err {
            RentError::Validation(errors) => ApiError::Validation(errors),
            RentError::NotFound(entity) => ApiError::NotFound(entity),
            RentError::Upstream(message) | RentError::Internal(message) => {
                ApiError::Internal(message)
            }
        }
    }
}

fn envelope(status: StatusCode, title: &str, detail: String) -> Response {
    let body = ErrorBody {
        status: status.as_u16(),
        title: title.to_string(),
        detail,
    };
    (status, Json(body)).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response()
            }
            ApiError::NotFound(entity) => envelope(
                StatusCode::NOT_FOUND,
                "not found",
                format!("{entity} not found"),
            ),
            ApiError::Internal(message) => {
                tracing::error!("request failed: {}", message);
                envelope(StatusCode::INTERNAL_SERVER_ERROR, "internal error", message)
            }
        }
    }
}
