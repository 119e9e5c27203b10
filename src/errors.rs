use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("missing parameter: {0}")]
    MissingParameter(&'static str),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("you already have a booking at this time; cancel it before booking again")]
    UserAlreadyBooked,

    #[error("this time slot is fully booked")]
    SlotUnavailable,

    #[error("service not found")]
    ServiceNotFound,

    #[error("branch not found")]
    BranchNotFound,

    #[error("user not found")]
    UserNotFound,

    #[error("not found: {0}")]
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            AppError::UserAlreadyBooked => StatusCode::CONFLICT,
            AppError::SlotUnavailable => StatusCode::CONFLICT,
            AppError::ServiceNotFound => StatusCode::NOT_FOUND,
            AppError::BranchNotFound => StatusCode::NOT_FOUND,
            AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        // Database detail stays in the logs, never in the response body.
        let body = if let AppError::Database(e) = &self {
            tracing::error!(error = %e, "database error");
            serde_json::json!({ "error": "internal error" })
        } else {
            serde_json::json!({ "error": self.to_string() })
        };

        (status, axum::Json(body)).into_response()
    }
}
