use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;

pub const UNAUTHENTICATED_MESSAGE: &str = "Please authenticate using a valid token";

#[derive(Debug)]
pub enum AppError {
    /// Missing or unverifiable `auth-token`
    Unauthenticated,
    Validation(String),
    NotFound(String),
    DatabaseError(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Unauthenticated => write!(f, "{}", UNAUTHENTICATED_MESSAGE),
            AppError::Validation(msg) => write!(f, "{}", msg),
            AppError::NotFound(msg) => write!(f, "{}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<mongodb::error::Error> for AppError {
    fn from(e: mongodb::error::Error) -> Self {
        AppError::DatabaseError(e.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Unauthenticated => serde_json::json!({
                "errors": UNAUTHENTICATED_MESSAGE
            }),
            AppError::Validation(msg) | AppError::NotFound(msg) => serde_json::json!({
                "success": false,
                "errors": msg
            }),
            // Details stay in the logs
            AppError::DatabaseError(_) | AppError::Internal(_) => serde_json::json!({
                "success": false,
                "errors": "Server error"
            }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}
