use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use auth::AuthError;
use storage::CatalogError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Domain errors remapped to the HTTP taxonomy. Validation failures keep
/// their message; anything internal is logged server-side and replaced with
/// a generic body so storage detail never leaks to callers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    fn internal(detail: impl std::fmt::Display) -> Self {
        tracing::error!(%detail, "internal error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = ErrorResponse {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidInput(_) => Self::new(StatusCode::BAD_REQUEST, err.to_string()),
            AuthError::EmailInUse => Self::new(StatusCode::CONFLICT, err.to_string()),
            AuthError::UserNotFound => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            AuthError::InvalidCredentials => {
                Self::new(StatusCode::BAD_REQUEST, err.to_string())
            }
            AuthError::InvalidToken => Self::new(StatusCode::UNAUTHORIZED, err.to_string()),
            AuthError::Hashing(_) | AuthError::TokenGeneration(_) | AuthError::Directory(_) => {
                Self::internal(err)
            }
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::InvalidInput(_) => Self::new(StatusCode::BAD_REQUEST, err.to_string()),
            CatalogError::TeacherOnly | CatalogError::RoleNotPermitted => {
                Self::new(StatusCode::FORBIDDEN, err.to_string())
            }
            CatalogError::LessonNotFound | CatalogError::FileNotFound => {
                Self::new(StatusCode::NOT_FOUND, err.to_string())
            }
            CatalogError::Io(_) | CatalogError::Repository(_) => Self::internal(err),
        }
    }
}
