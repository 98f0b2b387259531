//! Mapping of gallery errors onto HTTP responses.

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gallery_common::Error;

/// Error returned from handlers.
///
/// Gallery errors are mapped to a status code here. Request body failures
/// keep the status axum assigned to them (e.g. `413` past the upload limit).
#[derive(Debug)]
pub enum ApiError {
    Gallery(Error),
    Body { status: StatusCode, message: String },
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self::Gallery(err)
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::Body {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::Body {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Body { status, .. } => *status,
            Self::Gallery(err) if err.is_storage() => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Gallery(Error::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Gallery(Error::Unauthorized) => StatusCode::UNAUTHORIZED,
            Self::Gallery(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::Body { message, .. } => {
                tracing::debug!("Rejected request body ({}): {}", status, message);
                message
            }
            Self::Gallery(err) if err.is_storage() => {
                tracing::error!("Request failed: {}", err);
                "Internal server error".to_string()
            }
            Self::Gallery(Error::NotFound(_)) => "Not found".to_string(),
            Self::Gallery(Error::Unauthorized) => "You must be logged in".to_string(),
            Self::Gallery(Error::InvalidInput(msg)) => msg,
            Self::Gallery(err) => err.to_string(),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
