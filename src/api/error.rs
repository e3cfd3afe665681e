//! Error responses.
//!
//! Every failure is rendered as `{"message": "..."}`; the HTTP status is the
//! only machine-readable classification.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::auth::CredentialError;
use crate::model::PathError;
use crate::store::StoreError;
use crate::vfs::VfsError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    MethodNotAllowed(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    UnsupportedMediaType(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

/// Wire body of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), %message, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), %message, "Request rejected");
        }
        (status, Json(ErrorBody { message })).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(_) => ApiError::Conflict(e.to_string()),
            StoreError::NotFound(_) | StoreError::CertificateNotFound { .. } => {
                ApiError::NotFound(e.to_string())
            }
            StoreError::Invalid(_) => ApiError::BadRequest(e.to_string()),
        }
    }
}

impl From<PathError> for ApiError {
    fn from(e: PathError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<CredentialError> for ApiError {
    fn from(e: CredentialError) -> Self {
        ApiError::Unauthorized(e.to_string())
    }
}

impl From<VfsError> for ApiError {
    fn from(e: VfsError) -> Self {
        match e {
            VfsError::NotFound(_) => ApiError::NotFound(e.to_string()),
            VfsError::AlreadyExists(_) => ApiError::Conflict(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResourceId;

    #[test]
    fn test_store_errors_map_to_taxonomy() {
        let id = ResourceId::new("Common", "p");
        assert_eq!(
            ApiError::from(StoreError::Conflict(id.clone())),
            ApiError::Conflict("profile already exists".into())
        );
        assert_eq!(
            ApiError::from(StoreError::NotFound(id)).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_body_is_message_object() {
        let response = ApiError::bad_request("invalid path").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"message":"invalid path"}"#);
    }
}
