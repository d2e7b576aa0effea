use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use jobportal::{AuthError, LifecycleError, PortalError};

use crate::response::ApiResponse;

/// Errors a request handler can answer with.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Lifecycle(e) => match e {
                LifecycleError::NotFound { .. } => StatusCode::NOT_FOUND,
                LifecycleError::Forbidden => StatusCode::FORBIDDEN,
                LifecycleError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
                LifecycleError::InvalidState(_) | LifecycleError::Conflict(_) => {
                    StatusCode::CONFLICT
                }
                LifecycleError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Auth(AuthError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text returned to the client. Server faults and principal identities stay in the logs.
    pub fn public_message(&self) -> String {
        if self.status().is_server_error() {
            return "Internal server error".to_string();
        }
        match self {
            ApiError::Auth(AuthError::UnknownPrincipal { .. }) => {
                AuthError::InvalidCredential.to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedPayload(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::MalformedPayload(rejection.body_text())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(format!("response serialization failed: {}", err))
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("blocking task failed: {}", err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(status = %status, error = %self, "request rejected");
        }

        (status, ApiResponse::err(self.public_message())).into_response()
    }
}

/// Failures of the command-line entry points.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Portal(#[from] PortalError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
