use axum::response::{IntoResponse, Response};
use std::fmt;

use crate::api::{ErrorReport, MessageResponse, RevalidationResult};

/// Failure of a single call to the cache-invalidation backend.
///
/// `target` names the tag or path; the message ends up in the public response.
#[derive(Debug, thiserror::Error)]
pub enum InvalidationError {
    #[error("request for {target} failed")]
    Transport {
        target: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{target} answered with status {status}")]
    Status { target: String, status: u16 },
}

#[derive(Debug)]
pub enum WebhookError {
    SecretNotConfigured,
    InvalidSecret,
    MissingContentType,
    Invalidation(InvalidationError),
    Unexpected(String),
}

impl fmt::Display for WebhookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use WebhookError::*;
        match self {
            SecretNotConfigured => write!(f, "ConfigurationError: webhook secret not configured"),
            InvalidSecret => write!(f, "AuthenticationError: invalid webhook secret"),
            MissingContentType => write!(f, "ValidationError: missing content type"),
            Invalidation(e) => write!(f, "InvalidationError: {}", crate::unpack_error(e)),
            Unexpected(s) => write!(f, "UnexpectedError: {}", s),
        }
    }
}

impl std::error::Error for WebhookError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use WebhookError::*;
        match self {
            Invalidation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<InvalidationError> for WebhookError {
    fn from(error: InvalidationError) -> Self {
        WebhookError::Invalidation(error)
    }
}

impl From<serde_json::Error> for WebhookError {
    fn from(error: serde_json::Error) -> Self {
        WebhookError::Unexpected(error.to_string())
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        use WebhookError::*;
        match self {
            SecretNotConfigured => {
                crate::server_error(MessageResponse::new("Webhook secret not configured"))
            }
            InvalidSecret => crate::unauthorized(MessageResponse::new("Invalid webhook secret")),
            MissingContentType => crate::bad_request(MessageResponse::new("Missing content type")),
            Invalidation(e) => crate::server_error(RevalidationResult::failed(
                "Failed to revalidate site",
                crate::unpack_error(&e),
            )),
            Unexpected(s) => crate::server_error(ErrorReport::new("Error revalidating content", s)),
        }
    }
}
