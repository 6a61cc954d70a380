use std::sync::Arc;

use axum::{Json, response::IntoResponse};
use tracing::info;

use crate::api::HealthResponse;
use crate::invalidator::Invalidator;

#[derive(Clone)]
pub struct AppState {
    pub secret: Option<Arc<str>>,
    pub invalidator: Arc<dyn Invalidator>,
}

impl AppState {
    /// An empty secret counts as unset, so every webhook fails closed.
    pub fn new(secret: Option<String>, invalidator: Arc<dyn Invalidator>) -> Self {
        AppState {
            secret: secret.filter(|s| !s.is_empty()).map(Arc::from),
            invalidator,
        }
    }
}

pub async fn healthcheck() -> impl IntoResponse {
    info!("got healthcheck request");
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invalidator::LogInvalidator;

    #[test]
    fn test_empty_secret_is_unset() {
        let state = AppState::new(Some(String::new()), Arc::new(LogInvalidator));
        assert!(state.secret.is_none());

        let state = AppState::new(Some("abc".to_string()), Arc::new(LogInvalidator));
        assert_eq!(state.secret.as_deref(), Some("abc"));
    }
}
