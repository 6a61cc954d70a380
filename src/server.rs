use std::time::Duration;

use axum::http::Method;
use axum::{Router, routing::get};
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::handler::{AppState, healthcheck};
use crate::revalidate;

pub fn router(state: AppState, cfg: &Config) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/", get(healthcheck))
        .merge(revalidate::routes(&cfg.webhook.route_path()))
        .layer(TimeoutLayer::new(Duration::from_secs(cfg.app.max_duration_seconds)))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Cancels `token` on ctrl+c and resolves once it is cancelled.
pub async fn shutdown_signal(token: CancellationToken) {
    let watcher = token.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl+c");
            return;
        }
        tracing::info!("ctrl+c signal received, preparing to shutdown");
        watcher.cancel();
    });
    token.cancelled().await;
}
