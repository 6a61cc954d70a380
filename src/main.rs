use std::path::PathBuf;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use wp_revalidate::config::{Cli, Config, default_config_path};
use wp_revalidate::handler::AppState;
use wp_revalidate::invalidator::build_invalidator;
use wp_revalidate::server;

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    // .env is optional; variables already in the environment win
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    tracing::info!("wp-revalidate.svc starting");

    let config_path = args
        .config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    let mut cfg = Config::load_or_default(&config_path).unwrap_or_else(|e| {
        tracing::error!(error = %e, path = ?config_path, "failed to load config file");
        std::process::exit(1);
    });
    if let Some(port) = args.port {
        cfg.app.port = port;
    }

    if cfg.webhook.secret().is_none() {
        tracing::warn!("webhook secret is not configured, every webhook will be rejected");
    }

    let invalidator = build_invalidator(&cfg.invalidator).unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup invalidator");
        std::process::exit(1);
    });

    let state = AppState::new(cfg.webhook.secret().map(str::to_owned), invalidator);
    let app = server::router(state, &cfg);

    let address = cfg.app.address();
    let listener = tokio::net::TcpListener::bind(&address).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup tcp listener");
        std::process::exit(1);
    });

    let cancellation_token = CancellationToken::new();

    tracing::info!(webhook = %cfg.webhook.route_path(), "wp-revalidate.svc running on {}", &address);
    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(server::shutdown_signal(cancellation_token))
        .await
    {
        tracing::error!(error = %err, "server error");
        std::process::exit(1);
    }

    tracing::info!("wp-revalidate.svc going off, graceful shutdown complete");
}
