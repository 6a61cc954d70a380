use axum::{Router, routing::post};

use super::handler;
use crate::handler::AppState;

pub fn routes(path: &str) -> Router<AppState> {
    Router::new().route(path, post(handler::revalidate))
}
