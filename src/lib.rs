use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::error::Error;

pub mod api;
pub mod config;
pub mod error;
pub mod handler;
pub mod invalidator;
pub mod revalidate;
pub mod server;

pub fn server_error<T: Serialize>(body: T) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

pub fn bad_request<T: Serialize>(body: T) -> Response {
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

pub fn unauthorized<T: Serialize>(body: T) -> Response {
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

fn good_response<T: Serialize>(body: T) -> Response {
    (StatusCode::OK, Json(body)).into_response()
}

pub fn unpack_error(err: &(dyn Error)) -> String {
    let mut parts = Vec::new();
    parts.push(err.to_string());
    let mut current = err.source();
    while let Some(source) = current {
        parts.push(source.to_string());
        current = source.source();
    }
    parts.join(": ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvalidationError;

    #[test]
    fn test_unpack_error_without_source() {
        let err = InvalidationError::Status {
            target: "tag posts".to_string(),
            status: 502,
        };
        assert_eq!(
            unpack_error(&err),
            "tag posts answered with status 502"
        );
    }
}
