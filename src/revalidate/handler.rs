use axum::{
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
};
use sha2::{Digest, Sha256};
use tracing::{error, info, warn};

use super::tags::{ContentType, LAYOUT_PATH, derive_tags};
use crate::api::{RevalidationRequest, RevalidationResult};
use crate::error::{InvalidationError, WebhookError};
use crate::handler::AppState;
use crate::invalidator::{Invalidator, LayoutScope};

pub const SECRET_HEADER: &str = "x-webhook-secret";

pub async fn revalidate(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    match handle(&state, &headers, body).await {
        Ok(result) => crate::good_response(result),
        Err(e) => {
            error!(error = %e, "revalidation failed");
            e.into_response()
        }
    }
}

async fn handle(
    state: &AppState,
    headers: &HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<RevalidationResult, WebhookError> {
    let provided = headers.get(SECRET_HEADER).and_then(|v| v.to_str().ok());
    info!(
        secret_present = provided.is_some(),
        content_type = ?headers.get(header::CONTENT_TYPE),
        user_agent = ?headers.get(header::USER_AGENT),
        "webhook received"
    );

    let expected = state
        .secret
        .as_deref()
        .ok_or(WebhookError::SecretNotConfigured)?;

    let provided = provided.unwrap_or("");
    if !secrets_match(provided, expected) {
        warn!(
            expected_len = expected.len(),
            received_len = provided.len(),
            "invalid webhook secret"
        );
        return Err(WebhookError::InvalidSecret);
    }

    let body = body.map_err(|e| WebhookError::Unexpected(e.body_text()))?;
    let request = RevalidationRequest::from_json(&body)?;
    info!(payload = ?request, "webhook secret validated");

    let content_type = request
        .content_type()
        .ok_or(WebhookError::MissingContentType)?;
    let content_id = request.content_id();

    let tags = derive_tags(&ContentType::from(content_type), content_id);
    info!(content_type = %content_type, content_id = ?content_id, tags = ?tags, "starting revalidation");

    invalidate_all(state.invalidator.as_ref(), &tags).await?;
    info!(tags = %tags.join(", "), layout = LAYOUT_PATH, "revalidated");

    let described = match content_id {
        Some(id) => format!("{} (ID: {})", content_type, id),
        None => content_type.to_string(),
    };
    Ok(RevalidationResult::succeeded(format!(
        "Revalidated {} and related content",
        described
    )))
}

// Stops at the first failure; earlier invalidations are not rolled back.
async fn invalidate_all(invalidator: &dyn Invalidator, tags: &[String]) -> Result<(), InvalidationError> {
    for tag in tags {
        invalidator.invalidate_tag(tag).await?;
    }
    invalidator
        .invalidate_path(LAYOUT_PATH, LayoutScope::Layout)
        .await
}

/// Exact-match comparison that takes the same time wherever the inputs differ.
fn secrets_match(provided: &str, expected: &str) -> bool {
    let a = Sha256::digest(provided.as_bytes());
    let b = Sha256::digest(expected.as_bytes());
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
