use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{InvalidatorConfig, InvalidatorKind};
use crate::error::InvalidationError;

/// How much of the tree under a path gets invalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutScope {
    Layout,
    Page,
}

impl LayoutScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutScope::Layout => "layout",
            LayoutScope::Page => "page",
        }
    }
}

impl fmt::Display for LayoutScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cache-invalidation capability. Both calls are expected to be idempotent.
#[async_trait]
pub trait Invalidator: Send + Sync {
    async fn invalidate_tag(&self, tag: &str) -> Result<(), InvalidationError>;

    async fn invalidate_path(&self, path: &str, scope: LayoutScope) -> Result<(), InvalidationError>;
}

pub fn build_invalidator(cfg: &InvalidatorConfig) -> Result<Arc<dyn Invalidator>> {
    match cfg.kind {
        InvalidatorKind::Log => {
            tracing::info!("using log invalidator, cache calls are only recorded");
            Ok(Arc::new(LogInvalidator))
        }
        InvalidatorKind::Http => {
            let invalidator = HttpInvalidator::new(cfg)?;
            tracing::info!(base_url = %invalidator.base_url, "using http invalidator");
            Ok(Arc::new(invalidator))
        }
    }
}

/// Dry-run backend: records every call in the log and always succeeds.
pub struct LogInvalidator;

#[async_trait]
impl Invalidator for LogInvalidator {
    async fn invalidate_tag(&self, tag: &str) -> Result<(), InvalidationError> {
        tracing::info!(tag = %tag, "invalidate tag");
        Ok(())
    }

    async fn invalidate_path(&self, path: &str, scope: LayoutScope) -> Result<(), InvalidationError> {
        tracing::info!(path = %path, scope = %scope, "invalidate path");
        Ok(())
    }
}

/// Forwards invalidations to an upstream cache endpoint.
///
/// Tags go to `POST {base_url}{tag_path}?tag=<tag>`, paths to
/// `POST {base_url}{path_path}?path=<path>&type=<scope>`. Any non-2xx answer is
/// a failure.
pub struct HttpInvalidator {
    client: reqwest::Client,
    base_url: String,
    tag_path: String,
    path_path: String,
    token: Option<String>,
}

impl HttpInvalidator {
    pub fn new(cfg: &InvalidatorConfig) -> Result<Self> {
        let base_url = cfg
            .base_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .context("invalidator.base_url is required for the http invalidator")?;
        reqwest::Url::parse(base_url)
            .with_context(|| format!("invalid invalidator.base_url {}", base_url))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_seconds))
            .build()
            .context("failed to build http client")?;

        Ok(HttpInvalidator {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            tag_path: cfg.tag_path.clone(),
            path_path: cfg.path_path.clone(),
            token: cfg.token().map(str::to_owned),
        })
    }

    fn tag_url(&self, tag: &str) -> String {
        format!(
            "{}{}?tag={}",
            self.base_url,
            self.tag_path,
            urlencoding::encode(tag)
        )
    }

    fn path_url(&self, path: &str, scope: LayoutScope) -> String {
        format!(
            "{}{}?path={}&type={}",
            self.base_url,
            self.path_path,
            urlencoding::encode(path),
            scope
        )
    }

    /// Errors name `target` (the tag or path), never the upstream URL.
    async fn send(&self, url: String, target: String) -> Result<(), InvalidationError> {
        let mut request = self.client.post(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "invalidation request failed");
                return Err(InvalidationError::Transport {
                    target,
                    source: e.without_url(),
                });
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "invalidation rejected by upstream");
            return Err(InvalidationError::Status {
                target,
                status: status.as_u16(),
            });
        }

        tracing::debug!(url = %url, status = status.as_u16(), "invalidation accepted");
        Ok(())
    }
}

#[async_trait]
impl Invalidator for HttpInvalidator {
    async fn invalidate_tag(&self, tag: &str) -> Result<(), InvalidationError> {
        self.send(self.tag_url(tag), format!("tag {}", tag)).await
    }

    async fn invalidate_path(&self, path: &str, scope: LayoutScope) -> Result<(), InvalidationError> {
        self.send(self.path_url(path, scope), format!("path {} ({})", path, scope))
            .await
    }
}
