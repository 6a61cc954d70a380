//! WordPress Revalidation Webhook
//!
//! Receives content-change notifications from WordPress and invalidates the
//! cache tags that depend on the changed content, plus the site's root layout.
//!
//! # Flow
//!
//! - The `x-webhook-secret` header must match the configured secret
//! - The JSON body names a `contentType` and an optional `contentId`
//! - [`derive_tags`] maps that pair to cache tags, each handed to the
//!   configured [`Invalidator`](crate::invalidator::Invalidator)
//! - The root layout is always invalidated last
//!
//! # Usage
//!
//! ```rust,ignore
//! use wp_revalidate::revalidate;
//!
//! let app = Router::new()
//!     .merge(revalidate::routes("/api/revalidate"))
//!     .with_state(app_state);
//! ```

mod handler;
mod routes;
mod tags;

pub use routes::routes;
pub use tags::{ContentType, GLOBAL_TAG, LAYOUT_PATH, derive_tags};
