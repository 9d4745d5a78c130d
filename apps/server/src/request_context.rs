//! Per-request context injected by middleware.

use axum::{extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
}

/// Handlers can take `RequestContext` directly; outside the request-id
/// middleware (unit tests) the id is empty.
#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or(RequestContext {
                request_id: String::new(),
            }))
    }
}
