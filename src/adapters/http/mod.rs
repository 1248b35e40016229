//! HTTP adapters - REST endpoint implementations.
//!
//! Each platform has its own HTTP adapter; [`app_router`] assembles them
//! with the shared middleware stack.

pub mod alexa;

use std::time::Duration;

use axum::{routing::get, Router};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

pub use alexa::{alexa_router, AlexaAppState};

/// Build the complete application router.
///
/// Requests are traced and cut off after `request_timeout`.
pub fn app_router(state: AlexaAppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(alexa::health))
        .merge(alexa_router(state))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}
