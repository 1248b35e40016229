//! Axum router configuration for Alexa endpoints.

use axum::{routing::post, Router};

use super::handlers::{handle_alexa_request, AlexaAppState};

/// Create the Alexa router.
///
/// # Routes
/// - `POST /alexa` - Handle an Alexa request envelope (origin verified
///   by the request handler, not by middleware)
pub fn alexa_routes() -> Router<AlexaAppState> {
    Router::new().route("/alexa", post(handle_alexa_request))
}

/// Create the Alexa router with state applied.
pub fn alexa_router(state: AlexaAppState) -> Router {
    alexa_routes().with_state(state)
}
