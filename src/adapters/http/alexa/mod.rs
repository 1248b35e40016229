//! HTTP adapter for the Alexa skill endpoint.
//!
//! - `POST /alexa` - Handle an Alexa request envelope
//! - `GET /health` - Liveness probe

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{AlexaQuery, HealthResponse};
pub use handlers::{handle_alexa_request, health, AlexaAppState};
pub use routes::{alexa_router, alexa_routes};
