//! HTTP handlers for the Alexa endpoint.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::HeaderMap,
    Json,
};

use crate::application::handlers::alexa::{HandleAlexaRequestCommand, HandleAlexaRequestHandler};
use crate::domain::platform::alexa::AlexaResponseEnvelope;
use crate::domain::platform::AdapterRegistry;

use super::dto::{AlexaQuery, HealthResponse};

/// Header carrying the URL of the signing certificate chain.
pub const SIGNATURE_CERT_CHAIN_URL_HEADER: &str = "SignatureCertChainUrl";
/// Header carrying the request signature.
pub const SIGNATURE_HEADER: &str = "Signature";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for Alexa endpoints.
#[derive(Clone)]
pub struct AlexaAppState {
    pub request_handler: Arc<HandleAlexaRequestHandler>,
}

impl AlexaAppState {
    pub fn new(request_handler: HandleAlexaRequestHandler) -> Self {
        Self {
            request_handler: Arc::new(request_handler),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /alexa - Handle an Alexa request envelope
///
/// Always answers 200 with an envelope; failures are reported as spoken
/// error responses so the device never goes silent.
pub async fn handle_alexa_request(
    State(state): State<AlexaAppState>,
    Query(query): Query<AlexaQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<AlexaResponseEnvelope> {
    let cmd = HandleAlexaRequestCommand {
        payload: body.to_vec(),
        signature_cert_chain_url: header_value(&headers, SIGNATURE_CERT_CHAIN_URL_HEADER),
        signature: header_value(&headers, SIGNATURE_HEADER),
        test_flag: query.test_flag(),
    };

    let outcome = state.request_handler.handle(cmd).await;
    Json(outcome.envelope)
}

/// GET /health - Liveness probe listing registered platforms
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        platforms: AdapterRegistry::global()
            .platforms()
            .map(|p| p.to_string())
            .collect(),
    })
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
