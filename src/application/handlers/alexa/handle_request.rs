//! HandleAlexaRequestHandler - Command handler for one Alexa request envelope.
//!
//! Runs the whole pipeline for a platform request: body check, origin
//! validation, input construction, dispatch, finalization, rendering. Every
//! failure along the way is turned into a spoken error response, so the
//! handler itself never fails.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, info, info_span, warn, Instrument};

use crate::domain::foundation::{AdapterError, ErrorReason, InterfaceType, RequestId, VoiceError};
use crate::domain::platform::alexa::{AlexaRequestEnvelope, AlexaResponseEnvelope, PROTOCOL_VERSION};
use crate::domain::platform::AdapterRegistry;
use crate::domain::ssml::TagFilter;
use crate::domain::voice::{Metadata, ReplyBuilder};
use crate::ports::{OriginCheck, RequestOriginValidator};

use super::super::conversation::ConversationManager;
use super::ErrorTranslator;

/// Command to handle an Alexa request.
#[derive(Debug, Clone, Default)]
pub struct HandleAlexaRequestCommand {
    /// Raw request envelope.
    pub payload: Vec<u8>,
    /// `SignatureCertChainUrl` header.
    pub signature_cert_chain_url: Option<String>,
    /// `Signature` header.
    pub signature: Option<String>,
    /// Caller asked to skip origin validation.
    pub test_flag: bool,
}

impl HandleAlexaRequestCommand {
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: payload.into(),
            ..Default::default()
        }
    }
}

/// Result of request processing.
#[derive(Debug, Clone)]
pub struct RequestOutcome {
    /// Response to send back, success or error.
    pub envelope: AlexaResponseEnvelope,
    /// Reason, when the envelope reports an error.
    pub error: Option<ErrorReason>,
}

impl RequestOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Handler for Alexa request envelopes.
///
/// Immutable after construction; share it across requests behind an `Arc`.
pub struct HandleAlexaRequestHandler {
    manager: ConversationManager,
    origin_validator: Arc<dyn RequestOriginValidator>,
    registry: &'static AdapterRegistry,
    filter: TagFilter,
    translator: ErrorTranslator,
    allow_test_flag: bool,
}

impl HandleAlexaRequestHandler {
    pub fn new(
        manager: ConversationManager,
        origin_validator: Arc<dyn RequestOriginValidator>,
        filter: TagFilter,
    ) -> Self {
        Self {
            manager,
            origin_validator,
            registry: AdapterRegistry::global(),
            translator: ErrorTranslator::new(filter.clone()),
            filter,
            allow_test_flag: false,
        }
    }

    /// Lets requests carrying `testFlag` skip origin validation.
    pub fn with_test_flag_allowed(mut self, allowed: bool) -> Self {
        self.allow_test_flag = allowed;
        self
    }

    pub async fn handle(&self, cmd: HandleAlexaRequestCommand) -> RequestOutcome {
        let request_id = RequestId::new();
        let span = info_span!("alexa_request", request_id = %request_id);
        self.process(cmd).instrument(span).await
    }

    async fn process(&self, cmd: HandleAlexaRequestCommand) -> RequestOutcome {
        // Best metadata known when an error occurs
        let mut snapshot = Metadata::new();

        match self.try_process(cmd, &mut snapshot).await {
            Ok(envelope) => {
                info!(
                    should_end_session = envelope.response.should_end_session,
                    "Alexa request handled"
                );
                RequestOutcome {
                    envelope,
                    error: None,
                }
            }
            Err(err) => {
                let reason = err.reason();
                warn!(reason = %reason, error = %err, "Alexa request failed");
                RequestOutcome {
                    envelope: self.translator.translate(&err, PROTOCOL_VERSION, snapshot),
                    error: Some(reason),
                }
            }
        }
    }

    async fn try_process(
        &self,
        cmd: HandleAlexaRequestCommand,
        snapshot: &mut Metadata,
    ) -> Result<AlexaResponseEnvelope, VoiceError> {
        // 1. Parse the envelope and require a request body
        if cmd.payload.iter().all(u8::is_ascii_whitespace) {
            return Err(VoiceError::MissingRequestBody);
        }
        let envelope: AlexaRequestEnvelope =
            serde_json::from_slice::<Option<AlexaRequestEnvelope>>(&cmd.payload)
                .map_err(|e| VoiceError::adapter(InterfaceType::Alexa, AdapterError::Malformed(e)))?
                .ok_or(VoiceError::MissingRequestBody)?;
        let raw_request = envelope
            .request
            .clone()
            .filter(|r| !r.is_null())
            .ok_or(VoiceError::MissingRequestBody)?;

        // 2. Verify the request came from the platform
        self.verify_origin(&cmd, &envelope).await?;

        // 3. Session attributes become metadata exactly once
        let metadata = Metadata::from_session_attributes(envelope.session_attributes());
        *snapshot = metadata.clone();

        // 4. Build neutral input
        let session = envelope.session.as_ref();
        let user = session.and_then(|s| s.user.as_ref());
        let input = self
            .registry
            .build_for(InterfaceType::Alexa, raw_request, metadata)?
            .with_user_id(user.map(|u| u.user_id.clone()))
            .with_access_token(user.and_then(|u| u.access_token.clone()))
            .with_new_session(session.map_or(false, |s| s.new));
        let message_type = input.message_type();
        debug!(
            message_type = %message_type,
            platform_request_id = input.request_id().unwrap_or_default(),
            "Built conversation input"
        );

        // 5. Dispatch; a panicking handler must not take the server down
        let reply = ReplyBuilder::for_input(&input, self.filter.clone());
        let output = panic::catch_unwind(AssertUnwindSafe(|| self.manager.dispatch(&input, reply)))
            .map_err(|payload| VoiceError::unclassified(panic_message(payload.as_ref())))??;

        // 6. Finalize and render; the handler may not have used the reply it was given
        let mut output = output.filtered(&self.filter).finalize(message_type);
        output.metadata_mut().carry_forward(input.metadata());
        output.metadata_mut().record_turn(message_type);

        let version = envelope.version.as_deref().unwrap_or(PROTOCOL_VERSION);
        Ok(AlexaResponseEnvelope::from_output(output, version))
    }

    async fn verify_origin(
        &self,
        cmd: &HandleAlexaRequestCommand,
        envelope: &AlexaRequestEnvelope,
    ) -> Result<(), VoiceError> {
        if cmd.test_flag {
            if self.allow_test_flag {
                warn!("Origin validation skipped for test request");
                return Ok(());
            }
            debug!("testFlag ignored, test mode is not enabled");
        }

        let check = OriginCheck {
            signature_cert_chain_url: cmd.signature_cert_chain_url.clone(),
            signature: cmd.signature.clone(),
            application_id: envelope.application_id().map(str::to_string),
            request_timestamp: envelope.request_timestamp().map(str::to_string),
        };
        self.origin_validator
            .validate(&check)
            .await
            .map_err(|e| VoiceError::OriginValidationFailed(e.to_string()))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    format!("handler panicked: {}", detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::adapters::StaticOriginValidator;
    use crate::domain::foundation::{HandlerError, FALLBACK_MARKUP};
    use crate::domain::voice::{ConversationInput, TURN_KEY};
    use crate::ports::{ConversationHandler, HandlerResult, OriginValidationError};

    fn accepting() -> Arc<StaticOriginValidator> {
        Arc::new(StaticOriginValidator::accepting())
    }

    fn rejecting() -> Arc<StaticOriginValidator> {
        Arc::new(StaticOriginValidator::rejecting(OriginValidationError::MissingSignature))
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Test Handlers
    // ════════════════════════════════════════════════════════════════════════════

    #[derive(Default)]
    struct ScriptedHandler {
        turns: AtomicUsize,
    }

    impl ConversationHandler for ScriptedHandler {
        fn on_conversation_start(&self, input: &ConversationInput, mut reply: ReplyBuilder) -> HandlerResult {
            reply
                .speak("<emphasis>Hello</emphasis> there")
                .card("Hello", "Welcome");
            reply
                .set_metadata("greeted", true)?
                .set_metadata("linked", input.access_token().is_some())?;
            Ok(reply.build())
        }

        fn on_help_request(&self, _: &ConversationInput, _: ReplyBuilder) -> HandlerResult {
            Err(HandlerError::business("Help is unavailable right now.", "help backend down"))
        }

        fn on_conversation_turn(&self, input: &ConversationInput, mut reply: ReplyBuilder) -> HandlerResult {
            self.turns.fetch_add(1, Ordering::SeqCst);
            match input.intent_name() {
                Some("PanicIntent") => panic!("slot lookup exploded"),
                Some("ForgetIntent") => {
                    reply.remove_metadata("step")?.say("Forgotten");
                    return Ok(reply.build());
                }
                Some("FreshReplyIntent") => {
                    let mut own = ReplyBuilder::new(Metadata::new(), TagFilter::none());
                    own.speak("<emphasis>hi</emphasis> there");
                    return Ok(own.build());
                }
                _ => {}
            }
            reply.say("Noted").end_conversation();
            Ok(reply.build())
        }
    }

    fn handler_with(
        validator: Arc<StaticOriginValidator>,
        business: Arc<ScriptedHandler>,
    ) -> HandleAlexaRequestHandler {
        HandleAlexaRequestHandler::new(
            ConversationManager::new(business),
            validator,
            TagFilter::new(["emphasis"]).unwrap(),
        )
    }

    fn handler() -> HandleAlexaRequestHandler {
        handler_with(accepting(), Arc::new(ScriptedHandler::default()))
    }

    fn envelope(request: Value, attributes: Value) -> Vec<u8> {
        json!({
            "version": "1.0",
            "session": {
                "new": false,
                "sessionId": "session-1",
                "application": { "applicationId": "amzn1.ask.skill.test" },
                "attributes": attributes,
                "user": { "userId": "user-1" }
            },
            "request": request
        })
        .to_string()
        .into_bytes()
    }

    fn launch() -> Value {
        json!({ "type": "LaunchRequest", "requestId": "req-1", "timestamp": "2024-01-01T00:00:00Z" })
    }

    fn intent(name: &str) -> Value {
        json!({ "type": "IntentRequest", "requestId": "req-2", "intent": { "name": name } })
    }

    async fn run(handler: &HandleAlexaRequestHandler, payload: Vec<u8>) -> RequestOutcome {
        handler.handle(HandleAlexaRequestCommand::new(payload)).await
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Successful Requests
    // ════════════════════════════════════════════════════════════════════════════

    mod success {
        use super::*;

        #[tokio::test]
        async fn launch_renders_filtered_speech_and_card() {
            let outcome = run(&handler(), envelope(launch(), json!({}))).await;

            assert!(outcome.is_success());
            let envelope = outcome.envelope;
            assert_eq!(envelope.ssml(), Some("<speak>Hello there</speak>"));
            assert_eq!(envelope.response.card.as_ref().unwrap().title, "Hello");
            assert!(!envelope.response.should_end_session);
        }

        #[tokio::test]
        async fn metadata_round_trips_with_handler_edits_and_bookkeeping() {
            let outcome = run(&handler(), envelope(launch(), json!({ "step": 4 }))).await;

            let attrs = outcome.envelope.session_attributes;
            assert_eq!(attrs["step"], 4);
            assert_eq!(attrs["greeted"], true);
            assert_eq!(attrs[TURN_KEY], 1);
        }

        #[tokio::test]
        async fn turn_counter_continues_from_prior_session() {
            let outcome = run(&handler(), envelope(launch(), json!({ "_voice.turn": 6 }))).await;

            assert_eq!(outcome.envelope.session_attributes[TURN_KEY], 7);
        }

        #[tokio::test]
        async fn access_token_reaches_the_handler() {
            let mut payload: Value = serde_json::from_slice(&envelope(launch(), json!({}))).unwrap();
            payload["session"]["user"]["accessToken"] = json!("linked-token");

            let outcome = run(&handler(), payload.to_string().into_bytes()).await;

            assert_eq!(outcome.envelope.session_attributes["linked"], true);
        }

        #[tokio::test]
        async fn null_session_attributes_are_treated_as_empty() {
            let outcome = run(&handler(), envelope(launch(), Value::Null)).await;

            assert!(outcome.is_success());
            assert_eq!(outcome.envelope.session_attributes[TURN_KEY], 1);
            assert_eq!(outcome.envelope.session_attributes["greeted"], true);
        }

        #[tokio::test]
        async fn handler_built_reply_is_still_filtered_and_keeps_session_state() {
            let attributes = json!({ "_voice.turn": 5, "k": 1 });

            let outcome = run(&handler(), envelope(intent("FreshReplyIntent"), attributes)).await;

            assert!(outcome.is_success());
            assert_eq!(outcome.envelope.ssml(), Some("<speak>hi there</speak>"));
            let attrs = outcome.envelope.session_attributes;
            assert_eq!(attrs[TURN_KEY], 6);
            assert_eq!(attrs["k"], 1);
        }

        #[tokio::test]
        async fn explicitly_removed_keys_stay_removed() {
            let attributes = json!({ "step": 2, "other": "x" });

            let outcome = run(&handler(), envelope(intent("ForgetIntent"), attributes)).await;

            let attrs = outcome.envelope.session_attributes;
            assert!(attrs.get("step").is_none());
            assert_eq!(attrs["other"], "x");
        }

        #[tokio::test]
        async fn ended_conversation_has_no_speech() {
            let outcome = run(&handler(), envelope(intent("NoteIntent"), json!({}))).await;

            assert!(outcome.is_success());
            assert!(outcome.envelope.response.should_end_session);
            assert!(outcome.envelope.response.output_speech.is_none());
        }

        #[tokio::test]
        async fn stop_bypasses_business_logic() {
            let business = Arc::new(ScriptedHandler::default());
            let handler = handler_with(accepting(), business.clone());

            let outcome = run(&handler, envelope(intent("AMAZON.StopIntent"), json!({}))).await;

            assert!(outcome.is_success());
            assert!(outcome.envelope.response.should_end_session);
            assert_eq!(business.turns.load(Ordering::SeqCst), 0);
        }

        #[tokio::test]
        async fn session_end_is_terminal() {
            let request = json!({ "type": "SessionEndedRequest", "reason": "USER_INITIATED" });

            let outcome = run(&handler(), envelope(request, json!({}))).await;

            assert!(outcome.is_success());
            assert!(outcome.envelope.response.should_end_session);
            assert!(outcome.envelope.response.output_speech.is_none());
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Error Responses
    // ════════════════════════════════════════════════════════════════════════════

    mod errors {
        use super::*;

        #[tokio::test]
        async fn empty_payload_is_missing_body() {
            let outcome = run(&handler(), Vec::new()).await;

            assert_eq!(outcome.error, Some(ErrorReason::MissingRequestBody));
            assert!(outcome.envelope.ssml().is_some());
            assert_eq!(outcome.envelope.version, PROTOCOL_VERSION);
        }

        #[tokio::test]
        async fn envelope_without_request_is_missing_body() {
            let payload = json!({ "version": "1.0", "session": {} }).to_string().into_bytes();

            let outcome = run(&handler(), payload).await;

            assert_eq!(outcome.error, Some(ErrorReason::MissingRequestBody));
        }

        #[tokio::test]
        async fn null_payload_is_missing_body() {
            let outcome = run(&handler(), b"null".to_vec()).await;

            assert_eq!(outcome.error, Some(ErrorReason::MissingRequestBody));
        }

        #[tokio::test]
        async fn malformed_json_is_adapter_failure() {
            let outcome = run(&handler(), b"{not json".to_vec()).await;

            assert_eq!(outcome.error, Some(ErrorReason::AdapterConstructionFailed));
            assert!(outcome.envelope.response.should_end_session);
        }

        #[tokio::test]
        async fn unknown_request_type_is_adapter_failure_with_metadata() {
            let request = json!({ "type": "Display.ElementSelected" });

            let outcome = run(&handler(), envelope(request, json!({ "step": 2 }))).await;

            assert_eq!(outcome.error, Some(ErrorReason::AdapterConstructionFailed));
            assert_eq!(outcome.envelope.session_attributes["step"], 2);
        }

        #[tokio::test]
        async fn rejected_origin_never_reaches_business_logic() {
            let business = Arc::new(ScriptedHandler::default());
            let handler = handler_with(rejecting(), business.clone());

            let outcome = run(&handler, envelope(intent("NoteIntent"), json!({ "step": 1 }))).await;

            assert_eq!(outcome.error, Some(ErrorReason::OriginValidationFailed));
            assert_eq!(business.turns.load(Ordering::SeqCst), 0);
            assert!(outcome.envelope.session_attributes.is_empty());
        }

        #[tokio::test]
        async fn business_error_speaks_handler_markup_and_stays_open() {
            let request = intent("AMAZON.HelpIntent");

            let outcome = run(&handler(), envelope(request, json!({ "step": 3 }))).await;

            assert_eq!(outcome.error, Some(ErrorReason::BusinessLogicError));
            assert_eq!(
                outcome.envelope.ssml(),
                Some("<speak>Help is unavailable right now.</speak>")
            );
            assert!(!outcome.envelope.response.should_end_session);
            assert_eq!(outcome.envelope.session_attributes["step"], 3);
        }

        #[tokio::test]
        async fn handler_panic_becomes_unclassified_failure() {
            let outcome = run(&handler(), envelope(intent("PanicIntent"), json!({}))).await;

            assert_eq!(outcome.error, Some(ErrorReason::UnclassifiedFailure));
            let ssml = outcome.envelope.ssml().unwrap();
            assert_eq!(ssml, format!("<speak>{}</speak>", FALLBACK_MARKUP));
            assert!(!ssml.contains("exploded"));
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Test Mode
    // ════════════════════════════════════════════════════════════════════════════

    mod test_mode {
        use super::*;

        fn test_command(payload: Vec<u8>) -> HandleAlexaRequestCommand {
            HandleAlexaRequestCommand {
                test_flag: true,
                ..HandleAlexaRequestCommand::new(payload)
            }
        }

        #[tokio::test]
        async fn test_flag_skips_validation_when_allowed() {
            let validator = rejecting();
            let handler = handler_with(validator.clone(), Arc::new(ScriptedHandler::default()))
                .with_test_flag_allowed(true);

            let outcome = handler.handle(test_command(envelope(launch(), json!({})))).await;

            assert!(outcome.is_success());
            assert_eq!(validator.calls(), 0);
        }

        #[tokio::test]
        async fn test_flag_is_ignored_when_not_allowed() {
            let validator = rejecting();
            let handler = handler_with(validator.clone(), Arc::new(ScriptedHandler::default()));

            let outcome = handler.handle(test_command(envelope(launch(), json!({})))).await;

            assert_eq!(outcome.error, Some(ErrorReason::OriginValidationFailed));
            assert_eq!(validator.calls(), 1);
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Rendered Markup
    // ════════════════════════════════════════════════════════════════════════════

    mod rendered_markup {
        use super::*;
        use proptest::prelude::*;

        const UNSUPPORTED: [&str; 2] = ["emphasis", "audio"];

        /// Speaks fixed markup through a reply it builds itself, without filtering.
        struct RawMarkupHandler {
            markup: String,
        }

        impl ConversationHandler for RawMarkupHandler {
            fn on_conversation_start(&self, _: &ConversationInput, _: ReplyBuilder) -> HandlerResult {
                let mut own = ReplyBuilder::new(Metadata::new(), TagFilter::none());
                own.speak(&self.markup);
                Ok(own.build())
            }

            fn on_help_request(&self, _: &ConversationInput, _: ReplyBuilder) -> HandlerResult {
                Err(HandlerError::business(self.markup.clone(), "help failed"))
            }

            fn on_conversation_turn(&self, _: &ConversationInput, reply: ReplyBuilder) -> HandlerResult {
                Ok(reply.build())
            }
        }

        fn arb_markup() -> impl Strategy<Value = String> {
            let piece = prop_oneof![
                Just("<emphasis>".to_string()),
                Just("</emphasis>".to_string()),
                Just("<emphasis level=\"strong\">".to_string()),
                Just("<AUDIO src=\"x.mp3\"/>".to_string()),
                Just("<break time=\"1s\"/>".to_string()),
                "[a-z ]{0,6}",
            ];
            prop::collection::vec(piece, 0..8).prop_map(|parts| parts.concat())
        }

        fn render(markup: &str, request: Value) -> RequestOutcome {
            let handler = HandleAlexaRequestHandler::new(
                ConversationManager::new(Arc::new(RawMarkupHandler {
                    markup: markup.to_string(),
                })),
                accepting(),
                TagFilter::new(UNSUPPORTED).unwrap(),
            );
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            runtime.block_on(run(&handler, envelope(request, json!({}))))
        }

        fn contains_unsupported(ssml: &str) -> bool {
            let lower = ssml.to_ascii_lowercase();
            UNSUPPORTED
                .iter()
                .any(|tag| lower.contains(&format!("<{}", tag)) || lower.contains(&format!("</{}", tag)))
        }

        proptest! {
            #[test]
            fn success_speech_never_contains_unsupported_tags(markup in arb_markup()) {
                let outcome = render(&markup, launch());
                prop_assert!(outcome.is_success());
                prop_assert!(!contains_unsupported(outcome.envelope.ssml().unwrap_or_default()));
            }

            #[test]
            fn error_speech_is_never_silent_or_unfiltered(markup in arb_markup()) {
                let outcome = render(&markup, intent("AMAZON.HelpIntent"));
                prop_assert_eq!(outcome.error, Some(ErrorReason::BusinessLogicError));
                let ssml = outcome.envelope.ssml().unwrap_or_default();
                prop_assert!(!contains_unsupported(ssml));
                prop_assert!(ssml != "<speak></speak>");
            }
        }
    }

    #[test]
    fn panic_message_reads_string_payloads() {
        let payload: Box<dyn Any + Send> = Box::new(String::from("boom"));
        assert_eq!(panic_message(payload.as_ref()), "handler panicked: boom");

        let payload: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(
            panic_message(payload.as_ref()),
            "handler panicked: non-string panic payload"
        );
    }
}
