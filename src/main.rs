//! Voice Adapter server
//!
//! Serves the Alexa skill endpoint backed by the sample greeter skill.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use voice_adapter::adapters::{app_router, AlexaAppState, AlexaOriginValidator};
use voice_adapter::application::{ConversationManager, GreeterHandler, HandleAlexaRequestHandler};
use voice_adapter::config::{AppConfig, LogFormat};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    let filter = config.alexa.tag_filter()?;
    let request_handler = HandleAlexaRequestHandler::new(
        ConversationManager::new(Arc::new(GreeterHandler::new())),
        Arc::new(AlexaOriginValidator::from_config(&config.alexa)),
        filter,
    )
    .with_test_flag_allowed(config.alexa.allow_test_flag);

    if config.alexa.allow_test_flag {
        tracing::warn!("testFlag bypass enabled; origin validation can be skipped");
    }

    let app = app_router(
        AlexaAppState::new(request_handler),
        config.server.request_timeout(),
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        unsupported_tags = ?config.alexa.unsupported_tags_list(),
        "Voice adapter listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    match config.server.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
