use std::sync::Arc;

use anyhow::Context;
use chatbot_relay::{config::AppConfig, routes, state::AppState};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("chatbot_relay=debug,tower_http=debug")),
        )
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    if config.provider.api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; POST /api/chatbot will fail until it is");
    }

    let state = Arc::new(AppState::from_config(&config).context("failed to build provider client")?);

    let app = routes::create_router(&config)
        .context("failed to build router")?
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(
        %addr,
        model = %config.provider.model,
        origin = %config.allowed_origin,
        policy = ?config.failure_policy,
        "chatbot API listening"
    );
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
