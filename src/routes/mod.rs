// src/routes/mod.rs
pub mod chat;

use crate::{
    config::{AppConfig, ConfigError},
    message::ErrorResponse,
    state::SharedState,
};
use axum::{
    Json, Router,
    http::{HeaderValue, Method, StatusCode, header::CONTENT_TYPE},
    response::IntoResponse,
    routing::get,
};
use chat::{chat_handler, welcome_handler};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn create_router(config: &AppConfig) -> Result<Router<SharedState>, ConfigError> {
    let cors = cors_layer(&config.allowed_origin)?;

    let api_routes = Router::new()
        .route("/chatbot", get(welcome_handler).post(chat_handler))
        .layer(cors);

    Ok(Router::new()
        .nest("/api", api_routes)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http()))
}

/// Single trusted origin, credentials allowed.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, ConfigError> {
    let origin = origin
        .parse::<HeaderValue>()
        .map_err(|_| ConfigError::InvalidOrigin(origin.to_string()))?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Not found".to_string(),
        }),
    )
}
