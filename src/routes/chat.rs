use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::debug;

use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse},
    services::chatbot::WELCOME_MESSAGE,
    state::SharedState,
};

pub async fn welcome_handler() -> Json<ChatResponse> {
    Json(ChatResponse::new(WELCOME_MESSAGE))
}

pub async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(payload) = payload?;

    if payload.message.trim().is_empty() {
        return Err(AppError::BadRequest("Message cannot be empty".to_string()));
    }

    debug!(message_len = payload.message.len(), "chat request accepted");
    let reply = state.chatbot.generate_reply(&payload.message).await?;

    Ok(Json(ChatResponse::new(reply)))
}
