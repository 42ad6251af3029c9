// src/state.rs
use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::chatbot::ChatBot;
use crate::services::completion::{CompletionProvider, ProviderError};
use crate::services::openai::OpenAiProvider;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub chatbot: ChatBot,
}

impl AppState {
    pub fn new(chatbot: ChatBot) -> Self {
        Self { chatbot }
    }

    /// Wires the OpenAI-compatible provider from config.
    pub fn from_config(config: &AppConfig) -> Result<Self, ProviderError> {
        let provider: Arc<dyn CompletionProvider> =
            Arc::new(OpenAiProvider::new(config.provider.clone())?);
        Ok(Self::new(ChatBot::new(provider, config.failure_policy)))
    }
}
