// src/services/chatbot.rs
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::FailurePolicy;

use super::completion::{CompletionProvider, PromptMessage, ProviderError};

pub const WELCOME_MESSAGE: &str = "Welcome to the ChatBot API!";
pub const FALLBACK_REPLY: &str = "ChatBot response";
pub const PERSONA: &str = "You are a helpful assistant. Answer the user's questions clearly and concisely.";

/// Builds the two-turn conversation: persona first, then the user's message.
pub fn build_conversation(persona: &str, user_msg: &str) -> Vec<PromptMessage> {
    vec![PromptMessage::system(persona), PromptMessage::user(user_msg)]
}

#[derive(Clone)]
pub struct ChatBot {
    provider: Arc<dyn CompletionProvider>,
    persona: String,
    policy: FailurePolicy,
}

impl ChatBot {
    pub fn new(provider: Arc<dyn CompletionProvider>, policy: FailurePolicy) -> Self {
        Self {
            provider,
            persona: PERSONA.to_string(),
            policy,
        }
    }

    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }

    /// Asks the provider for a reply. Provider failures are logged, then either
    /// returned or replaced by [`FALLBACK_REPLY`] depending on the policy.
    pub async fn generate_reply(&self, user_msg: &str) -> Result<String, ProviderError> {
        let conversation = build_conversation(&self.persona, user_msg);

        match self.provider.complete(&conversation).await {
            Ok(reply) => {
                info!(message_len = user_msg.len(), reply_len = reply.len(), "chatbot replied");
                Ok(reply)
            }
            Err(err) => {
                warn!(error = %err, policy = ?self.policy, "completion provider failed");
                match self.policy {
                    FailurePolicy::Surface => Err(err),
                    FailurePolicy::Fallback => Ok(FALLBACK_REPLY.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::completion::Role;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Recording {
        seen: Mutex<Vec<PromptMessage>>,
        fail: bool,
    }

    #[async_trait]
    impl CompletionProvider for Recording {
        async fn complete(&self, conversation: &[PromptMessage]) -> Result<String, ProviderError> {
            *self.seen.lock().unwrap() = conversation.to_vec();
            if self.fail {
                Err(ProviderError::EmptyChoices)
            } else {
                Ok("pong".to_string())
            }
        }
    }

    fn recording(fail: bool) -> Arc<Recording> {
        Arc::new(Recording { seen: Mutex::new(Vec::new()), fail })
    }

    #[test]
    fn conversation_is_persona_then_user() {
        let conv = build_conversation("be nice", "hello");
        assert_eq!(conv.len(), 2);
        assert_eq!(conv[0].role, Role::System);
        assert_eq!(conv[0].content, "be nice");
        assert_eq!(conv[1].role, Role::User);
        assert_eq!(conv[1].content, "hello");
    }

    #[tokio::test]
    async fn passes_conversation_to_provider() {
        let provider = recording(false);
        let bot = ChatBot::new(provider.clone(), FailurePolicy::Surface).with_persona("persona");

        let reply = bot.generate_reply("ping").await.unwrap();
        assert_eq!(reply, "pong");

        let seen = provider.seen.lock().unwrap().clone();
        assert_eq!(seen, build_conversation("persona", "ping"));
    }

    #[tokio::test]
    async fn surface_policy_returns_error() {
        let bot = ChatBot::new(recording(true), FailurePolicy::Surface);
        let err = bot.generate_reply("ping").await.unwrap_err();
        assert!(matches!(err, ProviderError::EmptyChoices));
    }

    #[tokio::test]
    async fn fallback_policy_masks_error() {
        let bot = ChatBot::new(recording(true), FailurePolicy::Fallback);
        assert_eq!(bot.generate_reply("ping").await.unwrap(), FALLBACK_REPLY);
    }
}
