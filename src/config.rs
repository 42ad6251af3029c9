// src/config.rs
use std::{env, str::FromStr, time::Duration};

use thiserror::Error;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown failure policy '{0}' (expected 'surface' or 'fallback')")]
    UnknownFailurePolicy(String),

    #[error("invalid allowed origin '{0}'")]
    InvalidOrigin(String),
}

/// What the caller sees when the completion provider fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Report the failure as a 502 with an error body.
    #[default]
    Surface,
    /// Answer 200 with the canned fallback reply.
    Fallback,
}

impl FromStr for FailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "surface" => Ok(Self::Surface),
            "fallback" => Ok(Self::Fallback),
            other => Err(ConfigError::UnknownFailurePolicy(other.to_string())),
        }
    }
}

/// Settings for the outbound completion provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origin: String,
    pub failure_policy: FailurePolicy,
    pub provider: ProviderConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            failure_policy: FailurePolicy::default(),
            provider: ProviderConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset and
    /// unparseable numbers fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = get("PORT")
            .and_then(|v| v.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let allowed_origin = get("ALLOWED_ORIGIN")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string());
        if !(allowed_origin.starts_with("http://") || allowed_origin.starts_with("https://")) {
            return Err(ConfigError::InvalidOrigin(allowed_origin));
        }

        let failure_policy = match get("CHATBOT_FAILURE_POLICY") {
            Some(v) => v.parse()?,
            None => FailurePolicy::default(),
        };

        let provider = ProviderConfig {
            api_key: get("OPENAI_API_KEY").map(|v| v.trim().to_string()),
            base_url: get("OPENAI_BASE_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: get("CHATBOT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens: get("CHATBOT_MAX_TOKENS")
                .and_then(|v| v.trim().parse::<u32>().ok())
                .unwrap_or(DEFAULT_MAX_TOKENS),
            timeout: Duration::from_secs(
                get("CHATBOT_TIMEOUT_SECS")
                    .and_then(|v| v.trim().parse::<u64>().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            allowed_origin,
            failure_policy,
            provider,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.allowed_origin, "http://localhost:5173");
        assert_eq!(cfg.failure_policy, FailurePolicy::Surface);
        assert!(cfg.provider.api_key.is_none());
        assert_eq!(cfg.provider.model, DEFAULT_MODEL);
    }

    #[test]
    fn reads_overrides() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("PORT", "8081"),
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://127.0.0.1:9999/v1/"),
            ("CHATBOT_MAX_TOKENS", "64"),
            ("CHATBOT_FAILURE_POLICY", "Fallback"),
        ]))
        .unwrap();
        assert_eq!(cfg.port, 8081);
        assert_eq!(cfg.provider.api_key.as_deref(), Some("sk-test"));
        assert_eq!(cfg.provider.base_url, "http://127.0.0.1:9999/v1");
        assert_eq!(cfg.provider.max_tokens, 64);
        assert_eq!(cfg.failure_policy, FailurePolicy::Fallback);
    }

    #[test]
    fn bad_numbers_fall_back_and_blank_key_is_unset() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("PORT", "not-a-port"),
            ("CHATBOT_TIMEOUT_SECS", "-3"),
            ("OPENAI_API_KEY", "   "),
        ]))
        .unwrap();
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.provider.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(cfg.provider.api_key.is_none());
    }

    #[test]
    fn rejects_unknown_policy_and_bad_origin() {
        let err = AppConfig::from_lookup(lookup(&[("CHATBOT_FAILURE_POLICY", "retry")]));
        assert_eq!(
            err.unwrap_err(),
            ConfigError::UnknownFailurePolicy("retry".to_string())
        );

        let err = AppConfig::from_lookup(lookup(&[("ALLOWED_ORIGIN", "localhost:5173")]));
        assert!(matches!(err, Err(ConfigError::InvalidOrigin(_))));
    }
}
