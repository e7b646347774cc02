use std::time::Duration;
use ts_core::{Error, Result};
use url::Url;

pub mod chunker;
pub mod client;
pub mod models;
pub mod params;
pub mod summarizer;

pub const DEFAULT_API_BASE: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_MODEL_ID: &str = "facebook/bart-large-cnn";

/// Backoff and cold-start waits used by the resilient client.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    /// Floor for server-supplied load estimates.
    pub min_cold_start_wait: Duration,
    pub max_cold_start_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_backoff: Duration::from_secs(2),
            max_backoff: Duration::from_secs(20),
            min_cold_start_wait: Duration::from_secs(1),
            max_cold_start_wait: Duration::from_secs(10),
        }
    }
}

/// Upstream settings, read once at startup and never mutated afterwards.
#[derive(Clone)]
pub struct InferenceConfig {
    pub api_base: String,
    pub model_id: String,
    pub api_token: Option<String>,
    pub total_budget: Duration,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
}

impl std::fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("api_base", &self.api_base)
            .field("model_id", &self.model_id)
            .field("api_token", &self.api_token.as_deref().map(|_| "<redacted>"))
            .field("total_budget", &self.total_budget)
            .field("request_timeout", &self.request_timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            api_token: None,
            total_budget: Duration::from_secs(120),
            request_timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }
}

impl InferenceConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Missing keys fall back to defaults; a
    /// missing token means unauthenticated calls.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_blank = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let seconds = |key: &str, default: Duration| -> Result<Duration> {
            match non_blank(key) {
                Some(raw) => raw
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|_| Error::Config(format!("{} must be a whole number of seconds, got {:?}", key, raw))),
                None => Ok(default),
            }
        };

        let config = Self {
            api_base: non_blank("HUGGINGFACE_API_BASE").unwrap_or(defaults.api_base),
            model_id: non_blank("HUGGINGFACE_MODEL").unwrap_or(defaults.model_id),
            api_token: non_blank("HUGGINGFACE_TOKEN"),
            total_budget: seconds("SUMMARIZER_TOTAL_WAIT_SECS", defaults.total_budget)?,
            request_timeout: seconds("SUMMARIZER_REQUEST_TIMEOUT_SECS", defaults.request_timeout)?,
            retry: defaults.retry,
        };
        config.endpoint()?;
        Ok(config)
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    /// Full URL of the model endpoint.
    pub fn endpoint(&self) -> Result<Url> {
        let raw = format!("{}/{}", self.api_base.trim_end_matches('/'), self.model_id.trim_start_matches('/'));
        Url::parse(&raw).map_err(|e| Error::Config(format!("invalid model endpoint {}: {}", raw, e)))
    }
}

pub mod prelude {
    pub use super::{InferenceConfig, RetryPolicy};
    pub use super::models::{create_model, ModelKind};
    pub use super::summarizer::Summarizer;
    pub use ts_core::{DecodingParameters, Error, Result, SummaryResult, TargetLength};
}

pub use models::create_model;
pub use summarizer::Summarizer;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = InferenceConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.model_id, DEFAULT_MODEL_ID);
        assert!(config.api_token.is_none());
        assert_eq!(config.total_budget, Duration::from_secs(120));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "https://api-inference.huggingface.co/models/facebook/bart-large-cnn"
        );
    }

    #[test]
    fn test_environment_overrides() {
        let config = InferenceConfig::from_lookup(lookup(&[
            ("HUGGINGFACE_TOKEN", "hf_secret"),
            ("HUGGINGFACE_MODEL", "sshleifer/distilbart-cnn-12-6"),
            ("HUGGINGFACE_API_BASE", "http://localhost:9000/models/"),
            ("SUMMARIZER_TOTAL_WAIT_SECS", "45"),
        ]))
        .unwrap();
        assert_eq!(config.api_token.as_deref(), Some("hf_secret"));
        assert_eq!(config.total_budget, Duration::from_secs(45));
        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "http://localhost:9000/models/sshleifer/distilbart-cnn-12-6"
        );
        assert!(!format!("{:?}", config).contains("hf_secret"));
    }

    #[test]
    fn test_blank_token_is_unauthenticated() {
        let config = InferenceConfig::from_lookup(lookup(&[("HUGGINGFACE_TOKEN", "  ")])).unwrap();
        assert!(config.api_token.is_none());
    }

    #[test]
    fn test_bad_durations_are_rejected() {
        let result = InferenceConfig::from_lookup(lookup(&[("SUMMARIZER_REQUEST_TIMEOUT_SECS", "soon")]));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
