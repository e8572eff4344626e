//! Configuration for the generation provider.

use std::time::Duration;

/// Environment variable holding the provider API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Environment variable overriding the provider base URL.
pub const BASE_URL_ENV: &str = "PARLEY_GEMINI_URL";
/// Environment variable overriding the model name.
pub const MODEL_ENV: &str = "PARLEY_MODEL";

/// Default base URL for the generateContent API.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1";
/// Default model, chosen from the provider's model listing.
const DEFAULT_MODEL: &str = "models/gemini-2.5-flash";

/// Default attempt budget for one logical call.
const DEFAULT_ATTEMPTS: u32 = 2;
/// Default base backoff delay between attempts.
const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Configuration for outbound provider calls.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    /// API key appended to request URLs. May be empty; the provider will
    /// reject the call and the failure surfaces through the normal
    /// fallback path.
    pub api_key: String,
    /// Model resource name (e.g. `models/gemini-2.5-flash`).
    pub model: String,
    /// Base URL for the provider API.
    pub base_url: String,
    /// Attempt budget for one logical call.
    pub attempts: u32,
    /// Base backoff delay; the wait before retry `i` is `base * 2^i`.
    pub retry_base_delay: Duration,
    /// Request timeout.
    pub request_timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            attempts: DEFAULT_ATTEMPTS,
            retry_base_delay: DEFAULT_RETRY_BASE_DELAY,
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ProviderConfig {
    /// Create a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a config from environment variables, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.api_key = std::env::var(API_KEY_ENV).unwrap_or_default();
        if let Ok(model) = std::env::var(MODEL_ENV) {
            config.model = model;
        }
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            config.base_url = base_url;
        }
        config
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    /// Set the model resource name.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the attempt budget.
    #[must_use]
    pub const fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Set the base backoff delay.
    #[must_use]
    pub const fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }
}
