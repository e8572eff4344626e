//! Outbound call wrapper for the generation provider.
//!
//! One logical call is up to `attempts` HTTP attempts with exponential
//! backoff between them. Transport failures never escape as errors; every
//! attempt collapses into a [`CallOutcome`] envelope that callers inspect.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::provider::config::ProviderConfig;
use crate::provider::error::ProviderError;

/// Cap on raw-body excerpts included in diagnostic logs.
const RAW_LOG_LIMIT: usize = 1000;

/// Request body for generateContent.
///
/// The upstream API rejects unknown top-level fields with a hard error, so
/// this is exactly the minimal accepted structure and nothing more.
#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [ContentEntry<'a>; 1],
}

#[derive(Serialize)]
struct ContentEntry<'a> {
    parts: [TextPart<'a>; 1],
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

impl<'a> GenerateRequest<'a> {
    fn new(prompt: &'a str) -> Self {
        Self {
            contents: [ContentEntry {
                parts: [TextPart { text: prompt }],
            }],
        }
    }
}

/// Uniform result of one outbound call.
#[derive(Clone, Debug)]
pub struct CallOutcome {
    /// Whether the HTTP status was a success code.
    pub succeeded: bool,
    /// HTTP status, or 0 when the transport failed before any response.
    pub http_status: u16,
    /// Parsed JSON body, when the body parsed at all.
    pub parsed_body: Option<Value>,
    /// Raw body text (or the transport error message) for diagnostics.
    pub raw_body: String,
}

impl CallOutcome {
    /// Envelope for a transport-level failure (no HTTP response at all).
    fn transport_failure(err: &reqwest::Error) -> Self {
        Self {
            succeeded: false,
            http_status: 0,
            parsed_body: None,
            raw_body: err.to_string(),
        }
    }

    /// Bounded excerpt of the raw body for diagnostic logging.
    #[must_use]
    pub fn raw_excerpt(&self) -> &str {
        truncate_on_char_boundary(&self.raw_body, RAW_LOG_LIMIT)
    }
}

/// HTTP client for the generation provider.
pub struct GenerateClient {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl GenerateClient {
    /// Create a client from the given configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// Model resource name this client generates with.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Perform one logical generateContent call with the configured retry
    /// budget. Never fails; inspect the returned envelope.
    pub async fn call(&self, prompt: &str) -> CallOutcome {
        let outcome = call_with_retry(
            self.config.attempts,
            self.config.retry_base_delay,
            || self.call_once(prompt),
        )
        .await;

        if !outcome.succeeded {
            tracing::warn!(
                status = outcome.http_status,
                raw = outcome.raw_excerpt(),
                "provider call failed after retries"
            );
        }

        outcome
    }

    /// Fetch the provider's model listing. Single attempt; this is a
    /// diagnostic surface, not part of the chat path.
    pub async fn list_models(&self) -> CallOutcome {
        let url = format!("{}/models?key={}", self.config.base_url, self.config.api_key);
        match self.client.get(&url).send().await {
            Ok(response) => outcome_from_response(response).await,
            Err(e) => CallOutcome::transport_failure(&e),
        }
    }

    /// One HTTP attempt against generateContent.
    async fn call_once(&self, prompt: &str) -> CallOutcome {
        let url = format!(
            "{}/{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.config.api_key
        );
        let request = GenerateRequest::new(prompt);

        match self.client.post(&url).json(&request).send().await {
            Ok(response) => outcome_from_response(response).await,
            Err(e) => CallOutcome::transport_failure(&e),
        }
    }
}

/// Collapse an HTTP response into an envelope, parsing the body best-effort.
async fn outcome_from_response(response: reqwest::Response) -> CallOutcome {
    let status = response.status();
    let raw = match response.text().await {
        Ok(text) => text,
        Err(e) => return CallOutcome::transport_failure(&e),
    };
    let parsed = serde_json::from_str(&raw).ok();

    CallOutcome {
        succeeded: status.is_success(),
        http_status: status.as_u16(),
        parsed_body: parsed,
        raw_body: raw,
    }
}

/// Run `attempt` up to `attempts` times, sleeping [`backoff_delay`] between
/// attempts. Every non-success outcome is retried identically, including
/// client-error statuses; the budget is the only bound. Returns the first
/// success, or the last failure once the budget is spent.
pub async fn call_with_retry<F, Fut>(
    attempts: u32,
    base_delay: Duration,
    mut attempt: F,
) -> CallOutcome
where
    F: FnMut() -> Fut,
    Fut: Future<Output = CallOutcome>,
{
    let attempts = attempts.max(1);
    let mut last = attempt().await;

    for retry in 1..attempts {
        if last.succeeded {
            break;
        }
        tokio::time::sleep(backoff_delay(base_delay, retry - 1)).await;
        last = attempt().await;
    }

    last
}

/// Delay before retry `i` (zero-based): `base * 2^i`.
#[must_use]
pub fn backoff_delay(base: Duration, retry: u32) -> Duration {
    base.saturating_mul(2_u32.saturating_pow(retry))
}

/// Cut `s` to at most `limit` bytes without splitting a character.
fn truncate_on_char_boundary(s: &str, limit: usize) -> &str {
    if s.len() <= limit {
        return s;
    }
    let mut end = limit;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
