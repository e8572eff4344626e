//! Client-side HTTP seam to the Parley server.
//!
//! This hop is distinct from the server's own hop to the provider: a
//! failure here is what surfaces in the transcript as the "Network error"
//! message, while provider trouble arrives as a perfectly ordinary reply.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default request timeout for the client hop.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors on the client→server hop.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure or a response that was not the expected JSON.
    #[error("chat API request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Any other client-side failure.
    #[error("{0}")]
    Other(String),
}

/// Remote chat operations used by the conversation controller.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Send one user message; returns the reply field, which may be absent.
    ///
    /// # Errors
    /// Returns an error only for transport or parse failures on this hop.
    async fn send_chat(&self, message: &str) -> Result<Option<String>, ApiError>;

    /// Ask the server for a generated title. `None` means "no title
    /// produced", which callers treat as a non-event.
    ///
    /// # Errors
    /// Returns an error only for transport or parse failures on this hop.
    async fn generate_title(&self, message: &str) -> Result<Option<String>, ApiError>;
}

#[derive(Serialize)]
struct MessageBody<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct ReplyBody {
    reply: Option<String>,
}

#[derive(Deserialize)]
struct TitleBody {
    title: Option<String>,
}

/// HTTP implementation over the server's JSON surface.
pub struct HttpChatApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpChatApi {
    /// Create a client targeting `base_url` (e.g. `http://127.0.0.1:4000`).
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    async fn post_message<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        message: &str,
    ) -> Result<T, ApiError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&MessageBody { message })
            .send()
            .await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ChatApi for HttpChatApi {
    async fn send_chat(&self, message: &str) -> Result<Option<String>, ApiError> {
        let body: ReplyBody = self.post_message("/api/chat", message).await?;
        Ok(body.reply)
    }

    async fn generate_title(&self, message: &str) -> Result<Option<String>, ApiError> {
        let body: TitleBody = self.post_message("/api/generate-title", message).await?;
        Ok(body.title)
    }
}
