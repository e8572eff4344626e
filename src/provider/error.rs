//! Error types for the provider module.

use thiserror::Error;

/// Errors raised while constructing provider components.
///
/// Call outcomes are never errors; transport and status failures are carried
/// in the [`CallOutcome`](crate::provider::CallOutcome) envelope instead.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}
