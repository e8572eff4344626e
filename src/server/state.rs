//! Application state shared across all request handlers.

use std::sync::Arc;

use crate::provider::{GenerateClient, ProviderConfig, ProviderError};

/// Shared application state. Requests are handled statelessly on top of it;
/// nothing here is mutated after startup.
pub struct AppState {
    /// Provider client used by the chat and title endpoints.
    pub provider: GenerateClient,
}

impl AppState {
    /// Create application state from environment configuration.
    ///
    /// # Errors
    /// Returns an error if the provider client cannot be created.
    pub fn new() -> Result<Arc<Self>, ProviderError> {
        Self::with_config(ProviderConfig::from_env())
    }

    /// Create application state from an explicit provider configuration.
    ///
    /// # Errors
    /// Returns an error if the provider client cannot be created.
    pub fn with_config(config: ProviderConfig) -> Result<Arc<Self>, ProviderError> {
        let provider = GenerateClient::new(config)?;
        Ok(Arc::new(Self { provider }))
    }
}
