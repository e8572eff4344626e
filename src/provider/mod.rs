//! Provider integration for the generative-language API.
//!
//! The provider is treated as unreliable and schema-unstable: calls go
//! through a bounded retry wrapper returning a uniform envelope, and reply
//! text is recovered by probing known response shapes in priority order.

pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod title;

pub use client::{CallOutcome, GenerateClient};
pub use config::ProviderConfig;
pub use error::ProviderError;
pub use extract::extract_reply;
pub use title::{GeneratedTitle, generate_title};
