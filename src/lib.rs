//! Parley: a minimal AI-chat application core.
//!
//! A client core (chat threads, durable local persistence, a conversation
//! controller) plus a thin HTTP server that relays user messages to a
//! generative-language provider with bounded retry and response-shape
//! normalization. Frontends embed the client core and render its state;
//! the server runs standalone via the `parley-server` binary.

#![deny(unsafe_code)]

/// Client-side chat core: threads, store, controller, server seam.
pub mod chat;
/// Outbound provider integration: call wrapper, reply extraction, titles.
pub mod provider;
/// HTTP server and API routes.
pub mod server;
/// Entry helpers to start the Parley server.
pub mod start_parley;
/// Voice I/O boundary traits.
pub mod voice;
