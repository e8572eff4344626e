//! Client-side chat core: thread types, durable store, conversation
//! controller, and the HTTP seam to the server.
//!
//! A frontend embeds this module the way a shell embeds a headless engine:
//! it renders [`ChatStore`] contents, funnels user actions through
//! [`ConversationController`], and supplies the voice traits if it has a
//! speech stack.

pub mod api;
pub mod controller;
pub mod storage;
pub mod store;
pub mod types;

pub use api::{ApiError, ChatApi, HttpChatApi};
pub use controller::{ConversationController, SendOutcome, title_is_default};
pub use storage::{FileSlot, MemorySlot, StorageSlot};
pub use store::ChatStore;
pub use types::{ChatThread, Message, MessageId, Role, ThreadId};
