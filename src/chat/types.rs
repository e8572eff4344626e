//! Core chat types: roles, identifiers, messages, threads.

use core::fmt;
use core::str::FromStr;
use std::cmp::Ordering;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default title sentinel for freshly created threads.
pub const DEFAULT_TITLE: &str = "New chat";

/// Greeting inserted as the first message of every thread.
pub const GREETING: &str = "Hi, I'm Parley. How can I help?";

/// Current time in epoch milliseconds.
#[must_use]
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Role of one conversation turn. Fixed at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Text typed (or spoken) by the user.
    User,
    /// Reply text relayed from the provider, or a local fallback.
    Assistant,
    /// Thread-initialization greeting.
    System,
}

/// Declare a time-ordered UUID newtype with a consistent API.
macro_rules! define_time_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[repr(transparent)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new time-ordered identifier.
            #[inline]
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Wrap an existing UUID.
            #[inline]
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::from_str(s)?))
            }
        }
    };
}

define_time_id!(
    /// Identity of one chat thread; the sole identity key in the collection.
    ThreadId
);

define_time_id!(
    /// Identity of one message within a thread.
    MessageId
);

/// One turn in a conversation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier, generated at creation time.
    pub id: MessageId,
    /// Role, fixed at creation.
    pub role: Role,
    /// UTF-8 content; immutable once appended.
    pub text: String,
    /// Creation time in epoch milliseconds, used for display only.
    #[serde(default)]
    pub timestamp: i64,
}

impl Message {
    /// Create a message stamped with the current time.
    #[must_use]
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role,
            text: text.into(),
            timestamp: now_millis(),
        }
    }
}

/// One conversation: ordered messages plus display metadata.
///
/// Unknown fields in stored records are ignored and missing optional fields
/// default, so older snapshots stay readable without a version marker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatThread {
    /// Unique identifier; the sole identity key.
    pub id: ThreadId,
    /// Display title; starts as the default sentinel.
    #[serde(default)]
    pub title: String,
    /// Conversation turns in insertion order; append-only.
    pub messages: Vec<Message>,
    /// Pinned threads sort ahead of unpinned ones.
    #[serde(default)]
    pub pinned: bool,
    /// Creation time in epoch milliseconds.
    #[serde(default)]
    pub created_at: i64,
    /// Last mutation time in epoch milliseconds; refreshed on every mutation.
    #[serde(default)]
    pub updated_at: i64,
}

impl ChatThread {
    /// Create a thread holding the system greeting.
    #[must_use]
    pub fn new() -> Self {
        let now = now_millis();
        Self {
            id: ThreadId::new(),
            title: DEFAULT_TITLE.to_string(),
            messages: vec![Message::new(Role::System, GREETING)],
            pinned: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a message and refresh `updated_at`.
    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
        self.touch();
    }

    /// Refresh `updated_at` to now.
    pub fn touch(&mut self) {
        self.updated_at = now_millis();
    }
}

impl Default for ChatThread {
    fn default() -> Self {
        Self::new()
    }
}

/// Comparator for sidebar display order: pinned threads first, then most
/// recently updated.
#[must_use]
pub fn display_cmp(a: &ChatThread, b: &ChatThread) -> Ordering {
    b.pinned
        .cmp(&a.pinned)
        .then(b.updated_at.cmp(&a.updated_at))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_thread_has_greeting() {
        let thread = ChatThread::new();
        assert_eq!(thread.title, DEFAULT_TITLE);
        assert_eq!(thread.messages.len(), 1);
        assert_eq!(thread.messages[0].role, Role::System);
        assert_eq!(thread.messages[0].text, GREETING);
        assert!(!thread.pinned);
        assert!(thread.updated_at >= thread.created_at);
    }

    #[test]
    fn test_push_message_refreshes_updated_at() {
        let mut thread = ChatThread::new();
        let before = thread.updated_at;
        thread.push_message(Message::new(Role::User, "hello"));
        assert_eq!(thread.messages.len(), 2);
        assert!(thread.updated_at >= before);
    }

    #[test]
    fn test_thread_ids_are_unique() {
        let a = ChatThread::new();
        let b = ChatThread::new();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
        assert_eq!(serde_json::to_string(&Role::System).unwrap(), "\"system\"");
    }

    #[test]
    fn test_thread_reads_record_with_missing_fields() {
        // Compatible reader: no pinned/title/timestamps in the stored record.
        let raw = format!(
            r#"{{"id":"{}","messages":[]}}"#,
            ThreadId::new()
        );
        let thread: ChatThread = serde_json::from_str(&raw).unwrap();
        assert_eq!(thread.title, "");
        assert!(!thread.pinned);
        assert_eq!(thread.updated_at, 0);
    }

    #[test]
    fn test_thread_ignores_unknown_fields() {
        let raw = format!(
            r#"{{"id":"{}","messages":[],"color":"teal","draft":"wip"}}"#,
            ThreadId::new()
        );
        assert!(serde_json::from_str::<ChatThread>(&raw).is_ok());
    }

    #[test]
    fn test_display_cmp_pinned_first_then_recency() {
        let mut recent = ChatThread::new();
        recent.updated_at = 300;
        let mut pinned_old = ChatThread::new();
        pinned_old.pinned = true;
        pinned_old.updated_at = 100;
        let mut stale = ChatThread::new();
        stale.updated_at = 200;

        let mut threads = vec![recent.clone(), pinned_old.clone(), stale.clone()];
        threads.sort_by(display_cmp);

        assert_eq!(threads[0].id, pinned_old.id);
        assert_eq!(threads[1].id, recent.id);
        assert_eq!(threads[2].id, stale.id);
    }

    #[test]
    fn test_id_round_trips_through_string() {
        let id = ThreadId::new();
        let parsed: ThreadId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }
}
