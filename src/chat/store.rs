//! The chat store: owns the thread collection and its persistence.
//!
//! Every mutation is an atomic read-modify-write over the full collection:
//! transform the in-memory threads, then serialize the whole list back to
//! the slot. Mutations always transform the existing collection rather than
//! replacing it with a previously captured copy, so appends to different
//! threads never lose each other.

use crate::chat::storage::{CHATS_KEY, StorageSlot};
use crate::chat::types::{ChatThread, Message, ThreadId, display_cmp};

/// Owns the mapping of chat threads and serializes the full collection to
/// the storage slot on every mutation.
///
/// Corrupt or unavailable storage degrades to an empty collection at load
/// time (fail-open): the application can always start with zero threads and
/// self-heal by creating a fresh default thread.
pub struct ChatStore<S: StorageSlot> {
    slot: S,
    threads: Vec<ChatThread>,
}

impl<S: StorageSlot> ChatStore<S> {
    /// Load the collection from the slot.
    pub fn load(slot: S) -> Self {
        let threads = match slot.get(CHATS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(threads) => threads,
                Err(e) => {
                    tracing::warn!("stored chats unreadable, starting empty: {e}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("chat storage unavailable, starting empty: {e}");
                Vec::new()
            }
        };

        Self { slot, threads }
    }

    /// Number of threads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.threads.len()
    }

    /// Whether the collection holds no threads.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    /// All threads in insertion order (newest first).
    #[must_use]
    pub fn threads(&self) -> &[ChatThread] {
        &self.threads
    }

    /// Thread by id.
    #[must_use]
    pub fn get(&self, id: ThreadId) -> Option<&ChatThread> {
        self.threads.iter().find(|t| t.id == id)
    }

    /// Threads in display order: pinned first, then most recently updated.
    #[must_use]
    pub fn list_sorted(&self) -> Vec<ChatThread> {
        let mut sorted = self.threads.clone();
        sorted.sort_by(display_cmp);
        sorted
    }

    /// Create a fresh thread (greeting included) at the front of the
    /// collection and return its id.
    pub fn create_thread(&mut self) -> ThreadId {
        let thread = ChatThread::new();
        let id = thread.id;
        self.threads.insert(0, thread);
        self.persist();
        id
    }

    /// Append a message to a thread. Returns `false` (and appends nothing)
    /// when the thread no longer exists.
    pub fn append(&mut self, id: ThreadId, message: Message) -> bool {
        let Some(thread) = self.threads.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        thread.push_message(message);
        self.persist();
        true
    }

    /// Insert a thread record, or replace the record with the same id.
    pub fn upsert(&mut self, thread: ChatThread) {
        match self.threads.iter().position(|t| t.id == thread.id) {
            Some(i) => self.threads[i] = thread,
            None => self.threads.insert(0, thread),
        }
        self.persist();
    }

    /// Rename a thread. The title is trimmed; empty input leaves the title
    /// unchanged and returns `false`.
    pub fn rename(&mut self, id: ThreadId, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        let Some(thread) = self.threads.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        thread.title = title.to_string();
        thread.touch();
        self.persist();
        true
    }

    /// Flip a thread's pinned flag.
    pub fn toggle_pin(&mut self, id: ThreadId) -> bool {
        let Some(thread) = self.threads.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        thread.pinned = !thread.pinned;
        thread.touch();
        self.persist();
        true
    }

    /// Remove a thread and its messages entirely.
    pub fn delete(&mut self, id: ThreadId) -> bool {
        let before = self.threads.len();
        self.threads.retain(|t| t.id != id);
        if self.threads.len() == before {
            return false;
        }
        self.persist();
        true
    }

    /// Drop every thread and start over with one fresh default thread.
    /// Returns the new thread's id.
    pub fn clear_history(&mut self) -> ThreadId {
        self.threads.clear();
        self.create_thread()
    }

    /// Persist the full collection. Failures are logged, not propagated;
    /// the in-memory collection stays authoritative for this session.
    fn persist(&self) {
        match serde_json::to_string(&self.threads) {
            Ok(raw) => {
                if let Err(e) = self.slot.set(CHATS_KEY, &raw) {
                    tracing::warn!("failed to persist chats: {e}");
                }
            }
            Err(e) => tracing::warn!("failed to serialize chats: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::storage::MemorySlot;
    use crate::chat::types::Role;
    use std::sync::Arc;

    fn store() -> ChatStore<Arc<MemorySlot>> {
        ChatStore::load(Arc::new(MemorySlot::new()))
    }

    // ---- Loading ----

    #[test]
    fn test_load_empty_slot() {
        let store = store();
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_corrupt_slot_fails_open() {
        let slot = Arc::new(MemorySlot::new());
        slot.set(CHATS_KEY, "{not json").unwrap();
        let store = ChatStore::load(Arc::clone(&slot));
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_wrong_shape_fails_open() {
        let slot = Arc::new(MemorySlot::new());
        slot.set(CHATS_KEY, r#"{"threads": "nope"}"#).unwrap();
        let store = ChatStore::load(Arc::clone(&slot));
        assert!(store.is_empty());
    }

    // ---- Round trip ----

    #[test]
    fn test_round_trip_reproduces_collection() {
        let slot = Arc::new(MemorySlot::new());
        let mut store = ChatStore::load(Arc::clone(&slot));

        let a = store.create_thread();
        store.append(a, Message::new(Role::User, "hello"));
        store.rename(a, "Trip Planning");
        let b = store.create_thread();
        store.toggle_pin(b);

        let reloaded = ChatStore::load(Arc::clone(&slot));
        assert_eq!(reloaded.threads(), store.threads());
    }

    #[test]
    fn test_round_trip_zero_threads() {
        let slot = Arc::new(MemorySlot::new());
        let mut store = ChatStore::load(Arc::clone(&slot));
        let id = store.create_thread();
        store.delete(id);
        assert!(store.is_empty());

        let reloaded = ChatStore::load(Arc::clone(&slot));
        assert!(reloaded.is_empty());
    }

    // ---- Mutations ----

    #[test]
    fn test_create_thread_is_persisted_immediately() {
        let slot = Arc::new(MemorySlot::new());
        let mut store = ChatStore::load(Arc::clone(&slot));
        store.create_thread();

        let raw = slot.get(CHATS_KEY).unwrap().unwrap();
        let threads: Vec<ChatThread> = serde_json::from_str(&raw).unwrap();
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].messages.len(), 1);
    }

    #[test]
    fn test_append_to_missing_thread_is_noop() {
        let mut store = store();
        store.create_thread();
        let missing = ThreadId::new();
        assert!(!store.append(missing, Message::new(Role::User, "x")));
        assert_eq!(store.threads()[0].messages.len(), 1);
    }

    #[test]
    fn test_rename_trims_and_rejects_empty() {
        let mut store = store();
        let id = store.create_thread();

        assert!(store.rename(id, "  Grocery List  "));
        assert_eq!(store.get(id).unwrap().title, "Grocery List");

        assert!(!store.rename(id, "   "));
        assert_eq!(store.get(id).unwrap().title, "Grocery List");
    }

    #[test]
    fn test_toggle_pin_flips_flag() {
        let mut store = store();
        let id = store.create_thread();
        assert!(store.toggle_pin(id));
        assert!(store.get(id).unwrap().pinned);
        assert!(store.toggle_pin(id));
        assert!(!store.get(id).unwrap().pinned);
    }

    #[test]
    fn test_delete_removes_thread() {
        let mut store = store();
        let a = store.create_thread();
        let b = store.create_thread();
        assert!(store.delete(a));
        assert!(store.get(a).is_none());
        assert!(store.get(b).is_some());
        assert!(!store.delete(a));
    }

    #[test]
    fn test_clear_history_resets_to_one_thread() {
        let mut store = store();
        store.create_thread();
        store.create_thread();
        let fresh = store.clear_history();
        assert_eq!(store.len(), 1);
        assert_eq!(store.threads()[0].id, fresh);
    }

    #[test]
    fn test_upsert_replaces_by_id() {
        let mut store = store();
        let id = store.create_thread();

        let mut replacement = store.get(id).unwrap().clone();
        replacement.title = "Imported".to_string();
        store.upsert(replacement);

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(id).unwrap().title, "Imported");
    }

    #[test]
    fn test_upsert_inserts_new_at_front() {
        let mut store = store();
        store.create_thread();
        let imported = ChatThread::new();
        let imported_id = imported.id;
        store.upsert(imported);
        assert_eq!(store.threads()[0].id, imported_id);
    }

    // ---- Ordering ----

    #[test]
    fn test_list_sorted_pinned_first_then_recency() {
        let mut store = store();
        let old = store.create_thread();
        let pinned = store.create_thread();
        let newest = store.create_thread();

        store.append(old, Message::new(Role::User, "bump old"));
        store.toggle_pin(pinned);
        store.append(newest, Message::new(Role::User, "bump newest"));

        let order: Vec<ThreadId> = store.list_sorted().iter().map(|t| t.id).collect();
        assert_eq!(order[0], pinned);
        // Both unpinned threads follow, most recently updated first.
        assert_eq!(order[1], newest);
        assert_eq!(order[2], old);
    }
}
