//! Conversation controller: coordinates a send end-to-end.
//!
//! One send walks `Idle -> Sending -> (Settled | Failed)`: the user turn is
//! appended before any network activity and never rolled back, the server is
//! asked for a reply, and exactly one assistant turn lands in the thread
//! whatever happens. Title generation runs afterwards as a best-effort side
//! effect.
//!
//! Sends are not queued or lock-guarded. A caller that issues a second send
//! before the first settles gets appends in response-arrival order; gate on
//! [`ConversationController::is_sending`] to serialize (the reference UI
//! disables its send control while a send is in flight).

use regex::Regex;

use crate::chat::api::ChatApi;
use crate::chat::storage::StorageSlot;
use crate::chat::store::ChatStore;
use crate::chat::types::{Message, Role, ThreadId};
use crate::voice::{SpeechRecognizer, SpeechSynthesizer, VoiceError};

/// Assistant text appended when the server answers without a usable reply.
pub const NO_RESPONSE_FALLBACK: &str = "No response";

/// Assistant text appended when the server cannot be reached at all.
pub const NETWORK_ERROR_FALLBACK: &str = "Network error";

/// Outcome of one send operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// Nothing to do: empty input or no active thread.
    Skipped,
    /// An assistant turn was appended; carries its text (the reply or the
    /// no-response fallback).
    Settled(String),
    /// The server was unreachable; the network-error turn was appended.
    Failed,
}

/// True when a thread title may still be auto-replaced: it trims to empty
/// or still carries the default "New chat" prefix (case-insensitive). A
/// record stored without a title deserializes to the empty string and is
/// therefore eligible as well.
#[must_use]
pub fn title_is_default(title: &str) -> bool {
    if title.trim().is_empty() {
        return true;
    }
    Regex::new(r"(?i)^new chat").is_ok_and(|re| re.is_match(title))
}

/// Drives the active thread: optimistic sends, thread-list actions, and the
/// hands-free voice loop.
pub struct ConversationController<S: StorageSlot, A: ChatApi> {
    store: ChatStore<S>,
    api: A,
    active: Option<ThreadId>,
    sending: bool,
}

impl<S: StorageSlot, A: ChatApi> ConversationController<S, A> {
    /// Create a controller, making sure at least one thread exists and that
    /// the top of the display order is selected.
    pub fn new(store: ChatStore<S>, api: A) -> Self {
        let mut controller = Self {
            store,
            api,
            active: None,
            sending: false,
        };
        controller.ensure_thread();
        controller
    }

    /// Borrow the store for listing and inspection.
    #[must_use]
    pub fn store(&self) -> &ChatStore<S> {
        &self.store
    }

    /// Currently selected thread, if any.
    #[must_use]
    pub const fn active_thread(&self) -> Option<ThreadId> {
        self.active
    }

    /// Whether a send is in flight. Frontends disable their send control on
    /// this to serialize sends.
    #[must_use]
    pub const fn is_sending(&self) -> bool {
        self.sending
    }

    /// Select a thread. Returns `false` if it does not exist.
    pub fn select_thread(&mut self, id: ThreadId) -> bool {
        if self.store.get(id).is_none() {
            return false;
        }
        self.active = Some(id);
        true
    }

    /// Start a new thread and make it active.
    pub fn new_chat(&mut self) -> ThreadId {
        let id = self.store.create_thread();
        self.active = Some(id);
        id
    }

    /// Reset to a single fresh thread and make it active.
    pub fn clear_history(&mut self) -> ThreadId {
        let id = self.store.clear_history();
        self.active = Some(id);
        id
    }

    /// Delete a thread. When the active thread goes away the selection
    /// falls back to the top of the remaining display order.
    pub fn delete_thread(&mut self, id: ThreadId) -> bool {
        if !self.store.delete(id) {
            return false;
        }
        if self.active == Some(id) {
            self.active = self.store.list_sorted().first().map(|t| t.id);
        }
        true
    }

    /// Rename a thread (user-initiated; always allowed).
    pub fn rename_thread(&mut self, id: ThreadId, title: &str) -> bool {
        self.store.rename(id, title)
    }

    /// Flip a thread's pinned flag.
    pub fn toggle_pin(&mut self, id: ThreadId) -> bool {
        self.store.toggle_pin(id)
    }

    /// Send one message on the active thread.
    ///
    /// The user turn is appended before any network activity (optimistic;
    /// never rolled back, so a failed send still shows the user's message).
    /// Exactly one assistant turn follows: the reply, the no-response
    /// fallback, or the network-error message. The sending indicator is
    /// cleared on every path before the title side effect runs.
    pub async fn send_message(&mut self, text: &str) -> SendOutcome {
        let trimmed = text.trim();
        let Some(thread_id) = self.active else {
            return SendOutcome::Skipped;
        };
        if trimmed.is_empty() || self.store.get(thread_id).is_none() {
            return SendOutcome::Skipped;
        }

        self.sending = true;
        self.store.append(thread_id, Message::new(Role::User, trimmed));

        let outcome = match self.api.send_chat(trimmed).await {
            Ok(reply) => {
                let reply_text = match reply {
                    Some(r) if !r.is_empty() => r,
                    _ => NO_RESPONSE_FALLBACK.to_string(),
                };
                self.store
                    .append(thread_id, Message::new(Role::Assistant, reply_text.clone()));
                SendOutcome::Settled(reply_text)
            }
            Err(e) => {
                tracing::warn!("chat request failed: {e}");
                self.store
                    .append(thread_id, Message::new(Role::Assistant, NETWORK_ERROR_FALLBACK));
                SendOutcome::Failed
            }
        };

        // Cleared on every path, success or failure.
        self.sending = false;

        if matches!(outcome, SendOutcome::Settled(_)) {
            self.maybe_generate_title(thread_id, trimmed).await;
        }

        outcome
    }

    /// One hands-free exchange: listen, send the transcript, speak the
    /// settled reply. Starting to listen always cancels any in-progress
    /// speech first (barge-in).
    ///
    /// # Errors
    /// Returns an error when recognition fails; send failures are already
    /// absorbed into the [`SendOutcome`].
    pub async fn conversation_turn(
        &mut self,
        recognizer: &mut dyn SpeechRecognizer,
        synthesizer: &mut dyn SpeechSynthesizer,
    ) -> Result<SendOutcome, VoiceError> {
        synthesizer.cancel();
        let transcript = recognizer.recognize().await?;
        let outcome = self.send_message(&transcript).await;
        if let SendOutcome::Settled(reply) = &outcome {
            synthesizer.speak(reply).await;
        }
        Ok(outcome)
    }

    /// Single-shot dictation: cancel speech, listen once, hand the
    /// transcript back for the caller to place in its input draft.
    ///
    /// # Errors
    /// Returns an error when recognition fails.
    pub async fn dictate(
        &mut self,
        recognizer: &mut dyn SpeechRecognizer,
        synthesizer: &mut dyn SpeechSynthesizer,
    ) -> Result<String, VoiceError> {
        synthesizer.cancel();
        recognizer.recognize().await
    }

    /// Replace a still-default title with a generated one. Best-effort:
    /// eligibility is re-checked against current thread state here, so a
    /// thread renamed in the meantime is never overwritten, and any failure
    /// is logged and swallowed.
    async fn maybe_generate_title(&mut self, thread_id: ThreadId, seed: &str) {
        let Some(thread) = self.store.get(thread_id) else {
            return;
        };
        if !title_is_default(&thread.title) {
            return;
        }

        match self.api.generate_title(seed).await {
            Ok(Some(title)) => {
                if !self.store.rename(thread_id, &title) {
                    tracing::debug!("generated title was empty or thread vanished");
                }
            }
            Ok(None) => tracing::warn!("title generation produced no title"),
            Err(e) => tracing::warn!("title generation failed: {e}"),
        }
    }

    /// Make sure the collection is non-empty and something is selected.
    fn ensure_thread(&mut self) {
        if self.store.is_empty() {
            let id = self.store.create_thread();
            self.active = Some(id);
            return;
        }
        if self.active.is_none() {
            self.active = self.store.list_sorted().first().map(|t| t.id);
        }
    }
}
