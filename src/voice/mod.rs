//! Voice I/O boundary.
//!
//! Speech recognition and synthesis are platform capabilities, consumed
//! through these traits: single-shot "recognize speech to text" and a
//! cancelable "speak text". The conversation controller wires the barge-in
//! rule on top; concrete implementations live with the embedding frontend.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the speech boundary.
#[derive(Debug, Error)]
pub enum VoiceError {
    /// The platform has no speech capability.
    #[error("speech capability unavailable")]
    Unavailable,

    /// Recognition started but produced no usable transcript.
    #[error("speech recognition failed: {0}")]
    Recognition(String),
}

/// Single-shot speech-to-text.
#[async_trait]
pub trait SpeechRecognizer: Send {
    /// Listen once and return the transcript.
    ///
    /// # Errors
    /// Returns an error when the capability is missing or recognition fails.
    async fn recognize(&mut self) -> Result<String, VoiceError>;
}

/// Text-to-speech with cancelation.
#[async_trait]
pub trait SpeechSynthesizer: Send {
    /// Speak `text`; resolves when playback completes or is canceled.
    async fn speak(&mut self, text: &str);

    /// Stop any in-progress speech immediately.
    fn cancel(&mut self);
}
