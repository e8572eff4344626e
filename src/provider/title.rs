//! Short-title generation from a seed message.
//!
//! Delegates to the call wrapper and reply extractor exactly like the chat
//! path, then forces the result through a cleanup pipeline so whatever the
//! model returns ends up as a single short label.

use regex::Regex;

use crate::provider::client::GenerateClient;
use crate::provider::extract::extract_reply;

/// Maximum number of space-separated tokens kept in a title.
const MAX_TITLE_TOKENS: usize = 6;

/// Outcome of one title generation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GeneratedTitle {
    /// Cleaned title, when one was produced.
    pub title: Option<String>,
    /// Whether the upstream call returned extractable text.
    pub ok: bool,
}

/// Ask the provider for a title for `seed` and clean it up.
///
/// `title` is `None` when the upstream call failed, nothing was extractable,
/// or the cleanup pipeline emptied the text. Callers treat that as "no title
/// produced", never as an error.
pub async fn generate_title(client: &GenerateClient, seed: &str) -> GeneratedTitle {
    let instruction = build_instruction(seed);
    let outcome = client.call(&instruction).await;

    if !outcome.succeeded {
        tracing::warn!(
            status = outcome.http_status,
            raw = outcome.raw_excerpt(),
            "title generation call failed"
        );
        return GeneratedTitle::default();
    }

    let Some(text) = extract_reply(outcome.parsed_body.as_ref()) else {
        tracing::warn!(
            raw = outcome.raw_excerpt(),
            "title generation returned no extractable text"
        );
        return GeneratedTitle::default();
    };

    GeneratedTitle {
        title: clean_title(&text),
        ok: true,
    }
}

/// Fixed instruction template wrapped around the seed message.
fn build_instruction(seed: &str) -> String {
    format!(
        "Create a concise chat title in Title Case (2-6 words) for this user message. \
         No punctuation at the end.\n\nUser message:\n{seed}\n\nTitle:"
    )
}

/// Title cleanup pipeline, in order: keep the first line, strip leading and
/// trailing non-word characters, cap the token count. Empty output is `None`.
#[must_use]
pub fn clean_title(text: &str) -> Option<String> {
    let first_line = text.lines().next().unwrap_or("").trim();
    let stripped = strip_edge_nonword(first_line);
    let short = stripped
        .split_whitespace()
        .take(MAX_TITLE_TOKENS)
        .collect::<Vec<_>>()
        .join(" ");

    if short.is_empty() { None } else { Some(short) }
}

/// Remove leading/trailing runs of non-word characters (`^[\W_]+|[\W_]+$`).
fn strip_edge_nonword(s: &str) -> String {
    Regex::new(r"^[\W_]+|[\W_]+$")
        .map_or_else(|_| s.to_string(), |re| re.replace_all(s, "").into_owned())
}
