//! Reply extraction from provider response bodies.
//!
//! The provider's reply text has moved between JSON paths across API
//! versions, so extraction is an ordered list of shape probes rather than a
//! typed deserialization. Each probe is a pure function; the first one that
//! yields non-empty text wins.

use serde_json::Value;

/// One extraction strategy: probe a known response shape for reply text.
type Strategy = fn(&Value) -> Option<&str>;

/// Known shapes, in priority order.
const STRATEGIES: [Strategy; 3] = [
    candidate_parts_text,
    candidate_message_content,
    legacy_output_content,
];

/// Extract reply text from a parsed response body.
///
/// Returns `None` when the body is absent or matches none of the known
/// shapes. That is an expected outcome, not an error; callers choose the
/// user-facing fallback.
#[must_use]
pub fn extract_reply(body: Option<&Value>) -> Option<String> {
    let body = body?;
    STRATEGIES
        .iter()
        .find_map(|probe| probe(body).filter(|text| !text.is_empty()))
        .map(str::to_owned)
}

/// Current shape: `candidates[0].content.parts[0].text`.
fn candidate_parts_text(body: &Value) -> Option<&str> {
    body.get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
}

/// Alternate shape: `candidates[0].message.content`.
fn candidate_message_content(body: &Value) -> Option<&str> {
    body.get("candidates")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
}

/// Legacy shape: `output[0].content`.
fn legacy_output_content(body: &Value) -> Option<&str> {
    body.get("output")?.as_array()?.first()?.get("content")?.as_str()
}
