//! Validation of the model's JSON answer into raw slide records.
//!
//! The model is instructed to return pure JSON but routinely wraps it in a
//! markdown code fence anyway, so the fence is stripped before parsing.
//! Parse failures and structural failures are distinct error kinds: the
//! first means unparseable text, the second means valid JSON of the wrong
//! shape.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{GenAiError, Result};

/// One slide exactly as the model emitted it. Optional fields stay absent;
/// `layout` is kept as the raw name and defaulted downstream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSlide {
    pub title: String,
    #[serde(default)]
    pub content: Vec<String>,
    #[serde(default)]
    pub layout: Option<String>,
    #[serde(default)]
    pub speaker_notes: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Strip one surrounding markdown code fence, if present.
///
/// Returns the inner content of the first fenced block, or the trimmed
/// input when no complete fence is found. Idempotent on unfenced input.
#[must_use]
pub fn extract_json(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(start) = trimmed.find("```") else {
        return trimmed;
    };
    let after = &trimmed[start + 3..];
    let after = after.strip_prefix("json").unwrap_or(after);
    match after.find("```") {
        Some(end) => after[..end].trim(),
        None => trimmed,
    }
}

/// Parse the model's answer into raw slides.
///
/// # Errors
///
/// Returns [`GenAiError::MalformedOutput`] when the text is not valid JSON
/// (or a slide record has the wrong field types), and
/// [`GenAiError::UnexpectedStructure`] when the JSON parses but the top
/// level is not an object with a `slides` array.
pub fn parse_slides(raw: &str) -> Result<Vec<RawSlide>> {
    let text = extract_json(raw);
    let value: Value = serde_json::from_str(text)?;
    let slides = value
        .get("slides")
        .and_then(Value::as_array)
        .ok_or(GenAiError::UnexpectedStructure)?;
    Ok(serde_json::from_value(Value::Array(slides.clone()))?)
}
