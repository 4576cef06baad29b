//! Parsing of model output and disclaimer normalization.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use super::content::GeneratedContent;

/// The disclaimer block every saved description ends with.
pub const DISCLAIMER_HTML: &str = "<p><strong>【注意事項】</strong></p><ul><li><strong>写真と実物の色合いが若干異なる場合があります。</strong></li><li><strong>手作業による測定のためサイズに多少の誤差がある場合がございます。予めご了承ください。</strong></li></ul>";

/// A full disclaimer block, tolerant of whitespace and attribute drift.
static DISCLAIMER_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<p[^>]*>\s*<strong[^>]*>\s*【注意事項】\s*</strong>\s*</p>\s*<ul[^>]*>.*?</ul>")
        .expect("valid disclaimer block regex")
});

/// A bare disclaimer heading running up to the next list end.
static DISCLAIMER_REMNANT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)【注意事項】.*?</ul>").expect("valid disclaimer remnant regex"));

/// Errors from turning model output into [`GeneratedContent`].
#[derive(Debug, Error)]
pub enum ParseError {
    /// No `{ ... }` span in the output.
    #[error("no JSON object in model output")]
    MissingJsonObject,

    /// The `{ ... }` span is not valid JSON for the expected shape.
    #[error("invalid JSON in model output: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Slice from the first `{` to the last `}`, inclusive.
///
/// # Errors
///
/// Returns `ParseError::MissingJsonObject` when either brace is missing or
/// the last `}` comes before the first `{`.
pub fn extract_json_slice(raw: &str) -> Result<&str, ParseError> {
    let start = raw.find('{').ok_or(ParseError::MissingJsonObject)?;
    let end = raw.rfind('}').ok_or(ParseError::MissingJsonObject)?;
    if end < start {
        return Err(ParseError::MissingJsonObject);
    }
    Ok(&raw[start..=end])
}

/// Parse model output and normalize the disclaimer in the body.
///
/// # Errors
///
/// Returns a `ParseError` if no JSON object is found or it does not decode.
pub fn parse_generated(raw: &str) -> Result<GeneratedContent, ParseError> {
    let mut content: GeneratedContent = serde_json::from_str(extract_json_slice(raw)?)?;
    content.body_html = normalize_disclaimer(&content.body_html);
    Ok(content)
}

/// Strip every disclaimer variant and append the canonical block once.
///
/// Idempotent: normalizing a normalized body returns it unchanged.
#[must_use]
pub fn normalize_disclaimer(body: &str) -> String {
    let stripped = DISCLAIMER_BLOCK.replace_all(body, "");
    let stripped = DISCLAIMER_REMNANT.replace_all(&stripped, "");

    let mut normalized = stripped.trim_end().to_string();
    normalized.push_str(DISCLAIMER_HTML);
    normalized
}
