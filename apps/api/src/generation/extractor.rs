//! Letter Extractor — separates the generated letter from the echoed prompt.

use serde::Serialize;

use crate::generation::prompts::SENTINEL;

/// Decoded model output and the letter isolated from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    pub raw_text: String,
    pub letter_body: String,
}

impl GenerationResult {
    pub fn from_decoded(raw_text: String) -> Self {
        let letter_body = extract_letter_body(&raw_text).to_string();
        Self {
            raw_text,
            letter_body,
        }
    }
}

/// Returns the trimmed text after the last sentinel, or the whole trimmed
/// text when the model did not echo the sentinel.
pub fn extract_letter_body(decoded: &str) -> &str {
    match decoded.rsplit_once(SENTINEL) {
        Some((_, body)) => body.trim(),
        None => decoded.trim(),
    }
}
