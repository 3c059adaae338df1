//! Free-text normalization for indicator strings.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("valid regex"));

/// Normalize a possibly-missing text field.
///
/// Missing input becomes the empty string. Otherwise the text is
/// lowercased, every non-word/non-space character is replaced by a space,
/// and whitespace runs collapse to a single space. Total and idempotent.
pub fn normalize(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };
    let lowered = text.to_lowercase();
    let spaced = NON_WORD.replace_all(&lowered, " ");
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}
