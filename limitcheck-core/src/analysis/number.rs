use std::sync::LazyLock;

use regex::Regex;

use crate::error::LimitCheckError;

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid digit run regex"));

/// Extract the integer written immediately before `marker` in OCR text.
///
/// Only the first line containing the marker is considered (the first line
/// of the text when no line contains it). The line is searched as-is first;
/// if no digit run touches the marker, every non alphanumeric character is
/// stripped and the search is repeated, which recovers readings such as
/// `"1 5 0 P S I G"` where OCR spread the token out.
///
/// # Example
/// ```
/// use limitcheck_core::analysis::number::extract_number;
/// assert_eq!(extract_number("150PSIG", "PSIG").unwrap(), 150);
/// assert_eq!(extract_number("1 5 0 P S I G", "PSIG").unwrap(), 150);
/// assert!(extract_number("PSIG 150", "PSIG").is_err());
/// ```
pub fn extract_number(text: &str, marker: &str) -> Result<i64, LimitCheckError> {
    let line = text
        .split('\n')
        .find(|line| line.contains(marker))
        .or_else(|| text.split('\n').next())
        .unwrap_or_default();

    if let Some(value) = leading_number(line, marker) {
        return Ok(value);
    }

    let cleaned: String = line.chars().filter(char::is_ascii_alphanumeric).collect();
    leading_number(&cleaned, marker).ok_or_else(|| LimitCheckError::NoNumberFound {
        marker: marker.to_string(),
    })
}

// leftmost maximal digit run glued to the marker
fn leading_number(haystack: &str, marker: &str) -> Option<i64> {
    DIGIT_RUN
        .find_iter(haystack)
        .find(|digits| haystack[digits.end()..].starts_with(marker))
        .and_then(|digits| digits.as_str().parse().ok())
}
