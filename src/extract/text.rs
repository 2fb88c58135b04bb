//! Text normalization helpers shared by the extractors

use crate::extract::ExtractError;
use scraper::ElementRef;

/// Placeholder the site shows for a missing attribute
pub const NO_DATA: &str = "暂无数据";

/// Replaces ASCII and full-width commas with a space
pub fn remove_comma(text: &str) -> String {
    text.replace([',', '，'], " ")
}

/// Removes every whitespace character, including tabs and no-break spaces
pub fn remove_space(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Maps the no-data placeholder to the empty string
pub fn set_null(text: &str) -> String {
    if text == NO_DATA {
        String::new()
    } else {
        text.to_string()
    }
}

/// Full text content of an element, untrimmed
pub fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect()
}

/// Concatenated text of all matched elements, trimmed
pub fn joined_text<'a>(elements: impl Iterator<Item = ElementRef<'a>>) -> String {
    let text: String = elements.flat_map(|e| e.text()).collect();
    text.trim().to_string()
}

/// Parses a decimal value after trimming
///
/// Non-finite values are rejected along with malformed input.
pub fn parse_decimal(field: &'static str, raw: &str) -> Result<f64, ExtractError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ExtractError::InvalidNumber {
            field,
            raw: raw.to_string(),
        })
}

/// Parses a decimal, logging and defaulting to zero on failure
pub fn decimal_or_zero(field: &'static str, raw: &str) -> f64 {
    parse_decimal(field, raw).unwrap_or_else(|e| {
        tracing::warn!("{}", e);
        0.0
    })
}
