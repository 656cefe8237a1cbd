/*!
 * Language code utilities built on isolang.
 *
 * The translation endpoint speaks ISO 639-1 codes plus the pseudo-code
 * "auto" for source-language detection.
 */

use isolang::Language;

/// Pseudo-code accepted as a source language for auto-detection
pub const AUTO_LANGUAGE: &str = "auto";

/// Check whether a code is a valid ISO 639-1 language code
pub fn is_valid_code(code: &str) -> bool {
    Language::from_639_1(&code.to_lowercase()).is_some()
}

/// Check whether a code is usable as a source language ("auto" or ISO 639-1)
pub fn is_valid_source_code(code: &str) -> bool {
    code.eq_ignore_ascii_case(AUTO_LANGUAGE) || is_valid_code(code)
}

/// Resolve an optional source language to a concrete request parameter
pub fn normalize_source(source: Option<&str>) -> String {
    match source {
        Some(code) if !code.trim().is_empty() => code.to_lowercase(),
        _ => AUTO_LANGUAGE.to_string(),
    }
}

/// Human-readable English name for a language code, for CLI output
pub fn display_name(code: &str) -> String {
    Language::from_639_1(&code.to_lowercase())
        .map(|lang| lang.to_name().to_string())
        .unwrap_or_else(|| code.to_string())
}
