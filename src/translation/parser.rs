/*!
 * Heuristic parsing of translation endpoint responses.
 *
 * The endpoint is an undocumented third-party API whose payload shape
 * varies by input. Three array shapes are handled explicitly; everything
 * else degrades through a fixed fallback chain rather than failing. The
 * fallback order is load-bearing - callers display whatever comes out, so
 * a best-effort string always beats an error.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// First quoted run anywhere in the payload, used as the last resort
/// before giving up and echoing the source text.
static QUOTED_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"]+?)""#).expect("quoted-text regex is valid"));

/// How the translated text was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    /// One of the known payload shapes matched
    Known,
    /// Unknown shape; fell back to the first quoted string in the payload
    QuotedFallback,
    /// Everything came up blank; fell back to the original source text
    SourceFallback,
}

impl ParseOutcome {
    /// Whether a fallback heuristic produced the value
    pub fn is_fallback(&self) -> bool {
        !matches!(self, ParseOutcome::Known)
    }
}

/// Extract the translated text from a raw payload.
///
/// Known shapes, tried in order:
/// 1. Flat array: `["translation", ...]`
/// 2. Nested pair: `[["translation", "lang"]]`
/// 3. Segments: `[[["translation", "source"], ...]]`, concatenated with
///    a single space
///
/// Unknown shapes yield the first quoted string found anywhere in the
/// payload; a blank result yields the source text.
pub fn parse_translation(payload: &str, source_text: &str) -> (String, ParseOutcome) {
    let trimmed = payload.trim();

    let (text, outcome) = match extract_known_shape(trimmed) {
        Some(text) => (text, ParseOutcome::Known),
        None => match QUOTED_TEXT.captures(trimmed) {
            Some(caps) => (caps[1].to_string(), ParseOutcome::QuotedFallback),
            None => (String::new(), ParseOutcome::QuotedFallback),
        },
    };

    if text.trim().is_empty() {
        (source_text.to_string(), ParseOutcome::SourceFallback)
    } else {
        (text, outcome)
    }
}

/// Try the three documented payload shapes
fn extract_known_shape(payload: &str) -> Option<String> {
    let value: Value = serde_json::from_str(payload).ok()?;
    let outer = value.as_array()?;

    match outer.first()? {
        // Shape 1: ["translation", "source", null, null]
        Value::String(text) => Some(text.clone()),

        Value::Array(inner) => match inner.first()? {
            // Shape 2: [["translation", "lang"]]
            Value::String(text) => Some(text.clone()),

            // Shape 3: [[["translation", "source"], ["...", "..."]]]
            Value::Array(_) => {
                let segments: Vec<&str> = inner
                    .iter()
                    .filter_map(|segment| segment.as_array()?.first()?.as_str())
                    .collect();
                if segments.is_empty() {
                    None
                } else {
                    Some(segments.join(" "))
                }
            }

            _ => None,
        },

        _ => None,
    }
}
