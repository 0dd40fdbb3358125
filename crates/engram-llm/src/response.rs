//! Syntactic recovery of structured output from generative text
//!
//! Oracle responses routinely arrive wrapped in markdown fences, prefixed
//! with prose, or carrying trailing commas. This module applies an ordered
//! repair pipeline, each step only when needed, and never touches the
//! semantic content of the payload:
//!
//! 1. trim whitespace
//! 2. unwrap a fenced block (optionally language-tagged)
//! 3. discard noise outside the outermost brace/bracket pair
//! 4. strict JSON parse
//! 5. on failure, strip trailing separators before closers and retry once
//! 6. on continued failure, fail with a diagnostic snippet

use serde_json::Value;
use thiserror::Error;

/// How much of the cleaned text a parse failure carries for diagnostics
const SNIPPET_CHARS: usize = 200;

/// Generative output that remained unparseable after repair
#[derive(Error, Debug, Clone)]
#[error("unparseable generative output: {snippet}")]
pub struct ParseError {
    /// First 200 characters of the cleaned text
    pub snippet: String,
}

impl ParseError {
    fn new(cleaned: &str) -> Self {
        Self {
            snippet: cleaned.chars().take(SNIPPET_CHARS).collect(),
        }
    }
}

/// Recover a JSON value from free-form generative output.
///
/// # Examples
///
/// ```
/// use engram_llm::response::parse_structured;
///
/// let value = parse_structured("```json\n{\"a\": 1,}\n```").unwrap();
/// assert_eq!(value["a"], 1);
/// ```
pub fn parse_structured(raw: &str) -> Result<Value, ParseError> {
    let text = raw.trim();
    let text = unwrap_fences(text);
    let cleaned = isolate_body(text.trim());

    match serde_json::from_str(cleaned) {
        Ok(value) => Ok(value),
        Err(_) => {
            let repaired = strip_trailing_separators(cleaned);
            serde_json::from_str(&repaired).map_err(|_| ParseError::new(cleaned))
        }
    }
}

/// Keep only the span between the first fence marker and the next one,
/// tolerating an unmatched closing fence. A language tag on the opening
/// fence line is skipped.
fn unwrap_fences(text: &str) -> &str {
    let Some(open) = text.find("```") else {
        return text;
    };

    let mut body = &text[open + 3..];
    if let Some((first_line, _)) = body.split_once('\n') {
        let tag = first_line.trim();
        if tag.chars().all(|c| c.is_ascii_alphanumeric()) {
            body = &body[first_line.len() + 1..];
        }
    }

    match body.find("```") {
        Some(close) => &body[..close],
        None => body,
    }
}

/// Discard everything before the first opening brace/bracket and, if the
/// content does not already end with the matching closer, everything after
/// the last matching closer.
fn isolate_body(text: &str) -> &str {
    let Some(open) = text.find(['{', '[']) else {
        return text;
    };

    let body = &text[open..];
    let closer = if body.starts_with('{') { '}' } else { ']' };
    if body.ends_with(closer) {
        return body;
    }
    match body.rfind(closer) {
        Some(close) => &body[..close + 1],
        None => body,
    }
}

/// Remove separators that sit immediately before a closing brace or bracket
fn strip_trailing_separators(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut repaired = String::with_capacity(text.len());

    for (i, &c) in chars.iter().enumerate() {
        if c == ',' {
            let mut next = i + 1;
            while next < chars.len() && chars[next].is_whitespace() {
                next += 1;
            }
            if next < chars.len() && (chars[next] == '}' || chars[next] == ']') {
                continue;
            }
        }
        repaired.push(c);
    }

    repaired
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_plain_json() {
        let value = parse_structured(r#"{"a": 1}"#).unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn test_parse_fenced_with_trailing_comma() {
        let value = parse_structured("```json\n{\"a\":1,}\n```").unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn test_parse_fence_without_language_tag() {
        let value = parse_structured("```\n[1, 2, 3]\n```").unwrap();
        assert_eq!(value, json!([1, 2, 3]));
    }

    #[test]
    fn test_parse_unmatched_fence() {
        let value = parse_structured("```json\n{\"a\": 1}").unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn test_parse_discards_surrounding_noise() {
        let value = parse_structured("noise {\"a\":1} trailing noise").unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn test_parse_array_with_prose_prefix() {
        let value = parse_structured("Here are the questions: [\"q1\", \"q2\"]").unwrap();
        assert_eq!(value, json!(["q1", "q2"]));
    }

    #[test]
    fn test_parse_trailing_comma_in_array() {
        let value = parse_structured("[1, 2, 3,]").unwrap();
        assert_eq!(value, json!([1, 2, 3]));
    }

    #[test]
    fn test_parse_nested_trailing_commas() {
        let value = parse_structured("{\"a\": [1, 2,], \"b\": {\"c\": 3,},}").unwrap();
        assert_eq!(value, json!({"a": [1, 2], "b": {"c": 3}}));
    }

    #[test]
    fn test_parse_failure_carries_snippet() {
        let error = parse_structured("not json at all").unwrap_err();
        assert!(error.snippet.contains("not json"));
    }

    #[test]
    fn test_snippet_is_truncated() {
        let long = format!("{{{}", "x".repeat(500));
        let error = parse_structured(&long).unwrap_err();
        assert_eq!(error.snippet.chars().count(), 200);
    }

    #[test]
    fn test_parse_preserves_content_exactly() {
        // Repair is purely syntactic; values like strings containing braces
        // or fences survive untouched.
        let value = parse_structured(r#"{"text": "a } inside a string"}"#).unwrap();
        assert_eq!(value["text"], "a } inside a string");
    }
}
