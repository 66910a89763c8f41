//! Lenient parsing and normalization of model output.
//!
//! Models wrap JSON in code fences, add prose around it, leave trailing
//! commas, and return numbers out of range. Everything here degrades to
//! field-level defaults instead of failing.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::types::NO_RATIONALE_PLACEHOLDER;

static LEADING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^```(?:json)?\s*").expect("valid regex"));

static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").expect("valid regex"));

static EXPLANATION_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""explanation"\s*:\s*"([\s\S]*?)"\s*(?:,|\})"#).expect("valid regex"));

const EXPLANATION_KEYS: [&str; 5] = ["explanation", "reasoning", "rationale", "analysis", "why"];

const WRONG_ANSWER_KEYS: [&str; 5] = ["wrongAnswers", "incorrect", "incorrectReasons", "others", "wrong"];

/// Strip a surrounding Markdown code fence.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let start = LEADING_FENCE.find(trimmed).map_or(0, |m| m.end());
    let rest = &trimmed[start..];
    rest.strip_suffix("```").unwrap_or(rest)
}

fn try_parse(text: &str) -> Option<Value> {
    serde_json::from_str(text)
        .ok()
        .or_else(|| serde_json::from_str(&TRAILING_COMMA.replace_all(text, "$1")).ok())
}

/// Extract a JSON value from model text.
///
/// Order: strip code fences, parse directly, then parse only the substring
/// between the first `{` and the last `}`. Each attempt also retries with
/// trailing commas removed.
pub fn parse_json_from_text(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    let cleaned = strip_code_fence(text);
    if let Some(value) = try_parse(cleaned) {
        return Some(value);
    }

    let start = cleaned.find('{')?;
    let end = cleaned.rfind('}')?;
    if end <= start {
        return None;
    }
    try_parse(&cleaned[start..=end])
}

/// Like [`parse_json_from_text`] but always yields an object; anything
/// unparsable becomes `{}`.
pub fn parse_object_or_empty(text: &str) -> Value {
    match parse_json_from_text(text) {
        Some(value @ Value::Object(_)) => value,
        _ => Value::Object(Map::new()),
    }
}

fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// Clamp a confidence to `[0, 1]`; missing or non-finite becomes `0.5`.
pub fn sanitize_confidence(value: Option<&Value>) -> f64 {
    match value.and_then(as_number) {
        Some(confidence) => confidence.clamp(0.0, 1.0),
        None => 0.5,
    }
}

/// Round and clamp a choice index to `[0, answer_count - 1]`; missing or
/// non-finite becomes `0`.
pub fn sanitize_choice_index(value: Option<&Value>, answer_count: usize) -> usize {
    let Some(number) = value.and_then(as_number) else {
        return 0;
    };
    let max = answer_count.saturating_sub(1) as f64;
    // Half-up rounding, matching how the prompts describe indexes.
    (number + 0.5).floor().clamp(0.0, max) as usize
}

fn reason_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Null | Value::Bool(false) => return None,
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

/// Give every non-chosen index a reason, using the placeholder where the
/// model omitted one. Accepts objects keyed by index and positional arrays.
pub fn normalize_wrong_answers(
    raw: Option<&Value>,
    choice_index: usize,
    answer_count: usize,
) -> BTreeMap<usize, String> {
    (0..answer_count)
        .filter(|&index| index != choice_index)
        .map(|index| {
            let reason = match raw {
                Some(Value::Object(map)) => map.get(&index.to_string()).and_then(reason_text),
                Some(Value::Array(items)) => items.get(index).and_then(reason_text),
                _ => None,
            };
            (
                index,
                reason.unwrap_or_else(|| NO_RATIONALE_PLACEHOLDER.to_string()),
            )
        })
        .collect()
}

/// Find the explanation in a deep-phase response.
///
/// Tries the known field aliases, then a regex over the raw text (for
/// truncated JSON), then the raw text itself when it is not JSON-shaped.
/// Returns an empty string when nothing usable is found.
pub fn extract_explanation(parsed: &Value, raw_text: &str) -> String {
    for key in EXPLANATION_KEYS {
        match parsed.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => return s.trim().to_string(),
            Some(Value::String(_)) | Some(Value::Null) | None => continue,
            Some(other) => return other.to_string(),
        }
    }

    let raw = raw_text.trim();
    if raw.is_empty() {
        return String::new();
    }
    if let Some(captures) = EXPLANATION_FIELD.captures(raw) {
        return captures[1].replace("\\\"", "\"").trim().to_string();
    }
    if !raw.starts_with('{') {
        return raw.to_string();
    }
    String::new()
}

/// Find the wrong-answer mapping in a deep-phase response.
pub fn extract_wrong_answers(parsed: &Value) -> Option<&Value> {
    WRONG_ANSWER_KEYS
        .iter()
        .filter_map(|key| parsed.get(*key))
        .find(|value| !value.is_null())
}

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod tests;
