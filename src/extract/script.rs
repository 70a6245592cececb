//! Reading identifiers out of inline `window.X = {...};` object literals.
//!
//! The literal is first parsed as JSON, then as JSON after a best-effort
//! repair (trailing commas, bare keys). A literal that still refuses to parse
//! is not an error: callers fall back to regexes over the raw text.

use regex::Regex;
use serde_json::Value;

/// Capture group 1 of `assignment` in `script`: the object literal text.
pub fn capture_literal<'s>(script: &'s str, assignment: &Regex) -> Option<&'s str> {
    assignment.captures(script)?.get(1).map(|m| m.as_str())
}

pub fn parse_literal(literal: &str) -> Option<Value> {
    if let Ok(v) = serde_json::from_str::<Value>(literal) {
        return Some(v);
    }
    serde_json::from_str::<Value>(&repair(literal)).ok()
}

/// Strip trailing semicolons and trailing commas before `}`/`]`, then quote
/// bare object keys: `{ id: 1, }` -> `{ "id": 1}`.
pub fn repair(literal: &str) -> String {
    let mut out = literal.trim().trim_end_matches(';').trim_end().to_string();
    if let Ok(trailing_comma) = Regex::new(r",\s*([}\]])") {
        out = trailing_comma.replace_all(&out, "$1").into_owned();
    }
    if let Ok(bare_key) = Regex::new(r#"([{,]\s*)([A-Za-z_$][\w$]*)\s*:"#) {
        out = bare_key.replace_all(&out, r#"$1"$2":"#).into_owned();
    }
    out
}

/// Scalar at `path` rendered as text. Strings are returned as-is, integers
/// in decimal; anything else is not an identifier.
pub fn field(value: &Value, path: &[&str]) -> Option<String> {
    let mut current = value;
    for segment in path {
        current = current.get(segment)?;
    }
    match current {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.is_u64() || n.is_i64() => Some(n.to_string()),
        _ => None,
    }
}
