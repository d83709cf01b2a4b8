//! Extracts the first well-formed JSON object out of an arbitrary language
//! model response: strips an optional markdown code fence, locates the first
//! balanced `{...}` span by tracking string/escape state and brace depth,
//! then parses it strictly (`serde_json`) with a permissive fallback for
//! responses that use single quotes or bare identifiers instead of proper
//! JSON string syntax.

use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("no JSON object found in response")]
    NoObject,
    #[error("parsed value is not an object")]
    RootNotObject,
    #[error("object keys must be strings")]
    KeysNotString,
    #[error("failed to parse JSON object: {0}")]
    Parse(String),
}

/// Strip a leading markdown code fence (```` ```json ... ``` ````), if present.
fn strip_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    let after_open = match trimmed.find('\n') {
        Some(idx) => &trimmed[idx + 1..],
        None => return trimmed[3..].trim(),
    };
    match after_open.rfind("```") {
        Some(idx) => after_open[..idx].trim(),
        None => after_open.trim(),
    }
}

/// Find the first balanced `{...}` span, returning byte offsets `[start, end)`.
fn find_json_span(s: &str) -> Option<(usize, usize)> {
    let bytes = s.as_bytes();
    let start = s.find('{')?;
    let mut depth: i32 = 0;
    let mut in_str = false;
    let mut esc = false;
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        let ch = b as char;
        if in_str {
            if esc {
                esc = false;
            } else if ch == '\\' {
                esc = true;
            } else if ch == '"' {
                in_str = false;
            }
            continue;
        }
        match ch {
            '"' => in_str = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some((start, i + 1));
                }
            }
            _ => {}
        }
    }
    None
}

/// Permissive fallback parser for near-JSON objects using single quotes or
/// unquoted keys, e.g. `{action: 'click', selector: '#go'}`. Only handles the
/// flat string/number/bool/null value shapes the planner's schema needs.
fn parse_permissive(chunk: &str) -> Result<serde_json::Value, ParseError> {
    let inner = chunk
        .trim()
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .ok_or_else(|| ParseError::Parse("not a brace-delimited object".into()))?;

    let mut map = serde_json::Map::new();
    for pair in split_top_level(inner) {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair
            .split_once(':')
            .ok_or_else(|| ParseError::Parse(format!("malformed pair: {pair}")))?;
        let key = unquote(key.trim());
        let value = parse_scalar(value.trim());
        map.insert(key, value);
    }
    Ok(serde_json::Value::Object(map))
}

fn split_top_level(s: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0i32;
    let mut in_str = false;
    let mut quote = '"';
    let mut last = 0usize;
    for (i, ch) in s.char_indices() {
        if in_str {
            if ch == quote {
                in_str = false;
            }
            continue;
        }
        match ch {
            '\'' | '"' => {
                in_str = true;
                quote = ch;
            }
            '{' | '[' => depth += 1,
            '}' | ']' => depth -= 1,
            ',' if depth == 0 => {
                out.push(&s[last..i]);
                last = i + 1;
            }
            _ => {}
        }
    }
    out.push(&s[last..]);
    out
}

fn unquote(s: &str) -> String {
    let s = s.trim();
    if (s.starts_with('\'') && s.ends_with('\'') && s.len() >= 2)
        || (s.starts_with('"') && s.ends_with('"') && s.len() >= 2)
    {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}

fn parse_scalar(s: &str) -> serde_json::Value {
    let trimmed = s.trim();
    if (trimmed.starts_with('\'') && trimmed.ends_with('\''))
        || (trimmed.starts_with('"') && trimmed.ends_with('"'))
    {
        return serde_json::Value::String(unquote(trimmed));
    }
    match trimmed {
        "true" => return serde_json::Value::Bool(true),
        "false" => return serde_json::Value::Bool(false),
        "null" | "None" => return serde_json::Value::Null,
        _ => {}
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return serde_json::Value::Number(n.into());
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        if let Some(num) = serde_json::Number::from_f64(f) {
            return serde_json::Value::Number(num);
        }
    }
    serde_json::Value::String(trimmed.to_string())
}

/// Extract and parse the first JSON object in `text`, strict-first with a
/// permissive fallback. Returns the parsed object as a `serde_json::Value`
/// (always `Value::Object`) for downstream schema validation.
pub fn load_obj(text: &str) -> Result<serde_json::Value, ParseError> {
    let stripped = strip_fence(text);
    let (start, end) = find_json_span(stripped).ok_or(ParseError::NoObject)?;
    let chunk = &stripped[start..end];

    let value = match serde_json::from_str::<serde_json::Value>(chunk) {
        Ok(v) => v,
        Err(strict_err) => {
            parse_permissive(chunk).map_err(|_| ParseError::Parse(strict_err.to_string()))?
        }
    };

    let obj = value.as_object().ok_or(ParseError::RootNotObject)?;
    for key in obj.keys() {
        if key.is_empty() {
            return Err(ParseError::KeysNotString);
        }
    }
    Ok(value)
}

/// Convenience wrapper returning a `HashMap<String, serde_json::Value>`
/// for callers that don't need a `serde_json::Value` directly.
pub fn load_map(text: &str) -> Result<HashMap<String, serde_json::Value>, ParseError> {
    let value = load_obj(text)?;
    Ok(value.as_object().expect("load_obj guarantees an object").clone().into_iter().collect())
}
