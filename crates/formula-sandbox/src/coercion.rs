//! Coercion and equality rules shared by the operators and the builtin
//! library.

use crate::value::{ErrorKind, Value};

/// Strict decimal parse: optional sign, digits, optional fraction.
///
/// Rejects exponents, `inf`/`NaN` spellings, and any trailing characters,
/// so `"12px"` and `"1e3"` both fail while `" 42.5 "` succeeds.
pub fn parse_decimal(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let unsigned = trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('+'))
        .unwrap_or(trimmed);
    if unsigned.is_empty() {
        return None;
    }
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };
    if !int_part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if let Some(frac) = frac_part {
        if frac.is_empty() || !frac.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
    } else if int_part.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Numeric coercion: booleans widen to 0/1, strings must fully parse as a
/// decimal, null is "not available", sequences never silently collapse.
pub fn to_number(value: &Value) -> Result<f64, ErrorKind> {
    match value {
        Value::Number(n) => Ok(*n),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Text(s) => parse_decimal(s).ok_or(ErrorKind::Value),
        Value::Null => Err(ErrorKind::NA),
        Value::List(_) | Value::Record(_) => Err(ErrorKind::Value),
    }
}

/// Boolean coercion as applied at call time by the logical functions and
/// the `&& || !` operators. Null is false; numbers test against zero;
/// only the exact strings `"true"`/`"false"` (any case) are accepted.
pub fn to_bool(value: &Value) -> Result<bool, ErrorKind> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => Ok(*n != 0.0),
        Value::Null => Ok(false),
        Value::Text(s) => {
            let t = s.trim();
            if t.eq_ignore_ascii_case("true") {
                Ok(true)
            } else if t.eq_ignore_ascii_case("false") {
                Ok(false)
            } else {
                Err(ErrorKind::Value)
            }
        }
        Value::List(_) | Value::Record(_) => Err(ErrorKind::Value),
    }
}

/// Stringification for concatenation and criterion matching: null becomes
/// the empty string here (everywhere else null propagates as an error).
pub fn to_display_string(value: &Value) -> Result<String, ErrorKind> {
    match value {
        Value::Null => Ok(String::new()),
        Value::Bool(b) => Ok(if *b { "true" } else { "false" }.to_string()),
        Value::Number(n) => Ok(Value::format_number(*n)),
        Value::Text(s) => Ok(s.clone()),
        Value::List(_) | Value::Record(_) => Err(ErrorKind::Value),
    }
}

/// Recursively unwrap sequences (never strings, never records) into a
/// fresh flat left-to-right sequence.
pub fn deep_flatten(values: &[Value]) -> Vec<Value> {
    let mut out = Vec::with_capacity(values.len());
    flatten_into(values, &mut out);
    out
}

fn flatten_into(values: &[Value], out: &mut Vec<Value>) {
    for value in values {
        match value {
            Value::List(inner) => flatten_into(inner, out),
            other => out.push(other.clone()),
        }
    }
}

/// Equality used by `SWITCH`, `UNIQUE`, and exact lookup matching: two
/// values are equal iff both are null or both are the same kind comparing
/// equal. No cross-kind equality.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::Text(x), Value::Text(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        _ => false,
    }
}

/// View a value through a sequence contract: sequences pass through,
/// null is empty, and a scalar becomes a singleton.
pub fn sequence_of(value: Value) -> Vec<Value> {
    match value {
        Value::List(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}
