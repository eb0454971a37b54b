//! Locale-agnostic coercion of loosely typed form values.
//!
//! Numbers arrive either as JSON numbers or as strings typed into a form.
//! Strings may carry a leading `$`, surrounding whitespace and `,` thousands
//! separators in strict groups of three. `.` is the only decimal separator,
//! so "1.234,56" is rejected rather than guessed at.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

pub fn parse_decimal(value: &Value) -> Result<Decimal, String> {
    match value {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .map_err(|_| format!("{text} is out of range"))
        }
        Value::String(s) => parse_decimal_str(s),
        Value::Null => Err("a value is required".to_string()),
        _ => Err("expected a number".to_string()),
    }
}

pub fn parse_decimal_str(raw: &str) -> Result<Decimal, String> {
    let invalid = || format!("'{raw}' is not a valid amount");

    let mut s = raw.trim();
    let negative = s.starts_with('-');
    if negative {
        s = s[1..].trim_start();
    }
    s = s.strip_prefix('$').unwrap_or(s).trim_start();
    if s.is_empty() {
        return Err(invalid());
    }

    let (whole, fraction) = match s.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (s, None),
    };
    if let Some(f) = fraction {
        if f.is_empty() || !f.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
    }
    let digits = strip_grouping(whole).ok_or_else(invalid)?;

    let mut canonical = String::with_capacity(raw.len());
    if negative {
        canonical.push('-');
    }
    canonical.push_str(&digits);
    if let Some(f) = fraction {
        canonical.push('.');
        canonical.push_str(f);
    }
    Decimal::from_str_exact(&canonical).map_err(|_| invalid())
}

/// Removes thousands separators, rejecting irregular grouping.
fn strip_grouping(whole: &str) -> Option<String> {
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit() || b == b',') {
        return None;
    }
    if !whole.contains(',') {
        return Some(whole.to_string());
    }
    let mut groups = whole.split(',');
    let first = groups.next()?;
    if first.is_empty() || first.len() > 3 {
        return None;
    }
    let mut digits = first.to_string();
    for group in groups {
        if group.len() != 3 {
            return None;
        }
        digits.push_str(group);
    }
    Some(digits)
}

/// A whole number within `0..=max`. Accepts `3`, `3.0` and `"3"`.
pub fn parse_whole(value: &Value, max: u32) -> Result<u32, String> {
    let number = parse_decimal(value)?;
    if number.fract() != Decimal::ZERO {
        return Err(format!("{number} is not a whole number"));
    }
    if number < Decimal::ZERO || number > Decimal::from(max) {
        return Err(format!("{number} is outside 0 to {max}"));
    }
    u32::try_from(number.normalize().mantissa()).map_err(|_| format!("{number} is out of range"))
}

/// Booleans as JSON booleans or the strings "true"/"false"/"yes"/"no".
pub fn parse_bool(value: &Value) -> Result<bool, String> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" => Ok(true),
            "false" | "no" => Ok(false),
            _ => Err(format!("'{s}' is not true or false")),
        },
        _ => Err("expected true or false".to_string()),
    }
}
