use serde_json::Value;

use crate::access::{NOT_AVAILABLE, display};

/// Interprets a number or numeric-looking string as `f64`.
pub fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Formats a stat with one decimal place, optionally as a percentage of 1.0.
///
/// Misses, `null` and `""` render as `"N/A"`; values that are not numeric are
/// shown as they are.
pub fn format_stat(value: Option<&Value>, as_percentage: bool) -> String {
    let Some(value) = value else {
        return NOT_AVAILABLE.into();
    };
    match value {
        Value::Null => return NOT_AVAILABLE.into(),
        Value::String(s) if s.is_empty() => return NOT_AVAILABLE.into(),
        _ => {}
    }
    match numeric(value) {
        Some(n) if as_percentage => format_percent(n),
        Some(n) => format!("{n:.1}"),
        None => display(value),
    }
}

pub fn format_percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

pub fn format_number(n: i64) -> String {
    let s = n.unsigned_abs().to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3 + 1);
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    if n < 0 {
        result.push('-');
    }
    result.chars().rev().collect()
}

const MAX_OUTPUT: usize = 102_400;

pub fn truncate_output(s: String) -> String {
    if s.len() <= MAX_OUTPUT {
        return s;
    }
    let boundary = (0..=MAX_OUTPUT)
        .rev()
        .find(|&i| s.is_char_boundary(i))
        .unwrap_or(0);
    let mut truncated = s[..boundary].to_owned();
    truncated.push_str("\n\n... (truncated)");
    truncated
}
