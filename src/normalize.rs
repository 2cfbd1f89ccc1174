//! Flattening of arbitrary submission data into printable, indented lines.
//!
//! The input has no schema: any `serde_json::Value` is accepted and the function is total.
//! Empty branches (null, blank strings, empty arrays/objects, objects whose every value is
//! empty) disappear without a trace; no placeholder text is ever produced.

use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Number, Value};

use crate::labels::{self, ChoiceLabels};

/// Text a primitive formats to when it carries no displayable value.
pub const NO_VALUE: &str = "—";
pub const YES: &str = "Oui";
pub const NO: &str = "Non";

/// One printable line: `depth` levels of indentation, never-empty `text`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedEntry {
    pub depth: usize,
    pub text: String,
}

impl NormalizedEntry {
    fn new(depth: usize, text: impl Into<String>) -> Self {
        Self {
            depth,
            text: text.into(),
        }
    }
}

pub fn normalize(value: &Value, depth: usize) -> Vec<NormalizedEntry> {
    let mut out = Vec::new();
    push_value(value, depth, &mut out);
    out
}

/// Like [`normalize`], but string codes are first replaced by their display sentence.
pub fn normalize_with_labels(value: &Value, lookup: ChoiceLabels, depth: usize) -> Vec<NormalizedEntry> {
    normalize(&relabel(value, lookup), depth)
}

fn relabel(value: &Value, lookup: ChoiceLabels) -> Value {
    match value {
        Value::String(code) if !code.trim().is_empty() => {
            Value::String(labels::resolve(lookup, code))
        }
        Value::Array(items) => Value::Array(items.iter().map(|v| relabel(v, lookup)).collect()),
        other => other.clone(),
    }
}

/// Shallow emptiness: null, blank string, empty array, empty object.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn push_value(value: &Value, depth: usize, out: &mut Vec<NormalizedEntry>) {
    match value {
        Value::Null => {}
        Value::Array(items) => push_array(items, depth, out),
        Value::Object(map) => push_object(map, depth, out),
        Value::String(s) => {
            for line in s.lines().map(str::trim).filter(|l| !l.is_empty()) {
                out.push(NormalizedEntry::new(depth, format_string(line)));
            }
        }
        Value::Bool(_) | Value::Number(_) => {
            let text = format_primitive(value);
            if text != NO_VALUE {
                out.push(NormalizedEntry::new(depth, text));
            }
        }
    }
}

fn push_array(items: &[Value], depth: usize, out: &mut Vec<NormalizedEntry>) {
    let mut item_no = 0;
    for item in items.iter().filter(|v| !is_empty(v)) {
        match item {
            Value::Object(map) => {
                let mut children = Vec::new();
                push_object(map, depth + 1, &mut children);
                if children.is_empty() {
                    continue;
                }
                item_no += 1;
                out.push(NormalizedEntry::new(depth, format!("Item {item_no} :")));
                out.extend(children);
            }
            other => push_value(other, depth, out),
        }
    }
}

fn push_object(map: &Map<String, Value>, depth: usize, out: &mut Vec<NormalizedEntry>) {
    for (key, value) in map {
        let label = humanize_key(key);
        if !label.is_empty() {
            push_field(&label, value, depth, out);
        }
    }
}

/// One `"Label : value"` field, or `"Label :"` with indented children for nested values.
pub fn labelled(label: &str, value: &Value, depth: usize) -> Vec<NormalizedEntry> {
    let mut out = Vec::new();
    push_field(label, value, depth, &mut out);
    out
}

fn push_field(label: &str, value: &Value, depth: usize, out: &mut Vec<NormalizedEntry>) {
    if is_empty(value) {
        return;
    }
    match value {
        Value::Array(_) | Value::Object(_) => {
            let children = normalize(value, depth + 1);
            if !children.is_empty() {
                out.push(NormalizedEntry::new(depth, format!("{label} :")));
                out.extend(children);
            }
        }
        Value::String(s) => {
            let lines: Vec<&str> = s.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
            match lines.as_slice() {
                [] => {}
                [single] => {
                    out.push(NormalizedEntry::new(depth, format!("{label} : {}", format_string(single))));
                }
                many => {
                    out.push(NormalizedEntry::new(depth, format!("{label} :")));
                    out.extend(many.iter().map(|l| NormalizedEntry::new(depth + 1, format_string(l))));
                }
            }
        }
        _ => {
            let text = format_primitive(value);
            if text != NO_VALUE {
                out.push(NormalizedEntry::new(depth, format!("{label} : {text}")));
            }
        }
    }
}

pub fn format_primitive(value: &Value) -> String {
    match value {
        Value::Bool(true) => YES.to_string(),
        Value::Bool(false) => NO.to_string(),
        Value::Number(n) => format_number(n),
        Value::String(s) if !s.trim().is_empty() => format_string(s.trim()),
        _ => NO_VALUE.to_string(),
    }
}

fn format_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", f as i64)
            } else {
                format!("{f}")
            }
        }
        _ => NO_VALUE.to_string(),
    }
}

/// Timestamps and ISO dates are shown the way a French reader expects them.
fn format_string(s: &str) -> String {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return ts.format("%d/%m/%Y %H:%M").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.format("%d/%m/%Y").to_string();
    }
    s.to_string()
}

/// `seat_count` / `seat-count` / `seatCount` → `Seat Count`.
pub fn humanize_key(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() + 4);
    let mut prev_lower = false;
    for ch in key.chars() {
        if matches!(ch, '_' | '-' | '.') || ch.is_whitespace() {
            spaced.push(' ');
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower {
            spaced.push(' ');
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        spaced.push(ch);
    }
    spaced
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn humanize_handles_every_separator_style() {
        assert_eq!(humanize_key("seat_count"), "Seat Count");
        assert_eq!(humanize_key("seat-count"), "Seat Count");
        assert_eq!(humanize_key("ipPhoneStrategy"), "Ip Phone Strategy");
        assert_eq!(humanize_key("__"), "");
    }

    #[test]
    fn number_forms() {
        assert_eq!(format_primitive(&json!(42)), "42");
        assert_eq!(format_primitive(&json!(2.5)), "2.5");
        assert_eq!(format_primitive(&json!(3.0)), "3");
        assert_eq!(format_primitive(&json!(-7)), "-7");
    }

    #[test]
    fn dates_render_in_french_order() {
        assert_eq!(format_primitive(&json!("2024-03-09")), "09/03/2024");
        assert_eq!(format_primitive(&json!("2024-03-09T14:05:00Z")), "09/03/2024 14:05");
        assert_eq!(format_primitive(&json!("le 9 mars")), "le 9 mars");
    }

    #[test]
    fn relabel_only_touches_strings() {
        let v = relabel(&json!(["fr", 3, null]), labels::menu_language);
        assert_eq!(v, json!(["Menu en français seulement", 3, null]));
    }
}
