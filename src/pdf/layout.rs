//! Line wrapping on top of a [`TextMeasurer`].

use crate::fonts::{FontStyle, TextMeasurer};

/// One physical line produced by wrapping.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentLine {
    pub text: String,
    pub style: FontStyle,
    pub size: f32,
}

/// Greedy word wrap. Words wider than `max_width` are split character by character, so
/// every call terminates and no line needs more than `max_width` unless a single glyph does.
/// Empty or blank text yields no lines.
pub fn wrap_text(
    text: &str,
    max_width: f32,
    style: FontStyle,
    size: f32,
    measurer: &dyn TextMeasurer,
) -> Vec<String> {
    let fits = |s: &str| measurer.width(s, style, size) <= max_width;
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() {
            let candidate = format!("{current} {word}");
            if fits(&candidate) {
                current = candidate;
                continue;
            }
            lines.push(std::mem::take(&mut current));
        }
        if fits(word) {
            current.push_str(word);
        } else {
            let mut pieces = split_word(word, &fits);
            current = pieces.pop().unwrap_or_default();
            lines.extend(pieces);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Grow a prefix one char at a time until the next char would overflow. A prefix always
/// holds at least one char, which is what makes `max_width <= 0` terminate.
fn split_word(word: &str, fits: &dyn Fn(&str) -> bool) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut prefix = String::new();
    for ch in word.chars() {
        prefix.push(ch);
        if prefix.chars().count() > 1 && !fits(&prefix) {
            prefix.pop();
            pieces.push(std::mem::take(&mut prefix));
            prefix.push(ch);
        }
    }
    if !prefix.is_empty() {
        pieces.push(prefix);
    }
    pieces
}

pub fn wrap_lines(
    text: &str,
    max_width: f32,
    style: FontStyle,
    size: f32,
    measurer: &dyn TextMeasurer,
) -> Vec<ContentLine> {
    wrap_text(text, max_width, style, size, measurer)
        .into_iter()
        .map(|text| ContentLine { text, style, size })
        .collect()
}

/// Last-resort clamp for a line that still overflows after wrapping: trailing chars are
/// dropped until it fits. Only a glyph wider than the whole box gets here.
pub fn clamp_to_width(
    text: &str,
    max_width: f32,
    style: FontStyle,
    size: f32,
    measurer: &dyn TextMeasurer,
) -> String {
    let mut out = text.to_string();
    while out.chars().count() > 1 && measurer.width(&out, style, size) > max_width {
        out.pop();
    }
    out
}

/// Baseline that vertically centers cap height in a band of `band_height` starting at `top`.
pub fn centered_baseline(top: f32, band_height: f32, cap_height: f32) -> f32 {
    top - (band_height + cap_height) / 2.0
}
