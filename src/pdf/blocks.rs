//! Block renderers. Each call paints one semantic unit at the cursor and moves it down;
//! nothing is remembered between calls.

use crate::fonts::{FontStyle, TextMeasurer};
use crate::normalize::NormalizedEntry;

use super::flow::FlowContext;
use super::layout::{centered_baseline, clamp_to_width, wrap_text};
use super::{Rgb, Stroke};

pub const ANSWER_FONT_SIZE: f32 = 9.0;
pub const ANSWER_LINE_HEIGHT: f32 = ANSWER_FONT_SIZE * 1.4;
pub const BOX_PADDING_X: f32 = 8.0;
pub const BOX_PADDING_Y: f32 = 6.0;
pub const BOX_MARGIN_TOP: f32 = 3.0;
pub const BOX_MARGIN_BOTTOM: f32 = 8.0;
pub const SHADOW_OFFSET: f32 = 2.0;
pub const ACCENT_HEIGHT: f32 = 2.0;
pub const DEPTH_INDENT: f32 = 10.0;

pub const BADGE_FONT_SIZE: f32 = 11.0;
pub const BADGE_PADDING_X: f32 = 10.0;
pub const BADGE_PADDING_Y: f32 = 5.0;
pub const BADGE_HEIGHT: f32 = BADGE_FONT_SIZE + 2.0 * BADGE_PADDING_Y;
pub const BADGE_MARGIN_TOP: f32 = 10.0;
pub const BADGE_MARGIN_BOTTOM: f32 = 8.0;

pub const QUESTION_BADGE_RADIUS: f32 = 8.0;
pub const QUESTION_LABEL_SIZE: f32 = 9.5;
pub const QUESTION_LINE_HEIGHT: f32 = 12.5;
pub const QUESTION_INDENT: f32 = 22.0;
pub const QUESTION_GAP: f32 = 4.0;
/// A question never sits alone at the bottom of a column: its label travels with at
/// least this many answer lines.
const QUESTION_KEEP_LINES: usize = 3;
/// Shortest continuation segment worth starting when a box has to be split.
const MIN_SEGMENT_LINES: usize = 3;
/// Smallest first question: gap, one label line and a one-line box.
pub const HEADING_KEEP_NEXT: f32 = QUESTION_GAP
    + QUESTION_LINE_HEIGHT
    + BOX_MARGIN_TOP
    + ANSWER_LINE_HEIGHT
    + 2.0 * BOX_PADDING_Y
    + BOX_MARGIN_BOTTOM;

const INK: Rgb = [33, 37, 41];
const HEADING_INK: Rgb = [20, 48, 82];
const ACCENT: Rgb = [41, 98, 160];
const BADGE_FILL: Rgb = [232, 240, 250];
const BOX_FILL: Rgb = [250, 251, 253];
const BOX_BORDER: Rgb = [196, 205, 217];
const SHADOW: Rgb = [214, 220, 228];
const WHITE: Rgb = [255, 255, 255];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParagraphStyle {
    pub style: FontStyle,
    pub size: f32,
    pub line_height: f32,
    pub color: Rgb,
    pub indent: f32,
}

impl Default for ParagraphStyle {
    fn default() -> Self {
        Self {
            style: FontStyle::Regular,
            size: ANSWER_FONT_SIZE,
            line_height: ANSWER_LINE_HEIGHT,
            color: INK,
            indent: 0.0,
        }
    }
}

/// Plain wrapped text. Returns the number of lines drawn.
pub fn paragraph(ctx: &mut FlowContext<'_>, text: &str, ps: &ParagraphStyle) -> usize {
    let width = ctx.cursor.width() - ps.indent;
    let lines = wrap_text(text, width, ps.style, ps.size, ctx.fonts);
    let cap = ctx.fonts.face(ps.style).cap_height(ps.size);
    for line in &lines {
        ctx.ensure_space(ps.line_height);
        let x = ctx.cursor.x() + ps.indent;
        let baseline = centered_baseline(ctx.cursor.y(), ps.line_height, cap);
        ctx.doc.text(x, baseline, ps.style, ps.size, ps.color, line);
        ctx.cursor.advance(ps.line_height);
    }
    lines.len()
}

/// Tinted, bordered badge sized to the title.
pub fn section_heading(ctx: &mut FlowContext<'_>, title: &str) {
    let max_text_w = ctx.cursor.width() - 2.0 * BADGE_PADDING_X;
    let title = clamp_to_width(title, max_text_w, FontStyle::Bold, BADGE_FONT_SIZE, ctx.fonts);
    let text_w = ctx.fonts.width(&title, FontStyle::Bold, BADGE_FONT_SIZE);
    let badge_w = text_w + 2.0 * BADGE_PADDING_X;

    // keep the badge with the start of the first block under it
    ctx.ensure_space(BADGE_MARGIN_TOP + BADGE_HEIGHT + BADGE_MARGIN_BOTTOM + HEADING_KEEP_NEXT);
    if !ctx.cursor.is_at_top() {
        ctx.cursor.advance(BADGE_MARGIN_TOP);
    }

    let (x, top) = (ctx.cursor.x(), ctx.cursor.y());
    ctx.doc.rect(
        x,
        top - BADGE_HEIGHT,
        badge_w,
        BADGE_HEIGHT,
        Some(BADGE_FILL),
        Some(Stroke {
            color: ACCENT,
            width: 0.8,
        }),
    );
    let cap = ctx.fonts.face(FontStyle::Bold).cap_height(BADGE_FONT_SIZE);
    ctx.doc.text(
        x + BADGE_PADDING_X,
        centered_baseline(top, BADGE_HEIGHT, cap),
        FontStyle::Bold,
        BADGE_FONT_SIZE,
        HEADING_INK,
        &title,
    );
    ctx.cursor.advance(BADGE_HEIGHT + BADGE_MARGIN_BOTTOM);
}

/// A wrapped physical line inside an answer box.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxLine {
    pub indent: f32,
    pub style: FontStyle,
    pub text: String,
}

/// Wrap entries to the inner width of a box in a column of `column_width`. Entries that
/// introduce nested children (`Label :`) are set in bold.
pub fn wrap_entries(
    entries: &[NormalizedEntry],
    column_width: f32,
    measurer: &dyn TextMeasurer,
) -> Vec<BoxLine> {
    let inner = column_width - 2.0 * BOX_PADDING_X;
    let mut out = Vec::new();
    for entry in entries {
        let indent = (entry.depth as f32 * DEPTH_INDENT).min(inner / 2.0);
        let style = if entry.text.ends_with(" :") {
            FontStyle::Bold
        } else {
            FontStyle::Regular
        };
        for text in wrap_text(&entry.text, inner - indent, style, ANSWER_FONT_SIZE, measurer) {
            out.push(BoxLine {
                indent,
                style,
                text,
            });
        }
    }
    out
}

pub fn box_height(lines: usize) -> f32 {
    lines as f32 * ANSWER_LINE_HEIGHT + 2.0 * BOX_PADDING_Y
}

fn box_footprint(lines: usize) -> f32 {
    BOX_MARGIN_TOP + box_height(lines) + BOX_MARGIN_BOTTOM
}

fn lines_fitting(room: f32) -> usize {
    let usable = room - box_footprint(0);
    if usable <= 0.0 {
        0
    } else {
        (usable / ANSWER_LINE_HEIGHT).floor() as usize
    }
}

/// Bordered box with one field's value lines. Draws nothing for an empty list.
pub fn answer_box(ctx: &mut FlowContext<'_>, entries: &[NormalizedEntry]) {
    let lines = wrap_entries(entries, ctx.cursor.width(), ctx.fonts);
    answer_box_lines(ctx, &lines);
}

/// Paint pre-wrapped lines. A box taller than an empty column continues in
/// column-sized segments.
pub fn answer_box_lines(ctx: &mut FlowContext<'_>, lines: &[BoxLine]) {
    paint_segments(ctx, lines, false);
}

/// With `split_first`, the first segment starts in the current column whenever
/// [`MIN_SEGMENT_LINES`] fit there, even if the whole box would fit an empty column.
fn paint_segments(ctx: &mut FlowContext<'_>, lines: &[BoxLine], split_first: bool) {
    let mut rest = lines;
    let mut first = true;
    while !rest.is_empty() {
        let capacity = lines_fitting(ctx.cursor.capacity()).max(1);
        let here = lines_fitting(ctx.cursor.remaining(ctx.cursor.active()));
        let n = if rest.len() <= here {
            rest.len()
        } else if first && split_first && here >= MIN_SEGMENT_LINES {
            here
        } else if rest.len() <= capacity {
            rest.len()
        } else if here >= MIN_SEGMENT_LINES {
            here
        } else {
            capacity
        };
        ctx.ensure_space(box_footprint(n));
        draw_box(ctx, &rest[..n]);
        rest = &rest[n..];
        first = false;
    }
}

fn draw_box(ctx: &mut FlowContext<'_>, lines: &[BoxLine]) {
    let x = ctx.cursor.x();
    let w = ctx.cursor.width();
    let top = ctx.cursor.y() - BOX_MARGIN_TOP;
    let h = box_height(lines.len());

    ctx.doc.rect(x + SHADOW_OFFSET, top - h - SHADOW_OFFSET, w, h, Some(SHADOW), None);
    ctx.doc.rect(
        x,
        top - h,
        w,
        h,
        Some(BOX_FILL),
        Some(Stroke {
            color: BOX_BORDER,
            width: 0.6,
        }),
    );
    ctx.doc.rect(x, top - ACCENT_HEIGHT, w, ACCENT_HEIGHT, Some(ACCENT), None);

    let inner = w - 2.0 * BOX_PADDING_X;
    for (i, line) in lines.iter().enumerate() {
        let line_top = top - BOX_PADDING_Y - i as f32 * ANSWER_LINE_HEIGHT;
        let cap = ctx.fonts.face(line.style).cap_height(ANSWER_FONT_SIZE);
        let text = clamp_to_width(&line.text, inner - line.indent, line.style, ANSWER_FONT_SIZE, ctx.fonts);
        ctx.doc.text(
            x + BOX_PADDING_X + line.indent,
            centered_baseline(line_top, ANSWER_LINE_HEIGHT, cap),
            line.style,
            ANSWER_FONT_SIZE,
            INK,
            &text,
        );
    }
    ctx.cursor.advance(box_footprint(lines.len()));
}

/// Number badge, bold label and answer box. Returns false, drawing nothing, when the
/// answer has no lines.
pub fn numbered_question(
    ctx: &mut FlowContext<'_>,
    number: usize,
    label: &str,
    answer: &[NormalizedEntry],
) -> bool {
    if answer.is_empty() {
        return false;
    }
    let label_style = ParagraphStyle {
        style: FontStyle::Bold,
        size: QUESTION_LABEL_SIZE,
        line_height: QUESTION_LINE_HEIGHT,
        color: HEADING_INK,
        indent: QUESTION_INDENT,
    };
    let label_lines = wrap_text(
        label,
        ctx.cursor.width() - QUESTION_INDENT,
        FontStyle::Bold,
        QUESTION_LABEL_SIZE,
        ctx.fonts,
    )
    .len()
    .max(1);
    let lines = wrap_entries(answer, ctx.cursor.width(), ctx.fonts);
    let label_h = label_lines as f32 * QUESTION_LINE_HEIGHT;
    let kept = if QUESTION_GAP + label_h + box_footprint(lines.len()) <= ctx.cursor.capacity() {
        lines.len()
    } else {
        lines.len().min(QUESTION_KEEP_LINES)
    };

    ctx.ensure_space(QUESTION_GAP + label_h + box_footprint(kept));
    if !ctx.cursor.is_at_top() {
        ctx.cursor.advance(QUESTION_GAP);
    }

    let cx = ctx.cursor.x() + QUESTION_BADGE_RADIUS;
    let cy = ctx.cursor.y() - QUESTION_LINE_HEIGHT / 2.0;
    ctx.doc.circle(cx, cy, QUESTION_BADGE_RADIUS, Some(ACCENT), None);
    let num = number.to_string();
    let num_size = if num.len() > 2 { 6.5 } else { 8.0 };
    let num_w = ctx.fonts.width(&num, FontStyle::Bold, num_size);
    let num_cap = ctx.fonts.face(FontStyle::Bold).cap_height(num_size);
    ctx.doc.text(cx - num_w / 2.0, cy - num_cap / 2.0, FontStyle::Bold, num_size, WHITE, &num);

    if paragraph(ctx, label, &label_style) == 0 {
        ctx.cursor.advance(QUESTION_LINE_HEIGHT);
    }
    paint_segments(ctx, &lines, kept < lines.len());
    true
}
