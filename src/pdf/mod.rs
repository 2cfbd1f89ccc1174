pub mod blocks;
pub mod flow;
pub mod layout;
pub mod letter;
pub mod page;

use std::collections::{HashMap, HashSet};

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::error::Result;
use crate::fonts::{EmbeddedFont, FontSet, FontStyle, embed_face, sanitize};

/// Landscape letter, in points.
pub const PAGE_WIDTH: f32 = 792.0;
pub const PAGE_HEIGHT: f32 = 612.0;

pub type Rgb = [u8; 3];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Rgb,
    pub width: f32,
}

/// One drawing primitive, in page coordinates (origin bottom-left).
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        style: FontStyle,
        size: f32,
        color: Rgb,
        text: String,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<Rgb>,
        stroke: Option<Stroke>,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        stroke: Stroke,
    },
    Circle {
        cx: f32,
        cy: f32,
        radius: f32,
        fill: Option<Rgb>,
        stroke: Option<Stroke>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageKind {
    Flow,
    Letter,
}

pub struct Page {
    pub number: usize,
    pub kind: PageKind,
    ops: Vec<DrawOp>,
}

impl Page {
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Text of every text op, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Pages of one render call. Drawing always targets the last page.
#[derive(Default)]
pub struct Document {
    pages: Vec<Page>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Numbering starts at 1 and is never reset.
    pub fn start_page(&mut self, kind: PageKind) -> usize {
        let number = self.pages.len() + 1;
        self.pages.push(Page {
            number,
            kind,
            ops: Vec::new(),
        });
        number
    }

    fn push(&mut self, op: DrawOp) {
        match self.pages.last_mut() {
            Some(page) => page.ops.push(op),
            None => log::warn!("draw call before the first page was started; dropped"),
        }
    }

    pub fn text(&mut self, x: f32, y: f32, style: FontStyle, size: f32, color: Rgb, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        self.push(DrawOp::Text {
            x,
            y,
            style,
            size,
            color,
            text: sanitize(text),
        });
    }

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: Option<Rgb>, stroke: Option<Stroke>) {
        self.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
        });
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), stroke: Stroke) {
        self.push(DrawOp::Line { from, to, stroke });
    }

    pub fn circle(&mut self, cx: f32, cy: f32, radius: f32, fill: Option<Rgb>, stroke: Option<Stroke>) {
        self.push(DrawOp::Circle {
            cx,
            cy,
            radius,
            fill,
            stroke,
        });
    }

    /// Serialize to PDF bytes. Fonts are embedded here, once every drawn char is known.
    pub fn finish(self, fonts: &FontSet, title: &str, compress: bool) -> Result<Vec<u8>> {
        let t0 = std::time::Instant::now();
        let mut pdf = Pdf::new();
        let mut next_id = 1i32;
        let mut alloc = || {
            let r = Ref::new(next_id);
            next_id += 1;
            r
        };

        let catalog_id = alloc();
        let pages_id = alloc();
        let info_id = alloc();

        // Phase 1: embed the two faces, subsetted to the chars actually drawn
        let mut used_chars: HashMap<FontStyle, HashSet<char>> = HashMap::new();
        for page in &self.pages {
            for op in &page.ops {
                if let DrawOp::Text { style, text, .. } = op {
                    used_chars.entry(*style).or_default().extend(text.chars());
                }
            }
        }
        let mut embedded: Vec<(FontStyle, EmbeddedFont)> = Vec::new();
        for style in [FontStyle::Regular, FontStyle::Bold] {
            let mut chars = used_chars.remove(&style).unwrap_or_default();
            chars.insert(' ');
            let entry = embed_face(&mut pdf, fonts.face(style), &chars, &mut alloc)?;
            embedded.push((style, entry));
        }
        let t_fonts = t0.elapsed();

        // Phase 2: content streams
        let n = self.pages.len();
        let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
        let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

        for (i, page) in self.pages.iter().enumerate() {
            let mut content = Content::new();
            for op in &page.ops {
                write_op(&mut content, op, &embedded);
            }
            let raw = content.finish();
            if compress {
                let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
                pdf.stream(content_ids[i], &compressed)
                    .filter(Filter::FlateDecode);
            } else {
                pdf.stream(content_ids[i], raw.as_slice());
            }
        }
        let t_content = t0.elapsed();

        // Phase 3: page tree
        pdf.catalog(catalog_id).pages(pages_id);
        pdf.pages(pages_id)
            .kids(page_ids.iter().copied())
            .count(n as i32);
        pdf.document_info(info_id)
            .title(TextStr(title))
            .producer(TextStr(concat!("onboarding-report ", env!("CARGO_PKG_VERSION"))));

        for i in 0..n {
            let mut page = pdf.page(page_ids[i]);
            page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT))
                .parent(pages_id)
                .contents(content_ids[i]);
            let mut resources = page.resources();
            let mut font_dict = resources.fonts();
            for (style, entry) in &embedded {
                font_dict.pair(Name(style.pdf_name().as_bytes()), entry.font_ref);
            }
        }

        let bytes = pdf.finish();
        log::info!(
            "Finish phases: font_embed={:.1}ms, content={:.1}ms, assembly={:.1}ms ({} pages, {} bytes)",
            t_fonts.as_secs_f64() * 1000.0,
            (t_content - t_fonts).as_secs_f64() * 1000.0,
            (t0.elapsed() - t_content).as_secs_f64() * 1000.0,
            n,
            bytes.len(),
        );
        Ok(bytes)
    }
}

fn set_fill(content: &mut Content, [r, g, b]: Rgb) {
    content.set_fill_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
}

fn set_stroke(content: &mut Content, stroke: Stroke) {
    let [r, g, b] = stroke.color;
    content.set_stroke_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
    content.set_line_width(stroke.width);
}

fn paint(content: &mut Content, fill: Option<Rgb>, stroke: Option<Stroke>) {
    match (fill.is_some(), stroke.is_some()) {
        (true, true) => content.fill_nonzero_and_stroke(),
        (true, false) => content.fill_nonzero(),
        (false, true) => content.stroke(),
        (false, false) => content.end_path(),
    };
}

// Bezier control distance for a quarter circle.
const KAPPA: f32 = 0.552_284_8;

fn write_op(content: &mut Content, op: &DrawOp, fonts: &[(FontStyle, EmbeddedFont)]) {
    match op {
        DrawOp::Text {
            x,
            y,
            style,
            size,
            color,
            text,
        } => {
            let Some((_, entry)) = fonts.iter().find(|(s, _)| s == style) else {
                return;
            };
            let bytes = entry.encode(text);
            content.save_state();
            set_fill(content, *color);
            content.begin_text();
            content.set_font(Name(style.pdf_name().as_bytes()), *size);
            content.next_line(*x, *y);
            content.show(Str(&bytes));
            content.end_text();
            content.restore_state();
        }
        DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
        } => {
            content.save_state();
            if let Some(c) = fill {
                set_fill(content, *c);
            }
            if let Some(s) = stroke {
                set_stroke(content, *s);
            }
            content.rect(*x, *y, *width, *height);
            paint(content, *fill, *stroke);
            content.restore_state();
        }
        DrawOp::Line { from, to, stroke } => {
            content.save_state();
            set_stroke(content, *stroke);
            content.move_to(from.0, from.1);
            content.line_to(to.0, to.1);
            content.stroke();
            content.restore_state();
        }
        DrawOp::Circle {
            cx,
            cy,
            radius,
            fill,
            stroke,
        } => {
            let (cx, cy, r) = (*cx, *cy, *radius);
            let k = r * KAPPA;
            content.save_state();
            if let Some(c) = fill {
                set_fill(content, *c);
            }
            if let Some(s) = stroke {
                set_stroke(content, *s);
            }
            content.move_to(cx + r, cy);
            content.cubic_to(cx + r, cy + k, cx + k, cy + r, cx, cy + r);
            content.cubic_to(cx - k, cy + r, cx - r, cy + k, cx - r, cy);
            content.cubic_to(cx - r, cy - k, cx - k, cy - r, cx, cy - r);
            content.cubic_to(cx + k, cy - r, cx + r, cy - k, cx + r, cy);
            content.close_path();
            paint(content, *fill, *stroke);
            content.restore_state();
        }
    }
}
