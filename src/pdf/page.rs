use crate::fonts::{FontSet, FontStyle, TextMeasurer};

use super::flow::{ColumnGeometry, LayoutCursor};
use super::layout::clamp_to_width;
use super::{Document, PAGE_HEIGHT, PAGE_WIDTH, PageKind, Rgb, Stroke};

pub const SIDE_MARGIN: f32 = 45.0;
pub const HEADER_HEIGHT: f32 = 70.0;
pub const FOOTER_HEIGHT: f32 = 35.0;
pub const COLUMN_GUTTER: f32 = 25.0;
/// Gap between the header band and the first content line.
pub const TOP_MARGIN: f32 = 18.0;
/// Gap kept free above the footer band.
pub const BOTTOM_MARGIN: f32 = 15.0;

const GRADIENT_STEPS: usize = 14;
const HEADER_TOP_COLOR: Rgb = [20, 48, 82];
const HEADER_BOTTOM_COLOR: Rgb = [41, 98, 160];
const TITLE_SIZE: f32 = 18.0;
const SUBTITLE_SIZE: f32 = 10.0;
const FOOTER_TEXT_SIZE: f32 = 8.0;
const FOOTER_FILL: Rgb = [243, 245, 248];
const FOOTER_RULE: Rgb = [200, 206, 214];
const FOOTER_TEXT: Rgb = [90, 99, 112];
const DIVIDER: Rgb = [225, 229, 235];
const WHITE: Rgb = [255, 255, 255];
const SUBTITLE_COLOR: Rgb = [214, 226, 240];

/// Text painted on every flowing page.
#[derive(Clone, Debug, PartialEq)]
pub struct PageChrome {
    pub title: String,
    pub subtitle: String,
    pub process_date: String,
    pub brand: String,
}

pub struct PageFactory {
    chrome: PageChrome,
    geometry: ColumnGeometry,
}

impl PageFactory {
    pub fn new(chrome: PageChrome) -> Self {
        let geometry = ColumnGeometry::new(
            PAGE_WIDTH,
            SIDE_MARGIN,
            COLUMN_GUTTER,
            PAGE_HEIGHT - HEADER_HEIGHT - TOP_MARGIN,
            FOOTER_HEIGHT + BOTTOM_MARGIN,
        );
        Self { chrome, geometry }
    }

    pub fn geometry(&self) -> &ColumnGeometry {
        &self.geometry
    }

    /// Start a page, paint its chrome and hand back a cursor at the top of both columns.
    pub fn new_page(&self, doc: &mut Document, fonts: &FontSet) -> LayoutCursor {
        let number = doc.start_page(PageKind::Flow);
        self.paint_header(doc, fonts);
        self.paint_footer(doc, fonts, number);
        self.paint_divider(doc);
        LayoutCursor::new(self.geometry)
    }

    fn paint_header(&self, doc: &mut Document, fonts: &FontSet) {
        let band_bottom = PAGE_HEIGHT - HEADER_HEIGHT;
        let step_h = HEADER_HEIGHT / GRADIENT_STEPS as f32;
        for i in 0..GRADIENT_STEPS {
            let t = i as f32 / (GRADIENT_STEPS - 1) as f32;
            let y = PAGE_HEIGHT - (i + 1) as f32 * step_h;
            // strips overlap slightly so no hairline gaps show between them
            doc.rect(0.0, y, PAGE_WIDTH, step_h + 0.5, Some(mix(HEADER_TOP_COLOR, HEADER_BOTTOM_COLOR, t)), None);
        }

        let max_w = PAGE_WIDTH - 2.0 * SIDE_MARGIN;
        let title = clamp_to_width(&self.chrome.title, max_w, FontStyle::Bold, TITLE_SIZE, fonts);
        let title_w = fonts.width(&title, FontStyle::Bold, TITLE_SIZE);
        doc.text(
            (PAGE_WIDTH - title_w) / 2.0,
            band_bottom + 36.0,
            FontStyle::Bold,
            TITLE_SIZE,
            WHITE,
            &title,
        );

        let subtitle = clamp_to_width(&self.chrome.subtitle, max_w, FontStyle::Regular, SUBTITLE_SIZE, fonts);
        let subtitle_w = fonts.width(&subtitle, FontStyle::Regular, SUBTITLE_SIZE);
        doc.text(
            (PAGE_WIDTH - subtitle_w) / 2.0,
            band_bottom + 16.0,
            FontStyle::Regular,
            SUBTITLE_SIZE,
            SUBTITLE_COLOR,
            &subtitle,
        );
    }

    fn paint_footer(&self, doc: &mut Document, fonts: &FontSet, number: usize) {
        doc.rect(0.0, 0.0, PAGE_WIDTH, FOOTER_HEIGHT, Some(FOOTER_FILL), None);
        doc.line(
            (0.0, FOOTER_HEIGHT),
            (PAGE_WIDTH, FOOTER_HEIGHT),
            Stroke {
                color: FOOTER_RULE,
                width: 0.6,
            },
        );

        let baseline = (FOOTER_HEIGHT - fonts.face(FontStyle::Regular).cap_height(FOOTER_TEXT_SIZE)) / 2.0;
        let date = format!("Traité le {}", self.chrome.process_date);
        doc.text(SIDE_MARGIN, baseline, FontStyle::Regular, FOOTER_TEXT_SIZE, FOOTER_TEXT, &date);

        let page_label = format!("Page {number}");
        let page_w = fonts.width(&page_label, FontStyle::Bold, FOOTER_TEXT_SIZE);
        doc.text(
            (PAGE_WIDTH - page_w) / 2.0,
            baseline,
            FontStyle::Bold,
            FOOTER_TEXT_SIZE,
            FOOTER_TEXT,
            &page_label,
        );

        let brand_w = fonts.width(&self.chrome.brand, FontStyle::Regular, FOOTER_TEXT_SIZE);
        doc.text(
            PAGE_WIDTH - SIDE_MARGIN - brand_w,
            baseline,
            FontStyle::Regular,
            FOOTER_TEXT_SIZE,
            FOOTER_TEXT,
            &self.chrome.brand,
        );
    }

    fn paint_divider(&self, doc: &mut Document) {
        let x = self.geometry.x[0] + self.geometry.width + COLUMN_GUTTER / 2.0;
        doc.line(
            (x, self.geometry.bottom),
            (x, self.geometry.top + TOP_MARGIN / 2.0),
            Stroke {
                color: DIVIDER,
                width: 0.5,
            },
        );
    }
}

/// Linear blend of two colors, `t` in 0..=1.
pub(crate) fn mix(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let ch = |i: usize| (a[i] as f32 + (b[i] as f32 - a[i] as f32) * t).round() as u8;
    [ch(0), ch(1), ch(2)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::DrawOp;

    #[test]
    fn mix_hits_both_ends() {
        assert_eq!(mix(HEADER_TOP_COLOR, HEADER_BOTTOM_COLOR, 0.0), HEADER_TOP_COLOR);
        assert_eq!(mix(HEADER_TOP_COLOR, HEADER_BOTTOM_COLOR, 1.0), HEADER_BOTTOM_COLOR);
        assert_eq!(mix([0, 0, 0], [255, 255, 255], 2.0), [255, 255, 255]);
    }

    #[test]
    fn header_gradient_has_fourteen_strips() {
        let fonts = FontSet::builtin();
        let mut doc = Document::new();
        let factory = PageFactory::new(PageChrome {
            title: "Titre".into(),
            subtitle: "Sous-titre".into(),
            process_date: "01/01/2024".into(),
            brand: "Marque".into(),
        });
        factory.new_page(&mut doc, &fonts);
        let strips = doc.pages()[0]
            .ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::Rect { y, .. } if *y >= PAGE_HEIGHT - HEADER_HEIGHT - 0.01))
            .count();
        assert_eq!(strips, GRADIENT_STEPS);
    }
}
