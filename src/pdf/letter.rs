//! The portability authorization letter: one page at fixed positions, outside the column flow.

use crate::fonts::{FontSet, FontStyle, TextMeasurer};
use crate::phone::{MAX_PORTABILITY_NUMBERS, PhoneEntry};

use super::layout::{centered_baseline, clamp_to_width, wrap_text};
use super::page::SIDE_MARGIN;
use super::{Document, PAGE_HEIGHT, PAGE_WIDTH, PageKind, Rgb, Stroke};

const TITLE_BAND_HEIGHT: f32 = 60.0;
const TITLE_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 9.0;
const BODY_LINE_HEIGHT: f32 = 12.5;
const PARAGRAPH_GAP: f32 = 6.0;
const MIN_BODY_SIZE: f32 = 7.0;
const NAME_MAX_WIDTH: f32 = 190.0;

/// Left half: company row, legal text, signature box.
const TEXT_X: f32 = SIDE_MARGIN;
const TEXT_WIDTH: f32 = 380.0;
const COMPANY_ROW_Y: f32 = 522.0;
const LEGAL_TOP: f32 = 500.0;
const LEGAL_BOTTOM: f32 = 262.0;
pub const INFO_BOX_TOP: f32 = 252.0;
const INFO_BOX_HEIGHT: f32 = 104.0;

/// Right half: the number table.
pub const TABLE_X: f32 = 450.0;
pub const TABLE_WIDTH: f32 = PAGE_WIDTH - SIDE_MARGIN - TABLE_X;
const TABLE_CAPTION_Y: f32 = 522.0;
const TABLE_TOP: f32 = 510.0;
const TABLE_HEADER_HEIGHT: f32 = 20.0;
pub const TABLE_ROW_HEIGHT: f32 = 24.0;
const INDEX_COL_WIDTH: f32 = 30.0;
const NUMBER_COL_WIDTH: f32 = 140.0;
pub const SUPPLIER_COLUMN_X: f32 = TABLE_X + INDEX_COL_WIDTH + NUMBER_COL_WIDTH;

const FOOTER_TOP: f32 = 122.0;

/// Drawn where a value is to be filled in by hand.
pub const PLACEHOLDER: &str = "____________________";

const NAVY: Rgb = [20, 48, 82];
const ACCENT: Rgb = [41, 98, 160];
const INK: Rgb = [33, 37, 41];
const MUTED: Rgb = [110, 118, 129];
const RULE: Rgb = [196, 205, 217];
const HEADER_FILL: Rgb = [232, 240, 250];
const STRIPE: Rgb = [247, 249, 252];
const BADGE_FILL: Rgb = [226, 239, 218];
const BADGE_BORDER: Rgb = [94, 148, 74];
const BADGE_INK: Rgb = [44, 90, 30];
const WHITE: Rgb = [255, 255, 255];

/// Return address and contact lines printed at the bottom of the letter.
#[derive(Clone, Debug, PartialEq)]
pub struct LetterContact {
    pub return_address: Vec<String>,
    pub fax: String,
    pub email: String,
    pub phone: String,
}

impl Default for LetterContact {
    fn default() -> Self {
        Self {
            return_address: vec![
                "Service de portabilité des numéros".to_string(),
                "1250, boulevard René-Lévesque Ouest, bureau 2200".to_string(),
                "Montréal (Québec)  H3B 4W8".to_string(),
            ],
            fax: "514 555-0199".to_string(),
            email: "portabilite@example.com".to_string(),
            phone: "1 800 555-0142".to_string(),
        }
    }
}

pub struct LetterInput<'a> {
    pub company: &'a str,
    pub client_name: &'a str,
    pub agent: &'a str,
    pub numbers: &'a [PhoneEntry],
    pub contact: &'a LetterContact,
}

/// One row of the number table. There are always [`MAX_PORTABILITY_NUMBERS`] rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LetterRow {
    pub index: usize,
    pub number: Option<String>,
    pub supplier: Option<&'static str>,
}

pub fn letter_rows(numbers: &[PhoneEntry]) -> Vec<LetterRow> {
    (0..MAX_PORTABILITY_NUMBERS)
        .map(|i| {
            let entry = numbers.get(i);
            LetterRow {
                index: i + 1,
                number: entry.map(PhoneEntry::display),
                supplier: entry.and_then(|e| e.supplier),
            }
        })
        .collect()
}

/// Baseline of the text in table row `index` (1-based).
pub fn row_baseline(index: usize, fonts: &FontSet) -> f32 {
    let top = TABLE_TOP - TABLE_HEADER_HEIGHT - (index.saturating_sub(1)) as f32 * TABLE_ROW_HEIGHT;
    centered_baseline(top, TABLE_ROW_HEIGHT, fonts.face(FontStyle::Regular).cap_height(BODY_SIZE))
}

fn legal_paragraphs(input: &LetterInput<'_>) -> [String; 3] {
    let LetterInput {
        company,
        client_name,
        agent,
        ..
    } = input;
    [
        format!(
            "Par la présente, je soussigné(e), {client_name}, représentant(e) autorisé(e) de {company}, \
             autorise {agent} à agir à titre de mandataire auprès de notre fournisseur de services actuel \
             afin de procéder au transfert des numéros de téléphone énumérés dans le tableau ci-contre."
        ),
        format!(
            "Cette autorisation comprend la demande de transfert des numéros, le changement de \
             l'organisation responsable (Resp Org) des numéros sans frais ainsi que toute démarche \
             administrative nécessaire à la portabilité. {company} demeure responsable des montants dus \
             à son fournisseur actuel jusqu'à la date effective du transfert."
        ),
        format!(
            "Je confirme être autorisé(e) à signer au nom de {company} et que les renseignements fournis \
             sont exacts. La présente autorisation demeure valide pour une période de quatre-vingt-dix (90) \
             jours suivant la date de signature."
        ),
    ]
}

/// Append the letter as a new page of `doc`.
pub fn append_letter(doc: &mut Document, fonts: &FontSet, input: &LetterInput<'_>) {
    let number = doc.start_page(PageKind::Letter);
    log::debug!("letter: page {number}, {} numbers", input.numbers.len());

    paint_title_band(doc, fonts);
    paint_company_row(doc, fonts, input.company);
    paint_legal_text(doc, fonts, input);
    paint_info_box(doc, fonts, input.client_name);
    paint_table(doc, fonts, &letter_rows(input.numbers));
    paint_footer(doc, fonts, input.contact);
}

fn paint_title_band(doc: &mut Document, fonts: &FontSet) {
    let bottom = PAGE_HEIGHT - TITLE_BAND_HEIGHT;
    doc.rect(0.0, bottom, PAGE_WIDTH, TITLE_BAND_HEIGHT, Some(NAVY), None);
    doc.rect(0.0, bottom - 3.0, PAGE_WIDTH, 3.0, Some(ACCENT), None);

    let title = "Lettre d'autorisation de transfert de numéros";
    let w = fonts.width(title, FontStyle::Bold, TITLE_SIZE);
    doc.text((PAGE_WIDTH - w) / 2.0, bottom + 32.0, FontStyle::Bold, TITLE_SIZE, WHITE, title);

    let sub = "Document à signer et à nous retourner";
    let w = fonts.width(sub, FontStyle::Regular, BODY_SIZE);
    doc.text((PAGE_WIDTH - w) / 2.0, bottom + 14.0, FontStyle::Regular, BODY_SIZE, WHITE, sub);
}

fn paint_company_row(doc: &mut Document, fonts: &FontSet, company: &str) {
    let label = "Nom de l'entreprise :";
    doc.text(TEXT_X, COMPANY_ROW_Y, FontStyle::Bold, 10.0, NAVY, label);
    let value_x = TEXT_X + fonts.width(label, FontStyle::Bold, 10.0) + 6.0;
    let value_w = TEXT_X + TEXT_WIDTH - value_x;
    let value = clamp_to_width(company, value_w, FontStyle::Regular, 10.0, fonts);
    doc.text(value_x, COMPANY_ROW_Y, FontStyle::Regular, 10.0, INK, &value);
    doc.line(
        (value_x, COMPANY_ROW_Y - 3.0),
        (TEXT_X + TEXT_WIDTH, COMPANY_ROW_Y - 3.0),
        Stroke {
            color: RULE,
            width: 0.6,
        },
    );
}

fn paint_legal_text(doc: &mut Document, fonts: &FontSet, input: &LetterInput<'_>) {
    let company = shorten_name(input.company, fonts);
    let client_name = shorten_name(input.client_name, fonts);
    let agent = shorten_name(input.agent, fonts);
    let paragraphs = legal_paragraphs(&LetterInput {
        company: &company,
        client_name: &client_name,
        agent: &agent,
        ..*input
    });

    // step down until the three paragraphs clear the info box
    let mut size = BODY_SIZE;
    let mut wrapped = wrap_legal(&paragraphs, size, fonts);
    while size > MIN_BODY_SIZE && legal_height(&wrapped, size) > LEGAL_TOP - LEGAL_BOTTOM {
        size -= 0.5;
        wrapped = wrap_legal(&paragraphs, size, fonts);
    }
    if size < BODY_SIZE {
        log::debug!("letter: legal text set at {size}pt");
    }

    let line_height = BODY_LINE_HEIGHT * size / BODY_SIZE;
    let cap = fonts.face(FontStyle::Regular).cap_height(size);
    let mut top = LEGAL_TOP;
    for lines in &wrapped {
        for line in lines {
            doc.text(
                TEXT_X,
                centered_baseline(top, line_height, cap),
                FontStyle::Regular,
                size,
                INK,
                line,
            );
            top -= line_height;
        }
        top -= PARAGRAPH_GAP;
    }
}

fn wrap_legal(paragraphs: &[String; 3], size: f32, fonts: &FontSet) -> Vec<Vec<String>> {
    paragraphs
        .iter()
        .map(|p| wrap_text(p, TEXT_WIDTH, FontStyle::Regular, size, fonts))
        .collect()
}

fn legal_height(wrapped: &[Vec<String>], size: f32) -> f32 {
    let lines: usize = wrapped.iter().map(Vec::len).sum();
    lines as f32 * BODY_LINE_HEIGHT * size / BODY_SIZE + wrapped.len() as f32 * PARAGRAPH_GAP
}

/// Names interpolated into the legal text are capped at [`NAME_MAX_WIDTH`], ending in an ellipsis.
fn shorten_name(name: &str, fonts: &FontSet) -> String {
    if fonts.width(name, FontStyle::Regular, BODY_SIZE) <= NAME_MAX_WIDTH {
        return name.to_string();
    }
    let ellipsis = fonts.width("\u{2026}", FontStyle::Regular, BODY_SIZE);
    let mut out = clamp_to_width(name, NAME_MAX_WIDTH - ellipsis, FontStyle::Regular, BODY_SIZE, fonts);
    out.truncate(out.trim_end().len());
    out.push('\u{2026}');
    out
}

fn paint_info_box(doc: &mut Document, fonts: &FontSet, client_name: &str) {
    let bottom = INFO_BOX_TOP - INFO_BOX_HEIGHT;
    doc.rect(
        TEXT_X,
        bottom,
        TEXT_WIDTH,
        INFO_BOX_HEIGHT,
        Some(STRIPE),
        Some(Stroke {
            color: RULE,
            width: 0.8,
        }),
    );
    doc.rect(TEXT_X, bottom, 3.0, INFO_BOX_HEIGHT, Some(ACCENT), None);

    let rows: [(&str, String); 4] = [
        ("Représentant(e) autorisé(e) :", client_name.to_string()),
        ("Titre :", PLACEHOLDER.to_string()),
        ("Signature :", PLACEHOLDER.to_string()),
        ("Date :", "______ / ______ / __________".to_string()),
    ];
    let label_w = rows
        .iter()
        .map(|(l, _)| fonts.width(l, FontStyle::Bold, BODY_SIZE))
        .fold(0.0f32, f32::max);
    let mut y = INFO_BOX_TOP - 24.0;
    for (label, value) in &rows {
        doc.text(TEXT_X + 14.0, y, FontStyle::Bold, BODY_SIZE, NAVY, label);
        let value_x = TEXT_X + 14.0 + label_w + 8.0;
        let value = clamp_to_width(value, TEXT_X + TEXT_WIDTH - 10.0 - value_x, FontStyle::Regular, BODY_SIZE, fonts);
        doc.text(value_x, y, FontStyle::Regular, BODY_SIZE, INK, &value);
        y -= 22.0;
    }
}

fn paint_table(doc: &mut Document, fonts: &FontSet, rows: &[LetterRow]) {
    doc.text(TABLE_X, TABLE_CAPTION_Y, FontStyle::Bold, 10.0, NAVY, "Numéros à transférer");

    let border = Stroke {
        color: RULE,
        width: 0.6,
    };
    let header_bottom = TABLE_TOP - TABLE_HEADER_HEIGHT;
    doc.rect(TABLE_X, header_bottom, TABLE_WIDTH, TABLE_HEADER_HEIGHT, Some(HEADER_FILL), Some(border));
    let header_cap = fonts.face(FontStyle::Bold).cap_height(8.5);
    let header_y = centered_baseline(TABLE_TOP, TABLE_HEADER_HEIGHT, header_cap);
    for (x, title) in [
        (TABLE_X + 8.0, "#"),
        (TABLE_X + INDEX_COL_WIDTH + 8.0, "Numéro de téléphone"),
        (SUPPLIER_COLUMN_X + 8.0, "Fournisseur (Resp Org)"),
    ] {
        doc.text(x, header_y, FontStyle::Bold, 8.5, NAVY, title);
    }

    for row in rows {
        let row_top = header_bottom - (row.index - 1) as f32 * TABLE_ROW_HEIGHT;
        let fill = if row.index % 2 == 0 { Some(STRIPE) } else { None };
        doc.rect(TABLE_X, row_top - TABLE_ROW_HEIGHT, TABLE_WIDTH, TABLE_ROW_HEIGHT, fill, Some(border));
        let baseline = row_baseline(row.index, fonts);

        doc.text(TABLE_X + 8.0, baseline, FontStyle::Bold, BODY_SIZE, MUTED, &row.index.to_string());
        match &row.number {
            Some(number) => {
                let n = clamp_to_width(number, NUMBER_COL_WIDTH - 16.0, FontStyle::Regular, BODY_SIZE, fonts);
                doc.text(TABLE_X + INDEX_COL_WIDTH + 8.0, baseline, FontStyle::Regular, BODY_SIZE, INK, &n);
            }
            None => {
                doc.text(TABLE_X + INDEX_COL_WIDTH + 8.0, baseline, FontStyle::Regular, BODY_SIZE, MUTED, PLACEHOLDER);
            }
        }
        match row.supplier {
            Some(label) => paint_supplier_badge(doc, fonts, row_top, baseline, label),
            None => {
                doc.text(SUPPLIER_COLUMN_X + 8.0, baseline, FontStyle::Regular, BODY_SIZE, MUTED, PLACEHOLDER);
            }
        }
    }

    for x in [TABLE_X + INDEX_COL_WIDTH, SUPPLIER_COLUMN_X] {
        let bottom = header_bottom - rows.len() as f32 * TABLE_ROW_HEIGHT;
        doc.line((x, TABLE_TOP), (x, bottom), border);
    }
}

fn paint_supplier_badge(doc: &mut Document, fonts: &FontSet, row_top: f32, baseline: f32, label: &str) {
    let size = 8.0;
    let w = fonts.width(label, FontStyle::Bold, size) + 12.0;
    let h = 14.0;
    let x = SUPPLIER_COLUMN_X + 8.0;
    let y = row_top - (TABLE_ROW_HEIGHT + h) / 2.0;
    doc.rect(
        x,
        y,
        w,
        h,
        Some(BADGE_FILL),
        Some(Stroke {
            color: BADGE_BORDER,
            width: 0.7,
        }),
    );
    doc.text(x + 6.0, baseline, FontStyle::Bold, size, BADGE_INK, label);
}

fn paint_footer(doc: &mut Document, fonts: &FontSet, contact: &LetterContact) {
    doc.line(
        (SIDE_MARGIN, FOOTER_TOP),
        (PAGE_WIDTH - SIDE_MARGIN, FOOTER_TOP),
        Stroke {
            color: RULE,
            width: 0.8,
        },
    );
    let mut y = FOOTER_TOP - 16.0;
    doc.text(SIDE_MARGIN, y, FontStyle::Bold, BODY_SIZE, NAVY, "Veuillez retourner ce document signé à :");
    for line in &contact.return_address {
        y -= 12.0;
        doc.text(SIDE_MARGIN, y, FontStyle::Regular, BODY_SIZE, INK, line);
    }

    let right_x = TABLE_X;
    let mut ry = FOOTER_TOP - 16.0;
    doc.text(right_x, ry, FontStyle::Regular, BODY_SIZE, INK, &format!("Télécopieur : {}", contact.fax));
    ry -= 12.0;
    doc.text(right_x, ry, FontStyle::Regular, BODY_SIZE, INK, &format!("Courriel : {}", contact.email));

    let closing = format!("Des questions ? Composez le {}", contact.phone);
    let w = fonts.width(&closing, FontStyle::Bold, 10.0);
    doc.text((PAGE_WIDTH - w) / 2.0, 32.0, FontStyle::Bold, 10.0, ACCENT, &closing);
}
