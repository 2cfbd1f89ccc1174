use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use pdf_writer::{Name, Pdf, Rect, Ref};
use ttf_parser::Face;

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontStyle {
    Regular,
    Bold,
}

impl FontStyle {
    pub(crate) fn pdf_name(self) -> &'static str {
        match self {
            FontStyle::Regular => "F1",
            FontStyle::Bold => "F2",
        }
    }
}

/// Where a face comes from: the non-embedded standard Helvetica, or a TrueType/OpenType file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FontSource {
    #[default]
    Builtin,
    File(PathBuf),
}

/// The "width of string at size" primitive everything in layout is built on.
pub trait TextMeasurer {
    fn width(&self, text: &str, style: FontStyle, size: f32) -> f32;
}

enum FontData {
    Builtin(&'static str),
    TrueType {
        data: Mmap,
        face_index: u32,
        ps_name: String,
    },
}

pub struct FontFace {
    data: FontData,
    /// Advance widths in 1000-units for WinAnsi bytes 32..=255.
    widths_1000: Vec<f32>,
    cap_height_ratio: f32,
}

impl FontFace {
    pub fn builtin(style: FontStyle) -> Self {
        let (base, widths) = match style {
            FontStyle::Regular => ("Helvetica", helvetica_widths(&HELVETICA_ASCII)),
            FontStyle::Bold => ("Helvetica-Bold", helvetica_widths(&HELVETICA_BOLD_ASCII)),
        };
        Self {
            data: FontData::Builtin(base),
            widths_1000: widths,
            cap_height_ratio: 0.718,
        }
    }

    /// Map a font file and read its WinAnsi advance widths. The mapping stays alive until
    /// the face is dropped, after the document is finalized.
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .map_err(|e| Error::Font(format!("{}: {e}", path.display())))?;
        let data = unsafe { Mmap::map(&file) }
            .map_err(|e| Error::Font(format!("{}: {e}", path.display())))?;
        let face_index = 0;
        let face = Face::parse(&data, face_index)
            .map_err(|e| Error::Font(format!("{}: {e}", path.display())))?;

        let units = face.units_per_em() as f32;
        let widths_1000: Vec<f32> = (32u8..=255u8)
            .map(|byte| {
                face.glyph_index(winansi_to_char(byte))
                    .and_then(|gid| face.glyph_hor_advance(gid))
                    .map(|adv| adv as f32 / units * 1000.0)
                    .unwrap_or(0.0)
            })
            .collect();
        let cap_height_ratio = face
            .capital_height()
            .map(|h| h as f32 / units)
            .unwrap_or(0.7);
        let ps_name = postscript_name(&face).unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("EmbeddedFont")
                .replace(' ', "")
        });
        drop(face);

        log::debug!("Loaded font {} as {ps_name}", path.display());
        Ok(Self {
            data: FontData::TrueType {
                data,
                face_index,
                ps_name,
            },
            widths_1000,
            cap_height_ratio,
        })
    }

    /// Width of a char as [`sanitize`] will draw it.
    pub fn char_width_1000(&self, ch: char) -> f32 {
        let byte = match char_to_winansi(ch) {
            b if b >= 32 && b != 0x7F => b,
            _ if ch.is_control() => b' ',
            _ => b'?',
        };
        self.widths_1000[(byte - 32) as usize]
    }

    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars()
            .map(|ch| self.char_width_1000(ch) * font_size / 1000.0)
            .sum()
    }

    pub fn cap_height(&self, font_size: f32) -> f32 {
        self.cap_height_ratio * font_size
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self.data, FontData::TrueType { .. })
    }
}

/// Regular and bold faces of one render call.
pub struct FontSet {
    regular: FontFace,
    bold: FontFace,
}

impl FontSet {
    pub fn builtin() -> Self {
        Self {
            regular: FontFace::builtin(FontStyle::Regular),
            bold: FontFace::builtin(FontStyle::Bold),
        }
    }

    pub fn load(regular: &FontSource, bold: &FontSource) -> Result<Self> {
        let load = |source: &FontSource, style| match source {
            FontSource::Builtin => Ok(FontFace::builtin(style)),
            FontSource::File(path) => FontFace::load(path),
        };
        Ok(Self {
            regular: load(regular, FontStyle::Regular)?,
            bold: load(bold, FontStyle::Bold)?,
        })
    }

    pub fn face(&self, style: FontStyle) -> &FontFace {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
        }
    }
}

impl TextMeasurer for FontSet {
    fn width(&self, text: &str, style: FontStyle, size: f32) -> f32 {
        self.face(style).text_width(text, size)
    }
}

/// Font objects written into the PDF, plus what the content encoder needs.
pub(crate) struct EmbeddedFont {
    pub(crate) font_ref: Ref,
    pub(crate) char_to_gid: Option<HashMap<char, u16>>,
}

impl EmbeddedFont {
    pub(crate) fn encode(&self, text: &str) -> Vec<u8> {
        match &self.char_to_gid {
            Some(map) => encode_as_gids(text, map),
            None => to_winansi_bytes(text),
        }
    }
}

pub(crate) fn embed_face(
    pdf: &mut Pdf,
    face: &FontFace,
    used_chars: &HashSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> Result<EmbeddedFont> {
    let t0 = std::time::Instant::now();
    let font_ref = alloc();
    let embedded = match &face.data {
        FontData::Builtin(base) => {
            pdf.type1_font(font_ref)
                .base_font(Name(base.as_bytes()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
            EmbeddedFont {
                font_ref,
                char_to_gid: None,
            }
        }
        FontData::TrueType {
            data,
            face_index,
            ps_name,
        } => {
            let char_to_gid =
                embed_truetype(pdf, font_ref, ps_name, data, *face_index, used_chars, alloc)?;
            EmbeddedFont {
                font_ref,
                char_to_gid: Some(char_to_gid),
            }
        }
    };
    log::debug!(
        "embed_face: embedded={} chars={} → {:.1}ms",
        face.is_embedded(),
        used_chars.len(),
        t0.elapsed().as_secs_f64() * 1000.0,
    );
    Ok(embedded)
}

fn postscript_name(face: &Face) -> Option<String> {
    face.names()
        .into_iter()
        .find(|n| n.name_id == ttf_parser::name_id::POST_SCRIPT_NAME && n.is_unicode())
        .and_then(|n| n.to_string())
        .map(|s| s.replace(' ', ""))
        .filter(|s| !s.is_empty())
}

/// Embed a TrueType/OpenType font as a CIDFont (Type0 composite) with Identity-H encoding,
/// subsetted to the characters drawn in the document.
fn embed_truetype(
    pdf: &mut Pdf,
    font_ref: Ref,
    ps_name: &str,
    font_data: &[u8],
    face_index: u32,
    used_chars: &HashSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> Result<HashMap<char, u16>> {
    let face = Face::parse(font_data, face_index)
        .map_err(|e| Error::Font(format!("{ps_name}: {e}")))?;

    let units = face.units_per_em() as f32;
    let ascent = face.ascender() as f32 / units * 1000.0;
    let descent = face.descender() as f32 / units * 1000.0;
    let cap_height = face
        .capital_height()
        .map(|h| h as f32 / units * 1000.0)
        .unwrap_or(700.0);

    let bb = face.global_bounding_box();
    let bbox = Rect::new(
        bb.x_min as f32 / units * 1000.0,
        bb.y_min as f32 / units * 1000.0,
        bb.x_max as f32 / units * 1000.0,
        bb.y_max as f32 / units * 1000.0,
    );

    let mut remapper = subsetter::GlyphRemapper::new();
    let mut char_to_gid = HashMap::new();
    let mut gid_widths: Vec<(u16, f32)> = Vec::new();
    // Sorted so the subset's glyph order is stable between runs.
    let mut chars: Vec<char> = used_chars.iter().copied().collect();
    chars.sort_unstable();
    for ch in chars {
        if let Some(gid) = face.glyph_index(ch) {
            let new_gid = remapper.remap(gid.0);
            char_to_gid.insert(ch, new_gid);
            let w = face
                .glyph_hor_advance(gid)
                .map(|adv| adv as f32 / units * 1000.0)
                .unwrap_or(0.0);
            gid_widths.push((new_gid, w));
        }
    }
    gid_widths.sort_by_key(|&(gid, _)| gid);
    gid_widths.dedup_by_key(|&mut (gid, _)| gid);

    let subset_data = subsetter::subset(font_data, face_index, &remapper).unwrap_or_else(|e| {
        log::warn!("Font subsetting failed for {ps_name}: {e}; embedding full font");
        font_data.to_vec()
    });
    let data_len = i32::try_from(subset_data.len())
        .map_err(|_| Error::Font(format!("{ps_name}: font program too large")))?;

    let descriptor_ref = alloc();
    let data_ref = alloc();
    let cid_font_ref = alloc();
    let tounicode_ref = alloc();

    pdf.stream(data_ref, &subset_data)
        .pair(Name(b"Length1"), data_len);

    pdf.font_descriptor(descriptor_ref)
        .name(Name(ps_name.as_bytes()))
        .flags(pdf_writer::types::FontFlags::NON_SYMBOLIC)
        .bbox(bbox)
        .italic_angle(0.0)
        .ascent(ascent)
        .descent(descent)
        .cap_height(cap_height)
        .stem_v(80.0)
        .font_file2(data_ref);

    let system_info = pdf_writer::types::SystemInfo {
        registry: pdf_writer::Str(b"Adobe"),
        ordering: pdf_writer::Str(b"Identity"),
        supplement: 0,
    };
    {
        let mut cid = pdf.cid_font(cid_font_ref);
        cid.subtype(pdf_writer::types::CidFontType::Type2);
        cid.base_font(Name(ps_name.as_bytes()));
        cid.system_info(system_info);
        cid.font_descriptor(descriptor_ref);
        cid.default_width(0.0);
        cid.cid_to_gid_map_predefined(Name(b"Identity"));
        if !gid_widths.is_empty() {
            let mut w = cid.widths();
            for &(gid, width) in &gid_widths {
                w.consecutive(gid, [width]);
            }
        }
    }

    let cmap_name = format!("{ps_name}-UTF16");
    let mut cmap = pdf_writer::types::UnicodeCmap::new(
        Name(cmap_name.as_bytes()),
        pdf_writer::types::SystemInfo {
            registry: pdf_writer::Str(b"Adobe"),
            ordering: pdf_writer::Str(b"Identity"),
            supplement: 0,
        },
    );
    let mut mapped: Vec<(u16, char)> = char_to_gid.iter().map(|(&ch, &gid)| (gid, ch)).collect();
    mapped.sort_unstable();
    for (new_gid, ch) in mapped {
        cmap.pair(new_gid, ch);
    }
    let cmap_data = cmap.finish();
    pdf.stream(tounicode_ref, cmap_data.as_slice());

    pdf.type0_font(font_ref)
        .base_font(Name(ps_name.as_bytes()))
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_font_ref)
        .to_unicode(tounicode_ref);

    Ok(char_to_gid)
}

/// Replace what a single-byte font cannot draw: control chars become spaces, chars outside
/// Windows-1252 become `?`.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_control() {
                ' '
            } else if char_to_winansi(c) < 32 || c == '\u{7F}' {
                '?'
            } else {
                c
            }
        })
        .collect()
}

/// Windows-1252 (WinAnsi) byte to Unicode char mapping.
/// Bytes 0x80-0x9F are remapped; all others map directly to their Unicode codepoint.
fn winansi_to_char(byte: u8) -> char {
    match byte {
        0x80 => '\u{20AC}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8E => '\u{017D}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
        _ => byte as char,
    }
}

/// Map a single Unicode char to its WinAnsi byte, or 0 if unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007F => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF Str encoding.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .filter_map(|c| match char_to_winansi(c) {
            0 => None,
            b => Some(b),
        })
        .collect()
}

/// Encode UTF-8 text as big-endian 2-byte glyph IDs for CIDFont content streams.
fn encode_as_gids(text: &str, char_to_gid: &HashMap<char, u16>) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 2);
    for ch in text.chars() {
        let gid = char_to_gid.get(&ch).copied().unwrap_or(0);
        out.push((gid >> 8) as u8);
        out.push((gid & 0xFF) as u8);
    }
    out
}

/// AFM advance widths for ASCII 32..=126.
#[rustfmt::skip]
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Helvetica widths at 1000 units/em for WinAnsi bytes 32..=255. Accented Latin-1 letters
/// take the width of their base letter; the remaining upper half is approximated.
fn helvetica_widths(ascii: &[u16; 95]) -> Vec<f32> {
    let ascii_w = |c: char| ascii[(c as usize) - 32] as f32;
    (32u8..=255u8)
        .map(|b| match b {
            32..=126 => ascii[(b - 32) as usize] as f32,
            0x85 | 0x89 | 0x97 => 1000.0,
            0x91 | 0x92 | 0x82 => 222.0,
            0x93 | 0x94 | 0x84 => 333.0,
            0x95 => 350.0,
            0x96 | 0x80 => 556.0,
            0x99 => 1000.0,
            0xA0 => 278.0,
            0xAB | 0xBB => 556.0,
            0xB0 => 400.0,
            0xA9 | 0xAE => 737.0,
            0xC6 => 1000.0,
            0xE6 => 889.0,
            0xDF => 611.0,
            0xC0..=0xFF => match fold_latin1(b) {
                Some(base) => ascii_w(base),
                None => 556.0,
            },
            _ => 556.0,
        })
        .collect()
}

fn fold_latin1(b: u8) -> Option<char> {
    Some(match b {
        0xC0..=0xC5 => 'A',
        0xC7 => 'C',
        0xC8..=0xCB => 'E',
        0xCC..=0xCF => 'I',
        0xD1 => 'N',
        0xD2..=0xD6 | 0xD8 => 'O',
        0xD9..=0xDC => 'U',
        0xDD => 'Y',
        0xE0..=0xE5 => 'a',
        0xE7 => 'c',
        0xE8..=0xEB => 'e',
        0xEC..=0xEF => 'i',
        0xF1 => 'n',
        0xF2..=0xF6 | 0xF8 => 'o',
        0xF9..=0xFC => 'u',
        0xFD | 0xFF => 'y',
        _ => return None,
    })
}
