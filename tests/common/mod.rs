#![allow(dead_code)]

use chrono::NaiveDate;
use serde_json::{Value, json};

use onboarding_report::fonts::FontSet;
use onboarding_report::pdf::{Document, DrawOp, Page, PageKind};
use onboarding_report::report::layout_document;
use onboarding_report::{RenderOptions, RenderRequest, parse_request};

/// Uncompressed streams and a fixed footer date so output bytes are deterministic.
pub fn options() -> RenderOptions {
    RenderOptions {
        process_date: NaiveDate::from_ymd_opt(2024, 6, 14),
        compress_streams: false,
        ..RenderOptions::default()
    }
}

pub fn request(value: Value) -> RenderRequest {
    parse_request(value.to_string().as_bytes()).expect("parse request")
}

pub fn layout(value: Value) -> Document {
    layout_document(&request(value), &options(), &FontSet::builtin())
}

pub fn minimal_submission() -> Value {
    json!({
        "id": 7,
        "status": "submitted",
        "client": { "full_name": "Émilie Côté", "company": "Boulangerie Côté" },
        "data": {}
    })
}

/// A realistic submission touching every planned section plus one unplanned key.
pub fn full_submission() -> Value {
    json!({
        "id": 1042,
        "status": "processed",
        "submitted_at": "2024-06-01T09:30:00Z",
        "processed_at": "2024-06-03T15:00:00Z",
        "client": {
            "full_name": "Émilie Côté",
            "email": "emilie@example.com",
            "company": "Boulangerie Côté",
            "phone": "514-555-0101",
            "notes": "Préfère être contactée le matin"
        },
        "data": {
            "company_name": "Boulangerie Côté inc.",
            "business_address": "12 rue Principale\nSherbrooke (Québec)",
            "employee_count": 14,
            "phone_number_strategy": "keep",
            "portability_choice": "yes",
            "portability_numbers": ["8005551234", "4165550000"],
            "current_provider": "Bell",
            "ip_phone_strategy": "rent",
            "seat_count": 3,
            "seats": [
                { "name": "Accueil", "extension": 101, "device": "T54W", "voicemail": true },
                { "name": "Cuisine", "extension": 102, "device": null },
                {}
            ],
            "menu_language": "fr_en",
            "menu_options": [
                { "key": 1, "destination": "Commandes" },
                { "key": 2, "destination": "Facturation" }
            ],
            "professional_recording": "tts",
            "holidays": [],
            "additional_notes": "",
            "parking": "2 places"
        }
    })
}

/// `count` seats, each with a paragraph of notes, to force many pages.
pub fn large_submission(count: usize) -> Value {
    let seats: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "name": format!("Poste {i}"),
                "extension": 100 + i,
                "notes": "Transfert vers la messagerie après quatre sonneries, renvoi vers le cellulaire en dehors des heures d'ouverture et pendant les jours fériés."
            })
        })
        .collect();
    json!({
        "id": "big-1",
        "client": { "full_name": "Grand Compte" },
        "data": { "seats": seats }
    })
}

pub fn letter_page(doc: &Document) -> Option<&Page> {
    doc.pages().iter().find(|p| p.kind == PageKind::Letter)
}

pub fn all_texts(doc: &Document) -> Vec<String> {
    doc.pages()
        .iter()
        .flat_map(|p| p.texts().map(str::to_string))
        .collect()
}

/// Text ops as `(x, y, text)`.
pub fn positioned_texts(page: &Page) -> Vec<(f32, f32, &str)> {
    page.ops()
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { x, y, text, .. } => Some((*x, *y, text.as_str())),
            _ => None,
        })
        .collect()
}

/// Every `/MediaBox [...]` of an uncompressed PDF, as (width, height).
pub fn media_boxes(pdf: &[u8]) -> Vec<(f32, f32)> {
    let text = String::from_utf8_lossy(pdf);
    let mut boxes = Vec::new();
    let mut rest = text.as_ref();
    while let Some(start) = rest.find("/MediaBox") {
        rest = &rest[start + "/MediaBox".len()..];
        let (Some(open), Some(close)) = (rest.find('['), rest.find(']')) else {
            break;
        };
        let nums: Vec<f32> = rest[open + 1..close]
            .split_whitespace()
            .filter_map(|s| s.parse().ok())
            .collect();
        if nums.len() == 4 {
            boxes.push((nums[2] - nums[0], nums[3] - nums[1]));
        }
        rest = &rest[close..];
    }
    boxes
}

pub fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// xorshift64*, enough to drive property-style loops reproducibly.
pub struct Rng(u64);

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    pub fn next(&mut self) -> u64 {
        self.0 ^= self.0 >> 12;
        self.0 ^= self.0 << 25;
        self.0 ^= self.0 >> 27;
        self.0.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    pub fn below(&mut self, n: usize) -> usize {
        (self.next() % n as u64) as usize
    }

    /// Printable text: words of 1..=40 chars from a Latin-1 heavy alphabet, with the odd
    /// very long token.
    pub fn text(&mut self) -> String {
        const ALPHABET: &[char] = &[
            'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q',
            'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', 'A', 'M', 'W', 'Z', '0', '7', 'é', 'è',
            'à', 'ç', 'Ô', '-', '/', '.', ',', '@', '\'', '(', ')', '€', '—',
        ];
        let words = self.below(30);
        let mut out = String::new();
        for _ in 0..words {
            let len = if self.below(10) == 0 { 40 + self.below(80) } else { 1 + self.below(12) };
            for _ in 0..len {
                out.push(ALPHABET[self.below(ALPHABET.len())]);
            }
            out.push(if self.below(5) == 0 { '\n' } else { ' ' });
        }
        out
    }
}
