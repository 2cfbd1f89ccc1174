//! Phone number cleanup and toll-free Resp Org lookup for the portability letter.

use serde_json::Value;

/// Rows available in the letter's number table. Submitted numbers past this are dropped.
pub const MAX_PORTABILITY_NUMBERS: usize = 10;

/// Toll-free prefix → Resp Org label. Process-wide constant.
pub const RESP_ORG_TABLE: [(&str, &str); 10] = [
    ("800", "800-RESP-ORG"),
    ("811", "811-RESP-ORG"),
    ("822", "822-RESP-ORG"),
    ("833", "833-RESP-ORG"),
    ("844", "844-RESP-ORG"),
    ("855", "855-RESP-ORG"),
    ("866", "866-RESP-ORG"),
    ("877", "877-RESP-ORG"),
    ("888", "888-RESP-ORG"),
    ("899", "899-RESP-ORG"),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhoneEntry {
    pub raw: String,
    pub cleaned: String,
    pub supplier: Option<&'static str>,
}

impl PhoneEntry {
    pub fn from_raw(raw: &str) -> Self {
        let cleaned = clean(raw);
        let supplier = classify(&cleaned);
        Self {
            raw: raw.trim().to_string(),
            cleaned,
            supplier,
        }
    }

    pub fn display(&self) -> String {
        if self.cleaned.is_empty() {
            self.raw.clone()
        } else {
            format_display(&self.cleaned)
        }
    }
}

/// Digits only, with North-American trunk `1` prefixes stripped down to ten digits.
pub fn clean(raw: &str) -> String {
    let mut digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    while digits.len() > 10 && digits.starts_with('1') {
        digits.remove(0);
    }
    digits
}

pub fn classify(cleaned: &str) -> Option<&'static str> {
    if cleaned.len() < 3 || !cleaned.starts_with('8') {
        return None;
    }
    let prefix = &cleaned[..3];
    RESP_ORG_TABLE
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|(_, label)| *label)
}

/// `8005551234` → `(800) 555-1234`; other lengths are returned as given.
pub fn format_display(cleaned: &str) -> String {
    if cleaned.len() == 10 && cleaned.bytes().all(|b| b.is_ascii_digit()) {
        format!("({}) {}-{}", &cleaned[..3], &cleaned[3..6], &cleaned[6..])
    } else {
        cleaned.to_string()
    }
}

/// Numbers listed in a portability field: a JSON list of strings/numbers, or one string
/// separated by newlines, commas or semicolons. At most [`MAX_PORTABILITY_NUMBERS`].
pub fn portability_entries(value: &Value) -> Vec<PhoneEntry> {
    let mut raws: Vec<String> = Vec::new();
    collect_raw_numbers(value, &mut raws);

    let total = raws.len();
    let entries: Vec<PhoneEntry> = raws
        .iter()
        .take(MAX_PORTABILITY_NUMBERS)
        .map(|r| PhoneEntry::from_raw(r))
        .collect();
    if total > MAX_PORTABILITY_NUMBERS {
        log::debug!(
            "portability: {} numbers submitted, keeping the first {}",
            total,
            MAX_PORTABILITY_NUMBERS
        );
    }
    entries
}

fn collect_raw_numbers(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => out.extend(
            s.split(['\n', ',', ';'])
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
        ),
        Value::Number(n) => out.push(n.to_string()),
        Value::Array(items) => {
            for item in items {
                collect_raw_numbers(item, out);
            }
        }
        // `{ "number": "...", ... }` rows from the repeating-field widget
        Value::Object(map) => {
            if let Some(number) = ["number", "phone", "numero"].iter().find_map(|k| map.get(*k)) {
                collect_raw_numbers(number, out);
            }
        }
        Value::Null | Value::Bool(_) => {}
    }
}
