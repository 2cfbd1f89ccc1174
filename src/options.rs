use std::path::PathBuf;

use chrono::NaiveDate;

use crate::fonts::FontSource;
use crate::pdf::letter::LetterContact;

pub const DEFAULT_TITLE: &str = "Rapport d'intégration";
pub const DEFAULT_BRAND: &str = "Portail d'intégration";

const ENV_FONT: &str = "ONBOARDING_REPORT_FONT";
const ENV_FONT_BOLD: &str = "ONBOARDING_REPORT_FONT_BOLD";
const ENV_BRAND: &str = "ONBOARDING_REPORT_BRAND";
const ENV_NO_COMPRESS: &str = "ONBOARDING_REPORT_NO_COMPRESS";

/// Everything about a render that is not in the submission itself.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderOptions {
    pub title: String,
    /// Printed in every footer and named as the mandatary in the letter.
    pub brand: String,
    /// Date in the footers. Falls back to `processed_at`, then today.
    pub process_date: Option<NaiveDate>,
    pub font_regular: FontSource,
    pub font_bold: FontSource,
    pub compress_streams: bool,
    pub letter: LetterContact,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            brand: DEFAULT_BRAND.to_string(),
            process_date: None,
            font_regular: FontSource::Builtin,
            font_bold: FontSource::Builtin,
            compress_streams: true,
            letter: LetterContact::default(),
        }
    }
}

impl RenderOptions {
    /// Defaults, overridden by the `ONBOARDING_REPORT_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut options = Self::default();

        if let Some(path) = var(ENV_FONT) {
            options.font_regular = FontSource::File(PathBuf::from(path));
            // A lone regular face is used for bold text too rather than mixing families.
            options.font_bold = options.font_regular.clone();
        }
        if let Some(path) = var(ENV_FONT_BOLD) {
            options.font_bold = FontSource::File(PathBuf::from(path));
        }
        if let Some(brand) = var(ENV_BRAND) {
            options.brand = brand;
        }
        if let Some(flag) = var(ENV_NO_COMPRESS) {
            options.compress_streams = matches!(flag.to_ascii_lowercase().as_str(), "0" | "false" | "no");
        }
        options
    }
}
