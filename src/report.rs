//! Section-by-section rendering of one submission.

use std::time::Instant;

use chrono::{DateTime, Local, NaiveDate};
use serde_json::Value;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::error::Result;
use crate::fonts::FontSet;
use crate::labels::{self, ChoiceLabels};
use crate::model::{RenderRequest, Submission, non_blank};
use crate::normalize::{NormalizedEntry, humanize_key, labelled, normalize, normalize_with_labels};
use crate::options::RenderOptions;
use crate::pdf::Document;
use crate::pdf::blocks::{answer_box, numbered_question, section_heading};
use crate::pdf::flow::FlowContext;
use crate::pdf::letter::{LetterInput, append_letter};
use crate::pdf::page::{PageChrome, PageFactory};
use crate::phone::portability_entries;

pub struct RenderedReport {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub page_count: usize,
}

struct Question {
    key: &'static str,
    label: &'static str,
    choices: Option<ChoiceLabels>,
}

const fn q(key: &'static str, label: &'static str) -> Question {
    Question {
        key,
        label,
        choices: None,
    }
}

const fn choice(key: &'static str, label: &'static str, choices: ChoiceLabels) -> Question {
    Question {
        key,
        label,
        choices: Some(choices),
    }
}

struct Section {
    title: &'static str,
    questions: &'static [Question],
}

const PORTABILITY_NUMBERS: &str = "portability_numbers";
const PORTABILITY_CHOICE: &str = "portability_choice";

const SECTIONS: &[Section] = &[
    Section {
        title: "Entreprise",
        questions: &[
            q("company_name", "Nom de l'entreprise"),
            q("business_address", "Adresse de l'entreprise"),
            q("industry", "Secteur d'activité"),
            q("employee_count", "Nombre d'employés"),
            q("billing_contact", "Responsable de la facturation"),
            q("opening_hours", "Heures d'ouverture"),
        ],
    },
    Section {
        title: "Numéros de téléphone",
        questions: &[
            choice(
                "phone_number_strategy",
                "Que souhaitez-vous faire avec vos numéros actuels ?",
                labels::phone_number_strategy,
            ),
            choice(
                PORTABILITY_CHOICE,
                "Souhaitez-vous transférer vos numéros existants ?",
                labels::portability_choice,
            ),
            q(PORTABILITY_NUMBERS, "Numéros à transférer"),
            q("current_provider", "Fournisseur actuel"),
            q("new_numbers", "Nouveaux numéros demandés"),
        ],
    },
    Section {
        title: "Postes téléphoniques",
        questions: &[
            choice(
                "ip_phone_strategy",
                "Comment souhaitez-vous équiper vos postes ?",
                labels::ip_phone_strategy,
            ),
            q("seat_count", "Nombre de postes"),
            q("seats", "Configuration des postes"),
            q("ring_groups", "Groupes de sonnerie"),
        ],
    },
    Section {
        title: "Accueil téléphonique",
        questions: &[
            choice("menu_language", "Langue du menu d'accueil", labels::menu_language),
            q("menu_options", "Options du menu"),
            choice(
                "professional_recording",
                "Souhaitez-vous un enregistrement professionnel ?",
                labels::professional_recording,
            ),
            q("greeting_message", "Message d'accueil"),
            q("after_hours_message", "Message hors des heures d'ouverture"),
            q("holidays", "Jours fériés"),
        ],
    },
    Section {
        title: "Remarques",
        questions: &[q("additional_notes", "Commentaires additionnels")],
    },
];

const CLIENT_SECTION: &str = "Informations du client";
const OTHER_SECTION: &str = "Autres informations";

/// Lay the submission out and serialize it.
pub fn render(request: &RenderRequest, options: &RenderOptions) -> Result<RenderedReport> {
    let t0 = Instant::now();
    let fonts = FontSet::load(&options.font_regular, &options.font_bold)?;
    let t_fonts = t0.elapsed();

    let doc = layout_document(request, options, &fonts);
    let page_count = doc.page_count();
    let t_layout = t0.elapsed();

    let title = format!("{} - {}", options.title, request.submission.client.display_name());
    let bytes = doc.finish(&fonts, &title, options.compress_streams)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: fonts={:.1}ms, layout={:.1}ms, finish={:.1}ms, total={:.1}ms ({} pages, {} bytes)",
        t_fonts.as_secs_f64() * 1000.0,
        (t_layout - t_fonts).as_secs_f64() * 1000.0,
        (t_total - t_layout).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        page_count,
        bytes.len(),
    );

    Ok(RenderedReport {
        bytes,
        filename: suggested_filename(&request.submission),
        page_count,
    })
}

/// Build the display list without serializing it.
pub fn layout_document(request: &RenderRequest, options: &RenderOptions, fonts: &FontSet) -> Document {
    let submission = &request.submission;
    let chrome = PageChrome {
        title: options.title.clone(),
        subtitle: subtitle(submission),
        process_date: process_date(submission, options).format("%d/%m/%Y").to_string(),
        brand: options.brand.clone(),
    };
    let factory = PageFactory::new(chrome);
    let mut doc = Document::new();

    {
        let mut ctx = FlowContext::start(fonts, &mut doc, &factory);

        let client = client_entries(request);
        if !client.is_empty() {
            ctx.alternate_column();
            section_heading(&mut ctx, CLIENT_SECTION);
            answer_box(&mut ctx, &client);
        }

        let mut number = 0;
        for section in SECTIONS {
            let answered: Vec<(String, Vec<NormalizedEntry>)> = section
                .questions
                .iter()
                .map(|question| (question.label.to_string(), answer(submission, question)))
                .filter(|(_, entries)| !entries.is_empty())
                .collect();
            render_section(&mut ctx, section.title, &answered, &mut number);
        }

        let others: Vec<(String, Vec<NormalizedEntry>)> = remaining_fields(submission)
            .map(|(key, value)| (humanize_key(key), normalize(value, 0)))
            .filter(|(label, entries)| !label.is_empty() && !entries.is_empty())
            .collect();
        render_section(&mut ctx, OTHER_SECTION, &others, &mut number);
    }

    if wants_portability(submission) {
        let numbers = portability_entries(submission.field(PORTABILITY_NUMBERS));
        let company = company_name(submission).unwrap_or("____________________");
        append_letter(
            &mut doc,
            fonts,
            &LetterInput {
                company,
                client_name: submission.client.display_name(),
                agent: &options.brand,
                numbers: &numbers,
                contact: &options.letter,
            },
        );
    }
    doc
}

fn render_section(
    ctx: &mut FlowContext<'_>,
    title: &str,
    questions: &[(String, Vec<NormalizedEntry>)],
    number: &mut usize,
) {
    if questions.is_empty() {
        log::debug!("section {title:?}: nothing to render, skipped");
        return;
    }
    ctx.alternate_column();
    section_heading(ctx, title);
    for (label, entries) in questions {
        if numbered_question(ctx, *number + 1, label, entries) {
            *number += 1;
        }
    }
}

fn answer(submission: &Submission, question: &Question) -> Vec<NormalizedEntry> {
    let value = submission.field(question.key);
    if question.key == PORTABILITY_NUMBERS {
        return portability_entries(value)
            .iter()
            .map(|entry| NormalizedEntry {
                depth: 0,
                text: match entry.supplier {
                    Some(supplier) => format!("{} ({supplier})", entry.display()),
                    None => entry.display(),
                },
            })
            .collect();
    }
    match question.choices {
        Some(choices) => normalize_with_labels(value, choices, 0),
        None => normalize(value, 0),
    }
}

/// Top-level `data` keys no planned question covers, in input order.
fn remaining_fields(submission: &Submission) -> impl Iterator<Item = (&String, &Value)> {
    submission
        .data
        .as_object()
        .into_iter()
        .flatten()
        .filter(|(key, _)| {
            !SECTIONS
                .iter()
                .flat_map(|s| s.questions.iter())
                .any(|q| q.key == key.as_str())
        })
}

fn client_entries(request: &RenderRequest) -> Vec<NormalizedEntry> {
    let submission = &request.submission;
    let client = &submission.client;
    let text = |s: &Option<String>| non_blank(s).map_or(Value::Null, |v| Value::String(v.to_string()));

    let mut entries = Vec::new();
    entries.extend(labelled("Nom", &text(&client.full_name), 0));
    entries.extend(labelled("Entreprise", &text(&client.company), 0));
    entries.extend(labelled("Courriel", &text(&client.email), 0));
    entries.extend(labelled("Téléphone", &text(&client.phone), 0));
    entries.extend(labelled("Notes", &text(&client.notes), 0));

    entries.extend(labelled("Soumission", &Value::String(format!("n° {}", submission.id)), 0));
    if let Some(status) = non_blank(&submission.status) {
        entries.extend(labelled("Statut", &Value::String(labels::resolve(labels::submission_status, status)), 0));
    }
    entries.extend(labelled("Soumis le", &text(&submission.submitted_at), 0));
    entries.extend(labelled("Traité le", &text(&submission.processed_at), 0));

    let requester = &request.requester;
    if let Some(name) = non_blank(&requester.full_name) {
        let by = format!("{name} ({})", labels::role(requester.role));
        entries.extend(labelled("Demandé par", &Value::String(by), 0));
    }
    entries
}

fn subtitle(submission: &Submission) -> String {
    let client = submission.client.display_name();
    match company_name(submission) {
        Some(company) if company != client => format!("{client} · {company}"),
        _ => client.to_string(),
    }
}

fn company_name(submission: &Submission) -> Option<&str> {
    submission
        .client
        .company_name()
        .or_else(|| submission.field("company_name").as_str().map(str::trim).filter(|s| !s.is_empty()))
}

fn process_date(submission: &Submission, options: &RenderOptions) -> NaiveDate {
    options
        .process_date
        .or_else(|| non_blank(&submission.processed_at).and_then(parse_date))
        .unwrap_or_else(|| Local::now().date_naive())
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(s)
        .map(|ts| ts.date_naive())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

/// `"yes"`, `"oui"` or `true`.
pub fn wants_portability(submission: &Submission) -> bool {
    match submission.field(PORTABILITY_CHOICE) {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "yes" | "oui"),
        _ => false,
    }
}

/// `<client-slug>-<id>.pdf`.
pub fn suggested_filename(submission: &Submission) -> String {
    let slug = slugify(submission.client.full_name.as_deref().unwrap_or(""));
    let slug = if slug.is_empty() { "client".to_string() } else { slug };
    let id = slugify(&submission.id.0);
    if id.is_empty() {
        format!("{slug}.pdf")
    } else {
        format!("{slug}-{id}.pdf")
    }
}

pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.nfd().filter(|c| !is_combining_mark(*c)) {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}
