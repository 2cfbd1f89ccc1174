mod common;

use serde_json::json;

use onboarding_report::report::suggested_filename;
use onboarding_report::{Error, parse_request, render_submission};

fn heading_order(texts: &[String], headings: &[&str]) -> Vec<usize> {
    headings
        .iter()
        .map(|h| {
            texts
                .iter()
                .position(|t| t == h)
                .unwrap_or_else(|| panic!("heading {h:?} missing"))
        })
        .collect()
}

#[test]
fn full_submission_renders_every_section_in_order() {
    let doc = common::layout(common::full_submission());
    let texts = common::all_texts(&doc);

    let order = heading_order(
        &texts,
        &[
            "Informations du client",
            "Entreprise",
            "Numéros de téléphone",
            "Postes téléphoniques",
            "Accueil téléphonique",
            "Autres informations",
        ],
    );
    assert!(order.windows(2).all(|w| w[0] < w[1]), "{order:?}");
    // additional_notes is blank, so its section has nothing to show
    assert!(!texts.iter().any(|t| t == "Remarques"));
    assert!(!texts.iter().any(|t| t == "Jours fériés"));
}

#[test]
fn answers_are_relabelled_and_formatted() {
    let texts = common::all_texts(&common::layout(common::full_submission()));
    for expected in [
        "Location de téléphones IP",
        "Menu bilingue, français en premier",
        "Utiliser la synthèse vocale pour mes messages",
        "(800) 555-1234 (800-RESP-ORG)",
        "(416) 555-0000",
        "Nom : Émilie Côté",
        "Statut : Traité",
        "Soumis le : 01/06/2024 09:30",
        "Device : T54W",
        "Voicemail : Oui",
        "Parking",
        "2 places",
    ] {
        assert!(texts.iter().any(|t| t == expected), "missing {expected:?}");
    }
}

#[test]
fn questions_are_numbered_across_sections() {
    let doc = common::layout(json!({
        "id": 2,
        "data": {
            "company_name": "A",
            "industry": "",
            "current_provider": "B",
            "additional_notes": "C"
        }
    }));
    let texts = common::all_texts(&doc);
    let numbers: Vec<&str> = texts
        .iter()
        .map(String::as_str)
        .filter(|t| matches!(*t, "1" | "2" | "3" | "4"))
        .collect();
    assert_eq!(numbers, ["1", "2", "3"]);
}

#[test]
fn header_shows_client_and_company() {
    let doc = common::layout(common::minimal_submission());
    let first = &doc.pages()[0];
    assert!(first.texts().any(|t| t == "Émilie Côté · Boulangerie Côté"));
    assert!(first.texts().any(|t| t == "Page 1"));
}

#[test]
fn requester_is_listed_with_their_role() {
    let doc = common::layout(json!({
        "submission": common::minimal_submission(),
        "requester": { "role": "agent", "full_name": "Julie Roy" }
    }));
    let texts = common::all_texts(&doc);
    assert!(texts.iter().any(|t| t == "Demandé par : Julie Roy (Agent)"));
}

#[test]
fn malformed_data_is_skipped_not_fatal() {
    let _ = env_logger::try_init();
    for data in [json!("oops"), json!([1, 2]), json!(null), json!({"seats": "n/a", "seat_count": {}})] {
        let mut submission = common::minimal_submission();
        submission["data"] = data;
        let doc = common::layout(submission);
        assert_eq!(doc.page_count(), 1);
        assert!(common::all_texts(&doc).iter().any(|t| t == "Informations du client"));
    }
}

#[test]
fn render_returns_bytes_filename_and_page_count() {
    let _ = env_logger::try_init();
    let request = common::request(common::full_submission());
    let report = render_submission(&request, &common::options()).expect("render");

    assert!(report.bytes.starts_with(b"%PDF-"));
    assert!(common::contains(&report.bytes, b"%%EOF"));
    assert_eq!(report.filename, "emilie-cote-1042.pdf");
    // flow pages plus the letter
    assert!(report.page_count >= 2);
    assert_eq!(common::media_boxes(&report.bytes).len(), report.page_count);
    assert!(common::contains(&report.bytes, b"(Entreprise)"));
}

#[test]
fn filename_falls_back_to_client() {
    let request = common::request(json!({ "id": "AB-12", "client": { "full_name": "  " } }));
    assert_eq!(suggested_filename(&request.submission), "client-ab-12.pdf");
    let request = common::request(json!({ "id": 3, "client": { "full_name": "Jean-François O'Neil" } }));
    assert_eq!(suggested_filename(&request.submission), "jean-francois-o-neil-3.pdf");
}

#[test]
fn request_may_be_wrapped_or_bare() {
    let bare = parse_request(br#"{"id": 5, "data": {"a": 1}}"#).expect("bare");
    assert_eq!(bare.submission.id.to_string(), "5");

    let wrapped = parse_request(br#"{"submission": {"id": "x"}, "requester": {"role": "admin"}}"#)
        .expect("wrapped");
    assert_eq!(wrapped.submission.id.to_string(), "x");
    assert_eq!(wrapped.requester.role, onboarding_report::Role::Admin);

    let odd_role = parse_request(br#"{"submission": {"id": 1}, "requester": {"role": "owner"}}"#)
        .expect("unknown role");
    assert_eq!(odd_role.requester.role, onboarding_report::Role::Unknown);
}

#[test]
fn bad_requests_are_rejected_before_rendering() {
    assert!(matches!(parse_request(b"[1, 2]"), Err(Error::InvalidInput(_))));
    assert!(matches!(parse_request(b"{not json"), Err(Error::Json(_))));
    assert!(matches!(parse_request(br#"{"data": {}}"#), Err(Error::Json(_))));
}

#[test]
fn render_file_writes_into_a_directory() {
    let _ = env_logger::try_init();
    let dir = std::env::temp_dir().join(format!("onboarding-report-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("temp dir");
    let input = dir.join("input.json");
    std::fs::write(&input, common::minimal_submission().to_string()).expect("write input");

    let written = onboarding_report::render_file(&input, &dir, &common::options()).expect("render");
    assert_eq!(written, dir.join("emilie-cote-7.pdf"));
    let bytes = std::fs::read(&written).expect("read output");
    assert!(bytes.starts_with(b"%PDF-"));

    std::fs::remove_dir_all(&dir).ok();
}
