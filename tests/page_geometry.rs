mod common;

use onboarding_report::pdf::{PAGE_HEIGHT, PAGE_WIDTH, PageKind};
use onboarding_report::render_submission;

#[test]
fn every_page_is_landscape_letter() {
    let cases = [
        ("minimal", common::minimal_submission()),
        ("full", common::full_submission()),
        ("large", common::large_submission(80)),
    ];

    println!();
    println!("+{:-<12}+{:-<8}+{:-<18}+", "", "", "");
    println!("| {:<10} | {:<6} | {:<16} |", "Case", "Pages", "MediaBox");
    println!("+{:-<12}+{:-<8}+{:-<18}+", "", "", "");

    for (name, value) in cases {
        let request = common::request(value);
        let report = render_submission(&request, &common::options()).expect("render");
        let boxes = common::media_boxes(&report.bytes);
        println!("| {:<10} | {:<6} | {:<16} |", name, report.page_count, format!("{:?}", boxes.first()));

        assert_eq!(boxes.len(), report.page_count, "{name}");
        for (w, h) in boxes {
            assert_eq!((w, h), (PAGE_WIDTH, PAGE_HEIGHT), "{name}");
        }
    }
    println!("+{:-<12}+{:-<8}+{:-<18}+", "", "", "");
}

#[test]
fn letter_is_always_the_last_page() {
    let doc = common::layout(common::full_submission());
    let kinds: Vec<PageKind> = doc.pages().iter().map(|p| p.kind).collect();
    assert_eq!(kinds.last(), Some(&PageKind::Letter));
    assert_eq!(kinds.iter().filter(|k| **k == PageKind::Letter).count(), 1);
    // the letter takes the next number after the flow pages and has no flow footer
    let letter = doc.pages().last().expect("pages");
    assert_eq!(letter.number, doc.page_count());
    assert!(!letter.texts().any(|t| t.starts_with("Page ")));
}
