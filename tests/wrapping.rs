mod common;

use common::Rng;
use onboarding_report::fonts::{FontSet, FontStyle, TextMeasurer};
use onboarding_report::pdf::layout::{clamp_to_width, wrap_lines, wrap_text};

const WIDTHS: [f32; 6] = [0.0, 4.0, 35.0, 120.0, 322.5, 1000.0];

fn non_space(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

#[test]
fn every_line_fits_its_width() {
    let fonts = FontSet::builtin();
    let mut rng = Rng::new(0x5eed);
    for _ in 0..400 {
        let text = rng.text();
        for width in WIDTHS {
            for (style, size) in [(FontStyle::Regular, 9.0), (FontStyle::Bold, 11.0)] {
                for line in wrap_text(&text, width, style, size, &fonts) {
                    let w = fonts.width(&line, style, size);
                    assert!(
                        w <= width || line.chars().count() == 1,
                        "{line:?} is {w}pt wide, limit {width}pt"
                    );
                }
            }
        }
    }
}

#[test]
fn wrapping_keeps_every_word_in_order() {
    let fonts = FontSet::builtin();
    let mut rng = Rng::new(42);
    for _ in 0..400 {
        let text = rng.text();
        for width in WIDTHS {
            let lines = wrap_text(&text, width, FontStyle::Regular, 9.0, &fonts);
            assert_eq!(non_space(&lines.concat()), non_space(&text));
            assert!(lines.iter().all(|l| !l.trim().is_empty()));
        }
    }
}

#[test]
fn short_words_are_never_split() {
    let fonts = FontSet::builtin();
    let text = "Transfert des numéros vers le nouveau fournisseur avant la fin du mois";
    let lines = wrap_text(text, 120.0, FontStyle::Regular, 9.0, &fonts);
    assert!(lines.len() > 1);
    let rejoined = lines.join(" ");
    assert_eq!(
        rejoined.split_whitespace().collect::<Vec<_>>(),
        text.split_whitespace().collect::<Vec<_>>()
    );
}

#[test]
fn long_token_falls_back_to_char_split() {
    let fonts = FontSet::builtin();
    let url = "https://exemple.com/portail/soumissions/1042/pieces-jointes/facture-fournisseur.pdf";
    let lines = wrap_text(url, 80.0, FontStyle::Regular, 9.0, &fonts);
    assert!(lines.len() >= 3);
    assert_eq!(lines.concat(), url);
}

#[test]
fn blank_input_yields_no_lines() {
    let fonts = FontSet::builtin();
    assert!(wrap_text("", 100.0, FontStyle::Regular, 9.0, &fonts).is_empty());
    assert!(wrap_text(" \n\t ", 100.0, FontStyle::Regular, 9.0, &fonts).is_empty());
}

#[test]
fn zero_width_gives_one_char_per_line() {
    let fonts = FontSet::builtin();
    let lines = wrap_text("abc de", 0.0, FontStyle::Regular, 9.0, &fonts);
    assert_eq!(lines, ["a", "b", "c", "d", "e"]);
}

#[test]
fn content_lines_carry_style_and_size() {
    let fonts = FontSet::builtin();
    let lines = wrap_lines("Nom : Côté", 500.0, FontStyle::Bold, 9.5, &fonts);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].text, "Nom : Côté");
    assert_eq!(lines[0].style, FontStyle::Bold);
    assert_eq!(lines[0].size, 9.5);
}

#[test]
fn clamp_drops_trailing_chars() {
    let fonts = FontSet::builtin();
    let clamped = clamp_to_width("WWWWWWWWWW", 40.0, FontStyle::Regular, 10.0, &fonts);
    assert!(clamped.len() < 10);
    assert!(fonts.width(&clamped, FontStyle::Regular, 10.0) <= 40.0);
    assert_eq!(clamp_to_width("ok", 40.0, FontStyle::Regular, 10.0, &fonts), "ok");
}
