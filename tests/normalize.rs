use serde_json::{Value, json};

use onboarding_report::labels;
use onboarding_report::normalize::{NO, YES, NormalizedEntry, labelled, normalize, normalize_with_labels};

fn lines(entries: &[NormalizedEntry]) -> Vec<(usize, &str)> {
    entries.iter().map(|e| (e.depth, e.text.as_str())).collect()
}

#[test]
fn empty_values_produce_nothing() {
    for value in [
        Value::Null,
        json!({}),
        json!([]),
        json!(""),
        json!("   \n  "),
        json!({ "a": null, "b": "" }),
        json!([null, "", [], {}]),
        json!({ "nested": { "deeper": { "x": null } }, "list": [{}] }),
    ] {
        assert!(normalize(&value, 0).is_empty(), "{value} should normalize to nothing");
    }
}

#[test]
fn no_entry_is_ever_blank() {
    let value = json!({
        "a": [1, "", { "b": "  " }, { "c": "x\n\n  y  " }],
        "d": { "e": false, "f": [null] },
        "g": 0.0
    });
    for entry in normalize(&value, 0) {
        assert!(!entry.text.trim().is_empty());
    }
}

#[test]
fn primitives() {
    assert_eq!(lines(&normalize(&json!(true), 0)), [(0, YES)]);
    assert_eq!(lines(&normalize(&json!(false), 0)), [(0, NO)]);
    assert_eq!(lines(&normalize(&json!(12), 2)), [(2, "12")]);
    assert_eq!(lines(&normalize(&json!("ligne 1\n\n ligne 2 "), 0)), [(0, "ligne 1"), (0, "ligne 2")]);
}

#[test]
fn objects_become_labelled_lines() {
    let value = json!({ "seat_count": 3, "voicemail": true, "notes": null });
    assert_eq!(
        lines(&normalize(&value, 0)),
        [(0, "Seat Count : 3"), (0, "Voicemail : Oui")]
    );
}

#[test]
fn arrays_of_objects_are_numbered_items() {
    let value = json!([
        { "name": "Accueil", "extension": 101 },
        {},
        { "name": "Cuisine", "device": null }
    ]);
    assert_eq!(
        lines(&normalize(&value, 0)),
        [
            (0, "Item 1 :"),
            (1, "Name : Accueil"),
            (1, "Extension : 101"),
            (0, "Item 2 :"),
            (1, "Name : Cuisine"),
        ]
    );
}

#[test]
fn nested_structures_indent_one_level_per_depth() {
    let value = json!({
        "seats": [{ "name": "Accueil", "forwarding": { "after": 4, "to": "cellulaire" } }]
    });
    assert_eq!(
        lines(&normalize(&value, 0)),
        [
            (0, "Seats :"),
            (1, "Item 1 :"),
            (2, "Name : Accueil"),
            (2, "Forwarding :"),
            (3, "After : 4"),
            (3, "To : cellulaire"),
        ]
    );
}

#[test]
fn multi_line_field_is_split_under_its_label() {
    let value = json!({ "business_address": "12 rue Principale\nSherbrooke" });
    assert_eq!(
        lines(&normalize(&value, 0)),
        [(0, "Business Address :"), (1, "12 rue Principale"), (1, "Sherbrooke")]
    );
}

#[test]
fn choice_codes_are_relabelled() {
    let entries = normalize_with_labels(&json!("fr_en"), labels::menu_language, 0);
    assert_eq!(lines(&entries), [(0, "Menu bilingue, français en premier")]);

    let entries = normalize_with_labels(&json!("klingon"), labels::menu_language, 0);
    assert_eq!(lines(&entries), [(0, "klingon")]);
}

#[test]
fn labelled_field_uses_the_given_label() {
    assert_eq!(lines(&labelled("Courriel", &json!("a@b.c"), 0)), [(0, "Courriel : a@b.c")]);
    assert!(labelled("Courriel", &Value::Null, 0).is_empty());
    assert_eq!(
        lines(&labelled("Soumis le", &json!("2024-06-01T09:30:00Z"), 1)),
        [(1, "Soumis le : 01/06/2024 09:30")]
    );
}
