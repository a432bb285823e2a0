//! Review sheet and language report tests.

mod common;

use card_catalog::review::{
    apply_review, language_review, read_review_sheet, write_language_review, write_review_sheet,
    ReviewAction,
};
use common::{find, sample_cards, variation, variations, En, Jp};

const REVIEW_HEADER: &str =
    "Card ID,Name,Set,Era,Number,URL,Current Variations,Updated Variations,Notes for QA";

// ---------------------------------------------------------------------------
// Variation review sheet
// ---------------------------------------------------------------------------

#[test]
fn export_lists_current_variation_keys() {
    let mut buf = Vec::new();
    write_review_sheet(&sample_cards(), &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], REVIEW_HEADER);
    assert_eq!(lines.len(), 4);
    assert!(lines[1].contains("\"first_edition, normal\""));
    assert!(lines[3].contains(",NONE,"));
}

#[test]
fn import_reads_decisions() {
    let text = format!(
        "{REVIEW_HEADER}\n\
         a,Abra,,,,,normal,\"normal, holo\",\n\
         b,Bulbasaur,,,,,normal,,\n\
         c,Charmander,,,,,normal,,please delete\n\
         d,Diglett,,,,,normal,NONE,\n\
         ,Ghost,,,,,,,\n"
    );
    let actions = read_review_sheet(text.as_bytes()).unwrap();
    assert_eq!(actions.len(), 4);

    let ReviewAction::Replace(a) = &actions["a"] else {
        panic!("expected replace for a");
    };
    assert_eq!(a.keys().collect::<Vec<_>>(), vec!["holo", "normal"]);

    // Empty updated column falls back to the current keys.
    let ReviewAction::Replace(b) = &actions["b"] else {
        panic!("expected replace for b");
    };
    assert_eq!(b.keys().collect::<Vec<_>>(), vec!["normal"]);

    assert_eq!(actions["c"], ReviewAction::Delete);
    assert_eq!(actions["d"], ReviewAction::Replace(Default::default()));
}

#[test]
fn apply_merges_deletes_and_keeps() {
    let cards = sample_cards();
    let text = format!(
        "{REVIEW_HEADER}\n\
         neo-genesis-17,Pikachu,,,,,,\"normal, holo\",\n\
         swsh-45,Wormadam,,,,,,,DELETE\n"
    );
    let actions = read_review_sheet(text.as_bytes()).unwrap();
    let (cards, summary) = apply_review(cards, &actions);

    assert_eq!(summary.updated, 1);
    assert_eq!(summary.deleted, 1);
    assert_eq!(summary.unchanged, 1);
    assert_eq!(summary.preserved, 1);
    assert_eq!(cards.len(), 2);

    let pikachu = find(&cards, "neo-genesis-17");
    assert_eq!(pikachu.variations.len(), 2);
    assert_eq!(pikachu.variations["normal"].count, 2);
    assert_eq!(pikachu.variations["normal"].languages, [En].into_iter().collect());
    assert_eq!(pikachu.variations["holo"].count, 0);
    assert!(!pikachu.variations.contains_key("first_edition"));

    assert!(cards.iter().all(|c| c.id != "swsh-45"));
}

// ---------------------------------------------------------------------------
// Language report
// ---------------------------------------------------------------------------

#[test]
fn language_report_flags_incomplete_availability() {
    let items = language_review(&sample_cards());
    let found: Vec<_> = items
        .iter()
        .map(|i| (i.card_id.as_str(), i.variation_type.as_str(), i.current_languages.as_str(), i.lang_count))
        .collect();
    assert_eq!(
        found,
        vec![
            ("neo-genesis-17", "first_edition", "EN", 1),
            ("swsh-45", "normal", "EN", 1),
            ("swsh-45", "reverse_holo", "NOT SET", 0),
        ]
    );
}

#[test]
fn language_report_skips_two_language_variations() {
    let mut cards = sample_cards();
    cards[0].variations = variations(vec![("normal", variation(0, false, &[], Some(En), &[En, Jp]))]);
    let items = language_review(&cards[..1]);
    assert!(items.is_empty());
}

#[test]
fn language_report_csv() {
    let items = language_review(&sample_cards());
    let mut buf = Vec::new();
    write_language_review(&items, &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "card_id,card_name,set,era,number,variation_type,current_languages,lang_count,url"
    );
    assert_eq!(text.lines().count(), 4);
}
