//! Spreadsheet view tests.

mod common;

use card_catalog::csv_view::{read_sheet, read_sheet_file, write_sheet, write_sheet_file};
use card_catalog::models::{Card, Variation};
use common::{find, sample_cards, variation, En, Jp};

const HEADER: &str = "card_id,name,set,era,number,sheet_no,owned,imageUrl,url,enriched,enriched_method,variation_type,count,ordered,languages,default_language,available_languages,owned_status";

fn sheet_text(cards: &[Card]) -> String {
    let mut buf = Vec::new();
    write_sheet(cards, &mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

// ---------------------------------------------------------------------------
// write_sheet
// ---------------------------------------------------------------------------

#[test]
fn write_one_row_per_variation() {
    let cards = sample_cards();
    let mut buf = Vec::new();
    let rows = write_sheet(&cards, &mut buf).unwrap();
    // 2 + 2 variations, plus one row for the card without variations.
    assert_eq!(rows, 5);

    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], HEADER);
    assert_eq!(lines.len(), 6);
}

#[test]
fn write_joins_languages_with_pipe() {
    let text = sheet_text(&sample_cards());
    let normal = text
        .lines()
        .find(|l| l.starts_with("neo-genesis-17") && l.contains(",normal,"))
        .unwrap();
    assert!(normal.ends_with(",normal,2,false,EN,EN,EN|JP,"));
}

#[test]
fn write_card_without_variations_has_empty_variation_type() {
    let text = sheet_text(&sample_cards());
    let promo = text.lines().find(|l| l.starts_with("promo-tokyo")).unwrap();
    assert!(promo.ends_with(",false,,,,,,,,"));
}

// ---------------------------------------------------------------------------
// read_sheet
// ---------------------------------------------------------------------------

#[test]
fn round_trip_preserves_cards() {
    let cards = sample_cards();
    let text = sheet_text(&cards);
    let import = read_sheet(text.as_bytes()).unwrap();

    assert!(import.malformed.is_empty());
    assert_eq!(import.cards, cards);
}

#[test]
fn round_trip_keeps_legacy_status() {
    let mut cards = sample_cards();
    cards[0].variations.insert(
        "holo".into(),
        Variation {
            legacy_owned: Some("ordered".into()),
            ..variation(0, false, &[Jp], Some(En), &[En, Jp])
        },
    );

    let text = sheet_text(&cards);
    assert!(text.lines().any(|l| l.ends_with(",holo,0,false,JP,EN,EN|JP,ordered")));

    let import = read_sheet(text.as_bytes()).unwrap();
    assert_eq!(import.cards, cards);
    let holo = &import.cards[0].variations["holo"];
    assert_eq!(holo.legacy_owned.as_deref(), Some("ordered"));
    assert!(holo.has_ownership());
}

#[test]
fn round_trip_through_files() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("cards.csv");
    let cards = sample_cards();

    let rows = write_sheet_file(&path, &cards).unwrap();
    assert_eq!(rows, 5);
    let import = read_sheet_file(&path).unwrap();
    assert_eq!(import.cards, cards);
}

#[test]
fn read_groups_rows_in_first_seen_order() {
    let text = format!(
        "{HEADER}\n\
         b,Bulbasaur,,,,,,,,false,,normal,1,false,EN,EN,EN\n\
         a,Abra,,,,,,,,false,,normal,0,false,,EN,EN|JP\n\
         b,Bulbasaur,,,,,,,,false,,holo,0,true,,EN,EN|JP\n"
    );
    let import = read_sheet(text.as_bytes()).unwrap();
    let ids: Vec<_> = import.cards.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);

    let bulbasaur = find(&import.cards, "b");
    assert_eq!(bulbasaur.variations.len(), 2);
    assert!(bulbasaur.variations["holo"].ordered);
}

#[test]
fn read_takes_card_fields_from_first_row() {
    let text = format!(
        "{HEADER}\n\
         a,Abra,Base Set,Original,43,,,,,true,tcgdex,normal,1,false,EN,EN,EN\n\
         a,Kadabra,Jungle,Other,99,,,,,false,,holo,0,false,,EN,EN\n"
    );
    let import = read_sheet(text.as_bytes()).unwrap();
    let abra = &import.cards[0];
    assert_eq!(abra.name, "Abra");
    assert_eq!(abra.set, "Base Set");
    assert_eq!(abra.number, "43");
    assert!(abra.enriched);
    assert_eq!(abra.enriched_method.as_deref(), Some("tcgdex"));
}

#[test]
fn read_substitutes_malformed_count() {
    let text = format!(
        "{HEADER}\n\
         a,Abra,,,,,,,,false,,normal,N/A,false,,EN,EN\n\
         a,Abra,,,,,,,,false,,holo,,false,,EN,EN\n"
    );
    let import = read_sheet(text.as_bytes()).unwrap();
    let abra = &import.cards[0];
    assert_eq!(abra.variations["normal"].count, 0);
    assert_eq!(abra.variations["holo"].count, 0);

    // An empty cell is the default, not an error.
    assert_eq!(import.malformed.len(), 1);
    let bad = &import.malformed[0];
    assert_eq!(bad.row, 1);
    assert_eq!(bad.card_id, "a");
    assert_eq!(bad.column, "count");
    assert_eq!(bad.value, "N/A");
    assert_eq!(bad.substituted, "0");
}

#[test]
fn read_accepts_boolean_tokens() {
    let text = format!(
        "{HEADER}\n\
         a,Abra,,,,,,,,yes,,v1,0,TRUE,,,\n\
         a,Abra,,,,,,,,,,v2,0,1,,,\n\
         a,Abra,,,,,,,,,,v3,0,Yes,,,\n\
         a,Abra,,,,,,,,,,v4,0,no,,,\n\
         a,Abra,,,,,,,,,,v5,0,maybe,,,\n"
    );
    let import = read_sheet(text.as_bytes()).unwrap();
    let abra = &import.cards[0];
    assert!(abra.enriched);
    assert!(abra.variations["v1"].ordered);
    assert!(abra.variations["v2"].ordered);
    assert!(abra.variations["v3"].ordered);
    assert!(!abra.variations["v4"].ordered);
    assert!(!abra.variations["v5"].ordered);

    assert_eq!(import.malformed.len(), 1);
    assert_eq!(import.malformed[0].column, "ordered");
    assert_eq!(import.malformed[0].row, 5);
}

#[test]
fn read_drops_unknown_languages() {
    let text = format!(
        "{HEADER}\n\
         a,Abra,,,,,,,,false,,normal,1,false,EN|FR,XX,jp| en\n"
    );
    let import = read_sheet(text.as_bytes()).unwrap();
    let normal = &import.cards[0].variations["normal"];
    assert_eq!(normal.languages, [En].into_iter().collect());
    assert!(normal.default_language.is_none());
    assert_eq!(normal.available_languages, [En, Jp].into_iter().collect());

    let columns: Vec<_> = import.malformed.iter().map(|m| m.column).collect();
    assert_eq!(columns, vec!["languages", "default_language"]);
    assert_eq!(import.malformed[0].substituted, "EN");
}

#[test]
fn read_skips_rows_without_card_id() {
    let text = format!(
        "{HEADER}\n\
         ,Ghost,,,,,,,,false,,normal,1,false,,,\n\
         a,Abra,,,,,,,,false,,normal,1,false,,,\n"
    );
    let import = read_sheet(text.as_bytes()).unwrap();
    assert_eq!(import.cards.len(), 1);
    assert_eq!(import.malformed.len(), 1);
    assert_eq!(import.malformed[0].column, "card_id");
}

#[test]
fn read_skips_card_without_name() {
    let text = format!(
        "{HEADER}\n\
         a,,,,,,,,,false,,normal,1,false,,,,\n\
         b,Bulbasaur,,,,,,,,false,,normal,1,false,,,,\n\
         a,Abra,,,,,,,,false,,holo,1,false,,,,\n"
    );
    let import = read_sheet(text.as_bytes()).unwrap();
    let ids: Vec<_> = import.cards.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);

    let abra = find(&import.cards, "a");
    assert_eq!(abra.name, "Abra");
    assert_eq!(abra.variations.keys().collect::<Vec<_>>(), vec!["holo"]);

    assert_eq!(import.malformed.len(), 1);
    assert_eq!(import.malformed[0].row, 1);
    assert_eq!(import.malformed[0].column, "name");
    assert_eq!(import.malformed[0].substituted, "row skipped");
    assert!(card_catalog::catalog::validate(&import.cards).is_ok());
}

#[test]
fn read_sheet_without_status_column() {
    let old_header = HEADER.trim_end_matches(",owned_status");
    let text = format!(
        "{old_header}\n\
         a,Abra,,,,,,,,false,,normal,1,false,EN,EN,EN\n"
    );
    let import = read_sheet(text.as_bytes()).unwrap();
    assert!(import.malformed.is_empty());
    let normal = &import.cards[0].variations["normal"];
    assert_eq!(normal.count, 1);
    assert!(normal.legacy_owned.is_none());
}

#[test]
fn read_repeated_variation_keeps_later_row() {
    let text = format!(
        "{HEADER}\n\
         a,Abra,,,,,,,,false,,normal,1,false,,,\n\
         a,Abra,,,,,,,,false,,normal,4,false,,,\n"
    );
    let import = read_sheet(text.as_bytes()).unwrap();
    assert_eq!(import.cards[0].variations["normal"].count, 4);
}

#[test]
fn read_header_only_gives_empty_catalog() {
    let import = read_sheet(format!("{HEADER}\n").as_bytes()).unwrap();
    assert!(import.cards.is_empty());
    assert!(import.malformed.is_empty());
}
