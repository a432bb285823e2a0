//! Legacy ownership migration tests.

use card_catalog::migrate::{migrate_catalog, ownership_from_status};
use card_catalog::parse_catalog;

const LEGACY: &str = r#"[
  {
    "id": "a",
    "name": "Abra",
    "variations": {
      "normal": {"owned": "yes", "languages": ["EN"]},
      "holo": {"owned": "ordered"},
      "reverse_holo": {"owned": "no"}
    }
  },
  {
    "id": "b",
    "name": "Bulbasaur",
    "variations": {
      "normal": {"count": 2, "ordered": false, "languages": ["JP"]}
    }
  }
]"#;

#[test]
fn status_mapping() {
    assert_eq!(ownership_from_status("yes"), (1, false));
    assert_eq!(ownership_from_status(" YES "), (1, false));
    assert_eq!(ownership_from_status("ordered"), (0, true));
    assert_eq!(ownership_from_status("no"), (0, false));
    assert_eq!(ownership_from_status("whatever"), (0, false));
}

#[test]
fn migrate_converts_legacy_variations() {
    let mut cards = parse_catalog(LEGACY).unwrap();
    let report = migrate_catalog(&mut cards);

    assert_eq!(report.cards_touched, 1);
    assert_eq!(report.variations_migrated, 3);

    let abra = &cards[0].variations;
    assert_eq!((abra["normal"].count, abra["normal"].ordered), (1, false));
    assert_eq!((abra["holo"].count, abra["holo"].ordered), (0, true));
    assert_eq!((abra["reverse_holo"].count, abra["reverse_holo"].ordered), (0, false));
    assert!(abra.values().all(|v| v.legacy_owned.is_none()));
    assert_eq!(abra["normal"].languages.len(), 1);
}

#[test]
fn migrate_leaves_current_schema_alone() {
    let mut cards = parse_catalog(LEGACY).unwrap();
    let before = cards[1].clone();
    migrate_catalog(&mut cards);
    assert_eq!(cards[1], before);
}

#[test]
fn migrate_is_idempotent() {
    let mut cards = parse_catalog(LEGACY).unwrap();
    migrate_catalog(&mut cards);
    let once = cards.clone();

    let report = migrate_catalog(&mut cards);
    assert_eq!(report.variations_migrated, 0);
    assert_eq!(cards, once);
}

#[test]
fn migrated_catalog_serializes_without_owned_key() {
    let mut cards = parse_catalog(LEGACY).unwrap();
    migrate_catalog(&mut cards);
    let out = card_catalog::serialize_catalog(&cards).unwrap();
    assert!(!out.contains("\"owned\""));
}
