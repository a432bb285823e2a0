//! Heuristic tables that propose structural variation data.
//!
//! Each table is an ordered list of rules; the first rule whose predicate
//! matches decides the outcome. Predicates look only at the card and the
//! variation key, so every rule can be tested on its own.

use crate::merge::merge_variations;
use crate::models::{Card, Language, LanguageSet, Variation, VariationKey, Variations};

use Language::{En, Jp};

const MODERN_ERAS: &[&str] = &["Sun & Moon", "Sword & Shield", "Scarlet & Violet"];
const OLDER_ERAS: &[&str] = &[
    "EX",
    "Diamond Pearl",
    "Platinum",
    "Heart Gold Soul Silver",
    "Black and White",
    "X&Y",
    "e-cards",
    "Neo",
];
const MODERN_FINISHES: &[&str] = &["normal", "reverse_holo", "holo"];
const OLDER_FINISHES: &[&str] = &[
    "normal",
    "reverse_holo",
    "holo",
    "first_edition",
    "first_edition_holo",
];

fn key_has(key: &str, needles: &[&str]) -> bool {
    let key = key.to_lowercase();
    needles.iter().any(|n| key.contains(n))
}

// ---------------------------------------------------------------------------
// Language availability rules
// ---------------------------------------------------------------------------

/// One entry of the availability table.
pub struct LanguageRule {
    pub name: &'static str,
    pub applies: fn(&Card, &str) -> bool,
    pub languages: &'static [Language],
}

fn world_championship(_: &Card, key: &str) -> bool {
    key_has(key, &["world_championship"])
}

fn comic_con(_: &Card, key: &str) -> bool {
    key_has(key, &["comic-con", "comic_con"])
}

fn release_stamp(_: &Card, key: &str) -> bool {
    key_has(
        key,
        &["prerelese_stamp", "prerelease_stamp", "expansion stamp", "expansion_stamp"],
    )
}

fn fast_food(_: &Card, key: &str) -> bool {
    key_has(key, &["burger_king", "mcdonal"])
}

fn seasonal(_: &Card, key: &str) -> bool {
    key_has(
        key,
        &["trick_or_trade", "countdown_calendar", "holiday_calender", "holiday_calendar"],
    )
}

fn play_pokemon(_: &Card, key: &str) -> bool {
    key_has(key, &["play!_pokemon", "play_pokemon"])
}

fn tenth_anniversary(_: &Card, key: &str) -> bool {
    key_has(key, &["10th_anniversary"])
}

fn pokemon_center(_: &Card, key: &str) -> bool {
    key_has(key, &["pokemon_center"])
}

fn tropical_mega_battle(_: &Card, key: &str) -> bool {
    key_has(key, &["tropical_mega_battle"])
}

fn modern_base_finish(card: &Card, key: &str) -> bool {
    MODERN_ERAS.contains(&card.era.as_str()) && MODERN_FINISHES.contains(&key)
}

fn older_base_finish(card: &Card, key: &str) -> bool {
    OLDER_ERAS.contains(&card.era.as_str()) && OLDER_FINISHES.contains(&key)
}

fn unpeeled_ditto(_: &Card, key: &str) -> bool {
    key_has(key, &["unpeeled_ditto"])
}

fn cosmos_holo(_: &Card, key: &str) -> bool {
    key_has(key, &["cosmos_holo"])
}

fn promo_jumbo(card: &Card, key: &str) -> bool {
    key_has(key, &["jumbo"])
        && (card.set == "Unnumbered Releases" || card.set.to_lowercase().contains("promo"))
}

/// The availability table, highest priority first.
pub static LANGUAGE_RULES: &[LanguageRule] = &[
    LanguageRule { name: "world championship", applies: world_championship, languages: &[En] },
    LanguageRule { name: "comic-con", applies: comic_con, languages: &[En] },
    LanguageRule { name: "release stamp", applies: release_stamp, languages: &[En] },
    LanguageRule { name: "fast food promo", applies: fast_food, languages: &[En] },
    LanguageRule { name: "seasonal promo", applies: seasonal, languages: &[En] },
    LanguageRule { name: "play! pokemon", applies: play_pokemon, languages: &[En] },
    LanguageRule { name: "10th anniversary", applies: tenth_anniversary, languages: &[Jp] },
    LanguageRule { name: "pokemon center", applies: pokemon_center, languages: &[Jp] },
    LanguageRule { name: "tropical mega battle", applies: tropical_mega_battle, languages: &[Jp] },
    LanguageRule { name: "modern era base finish", applies: modern_base_finish, languages: &[En, Jp] },
    LanguageRule { name: "older era base finish", applies: older_base_finish, languages: &[En, Jp] },
    LanguageRule { name: "unpeeled ditto", applies: unpeeled_ditto, languages: &[En, Jp] },
    LanguageRule { name: "cosmos holo", applies: cosmos_holo, languages: &[En] },
    LanguageRule { name: "promo jumbo", applies: promo_jumbo, languages: &[Jp] },
];

/// First rule in `rules` that applies to `key` of `card`.
pub fn match_language_rule<'a>(
    rules: &'a [LanguageRule],
    card: &Card,
    key: &str,
) -> Option<&'a LanguageRule> {
    rules.iter().find(|rule| (rule.applies)(card, key))
}

/// A change made by [`apply_language_rules`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageFix {
    pub card_id: String,
    pub card_name: String,
    pub variation: VariationKey,
    pub rule: &'static str,
    pub before: LanguageSet,
    pub after: LanguageSet,
}

/// Rewrite `available_languages` wherever a rule applies and disagrees.
///
/// The rewritten map goes through the merge engine, so ownership is left as
/// it was. A `default_language` outside the new set moves into it.
pub fn apply_language_rules(cards: &mut [Card], rules: &[LanguageRule]) -> Vec<LanguageFix> {
    let mut fixes = Vec::new();

    for card in cards.iter_mut() {
        let mut proposed = card.variations.clone();
        for (key, variation) in proposed.iter_mut() {
            let Some(rule) = match_language_rule(rules, card, key) else {
                continue;
            };
            let after: LanguageSet = rule.languages.iter().copied().collect();
            if after == variation.available_languages {
                continue;
            }
            log::info!(
                "Fixed {} - {}: {:?} -> {:?} ({})",
                card.name,
                key,
                variation.available_languages,
                after,
                rule.name
            );
            fixes.push(LanguageFix {
                card_id: card.id.clone(),
                card_name: card.name.clone(),
                variation: key.clone(),
                rule: rule.name,
                before: variation.available_languages.clone(),
                after: after.clone(),
            });
            variation.set_available(after);
        }
        card.variations = merge_variations(&card.variations, proposed);
    }

    fixes
}

// ---------------------------------------------------------------------------
// Variation-key defaults
// ---------------------------------------------------------------------------

/// Structural defaults for a variation type known only by its key.
struct KeyRule {
    applies: fn(&str) -> bool,
    default: Language,
    available: &'static [Language],
}

fn english_only_promo(key: &str) -> bool {
    ["burger_king_2008", "countdown_calendar", "stamped", "mcdonald"].contains(&key)
}

fn japanese_key(key: &str) -> bool {
    key_has(key, &["japanese", "jp"])
}

fn any_key(_: &str) -> bool {
    true
}

static KEY_RULES: &[KeyRule] = &[
    KeyRule { applies: english_only_promo, default: En, available: &[En] },
    KeyRule { applies: japanese_key, default: Jp, available: &[Jp] },
    KeyRule { applies: any_key, default: En, available: &[En, Jp] },
];

/// Empty-ownership variation with the structural defaults for `key`.
pub fn variation_for_key(key: &str) -> Variation {
    KEY_RULES
        .iter()
        .find(|rule| (rule.applies)(key))
        .map(|rule| Variation::structural(rule.default, rule.available))
        .unwrap_or_default()
}

/// Parse a comma-separated list of variation keys (`"normal, reverse_holo"`).
///
/// `NONE` (any case) or an empty cell gives an empty map.
pub fn variations_from_key_list(list: &str) -> Variations {
    let list = list.trim();
    if list.is_empty() || list.eq_ignore_ascii_case("none") {
        return Variations::new();
    }
    list.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(|k| (k.to_string(), variation_for_key(k)))
        .collect()
}

// ---------------------------------------------------------------------------
// Era defaults
// ---------------------------------------------------------------------------

struct EraRule {
    eras: &'static [&'static str],
    keys: &'static [&'static str],
}

static ERA_RULES: &[EraRule] = &[
    EraRule { eras: &["Neo", "e-cards"], keys: &["reverse_holo", "first_edition"] },
    EraRule {
        eras: &["EX", "Diamond Pearl", "Platinum", "Heart Gold Soul Silver"],
        keys: &["reverse_holo"],
    },
    EraRule {
        eras: &["Black and White", "X&Y", "Sun & Moon", "Sword & Shield", "Scarlet & Violet"],
        keys: &["reverse_holo"],
    },
];

/// Variation types a card of `era` is expected to have; `normal` always.
pub fn era_variations(era: &str) -> Variations {
    let mut keys = vec!["normal"];
    if let Some(rule) = ERA_RULES.iter().find(|r| r.eras.contains(&era)) {
        keys.extend_from_slice(rule.keys);
    }
    keys.into_iter()
        .map(|k| (k.to_string(), variation_for_key(k)))
        .collect()
}
