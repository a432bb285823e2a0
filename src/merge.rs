//! Reconcile a proposed variation map with the collector's existing one.
//!
//! A proposal (API data, rule output, a spreadsheet edit, a manual override)
//! is authoritative for which variation types exist and for their structural
//! fields. The existing map is authoritative for ownership. The merged map
//! has exactly the proposed keys; every key also present in the existing map
//! takes `count`, `ordered`, `languages` and any unmigrated legacy `owned`
//! status from it.

use crate::models::{VariationKey, Variations};

/// What a merge did, for logging and run summaries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Keys only in the proposal.
    pub added: Vec<VariationKey>,
    /// Keys in both maps; ownership came from the existing map.
    pub carried: Vec<VariationKey>,
    /// Carried keys whose existing ownership was not the empty state.
    pub preserved_ownership: usize,
    /// Keys only in the existing map; absent from the result.
    pub dropped: Vec<VariationKey>,
    /// Dropped keys that held ownership data.
    pub dropped_with_ownership: Vec<VariationKey>,
}

impl MergeReport {
    /// True when the merge removed ownership the collector had entered.
    pub fn lost_ownership(&self) -> bool {
        !self.dropped_with_ownership.is_empty()
    }
}

/// Merge `proposed` into `existing`; see the module docs for the rules.
pub fn merge_variations(existing: &Variations, proposed: Variations) -> Variations {
    merge_variations_with_report(existing, proposed).0
}

/// [`merge_variations`] plus a [`MergeReport`] of the keys involved.
pub fn merge_variations_with_report(
    existing: &Variations,
    proposed: Variations,
) -> (Variations, MergeReport) {
    let mut report = MergeReport::default();

    for (key, old) in existing {
        if !proposed.contains_key(key) {
            report.dropped.push(key.clone());
            if old.has_ownership() {
                report.dropped_with_ownership.push(key.clone());
            }
        }
    }

    let merged = proposed
        .into_iter()
        .map(|(key, mut variation)| {
            match existing.get(&key) {
                Some(old) => {
                    variation.adopt_ownership(old);
                    if old.has_ownership() {
                        report.preserved_ownership += 1;
                    }
                    report.carried.push(key.clone());
                }
                None => report.added.push(key.clone()),
            }
            (key, variation)
        })
        .collect();

    (merged, report)
}
