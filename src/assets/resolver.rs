use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::timeline::model::{AssetKind, AssetRef};

/// Number of content slots in every composition.
pub const CONTENT_SLOTS: usize = 3;

/// Sequence number encoded as the numeric suffix of a locator (`.../story-2.png` -> 2).
pub fn sequence_number(locator: &str) -> Option<u32> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"-(\d+)\.[A-Za-z0-9]+(?:[?#].*)?$").expect("static regex is valid")
    });
    re.captures(locator)?.get(1)?.as_str().parse().ok()
}

/// Pick the assets for the three content slots.
///
/// With a primary user asset the slots are `[user, generated #2, generated #3]`, otherwise
/// `[generated #1, #2, #3]`. Generated assets are matched by their numeric suffix, so the
/// result does not depend on the order they arrived in; duplicates of a number resolve to the
/// lexicographically smallest locator. A missing asset leaves an empty slot.
pub fn resolve(
    primary_user_asset: Option<&str>,
    generated: &[String],
    sink: &dyn DiagnosticSink,
) -> Vec<AssetRef> {
    let mut by_number = BTreeMap::<u32, &str>::new();
    for locator in generated {
        let Some(n) = sequence_number(locator) else {
            tracing::debug!(%locator, "generated asset has no sequence suffix; ignored");
            continue;
        };
        by_number
            .entry(n)
            .and_modify(|cur| {
                if locator.as_str() < *cur {
                    *cur = locator.as_str();
                }
            })
            .or_insert(locator.as_str());
    }

    let mut slots = Vec::with_capacity(CONTENT_SLOTS);
    let first_generated = match primary_user_asset {
        Some(user) => {
            slots.push(AssetRef::located(user, AssetKind::UserSupplied, 1));
            2
        }
        None => 1,
    };

    for n in first_generated..=CONTENT_SLOTS as u32 {
        match by_number.get(&n) {
            Some(locator) => slots.push(AssetRef::located(*locator, AssetKind::Generated, n)),
            None => {
                sink.emit(&Diagnostic::MissingContentSlot {
                    slot: n as usize,
                    expected_sequence: n,
                });
                slots.push(AssetRef::empty(n));
            }
        }
    }

    slots
}

#[cfg(test)]
#[path = "../../tests/unit/assets/resolver.rs"]
mod tests;
