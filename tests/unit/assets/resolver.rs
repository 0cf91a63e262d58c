use super::*;
use crate::diagnostics::{MemorySink, NullSink};

fn keys(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| (*s).to_owned()).collect()
}

fn locators(slots: &[AssetRef]) -> Vec<Option<&str>> {
    slots.iter().map(|a| a.source_locator.as_deref()).collect()
}

#[test]
fn sequence_number_reads_numeric_suffix() {
    assert_eq!(sequence_number("generated-images/story-abc-2.png"), Some(2));
    assert_eq!(sequence_number("s3://b/x-13.jpeg"), Some(13));
    assert_eq!(sequence_number("https://h/x-3.png?sig=1"), Some(3));
    assert_eq!(sequence_number("generated-images/story.png"), None);
    assert_eq!(sequence_number("x-2"), None);
}

#[test]
fn user_asset_then_generated_two_and_three_regardless_of_order() {
    let orders = [
        keys(&["gen/s-3.png", "gen/s-2.png"]),
        keys(&["gen/s-2.png", "gen/s-3.png"]),
    ];
    for generated in orders {
        let slots = resolve(Some("uploads/me.jpg"), &generated, &NullSink);
        assert_eq!(
            locators(&slots),
            vec![Some("uploads/me.jpg"), Some("gen/s-2.png"), Some("gen/s-3.png")]
        );
        assert_eq!(slots[0].kind, AssetKind::UserSupplied);
        assert_eq!(slots[1].kind, AssetKind::Generated);
        let idx: Vec<_> = slots.iter().map(|a| a.sequence_index).collect();
        assert_eq!(idx, vec![1, 2, 3]);
    }
}

#[test]
fn without_user_asset_uses_generated_one_to_three() {
    let generated = keys(&["gen/s-2.png", "gen/s-3.png", "gen/s-1.png"]);
    let slots = resolve(None, &generated, &NullSink);
    assert_eq!(
        locators(&slots),
        vec![Some("gen/s-1.png"), Some("gen/s-2.png"), Some("gen/s-3.png")]
    );
}

#[test]
fn user_asset_skips_generated_one() {
    let generated = keys(&["gen/s-1.png", "gen/s-2.png", "gen/s-3.png"]);
    let slots = resolve(Some("me.jpg"), &generated, &NullSink);
    assert_eq!(slots.len(), CONTENT_SLOTS);
    assert!(!locators(&slots).contains(&Some("gen/s-1.png")));
}

#[test]
fn missing_assets_leave_empty_slots() {
    let sink = MemorySink::new();
    let slots = resolve(None, &keys(&["gen/s-2.png"]), &sink);
    assert_eq!(slots.len(), 3);
    assert_eq!(locators(&slots), vec![None, Some("gen/s-2.png"), None]);
    assert_eq!(slots[0].kind, AssetKind::Generated);
    assert_eq!(sink.warnings().len(), 2);
}

#[test]
fn nothing_available_yields_three_empty_slots() {
    let slots = resolve(None, &[], &NullSink);
    assert_eq!(slots.len(), 3);
    assert!(slots.iter().all(AssetRef::is_empty));
}

#[test]
fn duplicate_numbers_resolve_deterministically() {
    let a = resolve(None, &keys(&["gen/b-1.png", "gen/a-1.png"]), &NullSink);
    let b = resolve(None, &keys(&["gen/a-1.png", "gen/b-1.png"]), &NullSink);
    assert_eq!(a, b);
    assert_eq!(a[0].source_locator.as_deref(), Some("gen/a-1.png"));
}

#[test]
fn unnumbered_generated_assets_are_ignored() {
    let slots = resolve(None, &keys(&["gen/cover.png", "gen/s-1.png"]), &NullSink);
    assert_eq!(slots[0].source_locator.as_deref(), Some("gen/s-1.png"));
    assert!(slots[1].is_empty());
}
