use super::*;
use crate::diagnostics::MemorySink;
use serde_json::json;

fn obj(v: Value) -> Map<String, Value> {
    v.as_object().cloned().unwrap()
}

#[test]
fn leading_number_mimics_lenient_parsing() {
    assert_eq!(leading_number("117"), Some(117.0));
    assert_eq!(leading_number("  117.5s"), Some(117.5));
    assert_eq!(leading_number(".5"), Some(0.5));
    assert_eq!(leading_number("1e2"), Some(100.0));
    assert_eq!(leading_number("abc"), None);
    assert_eq!(leading_number(""), None);
}

#[test]
fn coercion_respects_kind() {
    assert_eq!(Coercion::Number.apply(&json!(12.5)), Some(12.5));
    assert_eq!(Coercion::Number.apply(&json!("12.5")), None);
    assert_eq!(Coercion::NumericText.apply(&json!("12.5")), Some(12.5));
    assert_eq!(Coercion::NumericText.apply(&json!(12.5)), None);
    assert_eq!(Coercion::NumberOrText.apply(&json!("7")), Some(7.0));
    assert_eq!(Coercion::NumberOrText.apply(&json!(true)), None);
}

#[test]
fn first_valid_alias_wins_in_priority_order() {
    let raw = obj(json!({
        "storyDuration": 50,
        "story_duration": "40",
        "storyDurationSeconds": "0",
    }));
    let sink = MemorySink::new();
    let d = lookup(&raw, DurationQuantity::Narration, NARRATION_FIELDS, &sink).unwrap();
    assert_eq!(d.seconds, 40.0);
    assert_eq!(d.source, DurationSource::Field("story_duration".to_owned()));

    // The zero under the highest-priority key was reported, not silently skipped.
    assert!(sink.events().iter().any(|e| matches!(
        e,
        Diagnostic::DurationRejected { key, .. } if key == "storyDurationSeconds"
    )));
}

#[test]
fn null_fields_count_as_absent() {
    let raw = obj(json!({ "storyDurationSeconds": null, "storyDuration": 33 }));
    let sink = MemorySink::new();
    let d = lookup(&raw, DurationQuantity::Narration, NARRATION_FIELDS, &sink).unwrap();
    assert_eq!(d.seconds, 33.0);
    assert!(sink.events().is_empty());
}

#[test]
fn missing_total_is_narration_plus_buffer() {
    let raw = obj(json!({ "storyDurationSeconds": "117", "musicDurationSeconds": 90 }));
    let sink = MemorySink::new();
    let d = normalize_durations(&raw, true, None, &EngineConfig::default(), &sink);
    assert_eq!(d.narration_seconds(), 117.0);
    assert_eq!(d.music_seconds(), 90.0);
    assert_eq!(d.total_seconds(), 120.0);
    assert_eq!(d.total.source, DurationSource::Derived);
}

#[test]
fn missing_narration_falls_back_to_configured_default() {
    let raw = obj(json!({}));
    let sink = MemorySink::new();
    let d = normalize_durations(&raw, false, None, &EngineConfig::default(), &sink);
    assert_eq!(d.narration_seconds(), 120.0);
    assert_eq!(d.narration.source, DurationSource::Default);
    assert_eq!(d.total_seconds(), 123.0);
    assert!(sink.warnings().iter().any(|e| matches!(
        e,
        Diagnostic::DurationDefaulted {
            quantity: DurationQuantity::Narration,
            ..
        }
    )));
}

#[test]
fn no_music_forces_zero_music_duration() {
    let raw = obj(json!({ "storyDurationSeconds": 20, "musicDurationSeconds": 90 }));
    let sink = MemorySink::new();
    let d = normalize_durations(&raw, false, Some(60.0), &EngineConfig::default(), &sink);
    assert_eq!(d.music_seconds(), 0.0);
    assert_eq!(d.music.source, DurationSource::NoMusic);
}

#[test]
fn music_selection_duration_is_last_resort() {
    let raw = obj(json!({ "storyDurationSeconds": 20 }));
    let sink = MemorySink::new();
    let d = normalize_durations(&raw, true, Some(60.0), &EngineConfig::default(), &sink);
    assert_eq!(d.music_seconds(), 60.0);
    assert_eq!(d.music.source, DurationSource::MusicSelection);
}

#[test]
fn short_total_is_accepted() {
    let raw = obj(json!({ "storyDurationSeconds": 30, "videoTotalDuration": "25" }));
    let sink = MemorySink::new();
    let d = normalize_durations(&raw, false, None, &EngineConfig::default(), &sink);
    assert_eq!(d.total_seconds(), 25.0);
    assert_eq!(
        d.total.source,
        DurationSource::Field("videoTotalDuration".to_owned())
    );
}

#[test]
fn every_output_reports_its_source() {
    let raw = obj(json!({ "storyDurationSeconds": 20, "videoTotalDuration": 23 }));
    let sink = MemorySink::new();
    normalize_durations(&raw, false, None, &EngineConfig::default(), &sink);
    let resolved: Vec<_> = sink
        .events()
        .into_iter()
        .filter_map(|e| match e {
            Diagnostic::DurationResolved { quantity, .. } => Some(quantity),
            _ => None,
        })
        .collect();
    assert_eq!(
        resolved,
        vec![
            DurationQuantity::Narration,
            DurationQuantity::Music,
            DurationQuantity::Total
        ]
    );
}
