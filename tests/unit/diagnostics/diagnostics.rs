use super::*;

#[test]
fn memory_sink_keeps_emission_order() {
    let sink = MemorySink::new();
    sink.emit(&Diagnostic::InfoSlideFallback {
        reason: "converter down".to_owned(),
    });
    sink.emit(&Diagnostic::LocatorRewritten {
        from: "https://a/x.png".to_owned(),
        to: "s3://a/x.png".to_owned(),
    });

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], Diagnostic::InfoSlideFallback { .. }));
    assert!(matches!(events[1], Diagnostic::LocatorRewritten { .. }));
    assert_eq!(sink.warnings().len(), 1);
}

#[test]
fn soft_invariant_violations_are_warnings() {
    let d = Diagnostic::TotalShorterThanNarration {
        total_seconds: 10.0,
        narration_seconds: 12.0,
    };
    assert_eq!(d.level(), Level::Warn);
    let d = Diagnostic::DurationResolved {
        quantity: DurationQuantity::Narration,
        seconds: 12.0,
        source: DurationSource::Field("storyDurationSeconds".to_owned()),
    };
    assert_eq!(d.level(), Level::Debug);
}

#[test]
fn diagnostics_serialize_with_kind_tag() {
    let d = Diagnostic::MissingContentSlot {
        slot: 2,
        expected_sequence: 3,
    };
    let v = serde_json::to_value(&d).unwrap();
    assert_eq!(v["kind"], "missing_content_slot");
    assert_eq!(v["expected_sequence"], 3);
}

#[test]
fn tracing_and_null_sinks_accept_everything() {
    let d = Diagnostic::Degraded {
        story_id: "s".to_owned(),
        reason: "r".to_owned(),
    };
    TracingSink.emit(&d);
    NullSink.emit(&d);
}
