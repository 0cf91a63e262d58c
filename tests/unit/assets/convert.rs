use super::*;
use crate::diagnostics::MemorySink;

fn slots() -> Vec<AssetRef> {
    vec![
        AssetRef::located("uploads/me.jpg", AssetKind::UserSupplied, 1),
        AssetRef::located("generated/s-2.png", AssetKind::Generated, 2),
        AssetRef::empty(3),
    ]
}

fn converted(original: &str, to: &str) -> ConvertedAsset {
    ConvertedAsset {
        kind: AssetKind::Generated,
        original_locator: original.to_owned(),
        converted_locator: to.to_owned(),
    }
}

#[test]
fn request_splits_user_and_generated_and_skips_empty_slots() {
    let req = ConversionRequest::for_slots("st-1", &slots(), true);
    assert_eq!(req.user_asset_locator.as_deref(), Some("uploads/me.jpg"));
    assert_eq!(req.generated_asset_locators, vec!["generated/s-2.png".to_owned()]);
    assert!(req.test_mode);

    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(json["storyId"], "st-1");
    assert_eq!(json["generatedAssetLocators"][0], "generated/s-2.png");
}

#[test]
fn passthrough_maps_keys_to_native_locators() {
    let conv = PassthroughConverter::default();
    let req = ConversionRequest::for_slots("st-1", &slots(), false);
    let resp = conv.convert(&req).unwrap();
    assert!(resp.success);
    let out: Vec<_> = resp
        .converted_assets
        .iter()
        .map(|c| c.converted_locator.as_str())
        .collect();
    assert_eq!(
        out,
        vec![
            "s3://storiesofyou-incoming/uploads/me.jpg",
            "s3://storiesofyou-stories/generated/s-2.png"
        ]
    );
}

#[test]
fn passthrough_keeps_full_locators_and_cannot_render_info_slides() {
    let conv = PassthroughConverter::default();
    let req = ConversionRequest {
        story_id: "st".to_owned(),
        user_asset_locator: None,
        generated_asset_locators: vec!["s3://other/x-1.png".to_owned()],
        test_mode: false,
    };
    let resp = conv.convert(&req).unwrap();
    assert_eq!(resp.converted_assets[0].converted_locator, "s3://other/x-1.png");

    let err = conv
        .render_info_slide(&InfoSlideRequest {
            story_id: "st".to_owned(),
            narrator_name: "Ann".to_owned(),
            prompt: "p".to_owned(),
            output_key: "k".to_owned(),
        })
        .unwrap_err();
    assert!(err.is_recoverable());
}

#[test]
fn successful_conversion_replaces_locators_and_keeps_empty_slots() {
    let sink = MemorySink::new();
    let resp = ConversionResponse {
        success: true,
        converted_assets: vec![
            converted("uploads/me.jpg", "s3://conv/me.png"),
            converted("s3://src/generated/s-2.png", "s3://conv/s-2.png"),
        ],
        error: None,
    };
    let out = apply_conversion(&slots(), Ok(resp), &sink);
    let locs: Vec<_> = out.iter().map(|a| a.source_locator.as_deref()).collect();
    assert_eq!(
        locs,
        vec![Some("s3://conv/me.png"), Some("s3://conv/s-2.png"), None]
    );
    assert_eq!(out[0].kind, AssetKind::UserSupplied);
    assert_eq!(out[2].sequence_index, 3);
    assert!(sink.warnings().is_empty());
}

#[test]
fn unconverted_located_asset_is_dropped() {
    let sink = MemorySink::new();
    let resp = ConversionResponse {
        success: true,
        converted_assets: vec![converted("uploads/me.jpg", "s3://conv/me.png")],
        error: None,
    };
    let out = apply_conversion(&slots(), Ok(resp), &sink);
    assert_eq!(out.len(), 2);
    assert!(out[1].is_empty());
    assert_eq!(
        sink.warnings(),
        vec![Diagnostic::UnconvertedAssetDropped {
            locator: "generated/s-2.png".to_owned()
        }]
    );
}

#[test]
fn failed_conversion_yields_no_content() {
    let sink = MemorySink::new();
    let resp = ConversionResponse {
        success: false,
        converted_assets: vec![],
        error: Some("boom".to_owned()),
    };
    assert!(apply_conversion(&slots(), Ok(resp), &sink).is_empty());
    assert!(apply_conversion(&slots(), Err(ReelError::upstream("timeout")), &sink).is_empty());

    let reasons: Vec<_> = sink
        .warnings()
        .into_iter()
        .filter_map(|d| match d {
            Diagnostic::ConversionDegraded { reason } => Some(reason),
            _ => None,
        })
        .collect();
    assert_eq!(reasons.len(), 2);
    assert_eq!(reasons[0], "boom");
    assert!(reasons[1].contains("timeout"));
}
