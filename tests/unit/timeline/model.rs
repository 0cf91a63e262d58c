use super::*;

fn canvas() -> Canvas {
    Canvas {
        width: 1920,
        height: 1080,
    }
}

#[test]
fn placement_geometry_matches_renderer_layout() {
    let c = PlacementKind::Centered.geometry(canvas());
    assert_eq!((c.x0, c.y0, c.width(), c.height()), (660.0, 390.0, 600.0, 300.0));

    let k = PlacementKind::Corner.geometry(canvas());
    assert_eq!((k.x0, k.y0, k.width(), k.height()), (1520.0, 880.0, 300.0, 150.0));

    let f = PlacementKind::Fullscreen.geometry(canvas());
    assert_eq!((f.x0, f.y0, f.width(), f.height()), (0.0, 0.0, 1920.0, 1080.0));
}

#[test]
fn structural_roles() {
    assert!(Role::BrandIntro.is_structural());
    assert!(Role::BrandOutro.is_structural());
    assert!(Role::InfoSlide.is_structural());
    assert!(!Role::Content.is_structural());
    assert!(!Role::CornerOverlay.is_structural());
}

#[test]
fn spanning_derives_duration() {
    let p = TimelinePlacement::spanning(
        Some("s3://b/a.png".to_owned()),
        7.0,
        10.5,
        CONTENT_BASE_LAYER,
        Role::Content,
        PlacementKind::Fullscreen,
        AssetKind::Generated,
    );
    assert_eq!(p.duration_seconds(), 3.5);
    assert_eq!(p.end_seconds(), 10.5);
    assert!(!p.is_fallback());
    assert!(p.as_fallback().is_fallback());
}

fn structural(role: Role, start: f64, end: f64, layer: i32) -> TimelinePlacement {
    TimelinePlacement::spanning(
        Some("s3://b/logo.png".to_owned()),
        start,
        end,
        layer,
        role,
        PlacementKind::Centered,
        AssetKind::Structural,
    )
}

fn content(start: f64, end: f64, layer: i32) -> TimelinePlacement {
    TimelinePlacement::spanning(
        Some("s3://b/img.png".to_owned()),
        start,
        end,
        layer,
        Role::Content,
        PlacementKind::Fullscreen,
        AssetKind::Generated,
    )
}

fn valid_placements() -> Vec<TimelinePlacement> {
    vec![
        structural(Role::BrandIntro, 0.0, 3.0, BRAND_INTRO_LAYER),
        structural(Role::InfoSlide, 3.0, 7.0, INFO_SLIDE_LAYER),
        content(7.0, 10.0, CONTENT_BASE_LAYER),
        content(10.0, 13.0, CONTENT_BASE_LAYER + 1),
        structural(Role::CornerOverlay, 7.0, 13.0, CORNER_OVERLAY_LAYER),
        structural(Role::BrandOutro, 13.0, 16.0, BRAND_OUTRO_LAYER),
    ]
}

#[test]
fn validate_accepts_well_formed_timeline() {
    let t = Timeline::new(valid_placements(), 16.0, 7.0, 13.0);
    t.validate().unwrap();
    assert_eq!(t.content().count(), 2);
    assert_eq!(t.with_role(Role::BrandOutro).count(), 1);
}

#[test]
fn validate_rejects_content_gap() {
    let mut p = valid_placements();
    p[3] = content(10.5, 13.0, CONTENT_BASE_LAYER + 1);
    let err = Timeline::new(p, 16.0, 7.0, 13.0).validate().unwrap_err();
    assert!(matches!(err, ReelError::InvalidTimeline(_)));
}

#[test]
fn validate_rejects_placement_past_total() {
    let mut p = valid_placements();
    p[5] = structural(Role::BrandOutro, 13.0, 17.0, BRAND_OUTRO_LAYER);
    assert!(Timeline::new(p, 16.0, 7.0, 13.0).validate().is_err());
}

#[test]
fn validate_rejects_structural_below_overlay() {
    let mut p = valid_placements();
    p[0] = structural(Role::BrandIntro, 0.0, 3.0, 10);
    assert!(Timeline::new(p, 16.0, 7.0, 13.0).validate().is_err());
}

#[test]
fn validate_rejects_non_increasing_content_layers() {
    let mut p = valid_placements();
    p[3] = content(10.0, 13.0, CONTENT_BASE_LAYER);
    assert!(Timeline::new(p, 16.0, 7.0, 13.0).validate().is_err());
}

#[test]
fn validate_rejects_empty_timeline() {
    assert!(Timeline::new(Vec::new(), 16.0, 7.0, 13.0).validate().is_err());
}

#[test]
fn asset_ref_constructors() {
    let a = AssetRef::located("uploads/me.jpg", AssetKind::UserSupplied, 1);
    assert!(!a.is_empty());
    let e = AssetRef::empty(3);
    assert!(e.is_empty());
    assert_eq!(e.kind, AssetKind::Generated);
    assert_eq!(e.sequence_index, 3);
}

#[test]
fn timeline_json_keeps_roles_snake_case() {
    let t = Timeline::new(valid_placements(), 16.0, 7.0, 13.0);
    let v = serde_json::to_value(&t).unwrap();
    assert_eq!(v["placements"][0]["role"], "brand_intro");
    assert_eq!(v["placements"][4]["placement"], "centered");
    let back: Timeline = serde_json::from_value(v).unwrap();
    assert_eq!(back, t);
}
