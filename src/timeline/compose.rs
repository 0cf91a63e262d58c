use crate::config::FixedDurations;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::foundation::core::TIME_EPSILON;
use crate::foundation::error::{ReelError, ReelResult};
use crate::timeline::model::{
    AssetKind, AssetRef, BRAND_INTRO_LAYER, BRAND_OUTRO_LAYER, CONTENT_BASE_LAYER,
    CORNER_OVERLAY_LAYER, CompositionRequest, INFO_SLIDE_LAYER, MAX_CONTENT_ASSETS,
    PlacementKind, Role, Timeline, TimelinePlacement,
};

/// Locators of the images that fill structural placements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructuralAssets {
    /// Brand logo: intro, outro, and stand-in for missing content.
    pub logo: String,
    pub info_slide: String,
    pub corner_logo: String,
}

/// Derive the timeline for one composition request.
///
/// Structural elements take fixed slices at both ends (`[0, intro)`, `[intro, content_start)`,
/// `[outro_start, total)`); the remainder is split evenly between content assets in request
/// order. Slice boundaries are computed from the slice index, and the last slice always ends
/// exactly at `outro_start`.
///
/// Fails with [`ReelError::InvalidTimeline`] when the total duration cannot hold the
/// structural elements.
#[tracing::instrument(skip_all, fields(total = request.total_duration_seconds, assets = request.content_assets.len()))]
pub fn compose(
    request: &CompositionRequest,
    fixed: FixedDurations,
    structural: &StructuralAssets,
    sink: &dyn DiagnosticSink,
) -> ReelResult<Timeline> {
    for (name, v) in [
        ("intro", fixed.intro),
        ("info slide", fixed.info_slide),
        ("outro", fixed.outro),
    ] {
        if !v.is_finite() || v < 0.0 {
            return Err(ReelError::invalid_timeline(format!(
                "{name} duration must be finite and >= 0 (got {v})"
            )));
        }
    }

    let total = request.total_duration_seconds;
    if !total.is_finite() {
        return Err(ReelError::invalid_timeline("total duration is not finite"));
    }

    let content_start = fixed.intro + fixed.info_slide;
    let outro_start = total - fixed.outro;
    let content_duration = outro_start - content_start;
    if content_duration <= 0.0 {
        return Err(ReelError::invalid_timeline(format!(
            "total duration {total}s cannot hold intro {}s + info slide {}s + outro {}s",
            fixed.intro, fixed.info_slide, fixed.outro
        )));
    }

    if total + TIME_EPSILON < request.narration_duration_seconds {
        sink.emit(&Diagnostic::TotalShorterThanNarration {
            total_seconds: total,
            narration_seconds: request.narration_duration_seconds,
        });
    }

    if request.content_assets.len() > MAX_CONTENT_ASSETS {
        return Err(ReelError::invalid_timeline(format!(
            "{} content assets exceed the {MAX_CONTENT_ASSETS} available content layers",
            request.content_assets.len()
        )));
    }

    let mut placements = Vec::with_capacity(request.content_assets.len() + 4);

    placements.push(TimelinePlacement::spanning(
        Some(structural.logo.clone()),
        0.0,
        fixed.intro,
        BRAND_INTRO_LAYER,
        Role::BrandIntro,
        PlacementKind::Centered,
        AssetKind::Structural,
    ));
    placements.push(TimelinePlacement::spanning(
        Some(structural.info_slide.clone()),
        fixed.intro,
        content_start,
        INFO_SLIDE_LAYER,
        Role::InfoSlide,
        PlacementKind::Fullscreen,
        AssetKind::Structural,
    ));

    // An all-empty slot list carries no imagery; it collapses into one fallback like an empty list.
    if request.content_assets.iter().all(AssetRef::is_empty) {
        placements.push(content_fallback(structural, content_start, outro_start, 0));
    } else {
        placements.extend(content_slices(
            &request.content_assets,
            structural,
            content_start,
            outro_start,
        ));
    }

    placements.push(TimelinePlacement::spanning(
        Some(structural.corner_logo.clone()),
        content_start,
        outro_start,
        CORNER_OVERLAY_LAYER,
        Role::CornerOverlay,
        PlacementKind::Corner,
        AssetKind::Structural,
    ));
    placements.push(TimelinePlacement::spanning(
        Some(structural.logo.clone()),
        outro_start,
        total,
        BRAND_OUTRO_LAYER,
        Role::BrandOutro,
        PlacementKind::Centered,
        AssetKind::Structural,
    ));

    for p in &placements {
        sink.emit(&Diagnostic::PlacementEmitted {
            role: p.role(),
            layer: p.layer(),
            start_seconds: p.start_seconds(),
            duration_seconds: p.duration_seconds(),
        });
    }

    let timeline = Timeline::new(placements, total, content_start, outro_start);
    timeline.validate()?;
    Ok(timeline)
}

fn content_slices(
    assets: &[AssetRef],
    structural: &StructuralAssets,
    content_start: f64,
    outro_start: f64,
) -> Vec<TimelinePlacement> {
    let count = assets.len();
    let per_asset = (outro_start - content_start) / count as f64;

    assets
        .iter()
        .enumerate()
        .map(|(i, asset)| {
            let start = content_start + per_asset * i as f64;
            let end = if i + 1 == count {
                outro_start
            } else {
                content_start + per_asset * (i + 1) as f64
            };
            match &asset.source_locator {
                Some(locator) => TimelinePlacement::spanning(
                    Some(locator.clone()),
                    start,
                    end,
                    content_layer(i),
                    Role::Content,
                    PlacementKind::Fullscreen,
                    asset.kind,
                ),
                None => content_fallback(structural, start, end, i),
            }
        })
        .collect()
}

fn content_fallback(
    structural: &StructuralAssets,
    start: f64,
    end: f64,
    index: usize,
) -> TimelinePlacement {
    TimelinePlacement::spanning(
        Some(structural.logo.clone()),
        start,
        end,
        content_layer(index),
        Role::Content,
        PlacementKind::Centered,
        AssetKind::Structural,
    )
    .as_fallback()
}

fn content_layer(index: usize) -> i32 {
    // index < MAX_CONTENT_ASSETS, checked by `compose`
    CONTENT_BASE_LAYER + index as i32
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/compose.rs"]
mod tests;
