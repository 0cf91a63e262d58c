use crate::foundation::core::{Canvas, Rect, Size, TIME_EPSILON, approx_eq};
use crate::foundation::error::{ReelError, ReelResult};
use crate::ingest::NormalizedDurations;

/// Compositing rank of the full-canvas background inserted by the render job builder.
pub const BACKGROUND_LAYER: i32 = 0;
/// Layer of the first content asset; each further asset sits one layer higher.
pub const CONTENT_BASE_LAYER: i32 = 20;
pub const CORNER_OVERLAY_LAYER: i32 = 50;
pub const BRAND_INTRO_LAYER: i32 = 97;
pub const INFO_SLIDE_LAYER: i32 = 98;
pub const BRAND_OUTRO_LAYER: i32 = 99;
/// Content layers must stay below the corner overlay.
pub const MAX_CONTENT_ASSETS: usize = (CORNER_OVERLAY_LAYER - CONTENT_BASE_LAYER) as usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    UserSupplied,
    Generated,
    Structural,
}

/// One visual asset destined for a content slot.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AssetRef {
    /// `None` marks an empty slot: it keeps its share of time and renders as the fallback image.
    pub source_locator: Option<String>,
    pub kind: AssetKind,
    /// 1-based slot position, the stable sort key.
    pub sequence_index: u32,
}

impl AssetRef {
    pub fn located(locator: impl Into<String>, kind: AssetKind, sequence_index: u32) -> Self {
        Self {
            source_locator: Some(locator.into()),
            kind,
            sequence_index,
        }
    }

    pub fn empty(sequence_index: u32) -> Self {
        Self {
            source_locator: None,
            kind: AssetKind::Generated,
            sequence_index,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.source_locator.is_none()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    BrandIntro,
    InfoSlide,
    Content,
    CornerOverlay,
    BrandOutro,
}

impl Role {
    pub fn is_structural(self) -> bool {
        matches!(self, Self::BrandIntro | Self::InfoSlide | Self::BrandOutro)
    }
}

/// Where on the canvas a placement is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementKind {
    Centered,
    Fullscreen,
    Corner,
}

const CENTERED_SIZE: Size = Size::new(600.0, 300.0);
const CORNER_SIZE: Size = Size::new(300.0, 150.0);
// right, bottom
const CORNER_MARGIN: Size = Size::new(100.0, 50.0);

impl PlacementKind {
    /// Fixed geometry of this placement kind on `canvas`.
    pub fn geometry(self, canvas: Canvas) -> Rect {
        let full = canvas.rect();
        match self {
            Self::Fullscreen => full,
            Self::Centered => Rect::from_center_size(full.center(), CENTERED_SIZE),
            Self::Corner => {
                let x1 = full.x1 - CORNER_MARGIN.width;
                let y1 = full.y1 - CORNER_MARGIN.height;
                Rect::new(x1 - CORNER_SIZE.width, y1 - CORNER_SIZE.height, x1, y1)
            }
        }
    }
}

/// One timed, layered element of a composition.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimelinePlacement {
    locator: Option<String>,
    start_seconds: f64,
    duration_seconds: f64,
    // kept alongside the duration so boundaries set by subtraction stay exact
    end_seconds: f64,
    layer: i32,
    role: Role,
    placement: PlacementKind,
    asset_kind: AssetKind,
    /// True when the fallback image stands in for a missing content asset.
    fallback: bool,
}

impl TimelinePlacement {
    /// Build a placement covering `[start, end)`.
    pub fn spanning(
        locator: Option<String>,
        start_seconds: f64,
        end_seconds: f64,
        layer: i32,
        role: Role,
        placement: PlacementKind,
        asset_kind: AssetKind,
    ) -> Self {
        Self {
            locator,
            start_seconds,
            duration_seconds: end_seconds - start_seconds,
            end_seconds,
            layer,
            role,
            placement,
            asset_kind,
            fallback: false,
        }
    }

    pub fn as_fallback(mut self) -> Self {
        self.fallback = true;
        self
    }

    pub fn locator(&self) -> Option<&str> {
        self.locator.as_deref()
    }

    pub fn start_seconds(&self) -> f64 {
        self.start_seconds
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn end_seconds(&self) -> f64 {
        self.end_seconds
    }

    pub fn layer(&self) -> i32 {
        self.layer
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn placement(&self) -> PlacementKind {
        self.placement
    }

    pub fn asset_kind(&self) -> AssetKind {
        self.asset_kind
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}

/// Inputs to the timeline composer for one story.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompositionRequest {
    pub narration_duration_seconds: f64,
    pub music_duration_seconds: f64,
    pub total_duration_seconds: f64,
    pub content_assets: Vec<AssetRef>,
    pub has_primary_user_asset: bool,
}

impl CompositionRequest {
    pub fn new(
        durations: &NormalizedDurations,
        content_assets: Vec<AssetRef>,
        has_primary_user_asset: bool,
    ) -> Self {
        Self {
            narration_duration_seconds: durations.narration_seconds(),
            music_duration_seconds: durations.music_seconds(),
            total_duration_seconds: durations.total_seconds(),
            content_assets,
            has_primary_user_asset,
        }
    }
}

/// Immutable, ordered set of placements for one composition.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Timeline {
    placements: Vec<TimelinePlacement>,
    total_duration_seconds: f64,
    content_start_seconds: f64,
    content_end_seconds: f64,
}

impl Timeline {
    pub(crate) fn new(
        placements: Vec<TimelinePlacement>,
        total_duration_seconds: f64,
        content_start_seconds: f64,
        content_end_seconds: f64,
    ) -> Self {
        Self {
            placements,
            total_duration_seconds,
            content_start_seconds,
            content_end_seconds,
        }
    }

    pub fn placements(&self) -> &[TimelinePlacement] {
        &self.placements
    }

    pub fn total_duration_seconds(&self) -> f64 {
        self.total_duration_seconds
    }

    pub fn content_start_seconds(&self) -> f64 {
        self.content_start_seconds
    }

    pub fn content_end_seconds(&self) -> f64 {
        self.content_end_seconds
    }

    pub fn with_role(&self, role: Role) -> impl Iterator<Item = &TimelinePlacement> {
        self.placements.iter().filter(move |p| p.role == role)
    }

    pub fn content(&self) -> impl Iterator<Item = &TimelinePlacement> {
        self.with_role(Role::Content)
    }

    /// Check the timing and layering invariants.
    pub fn validate(&self) -> ReelResult<()> {
        if self.placements.is_empty() {
            return Err(ReelError::invalid_timeline("timeline has no placements"));
        }

        for p in &self.placements {
            if !(p.start_seconds.is_finite() && p.end_seconds.is_finite()) {
                return Err(ReelError::invalid_timeline(format!(
                    "{:?} placement has non-finite bounds",
                    p.role
                )));
            }
            if p.start_seconds < -TIME_EPSILON || p.duration_seconds <= 0.0 {
                return Err(ReelError::invalid_timeline(format!(
                    "{:?} placement [{}, {}) is empty or negative",
                    p.role, p.start_seconds, p.end_seconds
                )));
            }
            if p.end_seconds > self.total_duration_seconds + TIME_EPSILON {
                return Err(ReelError::invalid_timeline(format!(
                    "{:?} placement ends at {} past total {}",
                    p.role, p.end_seconds, self.total_duration_seconds
                )));
            }
        }

        let mut cursor = self.content_start_seconds;
        let mut last_layer = None::<i32>;
        for p in self.content() {
            if !approx_eq(p.start_seconds, cursor) {
                return Err(ReelError::invalid_timeline(format!(
                    "content gap or overlap at {cursor} (next starts at {})",
                    p.start_seconds
                )));
            }
            if last_layer.is_some_and(|l| p.layer <= l) {
                return Err(ReelError::invalid_timeline(
                    "content layers must increase with asset index",
                ));
            }
            cursor = p.end_seconds;
            last_layer = Some(p.layer);
        }
        if last_layer.is_none() {
            return Err(ReelError::invalid_timeline("timeline has no content placement"));
        }
        if cursor != self.content_end_seconds {
            return Err(ReelError::invalid_timeline(format!(
                "content ends at {cursor}, expected {}",
                self.content_end_seconds
            )));
        }

        let max_content_layer = self.content().map(|p| p.layer).max().unwrap_or(BACKGROUND_LAYER);
        for p in &self.placements {
            let below = match p.role {
                Role::Content => BACKGROUND_LAYER,
                Role::CornerOverlay => max_content_layer,
                Role::BrandIntro | Role::InfoSlide | Role::BrandOutro => CORNER_OVERLAY_LAYER,
            };
            if p.layer <= below {
                return Err(ReelError::invalid_timeline(format!(
                    "{:?} placement on layer {} must be above layer {below}",
                    p.role, p.layer
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/model.rs"]
mod tests;
