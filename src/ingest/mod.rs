//! Upstream event ingestion: identity fields, asset lists and the three durations.

/// Alias lookup and fallback rules for narration/music/total durations.
pub mod durations;
/// Identity, asset and music fields of the upstream event.
pub mod event;

use serde_json::Value;

use crate::config::EngineConfig;
use crate::diagnostics::DiagnosticSink;
use crate::foundation::error::{ReelError, ReelResult};

pub use durations::{DurationQuantity, DurationSource, NormalizedDurations, ResolvedDuration};
pub use event::{MusicSelection, StoryEvent};

/// An upstream event after identity parsing and duration normalization.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct NormalizedInput {
    pub event: StoryEvent,
    pub durations: NormalizedDurations,
}

/// Parse and normalize a raw upstream event.
///
/// Fails with [`ReelError::MissingRequiredInput`] when the payload is not an object or lacks
/// story identity; every optional field degrades to a default and is reported to `sink`.
#[tracing::instrument(skip_all)]
pub fn normalize(
    raw: &Value,
    cfg: &EngineConfig,
    sink: &dyn DiagnosticSink,
) -> ReelResult<NormalizedInput> {
    let Some(map) = raw.as_object() else {
        return Err(ReelError::missing_input("event payload must be a JSON object"));
    };

    let event = StoryEvent::parse(map, sink)?;
    let music_hint = event.music.as_ref().and_then(|m| m.duration_seconds);
    let durations =
        durations::normalize_durations(map, event.music.is_some(), music_hint, cfg, sink);

    Ok(NormalizedInput { event, durations })
}
