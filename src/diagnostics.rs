//! Structured diagnostics emitted by the composition stages.
//!
//! Stages never log directly; they report typed [`Diagnostic`] values to an injected
//! [`DiagnosticSink`]. [`TracingSink`] forwards them to `tracing`, [`MemorySink`] keeps them
//! for assertions.

use std::sync::Mutex;

use crate::ingest::durations::{DurationQuantity, DurationSource};
use crate::timeline::model::Role;

/// Severity of a [`Diagnostic`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A duration was taken from an input field or derived from other durations.
    DurationResolved {
        quantity: DurationQuantity,
        seconds: f64,
        source: DurationSource,
    },
    /// No usable input existed; the configured fallback was used.
    DurationDefaulted {
        quantity: DurationQuantity,
        seconds: f64,
    },
    /// A field was present but could not be coerced to a valid duration.
    DurationRejected {
        quantity: DurationQuantity,
        key: String,
        raw: String,
    },
    TotalShorterThanNarration {
        total_seconds: f64,
        narration_seconds: f64,
    },
    /// A content slot has no asset; it still consumes its share of the content interval.
    MissingContentSlot { slot: usize, expected_sequence: u32 },
    /// The generated-asset list could not be parsed and was treated as empty.
    UnparsableAssetList { raw: String },
    UnparsableMusicSelection { raw: String },
    /// Image conversion failed or reported `success: false`; content falls back to structural.
    ConversionDegraded { reason: String },
    /// A located asset was dropped because the converter returned nothing for it.
    UnconvertedAssetDropped { locator: String },
    InfoSlideFallback { reason: String },
    LocatorRewritten { from: String, to: String },
    PlacementEmitted {
        role: Role,
        layer: i32,
        start_seconds: f64,
        duration_seconds: f64,
    },
    /// The whole story degraded to an audio-only delivery.
    Degraded { story_id: String, reason: String },
    /// A side effect after submission (tracking write) failed; the render job stands.
    TrackingFailed { story_id: String, reason: String },
}

impl Diagnostic {
    pub fn level(&self) -> Level {
        match self {
            Self::DurationResolved { .. } | Self::PlacementEmitted { .. } => Level::Debug,
            Self::LocatorRewritten { .. } => Level::Info,
            Self::DurationDefaulted { .. }
            | Self::DurationRejected { .. }
            | Self::TotalShorterThanNarration { .. }
            | Self::MissingContentSlot { .. }
            | Self::UnparsableAssetList { .. }
            | Self::UnparsableMusicSelection { .. }
            | Self::ConversionDegraded { .. }
            | Self::UnconvertedAssetDropped { .. }
            | Self::InfoSlideFallback { .. }
            | Self::Degraded { .. }
            | Self::TrackingFailed { .. } => Level::Warn,
        }
    }
}

/// Receiver for diagnostics. Implementations must be cheap; stages call `emit` inline.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: &Diagnostic);
}

/// Forwards diagnostics to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        let payload = serde_json::to_string(diagnostic).unwrap_or_default();
        match diagnostic.level() {
            Level::Debug => tracing::debug!(target: "storyreel", diagnostic = %payload),
            Level::Info => tracing::info!(target: "storyreel", diagnostic = %payload),
            Level::Warn => tracing::warn!(target: "storyreel", diagnostic = %payload),
        }
    }
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _diagnostic: &Diagnostic) {}
}

/// Collects diagnostics in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn events(&self) -> Vec<Diagnostic> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn warnings(&self) -> Vec<Diagnostic> {
        self.events()
            .into_iter()
            .filter(|d| d.level() == Level::Warn)
            .collect()
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, diagnostic: &Diagnostic) {
        match self.events.lock() {
            Ok(mut events) => events.push(diagnostic.clone()),
            Err(poisoned) => poisoned.into_inner().push(diagnostic.clone()),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/diagnostics/diagnostics.rs"]
mod tests;
