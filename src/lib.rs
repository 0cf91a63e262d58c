//! Storyreel turns a narrated story (narration audio, optional background music, a handful of
//! images) into a render-job description for an external video renderer.
//!
//! One story flows through a fixed sequence of stages:
//!
//! - [`ingest::normalize`] parses the upstream event and resolves the three durations
//! - [`assets::resolver::resolve`] picks the three content slots
//! - [`ImageConverter`] converts the chosen images (external collaborator)
//! - [`compose`] derives the immutable [`Timeline`]
//! - [`RenderJobBuilder`] turns it into a [`RenderJobSpec`], submitted via [`RenderSubmitter`]
//! - [`JobTracker`] persists a per-story record
//!
//! [`StoryPipeline`] runs all of them and degrades to an audio-only outcome on failure.
#![forbid(unsafe_code)]

mod foundation;

pub mod assets;
/// Single injected engine configuration.
pub mod config;
pub mod diagnostics;
pub mod ingest;
/// End-to-end story processing.
pub mod pipeline;
pub mod render;
pub mod timeline;
pub mod tracker;

pub use crate::foundation::core::{Canvas, Fps, Rect, Size, TIME_EPSILON};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::assets::convert::{
    ConversionRequest, ConversionResponse, ConvertedAsset, ImageConverter, InfoSlideRequest,
    PassthroughConverter,
};
pub use crate::config::{EngineConfig, FixedDurations};
pub use crate::diagnostics::{Diagnostic, DiagnosticSink, MemorySink, NullSink, TracingSink};
pub use crate::pipeline::{PipelineOutcome, StoryPipeline, StoryPlan};
pub use crate::render::{
    AudioRefs, JobStatusReport, RenderJobBuilder, RenderJobSpec, RenderSubmitter, SpoolSubmitter,
    Timecode, query_status,
};
pub use crate::timeline::compose::{StructuralAssets, compose};
pub use crate::timeline::model::{AssetKind, AssetRef, CompositionRequest, Role, Timeline};
pub use crate::tracker::{DirectoryStore, JobTracker, ObjectStore};
