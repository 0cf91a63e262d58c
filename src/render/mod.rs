//! Render job construction and submission.

pub mod audio;
pub mod job;
pub mod locator;
pub mod submit;
pub mod timecode;

pub use audio::{AudioEncoding, AudioMix, AudioRefs, MixProfile};
pub use job::{ImageInsertion, OutputDescription, RenderJobBuilder, RenderJobSpec};
pub use locator::normalize_locator;
pub use submit::{
    JobStatus, JobStatusReport, MemorySubmitter, RenderSubmitter, SpoolSubmitter, SubmittedJob,
    query_status,
};
pub use timecode::Timecode;
