//! Persisted per-story record of a submitted render job.

pub mod store;

use chrono::{DateTime, Utc};

use crate::foundation::error::ReelResult;
use crate::render::submit::SubmittedJob;
use crate::timeline::model::{PlacementKind, Role, Timeline, TimelinePlacement};

pub use store::{DirectoryStore, MemoryStore, ObjectStore, StoredObject};

/// Object key of the tracking record for `story_id`.
pub fn record_key(story_id: &str) -> String {
    format!("video-jobs/{story_id}.json")
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRecord {
    pub role: Role,
    pub layer: i32,
    pub start_seconds: f64,
    pub duration_seconds: f64,
    pub placement: PlacementKind,
    pub locator: Option<String>,
    pub fallback: bool,
}

impl From<&TimelinePlacement> for PlacementRecord {
    fn from(p: &TimelinePlacement) -> Self {
        Self {
            role: p.role(),
            layer: p.layer(),
            start_seconds: p.start_seconds(),
            duration_seconds: p.duration_seconds(),
            placement: p.placement(),
            locator: p.locator().map(str::to_owned),
            fallback: p.is_fallback(),
        }
    }
}

/// Story facts recorded alongside the job that are not part of the timeline.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JobDetails {
    pub narration_duration_seconds: f64,
    pub music_duration_seconds: f64,
    pub narrator_name: String,
    pub prompt: Option<String>,
    pub audio_locator: String,
    pub music_locator: Option<String>,
    pub image_conversion_success: bool,
    pub expected_output: String,
    pub estimated_cost: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub job_id: String,
    pub story_id: String,
    pub status: String,
    pub narration_duration_seconds: f64,
    pub music_duration_seconds: f64,
    pub total_duration_seconds: f64,
    pub placements: Vec<PlacementRecord>,
    pub has_background_music: bool,
    pub created_at: DateTime<Utc>,
    pub narrator_name: String,
    pub prompt: Option<String>,
    pub audio_locator: String,
    pub music_locator: Option<String>,
    pub image_conversion_success: bool,
    pub expected_output: String,
    pub estimated_cost: f64,
}

/// Writes one [`JobRecord`] per story. Re-recording a story replaces its record.
pub struct JobTracker<'a> {
    store: &'a dyn ObjectStore,
    clock: fn() -> DateTime<Utc>,
}

impl<'a> JobTracker<'a> {
    pub fn new(store: &'a dyn ObjectStore) -> Self {
        Self {
            store,
            clock: Utc::now,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Persist the record and return it with the key it was stored under.
    #[tracing::instrument(skip_all, fields(story_id = %story_id, job_id = %job.job_id))]
    pub fn record(
        &self,
        story_id: &str,
        timeline: &Timeline,
        job: &SubmittedJob,
        details: JobDetails,
    ) -> ReelResult<(String, JobRecord)> {
        let record = JobRecord {
            job_id: job.job_id.clone(),
            story_id: story_id.to_owned(),
            status: job.status.clone(),
            narration_duration_seconds: details.narration_duration_seconds,
            music_duration_seconds: details.music_duration_seconds,
            total_duration_seconds: timeline.total_duration_seconds(),
            placements: timeline.placements().iter().map(PlacementRecord::from).collect(),
            has_background_music: details.music_locator.is_some(),
            created_at: (self.clock)(),
            narrator_name: details.narrator_name,
            prompt: details.prompt,
            audio_locator: details.audio_locator,
            music_locator: details.music_locator,
            image_conversion_success: details.image_conversion_success,
            expected_output: details.expected_output,
            estimated_cost: details.estimated_cost,
        };

        let body = serde_json::to_vec_pretty(&record)?;
        let key = self.store.put(&record_key(story_id), &body, "application/json")?;
        tracing::debug!(%key, "job record stored");
        Ok((key, record))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tracker/tracker.rs"]
mod tests;
