use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::assets::convert::{
    ConversionRequest, ImageConverter, InfoSlideRequest, apply_conversion,
};
use crate::assets::resolver;
use crate::config::EngineConfig;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::foundation::error::ReelResult;
use crate::ingest::event::first_text;
use crate::ingest::{self, NormalizedInput};
use crate::render::audio::AudioRefs;
use crate::render::job::RenderJobBuilder;
use crate::render::submit::RenderSubmitter;
use crate::timeline::compose::{StructuralAssets, compose};
use crate::timeline::model::{AssetRef, CompositionRequest, Timeline};
use crate::tracker::{JobDetails, JobTracker, ObjectStore, record_key};

const COST_PER_MINUTE: f64 = 0.015;
const COST_PER_PLACEMENT: f64 = 0.001;

/// Rough render cost: billed per started minute plus a small per-image charge.
pub fn estimate_cost(duration_seconds: f64, placements: usize) -> f64 {
    (duration_seconds / 60.0).ceil() * COST_PER_MINUTE + placements as f64 * COST_PER_PLACEMENT
}

/// Everything derived for one story before anything is submitted.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct StoryPlan {
    pub input: NormalizedInput,
    /// Resolved slots after image conversion.
    pub content: Vec<AssetRef>,
    pub image_conversion_success: bool,
    pub info_slide_locator: String,
    pub timeline: Timeline,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingSummary {
    pub narration_seconds: f64,
    pub music_seconds: f64,
    pub total_seconds: f64,
    pub content_start_seconds: f64,
    pub content_end_seconds: f64,
    /// Silence after the longer of narration and music.
    pub silence_seconds: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedStory {
    pub story_id: String,
    pub job_id: String,
    pub status: String,
    pub video_key: String,
    pub expected_output: String,
    pub tracking_key: String,
    pub tracking_recorded: bool,
    pub timing: TimingSummary,
    pub estimated_cost: f64,
    pub placement_count: usize,
    pub info_slide_locator: String,
    pub has_background_music: bool,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioOnlyStory {
    pub story_id: String,
    pub reason: String,
    pub graceful_degradation: bool,
}

/// Result of processing one story. Failures degrade to [`PipelineOutcome::AudioOnly`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PipelineOutcome {
    Rendered(RenderedStory),
    AudioOnly(AudioOnlyStory),
}

impl PipelineOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered(_))
    }
}

/// Runs one story through normalize, resolve, convert, compose, build, submit and track.
///
/// Stages run sequentially; the pipeline holds no state between stories.
pub struct StoryPipeline<'a> {
    cfg: &'a EngineConfig,
    sink: &'a dyn DiagnosticSink,
    converter: &'a dyn ImageConverter,
    submitter: &'a dyn RenderSubmitter,
    store: &'a dyn ObjectStore,
    clock: fn() -> DateTime<Utc>,
}

impl<'a> StoryPipeline<'a> {
    pub fn new(
        cfg: &'a EngineConfig,
        sink: &'a dyn DiagnosticSink,
        converter: &'a dyn ImageConverter,
        submitter: &'a dyn RenderSubmitter,
        store: &'a dyn ObjectStore,
    ) -> Self {
        Self {
            cfg,
            sink,
            converter,
            submitter,
            store,
            clock: Utc::now,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Derive the timeline for `raw` without submitting anything.
    #[tracing::instrument(skip_all)]
    pub fn plan(&self, raw: &Value) -> ReelResult<StoryPlan> {
        let input = ingest::normalize(raw, self.cfg, self.sink)?;
        let event = &input.event;
        let primary = event.primary_user_asset(self.cfg);
        let slots = resolver::resolve(primary, &event.generated_asset_keys, self.sink);

        let info_slide_locator = self.info_slide(&input);

        let request = ConversionRequest::for_slots(&event.story_id, &slots, event.test_mode);
        let nothing_to_convert =
            request.user_asset_locator.is_none() && request.generated_asset_locators.is_empty();
        let (content, image_conversion_success) = if nothing_to_convert {
            (slots, true)
        } else {
            let outcome = self.converter.convert(&request);
            let success = matches!(&outcome, Ok(r) if r.success);
            (apply_conversion(&slots, outcome, self.sink), success)
        };

        let request =
            CompositionRequest::new(&input.durations, content.clone(), primary.is_some());
        let structural = StructuralAssets {
            logo: self.cfg.brand.logo.clone(),
            info_slide: info_slide_locator.clone(),
            corner_logo: self.cfg.brand.corner_logo.clone(),
        };
        let timeline = compose(&request, self.cfg.fixed_durations(), &structural, self.sink)?;

        Ok(StoryPlan {
            input,
            content,
            image_conversion_success,
            info_slide_locator,
            timeline,
        })
    }

    /// Process one story. Never fails: any error yields an audio-only outcome.
    #[tracing::instrument(skip_all)]
    pub fn process(&self, raw: &Value) -> PipelineOutcome {
        match self.try_process(raw) {
            Ok(rendered) => PipelineOutcome::Rendered(rendered),
            Err(e) => {
                let story_id = raw
                    .as_object()
                    .and_then(|m| first_text(m, &["storyId", "story_id"]))
                    .unwrap_or_else(|| "unknown".to_owned());
                self.sink.emit(&Diagnostic::Degraded {
                    story_id: story_id.clone(),
                    reason: e.to_string(),
                });
                PipelineOutcome::AudioOnly(AudioOnlyStory {
                    story_id,
                    reason: e.to_string(),
                    graceful_degradation: true,
                })
            }
        }
    }

    fn info_slide(&self, input: &NormalizedInput) -> String {
        let event = &input.event;
        let request = InfoSlideRequest {
            story_id: event.story_id.clone(),
            narrator_name: event.narrator_name.clone(),
            prompt: event.prompt.clone().unwrap_or_default(),
            output_key: self.cfg.brand.info_slide_key_for(&event.story_id),
        };
        match self.converter.render_info_slide(&request) {
            Ok(locator) if !locator.trim().is_empty() => locator,
            Ok(_) => self.info_slide_fallback("converter returned an empty locator".to_owned()),
            Err(e) => self.info_slide_fallback(e.to_string()),
        }
    }

    fn info_slide_fallback(&self, reason: String) -> String {
        self.sink.emit(&Diagnostic::InfoSlideFallback { reason });
        self.cfg.brand.logo.clone()
    }

    fn try_process(&self, raw: &Value) -> ReelResult<RenderedStory> {
        let plan = self.plan(raw)?;
        let event = &plan.input.event;
        let durations = &plan.input.durations;
        let timeline = &plan.timeline;
        let out = &self.cfg.output;

        let audio = AudioRefs {
            narration: if event.audio_key.contains("://") {
                event.audio_key.clone()
            } else {
                out.narration_locator(&event.audio_key)
            },
            music: event.music.clone(),
        };
        let spec =
            RenderJobBuilder::new(self.cfg, self.sink).build(&event.story_id, timeline, &audio)?;
        let job = self.submitter.submit(&spec)?;
        tracing::info!(story_id = %event.story_id, job_id = %job.job_id, "render job submitted");

        let placement_count = timeline.placements().len();
        let estimated_cost = estimate_cost(durations.narration_seconds(), placement_count);
        let video_key = out.video_key(&event.story_id);
        let expected_output = format!("s3://{}/{video_key}", out.bucket);

        let details = JobDetails {
            narration_duration_seconds: durations.narration_seconds(),
            music_duration_seconds: durations.music_seconds(),
            narrator_name: event.narrator_name.clone(),
            prompt: event.prompt.clone(),
            audio_locator: audio.narration.clone(),
            music_locator: audio.music.as_ref().map(|m| m.locator.clone()),
            image_conversion_success: plan.image_conversion_success,
            expected_output: expected_output.clone(),
            estimated_cost,
        };
        let tracker = JobTracker::new(self.store).with_clock(self.clock);
        let (tracking_key, tracking_recorded) =
            match tracker.record(&event.story_id, timeline, &job, details) {
                Ok((key, _)) => (key, true),
                Err(e) => {
                    self.sink.emit(&Diagnostic::TrackingFailed {
                        story_id: event.story_id.clone(),
                        reason: e.to_string(),
                    });
                    (record_key(&event.story_id), false)
                }
            };

        let narration = durations.narration_seconds();
        let music = durations.music_seconds();
        let total = timeline.total_duration_seconds();
        Ok(RenderedStory {
            story_id: event.story_id.clone(),
            job_id: job.job_id,
            status: job.status,
            video_key,
            expected_output,
            tracking_key,
            tracking_recorded,
            timing: TimingSummary {
                narration_seconds: narration,
                music_seconds: music,
                total_seconds: total,
                content_start_seconds: timeline.content_start_seconds(),
                content_end_seconds: timeline.content_end_seconds(),
                silence_seconds: total - narration.max(music),
            },
            estimated_cost,
            placement_count,
            info_slide_locator: plan.info_slide_locator.clone(),
            has_background_music: audio.music.is_some(),
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline/pipeline.rs"]
mod tests;
