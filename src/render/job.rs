use crate::config::EngineConfig;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::foundation::core::{Fps, Rect};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::audio::{AudioEncoding, AudioMix, AudioRefs};
use crate::render::locator::normalize_locator;
use crate::render::timecode::Timecode;
use crate::timeline::model::{BACKGROUND_LAYER, PlacementKind, Role, Timeline, TimelinePlacement};

/// Where and how the renderer writes the finished video.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputDescription {
    pub destination: String,
    pub name_modifier: String,
    pub container: String,
    pub video_codec: String,
    pub video_bitrate: u32,
    pub width: u32,
    pub height: u32,
    pub frame_rate: Fps,
}

/// One timed image overlay in the render job.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInsertion {
    pub locator: String,
    pub layer: i32,
    pub start_timecode: Timecode,
    pub duration_ms: u64,
    pub fade_in_ms: u32,
    pub fade_out_ms: u32,
    /// Percent.
    pub opacity: u8,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub ken_burns: bool,
    /// `None` for the base background.
    pub role: Option<Role>,
}

impl ImageInsertion {
    pub fn start_seconds(&self, fps: Fps) -> f64 {
        self.start_timecode.to_seconds(fps)
    }

    pub fn end_seconds(&self, fps: Fps) -> f64 {
        self.start_seconds(fps) + self.duration_ms as f64 / 1000.0
    }
}

/// Complete description handed to the render backend.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderJobSpec {
    pub story_id: String,
    pub output: OutputDescription,
    pub audio: AudioMix,
    pub audio_encoding: AudioEncoding,
    pub total_duration_ms: u64,
    /// Background first, then timeline placements in timeline order.
    pub insertions: Vec<ImageInsertion>,
}

fn millis(secs: f64) -> u64 {
    (secs * 1000.0).round().max(0.0) as u64
}

/// Converts a [`Timeline`] plus audio inputs into a [`RenderJobSpec`].
pub struct RenderJobBuilder<'a> {
    cfg: &'a EngineConfig,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> RenderJobBuilder<'a> {
    pub fn new(cfg: &'a EngineConfig, sink: &'a dyn DiagnosticSink) -> Self {
        Self { cfg, sink }
    }

    #[tracing::instrument(skip_all, fields(story_id = %story_id, placements = timeline.placements().len()))]
    pub fn build(
        &self,
        story_id: &str,
        timeline: &Timeline,
        audio: &AudioRefs,
    ) -> ReelResult<RenderJobSpec> {
        if timeline.placements().is_empty() {
            return Err(ReelError::render_job("timeline has no placements"));
        }

        let fps = self.cfg.frame_rate;
        let mut insertions = Vec::with_capacity(timeline.placements().len() + 1);
        insertions.push(self.background(timeline.total_duration_seconds(), fps)?);
        for (i, p) in timeline.placements().iter().enumerate() {
            insertions.push(self.insertion(i, p, fps)?);
        }

        let audio = AudioRefs {
            narration: self.locate(&audio.narration),
            music: audio.music.clone().map(|mut m| {
                m.locator = self.locate(&m.locator);
                m
            }),
        };

        let out = &self.cfg.output;
        Ok(RenderJobSpec {
            story_id: story_id.to_owned(),
            output: OutputDescription {
                destination: out.destination(story_id),
                name_modifier: out.name_modifier.clone(),
                container: out.container.clone(),
                video_codec: "H_264".to_owned(),
                video_bitrate: out.video_bitrate,
                width: self.cfg.canvas.width,
                height: self.cfg.canvas.height,
                frame_rate: fps,
            },
            audio: AudioMix::from_refs(&audio),
            audio_encoding: AudioEncoding::aac_stereo(out),
            total_duration_ms: millis(timeline.total_duration_seconds()),
            insertions,
        })
    }

    fn locate(&self, raw: &str) -> String {
        let out = normalize_locator(raw, &self.cfg.storage_locations);
        if out != raw {
            self.sink.emit(&Diagnostic::LocatorRewritten {
                from: raw.to_owned(),
                to: out.to_string(),
            });
        }
        out.into_owned()
    }

    fn background(&self, total_seconds: f64, fps: Fps) -> ReelResult<ImageInsertion> {
        let full = self.cfg.canvas.rect();
        let start_timecode = Timecode::from_seconds(0.0, fps)?;
        Ok(ImageInsertion {
            locator: self.locate(&self.cfg.brand.background),
            layer: BACKGROUND_LAYER,
            start_timecode,
            duration_ms: millis(total_seconds - start_timecode.to_seconds(fps)),
            fade_in_ms: 0,
            fade_out_ms: 0,
            opacity: 100,
            role: None,
            ..geometry(full)
        })
    }

    fn insertion(
        &self,
        index: usize,
        p: &TimelinePlacement,
        fps: Fps,
    ) -> ReelResult<ImageInsertion> {
        let locator = match p.locator() {
            Some(l) if !l.trim().is_empty() => l,
            _ => {
                return Err(ReelError::render_job(format!(
                    "placement {index} ({:?}) has no locator",
                    p.role()
                )));
            }
        };

        let opacity = match p.placement() {
            PlacementKind::Corner => self.cfg.corner_opacity,
            PlacementKind::Centered | PlacementKind::Fullscreen => 100,
        };
        let fade = self.cfg.insertion_fade_ms;
        // duration runs from the floored timecode so the end stays on the placement's end
        let start_timecode = Timecode::from_seconds(p.start_seconds(), fps)?;

        Ok(ImageInsertion {
            locator: self.locate(locator),
            layer: p.layer(),
            start_timecode,
            duration_ms: millis(p.end_seconds() - start_timecode.to_seconds(fps)),
            fade_in_ms: fade,
            fade_out_ms: fade,
            opacity,
            ken_burns: p.role() == Role::Content && !p.is_fallback(),
            role: Some(p.role()),
            ..geometry(p.placement().geometry(self.cfg.canvas))
        })
    }
}

// Placement rectangle only; callers fill in everything else.
fn geometry(r: Rect) -> ImageInsertion {
    ImageInsertion {
        locator: String::new(),
        layer: 0,
        start_timecode: Timecode {
            hours: 0,
            minutes: 0,
            seconds: 0,
            frames: 0,
        },
        duration_ms: 0,
        fade_in_ms: 0,
        fade_out_ms: 0,
        opacity: 100,
        x: r.x0.round() as i32,
        y: r.y0.round() as i32,
        width: r.width().round() as u32,
        height: r.height().round() as u32,
        ken_burns: false,
        role: None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/job.rs"]
mod tests;
