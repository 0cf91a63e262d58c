//! Engine configuration.
//!
//! Every fixed number the composition stages need (structural durations, fallback narration
//! length, frame rate, brand assets, storage locations) lives in one [`EngineConfig`] that is
//! passed explicitly into the normalizer, composer and render job builder.

use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};

/// Durations of the structural elements that bracket the content interval.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FixedDurations {
    pub intro: f64,
    pub info_slide: f64,
    pub outro: f64,
}

impl FixedDurations {
    /// Sum of all structural durations; a composition must be longer than this.
    pub fn total(self) -> f64 {
        self.intro + self.info_slide + self.outro
    }
}

/// Locators of the branded structural imagery.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BrandAssets {
    /// Logo shown centered for the intro, the outro and as the content fallback.
    pub logo: String,
    /// Small logo composited in the corner during the content interval.
    pub corner_logo: String,
    /// Full-canvas background under everything else.
    pub background: String,
    /// Object key template for the generated info slide; `{story_id}` is substituted.
    pub info_slide_key: String,
    /// Bucket the info slide is written to.
    pub info_slide_bucket: String,
}

impl Default for BrandAssets {
    fn default() -> Self {
        Self {
            logo: "s3://storiesofyou-stories/logo.png".to_owned(),
            corner_logo:
                "https://raw.githubusercontent.com/StoriesOfYou/storiesofyou-site/main/logo.png"
                    .to_owned(),
            background: "s3://assets.storiesofyou.ai/warm-background.png".to_owned(),
            info_slide_key: "story-info-slides/{story_id}-info.png".to_owned(),
            info_slide_bucket: "storiesofyou-stories".to_owned(),
        }
    }
}

impl BrandAssets {
    pub fn info_slide_key_for(&self, story_id: &str) -> String {
        self.info_slide_key.replace("{story_id}", story_id)
    }
}

/// One object-store location whose public HTTPS form is rewritten to the native scheme.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StorageLocation {
    /// e.g. `https://bucket.s3.us-east-2.amazonaws.com/`
    pub https_prefix: String,
    /// e.g. `s3://bucket/`
    pub native_prefix: String,
}

impl StorageLocation {
    pub fn new(https_prefix: impl Into<String>, native_prefix: impl Into<String>) -> Self {
        Self {
            https_prefix: https_prefix.into(),
            native_prefix: native_prefix.into(),
        }
    }
}

fn default_storage_locations() -> Vec<StorageLocation> {
    vec![
        StorageLocation::new(
            "https://storiesofyou-stories.s3.us-east-2.amazonaws.com/",
            "s3://storiesofyou-stories/",
        ),
        StorageLocation::new(
            "https://storiesofyou-incoming.s3.us-east-2.amazonaws.com/",
            "s3://storiesofyou-incoming/",
        ),
        StorageLocation::new(
            "https://assets.storiesofyou.ai/",
            "s3://assets.storiesofyou.ai/",
        ),
    ]
}

/// Where and how the renderer writes the finished video.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Bucket holding finished videos and tracking records.
    pub bucket: String,
    /// Bucket holding the incoming narration audio and user uploads.
    pub incoming_bucket: String,
    pub name_modifier: String,
    pub container: String,
    pub video_bitrate: u32,
    pub audio_bitrate: u32,
    pub audio_sample_rate: u32,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            bucket: "storiesofyou-stories".to_owned(),
            incoming_bucket: "storiesofyou-incoming".to_owned(),
            name_modifier: "_complete".to_owned(),
            container: "MP4".to_owned(),
            video_bitrate: 3_000_000,
            audio_bitrate: 128_000,
            audio_sample_rate: 48_000,
        }
    }
}

impl OutputSettings {
    pub fn destination(&self, story_id: &str) -> String {
        format!("s3://{}/videos/{story_id}", self.bucket)
    }

    pub fn video_key(&self, story_id: &str) -> String {
        format!("videos/{story_id}{}.mp4", self.name_modifier)
    }

    pub fn narration_locator(&self, audio_key: &str) -> String {
        format!("s3://{}/{audio_key}", self.incoming_bucket)
    }

    pub fn user_asset_locator(&self, key: &str) -> String {
        format!("s3://{}/{key}", self.incoming_bucket)
    }

    pub fn generated_asset_locator(&self, key: &str) -> String {
        format!("s3://{}/{key}", self.bucket)
    }
}

/// Single injected configuration for the composition engine.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub intro_seconds: f64,
    pub info_slide_seconds: f64,
    pub outro_seconds: f64,
    /// Silence appended after narration when the event carries no total duration.
    pub outro_buffer_seconds: f64,
    /// Narration length assumed when the event carries none. A known weak spot: the
    /// real narration may be far shorter or longer.
    pub default_narration_seconds: f64,
    pub frame_rate: Fps,
    pub canvas: Canvas,
    pub insertion_fade_ms: u32,
    /// Opacity percent of the corner overlay.
    pub corner_opacity: u8,
    /// User asset keys that are placeholders rather than real uploads.
    pub placeholder_user_assets: Vec<String>,
    pub brand: BrandAssets,
    pub storage_locations: Vec<StorageLocation>,
    pub output: OutputSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            intro_seconds: 3.0,
            info_slide_seconds: 4.0,
            outro_seconds: 3.0,
            outro_buffer_seconds: 3.0,
            default_narration_seconds: 120.0,
            frame_rate: Fps::default(),
            canvas: Canvas::default(),
            insertion_fade_ms: 500,
            corner_opacity: 80,
            placeholder_user_assets: vec!["default-story-image.jpg".to_owned()],
            brand: BrandAssets::default(),
            storage_locations: default_storage_locations(),
            output: OutputSettings::default(),
        }
    }
}

impl EngineConfig {
    pub fn fixed_durations(&self) -> FixedDurations {
        FixedDurations {
            intro: self.intro_seconds,
            info_slide: self.info_slide_seconds,
            outro: self.outro_seconds,
        }
    }

    pub fn validate(&self) -> ReelResult<()> {
        let positive = [
            ("intro_seconds", self.intro_seconds),
            ("info_slide_seconds", self.info_slide_seconds),
            ("outro_seconds", self.outro_seconds),
            ("default_narration_seconds", self.default_narration_seconds),
        ];
        for (name, v) in positive {
            if !v.is_finite() || v <= 0.0 {
                return Err(ReelError::config(format!("{name} must be > 0 (got {v})")));
            }
        }
        if !self.outro_buffer_seconds.is_finite() || self.outro_buffer_seconds < 0.0 {
            return Err(ReelError::config("outro_buffer_seconds must be >= 0"));
        }
        Fps::new(self.frame_rate.num, self.frame_rate.den)?;
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ReelError::config("canvas width/height must be > 0"));
        }
        if self.corner_opacity > 100 {
            return Err(ReelError::config("corner_opacity is a percentage (0..=100)"));
        }
        if self.brand.logo.trim().is_empty() {
            return Err(ReelError::config("brand.logo must be non-empty"));
        }
        Ok(())
    }

    pub fn from_json_str(s: &str) -> ReelResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: &Path) -> ReelResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    pub fn is_placeholder_user_asset(&self, key: &str) -> bool {
        self.placeholder_user_assets.iter().any(|p| p == key)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
