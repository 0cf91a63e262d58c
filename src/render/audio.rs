use crate::config::OutputSettings;
use crate::ingest::MusicSelection;

/// Audio inputs of one composition.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AudioRefs {
    /// Storage-native locator of the narration track.
    pub narration: String,
    pub music: Option<MusicSelection>,
}

/// Gain and fade parameters applied to the background track.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MixProfile {
    pub narration_gain_db: i8,
    pub music_gain_db: i8,
    pub music_fade_in_ms: u32,
    pub music_fade_out_ms: u32,
    /// Start of the music relative to the narration.
    pub music_offset_ms: u32,
}

const fn profile(music_gain_db: i8, fade_in_s: u32, fade_out_s: u32) -> MixProfile {
    MixProfile {
        narration_gain_db: 0,
        music_gain_db,
        music_fade_in_ms: fade_in_s * 1000,
        music_fade_out_ms: fade_out_s * 1000,
        music_offset_ms: 0,
    }
}

pub const DEFAULT_MIX: MixProfile = profile(-15, 0, 0);

// Track moods take precedence over the broader category.
const MOOD_MIX: &[(&str, MixProfile)] = &[
    ("happy_celebration", profile(-14, 2, 4)),
    ("loss_sadness", profile(-18, 3, 5)),
    ("serious_contemplation", profile(-18, 4, 6)),
    ("nature_meditation", profile(-17, 4, 6)),
];

const CATEGORY_MIX: &[(&str, MixProfile)] = &[
    ("adventurous", profile(-15, 2, 3)),
    ("family", profile(-15, 2, 4)),
    ("nostalgic", profile(-16, 3, 5)),
    ("reflective", profile(-17, 4, 6)),
];

fn lookup(table: &[(&str, MixProfile)], key: Option<&str>) -> Option<MixProfile> {
    let key = key?.trim();
    table
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, p)| *p)
}

impl MixProfile {
    /// Static lookup by mood, then category, then [`DEFAULT_MIX`].
    pub fn for_selection(music: &MusicSelection) -> Self {
        lookup(MOOD_MIX, music.mood.as_deref())
            .or_else(|| lookup(CATEGORY_MIX, music.category.as_deref()))
            .unwrap_or(DEFAULT_MIX)
    }
}

/// How the renderer combines the audio inputs.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AudioMix {
    /// Narration only, copied through.
    Passthrough { narration: String },
    /// Narration mixed with an attenuated background track.
    TwoTrack {
        narration: String,
        music: String,
        profile: MixProfile,
    },
}

impl AudioMix {
    pub fn from_refs(refs: &AudioRefs) -> Self {
        match &refs.music {
            None => Self::Passthrough {
                narration: refs.narration.clone(),
            },
            Some(music) => Self::TwoTrack {
                narration: refs.narration.clone(),
                music: music.locator.clone(),
                profile: MixProfile::for_selection(music),
            },
        }
    }

    pub fn has_music(&self) -> bool {
        matches!(self, Self::TwoTrack { .. })
    }
}

/// Output audio encoding.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioEncoding {
    pub codec: String,
    pub bitrate: u32,
    pub sample_rate: u32,
    pub channels: u8,
}

impl AudioEncoding {
    pub fn aac_stereo(output: &OutputSettings) -> Self {
        Self {
            codec: "AAC".to_owned(),
            bitrate: output.audio_bitrate,
            sample_rate: output.audio_sample_rate,
            channels: 2,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/audio.rs"]
mod tests;
