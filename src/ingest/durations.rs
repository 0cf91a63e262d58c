use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::config::EngineConfig;
use crate::diagnostics::{Diagnostic, DiagnosticSink};

/// The three logical durations carried by an upstream event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationQuantity {
    Narration,
    Music,
    Total,
}

impl DurationQuantity {
    /// Whether `secs` is an acceptable value for this quantity.
    fn accepts(self, secs: f64) -> bool {
        match self {
            Self::Narration | Self::Total => secs.is_finite() && secs > 0.0,
            Self::Music => secs.is_finite() && secs >= 0.0,
        }
    }
}

/// Which input satisfied a resolved duration.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "from", content = "key", rename_all = "snake_case")]
pub enum DurationSource {
    /// A top-level event field.
    Field(String),
    /// The `duration_seconds` of the parsed music selection.
    MusicSelection,
    /// Computed from other durations (total = narration + outro buffer).
    Derived,
    /// Configured fallback.
    Default,
    /// No music track is selected, so the music duration is zero.
    NoMusic,
}

/// How a raw JSON value may be turned into seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Coercion {
    /// JSON number only.
    Number,
    /// String whose leading numeric prefix parses (`"117.5"`, `"117.5s"`).
    NumericText,
    /// Either of the above.
    NumberOrText,
}

impl Coercion {
    pub fn apply(self, v: &Value) -> Option<f64> {
        match (self, v) {
            (Self::Number | Self::NumberOrText, Value::Number(n)) => n.as_f64(),
            (Self::NumericText | Self::NumberOrText, Value::String(s)) => leading_number(s),
            _ => None,
        }
    }
}

/// One candidate input for a duration, evaluated in table order.
#[derive(Clone, Copy, Debug)]
pub struct FieldRule {
    pub key: &'static str,
    pub coercion: Coercion,
}

const fn rule(key: &'static str, coercion: Coercion) -> FieldRule {
    FieldRule { key, coercion }
}

pub const NARRATION_FIELDS: &[FieldRule] = &[
    rule("storyDurationSeconds", Coercion::NumberOrText),
    rule("narrationDurationSeconds", Coercion::NumberOrText),
    rule("story_duration", Coercion::NumberOrText),
    rule("storyDuration", Coercion::NumberOrText),
    rule("audio_duration_seconds", Coercion::Number),
];

pub const MUSIC_FIELDS: &[FieldRule] = &[
    rule("musicDurationSeconds", Coercion::NumberOrText),
    rule("music_duration", Coercion::NumberOrText),
    rule("musicDuration", Coercion::NumberOrText),
];

pub const TOTAL_FIELDS: &[FieldRule] = &[
    rule("videoTotalDuration", Coercion::NumberOrText),
    rule("video_total_duration", Coercion::NumberOrText),
    rule("totalDurationSeconds", Coercion::NumberOrText),
];

/// A duration together with where it came from.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ResolvedDuration {
    pub seconds: f64,
    pub source: DurationSource,
}

/// Narration, music and total durations after alias lookup and fallbacks.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct NormalizedDurations {
    pub narration: ResolvedDuration,
    pub music: ResolvedDuration,
    pub total: ResolvedDuration,
}

impl NormalizedDurations {
    pub fn narration_seconds(&self) -> f64 {
        self.narration.seconds
    }

    pub fn music_seconds(&self) -> f64 {
        self.music.seconds
    }

    pub fn total_seconds(&self) -> f64 {
        self.total.seconds
    }
}

/// Walk `rules` in order and return the first present value that coerces to a valid duration.
///
/// Present-but-invalid candidates are reported and skipped; `null` counts as absent.
pub fn lookup(
    raw: &Map<String, Value>,
    quantity: DurationQuantity,
    rules: &[FieldRule],
    sink: &dyn DiagnosticSink,
) -> Option<ResolvedDuration> {
    for r in rules {
        let Some(v) = raw.get(r.key) else { continue };
        if v.is_null() {
            continue;
        }
        match r.coercion.apply(v) {
            Some(secs) if quantity.accepts(secs) => {
                return Some(ResolvedDuration {
                    seconds: secs,
                    source: DurationSource::Field(r.key.to_owned()),
                });
            }
            _ => sink.emit(&Diagnostic::DurationRejected {
                quantity,
                key: r.key.to_owned(),
                raw: v.to_string(),
            }),
        }
    }
    None
}

/// Resolve the three durations of an event.
///
/// `music_hint` is the duration carried by the parsed music selection, if any; `has_music`
/// is false when no background track was selected, which forces the music duration to zero.
/// Never fails: missing inputs degrade to derived or configured values.
pub fn normalize_durations(
    raw: &Map<String, Value>,
    has_music: bool,
    music_hint: Option<f64>,
    cfg: &EngineConfig,
    sink: &dyn DiagnosticSink,
) -> NormalizedDurations {
    let narration = match lookup(raw, DurationQuantity::Narration, NARRATION_FIELDS, sink) {
        Some(d) => d,
        None => {
            sink.emit(&Diagnostic::DurationDefaulted {
                quantity: DurationQuantity::Narration,
                seconds: cfg.default_narration_seconds,
            });
            ResolvedDuration {
                seconds: cfg.default_narration_seconds,
                source: DurationSource::Default,
            }
        }
    };

    let music = if !has_music {
        ResolvedDuration {
            seconds: 0.0,
            source: DurationSource::NoMusic,
        }
    } else if let Some(d) = lookup(raw, DurationQuantity::Music, MUSIC_FIELDS, sink) {
        d
    } else if let Some(secs) = music_hint.filter(|s| DurationQuantity::Music.accepts(*s)) {
        ResolvedDuration {
            seconds: secs,
            source: DurationSource::MusicSelection,
        }
    } else {
        sink.emit(&Diagnostic::DurationDefaulted {
            quantity: DurationQuantity::Music,
            seconds: 0.0,
        });
        ResolvedDuration {
            seconds: 0.0,
            source: DurationSource::Default,
        }
    };

    let total = lookup(raw, DurationQuantity::Total, TOTAL_FIELDS, sink).unwrap_or_else(|| {
        ResolvedDuration {
            seconds: narration.seconds + cfg.outro_buffer_seconds,
            source: DurationSource::Derived,
        }
    });

    for (quantity, d) in [
        (DurationQuantity::Narration, &narration),
        (DurationQuantity::Music, &music),
        (DurationQuantity::Total, &total),
    ] {
        sink.emit(&Diagnostic::DurationResolved {
            quantity,
            seconds: d.seconds,
            source: d.source.clone(),
        });
    }

    NormalizedDurations {
        narration,
        music,
        total,
    }
}

/// Parse the leading decimal number of `s`, ignoring any trailing text.
pub fn leading_number(s: &str) -> Option<f64> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^\s*([+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?)")
            .expect("static regex is valid")
    });
    let caps = re.captures(s)?;
    caps.get(1)?.as_str().parse::<f64>().ok()
}

#[cfg(test)]
#[path = "../../tests/unit/ingest/durations.rs"]
mod tests;
