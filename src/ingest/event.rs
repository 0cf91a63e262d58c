use serde_json::{Map, Value};

use crate::config::EngineConfig;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::foundation::error::{ReelError, ReelResult};
use crate::ingest::durations::Coercion;

/// Background track chosen by the upstream music-selection step.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MusicSelection {
    pub locator: String,
    pub duration_seconds: Option<f64>,
    pub category: Option<String>,
    pub track_name: Option<String>,
    pub mood: Option<String>,
}

impl MusicSelection {
    pub fn description(&self) -> String {
        match (&self.category, &self.track_name) {
            (Some(c), Some(t)) => format!("{c}/{t}"),
            (Some(c), None) => c.clone(),
            (None, Some(t)) => t.clone(),
            (None, None) => "background music".to_owned(),
        }
    }
}

/// Identity and asset fields of an upstream story event.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct StoryEvent {
    pub story_id: String,
    /// Object key of the narration audio in the incoming bucket.
    pub audio_key: String,
    pub narrator_name: String,
    pub prompt: Option<String>,
    pub email: Option<String>,
    pub test_mode: bool,
    pub user_asset_key: Option<String>,
    pub generated_asset_keys: Vec<String>,
    pub music: Option<MusicSelection>,
}

impl StoryEvent {
    /// Parse identity, assets and music from an event object.
    ///
    /// Fails only when the story id or narration audio key is absent.
    pub fn parse(raw: &Map<String, Value>, sink: &dyn DiagnosticSink) -> ReelResult<Self> {
        let story_id = first_text(raw, &["storyId", "story_id"]);
        let audio_key = first_text(raw, &["audioKey", "audio_key"]);
        let (story_id, audio_key) = match (story_id, audio_key) {
            (Some(s), Some(a)) => (s, a),
            (s, a) => {
                return Err(ReelError::missing_input(format!(
                    "storyId={} audioKey={}",
                    s.as_deref().unwrap_or("<none>"),
                    a.as_deref().unwrap_or("<none>")
                )));
            }
        };

        Ok(Self {
            story_id,
            audio_key,
            narrator_name: first_text(raw, &["storytellerName", "name"])
                .unwrap_or_else(|| "Someone".to_owned()),
            prompt: first_text(raw, &["prompt"]),
            email: first_text(raw, &["email"]),
            test_mode: raw.get("testMode").is_some_and(truthy),
            user_asset_key: first_text(raw, &["userPhotoKey", "photo_key"]),
            generated_asset_keys: parse_asset_list(raw.get("generatedImageKeys"), sink),
            music: parse_music_selection(raw, sink),
        })
    }

    /// The user asset key, unless absent or one of the configured placeholders.
    pub fn primary_user_asset<'a>(&'a self, cfg: &EngineConfig) -> Option<&'a str> {
        self.user_asset_key
            .as_deref()
            .filter(|k| !k.trim().is_empty() && !cfg.is_placeholder_user_asset(k))
    }

    pub fn title(&self) -> String {
        self.prompt
            .clone()
            .unwrap_or_else(|| format!("{}'s Story", self.narrator_name))
    }
}

pub(crate) fn first_text(raw: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match raw.get(*k)? {
        Value::String(s) if !s.trim().is_empty() && s != "null" => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        _ => false,
    }
}

/// Accept the generated-asset list as a JSON array or as a JSON-encoded string.
pub fn parse_asset_list(v: Option<&Value>, sink: &dyn DiagnosticSink) -> Vec<String> {
    let strings = |items: &[Value]| {
        items
            .iter()
            .filter_map(|i| i.as_str())
            .filter(|s| !s.trim().is_empty())
            .map(str::to_owned)
            .collect::<Vec<_>>()
    };

    match v {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => strings(items),
        Some(Value::String(s)) if s.trim().is_empty() => Vec::new(),
        Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Array(items)) => strings(&items),
            _ => {
                sink.emit(&Diagnostic::UnparsableAssetList { raw: s.clone() });
                Vec::new()
            }
        },
        Some(other) => {
            sink.emit(&Diagnostic::UnparsableAssetList {
                raw: other.to_string(),
            });
            Vec::new()
        }
    }
}

#[derive(serde::Deserialize)]
struct MusicSelectionDef {
    #[serde(default)]
    s3_url: Option<String>,
    #[serde(default)]
    duration_seconds: Option<Value>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    track_name: Option<String>,
    #[serde(default, alias = "track_mood")]
    mood: Option<String>,
}

/// `musicSelection` (object or JSON-encoded string) wins over a bare `backgroundMusicUrl`.
fn parse_music_selection(
    raw: &Map<String, Value>,
    sink: &dyn DiagnosticSink,
) -> Option<MusicSelection> {
    let mut selection = first_text(raw, &["backgroundMusicUrl"]).map(|locator| MusicSelection {
        locator,
        duration_seconds: None,
        category: None,
        track_name: None,
        mood: None,
    });

    let def = match raw.get("musicSelection") {
        Some(Value::String(s)) if !s.trim().is_empty() && s != "null" => {
            match serde_json::from_str::<MusicSelectionDef>(s) {
                Ok(def) => Some(def),
                Err(_) => {
                    sink.emit(&Diagnostic::UnparsableMusicSelection { raw: s.clone() });
                    None
                }
            }
        }
        Some(v @ Value::Object(_)) => {
            match serde_json::from_value::<MusicSelectionDef>(v.clone()) {
                Ok(def) => Some(def),
                Err(_) => {
                    sink.emit(&Diagnostic::UnparsableMusicSelection { raw: v.to_string() });
                    None
                }
            }
        }
        _ => None,
    };

    if let Some(def) = def
        && let Some(locator) = def.s3_url.filter(|u| !u.trim().is_empty() && u != "null")
    {
        selection = Some(MusicSelection {
            locator,
            duration_seconds: def
                .duration_seconds
                .as_ref()
                .and_then(|v| Coercion::NumberOrText.apply(v)),
            category: def.category,
            track_name: def.track_name,
            mood: def.mood,
        });
    }

    selection
}

#[cfg(test)]
#[path = "../../tests/unit/ingest/event.rs"]
mod tests;
