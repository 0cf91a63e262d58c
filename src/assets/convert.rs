use crate::config::OutputSettings;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::foundation::error::{ReelError, ReelResult};
use crate::timeline::model::{AssetKind, AssetRef};

/// Request sent to the image conversion collaborator.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    pub story_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_asset_locator: Option<String>,
    pub generated_asset_locators: Vec<String>,
    #[serde(default)]
    pub test_mode: bool,
}

impl ConversionRequest {
    /// Request conversion of every located slot.
    pub fn for_slots(story_id: &str, slots: &[AssetRef], test_mode: bool) -> Self {
        let mut user_asset_locator = None;
        let mut generated_asset_locators = Vec::new();
        for slot in slots {
            let Some(locator) = &slot.source_locator else {
                continue;
            };
            match slot.kind {
                AssetKind::UserSupplied => user_asset_locator = Some(locator.clone()),
                AssetKind::Generated | AssetKind::Structural => {
                    generated_asset_locators.push(locator.clone());
                }
            }
        }
        Self {
            story_id: story_id.to_owned(),
            user_asset_locator,
            generated_asset_locators,
            test_mode,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedAsset {
    pub kind: AssetKind,
    pub original_locator: String,
    pub converted_locator: String,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResponse {
    pub success: bool,
    #[serde(default)]
    pub converted_assets: Vec<ConvertedAsset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Request for the branded title slide shown after the intro.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoSlideRequest {
    pub story_id: String,
    pub narrator_name: String,
    pub prompt: String,
    /// Object key the slide should be written to.
    pub output_key: String,
}

/// External collaborator that converts uploaded/generated images into renderer-ready files
/// and renders the info slide.
pub trait ImageConverter: Send + Sync {
    fn convert(&self, request: &ConversionRequest) -> ReelResult<ConversionResponse>;

    /// Render the info slide and return its locator.
    fn render_info_slide(&self, request: &InfoSlideRequest) -> ReelResult<String>;
}

/// Converter for assets that are already renderer-ready.
///
/// Maps every key to its storage-native locator without touching the files. It cannot draw
/// text, so info slide requests fail and the pipeline falls back to the brand logo.
#[derive(Clone, Debug, Default)]
pub struct PassthroughConverter {
    output: OutputSettings,
}

impl PassthroughConverter {
    pub fn new(output: OutputSettings) -> Self {
        Self { output }
    }

    fn native(&self, key: &str, kind: AssetKind) -> String {
        if key.contains("://") {
            return key.to_owned();
        }
        match kind {
            AssetKind::UserSupplied => self.output.user_asset_locator(key),
            AssetKind::Generated | AssetKind::Structural => {
                self.output.generated_asset_locator(key)
            }
        }
    }
}

impl ImageConverter for PassthroughConverter {
    fn convert(&self, request: &ConversionRequest) -> ReelResult<ConversionResponse> {
        let user = request
            .user_asset_locator
            .iter()
            .map(|l| (l, AssetKind::UserSupplied));
        let generated = request
            .generated_asset_locators
            .iter()
            .map(|l| (l, AssetKind::Generated));

        Ok(ConversionResponse {
            success: true,
            converted_assets: user
                .chain(generated)
                .map(|(l, kind)| ConvertedAsset {
                    kind,
                    original_locator: l.clone(),
                    converted_locator: self.native(l, kind),
                })
                .collect(),
            error: None,
        })
    }

    fn render_info_slide(&self, _request: &InfoSlideRequest) -> ReelResult<String> {
        Err(ReelError::upstream(
            "passthrough converter cannot render info slides",
        ))
    }
}

fn same_asset(original: &str, candidate: &str) -> bool {
    original == candidate
        || original.ends_with(&format!("/{candidate}"))
        || candidate.ends_with(&format!("/{original}"))
}

/// Replace slot locators with their converted counterparts.
///
/// On success, located slots without a conversion are dropped and empty slots are kept.
/// A failed or unsuccessful conversion yields no content at all, which makes the composer
/// fall back to structural-only content.
pub fn apply_conversion(
    slots: &[AssetRef],
    outcome: ReelResult<ConversionResponse>,
    sink: &dyn DiagnosticSink,
) -> Vec<AssetRef> {
    let response = match outcome {
        Ok(r) if r.success => r,
        Ok(r) => {
            sink.emit(&Diagnostic::ConversionDegraded {
                reason: r
                    .error
                    .unwrap_or_else(|| "converter reported success=false".to_owned()),
            });
            return Vec::new();
        }
        Err(e) => {
            sink.emit(&Diagnostic::ConversionDegraded {
                reason: e.to_string(),
            });
            return Vec::new();
        }
    };

    slots
        .iter()
        .filter_map(|slot| {
            let Some(locator) = &slot.source_locator else {
                return Some(slot.clone());
            };
            let converted = response
                .converted_assets
                .iter()
                .find(|c| same_asset(locator, &c.original_locator));
            match converted {
                Some(c) => Some(AssetRef {
                    source_locator: Some(c.converted_locator.clone()),
                    ..slot.clone()
                }),
                None => {
                    sink.emit(&Diagnostic::UnconvertedAssetDropped {
                        locator: locator.clone(),
                    });
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/assets/convert.rs"]
mod tests;
