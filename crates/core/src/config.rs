use crate::error::Result;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

pub const SETTINGS_SECTION_KEY: &str = "tagscope";

/// User-facing switches of the tree-sitter symbol provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProviderSettings {
    /// Emit `@reference.*` containers alongside definitions.
    pub include_references: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderSettingsPatch {
    include_references: Option<bool>,
}

impl ProviderSettings {
    /// Builds settings from a JSON payload that is either the bare settings
    /// object or one nested under [`SETTINGS_SECTION_KEY`].
    pub fn from_json_payload(payload: Option<&Value>) -> Self {
        let settings = Self::default();
        match payload {
            Some(payload) => settings.merged_with_payload(payload),
            None => settings,
        }
    }

    pub fn merged_with_payload(&self, payload: &Value) -> Self {
        let mut merged = *self;
        for candidate in payload_candidates(payload) {
            match serde_json::from_value::<ProviderSettingsPatch>(candidate.clone()) {
                Ok(patch) => merged.apply_patch(patch),
                Err(err) => tracing::debug!("Ignoring settings candidate: {}", err),
            }
        }
        merged
    }

    /// Reads a JSON settings file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let payload: Value = serde_json::from_str(&content)?;
        Ok(Self::from_json_payload(Some(&payload)))
    }

    fn apply_patch(&mut self, patch: ProviderSettingsPatch) {
        if let Some(include_references) = patch.include_references {
            self.include_references = include_references;
        }
    }
}

fn payload_candidates(payload: &Value) -> Vec<&Value> {
    let mut candidates = vec![payload];
    if let Some(scoped) = payload.get(SETTINGS_SECTION_KEY) {
        candidates.push(scoped);
    }
    candidates
}
