//! Coordinator settings.
//!
//! Settings are split into one file per category. [`CoordinatorSettings`]
//! aggregates all categories and handles partial JSON payloads (host
//! configuration) and TOML settings files. Unknown keys are ignored and
//! out-of-range numbers are clamped.

pub(crate) mod logging;
pub(crate) mod presentation;
pub(crate) mod timing;

use std::{
    collections::HashMap,
    fmt::{Display, Formatter},
    path::{Path, PathBuf},
};

use logging::LoggingSettingsPatch;
pub use logging::{LogLevel, LoggingSettings};
pub use presentation::PresentationSettings;
use presentation::PresentationSettingsPatch;
use serde::Deserialize;
use serde_json::Value;
use timing::TimingSettingsPatch;
pub use timing::{MAX_PEEK_WINDOW_MS, MAX_START_DELAY_MS, MAX_TICK_INTERVAL_MS, MIN_TICK_INTERVAL_MS, TimingSettings};

pub const SETTINGS_SECTION_KEY: &str = "references";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoordinatorSettings {
    pub timing: TimingSettings,
    pub presentation: PresentationSettings,
    pub logging: LoggingSettings,
}

impl CoordinatorSettings {
    pub fn from_payload(payload: Option<&Value>) -> Self {
        let mut settings = Self::default();
        if let Some(payload) = payload {
            settings = settings.merged_with_payload(payload);
        }
        settings
    }

    pub fn merged_with_payload(
        &self,
        payload: &Value,
    ) -> Self {
        let mut merged = self.clone();

        for candidate in payload_candidates(payload) {
            if let Ok(patch) = serde_json::from_value::<CoordinatorSettingsPatch>(candidate.clone()) {
                merged.apply_patch(patch);
            }
        }

        merged.normalize();
        merged
    }

    /// Parse a TOML document with the same shape as the JSON payload.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let payload: Value = toml::from_str(content)?;
        Ok(Self::from_payload(Some(&payload)))
    }

    /// Load a `.toml` or `.json` settings file, chosen by extension.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_toml = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            return Self::from_toml_str(&content).map_err(|error| SettingsError::Parse {
                path: path.to_path_buf(),
                reason: error.to_string(),
            });
        }
        let payload: Value = serde_json::from_str(&content).map_err(|error| SettingsError::Parse {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })?;
        Ok(Self::from_payload(Some(&payload)))
    }

    fn apply_patch(
        &mut self,
        patch: CoordinatorSettingsPatch,
    ) {
        if let Some(p) = patch.timing {
            self.timing.apply_patch(p);
        }
        if let Some(p) = patch.presentation {
            self.presentation.apply_patch(p);
        }
        if let Some(p) = patch.logging {
            self.logging.apply_patch(p);
        }
    }

    fn normalize(&mut self) {
        self.timing.normalize();
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct CoordinatorSettingsPatch {
    timing: Option<TimingSettingsPatch>,
    presentation: Option<PresentationSettingsPatch>,
    logging: Option<LoggingSettingsPatch>,
    #[serde(flatten)]
    _extra: HashMap<String, Value>,
}

fn payload_candidates(payload: &Value) -> Vec<Value> {
    let mut candidates = Vec::new();
    candidates.push(payload.clone());
    if let Some(scoped) = payload.get(SETTINGS_SECTION_KEY) {
        candidates.push(scoped.clone());
    }
    candidates
}

#[derive(Debug)]
pub enum SettingsError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        reason: String,
    },
}

impl Display for SettingsError {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::Io {
                path,
                source,
            } => write!(f, "failed to read settings {}: {source}", path.display()),
            Self::Parse {
                path,
                reason,
            } => write!(f, "invalid settings {}: {reason}", path.display()),
        }
    }
}

impl std::error::Error for SettingsError {}

#[cfg(test)]
#[path = "../../tests/src/config/settings_tests.rs"]
mod tests;
