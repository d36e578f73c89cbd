//! Persisted boolean display preferences.

use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter},
    path::{Path, PathBuf},
};

use dashmap::DashMap;
use tracing::debug;

pub const GROUP_BY_FILE_KEY: &str = "references.groupByFile";

pub trait PreferenceStore: Send {
    fn get_bool(
        &self,
        key: &str,
    ) -> Option<bool>;

    fn set_bool(
        &mut self,
        key: &str,
        value: bool,
    ) -> Result<(), PreferenceError>;
}

/// Process-lifetime store.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: DashMap<String, bool>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get_bool(
        &self,
        key: &str,
    ) -> Option<bool> {
        self.values.get(key).map(|v| *v.value())
    }

    fn set_bool(
        &mut self,
        key: &str,
        value: bool,
    ) -> Result<(), PreferenceError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store backed by a flat JSON object on disk, rewritten on every set.
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    values: BTreeMap<String, bool>,
}

impl FilePreferences {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PreferenceError> {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content).map_err(|source| PreferenceError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => {
                return Err(PreferenceError::Io {
                    path,
                    source,
                });
            },
        };
        Ok(Self {
            path,
            values,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FilePreferences {
    fn get_bool(
        &self,
        key: &str,
    ) -> Option<bool> {
        self.values.get(key).copied()
    }

    fn set_bool(
        &mut self,
        key: &str,
        value: bool,
    ) -> Result<(), PreferenceError> {
        self.values.insert(key.to_string(), value);
        let content = serde_json::to_string_pretty(&self.values).map_err(|source| PreferenceError::Parse {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, content).map_err(|source| PreferenceError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!("persisted {key}={value} to {}", self.path.display());
        Ok(())
    }
}

/// The "group results by file" display preference.
#[derive(Debug, Clone, Copy)]
pub struct GroupByFile {
    default: bool,
}

impl GroupByFile {
    pub fn new(default: bool) -> Self {
        Self {
            default,
        }
    }

    pub fn get(
        &self,
        store: &dyn PreferenceStore,
    ) -> bool {
        store.get_bool(GROUP_BY_FILE_KEY).unwrap_or(self.default)
    }

    pub fn set(
        &self,
        store: &mut dyn PreferenceStore,
        value: bool,
    ) -> Result<(), PreferenceError> {
        store.set_bool(GROUP_BY_FILE_KEY, value)
    }
}

#[derive(Debug)]
pub enum PreferenceError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Display for PreferenceError {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::Io {
                path,
                source,
            } => write!(f, "failed to access preferences at {}: {source}", path.display()),
            Self::Parse {
                path,
                source,
            } => write!(f, "invalid preferences file {}: {source}", path.display()),
        }
    }
}

impl std::error::Error for PreferenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io {
                source, ..
            } => Some(source),
            Self::Parse {
                source, ..
            } => Some(source),
        }
    }
}

#[cfg(test)]
#[path = "../tests/src/preferences_tests.rs"]
mod tests;
