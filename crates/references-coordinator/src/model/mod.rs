//! Values exchanged with the search engine.
//!
//! Everything here is plain data: the engine produces it, the coordinator
//! reads it and re-wraps it, nothing mutates a value after receipt. All types
//! are `serde`-(de)serializable with camelCase field names so engine traffic
//! can be scripted and replayed.

mod progress;

use std::path::{Path, PathBuf};

use lsp_types::Position;
use serde::{Deserialize, Serialize};

pub use progress::{ReferencesProgress, ReportReferencesProgressNotification, StartKind, TargetReferencesProgress};

/// Classification of a located reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReferenceType {
    Confirmed,
    ConfirmationInProgress,
    Comment,
    String,
    Inactive,
    CannotConfirm,
    NotAReference,
}

impl ReferenceType {
    pub fn is_confirmed(self) -> bool {
        matches!(self, ReferenceType::Confirmed)
    }

    /// Human-readable label used in text summaries.
    pub fn label(self) -> &'static str {
        match self {
            ReferenceType::Confirmed => "Confirmed reference",
            ReferenceType::ConfirmationInProgress => "Confirmation in progress",
            ReferenceType::Comment => "Comment reference",
            ReferenceType::String => "String reference",
            ReferenceType::Inactive => "Inactive reference",
            ReferenceType::CannotConfirm => "Cannot confirm reference",
            ReferenceType::NotAReference => "Not a reference",
        }
    }
}

/// One located reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceInfo {
    pub file: PathBuf,
    pub position: Position,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: ReferenceType,
}

/// References from one file, in the order the engine reported them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileGroup {
    pub file: PathBuf,
    pub references: Vec<ReferenceInfo>,
}

/// The result set of one operation.
///
/// `is_finished` is true only on the terminal delivery.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReferencesResult {
    pub references: Vec<ReferenceInfo>,
    pub text: String,
    pub is_finished: bool,
}

impl ReferencesResult {
    pub fn finished(
        references: Vec<ReferenceInfo>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            references,
            text: text.into(),
            is_finished: true,
        }
    }

    /// True when every entry is [`ReferenceType::Confirmed`] (vacuously true
    /// for an empty result).
    pub fn all_confirmed(&self) -> bool {
        self.references.iter().all(|r| r.kind.is_confirmed())
    }

    /// A copy that keeps only confirmed entries.
    pub fn confirmed_only(&self) -> Self {
        Self {
            references: self.references.iter().filter(|r| r.kind.is_confirmed()).cloned().collect(),
            text: self.text.clone(),
            is_finished: self.is_finished,
        }
    }

    /// Group entries per file, files ordered by first appearance.
    pub fn grouped_by_file(&self) -> Vec<FileGroup> {
        let mut groups: Vec<FileGroup> = Vec::new();
        for reference in &self.references {
            match groups.iter_mut().find(|g| g.file == reference.file) {
                Some(group) => group.references.push(reference.clone()),
                None => groups.push(FileGroup {
                    file: reference.file.clone(),
                    references: vec![reference.clone()],
                }),
            }
        }
        groups
    }

    /// Attach an informational warning to the summary text.
    pub fn with_warning(
        mut self,
        warning: &str,
    ) -> Self {
        if self.text.is_empty() {
            self.text = warning.to_string();
        } else {
            self.text = format!("{}\n{warning}", self.text);
        }
        self
    }
}

/// Which presentation an operation is running under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReferencesCommandMode {
    #[default]
    None,
    Find,
    Peek,
    Rename,
}

impl ReferencesCommandMode {
    pub fn is_active(self) -> bool {
        !matches!(self, ReferencesCommandMode::None)
    }

    /// Rename and Peek put a preview surface on screen while the search runs.
    pub fn is_previewing(self) -> bool {
        matches!(self, ReferencesCommandMode::Peek | ReferencesCommandMode::Rename)
    }

    /// Title of the progress presentation for this mode.
    pub fn title(self) -> &'static str {
        match self {
            ReferencesCommandMode::None => "",
            ReferencesCommandMode::Find => "Find All References",
            ReferencesCommandMode::Peek => "Peek References",
            ReferencesCommandMode::Rename => "Rename",
        }
    }
}

/// Parameters of a find-all-references or rename request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferencesParams {
    pub file: PathBuf,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_name: Option<String>,
}

impl ReferencesParams {
    pub fn new(
        file: impl AsRef<Path>,
        position: Position,
    ) -> Self {
        Self {
            file: file.as_ref().to_path_buf(),
            position,
            new_name: None,
        }
    }

    pub fn with_new_name(
        mut self,
        new_name: impl Into<String>,
    ) -> Self {
        self.new_name = Some(new_name.into());
        self
    }
}

#[cfg(test)]
#[path = "../../tests/src/model/model_tests.rs"]
mod tests;
