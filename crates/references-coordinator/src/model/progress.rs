use serde::{Deserialize, Serialize};

/// Top-level stage of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReferencesProgress {
    Started,
    StartedRename,
    ProcessingSource,
    ProcessingTargets,
}

impl ReferencesProgress {
    /// The start kind carried by a `Started`/`StartedRename` stage.
    pub fn start_kind(self) -> Option<StartKind> {
        match self {
            ReferencesProgress::Started => Some(StartKind::Started),
            ReferencesProgress::StartedRename => Some(StartKind::StartedRename),
            ReferencesProgress::ProcessingSource | ReferencesProgress::ProcessingTargets => None,
        }
    }
}

/// How an operation announced itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StartKind {
    Started,
    StartedRename,
}

/// State of one target file.
///
/// Targets move forward through the variants in declaration order and end
/// in one of the two `Finished*` states. `ConfirmingReferences` is skipped
/// when nothing needs confirming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetReferencesProgress {
    WaitingToLex,
    Lexing,
    WaitingToParse,
    Parsing,
    ConfirmingReferences,
    FinishedWithoutConfirming,
    FinishedConfirming,
}

/// A status notification from the engine.
///
/// `target_references_progress` is empty until `ProcessingTargets` begins
/// and keeps a fixed length (one slot per target) from then on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportReferencesProgressNotification {
    pub reference_progress: ReferencesProgress,
    #[serde(default)]
    pub target_references_progress: Vec<TargetReferencesProgress>,
}

impl ReportReferencesProgressNotification {
    pub fn stage(reference_progress: ReferencesProgress) -> Self {
        Self {
            reference_progress,
            target_references_progress: Vec::new(),
        }
    }

    pub fn targets(targets: Vec<TargetReferencesProgress>) -> Self {
        Self {
            reference_progress: ReferencesProgress::ProcessingTargets,
            target_references_progress: targets,
        }
    }
}
