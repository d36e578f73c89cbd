use crate::model::{ReferencesProgress, ReportReferencesProgressNotification, TargetReferencesProgress};

/// Share of the bar given to lexing. Parsing and confirming get the rest
/// because they dominate total latency.
const LEX_WEIGHT: f64 = 25.0;
const PARSE_WEIGHT: f64 = 75.0;
/// Confirming is comparatively fast, so a target in that state counts half.
const CONFIRMING_WEIGHT: f64 = 0.5;

pub const STARTED_MESSAGE: &str = "Started";
pub const PROCESSING_SOURCE_MESSAGE: &str = "Processing source";
pub const SEARCHING_MESSAGE: &str = "Searching files";

/// Per-state counts over the target array of one notification.
///
/// `WaitingToParse` is not counted; it is whatever remains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TargetTally {
    pub total: usize,
    pub waiting_to_lex: usize,
    pub lexing: usize,
    pub parsing: usize,
    pub confirming: usize,
    pub finished_without_confirming: usize,
    pub finished_confirming: usize,
}

impl TargetTally {
    pub fn from_targets(targets: &[TargetReferencesProgress]) -> Self {
        let mut tally = Self {
            total: targets.len(),
            ..Self::default()
        };
        for target in targets {
            match target {
                TargetReferencesProgress::WaitingToLex => tally.waiting_to_lex += 1,
                TargetReferencesProgress::Lexing => tally.lexing += 1,
                TargetReferencesProgress::WaitingToParse => {},
                TargetReferencesProgress::Parsing => tally.parsing += 1,
                TargetReferencesProgress::ConfirmingReferences => tally.confirming += 1,
                TargetReferencesProgress::FinishedWithoutConfirming => tally.finished_without_confirming += 1,
                TargetReferencesProgress::FinishedConfirming => tally.finished_confirming += 1,
            }
        }
        tally
    }

    pub fn finished_lexing(&self) -> usize {
        self.total - self.waiting_to_lex - self.lexing
    }

    pub fn total_to_parse(&self) -> usize {
        self.total - self.finished_without_confirming
    }

    pub fn waiting_to_parse(&self) -> usize {
        self.total
            - self.waiting_to_lex
            - self.lexing
            - self.parsing
            - self.confirming
            - self.finished_without_confirming
            - self.finished_confirming
    }

    pub fn message(&self) -> String {
        if self.lexing >= self.parsing && self.finished_confirming == 0 {
            if self.total == 0 {
                SEARCHING_MESSAGE.to_string()
            } else {
                format!("{}/{} files searched", self.finished_lexing(), self.total)
            }
        } else {
            format!("{}/{} files confirmed", self.finished_confirming, self.total_to_parse())
        }
    }

    /// Weighted completion in `0.0..=100.0`.
    pub fn increment(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let lex_progress = self.finished_lexing() as f64 / self.total as f64;
        let total_to_parse = self.total_to_parse();
        // Every target finished without needing confirmation: nothing is left to parse.
        let parse_progress = if total_to_parse == 0 {
            1.0
        } else {
            (self.confirming as f64 * CONFIRMING_WEIGHT + self.finished_confirming as f64) / total_to_parse as f64
        };
        lex_progress * LEX_WEIGHT + parse_progress * PARSE_WEIGHT
    }
}

/// What the progress presentation should show for one notification.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressReport {
    pub message: String,
    pub increment: f64,
}

impl ProgressReport {
    fn fixed(message: &str) -> Self {
        Self {
            message: message.to_string(),
            increment: 0.0,
        }
    }
}

pub fn compute_report(notification: &ReportReferencesProgressNotification) -> ProgressReport {
    match notification.reference_progress {
        ReferencesProgress::Started | ReferencesProgress::StartedRename => ProgressReport::fixed(STARTED_MESSAGE),
        ReferencesProgress::ProcessingSource => ProgressReport::fixed(PROCESSING_SOURCE_MESSAGE),
        ReferencesProgress::ProcessingTargets => {
            let tally = TargetTally::from_targets(&notification.target_references_progress);
            ProgressReport {
                message: tally.message(),
                increment: tally.increment(),
            }
        },
    }
}

#[cfg(test)]
#[path = "../../tests/src/progress/tally_tests.rs"]
mod tests;
