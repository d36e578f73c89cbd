//! Scripted replay of engine and host traffic.
//!
//! A script is JSON lines, one timed step per line:
//!
//! ```text
//! {"atMs": 0,    "event": {"kind": "startFind", "params": {...}}}
//! {"atMs": 10,   "event": {"kind": "progress", "notification": {"referenceProgress": "started"}}}
//! {"atMs": 2500, "event": {"kind": "result", "result": {...}}}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use std::{
    fmt::{Display, Formatter},
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use serde::Deserialize;
use tokio::{
    task::JoinHandle,
    time::{Instant, sleep, sleep_until},
};
use tracing::{debug, info};

use crate::{
    config::CoordinatorSettings,
    coordinator::ReferencesCoordinator,
    driver::{DriverEvent, OperationDriver},
    host::{Hosts, ResultCallback},
    model::{ReferencesParams, ReferencesResult, ReportReferencesProgressNotification},
    router::ConfirmationOutcome,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptStep {
    #[serde(default)]
    pub at_ms: u64,
    pub event: ScriptEvent,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ScriptEvent {
    StartFind {
        params: ReferencesParams,
    },
    StartRename {
        params: ReferencesParams,
    },
    Progress {
        notification: ReportReferencesProgressNotification,
    },
    Result {
        result: ReferencesResult,
    },
    VisibleLength {
        length: usize,
    },
    ViewRequest,
    /// Cancellation from the requesting surface.
    Cancel,
    /// Cancel button on the progress presentation.
    ProgressCancel,
    CompleteRename {
        outcome: ConfirmationOutcome,
    },
    ToggleGroupByFile,
    Indexing {
        in_progress: bool,
    },
}

/// Parse a script. Steps are ordered by time; steps sharing a timestamp
/// keep their file order.
pub fn parse_script(content: &str) -> Result<Vec<ScriptStep>, ReplayError> {
    let mut steps = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let step: ScriptStep = serde_json::from_str(trimmed).map_err(|error| ReplayError::Parse {
            line: index + 1,
            reason: error.to_string(),
        })?;
        steps.push(step);
    }
    steps.sort_by_key(|step| step.at_ms);
    Ok(steps)
}

pub fn load_script(path: &Path) -> Result<Vec<ScriptStep>, ReplayError> {
    let content = std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_script(&content)
}

/// Where replay side effects go.
pub struct ReplayTargets {
    pub hosts: Hosts,
    /// Flag behind the progress host's `cancellation_requested`.
    pub host_cancel: Arc<AtomicBool>,
    /// Builds the result callback for each start step.
    pub callback: Box<dyn Fn() -> ResultCallback + Send>,
}

/// Play `steps` in real time against a fresh coordinator, then keep the
/// driver alive for `drain` so trailing timers can fire.
pub async fn replay(
    steps: &[ScriptStep],
    settings: CoordinatorSettings,
    targets: ReplayTargets,
    drain: Duration,
) -> Result<ReferencesCoordinator, ReplayError> {
    let ReplayTargets {
        hosts,
        host_cancel,
        callback,
    } = targets;
    let coordinator = ReferencesCoordinator::new(settings, hosts);
    let (driver, handle) = OperationDriver::new(coordinator);
    let task = tokio::spawn(driver.run());

    info!("replaying {} step(s)", steps.len());
    let start = Instant::now();
    for step in steps {
        sleep_until(start + Duration::from_millis(step.at_ms)).await;
        debug!("t+{}ms: {:?}", step.at_ms, step.event);
        let event = match step.event.clone() {
            ScriptEvent::ProgressCancel => {
                host_cancel.store(true, Ordering::Release);
                continue;
            },
            ScriptEvent::StartFind {
                params,
            } => DriverEvent::StartFind {
                params,
                callback: callback(),
            },
            ScriptEvent::StartRename {
                params,
            } => DriverEvent::StartRename {
                params,
                callback: callback(),
            },
            ScriptEvent::Progress {
                notification,
            } => DriverEvent::Progress(notification),
            ScriptEvent::Result {
                result,
            } => DriverEvent::Result(result),
            ScriptEvent::VisibleLength {
                length,
            } => DriverEvent::VisibleLength(length),
            ScriptEvent::ViewRequest => DriverEvent::ViewRequest,
            ScriptEvent::Cancel => DriverEvent::Cancel,
            ScriptEvent::CompleteRename {
                outcome,
            } => DriverEvent::CompleteRename(outcome),
            ScriptEvent::ToggleGroupByFile => DriverEvent::ToggleGroupByFile,
            ScriptEvent::Indexing {
                in_progress,
            } => DriverEvent::IndexingInProgress(in_progress),
        };
        if handle.send(event).is_err() {
            return Err(driver_stopped(task).await);
        }
    }

    sleep(drain).await;
    if handle.send(DriverEvent::Shutdown).is_err() {
        return Err(driver_stopped(task).await);
    }
    task.await.map_err(|error| ReplayError::DriverPanicked(error.to_string()))
}

/// Explain why the driver is no longer accepting events.
async fn driver_stopped(task: JoinHandle<ReferencesCoordinator>) -> ReplayError {
    match task.await {
        Err(error) => ReplayError::DriverPanicked(error.to_string()),
        Ok(_) => ReplayError::DriverStopped,
    }
}

#[derive(Debug)]
pub enum ReplayError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        line: usize,
        reason: String,
    },
    DriverStopped,
    DriverPanicked(String),
}

impl Display for ReplayError {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::Io {
                path,
                source,
            } => write!(f, "failed to read script {}: {source}", path.display()),
            Self::Parse {
                line,
                reason,
            } => write!(f, "invalid script step on line {line}: {reason}"),
            Self::DriverStopped => write!(f, "coordinator driver stopped before the script ended"),
            Self::DriverPanicked(reason) => write!(f, "coordinator driver panicked: {reason}"),
        }
    }
}

impl std::error::Error for ReplayError {}

#[cfg(test)]
#[path = "../tests/src/replay_tests.rs"]
mod tests;
