//! Single-task scheduler around a [`ReferencesCoordinator`].
//!
//! Inbound events arrive over an unbounded channel; the only timer is the
//! coordinator's next deadline. Both are multiplexed in one `select!` loop so
//! the coordinator is never touched from two places at once.

use std::fmt::{Display, Formatter};

use tokio::{
    sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
    time::{Instant, sleep_until},
};
use tracing::{debug, info};

use crate::{
    coordinator::{ReferencesCoordinator, StartOutcome},
    host::ResultCallback,
    model::{ReferencesParams, ReferencesResult, ReportReferencesProgressNotification},
    router::ConfirmationOutcome,
};

pub enum DriverEvent {
    StartFind {
        params: ReferencesParams,
        callback: ResultCallback,
    },
    StartRename {
        params: ReferencesParams,
        callback: ResultCallback,
    },
    Progress(ReportReferencesProgressNotification),
    Result(ReferencesResult),
    VisibleLength(usize),
    ViewRequest,
    Cancel,
    CompleteRename(ConfirmationOutcome),
    ToggleGroupByFile,
    IndexingInProgress(bool),
    Shutdown,
}

/// Sending half handed to event sources.
#[derive(Clone)]
pub struct DriverHandle {
    tx: UnboundedSender<DriverEvent>,
}

impl DriverHandle {
    pub fn send(
        &self,
        event: DriverEvent,
    ) -> Result<(), DriverClosed> {
        self.tx.send(event).map_err(|_| DriverClosed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverClosed;

impl Display for DriverClosed {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "coordinator driver has stopped")
    }
}

impl std::error::Error for DriverClosed {}

pub struct OperationDriver {
    coordinator: ReferencesCoordinator,
    rx: UnboundedReceiver<DriverEvent>,
}

impl OperationDriver {
    pub fn new(coordinator: ReferencesCoordinator) -> (Self, DriverHandle) {
        let (tx, rx) = unbounded_channel();
        (
            Self {
                coordinator,
                rx,
            },
            DriverHandle {
                tx,
            },
        )
    }

    /// Run until [`DriverEvent::Shutdown`] or every handle is dropped.
    /// Returns the coordinator so callers can inspect its final state.
    pub async fn run(mut self) -> ReferencesCoordinator {
        loop {
            let deadline = self.coordinator.next_deadline();
            tokio::select! {
                event = self.rx.recv() => match event {
                    None | Some(DriverEvent::Shutdown) => break,
                    Some(event) => self.dispatch(event),
                },
                _ = sleep_until_deadline(deadline) => {
                    self.coordinator.on_deadline(Instant::now());
                },
            }
        }
        debug!("coordinator driver stopped");
        self.coordinator
    }

    fn dispatch(
        &mut self,
        event: DriverEvent,
    ) {
        let now = Instant::now();
        match event {
            DriverEvent::StartFind {
                params,
                callback,
            } => {
                if self.coordinator.start_find_all_references(params, callback) == StartOutcome::ServedFromCache {
                    info!("find request served from cached results");
                }
            },
            DriverEvent::StartRename {
                params,
                callback,
            } => {
                self.coordinator.start_rename(params, callback);
            },
            DriverEvent::Progress(notification) => self.coordinator.handle_progress(notification, now),
            DriverEvent::Result(result) => self.coordinator.handle_result(result),
            DriverEvent::VisibleLength(len) => self.coordinator.update_visible_length(len, now),
            DriverEvent::ViewRequest => self.coordinator.note_view_request(),
            DriverEvent::Cancel => self.coordinator.request_cancel(),
            DriverEvent::CompleteRename(outcome) => self.coordinator.complete_rename(outcome),
            DriverEvent::ToggleGroupByFile => {
                self.coordinator.toggle_group_by_file();
            },
            DriverEvent::IndexingInProgress(in_progress) => self.coordinator.set_indexing_in_progress(in_progress),
            DriverEvent::Shutdown => {},
        }
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
