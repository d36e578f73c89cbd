//! A [`ProgressHost`] that speaks LSP work-done progress.
//!
//! Each presentation gets its own token and is rendered as the usual
//! `Begin` / `Report` / `End` sequence of `$/progress` notifications. The
//! notifications are pushed into a channel; whoever owns the client
//! connection forwards them. The editor's cancel button arrives as
//! `window/workDoneProgress/cancel` and is fed back through
//! [`WorkDoneProgressHost::handle_cancel`].
//!
//! ## Usage
//!
//! ```ignore
//! let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//! let host = WorkDoneProgressHost::new(tx);
//! // hand `host` to the coordinator, forward `rx` to the client
//! ```

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use lsp_types::{
    NumberOrString, ProgressParams, ProgressParamsValue, WorkDoneProgress, WorkDoneProgressBegin,
    WorkDoneProgressCancelParams, WorkDoneProgressEnd, WorkDoneProgressReport,
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::host::ProgressHost;

static NEXT_PROGRESS_ID: AtomicU64 = AtomicU64::new(1);
const PROGRESS_TITLE_PREFIX: &str = "References:";

pub struct WorkDoneProgressHost {
    sink: UnboundedSender<ProgressParams>,
    token: Option<NumberOrString>,
    cancel_requested: Arc<AtomicBool>,
}

impl WorkDoneProgressHost {
    pub fn new(sink: UnboundedSender<ProgressParams>) -> Self {
        Self {
            sink,
            token: None,
            cancel_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shared flag flipped by [`handle_cancel`](Self::handle_cancel).
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel_requested)
    }

    /// Token of the live presentation, if any.
    pub fn token(&self) -> Option<&NumberOrString> {
        self.token.as_ref()
    }

    /// Apply a `window/workDoneProgress/cancel` notification. Tokens that do
    /// not belong to the live presentation are ignored.
    pub fn handle_cancel(
        &self,
        params: &WorkDoneProgressCancelParams,
    ) -> bool {
        if self.token.as_ref() != Some(&params.token) {
            debug!("ignoring cancel for unknown progress token {:?}", params.token);
            return false;
        }
        self.cancel_requested.store(true, Ordering::Release);
        true
    }

    fn send(
        &self,
        token: NumberOrString,
        progress: WorkDoneProgress,
    ) {
        let params = ProgressParams {
            token,
            value: ProgressParamsValue::WorkDone(progress),
        };
        if self.sink.send(params).is_err() {
            warn!("progress notification dropped (client channel closed)");
        }
    }
}

impl ProgressHost for WorkDoneProgressHost {
    fn begin(
        &mut self,
        title: &str,
    ) {
        if let Some(stale) = self.token.take() {
            self.send(
                stale,
                WorkDoneProgress::End(WorkDoneProgressEnd {
                    message: None,
                }),
            );
        }

        let id = NEXT_PROGRESS_ID.fetch_add(1, Ordering::Relaxed);
        let token = NumberOrString::String(format!("references/{}/{id}", title.trim()));
        let display_title = prefixed_progress_title(title);
        self.cancel_requested.store(false, Ordering::Release);

        debug!("progress begin: {display_title}");
        self.send(
            token.clone(),
            WorkDoneProgress::Begin(WorkDoneProgressBegin {
                title: display_title,
                cancellable: Some(true),
                message: None,
                percentage: Some(0),
            }),
        );
        self.token = Some(token);
    }

    fn report(
        &mut self,
        message: &str,
        increment: f64,
    ) {
        let Some(token) = self.token.clone() else {
            return;
        };
        self.send(
            token,
            WorkDoneProgress::Report(WorkDoneProgressReport {
                cancellable: Some(true),
                message: Some(message.to_string()),
                percentage: Some(percentage(increment)),
            }),
        );
    }

    fn end(&mut self) {
        let Some(token) = self.token.take() else {
            return;
        };
        debug!("progress end: {token:?}");
        self.send(
            token,
            WorkDoneProgress::End(WorkDoneProgressEnd {
                message: None,
            }),
        );
    }

    fn cancellation_requested(&self) -> bool {
        self.cancel_requested.load(Ordering::Acquire)
    }
}

impl Drop for WorkDoneProgressHost {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            debug!("progress cancelled (drop): {token:?}");
            self.send(
                token,
                WorkDoneProgress::End(WorkDoneProgressEnd {
                    message: Some("Cancelled".to_string()),
                }),
            );
        }
    }
}

fn percentage(increment: f64) -> u32 {
    increment.clamp(0.0, 100.0).floor() as u32
}

fn prefixed_progress_title(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.starts_with(PROGRESS_TITLE_PREFIX) {
        return trimmed.to_owned();
    }
    format!("{PROGRESS_TITLE_PREFIX} {trimmed}")
}

#[cfg(test)]
#[path = "../../tests/src/progress/work_done_tests.rs"]
mod tests;
