//! Hosts that record every outbound call.
//!
//! Used by the replay binary to print what a real host would have been
//! asked to do, and by tests to assert on it.

use std::sync::{
    Arc, Mutex, MutexGuard,
    atomic::{AtomicBool, Ordering},
};

use serde::Serialize;
use tracing::debug;

use crate::{
    host::{
        ConfirmationSurface, Hosts, ListSurface, ProgressHost, RefreshTrigger, ResultCallback, SearchEngine, TextPanel,
    },
    model::ReferencesResult,
    preferences::PreferenceStore,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "camelCase")]
pub enum HostCall {
    ProgressBegin {
        title: String,
    },
    ProgressReport {
        message: String,
        increment: f64,
    },
    ProgressEnd,
    ListSetResults {
        references: usize,
        group_by_file: bool,
        canceled: bool,
    },
    ListShow,
    ListClear,
    ListGroupByFile {
        group_by_file: bool,
    },
    ConfirmationShow {
        references: usize,
        group_by_file: bool,
    },
    ConfirmationHide,
    ConfirmationGroupByFile {
        group_by_file: bool,
    },
    TextPanelAppend {
        text: String,
    },
    TextPanelShow,
    TextPanelClear,
    Refresh,
    EngineCancel,
    Callback {
        references: Option<usize>,
        resolve: bool,
    },
}

/// What a result callback received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub result: Option<ReferencesResult>,
    pub resolve: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<HostCall>>>,
    deliveries: Arc<Mutex<Vec<Delivery>>>,
    cancel_requested: Arc<AtomicBool>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &self,
        call: HostCall,
    ) {
        debug!("host call: {call:?}");
        lock(&self.calls).push(call);
    }

    pub fn calls(&self) -> Vec<HostCall> {
        lock(&self.calls).clone()
    }

    pub fn count(
        &self,
        predicate: impl Fn(&HostCall) -> bool,
    ) -> usize {
        lock(&self.calls).iter().filter(|call| predicate(call)).count()
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        lock(&self.deliveries).clone()
    }

    /// Progress reports in the order they were pushed.
    pub fn progress_reports(&self) -> Vec<(String, f64)> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                HostCall::ProgressReport {
                    message,
                    increment,
                } => Some((message.clone(), *increment)),
                _ => None,
            })
            .collect()
    }

    /// Flag read by [`ProgressHost::cancellation_requested`].
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel_requested)
    }

    /// Simulate the user pressing cancel on the progress presentation.
    pub fn request_host_cancel(&self) {
        self.cancel_requested.store(true, Ordering::Release);
    }

    pub fn clear(&self) {
        lock(&self.calls).clear();
        lock(&self.deliveries).clear();
        self.cancel_requested.store(false, Ordering::Release);
    }

    /// A callback that records its invocation.
    pub fn callback(&self) -> ResultCallback {
        let recorder = self.clone();
        Box::new(move |result: Option<ReferencesResult>, resolve: bool| {
            recorder.record(HostCall::Callback {
                references: result.as_ref().map(|r| r.references.len()),
                resolve,
            });
            lock(&recorder.deliveries).push(Delivery {
                result,
                resolve,
            });
        })
    }

    /// A full host bundle backed by this recorder.
    pub fn hosts(
        &self,
        preferences: Box<dyn PreferenceStore>,
    ) -> Hosts {
        Hosts {
            progress: Box::new(RecordingHost(self.clone())),
            list: Box::new(RecordingHost(self.clone())),
            confirmation: Box::new(RecordingHost(self.clone())),
            text_panel: Box::new(RecordingHost(self.clone())),
            refresh: Box::new(RecordingHost(self.clone())),
            engine: Box::new(RecordingHost(self.clone())),
            preferences,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Implements every host trait by appending to a [`Recorder`].
#[derive(Debug, Clone)]
pub struct RecordingHost(pub Recorder);

impl ProgressHost for RecordingHost {
    fn begin(
        &mut self,
        title: &str,
    ) {
        self.0.cancel_requested.store(false, Ordering::Release);
        self.0.record(HostCall::ProgressBegin {
            title: title.to_string(),
        });
    }

    fn report(
        &mut self,
        message: &str,
        increment: f64,
    ) {
        self.0.record(HostCall::ProgressReport {
            message: message.to_string(),
            increment,
        });
    }

    fn end(&mut self) {
        self.0.record(HostCall::ProgressEnd);
    }

    fn cancellation_requested(&self) -> bool {
        self.0.cancel_requested.load(Ordering::Acquire)
    }
}

impl ListSurface for RecordingHost {
    fn set_results(
        &mut self,
        result: &ReferencesResult,
        group_by_file: bool,
        canceled: bool,
    ) {
        self.0.record(HostCall::ListSetResults {
            references: result.references.len(),
            group_by_file,
            canceled,
        });
    }

    fn show(&mut self) {
        self.0.record(HostCall::ListShow);
    }

    fn clear(&mut self) {
        self.0.record(HostCall::ListClear);
    }

    fn set_group_by_file(
        &mut self,
        group_by_file: bool,
    ) {
        self.0.record(HostCall::ListGroupByFile {
            group_by_file,
        });
    }
}

impl ConfirmationSurface for RecordingHost {
    fn show(
        &mut self,
        result: &ReferencesResult,
        group_by_file: bool,
    ) {
        self.0.record(HostCall::ConfirmationShow {
            references: result.references.len(),
            group_by_file,
        });
    }

    fn hide(&mut self) {
        self.0.record(HostCall::ConfirmationHide);
    }

    fn set_group_by_file(
        &mut self,
        group_by_file: bool,
    ) {
        self.0.record(HostCall::ConfirmationGroupByFile {
            group_by_file,
        });
    }
}

impl TextPanel for RecordingHost {
    fn append(
        &mut self,
        text: &str,
    ) {
        self.0.record(HostCall::TextPanelAppend {
            text: text.to_string(),
        });
    }

    fn show(&mut self) {
        self.0.record(HostCall::TextPanelShow);
    }

    fn clear(&mut self) {
        self.0.record(HostCall::TextPanelClear);
    }
}

impl RefreshTrigger for RecordingHost {
    fn refresh(&mut self) {
        self.0.record(HostCall::Refresh);
    }
}

impl SearchEngine for RecordingHost {
    fn request_cancel(&mut self) {
        self.0.record(HostCall::EngineCancel);
    }
}
