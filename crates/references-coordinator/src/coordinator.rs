//! The operation coordinator.
//!
//! [`ReferencesCoordinator`] owns the state of the one operation in flight
//! and is driven from a single logical thread: engine notifications, host
//! events and timer deadlines all arrive as method calls. Nothing blocks;
//! time is passed in by the caller.
//!
//! A host view that issues a new request while an operation is still
//! running reports it with [`note_view_request`] and waits for the running
//! operation to finish before calling [`start_find_all_references`] again.
//!
//! [`note_view_request`]: ReferencesCoordinator::note_view_request
//! [`start_find_all_references`]: ReferencesCoordinator::start_find_all_references

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::{
    cancellation::CancellationCoordinator,
    config::CoordinatorSettings,
    host::{Hosts, ProgressHost, ResultCallback, SearchEngine},
    mode::{CommandModeResolver, VisibilityObserver},
    model::{
        ReferencesCommandMode, ReferencesParams, ReferencesProgress, ReferencesResult,
        ReportReferencesProgressNotification,
    },
    preferences::{GroupByFile, PreferenceStore},
    progress::{
        GenerationHandle, PresentationMachine, PresentationPhase, PresentationStep, ProgressThrottle, compute_report,
    },
    router::{ConfirmationOutcome, ListFlow, RenameFlow, ResultRouter, RouteContext, RouteOutcome, ViewRequestState},
};

pub const INCOMPLETE_INDEX_WARNING: &str =
    "References may be incomplete because the workspace index was not complete when the search started.";

/// How a start request was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new operation is running; the engine should be started.
    Started,
    /// The request was answered from the cached results of a refresh.
    ServedFromCache,
}

/// State of the operation in flight, reset at every start.
#[derive(Default)]
struct OperationState {
    params: Option<ReferencesParams>,
    callback: Option<ResultCallback>,
    notification: Option<ReportReferencesProgressNotification>,
    throttle: ProgressThrottle,
    cancellation: CancellationCoordinator,
    finished: bool,
    started_while_indexing: bool,
}

pub struct ReferencesCoordinator {
    settings: CoordinatorSettings,
    progress: Box<dyn ProgressHost>,
    engine: Box<dyn SearchEngine>,
    preferences: Box<dyn PreferenceStore>,
    group_by_file: GroupByFile,
    router: ResultRouter,
    resolver: CommandModeResolver,
    visibility: VisibilityObserver,
    presentation: PresentationMachine,
    generation: GenerationHandle,
    view: ViewRequestState,
    last_results: Option<ReferencesResult>,
    indexing_in_progress: bool,
    op: OperationState,
}

impl ReferencesCoordinator {
    pub fn new(
        settings: CoordinatorSettings,
        hosts: Hosts,
    ) -> Self {
        let Hosts {
            progress,
            list,
            confirmation,
            text_panel,
            refresh,
            engine,
            preferences,
        } = hosts;

        let generation = GenerationHandle::new();
        let presentation =
            PresentationMachine::new(settings.timing.start_delay(), settings.timing.tick_interval(), generation.clone());
        let mut list_flow = ListFlow::new(list, text_panel, refresh);
        list_flow.set_show_text_panel(settings.presentation.show_text_panel_for_peek);
        let router = ResultRouter::new(RenameFlow::new(confirmation), list_flow);

        Self {
            group_by_file: GroupByFile::new(settings.presentation.group_by_file_default),
            settings,
            progress,
            engine,
            preferences,
            router,
            resolver: CommandModeResolver::new(),
            visibility: VisibilityObserver::new(),
            presentation,
            generation,
            view: ViewRequestState::default(),
            last_results: None,
            indexing_in_progress: false,
            op: OperationState::default(),
        }
    }

    pub fn settings(&self) -> &CoordinatorSettings {
        &self.settings
    }

    pub fn apply_settings(
        &mut self,
        settings: CoordinatorSettings,
    ) {
        self.presentation.set_timing(settings.timing.start_delay(), settings.timing.tick_interval());
        self.router.list_mut().set_show_text_panel(settings.presentation.show_text_panel_for_peek);
        self.group_by_file = GroupByFile::new(settings.presentation.group_by_file_default);
        self.settings = settings;
    }

    /// Handle shared with whoever needs to signal a superseding request.
    pub fn generation(&self) -> GenerationHandle {
        self.generation.clone()
    }

    pub fn active_mode(&self) -> ReferencesCommandMode {
        self.resolver.active()
    }

    pub fn presentation_phase(&self) -> PresentationPhase {
        self.presentation.phase()
    }

    pub fn view_state(&self) -> ViewRequestState {
        self.view
    }

    pub fn last_results(&self) -> Option<&ReferencesResult> {
        self.last_results.as_ref()
    }

    pub fn current_params(&self) -> Option<&ReferencesParams> {
        self.op.params.as_ref()
    }

    pub fn rename_pending(&self) -> bool {
        self.router.rename_pending()
    }

    pub fn is_operation_running(&self) -> bool {
        !self.op.finished && (self.op.callback.is_some() || self.resolver.active().is_active())
    }

    /// When the scheduler must next call [`on_deadline`](Self::on_deadline).
    pub fn next_deadline(&self) -> Option<Instant> {
        self.presentation.next_deadline()
    }

    pub fn group_by_file(&self) -> bool {
        self.group_by_file.get(&*self.preferences)
    }

    /// Flip the grouping preference, persist it and push it to both
    /// presentation surfaces. Returns the new value.
    pub fn toggle_group_by_file(&mut self) -> bool {
        let value = !self.group_by_file();
        if let Err(error) = self.group_by_file.set(&mut *self.preferences, value) {
            warn!("failed to persist group-by-file preference: {error}");
        }
        self.router.set_group_by_file(value);
        value
    }

    /// Whether an unrelated indexing pass is currently running. Operations
    /// started meanwhile get a warning attached to their result.
    pub fn set_indexing_in_progress(
        &mut self,
        in_progress: bool,
    ) {
        self.indexing_in_progress = in_progress;
    }

    /// Host-driven visible content length sample.
    pub fn update_visible_length(
        &mut self,
        visible_len: usize,
        now: Instant,
    ) {
        if self.visibility.update(visible_len, now) {
            debug!("visible content length dropped to {visible_len}");
        }
    }

    pub fn start_find_all_references(
        &mut self,
        params: ReferencesParams,
        callback: ResultCallback,
    ) -> StartOutcome {
        if self.view.refresh_pending
            && let Some(cached) = self.last_results.clone()
        {
            self.view.refresh_pending = false;
            info!("answering refreshed view request with {} cached reference(s)", cached.references.len());
            callback(Some(cached), true);
            return StartOutcome::ServedFromCache;
        }
        self.begin_operation(params, callback);
        StartOutcome::Started
    }

    pub fn start_rename(
        &mut self,
        params: ReferencesParams,
        callback: ResultCallback,
    ) -> StartOutcome {
        self.begin_operation(params, callback);
        StartOutcome::Started
    }

    fn begin_operation(
        &mut self,
        params: ReferencesParams,
        callback: ResultCallback,
    ) {
        if self.is_operation_running() {
            warn!("starting a new reference operation before the previous one finished");
        }
        if self.presentation.reset() {
            self.progress.end();
        }
        self.router.close_stale_confirmation();
        debug!("reference operation requested at {}:{:?}", params.file.display(), params.position);
        self.op = OperationState {
            params: Some(params),
            callback: Some(callback),
            started_while_indexing: self.indexing_in_progress,
            ..OperationState::default()
        };
        self.view.request_pending = false;
    }

    pub fn handle_progress(
        &mut self,
        notification: ReportReferencesProgressNotification,
        now: Instant,
    ) {
        if let Some(kind) = notification.reference_progress.start_kind() {
            if self.op.finished {
                warn!("engine announced a start without a new request; resetting operation state");
                self.op = OperationState::default();
            }
            let mode = self.resolver.resolve(kind, &self.visibility, self.settings.timing.peek_window(), now);
            self.router.select(mode);
            self.presentation.start(now);
            self.op.notification = Some(notification);
            return;
        }

        if self.op.finished || !self.resolver.active().is_active() {
            debug!("ignoring {:?} notification outside a running operation", notification.reference_progress);
            return;
        }
        self.op.notification = Some(notification);
        if self.presentation.is_presenting() {
            self.push_progress(false);
        }
    }

    /// Advance timers. Call whenever [`next_deadline`](Self::next_deadline)
    /// has passed.
    pub fn on_deadline(
        &mut self,
        now: Instant,
    ) {
        let Some(step) = self.presentation.on_deadline(now) else {
            return;
        };
        let title = self.resolver.active().title();
        match step {
            PresentationStep::Show => {
                info!("showing progress for {title}");
                self.progress.begin(title);
                self.op.throttle.reset();
                self.push_progress(true);
            },
            PresentationStep::Tick => {
                self.poll_host_cancellation();
                self.push_progress(false);
            },
            PresentationStep::Restart => {
                self.poll_host_cancellation();
                info!("restarting superseded progress for {title}");
                self.progress.end();
                self.progress.begin(title);
                self.op.throttle.reset();
                self.push_progress(true);
            },
        }
    }

    fn poll_host_cancellation(&mut self) {
        if self.progress.cancellation_requested() && !self.op.cancellation.is_canceled() {
            self.op.cancellation.cancel(&mut *self.engine, false);
        }
    }

    fn push_progress(
        &mut self,
        force: bool,
    ) {
        let report = match &self.op.notification {
            Some(notification) => compute_report(notification),
            None => compute_report(&ReportReferencesProgressNotification::stage(ReferencesProgress::Started)),
        };
        if let Some(pushed) = self.op.throttle.offer(&report, force) {
            self.progress.report(&pushed.message, pushed.increment);
        }
    }

    /// Cancellation requested by the surface that issued the request (a
    /// closed Peek, an abandoned rename). Late requests are ignored.
    pub fn request_cancel(&mut self) {
        if !self.is_operation_running() {
            debug!("cancellation after the operation finished is a no-op");
            return;
        }
        let previewing = self.resolver.active().is_previewing();
        self.op.cancellation.cancel(&mut *self.engine, previewing);
    }

    /// A request was issued on the hosting view.
    pub fn note_view_request(&mut self) {
        self.view.request_has_occurred = true;
        if self.is_operation_running() {
            debug!("view request arrived while an operation is running");
            self.view.request_pending = true;
            self.note_new_request();
        }
    }

    /// Mark the presented operation as superseded. The next tick restarts
    /// the progress presentation.
    pub fn note_new_request(&mut self) {
        if self.resolver.active().is_active() {
            let generation = self.generation.bump();
            debug!("progress generation advanced to {generation}");
        }
    }

    pub fn handle_result(
        &mut self,
        result: ReferencesResult,
    ) {
        if !result.is_finished {
            if !self.op.finished {
                let group_by_file = self.group_by_file();
                self.router.update_partial(&result, group_by_file);
            }
            return;
        }
        if self.op.finished {
            debug!("ignoring duplicate finished result");
            return;
        }
        self.op.finished = true;

        if self.presentation.finish() {
            self.progress.end();
        }
        let mode = self.resolver.take();
        let flags = self.op.cancellation.take_flags();
        let result = if self.op.started_while_indexing {
            result.with_warning(INCOMPLETE_INDEX_WARNING)
        } else {
            result
        };
        let group_by_file = self.group_by_file();
        info!(
            "{} finished with {} reference(s) (canceled={}, canceled_while_previewing={})",
            if mode.is_active() {
                mode.title()
            } else {
                "reference operation"
            },
            result.references.len(),
            flags.canceled,
            flags.canceled_while_previewing
        );

        let outcome = self.router.route(
            result,
            RouteContext {
                mode,
                flags,
                group_by_file,
                view: &mut self.view,
                last_results: &mut self.last_results,
            },
        );
        self.apply_outcome(outcome);
    }

    /// Finish the rename confirmation opened for the last result.
    ///
    /// # Panics
    ///
    /// Panics if no rename confirmation surface is open.
    pub fn complete_rename(
        &mut self,
        outcome: ConfirmationOutcome,
    ) {
        let routed = self.router.complete_rename(outcome);
        self.apply_outcome(routed);
    }

    fn apply_outcome(
        &mut self,
        outcome: RouteOutcome,
    ) {
        match outcome {
            RouteOutcome::Deliver {
                result,
                resolve,
            } => self.deliver(result, resolve),
            RouteOutcome::AwaitingConfirmation => debug!("waiting for rename confirmation"),
            RouteOutcome::RefreshTriggered => {
                if self.op.callback.take().is_some() {
                    debug!("request handed over to the refreshed view");
                }
            },
        }
    }

    fn deliver(
        &mut self,
        result: Option<ReferencesResult>,
        resolve: bool,
    ) {
        let Some(callback) = self.op.callback.take() else {
            panic!("reference result delivered with no registered result callback");
        };
        callback(result, resolve);
    }
}
