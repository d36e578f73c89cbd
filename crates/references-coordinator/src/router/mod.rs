//! Routing of a finished result set to the flow selected for the operation.
//!
//! Rename results go to [`RenameFlow`]; Find and Peek results go to
//! [`ListFlow`]. The flow is chosen once, when the command mode is resolved,
//! and every later call goes to that flow.

mod list;
mod rename;
mod text;

use tracing::debug;

pub use list::ListFlow;
pub use rename::{ConfirmationOutcome, RenameFlow};
pub use text::render_text_summary;

use crate::{
    cancellation::CancellationFlags,
    model::{ReferencesCommandMode, ReferencesResult},
};

/// Request bookkeeping for the hosting list view. Lives across operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewRequestState {
    /// The view has issued at least one request.
    pub request_has_occurred: bool,
    /// The view issued a request while an operation was still running.
    pub request_pending: bool,
    /// A refresh was triggered and the view has not re-requested yet.
    pub refresh_pending: bool,
}

/// Inputs to a routing decision.
pub struct RouteContext<'a> {
    pub mode: ReferencesCommandMode,
    pub flags: CancellationFlags,
    pub group_by_file: bool,
    pub view: &'a mut ViewRequestState,
    pub last_results: &'a mut Option<ReferencesResult>,
}

/// What the coordinator must do with the caller's result callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    Deliver {
        result: Option<ReferencesResult>,
        resolve: bool,
    },
    /// An interactive surface is open; the callback fires on completion.
    AwaitingConfirmation,
    /// The hosting view was asked to refresh; it will re-request and be
    /// answered from the cached results.
    RefreshTriggered,
}

/// One way of finishing an operation.
pub trait ResultFlow: Send {
    /// Called when an operation in this flow starts.
    fn prepare(
        &mut self,
        mode: ReferencesCommandMode,
    );

    /// Show a non-final result. Most flows have nothing to show.
    fn update_partial(
        &mut self,
        _result: &ReferencesResult,
        _group_by_file: bool,
    ) {
    }

    /// Handle the finished result.
    fn route(
        &mut self,
        result: ReferencesResult,
        ctx: RouteContext<'_>,
    ) -> RouteOutcome;

    fn set_group_by_file(
        &mut self,
        group_by_file: bool,
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlowKind {
    Rename,
    List,
}

pub struct ResultRouter {
    rename: RenameFlow,
    list: ListFlow,
    active: Option<FlowKind>,
}

impl ResultRouter {
    pub fn new(
        rename: RenameFlow,
        list: ListFlow,
    ) -> Self {
        Self {
            rename,
            list,
            active: None,
        }
    }

    pub fn list_mut(&mut self) -> &mut ListFlow {
        &mut self.list
    }

    /// Pick the flow for a newly resolved mode.
    pub fn select(
        &mut self,
        mode: ReferencesCommandMode,
    ) {
        // Whatever the new mode, a confirmation from an earlier rename
        // must not receive this operation's completion.
        self.rename.close_stale();
        self.active = match mode {
            ReferencesCommandMode::Rename => Some(FlowKind::Rename),
            ReferencesCommandMode::Find | ReferencesCommandMode::Peek => Some(FlowKind::List),
            ReferencesCommandMode::None => None,
        };
        if let Some(flow) = self.active_flow() {
            flow.prepare(mode);
        }
    }

    fn active_flow(&mut self) -> Option<&mut dyn ResultFlow> {
        match self.active? {
            FlowKind::Rename => Some(&mut self.rename),
            FlowKind::List => Some(&mut self.list),
        }
    }

    pub fn update_partial(
        &mut self,
        result: &ReferencesResult,
        group_by_file: bool,
    ) {
        if let Some(flow) = self.active_flow() {
            flow.update_partial(result, group_by_file);
        }
    }

    /// Route a finished result. With no flow selected (the engine finished
    /// before announcing a start) the result goes straight to the caller.
    pub fn route(
        &mut self,
        result: ReferencesResult,
        ctx: RouteContext<'_>,
    ) -> RouteOutcome {
        let flags = ctx.flags;
        let outcome = match self.active_flow() {
            Some(flow) => flow.route(result, ctx),
            None => {
                debug!("finished result without an active flow; delivering directly");
                RouteOutcome::Deliver {
                    result: Some(result),
                    resolve: !flags.canceled_while_previewing,
                }
            },
        };
        if outcome != RouteOutcome::AwaitingConfirmation {
            self.active = None;
        }
        outcome
    }

    pub fn rename_pending(&self) -> bool {
        self.rename.is_pending()
    }

    /// Close a confirmation surface left open by an earlier operation.
    pub fn close_stale_confirmation(&mut self) {
        if self.rename.close_stale() {
            self.active = None;
        }
    }

    /// # Panics
    ///
    /// Panics if no rename confirmation surface is open.
    pub fn complete_rename(
        &mut self,
        outcome: ConfirmationOutcome,
    ) -> RouteOutcome {
        let routed = self.rename.complete(outcome);
        self.active = None;
        routed
    }

    /// Push a new grouping preference to both presentation surfaces.
    pub fn set_group_by_file(
        &mut self,
        group_by_file: bool,
    ) {
        self.rename.set_group_by_file(group_by_file);
        self.list.set_group_by_file(group_by_file);
    }
}
