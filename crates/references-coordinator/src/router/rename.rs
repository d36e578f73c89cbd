use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{ResultFlow, RouteContext, RouteOutcome};
use crate::{
    host::ConfirmationSurface,
    model::{ReferencesCommandMode, ReferencesResult},
};

/// How the user left the rename confirmation surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum ConfirmationOutcome {
    /// Apply the rename with the (possibly edited) result.
    Accepted {
        result: ReferencesResult,
    },
    /// The surface was closed without applying anything.
    Dismissed,
}

/// Completes a rename immediately or after interactive confirmation.
pub struct RenameFlow {
    surface: Box<dyn ConfirmationSurface>,
    pending: bool,
}

impl RenameFlow {
    pub fn new(surface: Box<dyn ConfirmationSurface>) -> Self {
        Self {
            surface,
            pending: false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Hide a confirmation surface left open by an earlier operation.
    /// Returns true if one was open.
    pub fn close_stale(&mut self) -> bool {
        if !self.pending {
            return false;
        }
        debug!("closing stale rename confirmation");
        self.pending = false;
        self.surface.hide();
        true
    }

    /// Finish the interaction started by [`ResultFlow::route`].
    ///
    /// # Panics
    ///
    /// Panics if no confirmation surface is open.
    pub fn complete(
        &mut self,
        outcome: ConfirmationOutcome,
    ) -> RouteOutcome {
        assert!(self.pending, "rename completion requested while no confirmation surface is open");
        self.pending = false;
        self.surface.hide();
        match outcome {
            ConfirmationOutcome::Accepted {
                result,
            } => {
                info!("rename confirmed with {} reference(s)", result.references.len());
                RouteOutcome::Deliver {
                    result: Some(result),
                    resolve: true,
                }
            },
            ConfirmationOutcome::Dismissed => {
                info!("rename confirmation dismissed");
                RouteOutcome::Deliver {
                    result: None,
                    resolve: false,
                }
            },
        }
    }
}

impl ResultFlow for RenameFlow {
    fn prepare(
        &mut self,
        _mode: ReferencesCommandMode,
    ) {
        self.close_stale();
    }

    fn route(
        &mut self,
        result: ReferencesResult,
        ctx: RouteContext<'_>,
    ) -> RouteOutcome {
        if ctx.flags.canceled {
            info!("rename canceled; discarding {} reference(s)", result.references.len());
            return RouteOutcome::Deliver {
                result: None,
                resolve: false,
            };
        }

        if result.all_confirmed() {
            debug!("all {} rename reference(s) confirmed; completing immediately", result.references.len());
            return RouteOutcome::Deliver {
                result: Some(result),
                resolve: true,
            };
        }

        debug!("rename has unconfirmed references; asking for confirmation");
        self.surface.show(&result, ctx.group_by_file);
        self.pending = true;
        RouteOutcome::AwaitingConfirmation
    }

    fn set_group_by_file(
        &mut self,
        group_by_file: bool,
    ) {
        self.surface.set_group_by_file(group_by_file);
    }
}
