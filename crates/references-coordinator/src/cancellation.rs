use tracing::info;

use crate::host::SearchEngine;

/// Snapshot of the cancellation state taken when a result is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CancellationFlags {
    pub canceled: bool,
    pub canceled_while_previewing: bool,
}

/// Single source of truth for whether the running operation was canceled.
#[derive(Debug, Default)]
pub struct CancellationCoordinator {
    flags: CancellationFlags,
}

impl CancellationCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_canceled(&self) -> bool {
        self.flags.canceled
    }

    pub fn flags(&self) -> CancellationFlags {
        self.flags
    }

    /// Cancel the operation. The engine is signaled only on the first call;
    /// later calls return false and change nothing.
    ///
    /// `previewing` marks that a Peek or Rename preview was on screen.
    pub fn cancel(
        &mut self,
        engine: &mut dyn SearchEngine,
        previewing: bool,
    ) -> bool {
        if self.flags.canceled {
            return false;
        }
        info!("canceling reference search (previewing={previewing})");
        self.flags.canceled = true;
        self.flags.canceled_while_previewing = previewing;
        engine.request_cancel();
        true
    }

    /// Read both flags and reset them for the next operation.
    pub fn take_flags(&mut self) -> CancellationFlags {
        std::mem::take(&mut self.flags)
    }
}

#[cfg(test)]
#[path = "../tests/src/cancellation_tests.rs"]
mod tests;
