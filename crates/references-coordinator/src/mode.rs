//! Command-mode resolution and the visibility-drop heuristic behind it.
//!
//! A Peek presentation shrinks the host editor's visible content right
//! before the search starts. [`VisibilityObserver`] samples the visible
//! content length on every host update and remembers when it last went
//! down; [`resolve_mode`] turns that into Peek versus Find.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::model::{ReferencesCommandMode, StartKind};

pub const DEFAULT_PEEK_WINDOW: Duration = Duration::from_millis(1000);

/// Pick the command mode for a starting operation.
pub fn resolve_mode(
    kind: StartKind,
    recent_visibility_drop: bool,
) -> ReferencesCommandMode {
    match kind {
        StartKind::StartedRename => ReferencesCommandMode::Rename,
        StartKind::Started if recent_visibility_drop => ReferencesCommandMode::Peek,
        StartKind::Started => ReferencesCommandMode::Find,
    }
}

/// Tracks the host-reported visible content length over time.
#[derive(Debug, Default)]
pub struct VisibilityObserver {
    previous_len: Option<usize>,
    last_decrease: Option<Instant>,
}

impl VisibilityObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new sample. Returns true when it is smaller than the
    /// previous one.
    pub fn update(
        &mut self,
        visible_len: usize,
        now: Instant,
    ) -> bool {
        let decreased = self.previous_len.is_some_and(|previous| visible_len < previous);
        if decreased {
            self.last_decrease = Some(now);
        }
        self.previous_len = Some(visible_len);
        decreased
    }

    /// Whether a decrease was recorded within `window` before `now`.
    pub fn decreased_within(
        &self,
        window: Duration,
        now: Instant,
    ) -> bool {
        self.last_decrease.is_some_and(|at| now.saturating_duration_since(at) <= window)
    }
}

/// Holds the mode of the running operation.
///
/// Set once when the operation starts, cleared when its terminal result is
/// processed.
#[derive(Debug, Default)]
pub struct CommandModeResolver {
    active: ReferencesCommandMode,
}

impl CommandModeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(
        &mut self,
        kind: StartKind,
        observer: &VisibilityObserver,
        peek_window: Duration,
        now: Instant,
    ) -> ReferencesCommandMode {
        let recent_drop = observer.decreased_within(peek_window, now);
        let mode = resolve_mode(kind, recent_drop);
        if self.active.is_active() {
            debug!("replacing active mode {:?} with {mode:?}", self.active);
        }
        debug!("resolved command mode {mode:?} (start={kind:?}, recent visibility drop={recent_drop})");
        self.active = mode;
        mode
    }

    pub fn active(&self) -> ReferencesCommandMode {
        self.active
    }

    /// Clear the active mode, returning what it was.
    pub fn take(&mut self) -> ReferencesCommandMode {
        std::mem::take(&mut self.active)
    }
}

#[cfg(test)]
#[path = "../tests/src/mode_tests.rs"]
mod tests;
