//! Lifecycle of the host progress presentation for one operation.
//!
//! ```text
//! Idle ──start──► AwaitingDelay ──delay elapsed──► Presenting ──finish──► Finished
//!                      │                            │    ▲
//!                      └────────finish──────────────┼────┼──► Finished
//!                                                   └tick┘ (Tick | Restart)
//! ```
//!
//! The machine owns no timers. The scheduler asks for [`next_deadline`] and
//! calls [`on_deadline`] once it has passed.
//!
//! [`next_deadline`]: PresentationMachine::next_deadline
//! [`on_deadline`]: PresentationMachine::on_deadline

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::time::Instant;
use tracing::debug;

pub const DEFAULT_START_DELAY: Duration = Duration::from_millis(2000);
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// Version counter bumped whenever a newer request supersedes the one being
/// presented.
///
/// Cloned handles share the same counter.
#[derive(Debug, Clone, Default)]
pub struct GenerationHandle(Arc<AtomicU64>);

impl GenerationHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    /// Advance the counter, returning the new value.
    pub fn bump(&self) -> u64 {
        self.0.fetch_add(1, Ordering::AcqRel) + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationPhase {
    Idle,
    AwaitingDelay {
        deadline: Instant,
    },
    Presenting {
        version: u64,
        next_tick: Instant,
    },
    Finished,
}

/// What the owner must do after a deadline fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationStep {
    /// The start delay elapsed: show the presentation.
    Show,
    /// Periodic refresh of a live presentation.
    Tick,
    /// The generation advanced: tear the presentation down and show a
    /// fresh one.
    Restart,
}

#[derive(Debug)]
pub struct PresentationMachine {
    phase: PresentationPhase,
    start_delay: Duration,
    tick_interval: Duration,
    generation: GenerationHandle,
}

impl PresentationMachine {
    pub fn new(
        start_delay: Duration,
        tick_interval: Duration,
        generation: GenerationHandle,
    ) -> Self {
        Self {
            phase: PresentationPhase::Idle,
            start_delay,
            tick_interval,
            generation,
        }
    }

    pub fn set_timing(
        &mut self,
        start_delay: Duration,
        tick_interval: Duration,
    ) {
        self.start_delay = start_delay;
        self.tick_interval = tick_interval;
    }

    pub fn phase(&self) -> PresentationPhase {
        self.phase
    }

    pub fn is_presenting(&self) -> bool {
        matches!(self.phase, PresentationPhase::Presenting { .. })
    }

    /// Arm the start delay for a new operation.
    pub fn start(
        &mut self,
        now: Instant,
    ) {
        self.phase = PresentationPhase::AwaitingDelay {
            deadline: now + self.start_delay,
        };
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match self.phase {
            PresentationPhase::AwaitingDelay {
                deadline,
            } => Some(deadline),
            PresentationPhase::Presenting {
                next_tick, ..
            } => Some(next_tick),
            PresentationPhase::Idle | PresentationPhase::Finished => None,
        }
    }

    pub fn on_deadline(
        &mut self,
        now: Instant,
    ) -> Option<PresentationStep> {
        match self.phase {
            PresentationPhase::AwaitingDelay {
                deadline,
            } if now >= deadline => {
                let version = self.generation.current();
                debug!("progress start delay elapsed (generation={version})");
                self.phase = PresentationPhase::Presenting {
                    version,
                    next_tick: now + self.tick_interval,
                };
                Some(PresentationStep::Show)
            },
            PresentationPhase::Presenting {
                version,
                next_tick,
            } if now >= next_tick => {
                let current = self.generation.current();
                self.phase = PresentationPhase::Presenting {
                    version: current,
                    next_tick: now + self.tick_interval,
                };
                if current != version {
                    debug!("progress presentation superseded (generation {version} -> {current})");
                    Some(PresentationStep::Restart)
                } else {
                    Some(PresentationStep::Tick)
                }
            },
            _ => None,
        }
    }

    /// Return to `Idle` ahead of a new operation. Returns true if a
    /// presentation was on screen and must be hidden.
    pub fn reset(&mut self) -> bool {
        let was_presenting = self.is_presenting();
        self.phase = PresentationPhase::Idle;
        was_presenting
    }

    /// Move to the terminal state. Returns true if the presentation was on
    /// screen and must be hidden.
    pub fn finish(&mut self) -> bool {
        let was_presenting = self.is_presenting();
        self.phase = PresentationPhase::Finished;
        was_presenting
    }
}

#[cfg(test)]
#[path = "../../tests/src/progress/presentation_tests.rs"]
mod tests;
