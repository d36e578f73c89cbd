//! Progress aggregation: turning engine notifications into a smoothed,
//! throttled presentation.

mod presentation;
mod tally;
mod throttle;
pub mod work_done;

pub use presentation::{
    DEFAULT_START_DELAY, DEFAULT_TICK_INTERVAL, GenerationHandle, PresentationMachine, PresentationPhase,
    PresentationStep,
};
pub use tally::{
    PROCESSING_SOURCE_MESSAGE, ProgressReport, SEARCHING_MESSAGE, STARTED_MESSAGE, TargetTally, compute_report,
};
pub use throttle::ProgressThrottle;
pub use work_done::WorkDoneProgressHost;
