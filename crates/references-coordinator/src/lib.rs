pub mod cancellation;
pub mod config;
pub mod coordinator;
pub mod driver;
pub mod host;
pub mod mode;
pub mod model;
pub mod preferences;
pub mod progress;
pub mod recording;
pub mod replay;
pub mod router;

pub use cancellation::{CancellationCoordinator, CancellationFlags};
pub use config::{CoordinatorSettings, LogLevel, SettingsError};
pub use coordinator::{INCOMPLETE_INDEX_WARNING, ReferencesCoordinator, StartOutcome};
pub use driver::{DriverClosed, DriverEvent, DriverHandle, OperationDriver};
pub use host::{
    ConfirmationSurface, Hosts, ListSurface, ProgressHost, RefreshTrigger, ResultCallback, SearchEngine, TextPanel,
};
pub use mode::{CommandModeResolver, VisibilityObserver};
pub use model::{
    ReferenceInfo, ReferenceType, ReferencesCommandMode, ReferencesParams, ReferencesProgress, ReferencesResult,
    ReportReferencesProgressNotification, TargetReferencesProgress,
};
pub use preferences::{FilePreferences, GroupByFile, MemoryPreferences, PreferenceError, PreferenceStore};
pub use progress::{GenerationHandle, PresentationPhase, WorkDoneProgressHost};
pub use recording::{Delivery, HostCall, Recorder, RecordingHost};
pub use replay::{ReplayError, ReplayTargets, ScriptEvent, ScriptStep, load_script, parse_script, replay};
pub use router::{ConfirmationOutcome, render_text_summary};
