use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    time::Duration,
};

use clap::Parser;
use tokio::sync::mpsc::unbounded_channel;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use references_coordinator::{
    CoordinatorSettings, FilePreferences, MemoryPreferences, PreferenceStore, Recorder, ReplayTargets,
    WorkDoneProgressHost, load_script, replay,
};

/// Replay a recorded reference-search session and print every host call.
#[derive(Parser, Debug)]
#[command(name = "refs-replay", version, about)]
struct Args {
    /// JSON-lines script of timed engine and host events.
    script: PathBuf,

    /// Settings file (`.toml` or JSON).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// JSON file backing persisted preferences. In-memory when omitted.
    #[arg(long)]
    preferences: Option<PathBuf>,

    /// Emit LSP `$/progress` notifications instead of recorded progress calls.
    #[arg(long)]
    lsp_progress: bool,

    #[arg(long, short)]
    verbose: bool,

    #[arg(long)]
    log_file: Option<String>,

    /// How long to keep timers running after the last step.
    #[arg(long, default_value_t = 0)]
    drain_ms: u64,
}

fn default_log_path() -> PathBuf {
    std::env::temp_dir().join("refs-replay.log")
}

fn init_logging(
    args: &Args,
    settings: &CoordinatorSettings,
) -> PathBuf {
    let directive = if args.verbose {
        "references_coordinator=debug".to_string()
    } else {
        settings.logging.level.filter_directive()
    };

    let log_path = args.log_file.as_ref().map(PathBuf::from).unwrap_or_else(default_log_path);

    let file_appender = tracing_appender::rolling::never(
        log_path.parent().unwrap_or(Path::new(".")),
        log_path.file_name().unwrap_or(std::ffi::OsStr::new("refs-replay.log")),
    );

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(false)
        .with_filter(EnvFilter::new(&directive));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_filter(EnvFilter::new(&directive));

    tracing_subscriber::registry().with(file_layer).with(stderr_layer).init();
    log_path
}

fn open_preferences(path: Option<&Path>) -> Result<Box<dyn PreferenceStore>, String> {
    match path {
        Some(path) => FilePreferences::open(path)
            .map(|store| Box::new(store) as Box<dyn PreferenceStore>)
            .map_err(|error| error.to_string()),
        None => Ok(Box::new(MemoryPreferences::new())),
    }
}

fn print_json(value: &impl serde::Serialize) {
    match serde_json::to_string(value) {
        Ok(line) => println!("{line}"),
        Err(error) => error!("failed to serialize output line: {error}"),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => match CoordinatorSettings::load(path) {
            Ok(settings) => settings,
            Err(error) => {
                eprintln!("refs-replay: {error}");
                return ExitCode::FAILURE;
            },
        },
        None => CoordinatorSettings::default(),
    };

    let log_path = init_logging(&args, &settings);
    info!("refs-replay v{}", env!("CARGO_PKG_VERSION"));
    info!("Log file: {}", log_path.display());

    let steps = match load_script(&args.script) {
        Ok(steps) => steps,
        Err(error) => {
            error!("{error}");
            return ExitCode::FAILURE;
        },
    };

    let preferences = match open_preferences(args.preferences.as_deref()) {
        Ok(preferences) => preferences,
        Err(error) => {
            error!("{error}");
            return ExitCode::FAILURE;
        },
    };

    let recorder = Recorder::new();
    let mut hosts = recorder.hosts(preferences);
    let mut host_cancel = recorder.cancel_flag();
    let mut forwarder = None;

    if args.lsp_progress {
        let (tx, mut rx) = unbounded_channel();
        let host = WorkDoneProgressHost::new(tx);
        host_cancel = host.cancel_flag();
        hosts.progress = Box::new(host);
        forwarder = Some(tokio::spawn(async move {
            while let Some(params) = rx.recv().await {
                print_json(&params);
            }
        }));
    }

    let callback_recorder = recorder.clone();
    let targets = ReplayTargets {
        hosts,
        host_cancel,
        callback: Box::new(move || callback_recorder.callback()),
    };

    let outcome = replay(&steps, settings, targets, Duration::from_millis(args.drain_ms)).await;

    // The coordinator owns the progress sender; dropping it closes the forwarder.
    let coordinator = match outcome {
        Ok(coordinator) => coordinator,
        Err(error) => {
            error!("{error}");
            return ExitCode::FAILURE;
        },
    };
    let running = coordinator.is_operation_running();
    drop(coordinator);
    if let Some(forwarder) = forwarder
        && let Err(error) = forwarder.await
    {
        error!("progress forwarder failed: {error}");
    }

    for call in recorder.calls() {
        print_json(&call);
    }

    if running {
        info!("script ended with an operation still running");
    }
    info!("replay finished: {} result delivery(ies)", recorder.deliveries().len());
    ExitCode::SUCCESS
}
