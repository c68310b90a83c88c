//! tr2d - launcher for the tr2d cell-tracking workbench
//!
//! Main entry point. It initializes:
//! - Settings ([`SettingsManager`]: `tr2d.yaml` in the user config directory + `TR2D_*` env)
//! - Logging infrastructure (file rotation + console output)
//! - Tokio runtime (hosts the auto-run tracking worker)
//! - The default collaborators and the [`LifecycleController`]
//!
//! The lifecycle runs on the main thread and blocks on dialogs and the workbench; its
//! [`ExitOutcome`](tr2d::ExitOutcome) becomes the process exit code.
//!
//! # Execution Flow
//!
//! 1. Load settings (writing a default `tr2d.yaml` on first run), initialize logging → logs/tr2d.<date>
//! 2. Create tokio runtime
//! 3. Run the lifecycle with the command-line arguments
//! 4. Shutdown tokio runtime with 5s timeout
//! 5. Exit with the lifecycle's exit code

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tr2d::services::{CommandTracker, GurobiProbe, SessionExporter, TiffStackLoader};
use tr2d::ui::{ConsoleWorkbench, RfdPrompter};
use tr2d::{APP_NAME, Collaborators, LifecycleController, SettingsManager, VERSION, WindowStateStore};

const WORKER_THREADS: usize = 2;

fn settings_dir() -> Utf8PathBuf {
    dirs::config_dir()
        .and_then(|dir| Utf8PathBuf::try_from(dir).ok())
        .map(|dir| dir.join(APP_NAME))
        .unwrap_or_else(|| Utf8PathBuf::from("."))
}

fn main() -> Result<()> {
    let settings_manager = SettingsManager::new(settings_dir())?;
    let settings = settings_manager.load()?;

    let log_guard = tr2d::logging::init(&settings.logging)?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);
    tracing::info!("Settings directory: {}", settings_manager.settings_dir());
    if let Err(e) = settings_manager.write_defaults_if_missing() {
        tracing::warn!("Could not write default settings: {:#}", e);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(WORKER_THREADS)
        .thread_name("tr2d-worker")
        .build()
        .context("Failed to create tokio runtime")?;

    tracing::info!("Tokio runtime initialized with {} worker threads", WORKER_THREADS);

    let collaborators = Collaborators {
        prompter: Box::new(RfdPrompter::new()),
        optimizer: Box::new(GurobiProbe::from_settings(&settings.optimizer)),
        loader: Box::new(TiffStackLoader::new()),
        workbench: Box::new(ConsoleWorkbench::stdio()),
        tracker: Arc::new(CommandTracker::from_settings(&settings.tracking)),
        exporter: Box::new(SessionExporter::new()),
    };
    let window_state = WindowStateStore::new(settings.window.default_geometry());

    let controller =
        LifecycleController::new(collaborators, window_state, runtime.handle().clone());
    let outcome = controller.run(std::env::args_os().skip(1));

    runtime.shutdown_timeout(Duration::from_secs(5));

    if outcome.is_success() {
        tracing::info!("Application shutdown complete");
    } else {
        tracing::warn!(
            "Application shutdown complete (exit code {}: {})",
            outcome.code,
            outcome.cause
        );
    }

    // process::exit skips destructors; flush the log file first
    drop(log_guard);
    std::process::exit(outcome.code);
}
