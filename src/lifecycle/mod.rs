//! The application lifecycle.
//!
//! [`LifecycleController`] drives one launcher run from the command line to an [`ExitOutcome`]:
//!
//! ```text
//! Init -> OptimizerCheck -> SourceResolution -> DatasetLoad -> Running
//!      -> ShutdownConfirm -> [Exporting] -> PersistingState -> Terminated
//! ```
//!
//! Every fatal error jumps straight to `Terminated` with the exit code of its
//! [`LaunchError`]. Everything the controller touches outside its own state comes in through
//! [`Collaborators`].

pub mod selector;

pub use selector::{SourceBinding, SourceSelector};

use crate::cli;
use crate::error::{ExportWarning, LaunchError};
use crate::metrics::Metrics;
use crate::models::{ExitOutcome, LaunchConfig};
use crate::project::{ProjectFolder, WindowStateStore};
use crate::services::{Dataset, DatasetLoader, Exporter, OptimizerProbe, TrackingJob, TrackingRunner};
use crate::state::{LifecycleState, StateTracker};
use crate::ui::{NoticeLevel, Prompt, PromptExt, Prompter, Selection, Workbench};
use camino::Utf8Path;
use std::ffi::OsString;
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

const QUIT_OPTIONS: [&str; 2] = ["Quit", "Cancel"];

/// The external capabilities a run depends on.
pub struct Collaborators {
    pub prompter: Box<dyn Prompter>,
    pub optimizer: Box<dyn OptimizerProbe>,
    pub loader: Box<dyn DatasetLoader>,
    pub workbench: Box<dyn Workbench>,
    pub tracker: Arc<dyn TrackingRunner>,
    pub exporter: Box<dyn Exporter>,
}

/// Everything known about the current run.
#[derive(Debug, Default)]
pub struct Session {
    pub config: LaunchConfig,
    pub project: Option<ProjectFolder>,
    pub dataset: Option<Dataset>,
    /// Non-fatal corrections from argument resolution, shown once the optimizer is known to work.
    pub warnings: Vec<String>,
    /// The workbench window is up and must be disposed on termination.
    pub window_shown: bool,
    pub tracking: Option<JoinHandle<()>>,
}

/// Counts and logs every prompt on its way to the real prompter.
struct ObservedPrompter<'a> {
    inner: &'a dyn Prompter,
    metrics: &'a Metrics,
}

impl Prompter for ObservedPrompter<'_> {
    fn present(&self, prompt: Prompt) -> Selection {
        self.metrics.record_prompt();
        tracing::debug!("Prompt: {:?}", prompt);
        let selection = self.inner.present(prompt);
        tracing::debug!("Answer: {:?}", selection);
        selection
    }
}

pub struct LifecycleController {
    collaborators: Collaborators,
    window_state: WindowStateStore,
    state: StateTracker,
    metrics: Arc<Metrics>,
    runtime: Handle,
    session: Session,
}

impl LifecycleController {
    /// `runtime` hosts the tracking worker started on auto-run.
    pub fn new(collaborators: Collaborators, window_state: WindowStateStore, runtime: Handle) -> Self {
        Self {
            collaborators,
            window_state,
            state: StateTracker::new(),
            metrics: Arc::new(Metrics::new()),
            runtime,
            session: Session::default(),
        }
    }

    /// Tracker for observing transitions; subscribe before calling [`run`](Self::run).
    pub fn state(&self) -> StateTracker {
        self.state.clone()
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    /// Run the whole lifecycle for the given command-line tokens (without the program name).
    pub fn run<I, S>(mut self, args: I) -> ExitOutcome
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        tracing::info!("Starting tr2d lifecycle");

        let outcome = match self.drive(args) {
            Ok(()) => ExitOutcome::normal("User quit"),
            Err(err) => {
                self.report(&err);
                ExitOutcome::from(&err)
            }
        };

        self.terminate(&outcome);
        outcome
    }

    fn drive<I, S>(&mut self, args: I) -> Result<(), LaunchError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let resolved = cli::resolve(args)?;
        self.session.config = resolved.config;
        self.session.project = resolved.project;
        self.session.warnings = resolved.warnings;

        self.enter(LifecycleState::OptimizerCheck);
        self.collaborators.optimizer.check_available()?;
        tracing::info!("Optimizer available");

        self.enter(LifecycleState::SourceResolution);
        self.present_warnings();
        let SourceBinding {
            project,
            input_stack,
        } = self.resolve_source()?;

        self.enter(LifecycleState::DatasetLoad);
        let dataset = self.load_dataset(&input_stack)?;

        self.enter(LifecycleState::Running);
        self.start_session(&project, &dataset);

        loop {
            self.collaborators.workbench.wait_for_close_request();
            self.enter(LifecycleState::ShutdownConfirm);
            if self.confirm_quit() {
                break;
            }
            tracing::info!("Quit cancelled, back to running");
            self.metrics.record_shutdown_cancelled();
            self.enter(LifecycleState::Running);
        }

        if let Some(folder) = self.session.config.export_folder.clone() {
            self.enter(LifecycleState::Exporting);
            if let Err(source) = self.collaborators.exporter.export(&project, &dataset, &folder) {
                tracing::warn!("{}", ExportWarning { folder, source });
                self.metrics.record_warning();
            }
        }

        self.enter(LifecycleState::PersistingState);
        let geometry = self.collaborators.workbench.geometry();
        if let Err(warning) = self.window_state.save(&project, &geometry) {
            tracing::error!("Could not save frame properties in project folder: {}", warning);
            self.metrics.record_warning();
        }

        self.session.project = Some(project);
        self.session.dataset = Some(dataset);
        Ok(())
    }

    fn prompter(&self) -> ObservedPrompter<'_> {
        ObservedPrompter {
            inner: self.collaborators.prompter.as_ref(),
            metrics: &self.metrics,
        }
    }

    fn enter(&self, next: LifecycleState) {
        match self.state.advance(next) {
            Ok(transition) => {
                self.metrics.record_transition();
                tracing::info!("Lifecycle: {} -> {}", transition.from, transition.to);
            }
            Err(e) => tracing::error!("{}", e),
        }
    }

    fn present_warnings(&self) {
        for warning in &self.session.warnings {
            self.metrics.record_warning();
            self.prompter()
                .notify(NoticeLevel::Warning, "Argument Warning", warning);
        }
    }

    /// Make sure both the project folder and the input stack are known.
    fn resolve_source(&mut self) -> Result<SourceBinding, LaunchError> {
        let config = &self.session.config;
        let (Some(folder), Some(stack)) = (config.project_folder.clone(), config.input_stack.clone())
        else {
            let prompter = ObservedPrompter {
                inner: self.collaborators.prompter.as_ref(),
                metrics: &self.metrics,
            };
            return SourceSelector::new(&prompter).complete(&mut self.session.config);
        };

        let project = match self.session.project.take() {
            Some(project) => project,
            None => ProjectFolder::open(&folder)?,
        };

        SourceSelector::new(&self.prompter()).bind_given(project, &stack)
    }

    fn load_dataset(&self, stack: &Utf8Path) -> Result<Dataset, LaunchError> {
        let started = Instant::now();
        let dataset = self
            .collaborators
            .loader
            .load(stack, self.session.config.time_range)?;
        self.metrics.record_dataset_load(started.elapsed());

        tracing::info!(
            "Loaded {} ({} frames, processing {}..={})",
            dataset.path,
            dataset.frame_count,
            dataset.time_range.min,
            dataset.time_range.max
        );
        Ok(dataset)
    }

    /// Entry action of `Running`: show the window, optionally start tracking.
    fn start_session(&mut self, project: &ProjectFolder, dataset: &Dataset) {
        let geometry = self.window_state.load(project);
        self.collaborators.workbench.show(dataset, geometry);
        self.session.window_shown = true;

        if self.session.config.auto_run {
            self.collaborators.workbench.select_tracking();

            let tracker = Arc::clone(&self.collaborators.tracker);
            let job = TrackingJob {
                project_folder: project.root().to_path_buf(),
                dataset: dataset.clone(),
            };
            tracing::info!("Auto-run: starting tracking for {}", job.project_folder);
            self.session.tracking = Some(self.runtime.spawn_blocking(move || {
                if let Err(e) = tracker.run(job) {
                    tracing::error!("Tracking failed: {:#}", e);
                }
            }));
        }
    }

    fn confirm_quit(&self) -> bool {
        let choice = self.prompter().choose(
            "Quit?",
            "Do you really want to quit Tr2d?",
            &QUIT_OPTIONS,
        );
        choice == Some(0)
    }

    /// Show a fatal error to the user before the process ends.
    fn report(&self, err: &LaunchError) {
        match err {
            LaunchError::HelpRequested { usage } => println!("{}", usage),
            LaunchError::Argument { message } => {
                tracing::error!("{}", message);
                eprintln!("{}", message);
            }
            LaunchError::Cancelled { stage } => {
                tracing::info!("User cancelled at {:?}", stage);
            }
            _ => {
                tracing::error!("{} (exit code {})", err, err.exit_code());
                self.prompter()
                    .notify(NoticeLevel::Error, err.title(), &err.to_string());
            }
        }
    }

    fn terminate(&mut self, outcome: &ExitOutcome) {
        self.enter(LifecycleState::Terminated);

        if self.session.window_shown {
            self.collaborators.workbench.dispose();
        }
        if let Some(tracking) = &self.session.tracking {
            if !tracking.is_finished() {
                tracing::info!("Tracking still running at shutdown");
            }
        }

        tracing::info!("Terminating with exit code {}: {}", outcome.code, outcome.cause);
        self.metrics.log_summary();
    }
}
