use super::dataset::Dataset;
use crate::models::TrackingSettings;
use anyhow::{Context, Result, bail};
use camino::Utf8PathBuf;
use std::process::Command;
use std::time::Instant;

/// What a tracking run operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingJob {
    pub project_folder: Utf8PathBuf,
    pub dataset: Dataset,
}

/// Starts the segmentation/tracking pipeline for a session.
///
/// Called from a worker thread; implementations may block until the run finishes.
pub trait TrackingRunner: Send + Sync {
    fn run(&self, job: TrackingJob) -> Result<()>;
}

/// Runs an external tracking command with the project folder as its last argument.
///
/// The time range is passed through `TR2D_TMIN` / `TR2D_TMAX`, the stack through `TR2D_INPUT`.
#[derive(Debug, Clone, Default)]
pub struct CommandTracker {
    program: Option<String>,
    args: Vec<String>,
}

impl CommandTracker {
    pub fn new(program: Option<String>, args: Vec<String>) -> Self {
        Self { program, args }
    }

    pub fn from_settings(settings: &TrackingSettings) -> Self {
        Self::new(settings.command.clone(), settings.args.clone())
    }

    /// Command line for `job`, or `None` when no tracking command is configured.
    pub fn build_command(&self, job: &TrackingJob) -> Option<Command> {
        let program = self.program.as_ref()?;
        let mut command = Command::new(program);
        command
            .args(&self.args)
            .arg(job.project_folder.as_str())
            .env("TR2D_INPUT", job.dataset.path.as_str())
            .env("TR2D_TMIN", job.dataset.time_range.min.to_string())
            .env("TR2D_TMAX", job.dataset.time_range.max.to_string());
        Some(command)
    }
}

impl TrackingRunner for CommandTracker {
    fn run(&self, job: TrackingJob) -> Result<()> {
        let Some(mut command) = self.build_command(&job) else {
            tracing::warn!(
                "Auto-run requested but no tracking command is configured; skipping tracking for {}",
                job.project_folder
            );
            return Ok(());
        };

        tracing::info!("Starting tracking: {:?}", command);
        let started = Instant::now();
        let status = command
            .status()
            .with_context(|| format!("Failed to start tracking command {:?}", command))?;

        if !status.success() {
            bail!("Tracking command exited with {}", status);
        }

        tracing::info!("Tracking finished in {:.1?}", started.elapsed());
        Ok(())
    }
}
