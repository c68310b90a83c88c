use camino::Utf8PathBuf;

use crate::error::{LaunchError, exit_code};

/// Inclusive range of time points to process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub min: u32,
    /// [`TimeRange::UNBOUNDED`] means "up to the last frame".
    pub max: u32,
}

impl TimeRange {
    pub const UNBOUNDED: u32 = u32::MAX;

    pub fn is_bounded(&self) -> bool {
        self.max != Self::UNBOUNDED
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self {
            min: 0,
            max: Self::UNBOUNDED,
        }
    }
}

/// Startup parameters for one run, resolved from the command line and completed interactively.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaunchConfig {
    pub project_folder: Option<Utf8PathBuf>,
    pub input_stack: Option<Utf8PathBuf>,
    pub time_range: TimeRange,
    pub auto_run: bool,
    pub export_folder: Option<Utf8PathBuf>,
}

impl LaunchConfig {
    /// Both the project folder and the input stack are known.
    pub fn is_complete(&self) -> bool {
        self.project_folder.is_some() && self.input_stack.is_some()
    }
}

/// How the process ends: produced exactly once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitOutcome {
    pub code: i32,
    pub cause: String,
}

impl ExitOutcome {
    pub fn normal(cause: impl Into<String>) -> Self {
        Self {
            code: exit_code::NORMAL,
            cause: cause.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == exit_code::NORMAL
    }
}

impl From<&LaunchError> for ExitOutcome {
    fn from(err: &LaunchError) -> Self {
        Self {
            code: err.exit_code(),
            cause: err.to_string(),
        }
    }
}
