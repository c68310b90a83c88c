//! Error taxonomy for the launch and lifecycle path.
//!
//! Fatal errors are collected in [`LaunchError`], which knows the process exit code that belongs
//! to each failure. Recoverable conditions ([`PersistenceWarning`], [`ExportWarning`]) are plain
//! error types that callers log and then carry on with a documented default.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Exit codes reported by the launcher.
pub mod exit_code {
    pub const NORMAL: i32 = 0;
    pub const FOLDER_MISSING: i32 = 1;
    pub const NOT_A_FOLDER: i32 = 2;
    pub const FOLDER_NOT_WRITABLE: i32 = 3;
    pub const DATASET_UNAVAILABLE: i32 = 4;
    pub const STACK_NOT_FOUND: i32 = 5;
    pub const STACK_NOT_READABLE: i32 = 6;
    pub const RAW_DATA_MISSING: i32 = 7;
    pub const PROJECT_INIT_FAILED: i32 = 8;
    pub const OPTIMIZER_LICENSE: i32 = 98;
    pub const OPTIMIZER_NATIVE_LINK: i32 = 99;
    pub const OPTIMIZER_NOT_INSTALLED: i32 = 100;

    /// User dismissed a project or stack prompt.
    pub const CANCELLED_SELECTION: i32 = 1;
    /// User dismissed the destination folder prompt of the stack branch.
    pub const CANCELLED_FOLDER_LOOP: i32 = 2;
}

/// Path existence, permission and project-layout failures.
#[derive(Error, Debug)]
pub enum FilesystemError {
    #[error("Given {label} does not exist: {path}")]
    DoesNotExist { label: &'static str, path: Utf8PathBuf },

    #[error("Given {label} is not a folder: {path}")]
    NotAFolder { label: &'static str, path: Utf8PathBuf },

    #[error("Given {label} cannot be written to: {path}")]
    NotWritable { label: &'static str, path: Utf8PathBuf },

    #[error("Given input tiff stack could not be found: {0}")]
    StackNotFound(Utf8PathBuf),

    #[error("Given input tiff stack is not readable: {0}")]
    StackNotReadable(Utf8PathBuf),

    #[error("Invalid project folder ({path}) -- missing RAW data or read protected: {reason}")]
    RawDataMissing { path: Utf8PathBuf, reason: String },

    #[error("Project folder ({0}) belongs to a different input stack and was not overwritten")]
    RawDataConflict(Utf8PathBuf),

    #[error("Project folder ({path}) could not be initialized: {source}")]
    ProjectInit {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FilesystemError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::DoesNotExist { .. } => exit_code::FOLDER_MISSING,
            Self::NotAFolder { .. } => exit_code::NOT_A_FOLDER,
            Self::NotWritable { .. } => exit_code::FOLDER_NOT_WRITABLE,
            Self::StackNotFound(_) => exit_code::STACK_NOT_FOUND,
            Self::StackNotReadable(_) => exit_code::STACK_NOT_READABLE,
            Self::RawDataMissing { .. } | Self::RawDataConflict(_) => exit_code::RAW_DATA_MISSING,
            Self::ProjectInit { .. } => exit_code::PROJECT_INIT_FAILED,
        }
    }
}

/// Reasons the integer-programming optimizer cannot be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptimizerError {
    #[error("Gurobi seems to be not installed on your system ({0})")]
    NotInstalled(String),

    #[error("Gurobi native library could not be linked ({0})")]
    NativeLink(String),

    #[error("Gurobi license or runtime error ({0})")]
    License(String),
}

impl OptimizerError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotInstalled(_) => exit_code::OPTIMIZER_NOT_INSTALLED,
            Self::NativeLink(_) => exit_code::OPTIMIZER_NATIVE_LINK,
            Self::License(_) => exit_code::OPTIMIZER_LICENSE,
        }
    }
}

/// The dataset loader produced nothing usable.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a TIFF stack: {reason}")]
    NotATiff { path: Utf8PathBuf, reason: String },

    #[error("{path} has {frames} frame(s), nothing left in time range {min}..={max}")]
    EmptyRange {
        path: Utf8PathBuf,
        frames: u32,
        min: u32,
        max: u32,
    },
}

/// Window geometry could not be read or written. Never fatal.
#[derive(Error, Debug)]
pub enum PersistenceWarning {
    #[error("Frame properties not found at {0}")]
    Missing(Utf8PathBuf),

    #[error("Frame properties at {path} are unusable: {reason}")]
    Corrupt { path: Utf8PathBuf, reason: String },

    #[error("Could not save frame properties to {path}: {reason}")]
    WriteFailed { path: Utf8PathBuf, reason: String },
}

/// Export on shutdown failed. Never fatal.
#[derive(Error, Debug)]
#[error("Export to {folder} failed: {source}")]
pub struct ExportWarning {
    pub folder: Utf8PathBuf,
    #[source]
    pub source: anyhow::Error,
}

/// Which prompt the user walked away from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelStage {
    SourceChoice,
    ProjectFolder,
    InputStack,
    DestinationFolder,
}

impl CancelStage {
    pub fn exit_code(self) -> i32 {
        match self {
            Self::SourceChoice => exit_code::NORMAL,
            Self::ProjectFolder | Self::InputStack => exit_code::CANCELLED_SELECTION,
            Self::DestinationFolder => exit_code::CANCELLED_FOLDER_LOOP,
        }
    }
}

/// Every reason the launcher stops before or instead of a normal shutdown.
#[derive(Error, Debug)]
pub enum LaunchError {
    /// `-help` was given; carries the rendered usage text.
    #[error("{usage}")]
    HelpRequested { usage: String },

    /// Malformed or unknown flags; carries clap's rendered message including usage.
    #[error("{message}")]
    Argument { message: String },

    #[error(transparent)]
    Filesystem(#[from] FilesystemError),

    #[error(transparent)]
    OptimizerUnavailable(#[from] OptimizerError),

    #[error("Dataset could not be opened: {0}")]
    DatasetLoad(#[from] DatasetError),

    #[error("User cancelled the {stage:?} prompt")]
    Cancelled { stage: CancelStage },
}

impl LaunchError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::HelpRequested { .. } | Self::Argument { .. } => exit_code::NORMAL,
            Self::Filesystem(e) => e.exit_code(),
            Self::OptimizerUnavailable(e) => e.exit_code(),
            Self::DatasetLoad(_) => exit_code::DATASET_UNAVAILABLE,
            Self::Cancelled { stage } => stage.exit_code(),
        }
    }

    /// Title used when the error is shown in a dialog.
    pub fn title(&self) -> &'static str {
        match self {
            Self::HelpRequested { .. } => "Usage",
            Self::Argument { .. } | Self::Filesystem(_) => "Argument Error",
            Self::OptimizerUnavailable(OptimizerError::NotInstalled(_)) => "Gurobi not installed?",
            Self::OptimizerUnavailable(_) => "Gurobi Error?",
            Self::DatasetLoad(_) => "Dataset Error",
            Self::Cancelled { .. } => "Cancelled",
        }
    }
}
