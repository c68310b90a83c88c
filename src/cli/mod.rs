//! Command-line resolution.
//!
//! Turns the launcher's arguments into a validated [`LaunchConfig`]. The historical interface
//! uses single-dash long flags (`-tmin 3`, `-help`); those are rewritten to their double-dash
//! form before clap sees them, so both spellings work.
//!
//! Validation order (first failure wins):
//! 1. project folder (`-p`): exists, is a folder, is writable
//! 2. export folder (`-e`): same checks
//! 3. input stack (`-i`): is a file, is readable; without `-i` the stack comes from the
//!    project's raw data
//! 4. time range: corrected with a warning, never fatal

use crate::error::{FilesystemError, LaunchError};
use crate::models::{LaunchConfig, TimeRange};
use crate::project::ProjectFolder;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use clap::error::ErrorKind;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};

/// Long flags that may also be written with a single dash.
const LONG_FLAGS: &[&str] = &[
    "help",
    "projectfolder",
    "input",
    "tmin",
    "min_time",
    "tmax",
    "max_time",
    "run",
    "export_folder",
    "orange",
    "opt_range",
    "uprops",
    "userprops",
];

#[derive(Debug, Parser)]
#[command(
    name = "tr2d",
    about = "Tracking of cells in 2D+t image stacks",
    override_usage = "tr2d [-p project-folder] [-i input-stack] [-tmin idx] [-tmax idx] [-run] [-e export-folder]",
    disable_version_flag = true
)]
pub struct LaunchArgs {
    /// tr2d project folder
    #[arg(short = 'p', long = "projectfolder", value_name = "project-folder")]
    pub project_folder: Option<String>,

    /// tiff stack to be read
    #[arg(short = 'i', long = "input", value_name = "input-stack")]
    pub input: Option<String>,

    /// first time-point to be processed
    #[arg(
        long = "tmin",
        visible_alias = "min_time",
        value_name = "idx",
        allow_negative_numbers = true
    )]
    pub min_time: Option<i32>,

    /// last time-point to be processed
    #[arg(
        long = "tmax",
        visible_alias = "max_time",
        value_name = "idx",
        allow_negative_numbers = true
    )]
    pub max_time: Option<i32>,

    /// auto-run tracking upon start
    #[arg(short = 'r', long = "run")]
    pub run: bool,

    /// Write results to this folder when closing tr2d.
    #[arg(short = 'e', long = "export_folder", value_name = "export-folder")]
    pub export_folder: Option<String>,

    /// obsolete parameter
    #[arg(long = "orange", alias = "opt_range", hide = true, allow_negative_numbers = true)]
    pub opt_range: Option<String>,

    /// obsolete parameter
    #[arg(long = "uprops", alias = "userprops", hide = true)]
    pub user_props: Option<String>,
}

/// Output of a successful resolution.
#[derive(Debug)]
pub struct Resolved {
    pub config: LaunchConfig,
    /// The project folder named by `-p`, already opened.
    pub project: Option<ProjectFolder>,
    /// Corrections applied to the arguments; to be shown to the user.
    pub warnings: Vec<String>,
}

/// Rewrite `-tmin` style flags to `--tmin`; everything else passes through.
pub fn normalize_args<I, S>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    args.into_iter()
        .map(|arg| {
            let arg: OsString = arg.into();
            let Some(text) = arg.to_str() else {
                return arg;
            };
            let Some(flag) = text.strip_prefix('-') else {
                return arg;
            };
            if flag.starts_with('-') {
                return arg;
            }
            let name = flag.split('=').next().unwrap_or(flag);
            if LONG_FLAGS.contains(&name) {
                OsString::from(format!("-{}", text))
            } else {
                arg
            }
        })
        .collect()
}

/// Resolve command-line tokens (without the program name) into a launch configuration.
pub fn resolve<I, S>(args: I) -> Result<Resolved, LaunchError>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut argv = vec![OsString::from("tr2d")];
    argv.extend(normalize_args(args));

    let parsed = LaunchArgs::try_parse_from(argv).map_err(|err| match err.kind() {
        ErrorKind::DisplayHelp => LaunchError::HelpRequested {
            usage: err.render().to_string(),
        },
        _ => LaunchError::Argument {
            message: err.render().to_string(),
        },
    })?;

    resolve_args(parsed)
}

/// Validate already-parsed arguments.
pub fn resolve_args(args: LaunchArgs) -> Result<Resolved, LaunchError> {
    let mut warnings = Vec::new();

    if args.opt_range.is_some() || args.user_props.is_some() {
        tracing::info!("Ignoring obsolete arguments 'orange'/'uprops'");
    }

    let project_folder = args
        .project_folder
        .map(|p| check_writable_folder(Utf8PathBuf::from(p), "project folder"))
        .transpose()?;

    let export_folder = args
        .export_folder
        .map(|e| check_writable_folder(Utf8PathBuf::from(e), "export folder"))
        .transpose()?;

    let mut project = None;
    let input_stack = match (args.input, &project_folder) {
        (Some(input), _) => {
            let stack = check_readable_stack(Utf8PathBuf::from(input))?;
            if let Some(folder) = &project_folder {
                project = Some(ProjectFolder::open(folder)?);
            }
            Some(stack)
        }
        (None, Some(folder)) => {
            let opened = ProjectFolder::open(folder)?;
            let stack = opened.raw_data_source()?;
            project = Some(opened);
            Some(stack)
        }
        (None, None) => None,
    };

    let time_range = resolve_time_range(args.min_time, args.max_time, &mut warnings);

    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    Ok(Resolved {
        config: LaunchConfig {
            project_folder,
            input_stack,
            time_range,
            auto_run: args.run,
            export_folder,
        },
        project,
        warnings,
    })
}

/// Clamp `tmin` to 0 and raise `tmax` above `tmin`, recording a warning for each correction.
///
/// Indices are 32-bit signed on the command line, so `min + 1` always fits and never reaches
/// [`TimeRange::UNBOUNDED`].
pub fn resolve_time_range(
    min_time: Option<i32>,
    max_time: Option<i32>,
    warnings: &mut Vec<String>,
) -> TimeRange {
    let mut range = TimeRange::default();

    if let Some(tmin) = min_time {
        if tmin < 0 {
            warnings.push("Argument 'tmin' cannot be smaller than 0... using tmin=0...".to_string());
        } else {
            range.min = tmin.unsigned_abs();
        }
    }

    if let Some(tmax) = max_time {
        if i64::from(tmax) < i64::from(range.min) {
            range.max = range.min + 1;
            warnings.push(format!(
                "Argument 'tmax' cannot be smaller than 'tmin'... using tmax={}...",
                range.max
            ));
        } else {
            range.max = tmax.unsigned_abs();
        }
    }

    range
}

/// The folder must exist, be a directory and accept new files.
pub fn check_writable_folder(
    path: Utf8PathBuf,
    label: &'static str,
) -> Result<Utf8PathBuf, FilesystemError> {
    if !path.exists() {
        return Err(FilesystemError::DoesNotExist { label, path });
    }
    if !path.is_dir() {
        return Err(FilesystemError::NotAFolder { label, path });
    }
    if !is_writable(&path) {
        return Err(FilesystemError::NotWritable { label, path });
    }
    Ok(path)
}

/// The stack must be a regular file that can be opened for reading.
pub fn check_readable_stack(path: Utf8PathBuf) -> Result<Utf8PathBuf, FilesystemError> {
    if !path.is_file() {
        return Err(FilesystemError::StackNotFound(path));
    }
    if File::open(&path).is_err() {
        return Err(FilesystemError::StackNotReadable(path));
    }
    Ok(path)
}

fn is_writable(dir: &Utf8Path) -> bool {
    const ATTEMPTS: u32 = 16;

    for attempt in 0..ATTEMPTS {
        let probe = dir.join(format!(
            ".tr2d-write-probe-{}-{}",
            std::process::id(),
            attempt
        ));
        match OpenOptions::new().write(true).create_new(true).open(&probe) {
            Ok(_) => {
                let _ = fs::remove_file(&probe);
                return true;
            }
            // Left over from another run; only a file we created ourselves proves anything.
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(_) => return false,
        }
    }
    false
}
