//! The on-disk tr2d project folder.
//!
//! A project folder binds one tracking session to its input stack and keeps the UI state of that
//! session. Layout:
//!
//! ```text
//! <project>/
//!   raw_data.yaml    reference to the input stack
//!   frame.yaml       window geometry
//!   segmentation/    derived results, belong to the current raw data
//!   tracking/
//! ```

pub mod window_state;

pub use window_state::WindowStateStore;

use crate::error::FilesystemError;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fs;

/// Well-known members of a project folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Member {
    RawData,
    WindowGeometry,
    Segmentation,
    Tracking,
}

impl Member {
    pub fn file_name(self) -> &'static str {
        match self {
            Self::RawData => "raw_data.yaml",
            Self::WindowGeometry => "frame.yaml",
            Self::Segmentation => "segmentation",
            Self::Tracking => "tracking",
        }
    }

    /// Members computed from the raw data; invalid once the raw data changes.
    const DERIVED: [Member; 2] = [Member::Segmentation, Member::Tracking];
}

/// Contents of the raw-data member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct RawDataRef {
    source: Utf8PathBuf,
}

/// A directory-backed tr2d project.
#[derive(Debug, Clone)]
pub struct ProjectFolder {
    root: Utf8PathBuf,
}

impl ProjectFolder {
    /// Bind to an existing directory and make sure the project layout is in place.
    pub fn open<P: AsRef<Utf8Path>>(path: P) -> Result<Self, FilesystemError> {
        let root = path.as_ref().to_path_buf();
        let init_error = |source| FilesystemError::ProjectInit {
            path: root.clone(),
            source,
        };

        let metadata = fs::metadata(&root).map_err(init_error)?;
        if !metadata.is_dir() {
            return Err(init_error(std::io::Error::new(
                std::io::ErrorKind::NotADirectory,
                "not a directory",
            )));
        }

        let project = Self { root };
        for member in Member::DERIVED {
            fs::create_dir_all(project.member(member)).map_err(|source| {
                FilesystemError::ProjectInit {
                    path: project.root.clone(),
                    source,
                }
            })?;
        }

        tracing::debug!("Opened project folder {}", project.root);
        Ok(project)
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Path of a member, whether or not it exists yet.
    pub fn member(&self, kind: Member) -> Utf8PathBuf {
        self.root.join(kind.file_name())
    }

    pub fn has_raw_data(&self) -> bool {
        self.member(Member::RawData).is_file()
    }

    /// The input stack this project is bound to.
    ///
    /// Fails when the raw-data member is missing or corrupt, or the referenced stack is not a
    /// readable file.
    pub fn raw_data_source(&self) -> Result<Utf8PathBuf, FilesystemError> {
        let member = self.member(Member::RawData);
        let missing = |reason: String| FilesystemError::RawDataMissing {
            path: self.root.clone(),
            reason,
        };

        let contents = fs::read_to_string(&member)
            .map_err(|e| missing(format!("cannot read {}: {}", member, e)))?;
        let reference: RawDataRef = serde_yaml_ng::from_str(&contents)
            .map_err(|e| missing(format!("cannot parse {}: {}", member, e)))?;

        let source = if reference.source.is_absolute() {
            reference.source
        } else {
            self.root.join(reference.source)
        };

        if !source.is_file() {
            return Err(missing(format!("{} does not exist", source)));
        }
        fs::File::open(&source).map_err(|e| missing(format!("{} is not readable: {}", source, e)))?;

        Ok(source)
    }

    /// Whether the raw-data member references `stack`.
    ///
    /// Missing or unusable raw data is bound to nothing.
    pub fn is_bound_to<P: AsRef<Utf8Path>>(&self, stack: P) -> bool {
        let stack = stack.as_ref();
        let Ok(source) = self.raw_data_source() else {
            return false;
        };
        match (source.canonicalize_utf8(), stack.canonicalize_utf8()) {
            (Ok(bound), Ok(given)) => bound == given,
            _ => source == stack,
        }
    }

    /// Rebind the project to a new input stack.
    ///
    /// Destructive: replaces the raw-data member and wipes derived results. Callers must have
    /// confirmed the overwrite when [`has_raw_data`](Self::has_raw_data) was true.
    pub fn restart_with_raw_data<P: AsRef<Utf8Path>>(&self, stack: P) -> Result<(), FilesystemError> {
        let stack = stack.as_ref();
        let init_error = |source| FilesystemError::ProjectInit {
            path: self.root.clone(),
            source,
        };

        let source = if stack.is_absolute() {
            stack.to_path_buf()
        } else {
            let cwd = std::env::current_dir().map_err(init_error)?;
            let cwd = Utf8PathBuf::try_from(cwd).map_err(|e| init_error(e.into_io_error()))?;
            cwd.join(stack)
        };

        for member in Member::DERIVED {
            let dir = self.member(member);
            if dir.exists() {
                fs::remove_dir_all(&dir).map_err(init_error)?;
            }
            fs::create_dir_all(&dir).map_err(init_error)?;
        }

        let yaml = serde_yaml_ng::to_string(&RawDataRef {
            source: source.clone(),
        })
        .map_err(|e| init_error(std::io::Error::other(e)))?;
        fs::write(self.member(Member::RawData), yaml).map_err(init_error)?;

        tracing::info!("Project {} now bound to raw data {}", self.root, source);
        Ok(())
    }
}
