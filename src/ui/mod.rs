// UI module - capability seams towards the presentation layer
//
// This module contains:
// - Prompter: the single `present(prompt) -> selection` capability every dialog goes through
// - RfdPrompter: native dialogs backed by the `rfd` crate
// - Workbench: the main window of a running session, and a console stand-in for it

pub mod dialogs;
pub mod workbench;

pub use dialogs::RfdPrompter;
pub use workbench::{ConsoleWorkbench, Workbench};

use camino::{Utf8Path, Utf8PathBuf};

/// Severity of a notice shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Restricts a file prompt to the given extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

impl FileFilter {
    /// TIFF image stacks.
    pub fn tiff() -> Self {
        Self {
            name: "TIFF Image Stack".to_string(),
            extensions: vec!["tif".to_string(), "tiff".to_string()],
        }
    }
}

/// A question put to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// Pick one of `options`; answered with [`Selection::Option`].
    Choice {
        title: String,
        message: String,
        options: Vec<String>,
    },
    /// Pick an existing file; answered with [`Selection::Path`].
    OpenFile {
        title: String,
        start_dir: Option<Utf8PathBuf>,
        filter: Option<FileFilter>,
    },
    /// Pick an existing directory; answered with [`Selection::Path`].
    OpenFolder {
        title: String,
        start_dir: Option<Utf8PathBuf>,
    },
    /// Yes or no; answered with [`Selection::Yes`] or [`Selection::No`].
    Confirm { title: String, message: String },
    /// Information only; answered with [`Selection::Acknowledged`].
    Notice {
        level: NoticeLevel,
        title: String,
        message: String,
    },
}

/// The user's answer to a [`Prompt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Option(usize),
    Path(Utf8PathBuf),
    Yes,
    No,
    Acknowledged,
    /// Closed or cancelled without answering.
    Dismissed,
}

/// Presents prompts to the user and blocks until they answer.
///
/// Everything interactive in the launcher goes through this one method, so the lifecycle can be
/// driven by native dialogs, a script, or a mock.
#[cfg_attr(test, mockall::automock)]
pub trait Prompter {
    fn present(&self, prompt: Prompt) -> Selection;
}

/// Typed helpers on top of [`Prompter::present`].
pub trait PromptExt: Prompter {
    /// Index of the chosen option, `None` when dismissed.
    fn choose(&self, title: &str, message: &str, options: &[&str]) -> Option<usize> {
        let prompt = Prompt::Choice {
            title: title.to_string(),
            message: message.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
        };
        match self.present(prompt) {
            Selection::Option(index) if index < options.len() => Some(index),
            _ => None,
        }
    }

    fn pick_file(
        &self,
        title: &str,
        start_dir: Option<&Utf8Path>,
        filter: Option<FileFilter>,
    ) -> Option<Utf8PathBuf> {
        let prompt = Prompt::OpenFile {
            title: title.to_string(),
            start_dir: start_dir.map(Utf8Path::to_path_buf),
            filter,
        };
        match self.present(prompt) {
            Selection::Path(path) => Some(path),
            _ => None,
        }
    }

    fn pick_folder(&self, title: &str, start_dir: Option<&Utf8Path>) -> Option<Utf8PathBuf> {
        let prompt = Prompt::OpenFolder {
            title: title.to_string(),
            start_dir: start_dir.map(Utf8Path::to_path_buf),
        };
        match self.present(prompt) {
            Selection::Path(path) => Some(path),
            _ => None,
        }
    }

    /// Only an explicit "yes" counts as confirmation.
    fn confirm(&self, title: &str, message: &str) -> bool {
        let prompt = Prompt::Confirm {
            title: title.to_string(),
            message: message.to_string(),
        };
        matches!(self.present(prompt), Selection::Yes)
    }

    fn notify(&self, level: NoticeLevel, title: &str, message: &str) {
        let prompt = Prompt::Notice {
            level,
            title: title.to_string(),
            message: message.to_string(),
        };
        self.present(prompt);
    }
}

impl<P: Prompter + ?Sized> PromptExt for P {}
