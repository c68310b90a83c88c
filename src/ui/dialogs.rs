// Native dialogs for the Prompter capability, using the `rfd` crate.

use super::{NoticeLevel, Prompt, Prompter, Selection};
use camino::Utf8PathBuf;
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use std::path::PathBuf;

/// [`Prompter`] backed by native file pickers and message boxes.
#[derive(Debug, Default, Clone, Copy)]
pub struct RfdPrompter;

impl RfdPrompter {
    pub fn new() -> Self {
        Self
    }

    fn choice(title: &str, message: &str, options: &[String]) -> Selection {
        let buttons = match options {
            [only] => MessageButtons::OkCustom(only.clone()),
            [first, second] => MessageButtons::OkCancelCustom(first.clone(), second.clone()),
            [first, second, third, ..] => {
                MessageButtons::YesNoCancelCustom(first.clone(), second.clone(), third.clone())
            }
            [] => return Selection::Dismissed,
        };

        let result = MessageDialog::new()
            .set_level(MessageLevel::Info)
            .set_title(title)
            .set_description(message)
            .set_buttons(buttons)
            .show();

        match result {
            MessageDialogResult::Custom(label) => options
                .iter()
                .position(|o| *o == label)
                .map(Selection::Option)
                .unwrap_or(Selection::Dismissed),
            MessageDialogResult::Ok | MessageDialogResult::Yes => Selection::Option(0),
            MessageDialogResult::No if options.len() > 1 => Selection::Option(1),
            _ => Selection::Dismissed,
        }
    }

    fn to_utf8(path: PathBuf) -> Selection {
        match Utf8PathBuf::try_from(path) {
            Ok(path) => Selection::Path(path),
            Err(e) => {
                tracing::error!("Failed to convert path to UTF-8: {}", e);
                Selection::Dismissed
            }
        }
    }
}

impl Prompter for RfdPrompter {
    fn present(&self, prompt: Prompt) -> Selection {
        tracing::debug!("Presenting native dialog: {:?}", prompt);

        match prompt {
            Prompt::Choice {
                title,
                message,
                options,
            } => Self::choice(&title, &message, &options),

            Prompt::OpenFile {
                title,
                start_dir,
                filter,
            } => {
                let mut dialog = FileDialog::new().set_title(&title);
                if let Some(dir) = start_dir {
                    dialog = dialog.set_directory(dir);
                }
                if let Some(filter) = filter {
                    dialog = dialog.add_filter(&filter.name, filter.extensions.as_slice());
                }
                dialog
                    .pick_file()
                    .map(Self::to_utf8)
                    .unwrap_or(Selection::Dismissed)
            }

            Prompt::OpenFolder { title, start_dir } => {
                let mut dialog = FileDialog::new().set_title(&title);
                if let Some(dir) = start_dir {
                    dialog = dialog.set_directory(dir);
                }
                dialog
                    .pick_folder()
                    .map(Self::to_utf8)
                    .unwrap_or(Selection::Dismissed)
            }

            Prompt::Confirm { title, message } => {
                let result = MessageDialog::new()
                    .set_level(MessageLevel::Warning)
                    .set_title(&title)
                    .set_description(&message)
                    .set_buttons(MessageButtons::YesNo)
                    .show();
                match result {
                    MessageDialogResult::Yes => Selection::Yes,
                    MessageDialogResult::No => Selection::No,
                    _ => Selection::Dismissed,
                }
            }

            Prompt::Notice {
                level,
                title,
                message,
            } => {
                let level = match level {
                    NoticeLevel::Info => MessageLevel::Info,
                    NoticeLevel::Warning => MessageLevel::Warning,
                    NoticeLevel::Error => MessageLevel::Error,
                };
                MessageDialog::new()
                    .set_level(level)
                    .set_title(&title)
                    .set_description(&message)
                    .set_buttons(MessageButtons::Ok)
                    .show();
                Selection::Acknowledged
            }
        }
    }
}
