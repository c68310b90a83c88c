use crate::error::{CancelStage, FilesystemError, LaunchError};
use crate::models::LaunchConfig;
use crate::project::ProjectFolder;
use crate::ui::{FileFilter, PromptExt, Prompter};
use camino::{Utf8Path, Utf8PathBuf};

const SOURCE_OPTIONS: [&str; 2] = ["Tr2d Project...", "TIFF Stack..."];
const PROJECT_FOLDER_TITLE: &str = "Choose tr2d project folder...";
const INPUT_STACK_TITLE: &str = "Load input tiff stack...";
const OVERWRITE_TITLE: &str = "Project Folder Exists";

fn overwrite_message(folder: &Utf8Path) -> String {
    format!(
        "Chosen project folder exists ({}).\nShould this project be overwritten?\nCurrent data in this project will be lost!",
        folder
    )
}

/// A project folder bound to the stack the session will open.
#[derive(Debug, Clone)]
pub struct SourceBinding {
    pub project: ProjectFolder,
    pub input_stack: Utf8PathBuf,
}

/// Completes an incomplete launch configuration by asking the user.
///
/// The only branch point is the first question: open an existing project, or start from a TIFF
/// stack. Every later prompt either moves forward or ends the run with a cancellation.
pub struct SourceSelector<'a> {
    prompter: &'a dyn Prompter,
}

impl<'a> SourceSelector<'a> {
    pub fn new(prompter: &'a dyn Prompter) -> Self {
        Self { prompter }
    }

    /// Fill in the project folder and input stack of `config`.
    ///
    /// A stack given on the command line skips the top-level choice and goes straight to picking
    /// a destination project.
    pub fn complete(&self, config: &mut LaunchConfig) -> Result<SourceBinding, LaunchError> {
        let binding = match &config.input_stack {
            Some(stack) => self.bind_stack(stack)?,
            None => self.select()?,
        };

        config.project_folder = Some(binding.project.root().to_path_buf());
        config.input_stack = Some(binding.input_stack.clone());
        Ok(binding)
    }

    /// Ask for the kind of source, then run the matching branch.
    pub fn select(&self) -> Result<SourceBinding, LaunchError> {
        let choice = self.prompter.choose(
            "Open...",
            "Please choose an input type to be opened.",
            &SOURCE_OPTIONS,
        );

        match choice {
            Some(0) => self.select_project(),
            Some(_) => {
                let stack = self.select_stack()?;
                self.bind_stack(&stack)
            }
            None => {
                tracing::info!("No input source chosen");
                Err(LaunchError::Cancelled {
                    stage: CancelStage::SourceChoice,
                })
            }
        }
    }

    /// Project branch: an existing folder whose raw data names the stack.
    pub fn select_project(&self) -> Result<SourceBinding, LaunchError> {
        let folder = self
            .prompter
            .pick_folder(PROJECT_FOLDER_TITLE, None)
            .ok_or(LaunchError::Cancelled {
                stage: CancelStage::ProjectFolder,
            })?;

        let project = ProjectFolder::open(&folder)?;
        let input_stack = project.raw_data_source()?;
        tracing::info!("Opening project {} with stack {}", folder, input_stack);

        Ok(SourceBinding {
            project,
            input_stack,
        })
    }

    /// Stack branch, first step: the TIFF file to start from.
    pub fn select_stack(&self) -> Result<Utf8PathBuf, LaunchError> {
        self.prompter
            .pick_file(INPUT_STACK_TITLE, None, Some(FileFilter::tiff()))
            .ok_or(LaunchError::Cancelled {
                stage: CancelStage::InputStack,
            })
    }

    /// Stack branch, second step: pick a destination project and bind it to `stack`.
    pub fn bind_stack(&self, stack: &Utf8Path) -> Result<SourceBinding, LaunchError> {
        let project = self.choose_destination(stack)?;
        project.restart_with_raw_data(stack)?;

        Ok(SourceBinding {
            project,
            input_stack: stack.to_path_buf(),
        })
    }

    /// Bind a project and a stack that were both given on the command line.
    ///
    /// A project that already holds another stack's data is only rebound after the user agreed
    /// to lose it.
    pub fn bind_given(
        &self,
        project: ProjectFolder,
        stack: &Utf8Path,
    ) -> Result<SourceBinding, LaunchError> {
        if !project.has_raw_data() {
            project.restart_with_raw_data(stack)?;
        } else if project.is_bound_to(stack) {
            tracing::debug!("Project {} already bound to {}", project.root(), stack);
        } else if self
            .prompter
            .confirm(OVERWRITE_TITLE, &overwrite_message(project.root()))
        {
            tracing::warn!("Overwriting project {} with {}", project.root(), stack);
            project.restart_with_raw_data(stack)?;
        } else {
            return Err(FilesystemError::RawDataConflict(project.root().to_path_buf()).into());
        }

        Ok(SourceBinding {
            project,
            input_stack: stack.to_path_buf(),
        })
    }

    /// Prompt for a destination folder until one without raw data is picked, or the user
    /// agrees to overwrite the existing project.
    pub fn choose_destination(&self, stack: &Utf8Path) -> Result<ProjectFolder, LaunchError> {
        loop {
            let folder = self
                .prompter
                .pick_folder(PROJECT_FOLDER_TITLE, stack.parent())
                .ok_or(LaunchError::Cancelled {
                    stage: CancelStage::DestinationFolder,
                })?;

            let project = ProjectFolder::open(&folder)?;
            if !project.has_raw_data() {
                return Ok(project);
            }

            if self.prompter.confirm(OVERWRITE_TITLE, &overwrite_message(&folder)) {
                tracing::warn!("Overwriting project {}", folder);
                return Ok(project);
            }
            tracing::debug!("Overwrite of {} declined, asking again", folder);
        }
    }
}
