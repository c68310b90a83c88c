use super::dataset::Dataset;
use crate::project::{Member, ProjectFolder};
use anyhow::{Context, Result};
use camino::Utf8Path;
use serde::Serialize;
use std::fs;

/// Name of the session summary written into the export folder.
pub const SUMMARY_FILE: &str = "tr2d_export.yaml";

/// Writes the results of a session somewhere outside the project folder on shutdown.
pub trait Exporter {
    fn export(&self, project: &ProjectFolder, dataset: &Dataset, folder: &Utf8Path) -> Result<()>;
}

#[derive(Debug, Serialize)]
struct ExportSummary<'a> {
    project_folder: &'a str,
    input_stack: &'a str,
    frame_count: u32,
    min_time: u32,
    max_time: u32,
    tracking_files: Vec<String>,
}

/// Copies the project's tracking results into the export folder next to a YAML summary.
#[derive(Debug, Default, Clone, Copy)]
pub struct SessionExporter;

impl SessionExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Exporter for SessionExporter {
    fn export(&self, project: &ProjectFolder, dataset: &Dataset, folder: &Utf8Path) -> Result<()> {
        let tracking_dir = project.member(Member::Tracking);
        let mut tracking_files = Vec::new();

        if tracking_dir.is_dir() {
            for entry in tracking_dir
                .read_dir_utf8()
                .with_context(|| format!("Failed to list {}", tracking_dir))?
            {
                let entry = entry.with_context(|| format!("Failed to list {}", tracking_dir))?;
                if !entry.path().is_file() {
                    continue;
                }
                let target = folder.join(entry.file_name());
                fs::copy(entry.path(), &target)
                    .with_context(|| format!("Failed to copy {} to {}", entry.path(), target))?;
                tracking_files.push(entry.file_name().to_string());
            }
        }
        tracking_files.sort();

        let summary = ExportSummary {
            project_folder: project.root().as_str(),
            input_stack: dataset.path.as_str(),
            frame_count: dataset.frame_count,
            min_time: dataset.time_range.min,
            max_time: dataset.time_range.max,
            tracking_files,
        };
        let yaml = serde_yaml_ng::to_string(&summary).context("Failed to serialize export summary")?;
        let summary_path = folder.join(SUMMARY_FILE);
        fs::write(&summary_path, yaml)
            .with_context(|| format!("Failed to write {}", summary_path))?;

        tracing::info!(
            "Exported {} tracking file(s) to {}",
            summary.tracking_files.len(),
            folder
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeRange;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_export_copies_tracking_results() {
        let temp_dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let project_dir = root.join("project");
        let export_dir = root.join("export");
        fs::create_dir_all(&project_dir).unwrap();
        fs::create_dir_all(&export_dir).unwrap();

        let project = ProjectFolder::open(&project_dir).unwrap();
        fs::write(project.member(Member::Tracking).join("tracks.csv"), "1,2").unwrap();

        let dataset = Dataset {
            path: root.join("stack.tif"),
            frame_count: 4,
            time_range: TimeRange { min: 0, max: 3 },
        };

        SessionExporter::new()
            .export(&project, &dataset, &export_dir)
            .unwrap();

        assert_eq!(fs::read_to_string(export_dir.join("tracks.csv")).unwrap(), "1,2");
        let summary = fs::read_to_string(export_dir.join(SUMMARY_FILE)).unwrap();
        assert!(summary.contains("frame_count: 4"));
        assert!(summary.contains("tracks.csv"));
    }

    #[test]
    fn test_export_into_missing_folder_fails() {
        let temp_dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let project = ProjectFolder::open(&root).unwrap();
        let dataset = Dataset {
            path: root.join("stack.tif"),
            frame_count: 1,
            time_range: TimeRange { min: 0, max: 0 },
        };

        assert!(
            SessionExporter::new()
                .export(&project, &dataset, &root.join("missing"))
                .is_err()
        );
    }
}
