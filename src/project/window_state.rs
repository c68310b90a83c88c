use super::{Member, ProjectFolder};
use crate::error::PersistenceWarning;
use crate::models::WindowGeometry;
use std::fs;

/// Loads and saves the window geometry record of a project folder.
///
/// Neither direction ever fails the caller: a missing or broken record falls back to the
/// configured default geometry, and a failed save is handed back as a warning to log.
#[derive(Debug, Clone)]
pub struct WindowStateStore {
    default_geometry: WindowGeometry,
}

impl WindowStateStore {
    pub fn new(default_geometry: WindowGeometry) -> Self {
        Self { default_geometry }
    }

    pub fn default_geometry(&self) -> WindowGeometry {
        self.default_geometry
    }

    /// The persisted geometry, or the default when the record is absent or unusable.
    pub fn load(&self, project: &ProjectFolder) -> WindowGeometry {
        match self.try_load(project) {
            Ok(geometry) => geometry,
            Err(warning) => {
                tracing::warn!("{}. Will use default values.", warning);
                self.default_geometry
            }
        }
    }

    /// Like [`load`](Self::load), but reports why the default would be used.
    pub fn try_load(&self, project: &ProjectFolder) -> Result<WindowGeometry, PersistenceWarning> {
        let path = project.member(Member::WindowGeometry);
        if !path.is_file() {
            return Err(PersistenceWarning::Missing(path));
        }

        let contents = fs::read_to_string(&path).map_err(|e| PersistenceWarning::Corrupt {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        let geometry: WindowGeometry =
            serde_yaml_ng::from_str(&contents).map_err(|e| PersistenceWarning::Corrupt {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        if !geometry.is_usable() {
            return Err(PersistenceWarning::Corrupt {
                path,
                reason: format!("zero-sized window {}x{}", geometry.width, geometry.height),
            });
        }

        tracing::debug!("Loaded frame properties from {}", path);
        Ok(geometry)
    }

    pub fn save(
        &self,
        project: &ProjectFolder,
        geometry: &WindowGeometry,
    ) -> Result<(), PersistenceWarning> {
        let path = project.member(Member::WindowGeometry);
        let write_failed = |reason: String| PersistenceWarning::WriteFailed {
            path: path.clone(),
            reason,
        };

        let yaml = serde_yaml_ng::to_string(geometry).map_err(|e| write_failed(e.to_string()))?;
        fs::write(&path, yaml).map_err(|e| write_failed(e.to_string()))?;

        tracing::info!("Saved frame properties to {}", path);
        Ok(())
    }
}
