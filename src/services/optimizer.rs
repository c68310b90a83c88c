//! Availability check for the Gurobi integer-programming solver.
//!
//! Tracking cannot run without the solver, so the launcher checks it before asking the user for
//! anything. The check is layered the way failures show up in practice:
//!
//! 1. installation directory present (`GUROBI_HOME`), else [`OptimizerError::NotInstalled`]
//! 2. a native solver library under `lib/`, else [`OptimizerError::NativeLink`]
//! 3. a readable license file (`GRB_LICENSE_FILE`, or `gurobi.lic` in the home directory),
//!    else [`OptimizerError::License`]

use crate::error::OptimizerError;
use crate::models::OptimizerSettings;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

pub const HOME_VAR: &str = "GUROBI_HOME";
pub const LICENSE_VAR: &str = "GRB_LICENSE_FILE";
const LICENSE_FILE_NAME: &str = "gurobi.lic";

/// Checks that the optimizer can be used.
pub trait OptimizerProbe {
    fn check_available(&self) -> Result<(), OptimizerError>;
}

/// Filesystem-based Gurobi availability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GurobiProbe {
    home: Option<Utf8PathBuf>,
    license_file: Option<Utf8PathBuf>,
}

impl GurobiProbe {
    pub fn new(home: Option<Utf8PathBuf>, license_file: Option<Utf8PathBuf>) -> Self {
        Self { home, license_file }
    }

    /// Settings overrides first, then `GUROBI_HOME` / `GRB_LICENSE_FILE`, then `~/gurobi.lic`.
    pub fn from_settings(settings: &OptimizerSettings) -> Self {
        let home = settings
            .home
            .clone()
            .or_else(|| std::env::var(HOME_VAR).ok())
            .filter(|h| !h.is_empty())
            .map(Utf8PathBuf::from);

        let license_file = settings
            .license_file
            .clone()
            .or_else(|| std::env::var(LICENSE_VAR).ok())
            .filter(|l| !l.is_empty())
            .map(Utf8PathBuf::from)
            .or_else(|| {
                dirs::home_dir()
                    .and_then(|home| Utf8PathBuf::try_from(home).ok())
                    .map(|home| home.join(LICENSE_FILE_NAME))
            });

        Self { home, license_file }
    }

    fn has_native_library(lib_dir: &Utf8Path) -> bool {
        let Ok(entries) = lib_dir.read_dir_utf8() else {
            return false;
        };
        entries.flatten().any(|entry| {
            let name = entry.file_name().to_ascii_lowercase();
            let is_gurobi = name.starts_with("libgurobi") || name.starts_with("gurobi");
            let is_native =
                name.ends_with(".dll") || name.ends_with(".dylib") || name.contains(".so");
            is_gurobi && is_native
        })
    }
}

impl OptimizerProbe for GurobiProbe {
    fn check_available(&self) -> Result<(), OptimizerError> {
        let home = self
            .home
            .as_ref()
            .ok_or_else(|| OptimizerError::NotInstalled(format!("{} is not set", HOME_VAR)))?;
        if !home.is_dir() {
            return Err(OptimizerError::NotInstalled(format!(
                "{} does not exist",
                home
            )));
        }

        let lib_dir = home.join("lib");
        if !Self::has_native_library(&lib_dir) {
            return Err(OptimizerError::NativeLink(format!(
                "no Gurobi library in {}",
                lib_dir
            )));
        }

        let license = self
            .license_file
            .as_ref()
            .ok_or_else(|| OptimizerError::License("no license file configured".to_string()))?;
        let contents = fs::read_to_string(license)
            .map_err(|e| OptimizerError::License(format!("cannot read {}: {}", license, e)))?;
        if contents.trim().is_empty() {
            return Err(OptimizerError::License(format!("{} is empty", license)));
        }

        tracing::info!("Gurobi found at {} (license {})", home, license);
        Ok(())
    }
}
