use crate::models::AppSettings;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// File name of the settings file inside the settings directory.
pub const SETTINGS_FILE: &str = "tr2d.yaml";

/// Prefix of environment variables that override settings (`TR2D_LOGGING__DEBUG=true`).
pub const ENV_PREFIX: &str = "TR2D";

/// Loads and saves the installation-wide [`AppSettings`].
///
/// Sources are layered with the `config` crate, later sources winning:
/// 1. built-in defaults
/// 2. `tr2d.yaml` in the settings directory (optional)
/// 3. `TR2D_*` environment variables, `__` separating nested keys
#[derive(Debug, Clone)]
pub struct SettingsManager {
    settings_dir: Utf8PathBuf,
    settings_path: Utf8PathBuf,
    env_prefix: String,
}

impl SettingsManager {
    /// Create a SettingsManager for the given directory, creating the directory if needed.
    pub fn new<P: AsRef<Utf8Path>>(settings_dir: P) -> Result<Self> {
        Self::with_env_prefix(settings_dir, ENV_PREFIX)
    }

    /// Like [`SettingsManager::new`], reading overrides from `<prefix>_*` variables instead.
    pub fn with_env_prefix<P: AsRef<Utf8Path>>(settings_dir: P, env_prefix: &str) -> Result<Self> {
        let settings_dir = settings_dir.as_ref().to_path_buf();

        if !settings_dir.exists() {
            fs::create_dir_all(&settings_dir).with_context(|| {
                format!("Failed to create settings directory: {}", settings_dir)
            })?;
        }

        Ok(Self {
            settings_path: settings_dir.join(SETTINGS_FILE),
            settings_dir,
            env_prefix: env_prefix.to_string(),
        })
    }

    /// Load the layered settings. A missing settings file is not an error.
    pub fn load(&self) -> Result<AppSettings> {
        if !self.settings_path.exists() {
            tracing::debug!(
                "Settings file not found at {}, using defaults and environment",
                self.settings_path
            );
        }

        let layered = config::Config::builder()
            .add_source(
                config::File::from(self.settings_path.as_std_path())
                    .format(config::FileFormat::Yaml)
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix(&self.env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read settings: {}", self.settings_path))?;

        let settings: AppSettings = layered
            .try_deserialize()
            .with_context(|| format!("Failed to parse settings: {}", self.settings_path))?;

        tracing::debug!("Loaded settings from {}", self.settings_dir);
        Ok(settings)
    }

    /// Write the settings file.
    pub fn save(&self, settings: &AppSettings) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(settings).context("Failed to serialize settings to YAML")?;

        fs::write(&self.settings_path, yaml_string)
            .with_context(|| format!("Failed to write settings: {}", self.settings_path))?;

        tracing::info!("Saved settings to {}", self.settings_path);
        Ok(())
    }

    /// Write a settings file holding the defaults unless one exists already.
    ///
    /// Returns whether a file was written.
    pub fn write_defaults_if_missing(&self) -> Result<bool> {
        if self.settings_path.exists() {
            return Ok(false);
        }
        self.save(&AppSettings::default())?;
        Ok(true)
    }

    pub fn settings_dir(&self) -> &Utf8Path {
        &self.settings_dir
    }

    pub fn settings_path(&self) -> &Utf8Path {
        &self.settings_path
    }
}
