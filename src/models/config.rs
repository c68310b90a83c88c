use serde::{Deserialize, Serialize};

use super::geometry::WindowGeometry;

/// Application settings from `tr2d.yaml` and `TR2D_*` environment variables.
///
/// These are the long-lived preferences of the installation, as opposed to the per-launch
/// [`LaunchConfig`](super::LaunchConfig) resolved from the command line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub logging: LoggingSettings,

    #[serde(default)]
    pub window: WindowSettings,

    #[serde(default)]
    pub optimizer: OptimizerSettings,

    #[serde(default)]
    pub tracking: TrackingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_dir")]
    pub dir: String,

    #[serde(default)]
    pub debug: bool,

    #[serde(default = "default_true")]
    pub console: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            debug: false,
            console: true,
        }
    }
}

/// Nominal window and screen sizes used for the fallback geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSettings {
    #[serde(default = "default_width")]
    pub default_width: u32,

    #[serde(default = "default_height")]
    pub default_height: u32,

    #[serde(default = "default_screen_width")]
    pub screen_width: u32,

    #[serde(default = "default_screen_height")]
    pub screen_height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            default_width: default_width(),
            default_height: default_height(),
            screen_width: default_screen_width(),
            screen_height: default_screen_height(),
        }
    }
}

impl WindowSettings {
    /// The documented fallback: a window of the default size centered on the nominal screen.
    pub fn default_geometry(&self) -> WindowGeometry {
        WindowGeometry::centered(
            self.screen_width,
            self.screen_height,
            self.default_width,
            self.default_height,
        )
    }
}

/// Overrides for locating the Gurobi installation and license.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizerSettings {
    #[serde(default)]
    pub home: Option<String>,

    #[serde(default)]
    pub license_file: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingSettings {
    /// External command started on auto-run; receives the project folder as its last argument.
    #[serde(default)]
    pub command: Option<String>,

    #[serde(default)]
    pub args: Vec<String>,
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_true() -> bool {
    true
}

fn default_width() -> u32 {
    1200
}

fn default_height() -> u32 {
    1024
}

fn default_screen_width() -> u32 {
    1920
}

fn default_screen_height() -> u32 {
    1080
}
