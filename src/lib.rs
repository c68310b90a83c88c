// tr2d - launcher and lifecycle shell for the tr2d cell-tracking workbench
//
// This is the library crate containing command-line resolution, the project folder model and
// the lifecycle state machine. The binary crate (main.rs) wires in the real collaborators.

pub mod cli;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod project;
pub mod services;
pub mod state;
pub mod ui;

// Re-export commonly used types for convenience
pub use config::SettingsManager;
pub use error::{LaunchError, exit_code};
pub use lifecycle::{Collaborators, LifecycleController};
pub use models::{AppSettings, ExitOutcome, LaunchConfig, TimeRange, WindowGeometry};
pub use project::{ProjectFolder, WindowStateStore};
pub use state::{LifecycleState, StateTracker, Transition};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
