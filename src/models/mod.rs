//! Data models for the tr2d launcher.
//!
//! - [`LaunchConfig`]: the per-run startup parameters resolved from the command line
//! - [`TimeRange`]: inclusive frame range, with an unbounded sentinel for "until the end"
//! - [`ExitOutcome`]: the terminal code and cause of one run
//! - [`WindowGeometry`]: window bounds persisted in a project folder
//! - [`AppSettings`]: installation-wide preferences loaded by
//!   [`SettingsManager`](crate::config::SettingsManager)

pub mod config;
pub mod geometry;
pub mod launch;

pub use config::{AppSettings, LoggingSettings, OptimizerSettings, TrackingSettings, WindowSettings};
pub use geometry::WindowGeometry;
pub use launch::{ExitOutcome, LaunchConfig, TimeRange};
