//! Services module - the external collaborators of the launcher.
//!
//! The lifecycle controller only talks to these through narrow traits, so each can be swapped
//! for a fake in tests:
//!
//! - [`OptimizerProbe`]: is the integer-programming solver installed, linkable and licensed?
//!   Default: [`GurobiProbe`].
//! - [`DatasetLoader`]: turn a stack path into a usable [`Dataset`]. Default: [`TiffStackLoader`].
//! - [`TrackingRunner`]: start tracking for a session (auto-run). Default: [`CommandTracker`],
//!   which launches an external command.
//! - [`Exporter`]: write session results to the export folder on shutdown. Default:
//!   [`SessionExporter`].

pub mod dataset;
pub mod export;
pub mod optimizer;
pub mod tracking;

pub use dataset::{Dataset, DatasetLoader, TiffStackLoader};
pub use export::{Exporter, SessionExporter};
pub use optimizer::{GurobiProbe, OptimizerProbe};
pub use tracking::{CommandTracker, TrackingJob, TrackingRunner};
