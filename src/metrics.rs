// Lifecycle metrics
//
// Lightweight counters for one launcher run, logged as a summary on termination.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Counters for one run of the lifecycle.
///
/// Atomic so the tracking worker thread can record alongside the lifecycle thread.
#[derive(Debug)]
pub struct Metrics {
    /// Lifecycle transitions taken
    pub transitions: AtomicU64,

    /// Prompts presented to the user (dialogs, choices, notices)
    pub prompts: AtomicU64,

    /// Non-fatal warnings (argument corrections, persistence, export)
    pub warnings: AtomicU64,

    /// Close requests the user cancelled at the confirmation prompt
    pub shutdown_cancellations: AtomicU64,

    /// Time spent in the dataset loader, in milliseconds
    pub dataset_load_ms: AtomicU64,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            transitions: AtomicU64::new(0),
            prompts: AtomicU64::new(0),
            warnings: AtomicU64::new(0),
            shutdown_cancellations: AtomicU64::new(0),
            dataset_load_ms: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_transition(&self) {
        self.transitions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_prompt(&self) {
        self.prompts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_warning(&self) {
        self.warnings.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_shutdown_cancelled(&self) {
        self.shutdown_cancellations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dataset_load(&self, duration: Duration) {
        self.dataset_load_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Log metrics summary
    pub fn log_summary(&self) {
        tracing::info!("=== Lifecycle Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Transitions: {}, prompts: {}, warnings: {}, cancelled close requests: {}",
            self.transitions.load(Ordering::Relaxed),
            self.prompts.load(Ordering::Relaxed),
            self.warnings.load(Ordering::Relaxed),
            self.shutdown_cancellations.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Dataset load: {}ms",
            self.dataset_load_ms.load(Ordering::Relaxed)
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
