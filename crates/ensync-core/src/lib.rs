//! Core of the employeeNumber reconciliation job.
//!
//! Computes the next free employee number from live directory state and
//! assigns consecutive numbers to role members that lack one. The directory
//! itself is the source of truth on every run; nothing is cached across runs.

pub mod alloc;
pub mod config;
pub mod directory;
pub mod error;
pub mod escape;
pub mod metrics;

pub use alloc::{RunReport, assign_numbers, next_free_number, run_allocation};
pub use config::JobConfig;
pub use directory::{Directory, DirectoryEntry, EntryPager};
pub use error::{AllocError, ConfigError, DirectoryError, MetricsError};
pub use metrics::{MetricsHandle, MetricsSink, NoOpMetrics, noop_metrics};
