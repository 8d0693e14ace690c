//! Output Generation
//!
//! Step logging, metrics collection and end-of-run reports.

pub mod logger;
pub mod report;
pub mod stats;

pub use logger::StepLogger;
pub use report::RunReport;
pub use stats::{FailureCounters, MetricsCollector};
