pub mod logging;
pub mod metrics;

pub use logging::QueryLogger;
pub use metrics::{get_global_metrics, BatchCounters, Metrics, PageLatency};
