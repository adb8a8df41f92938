//! Observability: in-process counters and the sink boundary that feeds them.
//!
//! Store, form, and status logic never touch counter state directly.
//! All instrumentation flows through `MetricsEvent` and `MetricsSink`.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EntityCounters, EventOps, EventReport};
pub use sink::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink};
