//! Observability: walk telemetry (metrics) and sink abstractions.
//!
//! Walk code never touches metrics state directly; it emits
//! `MetricsEvent`s through `sink::record`.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EntityCounters, EntitySummary, EventOps, EventReport, EventState};
pub use sink::{
    MetricsEvent, MetricsSink, WalkKind, metrics_report, metrics_reset_all, with_metrics_sink,
};
