//! Metrics sink boundary.
//!
//! Walk logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
use crate::{error::ErrorClass, obs::metrics};
use std::cell::RefCell;

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<*const dyn MetricsSink>> = const { RefCell::new(None) };
}

///
/// WalkKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WalkKind {
    Clone,
    Update,
    Reset,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    WalkStart {
        kind: WalkKind,
        entity_path: &'static str,
    },
    WalkFinish {
        kind: WalkKind,
        entity_path: &'static str,
        fields: u64,
    },
    WalkFailed {
        kind: WalkKind,
        entity_path: &'static str,
        class: ErrorClass,
    },
    EntityVisited {
        kind: WalkKind,
        entity_path: &'static str,
    },
    SpecResolved {
        spec: &'static str,
        constructed: bool,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default sink that writes into the thread-local metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::WalkStart { kind, entity_path } => {
                metrics::with_state_mut(|m| {
                    match kind {
                        WalkKind::Clone => m.ops.clone_calls = m.ops.clone_calls.saturating_add(1),
                        WalkKind::Update => {
                            m.ops.update_calls = m.ops.update_calls.saturating_add(1);
                        }
                        WalkKind::Reset => m.ops.reset_calls = m.ops.reset_calls.saturating_add(1),
                    }

                    let entry = metrics::entity(m, entity_path);
                    match kind {
                        WalkKind::Clone => entry.clone_calls = entry.clone_calls.saturating_add(1),
                        WalkKind::Update => {
                            entry.update_calls = entry.update_calls.saturating_add(1);
                        }
                        WalkKind::Reset => entry.reset_calls = entry.reset_calls.saturating_add(1),
                    }
                });
            }

            MetricsEvent::WalkFinish {
                entity_path,
                fields,
                ..
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.fields_touched = m.ops.fields_touched.saturating_add(fields);
                    let entry = metrics::entity(m, entity_path);
                    entry.fields_touched = entry.fields_touched.saturating_add(fields);
                });
            }

            MetricsEvent::WalkFailed { entity_path, .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.walk_failures = m.ops.walk_failures.saturating_add(1);
                    let entry = metrics::entity(m, entity_path);
                    entry.failures = entry.failures.saturating_add(1);
                });
            }

            MetricsEvent::EntityVisited { entity_path, .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.entities_visited = m.ops.entities_visited.saturating_add(1);
                    let entry = metrics::entity(m, entity_path);
                    entry.visits = entry.visits.saturating_add(1);
                });
            }

            MetricsEvent::SpecResolved { constructed, .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.spec_lookups = m.ops.spec_lookups.saturating_add(1);
                    if constructed {
                        m.ops.spec_constructions = m.ops.spec_constructions.saturating_add(1);
                    }
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    let override_ptr = SINK_OVERRIDE.with(|cell| *cell.borrow());
    if let Some(ptr) = override_ptr {
        // SAFETY:
        // Preconditions:
        // - `ptr` was produced from a valid `&dyn MetricsSink` in `with_metrics_sink`.
        // - `with_metrics_sink` always restores the previous pointer before returning,
        //   including unwind paths via `Guard::drop`.
        // - `record` is synchronous and never stores `ptr` beyond this call.
        //
        // Aliasing:
        // - Only a shared reference is materialized, matching the borrow used to
        //   install the override.
        unsafe { (&*ptr).record(event) };
    } else {
        GLOBAL_METRICS_SINK.record(event);
    }
}

/// Snapshot the current thread's walk metrics.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all walk metrics on the current thread.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
///
/// Events emitted on this thread inside `f` go to `sink` instead of the
/// thread-local counters. Overrides nest and are restored on unwind.
pub fn with_metrics_sink<T>(sink: &dyn MetricsSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<*const dyn MetricsSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0;
            });
        }
    }

    // SAFETY:
    // Preconditions:
    // - `sink_ptr` is installed only for this dynamic scope.
    // - `Guard` always restores the previous slot on all exits, including panic.
    // - `record` only dereferences synchronously and never persists `sink_ptr`.
    //
    // What would break this:
    // - Any deferred use of `sink_ptr` beyond this scope.
    // - Any path that bypasses Guard restoration.
    let sink_ptr = unsafe { std::mem::transmute::<&dyn MetricsSink, *const dyn MetricsSink>(sink) };
    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink_ptr));
    let _guard = Guard(prev);

    f()
}

///
/// Span
/// RAII guard that emits start and finish events for one engine call.
/// Finish accounting happens on drop, so early returns and unwinds count.
///

pub(crate) struct Span {
    kind: WalkKind,
    entity_path: &'static str,
    fields: u64,
    failure: Option<ErrorClass>,
}

impl Span {
    #[must_use]
    pub(crate) fn new(kind: WalkKind, entity_path: &'static str) -> Self {
        record(MetricsEvent::WalkStart { kind, entity_path });

        Self {
            kind,
            entity_path,
            fields: 0,
            failure: None,
        }
    }

    pub(crate) const fn set_fields(&mut self, fields: u64) {
        self.fields = fields;
    }

    /// Remember the outcome of the walk this span covers.
    pub(crate) fn observe<T>(&mut self, result: &Result<T, crate::error::ReplicaError>) {
        self.failure = result.as_ref().err().map(|err| err.class);
    }
}

impl Drop for Span {
    fn drop(&mut self) {
        let event = match self.failure {
            Some(class) => MetricsEvent::WalkFailed {
                kind: self.kind,
                entity_path: self.entity_path,
                class,
            },
            None => MetricsEvent::WalkFinish {
                kind: self.kind,
                entity_path: self.entity_path,
                fields: self.fields,
            },
        };

        record(event);
    }
}

///
/// TESTS
///
