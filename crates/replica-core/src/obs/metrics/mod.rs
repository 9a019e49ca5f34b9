use serde::{Deserialize, Serialize};
use std::{cell::RefCell, cmp::Ordering, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for clone, update and reset walks.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub entities: BTreeMap<String, EntityCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventOps {
    // Engine entrypoints
    pub clone_calls: u64,
    pub update_calls: u64,
    pub reset_calls: u64,
    pub walk_failures: u64,

    // Traversal
    pub entities_visited: u64,
    pub fields_touched: u64,

    // Specification registry
    pub spec_lookups: u64,
    pub spec_constructions: u64,
}

///
/// EntityCounters
/// Counters keyed by the root entity path of each walk, plus visits to
/// nested entities of that type.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EntityCounters {
    pub clone_calls: u64,
    pub update_calls: u64,
    pub reset_calls: u64,
    pub failures: u64,
    pub visits: u64,
    pub fields_touched: u64,
}

impl EntityCounters {
    const fn walks(&self) -> u64 {
        self.clone_calls
            .saturating_add(self.update_calls)
            .saturating_add(self.reset_calls)
    }
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

/// Counters for one entity path, created on first use.
pub(crate) fn entity<'a>(m: &'a mut EventState, path: &str) -> &'a mut EntityCounters {
    m.entities.entry(path.to_string()).or_default()
}

///
/// EventReport
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    pub counters: EventState,
    /// Per-entity counters with averages, busiest first.
    pub entity_counters: Vec<EntitySummary>,
}

///
/// EntitySummary
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EntitySummary {
    pub path: String,
    pub clone_calls: u64,
    pub update_calls: u64,
    pub reset_calls: u64,
    pub failures: u64,
    pub visits: u64,
    pub fields_touched: u64,
    pub avg_fields_per_walk: f64,
}

/// Build a report from the in-memory counters.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub(crate) fn report() -> EventReport {
    let snap = with_state(Clone::clone);

    let mut entity_counters: Vec<EntitySummary> = snap
        .entities
        .iter()
        .map(|(path, ops)| {
            let walks = ops.walks();
            let avg_fields = if walks > 0 {
                ops.fields_touched as f64 / walks as f64
            } else {
                0.0
            };

            EntitySummary {
                path: path.clone(),
                clone_calls: ops.clone_calls,
                update_calls: ops.update_calls,
                reset_calls: ops.reset_calls,
                failures: ops.failures,
                visits: ops.visits,
                fields_touched: ops.fields_touched,
                avg_fields_per_walk: avg_fields,
            }
        })
        .collect();

    entity_counters.sort_by(|a, b| {
        match b
            .avg_fields_per_walk
            .partial_cmp(&a.avg_fields_per_walk)
            .unwrap_or(Ordering::Equal)
        {
            Ordering::Equal => match b.visits.cmp(&a.visits) {
                Ordering::Equal => a.path.cmp(&b.path),
                other => other,
            },
            other => other,
        }
    });

    EventReport {
        counters: snap,
        entity_counters,
    }
}

///
/// TESTS
///
