use crate::types::Timestamp;
use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for store operations.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub entities: BTreeMap<String, EntityCounters>,
    pub since: Timestamp,
}

impl Default for EventState {
    fn default() -> Self {
        Self {
            ops: EventOps::default(),
            entities: BTreeMap::new(),
            since: Timestamp::now(),
        }
    }
}

/// Snapshot handed to callers; identical shape to the live state.
pub type EventReport = EventState;

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Store entrypoints
    pub create_calls: u64,
    pub update_calls: u64,
    pub remove_calls: u64,

    // Removes that found nothing to delete
    pub remove_misses: u64,

    // Status workflow
    pub transitions: u64,
    pub invalid_transitions: u64,

    // Form commits rejected before reaching a store
    pub validation_failures: u64,
}

///
/// EntityCounters
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EntityCounters {
    pub create_calls: u64,
    pub update_calls: u64,
    pub remove_calls: u64,
    pub remove_misses: u64,
    pub transitions: u64,
    pub invalid_transitions: u64,
    pub validation_failures: u64,
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

/// Clone the current state.
pub(crate) fn report() -> EventReport {
    with_state(Clone::clone)
}
