//! Metrics sink boundary.
//!
//! This module is the only allowed bridge between store/form/status logic
//! and the process-local metrics state.
use crate::obs::metrics::{self, EntityCounters, EventOps, EventReport};
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = RefCell::new(None);
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    Create { entity_path: &'static str },
    Update { entity_path: &'static str },
    Remove { entity_path: &'static str, existed: bool },
    Transition { entity_path: &'static str },
    InvalidTransition { entity_path: &'static str },
    ValidationFailed { entity_path: &'static str },
}

impl MetricsEvent {
    #[must_use]
    pub const fn entity_path(&self) -> &'static str {
        match self {
            Self::Create { entity_path }
            | Self::Update { entity_path }
            | Self::Remove { entity_path, .. }
            | Self::Transition { entity_path }
            | Self::InvalidTransition { entity_path }
            | Self::ValidationFailed { entity_path } => entity_path,
        }
    }
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default process-local sink that writes into global metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        metrics::with_state_mut(|m| {
            bump_ops(&mut m.ops, event);

            let entry = m
                .entities
                .entry(event.entity_path().to_string())
                .or_default();
            bump_entity(entry, event);
        });
    }
}

fn bump_ops(ops: &mut EventOps, event: MetricsEvent) {
    match event {
        MetricsEvent::Create { .. } => ops.create_calls = ops.create_calls.saturating_add(1),
        MetricsEvent::Update { .. } => ops.update_calls = ops.update_calls.saturating_add(1),
        MetricsEvent::Remove { existed, .. } => {
            ops.remove_calls = ops.remove_calls.saturating_add(1);
            if !existed {
                ops.remove_misses = ops.remove_misses.saturating_add(1);
            }
        }
        MetricsEvent::Transition { .. } => ops.transitions = ops.transitions.saturating_add(1),
        MetricsEvent::InvalidTransition { .. } => {
            ops.invalid_transitions = ops.invalid_transitions.saturating_add(1);
        }
        MetricsEvent::ValidationFailed { .. } => {
            ops.validation_failures = ops.validation_failures.saturating_add(1);
        }
    }
}

fn bump_entity(entry: &mut EntityCounters, event: MetricsEvent) {
    match event {
        MetricsEvent::Create { .. } => entry.create_calls = entry.create_calls.saturating_add(1),
        MetricsEvent::Update { .. } => entry.update_calls = entry.update_calls.saturating_add(1),
        MetricsEvent::Remove { existed, .. } => {
            entry.remove_calls = entry.remove_calls.saturating_add(1);
            if !existed {
                entry.remove_misses = entry.remove_misses.saturating_add(1);
            }
        }
        MetricsEvent::Transition { .. } => {
            entry.transitions = entry.transitions.saturating_add(1);
        }
        MetricsEvent::InvalidTransition { .. } => {
            entry.invalid_transitions = entry.invalid_transitions.saturating_add(1);
        }
        MetricsEvent::ValidationFailed { .. } => {
            entry.validation_failures = entry.validation_failures.saturating_add(1);
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

/// Route one event to the scoped override, or the global sink.
pub(crate) fn record(event: MetricsEvent) {
    let override_sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());
    if let Some(sink) = override_sink {
        sink.record(event);
    } else {
        GLOBAL_METRICS_SINK.record(event);
    }
}

/// Snapshot the current metrics state.
#[must_use]
pub fn metrics_report() -> EventReport {
    metrics::report()
}

/// Reset all metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        cell::Cell,
        panic::{AssertUnwindSafe, catch_unwind},
    };

    #[derive(Default)]
    struct CountingSink {
        calls: Cell<usize>,
    }

    impl MetricsSink for CountingSink {
        fn record(&self, _: MetricsEvent) {
            self.calls.set(self.calls.get() + 1);
        }
    }

    const EVENT: MetricsEvent = MetricsEvent::Create {
        entity_path: "sink_test::Entity",
    };

    #[test]
    fn with_metrics_sink_routes_and_restores_nested_overrides() {
        let outer = Rc::new(CountingSink::default());
        let inner = Rc::new(CountingSink::default());

        with_metrics_sink(outer.clone(), || {
            record(EVENT);
            assert_eq!(outer.calls.get(), 1);

            with_metrics_sink(inner.clone(), || record(EVENT));

            // Inner override was restored to outer override.
            record(EVENT);
        });

        assert_eq!(outer.calls.get(), 2);
        assert_eq!(inner.calls.get(), 1);

        SINK_OVERRIDE.with(|cell| assert!(cell.borrow().is_none()));
    }

    #[test]
    fn with_metrics_sink_restores_override_after_panic() {
        let sink = Rc::new(CountingSink::default());

        let result = catch_unwind(AssertUnwindSafe(|| {
            with_metrics_sink(sink.clone(), || panic!("boom"));
        }));

        assert!(result.is_err());
        SINK_OVERRIDE.with(|cell| assert!(cell.borrow().is_none()));
    }

    #[test]
    fn global_sink_counts_per_entity() {
        metrics_reset_all();

        record(EVENT);
        record(MetricsEvent::Remove {
            entity_path: "sink_test::Entity",
            existed: false,
        });

        let report = metrics_report();
        assert_eq!(report.ops.create_calls, 1);
        assert_eq!(report.ops.remove_calls, 1);
        assert_eq!(report.ops.remove_misses, 1);
        assert_eq!(report.entities["sink_test::Entity"].remove_misses, 1);
    }
}
