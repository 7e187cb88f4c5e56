//! Element intersection capability

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Ratio at which an element counts as fully visible
pub const FULL_VISIBILITY: f64 = 1.0;

/// Host-assigned identity of an observable element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u64);

/// One intersection report for one target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: TargetId,
    /// Visible fraction of the target, 0.0 to 1.0
    pub intersection_ratio: f64,
    pub is_intersecting: bool,
}

impl IntersectionEntry {
    pub fn new(target: TargetId, intersection_ratio: f64) -> Self {
        Self {
            target,
            intersection_ratio,
            is_intersecting: intersection_ratio > 0.0,
        }
    }

    pub fn is_fully_visible(&self) -> bool {
        self.is_intersecting && self.intersection_ratio >= FULL_VISIBILITY
    }
}

pub type IntersectionCallback = Arc<dyn Fn(IntersectionEntry) + Send + Sync>;

/// Handle for one `observe` registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObservationId(pub u64);

/// Observer with a fixed full-visibility threshold
///
/// Each `observe` call is its own registration, even for a target that is
/// already observed; `unobserve` removes only the registration it names.
pub trait IntersectionObserver: Send + Sync {
    fn observe(&self, target: TargetId, callback: IntersectionCallback) -> ObservationId;

    fn unobserve(&self, id: ObservationId);
}

#[derive(Default)]
struct ManualObserverState {
    next_id: u64,
    observed: HashMap<TargetId, Vec<(ObservationId, IntersectionCallback)>>,
}

/// Intersection observer driven by hand
#[derive(Default)]
pub struct ManualIntersectionObserver {
    state: Mutex<ManualObserverState>,
}

impl ManualIntersectionObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report the target's visible ratio to every registration observing it
    pub fn report(&self, target: TargetId, intersection_ratio: f64) {
        let callbacks: Vec<IntersectionCallback> = self
            .lock()
            .observed
            .get(&target)
            .map(|registrations| registrations.iter().map(|(_, cb)| cb.clone()).collect())
            .unwrap_or_default();

        let entry = IntersectionEntry::new(target, intersection_ratio);
        for callback in callbacks {
            callback(entry);
        }
    }

    pub fn is_observing(&self, target: TargetId) -> bool {
        self.lock().observed.contains_key(&target)
    }

    /// Number of live registrations across all targets
    pub fn observed_count(&self) -> usize {
        self.lock().observed.values().map(Vec::len).sum()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualObserverState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl IntersectionObserver for ManualIntersectionObserver {
    fn observe(&self, target: TargetId, callback: IntersectionCallback) -> ObservationId {
        let mut state = self.lock();
        let id = ObservationId(state.next_id);
        state.next_id += 1;
        state.observed.entry(target).or_default().push((id, callback));
        id
    }

    fn unobserve(&self, id: ObservationId) {
        let mut state = self.lock();
        state.observed.retain(|_, registrations| {
            registrations.retain(|(existing, _)| *existing != id);
            !registrations.is_empty()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_full_visibility() {
        assert!(IntersectionEntry::new(TargetId(1), 1.0).is_fully_visible());
        assert!(!IntersectionEntry::new(TargetId(1), 0.99).is_fully_visible());
        assert!(!IntersectionEntry::new(TargetId(1), 0.0).is_intersecting);
    }

    #[test]
    fn test_manual_observer_reports_only_observed_targets() {
        let observer = ManualIntersectionObserver::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let id = observer.observe(
            TargetId(7),
            Arc::new(move |entry| sink.lock().unwrap().push(entry.target)),
        );

        observer.report(TargetId(7), 0.5);
        observer.report(TargetId(8), 1.0);
        observer.unobserve(id);
        observer.report(TargetId(7), 1.0);

        assert_eq!(*seen.lock().unwrap(), vec![TargetId(7)]);
        assert_eq!(observer.observed_count(), 0);
    }

    #[test]
    fn test_unobserve_keeps_other_registrations_on_target() {
        let observer = ManualIntersectionObserver::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let first_sink = seen.clone();
        let second_sink = seen.clone();

        let first = observer.observe(
            TargetId(3),
            Arc::new(move |_: IntersectionEntry| first_sink.lock().unwrap().push("first")),
        );
        let second = observer.observe(
            TargetId(3),
            Arc::new(move |_: IntersectionEntry| second_sink.lock().unwrap().push("second")),
        );
        assert_ne!(first, second);
        assert_eq!(observer.observed_count(), 2);

        observer.report(TargetId(3), 1.0);
        observer.unobserve(first);
        observer.report(TargetId(3), 1.0);

        assert_eq!(*seen.lock().unwrap(), vec!["first", "second", "second"]);
        assert!(observer.is_observing(TargetId(3)));

        observer.unobserve(second);
        assert!(!observer.is_observing(TargetId(3)));
    }
}
