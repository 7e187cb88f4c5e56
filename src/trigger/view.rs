//! View trigger: `view` events from element intersection

use super::Trigger;
use crate::events::{DispatchFields, EventKind};
use crate::scope::ScopeContext;
use crate::visibility::{IntersectionEntry, IntersectionObserver, ObservationId, TargetId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Live registration of one target with the observer
///
/// Dropping it removes this registration, leaving other observers of the same
/// target in place, and silences any callback still delivered afterwards.
struct Observation {
    target: TargetId,
    id: ObservationId,
    observer: Arc<dyn IntersectionObserver>,
    live: Arc<AtomicBool>,
}

impl Drop for Observation {
    fn drop(&mut self) {
        self.live.store(false, Ordering::SeqCst);
        self.observer.unobserve(self.id);
        tracing::trace!(target_id = self.target.0, "Stopped observing view target");
    }
}

/// Fires `view` once each time the observed target becomes fully visible
///
/// Partial visibility never fires. The target must drop below full visibility
/// before it can fire again.
pub struct ViewTrigger {
    trigger: Trigger,
    observer: Arc<dyn IntersectionObserver>,
    fields: DispatchFields,
    observation: Option<Observation>,
}

impl ViewTrigger {
    pub fn new(
        context: &ScopeContext,
        observer: Arc<dyn IntersectionObserver>,
        fields: DispatchFields,
    ) -> Self {
        Self {
            trigger: Trigger::new(context, EventKind::View),
            observer,
            fields,
            observation: None,
        }
    }

    /// Point the trigger at a new target, or at none
    ///
    /// The previous target is unobserved first. Setting the current target
    /// again keeps the existing observation.
    pub fn set_target(&mut self, target: Option<TargetId>) {
        if self.target() == target {
            return;
        }
        self.observation = None;

        if let Some(target) = target {
            self.observation = Some(self.observe(target));
        }
    }

    pub fn target(&self) -> Option<TargetId> {
        self.observation.as_ref().map(|o| o.target)
    }

    fn observe(&self, target: TargetId) -> Observation {
        let live = Arc::new(AtomicBool::new(true));
        let fully_visible = AtomicBool::new(false);
        let trigger = self.trigger.clone();
        let fields = self.fields.clone();
        let callback_live = live.clone();

        let id = self.observer.observe(
            target,
            Arc::new(move |entry: IntersectionEntry| {
                if !callback_live.load(Ordering::SeqCst) || entry.target != target {
                    return;
                }
                let now_full = entry.is_fully_visible();
                let was_full = fully_visible.swap(now_full, Ordering::SeqCst);
                if now_full && !was_full {
                    trigger.dispatch(fields.clone());
                }
            }),
        );
        tracing::trace!(target_id = target.0, observation = id.0, "Observing view target");

        Observation {
            target,
            id,
            observer: self.observer.clone(),
            live,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::{TrackingElement, TrackingRoot};
    use crate::sink::MemorySink;
    use crate::visibility::ManualIntersectionObserver;

    fn setup() -> (TrackingRoot, MemorySink, Arc<ManualIntersectionObserver>) {
        let sink = MemorySink::new();
        let root = TrackingRoot::builder("app").with_sink(sink.clone()).build();
        (root, sink, Arc::new(ManualIntersectionObserver::new()))
    }

    #[test]
    fn test_fires_once_when_fully_visible() {
        let (root, sink, observer) = setup();
        let element = TrackingElement::new(root.context(), "banner");
        let mut trigger = ViewTrigger::new(
            element.context(),
            observer.clone(),
            DispatchFields::new().component("banner").label("123"),
        );
        trigger.set_target(Some(TargetId(1)));

        observer.report(TargetId(1), 1.0);
        observer.report(TargetId(1), 1.0);

        assert_eq!(sink.len(), 1);
        let payload = sink.last().unwrap();
        assert_eq!(payload.event, EventKind::View);
        assert_eq!(payload.element_tree, vec!["banner".to_string()]);
        assert_eq!(payload.label.as_deref(), Some("123"));
    }

    #[test]
    fn test_partial_visibility_never_fires() {
        let (root, sink, observer) = setup();
        let mut trigger = ViewTrigger::new(root.context(), observer.clone(), DispatchFields::new());
        trigger.set_target(Some(TargetId(1)));

        observer.report(TargetId(1), 0.25);
        observer.report(TargetId(1), 0.99);

        assert!(sink.is_empty());
    }

    #[test]
    fn test_fires_again_after_leaving_full_visibility() {
        let (root, sink, observer) = setup();
        let mut trigger = ViewTrigger::new(root.context(), observer.clone(), DispatchFields::new());
        trigger.set_target(Some(TargetId(1)));

        observer.report(TargetId(1), 1.0);
        observer.report(TargetId(1), 0.5);
        observer.report(TargetId(1), 1.0);

        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn test_target_change_unobserves_previous() {
        let (root, sink, observer) = setup();
        let mut trigger = ViewTrigger::new(root.context(), observer.clone(), DispatchFields::new());

        trigger.set_target(Some(TargetId(1)));
        trigger.set_target(Some(TargetId(2)));
        assert!(!observer.is_observing(TargetId(1)));
        assert!(observer.is_observing(TargetId(2)));

        observer.report(TargetId(1), 1.0);
        assert!(sink.is_empty());

        observer.report(TargetId(2), 1.0);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_removed_target_does_not_fire() {
        let (root, sink, observer) = setup();
        let mut trigger = ViewTrigger::new(root.context(), observer.clone(), DispatchFields::new());
        trigger.set_target(Some(TargetId(1)));

        trigger.set_target(None);
        observer.report(TargetId(1), 1.0);

        assert!(sink.is_empty());
        assert_eq!(observer.observed_count(), 0);
    }

    #[test]
    fn test_drop_releases_observation() {
        let (root, sink, observer) = setup();
        let mut trigger = ViewTrigger::new(root.context(), observer.clone(), DispatchFields::new());
        trigger.set_target(Some(TargetId(1)));
        assert_eq!(observer.observed_count(), 1);

        drop(trigger);
        assert_eq!(observer.observed_count(), 0);
        observer.report(TargetId(1), 1.0);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_stale_callback_is_silenced() {
        // an observer that keeps callbacks around after unobserve
        #[derive(Default)]
        struct LeakyObserver {
            callbacks: std::sync::Mutex<Vec<crate::visibility::IntersectionCallback>>,
        }
        impl IntersectionObserver for LeakyObserver {
            fn observe(
                &self,
                _target: TargetId,
                callback: crate::visibility::IntersectionCallback,
            ) -> ObservationId {
                let mut callbacks = self.callbacks.lock().unwrap();
                callbacks.push(callback);
                ObservationId(callbacks.len() as u64)
            }
            fn unobserve(&self, _id: ObservationId) {}
        }

        let (root, sink, _) = setup();
        let observer = Arc::new(LeakyObserver::default());
        let mut trigger = ViewTrigger::new(root.context(), observer.clone(), DispatchFields::new());
        trigger.set_target(Some(TargetId(1)));
        trigger.set_target(None);

        for callback in observer.callbacks.lock().unwrap().iter() {
            callback(IntersectionEntry::new(TargetId(1), 1.0));
        }
        assert!(sink.is_empty());
    }

    #[test]
    fn test_triggers_sharing_a_target_fire_independently() {
        let (root, sink, observer) = setup();
        let mut hero = ViewTrigger::new(
            root.context(),
            observer.clone(),
            DispatchFields::new().component("hero"),
        );
        let mut promo = ViewTrigger::new(
            root.context(),
            observer.clone(),
            DispatchFields::new().component("promo"),
        );
        hero.set_target(Some(TargetId(1)));
        promo.set_target(Some(TargetId(1)));

        observer.report(TargetId(1), 1.0);
        let components: Vec<_> = sink.payloads().into_iter().map(|p| p.component).collect();
        assert_eq!(
            components,
            vec![Some("hero".to_string()), Some("promo".to_string())]
        );

        drop(hero);
        assert!(observer.is_observing(TargetId(1)));
        sink.clear();

        observer.report(TargetId(1), 0.0);
        observer.report(TargetId(1), 1.0);
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.last().unwrap().component.as_deref(), Some("promo"));
    }
}
