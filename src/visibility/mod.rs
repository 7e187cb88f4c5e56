//! Visibility collaborators: page visibility and element intersection
//!
//! The host owns the real detection (document visibility, intersection
//! observers). This module only defines the capabilities triggers need, the
//! change-detection built on top of them, and in-memory implementations for
//! hosts without a rendering surface.
//!
//! Every registration made here is released on drop.

use std::sync::{Arc, Mutex, PoisonError};

mod intersection;

pub use intersection::{
    IntersectionCallback, IntersectionEntry, IntersectionObserver, ManualIntersectionObserver,
    ObservationId, TargetId, FULL_VISIBILITY,
};

// ─────────────────────────────────────────────────────────────────────────────
// Previous Value
// ─────────────────────────────────────────────────────────────────────────────

/// Remembers the value seen on the previous update
#[derive(Debug, Clone, PartialEq)]
pub struct Previous<T> {
    value: T,
}

impl<T> Previous<T> {
    pub fn new(initial: T) -> Self {
        Self { value: initial }
    }

    /// Store `current`, returning the value it replaced
    pub fn update(&mut self, current: T) -> T {
        std::mem::replace(&mut self.value, current)
    }

    pub fn get(&self) -> &T {
        &self.value
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Page Visibility
// ─────────────────────────────────────────────────────────────────────────────

/// Callback invoked with the page's visibility after a change notification
pub type VisibilityListener = Arc<dyn Fn(bool) + Send + Sync>;

/// Handle returned when registering a visibility listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Source of page visibility changes
///
/// Implementations may notify listeners even when visibility did not actually
/// change; [`VisibilityWatch`] filters those out.
pub trait PageVisibility: Send + Sync {
    fn is_visible(&self) -> bool;

    fn add_listener(&self, listener: VisibilityListener) -> ListenerId;

    fn remove_listener(&self, id: ListenerId);
}

/// Listener registration that reports only real visibility transitions
///
/// Seeds its previous value with the visibility at construction, so nothing
/// fires for the initial state. Deregisters on drop.
pub struct VisibilityWatch {
    source: Arc<dyn PageVisibility>,
    id: ListenerId,
}

impl VisibilityWatch {
    pub fn new<F>(source: &Arc<dyn PageVisibility>, callback: F) -> Self
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let previous = Mutex::new(Previous::new(source.is_visible()));
        let listener: VisibilityListener = Arc::new(move |visible: bool| {
            let was_visible = previous
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .update(visible);
            if was_visible != visible {
                callback(visible);
            }
        });

        let id = source.add_listener(listener);
        tracing::trace!(listener = id.0, "Visibility listener registered");

        Self {
            source: source.clone(),
            id,
        }
    }
}

impl Drop for VisibilityWatch {
    fn drop(&mut self) {
        self.source.remove_listener(self.id);
        tracing::trace!(listener = self.id.0, "Visibility listener removed");
    }
}

impl std::fmt::Debug for VisibilityWatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilityWatch").field("id", &self.id).finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Manual Page Visibility
// ─────────────────────────────────────────────────────────────────────────────

struct ManualVisibilityState {
    visible: bool,
    next_id: u64,
    listeners: Vec<(ListenerId, VisibilityListener)>,
}

/// Page visibility driven by hand
pub struct ManualPageVisibility {
    state: Mutex<ManualVisibilityState>,
}

impl ManualPageVisibility {
    pub fn new(visible: bool) -> Self {
        Self {
            state: Mutex::new(ManualVisibilityState {
                visible,
                next_id: 0,
                listeners: Vec::new(),
            }),
        }
    }

    /// Set visibility and notify every listener, changed or not
    pub fn set_visible(&self, visible: bool) {
        let listeners: Vec<VisibilityListener> = {
            let mut state = self.lock();
            state.visible = visible;
            state.listeners.iter().map(|(_, l)| l.clone()).collect()
        };

        for listener in listeners {
            listener(visible);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualVisibilityState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ManualPageVisibility {
    fn default() -> Self {
        Self::new(true)
    }
}

impl PageVisibility for ManualPageVisibility {
    fn is_visible(&self) -> bool {
        self.lock().visible
    }

    fn add_listener(&self, listener: VisibilityListener) -> ListenerId {
        let mut state = self.lock();
        let id = ListenerId(state.next_id);
        state.next_id += 1;
        state.listeners.push((id, listener));
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.lock().listeners.retain(|(existing, _)| *existing != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<bool>>>, impl Fn(bool) + Send + Sync + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |visible: bool| sink.lock().unwrap().push(visible))
    }

    #[test]
    fn test_previous_returns_replaced_value() {
        let mut previous = Previous::new(0);
        assert_eq!(previous.update(1), 0);
        assert_eq!(previous.update(2), 1);
        assert_eq!(*previous.get(), 2);
    }

    #[test]
    fn test_watch_reports_only_transitions() {
        let page = Arc::new(ManualPageVisibility::new(true));
        let source: Arc<dyn PageVisibility> = page.clone();
        let (seen, callback) = recorder();
        let _watch = VisibilityWatch::new(&source, callback);

        page.set_visible(true);
        page.set_visible(false);
        page.set_visible(false);
        page.set_visible(true);

        assert_eq!(*seen.lock().unwrap(), vec![false, true]);
    }

    #[test]
    fn test_watch_reports_hide_with_current_visibility() {
        let page = Arc::new(ManualPageVisibility::new(true));
        let source: Arc<dyn PageVisibility> = page.clone();
        let (seen, callback) = recorder();
        let _watch = VisibilityWatch::new(&source, callback);

        page.set_visible(false);

        assert_eq!(*seen.lock().unwrap(), vec![false]);
    }

    #[test]
    fn test_watch_deregisters_on_drop() {
        let page = Arc::new(ManualPageVisibility::new(false));
        let source: Arc<dyn PageVisibility> = page.clone();
        let (seen, callback) = recorder();

        let watch = VisibilityWatch::new(&source, callback);
        assert_eq!(page.listener_count(), 1);
        drop(watch);
        assert_eq!(page.listener_count(), 0);

        page.set_visible(true);
        assert!(seen.lock().unwrap().is_empty());
    }
}
