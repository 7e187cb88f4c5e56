//! Page-view trigger

use super::Trigger;
use crate::events::{DispatchFields, EventKind};
use crate::scope::ScopeContext;
use crate::visibility::{PageVisibility, VisibilityWatch};
use std::sync::{Arc, Mutex, PoisonError};

/// Page-view behaviour switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageViewOptions {
    /// Fire again, with the activation's fields, whenever the page goes from
    /// hidden to visible while the trigger is active
    pub refire_on_visibility: bool,
}

#[derive(Debug, Default)]
struct PageViewState {
    active: bool,
    fields: DispatchFields,
}

/// Fires one `page-view` per activation
pub struct PageViewTrigger {
    trigger: Trigger,
    state: Arc<Mutex<PageViewState>>,
    /// Visibility listener held for the trigger's lifetime
    watch: Option<VisibilityWatch>,
}

impl PageViewTrigger {
    pub fn new(context: &ScopeContext) -> Self {
        Self {
            trigger: Trigger::new(context, EventKind::PageView),
            state: Arc::new(Mutex::new(PageViewState::default())),
            watch: None,
        }
    }

    /// Page-view trigger that also listens to page visibility
    ///
    /// The listener is only registered when `refire_on_visibility` is set and
    /// is released when the trigger is dropped.
    pub fn with_visibility(
        context: &ScopeContext,
        visibility: &Arc<dyn PageVisibility>,
        options: PageViewOptions,
    ) -> Self {
        let trigger = Trigger::new(context, EventKind::PageView);
        let state = Arc::new(Mutex::new(PageViewState::default()));

        let watch = options.refire_on_visibility.then(|| {
            let trigger = trigger.clone();
            let state = state.clone();
            VisibilityWatch::new(visibility, move |visible| {
                if !visible {
                    return;
                }
                let fields = {
                    let state = state.lock().unwrap_or_else(PoisonError::into_inner);
                    if !state.active {
                        return;
                    }
                    state.fields.clone()
                };
                trigger.dispatch(fields);
            })
        });

        Self {
            trigger,
            state,
            watch,
        }
    }

    /// Mark the page active and fire, unless it is already active
    ///
    /// Returns whether a page view was dispatched.
    pub fn activate(&self, fields: DispatchFields) -> bool {
        {
            let mut state = self.lock();
            if state.active {
                return false;
            }
            state.active = true;
            state.fields = fields.clone();
        }
        self.trigger.dispatch(fields);
        true
    }

    /// End the current activation; the next `activate` fires again
    pub fn deactivate(&self) {
        self.lock().active = false;
    }

    pub fn is_active(&self) -> bool {
        self.lock().active
    }

    /// Whether a visibility listener is registered for refiring
    pub fn refires_on_visibility(&self) -> bool {
        self.watch.is_some()
    }

    /// Fire unconditionally, outside the activation bookkeeping
    pub fn dispatch(&self, fields: DispatchFields) {
        self.trigger.dispatch(fields);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PageViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::TrackingRoot;
    use crate::sink::MemorySink;
    use crate::visibility::ManualPageVisibility;
    use serde_json::json;

    fn setup() -> (TrackingRoot, MemorySink) {
        let sink = MemorySink::new();
        (TrackingRoot::builder("test-app-hook").with_sink(sink.clone()).build(), sink)
    }

    #[test]
    fn test_page_view_fires_once_per_activation() {
        let (root, sink) = setup();
        let page_view = PageViewTrigger::new(root.context());

        assert!(page_view.activate(DispatchFields::new()));
        assert!(!page_view.activate(DispatchFields::new()));
        assert_eq!(sink.len(), 1);

        page_view.deactivate();
        assert!(page_view.activate(DispatchFields::new()));
        assert_eq!(sink.len(), 2);

        let payload = sink.last().unwrap();
        assert_eq!(payload.event, EventKind::PageView);
        assert_eq!(payload.app.as_deref(), Some("test-app-hook"));
        assert!(payload.element_tree.is_empty());
    }

    #[test]
    fn test_page_view_with_custom_parameters() {
        let (root, sink) = setup();
        let page_view = PageViewTrigger::new(root.context());

        page_view.activate(DispatchFields::new().parameter("isConsentUpdate", true));

        let payload = sink.last().unwrap();
        assert_eq!(
            serde_json::to_value(payload.custom_parameters).unwrap(),
            json!({ "isConsentUpdate": true })
        );
    }

    #[test]
    fn test_page_view_refires_on_visibility_regain() {
        let (root, sink) = setup();
        let page = Arc::new(ManualPageVisibility::new(true));
        let visibility: Arc<dyn PageVisibility> = page.clone();
        let page_view = PageViewTrigger::with_visibility(
            root.context(),
            &visibility,
            PageViewOptions {
                refire_on_visibility: true,
            },
        );

        page_view.activate(DispatchFields::new().component("page"));
        page.set_visible(false);
        assert_eq!(sink.len(), 1);
        page.set_visible(true);
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.last().unwrap().component.as_deref(), Some("page"));

        page_view.deactivate();
        page.set_visible(false);
        page.set_visible(true);
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn test_page_view_ignores_visibility_by_default() {
        let (root, sink) = setup();
        let page = Arc::new(ManualPageVisibility::new(true));
        let visibility: Arc<dyn PageVisibility> = page.clone();
        let page_view =
            PageViewTrigger::with_visibility(root.context(), &visibility, PageViewOptions::default());

        page_view.activate(DispatchFields::new());
        page.set_visible(false);
        page.set_visible(true);

        assert_eq!(sink.len(), 1);
        assert_eq!(page.listener_count(), 0);
        assert!(!page_view.refires_on_visibility());
        assert!(!PageViewTrigger::new(root.context()).refires_on_visibility());
    }

    #[test]
    fn test_page_view_releases_listener_on_drop() {
        let (root, _sink) = setup();
        let page = Arc::new(ManualPageVisibility::new(true));
        let visibility: Arc<dyn PageVisibility> = page.clone();
        let page_view = PageViewTrigger::with_visibility(
            root.context(),
            &visibility,
            PageViewOptions {
                refire_on_visibility: true,
            },
        );

        assert_eq!(page.listener_count(), 1);
        assert!(page_view.refires_on_visibility());
        drop(page_view);
        assert_eq!(page.listener_count(), 0);
    }
}
