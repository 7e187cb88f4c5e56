//! Scope composition: the context every trigger is enriched from
//!
//! Scopes nest explicitly. Each node receives its parent's [`ScopeContext`]
//! and exposes a context to its children:
//!
//! ```text
//! TrackingRoot("shop")            app = "shop", sink, clock, view slot
//!   └─ TrackingView("checkout")   writes "checkout" into the shared view slot
//!        ├─ TrackingElement("A")  element_tree = ["A"]
//!        │    └─ Element("B")     element_tree = ["A", "B"]
//!        └─ TrackingElement("C")  element_tree = ["C"]
//! ```
//!
//! Two kinds of state flow down the tree:
//! - **Forked**: `element_tree` is copied and extended by every element, so
//!   sibling branches never see each other's entries.
//! - **Shared**: the view slot, sink and clock are the root's own instances,
//!   handed unchanged to every descendant. The view slot is a single
//!   last-write-wins cell, not a stack.

use crate::clock::{Clock, SystemClock};
use crate::sink::SharedSink;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

mod element;
mod root;
mod view;


pub use element::{TrackingElement, TrackingZone};
pub use root::{TrackingRoot, TrackingRootBuilder};
pub use view::TrackingView;

// ─────────────────────────────────────────────────────────────────────────────
// View Slot
// ─────────────────────────────────────────────────────────────────────────────

/// The single, always-current view name of a scope tree
///
/// Every clone refers to the same cell.
#[derive(Debug, Clone, Default)]
pub struct ViewSlot(Arc<RwLock<Option<String>>>);

impl ViewSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<String> {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn set(&self, name: impl Into<String>) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = Some(name.into());
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scope Context
// ─────────────────────────────────────────────────────────────────────────────

struct ScopeInner {
    app: Option<String>,
    /// `None` when there is no root to write to
    view: Option<ViewSlot>,
    element_tree: Vec<String>,
    sink: Option<SharedSink>,
    clock: Arc<dyn Clock>,
}

/// Context in scope at one depth of the tree
///
/// Cloning is a refcount bump; clones compare equal under [`ScopeContext::ptr_eq`].
#[derive(Clone)]
pub struct ScopeContext {
    inner: Arc<ScopeInner>,
}

impl ScopeContext {
    pub(crate) fn root(
        app: String,
        sink: Option<SharedSink>,
        clock: Arc<dyn Clock>,
        view: ViewSlot,
    ) -> Self {
        Self {
            inner: Arc::new(ScopeInner {
                app: Some(app),
                view: Some(view),
                element_tree: Vec::new(),
                sink,
                clock,
            }),
        }
    }

    /// Context seen by a trigger with no root above it
    ///
    /// No app, no view, no sink: dispatches from here build a payload and
    /// drop it.
    pub fn detached() -> Self {
        Self {
            inner: Arc::new(ScopeInner {
                app: None,
                view: None,
                element_tree: Vec::new(),
                sink: None,
                clock: SystemClock::shared(),
            }),
        }
    }

    /// New context one element deeper, sharing everything except the path
    pub(crate) fn fork_element(&self, entry: String) -> Self {
        let mut element_tree = Vec::with_capacity(self.inner.element_tree.len() + 1);
        element_tree.extend_from_slice(&self.inner.element_tree);
        element_tree.push(entry);

        Self {
            inner: Arc::new(ScopeInner {
                app: self.inner.app.clone(),
                view: self.inner.view.clone(),
                element_tree,
                sink: self.inner.sink.clone(),
                clock: self.inner.clock.clone(),
            }),
        }
    }

    pub fn app(&self) -> Option<&str> {
        self.inner.app.as_deref()
    }

    /// Current value of the shared view slot
    pub fn view(&self) -> Option<String> {
        self.inner.view.as_ref().and_then(ViewSlot::get)
    }

    /// Write the shared view slot
    ///
    /// Returns `false` when there is no root to write to.
    pub fn set_view(&self, name: &str) -> bool {
        match &self.inner.view {
            Some(slot) => {
                slot.set(name);
                true
            }
            None => false,
        }
    }

    pub fn element_tree(&self) -> &[String] {
        &self.inner.element_tree
    }

    pub fn sink(&self) -> Option<&SharedSink> {
        self.inner.sink.as_ref()
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.inner.clock
    }

    /// Whether both handles refer to the same context instance
    pub fn ptr_eq(&self, other: &ScopeContext) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for ScopeContext {
    fn default() -> Self {
        Self::detached()
    }
}

impl fmt::Debug for ScopeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeContext")
            .field("app", &self.inner.app)
            .field("view", &self.view())
            .field("element_tree", &self.inner.element_tree)
            .field("has_sink", &self.inner.sink.is_some())
            .finish()
    }
}

/// Element tree entry for a name and optional label: `name` or `name|label`
pub fn element_entry(name: &str, label: Option<&str>) -> String {
    match label {
        Some(label) => format!("{}|{}", name, label),
        None => name.to_string(),
    }
}
