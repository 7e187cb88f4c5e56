//! Element (zone) scope: extends the element path for its subtree

use super::{element_entry, ScopeContext};

/// A named element or zone
///
/// The forked context is built once, at construction, and kept for the life
/// of the node.
#[derive(Debug)]
pub struct TrackingElement {
    name: String,
    label: Option<String>,
    context: ScopeContext,
}

/// Zones and elements compose identically
pub type TrackingZone = TrackingElement;

impl TrackingElement {
    pub fn new(parent: &ScopeContext, name: impl Into<String>) -> Self {
        Self::build(parent, name.into(), None)
    }

    /// Element whose path entry is `name|label`
    pub fn with_label(
        parent: &ScopeContext,
        name: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self::build(parent, name.into(), Some(label.into()))
    }

    fn build(parent: &ScopeContext, name: String, label: Option<String>) -> Self {
        let context = parent.fork_element(element_entry(&name, label.as_deref()));
        Self {
            name,
            label,
            context,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Context exposed to the element's children
    pub fn context(&self) -> &ScopeContext {
        &self.context
    }
}
