//! View scope: annotates the tree's shared view slot on activation

use super::ScopeContext;

/// A named view
///
/// A view does not fork the context. Mounting it (and renaming it while
/// mounted) writes its name into the view slot inherited from the root, so
/// the most recent writer wins for every dispatch in the tree, including
/// dispatches from other branches.
///
/// Construction and activation are separate so a view can be created early
/// and mounted whenever the host gets around to it.
#[derive(Debug)]
pub struct TrackingView {
    context: ScopeContext,
    name: String,
    mounted: bool,
}

impl TrackingView {
    pub fn new(parent: &ScopeContext, name: impl Into<String>) -> Self {
        Self {
            context: parent.clone(),
            name: name.into(),
            mounted: false,
        }
    }

    /// Activate the view, writing its name into the view slot
    ///
    /// Mounting an already mounted view does nothing.
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.publish();
    }

    /// Rename the view; a mounted view writes the new name immediately
    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        if name == self.name {
            return;
        }
        self.name = name;
        if self.mounted {
            self.publish();
        }
    }

    /// Deactivate the view
    ///
    /// The slot keeps whatever was last written; a later `mount` writes again.
    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Context exposed to the view's children (the inherited one)
    pub fn context(&self) -> &ScopeContext {
        &self.context
    }

    fn publish(&self) {
        if self.context.set_view(&self.name) {
            tracing::debug!(view = %self.name, "View activated");
        } else {
            tracing::trace!(view = %self.name, "View mounted without a root, nothing to annotate");
        }
    }
}
