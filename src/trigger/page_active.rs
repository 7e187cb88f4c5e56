//! Page-reactivated trigger

use super::Trigger;
use crate::events::{DispatchFields, EventKind};
use crate::scope::ScopeContext;
use crate::visibility::{PageVisibility, VisibilityWatch};
use std::sync::Arc;

/// Fires `page-reactivated` each time the page goes from hidden to visible
///
/// Never fires for the state at mount or for the page being hidden. The
/// visibility listener lives as long as this value.
#[derive(Debug)]
pub struct PageReactivatedTrigger {
    _watch: VisibilityWatch,
}

impl PageReactivatedTrigger {
    pub fn mount(context: &ScopeContext, visibility: &Arc<dyn PageVisibility>) -> Self {
        Self::mount_with(context, visibility, DispatchFields::default())
    }

    /// Mount with fields attached to every reactivation
    pub fn mount_with(
        context: &ScopeContext,
        visibility: &Arc<dyn PageVisibility>,
        fields: DispatchFields,
    ) -> Self {
        let trigger = Trigger::new(context, EventKind::PageReactivated);
        let watch = VisibilityWatch::new(visibility, move |visible| {
            if visible {
                trigger.dispatch(fields.clone());
            }
        });

        Self { _watch: watch }
    }
}
