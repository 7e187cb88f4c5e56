//! Dispatch triggers: turn a UI event into an enriched payload
//!
//! A [`Trigger`] is bound to one event kind and one scope context. Every call
//! reads the context *at call time* (the view slot in particular may have
//! changed since the trigger was built), stamps the payload with the root's
//! clock, and hands it to the root's sink.
//!
//! Dispatch never fails. A missing root yields a payload with no app, no view
//! and an empty element tree; a missing sink turns the call into a no-op.
//!
//! # Specializations
//!
//! - [`click_trigger`], [`submit_trigger`], [`section_expanded_trigger`]:
//!   plain triggers for one kind
//! - [`PageViewTrigger`]: fires once per activation, optionally again when
//!   the page becomes visible
//! - [`PageReactivatedTrigger`]: fires on every hidden → visible transition
//! - [`ViewTrigger`]: fires when an observed element becomes fully visible

use crate::events::{DispatchFields, EventKind, Payload};
use crate::scope::ScopeContext;

mod page_active;
mod page_view;
mod view;

pub use page_active::PageReactivatedTrigger;
pub use page_view::{PageViewOptions, PageViewTrigger};
pub use view::ViewTrigger;

/// Callable bound to an event kind and a scope
#[derive(Debug, Clone)]
pub struct Trigger {
    context: ScopeContext,
    kind: EventKind,
}

impl Trigger {
    pub fn new(context: &ScopeContext, kind: EventKind) -> Self {
        Self {
            context: context.clone(),
            kind,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn context(&self) -> &ScopeContext {
        &self.context
    }

    /// Build the payload this trigger would dispatch right now
    pub fn payload(&self, fields: DispatchFields) -> Payload {
        let DispatchFields {
            component,
            label,
            custom_parameters,
        } = fields;

        Payload {
            app: self.context.app().map(str::to_owned),
            view: self.context.view(),
            element_tree: self.context.element_tree().to_vec(),
            event: self.kind,
            component,
            label,
            timestamp: self.context.clock().now_millis(),
            custom_parameters,
        }
    }

    /// Build a payload and hand it to the root's sink
    pub fn dispatch(&self, fields: DispatchFields) {
        let Some(sink) = self.context.sink() else {
            tracing::trace!(event = %self.kind, "No sink configured, dispatch skipped");
            return;
        };

        let payload = self.payload(fields);
        tracing::debug!(
            event = %payload.event,
            app = ?payload.app,
            view = ?payload.view,
            element_tree = ?payload.element_tree,
            component = ?payload.component,
            "Dispatching event"
        );
        sink.dispatch(payload);
    }

    /// Dispatch with no caller fields
    pub fn fire(&self) {
        self.dispatch(DispatchFields::default());
    }
}

/// Trigger for an arbitrary event kind, for building new specializations
pub fn base_trigger(context: &ScopeContext, kind: EventKind) -> Trigger {
    Trigger::new(context, kind)
}

pub fn click_trigger(context: &ScopeContext) -> Trigger {
    Trigger::new(context, EventKind::Click)
}

pub fn submit_trigger(context: &ScopeContext) -> Trigger {
    Trigger::new(context, EventKind::Submit)
}

pub fn section_expanded_trigger(context: &ScopeContext) -> Trigger {
    Trigger::new(context, EventKind::SectionExpanded)
}
