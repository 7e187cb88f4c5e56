//! Root scope: owns the app name, sink, clock and view slot

use super::{ScopeContext, ViewSlot};
use crate::clock::{Clock, SystemClock};
use crate::sink::{SharedSink, Sink};
use std::sync::Arc;

/// Top of a scope tree
///
/// The context is built once, so every clone handed out shares the same sink,
/// clock and view slot for the root's lifetime.
pub struct TrackingRoot {
    app: String,
    context: ScopeContext,
}

impl TrackingRoot {
    /// Root without a sink; dispatches from inside it are skipped
    pub fn new(app: impl Into<String>) -> Self {
        Self::builder(app).build()
    }

    pub fn builder(app: impl Into<String>) -> TrackingRootBuilder {
        TrackingRootBuilder {
            app: app.into(),
            sink: None,
            clock: None,
        }
    }

    pub fn app(&self) -> &str {
        &self.app
    }

    /// Context exposed to the root's children
    pub fn context(&self) -> &ScopeContext {
        &self.context
    }
}

/// Collects a root's sink and clock before its context exists
pub struct TrackingRootBuilder {
    app: String,
    sink: Option<SharedSink>,
    clock: Option<Arc<dyn Clock>>,
}

impl TrackingRootBuilder {
    /// Attach the sink every descendant dispatches to
    pub fn with_sink(self, sink: impl Sink + 'static) -> Self {
        self.with_shared_sink(Arc::new(sink))
    }

    pub fn with_shared_sink(mut self, sink: SharedSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Defaults to a fresh [`SystemClock`]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> TrackingRoot {
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock::new()) as Arc<dyn Clock>);
        tracing::debug!(app = %self.app, sink = self.sink.is_some(), "Tracking root built");

        let context = ScopeContext::root(self.app.clone(), self.sink, clock, ViewSlot::new());
        TrackingRoot {
            app: self.app,
            context,
        }
    }
}
