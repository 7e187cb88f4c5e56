//! Logging processor
//!
//! Side-effect processor that traces every payload passing through a
//! pipeline, with its full scope path.

use super::{PayloadProcessor, ProcessResult};
use crate::events::Payload;

/// Processor that logs payloads at trace level
pub struct LoggingProcessor;

impl LoggingProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl PayloadProcessor for LoggingProcessor {
    fn name(&self) -> &'static str {
        "logging"
    }

    fn process(&self, payload: &Payload) -> ProcessResult {
        tracing::trace!(
            processor = self.name(),
            event = %payload.event,
            app = ?payload.app,
            view = ?payload.view,
            element_path = %payload.element_tree.join(" > "),
            component = ?payload.component,
            label = ?payload.label,
            parameters = payload.custom_parameters.as_ref().map_or(0, |p| p.len()),
            timestamp = payload.timestamp,
            "Pipeline payload"
        );

        // Pass through unchanged
        ProcessResult::Continue
    }
}

impl Default for LoggingProcessor {
    fn default() -> Self {
        Self::new()
    }
}
