//! Payload processing pipeline in front of a sink
//!
//! A [`SinkPipeline`] is itself a sink: each payload runs through the
//! registered processors before reaching the terminal sink. Processors can
//! transform, filter, or react to payloads without the triggers knowing.
//!
//! # Architecture
//!
//! ```text
//! Trigger → SinkPipeline → [Processor₁, Processor₂, ...] → terminal Sink
//! ```
//!
//! # Processor Types
//!
//! - **Filter**: Drop payloads (return `ProcessResult::Drop`)
//! - **Transform**: Modify payloads (return `ProcessResult::Transform(modified)`)
//! - **Side-effect**: React without modification (return `ProcessResult::Continue`)

use crate::events::Payload;
use crate::sink::{SharedSink, Sink};
use std::borrow::Cow;
use std::sync::Arc;

pub mod logging;

pub use logging::LoggingProcessor;

/// Result of processing a payload
#[derive(Debug)]
pub enum ProcessResult {
    /// Payload continues unchanged (side-effect only processor)
    Continue,
    /// Payload was transformed - use this new version (boxed to reduce enum size)
    Transform(Box<Payload>),
    /// Payload should be dropped (filtered out)
    Drop,
    /// Processor encountered an error (payload continues, error logged)
    Error(anyhow::Error),
}

/// Trait for payload processors
///
/// Processors are called in registration order and receive a reference to
/// the payload; only processors that transform it should clone.
///
/// `process` is synchronous and runs inside the dispatch call, so it must
/// not block.
pub trait PayloadProcessor: Send + Sync {
    /// Human-readable name for logging and debugging
    fn name(&self) -> &'static str;

    /// Process a payload, returning the result
    fn process(&self, payload: &Payload) -> ProcessResult;
}

/// Pipeline that runs payloads through processors, then into a sink
pub struct SinkPipeline {
    processors: Vec<Arc<dyn PayloadProcessor>>,
    sink: SharedSink,
}

impl SinkPipeline {
    /// Create an empty pipeline (passthrough to `sink`)
    pub fn new(sink: impl Sink + 'static) -> Self {
        Self {
            processors: Vec::new(),
            sink: Arc::new(sink),
        }
    }

    /// Register a processor
    ///
    /// Processors are called in registration order.
    pub fn register(&mut self, processor: impl PayloadProcessor + 'static) {
        self.processors.push(Arc::new(processor));
    }

    /// Builder form of [`SinkPipeline::register`]
    pub fn with(mut self, processor: impl PayloadProcessor + 'static) -> Self {
        self.register(processor);
        self
    }

    /// Run a payload through all registered processors
    ///
    /// Returns `Some(Cow::Borrowed(payload))` if no transformation occurred,
    /// `Some(Cow::Owned(payload))` if any processor transformed the payload,
    /// `None` if any processor filtered it out.
    pub fn process<'a>(&self, payload: &'a Payload) -> Option<Cow<'a, Payload>> {
        let mut current: Cow<'a, Payload> = Cow::Borrowed(payload);

        for processor in &self.processors {
            match processor.process(current.as_ref()) {
                ProcessResult::Continue => {}
                ProcessResult::Transform(new_payload) => {
                    current = Cow::Owned(*new_payload);
                }
                ProcessResult::Drop => {
                    tracing::trace!("Payload dropped by processor '{}'", processor.name());
                    return None;
                }
                ProcessResult::Error(error) => {
                    tracing::warn!("Processor '{}' error: {}", processor.name(), error);
                }
            }
        }
        Some(current)
    }

    /// Check if pipeline has any processors
    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Get names of registered processors (for logging/debug)
    pub fn processor_names(&self) -> Vec<&'static str> {
        self.processors.iter().map(|p| p.name()).collect()
    }
}

impl Sink for SinkPipeline {
    fn dispatch(&self, payload: Payload) {
        let transformed = match self.process(&payload) {
            None => return,
            Some(Cow::Owned(transformed)) => Some(transformed),
            Some(Cow::Borrowed(_)) => None,
        };
        self.sink.dispatch(transformed.unwrap_or(payload));
    }
}
