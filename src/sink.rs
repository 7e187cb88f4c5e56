//! Sinks: the external consumers of finished payloads
//!
//! Any `Fn(Payload) + Send + Sync` closure is a sink. Sinks are invoked
//! synchronously, at most once per dispatch, and must not panic.

use crate::events::Payload;
use std::sync::{Arc, Mutex, PoisonError};

/// Consumer of enriched payloads
pub trait Sink: Send + Sync {
    fn dispatch(&self, payload: Payload);
}

impl<F> Sink for F
where
    F: Fn(Payload) + Send + Sync,
{
    fn dispatch(&self, payload: Payload) {
        self(payload)
    }
}

/// Shared handle to a sink, as threaded through a scope tree
pub type SharedSink = Arc<dyn Sink>;

/// Sink that keeps every payload it receives
///
/// Cloning shares the underlying buffer, so one clone can be handed to a root
/// while another is used to inspect what arrived.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    payloads: Arc<Mutex<Vec<Payload>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of received payloads, oldest first
    pub fn payloads(&self) -> Vec<Payload> {
        self.lock().clone()
    }

    pub fn last(&self) -> Option<Payload> {
        self.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Payload>> {
        self.payloads.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Sink for MemorySink {
    fn dispatch(&self, payload: Payload) {
        self.lock().push(payload);
    }
}
