// Data-layer sink - flushes every payload before pushing it downstream
//
// Tag-management data layers keep a running state that each push is merged
// into. This sink remembers what it already pushed and uses it to flush each
// new payload, so the downstream state only ever reflects the current event's
// custom parameters.
//
// Without a history limit only the parameter keys seen so far are kept; the
// payloads themselves are discarded once pushed. With a limit the last
// `history_limit` payloads are kept and flushing looks at those alone.

use crate::config::DataLayerConfig;
use crate::events::Payload;
use crate::flush::{flushed_payload, flushed_payload_with_keys, FlushedPayload};
use crate::sink::Sink;
use std::collections::{BTreeSet, VecDeque};
use std::sync::{Mutex, PoisonError};

/// Downstream push callback
pub type DataLayerPush = Box<dyn Fn(FlushedPayload) + Send + Sync>;

/// What the sink retains between pushes
#[derive(Debug)]
enum History {
    /// Union of every custom parameter key pushed so far
    Keys(BTreeSet<String>),
    /// The most recent payloads, oldest first
    Window {
        payloads: VecDeque<Payload>,
        limit: usize,
    },
}

impl History {
    fn new(limit: Option<usize>) -> Self {
        match limit {
            Some(limit) => History::Window {
                payloads: VecDeque::with_capacity(limit),
                limit,
            },
            None => History::Keys(BTreeSet::new()),
        }
    }

    fn flush(&self, payload: &Payload) -> FlushedPayload {
        match self {
            History::Keys(keys) => flushed_payload_with_keys(keys, payload),
            History::Window { payloads, .. } => flushed_payload(payloads, payload),
        }
    }

    fn record(&mut self, payload: Payload) {
        match self {
            History::Keys(keys) => {
                if let Some(params) = payload.custom_parameters {
                    keys.extend(params.into_keys());
                }
            }
            History::Window { payloads, limit } => {
                payloads.push_back(payload);
                while payloads.len() > *limit {
                    payloads.pop_front();
                }
            }
        }
    }

    fn keys(&self) -> BTreeSet<String> {
        match self {
            History::Keys(keys) => keys.clone(),
            History::Window { payloads, .. } => payloads
                .iter()
                .filter_map(|p| p.custom_parameters.as_ref())
                .flat_map(|params| params.keys().cloned())
                .collect(),
        }
    }

    fn retained_payloads(&self) -> usize {
        match self {
            History::Keys(_) => 0,
            History::Window { payloads, .. } => payloads.len(),
        }
    }

    fn clear(&mut self) {
        match self {
            History::Keys(keys) => keys.clear(),
            History::Window { payloads, .. } => payloads.clear(),
        }
    }
}

/// Sink that pushes flushed payloads into a data layer
pub struct DataLayerSink {
    push: DataLayerPush,
    history: Mutex<History>,
    flush: bool,
}

impl DataLayerSink {
    /// Flushing sink that remembers every key it has pushed
    pub fn new(push: impl Fn(FlushedPayload) + Send + Sync + 'static) -> Self {
        Self::from_config(&DataLayerConfig::default(), push)
    }

    pub fn from_config(
        config: &DataLayerConfig,
        push: impl Fn(FlushedPayload) + Send + Sync + 'static,
    ) -> Self {
        Self {
            push: Box::new(push),
            history: Mutex::new(History::new(config.history_limit)),
            flush: config.flush,
        }
    }

    /// Keys the next push will reset unless it sets them itself
    pub fn pending_keys(&self) -> BTreeSet<String> {
        self.lock().keys()
    }

    /// Payloads held for a bounded history; always 0 when unbounded
    pub fn retained_payloads(&self) -> usize {
        self.lock().retained_payloads()
    }

    /// Forget earlier pushes; the next push is not flushed against them
    pub fn clear_history(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, History> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Sink for DataLayerSink {
    fn dispatch(&self, payload: Payload) {
        let flushed = if self.flush {
            let mut history = self.lock();
            let flushed = history.flush(&payload);
            history.record(payload);
            flushed
        } else {
            FlushedPayload::from(&payload)
        };

        tracing::trace!(
            event = %flushed.event,
            parameters = flushed.custom_parameters.as_ref().map_or(0, |p| p.len()),
            "Pushing to data layer"
        );
        (self.push)(flushed);
    }
}
