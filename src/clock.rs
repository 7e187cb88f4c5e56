//! Timestamp sources for dispatched payloads
//!
//! The root of a scope tree owns a clock and threads it to every descendant,
//! the same way it threads the sink.

use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, OnceLock};

/// Source of millisecond timestamps
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch
    fn now_millis(&self) -> i64;
}

/// Wall-clock time, clamped so it never goes backwards
///
/// If the system clock steps back, the last handed-out value is repeated
/// until real time catches up.
#[derive(Debug, Default)]
pub struct SystemClock {
    last: AtomicI64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared instance used by scopes that have no root
    pub fn shared() -> Arc<dyn Clock> {
        static SHARED: OnceLock<Arc<SystemClock>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(SystemClock::new())).clone()
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let previous = self.last.fetch_max(now, Ordering::SeqCst);
        previous.max(now)
    }
}

/// Clock whose time only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start: i64) -> Self {
        Self {
            now: AtomicI64::new(start),
        }
    }

    pub fn set(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
