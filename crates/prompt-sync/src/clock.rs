//! Time source for version stamps and temporary ids.

use std::cell::Cell;

pub trait Clock {
    /// Epoch milliseconds
    fn now_millis(&self) -> i64;
}

/// Wall clock (`Date.now()` under wasm)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Hand-driven clock; every reading advances it by `step`
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<i64>,
    step: i64,
}

impl ManualClock {
    pub fn new(start: i64, step: i64) -> Self {
        Self { now: Cell::new(start), step }
    }

    pub fn set(&self, now: i64) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        let now = self.now.get();
        self.now.set(now + self.step);
        now
    }
}
