//! Time source for listing timestamps and generated ids

use std::cell::Cell;

use chrono::Utc;

/// Source of epoch-millisecond timestamps
pub trait Clock {
    fn now_millis(&self) -> i64;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Deterministic clock that advances by a fixed step on every reading
#[derive(Debug)]
pub struct SteppingClock {
    next: Cell<i64>,
    step: i64,
}

impl SteppingClock {
    pub fn new(start: i64, step: i64) -> Self {
        Self {
            next: Cell::new(start),
            step,
        }
    }
}

impl Clock for SteppingClock {
    fn now_millis(&self) -> i64 {
        let now = self.next.get();
        self.next.set(now + self.step);
        now
    }
}
