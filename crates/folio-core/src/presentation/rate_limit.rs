use std::time::{Duration, Instant};

/// Fires once after calls stop arriving for `wait`.
///
/// Every `call` pushes the deadline back; `poll` reports the deadline
/// passing exactly once.
#[derive(Debug, Clone)]
pub struct Debouncer {
    wait: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            deadline: None,
        }
    }

    pub fn call(&mut self, now: Instant) {
        self.deadline = Some(now + self.wait);
    }

    /// True once when the quiet period has elapsed
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn pending(&self) -> bool {
        self.deadline.is_some()
    }
}

/// Lets at most one call through per `interval`.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn allow(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}
