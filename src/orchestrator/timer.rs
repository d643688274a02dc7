use std::time::{Duration, Instant};

/// Repeating detection timer. The host polls it with the current instant;
/// it fires at most once per interval while running.
#[derive(Debug, Clone)]
pub struct DetectionTimer {
    interval: Duration,
    running: bool,
    last_fire: Option<Instant>,
}

impl DetectionTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            running: false,
            last_fire: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start (or resume); the next poll fires immediately.
    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            self.last_fire = None;
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// True (and re-armed) when a tick is due at `now`.
    pub fn fire(&mut self, now: Instant) -> bool {
        if !self.running {
            return false;
        }
        let due = match self.last_fire {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        };
        if due {
            self.last_fire = Some(now);
        }
        due
    }
}
