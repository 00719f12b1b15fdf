//! Periodic timers driven by frame time
//!
//! The host never schedules callbacks. It reports elapsed milliseconds once
//! per frame and each timer says how many of its periods completed.

/// A repeating timer with a fixed period
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    period_ms: f32,
    elapsed_ms: f32,
}

impl Interval {
    pub fn new(period_ms: f32) -> Self {
        Self {
            period_ms,
            elapsed_ms: 0.0,
        }
    }

    /// Add elapsed time; returns how many periods fired
    pub fn advance(&mut self, dt_ms: f32) -> u32 {
        if self.period_ms <= 0.0 || dt_ms <= 0.0 {
            return 0;
        }
        self.elapsed_ms += dt_ms;
        let mut fired = 0;
        while self.elapsed_ms >= self.period_ms {
            self.elapsed_ms -= self.period_ms;
            fired += 1;
        }
        fired
    }

    /// Drop partial progress
    pub fn reset(&mut self) {
        self.elapsed_ms = 0.0;
    }

    pub fn period_ms(&self) -> f32 {
        self.period_ms
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed_ms
    }
}
