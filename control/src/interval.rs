//! Recurring timer polled by the main loop.

/// Fires whenever the current time passes the deadline.
///
/// The next deadline is counted from the moment of firing, so a late poll
/// pushes the whole schedule back rather than firing repeatedly to catch up.
/// The timer starts expired, the first poll always fires.
#[derive(Debug)]
pub struct IntervalTimer {
    next_deadline: f64,
    interval: f64,
}

impl IntervalTimer {
    #[must_use]
    pub fn new(interval: f64) -> Self {
        Self::starting_at(0.0, interval)
    }

    #[must_use]
    pub fn starting_at(next_deadline: f64, interval: f64) -> Self {
        Self {
            next_deadline,
            interval,
        }
    }

    pub fn poll(&mut self, now: f64) -> bool {
        if now > self.next_deadline {
            self.next_deadline = now + self.interval;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn next_deadline(&self) -> f64 {
        self.next_deadline
    }
}
