use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{Local, NaiveDateTime, Timelike};
use slip_control::minute_of_day;

/// Source of time for the main loop.
pub trait Clock {
    /// Wall-clock seconds since the Unix epoch.
    fn now(&self) -> f64;

    /// Local date and time.
    fn local(&self) -> NaiveDateTime;

    fn minute_of_day(&self) -> u16 {
        let local = self.local();
        minute_of_day(local.hour(), local.minute())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0.0, |since_epoch| since_epoch.as_secs_f64())
    }

    fn local(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
