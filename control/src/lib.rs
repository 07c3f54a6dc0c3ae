//! Decision logic of a push-button receipt printer.
//!
//! Everything here is free of I/O. The firmware samples the button and the
//! clock on every tick of its main loop and passes the readings in, this
//! crate answers what should happen:
//!
//! ```text
//!      [ Button pin ]   [ Clock ]
//!             |             |
//!             V             V
//!   +--------------- LoopState ----------------+
//!   |  Button -------------> Tap / HoldStart   |
//!   |  indicator::level ---> led on / off      |
//!   |  DailyTrigger -------> daily action      |
//!   |  IntervalTimer ------> spool drain       |
//!   +------------------------------------------+
//! ```

#![allow(clippy::module_name_repetitions)]

#[cfg(test)]
#[macro_use]
extern crate approx;

pub mod button;
pub mod daily;
pub mod indicator;
pub mod interval;
mod log;

pub use button::{Button, ButtonConfig, ButtonEvent};
pub use daily::{minute_of_day, DailyTrigger};
pub use interval::IntervalTimer;

/// Timings driving the loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub button: ButtonConfig,
    /// Minute of day after which the daily action runs.
    pub daily_threshold: u16,
    /// Seconds between spool checks.
    pub spool_interval: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            button: ButtonConfig::default(),
            daily_threshold: minute_of_day(6, 30),
            spool_interval: 5.0,
        }
    }
}

/// All the state the main loop carries from one tick to the next.
///
/// It is owned by the loop and passed by reference into each step, in
/// the order the loop calls them.
#[derive(Debug)]
pub struct LoopState {
    pub button: Button,
    pub daily: DailyTrigger,
    pub spool: IntervalTimer,
}

impl LoopState {
    /// Start with the first reading of the button and the clock.
    #[must_use]
    pub fn new(config: Config, button_down: bool, now: f64) -> Self {
        log::debug!("Initial button state: down={}", button_down);
        Self {
            button: Button::new(config.button, button_down, now),
            daily: DailyTrigger::new(config.daily_threshold),
            spool: IntervalTimer::new(config.spool_interval),
        }
    }

    pub fn sample_button(&mut self, down: bool, now: f64) -> Option<ButtonEvent> {
        self.button.update(down, now)
    }

    pub fn check_daily(&mut self, minute_of_day: u16) -> bool {
        self.daily.check(minute_of_day)
    }

    pub fn check_spool(&mut self, now: f64) -> bool {
        self.spool.poll(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_created_it_drains_spool_on_first_tick() {
        let mut state = LoopState::new(Config::default(), false, 1000.0);
        assert!(state.check_spool(1000.0));
        assert!(!state.check_spool(1004.0));
        assert!(state.check_spool(1005.5));
    }

    #[test]
    fn when_created_it_forwards_button_samples() {
        let mut state = LoopState::new(Config::default(), false, 0.0);
        assert_eq!(state.sample_button(true, 1.0), None);
        assert_eq!(state.sample_button(true, 1.1), None);
        assert_eq!(state.sample_button(false, 1.2), None);
        assert_eq!(state.sample_button(false, 1.3), Some(ButtonEvent::Tap));
    }

    #[test]
    fn when_created_with_custom_threshold_it_uses_it_for_daily_checks() {
        let config = Config {
            daily_threshold: minute_of_day(20, 0),
            ..Config::default()
        };
        let mut state = LoopState::new(config, false, 0.0);
        assert!(!state.check_daily(minute_of_day(19, 0)));
        assert!(state.check_daily(minute_of_day(20, 1)));
        assert!(!state.check_daily(minute_of_day(20, 2)));
    }
}
