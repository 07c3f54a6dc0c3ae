//! Once-a-day trigger.

use crate::log;

/// Minutes since local midnight.
#[must_use]
pub fn minute_of_day(hour: u32, minute: u32) -> u16 {
    u16::try_from(hour * 60 + minute).unwrap_or(u16::MAX)
}

/// Fires once per calendar day, when the local time passes the threshold.
///
/// The trigger is rearmed whenever the time is at or before the threshold,
/// which happens after midnight. When started after the threshold, it fires
/// on the very first check.
#[derive(Debug)]
pub struct DailyTrigger {
    threshold: u16,
    fired_today: bool,
}

impl DailyTrigger {
    #[must_use]
    pub fn new(threshold: u16) -> Self {
        Self {
            threshold,
            fired_today: false,
        }
    }

    pub fn check(&mut self, minute_of_day: u16) -> bool {
        if minute_of_day > self.threshold {
            if !self.fired_today {
                self.fired_today = true;
                log::info!("Daily trigger crossed at minute {}", minute_of_day);
                return true;
            }
        } else {
            self.fired_today = false;
        }
        false
    }

    #[must_use]
    pub fn fired_today(&self) -> bool {
        self.fired_today
    }
}

impl Default for DailyTrigger {
    fn default() -> Self {
        Self::new(minute_of_day(6, 30))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_converts_time_of_day_to_minutes() {
        assert_eq!(minute_of_day(0, 0), 0);
        assert_eq!(minute_of_day(6, 30), 390);
        assert_eq!(minute_of_day(23, 59), 1439);
    }

    #[test]
    fn when_threshold_is_crossed_it_fires_once_per_day() {
        let mut trigger = DailyTrigger::new(390);
        let fired: Vec<bool> = [389, 391, 392, 10, 391]
            .into_iter()
            .map(|minute| trigger.check(minute))
            .collect();
        assert_eq!(fired, vec![false, true, false, false, true]);
    }

    #[test]
    fn when_exactly_at_threshold_it_does_not_fire() {
        let mut trigger = DailyTrigger::new(390);
        assert!(!trigger.check(390));
        assert!(!trigger.fired_today());
        assert!(trigger.check(391));
    }

    #[test]
    fn when_started_past_threshold_it_fires_on_first_check() {
        let mut trigger = DailyTrigger::default();
        assert!(trigger.check(minute_of_day(14, 0)));
        assert!(trigger.fired_today());
        assert!(!trigger.check(minute_of_day(14, 1)));
    }

    #[test]
    fn when_checked_through_the_whole_day_it_fires_once() {
        let mut trigger = DailyTrigger::default();
        let fires = (0..1440)
            .chain(0..1440)
            .filter(|minute| trigger.check(*minute))
            .count();
        assert_eq!(fires, 2);
    }
}
