//! Manage button's state.

use crate::log;

/// Thresholds, in seconds, separating bounces, taps and holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonConfig {
    /// The state must stay unchanged this long to count as a press or
    /// a release.
    pub tap_time: f64,
    /// The button must stay pressed this long to count as held.
    pub hold_time: f64,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            tap_time: 0.01,
            hold_time: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    /// Button was pressed and released before it could be held.
    Tap,
    /// Button has been kept down for `hold_time`.
    HoldStart,
}

/// Use this to hold buttons state over time.
///
/// Detects debounced taps and holds. Both actions are armed once a press
/// is stable for `tap_time`, whichever threshold elapses first resolves
/// them. A fired hold disarms the tap of the same press, so releasing a
/// held button stays silent.
#[derive(Debug)]
pub struct Button {
    config: ButtonConfig,
    down: bool,
    since: f64,
    tap_armed: bool,
    hold_armed: bool,
}

impl Button {
    /// Seed the machine with the first observation of the pin.
    #[must_use]
    pub fn new(config: ButtonConfig, down: bool, now: f64) -> Self {
        Self {
            config,
            down,
            since: now,
            tap_armed: false,
            hold_armed: false,
        }
    }

    pub fn update(&mut self, down: bool, now: f64) -> Option<ButtonEvent> {
        if down != self.down {
            self.down = down;
            self.since = now;
            return None;
        }

        let elapsed = now - self.since;
        if elapsed >= self.config.hold_time {
            if self.hold_armed {
                self.disarm();
                log::debug!("Button held for {}s", elapsed);
                return Some(ButtonEvent::HoldStart);
            }
        } else if elapsed >= self.config.tap_time {
            if !down && self.tap_armed {
                self.disarm();
                log::debug!("Button tapped");
                return Some(ButtonEvent::Tap);
            } else if down {
                self.tap_armed = true;
                self.hold_armed = true;
            }
        }

        None
    }

    #[must_use]
    pub fn is_down(&self) -> bool {
        self.down
    }

    fn disarm(&mut self) {
        self.tap_armed = false;
        self.hold_armed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    const TAP: f64 = 0.01;
    const HOLD: f64 = 2.0;

    fn released_button() -> Button {
        Button::new(ButtonConfig::default(), false, 0.0)
    }

    fn feed(button: &mut Button, samples: &[(bool, f64)]) -> Vec<ButtonEvent> {
        samples
            .iter()
            .filter_map(|(down, now)| button.update(*down, *now))
            .collect()
    }

    #[test]
    fn when_pressed_and_released_after_debounce_it_taps_once_on_release() {
        let mut button = released_button();
        assert_eq!(button.update(true, 1.0), None);
        assert_eq!(button.update(true, 1.02), None);
        assert_eq!(button.update(false, 1.2), None);
        assert_eq!(button.update(false, 1.205), None);
        assert_eq!(button.update(false, 1.22), Some(ButtonEvent::Tap));
        assert_eq!(button.update(false, 1.3), None);
        assert_eq!(button.update(false, 9.0), None);
    }

    #[test]
    fn when_press_never_settles_it_is_not_armed() {
        let mut button = released_button();
        button.update(true, 1.0);
        button.update(true, 1.005);
        button.update(false, 1.008);
        button.update(false, 1.1);
        assert!(!button.tap_armed);
        assert!(!button.hold_armed);
    }

    #[test]
    fn when_stable_press_is_seen_it_arms_tap_and_hold() {
        let mut button = released_button();
        button.update(true, 1.0);
        button.update(true, 1.0 + 2.0 * TAP);
        assert!(button.tap_armed);
        assert!(button.hold_armed);
    }

    #[test]
    fn when_held_for_hold_time_it_fires_hold_once() {
        let mut button = released_button();
        button.update(true, 1.0);
        button.update(true, 1.5);
        let mut holds = 0;
        let mut now = 1.5;
        while now < 10.0 {
            if button.update(true, now) == Some(ButtonEvent::HoldStart) {
                holds += 1;
            }
            now += 0.001;
        }
        assert_eq!(holds, 1);
    }

    #[test]
    fn when_released_after_hold_it_does_not_tap() {
        let mut button = released_button();
        let events = feed(
            &mut button,
            &[
                (true, 1.0),
                (true, 1.1),
                (true, 1.0 + HOLD),
                (false, 3.5),
                (false, 3.6),
                (false, 6.0),
            ],
        );
        assert_eq!(events, vec![ButtonEvent::HoldStart]);
    }

    #[test]
    fn when_press_jumps_straight_past_hold_time_it_is_never_armed() {
        let mut button = released_button();
        let events = feed(&mut button, &[(true, 1.0), (true, 5.0), (false, 5.1), (false, 5.2)]);
        assert!(events.is_empty());
    }

    #[test]
    fn when_started_pressed_it_still_needs_stable_press_to_arm() {
        let mut button = Button::new(ButtonConfig::default(), true, 0.0);
        assert!(button.is_down());
        assert_eq!(button.update(true, 0.005), None);
        assert_eq!(button.update(false, 0.006), None);
        assert_eq!(button.update(false, 0.1), None);
    }

    #[test]
    fn when_tapped_twice_it_taps_twice() {
        let mut button = released_button();
        let events = feed(
            &mut button,
            &[
                (true, 1.0),
                (true, 1.05),
                (false, 1.1),
                (false, 1.15),
                (true, 2.0),
                (true, 2.05),
                (false, 2.1),
                (false, 2.15),
            ],
        );
        assert_eq!(events, vec![ButtonEvent::Tap, ButtonEvent::Tap]);
    }

    #[test]
    fn when_configured_with_custom_thresholds_it_honors_them() {
        let config = ButtonConfig {
            tap_time: 0.1,
            hold_time: 0.5,
        };
        let mut button = Button::new(config, false, 0.0);
        let events = feed(&mut button, &[(true, 1.0), (true, 1.05), (false, 1.2), (false, 1.25)]);
        assert!(events.is_empty());
        let events = feed(&mut button, &[(true, 2.0), (true, 2.1), (true, 2.5)]);
        assert_eq!(events, vec![ButtonEvent::HoldStart]);
    }

    proptest! {
        #[test]
        fn when_every_sample_flips_within_debounce_it_emits_nothing(
            gaps in prop::collection::vec(0.0f64..TAP * 0.99, 1..200)
        ) {
            let mut button = released_button();
            let mut now = 1.0;
            let mut down = false;
            for gap in gaps {
                now += gap;
                down = !down;
                prop_assert_eq!(button.update(down, now), None);
            }
        }

        #[test]
        fn when_held_continuously_it_emits_exactly_one_hold(
            ticks in prop::collection::vec(0.0001f64..0.3, 20..400)
        ) {
            let mut button = released_button();
            button.update(true, 1.0);
            let mut now = 1.05;
            let mut events: Vec<ButtonEvent> = button.update(true, now).into_iter().collect();
            for tick in ticks {
                now += tick;
                events.extend(button.update(true, now));
            }
            now += HOLD;
            events.extend(button.update(true, now));
            events.extend(button.update(false, now + 0.1));
            events.extend(button.update(false, now + 0.2));
            let holds = events.iter().filter(|e| **e == ButtonEvent::HoldStart).count();
            prop_assert_eq!(holds, 1);
            prop_assert!(!events.contains(&ButtonEvent::Tap));
        }

        #[test]
        fn when_press_is_shorter_than_hold_it_taps_exactly_once(
            press in TAP * 2.0..HOLD * 0.9,
            release in TAP * 2.0..1.0f64,
        ) {
            let mut button = released_button();
            let events = feed(
                &mut button,
                &[
                    (true, 1.0),
                    (true, 1.0 + press),
                    (false, 1.0 + press),
                    (false, 1.0 + press + release),
                    (false, 1.0 + press + release + 0.5),
                ],
            );
            prop_assert_eq!(events, vec![ButtonEvent::Tap]);
        }
    }
}
