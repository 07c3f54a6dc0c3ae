//! Status led pattern.

/// Portion of every even second during which the idle led is lit.
const PULSE_WIDTH: f64 = 0.15;

/// Desired level of the status led at the given wall-clock time.
///
/// While busy, the led stays lit. While idle, it gives a short pulse at the
/// start of every even second, one blink roughly every two seconds.
#[must_use]
pub fn level(now: f64, busy: bool) -> bool {
    busy || idle_level(now)
}

#[allow(clippy::cast_possible_truncation)]
fn idle_level(now: f64) -> bool {
    let second = now.floor();
    let even = (second as i64) & 1 == 0;
    even && now - second < PULSE_WIDTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_busy_it_is_always_lit() {
        for now in [0.0, 0.5, 1.0, 1.99, 2.2, 1_700_000_001.7] {
            assert!(level(now, true));
        }
    }

    #[test]
    fn when_idle_it_pulses_at_the_start_of_even_seconds() {
        assert!(level(0.0, false));
        assert!(level(2.1, false));
        assert!(level(1_700_000_000.149, false));
        assert!(!level(2.16, false));
        assert!(!level(2.5, false));
    }

    #[test]
    fn when_idle_it_stays_dark_through_odd_seconds() {
        assert!(!level(1.0, false));
        assert!(!level(1.05, false));
        assert!(!level(3.1, false));
        assert!(!level(1_700_000_001.01, false));
    }

    #[test]
    fn when_sampled_over_time_it_is_lit_for_short_part_of_two_seconds() {
        let lit = (0..200)
            .filter(|i| level(100.005 + f64::from(*i) * 0.01, false))
            .count();
        assert_eq!(lit, 15);
    }
}
