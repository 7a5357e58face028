use chrono::{Duration, NaiveDateTime, NaiveTime};

use crate::utils::format::format_duration_secs;

/// What the Iftar display shows on a given tick. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    Remaining {
        hours: i64,
        minutes: i64,
        seconds: i64,
    },
    IftarTime,
}

impl CountdownState {
    pub fn total_secs(&self) -> i64 {
        match self {
            CountdownState::Remaining {
                hours,
                minutes,
                seconds,
            } => hours * 3600 + minutes * 60 + seconds,
            CountdownState::IftarTime => 0,
        }
    }

    pub fn label(&self, with_seconds: bool) -> String {
        match self {
            CountdownState::IftarTime => "Time for Iftar".to_string(),
            remaining => format_duration_secs(remaining.total_secs(), with_seconds),
        }
    }

    /// "HH:MM:SS" or "HH:MM" for the big display.
    pub fn clock(&self, with_seconds: bool) -> String {
        match self {
            CountdownState::IftarTime => "IFTAR".to_string(),
            CountdownState::Remaining {
                hours,
                minutes,
                seconds,
            } if with_seconds => format!("{:02}:{:02}:{:02}", hours, minutes, seconds),
            CountdownState::Remaining { hours, minutes, .. } => {
                format!("{:02}:{:02}", hours, minutes)
            }
        }
    }
}

/// Time left until the next Maghrib at `now`.
///
/// A Maghrib already past today counts toward tomorrow's. Within `hold` after
/// Maghrib (and at the exact instant) the state is `IftarTime`.
pub fn countdown_at(now: NaiveDateTime, maghrib: NaiveTime, hold: Duration) -> CountdownState {
    let mut target = now.date().and_time(maghrib);
    let raw = target - now;
    if raw < Duration::zero() {
        if -raw < hold {
            return CountdownState::IftarTime;
        }
        target += Duration::days(1);
    }

    let secs = (target - now).num_seconds();
    if secs <= 0 {
        return CountdownState::IftarTime;
    }
    CountdownState::Remaining {
        hours: secs / 3600,
        minutes: (secs % 3600) / 60,
        seconds: secs % 60,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::format::parse_clock;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn counts_down_to_maghrib_later_today() {
        let state = countdown_at(at(14, 30, 15), t(18, 5), Duration::zero());
        assert_eq!(
            state,
            CountdownState::Remaining {
                hours: 3,
                minutes: 34,
                seconds: 45
            }
        );
        assert_eq!(state.clock(true), "03:34:45");
        assert_eq!(state.label(false), "3h 34m");
    }

    #[test]
    fn past_maghrib_rolls_to_tomorrow_once() {
        let state = countdown_at(at(18, 6, 0), t(18, 5), Duration::zero());
        assert_eq!(state.total_secs(), 24 * 3600 - 60);
    }

    #[test]
    fn never_negative_for_any_clock_reading() {
        for maghrib in ["17:00", "18:05", "19:59", "00:00", "23:59"] {
            let maghrib = parse_clock(maghrib).unwrap();
            for minute_of_day in (0..24 * 60).step_by(7) {
                let now = at(minute_of_day / 60, minute_of_day % 60, 30);
                let state = countdown_at(now, maghrib, Duration::zero());
                let secs = state.total_secs();
                assert!(secs >= 0);
                assert!(secs <= 24 * 3600, "rolled more than once: {}", secs);
            }
        }
    }

    #[test]
    fn exact_instant_is_iftar_time() {
        let state = countdown_at(at(18, 5, 0), t(18, 5), Duration::zero());
        assert_eq!(state, CountdownState::IftarTime);
        assert_eq!(state.label(true), "Time for Iftar");
    }

    #[test]
    fn hold_keeps_iftar_state_after_maghrib() {
        let hold = Duration::minutes(10);
        assert_eq!(
            countdown_at(at(18, 9, 59), t(18, 5), hold),
            CountdownState::IftarTime
        );
        assert!(countdown_at(at(18, 15, 0), t(18, 5), hold).total_secs() > 23 * 3600);
    }

    #[test]
    fn twelve_hour_input_normalizes() {
        let a = countdown_at(at(12, 0, 0), parse_clock("6:05 PM").unwrap(), Duration::zero());
        let b = countdown_at(at(12, 0, 0), parse_clock("18:05").unwrap(), Duration::zero());
        assert_eq!(a, b);
    }
}
