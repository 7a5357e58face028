use chrono::{Duration, NaiveDate};

use crate::models::HijriDate;

/// Hijri year of the anchor: 1 Muharram 1444 fell on 30 July 2022.
pub const ANCHOR_YEAR: u32 = 1444;

/// Mean synodic month. Twelve of them give the 354.367-day mean Hijri year.
const MEAN_MONTH_DAYS: f64 = 29.530589;

fn anchor_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 7, 30).unwrap_or(NaiveDate::MIN)
}

/// Best-effort Hijri date for `date`, used when the remote source is down.
///
/// Counts mean-length months from a fixed anchor, so it drifts a day or so
/// from the sighted calendar. Good for keeping the board filled, never for
/// deciding when Ramadan starts. Dates before the anchor saturate to it.
pub fn approximate_hijri(date: NaiveDate) -> HijriDate {
    let offset = (date - anchor_date()).num_days().max(0);
    let months = (offset as f64 / MEAN_MONTH_DAYS).floor() as i64;
    let into_month = offset as f64 - months as f64 * MEAN_MONTH_DAYS;

    HijriDate {
        day: (into_month.floor() as u32 + 1).min(30),
        month: (months % 12) as u32 + 1,
        year: ANCHOR_YEAR + (months / 12) as u32,
        gregorian: date,
        is_approximate: true,
    }
}

/// Same as [`approximate_hijri`], shifted by `offset_days` for local moon
/// sighting (e.g. -1 where the month starts a day after Saudi Arabia).
pub fn approximate_hijri_with_offset(date: NaiveDate, offset_days: i32) -> HijriDate {
    let shifted = date + Duration::days(offset_days as i64);
    HijriDate {
        gregorian: date,
        ..approximate_hijri(shifted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::hijri::HIJRI_MONTH_NAMES;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn anchor_maps_to_first_muharram() {
        let h = approximate_hijri(d(2022, 7, 30));
        assert_eq!((h.day, h.month, h.year), (1, 1, 1444));
        assert!(h.is_approximate);
    }

    #[test]
    fn month_name_and_year_always_valid() {
        let mut date = d(1990, 1, 1);
        while date < d(2060, 1, 1) {
            let h = approximate_hijri(date);
            assert!(HIJRI_MONTH_NAMES.contains(&h.month_name()));
            assert!(h.year >= ANCHOR_YEAR);
            assert!((1..=30).contains(&h.day));
            date += Duration::days(13);
        }
    }

    #[test]
    fn monotonic_in_the_input_date() {
        let mut date = d(2022, 1, 1);
        let mut prev = approximate_hijri(date);
        for _ in 0..4000 {
            date += Duration::days(1);
            let next = approximate_hijri(date);
            assert!(
                (next.year, next.month, next.day) >= (prev.year, prev.month, prev.day),
                "{:?} went backwards from {:?}",
                next,
                prev
            );
            prev = next;
        }
    }

    #[test]
    fn month_wraps_into_next_year() {
        // 354 days after the anchor is still 1444; the mean year is 354.37 days.
        let late = approximate_hijri(d(2022, 7, 30) + Duration::days(350));
        assert_eq!((late.month, late.year), (12, 1444));
        let next = approximate_hijri(d(2022, 7, 30) + Duration::days(356));
        assert_eq!((next.month, next.year), (1, 1445));
    }

    #[test]
    fn stays_within_a_month_of_umm_al_qura() {
        let mut date = d(2023, 1, 1);
        while date < d(2031, 1, 1) {
            let approx = approximate_hijri(date);
            let reference = hijri_date::HijriDate::from_gr(
                chrono::Datelike::year(&date) as usize,
                chrono::Datelike::month(&date) as usize,
                chrono::Datelike::day(&date) as usize,
            )
            .unwrap();
            let approx_idx = approx.year as i64 * 12 + approx.month as i64;
            let ref_idx = reference.year() as i64 * 12 + reference.month() as i64;
            assert!((approx_idx - ref_idx).abs() <= 1, "{} drifted: {:?}", date, approx);
            date += Duration::days(7);
        }
    }

    #[test]
    fn offset_shifts_the_day_but_keeps_gregorian() {
        let date = d(2025, 3, 10);
        let base = approximate_hijri(date);
        let behind = approximate_hijri_with_offset(date, -1);
        assert_eq!(behind.gregorian, date);
        assert_ne!((base.day, base.month), (behind.day, behind.month));
    }
}
