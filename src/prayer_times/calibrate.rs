use anyhow::{anyhow, Result};
use chrono::{Datelike, Duration, FixedOffset, NaiveDate, NaiveTime};
use log::warn;
use salah::prelude::*;
use std::panic::{self, AssertUnwindSafe};

use crate::config::settings::LocationConfig;
use crate::prayer_times::SeasonalRow;

/// Computes seasonal fallback rows astronomically, fully offline.
pub struct Calibrator {
    pub lat: f64,
    pub lng: f64,
    method_id: u8,
    school: u8,
    offset: FixedOffset,
}

impl Calibrator {
    pub fn new(location: &LocationConfig) -> Result<Self> {
        let offset = FixedOffset::east_opt(location.timezone_offset * 60)
            .ok_or_else(|| anyhow!("Invalid timezone offset: {}", location.timezone_offset))?;
        // Validate method + school early
        method_for_id(location.method)?;
        madhab_for_school(location.school)?;
        Ok(Self {
            lat: location.latitude,
            lng: location.longitude,
            method_id: location.method,
            school: location.school,
            offset,
        })
    }

    pub fn row_for(&self, date: NaiveDate) -> Result<SeasonalRow> {
        let coords = Coordinates::new(self.lat, self.lng);
        let method = method_for_id(self.method_id)?;
        let madhab = madhab_for_school(self.school)?;
        let params = Configuration::with(method, madhab);

        // salah panics on a few dates instead of returning an error.
        let times = panic::catch_unwind(AssertUnwindSafe(|| {
            PrayerSchedule::new()
                .on(date)
                .for_location(coords)
                .with_configuration(params)
                .calculate()
        }))
        .map_err(|_| anyhow!("Prayer calculation aborted for {}", date))?
        .map_err(|e| anyhow!("Prayer calculation failed for {}: {}", date, e))?;

        let to_local = |utc: chrono::DateTime<chrono::Utc>| -> NaiveTime {
            utc.with_timezone(&self.offset).time()
        };

        Ok(SeasonalRow {
            month: date.month(),
            from_day: date.day(),
            fajr: truncate(to_local(times.time(Prayer::Fajr))),
            dhuhr: truncate(to_local(times.time(Prayer::Dhuhr))),
            asr: truncate(to_local(times.time(Prayer::Asr))),
            maghrib: truncate(to_local(times.time(Prayer::Maghrib))),
            isha: truncate(to_local(times.time(Prayer::Isha))),
        })
    }

    /// The row for `date`, computed from the nearest day of the same month
    /// that the calculation accepts.
    fn row_near(&self, date: NaiveDate) -> Result<SeasonalRow> {
        let mut last_err = match self.row_for(date) {
            Ok(row) => return Ok(row),
            Err(e) => e,
        };
        for shift in [1i64, -1, 2, -2, 3, -3] {
            let Some(neighbour) = date.checked_add_signed(Duration::days(shift)) else {
                continue;
            };
            if neighbour.month() != date.month() {
                continue;
            }
            match self.row_for(neighbour) {
                Ok(row) => {
                    warn!("{:#}; using {} instead", last_err, neighbour);
                    return Ok(SeasonalRow {
                        from_day: date.day(),
                        ..row
                    });
                }
                Err(e) => last_err = e,
            }
        }
        Err(last_err)
    }

    /// Two rows per month, from the 1st and from the 16th.
    pub fn year_table(&self, year: i32) -> Result<Vec<SeasonalRow>> {
        let mut rows = Vec::with_capacity(24);
        for month in 1..=12 {
            for day in [1, 16] {
                let date = NaiveDate::from_ymd_opt(year, month, day)
                    .ok_or_else(|| anyhow!("Invalid date {}-{}-{}", year, month, day))?;
                rows.push(self.row_near(date)?);
            }
        }
        Ok(rows)
    }
}

fn truncate(t: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(chrono::Timelike::hour(&t), chrono::Timelike::minute(&t), 0)
        .unwrap_or(t)
}

/// Maps the timings source's method ids onto their offline equivalents.
fn method_for_id(id: u8) -> Result<Method> {
    match id {
        1 => Ok(Method::Karachi),
        2 => Ok(Method::NorthAmerica),
        3 => Ok(Method::MuslimWorldLeague),
        4 => Ok(Method::UmmAlQura),
        5 => Ok(Method::Egyptian),
        7 => Ok(Method::Tehran),
        8 => Ok(Method::Dubai),
        9 => Ok(Method::Kuwait),
        10 => Ok(Method::Qatar),
        11 => Ok(Method::Singapore),
        13 => Ok(Method::Turkey),
        15 => Ok(Method::MoonsightingCommittee),
        _ => Err(anyhow!("Calculation method {} has no offline equivalent", id)),
    }
}

fn madhab_for_school(school: u8) -> Result<Madhab> {
    match school {
        0 => Ok(Madhab::Shafi),
        1 => Ok(Madhab::Hanafi),
        _ => Err(anyhow!("Unknown school: {}", school)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::PlausibilityConfig;

    #[test]
    fn delhi_table_has_plausible_maghrib_all_year() {
        let calibrator = Calibrator::new(&LocationConfig::default()).unwrap();
        let rows = calibrator.year_table(2026).unwrap();
        assert_eq!(rows.len(), 24);

        let window = PlausibilityConfig::default();
        for row in &rows {
            assert!(window.accepts(row.maghrib), "{:?}", row);
            assert!(row.fajr < row.dhuhr && row.dhuhr < row.asr);
            assert!(row.asr < row.maghrib && row.maghrib < row.isha);
        }
    }

    #[test]
    fn failing_calculation_day_is_an_error_not_a_crash() {
        let calibrator = Calibrator::new(&LocationConfig::default()).unwrap();
        let may_16 = NaiveDate::from_ymd_opt(2026, 5, 16).unwrap();
        // Must return instead of unwinding through the caller.
        let _ = calibrator.row_for(may_16);

        let row = calibrator.row_near(may_16).unwrap();
        assert_eq!((row.month, row.from_day), (5, 16));
        assert!(PlausibilityConfig::default().accepts(row.maghrib));
    }

    #[test]
    fn unknown_method_is_rejected() {
        let location = LocationConfig {
            method: 99,
            ..LocationConfig::default()
        };
        assert!(Calibrator::new(&location).is_err());
    }
}
