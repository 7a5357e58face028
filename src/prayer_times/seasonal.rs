use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::{PrayerSnapshot, SnapshotSource};
use crate::utils::format::hhmm;

fn first_day() -> u32 {
    1
}

/// Fallback timings valid from `from_day` of `month` until the next row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalRow {
    pub month: u32,
    #[serde(default = "first_day")]
    pub from_day: u32,
    #[serde(with = "hhmm")]
    pub fajr: NaiveTime,
    #[serde(with = "hhmm")]
    pub dhuhr: NaiveTime,
    #[serde(with = "hhmm")]
    pub asr: NaiveTime,
    #[serde(with = "hhmm")]
    pub maghrib: NaiveTime,
    #[serde(with = "hhmm")]
    pub isha: NaiveTime,
}

impl SeasonalRow {
    fn times(&self) -> [NaiveTime; 5] {
        [self.fajr, self.dhuhr, self.asr, self.maghrib, self.isha]
    }
}

type Hm = (u32, u32);

// Delhi, Karachi method, Hanafi Asr. March and October move fast enough
// around the equinox to need a second row from the 16th.
const BUILT_IN: &[(u32, u32, [Hm; 5])] = &[
    (1, 1, [(5, 50), (12, 20), (15, 30), (17, 40), (19, 0)]),
    (2, 1, [(5, 40), (12, 25), (15, 55), (18, 5), (19, 20)]),
    (3, 1, [(5, 15), (12, 25), (16, 10), (18, 22), (19, 35)]),
    (3, 16, [(4, 58), (12, 20), (16, 15), (18, 32), (19, 45)]),
    (4, 1, [(4, 35), (12, 15), (16, 25), (18, 45), (20, 0)]),
    (5, 1, [(4, 5), (12, 10), (16, 35), (19, 3), (20, 25)]),
    (6, 1, [(3, 55), (12, 15), (16, 45), (19, 18), (20, 45)]),
    (7, 1, [(4, 5), (12, 20), (16, 50), (19, 20), (20, 45)]),
    (8, 1, [(4, 25), (12, 20), (16, 40), (19, 0), (20, 20)]),
    (9, 1, [(4, 45), (12, 10), (16, 15), (18, 30), (19, 45)]),
    (10, 1, [(5, 0), (12, 0), (15, 50), (18, 2), (19, 15)]),
    (10, 16, [(5, 10), (11, 58), (15, 38), (17, 48), (19, 2)]),
    (11, 1, [(5, 25), (12, 0), (15, 20), (17, 30), (18, 50)]),
    (12, 1, [(5, 45), (12, 10), (15, 20), (17, 28), (18, 50)]),
];

fn hm((h, m): Hm) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN)
}

pub fn built_in_rows() -> Vec<SeasonalRow> {
    BUILT_IN
        .iter()
        .map(|(month, from_day, t)| SeasonalRow {
            month: *month,
            from_day: *from_day,
            fajr: hm(t[0]),
            dhuhr: hm(t[1]),
            asr: hm(t[2]),
            maghrib: hm(t[3]),
            isha: hm(t[4]),
        })
        .collect()
}

/// Month-keyed fallback timings. Needs nothing but the date.
#[derive(Debug, Clone)]
pub struct SeasonalTable {
    custom: Vec<SeasonalRow>,
    built_in: Vec<SeasonalRow>,
}

impl SeasonalTable {
    /// Custom rows win for any (month, day) they cover; the built-in table
    /// covers everything else.
    pub fn new(custom: &[SeasonalRow]) -> Self {
        let mut custom: Vec<SeasonalRow> = custom
            .iter()
            .filter(|r| (1..=12).contains(&r.month) && (1..=31).contains(&r.from_day))
            .cloned()
            .collect();
        custom.sort_by_key(|r| (r.month, r.from_day));
        Self {
            custom,
            built_in: built_in_rows(),
        }
    }

    fn row_for(&self, date: NaiveDate) -> Option<&SeasonalRow> {
        let pick = |rows: &[SeasonalRow]| -> Option<usize> {
            rows.iter()
                .rposition(|r| r.month == date.month() && r.from_day <= date.day())
        };
        if let Some(i) = pick(self.custom.as_slice()) {
            return self.custom.get(i);
        }
        pick(self.built_in.as_slice()).and_then(|i| self.built_in.get(i))
    }

    pub fn lookup(&self, date: NaiveDate) -> PrayerSnapshot {
        let times = self
            .row_for(date)
            .map(SeasonalRow::times)
            .unwrap_or_else(|| built_in_rows()[0].times());
        PrayerSnapshot::new(date, times, SnapshotSource::Seasonal)
    }
}

impl Default for SeasonalTable {
    fn default() -> Self {
        Self::new(&[])
    }
}
