use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerName {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerName {
    pub const ALL: [PrayerName; 5] = [
        PrayerName::Fajr,
        PrayerName::Dhuhr,
        PrayerName::Asr,
        PrayerName::Maghrib,
        PrayerName::Isha,
    ];

    /// Key used by the timings source.
    pub fn display_name(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "Fajr",
            PrayerName::Dhuhr => "Dhuhr",
            PrayerName::Asr => "Asr",
            PrayerName::Maghrib => "Maghrib",
            PrayerName::Isha => "Isha",
        }
    }

    fn index(&self) -> usize {
        match self {
            PrayerName::Fajr => 0,
            PrayerName::Dhuhr => 1,
            PrayerName::Asr => 2,
            PrayerName::Maghrib => 3,
            PrayerName::Isha => 4,
        }
    }
}

impl std::fmt::Display for PrayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Where the active timings came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotSource {
    Remote,
    Seasonal,
}

impl SnapshotSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotSource::Remote => "remote",
            SnapshotSource::Seasonal => "seasonal",
        }
    }
}

impl FromStr for SnapshotSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "remote" => Ok(SnapshotSource::Remote),
            "seasonal" => Ok(SnapshotSource::Seasonal),
            _ => Err(anyhow::anyhow!("Unknown snapshot source: {}", s)),
        }
    }
}

/// The five daily prayer times, replaced wholesale on every refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrayerSnapshot {
    pub date: NaiveDate,
    times: [NaiveTime; 5],
    pub source: SnapshotSource,
}

impl PrayerSnapshot {
    /// Times are given in `PrayerName::ALL` order.
    pub fn new(date: NaiveDate, times: [NaiveTime; 5], source: SnapshotSource) -> Self {
        Self {
            date,
            times,
            source,
        }
    }

    pub fn time(&self, prayer: PrayerName) -> NaiveTime {
        self.times[prayer.index()]
    }

    pub fn maghrib(&self) -> NaiveTime {
        self.time(PrayerName::Maghrib)
    }

    /// Copy with Maghrib replaced; every other time is kept.
    pub fn with_maghrib(&self, maghrib: NaiveTime) -> Self {
        let mut times = self.times;
        times[PrayerName::Maghrib.index()] = maghrib;
        Self {
            date: self.date,
            times,
            source: self.source,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (PrayerName, NaiveTime)> + '_ {
        PrayerName::ALL.iter().map(|p| (*p, self.time(*p)))
    }

    pub fn is_approximate(&self) -> bool {
        self.source == SnapshotSource::Seasonal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn with_maghrib_keeps_the_other_prayers() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let snap = PrayerSnapshot::new(
            date,
            [t(5, 0), t(12, 20), t(15, 50), t(17, 56), t(19, 20)],
            SnapshotSource::Remote,
        );
        let fixed = snap.with_maghrib(t(17, 1));
        assert_eq!(fixed.maghrib(), t(17, 1));
        assert_eq!(fixed.time(PrayerName::Isha), t(19, 20));
        assert_eq!(fixed.source, SnapshotSource::Remote);
        assert_eq!(snap.maghrib(), t(17, 56));
    }
}
