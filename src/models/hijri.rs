use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Islamic month names in English (index 0 = Muharram = month 1)
pub const HIJRI_MONTH_NAMES: [&str; 12] = [
    "Muharram",
    "Safar",
    "Rabi' al-Awwal",
    "Rabi' al-Thani",
    "Jumada al-Awwal",
    "Jumada al-Thani",
    "Rajab",
    "Sha'ban",
    "Ramadan",
    "Shawwal",
    "Dhu al-Qi'dah",
    "Dhu al-Hijjah",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HijriDate {
    pub day: u32,
    /// 1 = Muharram
    pub month: u32,
    pub year: u32,
    pub gregorian: NaiveDate,
    /// Locally derived, shown dimmed.
    pub is_approximate: bool,
}

impl HijriDate {
    /// Returns `None` unless `month` is 1..=12 and `day` is 1..=30.
    pub fn new(
        day: u32,
        month: u32,
        year: u32,
        gregorian: NaiveDate,
        is_approximate: bool,
    ) -> Option<Self> {
        if !(1..=12).contains(&month) || !(1..=30).contains(&day) {
            return None;
        }
        Some(Self {
            day,
            month,
            year,
            gregorian,
            is_approximate,
        })
    }

    pub fn month_name(&self) -> &'static str {
        HIJRI_MONTH_NAMES[(self.month as usize - 1) % 12]
    }

    pub fn formatted(&self) -> String {
        format!("{} {} {} AH", self.day, self.month_name(), self.year)
    }
}

impl std::fmt::Display for HijriDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_approximate {
            write!(f, "~{}", self.formatted())
        } else {
            write!(f, "{}", self.formatted())
        }
    }
}
