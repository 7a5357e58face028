pub mod hijri;
pub mod prayer;

pub use hijri::HijriDate;
pub use prayer::{PrayerName, PrayerSnapshot, SnapshotSource};
