use log::info;

use crate::config::settings::MaghribOverride;
use crate::models::PrayerSnapshot;

/// Point corrections for Maghrib values the source is known to get wrong.
///
/// Only an exact match on the resolved Maghrib triggers a replacement; the
/// table is not a general adjustment mechanism.
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    entries: Vec<MaghribOverride>,
}

impl OverrideTable {
    pub fn new(entries: &[MaghribOverride]) -> Self {
        Self {
            entries: entries.to_vec(),
        }
    }

    /// Returns the snapshot with Maghrib corrected, or unchanged when no
    /// entry matches.
    pub fn apply(&self, snapshot: PrayerSnapshot) -> PrayerSnapshot {
        let maghrib = snapshot.maghrib();
        match self.entries.iter().find(|o| o.wrong == maghrib) {
            Some(o) => {
                info!(
                    "Maghrib {} is a known-wrong value, using {}",
                    maghrib.format("%H:%M"),
                    o.correct.format("%H:%M")
                );
                snapshot.with_maghrib(o.correct)
            }
            None => snapshot,
        }
    }
}
