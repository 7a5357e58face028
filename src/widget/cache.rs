use chrono::NaiveDateTime;
use log::warn;
use rusqlite::Connection;
use serde::Serialize;

use crate::db::repository::{CacheRepo, MetaRepo};
use crate::models::{HijriDate, PrayerSnapshot, SnapshotSource};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CachedEntry {
    pub snapshot: PrayerSnapshot,
    pub hijri: HijriDate,
    pub updated_at: NaiveDateTime,
}

/// The last resolved pair, optionally mirrored into SQLite so the next
/// launch can render before any fetch completes. The database side is best
/// effort: failures are logged and the in-memory copy stays authoritative.
pub struct WidgetCache {
    entry: Option<CachedEntry>,
    conn: Option<Connection>,
}

impl WidgetCache {
    pub fn in_memory() -> Self {
        Self {
            entry: None,
            conn: None,
        }
    }

    pub fn durable(conn: Connection) -> Self {
        let entry = match CacheRepo::load(&conn) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Ignoring unreadable cache: {}", e);
                None
            }
        };
        Self {
            entry,
            conn: Some(conn),
        }
    }

    pub fn get(&self) -> Option<&CachedEntry> {
        self.entry.as_ref()
    }

    pub fn store(
        &mut self,
        snapshot: PrayerSnapshot,
        hijri: HijriDate,
        now: NaiveDateTime,
    ) -> &CachedEntry {
        let entry = CachedEntry {
            snapshot,
            hijri,
            updated_at: now,
        };
        if let Some(conn) = &self.conn {
            if let Err(e) = CacheRepo::store(conn, &entry) {
                warn!("Failed to persist cache: {}", e);
            }
            if entry.snapshot.source == SnapshotSource::Remote {
                let stamp = now.format("%Y-%m-%d %H:%M:%S").to_string();
                if let Err(e) = MetaRepo::set(conn, "last_remote_at", &stamp) {
                    warn!("Failed to record remote refresh: {}", e);
                }
            }
        }
        self.entry.insert(entry)
    }

    pub fn clear(&mut self) {
        self.entry = None;
        if let Some(conn) = &self.conn {
            if let Err(e) = CacheRepo::clear(conn) {
                warn!("Failed to clear cache: {}", e);
            }
        }
    }

    pub fn last_remote_at(&self) -> Option<String> {
        let conn = self.conn.as_ref()?;
        MetaRepo::get(conn, "last_remote_at").ok().flatten()
    }
}
