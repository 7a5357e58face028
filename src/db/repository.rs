use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::{params, Connection, OptionalExtension};
use std::str::FromStr;

use crate::models::{HijriDate, PrayerName, PrayerSnapshot, SnapshotSource};
use crate::widget::cache::CachedEntry;

const DATE_FMT: &str = "%Y-%m-%d";
const STAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";

fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|e| anyhow!("Bad time '{}': {}", s, e))
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FMT).map_err(|e| anyhow!("Bad date '{}': {}", s, e))
}

// ─── Cached snapshot ─────────────────────────────────────────────────────────

struct CacheRow {
    date: String,
    times: [String; 5],
    source: String,
    hijri_day: u32,
    hijri_month: u32,
    hijri_year: u32,
    hijri_gregorian: String,
    hijri_approx: bool,
    updated_at: String,
}

pub struct CacheRepo;

impl CacheRepo {
    pub fn load(conn: &Connection) -> Result<Option<CachedEntry>> {
        let row = conn
            .query_row(
                "SELECT date, fajr, dhuhr, asr, maghrib, isha, source,
                        hijri_day, hijri_month, hijri_year, hijri_gregorian, hijri_approx,
                        updated_at
                 FROM snapshot_cache WHERE id = 1",
                [],
                |row| {
                    Ok(CacheRow {
                        date: row.get(0)?,
                        times: [row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?, row.get(5)?],
                        source: row.get(6)?,
                        hijri_day: row.get(7)?,
                        hijri_month: row.get(8)?,
                        hijri_year: row.get(9)?,
                        hijri_gregorian: row.get(10)?,
                        hijri_approx: row.get::<_, i32>(11)? != 0,
                        updated_at: row.get(12)?,
                    })
                },
            )
            .optional()?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut times = [NaiveTime::MIN; 5];
        for (slot, raw) in times.iter_mut().zip(row.times.iter()) {
            *slot = parse_time(raw)?;
        }
        let snapshot = PrayerSnapshot::new(
            parse_date(&row.date)?,
            times,
            SnapshotSource::from_str(&row.source)?,
        );
        let hijri = HijriDate::new(
            row.hijri_day,
            row.hijri_month,
            row.hijri_year,
            parse_date(&row.hijri_gregorian)?,
            row.hijri_approx,
        )
        .ok_or_else(|| anyhow!("Cached Hijri date is out of range"))?;
        let updated_at = NaiveDateTime::parse_from_str(&row.updated_at, STAMP_FMT)
            .map_err(|e| anyhow!("Bad timestamp '{}': {}", row.updated_at, e))?;

        Ok(Some(CachedEntry {
            snapshot,
            hijri,
            updated_at,
        }))
    }

    pub fn store(conn: &Connection, entry: &CachedEntry) -> Result<()> {
        let snap = &entry.snapshot;
        let time = |p: PrayerName| snap.time(p).format("%H:%M").to_string();
        conn.execute(
            "INSERT OR REPLACE INTO snapshot_cache
                (id, date, fajr, dhuhr, asr, maghrib, isha, source,
                 hijri_day, hijri_month, hijri_year, hijri_gregorian, hijri_approx, updated_at)
             VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                snap.date.format(DATE_FMT).to_string(),
                time(PrayerName::Fajr),
                time(PrayerName::Dhuhr),
                time(PrayerName::Asr),
                time(PrayerName::Maghrib),
                time(PrayerName::Isha),
                snap.source.as_str(),
                entry.hijri.day,
                entry.hijri.month,
                entry.hijri.year,
                entry.hijri.gregorian.format(DATE_FMT).to_string(),
                entry.hijri.is_approximate as i32,
                entry.updated_at.format(STAMP_FMT).to_string(),
            ],
        )?;
        Ok(())
    }

    pub fn clear(conn: &Connection) -> Result<()> {
        conn.execute("DELETE FROM snapshot_cache", [])?;
        Ok(())
    }
}

// ─── Meta ────────────────────────────────────────────────────────────────────

pub struct MetaRepo;

impl MetaRepo {
    pub fn get(conn: &Connection, key: &str) -> Result<Option<String>> {
        conn.query_row(
            "SELECT value FROM app_meta WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(anyhow::Error::from)
    }

    pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
        conn.execute(
            "INSERT INTO app_meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }
}
