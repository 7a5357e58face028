use anyhow::Result;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch("
        CREATE TABLE IF NOT EXISTS snapshot_cache (
            id              INTEGER PRIMARY KEY CHECK(id = 1),
            date            TEXT NOT NULL,
            fajr            TEXT NOT NULL,
            dhuhr           TEXT NOT NULL,
            asr             TEXT NOT NULL,
            maghrib         TEXT NOT NULL,
            isha            TEXT NOT NULL,
            source          TEXT NOT NULL CHECK(source IN ('remote','seasonal')),
            hijri_day       INTEGER NOT NULL,
            hijri_month     INTEGER NOT NULL CHECK(hijri_month BETWEEN 1 AND 12),
            hijri_year      INTEGER NOT NULL,
            hijri_gregorian TEXT NOT NULL,
            hijri_approx    INTEGER NOT NULL DEFAULT 0,
            updated_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS app_meta (
            key   TEXT PRIMARY KEY,
            value TEXT
        );
    ")?;
    Ok(())
}
