use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};

use crate::cli::args::CacheCommands;
use crate::config::AppConfig;
use crate::models::{HijriDate, PrayerSnapshot};
use crate::prayer_times::Calibrator;
use crate::sources::FetchError;
use crate::utils::format::{format_12h, format_time};
use crate::widget::{CachedEntry, Refresher, WidgetCache, countdown_at};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;212;175;85m";

fn print_error(what: &str, err: &Option<FetchError>) {
    if let Some(e) = err {
        println_colored!(RED, "  {} unavailable: {} ({})", what, e.category(), e);
    }
}

fn print_hijri(hijri: &HijriDate) {
    if hijri.is_approximate {
        println_colored!(DIM, "  {} (approximate)", hijri.formatted());
    } else {
        println_colored!(AMBER, "  {}", hijri.formatted());
    }
}

fn print_snapshot(snapshot: &PrayerSnapshot, config: &AppConfig) {
    let now = Local::now().time();
    println_colored!(DIM, "  {:<10}  {:>8}  {:>8}", "Prayer", "Azaan", "Jama'at");
    for (prayer, azaan) in snapshot.iter() {
        let jamaat = config.jamaat.jamaat_time(prayer, azaan);
        let color = if azaan < now { DIM } else { BOLD };
        println_colored!(
            color,
            "  {:<10}  {:>8}  {:>8}",
            prayer.display_name(),
            format_12h(azaan),
            format_12h(jamaat)
        );
    }
}

// ─── Times ───────────────────────────────────────────────────────────────────

pub async fn handle_times(
    refresher: &Refresher,
    cache: &mut WidgetCache,
    config: &AppConfig,
) -> Result<()> {
    let now = Local::now().naive_local();
    let resolution = refresher
        .resolve(now.date())
        .await
        .keep_cached(cache.get());

    println!();
    println_colored!(
        GOLD,
        "  Prayer Times — {}, {} ({})",
        config.location.city,
        config.location.country,
        now.date().format("%A, %-d %B %Y")
    );
    print_hijri(&resolution.hijri);
    println!();
    print_snapshot(&resolution.snapshot, config);
    println!();

    if resolution.snapshot.is_approximate() {
        println_colored!(AMBER, "  Source: seasonal estimate");
    } else if resolution.timings_error.is_some() {
        println_colored!(AMBER, "  Source: live, cached {}", resolution.snapshot.date);
    } else {
        println_colored!(GREEN, "  Source: live");
    }
    print_error("Hijri date", &resolution.hijri_error);
    print_error("Timings", &resolution.timings_error);
    println!();

    cache.store(resolution.snapshot, resolution.hijri, now);
    Ok(())
}

// ─── Hijri ───────────────────────────────────────────────────────────────────

pub async fn handle_hijri(
    refresher: &Refresher,
    date: Option<NaiveDate>,
    offline: bool,
) -> Result<()> {
    let date = date.unwrap_or_else(|| Local::now().date_naive());
    let (hijri, error) = if offline {
        (refresher.offline(date).hijri, None)
    } else {
        refresher.hijri(date).await
    };

    println!();
    println_colored!(GOLD, "  {}", date.format("%A, %-d %B %Y"));
    print_hijri(&hijri);
    print_error("Hijri date", &error);
    println!();
    Ok(())
}

// ─── Countdown ───────────────────────────────────────────────────────────────

/// The cached entry when it was resolved for `today`.
fn entry_for_today(cache: &WidgetCache, today: NaiveDate) -> Option<&CachedEntry> {
    cache.get().filter(|e| e.snapshot.date == today)
}

pub async fn handle_countdown(
    refresher: &Refresher,
    cache: &mut WidgetCache,
    config: &AppConfig,
) -> Result<()> {
    let now = Local::now().naive_local();
    let cached = entry_for_today(cache, now.date()).map(|e| e.snapshot.maghrib());
    let maghrib = match cached {
        Some(maghrib) => maghrib,
        None => {
            let resolution = refresher
                .resolve(now.date())
                .await
                .keep_cached(cache.get());
            cache
                .store(resolution.snapshot, resolution.hijri, now)
                .snapshot
                .maghrib()
        }
    };

    let hold = chrono::Duration::minutes(config.refresh.iftar_hold_minutes);
    let state = countdown_at(now, maghrib, hold);
    println!();
    println_colored!(GOLD, "  Maghrib at {}", format_12h(maghrib));
    println_colored!(AMBER, "  {}", state.label(true));
    println!();
    Ok(())
}

// ─── Calibrate ───────────────────────────────────────────────────────────────

pub fn handle_calibrate(config: &mut AppConfig, write: bool) -> Result<()> {
    let year = Local::now().year();
    let calibrator = Calibrator::new(&config.location)?;
    let rows = calibrator.year_table(year)?;

    println!();
    println_colored!(
        GOLD,
        "  Seasonal table for {} ({:.4}, {:.4}), {}",
        config.location.city,
        config.location.latitude,
        config.location.longitude,
        year
    );
    println!();
    println_colored!(
        DIM,
        "  {:>5}  {:>5}  {:>5}  {:>5}  {:>5}  {:>7}  {:>5}",
        "Month",
        "From",
        "Fajr",
        "Dhuhr",
        "Asr",
        "Maghrib",
        "Isha"
    );
    for row in &rows {
        println!(
            "  {:>5}  {:>5}  {:>5}  {:>5}  {:>5}  {:>7}  {:>5}",
            row.month,
            row.from_day,
            format_time(row.fajr),
            format_time(row.dhuhr),
            format_time(row.asr),
            format_time(row.maghrib),
            format_time(row.isha)
        );
    }
    println!();

    if write {
        config.seasonal = rows;
        config.save().context("Saving seasonal table")?;
        println_colored!(GREEN, "  ✓ Saved {} rows to config.toml", config.seasonal.len());
    } else {
        println_colored!(DIM, "  Run with --write to use this table as the fallback.");
    }
    println!();
    Ok(())
}

// ─── Cache ───────────────────────────────────────────────────────────────────

pub fn handle_cache(cache: &mut WidgetCache, action: &CacheCommands) -> Result<()> {
    match action {
        CacheCommands::Show => {
            println!();
            match cache.get() {
                None => println_colored!(DIM, "  Cache is empty."),
                Some(entry) => {
                    println_colored!(
                        GOLD,
                        "  Cached for {} ({})",
                        entry.snapshot.date,
                        entry.snapshot.source.as_str()
                    );
                    print_hijri(&entry.hijri);
                    println!();
                    for (prayer, time) in entry.snapshot.iter() {
                        println!("  {:<10}  {}", prayer.display_name(), format_time(time));
                    }
                    println!();
                    println_colored!(
                        DIM,
                        "  Updated {}",
                        entry.updated_at.format("%Y-%m-%d %H:%M:%S")
                    );
                }
            }
            if let Some(at) = cache.last_remote_at() {
                println_colored!(DIM, "  Last live refresh {}", at);
            }
            println!();
        }
        CacheCommands::Clear => {
            cache.clear();
            println_colored!(GREEN, "✓ Cache cleared");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prayer_times::SeasonalTable;
    use crate::utils::hijri::approximate_hijri;

    #[test]
    fn countdown_ignores_an_entry_from_another_day() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let yesterday = today.pred_opt().unwrap();
        let mut cache = WidgetCache::in_memory();
        assert!(entry_for_today(&cache, today).is_none());

        cache.store(
            SeasonalTable::default().lookup(yesterday),
            approximate_hijri(yesterday),
            yesterday.and_hms_opt(23, 0, 0).unwrap(),
        );
        assert!(entry_for_today(&cache, today).is_none());

        cache.store(
            SeasonalTable::default().lookup(today),
            approximate_hijri(today),
            today.and_hms_opt(1, 0, 0).unwrap(),
        );
        assert!(entry_for_today(&cache, today).is_some());
    }
}
