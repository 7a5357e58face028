use anyhow::{Context, Result};
use chrono::NaiveTime;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::PrayerName;
use crate::prayer_times::SeasonalRow;
use crate::utils::format::hhmm;

fn default_city() -> String {
    "Delhi".to_string()
}
fn default_country() -> String {
    "India".to_string()
}
fn default_method() -> u8 {
    1 // University of Islamic Sciences, Karachi
}
fn default_school() -> u8 {
    1 // Hanafi
}
fn default_latitude() -> f64 {
    28.6139
}
fn default_longitude() -> f64 {
    77.2090
}
fn default_timezone_offset() -> i32 {
    330
}
fn default_base_url() -> String {
    "https://api.aladhan.com".to_string()
}
fn default_fetch_timeout_secs() -> u64 {
    10
}
fn default_period_minutes() -> u64 {
    60
}
fn default_tick_secs() -> u64 {
    1
}
fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN)
}
fn default_maghrib_earliest() -> NaiveTime {
    hm(17, 0)
}
fn default_maghrib_latest() -> NaiveTime {
    hm(20, 0)
}
fn default_overrides() -> Vec<MaghribOverride> {
    // The source once served 17:56 for this masjid where the verified time was 17:01.
    vec![MaghribOverride {
        wrong: hm(17, 56),
        correct: hm(17, 1),
    }]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default = "default_city")]
    pub city: String,
    #[serde(default = "default_country")]
    pub country: String,
    /// Calculation-method id understood by the timings source.
    #[serde(default = "default_method")]
    pub method: u8,
    /// 0 = Shafi, 1 = Hanafi
    #[serde(default = "default_school")]
    pub school: u8,
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default = "default_timezone_offset")]
    pub timezone_offset: i32, // minutes from UTC
    /// Days to add/subtract from the approximate Hijri date for local moon sighting.
    #[serde(default)]
    pub hijri_offset: i32,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            city: default_city(),
            country: default_country(),
            method: default_method(),
            school: default_school(),
            latitude: default_latitude(),
            longitude: default_longitude(),
            timezone_offset: default_timezone_offset(),
            hijri_offset: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl SourceConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    #[serde(default = "default_period_minutes")]
    pub period_minutes: u64,
    #[serde(default = "default_tick_secs")]
    pub tick_secs: u64,
    /// Minutes after Maghrib to keep showing "Time for Iftar".
    #[serde(default)]
    pub iftar_hold_minutes: i64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            period_minutes: default_period_minutes(),
            tick_secs: default_tick_secs(),
            iftar_hold_minutes: 0,
        }
    }
}

impl RefreshConfig {
    pub fn period(&self) -> Duration {
        Duration::from_secs(self.period_minutes.max(1) * 60)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_secs(self.tick_secs.clamp(1, 60))
    }

    pub fn shows_seconds(&self) -> bool {
        self.tick_secs < 60
    }
}

/// Source Maghrib values outside this window are discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlausibilityConfig {
    #[serde(with = "hhmm", default = "default_maghrib_earliest")]
    pub maghrib_earliest: NaiveTime,
    #[serde(with = "hhmm", default = "default_maghrib_latest")]
    pub maghrib_latest: NaiveTime,
}

impl Default for PlausibilityConfig {
    fn default() -> Self {
        Self {
            maghrib_earliest: default_maghrib_earliest(),
            maghrib_latest: default_maghrib_latest(),
        }
    }
}

impl PlausibilityConfig {
    pub fn accepts(&self, maghrib: NaiveTime) -> bool {
        maghrib >= self.maghrib_earliest && maghrib <= self.maghrib_latest
    }
}

/// A known-wrong Maghrib value and its hand-verified replacement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaghribOverride {
    #[serde(with = "hhmm")]
    pub wrong: NaiveTime,
    #[serde(with = "hhmm")]
    pub correct: NaiveTime,
}

/// Minutes between the Azaan and the congregation, per prayer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JamaatConfig {
    #[serde(default)]
    pub fajr: i64,
    #[serde(default)]
    pub dhuhr: i64,
    #[serde(default)]
    pub asr: i64,
    #[serde(default)]
    pub maghrib: i64,
    #[serde(default)]
    pub isha: i64,
}

impl Default for JamaatConfig {
    fn default() -> Self {
        Self {
            fajr: 20,
            dhuhr: 15,
            asr: 15,
            maghrib: 5,
            isha: 15,
        }
    }
}

impl JamaatConfig {
    pub fn offset_minutes(&self, prayer: PrayerName) -> i64 {
        match prayer {
            PrayerName::Fajr => self.fajr,
            PrayerName::Dhuhr => self.dhuhr,
            PrayerName::Asr => self.asr,
            PrayerName::Maghrib => self.maghrib,
            PrayerName::Isha => self.isha,
        }
    }

    pub fn jamaat_time(&self, prayer: PrayerName, azaan: NaiveTime) -> NaiveTime {
        azaan + chrono::Duration::minutes(self.offset_minutes(prayer))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub sources: SourceConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub plausibility: PlausibilityConfig,
    #[serde(default)]
    pub jamaat: JamaatConfig,
    #[serde(default = "default_overrides")]
    pub overrides: Vec<MaghribOverride>,
    /// Rows taking precedence over the built-in seasonal table from their
    /// `from_day` until the next configured row of the same month.
    #[serde(default)]
    pub seasonal: Vec<SeasonalRow>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            location: LocationConfig::default(),
            sources: SourceConfig::default(),
            refresh: RefreshConfig::default(),
            plausibility: PlausibilityConfig::default(),
            jamaat: JamaatConfig::default(),
            overrides: default_overrides(),
            seasonal: Vec::new(),
        }
    }
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "masjid")
            .context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn db_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("masjid.db"))
    }

    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("masjid.log"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.location.city, "Delhi");
        assert_eq!(config.overrides.len(), 1);
        assert_eq!(config.overrides[0].wrong, hm(17, 56));
        assert_eq!(config.overrides[0].correct, hm(17, 1));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[location]
city = "Lucknow"

[plausibility]
maghrib_latest = "7:30 PM"

[[overrides]]
wrong = "18:44"
correct = "18:40"
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.location.city, "Lucknow");
        assert_eq!(config.location.country, "India");
        assert_eq!(config.plausibility.maghrib_earliest, hm(17, 0));
        assert_eq!(config.plausibility.maghrib_latest, hm(19, 30));
        assert_eq!(config.overrides, vec![MaghribOverride { wrong: hm(18, 44), correct: hm(18, 40) }]);
        assert_eq!(config.refresh.period(), Duration::from_secs(3600));
    }

    #[test]
    fn save_then_load_keeps_times_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        AppConfig::default().save_to(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("wrong = \"17:56\""));
        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.overrides, default_overrides());
    }

    #[test]
    fn plausibility_window_is_inclusive() {
        let window = PlausibilityConfig::default();
        assert!(window.accepts(hm(17, 0)));
        assert!(window.accepts(hm(20, 0)));
        assert!(!window.accepts(hm(5, 30)));
        assert!(!window.accepts(hm(20, 1)));
    }

    #[test]
    fn jamaat_adds_offset() {
        let jamaat = JamaatConfig::default();
        assert_eq!(jamaat.jamaat_time(PrayerName::Fajr, hm(5, 0)), hm(5, 20));
    }
}
