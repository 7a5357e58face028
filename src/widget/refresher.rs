use chrono::NaiveDate;
use log::{info, warn};

use crate::config::AppConfig;
use crate::widget::CachedEntry;
use crate::config::settings::{LocationConfig, PlausibilityConfig};
use crate::models::{HijriDate, PrayerSnapshot};
use crate::prayer_times::{OverrideTable, SeasonalTable};
use crate::sources::{AladhanClient, FetchError};
use crate::utils::hijri::approximate_hijri_with_offset;

/// One complete refresh result. Both halves are always present.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub snapshot: PrayerSnapshot,
    pub hijri: HijriDate,
    /// Why the Hijri date is approximate, if it is.
    pub hijri_error: Option<FetchError>,
    /// Why the timings came from the seasonal table, if they did.
    pub timings_error: Option<FetchError>,
}

impl Resolution {
    /// A failed half falls back to the cached live value for the same day
    /// before settling for an estimate. The error is kept for the status bar.
    pub fn keep_cached(self, cached: Option<&CachedEntry>) -> Resolution {
        let Some(cached) = cached else {
            return self;
        };
        let mut resolution = self;
        if resolution.timings_error.is_some()
            && !cached.snapshot.is_approximate()
            && cached.snapshot.date == resolution.snapshot.date
        {
            info!("Keeping cached live timings for {}", cached.snapshot.date);
            resolution.snapshot = cached.snapshot.clone();
        }
        if resolution.hijri_error.is_some()
            && !cached.hijri.is_approximate
            && cached.hijri.gregorian == resolution.hijri.gregorian
        {
            info!("Keeping cached Hijri date for {}", cached.hijri.gregorian);
            resolution.hijri = cached.hijri.clone();
        }
        resolution
    }
}

/// Resolves the active prayer snapshot and Hijri date, falling back from the
/// remote source to local computation so there is always something to show.
pub struct Refresher {
    client: AladhanClient,
    location: LocationConfig,
    plausibility: PlausibilityConfig,
    seasonal: SeasonalTable,
    overrides: OverrideTable,
}

impl Refresher {
    pub fn new(config: &AppConfig) -> Result<Self, FetchError> {
        let client = AladhanClient::new(&config.sources.base_url, config.sources.fetch_timeout())?;
        Ok(Self {
            client,
            location: config.location.clone(),
            plausibility: config.plausibility.clone(),
            seasonal: SeasonalTable::new(&config.seasonal),
            overrides: OverrideTable::new(&config.overrides),
        })
    }

    /// Fetches both halves concurrently; either may fail without affecting
    /// the other.
    pub async fn resolve(&self, today: NaiveDate) -> Resolution {
        info!("Refreshing prayer data for {}", today);
        let (hijri, timings) = tokio::join!(
            self.client.fetch_hijri(today),
            self.client.fetch_timings(&self.location, today),
        );
        let (hijri, hijri_error) = self.settle_hijri(hijri, today);
        let (snapshot, timings_error) = self.settle_timings(timings, today);
        Resolution {
            snapshot,
            hijri,
            hijri_error,
            timings_error,
        }
    }

    /// Hijri half only, for any date.
    pub async fn hijri(&self, date: NaiveDate) -> (HijriDate, Option<FetchError>) {
        let fetched = self.client.fetch_hijri(date).await;
        self.settle_hijri(fetched, date)
    }

    /// The end of the fallback chain: no I/O at all.
    pub fn offline(&self, today: NaiveDate) -> Resolution {
        Resolution {
            snapshot: self.overrides.apply(self.seasonal.lookup(today)),
            hijri: approximate_hijri_with_offset(today, self.location.hijri_offset),
            hijri_error: None,
            timings_error: None,
        }
    }

    pub fn settle_hijri(
        &self,
        fetched: Result<HijriDate, FetchError>,
        today: NaiveDate,
    ) -> (HijriDate, Option<FetchError>) {
        match fetched {
            Ok(hijri) => (hijri, None),
            Err(e) => {
                warn!("Hijri source unavailable ({}), using approximation", e);
                (
                    approximate_hijri_with_offset(today, self.location.hijri_offset),
                    Some(e),
                )
            }
        }
    }

    pub fn settle_timings(
        &self,
        fetched: Result<PrayerSnapshot, FetchError>,
        today: NaiveDate,
    ) -> (PrayerSnapshot, Option<FetchError>) {
        let (snapshot, error) = match fetched {
            Ok(snapshot) if self.plausibility.accepts(snapshot.maghrib()) => (snapshot, None),
            Ok(snapshot) => {
                let e = FetchError::Implausible(format!(
                    "Maghrib {} outside {}-{}",
                    snapshot.maghrib().format("%H:%M"),
                    self.plausibility.maghrib_earliest.format("%H:%M"),
                    self.plausibility.maghrib_latest.format("%H:%M"),
                ));
                warn!("{}, using seasonal table", e);
                (self.seasonal.lookup(today), Some(e))
            }
            Err(e) => {
                warn!("Timings source unavailable ({}), using seasonal table", e);
                (self.seasonal.lookup(today), Some(e))
            }
        };
        (self.overrides.apply(snapshot), error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PrayerName, SnapshotSource};
    use chrono::NaiveTime;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 20).unwrap()
    }

    fn remote(maghrib: NaiveTime) -> PrayerSnapshot {
        PrayerSnapshot::new(
            today(),
            [t(5, 52), t(12, 21), t(15, 33), maghrib, t(19, 2)],
            SnapshotSource::Remote,
        )
    }

    fn refresher(base_url: &str) -> Refresher {
        let mut config = AppConfig::default();
        config.sources.base_url = base_url.to_string();
        config.sources.fetch_timeout_secs = 2;
        Refresher::new(&config).unwrap()
    }

    #[test]
    fn plausible_remote_timings_are_kept() {
        let r = refresher("http://127.0.0.1:9");
        let (snap, err) = r.settle_timings(Ok(remote(t(17, 44))), today());
        assert!(err.is_none());
        assert_eq!(snap, remote(t(17, 44)));
    }

    #[test]
    fn implausible_maghrib_uses_seasonal_row_for_the_month() {
        let r = refresher("http://127.0.0.1:9");
        let (snap, err) = r.settle_timings(Ok(remote(t(5, 30))), today());
        assert!(matches!(err, Some(FetchError::Implausible(_))));
        assert_eq!(snap, SeasonalTable::default().lookup(today()));
        assert_ne!(snap.maghrib(), t(5, 30));
        assert!(snap.is_approximate());
    }

    #[test]
    fn known_wrong_maghrib_is_overridden() {
        let r = refresher("http://127.0.0.1:9");
        let (snap, err) = r.settle_timings(Ok(remote(t(17, 56))), today());
        assert!(err.is_none());
        assert_eq!(snap.maghrib(), t(17, 1));
        assert_eq!(snap.time(PrayerName::Fajr), t(5, 52));
    }

    #[test]
    fn failed_hijri_is_approximated() {
        let r = refresher("http://127.0.0.1:9");
        let (hijri, err) = r.settle_hijri(Err(FetchError::Timeout(10)), today());
        assert!(hijri.is_approximate);
        assert_eq!(hijri.gregorian, today());
        assert_eq!(err, Some(FetchError::Timeout(10)));
    }

    #[tokio::test]
    async fn both_sources_unreachable_still_resolves() {
        let r = refresher("http://127.0.0.1:9");
        let res = r.resolve(today()).await;
        assert!(res.hijri.is_approximate);
        assert!(res.snapshot.is_approximate());
        assert!(res.hijri_error.is_some());
        assert!(res.timings_error.is_some());
        assert_eq!(res.snapshot.iter().count(), 5);
    }

    #[tokio::test]
    async fn stalled_source_falls_back_after_the_timeout() {
        let url = crate::sources::test_support::stalled_server().await;
        let mut config = AppConfig::default();
        config.sources.base_url = url;
        config.sources.fetch_timeout_secs = 1;
        let r = Refresher::new(&config).unwrap();

        let res = r.resolve(today()).await;
        assert_eq!(res.timings_error, Some(FetchError::Timeout(1)));
        assert_eq!(res.hijri_error, Some(FetchError::Timeout(1)));
        assert_eq!(res.snapshot, SeasonalTable::default().lookup(today()));
        assert!(res.hijri.is_approximate);
    }

    #[tokio::test]
    async fn one_source_failing_does_not_block_the_other() {
        let mut server = Server::new_async().await;
        let _hijri = server
            .mock("GET", "/v1/gToH/20-01-2026")
            .with_status(500)
            .create_async()
            .await;
        let timings = json!({
            "code": 200,
            "status": "OK",
            "data": {"timings": {
                "Fajr": "05:52", "Dhuhr": "12:21", "Asr": "15:33",
                "Maghrib": "17:44", "Isha": "19:02"
            }}
        });
        let _timings = server
            .mock("GET", "/v1/timingsByCity/20-01-2026")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(timings.to_string())
            .create_async()
            .await;

        let res = refresher(&server.url()).resolve(today()).await;
        assert!(res.hijri.is_approximate);
        assert_eq!(res.snapshot.source, SnapshotSource::Remote);
        assert_eq!(res.snapshot.maghrib(), t(17, 44));
        assert!(res.timings_error.is_none());
    }

    fn cached_live(date: NaiveDate) -> CachedEntry {
        CachedEntry {
            snapshot: PrayerSnapshot::new(
                date,
                [t(5, 52), t(12, 21), t(15, 33), t(17, 44), t(19, 2)],
                SnapshotSource::Remote,
            ),
            hijri: HijriDate::new(1, 8, 1447, date, false).unwrap(),
            updated_at: date.and_hms_opt(4, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn failed_refresh_keeps_live_data_from_the_same_day() {
        let r = refresher("http://127.0.0.1:9");
        let cached = cached_live(today());
        let res = r.resolve(today()).await.keep_cached(Some(&cached));
        assert_eq!(res.snapshot, cached.snapshot);
        assert_eq!(res.hijri, cached.hijri);
        assert!(res.timings_error.is_some());
        assert!(res.hijri_error.is_some());
    }

    #[test]
    fn cached_live_data_from_another_day_is_not_reused() {
        let r = refresher("http://127.0.0.1:9");
        let yesterday = cached_live(today().pred_opt().unwrap());
        let failed = Resolution {
            hijri_error: Some(FetchError::Timeout(2)),
            timings_error: Some(FetchError::Timeout(2)),
            ..r.offline(today())
        };
        let res = failed.keep_cached(Some(&yesterday));
        assert!(res.snapshot.is_approximate());
        assert!(res.hijri.is_approximate);
        assert_eq!(res.snapshot.date, today());
    }

    #[test]
    fn successful_half_wins_over_the_cache() {
        let r = refresher("http://127.0.0.1:9");
        let cached = cached_live(today());
        let fresh = Resolution {
            snapshot: remote(t(17, 45)),
            hijri_error: Some(FetchError::Timeout(2)),
            ..r.offline(today())
        };
        let res = fresh.keep_cached(Some(&cached));
        assert_eq!(res.snapshot.maghrib(), t(17, 45));
        assert_eq!(res.hijri, cached.hijri);
    }

    #[test]
    fn offline_resolution_is_complete() {
        let r = refresher("http://127.0.0.1:9");
        let res = r.offline(today());
        assert!(res.snapshot.is_approximate());
        assert!(res.hijri.is_approximate);
    }
}
