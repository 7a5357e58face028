use chrono::NaiveDate;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;

use crate::config::settings::LocationConfig;
use crate::models::{HijriDate, PrayerName, PrayerSnapshot, SnapshotSource};
use crate::sources::error::FetchError;
use crate::utils::format::parse_clock;

/// `{code, status, data}` wrapper around every response.
#[derive(Debug, Deserialize)]
struct Envelope {
    code: u16,
    #[serde(default)]
    status: String,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct HijriPayload {
    hijri: HijriParts,
}

#[derive(Debug, Deserialize)]
struct HijriParts {
    day: String,
    month: HijriMonth,
    year: String,
}

#[derive(Debug, Deserialize)]
struct HijriMonth {
    number: u32,
}

#[derive(Debug, Deserialize)]
struct TimingsPayload {
    timings: HashMap<String, String>,
}

/// Client for the Hijri-conversion and prayer-timings endpoints.
pub struct AladhanClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl AladhanClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("masjid/", env!("CARGO_PKG_VERSION"))),
        );
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Network(format!("Failed to build client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let request = async {
            let response = self.client.get(&url).query(query).send().await?;
            let status = response.status();
            let text = response.text().await?;
            Ok::<_, FetchError>((status, text))
        };
        let (status, text) = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| FetchError::Timeout(self.timeout.as_secs()))??;

        if !status.is_success() {
            return Err(FetchError::Status(format!("HTTP {}", status)));
        }
        let envelope: Envelope = serde_json::from_str(&text)?;
        if envelope.code != 200 {
            return Err(FetchError::Status(format!(
                "code {} {}",
                envelope.code, envelope.status
            )));
        }
        Ok(serde_json::from_value(envelope.data)?)
    }

    pub async fn fetch_hijri(&self, date: NaiveDate) -> Result<HijriDate, FetchError> {
        let path = format!("/v1/gToH/{}", date.format("%d-%m-%Y"));
        let payload: HijriPayload = self.get(&path, &[]).await?;
        let parts = payload.hijri;

        let day: u32 = parts
            .day
            .trim()
            .parse()
            .map_err(|_| FetchError::Parse(format!("Hijri day '{}'", parts.day)))?;
        let year: u32 = parts
            .year
            .trim()
            .parse()
            .map_err(|_| FetchError::Parse(format!("Hijri year '{}'", parts.year)))?;

        HijriDate::new(day, parts.month.number, year, date, false).ok_or_else(|| {
            FetchError::Parse(format!(
                "Hijri date out of range: {}/{}/{}",
                day, parts.month.number, year
            ))
        })
    }

    pub async fn fetch_timings(
        &self,
        location: &LocationConfig,
        date: NaiveDate,
    ) -> Result<PrayerSnapshot, FetchError> {
        let path = format!("/v1/timingsByCity/{}", date.format("%d-%m-%Y"));
        let query = [
            ("city", location.city.clone()),
            ("country", location.country.clone()),
            ("method", location.method.to_string()),
            ("school", location.school.to_string()),
        ];
        let payload: TimingsPayload = self.get(&path, &query).await?;

        let mut times = [chrono::NaiveTime::MIN; 5];
        for (slot, prayer) in times.iter_mut().zip(PrayerName::ALL) {
            let raw = payload
                .timings
                .get(prayer.display_name())
                .ok_or_else(|| FetchError::Parse(format!("{} missing from timings", prayer)))?;
            *slot = parse_clock(raw)
                .ok_or_else(|| FetchError::Parse(format!("{} time '{}'", prayer, raw)))?;
        }
        Ok(PrayerSnapshot::new(date, times, SnapshotSource::Remote))
    }
}
