use chrono::NaiveTime;

/// Parse a clock reading as sources and people write it: `"18:05"`,
/// `"6:05 PM"`, `"6:05pm"` or `"18:05 (IST)"`.
pub fn parse_clock(raw: &str) -> Option<NaiveTime> {
    let upper = raw.split('(').next()?.trim().to_ascii_uppercase();
    let (body, pm) = if let Some(b) = upper.strip_suffix("AM") {
        (b.trim_end(), Some(false))
    } else if let Some(b) = upper.strip_suffix("PM") {
        (b.trim_end(), Some(true))
    } else {
        (upper.as_str(), None)
    };

    let (h, rest) = body.split_once(':')?;
    let hour: u32 = h.trim().parse().ok()?;
    let minute: u32 = rest.split(':').next()?.trim().parse().ok()?;

    let hour = match pm {
        None => hour,
        Some(_) if hour == 0 || hour > 12 => return None,
        Some(true) if hour == 12 => 12,
        Some(true) => hour + 12,
        Some(false) if hour == 12 => 0,
        Some(false) => hour,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Format a NaiveTime to "HH:MM"
pub fn format_time(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/// Format a NaiveTime to "6:05 PM"
pub fn format_12h(t: NaiveTime) -> String {
    t.format("%-I:%M %p").to_string()
}

/// Format a duration in seconds to "Xh Ym Zs", dropping leading zero units
pub fn format_duration_secs(secs: i64, with_seconds: bool) -> String {
    if secs <= 0 {
        return "now".to_string();
    }
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    match (hours > 0, with_seconds) {
        (true, true) => format!("{}h {}m {}s", hours, minutes, seconds),
        (true, false) => format!("{}h {}m", hours, minutes),
        (false, true) if minutes > 0 => format!("{}m {}s", minutes, seconds),
        (false, true) => format!("{}s", seconds),
        (false, false) => format!("{}m", minutes),
    }
}

/// Serde adapter storing a `NaiveTime` as `"HH:MM"` in config files.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_time(*t))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_clock(&raw).ok_or_else(|| D::Error::custom(format!("bad clock time '{}'", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn parses_24h_and_12h_forms() {
        assert_eq!(parse_clock("18:05"), Some(t(18, 5)));
        assert_eq!(parse_clock("6:05 PM"), Some(t(18, 5)));
        assert_eq!(parse_clock("6:05pm"), Some(t(18, 5)));
        assert_eq!(parse_clock("12:10 AM"), Some(t(0, 10)));
        assert_eq!(parse_clock("12:30 PM"), Some(t(12, 30)));
        assert_eq!(parse_clock("05:12 (IST)"), Some(t(5, 12)));
        assert_eq!(parse_clock("05:12:40"), Some(t(5, 12)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_clock(""), None);
        assert_eq!(parse_clock("sunset"), None);
        assert_eq!(parse_clock("25:00"), None);
        assert_eq!(parse_clock("13:00 PM"), None);
        assert_eq!(parse_clock("7:75"), None);
    }

    #[test]
    fn twelve_hour_rendering() {
        assert_eq!(format_12h(t(17, 1)), "5:01 PM");
        assert_eq!(format_12h(t(4, 58)), "4:58 AM");
        assert_eq!(format_12h(t(12, 0)), "12:00 PM");
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration_secs(0, true), "now");
        assert_eq!(format_duration_secs(3 * 3600 + 4 * 60 + 5, true), "3h 4m 5s");
        assert_eq!(format_duration_secs(3 * 3600 + 4 * 60 + 5, false), "3h 4m");
        assert_eq!(format_duration_secs(65, true), "1m 5s");
        assert_eq!(format_duration_secs(9, true), "9s");
    }
}
