use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::warn;

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

// ── TimezoneHandler ───────────────────────────────────────────────────────────

/// Timezone-aware timestamp parsing and display conversion.
pub struct TimezoneHandler {
    default_tz: Tz,
}

impl TimezoneHandler {
    /// Create a handler with the given IANA timezone name as the default.
    ///
    /// If `tz_name` is not a recognised IANA timezone, falls back to UTC
    /// and logs a warning.
    pub fn new(tz_name: &str) -> Self {
        let tz = tz_name.parse::<Tz>().unwrap_or_else(|_| {
            warn!(
                "TimezoneHandler: unrecognised timezone \"{}\", falling back to UTC",
                tz_name
            );
            Tz::UTC
        });
        Self { default_tz: tz }
    }

    /// Parse a timestamp string into a UTC [`DateTime`].
    ///
    /// Accepts RFC 3339 (with `Z` or an offset), naive `YYYY-MM-DD[T ]HH:MM:SS`
    /// forms interpreted in the default timezone (what SQLite's
    /// `datetime('now')` writes), and bare epoch milliseconds.
    pub fn parse_timestamp(&self, s: &str) -> Option<DateTime<Utc>> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }

        const FMTS: &[&str] = &[
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S",
        ];
        for fmt in FMTS {
            if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, fmt) {
                if let chrono::LocalResult::Single(dt) = self.default_tz.from_local_datetime(&naive)
                {
                    return Some(dt.with_timezone(&Utc));
                }
            }
        }

        if let Ok(millis) = s.parse::<i64>() {
            return from_epoch_millis(millis);
        }

        warn!("TimezoneHandler: could not parse timestamp \"{}\"", s);
        None
    }

    /// Convert a UTC [`DateTime`] to the handler's timezone.
    pub fn to_local(&self, dt: DateTime<Utc>) -> DateTime<Tz> {
        dt.with_timezone(&self.default_tz)
    }

    /// Format `dt` for a list row: time only when it falls on the same local
    /// day as `now`, otherwise a short date plus time.
    pub fn format_for_list(&self, dt: DateTime<Utc>, now: DateTime<Utc>, use_12h: bool) -> String {
        let local = self.to_local(dt);
        let today = self.to_local(now).date_naive();
        let time = if use_12h {
            local.format("%I:%M %p").to_string()
        } else {
            local.format("%H:%M").to_string()
        };
        if local.date_naive() == today {
            time
        } else {
            format!("{} {}", local.format("%b %d"), time)
        }
    }

    /// Expose the configured default timezone.
    pub fn default_tz(&self) -> Tz {
        self.default_tz
    }
}

/// Convert JavaScript-style epoch milliseconds (`Date.now()`) to UTC.
pub fn from_epoch_millis(millis: i64) -> Option<DateTime<Utc>> {
    match Utc.timestamp_millis_opt(millis) {
        chrono::LocalResult::Single(dt) => Some(dt),
        _ => None,
    }
}

// ── Lenient serde for persisted timestamps ────────────────────────────────────

/// Serde helpers accepting every timestamp shape the todo files in the wild
/// use: RFC 3339 strings, SQLite-style naive strings, and epoch milliseconds.
/// Serialisation always writes RFC 3339.
pub mod lenient_timestamp {
    use super::{from_epoch_millis, TimezoneHandler};
    use chrono::{DateTime, Utc};
    use serde::de::{self, Deserializer};
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(i64),
        Text(String),
    }

    fn convert<E: de::Error>(raw: Raw) -> Result<DateTime<Utc>, E> {
        match raw {
            Raw::Millis(ms) => from_epoch_millis(ms)
                .ok_or_else(|| E::custom(format!("timestamp out of range: {}", ms))),
            Raw::Text(s) => TimezoneHandler::new("UTC")
                .parse_timestamp(&s)
                .ok_or_else(|| E::custom(format!("invalid timestamp: {}", s))),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        convert(Raw::deserialize(deserializer)?)
    }

    /// Same as [`deserialize`] for optional fields; `null` maps to `None`.
    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Raw>::deserialize(deserializer)? {
            Some(raw) => convert(raw).map(Some),
            None => Ok(None),
        }
    }
}

// ── 12-hour / 24-hour format detection ───────────────────────────────────────

/// Country codes whose users conventionally use 12-hour clock format.
const TWELVE_HOUR_COUNTRIES: &[&str] = &[
    "US", "CA", "AU", "NZ", "PH", "IN", "EG", "SA", "AE", "JO", "IR", "PK", "BD", "MY", "MX", "CO",
    "VE", "AR",
];

/// Decide whether to use 12-hour clock display.
///
/// Priority:
/// 1. `explicit` `"12h"` → `true`, `"24h"` → `false`.
/// 2. Country derived from `timezone` (e.g. `"America/New_York"` → `"US"`).
/// 3. System timezone.
pub fn detect_time_format(timezone: Option<&str>, explicit: Option<&str>) -> bool {
    if let Some(fmt) = explicit {
        match fmt.to_lowercase().as_str() {
            "12h" => return true,
            "24h" => return false,
            _ => {}
        }
    }

    let tz_to_check = timezone
        .map(|s| s.to_string())
        .unwrap_or_else(get_system_timezone);

    country_from_timezone(&tz_to_check)
        .map(|country| TWELVE_HOUR_COUNTRIES.contains(&country))
        .unwrap_or(false)
}

/// Heuristic: derive a 2-letter country code from an IANA timezone name.
fn country_from_timezone(tz: &str) -> Option<&'static str> {
    let lower = tz.to_lowercase();

    const PREFIXES: &[(&str, &str)] = &[
        ("america/mexico_city", "MX"),
        ("america/bogota", "CO"),
        ("america/caracas", "VE"),
        ("america/argentina/", "AR"),
        ("america/buenos_aires", "AR"),
        ("australia/", "AU"),
        ("pacific/auckland", "NZ"),
        ("pacific/chatham", "NZ"),
        ("asia/manila", "PH"),
        ("asia/kolkata", "IN"),
        ("asia/calcutta", "IN"),
        ("asia/karachi", "PK"),
        ("asia/dhaka", "BD"),
        ("asia/kuala_lumpur", "MY"),
        ("asia/kuching", "MY"),
        ("africa/cairo", "EG"),
        ("asia/riyadh", "SA"),
        ("asia/dubai", "AE"),
        ("asia/amman", "JO"),
        ("asia/tehran", "IR"),
    ];
    if let Some(&(_, country)) = PREFIXES.iter().find(|(p, _)| lower.starts_with(*p)) {
        return Some(country);
    }

    if let Some(city) = lower.strip_prefix("america/") {
        const CA_CITIES: &[&str] = &[
            "toronto",
            "vancouver",
            "montreal",
            "edmonton",
            "winnipeg",
            "halifax",
            "regina",
            "st_johns",
            "yellowknife",
        ];
        return Some(if CA_CITIES.contains(&city) { "CA" } else { "US" });
    }

    None
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    // ── TimezoneHandler ──────────────────────────────────────────────────────

    #[test]
    fn test_new_invalid_timezone_falls_back_to_utc() {
        assert_eq!(TimezoneHandler::new("Invalid/Timezone").default_tz(), Tz::UTC);
        assert_eq!(
            TimezoneHandler::new("America/New_York").default_tz(),
            Tz::America__New_York
        );
    }

    #[test]
    fn test_parse_timestamp_rfc3339() {
        let handler = TimezoneHandler::new("UTC");
        let dt = handler.parse_timestamp("2024-01-15T10:30:00Z").unwrap();
        assert_eq!((dt.hour(), dt.minute()), (10, 30));

        let dt = handler.parse_timestamp("2024-01-15T12:00:00+02:00").unwrap();
        assert_eq!(dt.hour(), 10);
    }

    #[test]
    fn test_parse_timestamp_sqlite_naive() {
        let handler = TimezoneHandler::new("UTC");
        let dt = handler.parse_timestamp("2024-01-15 08:05:00").unwrap();
        assert_eq!((dt.hour(), dt.minute()), (8, 5));
    }

    #[test]
    fn test_parse_timestamp_epoch_millis() {
        let handler = TimezoneHandler::new("UTC");
        let dt = handler.parse_timestamp("1700000000000").unwrap();
        assert_eq!(dt.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_parse_timestamp_garbage_returns_none() {
        let handler = TimezoneHandler::new("UTC");
        assert!(handler.parse_timestamp("").is_none());
        assert!(handler.parse_timestamp("not-a-date").is_none());
    }

    #[test]
    fn test_format_for_list_same_day_and_other_day() {
        let handler = TimezoneHandler::new("UTC");
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap();
        let today = Utc.with_ymd_and_hms(2024, 6, 1, 14, 30, 0).unwrap();
        let earlier = Utc.with_ymd_and_hms(2024, 5, 28, 9, 5, 0).unwrap();

        assert_eq!(handler.format_for_list(today, now, false), "14:30");
        assert_eq!(handler.format_for_list(today, now, true), "02:30 PM");
        assert_eq!(handler.format_for_list(earlier, now, false), "May 28 09:05");
    }

    #[test]
    fn test_format_for_list_uses_local_day() {
        // 02:00 UTC on June 2 is still June 1 in New York.
        let handler = TimezoneHandler::new("America/New_York");
        let now = Utc.with_ymd_and_hms(2024, 6, 2, 2, 0, 0).unwrap();
        let dt = Utc.with_ymd_and_hms(2024, 6, 1, 20, 0, 0).unwrap();
        assert_eq!(handler.format_for_list(dt, now, false), "16:00");
    }

    // ── lenient_timestamp ────────────────────────────────────────────────────

    #[derive(serde::Deserialize)]
    struct Probe {
        #[serde(with = "lenient_timestamp")]
        at: DateTime<Utc>,
        #[serde(default, deserialize_with = "lenient_timestamp::deserialize_option")]
        maybe: Option<DateTime<Utc>>,
    }

    #[test]
    fn test_lenient_timestamp_accepts_all_shapes() {
        let a: Probe = serde_json::from_str(r#"{"at": 1700000000000}"#).unwrap();
        let b: Probe = serde_json::from_str(r#"{"at": "2023-11-14T22:13:20Z"}"#).unwrap();
        let c: Probe = serde_json::from_str(r#"{"at": "2023-11-14 22:13:20", "maybe": null}"#).unwrap();
        assert_eq!(a.at, b.at);
        assert_eq!(b.at, c.at);
        assert!(a.maybe.is_none() && c.maybe.is_none());

        let d: Probe =
            serde_json::from_str(r#"{"at": 0, "maybe": "2024-01-01T00:00:00Z"}"#).unwrap();
        assert!(d.maybe.is_some());
    }

    #[test]
    fn test_lenient_timestamp_rejects_garbage() {
        assert!(serde_json::from_str::<Probe>(r#"{"at": "yesterday"}"#).is_err());
        assert!(serde_json::from_str::<Probe>(r#"{"at": true}"#).is_err());
    }

    // ── detect_time_format ───────────────────────────────────────────────────

    #[test]
    fn test_detect_explicit() {
        assert!(detect_time_format(None, Some("12H")));
        assert!(!detect_time_format(None, Some("24h")));
    }

    #[test]
    fn test_detect_from_timezone() {
        assert!(detect_time_format(Some("America/Chicago"), None));
        assert!(detect_time_format(Some("America/Toronto"), None));
        assert!(detect_time_format(Some("Australia/Sydney"), None));
        assert!(detect_time_format(Some("Asia/Kolkata"), None));
        assert!(!detect_time_format(Some("Europe/Berlin"), None));
        assert!(!detect_time_format(Some("Asia/Tokyo"), None));
    }

    #[test]
    fn test_country_from_timezone() {
        assert_eq!(country_from_timezone("America/Toronto"), Some("CA"));
        assert_eq!(country_from_timezone("America/Denver"), Some("US"));
        assert_eq!(country_from_timezone("America/Mexico_City"), Some("MX"));
        assert_eq!(country_from_timezone("Asia/Manila"), Some("PH"));
        assert_eq!(country_from_timezone("Europe/Paris"), None);
    }

    #[test]
    fn test_get_system_timezone_returns_nonempty_string() {
        assert!(!get_system_timezone().is_empty());
    }
}
