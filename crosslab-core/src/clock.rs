//! Market-timezone capability used by the time-of-day filter.
//!
//! The clock is chosen once at strategy construction: a `ZonedClock` when the
//! configured IANA name parses, `UtcClock` otherwise.

use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;
use tracing::warn;

/// Converts bar timestamps into the market's local wall-clock hour.
pub trait MarketClock: Send + Sync + std::fmt::Debug {
    /// Local hour (0-23) for a UTC timestamp.
    fn local_hour(&self, ts: DateTime<Utc>) -> u32;

    /// Timezone label for logs and rejection reasons.
    fn zone_name(&self) -> &str;
}

/// Pure-UTC clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct UtcClock;

impl MarketClock for UtcClock {
    fn local_hour(&self, ts: DateTime<Utc>) -> u32 {
        ts.hour()
    }

    fn zone_name(&self) -> &str {
        "UTC"
    }
}

/// Clock backed by the IANA timezone database (DST aware).
#[derive(Debug, Clone)]
pub struct ZonedClock {
    tz: Tz,
    name: String,
}

impl ZonedClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz, name: tz.name().to_string() }
    }
}

impl MarketClock for ZonedClock {
    fn local_hour(&self, ts: DateTime<Utc>) -> u32 {
        ts.with_timezone(&self.tz).hour()
    }

    fn zone_name(&self) -> &str {
        &self.name
    }
}

/// Build the clock for a configured timezone name, falling back to UTC.
pub fn clock_for(timezone: &str) -> Box<dyn MarketClock> {
    let name = timezone.trim();
    if name.is_empty() || name.eq_ignore_ascii_case("UTC") {
        return Box::new(UtcClock);
    }
    match name.parse::<Tz>() {
        Ok(tz) => Box::new(ZonedClock::new(tz)),
        Err(err) => {
            warn!(timezone = name, error = %err, "invalid market timezone, falling back to UTC");
            Box::new(UtcClock)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn utc_clock_returns_utc_hour() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).unwrap();
        assert_eq!(UtcClock.local_hour(ts), 14);
    }

    #[test]
    fn new_york_winter_offset() {
        let clock = clock_for("America/New_York");
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).unwrap();
        assert_eq!(clock.local_hour(ts), 9);
        assert_eq!(clock.zone_name(), "America/New_York");
    }

    #[test]
    fn new_york_summer_offset() {
        let clock = clock_for("America/New_York");
        let ts = Utc.with_ymd_and_hms(2024, 7, 15, 14, 30, 0).unwrap();
        assert_eq!(clock.local_hour(ts), 10);
    }

    #[test]
    fn invalid_timezone_falls_back_to_utc() {
        let clock = clock_for("Mars/Olympus_Mons");
        assert_eq!(clock.zone_name(), "UTC");
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 3, 0, 0).unwrap();
        assert_eq!(clock.local_hour(ts), 3);
    }

    #[test]
    fn empty_timezone_is_utc() {
        assert_eq!(clock_for("").zone_name(), "UTC");
        assert_eq!(clock_for("utc").zone_name(), "UTC");
    }
}
