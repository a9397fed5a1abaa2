use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat, Utc};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Source of "now" and "today" in one fixed civil timezone.
///
/// Host local time is never consulted, so the same instant maps to the same
/// calendar day wherever the service is deployed.
#[derive(Debug, Clone, Copy)]
pub struct CivilClock {
    offset: FixedOffset,
    pinned_today: Option<NaiveDate>,
}

impl CivilClock {
    pub fn new(offset: FixedOffset, pinned_today: Option<NaiveDate>) -> Self {
        Self {
            offset,
            pinned_today,
        }
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.at(Utc::now())
    }

    pub fn at(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.offset)
    }

    pub fn today(&self) -> NaiveDate {
        self.pinned_today
            .unwrap_or_else(|| self.now().date_naive())
    }

    /// ISO-8601 timestamp carrying the clock's offset.
    pub fn timestamp(&self, instant: DateTime<Utc>) -> String {
        format_timestamp(self.at(instant))
    }
}

pub fn format_timestamp(instant: DateTime<FixedOffset>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, false)
}

pub fn parse_civil_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    // chrono accepts unpadded fields, so pin the shape first
    if value.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

pub fn format_civil_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Long form used in captions, e.g. "March 1, 2025".
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn pacific() -> FixedOffset {
        FixedOffset::west_opt(8 * 3600).unwrap()
    }

    #[test]
    fn test_civil_date_uses_fixed_offset() {
        let clock = CivilClock::new(pacific(), None);
        // 05:00 UTC on March 2nd is still March 1st at -08:00
        let instant = Utc.with_ymd_and_hms(2025, 3, 2, 5, 0, 0).unwrap();
        assert_eq!(
            clock.at(instant).date_naive(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
    }

    #[test]
    fn test_now_uses_fixed_offset() {
        let clock = CivilClock::new(pacific(), None);
        assert_eq!(clock.now().offset().local_minus_utc(), -8 * 3600);
        assert!(format_timestamp(clock.now()).ends_with("-08:00"));
    }

    #[test]
    fn test_pinned_today() {
        let pinned = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let clock = CivilClock::new(pacific(), Some(pinned));
        assert_eq!(clock.today(), pinned);
    }

    #[test]
    fn test_timestamp_carries_offset() {
        let clock = CivilClock::new(pacific(), None);
        let instant = Utc.with_ymd_and_hms(2025, 3, 2, 5, 0, 0).unwrap();
        assert_eq!(clock.timestamp(instant), "2025-03-01T21:00:00.000-08:00");
    }

    #[test]
    fn test_parse_civil_date() {
        assert_eq!(
            parse_civil_date("2025-01-15"),
            NaiveDate::from_ymd_opt(2025, 1, 15)
        );
        assert_eq!(parse_civil_date("2025-1-15"), None);
        assert_eq!(parse_civil_date("2025-02-30"), None);
        assert_eq!(parse_civil_date("yesterday"), None);
        assert_eq!(parse_civil_date(""), None);
    }

    #[test]
    fn test_format_long_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(format_long_date(date), "March 1, 2025");
        assert_eq!(format_civil_date(date), "2025-03-01");
    }
}
