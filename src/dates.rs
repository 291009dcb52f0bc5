//! ISO-8601 formatting for chrono date-times.

use chrono::{DateTime, TimeZone, Utc};
use std::fmt::Display;

use crate::constants::{ISO8601_DATE, ISO8601_DATETIME};

/// Format as `YYYY-MM-DD` in the value's own time zone
pub fn format_iso8601_date<Tz>(value: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    value.format(ISO8601_DATE).to_string()
}

/// Format as `YYYY-MM-DDTHH:MM:SSZ`, converting to UTC first
///
/// A value in another zone prints its UTC instant. The local wall time is
/// never written next to a literal `Z`.
pub fn format_iso8601_datetime<Tz: TimeZone>(value: &DateTime<Tz>) -> String {
    value.with_timezone(&Utc).format(ISO8601_DATETIME).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    /// 2025-08-15 at 2PM UTC
    fn test_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 15, 14, 0, 0).unwrap()
    }

    #[test]
    fn test_format_iso8601_date() {
        assert_eq!(format_iso8601_date(&test_date()), "2025-08-15");
    }

    #[test]
    fn test_format_iso8601_datetime() {
        assert_eq!(format_iso8601_datetime(&test_date()), "2025-08-15T14:00:00Z");
    }

    #[test]
    fn test_datetime_is_normalised_to_utc() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let local = offset.with_ymd_and_hms(2025, 8, 16, 1, 30, 0).unwrap();

        assert_eq!(format_iso8601_date(&local), "2025-08-16");
        assert_eq!(format_iso8601_datetime(&local), "2025-08-15T23:30:00Z");
    }
}
