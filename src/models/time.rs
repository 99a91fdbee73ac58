use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Minutes in one day; availability templates address time as minute-of-day.
pub const MINUTES_PER_DAY: u16 = 1440;

/// Day of the week an availability template repeats on.
///
/// Owned enum rather than `chrono::Weekday` so the wire format stays a plain
/// lowercase string regardless of the chrono version in use.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// Check whether a calendar date falls on this weekday.
    pub fn matches(&self, date: NaiveDate) -> bool {
        chrono::Datelike::weekday(&date) == self.to_chrono()
    }

    pub fn to_chrono(self) -> Weekday {
        match self {
            DayOfWeek::Monday => Weekday::Mon,
            DayOfWeek::Tuesday => Weekday::Tue,
            DayOfWeek::Wednesday => Weekday::Wed,
            DayOfWeek::Thursday => Weekday::Thu,
            DayOfWeek::Friday => Weekday::Fri,
            DayOfWeek::Saturday => Weekday::Sat,
            DayOfWeek::Sunday => Weekday::Sun,
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(w: Weekday) -> Self {
        match w {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

/// Resolve a (date, minute-of-day) pair to a concrete UTC instant.
///
/// A minute of exactly 1440 denotes midnight of the following day, which lets
/// templates describe windows that run to end-of-day.
pub fn minute_of_day_instant(date: NaiveDate, minute: u16) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc() + Duration::minutes(minute as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_of_week_matches() {
        // 2026-08-31 is a Monday.
        let date = NaiveDate::from_ymd_opt(2026, 8, 31).unwrap();
        assert!(DayOfWeek::Monday.matches(date));
        assert!(!DayOfWeek::Tuesday.matches(date));
    }

    #[test]
    fn test_day_of_week_chrono_roundtrip() {
        for day in [
            DayOfWeek::Monday,
            DayOfWeek::Tuesday,
            DayOfWeek::Wednesday,
            DayOfWeek::Thursday,
            DayOfWeek::Friday,
            DayOfWeek::Saturday,
            DayOfWeek::Sunday,
        ] {
            assert_eq!(DayOfWeek::from(day.to_chrono()), day);
        }
    }

    #[test]
    fn test_minute_of_day_instant() {
        let date = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let instant = minute_of_day_instant(date, 9 * 60 + 30);
        assert_eq!(instant.to_rfc3339(), "2026-06-01T09:30:00+00:00");
    }

    #[test]
    fn test_minute_of_day_end_of_day() {
        let date = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let instant = minute_of_day_instant(date, MINUTES_PER_DAY);
        assert_eq!(instant.to_rfc3339(), "2026-06-02T00:00:00+00:00");
    }

    #[test]
    fn test_day_of_week_serde() {
        let json = serde_json::to_string(&DayOfWeek::Wednesday).unwrap();
        assert_eq!(json, "\"wednesday\"");
        let back: DayOfWeek = serde_json::from_str(&json).unwrap();
        assert_eq!(back, DayOfWeek::Wednesday);
    }
}
