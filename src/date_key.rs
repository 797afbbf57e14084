//! Canonical `YYYY-MM-DD` keys for date-scoped attendance lookups.

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar day used as the equality key for attendance records.
///
/// A key is built from the *local* calendar fields of a date, never from a UTC
/// conversion, so a late-evening selection stays on the day the user picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// Builds a key from the year, month and day of `moment` in its own time zone.
    pub fn from_local<Tz: TimeZone>(moment: &DateTime<Tz>) -> Self {
        Self(moment.date_naive())
    }

    /// Normalizes an optional calendar selection. No selection yields no key.
    pub fn normalize<Tz: TimeZone>(selection: Option<&DateTime<Tz>>) -> Option<Self> {
        selection.map(Self::from_local)
    }

    /// The key for the current day in the machine's local time zone.
    pub fn today() -> Self {
        Self::from_local(&Local::now())
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn as_date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day()
        )
    }
}

impl FromStr for DateKey {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn pads_month_and_day() {
        let key = DateKey::from_ymd(2024, 3, 5).unwrap();
        assert_eq!(key.to_string(), "2024-03-05");

        let key = DateKey::from_ymd(2024, 11, 23).unwrap();
        assert_eq!(key.to_string(), "2024-11-23");
    }

    #[test]
    fn uses_local_fields_instead_of_utc() {
        let eastern = FixedOffset::west_opt(5 * 3600).unwrap();
        let evening = eastern.with_ymd_and_hms(2024, 3, 5, 23, 30, 0).unwrap();

        assert_eq!(DateKey::from_local(&evening).to_string(), "2024-03-05");
        assert_eq!(
            DateKey::from_local(&evening.with_timezone(&Utc)).to_string(),
            "2024-03-06"
        );
    }

    #[test]
    fn same_local_day_gives_same_key() {
        let offset = FixedOffset::east_opt(9 * 3600).unwrap();
        let morning = offset.with_ymd_and_hms(2024, 3, 5, 0, 1, 0).unwrap();
        let night = offset.with_ymd_and_hms(2024, 3, 5, 23, 59, 59).unwrap();

        assert_eq!(DateKey::from_local(&morning), DateKey::from_local(&night));
    }

    #[test]
    fn missing_selection_has_no_key() {
        assert_eq!(DateKey::normalize::<Utc>(None), None);

        let now = Utc::now();
        assert_eq!(DateKey::normalize(Some(&now)), Some(DateKey::from_local(&now)));
    }

    #[test]
    fn parses_cli_input() {
        let key: DateKey = "2024-03-05".parse().unwrap();
        assert_eq!(key, DateKey::from_ymd(2024, 3, 5).unwrap());
        assert!("2024-13-01".parse::<DateKey>().is_err());
        assert!("yesterday".parse::<DateKey>().is_err());
    }
}
