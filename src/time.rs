// SPDX-License-Identifier: MIT OR Apache-2.0

//! Time facets of a record.
//!
//! Every time field of one record is derived from a single clock sample, so
//! `%(dateTime)` and `%(nanoSecond)` in the same line never disagree.
//!
//! ```rust
//! use chrono::{Local, TimeZone};
//! use filewise::TimeFacets;
//!
//! let sample = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
//! let facets = TimeFacets::at(&sample);
//! assert_eq!(facets.date, "2024-03-09");
//! assert_eq!(facets.date_time, "2024-03-09 07:05:01");
//! assert_eq!(facets.asc_time, "2024-03-09 07:05:01,000000000");
//! assert_eq!(facets.weekday, "Saturday");
//! ```

use chrono::{DateTime, Local, TimeZone, Timelike};
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimeFacets {
    /// `YYYY-MM-DD`
    pub date: String,
    /// `YYYY-MM-DD HH:MM:SS`
    pub date_time: String,
    /// `YYYY-MM-DD HH:MM:SS,nnnnnnnnn`
    pub asc_time: String,
    /// The nine nanosecond digits of `asc_time`
    pub nano_second: String,
    /// Seconds since the epoch
    pub unix_time: String,
    /// e.g. `Monday`
    pub weekday: String,
}

impl TimeFacets {
    /// Samples the local clock once.
    pub fn resolve() -> Self {
        Self::at(&Local::now())
    }

    /// Facets of a given instant.
    pub fn at<Tz: TimeZone>(t: &DateTime<Tz>) -> Self
    where
        Tz::Offset: Display,
    {
        let date_time = t.format("%Y-%m-%d %H:%M:%S").to_string();
        // leap seconds are reported in the following second's nanoseconds
        let nano_second = format!("{:09}", t.nanosecond() % 1_000_000_000);
        Self {
            date: date_time[..10].to_string(),
            asc_time: format!("{date_time},{nano_second}"),
            date_time,
            nano_second,
            unix_time: t.timestamp().to_string(),
            weekday: t.format("%A").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn facets_share_one_sample() {
        let sample = Utc.with_ymd_and_hms(2001, 9, 9, 1, 46, 40).unwrap()
            + chrono::Duration::nanoseconds(42);
        let facets = TimeFacets::at(&sample);
        assert_eq!(facets.unix_time, "1000000000");
        assert_eq!(facets.nano_second, "000000042");
        assert_eq!(facets.asc_time, "2001-09-09 01:46:40,000000042");
        assert_eq!(&facets.asc_time[..19], facets.date_time);
        assert_eq!(&facets.asc_time[20..], facets.nano_second);
        assert_eq!(&facets.date_time[..10], facets.date);
        assert_eq!(facets.weekday, "Sunday");
    }

    #[test]
    fn resolve_is_well_formed() {
        let facets = TimeFacets::resolve();
        assert_eq!(facets.asc_time.len(), 29);
        assert!(facets.nano_second.chars().all(|c| c.is_ascii_digit()));
        assert!(facets.unix_time.parse::<i64>().unwrap() > 0);
    }
}
