// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-write record.
//!
//! A [`Record`] is built by a handler for each write and dropped when the line has been
//! emitted.  Call-site and time facets are resolved on first use and memoized for the
//! lifetime of the record, so a template that names several time fields samples the
//! clock once, and a template that names none never samples it.

use crate::Level;
use crate::callsite::{CallSite, ResolvedCallSite};
use crate::format::Field;
use crate::time::TimeFacets;
use std::cell::OnceCell;

/// One write: logger name, level, formatted message and optional call site.
#[derive(Debug, Clone)]
pub struct Record<'a> {
    name: &'a str,
    level: Level,
    message: String,
    call_site: Option<CallSite>,
    resolved: OnceCell<ResolvedCallSite>,
    time: OnceCell<TimeFacets>,
}

impl<'a> Record<'a> {
    /// Creates a record with no facets resolved yet.
    pub fn new(name: &'a str, level: Level, message: String, call_site: Option<CallSite>) -> Self {
        Self {
            name,
            level,
            message,
            call_site,
            resolved: OnceCell::new(),
            time: OnceCell::new(),
        }
    }

    /// Pins the time facets instead of sampling the clock.
    pub fn with_time(self, time: TimeFacets) -> Self {
        Self {
            time: OnceCell::from(time),
            ..self
        }
    }

    /// The name of the logger that produced the record.
    pub fn name(&self) -> &str {
        self.name
    }

    /// The level the record was logged at.
    pub fn level(&self) -> Level {
        self.level
    }

    /// The formatted message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Resolves the call site on first use.
    pub fn call_site(&self) -> &ResolvedCallSite {
        self.resolved.get_or_init(|| match &self.call_site {
            Some(site) => site.resolve(),
            None => ResolvedCallSite::unknown(),
        })
    }

    /// Samples the clock on first use.
    pub fn time(&self) -> &TimeFacets {
        self.time.get_or_init(TimeFacets::resolve)
    }

    /// The rendered value of one field.
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Name => self.name,
            Field::LevelName => self.level.name(),
            Field::Message => &self.message,
            Field::PathName => &self.call_site().path,
            Field::FileName => &self.call_site().file,
            Field::FuncName => &self.call_site().func,
            Field::LineNo => &self.call_site().line,
            Field::Date => &self.time().date,
            Field::UnixTime => &self.time().unix_time,
            Field::DateTime => &self.time().date_time,
            Field::Weekday => &self.time().weekday,
            Field::NanoSecond => &self.time().nano_second,
            Field::AscTime => &self.time().asc_time,
        }
    }
}

/*
Boilerplate notes for Record:

- Clone: derived; the memoized facets clone along with it.
- PartialEq/Eq/Hash: not implemented.  Two records with the same inputs may differ only
  in whether their facets have been resolved yet, and "equal" would then be unclear.
- Default: not sensible, a record always belongs to a logger and a level.
- Send: automatic.  Sync: not implemented, OnceCell is not Sync; a record is owned by one write.
 */

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    #[test]
    fn time_is_sampled_once() {
        let record = Record::new("r", Level::Debug, String::new(), None);
        let first = record.field(Field::AscTime).to_string();
        std::thread::sleep(std::time::Duration::from_millis(2));
        assert_eq!(record.field(Field::AscTime), first);
        assert_eq!(record.field(Field::NanoSecond), &first[20..]);
    }

    #[test]
    fn pinned_time() {
        let sample = Local.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
        let record =
            Record::new("r", Level::Error, "m".into(), None).with_time(TimeFacets::at(&sample));
        assert_eq!(record.field(Field::DateTime), "2020-01-02 03:04:05");
        assert_eq!(record.field(Field::Weekday), "Thursday");
        assert_eq!(record.field(Field::LevelName), "ERROR");
        assert_eq!(record.field(Field::Message), "m");
    }

    #[test]
    fn call_site_fields() {
        let site = CallSite::new("src/lib.rs", 12, Some("app::run::__filewise_here"));
        let record = Record::new("r", Level::Debug, String::new(), Some(site));
        assert_eq!(record.field(Field::PathName), "src/lib.rs");
        assert_eq!(record.field(Field::FileName), "lib.rs");
        assert_eq!(record.field(Field::LineNo), "12");
        assert_eq!(record.field(Field::FuncName), "app::run");
    }
}
