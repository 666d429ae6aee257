// SPDX-License-Identifier: MIT OR Apache-2.0

//! Time-based rotation.
//!
//! A rotation period is written `<count><unit>`, where the unit is `s`, `h` or `d`:
//!
//! ```rust
//! use filewise::rotation::time::{Period, PeriodUnit};
//!
//! let period: Period = "12h".parse().unwrap();
//! assert_eq!(period.count(), 12);
//! assert_eq!(period.unit(), PeriodUnit::Hours);
//! assert!("1999dddd".parse::<Period>().is_err());
//! ```
//!
//! The deadline is computed from the primary file's *creation* time:
//!
//! | Unit | Deadline                                      | Tag of the rotated file |
//! |------|-----------------------------------------------|-------------------------|
//! | `s`  | creation + `count` seconds                    | `YYYY-MM-DD HH:MM:SS`   |
//! | `h`  | start of the creation hour + `count` hours    | `YYYY-MM-DD HH`         |
//! | `d`  | local midnight of the creation day + `count` days | `YYYY-MM-DD`        |
//!
//! so `1h` rotates on the hour and `1d` at midnight.  The first write after the deadline
//! renames the primary file to `<name>.<tag>`, prunes all but the newest `backup_count`
//! tagged files (the fixed-width tags sort lexicographically in time order), and opens a
//! fresh file.

use super::{remove_backup, with_suffix};
use crate::diagnostics::{self, Diagnostic};
use crate::error::{Error, Result};
use chrono::{DateTime, Days, Local, TimeDelta, TimeZone, Timelike};
use regex::Regex;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;

pub const DEFAULT_PERIOD: Period = Period {
    count: 1,
    unit: PeriodUnit::Days,
};
pub const DEFAULT_BACKUP_COUNT: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodUnit {
    Seconds,
    Hours,
    Days,
}

impl PeriodUnit {
    fn suffix(self) -> char {
        match self {
            PeriodUnit::Seconds => 's',
            PeriodUnit::Hours => 'h',
            PeriodUnit::Days => 'd',
        }
    }

    fn tag_format(self) -> &'static str {
        match self {
            PeriodUnit::Seconds => "%Y-%m-%d %H:%M:%S",
            PeriodUnit::Hours => "%Y-%m-%d %H",
            PeriodUnit::Days => "%Y-%m-%d",
        }
    }

    fn tag_pattern(self) -> &'static str {
        match self {
            PeriodUnit::Seconds => r"\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}",
            PeriodUnit::Hours => r"\d{4}-\d{2}-\d{2} \d{2}",
            PeriodUnit::Days => r"\d{4}-\d{2}-\d{2}",
        }
    }
}

/// How long a primary file lives before rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    count: u32,
    unit: PeriodUnit,
}

fn period_grammar() -> Option<&'static Regex> {
    static GRAMMAR: OnceLock<Option<Regex>> = OnceLock::new();
    GRAMMAR
        .get_or_init(|| Regex::new(r"^\d+[shd]$").ok())
        .as_ref()
}

impl Period {
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn unit(&self) -> PeriodUnit {
        self.unit
    }

    /// When a file created at `created` is due for rotation.
    ///
    /// `None` if the deadline is past what the calendar can represent, which means never.
    pub fn deadline(&self, created: DateTime<Local>) -> Option<DateTime<Local>> {
        match self.unit {
            PeriodUnit::Seconds => {
                created.checked_add_signed(TimeDelta::seconds(i64::from(self.count)))
            }
            PeriodUnit::Hours => {
                let hour = created
                    .with_nanosecond(0)
                    .and_then(|t| t.with_second(0))
                    .and_then(|t| t.with_minute(0))
                    .unwrap_or(created);
                hour.checked_add_signed(TimeDelta::hours(i64::from(self.count)))
            }
            PeriodUnit::Days => {
                let midnight = created
                    .date_naive()
                    .and_hms_opt(0, 0, 0)
                    .and_then(|naive| Local.from_local_datetime(&naive).earliest())
                    .unwrap_or(created);
                midnight.checked_add_days(Days::new(u64::from(self.count)))
            }
        }
    }

    /// The tag of a file created at `created`, at this period's granularity.
    pub fn file_tag(&self, created: DateTime<Local>) -> String {
        created.format(self.unit.tag_format()).to_string()
    }

    /// Matches the names of the backups of `file_name` for this period's unit.
    pub fn backup_matcher(&self, file_name: &str) -> Result<Regex> {
        let pattern = format!(
            r"^{}\.{}$",
            regex::escape(file_name),
            self.unit.tag_pattern()
        );
        Regex::new(&pattern).map_err(|e| Error::InvalidArgument(e.to_string()))
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if !period_grammar().is_some_and(|grammar| grammar.is_match(s)) {
            return Err(Error::InvalidArgument(format!("error format of when: {s:?}")));
        }
        let (digits, unit) = s.split_at(s.len() - 1);
        let count: u32 = digits
            .parse()
            .map_err(|_| Error::InvalidArgument(format!("rotation period {s:?} is too long")))?;
        if count == 0 {
            return Err(Error::InvalidArgument(format!(
                "rotation period {s:?} must be positive"
            )));
        }
        let unit = match unit {
            "s" => PeriodUnit::Seconds,
            "h" => PeriodUnit::Hours,
            _ => PeriodUnit::Days,
        };
        Ok(Period { count, unit })
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.count, self.unit.suffix())
    }
}

impl Default for Period {
    fn default() -> Self {
        DEFAULT_PERIOD
    }
}

/**
Rotation state of one time-rotating handler.

Invariant: `rotate_time` and `file_tag` are derived from the current `create_time` and
`period`, and recomputed whenever either changes.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRotation {
    period: Period,
    backup_count: usize,
    create_time: DateTime<Local>,
    rotate_time: Option<DateTime<Local>>,
    file_tag: String,
}

impl TimeRotation {
    pub fn new(create_time: DateTime<Local>) -> Self {
        let period = DEFAULT_PERIOD;
        Self {
            period,
            backup_count: DEFAULT_BACKUP_COUNT,
            create_time,
            rotate_time: period.deadline(create_time),
            file_tag: period.file_tag(create_time),
        }
    }

    fn derive(&mut self) {
        self.rotate_time = self.period.deadline(self.create_time);
        self.file_tag = self.period.file_tag(self.create_time);
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn set_period(&mut self, period: Period) {
        self.period = period;
        self.derive();
    }

    pub fn create_time(&self) -> DateTime<Local> {
        self.create_time
    }

    pub fn set_create_time(&mut self, create_time: DateTime<Local>) {
        self.create_time = create_time;
        self.derive();
    }

    pub fn rotate_time(&self) -> Option<DateTime<Local>> {
        self.rotate_time
    }

    pub fn file_tag(&self) -> &str {
        &self.file_tag
    }

    pub fn backup_count(&self) -> usize {
        self.backup_count
    }

    pub fn set_backup_count(&mut self, count: usize) {
        self.backup_count = count;
    }

    /// True once `now` is past the deadline.
    pub fn is_due(&self, now: DateTime<Local>) -> bool {
        self.rotate_time.is_some_and(|deadline| now > deadline)
    }
}

/// `<path>.<tag>`
pub fn backup_path(path: &Path, tag: &str) -> PathBuf {
    with_suffix(path, tag)
}

/// Backups of `file_name` in `dir` for `period`'s unit, newest first.
pub fn list_backups(dir: &Path, file_name: &str, period: &Period) -> std::io::Result<Vec<PathBuf>> {
    let matcher = period
        .backup_matcher(file_name)
        .map_err(std::io::Error::other)?;
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if matcher.is_match(name) {
                names.push(name.to_string());
            }
        }
    }
    names.sort_unstable_by(|a, b| b.cmp(a));
    Ok(names.into_iter().map(|name| dir.join(name)).collect())
}

/// Deletes every backup beyond the newest `backup_count`.  Zero keeps everything.
pub fn prune_backups(dir: &Path, file_name: &str, period: &Period, backup_count: usize) {
    if backup_count == 0 {
        return;
    }
    match list_backups(dir, file_name, period) {
        Ok(backups) => {
            for expired in backups.iter().skip(backup_count) {
                remove_backup(expired);
            }
        }
        Err(e) => diagnostics::report(Diagnostic::BackupScan {
            dir: dir.to_path_buf(),
            error: e.to_string(),
        }),
    }
}
