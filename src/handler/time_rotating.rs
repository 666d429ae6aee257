// SPDX-License-Identifier: MIT OR Apache-2.0

use super::common::{self, HandlerCore, Unnamed};
use super::{Handler, HandlerId};
use crate::Level;
use crate::callsite::CallSite;
use crate::error::Result;
use crate::registry::Registry;
use crate::rotation::rename_backup;
use crate::rotation::time::{self, Period, TimeRotation};
use crate::sys;
use chrono::{DateTime, Local};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};

#[derive(Debug)]
struct State {
    core: HandlerCore,
    rotation: TimeRotation,
}

impl State {
    fn rotate(&mut self) -> Result<()> {
        self.core.close();
        let path = self.core.file_path();
        rename_backup(&path, &time::backup_path(&path, self.rotation.file_tag()));
        time::prune_backups(
            self.core.dir(),
            self.core.name(),
            &self.rotation.period(),
            self.rotation.backup_count(),
        );
        let metadata = self.core.reopen()?;
        self.rotation.set_create_time(sys::created_at(&metadata));
        Ok(())
    }
}

/**
A handler that rotates its file on a schedule.

The schedule is set with [`set_when`](Self::set_when) and counted from the creation time of the
primary file, as recorded by the filesystem.  The first write after the deadline moves
`app.log` to `app.log.<tag>`, where the tag is the creation time at the period's granularity,
and keeps the newest [`backup_count`](Self::backup_count) tagged backups.

```rust
use filewise::TimeRotatingHandler;

let dir = tempfile::tempdir().unwrap();
let handler = TimeRotatingHandler::new(dir.path(), "app.log").unwrap();
assert_eq!(handler.when(), "1d");

let before = handler.rotate_time();
assert!(handler.set_when("1999dddd").is_err());
assert_eq!(handler.rotate_time(), before);

handler.set_when("30s").unwrap();
assert_eq!(handler.file_tag().len(), "YYYY-MM-DD HH:MM:SS".len());
```
*/
#[derive(Debug)]
pub struct TimeRotatingHandler {
    id: HandlerId,
    state: Mutex<State>,
}

impl TimeRotatingHandler {
    /// Opens `dir/name` for appending.  An empty name is [`MissingFileName`](crate::Error::MissingFileName).
    pub fn new(dir: impl AsRef<Path>, name: &str) -> Result<Self> {
        let opened = common::open(dir.as_ref(), name, Unnamed::Reject)?;
        let created = opened.metadata().map_or_else(Local::now, sys::created_at);
        Ok(Self {
            id: Registry::global().next_handler_id(),
            state: Mutex::new(State {
                core: HandlerCore::new(opened),
                rotation: TimeRotation::new(created),
            }),
        })
    }

    /// The period, as `<count><s|h|d>`.
    pub fn when(&self) -> String {
        self.state.lock().rotation.period().to_string()
    }

    /**
    Sets the period and recomputes the deadline from the current file's creation time.

    A malformed period is [`InvalidArgument`](crate::Error::InvalidArgument) and changes nothing.
    */
    pub fn set_when(&self, when: &str) -> Result<()> {
        let period: Period = when.parse()?;
        self.state.lock().rotation.set_period(period);
        Ok(())
    }

    pub fn backup_count(&self) -> usize {
        self.state.lock().rotation.backup_count()
    }

    /// Zero disables pruning.
    pub fn set_backup_count(&self, count: usize) {
        self.state.lock().rotation.set_backup_count(count);
    }

    /// When the current file was created.
    pub fn create_time(&self) -> DateTime<Local> {
        self.state.lock().rotation.create_time()
    }

    /// The next deadline, or `None` if it is beyond what the calendar represents.
    pub fn rotate_time(&self) -> Option<DateTime<Local>> {
        self.state.lock().rotation.rotate_time()
    }

    /// The tag the current file will get when it is rotated.
    pub fn file_tag(&self) -> String {
        self.state.lock().rotation.file_tag().to_string()
    }
}

impl Handler for TimeRotatingHandler {
    fn id(&self) -> HandlerId {
        self.id
    }

    fn log_level(&self) -> Level {
        self.state.lock().core.level()
    }

    fn set_log_level(&self, level: Level) {
        self.state.lock().core.set_level(level);
    }

    fn set_format_string(&self, template: &str) -> Result<()> {
        self.state.lock().core.set_format_string(template)
    }

    fn format_string(&self) -> Option<String> {
        self.state.lock().core.format_string()
    }

    fn set_file_path(&self, dir: &Path, name: &str) -> Result<()> {
        let mut state = self.state.lock();
        let opened = common::open(dir, name, Unnamed::Reject)?;
        let created = opened.metadata().map_or_else(Local::now, sys::created_at);
        state.core.install(opened);
        state.rotation.set_create_time(created);
        Ok(())
    }

    fn file_path(&self) -> PathBuf {
        self.state.lock().core.file_path()
    }

    fn write(
        &self,
        name: &str,
        level: Level,
        call_site: Option<CallSite>,
        args: std::fmt::Arguments<'_>,
    ) -> Result<()> {
        let mut state = self.state.lock();
        let line = state.core.render(name, level, call_site, args)?;
        if state.rotation.is_due(Local::now()) {
            state.rotate()?;
        }
        state.core.emit(&line)
    }

    fn close(&self) {
        self.state.lock().core.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::fs;

    #[test]
    fn defaults() {
        let dir = tempfile::tempdir().unwrap();
        let handler = TimeRotatingHandler::new(dir.path(), "t.log").unwrap();
        assert_eq!(handler.when(), "1d");
        assert_eq!(handler.backup_count(), 30);
        assert_eq!(handler.file_tag(), handler.create_time().format("%Y-%m-%d").to_string());
        assert!(handler.rotate_time().unwrap() > handler.create_time());
    }

    #[test]
    fn empty_name_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            TimeRotatingHandler::new(dir.path(), ""),
            Err(Error::MissingFileName)
        ));
    }

    #[test]
    fn malformed_when_keeps_schedule() {
        let dir = tempfile::tempdir().unwrap();
        let handler = TimeRotatingHandler::new(dir.path(), "t.log").unwrap();
        handler.set_when("2h").unwrap();
        let deadline = handler.rotate_time();
        for bad in ["1999dddd", "d111d", "1111sd"] {
            assert!(matches!(handler.set_when(bad), Err(Error::InvalidArgument(_))));
            assert_eq!(handler.rotate_time(), deadline);
            assert_eq!(handler.when(), "2h");
        }
    }

    #[test]
    fn set_when_recomputes_from_create_time() {
        let dir = tempfile::tempdir().unwrap();
        let handler = TimeRotatingHandler::new(dir.path(), "t.log").unwrap();
        handler.set_when("30s").unwrap();
        let created = handler.create_time();
        assert_eq!(
            handler.rotate_time(),
            Some(created + chrono::TimeDelta::seconds(30))
        );
        assert_eq!(
            handler.file_tag(),
            created.format("%Y-%m-%d %H:%M:%S").to_string()
        );
    }

    #[test]
    fn no_rotation_before_deadline() {
        let dir = tempfile::tempdir().unwrap();
        let handler = TimeRotatingHandler::new(dir.path(), "t.log").unwrap();
        handler.set_when("1000s").unwrap();
        handler.set_format_string("%(message)").unwrap();
        for i in 0..3 {
            handler.write("t", Level::Debug, None, format_args!("{i}")).unwrap();
        }
        assert_eq!(fs::read_to_string(dir.path().join("t.log")).unwrap(), "0\n1\n2\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
