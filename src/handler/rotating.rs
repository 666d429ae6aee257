// SPDX-License-Identifier: MIT OR Apache-2.0

use super::common::{self, HandlerCore, Unnamed};
use super::{Handler, HandlerId};
use crate::Level;
use crate::callsite::CallSite;
use crate::error::Result;
use crate::registry::Registry;
use crate::rotation::size::{self, SizeRotation};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};

#[derive(Debug)]
struct State {
    core: HandlerCore,
    rotation: SizeRotation,
}

impl State {
    fn rotate(&mut self) -> Result<()> {
        self.core.close();
        size::shift_backups(&self.core.file_path(), self.rotation.backup_count());
        let metadata = self.core.reopen()?;
        self.rotation.seed(metadata.len());
        Ok(())
    }
}

/**
A handler that rotates its file by size.

Before a line that would push the file past [`max_file_size`](Self::max_file_size) is written,
`app.log` becomes `app.log.1`, `app.log.1` becomes `app.log.2` and so on, keeping at most
[`backup_count`](Self::backup_count) backups.

```rust
use filewise::{Handler, Level, RotatingHandler};

let dir = tempfile::tempdir().unwrap();
let handler = RotatingHandler::new(dir.path(), "app.log").unwrap();
handler.set_format_string("%(message)").unwrap();
handler.set_max_file_size(8).unwrap();
handler.set_backup_count(2);

for message in ["first", "second", "third"] {
    handler.write("app", Level::Debug, None, format_args!("{message}")).unwrap();
}
let read = |name: &str| std::fs::read_to_string(dir.path().join(name)).unwrap();
assert_eq!(read("app.log"), "third\n");
assert_eq!(read("app.log.1"), "second\n");
assert_eq!(read("app.log.2"), "first\n");
```
*/
#[derive(Debug)]
pub struct RotatingHandler {
    id: HandlerId,
    state: Mutex<State>,
}

impl RotatingHandler {
    /// Opens `dir/name` for appending.  An empty name is [`MissingFileName`](crate::Error::MissingFileName).
    pub fn new(dir: impl AsRef<Path>, name: &str) -> Result<Self> {
        let opened = common::open(dir.as_ref(), name, Unnamed::Reject)?;
        let mut rotation = SizeRotation::new();
        rotation.seed(opened.metadata().map_or(0, |m| m.len()));
        Ok(Self {
            id: Registry::global().next_handler_id(),
            state: Mutex::new(State {
                core: HandlerCore::new(opened),
                rotation,
            }),
        })
    }

    pub fn max_file_size(&self) -> u64 {
        self.state.lock().rotation.max_file_size()
    }

    /// Fails with [`InvalidArgument`](crate::Error::InvalidArgument) for zero.
    pub fn set_max_file_size(&self, size: u64) -> Result<()> {
        self.state.lock().rotation.set_max_file_size(size)
    }

    pub fn backup_count(&self) -> usize {
        self.state.lock().rotation.backup_count()
    }

    /// Zero keeps every backup.
    pub fn set_backup_count(&self, count: usize) {
        self.state.lock().rotation.set_backup_count(count);
    }

    /// Bytes in the primary file, as tracked by the handler.
    pub fn current_size(&self) -> u64 {
        self.state.lock().rotation.current_size()
    }
}

impl Handler for RotatingHandler {
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
        let size = opened.metadata().map_or(0, |m| m.len());
        state.core.install(opened);
        state.rotation.seed(size);
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
        let len = line.len() as u64;
        if state.rotation.should_rotate(len) {
            state.rotate()?;
        }
        state.core.emit(&line)?;
        state.rotation.record_write(len);
        Ok(())
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
        let handler = RotatingHandler::new(dir.path(), "r.log").unwrap();
        assert_eq!(handler.max_file_size(), 100 * 1024 * 1024);
        assert_eq!(handler.backup_count(), 30);
        assert_eq!(handler.current_size(), 0);
    }

    #[test]
    fn empty_name_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            RotatingHandler::new(dir.path(), ""),
            Err(Error::MissingFileName)
        ));
        let handler = RotatingHandler::new(dir.path(), "r.log").unwrap();
        assert!(matches!(
            handler.set_file_path(dir.path(), ""),
            Err(Error::MissingFileName)
        ));
        assert_eq!(handler.file_path(), dir.path().join("r.log"));
    }

    #[test]
    fn counter_is_seeded_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("seeded.log"), "0123456789").unwrap();
        let handler = RotatingHandler::new(dir.path(), "seeded.log").unwrap();
        assert_eq!(handler.current_size(), 10);

        fs::write(dir.path().join("other.log"), "abc").unwrap();
        handler.set_file_path(dir.path(), "other.log").unwrap();
        assert_eq!(handler.current_size(), 3);
    }

    #[test]
    fn zero_size_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let handler = RotatingHandler::new(dir.path(), "r.log").unwrap();
        assert!(matches!(
            handler.set_max_file_size(0),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(handler.max_file_size(), 100 * 1024 * 1024);
    }

    #[test]
    fn overflowing_line_goes_whole_to_fresh_file() {
        let dir = tempfile::tempdir().unwrap();
        let handler = RotatingHandler::new(dir.path(), "r.log").unwrap();
        handler.set_format_string("%(message)").unwrap();
        handler.set_max_file_size(10).unwrap();

        handler.write("t", Level::Debug, None, format_args!("aaaa")).unwrap();
        handler.write("t", Level::Debug, None, format_args!("bbbbbbbb")).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("r.log")).unwrap(), "bbbbbbbb\n");
        assert_eq!(fs::read_to_string(dir.path().join("r.log.1")).unwrap(), "aaaa\n");
        assert_eq!(handler.current_size(), 9);

        // larger than the limit on its own: rotates away the old file, then lands whole
        handler
            .write("t", Level::Debug, None, format_args!("cccccccccccccccc"))
            .unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("r.log")).unwrap(),
            "cccccccccccccccc\n"
        );
        assert_eq!(fs::read_to_string(dir.path().join("r.log.1")).unwrap(), "bbbbbbbb\n");
        assert_eq!(fs::read_to_string(dir.path().join("r.log.2")).unwrap(), "aaaa\n");
    }

    #[test]
    fn oversized_line_on_empty_file_stays_put() {
        let dir = tempfile::tempdir().unwrap();
        let handler = RotatingHandler::new(dir.path(), "big.log").unwrap();
        handler.set_format_string("%(message)").unwrap();
        handler.set_max_file_size(4).unwrap();

        handler.write("t", Level::Debug, None, format_args!("0123456789")).unwrap();
        assert!(!dir.path().join("big.log.1").exists());
        assert_eq!(handler.current_size(), 11);

        handler.write("t", Level::Debug, None, format_args!("ab")).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("big.log.1")).unwrap(), "0123456789\n");
        assert_eq!(fs::read_to_string(dir.path().join("big.log")).unwrap(), "ab\n");
    }

    #[test]
    fn failed_reopen_leaves_handler_closed() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        let handler = RotatingHandler::new(&sub, "r.log").unwrap();
        handler.set_format_string("%(message)").unwrap();
        handler.set_max_file_size(4).unwrap();
        handler.write("t", Level::Debug, None, format_args!("abc")).unwrap();

        fs::remove_dir_all(&sub).unwrap();
        assert!(matches!(
            handler.write("t", Level::Debug, None, format_args!("def")),
            Err(Error::Io { .. })
        ));
        assert!(matches!(
            handler.write("t", Level::Debug, None, format_args!("ghi")),
            Err(Error::Closed)
        ));
    }
}
