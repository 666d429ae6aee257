// SPDX-License-Identifier: MIT OR Apache-2.0

use super::common::{self, HandlerCore, Unnamed};
use super::{Handler, HandlerId};
use crate::Level;
use crate::callsite::CallSite;
use crate::error::Result;
use crate::registry::Registry;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};

/**
A handler without rotation.

With an empty file name it writes to stdout.

```rust
use filewise::{BasicHandler, Handler};

let console = BasicHandler::new("", "").unwrap();
assert_eq!(console.file_path(), std::path::PathBuf::from("."));
```
*/
#[derive(Debug)]
pub struct BasicHandler {
    id: HandlerId,
    core: Mutex<HandlerCore>,
}

impl BasicHandler {
    /// Opens `dir/name` for appending, or stdout if `name` is empty.
    pub fn new(dir: impl AsRef<Path>, name: &str) -> Result<Self> {
        let opened = common::open(dir.as_ref(), name, Unnamed::Stdout)?;
        Ok(Self {
            id: Registry::global().next_handler_id(),
            core: Mutex::new(HandlerCore::new(opened)),
        })
    }
}

impl Handler for BasicHandler {
    fn id(&self) -> HandlerId {
        self.id
    }

    fn log_level(&self) -> Level {
        self.core.lock().level()
    }

    fn set_log_level(&self, level: Level) {
        self.core.lock().set_level(level);
    }

    fn set_format_string(&self, template: &str) -> Result<()> {
        self.core.lock().set_format_string(template)
    }

    fn format_string(&self) -> Option<String> {
        self.core.lock().format_string()
    }

    fn set_file_path(&self, dir: &Path, name: &str) -> Result<()> {
        let mut core = self.core.lock();
        let opened = common::open(dir, name, Unnamed::Stdout)?;
        core.install(opened);
        Ok(())
    }

    fn file_path(&self) -> PathBuf {
        self.core.lock().file_path()
    }

    fn write(
        &self,
        name: &str,
        level: Level,
        call_site: Option<CallSite>,
        args: std::fmt::Arguments<'_>,
    ) -> Result<()> {
        let mut core = self.core.lock();
        let line = core.render(name, level, call_site, args)?;
        core.emit(&line)
    }

    fn close(&self) {
        self.core.lock().close();
    }
}
