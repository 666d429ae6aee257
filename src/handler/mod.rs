// SPDX-License-Identifier: MIT OR Apache-2.0

//! Handlers: where records end up.
//!
//! A handler owns one output, a level floor and a compiled template.  Three kinds are provided:
//!
//! | Handler                  | Output                          | Rotation                     |
//! |--------------------------|---------------------------------|------------------------------|
//! | [`BasicHandler`]         | a file, or stdout if unnamed    | none                         |
//! | [`RotatingHandler`]      | a file                          | by size, numbered backups    |
//! | [`TimeRotatingHandler`]  | a file                          | by time, date-tagged backups |
//!
//! All three implement [`Handler`], which is what a [`Logger`](crate::Logger) holds.  A handler
//! may be attached to several loggers at once; every operation takes the handler's own lock for
//! its whole duration, so lines from concurrent writers never interleave and a rotation is never
//! observed half done.
//!
//! # Example
//!
//! ```rust
//! use filewise::{BasicHandler, Handler, Level};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let handler = BasicHandler::new(dir.path(), "app.log").unwrap();
//! handler.set_format_string("%(levelName) %(message)").unwrap();
//! handler.write("app", Level::Warning, None, format_args!("disk {}% full", 91)).unwrap();
//!
//! let written = std::fs::read_to_string(dir.path().join("app.log")).unwrap();
//! assert_eq!(written, "WARNING disk 91% full\n");
//! ```

mod basic;
mod common;
mod rotating;
mod time_rotating;

pub use basic::BasicHandler;
pub use rotating::RotatingHandler;
pub use time_rotating::TimeRotatingHandler;

use crate::Level;
use crate::callsite::CallSite;
use crate::error::Result;
use std::fmt::{Debug, Display};
use std::path::{Path, PathBuf};

/// A process-unique handler identity, assigned by the [`Registry`](crate::Registry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandlerId(pub u64);

impl Display for HandlerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/**
The contract every handler kind fulfils.

Setters that fail leave the handler as it was, with one exception: a rejected template clears
the compiled plan, so later writes fail with [`Error::NoFormat`](crate::Error::NoFormat) until a
valid template is set.
*/
pub trait Handler: Debug + Send + Sync {
    /// Identity used by [`Logger::remove_handler`](crate::Logger::remove_handler).
    fn id(&self) -> HandlerId;

    /// The lowest level this handler accepts.
    fn log_level(&self) -> Level;

    fn set_log_level(&self, level: Level);

    /// Compiles and installs `template`.
    fn set_format_string(&self, template: &str) -> Result<()>;

    /// The template in use, or `None` after a rejected template.
    fn format_string(&self) -> Option<String>;

    /**
    Points the handler at `dir/name`.

    An empty `dir` is the working directory.  The new file is opened before the old output
    is released; on failure the handler keeps writing where it was.
    */
    fn set_file_path(&self, dir: &Path, name: &str) -> Result<()>;

    /// `dir/name`
    fn file_path(&self) -> PathBuf;

    /**
    Renders one record and emits it, rotating first if the policy says so.

    Level filtering is the logger's job; a direct write is never filtered.
    */
    fn write(
        &self,
        name: &str,
        level: Level,
        call_site: Option<CallSite>,
        args: std::fmt::Arguments<'_>,
    ) -> Result<()>;

    /// Releases the output.  Idempotent.
    fn close(&self);
}

/*
Boilerplate notes.

# HandlerId

Copy/Eq/Ord/Hash: it's a number.
Default: no, ids come from the registry.
Display: `#n`, used in diagnostics.

# Handler

Clone: no, a handler owns an open file.  Share it with Arc.
PartialEq/Hash: compare `id()` instead.
Send/Sync: required, handlers are shared across loggers and threads.
 */
