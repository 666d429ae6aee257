//SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# filewise

filewise is an opinionated file logging library for Rust.

# Development status

filewise is experimental and the API may change.

# The problem

Most logging crates stop at the facade.  Getting records into files that don't grow forever is
left to an external tool, or a second crate, or a cron job that renames files out from under a
process that still has them open.

filewise does the file part.  Named loggers fan records out to handlers, and each handler owns
its file and its rotation policy:

| Handler                 | Output                        | Rotation                                  |
|-------------------------|-------------------------------|-------------------------------------------|
| [`BasicHandler`]        | a file, or stdout if unnamed  | none                                      |
| [`RotatingHandler`]     | a file                        | when the next line would exceed a size    |
| [`TimeRotatingHandler`] | a file                        | every `n` seconds, hours or days          |

# Levels

There are three levels, [`Level::Debug`] < [`Level::Warning`] < [`Level::Error`].  Each handler
has a floor, and a logger writes a record only to the handlers whose floor admits it.

# Templates

Each handler renders records with a template of literal text and `%(field)` tokens:

```text
%(dateTime),%(nanoSecond) - [%(fileName) %(lineNo)] %(levelName) %(message)
```

The template is compiled once into a [`FormatPlan`] when it is set, and a malformed template is
rejected whole.  See [`Field`] for the thirteen field names.  Fields are resolved only if the
template names them, so a template without call-site fields never resolves a call site and a
template without time fields never reads the clock.

# The API

```rust
use filewise::{Handler, Level, RotatingHandler, get_logger};
use std::sync::Arc;

let dir = tempfile::tempdir().unwrap();
let handler = Arc::new(RotatingHandler::new(dir.path(), "app.log").unwrap());
handler.set_max_file_size(10 * 1024 * 1024).unwrap();
handler.set_backup_count(5);
handler.set_log_level(Level::Warning);

let logger = get_logger("lib-doc");
logger.add_handler(handler);
filewise::warning!(logger, "queue depth {}", 1200);
filewise::debug!(logger, "not written, below the floor");

let written = std::fs::read_to_string(dir.path().join("app.log")).unwrap();
assert!(written.ends_with("WARNING queue depth 1200\n"));
```

Handlers and loggers can also be wired from a TOML file with [`Config`].

# Failure

Setters and constructors return [`Error`] and leave the handler as it was.  Logging through a
[`Logger`] never fails: a handler that cannot write, or a backup that cannot be moved during
rotation, is reported to the [`diagnostics`] sink, which prints to stderr by default.

# Multithreading

Every handler serializes its operations behind its own lock, so lines never interleave and
rotation is never observed half done, even when one handler is attached to loggers on many
threads.  Only in-process concurrency is coordinated; two processes rotating the same file
will race.
*/

mod callsite;
pub mod config;
pub mod diagnostics;
mod error;
mod format;
pub mod handler;
mod level;
mod logger;
mod macros;
mod record;
mod registry;
pub mod rotation;
mod spinlock;
mod sys;
mod time;

pub use callsite::{CallSite, ResolvedCallSite};
pub use config::{Config, ConfigError, HandlerConfig};
pub use error::{Error, FormatError, Result};
pub use format::{DEFAULT_FORMAT, Field, FormatPlan};
pub use handler::{BasicHandler, Handler, HandlerId, RotatingHandler, TimeRotatingHandler};
pub use level::Level;
pub use logger::Logger;
pub use record::Record;
pub use registry::{Registry, get_logger};
pub use time::TimeFacets;
