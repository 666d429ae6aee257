// SPDX-License-Identifier: MIT OR Apache-2.0

//! Named loggers.
//!
//! A [`Logger`] is a name plus an ordered list of handlers.  Logging a record writes it to
//! every attached handler whose level floor admits it, in attachment order.
//!
//! ```rust
//! use filewise::{BasicHandler, Handler, Level, Logger};
//! use std::sync::Arc;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let errors = Arc::new(BasicHandler::new(dir.path(), "errors.log").unwrap());
//! errors.set_format_string("%(name) %(levelName) %(message)").unwrap();
//! errors.set_log_level(Level::Error);
//!
//! let logger = Logger::new("billing");
//! logger.add_handler(errors.clone());
//! logger.warning(format_args!("retrying"));
//! logger.error(format_args!("card {} declined", 42));
//!
//! let written = std::fs::read_to_string(dir.path().join("errors.log")).unwrap();
//! assert_eq!(written, "billing ERROR card 42 declined\n");
//! ```
//!
//! # Concurrency
//!
//! The handler list is an immutable snapshot behind its own lock.  Attaching or detaching a
//! handler builds a new snapshot; dispatch clones the current one and releases the lock before
//! doing any I/O, so a slow handler never blocks `add_handler` and a handler detached mid-dispatch
//! still receives the record being dispatched.

use crate::Level;
use crate::callsite::CallSite;
use crate::diagnostics::{self, Diagnostic};
use crate::handler::{Handler, HandlerId};
use parking_lot::Mutex;
use std::sync::Arc;

pub struct Logger {
    name: String,
    handlers: Mutex<Arc<[Arc<dyn Handler>]>>,
}

impl Logger {
    /**
    Creates a logger with no handlers.

    Most programs get loggers from [`get_logger`](crate::get_logger) instead, which returns
    the same logger for the same name.
    */
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            handlers: Mutex::new(Arc::from(Vec::new())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends `handler` to the dispatch order.
    pub fn add_handler(&self, handler: Arc<dyn Handler>) {
        let mut handlers = self.handlers.lock();
        let mut next = handlers.to_vec();
        next.push(handler);
        *handlers = Arc::from(next);
    }

    /// Detaches every handler with this id.  Returns whether any was attached.
    pub fn remove_handler(&self, id: HandlerId) -> bool {
        let mut handlers = self.handlers.lock();
        let before = handlers.len();
        let next: Vec<_> = handlers.iter().filter(|h| h.id() != id).cloned().collect();
        let removed = next.len() != before;
        *handlers = Arc::from(next);
        removed
    }

    /// The current dispatch order.
    pub fn handlers(&self) -> Arc<[Arc<dyn Handler>]> {
        self.handlers.lock().clone()
    }

    /**
    Writes a record to every handler whose floor is at or below `level`.

    Handler failures are reported to [`diagnostics`](crate::diagnostics) rather than returned;
    one failing handler does not stop the others.
    */
    pub fn log(&self, level: Level, call_site: Option<CallSite>, args: std::fmt::Arguments<'_>) {
        let snapshot = self.handlers();
        for handler in snapshot.iter() {
            if level < handler.log_level() {
                continue;
            }
            if let Err(e) = handler.write(&self.name, level, call_site, args) {
                diagnostics::report(Diagnostic::WriteFailed {
                    logger: self.name.clone(),
                    handler: handler.id(),
                    error: e.to_string(),
                });
            }
        }
    }

    /// Logs at [`Level::Debug`] with the caller's location.
    #[track_caller]
    pub fn debug(&self, args: std::fmt::Arguments<'_>) {
        self.log(Level::Debug, Some(CallSite::caller()), args);
    }

    /// Logs at [`Level::Warning`] with the caller's location.
    #[track_caller]
    pub fn warning(&self, args: std::fmt::Arguments<'_>) {
        self.log(Level::Warning, Some(CallSite::caller()), args);
    }

    /// Logs at [`Level::Error`] with the caller's location.
    #[track_caller]
    pub fn error(&self, args: std::fmt::Arguments<'_>) {
        self.log(Level::Error, Some(CallSite::caller()), args);
    }

    /// Closes every attached handler, including those shared with other loggers.
    pub fn close(&self) {
        for handler in self.handlers().iter() {
            handler.close();
        }
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<HandlerId> = self.handlers().iter().map(|h| h.id()).collect();
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("handlers", &ids)
            .finish()
    }
}

/*
Boilerplate notes.

# Logger

Clone: no.  Loggers are shared by Arc through the registry, and a clone with its own
handler list would be a different logger with the same name.
PartialEq/Eq/Hash: not implemented; identity is the registry entry.
Default: no, a logger needs a name.
Debug: hand-written, handlers are listed by id.
Send/Sync: yes, handlers are Send + Sync and the list is behind a mutex.
 */
