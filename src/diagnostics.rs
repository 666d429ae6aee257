// SPDX-License-Identifier: MIT OR Apache-2.0

//! Internal diagnostics.
//!
//! Logging must not take the application down, so some failures are never returned to
//! a caller: a backup that cannot be renamed or pruned during rotation, or a handler
//! write that fails inside [`Logger::log`](crate::Logger::log).  Those failures are
//! reported here instead.
//!
//! A logging library cannot report through its own loggers without risking recursion,
//! so diagnostics have their own tiny sink.  By default reports go to stderr via
//! [`StdErrorSink`].  Tests (or applications that want to surface rotation problems)
//! can install an [`InMemorySink`] or their own [`DiagnosticSink`].
//!
//! ```rust
//! use filewise::diagnostics::{InMemorySink, set_diagnostic_sink};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(InMemorySink::new());
//! let previous = set_diagnostic_sink(sink.clone());
//! // ... rotation failures now accumulate in `sink` ...
//! assert!(sink.drain().is_empty());
//! set_diagnostic_sink(previous);
//! ```

use crate::handler::HandlerId;
use crate::spinlock::Spinlock;
use parking_lot::Mutex;
use std::fmt::{Debug, Display};
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

/// A failure that was absorbed rather than returned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Diagnostic {
    /// Shifting or tagging a backup during rotation failed
    BackupRename {
        from: PathBuf,
        to: PathBuf,
        error: String,
    },
    /// Deleting an expired backup failed
    BackupRemove { path: PathBuf, error: String },
    /// Listing the log directory for backups failed
    BackupScan { dir: PathBuf, error: String },
    /// A handler returned an error while a logger was dispatching to it
    WriteFailed {
        logger: String,
        handler: HandlerId,
        error: String,
    },
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::BackupRename { from, to, error } => write!(
                f,
                "can't rename backup {} to {}: {}",
                from.display(),
                to.display(),
                error
            ),
            Diagnostic::BackupRemove { path, error } => {
                write!(f, "can't remove backup {}: {}", path.display(), error)
            }
            Diagnostic::BackupScan { dir, error } => {
                write!(f, "can't scan {} for backups: {}", dir.display(), error)
            }
            Diagnostic::WriteFailed {
                logger,
                handler,
                error,
            } => write!(
                f,
                "logger {:?} can't write to handler {}: {}",
                logger, handler, error
            ),
        }
    }
}

/// Receives diagnostics.
pub trait DiagnosticSink: Debug + Send + Sync {
    fn report(&self, diagnostic: &Diagnostic);
}

/**
The default sink, which writes one line per report to stderr.
*/
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StdErrorSink;

impl DiagnosticSink for StdErrorSink {
    fn report(&self, diagnostic: &Diagnostic) {
        use std::io::Write;
        let mut lock = std::io::stderr().lock();
        //nowhere left to report a failure to report
        let _ = writeln!(lock, "filewise: {}", diagnostic);
    }
}

/// A sink that keeps reports in memory.
#[derive(Debug, Default)]
pub struct InMemorySink {
    reports: Mutex<Vec<Diagnostic>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes every report received so far.
    pub fn drain(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.reports.lock())
    }
}

impl DiagnosticSink for InMemorySink {
    fn report(&self, diagnostic: &Diagnostic) {
        self.reports.lock().push(diagnostic.clone());
    }
}

static SINK: OnceLock<Spinlock<Arc<dyn DiagnosticSink>>> = OnceLock::new();

fn sink_cell() -> &'static Spinlock<Arc<dyn DiagnosticSink>> {
    SINK.get_or_init(|| Spinlock::new(Arc::new(StdErrorSink)))
}

/// The sink currently receiving reports.
pub fn diagnostic_sink() -> Arc<dyn DiagnosticSink> {
    sink_cell().with_mut(|sink| sink.clone())
}

/// Installs `sink`, returning the one it replaces.
pub fn set_diagnostic_sink(sink: Arc<dyn DiagnosticSink>) -> Arc<dyn DiagnosticSink> {
    sink_cell().with_mut(|current| std::mem::replace(current, sink))
}

pub(crate) fn report(diagnostic: Diagnostic) {
    //clone out so the sink runs without the spinlock held
    diagnostic_sink().report(&diagnostic);
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Serializes tests that swap the process-wide sink.
    pub(crate) static SINK_GUARD: std::sync::Mutex<()> = std::sync::Mutex::new(());

    #[test]
    fn swap_and_restore() {
        let _guard = SINK_GUARD.lock().unwrap_or_else(|e| e.into_inner());
        let sink = Arc::new(InMemorySink::new());
        let previous = set_diagnostic_sink(sink.clone());
        report(Diagnostic::BackupRemove {
            path: PathBuf::from("a.log.1"),
            error: "denied".to_string(),
        });
        set_diagnostic_sink(previous);
        report(Diagnostic::BackupScan {
            dir: PathBuf::from("."),
            error: "ignored".to_string(),
        });

        let reports = sink.drain();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].to_string(), "can't remove backup a.log.1: denied");
        assert!(sink.drain().is_empty());
    }
}
