// SPDX-License-Identifier: MIT OR Apache-2.0

//! The rotation engine.
//!
//! Rotation closes a handler's primary file, moves it into a backup slot and opens a
//! fresh file at the original path.  Two strategies are provided:
//!
//! | Strategy       | Trigger                                   | Backup names          | Retention                         |
//! |----------------|-------------------------------------------|-----------------------|-----------------------------------|
//! | [`size`]       | the next line would exceed the size limit | `<name>.1` … `<name>.N` | shifting window of `backup_count` |
//! | [`time`]       | the clock passes the rotation deadline    | `<name>.<date tag>`   | newest `backup_count` tags        |
//!
//! The state types here are plain data; the handlers in [`crate::handler`] hold them under
//! their lock and call into this module from `write`, which is what makes a rotation
//! indivisible with respect to other writers.
//!
//! Moving and deleting backups is housekeeping.  Failures there are reported to
//! [`crate::diagnostics`] and never fail the write that triggered the rotation.  Reopening
//! the primary file is not housekeeping, and its failure is returned.

pub mod size;
pub mod time;

use crate::diagnostics::{self, Diagnostic};
use std::path::Path;

/// Renames `from` to `to`, reporting failure rather than returning it.
pub(crate) fn rename_backup(from: &Path, to: &Path) {
    if let Err(e) = std::fs::rename(from, to) {
        diagnostics::report(Diagnostic::BackupRename {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            error: e.to_string(),
        });
    }
}

/// Removes `path`, reporting failure rather than returning it.
pub(crate) fn remove_backup(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        diagnostics::report(Diagnostic::BackupRemove {
            path: path.to_path_buf(),
            error: e.to_string(),
        });
    }
}

/// `<path>.<suffix>`
pub(crate) fn with_suffix(path: &Path, suffix: &str) -> std::path::PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(suffix);
    name.into()
}
