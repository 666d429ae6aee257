// SPDX-License-Identifier: MIT OR Apache-2.0

//! Size-based rotation.
//!
//! The handler keeps a running count of the primary file's size.  When the line about to
//! be written would push the count past `max_file_size`, the file is rotated first and the
//! whole line goes to the fresh file.
//!
//! An empty primary file is never rotated.  A single line longer than `max_file_size` written
//! to an empty file stays there whole, and the file rotates on the next write instead.
//!
//! Rotation shifts the numbered backups up by one: `app.log.(n-1)` becomes `app.log.n`, and
//! so on down to `app.log` becoming `app.log.1`.  The top slot `n` is the lowest number with
//! no backup on disk, capped at `backup_count`.  When the cap is reached, the oldest backup
//! is overwritten by the shift, so at most `backup_count` backups exist.  A `backup_count` of
//! zero means no cap: the window grows by one every rotation and nothing is discarded.

use super::{rename_backup, with_suffix};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// 100 MiB
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;
pub const DEFAULT_BACKUP_COUNT: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SizeRotation {
    max_file_size: u64,
    backup_count: usize,
    current_size: u64,
}

impl SizeRotation {
    pub fn new() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            backup_count: DEFAULT_BACKUP_COUNT,
            current_size: 0,
        }
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Fails with [`Error::InvalidArgument`] for zero, leaving the limit unchanged.
    pub fn set_max_file_size(&mut self, size: u64) -> Result<()> {
        if size == 0 {
            return Err(Error::InvalidArgument(
                "max file size must be a positive number".to_string(),
            ));
        }
        self.max_file_size = size;
        Ok(())
    }

    pub fn backup_count(&self) -> usize {
        self.backup_count
    }

    pub fn set_backup_count(&mut self, count: usize) {
        self.backup_count = count;
    }

    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    /// Resets the counter from the file's real size, after open or rotation.
    pub fn seed(&mut self, size: u64) {
        self.current_size = size;
    }

    /// Adds a successful write to the counter.
    pub fn record_write(&mut self, len: u64) {
        self.current_size = self.current_size.saturating_add(len);
    }

    /// True if writing `len` more bytes would overflow the limit.
    ///
    /// An empty file is never rotated: the line is written whole even if it alone exceeds
    /// the limit.
    pub fn should_rotate(&self, len: u64) -> bool {
        self.current_size > 0 && self.current_size.saturating_add(len) > self.max_file_size
    }
}

impl Default for SizeRotation {
    fn default() -> Self {
        Self::new()
    }
}

/// `<path>.<n>`
pub fn backup_path(path: &Path, n: usize) -> PathBuf {
    with_suffix(path, &n.to_string())
}

/// Lowest `n >= 1` such that `<path>.<n>` does not exist.
fn first_free_slot(path: &Path) -> usize {
    let mut n = 1;
    while backup_path(path, n).exists() {
        n += 1;
    }
    n
}

/// Shifts `path` and its numbered backups up by one slot.
///
/// The primary file must already be closed.  Shifts whose source is missing are skipped;
/// failed renames are reported to diagnostics.
pub fn shift_backups(path: &Path, backup_count: usize) {
    let free = first_free_slot(path);
    let top = if backup_count > 0 {
        free.min(backup_count)
    } else {
        free
    };
    for n in (1..=top).rev() {
        let from = if n == 1 {
            path.to_path_buf()
        } else {
            backup_path(path, n - 1)
        };
        if from.exists() {
            rename_backup(&from, &backup_path(path, n));
        }
    }
}
