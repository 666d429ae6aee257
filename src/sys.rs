// SPDX-License-Identifier: MIT OR Apache-2.0

//! Platform-specific file metadata.
//!
//! Time rotation tags a rotated file with the time the file was *created*, which must
//! survive process restarts, so it comes from the filesystem rather than the clock.
//! Which timestamp is available differs by platform:
//!
//! * unix: birth time where the kernel and filesystem report it, otherwise the
//!   status-change time
//! * everything else: birth time, otherwise the modification time

use chrono::{DateTime, Local, Timelike};
use std::fs::Metadata;
use std::time::SystemTime;

#[cfg(unix)]
fn created(metadata: &Metadata) -> SystemTime {
    use std::os::unix::fs::MetadataExt;
    use std::time::{Duration, UNIX_EPOCH};
    metadata.created().unwrap_or_else(|_| {
        let seconds = metadata.ctime();
        if seconds >= 0 {
            UNIX_EPOCH + Duration::from_secs(seconds as u64)
        } else {
            UNIX_EPOCH - Duration::from_secs(seconds.unsigned_abs())
        }
    })
}

#[cfg(not(unix))]
fn created(metadata: &Metadata) -> SystemTime {
    metadata
        .created()
        .or_else(|_| metadata.modified())
        .unwrap_or_else(|_| SystemTime::now())
}

/// When the file described by `metadata` was created, truncated to whole seconds.
pub fn created_at(metadata: &Metadata) -> DateTime<Local> {
    let created: DateTime<Local> = created(metadata).into();
    created.with_nanosecond(0).unwrap_or(created)
}
