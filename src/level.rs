// SPDX-License-Identifier: MIT OR Apache-2.0
use std::fmt::Display;
use std::str::FromStr;

/// The severity of a record.
///
/// Levels are ordered: a handler whose floor is [`Level::Warning`] admits
/// warnings and errors, but not debug records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Level {
    /// Diagnostic chatter, the default floor
    #[default]
    Debug,
    /// Suspicious condition
    Warning,
    /// Runtime error
    Error,
}

impl Level {
    /// The name rendered by `%(levelName)`.
    pub const fn name(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        }
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Level {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEBUG" => Ok(Level::Debug),
            "WARNING" => Ok(Level::Warning),
            "ERROR" => Ok(Level::Error),
            other => Err(crate::Error::InvalidLevel(other.to_string())),
        }
    }
}

/*
Boilerplate notes.

Copy: yes, it's a fieldless enum.
Ord: yes, and it is load-bearing, since dispatch compares against handler floors.
Default: Debug, which matches the floor a fresh handler starts with.
Display/FromStr: the upper-case names used by templates and configuration.
 */
