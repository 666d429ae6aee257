// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for filewise.

use std::path::PathBuf;
use thiserror::Error;

/// A template could not be compiled into a [`FormatPlan`](crate::FormatPlan).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// `%(name)` where `name` is not one of the known fields
    #[error("unknown format field %({0})")]
    UnknownField(String),

    /// A `%(` that is never closed
    #[error("unterminated format field in {0:?}")]
    UnterminatedField(String),
}

/// Main error type for handler and logger operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The file name contains a path separator, or names a directory
    #[error("{0:?} is not a file name")]
    InvalidFileName(String),

    /// A rotating handler was given an empty file name
    #[error("file name has not been set")]
    MissingFileName,

    /// Opening, inspecting or renaming the primary file failed
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The format template was rejected
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// A value that must be positive, non-negative or well-formed was not
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A level name other than DEBUG, WARNING or ERROR
    #[error("invalid log level {0:?}")]
    InvalidLevel(String),

    /// The last format update failed, so there is nothing to render with
    #[error("handler has no valid format string")]
    NoFormat,

    /// The handler was closed, or its primary file could not be reopened after rotation
    #[error("handler output is closed")]
    Closed,
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for filewise operations.
pub type Result<T> = std::result::Result<T, Error>;
