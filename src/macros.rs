// SPDX-License-Identifier: MIT OR Apache-2.0

//! Logging macros.
//!
//! [`debug!`](crate::debug), [`warning!`](crate::warning) and [`error!`](crate::error) take a
//! logger and `format!`-style arguments.  Unlike [`Logger::debug`](crate::Logger::debug) and
//! friends, they also capture the enclosing function for `%(funcName)`.
//!
//! ```rust
//! use filewise::{BasicHandler, Handler, Logger};
//! use std::sync::Arc;
//!
//! fn charge(logger: &Logger, cents: u32) {
//!     filewise::warning!(logger, "charging {} cents", cents);
//! }
//!
//! let dir = tempfile::tempdir().unwrap();
//! let handler = Arc::new(BasicHandler::new(dir.path(), "app.log").unwrap());
//! handler.set_format_string("%(funcName): %(message)").unwrap();
//! let logger = Logger::new("macros-doc");
//! logger.add_handler(handler);
//!
//! charge(&logger, 250);
//! let written = std::fs::read_to_string(dir.path().join("app.log")).unwrap();
//! assert_eq!(written, "main::charge: charging 250 cents\n");
//! ```
//!
//! The logger expression may be anything that derefs to a [`Logger`](crate::Logger), such as
//! the `Arc<Logger>` returned by [`get_logger`](crate::get_logger).

/// Logs at [`Level::Debug`](crate::Level::Debug), capturing the call site.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::Logger::log(
            &$logger,
            $crate::Level::Debug,
            ::std::option::Option::Some($crate::call_site!()),
            ::std::format_args!($($arg)+),
        )
    };
}

/// Logs at [`Level::Warning`](crate::Level::Warning), capturing the call site.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::Logger::log(
            &$logger,
            $crate::Level::Warning,
            ::std::option::Option::Some($crate::call_site!()),
            ::std::format_args!($($arg)+),
        )
    };
}

/// Logs at [`Level::Error`](crate::Level::Error), capturing the call site.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::Logger::log(
            &$logger,
            $crate::Level::Error,
            ::std::option::Option::Some($crate::call_site!()),
            ::std::format_args!($($arg)+),
        )
    };
}

#[cfg(test)]
mod tests {
    use crate::{BasicHandler, Handler, Level, Logger};
    use std::sync::Arc;

    fn logger_with_file(dir: &std::path::Path, template: &str) -> Logger {
        let handler = Arc::new(BasicHandler::new(dir, "macros.log").unwrap());
        handler.set_format_string(template).unwrap();
        handler.set_log_level(Level::Warning);
        let logger = Logger::new("macros");
        logger.add_handler(handler);
        logger
    }

    #[test]
    fn macros_respect_levels() {
        let dir = tempfile::tempdir().unwrap();
        let logger = logger_with_file(dir.path(), "%(levelName) %(message)");
        crate::debug!(logger, "hidden {}", 1);
        crate::warning!(logger, "shown {}", 2);
        crate::error!(logger, "shown {}", 3);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("macros.log")).unwrap(),
            "WARNING shown 2\nERROR shown 3\n"
        );
    }

    #[test]
    fn macros_capture_function_and_line() {
        let dir = tempfile::tempdir().unwrap();
        let logger = Arc::new(logger_with_file(
            dir.path(),
            "%(fileName):%(lineNo) %(funcName)",
        ));
        let line = line!() + 1;
        crate::error!(logger, "x");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("macros.log")).unwrap(),
            format!("macros.rs:{line} tests::macros_capture_function_and_line\n")
        );
    }
}
