// SPDX-License-Identifier: MIT OR Apache-2.0

//! Call-site capture and resolution.
//!
//! A [`CallSite`] is captured when a record is logged and resolved into strings only
//! if the handler's template asks for `%(pathName)`, `%(fileName)`, `%(funcName)` or
//! `%(lineNo)`.
//!
//! # Capture
//!
//! There are two ways to capture:
//!
//! * [`CallSite::caller`] is `#[track_caller]`.  It reports the location of the first
//!   caller up the stack that is *not* `#[track_caller]`.  [`Logger::debug`](crate::Logger::debug)
//!   and friends are `#[track_caller]` all the way down to this constructor, which is how the
//!   location of the original logging call survives the dispatch path.  Every function added
//!   between the public logging call and the capture point must also be `#[track_caller]`,
//!   or the reported line silently becomes a line inside this crate.
//! * [`call_site!`](crate::call_site) expands at the call site, so it additionally knows the
//!   enclosing function.  The logging macros use it.
//!
//! ```rust
//! use filewise::CallSite;
//!
//! let expected = line!() + 1;
//! let site = CallSite::caller();
//! assert_eq!(site.line(), expected);
//! assert_eq!(site.resolve().func, "???");
//! ```

use std::panic::Location;

/// Reported for any call-site field that cannot be resolved.
pub const UNKNOWN: &str = "???";

/// Suffix of the marker function that [`call_site!`](crate::call_site) defines.
#[doc(hidden)]
pub const MARKER: &str = "__filewise_here";

/**
Where a record was logged.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallSite {
    path: &'static str,
    line: u32,
    function: Option<&'static str>,
}

impl CallSite {
    /// Creates a call site from its parts.
    ///
    /// `function` may be a full path such as `my_crate::module::function`; it is shortened
    /// on resolution.
    pub const fn new(path: &'static str, line: u32, function: Option<&'static str>) -> Self {
        Self {
            path,
            line,
            function,
        }
    }

    /// Captures the location of the nearest caller that is not `#[track_caller]`.
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self::new(location.file(), location.line(), None)
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn function(&self) -> Option<&'static str> {
        self.function
    }

    /// Produces the four string facets.
    pub fn resolve(&self) -> ResolvedCallSite {
        let file = self
            .path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.path)
            .to_string();
        ResolvedCallSite {
            path: self.path.to_string(),
            file,
            func: self
                .function
                .map(short_function_name)
                .unwrap_or_else(|| UNKNOWN.to_string()),
            line: self.line.to_string(),
        }
    }
}

/// String facets of a call site, as substituted into templates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedCallSite {
    pub path: String,
    pub file: String,
    pub func: String,
    pub line: String,
}

impl ResolvedCallSite {
    /// Every facet set to [`UNKNOWN`].
    pub fn unknown() -> Self {
        Self {
            path: UNKNOWN.to_string(),
            file: UNKNOWN.to_string(),
            func: UNKNOWN.to_string(),
            line: UNKNOWN.to_string(),
        }
    }
}

/// Keeps the last two path segments (`module::function`), dropping closure markers
/// and the marker function.
fn short_function_name(raw: &str) -> String {
    let segments: Vec<&str> = raw
        .split("::")
        .filter(|segment| *segment != "{{closure}}" && *segment != MARKER)
        .collect();
    if segments.is_empty() {
        return UNKNOWN.to_string();
    }
    let start = segments.len().saturating_sub(2);
    segments[start..].join("::")
}

/// Captures the current call site, including the enclosing function.
///
/// ```rust
/// let site = filewise::call_site!();
/// assert!(site.resolve().func.ends_with("main"));
/// assert_eq!(site.line(), line!() - 2);
/// ```
#[macro_export]
macro_rules! call_site {
    () => {{
        fn __filewise_here() {}
        fn __filewise_type_name<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::CallSite::new(
            ::std::file!(),
            ::std::line!(),
            ::std::option::Option::Some(__filewise_type_name(__filewise_here)),
        )
    }};
}
