// SPDX-License-Identifier: MIT OR Apache-2.0

//! The format-string compiler.
//!
//! A handler's output is described by a template: literal text interspersed
//! with `%(fieldName)` tokens.  Compiling the template produces a [`FormatPlan`],
//! which is an ordered list of [`Field`]s plus a *residual* string.  The residual is
//! the template with each token replaced by a single `{}` placeholder, literal braces
//! escaped as `{{` and `}}`, and a trailing newline appended so every record ends a line.
//!
//! The plan is compiled once, when the template is set, and rendered for every record.
//!
//! # Example
//!
//! ```rust
//! use filewise::{Field, FormatPlan};
//!
//! let plan = FormatPlan::compile("[%(levelName)] %(message) {%(lineNo)}").unwrap();
//! assert_eq!(plan.fields(), &[Field::LevelName, Field::Message, Field::LineNo]);
//! assert_eq!(plan.residual(), "[{}] {} {{{}}}\n");
//! ```
//!
//! # Atomicity
//!
//! A template is accepted or rejected as a whole.  An unknown field name or an
//! unterminated `%(` fails compilation and no plan exists afterwards; compiling is
//! never additive, so a later successful compile starts from nothing.
//!
//! ```rust
//! use filewise::{FormatError, FormatPlan};
//!
//! assert_eq!(
//!     FormatPlan::compile("%(dateTime"),
//!     Err(FormatError::UnterminatedField("%(dateTime".to_string()))
//! );
//! assert_eq!(
//!     FormatPlan::compile("%(messages)"),
//!     Err(FormatError::UnknownField("messages".to_string()))
//! );
//! ```

use crate::error::FormatError;
use crate::record::Record;
use std::fmt::Display;

/// The template used by freshly constructed handlers.
pub const DEFAULT_FORMAT: &str =
    "%(dateTime),%(nanoSecond) - [%(fileName) %(lineNo)] %(levelName) %(message)";

const PLACEHOLDER: &str = "{}";

/// One named, resolvable piece of record metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Name of the logger that produced the record
    Name,
    /// `DEBUG`, `WARNING` or `ERROR`
    LevelName,
    /// Source path of the call site
    PathName,
    /// Final component of the call site's source path
    FileName,
    /// Enclosing function of the call site
    FuncName,
    /// Line of the call site
    LineNo,
    /// `YYYY-MM-DD`
    Date,
    /// Seconds since the Unix epoch
    UnixTime,
    /// `YYYY-MM-DD HH:MM:SS`
    DateTime,
    /// Full weekday name
    Weekday,
    /// Nine-digit nanosecond component
    NanoSecond,
    /// `YYYY-MM-DD HH:MM:SS,nnnnnnnnn`
    AscTime,
    /// The formatted message
    Message,
}

impl Field {
    /// Every field, in the order the template language documents them.
    pub const ALL: [Field; 13] = [
        Field::Name,
        Field::LevelName,
        Field::PathName,
        Field::FileName,
        Field::FuncName,
        Field::LineNo,
        Field::Date,
        Field::UnixTime,
        Field::DateTime,
        Field::Weekday,
        Field::NanoSecond,
        Field::AscTime,
        Field::Message,
    ];

    /// The token name, as written between `%(` and `)`.
    pub const fn name(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::LevelName => "levelName",
            Field::PathName => "pathName",
            Field::FileName => "fileName",
            Field::FuncName => "funcName",
            Field::LineNo => "lineNo",
            Field::Date => "date",
            Field::UnixTime => "unixTime",
            Field::DateTime => "dateTime",
            Field::Weekday => "weekday",
            Field::NanoSecond => "nanoSecond",
            Field::AscTime => "ascTime",
            Field::Message => "message",
        }
    }

    /// Looks up a token name.
    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.name() == name)
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "%({})", self.name())
    }
}

/**
A compiled template.

Invariant: the residual contains exactly one unescaped `{}` per entry in [Self::fields],
in the same order.
*/
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormatPlan {
    template: String,
    fields: Vec<Field>,
    residual: String,
}

impl FormatPlan {
    /// Compiles `template` in a single left-to-right scan.
    pub fn compile(template: &str) -> Result<FormatPlan, FormatError> {
        let mut fields = Vec::new();
        let mut residual = String::with_capacity(template.len() + 1);
        let mut chars = template.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '%' if chars.peek() == Some(&'(') => {
                    chars.next();
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some(')') => break,
                            Some(c) => name.push(c),
                            None => {
                                return Err(FormatError::UnterminatedField(template.to_string()));
                            }
                        }
                    }
                    let field = Field::from_name(&name).ok_or(FormatError::UnknownField(name))?;
                    fields.push(field);
                    residual.push_str(PLACEHOLDER);
                }
                '{' => residual.push_str("{{"),
                '}' => residual.push_str("}}"),
                c => residual.push(c),
            }
        }
        residual.push('\n');
        Ok(FormatPlan {
            template: template.to_string(),
            fields,
            residual,
        })
    }

    /// The template this plan was compiled from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Fields in the order their values are substituted.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// The residual string, with one `{}` per field.
    pub fn residual(&self) -> &str {
        &self.residual
    }

    /// Counts the unescaped placeholders in the residual.
    pub fn placeholders(&self) -> usize {
        let mut count = 0;
        let mut chars = self.residual.chars();
        while let Some(c) = chars.next() {
            match c {
                '{' => {
                    if chars.next() == Some('}') {
                        count += 1;
                    }
                }
                '}' => {
                    chars.next();
                }
                _ => {}
            }
        }
        count
    }

    /// True if rendering needs the call-site facets.
    pub fn uses_call_site(&self) -> bool {
        self.fields.iter().any(|f| {
            matches!(
                f,
                Field::PathName | Field::FileName | Field::FuncName | Field::LineNo
            )
        })
    }

    /// Renders one line for `record`.
    ///
    /// Only the fields present in the plan are resolved; the record memoizes them,
    /// so a template naming `%(date)` and `%(dateTime)` samples the clock once.
    pub fn render(&self, record: &Record) -> String {
        let mut out = String::with_capacity(self.residual.len() + 64);
        let mut values = self.fields.iter().map(|f| record.field(*f));
        let mut chars = self.residual.chars();
        while let Some(c) = chars.next() {
            match c {
                '{' => match chars.next() {
                    Some('}') => out.push_str(values.next().unwrap_or_default()),
                    _ => out.push('{'),
                },
                '}' => {
                    chars.next();
                    out.push('}');
                }
                c => out.push(c),
            }
        }
        out
    }
}

impl Default for FormatPlan {
    fn default() -> Self {
        //the default template is known to compile
        FormatPlan::compile(DEFAULT_FORMAT).unwrap_or_else(|_| FormatPlan {
            template: String::new(),
            fields: Vec::new(),
            residual: "\n".to_string(),
        })
    }
}

/*
Boilerplate notes.

Clone/Eq/Hash: plans are plain data.
Default: the plan for DEFAULT_FORMAT, which is what a fresh handler renders with.
Display: not implemented; `template()` is the human representation and the residual is an internal detail.
 */
