// SPDX-License-Identifier: MIT OR Apache-2.0

//! State and behavior shared by every handler kind.

use crate::Level;
use crate::callsite::CallSite;
use crate::error::{Error, Result};
use crate::format::FormatPlan;
use crate::record::Record;
use std::fs::{File, Metadata, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Where rendered lines go.
#[derive(Debug)]
pub(crate) enum Output {
    Stdout,
    File(File),
    Closed,
}

/// Whether an empty file name selects stdout or is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Unnamed {
    Stdout,
    Reject,
}

/// A validated, opened destination that has not been installed yet.
#[derive(Debug)]
pub(crate) struct Opened {
    dir: PathBuf,
    name: String,
    output: Output,
    metadata: Option<Metadata>,
}

impl Opened {
    /// Size and creation metadata of the opened file; `None` for stdout.
    pub(crate) fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }
}

fn validate_name(name: &str) -> Result<()> {
    let has_separator = name.chars().any(std::path::is_separator);
    if has_separator || name == "." || name == ".." {
        return Err(Error::InvalidFileName(name.to_string()));
    }
    Ok(())
}

fn open_append(path: &Path) -> Result<(File, Metadata)> {
    let file = OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(path)
        .map_err(|e| Error::io(path, e))?;
    let metadata = file.metadata().map_err(|e| Error::io(path, e))?;
    Ok((file, metadata))
}

/// Validates `dir`/`name` and opens it, without touching any handler.
pub(crate) fn open(dir: &Path, name: &str, unnamed: Unnamed) -> Result<Opened> {
    let dir = if dir.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        dir.to_path_buf()
    };
    if name.is_empty() {
        return match unnamed {
            Unnamed::Stdout => Ok(Opened {
                dir,
                name: String::new(),
                output: Output::Stdout,
                metadata: None,
            }),
            Unnamed::Reject => Err(Error::MissingFileName),
        };
    }
    validate_name(name)?;
    let (file, metadata) = open_append(&dir.join(name))?;
    Ok(Opened {
        dir,
        name: name.to_string(),
        output: Output::File(file),
        metadata: Some(metadata),
    })
}

/**
The part of a handler that does not depend on its rotation policy.

Lives inside the handler's mutex together with the rotation state.
*/
#[derive(Debug)]
pub(crate) struct HandlerCore {
    level: Level,
    dir: PathBuf,
    name: String,
    output: Output,
    plan: Option<FormatPlan>,
}

impl HandlerCore {
    pub(crate) fn new(opened: Opened) -> Self {
        Self {
            level: Level::default(),
            dir: opened.dir,
            name: opened.name,
            output: opened.output,
            plan: Some(FormatPlan::default()),
        }
    }

    pub(crate) fn level(&self) -> Level {
        self.level
    }

    pub(crate) fn set_level(&mut self, level: Level) {
        self.level = level;
    }

    /// Replaces the plan; a rejected template leaves no plan at all.
    pub(crate) fn set_format_string(&mut self, template: &str) -> Result<()> {
        match FormatPlan::compile(template) {
            Ok(plan) => {
                self.plan = Some(plan);
                Ok(())
            }
            Err(e) => {
                self.plan = None;
                Err(e.into())
            }
        }
    }

    pub(crate) fn format_string(&self) -> Option<String> {
        self.plan.as_ref().map(|plan| plan.template().to_string())
    }

    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn file_path(&self) -> PathBuf {
        if self.name.is_empty() {
            self.dir.clone()
        } else {
            self.dir.join(&self.name)
        }
    }

    /// Installs a destination from [`open`], dropping the old output.
    pub(crate) fn install(&mut self, opened: Opened) {
        self.dir = opened.dir;
        self.name = opened.name;
        self.output = opened.output;
    }

    /// Renders one line, failing if there is no plan or nowhere to write it.
    pub(crate) fn render(
        &self,
        name: &str,
        level: Level,
        call_site: Option<CallSite>,
        args: std::fmt::Arguments<'_>,
    ) -> Result<String> {
        if matches!(self.output, Output::Closed) {
            return Err(Error::Closed);
        }
        let plan = self.plan.as_ref().ok_or(Error::NoFormat)?;
        let record = Record::new(name, level, std::fmt::format(args), call_site);
        Ok(plan.render(&record))
    }

    /// Writes a rendered line in one call.
    pub(crate) fn emit(&mut self, line: &str) -> Result<()> {
        let result = match &mut self.output {
            Output::Stdout => {
                let mut stdout = std::io::stdout().lock();
                stdout
                    .write_all(line.as_bytes())
                    .and_then(|_| stdout.flush())
            }
            Output::File(file) => file.write_all(line.as_bytes()),
            Output::Closed => return Err(Error::Closed),
        };
        result.map_err(|e| Error::io(self.file_path(), e))
    }

    /// Releases the output.  Closing stdout only stops this handler from writing to it.
    pub(crate) fn close(&mut self) {
        self.output = Output::Closed;
    }

    /**
    Opens a fresh file at the current path, after a rotation moved the old one away.

    On failure the output stays closed.
    */
    pub(crate) fn reopen(&mut self) -> Result<Metadata> {
        self.output = Output::Closed;
        let (file, metadata) = open_append(&self.file_path())?;
        self.output = Output::File(file);
        Ok(metadata)
    }
}
