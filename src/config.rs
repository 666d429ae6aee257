// SPDX-License-Identifier: MIT OR Apache-2.0

//! Declarative configuration.
//!
//! A [`Config`] names a set of handlers and says which loggers they attach to.  It is usually
//! loaded from TOML:
//!
//! ```rust
//! use filewise::{Config, get_logger};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let text = format!(r#"
//! [handlers.rolling]
//! handlerType = "RotatingHandler"
//! fileDir = {dir:?}
//! fileName = "app.log"
//! formatString = "%(levelName) %(message)"
//! logLevel = "WARNING"
//! maxFileSize = 1048576
//! backupCount = 5
//!
//! [loggers]
//! config-doc = ["rolling"]
//! "#, dir = dir.path().display().to_string());
//!
//! let config = Config::from_toml_str(&text).unwrap();
//! config.apply().unwrap();
//!
//! get_logger("config-doc").warning(format_args!("configured"));
//! let written = std::fs::read_to_string(dir.path().join("app.log")).unwrap();
//! assert_eq!(written, "WARNING configured\n");
//! ```
//!
//! The recognized handler properties are:
//!
//! | Key            | Applies to                                 | Value                           |
//! |----------------|--------------------------------------------|---------------------------------|
//! | `handlerType`  | all, required                              | `BasicHandler`, `RotatingHandler`, `TimeRotatingHandler` |
//! | `fileDir`      | all                                        | directory, default `.`          |
//! | `fileName`     | all                                        | bare file name; empty is stdout for `BasicHandler` |
//! | `formatString` | all                                        | template                        |
//! | `logLevel`     | all                                        | `DEBUG`, `WARNING`, `ERROR`     |
//! | `maxFileSize`  | `RotatingHandler`                          | positive byte count             |
//! | `backupCount`  | `RotatingHandler`, `TimeRotatingHandler`   | non-negative count, 0 keeps all |
//! | `when`         | `TimeRotatingHandler`                      | `<count><s\|h\|d>`              |
//!
//! Any other key, or a key given to a handler type it does not apply to, is an error.
//!
//! # All or nothing
//!
//! [`Config::apply`] checks every logger's handler references, then builds every handler, and
//! only then attaches them.  If anything fails, no logger is touched.

use crate::Level;
use crate::error::Error;
use crate::format::FormatPlan;
use crate::handler::{BasicHandler, Handler, RotatingHandler, TimeRotatingHandler};
use crate::registry::Registry;
use crate::rotation::time::Period;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Configuration could not be loaded or applied.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("can't read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("can't parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("handler {handler:?} has unknown handlerType {handler_type:?}")]
    UnknownHandlerType {
        handler: String,
        handler_type: String,
    },

    #[error("unknown handler property {0:?}")]
    UnknownKey(String),

    #[error("missing handler property {0:?}")]
    MissingKey(&'static str),

    #[error("handler property {key:?} has invalid value {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("handler {handler:?} of type {handler_type} does not take {key:?}")]
    Inapplicable {
        handler: String,
        handler_type: &'static str,
        key: &'static str,
    },

    #[error("logger {logger:?} references unknown handler {handler:?}")]
    UnknownHandler { logger: String, handler: String },

    #[error("handler {handler:?}: {source}")]
    Handler {
        handler: String,
        #[source]
        source: Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HandlerKind {
    Basic,
    Rotating,
    TimeRotating,
}

impl HandlerKind {
    fn parse(handler: &str, handler_type: &str) -> Result<Self, ConfigError> {
        match handler_type {
            "BasicHandler" => Ok(HandlerKind::Basic),
            "RotatingHandler" => Ok(HandlerKind::Rotating),
            "TimeRotatingHandler" => Ok(HandlerKind::TimeRotating),
            other => Err(ConfigError::UnknownHandlerType {
                handler: handler.to_string(),
                handler_type: other.to_string(),
            }),
        }
    }

    fn name(self) -> &'static str {
        match self {
            HandlerKind::Basic => "BasicHandler",
            HandlerKind::Rotating => "RotatingHandler",
            HandlerKind::TimeRotating => "TimeRotatingHandler",
        }
    }
}

/// Properties of one handler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HandlerConfig {
    pub handler_type: String,
    pub file_dir: Option<String>,
    pub file_name: Option<String>,
    pub format_string: Option<String>,
    pub log_level: Option<String>,
    pub max_file_size: Option<i64>,
    pub backup_count: Option<i64>,
    pub when: Option<String>,
}

fn parse_number(key: &'static str, value: &str) -> Result<i64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

impl HandlerConfig {
    /// Builds a handler config from string properties, as in a flat key/value file.
    pub fn from_properties(properties: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut config = HandlerConfig::default();
        let mut handler_type = None;
        for (key, value) in properties {
            match key.as_str() {
                "handlerType" => handler_type = Some(value.clone()),
                "fileDir" => config.file_dir = Some(value.clone()),
                "fileName" => config.file_name = Some(value.clone()),
                "formatString" => config.format_string = Some(value.clone()),
                "logLevel" => config.log_level = Some(value.clone()),
                "maxFileSize" => config.max_file_size = Some(parse_number("maxFileSize", value)?),
                "backupCount" => config.backup_count = Some(parse_number("backupCount", value)?),
                "when" => config.when = Some(value.clone()),
                other => return Err(ConfigError::UnknownKey(other.to_string())),
            }
        }
        config.handler_type = handler_type.ok_or(ConfigError::MissingKey("handlerType"))?;
        Ok(config)
    }

    /// Creates the handler.  Values are checked before any file is opened.
    pub fn build(&self, name: &str) -> Result<Arc<dyn Handler>, ConfigError> {
        let kind = HandlerKind::parse(name, &self.handler_type)?;
        let inapplicable = |key| ConfigError::Inapplicable {
            handler: name.to_string(),
            handler_type: kind.name(),
            key,
        };
        let invalid = |source| ConfigError::Handler {
            handler: name.to_string(),
            source,
        };

        if self.max_file_size.is_some() && kind != HandlerKind::Rotating {
            return Err(inapplicable("maxFileSize"));
        }
        if self.backup_count.is_some() && kind == HandlerKind::Basic {
            return Err(inapplicable("backupCount"));
        }
        if self.when.is_some() && kind != HandlerKind::TimeRotating {
            return Err(inapplicable("when"));
        }

        let level = self
            .log_level
            .as_deref()
            .map(str::parse::<Level>)
            .transpose()
            .map_err(invalid)?;
        let max_file_size = self
            .max_file_size
            .map(|size| match u64::try_from(size) {
                Ok(size) if size > 0 => Ok(size),
                _ => Err(Error::InvalidArgument(format!(
                    "max file size {size} must be positive"
                ))),
            })
            .transpose()
            .map_err(invalid)?;
        let backup_count = self
            .backup_count
            .map(|count| {
                usize::try_from(count).map_err(|_| {
                    Error::InvalidArgument(format!("backup count {count} must not be negative"))
                })
            })
            .transpose()
            .map_err(invalid)?;
        let period = self
            .when
            .as_deref()
            .map(str::parse::<Period>)
            .transpose()
            .map_err(invalid)?;
        if let Some(template) = &self.format_string {
            FormatPlan::compile(template).map_err(|e| invalid(e.into()))?;
        }

        let dir = Path::new(self.file_dir.as_deref().unwrap_or("."));
        let file_name = self.file_name.as_deref().unwrap_or("");
        let handler: Arc<dyn Handler> = match kind {
            HandlerKind::Basic => Arc::new(BasicHandler::new(dir, file_name).map_err(invalid)?),
            HandlerKind::Rotating => {
                let handler = RotatingHandler::new(dir, file_name).map_err(invalid)?;
                if let Some(size) = max_file_size {
                    handler.set_max_file_size(size).map_err(invalid)?;
                }
                if let Some(count) = backup_count {
                    handler.set_backup_count(count);
                }
                Arc::new(handler)
            }
            HandlerKind::TimeRotating => {
                let handler = TimeRotatingHandler::new(dir, file_name).map_err(invalid)?;
                if let Some(period) = period {
                    handler.set_when(&period.to_string()).map_err(invalid)?;
                }
                if let Some(count) = backup_count {
                    handler.set_backup_count(count);
                }
                Arc::new(handler)
            }
        };
        if let Some(template) = &self.format_string {
            handler.set_format_string(template).map_err(invalid)?;
        }
        if let Some(level) = level {
            handler.set_log_level(level);
        }
        Ok(handler)
    }
}

/// Handlers by name, and the handlers each logger attaches in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub handlers: BTreeMap<String, HandlerConfig>,
    #[serde(default)]
    pub loggers: BTreeMap<String, Vec<String>>,
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Builds a config from string property maps.
    pub fn from_properties(
        handlers: &HashMap<String, HashMap<String, String>>,
        loggers: &HashMap<String, Vec<String>>,
    ) -> Result<Self, ConfigError> {
        let handlers = handlers
            .iter()
            .map(|(name, properties)| {
                HandlerConfig::from_properties(properties).map(|config| (name.clone(), config))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        let loggers = loggers
            .iter()
            .map(|(name, handlers)| (name.clone(), handlers.clone()))
            .collect();
        Ok(Config { handlers, loggers })
    }

    /**
    Builds every handler and attaches them to the loggers of the global registry.

    Returns the built handlers by name.  On error, nothing is attached.
    */
    pub fn apply(&self) -> Result<BTreeMap<String, Arc<dyn Handler>>, ConfigError> {
        self.apply_to(Registry::global())
    }

    /// [`apply`](Self::apply), against a specific registry.
    pub fn apply_to(
        &self,
        registry: &Registry,
    ) -> Result<BTreeMap<String, Arc<dyn Handler>>, ConfigError> {
        for (logger, names) in &self.loggers {
            if let Some(missing) = names.iter().find(|n| !self.handlers.contains_key(*n)) {
                return Err(ConfigError::UnknownHandler {
                    logger: logger.clone(),
                    handler: missing.clone(),
                });
            }
        }
        let mut built = BTreeMap::new();
        for (name, handler) in &self.handlers {
            built.insert(name.clone(), handler.build(name)?);
        }
        for (logger, names) in &self.loggers {
            let logger = registry.logger(logger);
            for name in names {
                if let Some(handler) = built.get(name) {
                    logger.add_handler(handler.clone());
                }
            }
        }
        Ok(built)
    }
}
