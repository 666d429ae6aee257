// SPDX-License-Identifier: MIT OR Apache-2.0

//! The process-wide registry.
//!
//! The registry owns the two pieces of global state in filewise:
//!
//! - the logger-name map, so [`get_logger`] returns the same [`Logger`] for the same name
//!   from anywhere in the program, and
//! - the handler-id counter, so every handler gets an id no other handler in the process
//!   has.  Loggers detach handlers by id.
//!
//! Both live behind a single [`Spinlock`], initialized on first use and never torn down.
//! The lock is held only for the lookup-or-insert or the counter bump.
//!
//! # Examples
//!
//! ```
//! use filewise::get_logger;
//! use std::sync::Arc;
//!
//! let a = get_logger("registry-doc");
//! let b = get_logger("registry-doc");
//! assert!(Arc::ptr_eq(&a, &b));
//! ```

use crate::handler::HandlerId;
use crate::logger::Logger;
use crate::spinlock::Spinlock;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

#[derive(Debug)]
struct RegistryState {
    next_handler_id: u64,
    loggers: HashMap<String, Arc<Logger>>,
}

/// Logger lookup and handler-id allocation.
#[derive(Debug)]
pub struct Registry {
    state: Spinlock<RegistryState>,
}

static GLOBAL_REGISTRY: OnceLock<Registry> = OnceLock::new();

impl Registry {
    fn new() -> Self {
        Self {
            state: Spinlock::new(RegistryState {
                next_handler_id: 1,
                loggers: HashMap::new(),
            }),
        }
    }

    /// The registry for this process.
    pub fn global() -> &'static Registry {
        GLOBAL_REGISTRY.get_or_init(Registry::new)
    }

    /// Returns the logger named `name`, creating it if needed.
    pub fn logger(&self, name: &str) -> Arc<Logger> {
        self.state.with_mut(|state| {
            state
                .loggers
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(Logger::new(name)))
                .clone()
        })
    }

    /// Names of every logger created so far, sorted.
    pub fn logger_names(&self) -> Vec<String> {
        let mut names = self
            .state
            .with_mut(|state| state.loggers.keys().cloned().collect::<Vec<_>>());
        names.sort();
        names
    }

    /// Allocates the next handler id.
    pub fn next_handler_id(&self) -> HandlerId {
        self.state.with_mut(|state| {
            let id = state.next_handler_id;
            state.next_handler_id += 1;
            HandlerId(id)
        })
    }
}

/// Returns the logger named `name` from the global registry, creating it if needed.
pub fn get_logger(name: &str) -> Arc<Logger> {
    Registry::global().logger(name)
}
