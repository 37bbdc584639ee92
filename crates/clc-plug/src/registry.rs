//! Mapping from command path to command.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::command::Command;
use crate::declaration::Declaration;
use crate::error::{Error, Result};

/// Separator between path segments, as in `map:get`.
pub const PATH_SEPARATOR: char = ':';

/// Every command the process knows about, keyed by path.
///
/// Filled during startup and read-only afterwards; share it behind an `Arc`
/// or a plain reference once registration is done.
#[derive(Default, Clone)]
pub struct CommandRegistry {
    commands: BTreeMap<String, Arc<dyn Command>>,
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("paths", &self.commands.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CommandRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `command` under `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateCommand`] if the path is taken and
    /// [`Error::InvalidPath`] if it is malformed.
    pub fn register(&mut self, path: &str, command: Arc<dyn Command>) -> Result<()> {
        if !is_valid_path(path) {
            return Err(Error::InvalidPath(path.to_string()));
        }
        if self.commands.contains_key(path) {
            return Err(Error::DuplicateCommand(path.to_string()));
        }
        debug!(path, "registered command");
        self.commands.insert(path.to_string(), command);
        Ok(())
    }

    /// Look a command up by exact path.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&Arc<dyn Command>> {
        self.commands.get(path)
    }

    /// Registered paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Number of registered commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Run every command's `init` and validate the result.
    ///
    /// # Errors
    ///
    /// Returns the first declaration error.
    pub fn declarations(&self) -> Result<Vec<Declaration>> {
        self.commands
            .iter()
            .map(|(path, command)| {
                let mut decl = Declaration::new(path.as_str());
                command.init(&mut decl)?;
                decl.validate()?;
                Ok(decl)
            })
            .collect()
    }
}

fn is_valid_path(path: &str) -> bool {
    !path.is_empty()
        && path.split(PATH_SEPARATOR).all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        })
}
