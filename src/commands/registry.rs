//! Command registry.
//!
//! Maps command names to their [`CommandDescriptor`]. The registry is filled
//! once at startup and only read afterwards, so it is shared behind an `Arc`
//! without locking.

use std::{collections::HashMap, sync::Arc};

use log::debug;
use thiserror::Error;

use crate::commands::{
    CommandHandler,
    actions::{
        GamesCommand, HelpCommand, MyGamesCommand, PingCommand, RollCommand, SubscribeCommand,
        UnsubscribeCommand,
    },
    schema::CommandSchema,
};

/// Returned by [`CommandRegistry::lookup`] for an unregistered name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown command {0}")]
pub struct CommandNotFound(pub String);

/// A command schema bound to its handler.
#[derive(Clone)]
pub struct CommandDescriptor {
    pub schema: CommandSchema,
    pub handler: Arc<dyn CommandHandler>,
}

impl CommandDescriptor {
    /// Builds a descriptor from a handler, taking the schema it declares.
    pub fn new(handler: impl CommandHandler + 'static) -> Self {
        CommandDescriptor {
            schema: handler.schema(),
            handler: Arc::new(handler),
        }
    }

    pub fn name(&self) -> &str {
        &self.schema.name
    }
}

/// Name-indexed set of commands.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    commands: HashMap<String, CommandDescriptor>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry holding every built-in command.
    pub fn with_default_commands() -> Self {
        let mut registry = Self::new();
        registry.register(CommandDescriptor::new(PingCommand));
        registry.register(CommandDescriptor::new(HelpCommand));
        registry.register(CommandDescriptor::new(RollCommand));
        registry.register(CommandDescriptor::new(SubscribeCommand));
        registry.register(CommandDescriptor::new(UnsubscribeCommand));
        registry.register(CommandDescriptor::new(MyGamesCommand));
        registry.register(CommandDescriptor::new(GamesCommand));
        registry
    }

    /// Registers `descriptor` under its schema name.
    ///
    /// A descriptor already registered under the same name is replaced.
    pub fn register(&mut self, descriptor: CommandDescriptor) {
        let name = descriptor.name().to_owned();
        if self.commands.insert(name.clone(), descriptor).is_some() {
            debug!("replaced command {}", name);
        } else {
            debug!("registered command {}", name);
        }
    }

    /// Finds the descriptor registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandNotFound`] if no command has this name.
    pub fn lookup(&self, name: &str) -> Result<&CommandDescriptor, CommandNotFound> {
        self.commands
            .get(name)
            .ok_or_else(|| CommandNotFound(name.to_owned()))
    }

    /// Returns every registered descriptor, in no particular order.
    pub fn list_all(&self) -> Vec<&CommandDescriptor> {
        self.commands.values().collect()
    }

    /// Returns the schemas of every registered command.
    pub fn schemas(&self) -> Vec<CommandSchema> {
        self.list_all()
            .into_iter()
            .map(|descriptor| descriptor.schema.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
