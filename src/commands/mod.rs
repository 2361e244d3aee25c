//! Slash command processing.
//!
//! This module turns a [`CommandInvocation`] received from the chat platform
//! into exactly one [`Reply`].
//!
//! # Architecture
//!
//! ```text
//! CommandInvocation
//!      │
//!      ▼
//! ┌─────────────┐
//! │ Dispatcher  │  ← lookup in the registry, send the reply
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────────┐      ┌───────────────────┐
//! │ CommandRegistry │ ───▶ │ CommandDescriptor │
//! └─────────────────┘      │  - schema         │
//!                          │  - handler        │
//!                          └───────────────────┘
//!                                   │
//!                                   ▼
//!                          ┌───────────────────┐
//!                          │ Action handlers   │
//!                          │  - ping / help    │
//!                          │  - roll           │
//!                          │  - subscribe      │
//!                          │  - unsubscribe    │
//!                          │  - mygames        │
//!                          │  - games          │
//!                          └───────────────────┘
//!                                   │
//!                                   ▼
//!                               Reply (text, private)
//! ```
//!
//! Handlers never fail: domain errors and invalid parameters are rendered as
//! private replies by the handler itself, using the formatters of
//! [`responses`].

mod actions;
mod dispatcher;
mod registry;
mod responses;
mod schema;

use std::collections::HashMap;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::subscriptions::SubscriptionStore;

pub use crate::commands::{
    dispatcher::Dispatcher,
    registry::{CommandDescriptor, CommandNotFound, CommandRegistry},
    schema::{CommandOption, CommandSchema, OptionChoice, OptionKind},
};

/// A slash command as received from the chat platform.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandInvocation {
    /// Command name, without the leading `/`
    pub name: String,
    /// Option values keyed by option name
    #[serde(default)]
    pub parameters: HashMap<String, Value>,
    /// Id of the invoking user
    pub user_id: String,
    /// Display name of the invoking user
    pub display_name: String,
    #[serde(default)]
    pub guild_id: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
}

impl CommandInvocation {
    /// Returns the string value of the option `name`, if set.
    pub fn string_param(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).and_then(Value::as_str)
    }

    /// Returns the integer value of the option `name`, if set.
    pub fn integer_param(&self, name: &str) -> Option<i64> {
        self.parameters.get(name).and_then(Value::as_i64)
    }
}

/// The single response to a [`CommandInvocation`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// Only visible to the invoking user
    pub private: bool,
}

impl Reply {
    pub fn public(text: impl Into<String>) -> Self {
        Reply {
            text: text.into(),
            private: false,
        }
    }

    pub fn private(text: impl Into<String>) -> Self {
        Reply {
            text: text.into(),
            private: true,
        }
    }
}

/// Everything a handler can reach while executing.
#[derive(Clone, Copy)]
pub struct CommandContext<'a> {
    pub invocation: &'a CommandInvocation,
    pub store: &'a SubscriptionStore,
    pub registry: &'a CommandRegistry,
}

/// A slash command implementation.
///
/// `execute` returns a boxed future so handlers can live behind
/// `Arc<dyn CommandHandler>` in the registry.
pub trait CommandHandler: Send + Sync {
    /// Schema published to the chat platform.
    fn schema(&self) -> CommandSchema;

    /// Runs the command and builds its reply.
    fn execute<'a>(&'a self, context: CommandContext<'a>) -> BoxFuture<'a, Reply>;
}
