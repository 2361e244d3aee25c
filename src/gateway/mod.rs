//! Chat platform boundary.
//!
//! The core never talks to a chat platform directly. Replies, announcements
//! and lookups go through the [`Transport`] trait, and inbound traffic arrives
//! as [`InboundEvent`]s on a channel consumed by the [`Bot`](crate::bot::Bot).
//!
//! [`ConsoleGateway`] is the bundled implementation: it reads events from
//! stdin and prints everything it sends.

mod console;

use std::{fmt, future::Future};

use mockall::automock;
use serde::Deserialize;

use crate::{
    commands::{CommandInvocation, CommandSchema, Reply},
    lfg::{Announcement, VoiceTransition},
};

pub use crate::gateway::console::ConsoleGateway;

/// A text channel of a guild.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TextChannel {
    pub id: String,
    pub name: String,
}

/// Event received from the chat platform.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    /// A slash command was invoked
    Command(CommandInvocation),
    /// A user's voice channel changed
    Voice(VoiceTransition),
}

/// Where command schemas are published.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandScope {
    /// Every guild the bot is in
    Global,
    /// A single guild, where changes show up immediately
    Guild(String),
}

impl From<Option<String>> for CommandScope {
    fn from(guild_id: Option<String>) -> Self {
        match guild_id {
            Some(guild_id) => CommandScope::Guild(guild_id),
            None => CommandScope::Global,
        }
    }
}

impl fmt::Display for CommandScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandScope::Global => write!(f, "globally"),
            CommandScope::Guild(guild_id) => write!(f, "to guild {}", guild_id),
        }
    }
}

/// Outbound side of the chat platform.
///
/// This trait abstracts the platform operations for easier testing with mocks.
/// Implementations may use `async fn`; the returned futures must be `Send` so
/// events can be handled on any runtime thread.
#[automock]
pub trait Transport {
    /// Sends the reply to a command, privately to the invoker if requested.
    fn send_reply(
        &self,
        invocation: &CommandInvocation,
        reply: &Reply,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
    /// Posts an announcement in a text channel.
    fn send_announcement(
        &self,
        announcement: &Announcement,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
    /// Lists the text channels of a guild, in platform order.
    fn text_channels(
        &self,
        guild_id: &str,
    ) -> impl Future<Output = anyhow::Result<Vec<TextChannel>>> + Send;
    /// Resolves the display name of a user.
    fn display_name(&self, user_id: &str) -> impl Future<Output = anyhow::Result<String>> + Send;
    /// Publishes the command schemas in `scope` so the platform can offer
    /// them.
    fn publish_commands(
        &self,
        schemas: &[CommandSchema],
        scope: &CommandScope,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
}
