//! Line based gateway on stdin and stdout.
//!
//! Each input line is either a JSON [`InboundEvent`]:
//!
//! ```text
//! {"type":"command","name":"roll","parameters":{"sides":20},"user_id":"1001","display_name":"Alice"}
//! {"type":"voice","user_id":"1001","before":null,"after":"C1","guild_id":"42"}
//! ```
//!
//! or slash text invoked by the configured console user:
//!
//! ```text
//! /subscribe valorant alice_topic
//! ```
//!
//! Slash text arguments are mapped in order onto the options of the
//! published schema of the command. When the commands are published to a
//! guild, slash text is invoked in that guild. Replies and announcements are
//! printed to stdout.

use std::collections::HashMap;

use command_parser::Parser;
use log::{debug, info, warn};
use serde_json::Value;
use thiserror::Error;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    sync::{RwLock, mpsc},
};

use crate::{
    commands::{CommandInvocation, CommandSchema, OptionKind, Reply},
    config::ConsoleSection,
    gateway::{CommandScope, InboundEvent, TextChannel, Transport},
    lfg::Announcement,
};

/// Errors of a console input line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsoleParseError {
    #[error("line is neither a JSON event nor a slash command")]
    NotACommand,
    #[error("unable to parse slash command")]
    UnableToParse,
    #[error("invalid event: {0}")]
    InvalidEvent(String),
    #[error("option {option} expects an integer, got {value}")]
    InvalidInteger { option: String, value: String },
}

/// [`Transport`] printing to stdout, fed from stdin.
pub struct ConsoleGateway {
    config: ConsoleSection,
    /// Parser for slash text
    parser: Parser,
    /// Published schemas by command name
    schemas: RwLock<HashMap<String, CommandSchema>>,
    /// Scope of the last publication
    scope: RwLock<CommandScope>,
}

impl ConsoleGateway {
    pub fn new(config: ConsoleSection) -> Self {
        ConsoleGateway {
            config,
            parser: Parser::new('/', '-'),
            schemas: RwLock::new(HashMap::new()),
            scope: RwLock::new(CommandScope::Global),
        }
    }

    /// Reads events from stdin until it is closed or `tx` is dropped.
    pub async fn listen(&self, tx: mpsc::Sender<InboundEvent>) -> anyhow::Result<()> {
        self.listen_from(BufReader::new(tokio::io::stdin()), tx)
            .await
    }

    /// Reads events from `reader`, one per line. Invalid lines are skipped.
    pub async fn listen_from<R: AsyncBufRead + Unpin>(
        &self,
        reader: R,
        tx: mpsc::Sender<InboundEvent>,
    ) -> anyhow::Result<()> {
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            match self.parse_line(&line).await {
                Ok(event) => {
                    if tx.send(event).await.is_err() {
                        debug!("event channel closed, stop reading input");
                        break;
                    }
                }
                Err(e) => warn!("ignoring input line {:?}: {}", line, e),
            }
        }

        info!("console input closed");

        Ok(())
    }

    /// Parses one input line into an event.
    pub async fn parse_line(&self, line: &str) -> Result<InboundEvent, ConsoleParseError> {
        let line = line.trim();

        if line.starts_with('{') {
            return serde_json::from_str(line)
                .map_err(|e| ConsoleParseError::InvalidEvent(e.to_string()));
        }

        if !line.starts_with('/') {
            return Err(ConsoleParseError::NotACommand);
        }

        // The parser ignores the last word, so a dummy word is added at the end
        let body = line.to_string() + " dummy";
        let command = self
            .parser
            .parse(&body)
            .map_err(|_| ConsoleParseError::UnableToParse)?;

        debug!("parsed slash command: {:?}", command);

        let parameters = match self.schemas.read().await.get(&command.name) {
            Some(schema) => map_arguments(schema, &command.arguments)?,
            // Unknown names still reach the dispatcher which answers them
            None => HashMap::new(),
        };

        let guild_id = match &*self.scope.read().await {
            CommandScope::Guild(guild_id) => Some(guild_id.clone()),
            CommandScope::Global => None,
        };

        Ok(InboundEvent::Command(CommandInvocation {
            name: command.name,
            parameters,
            user_id: self.config.user_id.clone(),
            display_name: self.config.display_name.clone(),
            guild_id,
            channel_id: None,
        }))
    }
}

/// Maps positional `arguments` onto the options of `schema`.
///
/// Extra arguments are ignored, missing ones are left unset.
fn map_arguments(
    schema: &CommandSchema,
    arguments: &[String],
) -> Result<HashMap<String, Value>, ConsoleParseError> {
    schema
        .options
        .iter()
        .zip(arguments)
        .map(|(option, argument)| -> Result<(String, Value), ConsoleParseError> {
            let value = match option.kind {
                OptionKind::String => Value::from(argument.as_str()),
                OptionKind::Integer => argument.parse::<i64>().map(Value::from).map_err(|_| {
                    ConsoleParseError::InvalidInteger {
                        option: option.name.clone(),
                        value: argument.clone(),
                    }
                })?,
            };
            Ok((option.name.clone(), value))
        })
        .collect()
}

impl Transport for ConsoleGateway {
    async fn send_reply(
        &self,
        invocation: &CommandInvocation,
        reply: &Reply,
    ) -> anyhow::Result<()> {
        if reply.private {
            println!("[to {}] {}", invocation.display_name, reply.text);
        } else {
            println!("[public] {}", reply.text);
        }
        Ok(())
    }

    async fn send_announcement(&self, announcement: &Announcement) -> anyhow::Result<()> {
        println!("[#{}] {}", announcement.channel_id, announcement.text);
        Ok(())
    }

    async fn text_channels(&self, guild_id: &str) -> anyhow::Result<Vec<TextChannel>> {
        debug!("listing text channels of guild {}", guild_id);
        Ok(self
            .config
            .text_channels
            .iter()
            .map(|channel| TextChannel {
                id: channel.id.clone(),
                name: channel.name.clone(),
            })
            .collect())
    }

    async fn display_name(&self, user_id: &str) -> anyhow::Result<String> {
        if let Some(name) = self.config.users.get(user_id) {
            return Ok(name.clone());
        }
        if user_id == self.config.user_id {
            return Ok(self.config.display_name.clone());
        }
        Err(anyhow::anyhow!("unknown user {}", user_id))
    }

    async fn publish_commands(
        &self,
        schemas: &[CommandSchema],
        scope: &CommandScope,
    ) -> anyhow::Result<()> {
        let mut published = self.schemas.write().await;
        published.clear();
        for schema in schemas {
            debug!("publishing command {}", serde_json::to_string(schema)?);
            published.insert(schema.name.clone(), schema.clone());
        }
        *self.scope.write().await = scope.clone();
        info!("published {} commands {}", published.len(), scope);
        Ok(())
    }
}
