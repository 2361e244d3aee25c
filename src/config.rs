//! Configuration file structures for the LFG bot.
//!
//! The configuration is read from a YAML file and can be overridden with
//! environment variables prefixed by `LFGBOT_`, using `__` to separate
//! nested keys. Every field is optional.
//!
//! # Configuration File Format
//!
//! ```yaml
//! bot:
//!   # Id of the bot account, its own voice moves are ignored
//!   user_id: "1000"
//!   # Guild the command schemas are published to
//!   guild_id: "42"
//!
//! lfg:
//!   # Voice channel that triggers the looking-for-group announcement
//!   channel_id: "C1"
//!   # Text channel receiving announcements, found automatically when unset
//!   announcement_channel_id: "T1"
//!
//! console:
//!   # User invoking slash text typed on stdin
//!   user_id: "console"
//!   display_name: "Console"
//!   text_channels:
//!     - id: "T1"
//!       name: "general"
//!   users:
//!     "1001": "Alice"
//! ```
//!
//! # Environment Variable Overrides
//!
//! ```bash
//! export LFGBOT_LFG__CHANNEL_ID="C1"
//! export LFGBOT_BOT__USER_ID=123456789012345678
//! ```
//!
//! Ids are kept as strings. Numeric values, which figment reads from
//! unquoted YAML numbers and from variables like the one above, are accepted
//! too.

use std::collections::HashMap;

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Deserializer};

/// Root configuration structure.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotSection,
    #[serde(default)]
    pub lfg: LfgSection,
    #[serde(default)]
    pub console: ConsoleSection,
}

/// Bot account settings.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct BotSection {
    /// Id of the bot account.
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub user_id: Option<String>,
    /// Guild scope for command publication, global when unset.
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub guild_id: Option<String>,
}

/// Looking-for-group settings.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LfgSection {
    /// LFG voice channel. The voice trigger is disabled when unset.
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub channel_id: Option<String>,
    /// Forced announcement channel.
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub announcement_channel_id: Option<String>,
}

/// Settings of the console gateway.
#[derive(Clone, Debug, Deserialize)]
pub struct ConsoleSection {
    /// Invoker of slash text typed on stdin
    #[serde(
        default = "default_console_user_id",
        deserialize_with = "deserialize_id"
    )]
    pub user_id: String,
    #[serde(default = "default_console_display_name")]
    pub display_name: String,
    /// Text channels reported for every guild
    #[serde(default)]
    pub text_channels: Vec<ConsoleTextChannel>,
    /// Display names by user id
    #[serde(default)]
    pub users: HashMap<String, String>,
}

impl Default for ConsoleSection {
    fn default() -> Self {
        ConsoleSection {
            user_id: default_console_user_id(),
            display_name: default_console_display_name(),
            text_channels: Vec::new(),
            users: HashMap::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ConsoleTextChannel {
    pub id: String,
    pub name: String,
}

/// A chat platform id written either as a string or as a number.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl From<RawId> for String {
    fn from(id: RawId) -> Self {
        match id {
            RawId::Text(text) => text,
            RawId::Number(number) => number.to_string(),
        }
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}

fn default_console_user_id() -> String {
    "console".to_owned()
}

fn default_console_display_name() -> String {
    "Console".to_owned()
}

impl Config {
    /// Loads the configuration from the YAML file at `path`, then applies the
    /// `LFGBOT_` environment overrides.
    ///
    /// A missing file is not an error, every field has a default.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if the file or a variable has an invalid
    /// value for its field.
    pub fn load(path: &str) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed("LFGBOT_").split("__"))
            .extract()
    }
}
