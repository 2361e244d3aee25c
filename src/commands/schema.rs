//! Declarative command schemas.
//!
//! A [`CommandSchema`] describes a slash command and its options. The core
//! never interprets it beyond option names; it is published as is to the chat
//! platform through the [`Transport`](crate::gateway::Transport).

use serde::Serialize;

/// Type of a command option value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    String,
    Integer,
}

/// A predefined value offered for an option.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OptionChoice {
    /// Label shown to the user
    pub name: String,
    /// Value sent back in the invocation
    pub value: String,
}

/// One option accepted by a command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommandOption {
    pub name: String,
    pub description: String,
    pub kind: OptionKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<OptionChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<i64>,
    /// Whether the platform should ask the bot for suggestions while typing
    pub autocomplete: bool,
}

impl CommandOption {
    fn new(name: &str, description: &str, kind: OptionKind) -> Self {
        CommandOption {
            name: name.to_owned(),
            description: description.to_owned(),
            kind,
            required: false,
            choices: Vec::new(),
            min_value: None,
            max_value: None,
            autocomplete: false,
        }
    }

    /// Creates an optional string option.
    pub fn string(name: &str, description: &str) -> Self {
        Self::new(name, description, OptionKind::String)
    }

    /// Creates an optional integer option.
    pub fn integer(name: &str, description: &str) -> Self {
        Self::new(name, description, OptionKind::Integer)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn choices(mut self, choices: Vec<OptionChoice>) -> Self {
        self.choices = choices;
        self
    }

    pub fn range(mut self, min_value: i64, max_value: i64) -> Self {
        self.min_value = Some(min_value);
        self.max_value = Some(max_value);
        self
    }

    pub fn autocomplete(mut self) -> Self {
        self.autocomplete = true;
        self
    }
}

/// Description of a slash command.
///
/// # Examples
///
/// ```
/// let schema = CommandSchema::new("roll", "Roll a dice")
///     .option(CommandOption::integer("sides", "Number of sides").range(1, 1000));
/// assert_eq!(schema.options.len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommandSchema {
    /// Unique command name, without the leading `/`
    pub name: String,
    pub description: String,
    /// Options in declaration order
    pub options: Vec<CommandOption>,
}

impl CommandSchema {
    pub fn new(name: &str, description: &str) -> Self {
        CommandSchema {
            name: name.to_owned(),
            description: description.to_owned(),
            options: Vec::new(),
        }
    }

    pub fn option(mut self, option: CommandOption) -> Self {
        self.options.push(option);
        self
    }
}
