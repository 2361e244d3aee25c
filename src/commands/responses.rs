//! Markdown reply formatters for the slash commands.
//!
//! Every user visible string of the command layer is built here so handlers
//! only decide which formatter to call and whether the reply is private.

use log::error;

use crate::{
    commands::schema::CommandSchema,
    subscriptions::{StoreError, Subscription},
    utils::game_display_name,
};

/// Formats the reply to an unregistered command name.
pub fn format_unknown_command() -> String {
    "Unknown command!".to_owned()
}

pub fn format_pong() -> String {
    "🏓 Pong!".to_owned()
}

/// Formats the help message listing `schemas`.
///
/// Commands are listed by name so the message is stable whatever the registry
/// iteration order.
///
/// # Examples
///
/// ```
/// let help = format_help(&[CommandSchema::new("ping", "Check the bot is alive")]);
/// assert!(help.contains("**/ping** - Check the bot is alive"));
/// ```
pub fn format_help(schemas: &[CommandSchema]) -> String {
    let mut sorted: Vec<&CommandSchema> = schemas.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    let mut body = String::from("**Available Slash Commands:**\n\n");
    for schema in sorted {
        body.push_str(&format!("**/{}** - {}\n", schema.name, schema.description));
    }

    body
}

pub fn format_roll(result: i64, sides: i64) -> String {
    format!("🎲 You rolled a **{}** out of {}!", result, sides)
}

pub fn format_invalid_sides(min: i64, max: i64) -> String {
    format!("❌ The number of sides must be between {} and {}.", min, max)
}

pub fn format_missing_option(name: &str) -> String {
    format!("❌ Missing required option `{}`.", name)
}

/// Formats a successful subscription.
///
/// # Arguments
///
/// * `game` - The normalized game slug
/// * `topic` - The ntfy topic the user will be notified on
pub fn format_successful_subscribe(game: &str, topic: &str) -> String {
    format!(
        "✅ Successfully subscribed to **{}** notifications!\n\
         NTFY Topic: `{}`\n\
         You'll get notified when someone wants to play!",
        game_display_name(game),
        topic
    )
}

pub fn format_successful_unsubscribe(game: &str) -> String {
    format!(
        "✅ Successfully unsubscribed from **{}** notifications!",
        game_display_name(game)
    )
}

/// Formats a store failure.
///
/// Domain outcomes are shown to the user as is. Operational failures get a
/// generic message and their cause is logged.
pub fn format_store_error(e: &StoreError) -> String {
    match e {
        StoreError::AlreadySubscribed(_)
        | StoreError::NotSubscribed(_)
        | StoreError::EmptyField(_) => format!("❌ Error: {}", e),
        StoreError::Persistence(_) | StoreError::Load(_) => {
            error!("subscription store failure: {}", e);
            "❌ Something went wrong, please try again later.".to_owned()
        }
    }
}

/// Formats the subscriptions of one user, in stored order.
pub fn format_my_games(subscriptions: &[Subscription]) -> String {
    if subscriptions.is_empty() {
        return "📱 You're not subscribed to any games yet!\nUse `/subscribe` to get started."
            .to_owned();
    }

    let mut body = String::from("📱 **Your Game Subscriptions:**\n\n");
    for subscription in subscriptions {
        body.push_str(&format!(
            "🎮 **{}** → `{}`\n",
            game_display_name(&subscription.game),
            subscription.ntfy_topic
        ));
    }

    body
}

/// Formats the games that have subscribers.
///
/// # Arguments
///
/// * `games` - `(slug, subscriber count)` pairs, already sorted by slug
pub fn format_games(games: &[(String, usize)]) -> String {
    if games.is_empty() {
        return "🎮 No one is subscribed to any games yet!".to_owned();
    }

    let mut body = String::from("🎮 **Games with subscribers:**\n\n");
    for (game, count) in games {
        body.push_str(&format!(
            "**{}** ({} subscribers)\n",
            game_display_name(game),
            count
        ));
    }

    body
}
