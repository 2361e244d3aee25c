//! Subscribe command handler.
//!
//! Subscribes the invoking user to a game with their personal ntfy topic.
//! The game name is normalized into a slug before reaching the store, so
//! `Rocket League` and `rocket-league` are the same subscription.
//!
//! # Errors
//!
//! Missing options and store errors are returned as private replies.

use futures::{FutureExt, future::BoxFuture};
use log::debug;

use crate::{
    commands::{
        CommandContext, CommandHandler, Reply,
        responses::{format_missing_option, format_store_error, format_successful_subscribe},
        schema::{CommandOption, CommandSchema, OptionChoice},
    },
    utils::{game_display_name, normalize_game},
};

/// Games offered as choices by the platform UI. Any other slug is accepted.
pub const COMMON_GAMES: [&str; 18] = [
    "valorant",
    "csgo",
    "cs2",
    "overwatch",
    "apex",
    "fortnite",
    "minecraft",
    "rocket-league",
    "cod",
    "warzone",
    "dota2",
    "lol",
    "among-us",
    "fall-guys",
    "gta",
    "rust",
    "destiny2",
    "wow",
];

pub struct SubscribeCommand;

impl CommandHandler for SubscribeCommand {
    fn schema(&self) -> CommandSchema {
        let choices = COMMON_GAMES
            .iter()
            .map(|game| OptionChoice {
                name: game_display_name(game),
                value: game.to_string(),
            })
            .collect();

        CommandSchema::new("subscribe", "Subscribe to notifications for a game")
            .option(
                CommandOption::string("game", "The game you want notifications for")
                    .required()
                    .choices(choices),
            )
            .option(
                CommandOption::string("ntfy-topic", "Your NTFY topic (e.g., 'john_gaming')")
                    .required(),
            )
    }

    fn execute<'a>(&'a self, context: CommandContext<'a>) -> BoxFuture<'a, Reply> {
        async move {
            let invocation = context.invocation;

            let game = normalize_game(invocation.string_param("game").unwrap_or_default());
            if game.is_empty() {
                return Reply::private(format_missing_option("game"));
            }

            let topic = invocation
                .string_param("ntfy-topic")
                .unwrap_or_default()
                .trim();
            if topic.is_empty() {
                return Reply::private(format_missing_option("ntfy-topic"));
            }

            debug!(
                "subscribing user {} to {} on topic {}",
                invocation.user_id, game, topic
            );

            match context
                .store
                .subscribe(&invocation.user_id, &invocation.display_name, &game, topic)
                .await
            {
                Ok(()) => Reply::private(format_successful_subscribe(&game, topic)),
                Err(e) => Reply::private(format_store_error(&e)),
            }
        }
        .boxed()
    }
}
