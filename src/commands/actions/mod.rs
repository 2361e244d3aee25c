//! Command action handlers.
//!
//! One [`CommandHandler`](crate::commands::CommandHandler) per slash command.
//! Each handler declares its schema and turns a
//! [`CommandContext`](crate::commands::CommandContext) into a single
//! [`Reply`](crate::commands::Reply).
//!
//! # Available Handlers
//!
//! - [`PingCommand`] - Check the bot is alive
//! - [`HelpCommand`] - List the registered commands
//! - [`RollCommand`] - Roll a dice
//! - [`SubscribeCommand`] - Subscribe to a game with an ntfy topic
//! - [`UnsubscribeCommand`] - Remove a subscription
//! - [`MyGamesCommand`] - List the invoking user's subscriptions
//! - [`GamesCommand`] - List the games with subscribers
//!
//! # State Changes
//!
//! Only `subscribe` and `unsubscribe` mutate state, through the
//! [`SubscriptionStore`](crate::subscriptions::SubscriptionStore). Store
//! errors are rendered as private replies.

mod games;
mod help;
mod my_games;
mod ping;
mod roll;
mod subscribe;
mod unsubscribe;

pub use crate::commands::actions::{
    games::GamesCommand, help::HelpCommand, my_games::MyGamesCommand, ping::PingCommand,
    roll::RollCommand, subscribe::SubscribeCommand, unsubscribe::UnsubscribeCommand,
};
