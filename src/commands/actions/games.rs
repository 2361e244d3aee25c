//! Games command handler.
//!
//! Lists every game with at least one subscriber and its subscriber count,
//! sorted by slug. This is a public, read-only command.

use futures::{FutureExt, future::BoxFuture};
use log::debug;

use crate::commands::{
    CommandContext, CommandHandler, Reply, responses::format_games, schema::CommandSchema,
};

pub struct GamesCommand;

impl CommandHandler for GamesCommand {
    fn schema(&self) -> CommandSchema {
        CommandSchema::new("games", "See all games people are subscribed to")
    }

    fn execute<'a>(&'a self, context: CommandContext<'a>) -> BoxFuture<'a, Reply> {
        async move {
            let counts = context.store.game_counts().await;
            debug!("{} games with subscribers", counts.len());

            Reply::public(format_games(&counts))
        }
        .boxed()
    }
}
