//! Ping command handler.

use futures::{FutureExt, future::BoxFuture};

use crate::commands::{
    CommandContext, CommandHandler, Reply, responses::format_pong, schema::CommandSchema,
};

pub struct PingCommand;

impl CommandHandler for PingCommand {
    fn schema(&self) -> CommandSchema {
        CommandSchema::new("ping", "Check if the bot is responding")
    }

    fn execute<'a>(&'a self, _context: CommandContext<'a>) -> BoxFuture<'a, Reply> {
        async move { Reply::public(format_pong()) }.boxed()
    }
}
