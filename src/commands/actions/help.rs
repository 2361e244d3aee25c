//! Help command handler.
//!
//! Lists every command of the registry with its description. The list is
//! built from the registry at execution time, so it always matches what was
//! registered at startup.

use futures::{FutureExt, future::BoxFuture};
use log::debug;

use crate::commands::{
    CommandContext, CommandHandler, Reply, responses::format_help, schema::CommandSchema,
};

pub struct HelpCommand;

impl CommandHandler for HelpCommand {
    fn schema(&self) -> CommandSchema {
        CommandSchema::new("help", "Show all available commands")
    }

    fn execute<'a>(&'a self, context: CommandContext<'a>) -> BoxFuture<'a, Reply> {
        async move {
            let schemas = context.registry.schemas();
            debug!("listing {} commands", schemas.len());

            Reply::public(format_help(&schemas))
        }
        .boxed()
    }
}
