//! Lists the subscriptions of the invoking user. Private, read-only.

use futures::{FutureExt, future::BoxFuture};

use crate::commands::{
    CommandContext, CommandHandler, Reply, responses::format_my_games, schema::CommandSchema,
};

pub struct MyGamesCommand;

impl CommandHandler for MyGamesCommand {
    fn schema(&self) -> CommandSchema {
        CommandSchema::new("mygames", "See what games you're subscribed to")
    }

    fn execute<'a>(&'a self, context: CommandContext<'a>) -> BoxFuture<'a, Reply> {
        async move {
            let subscriptions = context
                .store
                .list_for_user(&context.invocation.user_id)
                .await;

            Reply::private(format_my_games(&subscriptions))
        }
        .boxed()
    }
}
