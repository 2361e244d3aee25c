//! Unsubscribe command handler.

use futures::{FutureExt, future::BoxFuture};
use log::debug;

use crate::{
    commands::{
        CommandContext, CommandHandler, Reply,
        responses::{format_missing_option, format_store_error, format_successful_unsubscribe},
        schema::{CommandOption, CommandSchema},
    },
    utils::normalize_game,
};

pub struct UnsubscribeCommand;

impl CommandHandler for UnsubscribeCommand {
    fn schema(&self) -> CommandSchema {
        CommandSchema::new("unsubscribe", "Unsubscribe from game notifications").option(
            CommandOption::string("game", "The game to unsubscribe from")
                .required()
                .autocomplete(),
        )
    }

    fn execute<'a>(&'a self, context: CommandContext<'a>) -> BoxFuture<'a, Reply> {
        async move {
            let invocation = context.invocation;

            let game = normalize_game(invocation.string_param("game").unwrap_or_default());
            if game.is_empty() {
                return Reply::private(format_missing_option("game"));
            }

            debug!("unsubscribing user {} from {}", invocation.user_id, game);

            match context.store.unsubscribe(&invocation.user_id, &game).await {
                Ok(()) => Reply::private(format_successful_unsubscribe(&game)),
                Err(e) => Reply::private(format_store_error(&e)),
            }
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::commands::test_support::{create_test_invocation, create_test_store, run};

    #[tokio::test]
    async fn test_unsubscribe_success() {
        let dir = TempDir::new().unwrap();
        let store = create_test_store(&dir).await;
        store.subscribe("u1", "Alice", "among-us", "t").await.unwrap();
        store.subscribe("u1", "Alice", "apex", "t").await.unwrap();

        let reply = run(
            &UnsubscribeCommand,
            &create_test_invocation("unsubscribe", &[("game", json!("Among Us"))]),
            &store,
        )
        .await;

        assert_eq!(
            reply,
            Reply::private("✅ Successfully unsubscribed from **Among Us** notifications!")
        );
        let remaining = store.list_for_user("u1").await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].game, "apex");
    }

    #[tokio::test]
    async fn test_unsubscribe_not_subscribed() {
        let dir = TempDir::new().unwrap();
        let store = create_test_store(&dir).await;
        store.subscribe("u2", "Bob", "valorant", "t").await.unwrap();

        let reply = run(
            &UnsubscribeCommand,
            &create_test_invocation("unsubscribe", &[("game", json!("valorant"))]),
            &store,
        )
        .await;

        assert_eq!(reply, Reply::private("❌ Error: not subscribed to valorant"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_unsubscribe_missing_game() {
        let dir = TempDir::new().unwrap();
        let store = create_test_store(&dir).await;

        let reply = run(
            &UnsubscribeCommand,
            &create_test_invocation("unsubscribe", &[]),
            &store,
        )
        .await;

        assert!(reply.private);
        assert!(reply.text.contains("`game`"));
    }

    #[test]
    fn test_schema_requests_autocomplete() {
        let schema = UnsubscribeCommand.schema();

        assert!(schema.options[0].autocomplete);
        assert!(schema.options[0].required);
    }
}
