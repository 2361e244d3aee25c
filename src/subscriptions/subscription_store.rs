//! Durable, concurrency-safe subscription store.
//!
//! This module provides the [`SubscriptionStore`], the single source of truth
//! for game subscriptions. Every command handler goes through its API; no
//! other component reads or writes the backing file.

use std::collections::{BTreeMap, HashSet};

use log::{debug, error, info};
use tokio::sync::RwLock;

use crate::subscriptions::{StoreError, Subscription, SubscriptionLoader};

/// Stores game subscriptions and persists them on every mutation.
///
/// # Concurrency
///
/// The collection lives behind a [`RwLock`]. Reads share the lock. Mutations
/// take it exclusively and keep it through the persistence write, so writes
/// are linearized: two concurrent subscribes for the same `(user, game)` pair
/// end with exactly one success and one [`StoreError::AlreadySubscribed`].
///
/// # Durability
///
/// A mutation is applied in memory, then the full collection is persisted.
/// Success is only reported once the write landed; if it fails the in-memory
/// change is rolled back and [`StoreError::Persistence`] is returned.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> Result<(), StoreError> {
/// let store = SubscriptionStore::open("subscriptions.json").await?;
/// store.subscribe("u1", "Alice", "valorant", "alice_topic").await?;
/// assert_eq!(store.list_for_user("u1").await.len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct SubscriptionStore {
    /// Subscriptions in insertion order
    subscriptions: RwLock<Vec<Subscription>>,
    /// Loader for the backing document
    loader: SubscriptionLoader,
}

impl SubscriptionStore {
    /// Opens the store backed by the document at `path`.
    ///
    /// # Errors
    ///
    /// A missing document starts an empty store. A malformed one returns
    /// [`StoreError::Load`] so startup can surface it instead of silently
    /// discarding data.
    pub async fn open(path: impl Into<std::path::PathBuf>) -> Result<Self, StoreError> {
        let loader = SubscriptionLoader::new(path);
        let subscriptions = loader.load().await?;

        Ok(SubscriptionStore {
            subscriptions: RwLock::new(subscriptions),
            loader,
        })
    }

    /// Subscribes `user_id` to `game` with the ntfy `topic`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::EmptyField`] if `user_id`, `game` or `topic` is empty
    /// - [`StoreError::AlreadySubscribed`] if the pair already exists, nothing is changed
    /// - [`StoreError::Persistence`] if the write failed, the subscription is rolled back
    pub async fn subscribe(
        &self,
        user_id: &str,
        display_name: &str,
        game: &str,
        topic: &str,
    ) -> Result<(), StoreError> {
        check_not_empty("user_id", user_id)?;
        check_not_empty("game", game)?;
        check_not_empty("topic", topic)?;

        let mut subscriptions = self.subscriptions.write().await;

        if subscriptions.iter().any(|sub| sub.is_for(user_id, game)) {
            debug!("user {} already subscribed to {}", user_id, game);
            return Err(StoreError::AlreadySubscribed(game.to_owned()));
        }

        subscriptions.push(Subscription {
            user_id: user_id.to_owned(),
            username: display_name.to_owned(),
            game: game.to_owned(),
            ntfy_topic: topic.to_owned(),
        });

        if let Err(e) = self.loader.persist(&subscriptions).await {
            subscriptions.pop();
            error!(
                "failed to persist subscription of user {} to {}: {}",
                user_id, game, e
            );
            return Err(e);
        }

        info!("subscribed user {} to {}", user_id, game);

        Ok(())
    }

    /// Removes the subscription of `user_id` to `game`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotSubscribed`] if no such subscription exists
    /// - [`StoreError::Persistence`] if the write failed, the subscription is restored
    pub async fn unsubscribe(&self, user_id: &str, game: &str) -> Result<(), StoreError> {
        let mut subscriptions = self.subscriptions.write().await;

        let Some(index) = subscriptions.iter().position(|sub| sub.is_for(user_id, game)) else {
            debug!("user {} is not subscribed to {}", user_id, game);
            return Err(StoreError::NotSubscribed(game.to_owned()));
        };

        let removed = subscriptions.remove(index);

        if let Err(e) = self.loader.persist(&subscriptions).await {
            subscriptions.insert(index, removed);
            error!(
                "failed to persist unsubscription of user {} from {}: {}",
                user_id, game, e
            );
            return Err(e);
        }

        info!("unsubscribed user {} from {}", user_id, game);

        Ok(())
    }

    /// Returns the subscriptions of `user_id`, in stored order.
    pub async fn list_for_user(&self, user_id: &str) -> Vec<Subscription> {
        self.subscriptions
            .read()
            .await
            .iter()
            .filter(|sub| sub.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Returns every subscription to `game`.
    pub async fn list_subscribers_for_game(&self, game: &str) -> Vec<Subscription> {
        self.subscriptions
            .read()
            .await
            .iter()
            .filter(|sub| sub.game == game)
            .cloned()
            .collect()
    }

    /// Returns the games having at least one subscriber.
    pub async fn list_games(&self) -> HashSet<String> {
        self.subscriptions
            .read()
            .await
            .iter()
            .map(|sub| sub.game.clone())
            .collect()
    }

    /// Returns every subscribed game with its number of subscribers, sorted
    /// by game.
    ///
    /// The counts are taken from a single snapshot, so a game is never listed
    /// with zero subscribers.
    pub async fn game_counts(&self) -> Vec<(String, usize)> {
        let subscriptions = self.subscriptions.read().await;

        let mut counts = BTreeMap::new();
        for sub in subscriptions.iter() {
            *counts.entry(sub.game.clone()).or_insert(0) += 1;
        }

        counts.into_iter().collect()
    }

    /// Number of stored subscriptions.
    pub async fn len(&self) -> usize {
        self.subscriptions.read().await.len()
    }
}

fn check_not_empty(field: &'static str, value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::EmptyField(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::*;

    async fn create_test_store(dir: &TempDir) -> SubscriptionStore {
        SubscriptionStore::open(dir.path().join("subscriptions.json"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_open_missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = create_test_store(&dir).await;

        assert_eq!(store.len().await, 0);
        assert!(store.list_games().await.is_empty());
    }

    #[tokio::test]
    async fn test_open_malformed_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("subscriptions.json");
        tokio::fs::write(&path, "[{\"user_id\": 42}]").await.unwrap();

        let result = SubscriptionStore::open(path).await;

        assert!(matches!(result, Err(StoreError::Load(_))));
    }

    #[tokio::test]
    async fn test_subscribe_then_list_for_user() {
        let dir = TempDir::new().unwrap();
        let store = create_test_store(&dir).await;

        store
            .subscribe("u1", "Alice", "valorant", "alice_topic")
            .await
            .unwrap();

        let subscriptions = store.list_for_user("u1").await;
        assert_eq!(subscriptions.len(), 1);
        assert_eq!(subscriptions[0].game, "valorant");
        assert_eq!(subscriptions[0].ntfy_topic, "alice_topic");
        assert_eq!(subscriptions[0].username, "Alice");
    }

    #[tokio::test]
    async fn test_subscribe_duplicate_is_rejected_and_keeps_first() {
        let dir = TempDir::new().unwrap();
        let store = create_test_store(&dir).await;

        store
            .subscribe("u1", "Alice", "valorant", "alice_topic")
            .await
            .unwrap();
        let result = store
            .subscribe("u1", "Alice", "valorant", "other_topic")
            .await;

        assert!(matches!(result, Err(StoreError::AlreadySubscribed(game)) if game == "valorant"));
        let subscriptions = store.list_for_user("u1").await;
        assert_eq!(subscriptions.len(), 1);
        assert_eq!(subscriptions[0].ntfy_topic, "alice_topic");
    }

    #[tokio::test]
    async fn test_subscribe_same_game_different_users() {
        let dir = TempDir::new().unwrap();
        let store = create_test_store(&dir).await;

        store.subscribe("u1", "Alice", "apex", "a").await.unwrap();
        store.subscribe("u2", "Bob", "apex", "b").await.unwrap();

        assert_eq!(store.list_subscribers_for_game("apex").await.len(), 2);
        assert_eq!(store.list_games().await, HashSet::from(["apex".to_string()]));
    }

    #[tokio::test]
    async fn test_subscribe_rejects_empty_fields() {
        let dir = TempDir::new().unwrap();
        let store = create_test_store(&dir).await;

        assert!(matches!(
            store.subscribe("", "Alice", "apex", "a").await,
            Err(StoreError::EmptyField("user_id"))
        ));
        assert!(matches!(
            store.subscribe("u1", "Alice", " ", "a").await,
            Err(StoreError::EmptyField("game"))
        ));
        assert!(matches!(
            store.subscribe("u1", "Alice", "apex", "").await,
            Err(StoreError::EmptyField("topic"))
        ));
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_unsubscribe_removes_subscription() {
        let dir = TempDir::new().unwrap();
        let store = create_test_store(&dir).await;

        store.subscribe("u1", "Alice", "apex", "a").await.unwrap();
        store.subscribe("u1", "Alice", "valorant", "a").await.unwrap();
        store.unsubscribe("u1", "apex").await.unwrap();

        let subscriptions = store.list_for_user("u1").await;
        assert_eq!(subscriptions.len(), 1);
        assert_eq!(subscriptions[0].game, "valorant");
    }

    #[tokio::test]
    async fn test_unsubscribe_on_empty_store_fails() {
        let dir = TempDir::new().unwrap();
        let store = create_test_store(&dir).await;

        assert!(store.list_games().await.is_empty());
        let result = store.unsubscribe("u1", "valorant").await;

        assert!(matches!(result, Err(StoreError::NotSubscribed(game)) if game == "valorant"));
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_unsubscribe_other_user_keeps_subscription() {
        let dir = TempDir::new().unwrap();
        let store = create_test_store(&dir).await;

        store.subscribe("u1", "Alice", "apex", "a").await.unwrap();
        let result = store.unsubscribe("u2", "apex").await;

        assert!(matches!(result, Err(StoreError::NotSubscribed(_))));
        assert_eq!(store.list_for_user("u1").await.len(), 1);
    }

    #[tokio::test]
    async fn test_mutations_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("subscriptions.json");

        let store = SubscriptionStore::open(path.clone()).await.unwrap();
        for i in 0..10 {
            store
                .subscribe(&format!("u{}", i), "name", "valorant", "topic")
                .await
                .unwrap();
        }
        store.unsubscribe("u3", "valorant").await.unwrap();
        let before: HashSet<Subscription> = store
            .list_subscribers_for_game("valorant")
            .await
            .into_iter()
            .collect();

        let reopened = SubscriptionStore::open(path).await.unwrap();
        let after: HashSet<Subscription> = reopened
            .list_subscribers_for_game("valorant")
            .await
            .into_iter()
            .collect();

        assert_eq!(before.len(), 9);
        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn test_list_games_is_stable_without_writes() {
        let dir = TempDir::new().unwrap();
        let store = create_test_store(&dir).await;

        store.subscribe("u1", "Alice", "apex", "a").await.unwrap();
        store.subscribe("u2", "Bob", "cs2", "b").await.unwrap();

        assert_eq!(store.list_games().await, store.list_games().await);
    }

    #[tokio::test]
    async fn test_subscribe_rolls_back_on_persistence_failure() {
        let dir = TempDir::new().unwrap();
        let store = create_test_store(&dir).await;
        store.subscribe("u1", "Alice", "apex", "a").await.unwrap();

        // The parent directory disappears, every write now fails
        std::fs::remove_dir_all(dir.path()).unwrap();

        let result = store.subscribe("u1", "Alice", "valorant", "a").await;

        assert!(matches!(result, Err(StoreError::Persistence(_))));
        let subscriptions = store.list_for_user("u1").await;
        assert_eq!(subscriptions.len(), 1);
        assert_eq!(subscriptions[0].game, "apex");
    }

    #[tokio::test]
    async fn test_unsubscribe_rolls_back_on_persistence_failure() {
        let dir = TempDir::new().unwrap();
        let store = create_test_store(&dir).await;
        store.subscribe("u1", "Alice", "apex", "a").await.unwrap();
        store.subscribe("u1", "Alice", "cs2", "a").await.unwrap();
        store.subscribe("u1", "Alice", "lol", "a").await.unwrap();

        std::fs::remove_dir_all(dir.path()).unwrap();

        let result = store.unsubscribe("u1", "cs2").await;

        assert!(matches!(result, Err(StoreError::Persistence(_))));
        let games: Vec<String> = store
            .list_for_user("u1")
            .await
            .into_iter()
            .map(|sub| sub.game)
            .collect();
        assert_eq!(games, vec!["apex", "cs2", "lol"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_subscribes_distinct_pairs() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(create_test_store(&dir).await);

        let handles: Vec<_> = (0..50)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .subscribe(
                            &format!("u{}", i % 10),
                            "name",
                            &format!("game{}", i / 10),
                            "topic",
                        )
                        .await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.len().await, 50);
        let reopened = SubscriptionStore::open(dir.path().join("subscriptions.json"))
            .await
            .unwrap();
        assert_eq!(reopened.len().await, 50);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_subscribes_same_pair() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(create_test_store(&dir).await);

        let handles: Vec<_> = (0..2)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .subscribe("u1", "Alice", "valorant", &format!("topic{}", i))
                        .await
                })
            })
            .collect();

        let mut successes = 0;
        let mut duplicates = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => successes += 1,
                Err(StoreError::AlreadySubscribed(_)) => duplicates += 1,
                Err(e) => panic!("unexpected error {}", e),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(duplicates, 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_open_duplicate_pair_fails() {
        let dir = TempDir::new().unwrap();
        let document = r#"[
            {"user_id":"u1","username":"Alice","game":"valorant","ntfy_topic":"t1"},
            {"user_id":"u1","username":"Alice","game":"valorant","ntfy_topic":"t2"}
        ]"#;
        std::fs::write(dir.path().join("subscriptions.json"), document).unwrap();

        let result = SubscriptionStore::open(dir.path().join("subscriptions.json")).await;

        assert!(matches!(result, Err(StoreError::Load(_))));
    }

    #[tokio::test]
    async fn test_game_counts_sorted_by_game() {
        let dir = TempDir::new().unwrap();
        let store = create_test_store(&dir).await;
        store.subscribe("u1", "Alice", "valorant", "t1").await.unwrap();
        store.subscribe("u2", "Bob", "apex", "t2").await.unwrap();
        store.subscribe("u2", "Bob", "valorant", "t3").await.unwrap();

        assert_eq!(
            store.game_counts().await,
            vec![("apex".to_string(), 1), ("valorant".to_string(), 2)]
        );

        store.unsubscribe("u2", "apex").await.unwrap();

        assert_eq!(store.game_counts().await, vec![("valorant".to_string(), 2)]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_game_counts_never_reports_empty_games() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(create_test_store(&dir).await);
        store.subscribe("u0", "Anchor", "apex", "t").await.unwrap();

        let writer = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                for _ in 0..20 {
                    store.subscribe("u1", "Alice", "valorant", "t").await.unwrap();
                    store.unsubscribe("u1", "valorant").await.unwrap();
                }
            })
        };

        for _ in 0..50 {
            for (game, count) in store.game_counts().await {
                assert!(count > 0, "{} listed without subscribers", game);
            }
        }

        writer.await.unwrap();
    }
}
