//! Game subscriptions.
//!
//! Users subscribe to games with a personal ntfy topic so they can be told
//! when someone is looking for a session. The module consists of:
//!
//! - [`Subscription`]: one user's interest in one game
//! - [`SubscriptionStore`]: the concurrency-safe, durable collection
//! - [`SubscriptionLoader`]: reading and atomically rewriting the JSON document
//!
//! # Example Usage
//!
//! ```no_run
//! # async fn example() -> Result<(), StoreError> {
//! let store = SubscriptionStore::open("data/subscriptions.json").await?;
//!
//! store.subscribe("u1", "Alice", "valorant", "alice_topic").await?;
//! let games = store.list_games().await;
//! store.unsubscribe("u1", "valorant").await?;
//! # Ok(())
//! # }
//! ```

mod subscription;
mod subscription_loader;
mod subscription_store;

use thiserror::Error;

pub use crate::subscriptions::subscription_loader::SubscriptionLoader;
pub use crate::subscriptions::{
    subscription::Subscription, subscription_store::SubscriptionStore,
};

/// Errors returned by the [`SubscriptionStore`].
///
/// `AlreadySubscribed` and `NotSubscribed` are expected outcomes of user
/// commands. `Persistence` and `Load` are operational failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The user is already subscribed to the game.
    #[error("already subscribed to {0}")]
    AlreadySubscribed(String),
    /// The user is not subscribed to the game.
    #[error("not subscribed to {0}")]
    NotSubscribed(String),
    /// A required field was empty.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    /// Writing the subscriptions document failed; the mutation was rolled back.
    #[error("failed to persist subscriptions: {0}")]
    Persistence(String),
    /// The subscriptions document exists but could not be read or parsed.
    #[error("failed to load subscriptions: {0}")]
    Load(String),
}
