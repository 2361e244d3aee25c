//! Game subscription record.
//!
//! This module provides the [`Subscription`] struct, one user's interest in
//! looking-for-game notifications for one game.

use serde::{Deserialize, Serialize};

/// A user subscribed to notifications for a game.
///
/// Identity is the `(user_id, game)` pair: the store never holds two
/// subscriptions with the same pair. `username` is informational only and is
/// not part of the identity.
///
/// The field names are the on-disk names of the persisted document.
///
/// # Examples
///
/// ```
/// let subscription = Subscription {
///     user_id: "u1".to_string(),
///     username: "Alice".to_string(),
///     game: "valorant".to_string(),
///     ntfy_topic: "alice_topic".to_string(),
/// };
/// assert!(subscription.is_for("u1", "valorant"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subscription {
    /// Stable chat platform user ID.
    pub user_id: String,
    /// Display name of the user when they subscribed.
    pub username: String,
    /// Normalized game slug, e.g. `rocket-league`.
    pub game: String,
    /// The user's personal ntfy topic.
    pub ntfy_topic: String,
}

impl Subscription {
    /// Returns `true` if this subscription belongs to `user_id` for `game`.
    pub fn is_for(&self, user_id: &str, game: &str) -> bool {
        self.user_id == user_id && self.game == game
    }
}
