//! Looking-for-group announcements.
//!
//! When a user joins the configured LFG voice channel, the
//! [`VoiceTrigger`] announces in a text channel that they are looking for
//! people to play.
//!
//! # Channel Resolution
//!
//! The announcement goes to the configured announcement channel if any.
//! Otherwise the first text channel whose name contains `general`, `gaming`,
//! `lfg` or `announcements` is used, then the first text channel of the guild.

mod voice_trigger;

use serde::Deserialize;
use thiserror::Error;

pub use crate::lfg::voice_trigger::{VoiceTrigger, pick_announcement_channel};

/// A change of voice channel for one user.
///
/// `before` and `after` are `None` when the user was not, or is no longer,
/// in a voice channel.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct VoiceTransition {
    pub user_id: String,
    #[serde(default)]
    pub before: Option<String>,
    #[serde(default)]
    pub after: Option<String>,
    pub guild_id: String,
}

/// A user who joined the LFG voice channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSeeker {
    pub user_id: String,
    pub display_name: String,
    pub guild_id: String,
    pub voice_channel_id: String,
}

/// Message posted in a text channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Announcement {
    pub channel_id: String,
    pub text: String,
}

impl Announcement {
    /// Builds the looking-for-group announcement of `seeker` in `channel_id`.
    pub fn looking_for_group(seeker: &SessionSeeker, channel_id: &str) -> Self {
        Announcement {
            channel_id: channel_id.to_owned(),
            text: format!(
                "@everyone 🎮 **{}** is looking for people to play! What game do you want to play?",
                seeker.display_name
            ),
        }
    }
}

#[derive(Debug, Error)]
pub enum TriggerError {
    /// No configured channel and the guild has no text channel.
    #[error("no text channel available for announcements in guild {0}")]
    AnnouncementChannelUnavailable(String),
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}
