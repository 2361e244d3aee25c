use log::{debug, info, warn};

use crate::{
    gateway::{TextChannel, Transport},
    lfg::{Announcement, SessionSeeker, TriggerError, VoiceTransition},
};

/// Substrings of channel names preferred for announcements.
const PREFERRED_CHANNEL_KEYWORDS: [&str; 4] = ["general", "gaming", "lfg", "announcements"];

/// Picks the text channel receiving announcements.
///
/// # Arguments
///
/// * `configured` - The configured announcement channel, always used when set
/// * `channels` - Text channels of the guild, in platform order
///
/// # Returns
///
/// The channel id, or `None` if nothing is configured and `channels` is empty.
///
/// # Examples
///
/// ```
/// let channels = vec![
///     TextChannel { id: "1".to_string(), name: "rules".to_string() },
///     TextChannel { id: "2".to_string(), name: "Gaming-Chat".to_string() },
/// ];
/// assert_eq!(pick_announcement_channel(None, &channels), Some("2".to_string()));
/// ```
pub fn pick_announcement_channel(
    configured: Option<&str>,
    channels: &[TextChannel],
) -> Option<String> {
    if let Some(channel_id) = configured {
        return Some(channel_id.to_owned());
    }

    channels
        .iter()
        .find(|channel| {
            let name = channel.name.to_lowercase();
            PREFERRED_CHANNEL_KEYWORDS
                .iter()
                .any(|keyword| name.contains(keyword))
        })
        .or_else(|| channels.first())
        .map(|channel| channel.id.clone())
}

/// Announces users joining the LFG voice channel.
#[derive(Clone, Debug, Default)]
pub struct VoiceTrigger {
    /// LFG voice channel, the trigger is disabled when `None`
    trigger_channel: Option<String>,
    /// Forced announcement channel
    announcement_channel: Option<String>,
    /// Id of the bot account, its own moves are ignored
    bot_user_id: Option<String>,
}

impl VoiceTrigger {
    pub fn new(
        trigger_channel: Option<String>,
        announcement_channel: Option<String>,
        bot_user_id: Option<String>,
    ) -> Self {
        VoiceTrigger {
            trigger_channel,
            announcement_channel,
            bot_user_id,
        }
    }

    /// Whether `transition` is a user entering the LFG voice channel.
    ///
    /// Moves inside the channel, leaves and the bot's own moves are not joins.
    pub fn is_join(&self, transition: &VoiceTransition) -> bool {
        let Some(trigger_channel) = self.trigger_channel.as_deref() else {
            return false;
        };

        if self.bot_user_id.as_deref() == Some(transition.user_id.as_str()) {
            return false;
        }

        transition.after.as_deref() == Some(trigger_channel) && transition.before != transition.after
    }

    /// Handles a voice transition, announcing the user if it is a join.
    ///
    /// # Returns
    ///
    /// - `Ok(None)` if the transition is not a join
    /// - `Ok(Some(announcement))` once the announcement was sent
    ///
    /// # Errors
    ///
    /// - [`TriggerError::AnnouncementChannelUnavailable`] if no text channel can be found
    /// - [`TriggerError::Transport`] if listing channels or sending failed
    pub async fn handle<T: Transport>(
        &self,
        transport: &T,
        transition: &VoiceTransition,
    ) -> Result<Option<Announcement>, TriggerError> {
        if !self.is_join(transition) {
            return Ok(None);
        }

        let display_name = match transport.display_name(&transition.user_id).await {
            Ok(name) => name,
            Err(e) => {
                warn!(
                    "failed to resolve display name of user {}: {}",
                    transition.user_id, e
                );
                transition.user_id.clone()
            }
        };

        let seeker = SessionSeeker {
            user_id: transition.user_id.clone(),
            display_name,
            guild_id: transition.guild_id.clone(),
            voice_channel_id: transition.after.clone().unwrap_or_default(),
        };
        info!(
            "{} joined {}, looking for game",
            seeker.display_name, seeker.voice_channel_id
        );

        let channel_id = match self.announcement_channel.as_deref() {
            Some(channel_id) => channel_id.to_owned(),
            None => {
                let channels = transport.text_channels(&seeker.guild_id).await?;
                pick_announcement_channel(None, &channels).ok_or_else(|| {
                    TriggerError::AnnouncementChannelUnavailable(seeker.guild_id.clone())
                })?
            }
        };
        debug!("announcing in channel {}", channel_id);

        let announcement = Announcement::looking_for_group(&seeker, &channel_id);
        transport.send_announcement(&announcement).await?;

        Ok(Some(announcement))
    }
}

#[cfg(test)]
mod tests {
    use futures::{FutureExt, future};
    use mockall::predicate::eq;

    use super::*;
    use crate::gateway::MockTransport;

    fn create_channel(id: &str, name: &str) -> TextChannel {
        TextChannel {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn create_transition(user_id: &str, before: Option<&str>, after: Option<&str>) -> VoiceTransition {
        VoiceTransition {
            user_id: user_id.to_string(),
            before: before.map(str::to_string),
            after: after.map(str::to_string),
            guild_id: "g1".to_string(),
        }
    }

    fn create_trigger(announcement_channel: Option<&str>) -> VoiceTrigger {
        VoiceTrigger::new(
            Some("C1".to_string()),
            announcement_channel.map(str::to_string),
            Some("bot".to_string()),
        )
    }

    #[test]
    fn test_pick_configured_channel_first() {
        let channels = vec![create_channel("1", "general")];

        assert_eq!(
            pick_announcement_channel(Some("99"), &channels),
            Some("99".to_string())
        );
    }

    #[test]
    fn test_pick_preferred_channel_by_name() {
        let channels = vec![
            create_channel("1", "rules"),
            create_channel("2", "off-topic"),
            create_channel("3", "LFG-Squad"),
            create_channel("4", "general"),
        ];

        assert_eq!(
            pick_announcement_channel(None, &channels),
            Some("3".to_string())
        );
    }

    #[test]
    fn test_pick_first_channel_fallback() {
        let channels = vec![create_channel("1", "rules"), create_channel("2", "memes")];

        assert_eq!(
            pick_announcement_channel(None, &channels),
            Some("1".to_string())
        );
    }

    #[test]
    fn test_pick_no_channel() {
        assert_eq!(pick_announcement_channel(None, &[]), None);
    }

    #[test]
    fn test_is_join() {
        let trigger = create_trigger(None);

        assert!(trigger.is_join(&create_transition("u1", None, Some("C1"))));
        assert!(trigger.is_join(&create_transition("u1", Some("C2"), Some("C1"))));
        assert!(!trigger.is_join(&create_transition("u1", Some("C1"), Some("C1"))));
        assert!(!trigger.is_join(&create_transition("u1", Some("C1"), Some("C2"))));
        assert!(!trigger.is_join(&create_transition("u1", Some("C1"), None)));
        assert!(!trigger.is_join(&create_transition("bot", None, Some("C1"))));
    }

    #[test]
    fn test_is_join_disabled_without_trigger_channel() {
        let trigger = VoiceTrigger::new(None, None, None);

        assert!(!trigger.is_join(&create_transition("u1", None, Some("C1"))));
    }

    #[tokio::test]
    async fn test_handle_join_announces_once() {
        let trigger = create_trigger(None);
        let mut transport = MockTransport::new();
        transport
            .expect_display_name()
            .with(eq("u1"))
            .times(1)
            .returning(|_| future::ready(Ok("Alice".to_string())).boxed());
        transport
            .expect_text_channels()
            .with(eq("g1"))
            .times(1)
            .returning(|_| {
                future::ready(Ok(vec![
                    create_channel("t1", "rules"),
                    create_channel("t2", "general"),
                ]))
                .boxed()
            });
        transport
            .expect_send_announcement()
            .withf(|announcement| {
                announcement.channel_id == "t2"
                    && announcement.text
                        == "@everyone 🎮 **Alice** is looking for people to play! What game do you want to play?"
            })
            .times(1)
            .returning(|_| future::ready(Ok(())).boxed());

        let announcement = trigger
            .handle(&transport, &create_transition("u1", None, Some("C1")))
            .await
            .unwrap();

        assert_eq!(announcement.map(|a| a.channel_id), Some("t2".to_string()));
    }

    #[tokio::test]
    async fn test_handle_move_away_announces_nothing() {
        let trigger = create_trigger(None);
        let mut transport = MockTransport::new();
        transport.expect_display_name().times(0);
        transport.expect_send_announcement().times(0);

        let announcement = trigger
            .handle(&transport, &create_transition("u1", Some("C1"), Some("C2")))
            .await
            .unwrap();

        assert_eq!(announcement, None);
    }

    #[tokio::test]
    async fn test_handle_uses_configured_channel() {
        let trigger = create_trigger(Some("ann"));
        let mut transport = MockTransport::new();
        transport
            .expect_display_name()
            .returning(|_| future::ready(Ok("Bob".to_string())).boxed());
        transport.expect_text_channels().times(0);
        transport
            .expect_send_announcement()
            .withf(|announcement| announcement.channel_id == "ann")
            .times(1)
            .returning(|_| future::ready(Ok(())).boxed());

        let announcement = trigger
            .handle(&transport, &create_transition("u2", None, Some("C1")))
            .await
            .unwrap();

        assert!(announcement.is_some());
    }

    #[tokio::test]
    async fn test_handle_without_text_channel() {
        let trigger = create_trigger(None);
        let mut transport = MockTransport::new();
        transport
            .expect_display_name()
            .returning(|_| future::ready(Ok("Alice".to_string())).boxed());
        transport
            .expect_text_channels()
            .returning(|_| future::ready(Ok(vec![])).boxed());
        transport.expect_send_announcement().times(0);

        let result = trigger
            .handle(&transport, &create_transition("u1", None, Some("C1")))
            .await;

        assert!(matches!(
            result,
            Err(TriggerError::AnnouncementChannelUnavailable(guild)) if guild == "g1"
        ));
    }

    #[tokio::test]
    async fn test_handle_display_name_fallback() {
        let trigger = create_trigger(Some("ann"));
        let mut transport = MockTransport::new();
        transport
            .expect_display_name()
            .returning(|_| future::ready(Err(anyhow::anyhow!("unknown user"))).boxed());
        transport
            .expect_send_announcement()
            .withf(|announcement| announcement.text.contains("**u1**"))
            .times(1)
            .returning(|_| future::ready(Ok(())).boxed());

        let result = trigger
            .handle(&transport, &create_transition("u1", None, Some("C1")))
            .await;

        assert!(result.is_ok());
    }
}
