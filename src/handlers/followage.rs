use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use log::warn;
use twitch_irc::message::ServerMessage;

use crate::twitch::{
    bot::{BotContext, TallyBotTwitchIRCClient},
    handler::{TwitchHandlerError, TwitchMessageHandler},
};

/// A handler for the `!followage` command: how long the invoking user has
/// been following the channel.
pub struct FollowageHandler;

impl FollowageHandler {
    /// Resolves a login name to a helix user id. Lookup failures are logged
    /// and collapse into `None`; the caller only sends one generic reply.
    async fn lookup_id(ctx: &BotContext, login: &str) -> Option<String> {
        match ctx.agent.get_user(login).await {
            Ok(Some(user)) => Some(user.id),
            Ok(None) => None,
            Err(e) => {
                warn!("failed to fetch user id for {login}: {e}");
                None
            }
        }
    }

    fn format_follow_duration(elapsed: Duration) -> String {
        let days = elapsed.num_days();
        let hours = elapsed.num_hours() % 24;
        let minutes = elapsed.num_minutes() % 60;
        format!("{days} days, {hours} hours, and {minutes} minutes")
    }
}

#[async_trait]
impl TwitchMessageHandler for FollowageHandler {
    async fn handle_twitch_message(
        &mut self,
        message: &ServerMessage,
        client: &TallyBotTwitchIRCClient,
        ctx: &BotContext,
    ) -> Result<bool, TwitchHandlerError> {
        let ServerMessage::Privmsg(m) = message else {
            return Ok(false);
        };
        if !m.message_text.trim().starts_with("!followage") {
            return Ok(false);
        }

        let streamer = &m.channel_login;

        let viewer_id = Self::lookup_id(ctx, &m.sender.login).await;
        let streamer_id = Self::lookup_id(ctx, streamer).await;
        let (Some(viewer_id), Some(streamer_id)) = (viewer_id, streamer_id) else {
            self.send_twitch_message(
                client,
                &m.channel_login,
                &format!("@{} | could not fetch user ids.", m.sender.name),
            )
            .await?;
            return Ok(true);
        };

        let reply = match ctx.agent.get_follow(&viewer_id, &streamer_id).await {
            Ok(Some(follow)) => match DateTime::parse_from_rfc3339(&follow.followed_at) {
                Ok(followed_at) => {
                    let elapsed = Utc::now() - followed_at.with_timezone(&Utc);
                    format!(
                        "@{} | you've been following {streamer} for {}.",
                        m.sender.name,
                        Self::format_follow_duration(elapsed)
                    )
                }
                Err(e) => {
                    warn!("couldn't parse followed_at timestamp: {e}");
                    format!("@{} | failed to retrieve follow info.", m.sender.name)
                }
            },
            Ok(None) => format!("@{} | you are not following {streamer}.", m.sender.name),
            Err(e) => {
                warn!("failed to retrieve follow info: {e}");
                format!("@{} | failed to retrieve follow info.", m.sender.name)
            }
        };

        self.send_twitch_message(client, &m.channel_login, &reply)
            .await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follow_duration_breaks_into_days_hours_minutes() {
        let elapsed = Duration::days(3) + Duration::hours(4) + Duration::minutes(5);
        assert_eq!(
            FollowageHandler::format_follow_duration(elapsed),
            "3 days, 4 hours, and 5 minutes"
        );
    }

    #[test]
    fn brand_new_follow_is_all_zeroes() {
        assert_eq!(
            FollowageHandler::format_follow_duration(Duration::seconds(30)),
            "0 days, 0 hours, and 0 minutes"
        );
    }
}
