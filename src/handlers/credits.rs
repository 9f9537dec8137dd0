use async_trait::async_trait;
use twitch_irc::message::ServerMessage;

use crate::twitch::{
    bot::{BotContext, TallyBotTwitchIRCClient},
    handler::{TwitchHandlerError, TwitchMessageHandler},
};

pub struct CreditsHandler;

#[async_trait]
impl TwitchMessageHandler for CreditsHandler {
    async fn handle_twitch_message(
        &mut self,
        message: &ServerMessage,
        client: &TallyBotTwitchIRCClient,
        _ctx: &BotContext,
    ) -> Result<bool, TwitchHandlerError> {
        let handled = if let ServerMessage::Privmsg(m) = message {
            if m.message_text.trim().starts_with("!credits") {
                self.send_twitch_message(
                    client,
                    &m.channel_login,
                    &format!(
                        "@{} | tally_bot: keeping count of points and watch-time for this channel <3",
                        m.sender.name
                    ),
                )
                .await?;
                true
            } else {
                false
            }
        } else {
            false
        };

        Ok(handled)
    }
}
