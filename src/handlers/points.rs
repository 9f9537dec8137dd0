use async_trait::async_trait;
use num_format::{Locale, ToFormattedString};
use twitch_irc::message::ServerMessage;

use crate::twitch::{
    bot::{BotContext, TallyBotTwitchIRCClient},
    handler::{TwitchHandlerError, TwitchMessageHandler},
};

/// A handler for the `!points` command.
pub struct PointsHandler;

#[async_trait]
impl TwitchMessageHandler for PointsHandler {
    async fn handle_twitch_message(
        &mut self,
        message: &ServerMessage,
        client: &TallyBotTwitchIRCClient,
        ctx: &BotContext,
    ) -> Result<bool, TwitchHandlerError> {
        let handled = if let ServerMessage::Privmsg(m) = message {
            if m.message_text.trim().starts_with("!points") {
                let balance = ctx.ledger.lock().await.get_points(&m.sender.login);

                self.send_twitch_message(
                    client,
                    &m.channel_login,
                    &format!(
                        "@{}, you have {} points.",
                        m.sender.name,
                        balance.to_formatted_string(&Locale::en)
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
