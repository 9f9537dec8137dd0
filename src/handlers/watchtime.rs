use async_trait::async_trait;
use twitch_irc::message::ServerMessage;

use crate::twitch::{
    bot::{BotContext, TallyBotTwitchIRCClient},
    handler::{TwitchHandlerError, TwitchMessageHandler},
};

/// A handler for the `!watchtime` command.
pub struct WatchtimeHandler;

#[async_trait]
impl TwitchMessageHandler for WatchtimeHandler {
    async fn handle_twitch_message(
        &mut self,
        message: &ServerMessage,
        client: &TallyBotTwitchIRCClient,
        ctx: &BotContext,
    ) -> Result<bool, TwitchHandlerError> {
        let handled = if let ServerMessage::Privmsg(m) = message {
            if m.message_text.trim().starts_with("!watchtime") {
                let minutes = ctx.ledger.lock().await.get_watchtime(&m.sender.login);

                self.send_twitch_message(
                    client,
                    &m.channel_login,
                    &format!("@{}, you've watched for {minutes} minutes.", m.sender.name),
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
