use async_trait::async_trait;
use num_format::{Locale, ToFormattedString};
use rand::Rng;
use twitch_irc::message::ServerMessage;

use crate::twitch::{
    bot::{BotContext, TallyBotTwitchIRCClient},
    handler::{TwitchHandlerError, TwitchMessageHandler},
};

/// A handler for the `!gamble <amount>` command: a fair coin flip for the
/// wagered points.
pub struct GambleHandler;

impl GambleHandler {
    /// Parses the wager argument. Missing, non-numeric, and negative input
    /// all come back as `None`; zero parses fine and is rejected by the
    /// balance check instead.
    fn parse_wager(raw: &str) -> Option<u64> {
        raw.trim().parse().ok()
    }
}

#[async_trait]
impl TwitchMessageHandler for GambleHandler {
    async fn handle_twitch_message(
        &mut self,
        message: &ServerMessage,
        client: &TallyBotTwitchIRCClient,
        ctx: &BotContext,
    ) -> Result<bool, TwitchHandlerError> {
        if let ServerMessage::Privmsg(m) = message {
            if let Some(raw) = m.message_text.trim().strip_prefix("!gamble") {
                let Some(amount) = Self::parse_wager(raw) else {
                    self.send_twitch_message(
                        client,
                        &m.channel_login,
                        &format!("@{}, please specify a valid amount to gamble.", m.sender.name),
                    )
                    .await?;
                    return Ok(true);
                };

                // settle the wager before sending anything, so the lock is
                // never held across a network call
                let reply = {
                    let mut ledger = ctx.ledger.lock().await;
                    let balance = ledger.get_points(&m.sender.login);

                    if amount == 0 || amount > balance {
                        format!("@{}, you don't have enough points!", m.sender.name)
                    } else if rand::thread_rng().gen_bool(0.5) {
                        ledger.credit(&m.sender.login, amount)?;
                        format!(
                            "@{}, you won {} points! 🎉",
                            m.sender.name,
                            amount.to_formatted_string(&Locale::en)
                        )
                    } else {
                        ledger.debit(&m.sender.login, amount)?;
                        format!(
                            "@{}, you lost {} points. 😢",
                            m.sender.name,
                            amount.to_formatted_string(&Locale::en)
                        )
                    }
                };

                self.send_twitch_message(client, &m.channel_login, &reply)
                    .await?;
                return Ok(true);
            }
        }

        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wager_must_be_a_plain_number() {
        assert_eq!(GambleHandler::parse_wager(" 250"), Some(250));
        assert_eq!(GambleHandler::parse_wager(" 0"), Some(0));
        assert_eq!(GambleHandler::parse_wager(""), None);
        assert_eq!(GambleHandler::parse_wager(" all"), None);
        assert_eq!(GambleHandler::parse_wager(" -5"), None);
        assert_eq!(GambleHandler::parse_wager(" 1.5"), None);
    }
}
