use std::fmt::Display;

use async_trait::async_trait;
use twitch_irc::message::ServerMessage;

use crate::{
    ledger::LedgerError,
    twitch::{
        agent::TwitchAgentError,
        bot::{BotContext, TallyBotTwitchIRCClient, TallyBotTwitchIRCError},
    },
};

#[async_trait]
pub trait TwitchMessageHandler: Send {
    async fn send_twitch_message(
        &mut self,
        client: &TallyBotTwitchIRCClient,
        channel: &str,
        message: &str,
    ) -> Result<(), TwitchHandlerError> {
        client
            .say(channel.to_string(), message.to_string())
            .await
            .map_err(TwitchHandlerError::SendMessage)
    }

    /// Handle a new message from chat. Returns `true` if something was done to handle the message,
    /// or `false` if the message was ignored (or if the message is allowed to also be handled by
    /// other handlers).
    async fn handle_twitch_message(
        &mut self,
        message: &ServerMessage,
        client: &TallyBotTwitchIRCClient,
        ctx: &BotContext,
    ) -> Result<bool, TwitchHandlerError>;
}

#[derive(Debug)]
pub enum TwitchHandlerError {
    SendMessage(TallyBotTwitchIRCError),
    TwitchIRCError(TallyBotTwitchIRCError),
    Ledger(LedgerError),
    Agent(TwitchAgentError),
}

impl From<TallyBotTwitchIRCError> for TwitchHandlerError {
    fn from(e: TallyBotTwitchIRCError) -> Self {
        Self::TwitchIRCError(e)
    }
}

impl From<LedgerError> for TwitchHandlerError {
    fn from(e: LedgerError) -> Self {
        Self::Ledger(e)
    }
}

impl From<TwitchAgentError> for TwitchHandlerError {
    fn from(e: TwitchAgentError) -> Self {
        Self::Agent(e)
    }
}

impl Display for TwitchHandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TwitchHandlerError::SendMessage(e) => write!(f, "message send failure! {e}"),
            TwitchHandlerError::TwitchIRCError(e) => write!(f, "irc error :< {e}"),
            TwitchHandlerError::Ledger(e) => write!(f, "ledger error :< {e}"),
            TwitchHandlerError::Agent(e) => write!(f, "helix error :< {e}"),
        }
    }
}

impl std::error::Error for TwitchHandlerError {}
