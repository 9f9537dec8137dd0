use std::sync::Arc;

use async_trait::async_trait;
use log::{error, info};
use tokio::sync::{Mutex, RwLock};
use twitch_irc::{
    login::StaticLoginCredentials, message::ServerMessage, ClientConfig, SecureTCPTransport,
    TwitchIRCClient,
};

use crate::{
    config::Config,
    handlers::{
        credits::CreditsHandler, followage::FollowageHandler, gamble::GambleHandler,
        points::PointsHandler, watchtime::WatchtimeHandler, TwitchHandlerCollection,
    },
    ledger::Ledger,
    scheduler,
    twitch::{
        agent::TwitchAgent,
        auth::TokenPair,
        handler::{TwitchHandlerError, TwitchMessageHandler},
    },
    TallyBotError,
};

pub type TallyBotTwitchIRCClient = TwitchIRCClient<SecureTCPTransport, StaticLoginCredentials>;
pub type TallyBotTwitchIRCError = twitch_irc::Error<SecureTCPTransport, StaticLoginCredentials>;

/// Everything the handlers and background tasks share: the config, the
/// ledger, the current token pair, and the helix agent. One of these is built
/// at startup and handed around as an `Arc`.
pub struct BotContext {
    pub config: Config,
    pub ledger: Mutex<Ledger>,
    pub tokens: Arc<RwLock<TokenPair>>,
    pub agent: TwitchAgent,
}

pub struct TallyBot {
    context: Arc<BotContext>,
    message_handlers: TwitchHandlerCollection,
}

impl TallyBot {
    pub fn new(config: Config, ledger: Ledger, tokens: TokenPair) -> Self {
        let tokens = Arc::new(RwLock::new(tokens));
        let agent = TwitchAgent::new(config.twitch.client_id.clone(), Arc::clone(&tokens));

        let context = Arc::new(BotContext {
            config,
            ledger: Mutex::new(ledger),
            tokens,
            agent,
        });

        let message_handlers: TwitchHandlerCollection = vec![
            Box::new(CreditsHandler),
            Box::new(PointsHandler),
            Box::new(GambleHandler),
            Box::new(WatchtimeHandler),
            Box::new(FollowageHandler),
        ];

        Self {
            context,
            message_handlers,
        }
    }

    pub async fn run(mut self, channel: String) -> Result<(), TallyBotError> {
        // the irc connection keeps the access token it was started with; the
        // hourly refresh only feeds helix calls and the persisted pair
        let access_token = self.context.tokens.read().await.access_token.clone();
        let credentials = StaticLoginCredentials::new(
            self.context.config.twitch.login.clone(),
            Some(access_token),
        );
        let cred_config = ClientConfig::new_simple(credentials);

        let (mut incoming_messages, client) = TallyBotTwitchIRCClient::new(cred_config);

        scheduler::start_accrual_task(Arc::clone(&self.context));
        scheduler::start_token_refresh_task(Arc::clone(&self.context));

        // join a channel. this will error if the passed channel login name is
        // malformed.
        if let Err(e) = client.join(channel.clone()) {
            error!("error joining {channel}'s twitch channel :( {e}");
        }
        info!("twitch: joined channel {channel}");

        let context = Arc::clone(&self.context);
        while let Some(message) = incoming_messages.recv().await {
            if let ServerMessage::Notice(notice_msg) = &message {
                info!(
                    "notice received from twitch channel {}: {}",
                    notice_msg.channel_login.as_deref().unwrap_or("<none>"),
                    notice_msg.message_text
                );
                continue;
            }

            if let ServerMessage::Privmsg(m) = &message {
                // ignore our own messages echoing back
                if m.sender.login == context.config.twitch.login {
                    continue;
                }

                // seed ledger records for anyone we haven't seen chat before
                let mut ledger = context.ledger.lock().await;
                if let Err(e) = ledger.ensure_seen(&m.sender.login) {
                    error!("couldn't seed records for {}: {e}", m.sender.login);
                }
            }

            if let Err(e) = self
                .handle_twitch_message(&message, &client, &context)
                .await
            {
                error!("error in message handler! {e}");
            }
        }

        Ok(())
    }
}

#[async_trait]
impl TwitchMessageHandler for TallyBot {
    async fn handle_twitch_message(
        &mut self,
        message: &ServerMessage,
        client: &TallyBotTwitchIRCClient,
        ctx: &BotContext,
    ) -> Result<bool, TwitchHandlerError> {
        for message_handler in self.message_handlers.iter_mut() {
            // try to handle the message. if the handler determines the message was handled,
            // we'll stop
            if message_handler
                .handle_twitch_message(message, client, ctx)
                .await?
            {
                return Ok(true);
            }
        }

        Ok(false)
    }
}
