use std::sync::Arc;

use log::{error, info, warn};
use tokio::{
    task::JoinHandle,
    time::{sleep, Duration},
};

use crate::{
    store,
    twitch::{auth, bot::BotContext},
};

/// Starts the accrual loop: every interval, everyone on record gains a
/// minute of watch-time (and maybe the watch bonus). Ticks that would have
/// fired while the process was suspended are simply lost.
pub fn start_accrual_task(ctx: Arc<BotContext>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let interval = Duration::from_secs(ctx.config.points.accrual_interval_secs);

        loop {
            sleep(interval).await;

            let mut ledger = ctx.ledger.lock().await;
            if let Err(e) = ledger.tick_accrual() {
                error!("accrual tick couldn't persist: {e}");
            }
        }
    })
}

/// Starts the token refresh loop. A failed refresh keeps the old pair and
/// waits for the next interval; the access token expiring in the meantime is
/// the irc connection's problem, not ours.
pub fn start_token_refresh_task(ctx: Arc<BotContext>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let interval = Duration::from_secs(ctx.config.twitch.token_refresh_secs);

        loop {
            sleep(interval).await;

            let current = ctx.tokens.read().await.clone();
            match auth::refresh_token_pair(
                &ctx.config.twitch.client_id,
                &ctx.config.twitch.client_secret,
                &current,
            )
            .await
            {
                Ok(refreshed) => {
                    *ctx.tokens.write().await = refreshed.clone();
                    if let Err(e) = store::save_tokens(&ctx.config.storage.token_file, &refreshed)
                    {
                        error!("couldn't persist refreshed tokens: {e}");
                    }
                    info!("access token refreshed successfully");
                }
                Err(e) => {
                    warn!("token refresh failed: {e}");
                }
            }
        }
    })
}
