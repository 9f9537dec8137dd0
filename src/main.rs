use std::{
    io::{self, Write},
    path::PathBuf,
};

use clap::Parser;
use tally_bot::{
    config::Config,
    ledger::Ledger,
    store,
    twitch::{auth::TokenPair, bot::TallyBot},
    TallyBotError,
};

#[derive(Parser, Debug)]
#[command(
    name = "tally_bot",
    about = "points and watch-time tracking for a twitch channel"
)]
struct Args {
    /// Path to the config file. Written with defaults on first run.
    #[arg(short, long, default_value = "tally_bot.toml")]
    config: PathBuf,

    /// Channel to join. Prompted for interactively when omitted.
    #[arg(long)]
    channel: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), TallyBotError> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let mut config = Config::read_or_write_default_from(&args.config)?;

    // api credentials may come from the environment; resolve them once so
    // everything downstream reads plain config fields
    config.twitch.client_id = config.twitch.resolved_client_id().ok_or_else(|| {
        TallyBotError::Other(
            "no client id configured (set TWITCH_CLIENT_ID or fill in the config file)".to_owned(),
        )
    })?;
    config.twitch.client_secret = config.twitch.resolved_client_secret().ok_or_else(|| {
        TallyBotError::Other(
            "no client secret configured (set TWITCH_CLIENT_SECRET or fill in the config file)"
                .to_owned(),
        )
    })?;

    let tokens = prompt_for_tokens(&config)?;
    if !tokens.is_complete() {
        return Err(TallyBotError::MissingToken);
    }

    let channel = match args.channel {
        Some(channel) => channel,
        None => prompt("Enter the Twitch channel to join: ")?,
    };

    let ledger = Ledger::load(&config.points, &config.storage)?;

    TallyBot::new(config, ledger, tokens).run(channel).await
}

/// Loads the token pair from its file if the user asks for that (and the file
/// exists), otherwise asks for both tokens and persists them for next time.
fn prompt_for_tokens(config: &Config) -> Result<TokenPair, TallyBotError> {
    let choice = prompt("Do you want to load tokens from file? (y/n): ")?;

    if choice.eq_ignore_ascii_case("y") && config.storage.token_file.exists() {
        Ok(store::load_tokens(&config.storage.token_file)?)
    } else {
        let tokens = TokenPair {
            access_token: prompt("Enter your access token: ")?,
            refresh_token: prompt("Enter your refresh token: ")?,
        };
        store::save_tokens(&config.storage.token_file, &tokens)?;
        Ok(tokens)
    }
}

fn prompt(message: &str) -> Result<String, TallyBotError> {
    print!("{message}");
    io::stdout()
        .flush()
        .map_err(|e| TallyBotError::Other(format!("couldn't flush stdout: {e}")))?;

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .map_err(|e| TallyBotError::Other(format!("couldn't read from stdin: {e}")))?;
    Ok(line.trim().to_owned())
}
