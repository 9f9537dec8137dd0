use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::TallyBotError;

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Config {
    #[serde(default)]
    pub twitch: TwitchConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub points: PointsConfig,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct TwitchConfig {
    /// Login name of the bot's own account. Messages from this login are
    /// ignored by the message loop.
    pub login: String,

    pub client_id: String,
    pub client_secret: String,

    /// Seconds between token refresh attempts.
    pub token_refresh_secs: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct StorageConfig {
    pub token_file: PathBuf,
    pub points_file: PathBuf,
    pub watchtime_file: PathBuf,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct PointsConfig {
    /// Balance granted to a user the first time they chat.
    pub starting_balance: u64,

    /// Points granted every `watch_bonus_minutes` of watch-time.
    pub watch_bonus: u64,
    pub watch_bonus_minutes: u64,

    /// Seconds between accrual ticks. One tick counts as one minute of
    /// watch-time for everyone the bot has seen.
    pub accrual_interval_secs: u64,
}

impl Config {
    /// Reads the config from the file if it exists, otherwise writes the
    /// default config to the file and loads that.
    pub fn read_or_write_default_from<P: AsRef<Path>>(path: P) -> Result<Self, TallyBotError> {
        let p = path.as_ref();

        // check if the path exists
        if !p.exists() {
            // construct default config
            let default = Config::default();

            // format it into a toml string
            let toml_string = toml::to_string_pretty(&default).map_err(|e| {
                TallyBotError::LoadConfig(
                    "couldn't format default config with toml".to_owned(),
                    e.into(),
                )
            })?;

            // write the default config string
            if let Err(e) = fs::write(p, toml_string) {
                warn!(
                    "hi there! i wanted to write my default configuration file to {}, but i can't.",
                    p.display(),
                );
                match e.kind() {
                    ErrorKind::NotFound => {
                        warn!("does its parent directory exist?\n");
                    }
                    ErrorKind::PermissionDenied => {
                        warn!("do you (or i) have permission to write to it?\n");
                    }
                    _ => warn!("(here's the error: {})\n", e),
                }
            } else {
                info!(
                    "hi! i'm tally_bot! i've written my default configuration file to {} for you",
                    p.display()
                );
            }

            // and return the config
            Ok(default)
        } else {
            // read the file to a string
            let raw_string = fs::read_to_string(p).map_err(|e| {
                TallyBotError::LoadConfig(
                    format!("couldn't read contents of {}", p.display()),
                    e.into(),
                )
            })?;

            // parse the string as toml
            let config = toml::from_str(&raw_string).map_err(|e| {
                TallyBotError::LoadConfig(
                    format!("couldn't parse toml from {}", p.display()),
                    e.into(),
                )
            })?;

            info!("configuration has been read from {}", p.display());

            // return the config
            Ok(config)
        }
    }
}

impl TwitchConfig {
    /// The client id to authenticate api calls with. The `TWITCH_CLIENT_ID`
    /// environment variable wins over the config file.
    pub fn resolved_client_id(&self) -> Option<String> {
        env_or_config("TWITCH_CLIENT_ID", &self.client_id)
    }

    /// The client secret for token refreshing. The `TWITCH_CLIENT_SECRET`
    /// environment variable wins over the config file.
    pub fn resolved_client_secret(&self) -> Option<String> {
        env_or_config("TWITCH_CLIENT_SECRET", &self.client_secret)
    }
}

fn env_or_config(var: &str, from_config: &str) -> Option<String> {
    env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .or_else(|| (!from_config.is_empty()).then(|| from_config.to_owned()))
}

impl Default for TwitchConfig {
    fn default() -> Self {
        Self {
            login: "tally_bot".to_owned(),
            client_id: String::new(),
            client_secret: String::new(),
            token_refresh_secs: 3600,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            token_file: PathBuf::from("current_token.txt"),
            points_file: PathBuf::from("points.txt"),
            watchtime_file: PathBuf::from("watchtime.txt"),
        }
    }
}

impl Default for PointsConfig {
    fn default() -> Self {
        Self {
            starting_balance: 1000,
            watch_bonus: 500,
            watch_bonus_minutes: 60,
            accrual_interval_secs: 60,
        }
    }
}
