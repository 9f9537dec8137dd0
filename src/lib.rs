use thiserror::Error;

pub mod config;
pub mod handlers;
pub mod ledger;
pub mod scheduler;
pub mod store;
pub mod twitch;

#[derive(Error, Debug)]
pub enum TallyBotError {
    #[error("parsing failure :< {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("request failed :< {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("missing token :<")]
    MissingToken,

    #[error("error loading config :< {0}, {1}")]
    LoadConfig(String, anyhow::Error),

    #[error("error with stored data :< {0}")]
    Store(#[from] store::StoreError),

    #[error("something went wrong :< {0}")]
    Other(String),
}

impl From<anyhow::Error> for TallyBotError {
    fn from(value: anyhow::Error) -> Self {
        Self::Other(value.to_string())
    }
}
