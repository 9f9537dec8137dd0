use std::{error::Error, fmt::Display, sync::Arc};

use serde::Deserialize;
use tokio::sync::RwLock;

use crate::twitch::{auth::TokenPair, HELIX_URL};

/// A thin client for the helix rest api. Reads the current access token from
/// the shared pair on every call, so it picks up refreshed tokens without
/// being told.
pub struct TwitchAgent {
    client: reqwest::Client,
    client_id: String,
    tokens: Arc<RwLock<TokenPair>>,
}

impl TwitchAgent {
    pub fn new(client_id: String, tokens: Arc<RwLock<TokenPair>>) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id,
            tokens,
        }
    }

    /// Get the user record for the given login name, or `None` if no such
    /// user exists.
    pub async fn get_user(&self, login: &str) -> Result<Option<HelixUser>, TwitchAgentError> {
        let token = self.tokens.read().await.access_token.clone();

        let response = self
            .client
            .get(format!("{HELIX_URL}/users"))
            .query(&[("login", login)])
            .header("Client-Id", &self.client_id)
            .bearer_auth(&token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TwitchAgentError::BadStatus(response.status()));
        }

        let body: HelixResponse<HelixUser> = response.json().await?;
        Ok(body.data.into_iter().next())
    }

    /// Get the follow relationship from one user id to another, or `None` if
    /// the first user doesn't follow the second.
    pub async fn get_follow(
        &self,
        from_id: &str,
        to_id: &str,
    ) -> Result<Option<FollowRecord>, TwitchAgentError> {
        let token = self.tokens.read().await.access_token.clone();

        let response = self
            .client
            .get(format!("{HELIX_URL}/users/follows"))
            .query(&[("from_id", from_id), ("to_id", to_id)])
            .header("Client-Id", &self.client_id)
            .bearer_auth(&token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TwitchAgentError::BadStatus(response.status()));
        }

        let body: HelixResponse<FollowRecord> = response.json().await?;
        Ok(body.data.into_iter().next())
    }
}

#[derive(Deserialize)]
struct HelixResponse<T> {
    data: Vec<T>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct HelixUser {
    pub id: String,
    pub login: String,
    pub display_name: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FollowRecord {
    pub followed_at: String,
}

#[derive(Debug)]
pub enum TwitchAgentError {
    BadStatus(reqwest::StatusCode),
    ReqwestError(reqwest::Error),
}

impl From<reqwest::Error> for TwitchAgentError {
    fn from(e: reqwest::Error) -> Self {
        Self::ReqwestError(e)
    }
}

impl Display for TwitchAgentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TwitchAgentError::BadStatus(status) => {
                write!(f, "twitch answered with status {status}")
            }
            TwitchAgentError::ReqwestError(e) => write!(f, "twitch agent request error: {e}"),
        }
    }
}

impl Error for TwitchAgentError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_lookup_payload_parses() {
        let raw = r#"{
            "data": [
                {
                    "id": "141981764",
                    "login": "twitchdev",
                    "display_name": "TwitchDev",
                    "type": "",
                    "broadcaster_type": "partner"
                }
            ]
        }"#;

        let parsed: HelixResponse<HelixUser> = serde_json::from_str(raw).unwrap();
        let user = parsed.data.into_iter().next().unwrap();
        assert_eq!(user.id, "141981764");
        assert_eq!(user.login, "twitchdev");
        assert_eq!(user.display_name, "TwitchDev");
    }

    #[test]
    fn empty_follow_payload_means_not_following() {
        let parsed: HelixResponse<FollowRecord> =
            serde_json::from_str(r#"{"total": 0, "data": []}"#).unwrap();
        assert!(parsed.data.into_iter().next().is_none());
    }
}
