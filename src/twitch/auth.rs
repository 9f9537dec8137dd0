use serde::{Deserialize, Serialize};

use crate::{twitch::TOKEN_URL, TallyBotError};

/// The one active access/refresh token pair. Replaced wholesale on every
/// successful refresh.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenPair {
    pub fn is_complete(&self) -> bool {
        !self.access_token.is_empty() && !self.refresh_token.is_empty()
    }
}

#[derive(Serialize)]
struct RefreshRequestBody {
    client_id: String,
    client_secret: String,
    grant_type: String,
    refresh_token: String,
}

#[derive(Deserialize)]
struct RefreshResponse {
    access_token: String,

    // twitch may omit this, in which case the old refresh token stays valid
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Exchanges the current refresh token for a new token pair. The caller keeps
/// the old pair on failure; nothing is retried here.
pub async fn refresh_token_pair(
    client_id: &str,
    client_secret: &str,
    current: &TokenPair,
) -> Result<TokenPair, TallyBotError> {
    let body = RefreshRequestBody {
        client_id: client_id.to_owned(),
        client_secret: client_secret.to_owned(),
        grant_type: "refresh_token".to_owned(),
        refresh_token: current.refresh_token.clone(),
    };

    let client = reqwest::Client::new();
    let response = client.post(TOKEN_URL).form(&body).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        return Err(TallyBotError::Other(format!(
            "token refresh failed with {status}: {text}"
        )));
    }

    let refreshed: RefreshResponse = serde_json::from_str(&response.text().await?)?;
    Ok(apply_refresh(current, refreshed))
}

fn apply_refresh(current: &TokenPair, refreshed: RefreshResponse) -> TokenPair {
    TokenPair {
        access_token: refreshed.access_token,
        refresh_token: refreshed
            .refresh_token
            .unwrap_or_else(|| current.refresh_token.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_response_with_both_tokens() {
        let parsed: RefreshResponse =
            serde_json::from_str(r#"{"access_token":"new-a","refresh_token":"new-r"}"#).unwrap();
        assert_eq!(parsed.access_token, "new-a");
        assert_eq!(parsed.refresh_token.as_deref(), Some("new-r"));
    }

    #[test]
    fn refresh_response_without_refresh_token() {
        let parsed: RefreshResponse =
            serde_json::from_str(r#"{"access_token":"new-a","scope":["chat:read"]}"#).unwrap();
        assert_eq!(parsed.access_token, "new-a");
        assert!(parsed.refresh_token.is_none());
    }

    #[test]
    fn refresh_replaces_both_tokens() {
        let current = TokenPair {
            access_token: "old-a".to_owned(),
            refresh_token: "old-r".to_owned(),
        };
        let refreshed = apply_refresh(
            &current,
            RefreshResponse {
                access_token: "new-a".to_owned(),
                refresh_token: Some("new-r".to_owned()),
            },
        );
        assert_eq!(refreshed.access_token, "new-a");
        assert_eq!(refreshed.refresh_token, "new-r");
    }

    #[test]
    fn missing_refresh_token_keeps_the_old_one() {
        let current = TokenPair {
            access_token: "old-a".to_owned(),
            refresh_token: "old-r".to_owned(),
        };
        let refreshed = apply_refresh(
            &current,
            RefreshResponse {
                access_token: "new-a".to_owned(),
                refresh_token: None,
            },
        );
        assert_eq!(refreshed.access_token, "new-a");
        assert_eq!(refreshed.refresh_token, "old-r");
    }

    #[test]
    fn empty_tokens_are_incomplete() {
        let pair = TokenPair {
            access_token: String::new(),
            refresh_token: "r".to_owned(),
        };
        assert!(!pair.is_complete());

        let pair = TokenPair {
            access_token: "a".to_owned(),
            refresh_token: "r".to_owned(),
        };
        assert!(pair.is_complete());
    }
}
