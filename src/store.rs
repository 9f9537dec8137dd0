use std::{collections::HashMap, fs, path::Path};

use thiserror::Error;

use crate::twitch::auth::TokenPair;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("couldn't touch the filesystem :< {0}")]
    Io(#[from] std::io::Error),

    #[error("couldn't read stored json :< {0}")]
    Json(#[from] serde_json::Error),

    #[error("token file is malformed (expected two lines)")]
    MalformedTokenFile,
}

/// Loads a username -> count mapping from a json file. A file that doesn't
/// exist yet loads as an empty mapping.
pub fn load_counts<P: AsRef<Path>>(path: P) -> Result<HashMap<String, u64>, StoreError> {
    let p = path.as_ref();

    if !p.exists() {
        return Ok(HashMap::new());
    }

    let raw = fs::read_to_string(p)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Writes a username -> count mapping to a json file, replacing whatever was
/// there before.
pub fn save_counts<P: AsRef<Path>>(path: P, counts: &HashMap<String, u64>) -> Result<(), StoreError> {
    let raw = serde_json::to_string(counts)?;
    fs::write(path, raw)?;
    Ok(())
}

/// Loads the token pair from its file: access token on the first line,
/// refresh token on the second.
pub fn load_tokens<P: AsRef<Path>>(path: P) -> Result<TokenPair, StoreError> {
    let raw = fs::read_to_string(path)?;
    let mut lines = raw.lines();

    let access_token = lines.next().ok_or(StoreError::MalformedTokenFile)?.trim();
    let refresh_token = lines.next().ok_or(StoreError::MalformedTokenFile)?.trim();

    Ok(TokenPair {
        access_token: access_token.to_owned(),
        refresh_token: refresh_token.to_owned(),
    })
}

/// Writes the token pair to its file, one token per line.
pub fn save_tokens<P: AsRef<Path>>(path: P, tokens: &TokenPair) -> Result<(), StoreError> {
    fs::write(
        path,
        format!("{}\n{}\n", tokens.access_token, tokens.refresh_token),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{env, path::PathBuf};

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("tally_bot_store_{}_{}", std::process::id(), name))
    }

    #[test]
    fn missing_counts_file_loads_empty() {
        let path = temp_path("missing.txt");
        let _ = fs::remove_file(&path);

        let counts = load_counts(&path).unwrap();
        assert!(counts.is_empty());
    }

    #[test]
    fn counts_round_trip() {
        let path = temp_path("points.txt");

        let mut counts = HashMap::new();
        counts.insert("alice".to_owned(), 1200);
        counts.insert("bob".to_owned(), 0);

        save_counts(&path, &counts).unwrap();
        let reloaded = load_counts(&path).unwrap();
        assert_eq!(reloaded, counts);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn tokens_round_trip() {
        let path = temp_path("token.txt");

        let tokens = TokenPair {
            access_token: "access123".to_owned(),
            refresh_token: "refresh456".to_owned(),
        };
        save_tokens(&path, &tokens).unwrap();

        let reloaded = load_tokens(&path).unwrap();
        assert_eq!(reloaded.access_token, "access123");
        assert_eq!(reloaded.refresh_token, "refresh456");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn short_token_file_is_malformed() {
        let path = temp_path("short_token.txt");
        fs::write(&path, "only-one-line\n").unwrap();

        assert!(matches!(
            load_tokens(&path),
            Err(StoreError::MalformedTokenFile)
        ));

        let _ = fs::remove_file(&path);
    }
}
