pub mod agent;
pub mod auth;
pub mod bot;
pub mod handler;

pub(crate) const HELIX_URL: &str = "https://api.twitch.tv/helix";
pub(crate) const TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";
