// Application configuration.
// Logging can only be switched off by hand in debug builds.

use crate::error::ClientError;
use crate::media::MediaConstraints;
use crate::peer::types::ServerConfig;
use once_cell::sync::Lazy;
use serde::Deserialize;

#[cfg(debug_assertions)]
pub const LOGGING_ENABLED: bool = true;

#[cfg(not(debug_assertions))]
pub const LOGGING_ENABLED: bool = false;

#[cfg(debug_assertions)]
pub mod dev {
    // Set to false to silence logging in debug builds as well.
    pub const ENABLE_LOGGING: bool = true;
}

#[cfg(not(debug_assertions))]
pub mod dev {
    pub const ENABLE_LOGGING: bool = false;
}

pub const SERVER_URL_ENV: &str = "ROULETTE_SERVER_URL";
pub const ICE_SERVERS_ENV: &str = "ROULETTE_ICE_SERVERS";

pub const DEFAULT_SERVER_URL: &str = "ws://127.0.0.1:5000/ws";

/// Two public STUN servers, no TURN.
pub static DEFAULT_ICE_SERVERS: Lazy<Vec<ServerConfig>> = Lazy::new(|| {
    vec![
        ServerConfig {
            id: "default-stun".into(),
            r#type: "stun".into(),
            url: "stun:stun.l.google.com:19302".into(),
            username: None,
            credential: None,
        },
        ServerConfig {
            id: "default-stun-1".into(),
            r#type: "stun".into(),
            url: "stun:stun1.l.google.com:19302".into(),
            username: None,
            credential: None,
        },
    ]
});

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server_url: String,
    pub ice_servers: Vec<ServerConfig>,
    pub media: MediaConstraints,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            ice_servers: DEFAULT_ICE_SERVERS.clone(),
            media: MediaConstraints::default(),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `ROULETTE_SERVER_URL` and `ROULETTE_ICE_SERVERS` (a JSON array).
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let mut config = Self::default();
        if let Some(url) = lookup(SERVER_URL_ENV).filter(|u| !u.trim().is_empty()) {
            config.server_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(ICE_SERVERS_ENV) {
            let servers: Vec<ServerConfig> = serde_json::from_str(&raw)?;
            crate::peer::ice::validate_servers(&servers)?;
            config.ice_servers = servers;
        }
        Ok(config)
    }
}
