use super::client;
use crate::config::DEFAULT_ICE_SERVERS;
use crate::peer::ServerConfig;
use tauri::command;

/// Replaces the ICE servers used for the next call; false when validation fails.
#[command]
pub fn set_ice_servers(servers: Vec<ServerConfig>) -> bool {
    let Some(client) = client() else {
        return false;
    };
    match client.set_ice_servers(servers) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("{e}");
            false
        }
    }
}

#[command]
pub fn get_ice_servers() -> Vec<ServerConfig> {
    client()
        .map(|c| c.ice_servers())
        .unwrap_or_else(|| DEFAULT_ICE_SERVERS.clone())
}

#[command]
pub async fn is_connected() -> bool {
    match client() {
        Some(client) => client.is_connected().await,
        None => false,
    }
}
