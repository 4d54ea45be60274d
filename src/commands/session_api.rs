use super::client;
use tauri::command;

/// Login button / Enter in the name field
#[command]
pub async fn set_username(username: String) -> bool {
    let Some(client) = client() else {
        return false;
    };
    match client.set_username(&username).await {
        Ok(()) => true,
        Err(e) => {
            log::warn!("set_username failed: {e}");
            false
        }
    }
}

#[command]
pub async fn stop_search() {
    if let Some(client) = client() {
        client.stop_search().await;
    }
}

#[command]
pub async fn end_call() {
    if let Some(client) = client() {
        client.end_call().await;
    }
}

#[command]
pub fn check_support() -> bool {
    client().is_some_and(|c| c.check_support())
}
