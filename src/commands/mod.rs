pub mod media_api;
pub mod session_api;
pub mod util_api;

use crate::client::Client;
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// The client behind every command, set once during app setup.
static CLIENT: OnceCell<Arc<Client>> = OnceCell::new();

pub fn install(client: Arc<Client>) {
    if CLIENT.set(client).is_err() {
        log::warn!("Client already installed, keeping the first one");
    }
}

pub(crate) fn client() -> Option<Arc<Client>> {
    let client = CLIENT.get().cloned();
    if client.is_none() {
        log::error!("Command called before the client was installed");
    }
    client
}

pub fn visibility_changed(hidden: bool) {
    if let Some(client) = CLIENT.get() {
        client.visibility_changed(hidden);
    }
}
