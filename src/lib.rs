pub mod client;
pub mod config;
pub mod error;
pub mod logger;
pub mod media;
pub mod peer;
pub mod signaling;
pub mod ui;
mod utils;

#[cfg(feature = "desktop")]
mod commands;

pub use client::Client;
pub use config::ClientConfig;
pub use error::ClientError;

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use std::sync::Arc;

    logger::init();
    let config = ClientConfig::from_env().unwrap_or_else(|e| {
        log::error!("Invalid configuration, using defaults: {e}");
        ClientConfig::default()
    });
    log::info!("Signaling server: {}", config.server_url);

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(move |app| {
            let ui = Arc::new(ui::webview::TauriUi::new(app.handle().clone()));
            let client = Client::new(
                config,
                ui,
                Arc::new(media::SampleDevices::default()),
                Arc::new(signaling::WsConnector),
            );
            commands::install(client);
            Ok(())
        })
        .on_window_event(|_window, event| {
            if let tauri::WindowEvent::Focused(focused) = event {
                commands::visibility_changed(!focused);
            }
        })
        .invoke_handler(tauri::generate_handler![
            // Session
            commands::session_api::set_username,
            commands::session_api::stop_search,
            commands::session_api::end_call,
            commands::session_api::check_support,
            // Media
            commands::media_api::toggle_mute,
            commands::media_api::toggle_video,
            commands::media_api::push_sample,
            // Utility functions
            commands::util_api::set_ice_servers,
            commands::util_api::get_ice_servers,
            commands::util_api::is_connected,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
