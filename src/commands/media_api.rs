use super::client;
use crate::media::TrackKind;
use bytes::Bytes;
use std::time::Duration;
use tauri::command;

/// Returns the new muted state, or None without a local audio track.
#[command]
pub async fn toggle_mute() -> Option<bool> {
    client()?.toggle_mute().await
}

/// Returns the new camera state, or None without a local video track.
#[command]
pub async fn toggle_video() -> Option<bool> {
    client()?.toggle_video().await
}

/// One encoded frame (VP8) or packet (Opus) from the capture side.
#[command]
pub async fn push_sample(kind: TrackKind, data: Vec<u8>, duration_ms: u64) -> bool {
    let Some(client) = client() else {
        return false;
    };
    match client
        .push_sample(kind, Bytes::from(data), Duration::from_millis(duration_ms))
        .await
    {
        Ok(written) => written > 0,
        Err(e) => {
            log::warn!("push_sample failed: {e}");
            false
        }
    }
}
