use crate::media::MediaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("username must not be empty")]
    EmptyUsername,

    #[error("signaling channel is closed")]
    SignalingClosed,

    #[error("websocket: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("malformed signaling message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("webrtc: {0}")]
    WebRtc(#[from] webrtc::Error),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error("invalid ICE server: {0}")]
    InvalidIceServer(String),

    #[error("no local description after negotiation")]
    MissingLocalDescription,
}
