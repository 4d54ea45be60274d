use crate::media::LocalStream;
use crate::peer::PendingCandidates;
use crate::signaling::SignalingChannel;
use std::sync::Arc;
use webrtc::peer_connection::RTCPeerConnection;

/// Per-session state. At most one peer connection and one local stream.
pub(crate) struct CallState {
    pub username: Option<String>,
    pub signaling: Option<Arc<dyn SignalingChannel>>,
    pub local_stream: Option<LocalStream>,
    pub peer: Option<Arc<RTCPeerConnection>>,
    pub pending: PendingCandidates,
    // between call_started (or an offer) and the end of that call
    pub call_active: bool,
    // display state only; the tracks' own flags are authoritative
    pub is_muted: bool,
    pub is_video_enabled: bool,
}

impl Default for CallState {
    fn default() -> Self {
        Self {
            username: None,
            signaling: None,
            local_stream: None,
            peer: None,
            pending: PendingCandidates::default(),
            call_active: false,
            is_muted: false,
            is_video_enabled: true,
        }
    }
}

impl CallState {
    pub fn emit(&self, event: crate::signaling::ClientEvent) {
        let name = event.name();
        match &self.signaling {
            Some(channel) => {
                if let Err(e) = channel.emit(event) {
                    log::warn!("Failed to send {name}: {e}");
                }
            }
            None => log::debug!("Not connected, dropping {name}"),
        }
    }
}
