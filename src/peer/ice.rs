use crate::error::ClientError;
use crate::peer::types::ServerConfig;
use crate::utils::add_ice_url_scheme;
use webrtc::ice_transport::ice_candidate::RTCIceCandidateInit;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::peer_connection::RTCPeerConnection;

/// Remote candidates received before a peer connection could take them.
#[derive(Debug, Default)]
pub struct PendingCandidates {
    queue: Vec<RTCIceCandidateInit>,
}

impl PendingCandidates {
    pub fn push(&mut self, candidate: RTCIceCandidateInit) {
        self.queue.push(candidate);
    }

    pub fn take(&mut self) -> Vec<RTCIceCandidateInit> {
        std::mem::take(&mut self.queue)
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Applies a remote candidate. Failures are logged only.
pub async fn apply_candidate(pc: &RTCPeerConnection, candidate: RTCIceCandidateInit) -> bool {
    match pc.add_ice_candidate(candidate).await {
        Ok(_) => {
            log::debug!("Added remote ICE candidate");
            true
        }
        Err(e) => {
            log::error!("Error adding ICE candidate: {e}");
            false
        }
    }
}

pub async fn apply_candidates(pc: &RTCPeerConnection, candidates: Vec<RTCIceCandidateInit>) {
    if !candidates.is_empty() {
        log::debug!("Applying {} queued candidates", candidates.len());
    }
    for candidate in candidates {
        apply_candidate(pc, candidate).await;
    }
}

pub fn get_user_ice_servers(servers: &[ServerConfig]) -> Vec<RTCIceServer> {
    servers
        .iter()
        .map(|config| RTCIceServer {
            urls: vec![add_ice_url_scheme(config)],
            username: config.username.clone().unwrap_or_default(),
            credential: config.credential.clone().unwrap_or_default(),
        })
        .collect()
}

pub fn validate_servers(servers: &[ServerConfig]) -> Result<(), ClientError> {
    for server in servers {
        if server.url.trim().is_empty() {
            return Err(ClientError::InvalidIceServer(format!(
                "{}: URL cannot be empty",
                server.id
            )));
        }
        if server.r#type == "turn" && (server.username.is_none() || server.credential.is_none()) {
            return Err(ClientError::InvalidIceServer(format!(
                "{}: TURN servers require username and credential",
                server.id
            )));
        }
    }
    Ok(())
}
