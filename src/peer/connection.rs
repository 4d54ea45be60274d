use crate::error::ClientError;
use crate::logger::{dump_candidate, dump_selected_pair};
use crate::media::LocalStream;
use crate::peer::ice::{apply_candidates, get_user_ice_servers};
use crate::peer::types::ServerConfig;
use crate::signaling::{ClientEvent, SignalingChannel};
use crate::ui::{Ui, VideoSurface};
use std::sync::{Arc, Mutex};
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::api::APIBuilder;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_connection_state::RTCIceConnectionState;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::policy::bundle_policy::RTCBundlePolicy;
use webrtc::peer_connection::policy::rtcp_mux_policy::RTCRtcpMuxPolicy;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::peer_connection::{
    configuration::RTCConfiguration, peer_connection_state::RTCPeerConnectionState,
    RTCPeerConnection,
};
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::track::track_remote::TrackRemote;

/// Id of the remote stream currently shown, written by the track handler.
pub type RemoteSlot = Arc<Mutex<Option<String>>>;

/// Builds a peer connection that trickles its candidates over `signaling`
/// and shows remote media on the remote surface.
pub async fn new_peer(
    ice_servers: &[ServerConfig],
    signaling: Arc<dyn SignalingChannel>,
    ui: Arc<dyn Ui>,
    remote: RemoteSlot,
) -> Result<Arc<RTCPeerConnection>, ClientError> {
    let mut media = MediaEngine::default();
    media.register_default_codecs()?;

    let mut registry = Registry::new();
    registry = register_default_interceptors(registry, &mut media)?;

    let api = APIBuilder::new()
        .with_media_engine(media)
        .with_interceptor_registry(registry)
        .build();

    let pc = Arc::new(api.new_peer_connection(rtc_config(ice_servers)).await?);

    pc.on_ice_candidate(Box::new(move |cand: Option<RTCIceCandidate>| {
        let signaling = signaling.clone();
        Box::pin(async move {
            let Some(c) = cand else {
                log::debug!("ICE candidate gathering completed");
                return;
            };
            dump_candidate("LOCAL", &c);
            match c.to_json() {
                Ok(candidate) => {
                    if let Err(e) = signaling.emit(ClientEvent::IceCandidate { candidate }) {
                        log::warn!("Failed to send ICE candidate: {e}");
                    }
                }
                Err(e) => log::warn!("Failed to serialize ICE candidate: {e}"),
            }
        })
    }));

    pc.on_track(Box::new(
        move |track: Arc<TrackRemote>,
              _receiver: Arc<RTCRtpReceiver>,
              _transceiver: Arc<RTCRtpTransceiver>| {
            let ui = ui.clone();
            let remote = remote.clone();
            Box::pin(async move {
                let stream_id = track.stream_id();
                log::info!(
                    "Remote {} track {} on stream {}",
                    track.kind(),
                    track.id(),
                    stream_id
                );
                let changed = {
                    let mut slot = remote.lock().unwrap_or_else(|e| e.into_inner());
                    let changed = slot.as_deref() != Some(stream_id.as_str());
                    *slot = Some(stream_id.clone());
                    changed
                };
                if changed {
                    ui.attach_stream(VideoSurface::Remote, Some(&stream_id));
                }
                tokio::spawn(drain_remote(track));
            })
        },
    ));

    let pc_state = Arc::downgrade(&pc);
    pc.on_peer_connection_state_change(Box::new(move |st: RTCPeerConnectionState| {
        log::info!("Connection state: {st}");
        match st {
            RTCPeerConnectionState::Connected => {
                log::info!("Peer connection established successfully");
            }
            RTCPeerConnectionState::Failed => {
                if let Some(pc) = pc_state.upgrade() {
                    tokio::spawn(async move {
                        dump_selected_pair(&pc, "FAILED").await;
                    });
                }
            }
            _ => {}
        }
        Box::pin(async {})
    }));

    pc.on_ice_connection_state_change(Box::new(move |st: RTCIceConnectionState| {
        log::info!("ICE connection state: {st}");
        Box::pin(async {})
    }));

    Ok(pc)
}

fn rtc_config(servers: &[ServerConfig]) -> RTCConfiguration {
    RTCConfiguration {
        ice_servers: get_user_ice_servers(servers),
        bundle_policy: RTCBundlePolicy::MaxBundle,
        rtcp_mux_policy: RTCRtcpMuxPolicy::Require,
        ..Default::default()
    }
}

/// Adds every local track and keeps its RTCP flowing.
pub async fn add_local_stream(
    pc: &RTCPeerConnection,
    stream: &LocalStream,
) -> Result<(), ClientError> {
    for track in stream.tracks() {
        let rtp_sender = pc.add_track(track.rtc_track()).await?;
        tokio::spawn(async move {
            let mut rtcp_buf = vec![0u8; 1500];
            while rtp_sender.read(&mut rtcp_buf).await.is_ok() {}
        });
    }
    Ok(())
}

/// Caller side: offer set as local description, ready to send.
pub async fn create_offer(pc: &RTCPeerConnection) -> Result<RTCSessionDescription, ClientError> {
    let offer = pc.create_offer(None).await?;
    pc.set_local_description(offer).await?;
    pc.local_description()
        .await
        .ok_or(ClientError::MissingLocalDescription)
}

/// Callee side: applies the remote offer plus candidates that arrived
/// ahead of it, and returns the local answer.
pub async fn accept_offer(
    pc: &RTCPeerConnection,
    offer: RTCSessionDescription,
    early_candidates: Vec<RTCIceCandidateInit>,
) -> Result<RTCSessionDescription, ClientError> {
    pc.set_remote_description(offer).await?;
    apply_candidates(pc, early_candidates).await;
    let answer = pc.create_answer(None).await?;
    pc.set_local_description(answer).await?;
    pc.local_description()
        .await
        .ok_or(ClientError::MissingLocalDescription)
}

async fn drain_remote(track: Arc<TrackRemote>) {
    let mut packets: u64 = 0;
    while track.read_rtp().await.is_ok() {
        packets += 1;
        if packets == 1 {
            log::debug!("First RTP packet on remote track {}", track.id());
        }
    }
    log::debug!(
        "Remote track {} ended after {} packets",
        track.id(),
        packets
    );
}
