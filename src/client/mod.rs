mod state;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::media::{LocalStream, LocalTrack, MediaDevices, MediaError, TrackKind};
use crate::peer::ice::{apply_candidate, apply_candidates, validate_servers};
use crate::peer::{
    accept_offer, add_local_stream, create_offer, new_peer, RemoteSlot, ServerConfig,
};
use crate::signaling::{
    ClientEvent, ServerEvent, ServerEvents, SignalingChannel, SignalingConnector,
};
use crate::ui::{self, Button, Screen, Ui, VideoSurface};
use bytes::Bytes;
use state::CallState;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use tokio::sync::Mutex as AsyncMutex;
use webrtc::ice_transport::ice_candidate::RTCIceCandidateInit;
use webrtc::media::Sample;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::peer_connection::RTCPeerConnection;

pub const EMPTY_NAME_ALERT: &str = "Please enter a name";
pub const PARTNER_LEFT_ALERT: &str = "Your partner left the conversation";
pub const MEDIA_ACCESS_ALERT: &str = "Could not access the camera or microphone";
pub const CONNECT_FAILED_ALERT: &str = "Could not connect to the server";
pub const UNSUPPORTED_ALERT: &str =
    "Your system does not support WebRTC or camera/microphone access";

/// Event-driven glue between the signaling server, the peer connection and the UI.
pub struct Client {
    config: ClientConfig,
    ice_servers: RwLock<Vec<ServerConfig>>,
    ui: Arc<dyn Ui>,
    devices: Arc<dyn MediaDevices>,
    connector: Arc<dyn SignalingConnector>,
    state: AsyncMutex<CallState>,
    remote: RemoteSlot,
}

impl Client {
    pub fn new(
        config: ClientConfig,
        ui: Arc<dyn Ui>,
        devices: Arc<dyn MediaDevices>,
        connector: Arc<dyn SignalingConnector>,
    ) -> Arc<Self> {
        Arc::new(Self {
            ice_servers: RwLock::new(config.ice_servers.clone()),
            config,
            ui,
            devices,
            connector,
            state: AsyncMutex::new(CallState::default()),
            remote: Arc::new(Mutex::new(None)),
        })
    }

    /// Alerts when media capture is unavailable on this host.
    pub fn check_support(&self) -> bool {
        let supported = self.devices.is_supported();
        if !supported {
            self.ui.alert(UNSUPPORTED_ALERT);
        }
        supported
    }

    pub fn visibility_changed(&self, hidden: bool) {
        if hidden {
            log::info!("Page hidden");
        } else {
            log::info!("Page visible");
        }
    }

    // ========== SESSION ==========

    /// Validates the name, connects on first use and announces the name.
    pub async fn set_username(self: &Arc<Self>, raw: &str) -> Result<(), ClientError> {
        let username = raw.trim();
        if username.is_empty() {
            self.ui.alert(EMPTY_NAME_ALERT);
            return Err(ClientError::EmptyUsername);
        }

        let existing = self.state.lock().await.signaling.clone();
        let channel = match existing {
            Some(channel) => channel,
            None => {
                // handshake runs without the session lock
                let connected = self.connector.connect(&self.config.server_url).await;
                let (channel, events) = match connected {
                    Ok(conn) => conn,
                    Err(e) => {
                        log::error!("Signaling connection failed: {e}");
                        self.ui.alert(CONNECT_FAILED_ALERT);
                        return Err(e);
                    }
                };
                let mut st = self.state.lock().await;
                match st.signaling.clone() {
                    Some(current) => {
                        log::debug!("Another login connected first, dropping the new connection");
                        current
                    }
                    None => {
                        st.signaling = Some(channel.clone());
                        self.spawn_event_loop(events, channel.clone());
                        channel
                    }
                }
            }
        };

        self.state.lock().await.username = Some(username.to_string());
        channel.emit(ClientEvent::SetUsername {
            username: username.to_string(),
        })
    }

    fn spawn_event_loop(
        self: &Arc<Self>,
        mut events: ServerEvents,
        channel: Arc<dyn SignalingChannel>,
    ) {
        let client = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                client.handle_event(event).await;
            }
            log::warn!("Signaling event stream ended");
            let mut st = client.state.lock().await;
            let same = st
                .signaling
                .as_ref()
                .is_some_and(|current| same_channel(current, &channel));
            if same {
                st.signaling = None;
            }
        });
    }

    /// Dispatches one server event. Events are handled one at a time.
    pub async fn handle_event(&self, event: ServerEvent) {
        match event {
            ServerEvent::Connect => log::info!("Connected to server"),
            ServerEvent::ConnectionEstablished => log::info!("Socket connection established"),
            ServerEvent::UsernameSet { username } => {
                log::info!("Username set to {username}");
                self.start_search().await;
            }
            ServerEvent::WaitingForPartner => self.show_screen(Screen::Waiting),
            ServerEvent::CallStarted {
                partner_username,
                room_id,
            } => {
                log::info!("Call started with {partner_username} (room {room_id:?})");
                {
                    let mut st = self.state.lock().await;
                    st.call_active = true;
                    st.pending.clear();
                }
                self.show_screen(Screen::Call);
                self.ui.set_partner_name(&partner_username);
                self.start_call().await;
            }
            ServerEvent::PartnerLeft => {
                self.end_call().await;
                self.ui.alert(PARTNER_LEFT_ALERT);
                self.show_screen(Screen::Login);
            }
            ServerEvent::SearchStopped => log::info!("Search stopped"),
            ServerEvent::WebrtcOffer { offer, from } => {
                log::debug!("Offer from {from:?}");
                self.handle_offer(offer).await;
            }
            ServerEvent::WebrtcAnswer { answer, .. } => self.handle_answer(answer).await,
            ServerEvent::IceCandidate { candidate, .. } => {
                self.handle_ice_candidate(candidate).await
            }
            ServerEvent::Unknown(name) => log::debug!("Ignoring unknown event {name}"),
        }
    }

    pub async fn start_search(&self) {
        let st = self.state.lock().await;
        st.emit(ClientEvent::StartSearch);
    }

    pub async fn stop_search(&self) {
        let st = self.state.lock().await;
        self.stop_search_locked(&st);
    }

    fn stop_search_locked(&self, st: &CallState) {
        st.emit(ClientEvent::StopSearch);
        self.show_screen(Screen::Login);
    }

    // ========== NEGOTIATION ==========

    /// Caller side: media, peer connection, offer.
    pub async fn start_call(&self) {
        let mut st = self.state.lock().await;
        if let Err(e) = self.start_call_locked(&mut st).await {
            log::error!("Error starting call: {e}");
            let message = match &e {
                ClientError::Media(media) => media.user_message(),
                other => MediaError::Other {
                    name: "Error".into(),
                    message: other.to_string(),
                }
                .user_message(),
            };
            self.release_call(&mut st).await;
            st.call_active = false;
            self.ui.alert(&message);
            self.stop_search_locked(&st);
        }
    }

    async fn start_call_locked(&self, st: &mut CallState) -> Result<(), ClientError> {
        self.release_call(st).await;
        st.pending.clear();

        let stream = self.acquire_media(st).await?;
        let pc = self.build_peer(st).await?;
        add_local_stream(&pc, &stream).await?;

        let offer = create_offer(&pc).await?;
        st.emit(ClientEvent::WebrtcOffer { offer });
        Ok(())
    }

    /// Callee side: media, peer connection, answer.
    pub async fn handle_offer(&self, offer: RTCSessionDescription) {
        let mut st = self.state.lock().await;
        st.call_active = true;
        let early = st.pending.take();
        self.release_call(&mut st).await;

        let stream = match self.acquire_media(&mut st).await {
            Ok(stream) => stream,
            Err(e) => {
                log::error!("Media access error: {e}");
                st.call_active = false;
                st.emit(ClientEvent::EndCall);
                self.ui.alert(MEDIA_ACCESS_ALERT);
                self.show_screen(Screen::Login);
                return;
            }
        };

        if let Err(e) = self.answer_offer(&mut st, &stream, offer, early).await {
            log::error!("Error handling offer: {e}");
            self.release_call(&mut st).await;
            st.call_active = false;
            st.emit(ClientEvent::EndCall);
        }
    }

    async fn answer_offer(
        &self,
        st: &mut CallState,
        stream: &LocalStream,
        offer: RTCSessionDescription,
        early: Vec<RTCIceCandidateInit>,
    ) -> Result<(), ClientError> {
        let pc = self.build_peer(st).await?;
        add_local_stream(&pc, stream).await?;
        let answer = accept_offer(&pc, offer, early).await?;
        st.emit(ClientEvent::WebrtcAnswer { answer });
        Ok(())
    }

    pub async fn handle_answer(&self, answer: RTCSessionDescription) {
        let mut st = self.state.lock().await;
        let Some(pc) = st.peer.clone() else {
            log::error!("Error handling answer: no peer connection");
            return;
        };
        match pc.set_remote_description(answer).await {
            Ok(()) => {
                let early = st.pending.take();
                apply_candidates(&pc, early).await;
            }
            Err(e) => log::error!("Error handling answer: {e}"),
        }
    }

    /// Applies the candidate now, or queues it until a remote description exists.
    /// Candidates arriving outside a call are dropped.
    pub async fn handle_ice_candidate(&self, candidate: RTCIceCandidateInit) {
        let mut st = self.state.lock().await;
        let ready = match st.peer.clone() {
            Some(pc) => pc.remote_description().await.map(|_| pc),
            None => None,
        };
        match ready {
            Some(pc) => {
                apply_candidate(&pc, candidate).await;
            }
            None if st.peer.is_some() || st.call_active => {
                log::debug!("Remote description not set yet, queuing candidate");
                st.pending.push(candidate);
            }
            None => log::debug!("No call in progress, dropping ICE candidate"),
        }
    }

    async fn acquire_media(&self, st: &mut CallState) -> Result<LocalStream, ClientError> {
        let stream = self.devices.get_user_media(&self.config.media).await?;
        self.ui.attach_stream(VideoSurface::Local, Some(stream.id()));
        st.local_stream = Some(stream.clone());
        st.is_muted = false;
        st.is_video_enabled = true;
        self.ui.set_button_glyph(Button::Mute, ui::mute_glyph(false));
        self.ui.set_button_glyph(Button::Video, ui::video_glyph(true));
        Ok(stream)
    }

    async fn build_peer(
        &self,
        st: &mut CallState,
    ) -> Result<Arc<RTCPeerConnection>, ClientError> {
        let signaling = st.signaling.clone().ok_or(ClientError::SignalingClosed)?;
        let pc = new_peer(
            &self.ice_servers(),
            signaling,
            self.ui.clone(),
            self.remote.clone(),
        )
        .await?;
        st.peer = Some(pc.clone());
        Ok(pc)
    }

    // ========== TEARDOWN ==========

    /// Stops local media and closes the peer connection without telling the server.
    async fn release_call(&self, st: &mut CallState) {
        if let Some(stream) = st.local_stream.take() {
            stream.stop();
            self.ui.attach_stream(VideoSurface::Local, None);
        }
        if let Some(pc) = st.peer.take() {
            if let Err(e) = pc.close().await {
                log::warn!("Error closing peer connection: {e}");
            }
        }
        let had_remote = self
            .remote
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
            .is_some();
        if had_remote {
            self.ui.attach_stream(VideoSurface::Remote, None);
        }
    }

    pub async fn end_call(&self) {
        let mut st = self.state.lock().await;
        self.release_call(&mut st).await;
        st.pending.clear();
        st.call_active = false;
        st.emit(ClientEvent::EndCall);
        self.show_screen(Screen::Login);
    }

    // ========== TOGGLES ==========

    /// Flips every audio track. Returns the new muted state, `None` when there is nothing to mute.
    pub async fn toggle_mute(&self) -> Option<bool> {
        let mut st = self.state.lock().await;
        let tracks = Self::tracks_of(&st, TrackKind::Audio);
        if tracks.is_empty() {
            return None;
        }
        for track in &tracks {
            track.set_enabled(!track.enabled());
        }
        st.is_muted = !st.is_muted;
        self.ui
            .set_button_glyph(Button::Mute, ui::mute_glyph(st.is_muted));
        Some(st.is_muted)
    }

    /// Flips every video track. Returns the new enabled state.
    pub async fn toggle_video(&self) -> Option<bool> {
        let mut st = self.state.lock().await;
        let tracks = Self::tracks_of(&st, TrackKind::Video);
        if tracks.is_empty() {
            return None;
        }
        for track in &tracks {
            track.set_enabled(!track.enabled());
        }
        st.is_video_enabled = !st.is_video_enabled;
        self.ui
            .set_button_glyph(Button::Video, ui::video_glyph(st.is_video_enabled));
        Some(st.is_video_enabled)
    }

    fn tracks_of(st: &CallState, kind: TrackKind) -> Vec<LocalTrack> {
        st.local_stream
            .as_ref()
            .map(|s| s.tracks_of(kind).cloned().collect())
            .unwrap_or_default()
    }

    /// Feeds one encoded sample to the local tracks of `kind`. Returns how many took it.
    pub async fn push_sample(
        &self,
        kind: TrackKind,
        data: Bytes,
        duration: Duration,
    ) -> Result<usize, ClientError> {
        let tracks = {
            let st = self.state.lock().await;
            Self::tracks_of(&st, kind)
        };
        let sample = Sample {
            data,
            duration,
            ..Default::default()
        };
        let mut written = 0;
        for track in &tracks {
            if track.write_sample(&sample).await? {
                written += 1;
            }
        }
        Ok(written)
    }

    // ========== CONFIG / INSPECTION ==========

    pub fn set_ice_servers(&self, servers: Vec<ServerConfig>) -> Result<(), ClientError> {
        validate_servers(&servers)?;
        log::info!("Using {} custom ICE servers", servers.len());
        *self.ice_servers.write().unwrap_or_else(|e| e.into_inner()) = servers;
        Ok(())
    }

    pub fn ice_servers(&self) -> Vec<ServerConfig> {
        self.ice_servers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub async fn username(&self) -> Option<String> {
        self.state.lock().await.username.clone()
    }

    pub async fn is_connected(&self) -> bool {
        self.state.lock().await.signaling.is_some()
    }

    pub async fn peer_connection(&self) -> Option<Arc<RTCPeerConnection>> {
        self.state.lock().await.peer.clone()
    }

    pub async fn local_stream(&self) -> Option<LocalStream> {
        self.state.lock().await.local_stream.clone()
    }

    pub async fn pending_candidates(&self) -> usize {
        self.state.lock().await.pending.len()
    }

    pub async fn is_muted(&self) -> bool {
        self.state.lock().await.is_muted
    }

    pub async fn is_video_enabled(&self) -> bool {
        self.state.lock().await.is_video_enabled
    }

    fn show_screen(&self, screen: Screen) {
        ui::show_screen(self.ui.as_ref(), screen);
    }
}

fn same_channel(a: &Arc<dyn SignalingChannel>, b: &Arc<dyn SignalingChannel>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}
