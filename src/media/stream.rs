use crate::error::ClientError;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8};
use webrtc::media::Sample;
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;
use webrtc::track::track_local::TrackLocal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Audio,
    Video,
}

impl TrackKind {
    fn codec(self) -> RTCRtpCodecCapability {
        match self {
            TrackKind::Audio => RTCRtpCodecCapability {
                mime_type: MIME_TYPE_OPUS.to_owned(),
                clock_rate: 48_000,
                channels: 2,
                ..Default::default()
            },
            TrackKind::Video => RTCRtpCodecCapability {
                mime_type: MIME_TYPE_VP8.to_owned(),
                clock_rate: 90_000,
                ..Default::default()
            },
        }
    }

    fn label(self) -> &'static str {
        match self {
            TrackKind::Audio => "audio",
            TrackKind::Video => "video",
        }
    }
}

/// One local track. Clones share the enabled/stopped flags.
#[derive(Clone)]
pub struct LocalTrack {
    kind: TrackKind,
    track: Arc<TrackLocalStaticSample>,
    enabled: Arc<AtomicBool>,
    stopped: Arc<AtomicBool>,
}

impl LocalTrack {
    pub fn new(kind: TrackKind, stream_id: &str) -> Self {
        let track = Arc::new(TrackLocalStaticSample::new(
            kind.codec(),
            format!("{}-{}", kind.label(), crate::utils::random_id()),
            stream_id.to_owned(),
        ));
        Self {
            kind,
            track,
            enabled: Arc::new(AtomicBool::new(true)),
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> &str {
        self.track.id()
    }

    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    pub fn enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn rtc_track(&self) -> Arc<dyn TrackLocal + Send + Sync> {
        Arc::clone(&self.track) as Arc<dyn TrackLocal + Send + Sync>
    }

    /// Sends one encoded sample. Returns false when the track dropped it
    /// because it is disabled or stopped.
    pub async fn write_sample(&self, sample: &Sample) -> Result<bool, ClientError> {
        if self.is_stopped() || !self.enabled() {
            return Ok(false);
        }
        self.track.write_sample(sample).await?;
        Ok(true)
    }
}

impl std::fmt::Debug for LocalTrack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalTrack")
            .field("id", &self.id())
            .field("kind", &self.kind)
            .field("enabled", &self.enabled())
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct LocalStream {
    id: String,
    tracks: Vec<LocalTrack>,
}

impl LocalStream {
    pub fn new(id: String, tracks: Vec<LocalTrack>) -> Self {
        Self { id, tracks }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tracks(&self) -> &[LocalTrack] {
        &self.tracks
    }

    pub fn tracks_of(&self, kind: TrackKind) -> impl Iterator<Item = &LocalTrack> {
        self.tracks.iter().filter(move |t| t.kind() == kind)
    }

    pub fn audio_tracks(&self) -> impl Iterator<Item = &LocalTrack> {
        self.tracks_of(TrackKind::Audio)
    }

    pub fn video_tracks(&self) -> impl Iterator<Item = &LocalTrack> {
        self.tracks_of(TrackKind::Video)
    }

    pub fn stop(&self) {
        for track in &self.tracks {
            track.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::time::Duration;

    fn sample() -> Sample {
        Sample {
            data: Bytes::from_static(&[0u8; 8]),
            duration: Duration::from_millis(20),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn disabled_and_stopped_tracks_drop_samples() {
        let track = LocalTrack::new(TrackKind::Audio, "stream");
        assert!(track.write_sample(&sample()).await.unwrap());

        track.set_enabled(false);
        assert!(!track.write_sample(&sample()).await.unwrap());

        track.set_enabled(true);
        track.stop();
        assert!(!track.write_sample(&sample()).await.unwrap());
    }

    #[test]
    fn clones_share_flags() {
        let track = LocalTrack::new(TrackKind::Video, "stream");
        let copy = track.clone();
        copy.set_enabled(false);
        assert!(!track.enabled());
        copy.stop();
        assert!(track.is_stopped());
        assert!(track.id().starts_with("video-"));
    }

    #[test]
    fn stream_filters_and_stops_tracks() {
        let stream = LocalStream::new(
            "s1".into(),
            vec![
                LocalTrack::new(TrackKind::Audio, "s1"),
                LocalTrack::new(TrackKind::Video, "s1"),
            ],
        );
        assert_eq!(stream.audio_tracks().count(), 1);
        assert_eq!(stream.video_tracks().count(), 1);
        stream.stop();
        assert!(stream.tracks().iter().all(LocalTrack::is_stopped));
    }
}
