use super::{LocalStream, LocalTrack, MediaConstraints, MediaError, TrackKind};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Source of local camera/microphone streams.
#[async_trait]
pub trait MediaDevices: Send + Sync {
    /// Whether the host can capture media at all.
    fn is_supported(&self) -> bool {
        true
    }

    async fn get_user_media(
        &self,
        constraints: &MediaConstraints,
    ) -> Result<LocalStream, MediaError>;
}

/// Devices whose encoded samples are pushed in by the host application.
pub struct SampleDevices {
    audio: bool,
    video: bool,
    permission: AtomicBool,
    issued: Mutex<Vec<LocalTrack>>,
}

impl Default for SampleDevices {
    fn default() -> Self {
        Self::new(true, true)
    }
}

impl SampleDevices {
    pub fn new(audio: bool, video: bool) -> Self {
        Self {
            audio,
            video,
            permission: AtomicBool::new(true),
            issued: Mutex::new(Vec::new()),
        }
    }

    pub fn set_permission(&self, granted: bool) {
        self.permission.store(granted, Ordering::SeqCst);
    }

    fn has(&self, kind: TrackKind) -> bool {
        match kind {
            TrackKind::Audio => self.audio,
            TrackKind::Video => self.video,
        }
    }
}

#[async_trait]
impl MediaDevices for SampleDevices {
    async fn get_user_media(
        &self,
        constraints: &MediaConstraints,
    ) -> Result<LocalStream, MediaError> {
        let kinds = constraints.requested_kinds();
        if kinds.is_empty() {
            return Err(MediaError::Other {
                name: "TypeError".into(),
                message: "at least one of audio and video must be requested".into(),
            });
        }
        if !self.permission.load(Ordering::SeqCst) {
            return Err(MediaError::NotAllowed);
        }
        if kinds.iter().any(|k| !self.has(*k)) {
            return Err(MediaError::NotFound);
        }

        let mut issued = self.issued.lock().unwrap_or_else(|e| e.into_inner());
        issued.retain(|t| !t.is_stopped());
        if issued.iter().any(|t| kinds.contains(&t.kind())) {
            return Err(MediaError::NotReadable);
        }

        let stream_id = format!("local-{}", crate::utils::random_id());
        let tracks: Vec<LocalTrack> = kinds
            .into_iter()
            .map(|kind| LocalTrack::new(kind, &stream_id))
            .collect();
        issued.extend(tracks.iter().cloned());
        log::debug!(
            "Issued local stream {} with {} tracks",
            stream_id,
            tracks.len()
        );
        Ok(LocalStream::new(stream_id, tracks))
    }
}
