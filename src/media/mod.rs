pub mod devices;
pub mod stream;

pub use devices::{MediaDevices, SampleDevices};
pub use stream::{LocalStream, LocalTrack, TrackKind};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What `get_user_media` is asked for. `None` means the kind is not requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConstraints {
    pub video: Option<VideoConstraints>,
    pub audio: Option<AudioConstraints>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoConstraints {
    pub ideal_width: u32,
    pub ideal_height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioConstraints {
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
}

impl Default for MediaConstraints {
    fn default() -> Self {
        Self {
            video: Some(VideoConstraints {
                ideal_width: 640,
                ideal_height: 480,
            }),
            audio: Some(AudioConstraints {
                echo_cancellation: true,
                noise_suppression: true,
            }),
        }
    }
}

impl MediaConstraints {
    pub fn requested_kinds(&self) -> Vec<TrackKind> {
        let mut kinds = Vec::with_capacity(2);
        if self.audio.is_some() {
            kinds.push(TrackKind::Audio);
        }
        if self.video.is_some() {
            kinds.push(TrackKind::Video);
        }
        kinds
    }
}

/// Media-access failure, classified by its browser-style error name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    #[error("NotAllowedError: permission denied")]
    NotAllowed,

    #[error("NotFoundError: requested device not found")]
    NotFound,

    #[error("NotReadableError: device is already in use")]
    NotReadable,

    #[error("{name}: {message}")]
    Other { name: String, message: String },
}

impl MediaError {
    pub fn from_name(name: &str, message: &str) -> Self {
        match name {
            "NotAllowedError" => MediaError::NotAllowed,
            "NotFoundError" => MediaError::NotFound,
            "NotReadableError" => MediaError::NotReadable,
            _ => MediaError::Other {
                name: name.to_string(),
                message: message.to_string(),
            },
        }
    }

    pub fn name(&self) -> &str {
        match self {
            MediaError::NotAllowed => "NotAllowedError",
            MediaError::NotFound => "NotFoundError",
            MediaError::NotReadable => "NotReadableError",
            MediaError::Other { name, .. } => name,
        }
    }

    /// Text shown to the user in the alert.
    pub fn user_message(&self) -> String {
        match self {
            MediaError::NotAllowed => {
                "Access to the camera/microphone was denied. Allow access in your system settings."
                    .to_string()
            }
            MediaError::NotFound => "No camera or microphone was found.".to_string(),
            MediaError::NotReadable => "Could not access the camera/microphone. \
                 They may already be in use by another application."
                .to_string(),
            MediaError::Other { message, .. } => {
                format!("Camera/microphone access error: {message}")
            }
        }
    }
}
