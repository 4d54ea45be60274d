use crate::error::ClientError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use webrtc::ice_transport::ice_candidate::RTCIceCandidateInit;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;

/// One frame on the wire: `{"event": name, "data": payload}`.
#[derive(Deserialize, Debug)]
struct Envelope {
    event: String,
    #[serde(default)]
    data: Option<Value>,
}

/// Events sent by the client.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    SetUsername { username: String },
    StartSearch,
    StopSearch,
    WebrtcOffer { offer: RTCSessionDescription },
    WebrtcAnswer { answer: RTCSessionDescription },
    IceCandidate { candidate: RTCIceCandidateInit },
    EndCall,
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::SetUsername { .. } => "set_username",
            ClientEvent::StartSearch => "start_search",
            ClientEvent::StopSearch => "stop_search",
            ClientEvent::WebrtcOffer { .. } => "webrtc_offer",
            ClientEvent::WebrtcAnswer { .. } => "webrtc_answer",
            ClientEvent::IceCandidate { .. } => "ice_candidate",
            ClientEvent::EndCall => "end_call",
        }
    }

    pub fn to_text(&self) -> Result<String, ClientError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Events received from the server.
#[derive(Debug, Clone)]
pub enum ServerEvent {
    /// The socket itself came up.
    Connect,
    ConnectionEstablished,
    UsernameSet {
        username: String,
    },
    WaitingForPartner,
    CallStarted {
        partner_username: String,
        room_id: Option<String>,
    },
    PartnerLeft,
    SearchStopped,
    WebrtcOffer {
        offer: RTCSessionDescription,
        from: Option<String>,
    },
    WebrtcAnswer {
        answer: RTCSessionDescription,
        from: Option<String>,
    },
    IceCandidate {
        candidate: RTCIceCandidateInit,
        from: Option<String>,
    },
    Unknown(String),
}

#[derive(Deserialize)]
struct UsernameSetData {
    username: String,
}

#[derive(Deserialize)]
struct CallStartedData {
    partner_username: String,
    #[serde(default)]
    room_id: Option<String>,
}

#[derive(Deserialize)]
struct OfferData {
    offer: RTCSessionDescription,
    #[serde(default)]
    from: Option<String>,
}

#[derive(Deserialize)]
struct AnswerData {
    answer: RTCSessionDescription,
    #[serde(default)]
    from: Option<String>,
}

#[derive(Deserialize)]
struct CandidateData {
    candidate: RTCIceCandidateInit,
    #[serde(default)]
    from: Option<String>,
}

impl ServerEvent {
    pub fn parse(text: &str) -> Result<Self, ClientError> {
        let envelope: Envelope = serde_json::from_str(text)?;
        let data = envelope.data.unwrap_or(Value::Null);

        let event = match envelope.event.as_str() {
            "connect" => ServerEvent::Connect,
            "connection_established" => ServerEvent::ConnectionEstablished,
            "username_set" => {
                let d: UsernameSetData = serde_json::from_value(data)?;
                ServerEvent::UsernameSet {
                    username: d.username,
                }
            }
            "waiting_for_partner" => ServerEvent::WaitingForPartner,
            "call_started" => {
                let d: CallStartedData = serde_json::from_value(data)?;
                ServerEvent::CallStarted {
                    partner_username: d.partner_username,
                    room_id: d.room_id,
                }
            }
            "partner_left" => ServerEvent::PartnerLeft,
            "search_stopped" => ServerEvent::SearchStopped,
            "webrtc_offer" => {
                let d: OfferData = serde_json::from_value(data)?;
                ServerEvent::WebrtcOffer {
                    offer: d.offer,
                    from: d.from,
                }
            }
            "webrtc_answer" => {
                let d: AnswerData = serde_json::from_value(data)?;
                ServerEvent::WebrtcAnswer {
                    answer: d.answer,
                    from: d.from,
                }
            }
            "ice_candidate" => {
                let d: CandidateData = serde_json::from_value(data)?;
                ServerEvent::IceCandidate {
                    candidate: d.candidate,
                    from: d.from,
                }
            }
            other => ServerEvent::Unknown(other.to_string()),
        };
        Ok(event)
    }
}
