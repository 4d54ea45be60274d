use serde::{Deserialize, Serialize};

/// ICE server entry as configured by the user
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub id: String,
    pub r#type: String, // "stun" or "turn"
    pub url: String,
    pub username: Option<String>,
    pub credential: Option<String>,
}
