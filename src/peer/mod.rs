pub mod connection;
pub mod ice;
pub mod types;

pub use connection::{accept_offer, add_local_stream, create_offer, new_peer, RemoteSlot};
pub use ice::PendingCandidates;
pub use types::ServerConfig;
