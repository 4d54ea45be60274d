pub mod events;
pub mod ws;

pub use events::{ClientEvent, ServerEvent};
pub use ws::{WsConnector, WsSignaling};

use crate::error::ClientError;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;

pub type ServerEvents = mpsc::UnboundedReceiver<ServerEvent>;

/// Outgoing half of the signaling connection.
pub trait SignalingChannel: Send + Sync {
    fn emit(&self, event: ClientEvent) -> Result<(), ClientError>;
}

/// Opens signaling connections. The receiver yields server events until the socket closes.
#[async_trait]
pub trait SignalingConnector: Send + Sync {
    async fn connect(
        &self,
        url: &str,
    ) -> Result<(Arc<dyn SignalingChannel>, ServerEvents), ClientError>;
}
