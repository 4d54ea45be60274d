use super::{ClientEvent, ServerEvent, ServerEvents, SignalingChannel, SignalingConnector};
use crate::error::ClientError;
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

/// WebSocket signaling: one writer task, one reader task.
pub struct WsSignaling {
    tx: mpsc::UnboundedSender<Message>,
}

impl SignalingChannel for WsSignaling {
    fn emit(&self, event: ClientEvent) -> Result<(), ClientError> {
        log::debug!("emit {}", event.name());
        let text = event.to_text()?;
        self.tx
            .send(Message::Text(text.into()))
            .map_err(|_| ClientError::SignalingClosed)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct WsConnector;

#[async_trait]
impl SignalingConnector for WsConnector {
    async fn connect(
        &self,
        url: &str,
    ) -> Result<(Arc<dyn SignalingChannel>, ServerEvents), ClientError> {
        log::info!("Connecting to signaling server {url}");
        let (ws, _) = connect_async(url).await?;
        let (mut sink, mut stream) = ws.split();

        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Message>();
        let (event_tx, event_rx) = mpsc::unbounded_channel::<ServerEvent>();

        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                if let Err(e) = sink.send(msg).await {
                    log::warn!("Signaling write failed: {e}");
                    break;
                }
            }
            let _ = sink.close().await;
        });

        let _ = event_tx.send(ServerEvent::Connect);
        tokio::spawn(async move {
            while let Some(frame) = stream.next().await {
                match frame {
                    Ok(Message::Text(text)) => match ServerEvent::parse(text.as_str()) {
                        Ok(event) => {
                            if event_tx.send(event).is_err() {
                                break;
                            }
                        }
                        Err(e) => log::warn!("Dropping signaling frame: {e}"),
                    },
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        log::warn!("Signaling read failed: {e}");
                        break;
                    }
                }
            }
            log::info!("Signaling connection closed");
        });

        Ok((Arc::new(WsSignaling { tx: out_tx }), event_rx))
    }
}
