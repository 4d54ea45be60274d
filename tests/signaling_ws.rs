use futures_util::{SinkExt, StreamExt};
use roulette_lib::media::SampleDevices;
use roulette_lib::signaling::{ClientEvent, ServerEvent, SignalingConnector, WsConnector};
use roulette_lib::ui::{Button, Screen, Ui, VideoSurface};
use roulette_lib::{Client, ClientConfig};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

/// Accepts one WebSocket client; returns its URL, the frames it sends, and a way to push frames.
async fn one_shot_server() -> (
    String,
    mpsc::UnboundedReceiver<String>,
    mpsc::UnboundedSender<Option<String>>,
) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    let (seen_tx, seen_rx) = mpsc::unbounded_channel();
    let (push_tx, mut push_rx) = mpsc::unbounded_channel::<Option<String>>();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        let (mut sink, mut stream) = ws.split();
        loop {
            tokio::select! {
                frame = stream.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        let _ = seen_tx.send(text.as_str().to_string());
                    }
                    Some(Ok(_)) => {}
                    _ => break,
                },
                push = push_rx.recv() => match push {
                    Some(Some(text)) => sink.send(Message::Text(text.into())).await.unwrap(),
                    _ => {
                        let _ = sink.close().await;
                        break;
                    }
                },
            }
        }
    });

    (url, seen_rx, push_tx)
}

async fn next_with_timeout<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> Option<T> {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out")
}

#[tokio::test]
async fn websocket_channel_round_trip() {
    let (url, mut seen, push) = one_shot_server().await;
    let (channel, mut events) = WsConnector.connect(&url).await.unwrap();

    assert!(matches!(
        next_with_timeout(&mut events).await,
        Some(ServerEvent::Connect)
    ));

    channel.emit(ClientEvent::StartSearch).unwrap();
    let frame = next_with_timeout(&mut seen).await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
    assert_eq!(value["event"], "start_search");

    push.send(Some(r#"{"event":"waiting_for_partner"}"#.into()))
        .unwrap();
    assert!(matches!(
        next_with_timeout(&mut events).await,
        Some(ServerEvent::WaitingForPartner)
    ));

    // garbage is dropped, the stream keeps going
    push.send(Some("{not json".into())).unwrap();
    push.send(Some(
        r#"{"event":"call_started","data":{"partner_username":"bob","room_id":"r"}}"#.into(),
    ))
    .unwrap();
    match next_with_timeout(&mut events).await {
        Some(ServerEvent::CallStarted {
            partner_username, ..
        }) => assert_eq!(partner_username, "bob"),
        other => panic!("unexpected {other:?}"),
    }

    push.send(None).unwrap();
    assert!(next_with_timeout(&mut events).await.is_none());
}

#[derive(Default)]
struct ScreensOnly {
    hidden: Mutex<HashMap<Screen, bool>>,
}

impl Ui for ScreensOnly {
    fn set_screen_hidden(&self, screen: Screen, hidden: bool) {
        self.hidden.lock().unwrap().insert(screen, hidden);
    }
    fn alert(&self, _message: &str) {}
    fn set_partner_name(&self, _name: &str) {}
    fn set_button_glyph(&self, _button: Button, _glyph: &str) {}
    fn attach_stream(&self, _surface: VideoSurface, _stream_id: Option<&str>) {}
}

#[tokio::test]
async fn login_flow_reaches_waiting_screen() {
    let (url, mut seen, push) = one_shot_server().await;
    let ui = Arc::new(ScreensOnly::default());
    let config = ClientConfig {
        server_url: url,
        ice_servers: Vec::new(),
        ..ClientConfig::default()
    };
    let client = Client::new(
        config,
        ui.clone(),
        Arc::new(SampleDevices::default()),
        Arc::new(WsConnector),
    );

    client.set_username(" carol ").await.unwrap();
    let frame = next_with_timeout(&mut seen).await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
    assert_eq!(value["event"], "set_username");
    assert_eq!(value["data"]["username"], "carol");

    push.send(Some(r#"{"event":"username_set","data":{"username":"carol"}}"#.into()))
        .unwrap();
    let frame = next_with_timeout(&mut seen).await.unwrap();
    assert!(frame.contains("start_search"));

    push.send(Some(r#"{"event":"waiting_for_partner"}"#.into()))
        .unwrap();
    for _ in 0..100 {
        if ui.hidden.lock().unwrap().get(&Screen::Waiting) == Some(&false) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let hidden = ui.hidden.lock().unwrap().clone();
    assert_eq!(hidden.get(&Screen::Waiting), Some(&false));
    assert_eq!(hidden.get(&Screen::Login), Some(&true));
    assert_eq!(hidden.get(&Screen::Call), Some(&true));
}
