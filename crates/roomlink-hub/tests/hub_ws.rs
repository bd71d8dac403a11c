//! Hub end-to-end over real sockets: roster push, chat relay, light toggles,
//! enable switches and heartbeat timing.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use roomlink_hub::app_state::AppState;
use roomlink_hub::{config, server};

type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;

const WAIT: Duration = Duration::from_secs(5);

async fn hub(extra: &str) -> SocketAddr {
    let yaml = format!("version: 1\nhub: {{ listen: \"127.0.0.1:0\" }}\n{extra}");
    let cfg = config::load_from_str(&yaml).unwrap();
    let running = server::start(AppState::new(cfg).unwrap()).await.unwrap();
    running.addr
}

async fn connect(addr: SocketAddr, path: &str) -> Ws {
    let (ws, _) = connect_async(format!("ws://{addr}{path}")).await.unwrap();
    ws
}

async fn send(ws: &mut Ws, header: &str, payload: serde_json::Value) {
    let frame = serde_json::json!({ "header": header, "payload": payload });
    ws.send(Message::Text(frame.to_string())).await.unwrap();
}

/// Next text frame as JSON, skipping control frames.
async fn next_json(ws: &mut Ws) -> serde_json::Value {
    loop {
        let msg = timeout(WAIT, ws.next())
            .await
            .expect("timed out")
            .expect("stream ended")
            .unwrap();
        if let Message::Text(t) = msg {
            return serde_json::from_str(&t).unwrap();
        }
    }
}

/// Next frame carrying `header`, skipping anything else (e.g. roster pushes).
async fn next_with(ws: &mut Ws, header: &str) -> serde_json::Value {
    loop {
        let v = next_json(ws).await;
        if v["header"] == header {
            return v;
        }
    }
}

#[tokio::test]
async fn lobby_gets_roster_on_connect() {
    let addr = hub(
        r#"
roster:
  channels:
    - { name: "Lobby", clients: ["alice", "bob"] }
"#,
    )
    .await;

    let mut ws = connect(addr, "/ws").await;
    let v = next_json(&mut ws).await;
    assert_eq!(v["header"], "clientlist");
    assert_eq!(v["payload"][0]["ChannelName"], "Lobby");
    assert_eq!(v["payload"][0]["Clients"][1], "bob");
}

#[tokio::test]
async fn empty_roster_is_pushed_as_null() {
    let addr = hub("").await;
    let mut ws = connect(addr, "/ws").await;
    let v = next_json(&mut ws).await;
    assert_eq!(v["header"], "clientlist");
    assert!(v.get("payload").unwrap().is_null());
}

#[tokio::test]
async fn disabled_roster_is_never_pushed() {
    let addr = hub(
        r#"
roster:
  enabled: false
  channels:
    - { name: "Lobby", clients: ["alice"] }
"#,
    )
    .await;
    let mut a = connect(addr, "/ws").await;

    let body = r#"{"ip":"0.0.0.0","message":"first","time":"--:--"}"#;
    send(&mut a, "chatmessage", serde_json::Value::String(body.into())).await;

    let v = next_json(&mut a).await;
    assert_eq!(v["header"], "servermsg");
    assert_eq!(v["payload"], "first");
}

#[tokio::test]
async fn hidden_channel_is_not_pushed() {
    let addr = hub(
        r#"
roster:
  hidden_channels: [98]
  channels:
    - { id: 1, name: "Lobby", clients: ["alice"] }
    - { id: 98, name: "Back Office", clients: ["carol"] }
"#,
    )
    .await;
    let mut ws = connect(addr, "/ws").await;
    let v = next_with(&mut ws, "clientlist").await;
    assert_eq!(
        v["payload"],
        serde_json::json!([{ "ChannelName": "Lobby", "Clients": ["alice"] }])
    );
}

#[tokio::test]
async fn disabled_server_messages_produce_no_servermsg() {
    let addr = hub("server_messages: { enabled: false }\n").await;
    let mut a = connect(addr, "/ws").await;
    next_with(&mut a, "clientlist").await;

    let body = r#"{"ip":"0.0.0.0","message":"anyone?","time":"--:--"}"#;
    send(&mut a, "chatmessage", serde_json::Value::String(body.into())).await;

    let quiet = timeout(Duration::from_millis(300), next_json(&mut a)).await;
    assert!(quiet.is_err(), "chat must not come back as servermsg");
}

#[tokio::test]
async fn chat_is_relayed_to_every_lobby_session() {
    let addr = hub("").await;
    let mut a = connect(addr, "/ws").await;
    let mut b = connect(addr, "/ws").await;
    next_with(&mut a, "clientlist").await;
    next_with(&mut b, "clientlist").await;

    let body = r#"{"ip":"0.0.0.0","message":"hello all","time":"--:--"}"#;
    send(&mut a, "chatmessage", serde_json::Value::String(body.into())).await;

    for ws in [&mut a, &mut b] {
        let v = next_with(ws, "servermsg").await;
        assert_eq!(v["payload"], "hello all");
    }
}

#[tokio::test]
async fn malformed_chat_is_skipped() {
    let addr = hub("").await;
    let mut a = connect(addr, "/ws").await;
    next_with(&mut a, "clientlist").await;

    send(&mut a, "chatmessage", serde_json::json!("not an object")).await;
    send(&mut a, "motd", serde_json::json!("unknown header")).await;

    let body = r#"{"ip":"0.0.0.0","message":"still here","time":"--:--"}"#;
    send(&mut a, "chatmessage", serde_json::Value::String(body.into())).await;

    let v = next_with(&mut a, "servermsg").await;
    assert_eq!(v["payload"], "still here");
}

#[tokio::test]
async fn toggle_is_broadcast_to_all_lights_sessions() {
    let addr = hub("").await;
    let mut a = connect(addr, "/lights/ws").await;
    let mut b = connect(addr, "/lights/ws").await;

    // both registered before the toggle goes out
    send(&mut a, "getCurrentToggle", serde_json::json!("---")).await;
    send(&mut b, "getCurrentToggle", serde_json::json!("---")).await;
    assert_eq!(next_with(&mut a, "toggle").await["payload"], "On");
    assert_eq!(next_with(&mut b, "toggle").await["payload"], "On");

    send(&mut a, "toggleLight", serde_json::json!("off")).await;
    assert_eq!(next_with(&mut a, "toggle").await["payload"], "Off");
    assert_eq!(next_with(&mut b, "toggle").await["payload"], "Off");
}

#[tokio::test]
async fn current_toggle_answers_only_the_requester() {
    let addr = hub("lights: { initial: \"Off\" }\n").await;
    let mut a = connect(addr, "/lights/ws").await;
    let mut b = connect(addr, "/lights/ws").await;

    send(&mut a, "getCurrentToggle", serde_json::json!("---")).await;
    assert_eq!(next_with(&mut a, "toggle").await["payload"], "Off");

    let quiet = timeout(Duration::from_millis(300), next_json(&mut b)).await;
    assert!(quiet.is_err(), "bystander must not receive the reply");
}

#[tokio::test]
async fn no_ping_right_after_connect() {
    let addr = hub("").await;
    let mut a = connect(addr, "/lights/ws").await;

    let first = timeout(Duration::from_millis(300), a.next()).await;
    assert!(first.is_err(), "nothing is sent before the first ping period");
}

#[tokio::test]
async fn bad_toggle_value_is_ignored() {
    let addr = hub("").await;
    let mut a = connect(addr, "/lights/ws").await;

    send(&mut a, "toggleLight", serde_json::json!("dim")).await;
    send(&mut a, "getCurrentToggle", serde_json::json!("---")).await;
    assert_eq!(next_with(&mut a, "toggle").await["payload"], "On");
}

#[tokio::test]
async fn undecodable_frame_closes_session() {
    let addr = hub("").await;
    let mut a = connect(addr, "/lights/ws").await;
    a.send(Message::Text("{not json".into())).await.unwrap();

    loop {
        match timeout(WAIT, a.next()).await.expect("timed out") {
            None | Some(Err(_)) | Some(Ok(Message::Close(_))) => break,
            Some(Ok(_)) => continue,
        }
    }
}

#[tokio::test]
async fn healthz_reports_ok() {
    let addr = hub("").await;
    let _lobby = connect(addr, "/ws").await;

    let mut tcp = TcpStream::connect(addr).await.unwrap();
    tcp.write_all(b"GET /healthz HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut resp = String::new();
    timeout(WAIT, tcp.read_to_string(&mut resp))
        .await
        .unwrap()
        .unwrap();

    assert!(resp.starts_with("HTTP/1.1 200"));
    assert!(resp.contains("ok lobby="));
}
