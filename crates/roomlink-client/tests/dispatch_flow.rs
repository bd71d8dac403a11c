//! Dispatcher behavior without a network: lifecycle, routing, isolation of
//! bad frames, and the outbound gate.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::{Arc, Mutex};

use roomlink_client::dispatch::{ConnState, Dispatched, Dispatcher};
use roomlink_client::feature::{LightsClient, LobbyClient};
use roomlink_client::model::ToggleState;
use roomlink_client::outbound::Outbound;
use roomlink_client::render::{ChannelView, LightColor, MemorySink, RosterView};
use roomlink_core::error::{ErrorCode, Result};
use roomlink_core::protocol::{decode, Header};

#[derive(Default)]
struct Wire {
    frames: Mutex<Vec<String>>,
}

impl Wire {
    fn sent(&self) -> Vec<(String, String)> {
        self.frames
            .lock()
            .unwrap()
            .iter()
            .map(|f| {
                let env = decode(f).unwrap();
                let payload = env.payload().raw_text().unwrap().to_string();
                (env.header, payload)
            })
            .collect()
    }
}

impl Outbound for Wire {
    fn send(&self, frame: String) -> Result<()> {
        self.frames.lock().unwrap().push(frame);
        Ok(())
    }
}

fn lobby() -> (Dispatcher<LobbyClient>, Arc<MemorySink>, Arc<Wire>) {
    let sink = Arc::new(MemorySink::new());
    let wire = Arc::new(Wire::default());
    let d = LobbyClient::new(sink.clone(), None).dispatcher(wire.clone(), sink.clone());
    (d, sink, wire)
}

fn lights() -> (Dispatcher<LightsClient>, Arc<MemorySink>, Arc<Wire>) {
    let sink = Arc::new(MemorySink::new());
    let wire = Arc::new(Wire::default());
    let d = LightsClient::new(sink.clone(), false).dispatcher(wire.clone(), sink.clone());
    (d, sink, wire)
}

#[test]
fn lifecycle_connecting_open_closed() {
    let (mut d, sink, _) = lobby();
    assert_eq!(d.state(), ConnState::Connecting);
    d.on_opened();
    assert_eq!(d.state(), ConnState::Open);
    d.on_closed();
    assert_eq!(d.state(), ConnState::Closed);
    assert!(sink.snapshot().actions_disabled);

    // closed is terminal
    d.on_opened();
    assert_eq!(d.state(), ConnState::Closed);
}

#[test]
fn error_before_open_closes() {
    let (mut d, sink, _) = lights();
    d.on_error("connect refused");
    assert_eq!(d.state(), ConnState::Closed);
    assert!(sink.snapshot().actions_disabled);
}

#[test]
fn roster_scenario_ranks_and_sorts() {
    let (mut d, sink, _) = lobby();
    d.on_opened();
    let out = d.on_data(
        r#"{"header":"clientlist","payload":[{"ChannelName":"b","Clients":["z","a"]},{"ChannelName":"a","Clients":["x"]}]}"#,
    );
    assert_eq!(out, Dispatched::Handled(Header::ClientList));
    assert_eq!(
        sink.snapshot().roster,
        Some(RosterView::Listing(vec![
            ChannelView {
                name: "b".into(),
                occupants: vec!["a".into(), "z".into()],
            },
            ChannelView {
                name: "a".into(),
                occupants: vec!["x".into()],
            },
        ]))
    );
}

#[test]
fn servermsg_is_appended_untrimmed() {
    let (mut d, _, _) = lobby();
    d.on_opened();
    d.on_data(r#"{"header":"servermsg","payload":"hello"}"#);
    d.on_data(r#"{"header":"servermsg","payload":" spaced "}"#);
    let texts: Vec<_> = d.feature().chat.transcript().map(|e| e.text.clone()).collect();
    assert_eq!(texts, ["hello", " spaced "]);
}

#[test]
fn unknown_header_changes_nothing() {
    let (mut d, sink, wire) = lobby();
    d.on_opened();
    let before = sink.snapshot();

    let out = d.on_data(r#"{"header":"motd","payload":"welcome"}"#);
    assert_eq!(out, Dispatched::UnknownHeader);

    let after = sink.snapshot();
    assert_eq!(after.roster, before.roster);
    assert_eq!(after.transcript, before.transcript);
    assert!(d.feature().chat.is_empty());
    assert!(d.feature().roster.view().is_none());
    assert!(wire.sent().is_empty());
}

#[test]
fn known_header_for_other_feature_is_unrouted() {
    let (mut d, _, _) = lobby();
    d.on_opened();
    assert_eq!(
        d.on_data(r#"{"header":"toggle","payload":"On"}"#),
        Dispatched::Unrouted(Header::Toggle)
    );
}

#[test]
fn malformed_frames_are_isolated() {
    let (mut d, _, _) = lobby();
    d.on_opened();
    assert_eq!(d.on_data("{not json"), Dispatched::Dropped(ErrorCode::Decode));
    assert_eq!(
        d.on_data(r#"{"payload":"x"}"#),
        Dispatched::Dropped(ErrorCode::Decode)
    );
    // the connection keeps working afterwards
    assert_eq!(
        d.on_data(r#"{"header":"servermsg","payload":"still here"}"#),
        Dispatched::Handled(Header::ServerMsg)
    );
    assert_eq!(d.state(), ConnState::Open);
}

#[test]
fn frames_outside_open_are_inactive() {
    let (mut d, _, _) = lobby();
    assert_eq!(
        d.on_data(r#"{"header":"servermsg","payload":"early"}"#),
        Dispatched::Inactive
    );
    d.on_opened();
    d.on_closed();
    assert_eq!(
        d.on_data(r#"{"header":"servermsg","payload":"late"}"#),
        Dispatched::Inactive
    );
    assert!(d.feature().chat.is_empty());
}

#[test]
fn roster_payload_states() {
    let (mut d, sink, _) = lobby();
    d.on_opened();

    d.on_data(r#"{"header":"clientlist"}"#);
    assert_eq!(sink.snapshot().roster, Some(RosterView::Error));

    d.on_data(r#"{"header":"clientlist","payload":null}"#);
    assert_eq!(sink.snapshot().roster, Some(RosterView::EmptyNotice));

    d.on_data(r#"{"header":"clientlist","payload":[]}"#);
    assert_eq!(sink.snapshot().roster, Some(RosterView::Listing(vec![])));

    assert_eq!(
        d.on_data(r#"{"header":"clientlist","payload":{"ChannelName":"a"}}"#),
        Dispatched::Dropped(ErrorCode::Shape)
    );
    assert_eq!(sink.snapshot().roster, Some(RosterView::Error));
}

#[test]
fn chat_submission_goes_out_as_chatmessage() {
    let (mut d, sink, wire) = lobby();
    d.on_opened();

    d.act(|c| c.submit_chat("   ")).unwrap();
    assert!(wire.sent().is_empty());

    d.act(|c| c.submit_chat("hi")).unwrap();
    let sent = wire.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "chatmessage");

    let body: serde_json::Value =
        serde_json::from_str(&serde_json::from_str::<String>(&sent[0].1).unwrap()).unwrap();
    assert_eq!(body["message"], "hi");
    assert!(body["ip"].is_string());
    assert!(body["time"].is_string());

    assert_eq!(sink.snapshot().transcript, ["hi"]);
}

#[test]
fn lights_open_requests_current_state() {
    let (mut d, sink, wire) = lights();
    d.on_opened();
    assert_eq!(
        wire.sent(),
        [("getCurrentToggle".to_string(), "\"---\"".to_string())]
    );
    // the unknown state is drawn right away
    assert_eq!(sink.snapshot().toggle.unwrap().background, LightColor::Black);
}

#[test]
fn local_toggle_from_on() {
    let (mut d, sink, wire) = lights();
    d.on_opened();
    d.on_data(r#"{"header":"toggle","payload":"On"}"#);
    assert_eq!(sink.snapshot().toggle.unwrap().background, LightColor::Green);

    d.act(|c| c.click()).unwrap();

    let view = sink.snapshot().toggle.unwrap();
    assert_eq!(view.label, "Off");
    let toggles: Vec<_> = wire
        .sent()
        .into_iter()
        .filter(|(h, _)| h == "toggleLight")
        .collect();
    assert_eq!(toggles, [("toggleLight".to_string(), "\"Off\"".to_string())]);
}

#[test]
fn server_toggle_off_renders_black() {
    let (mut d, sink, _) = lights();
    d.on_opened();
    d.on_data(r#"{"header":"toggle","payload":"Off"}"#);
    let view = sink.snapshot().toggle.unwrap();
    assert_eq!(view.label, "Off");
    assert_eq!(view.background, LightColor::Black);
    assert_eq!(d.feature().toggle.state(), &ToggleState::Off);
}

#[test]
fn bad_toggle_payload_keeps_stale_value() {
    let (mut d, _, _) = lights();
    d.on_opened();
    d.on_data(r#"{"header":"toggle","payload":"On"}"#);
    assert_eq!(
        d.on_data(r#"{"header":"toggle"}"#),
        Dispatched::Dropped(ErrorCode::Shape)
    );
    assert_eq!(d.feature().toggle.state(), &ToggleState::On);
}

#[test]
fn actions_are_gated_on_connection_state() {
    let (mut d, _, wire) = lights();

    let err = d.act(|c| c.click()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotOpen);

    d.on_opened();
    d.on_closed();
    let err = d.act(|c| c.click()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::ConnectionClosed);

    // neither rejected click changed the model or reached the wire
    assert_eq!(d.feature().toggle.state(), &ToggleState::Unknown);
    assert_eq!(wire.sent().len(), 1); // only getCurrentToggle
}
