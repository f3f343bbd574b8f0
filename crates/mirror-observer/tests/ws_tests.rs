//! End-to-end tests for the `/ws/display` push channel.
//!
//! Each test serves the router on an ephemeral local port and talks to it
//! with a real `WebSocket` client.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use mirror_core::{MirrorSettings, StateMirror};
use mirror_observer::router::build_router;
use mirror_observer::state::AppState;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const WAIT: Duration = Duration::from_secs(5);

async fn serve(max_observers: usize) -> (Arc<AppState>, String) {
    let mirror = Arc::new(StateMirror::new(&MirrorSettings {
        max_observers,
        ..MirrorSettings::default()
    }));
    let state = Arc::new(AppState::new(mirror));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = build_router(Arc::clone(&state));
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (state, format!("ws://{addr}/ws/display"))
}

async fn connect(url: &str) -> Client {
    let (client, _response) = connect_async(url).await.unwrap();
    client
}

/// Next data frame as JSON, skipping control frames.
async fn next_json(client: &mut Client) -> Value {
    loop {
        let msg = timeout(WAIT, client.next()).await.unwrap().unwrap().unwrap();
        match msg {
            Message::Text(text) => return serde_json::from_str(text.as_str()).unwrap(),
            Message::Ping(_) | Message::Pong(_) => {}
            other => panic!("expected a text frame, got {other:?}"),
        }
    }
}

async fn wait_for_observers(state: &AppState, expected: usize) {
    timeout(WAIT, async {
        while state.mirror.hub().len() != expected {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn first_frame_is_full_state_then_deltas() {
    let (state, url) = serve(3).await;
    state.mirror.set_theme("light");

    let mut client = connect(&url).await;
    let first = next_json(&mut client).await;
    assert_eq!(first["type"], "full_state");
    assert_eq!(first["data"]["theme"], "light");

    state.mirror.set_status("Listening");
    let delta = next_json(&mut client).await;
    assert_eq!(delta["type"], "state_update");
    assert_eq!(delta["field"], "status");
    assert_eq!(delta["value"], "Listening");
}

#[tokio::test]
async fn every_observer_receives_each_event() {
    let (state, url) = serve(3).await;

    let mut a = connect(&url).await;
    let mut b = connect(&url).await;
    assert_eq!(next_json(&mut a).await["type"], "full_state");
    assert_eq!(next_json(&mut b).await["type"], "full_state");

    state.mirror.append_chat_message("assistant", "hello");
    for client in [&mut a, &mut b] {
        let frame = next_json(client).await;
        assert_eq!(frame["type"], "chat_message");
        assert_eq!(frame["role"], "assistant");
        assert_eq!(frame["content"], "hello");
    }
}

#[tokio::test]
async fn over_capacity_is_closed_with_try_again_later() {
    let (state, url) = serve(1).await;

    let mut admitted = connect(&url).await;
    assert_eq!(next_json(&mut admitted).await["type"], "full_state");

    let mut rejected = connect(&url).await;
    let msg = timeout(WAIT, rejected.next()).await.unwrap().unwrap().unwrap();
    let Message::Close(Some(frame)) = msg else {
        panic!("expected a close frame, got {msg:?}");
    };
    assert_eq!(u16::from(frame.code), 1013);
    assert_eq!(state.mirror.hub().len(), 1);

    // The admitted observer is unaffected.
    state.mirror.clear_messages();
    assert_eq!(next_json(&mut admitted).await["type"], "clear_messages");
}

#[tokio::test]
async fn inbound_frames_are_ignored() {
    let (state, url) = serve(3).await;

    let mut client = connect(&url).await;
    next_json(&mut client).await;

    client
        .send(Message::Text("{\"type\":\"set_status\",\"value\":\"hacked\"}".into()))
        .await
        .unwrap();
    state.mirror.set_emotion("happy");

    let frame = next_json(&mut client).await;
    assert_eq!(frame["field"], "emotion");
    assert_eq!(state.mirror.snapshot().status, "Idle");
}

#[tokio::test]
async fn closing_the_socket_frees_the_slot() {
    let (state, url) = serve(1).await;

    let mut client = connect(&url).await;
    next_json(&mut client).await;
    assert_eq!(state.mirror.hub().len(), 1);

    client.close(None).await.unwrap();
    wait_for_observers(&state, 0).await;

    let mut next = connect(&url).await;
    assert_eq!(next_json(&mut next).await["type"], "full_state");
}
