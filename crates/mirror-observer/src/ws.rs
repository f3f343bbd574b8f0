//! `WebSocket` handler for the display push channel.
//!
//! Clients connect to `GET /ws/display`. Once upgraded the socket is attached
//! to the mirror: it first receives a `full_state` frame, then every display
//! event as it happens. When the hub is full, the socket is closed with code
//! 1013 (try again later) and no frame is sent.
//!
//! Inbound frames carry no commands. Text and binary payloads are logged and
//! dropped. A heartbeat pings the client periodically and drops it after a
//! period of silence, which reaps stalled connections.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::ws::{close_code, CloseFrame, Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use mirror_hub::{Admission, ConnectionId, ObserverSink};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::state::AppState;

/// Frames buffered per connection before new ones are refused.
pub const OUTBOUND_CAPACITY: usize = 256;

/// Interval between server pings.
pub const PING_INTERVAL: Duration = Duration::from_secs(20);

/// Silence after which a connection is considered dead.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Tracks when a connection was last heard from.
#[derive(Debug, Clone, Copy)]
struct Liveness {
    last_seen: Instant,
}

impl Liveness {
    const fn new(now: Instant) -> Self {
        Self { last_seen: now }
    }

    const fn touch(&mut self, now: Instant) {
        self.last_seen = now;
    }

    fn is_idle(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_seen) > IDLE_TIMEOUT
    }
}

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming display events.
///
/// # Route
///
/// `GET /ws/display`
pub async fn ws_display(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Handle the `WebSocket` lifecycle: attach, drain the outbound queue into
/// the socket, and detach on close.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    let id = ConnectionId::new();
    let (sink, mut rx) = ObserverSink::channel(OUTBOUND_CAPACITY);

    if let Admission::Rejected {
        connected,
        capacity,
    } = state.mirror.attach(id, sink)
    {
        debug!(connection = %id, connected, capacity, "closing rejected WebSocket");
        let close = Message::Close(Some(CloseFrame {
            code: close_code::AGAIN,
            reason: "observer capacity reached".into(),
        }));
        if socket.send(close).await.is_err() {
            debug!(connection = %id, "rejected client already gone");
        }
        return;
    }

    info!(connection = %id, "WebSocket observer connected");

    let mut heartbeat = tokio::time::interval(PING_INTERVAL);
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
    heartbeat.tick().await;
    let mut liveness = Liveness::new(Instant::now());

    loop {
        tokio::select! {
            // Forward a frame queued by the hub.
            frame = rx.recv() => {
                let Some(frame) = frame else {
                    debug!(connection = %id, "outbound queue closed");
                    break;
                };
                if socket.send(Message::Text(frame.into())).await.is_err() {
                    debug!(connection = %id, "WebSocket client disconnected (send failed)");
                    break;
                }
            }
            // Check if the client sent a close frame or disconnected.
            msg = socket.recv() => {
                liveness.touch(Instant::now());
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(connection = %id, "WebSocket client disconnected");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!(connection = %id, "WebSocket client disconnected (pong failed)");
                            break;
                        }
                    }
                    Some(Ok(Message::Text(text))) => {
                        debug!(connection = %id, len = text.len(), "ignoring inbound text frame");
                    }
                    Some(Ok(Message::Binary(data))) => {
                        debug!(connection = %id, len = data.len(), "ignoring inbound binary frame");
                    }
                    Some(Ok(Message::Pong(_))) => {}
                    Some(Err(e)) => {
                        debug!(connection = %id, "WebSocket error: {e}");
                        break;
                    }
                }
            }
            // Keep the connection honest.
            _ = heartbeat.tick() => {
                if liveness.is_idle(Instant::now()) {
                    debug!(connection = %id, "WebSocket client idle, dropping");
                    break;
                }
                if socket.send(Message::Ping(Bytes::new())).await.is_err() {
                    debug!(connection = %id, "WebSocket client disconnected (ping failed)");
                    break;
                }
            }
        }
    }

    state.mirror.detach(id);
    info!(connection = %id, "WebSocket observer detached");
}
