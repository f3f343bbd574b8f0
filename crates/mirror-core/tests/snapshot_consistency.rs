//! Snapshot consistency under concurrent mutation and admission.
//!
//! Every observer must be able to rebuild the final display state from its
//! own stream: one `full_state` followed by exactly the deltas committed
//! after it. A duplicated or missing delta shows up as a divergent replay.

#![allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic,
    clippy::arithmetic_side_effects
)]

use std::sync::Arc;
use std::thread;

use mirror_core::{MirrorSettings, StateMirror};
use mirror_hub::{ConnectionId, FrameReceiver, ObserverSink};
use mirror_types::{DisplaySnapshot, WireEvent};

/// Large enough that no test below ever fills a queue.
const QUEUE: usize = 4_096;

fn events(rx: &mut FrameReceiver) -> Vec<WireEvent> {
    let mut out = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        out.push(WireEvent::from_json(&frame).unwrap());
    }
    out
}

fn replay(events: &[WireEvent], max_messages: usize) -> DisplaySnapshot {
    let Some(WireEvent::FullState { data }) = events.first() else {
        panic!("stream must start with full_state, got {:?}", events.first());
    };
    let mut snap = data.clone();
    for event in &events[1..] {
        assert_ne!(event.kind(), "full_state", "snapshot must never be rebroadcast");
        snap.apply(event, max_messages);
    }
    snap
}

fn mirror(max_messages: usize, max_observers: usize) -> Arc<StateMirror> {
    Arc::new(StateMirror::new(&MirrorSettings {
        max_messages,
        max_observers,
        default_theme: String::from("dark"),
    }))
}

#[test]
fn every_observer_replays_to_the_final_state() {
    let mirror = mirror(5, 16);

    let writers: Vec<_> = (0..4)
        .map(|w| {
            let mirror = Arc::clone(&mirror);
            thread::spawn(move || {
                for i in 0..250 {
                    match i % 7 {
                        0 => mirror.set_status(&format!("w{w}-{i}")),
                        1 => mirror.set_emotion("thinking"),
                        2 => mirror.update_status_bar(false),
                        3 if i % 50 == 3 => mirror.clear_messages(),
                        4 => mirror.show_notification("ping", 100),
                        _ => mirror.append_chat_message("user", &format!("w{w}-{i}")),
                    }
                }
            })
        })
        .collect();

    let attacher = {
        let mirror = Arc::clone(&mirror);
        thread::spawn(move || {
            (0..16)
                .map(|_| {
                    let (sink, rx) = ObserverSink::channel(QUEUE);
                    assert!(mirror.attach(ConnectionId::new(), sink).is_accepted());
                    thread::yield_now();
                    rx
                })
                .collect::<Vec<_>>()
        })
    };

    for writer in writers {
        writer.join().unwrap();
    }
    let mut receivers = attacher.join().unwrap();

    let final_state = mirror.snapshot();
    for rx in &mut receivers {
        let events = events(rx);
        assert_eq!(replay(&events, mirror.max_messages()), final_state);
    }
}

#[test]
fn snapshot_is_never_torn() {
    let mirror = mirror(3, 64);

    let writer = {
        let mirror = Arc::clone(&mirror);
        thread::spawn(move || {
            for i in 0..500 {
                mirror.append_chat_message("assistant", &format!("{i}"));
            }
        })
    };

    let mut seen = Vec::new();
    for _ in 0..64 {
        let (sink, rx) = ObserverSink::channel(QUEUE);
        mirror.attach(ConnectionId::new(), sink);
        seen.push(rx);
    }
    writer.join().unwrap();

    for rx in &mut seen {
        let WireEvent::FullState { data } = &events(rx)[0] else {
            panic!("expected full_state");
        };
        assert!(data.messages.len() <= 3);

        // Retained messages are consecutive, oldest first.
        let numbers: Vec<u32> = data
            .messages
            .iter()
            .map(|m| m.content.parse().unwrap())
            .collect();
        for pair in numbers.windows(2) {
            assert_eq!(pair[1], pair[0] + 1);
        }
    }
}

#[test]
fn sequential_mutations_arrive_in_call_order() {
    let mirror = mirror(40, 3);
    let (sink, mut rx) = ObserverSink::channel(QUEUE);
    mirror.attach(ConnectionId::new(), sink);

    mirror.set_status("Listening");
    mirror.append_chat_message("user", "hello");
    mirror.set_status("Speaking");
    mirror.clear_messages();

    let kinds: Vec<&str> = events(&mut rx).iter().map(WireEvent::kind).collect();
    assert_eq!(
        kinds,
        ["full_state", "state_update", "chat_message", "state_update", "clear_messages"]
    );
}

#[test]
fn removal_never_goes_below_zero() {
    let mirror = mirror(40, 3);
    let id = ConnectionId::new();
    mirror.attach(id, ObserverSink::channel(1).0);

    assert!(mirror.detach(id));
    assert!(!mirror.detach(id));
    assert!(!mirror.detach(ConnectionId::new()));
    assert_eq!(mirror.hub().len(), 0);
}
