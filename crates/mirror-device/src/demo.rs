//! Scripted demo conversation.
//!
//! Drives the mirror through a short voice-assistant exchange on a fixed
//! interval so a connected observer has something to render. The script
//! loops until the task is aborted.

use std::sync::Arc;
use std::time::Duration;

use mirror_core::StateMirror;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// One scripted display change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Set the status label.
    Status(&'static str),
    /// Switch the emotion icon.
    Emotion(&'static str),
    /// Append a transcript line.
    Message {
        /// Speaker role.
        role: &'static str,
        /// Line text.
        content: &'static str,
    },
    /// Show a transient notice.
    Notify {
        /// Notice text.
        text: &'static str,
        /// Display duration in milliseconds.
        duration_ms: i32,
    },
    /// Poll and publish the status bar.
    StatusBar,
    /// Empty the transcript.
    Clear,
}

impl Step {
    /// Apply this step to the mirror.
    pub fn apply(self, mirror: &StateMirror) {
        match self {
            Self::Status(text) => mirror.set_status(text),
            Self::Emotion(name) => mirror.set_emotion(name),
            Self::Message { role, content } => mirror.append_chat_message(role, content),
            Self::Notify { text, duration_ms } => mirror.show_notification(text, duration_ms),
            Self::StatusBar => mirror.update_status_bar(false),
            Self::Clear => mirror.clear_messages(),
        }
    }
}

/// The demo exchange, in order.
pub const SCRIPT: &[Step] = &[
    Step::Status("Listening"),
    Step::Emotion("neutral"),
    Step::Message {
        role: "user",
        content: "What's the weather like today?",
    },
    Step::Status("Thinking"),
    Step::Emotion("thinking"),
    Step::Message {
        role: "assistant",
        content: "Sunny with a high of 22 degrees.",
    },
    Step::Status("Speaking"),
    Step::Emotion("happy"),
    Step::Notify {
        text: "Reminder: meeting at 3pm",
        duration_ms: 3_000,
    },
    Step::StatusBar,
    Step::Status("Idle"),
    Step::Emotion("neutral"),
    Step::Clear,
];

/// Play [`SCRIPT`] forever, one step per `interval`.
pub async fn run(mirror: Arc<StateMirror>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    for step in SCRIPT.iter().copied().cycle() {
        ticker.tick().await;
        debug!(?step, "demo step");
        step.apply(&mirror);
    }
}
