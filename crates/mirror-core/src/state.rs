//! The canonical display state.
//!
//! [`DisplayState`] wraps the observable [`DisplaySnapshot`] with the
//! bookkeeping that never crosses the wire: the transcript bound and the
//! most recent notification with its expiry.

use std::time::{Duration, Instant};

use mirror_types::{BatteryStatus, ChatEntry, DisplaySnapshot, StateField};

/// Default transcript bound.
pub const DEFAULT_MAX_MESSAGES: usize = 40;

/// The most recent transient notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Notice text.
    pub text: String,
    /// Requested display time, negative requests clamped to zero.
    pub duration_ms: u32,
    /// Monotonic time at which observers are expected to hide it.
    ///
    /// Informational only; nothing clears the notice when it passes.
    pub expires_at: Instant,
}

impl Notification {
    /// A notice shown at `now` for `duration_ms`.
    pub fn new(text: impl Into<String>, duration_ms: u32, now: Instant) -> Self {
        let expires_at = now
            .checked_add(Duration::from_millis(u64::from(duration_ms)))
            .unwrap_or(now);
        Self {
            text: text.into(),
            duration_ms,
            expires_at,
        }
    }

    /// Whether the expiry has passed at `now`.
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// What the display shows, plus the mirror's private bookkeeping.
#[derive(Debug, Clone)]
pub struct DisplayState {
    snapshot: DisplaySnapshot,
    notification: Option<Notification>,
    max_messages: usize,
}

impl DisplayState {
    /// Power-on state. A zero bound is raised to one.
    pub fn new(theme: impl Into<String>, max_messages: usize) -> Self {
        Self {
            snapshot: DisplaySnapshot::with_theme(theme),
            notification: None,
            max_messages: max_messages.max(1),
        }
    }

    /// The observable part of the state.
    pub const fn snapshot(&self) -> &DisplaySnapshot {
        &self.snapshot
    }

    /// The most recent notification, if any was ever shown.
    pub const fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// Transcript bound.
    pub const fn max_messages(&self) -> usize {
        self.max_messages
    }

    /// Overwrite one scalar field.
    pub fn set_field(&mut self, field: StateField, value: &str) {
        let slot = match field {
            StateField::Status => &mut self.snapshot.status,
            StateField::Emotion => &mut self.snapshot.emotion,
            StateField::Theme => &mut self.snapshot.theme,
        };
        value.clone_into(slot);
    }

    /// Append to the transcript, evicting the oldest entries past the bound.
    pub fn push_message(&mut self, entry: ChatEntry) {
        let messages = &mut self.snapshot.messages;
        messages.push(entry);
        let excess = messages.len().saturating_sub(self.max_messages);
        if excess > 0 {
            messages.drain(..excess);
        }
    }

    /// Empty the transcript.
    pub fn clear_messages(&mut self) {
        self.snapshot.messages.clear();
    }

    /// Replace the current notification.
    pub fn set_notification(&mut self, notification: Notification) {
        self.notification = Some(notification);
    }

    /// Cache the latest status-bar readings.
    pub fn set_status_bar(&mut self, battery: BatteryStatus, network: String, volume: i32) {
        self.snapshot.battery = battery;
        self.snapshot.network = network;
        self.snapshot.volume = volume;
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new("dark", DEFAULT_MAX_MESSAGES)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn contents(state: &DisplayState) -> Vec<String> {
        state
            .snapshot()
            .messages
            .iter()
            .map(|m| m.content.clone())
            .collect()
    }

    #[test]
    fn transcript_is_a_bounded_fifo() {
        let mut state = DisplayState::new("dark", 3);
        for i in 0..7 {
            state.push_message(ChatEntry::new("user", format!("m{i}")));
            assert!(state.snapshot().messages.len() <= 3);
        }
        assert_eq!(contents(&state), ["m4", "m5", "m6"]);
    }

    #[test]
    fn zero_bound_keeps_latest_message() {
        let mut state = DisplayState::new("dark", 0);
        state.push_message(ChatEntry::new("user", "a"));
        state.push_message(ChatEntry::new("user", "b"));
        assert_eq!(state.max_messages(), 1);
        assert_eq!(contents(&state), ["b"]);
    }

    #[test]
    fn clear_then_append() {
        let mut state = DisplayState::default();
        state.push_message(ChatEntry::new("user", "a"));
        state.clear_messages();
        assert!(state.snapshot().messages.is_empty());
        state.push_message(ChatEntry::new("assistant", "b"));
        assert_eq!(contents(&state), ["b"]);
    }

    #[test]
    fn scalar_fields_last_write_wins() {
        let mut state = DisplayState::default();
        state.set_field(StateField::Status, "Listening");
        state.set_field(StateField::Status, "Speaking");
        state.set_field(StateField::Theme, "light");
        assert_eq!(state.snapshot().status, "Speaking");
        assert_eq!(state.snapshot().theme, "light");
        assert_eq!(state.snapshot().emotion, "neutral");
    }

    #[test]
    fn newer_notification_supersedes() {
        let now = Instant::now();
        let mut state = DisplayState::default();
        state.set_notification(Notification::new("first", 1000, now));
        state.set_notification(Notification::new("second", 0, now));

        let current = state.notification().unwrap();
        assert_eq!(current.text, "second");
        assert!(current.is_expired(now));
    }

    #[test]
    fn notification_expiry_is_now_plus_duration() {
        let now = Instant::now();
        let n = Notification::new("hello", 3000, now);
        assert_eq!(n.expires_at.duration_since(now), Duration::from_millis(3000));
        assert!(!n.is_expired(now));
    }
}
