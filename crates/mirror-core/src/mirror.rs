//! The interception decorator over a physical display.
//!
//! Each mutation runs three independent steps:
//!
//! 1. forward to the [`DisplayBackend`], if one is configured;
//! 2. fold the change into [`DisplayState`] under the state lock;
//! 3. broadcast exactly one [`WireEvent`] through the hub.
//!
//! A backend failure is logged and steps 2 and 3 proceed regardless. The
//! state lock is released before fan-out begins.
//!
//! A separate publish lock orders "commit + broadcast" against
//! "admit + snapshot + send". An observer therefore either sees a mutation
//! in its `full_state` or receives its delta afterwards, never both and
//! never neither. Every send is a non-blocking enqueue onto the observer's
//! bounded queue, so the publish lock never waits on a reader, and snapshot
//! reads take the state lock alone.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use mirror_hub::{Admission, BroadcastHub, ConnectionId, ObserverSink};
use mirror_types::{ChatEntry, DisplaySnapshot, StateField, WireEvent};
use tracing::{debug, error, warn};

use crate::backend::{BackendError, DeviceStatus, DisplayBackend, UnknownDeviceStatus};
use crate::config::MirrorSettings;
use crate::error::MirrorError;
use crate::state::{DisplayState, Notification};

/// Canonical mirror of what the display shows.
pub struct StateMirror {
    backend: Option<Arc<dyn DisplayBackend>>,
    device: Arc<dyn DeviceStatus>,
    state: Mutex<DisplayState>,
    publish: Mutex<()>,
    hub: Arc<BroadcastHub>,
}

impl StateMirror {
    /// Create a mirror with its own hub sized from `settings`.
    pub fn new(settings: &MirrorSettings) -> Self {
        Self::with_hub(Arc::new(BroadcastHub::new(settings.max_observers)), settings)
    }

    /// Create a mirror publishing through an existing hub.
    pub fn with_hub(hub: Arc<BroadcastHub>, settings: &MirrorSettings) -> Self {
        Self {
            backend: None,
            device: Arc::new(UnknownDeviceStatus),
            state: Mutex::new(DisplayState::new(
                settings.default_theme.as_str(),
                settings.max_messages,
            )),
            publish: Mutex::new(()),
            hub,
        }
    }

    /// Forward every mutation to `backend` first.
    ///
    /// A theme reported by the backend replaces the configured default.
    #[must_use]
    pub fn with_backend(mut self, backend: Arc<dyn DisplayBackend>) -> Self {
        if let Some(theme) = backend.theme() {
            self.state
                .get_mut()
                .unwrap_or_else(PoisonError::into_inner)
                .set_field(StateField::Theme, &theme);
        }
        self.backend = Some(backend);
        self
    }

    /// Poll `device` on every status-bar refresh.
    #[must_use]
    pub fn with_device_status(mut self, device: Arc<dyn DeviceStatus>) -> Self {
        self.device = device;
        self
    }

    /// The hub observers are attached to.
    pub const fn hub(&self) -> &Arc<BroadcastHub> {
        &self.hub
    }

    /// Transcript bound.
    pub fn max_messages(&self) -> usize {
        self.lock_state().max_messages()
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Update the status label.
    pub fn set_status(&self, text: &str) {
        self.forward("set_status", |b| b.set_status(text));
        self.commit_field(StateField::Status, text);
    }

    /// Update the emotion identifier. Unknown names pass through unchanged.
    pub fn set_emotion(&self, name: &str) {
        self.forward("set_emotion", |b| b.set_emotion(name));
        self.commit_field(StateField::Emotion, name);
    }

    /// Update the theme name.
    pub fn set_theme(&self, name: &str) {
        self.forward("set_theme", |b| b.set_theme(name));
        self.commit_field(StateField::Theme, name);
    }

    /// Append one chat line.
    ///
    /// The backend sees the line before the mirror trims its own history.
    pub fn append_chat_message(&self, role: &str, content: &str) {
        self.forward("append_message", |b| b.append_message(role, content));
        self.commit(|state| {
            state.push_message(ChatEntry::new(role, content));
            WireEvent::ChatMessage {
                role: role.to_owned(),
                content: content.to_owned(),
            }
        });
    }

    /// Empty the chat transcript.
    pub fn clear_messages(&self) {
        self.forward("clear_messages", |b| b.clear_messages());
        self.commit(|state| {
            state.clear_messages();
            WireEvent::ClearMessages
        });
    }

    /// Show a transient notice, replacing any previous one.
    ///
    /// A negative duration is mirrored as zero (expires immediately). The
    /// backend receives the caller's value untouched.
    pub fn show_notification(&self, text: &str, duration_ms: i32) {
        self.forward("show_notification", |b| b.show_notification(text, duration_ms));

        let duration = u32::try_from(duration_ms).unwrap_or_else(|_| {
            debug!(duration_ms, "negative notification duration mirrored as 0");
            0
        });
        let now = Instant::now();
        self.commit(|state| {
            state.set_notification(Notification::new(text, duration, now));
            WireEvent::Notification {
                message: text.to_owned(),
                duration,
            }
        });
    }

    /// Refresh battery, network, and volume from the device and publish
    /// them as one `status_bar` event.
    pub fn update_status_bar(&self, update_all: bool) {
        self.forward("update_status_bar", |b| b.update_status_bar(update_all));

        let battery = self.device.battery();
        let network = self.device.network();
        let volume = self.device.volume();
        self.commit(|state| {
            state.set_status_bar(battery, network.clone(), volume);
            WireEvent::StatusBar {
                battery,
                network,
                volume,
            }
        });
    }

    /// Pass-through to the panel; power saving is not mirrored.
    pub fn set_power_save_mode(&self, on: bool) {
        self.forward("set_power_save_mode", |b| b.set_power_save_mode(on));
    }

    /// Pass-through to the panel; widget setup is not mirrored.
    pub fn setup_ui(&self) {
        self.forward("setup_ui", |b| b.setup_ui());
    }

    /// Take the panel's drawing lock.
    ///
    /// Without a backend there is nothing to lock and this succeeds. A
    /// backend error counts as not acquired.
    pub fn lock_panel(&self, timeout: Duration) -> bool {
        let Some(backend) = &self.backend else {
            return true;
        };
        match backend.lock_panel(timeout) {
            Ok(acquired) => acquired,
            Err(e) => {
                warn!(op = "lock_panel", error = %e, "display backend call failed");
                false
            }
        }
    }

    /// Release the panel's drawing lock.
    pub fn unlock_panel(&self) {
        self.forward("unlock_panel", |b| b.unlock_panel());
    }

    // -----------------------------------------------------------------------
    // Snapshots
    // -----------------------------------------------------------------------

    /// Copy of the observable state.
    pub fn snapshot(&self) -> DisplaySnapshot {
        self.lock_state().snapshot().clone()
    }

    /// Theme currently mirrored.
    pub fn theme(&self) -> String {
        self.lock_state().snapshot().theme.clone()
    }

    /// The most recent notification, with its expiry.
    pub fn notification(&self) -> Option<Notification> {
        self.lock_state().notification().cloned()
    }

    /// `full_state` event for the current state.
    pub fn snapshot_event(&self) -> WireEvent {
        WireEvent::FullState {
            data: self.snapshot(),
        }
    }

    /// [`snapshot_event`](Self::snapshot_event) serialized to a frame.
    pub fn snapshot_frame(&self) -> Result<String, MirrorError> {
        Ok(self.snapshot_event().to_json()?)
    }

    // -----------------------------------------------------------------------
    // Observer lifecycle
    // -----------------------------------------------------------------------

    /// Admit a connection and push it the current snapshot.
    ///
    /// The snapshot is the first frame the connection receives; deltas
    /// published afterwards follow it. Rejected connections receive nothing.
    pub fn attach(&self, id: ConnectionId, sink: ObserverSink) -> Admission {
        let _order = lock(&self.publish);

        let admission = self.hub.admit(id, sink);
        if !admission.is_accepted() {
            return admission;
        }

        match self.snapshot_frame() {
            Ok(frame) => {
                if !self.hub.send_to(id, &frame) {
                    warn!(connection = %id, "initial snapshot not delivered");
                }
            }
            Err(e) => error!(connection = %id, error = %e, "failed to serialize snapshot"),
        }
        admission
    }

    /// Remove a connection. Safe to call repeatedly and at any time.
    pub fn detach(&self, id: ConnectionId) -> bool {
        self.hub.remove(id)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn forward<F>(&self, op: &'static str, call: F)
    where
        F: FnOnce(&dyn DisplayBackend) -> Result<(), BackendError>,
    {
        if let Some(backend) = &self.backend {
            if let Err(e) = call(backend.as_ref()) {
                warn!(op, error = %e, "display backend call failed, mirroring anyway");
            }
        }
    }

    fn commit_field(&self, field: StateField, value: &str) {
        self.commit(|state| {
            state.set_field(field, value);
            WireEvent::StateUpdate {
                field,
                value: value.to_owned(),
            }
        });
    }

    fn commit<F>(&self, mutate: F)
    where
        F: FnOnce(&mut DisplayState) -> WireEvent,
    {
        let _order = lock(&self.publish);

        let (kind, frame) = {
            let mut state = self.lock_state();
            let event = mutate(&mut state);
            (event.kind(), event.to_json())
        };

        match frame {
            Ok(frame) => {
                let delivery = self.hub.broadcast(&frame);
                debug!(
                    event = kind,
                    delivered = delivery.delivered,
                    failed = delivery.failed,
                    "display event published"
                );
            }
            Err(e) => error!(event = kind, error = %e, "failed to serialize display event"),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, DisplayState> {
        lock(&self.state)
    }
}

impl core::fmt::Debug for StateMirror {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StateMirror")
            .field("backend", &self.backend.is_some())
            .field("hub", &self.hub)
            .finish_non_exhaustive()
    }
}

/// The mirror is itself a display, so it drops into any call path that
/// expects one.
impl DisplayBackend for StateMirror {
    fn set_status(&self, status: &str) -> Result<(), BackendError> {
        Self::set_status(self, status);
        Ok(())
    }

    fn set_emotion(&self, emotion: &str) -> Result<(), BackendError> {
        Self::set_emotion(self, emotion);
        Ok(())
    }

    fn set_theme(&self, theme: &str) -> Result<(), BackendError> {
        Self::set_theme(self, theme);
        Ok(())
    }

    fn append_message(&self, role: &str, content: &str) -> Result<(), BackendError> {
        self.append_chat_message(role, content);
        Ok(())
    }

    fn clear_messages(&self) -> Result<(), BackendError> {
        Self::clear_messages(self);
        Ok(())
    }

    fn show_notification(&self, text: &str, duration_ms: i32) -> Result<(), BackendError> {
        Self::show_notification(self, text, duration_ms);
        Ok(())
    }

    fn update_status_bar(&self, update_all: bool) -> Result<(), BackendError> {
        Self::update_status_bar(self, update_all);
        Ok(())
    }

    fn set_power_save_mode(&self, on: bool) -> Result<(), BackendError> {
        Self::set_power_save_mode(self, on);
        Ok(())
    }

    fn setup_ui(&self) -> Result<(), BackendError> {
        Self::setup_ui(self);
        Ok(())
    }

    fn lock_panel(&self, timeout: Duration) -> Result<bool, BackendError> {
        Ok(Self::lock_panel(self, timeout))
    }

    fn unlock_panel(&self) -> Result<(), BackendError> {
        Self::unlock_panel(self);
        Ok(())
    }

    fn theme(&self) -> Option<String> {
        Some(Self::theme(self))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
