//! The transport seam: how the hub reaches one connection.
//!
//! Every observer is fed through a bounded queue. The hub only ever calls
//! [`mpsc::Sender::try_send`], so a stalled reader fills its own queue and
//! starts losing frames; it can never hold up the hub or a mutation running
//! on another thread.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Receiving half of an observer queue, drained by the transport.
pub type FrameReceiver = mpsc::Receiver<String>;

/// Errors reported when a frame cannot be queued for a connection.
///
/// Send failures are non-fatal to the hub. They are logged and counted; the
/// connection stays registered until the transport reports a disconnect.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SendError {
    /// The receiving half has been dropped.
    #[error("connection closed")]
    Closed,

    /// The queue is full; the frame was dropped.
    #[error("send rejected: {0}")]
    Rejected(String),
}

/// Outbound half of one observer connection.
#[derive(Debug, Clone)]
pub struct ObserverSink {
    tx: mpsc::Sender<String>,
}

impl ObserverSink {
    /// Create a sink and the receiver its frames arrive on.
    ///
    /// A `capacity` of zero is raised to one.
    pub fn channel(capacity: usize) -> (Self, FrameReceiver) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// Queue one serialized frame without waiting.
    pub fn send(&self, payload: &str) -> Result<(), SendError> {
        match self.tx.try_send(payload.to_owned()) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(SendError::Rejected(String::from(
                "outbound queue full",
            ))),
            Err(TrySendError::Closed(_)) => Err(SendError::Closed),
        }
    }
}
