//! The bounded observer set.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::ids::ConnectionId;
use crate::sink::ObserverSink;

/// Default maximum number of simultaneously admitted observers.
pub const DEFAULT_CAPACITY: usize = 3;

/// Outcome of an admission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The connection is registered and will receive broadcasts.
    Accepted,
    /// The hub was full; the connection was not registered.
    Rejected {
        /// Observers connected at the time of the attempt.
        connected: usize,
        /// Configured capacity.
        capacity: usize,
    },
}

impl Admission {
    /// Whether the connection was registered.
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Per-call delivery counts returned by [`BroadcastHub::broadcast`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Frames accepted by their sink.
    pub delivered: usize,
    /// Frames whose sink reported an error.
    pub failed: usize,
}

/// Public identity of an admitted observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ObserverInfo {
    /// Connection handle.
    pub id: ConnectionId,
    /// Wall-clock admission time.
    pub joined_at: DateTime<Utc>,
}

struct Observer {
    info: ObserverInfo,
    sink: ObserverSink,
}

/// Admission control plus fan-out over opaque frames.
pub struct BroadcastHub {
    capacity: usize,
    observers: Mutex<BTreeMap<ConnectionId, Observer>>,
}

impl BroadcastHub {
    /// Create an empty hub that admits at most `capacity` observers.
    pub const fn new(capacity: usize) -> Self {
        Self {
            capacity,
            observers: Mutex::new(BTreeMap::new()),
        }
    }

    /// Configured capacity.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of currently admitted observers.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no observer is connected.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Whether `id` is currently admitted.
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.lock().contains_key(&id)
    }

    /// Identities of all admitted observers, in join order.
    pub fn observers(&self) -> Vec<ObserverInfo> {
        self.lock().values().map(|o| o.info).collect()
    }

    /// Register a connection unless the hub is full.
    ///
    /// Rejection is silent: nothing is sent to the connection or to anyone
    /// else, and the caller is expected to close it. Admitting an id that is
    /// already registered swaps in the new sink and keeps the count.
    pub fn admit(&self, id: ConnectionId, sink: ObserverSink) -> Admission {
        let mut observers = self.lock();

        if let Some(existing) = observers.get_mut(&id) {
            existing.sink = sink;
            debug!(connection = %id, "observer re-admitted, sink replaced");
            return Admission::Accepted;
        }

        let connected = observers.len();
        if connected >= self.capacity {
            warn!(
                connection = %id,
                connected,
                capacity = self.capacity,
                "observer capacity reached, rejecting connection"
            );
            return Admission::Rejected {
                connected,
                capacity: self.capacity,
            };
        }

        let info = ObserverInfo {
            id,
            joined_at: Utc::now(),
        };
        observers.insert(id, Observer { info, sink });
        info!(connection = %id, total = observers.len(), "observer admitted");
        Admission::Accepted
    }

    /// Forget a connection. Unknown or already-removed ids are a no-op.
    ///
    /// Returns whether anything was removed.
    pub fn remove(&self, id: ConnectionId) -> bool {
        let mut observers = self.lock();
        let removed = observers.remove(&id).is_some();
        if removed {
            info!(connection = %id, total = observers.len(), "observer removed");
        }
        removed
    }

    /// Push one frame to every admitted observer.
    ///
    /// A failing sink does not stop delivery to the others and does not
    /// unregister the connection.
    pub fn broadcast(&self, payload: &str) -> Delivery {
        let targets: Vec<(ConnectionId, ObserverSink)> = self
            .lock()
            .iter()
            .map(|(id, o)| (*id, o.sink.clone()))
            .collect();

        let mut delivery = Delivery::default();
        for (id, sink) in &targets {
            if deliver(*id, sink, payload) {
                delivery.delivered = delivery.delivered.saturating_add(1);
            } else {
                delivery.failed = delivery.failed.saturating_add(1);
            }
        }

        debug!(
            delivered = delivery.delivered,
            failed = delivery.failed,
            bytes = payload.len(),
            "frame broadcast"
        );
        delivery
    }

    /// Push one frame to a single observer.
    ///
    /// Returns `false` when the id is unknown or its sink failed.
    pub fn send_to(&self, id: ConnectionId, payload: &str) -> bool {
        let sink = self.lock().get(&id).map(|o| o.sink.clone());
        match sink {
            Some(sink) => deliver(id, &sink, payload),
            None => {
                debug!(connection = %id, "send_to unknown observer ignored");
                false
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<ConnectionId, Observer>> {
        self.observers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl core::fmt::Debug for BroadcastHub {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BroadcastHub")
            .field("capacity", &self.capacity)
            .field("connected", &self.len())
            .finish()
    }
}

fn deliver(id: ConnectionId, sink: &ObserverSink, payload: &str) -> bool {
    match sink.send(payload) {
        Ok(()) => true,
        Err(e) => {
            warn!(connection = %id, error = %e, "failed to push frame to observer");
            false
        }
    }
}
