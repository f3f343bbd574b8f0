//! Observer admission control and fan-out.
//!
//! The hub owns the live set of connected observers and knows nothing about
//! the display: it moves opaque, already-serialized frames to every admitted
//! connection. Capacity is fixed at construction; attempts beyond it are
//! rejected, never queued.
//!
//! # Locking
//!
//! The observer set sits behind one mutex that is held only while the set is
//! mutated or copied. Individual sends happen after the lock is released, and
//! every send is a non-blocking enqueue onto the observer's bounded queue
//! ([`ObserverSink`]). A stalled reader therefore only loses its own frames;
//! it cannot stall [`BroadcastHub::admit`], [`BroadcastHub::remove`], or a
//! broadcast, and removal is safe while a broadcast is in flight.

pub mod hub;
pub mod ids;
pub mod sink;

pub use hub::{Admission, BroadcastHub, Delivery, ObserverInfo, DEFAULT_CAPACITY};
pub use ids::ConnectionId;
pub use sink::{FrameReceiver, ObserverSink, SendError};
