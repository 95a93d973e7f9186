//! Event types for the TMB event system
//!
//! Artifact loads complete in no particular order. Each completion (or
//! failure) is broadcast so connected clients can refresh whatever view was
//! waiting on it.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::model::Artifact;

/// TMB event types
///
/// Serialized with a `type` tag for SSE transmission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TmbEvent {
    /// An artifact was parsed and installed into the corpus
    ArtifactLoaded {
        artifact: Artifact,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// An artifact could not be read or parsed; it stays absent
    ArtifactFailed {
        artifact: Artifact,
        message: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl TmbEvent {
    /// SSE event name
    pub fn event_type(&self) -> &'static str {
        match self {
            TmbEvent::ArtifactLoaded { .. } => "ArtifactLoaded",
            TmbEvent::ArtifactFailed { .. } => "ArtifactFailed",
        }
    }
}

/// Broadcast channel for [`TmbEvent`]s
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<TmbEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// # Examples
    ///
    /// ```
    /// use tmb_common::events::EventBus;
    ///
    /// let event_bus = EventBus::new(16);
    /// assert_eq!(event_bus.capacity(), 16);
    /// ```
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<TmbEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(&self, event: TmbEvent) -> Result<usize, broadcast::error::SendError<TmbEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: TmbEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
