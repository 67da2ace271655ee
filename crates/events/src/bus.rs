//! Event bus abstraction for decoupled event emission.
//!
//! The switcher core never talks to a UI toolkit directly; user-visible
//! notices and UI signals go through this trait so the core can run (and be
//! tested) headless.

use std::sync::{Arc, Mutex};

use serde::Serialize;

/// Trait for emitting events to subscribers.
pub trait EventBus: Send + Sync {
    /// Emit an event with a JSON payload.
    ///
    /// # Arguments
    /// * `topic` - Event name/topic (e.g., "switch:mode-changed")
    /// * `payload` - JSON payload to emit
    fn emit(&self, topic: &str, payload: serde_json::Value);
}

/// Type alias for shared event bus reference.
pub type EventBusRef = Arc<dyn EventBus>;

/// Serialize `event` and emit it on `bus` under `topic`.
///
/// A payload that fails to serialize is emitted as `null` rather than lost.
pub fn emit_json<E: Serialize>(bus: &dyn EventBus, topic: &str, event: &E) {
    let payload = serde_json::to_value(event).unwrap_or(serde_json::Value::Null);
    bus.emit(topic, payload);
}

/// In-memory event bus that captures all emitted events for inspection.
#[derive(Default)]
pub struct InMemoryEventBus {
    events: Mutex<Vec<EmittedEvent>>,
}

/// A captured event from [`InMemoryEventBus`].
#[derive(Debug, Clone)]
pub struct EmittedEvent {
    pub topic: String,
    pub payload: serde_json::Value,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all captured events.
    pub fn events(&self) -> Vec<EmittedEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Get events for a specific topic.
    pub fn events_for(&self, topic: &str) -> Vec<EmittedEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.topic == topic)
            .cloned()
            .collect()
    }

    /// Clear all captured events.
    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    /// Get the number of captured events.
    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Check if no events have been captured.
    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }
}

impl EventBus for InMemoryEventBus {
    fn emit(&self, topic: &str, payload: serde_json::Value) {
        self.events.lock().unwrap().push(EmittedEvent {
            topic: topic.to_string(),
            payload,
        });
    }
}

/// No-op event bus that discards all events.
pub struct NullEventBus;

impl EventBus for NullEventBus {
    fn emit(&self, _topic: &str, _payload: serde_json::Value) {
        // Intentionally empty
    }
}
