//! Shared event contracts for the stream switcher.
//!
//! This crate defines the formal contracts (DTOs) for events that flow from
//! the switcher core to whatever surface hosts it. Using shared types
//! prevents runtime deserialization errors from mismatched field names.
//!
//! Also provides the `EventBus` trait for decoupled event emission.

mod bus;

pub use bus::{emit_json, EmittedEvent, EventBus, EventBusRef, InMemoryEventBus, NullEventBus};

use camswap_media::Mode;
use serde::{Deserialize, Serialize};

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Event emitted when the transmitted mode changes.
///
/// Producers: switcher (stream handoff)
/// Consumers: UI layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeChangedEvent {
    /// Mode now being transmitted.
    pub mode: Mode,
    /// Timestamp in milliseconds since epoch.
    #[serde(default)]
    pub ts_ms: i64,
}

impl ModeChangedEvent {
    pub const TOPIC: &'static str = "switch:mode-changed";

    pub fn now(mode: Mode) -> Self {
        Self {
            mode,
            ts_ms: now_ms(),
        }
    }
}

/// Event emitted when a switch attempt fails.
///
/// Producers: switcher (coordinator)
/// Consumers: UI layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchFailedEvent {
    /// Mode that stays active after the failure.
    pub mode: Mode,
    /// Human-readable failure description.
    pub reason: String,
    /// Timestamp in milliseconds since epoch.
    #[serde(default)]
    pub ts_ms: i64,
}

impl SwitchFailedEvent {
    pub const TOPIC: &'static str = "switch:failed";

    pub fn now(mode: Mode, reason: impl Into<String>) -> Self {
        Self {
            mode,
            reason: reason.into(),
            ts_ms: now_ms(),
        }
    }
}

/// Event emitted when the sharing feature becomes available or unavailable,
/// e.g. after (re)configuration. Drives the visibility of the share button.
///
/// Producers: switcher (coordinator)
/// Consumers: UI layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityChangedEvent {
    /// Whether screen sharing is available and enabled.
    pub enabled: bool,
}

impl AvailabilityChangedEvent {
    pub const TOPIC: &'static str = "switch:availability";
}

/// Event emitted when the capture extension is installed but too old. The
/// update only takes effect after the browser restarts, so the user must be
/// told rather than silently retried.
///
/// Producers: bridge
/// Consumers: UI layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionUpdateRequiredEvent {
    /// Version the extension reported.
    pub installed: String,
    /// Minimum version the configuration requires.
    pub required: String,
    /// Timestamp in milliseconds since epoch.
    #[serde(default)]
    pub ts_ms: i64,
}

impl ExtensionUpdateRequiredEvent {
    pub const TOPIC: &'static str = "extension:update-required";

    pub fn now(installed: impl Into<String>, required: impl Into<String>) -> Self {
        Self {
            installed: installed.into(),
            required: required.into(),
            ts_ms: now_ms(),
        }
    }
}
