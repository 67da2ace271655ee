//! Bridge to the out-of-process screen-capture helper extension.
//!
//! Extension-mediated capture needs a consent token that only the helper
//! extension can produce. Talking to it is a request/response protocol over
//! an asynchronous messaging channel, with one round trip per call:
//! a version query to decide whether the extension is usable, then a stream
//! request for the actual token. When the extension is missing, the bridge
//! falls back to the store install flow, after which a full environment
//! reload is required before the channel works.

mod bridge;
mod host;
mod protocol;
mod version;

pub use bridge::{BridgeOutcome, ExtensionBridge, ExtensionConfig};
pub use host::{ExtensionHost, InstallError};
pub use protocol::{ExtensionRequest, ExtensionResponse, WEBSTORE_URL_PREFIX};
pub use version::is_older;

use serde::{Deserialize, Serialize};

/// Last-observed state of the capture extension.
///
/// Re-derived on every extension-backed acquisition attempt; only the result
/// of the most recent check is held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum ExtensionState {
    /// No check has run yet.
    NotQueried,
    /// A version query is in flight.
    Checking,
    /// Installed and at least the configured minimum version.
    Compatible { version: String },
    /// Installed but older than the configured minimum; usable only after
    /// an update and a browser restart.
    RequiresUpdate { installed: String },
    /// Not installed, or no usable response - the two are not distinguished.
    Absent,
}

impl ExtensionState {
    pub fn is_usable(&self) -> bool {
        matches!(self, ExtensionState::Compatible { .. })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// No extension messaging capability in this environment.
    #[error("extension messaging is unavailable")]
    Unavailable,
    /// Installed extension is older than the configured minimum.
    #[error("extension {installed} is older than required {required}")]
    Incompatible { installed: String, required: String },
    /// The extension did not produce a usable response.
    #[error("extension communication failed: {0}")]
    Communication(&'static str),
    /// Store install failed.
    #[error(transparent)]
    Install(#[from] InstallError),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
