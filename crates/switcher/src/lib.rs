//! Stream switching for a live call: camera in, screen out, and back.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Domain Layer                             │
//! │  gate.rs    - backend selection + capability gate (pure)    │
//! │  config.rs  - configuration surface                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Acquisition Layer                           │
//! │  backend.rs - NativeScreen / ExtensionMediated capture      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Application Layer                          │
//! │  coordinator.rs - single-flight toggle state machine        │
//! │  handoff.rs     - local replacement + session renegotiation │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use camswap_switcher::{SwitchConfig, SwitchCoordinator, SwitcherDeps};
//!
//! let coordinator = SwitchCoordinator::new(config, host_info, deps);
//! match coordinator.toggle().await? {
//!     SwitchOutcome::Completed(mode) => println!("now transmitting {mode}"),
//!     other => println!("toggle did not switch: {other:?}"),
//! }
//! ```

mod backend;
mod config;
mod coordinator;
mod error;
mod gate;
mod handoff;

pub use backend::{Acquisition, CaptureBackend, ExtensionMediated, NativeScreen};
pub use config::{SharingMethod, SwitchConfig};
pub use coordinator::{SwitchCoordinator, SwitchOutcome, SwitchState, SwitcherDeps};
pub use error::SwitchError;
pub use gate::{
    is_sharing_enabled, resolve_backend, BackendSelection, Browser, HostInfo,
    MIN_EXTENSION_HOST_VERSION,
};
pub use handoff::{LocalVideo, NullLocalVideo, SessionError, SessionLayer};

// Re-export the leaf types callers hold anyway.
pub use camswap_bridge::{ExtensionConfig, ExtensionState};
pub use camswap_media::{MediaStream, Mode};

pub type Result<T> = std::result::Result<T, SwitchError>;
