//! Error types for switch operations.

use camswap_bridge::BridgeError;
use camswap_media::CaptureError;
use thiserror::Error;

/// Errors that can surface from a switch attempt.
///
/// Every failure unwinds to the coordinator, which releases its lock and
/// reports a single failure event; none of these are fatal to the call,
/// which continues on whichever mode was active before the attempt.
#[derive(Debug, Error)]
pub enum SwitchError {
    /// Native capture denied or unavailable.
    #[error("stream acquisition failed: {0}")]
    Acquisition(#[from] CaptureError),

    /// Extension bridge failure: unavailable, incompatible, communication
    /// breakdown, or a failed install.
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// The session layer failed to renegotiate onto the new stream.
    #[error("stream handoff failed: {0}")]
    Handoff(String),

    /// A switch is in flight; reconfiguration must wait for it.
    #[error("a switch is in flight; try again when it completes")]
    Busy,
}
