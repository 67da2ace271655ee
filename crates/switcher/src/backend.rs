//! Capture backend variants for acquiring a screen stream.

use std::sync::Arc;

use async_trait::async_trait;
use camswap_bridge::{BridgeOutcome, ExtensionBridge};
use camswap_media::{MediaSource, MediaStream, StreamRequest};

/// Non-error result of a backend acquisition.
#[derive(Debug)]
pub enum Acquisition {
    /// A live screen stream.
    Stream(MediaStream),
    /// The extension install flow ran; a pending environment reload
    /// supersedes this acquisition.
    RestartPending,
}

/// Source of screen streams, selected by configuration.
///
/// `acquire` completes exactly once: a stream, a restart-pending marker, or
/// an error.
#[async_trait]
pub trait CaptureBackend: Send + Sync {
    async fn acquire(&self) -> crate::Result<Acquisition>;
}

/// Native screen capture straight through the capture primitive.
pub struct NativeScreen {
    source: Arc<dyn MediaSource>,
}

impl NativeScreen {
    pub fn new(source: Arc<dyn MediaSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl CaptureBackend for NativeScreen {
    async fn acquire(&self) -> crate::Result<Acquisition> {
        let stream = self.source.get_stream(StreamRequest::screen()).await?;
        Ok(Acquisition::Stream(stream))
    }
}

/// Screen capture mediated by the helper extension: one bridge round for a
/// consent token, then `desktop` capture parameterized by it. A bridge
/// failure is surfaced as-is, without attempting capture.
pub struct ExtensionMediated {
    source: Arc<dyn MediaSource>,
    bridge: ExtensionBridge,
}

impl ExtensionMediated {
    pub fn new(source: Arc<dyn MediaSource>, bridge: ExtensionBridge) -> Self {
        Self { source, bridge }
    }

    /// Last-observed extension state, for UI introspection.
    pub fn extension_state(&self) -> camswap_bridge::ExtensionState {
        self.bridge.state()
    }
}

#[async_trait]
impl CaptureBackend for ExtensionMediated {
    async fn acquire(&self) -> crate::Result<Acquisition> {
        match self.bridge.obtain_stream_token().await? {
            BridgeOutcome::ReloadPending => Ok(Acquisition::RestartPending),
            BridgeOutcome::Token(stream_id) => {
                let stream = self
                    .source
                    .get_stream(StreamRequest::desktop(stream_id))
                    .await?;
                Ok(Acquisition::Stream(stream))
            }
        }
    }
}
