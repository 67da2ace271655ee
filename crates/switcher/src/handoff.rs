//! Stream handoff: local replacement plus session-layer renegotiation.

use std::sync::Arc;

use async_trait::async_trait;
use camswap_media::{MediaStream, Mode};
use thiserror::Error;

use crate::error::SwitchError;

/// Error from session renegotiation.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct SessionError(pub String);

/// Downstream session/conference layer able to renegotiate transport from
/// one stream to another. Absence is a valid, detectable configuration.
#[async_trait]
pub trait SessionLayer: Send + Sync {
    /// Renegotiate from `old` to `new`. Resolution of the returned future is
    /// the completion callback the coordinator waits on before releasing
    /// its lock.
    async fn switch_streams(
        &self,
        new: MediaStream,
        old: Option<MediaStream>,
    ) -> Result<(), SessionError>;
}

/// Local video sink showing the user their own outgoing feed.
pub trait LocalVideo: Send + Sync {
    /// Replace the rendered stream. `mirror` is set for the camera
    /// self-view and cleared for screen content.
    fn replace(&self, stream: &MediaStream, mirror: bool);
}

/// No-op sink for embedders without a local preview.
pub struct NullLocalVideo;

impl LocalVideo for NullLocalVideo {
    fn replace(&self, _stream: &MediaStream, _mirror: bool) {}
}

/// Delivers a freshly acquired stream to the local preview and the session
/// layer.
pub(crate) struct StreamHandoff {
    session: Option<Arc<dyn SessionLayer>>,
    local: Arc<dyn LocalVideo>,
}

impl StreamHandoff {
    pub(crate) fn new(session: Option<Arc<dyn SessionLayer>>, local: Arc<dyn LocalVideo>) -> Self {
        Self { session, local }
    }

    /// Replace the local feed, then renegotiate. Returns once the session
    /// layer completes; immediately when none is attached (the degenerate
    /// single-step completion).
    pub(crate) async fn handoff(
        &self,
        new: &MediaStream,
        old: Option<MediaStream>,
        mode: Mode,
    ) -> crate::Result<()> {
        self.local.replace(new, mode == Mode::Camera);

        match &self.session {
            Some(session) => session
                .switch_streams(new.clone(), old)
                .await
                .map_err(|err| SwitchError::Handoff(err.to_string())),
            None => {
                tracing::warn!("no session layer attached; handoff completes locally");
                Ok(())
            }
        }
    }
}
