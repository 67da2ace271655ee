//! Host-environment services the bridge depends on.

use async_trait::async_trait;

use crate::protocol::{ExtensionRequest, ExtensionResponse};

/// Error from the store install flow.
#[derive(Debug, Clone, thiserror::Error)]
#[error("extension install failed: {0}")]
pub struct InstallError(pub String);

/// Services the host environment provides to the bridge: the out-of-process
/// extension messaging channel, the store install flow, and the ability to
/// request a full environment reload.
///
/// All of these must be detectable/usable without throwing - a host with no
/// messaging capability reports it via [`messaging_available`], not by
/// failing [`send`].
///
/// [`messaging_available`]: ExtensionHost::messaging_available
/// [`send`]: ExtensionHost::send
#[async_trait]
pub trait ExtensionHost: Send + Sync {
    /// Whether extension messaging exists at all in this environment.
    fn messaging_available(&self) -> bool;

    /// One request/response round trip with the extension identified by
    /// `extension_id`. `None` covers dropped, unsupported and garbled
    /// exchanges alike; the bridge does not distinguish them from an
    /// extension that is simply not installed.
    async fn send(
        &self,
        extension_id: &str,
        request: ExtensionRequest,
    ) -> Option<ExtensionResponse>;

    /// Start the store install flow for `extension_id`. Resolves once the
    /// flow finishes, either way.
    async fn install(&self, extension_id: &str) -> Result<(), InstallError>;

    /// Request a full environment reload. Messaging only becomes available
    /// after the reload completes, so any acquisition in flight is
    /// superseded rather than completed.
    fn request_reload(&self);
}
