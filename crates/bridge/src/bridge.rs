//! Request/response bridge to the capture extension.

use std::sync::{Arc, Mutex};

use camswap_events::{emit_json, EventBusRef, ExtensionUpdateRequiredEvent};

use crate::host::ExtensionHost;
use crate::protocol::ExtensionRequest;
use crate::version;
use crate::{BridgeError, ExtensionState, Result};

/// Bridge settings, part of the switcher configuration surface.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExtensionConfig {
    /// Store package identifier of the capture extension.
    pub extension_id: String,
    /// Minimum extension version that is usable without an update.
    pub min_version: String,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            extension_id: String::new(),
            min_version: "0".to_string(),
        }
    }
}

/// Non-error outcome of a full acquisition round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeOutcome {
    /// A usable stream token.
    Token(String),
    /// The install flow ran to completion; the pending environment reload
    /// supersedes the original acquisition. Retry after the reload.
    ReloadPending,
}

/// Bridge to the out-of-process capture extension.
///
/// Stateless apart from the last-observed [`ExtensionState`], which is
/// re-derived on every acquisition attempt.
pub struct ExtensionBridge {
    host: Arc<dyn ExtensionHost>,
    config: ExtensionConfig,
    events: EventBusRef,
    state: Mutex<ExtensionState>,
}

impl ExtensionBridge {
    pub fn new(host: Arc<dyn ExtensionHost>, config: ExtensionConfig, events: EventBusRef) -> Self {
        Self {
            host,
            config,
            events,
            state: Mutex::new(ExtensionState::NotQueried),
        }
    }

    /// Last-observed extension state.
    pub fn state(&self) -> ExtensionState {
        self.state.lock().unwrap().clone()
    }

    fn set_state(&self, state: ExtensionState) {
        *self.state.lock().unwrap() = state;
    }

    /// Version check: one round trip.
    ///
    /// Returns `Absent` both when the host has no messaging capability and
    /// when the query yields no usable response. A version below the
    /// configured minimum emits the restart-required notice and comes back
    /// as `RequiresUpdate`.
    pub async fn check_installed(&self) -> ExtensionState {
        if !self.host.messaging_available() {
            tracing::debug!("no extension messaging capability; treating extension as absent");
            self.set_state(ExtensionState::Absent);
            return ExtensionState::Absent;
        }

        self.set_state(ExtensionState::Checking);
        let response = self
            .host
            .send(&self.config.extension_id, ExtensionRequest::GetVersion)
            .await;

        let state = match response.and_then(|r| r.version) {
            None => {
                tracing::warn!("extension version query got no usable response; assuming absent");
                ExtensionState::Absent
            }
            Some(reported) => {
                tracing::info!(version = %reported, "extension version reported");
                if version::is_older(&reported, &self.config.min_version) {
                    emit_json(
                        self.events.as_ref(),
                        ExtensionUpdateRequiredEvent::TOPIC,
                        &ExtensionUpdateRequiredEvent::now(&reported, &self.config.min_version),
                    );
                    ExtensionState::RequiresUpdate {
                        installed: reported,
                    }
                } else {
                    ExtensionState::Compatible { version: reported }
                }
            }
        };

        self.set_state(state.clone());
        state
    }

    /// Ask the extension for a stream token. Valid only after a compatible
    /// [`check_installed`] result.
    ///
    /// [`check_installed`]: ExtensionBridge::check_installed
    pub async fn request_stream_id(&self) -> Result<String> {
        if !self.host.messaging_available() {
            return Err(BridgeError::Unavailable);
        }

        let response = self
            .host
            .send(&self.config.extension_id, ExtensionRequest::GetStream)
            .await;

        match response {
            None => Err(BridgeError::Communication("no response to stream request")),
            Some(r) => match r.stream_id {
                Some(stream_id) => {
                    tracing::debug!(%stream_id, "extension granted stream token");
                    Ok(stream_id)
                }
                None => Err(BridgeError::Communication(
                    "stream response carried no stream id",
                )),
            },
        }
    }

    /// Full acquisition round: check the extension, then either request a
    /// token, run the install flow (reload pending), or fail.
    pub async fn obtain_stream_token(&self) -> Result<BridgeOutcome> {
        match self.check_installed().await {
            ExtensionState::Compatible { .. } => {
                self.request_stream_id().await.map(BridgeOutcome::Token)
            }
            ExtensionState::RequiresUpdate { installed } => Err(BridgeError::Incompatible {
                installed,
                required: self.config.min_version.clone(),
            }),
            ExtensionState::Absent => self.install_and_reload().await,
            // check_installed only returns the three states above.
            state => {
                tracing::error!(?state, "unexpected extension state after check");
                Err(BridgeError::Communication("unexpected extension state"))
            }
        }
    }

    /// Install-flow failure recovery: the extension is absent, so start the
    /// store install. Success forces an environment reload (messaging only
    /// exists after reload), superseding the original acquisition.
    async fn install_and_reload(&self) -> Result<BridgeOutcome> {
        tracing::info!(
            extension_id = %self.config.extension_id,
            "extension absent; starting store install flow"
        );
        match self.host.install(&self.config.extension_id).await {
            Ok(()) => {
                tracing::info!("extension installed; requesting environment reload");
                self.host.request_reload();
                Ok(BridgeOutcome::ReloadPending)
            }
            Err(err) => {
                tracing::error!(error = %err, "extension install failed");
                Err(BridgeError::Install(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::InstallError;
    use crate::protocol::ExtensionResponse;
    use async_trait::async_trait;
    use camswap_events::InMemoryEventBus;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct ScriptedHost {
        messaging: bool,
        version: Option<&'static str>,
        stream_id: Option<&'static str>,
        install_error: Option<&'static str>,
        sent: Mutex<Vec<ExtensionRequest>>,
        installs: AtomicUsize,
        reloads: AtomicUsize,
    }

    #[async_trait]
    impl ExtensionHost for ScriptedHost {
        fn messaging_available(&self) -> bool {
            self.messaging
        }

        async fn send(
            &self,
            _extension_id: &str,
            request: ExtensionRequest,
        ) -> Option<ExtensionResponse> {
            self.sent.lock().unwrap().push(request);
            match request {
                ExtensionRequest::GetVersion => self.version.map(ExtensionResponse::version),
                ExtensionRequest::GetStream => self.stream_id.map(ExtensionResponse::stream),
            }
        }

        async fn install(&self, _extension_id: &str) -> std::result::Result<(), InstallError> {
            self.installs.fetch_add(1, Ordering::SeqCst);
            match self.install_error {
                Some(message) => Err(InstallError(message.to_string())),
                None => Ok(()),
            }
        }

        fn request_reload(&self) {
            self.reloads.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn bridge_with(
        host: Arc<ScriptedHost>,
        min_version: &str,
    ) -> (ExtensionBridge, Arc<InMemoryEventBus>) {
        let events = Arc::new(InMemoryEventBus::new());
        let config = ExtensionConfig {
            extension_id: "test-extension".to_string(),
            min_version: min_version.to_string(),
        };
        (
            ExtensionBridge::new(host, config, events.clone()),
            events,
        )
    }

    #[tokio::test]
    async fn test_compatible_yields_token() {
        let host = Arc::new(ScriptedHost {
            messaging: true,
            version: Some("1.3"),
            stream_id: Some("tok-42"),
            ..Default::default()
        });
        let (bridge, events) = bridge_with(host, "1.0");

        assert_eq!(bridge.state(), ExtensionState::NotQueried);
        let outcome = bridge.obtain_stream_token().await.unwrap();
        assert_eq!(outcome, BridgeOutcome::Token("tok-42".to_string()));
        assert!(bridge.state().is_usable());
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_no_messaging_is_absent() {
        let host = Arc::new(ScriptedHost::default());
        let (bridge, _events) = bridge_with(host, "1.0");

        assert_eq!(bridge.check_installed().await, ExtensionState::Absent);
    }

    #[tokio::test]
    async fn test_no_response_is_absent() {
        let host = Arc::new(ScriptedHost {
            messaging: true,
            version: None,
            ..Default::default()
        });
        let (bridge, _events) = bridge_with(host, "1.0");

        assert_eq!(bridge.check_installed().await, ExtensionState::Absent);
    }

    #[tokio::test]
    async fn test_old_version_requires_update_and_notifies() {
        let host = Arc::new(ScriptedHost {
            messaging: true,
            version: Some("0.9"),
            stream_id: Some("never-used"),
            ..Default::default()
        });
        let (bridge, events) = bridge_with(host, "1.0");

        let err = bridge.obtain_stream_token().await.unwrap_err();
        assert!(matches!(err, BridgeError::Incompatible { .. }));
        assert_eq!(
            bridge.state(),
            ExtensionState::RequiresUpdate {
                installed: "0.9".to_string()
            }
        );
        assert_eq!(
            events
                .events_for(ExtensionUpdateRequiredEvent::TOPIC)
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_update_required_does_not_request_stream() {
        let host = Arc::new(ScriptedHost {
            messaging: true,
            version: Some("0.9"),
            stream_id: Some("never-used"),
            ..Default::default()
        });
        let (bridge, _events) = bridge_with(host.clone(), "1.0");

        let _ = bridge.obtain_stream_token().await;
        // Only the version query went over the channel.
        let sent = host.sent.lock().unwrap().clone();
        assert_eq!(sent, vec![ExtensionRequest::GetVersion]);
    }

    #[tokio::test]
    async fn test_absent_installs_and_requests_reload() {
        let host = Arc::new(ScriptedHost {
            messaging: true,
            version: None,
            ..Default::default()
        });
        let (bridge, _events) = bridge_with(host.clone(), "1.0");

        let outcome = bridge.obtain_stream_token().await.unwrap();
        assert_eq!(outcome, BridgeOutcome::ReloadPending);
        assert_eq!(host.installs.load(Ordering::SeqCst), 1);
        assert_eq!(host.reloads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_install_failure_surfaces() {
        let host = Arc::new(ScriptedHost {
            messaging: true,
            version: None,
            install_error: Some("store refused"),
            ..Default::default()
        });
        let (bridge, _events) = bridge_with(host.clone(), "1.0");

        let err = bridge.obtain_stream_token().await.unwrap_err();
        assert!(matches!(err, BridgeError::Install(_)));
    }

    #[tokio::test]
    async fn test_stream_request_without_id_is_communication_failure() {
        let host = Arc::new(ScriptedHost {
            messaging: true,
            version: Some("1.0"),
            stream_id: None,
            ..Default::default()
        });
        let (bridge, _events) = bridge_with(host, "1.0");

        let err = bridge.obtain_stream_token().await.unwrap_err();
        assert!(matches!(err, BridgeError::Communication(_)));
    }

    #[tokio::test]
    async fn test_stream_request_without_messaging_is_unavailable() {
        let host = Arc::new(ScriptedHost::default());
        let (bridge, _events) = bridge_with(host, "1.0");

        let err = bridge.request_stream_id().await.unwrap_err();
        assert!(matches!(err, BridgeError::Unavailable));
    }
}
