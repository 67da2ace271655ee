//! Switch coordinator: the single-flight state machine behind mode toggling.

use std::sync::{Arc, Mutex, Weak};

use camswap_bridge::{ExtensionBridge, ExtensionHost};
use camswap_events::{
    emit_json, AvailabilityChangedEvent, EventBusRef, ModeChangedEvent, SwitchFailedEvent,
};
use camswap_media::{MediaSource, MediaStream, Mode, StreamRequest};
use uuid::Uuid;

use crate::backend::{Acquisition, CaptureBackend, ExtensionMediated, NativeScreen};
use crate::config::{SharingMethod, SwitchConfig};
use crate::error::SwitchError;
use crate::gate::{is_sharing_enabled, resolve_backend, BackendSelection, HostInfo};
use crate::handoff::{LocalVideo, SessionLayer, StreamHandoff};

/// Machine states. The machine runs for the lifetime of the call; there is
/// no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchState {
    /// No switch in flight; transmitting the carried mode.
    Idle(Mode),
    /// A switch is in flight; the carried mode is the one currently
    /// transmitted (it flips to the target when the local replacement step
    /// of the handoff runs, ahead of lock release).
    Switching(Mode),
}

impl SwitchState {
    pub fn mode(&self) -> Mode {
        match *self {
            SwitchState::Idle(mode) | SwitchState::Switching(mode) => mode,
        }
    }

    pub fn is_switching(&self) -> bool {
        matches!(self, SwitchState::Switching(_))
    }
}

/// Outcome of a toggle request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// Handoff completed; now transmitting the carried mode.
    Completed(Mode),
    /// Rejected: another switch is in flight. Dropped, not queued.
    AlreadySwitching,
    /// Rejected: no screen-stream backend is configured.
    Disabled,
    /// The extension install flow ran; an environment reload supersedes
    /// this request. Toggle again after the reload.
    RestartPending,
}

/// Collaborators the coordinator talks to.
pub struct SwitcherDeps {
    /// Raw capture primitive, used for both camera and screen acquisition.
    pub capture: Arc<dyn MediaSource>,
    /// Local preview sink.
    pub local: Arc<dyn LocalVideo>,
    /// Session layer, when one is attached.
    pub session: Option<Arc<dyn SessionLayer>>,
    /// Extension host services; required for the extension method.
    pub extension_host: Option<Arc<dyn ExtensionHost>>,
    /// Sink for user-visible notices and UI signals.
    pub events: EventBusRef,
}

struct CoordinatorState {
    machine: SwitchState,
    /// The stream this coordinator last installed, handed to the session
    /// layer as the old stream on the next switch.
    active: Option<MediaStream>,
    /// The configured screen-stream source; `None` disables toggling.
    backend: Option<Arc<dyn CaptureBackend>>,
    selection: BackendSelection,
}

struct Inner {
    state: Mutex<CoordinatorState>,
    capture: Arc<dyn MediaSource>,
    handoff: StreamHandoff,
    events: EventBusRef,
    extension_host: Option<Arc<dyn ExtensionHost>>,
    host_info: HostInfo,
    config: SwitchConfig,
}

/// Serializes switch requests, selects and invokes the capture backend,
/// hands new streams to the session layer, and reverts to the camera when a
/// screen stream terminates externally.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct SwitchCoordinator {
    inner: Arc<Inner>,
}

impl SwitchCoordinator {
    pub fn new(config: SwitchConfig, host_info: HostInfo, deps: SwitcherDeps) -> Self {
        let SwitcherDeps {
            capture,
            local,
            session,
            extension_host,
            events,
        } = deps;

        let (selection, backend) = build_backend(
            resolve_logged(config.method, &host_info),
            &capture,
            &extension_host,
            &config,
            &events,
        );
        log_selection(selection);

        let coordinator = Self {
            inner: Arc::new(Inner {
                state: Mutex::new(CoordinatorState {
                    machine: SwitchState::Idle(Mode::Camera),
                    active: None,
                    backend,
                    selection,
                }),
                capture,
                handoff: StreamHandoff::new(session, local),
                events,
                extension_host,
                host_info,
                config,
            }),
        };
        coordinator.emit_availability();
        coordinator
    }

    /// Current machine state.
    pub fn state(&self) -> SwitchState {
        self.lock_state().machine
    }

    /// Mode currently transmitted.
    pub fn mode(&self) -> Mode {
        self.lock_state().machine.mode()
    }

    /// Whether a switch is outstanding.
    pub fn is_switching(&self) -> bool {
        self.lock_state().machine.is_switching()
    }

    /// The stream this coordinator last installed, if any.
    pub fn active_stream(&self) -> Option<MediaStream> {
        self.lock_state().active.clone()
    }

    /// Capability gate: whether sharing is available and enabled. Pure
    /// read for UI gating - the toggle path never consults it.
    pub fn is_enabled(&self) -> bool {
        is_sharing_enabled(self.lock_state().selection, &self.inner.host_info)
    }

    /// Reconfigure the screen-stream source. The active backend never
    /// changes mid-switch, so this is rejected while one is outstanding.
    pub fn set_method(&self, method: SharingMethod) -> crate::Result<()> {
        let (selection, backend) = build_backend(
            resolve_logged(method, &self.inner.host_info),
            &self.inner.capture,
            &self.inner.extension_host,
            &self.inner.config,
            &self.inner.events,
        );
        {
            let mut st = self.lock_state();
            if st.machine.is_switching() {
                return Err(SwitchError::Busy);
            }
            st.selection = selection;
            st.backend = backend;
        }
        log_selection(selection);
        self.emit_availability();
        Ok(())
    }

    /// Toggle between camera and screen.
    ///
    /// Single-flight: while a switch is outstanding every further request is
    /// rejected immediately, without side effects. The lock is held until
    /// the handoff completes (the session layer's completion resolves), so
    /// no second toggle can race an in-flight renegotiation.
    pub async fn toggle(&self) -> crate::Result<SwitchOutcome> {
        let (from, backend) = {
            let mut st = self.lock_state();
            if st.machine.is_switching() {
                tracing::warn!("switch already in progress; request dropped");
                return Ok(SwitchOutcome::AlreadySwitching);
            }
            let Some(backend) = st.backend.clone() else {
                tracing::warn!("no screen-stream backend configured; request dropped");
                return Ok(SwitchOutcome::Disabled);
            };
            let from = st.machine.mode();
            st.machine = SwitchState::Switching(from);
            (from, backend)
        };

        let target = from.toggled();
        tracing::info!(from = %from, to = %target, "switch started");

        let acquired = match from {
            Mode::Camera => backend.acquire().await,
            // Returning to the camera is always native capture.
            Mode::Screen => self.acquire_camera().await,
        };

        let stream = match acquired {
            Ok(Acquisition::Stream(stream)) => stream,
            Ok(Acquisition::RestartPending) => {
                self.release(from);
                tracing::info!("acquisition superseded by pending environment reload");
                return Ok(SwitchOutcome::RestartPending);
            }
            Err(err) => {
                self.release(from);
                tracing::error!(error = %err, "failed to obtain the stream to switch to");
                emit_json(
                    self.inner.events.as_ref(),
                    SwitchFailedEvent::TOPIC,
                    &SwitchFailedEvent::now(from, err.to_string()),
                );
                return Err(err);
            }
        };

        if target == Mode::Screen {
            self.watch_for_end(&stream);
        }

        // Local replacement: the transmitted mode flips here, ahead of lock
        // release.
        let old = {
            let mut st = self.lock_state();
            st.machine = SwitchState::Switching(target);
            st.active.replace(stream.clone())
        };

        let result = self.inner.handoff.handoff(&stream, old, target).await;

        // Released even when renegotiation failed.
        self.release(target);

        match result {
            Ok(()) => {
                tracing::info!(mode = %target, "switch complete");
                emit_json(
                    self.inner.events.as_ref(),
                    ModeChangedEvent::TOPIC,
                    &ModeChangedEvent::now(target),
                );
                Ok(SwitchOutcome::Completed(target))
            }
            Err(err) => {
                tracing::error!(error = %err, "stream handoff failed");
                emit_json(
                    self.inner.events.as_ref(),
                    SwitchFailedEvent::TOPIC,
                    &SwitchFailedEvent::now(target, err.to_string()),
                );
                Err(err)
            }
        }
    }

    async fn acquire_camera(&self) -> crate::Result<Acquisition> {
        let request = StreamRequest::camera(self.inner.config.camera_resolution);
        let stream = self.inner.capture.get_stream(request).await?;
        Ok(Acquisition::Stream(stream))
    }

    /// One-shot fallback: when the screen stream ends externally while no
    /// switch is in flight, toggle back to the camera.
    fn watch_for_end(&self, stream: &MediaStream) {
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let stream = stream.clone();
        tokio::spawn(async move {
            stream.ended().await;
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let coordinator = SwitchCoordinator { inner };
            coordinator.on_stream_ended(stream.id()).await;
        });
    }

    async fn on_stream_ended(&self, stream_id: Uuid) {
        {
            let st = self.lock_state();
            if st.machine.is_switching() {
                tracing::debug!(%stream_id, "stream ended during a switch; ignoring");
                return;
            }
            let still_active = st.machine.mode() == Mode::Screen
                && st.active.as_ref().is_some_and(|s| s.id() == stream_id);
            if !still_active {
                tracing::debug!(%stream_id, "ended stream is no longer active; ignoring");
                return;
            }
        }

        tracing::info!(%stream_id, "screen stream ended externally; reverting to camera");
        if let Err(err) = self.toggle().await {
            tracing::error!(error = %err, "automatic revert to camera failed");
        }
    }

    fn release(&self, mode: Mode) {
        self.lock_state().machine = SwitchState::Idle(mode);
    }

    fn emit_availability(&self) {
        let enabled = self.is_enabled();
        tracing::debug!(enabled, "sharing availability updated");
        emit_json(
            self.inner.events.as_ref(),
            AvailabilityChangedEvent::TOPIC,
            &AvailabilityChangedEvent { enabled },
        );
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, CoordinatorState> {
        self.inner.state.lock().expect("switch state lock poisoned")
    }
}

fn resolve_logged(method: SharingMethod, host: &HostInfo) -> BackendSelection {
    let selection = resolve_backend(method, host);
    if method == SharingMethod::Extension && selection == BackendSelection::Disabled {
        tracing::error!(
            browser = ?host.browser,
            "the extension method requires Chrome; screen sharing disabled"
        );
    }
    selection
}

/// Build the backend for a resolved selection, downgrading to `Disabled`
/// when the selection cannot be honored.
fn build_backend(
    selection: BackendSelection,
    capture: &Arc<dyn MediaSource>,
    extension_host: &Option<Arc<dyn ExtensionHost>>,
    config: &SwitchConfig,
    events: &EventBusRef,
) -> (BackendSelection, Option<Arc<dyn CaptureBackend>>) {
    match selection {
        BackendSelection::Disabled => (BackendSelection::Disabled, None),
        BackendSelection::Native => (
            BackendSelection::Native,
            Some(Arc::new(NativeScreen::new(capture.clone()))),
        ),
        BackendSelection::Extension => match extension_host {
            Some(host) => {
                let bridge = ExtensionBridge::new(
                    host.clone(),
                    config.extension.clone(),
                    events.clone(),
                );
                (
                    BackendSelection::Extension,
                    Some(Arc::new(ExtensionMediated::new(capture.clone(), bridge))),
                )
            }
            None => {
                tracing::error!(
                    "extension method selected but no extension host supplied; screen sharing disabled"
                );
                (BackendSelection::Disabled, None)
            }
        },
    }
}

fn log_selection(selection: BackendSelection) {
    match selection {
        BackendSelection::Extension => {
            tracing::info!("using the capture extension for screen sharing")
        }
        BackendSelection::Native => tracing::info!("using native capture for screen sharing"),
        BackendSelection::Disabled => tracing::info!("screen sharing disabled"),
    }
}
