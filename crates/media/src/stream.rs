//! Opaque handle to a live media stream.

use std::sync::Arc;

use tokio::sync::watch;
use uuid::Uuid;

use crate::source::SourceKind;

/// Handle to a live media stream.
///
/// Handles are cheap to clone and share the underlying liveness state. The
/// layer that currently transmits the stream owns it; any holder may observe
/// the end of the stream, and the capture layer signals it via [`end`].
///
/// [`end`]: MediaStream::end
#[derive(Debug, Clone)]
pub struct MediaStream {
    id: Uuid,
    kind: SourceKind,
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    ended: watch::Sender<bool>,
}

impl MediaStream {
    pub fn new(kind: SourceKind) -> Self {
        let (ended, _) = watch::channel(false);
        Self {
            id: Uuid::new_v4(),
            kind,
            shared: Arc::new(Shared { ended }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn is_ended(&self) -> bool {
        *self.shared.ended.borrow()
    }

    /// Signal that the underlying stream has terminated, e.g. because the
    /// user stopped sharing via the OS chrome. Idempotent; observers see a
    /// single transition.
    pub fn end(&self) {
        let was_live = !self.shared.ended.send_replace(true);
        if was_live {
            tracing::debug!(stream = %self.id, kind = %self.kind, "stream ended");
        }
    }

    /// Wait until the stream ends. Resolves immediately when it already has.
    pub async fn ended(&self) {
        let mut rx = self.shared.ended.subscribe();
        while !*rx.borrow_and_update() {
            if rx.changed().await.is_err() {
                // All handles dropped; nothing will signal again.
                return;
            }
        }
    }
}

impl PartialEq for MediaStream {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MediaStream {}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_end_resolves_waiters() {
        let stream = MediaStream::new(SourceKind::Screen);
        assert!(!stream.is_ended());

        let waiter = stream.clone();
        let handle = tokio::spawn(async move { waiter.ended().await });

        stream.end();
        handle.await.unwrap();
        assert!(stream.is_ended());
    }

    #[tokio::test]
    async fn test_ended_is_immediate_after_end() {
        let stream = MediaStream::new(SourceKind::Camera);
        stream.end();
        stream.end(); // idempotent
        stream.ended().await;
    }

    #[test]
    fn test_clones_share_identity_and_state() {
        let stream = MediaStream::new(SourceKind::Desktop);
        let other = stream.clone();
        assert_eq!(stream, other);

        other.end();
        assert!(stream.is_ended());
    }

    #[test]
    fn test_distinct_streams_differ() {
        let a = MediaStream::new(SourceKind::Screen);
        let b = MediaStream::new(SourceKind::Screen);
        assert_ne!(a, b);
    }
}
