mod mode;
mod source;
mod stream;

pub use mode::Mode;
pub use source::{MediaSource, Resolution, SourceKind, StreamRequest};
pub use stream::MediaStream;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("capture permission denied")]
    PermissionDenied,
    #[error("no capture source available: {0}")]
    SourceUnavailable(String),
    #[error("capture failed: {0}")]
    Failed(String),
}

pub type Result<T> = std::result::Result<T, CaptureError>;
