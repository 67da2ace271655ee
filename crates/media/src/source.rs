//! Capture requests and the capture primitive seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::stream::MediaStream;

/// Kind of capture source a stream request asks for.
///
/// Serialized names match the wire names understood by capture hosts: the
/// camera is requested as `video`, native screen capture as `screen`, and
/// token-parameterized capture as `desktop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Camera capture.
    #[serde(rename = "video")]
    Camera,
    /// Native screen capture.
    Screen,
    /// Screen capture parameterized by an extension-granted stream token.
    Desktop,
}

impl SourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Camera => "video",
            SourceKind::Screen => "screen",
            SourceKind::Desktop => "desktop",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Preferred capture height in lines (the "360"/"720" of the configuration
/// surface).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resolution(pub u32);

impl Default for Resolution {
    fn default() -> Self {
        Resolution(360)
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single capture request handed to the capture primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamRequest {
    /// Source kinds to acquire, in preference order.
    pub kinds: Vec<SourceKind>,
    /// Preferred resolution, where the kind supports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,
    /// Extension-granted stream token for `Desktop` capture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_id: Option<String>,
}

impl StreamRequest {
    /// Camera capture at the preferred resolution.
    pub fn camera(resolution: Resolution) -> Self {
        Self {
            kinds: vec![SourceKind::Camera],
            resolution: Some(resolution),
            stream_id: None,
        }
    }

    /// Native screen capture.
    pub fn screen() -> Self {
        Self {
            kinds: vec![SourceKind::Screen],
            resolution: None,
            stream_id: None,
        }
    }

    /// Token-parameterized screen capture.
    pub fn desktop(stream_id: impl Into<String>) -> Self {
        Self {
            kinds: vec![SourceKind::Desktop],
            resolution: None,
            stream_id: Some(stream_id.into()),
        }
    }
}

/// The raw camera/screen capture primitive.
///
/// Implementations must complete exactly once per call: either a live stream
/// or an error, never both, never neither.
#[async_trait]
pub trait MediaSource: Send + Sync {
    async fn get_stream(&self, request: StreamRequest) -> crate::Result<MediaStream>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&SourceKind::Camera).unwrap(),
            "\"video\""
        );
        assert_eq!(
            serde_json::to_string(&SourceKind::Screen).unwrap(),
            "\"screen\""
        );
        assert_eq!(
            serde_json::to_string(&SourceKind::Desktop).unwrap(),
            "\"desktop\""
        );
    }

    #[test]
    fn test_default_resolution() {
        assert_eq!(Resolution::default(), Resolution(360));
    }

    #[test]
    fn test_request_constructors() {
        let camera = StreamRequest::camera(Resolution::default());
        assert_eq!(camera.kinds, vec![SourceKind::Camera]);
        assert_eq!(camera.resolution, Some(Resolution(360)));
        assert!(camera.stream_id.is_none());

        let screen = StreamRequest::screen();
        assert_eq!(screen.kinds, vec![SourceKind::Screen]);
        assert!(screen.resolution.is_none());

        let desktop = StreamRequest::desktop("token-1");
        assert_eq!(desktop.kinds, vec![SourceKind::Desktop]);
        assert_eq!(desktop.stream_id.as_deref(), Some("token-1"));
    }
}
