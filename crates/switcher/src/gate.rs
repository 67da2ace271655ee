//! Backend selection and the capability gate.
//!
//! Pure functions of configuration and host info - no I/O. The gate feeds
//! UI visibility only; the coordinator never consults it, because disabling
//! the feature clears the configured backend and that alone makes toggles
//! no-ops.

use serde::{Deserialize, Serialize};

use crate::config::SharingMethod;

/// Minimum Chrome major version able to run extension-mediated capture.
pub const MIN_EXTENSION_HOST_VERSION: u32 = 35;

/// Browser family of the host environment, as supplied by the embedder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    Chrome,
    Firefox,
    Safari,
    Edge,
    #[default]
    Other,
}

/// Host environment the switcher runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HostInfo {
    pub browser: Browser,
    /// Major version, when known.
    #[serde(default)]
    pub major_version: Option<u32>,
}

impl HostInfo {
    pub fn chrome(major_version: u32) -> Self {
        Self {
            browser: Browser::Chrome,
            major_version: Some(major_version),
        }
    }
}

/// Resolved backend selection: explicit tagged dispatch over the screen
/// stream sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendSelection {
    Disabled,
    Native,
    Extension,
}

/// Resolve the effective backend from the configured method and host.
///
/// The extension method is Chrome-only; selecting it anywhere else disables
/// sharing outright.
pub fn resolve_backend(method: SharingMethod, host: &HostInfo) -> BackendSelection {
    match method {
        SharingMethod::None => BackendSelection::Disabled,
        SharingMethod::Native => BackendSelection::Native,
        SharingMethod::Extension if host.browser == Browser::Chrome => BackendSelection::Extension,
        SharingMethod::Extension => BackendSelection::Disabled,
    }
}

/// Whether the sharing feature is available and enabled.
///
/// For the extension-mediated case the host must be recent enough to carry
/// the capture consent API at all.
pub fn is_sharing_enabled(selection: BackendSelection, host: &HostInfo) -> bool {
    match selection {
        BackendSelection::Disabled => false,
        BackendSelection::Native => true,
        BackendSelection::Extension => host
            .major_version
            .is_some_and(|version| version >= MIN_EXTENSION_HOST_VERSION),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_disabled() {
        let selection = resolve_backend(SharingMethod::None, &HostInfo::chrome(120));
        assert_eq!(selection, BackendSelection::Disabled);
        assert!(!is_sharing_enabled(selection, &HostInfo::chrome(120)));
    }

    #[test]
    fn test_native_is_enabled_everywhere() {
        let host = HostInfo {
            browser: Browser::Firefox,
            major_version: Some(90),
        };
        let selection = resolve_backend(SharingMethod::Native, &host);
        assert_eq!(selection, BackendSelection::Native);
        assert!(is_sharing_enabled(selection, &host));
    }

    #[test]
    fn test_extension_requires_chrome() {
        let host = HostInfo {
            browser: Browser::Safari,
            major_version: Some(17),
        };
        assert_eq!(
            resolve_backend(SharingMethod::Extension, &host),
            BackendSelection::Disabled
        );
    }

    #[test]
    fn test_extension_version_floor() {
        let selection = resolve_backend(SharingMethod::Extension, &HostInfo::chrome(35));
        assert_eq!(selection, BackendSelection::Extension);
        assert!(is_sharing_enabled(selection, &HostInfo::chrome(35)));
        assert!(!is_sharing_enabled(selection, &HostInfo::chrome(34)));

        let unknown = HostInfo {
            browser: Browser::Chrome,
            major_version: None,
        };
        assert!(!is_sharing_enabled(selection, &unknown));
    }
}
