//! Configuration surface for the switcher.

use camswap_bridge::ExtensionConfig;
use camswap_media::Resolution;
use serde::{Deserialize, Serialize};

/// How screen streams are sourced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SharingMethod {
    /// Screen sharing disabled.
    #[default]
    None,
    /// Native screen capture through the capture primitive.
    Native,
    /// Screen capture mediated by the helper extension.
    Extension,
}

/// Switcher configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchConfig {
    /// Screen stream source selection.
    pub method: SharingMethod,
    /// Extension bridge settings, used by the `extension` method.
    pub extension: ExtensionConfig,
    /// Preferred camera resolution for the return path.
    pub camera_resolution: Resolution,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_disable_sharing() {
        let config = SwitchConfig::default();
        assert_eq!(config.method, SharingMethod::None);
        assert_eq!(config.camera_resolution, Resolution(360));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: SwitchConfig = serde_json::from_str(
            r#"{
                "method": "extension",
                "extension": { "extension_id": "abcdefgh", "min_version": "0.2" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.method, SharingMethod::Extension);
        assert_eq!(config.extension.extension_id, "abcdefgh");
        assert_eq!(config.extension.min_version, "0.2");
        assert_eq!(config.camera_resolution, Resolution(360));
    }

    #[test]
    fn test_method_names() {
        assert_eq!(
            serde_json::to_string(&SharingMethod::Native).unwrap(),
            "\"native\""
        );
        assert_eq!(
            serde_json::from_str::<SharingMethod>("\"none\"").unwrap(),
            SharingMethod::None
        );
    }
}
