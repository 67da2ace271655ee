//! Wire messages exchanged with the capture extension.
//!
//! Two request/response pairs exist, one round trip each: a version query
//! and a stream request. The shapes match the extension's message schema,
//! so requests serialize to `{"getVersion": true}` / `{"getStream": true}`
//! and responses carry `version` / `streamId` fields.

use serde::{Deserialize, Serialize};

/// Store URL prefix for the extension install flow. Host implementations
/// append the configured extension id.
pub const WEBSTORE_URL_PREFIX: &str = "https://chrome.google.com/webstore/detail/";

/// Request message sent to the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionRequest {
    /// Ask for the installed extension version.
    GetVersion,
    /// Ask for a screen stream token.
    GetStream,
}

impl ExtensionRequest {
    /// Wire form of the request.
    pub fn to_wire(self) -> serde_json::Value {
        match self {
            ExtensionRequest::GetVersion => serde_json::json!({ "getVersion": true }),
            ExtensionRequest::GetStream => serde_json::json!({ "getStream": true }),
        }
    }
}

/// Response message from the extension.
///
/// Both fields are optional: a response may be garbled, or may answer a
/// different request shape. Callers check for the field they asked for and
/// treat its absence as a failed exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_id: Option<String>,
}

impl ExtensionResponse {
    pub fn version(version: impl Into<String>) -> Self {
        Self {
            version: Some(version.into()),
            stream_id: None,
        }
    }

    pub fn stream(stream_id: impl Into<String>) -> Self {
        Self {
            version: None,
            stream_id: Some(stream_id.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_shapes() {
        assert_eq!(
            ExtensionRequest::GetVersion.to_wire(),
            json!({"getVersion": true})
        );
        assert_eq!(
            ExtensionRequest::GetStream.to_wire(),
            json!({"getStream": true})
        );
    }

    #[test]
    fn test_response_field_names() {
        let response: ExtensionResponse =
            serde_json::from_value(json!({"streamId": "tok-7"})).unwrap();
        assert_eq!(response.stream_id.as_deref(), Some("tok-7"));
        assert!(response.version.is_none());

        let response: ExtensionResponse =
            serde_json::from_value(json!({"version": "0.4.1"})).unwrap();
        assert_eq!(response.version.as_deref(), Some("0.4.1"));
    }

    #[test]
    fn test_garbled_response_parses_empty() {
        let response: ExtensionResponse =
            serde_json::from_value(json!({"unexpected": 1})).unwrap();
        assert_eq!(response, ExtensionResponse::default());
    }
}
