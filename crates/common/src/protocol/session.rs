// Edit session message types.
//
// Every message is a JSON object tagged by `type`. There are no correlation
// ids: replies rely on the transport keeping per-session order.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{RequestRecord, Scope};

/// Surface -> Core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SurfaceMessage {
    /// The surface finished initializing.
    Ready,

    /// Create or update a record in `request.scope` (global when absent).
    SaveRequest { request: RequestRecord },

    /// Delete a record wherever it lives.
    DeleteRequest { id: String },

    /// Tear down this session's surface.
    ClosePanel,

    /// Ask for the full saved list (answered with `savedRequests`).
    GetRequests,

    /// Clear every record in the global scope.
    ClearAllRequests,
}

impl SurfaceMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::SaveRequest { .. } => "saveRequest",
            Self::DeleteRequest { .. } => "deleteRequest",
            Self::ClosePanel => "closePanel",
            Self::GetRequests => "getRequests",
            Self::ClearAllRequests => "clearAllRequests",
        }
    }
}

/// Core -> Surface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CoreMessage {
    /// Populate the form from `request`; the surface must keep its `id`.
    LoadRequest { request: RequestRecord },

    /// Every saved record, global scope first.
    SavedRequests { requests: Vec<RequestRecord> },

    /// A record sent without an id was stored under `request.id`. Surfaces
    /// reuse that id for later saves; the form itself is left alone.
    RequestSaved { request: RequestRecord },
}

impl CoreMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LoadRequest { .. } => "loadRequest",
            Self::SavedRequests { .. } => "savedRequests",
            Self::RequestSaved { .. } => "requestSaved",
        }
    }
}

/// Scope a `saveRequest` targets.
pub fn save_target(request: &RequestRecord) -> Scope {
    request.scope.unwrap_or(Scope::Global)
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed session message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("failed to encode session message: {0}")]
    Encode(serde_json::Error),
}

/// Parse one inbound message from its JSON text.
pub fn parse_surface_message(bytes: &[u8]) -> Result<SurfaceMessage, ProtocolError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// The `type` tag of a message that may not otherwise parse.
pub fn message_type(bytes: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(bytes).ok()?;
    value.get("type")?.as_str().map(str::to_string)
}

/// Encode one outbound message as a single JSON line (no trailing newline).
pub fn encode_core_message(message: &CoreMessage) -> Result<Vec<u8>, ProtocolError> {
    serde_json::to_vec(message).map_err(ProtocolError::Encode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unit_messages_parse_from_type_tag() {
        assert_eq!(parse_surface_message(br#"{"type":"ready"}"#).unwrap(), SurfaceMessage::Ready);
        assert_eq!(
            parse_surface_message(br#"{"type":"closePanel"}"#).unwrap(),
            SurfaceMessage::ClosePanel
        );
        assert_eq!(
            parse_surface_message(br#"{"type":"clearAllRequests"}"#).unwrap(),
            SurfaceMessage::ClearAllRequests
        );
    }

    #[test]
    fn save_request_carries_opaque_fields() {
        let message = parse_surface_message(
            br#"{"type":"saveRequest","request":{"method":"POST","url":"/items","scope":"project","body":"{}"}}"#,
        )
        .unwrap();
        let SurfaceMessage::SaveRequest { request } = message else {
            panic!("expected saveRequest");
        };
        assert_eq!(save_target(&request), Scope::Project);
        assert_eq!(request.extra["body"], json!("{}"));
        assert!(request.id.is_none());
    }

    #[test]
    fn save_without_scope_targets_global() {
        let request = RequestRecord::new("GET", "/");
        assert_eq!(save_target(&request), Scope::Global);
    }

    #[test]
    fn delete_request_carries_id() {
        let message = parse_surface_message(br#"{"type":"deleteRequest","id":"abc1"}"#).unwrap();
        assert_eq!(message, SurfaceMessage::DeleteRequest { id: "abc1".into() });
        assert_eq!(message.kind(), "deleteRequest");
    }

    #[test]
    fn unknown_type_is_rejected() {
        let error = parse_surface_message(br#"{"type":"sendRequest"}"#).unwrap_err();
        assert!(matches!(error, ProtocolError::Malformed(_)));
    }

    #[test]
    fn save_without_request_is_rejected() {
        assert!(parse_surface_message(br#"{"type":"saveRequest"}"#).is_err());
    }

    #[test]
    fn load_request_wire_shape() {
        let message = CoreMessage::LoadRequest {
            request: RequestRecord::new("GET", "/a").with_id("r1").with_scope(Scope::Global),
        };
        let value: serde_json::Value =
            serde_json::from_slice(&encode_core_message(&message).unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "loadRequest",
                "request": { "id": "r1", "method": "GET", "url": "/a", "scope": "global" }
            })
        );
    }

    #[test]
    fn request_saved_wire_shape() {
        let message = CoreMessage::RequestSaved {
            request: RequestRecord::new("GET", "/a").with_id("r1").with_scope(Scope::Project),
        };
        assert_eq!(message.kind(), "requestSaved");
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["type"], "requestSaved");
        assert_eq!(value["request"]["id"], "r1");
    }

    #[test]
    fn mixed_case_scope_in_save_request_parses() {
        let message = parse_surface_message(
            br#"{"type":"saveRequest","request":{"method":"GET","url":"/p","scope":"Project"}}"#,
        )
        .unwrap();
        let SurfaceMessage::SaveRequest { request } = message else {
            panic!("expected saveRequest");
        };
        assert_eq!(save_target(&request), Scope::Project);
    }

    #[test]
    fn message_type_is_readable_from_unparseable_messages() {
        assert_eq!(message_type(br#"{"type":"saveRequest","request":7}"#).as_deref(), Some("saveRequest"));
        assert_eq!(message_type(b"not json"), None);
        assert_eq!(message_type(br#"{"request":{}}"#), None);
    }

    #[test]
    fn saved_requests_wire_shape() {
        let message = CoreMessage::SavedRequests { requests: vec![] };
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value, json!({ "type": "savedRequests", "requests": [] }));
    }
}
