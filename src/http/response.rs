//! Response envelopes and the generic server-error path.
//!
//! # Envelope shapes
//! ```text
//! success: {"status": "ok", <extra keys>}
//! error:   {"status": "error", "details": "<message>"}
//! ```

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use std::path::PathBuf;
use thiserror::Error;

use crate::content::codec::EncodingError;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
const BINARY_CONTENT_TYPE: &str = "application/octet-stream";

/// Uniform wrapper for JSON responses.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Ok { data: Map<String, Value> },
    Error { details: String },
}

impl Envelope {
    /// Success envelope without payload.
    pub fn ok() -> Self {
        Envelope::Ok { data: Map::new() }
    }

    /// Success envelope carrying one named field.
    pub fn ok_with_data<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<Self, serde_json::Error> {
        let mut data = Map::new();
        data.insert(key.to_string(), serde_json::to_value(value)?);
        Ok(Envelope::Ok { data })
    }

    pub fn error(details: impl Into<String>) -> Self {
        Envelope::Error {
            details: details.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Envelope::Ok { .. })
    }
}

impl Serialize for Envelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Envelope::Ok { data } => {
                let mut map = serializer.serialize_map(Some(data.len() + 1))?;
                map.serialize_entry("status", "ok")?;
                for (key, value) in data {
                    if key != "status" {
                        map.serialize_entry(key, value)?;
                    }
                }
                map.end()
            }
            Envelope::Error { details } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("status", "error")?;
                map.serialize_entry("details", details)?;
                map.end()
            }
        }
    }
}

/// Failures a handler can hit while producing a response.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The response body could not be produced.
    #[error("failed to write response: {0}")]
    ResponseWrite(#[from] serde_json::Error),

    #[error("cannot encode rules static content: {0}")]
    Encoding(#[from] EncodingError),

    #[error("cannot create absolute path of OpenAPI spec file {path:?}: {source}")]
    PathResolution {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ServerError {
    pub fn kind(&self) -> &'static str {
        match self {
            ServerError::ResponseWrite(_) => "response_write",
            ServerError::Encoding(e) => e.kind(),
            ServerError::PathResolution { .. } => "path_resolution",
        }
    }
}

/// Serialize an envelope into a 200 JSON response.
pub fn send_ok(envelope: &Envelope) -> Result<Response, ServerError> {
    send(StatusCode::OK, envelope)
}

/// Serialize an envelope into a JSON response with the given status.
pub fn send(status: StatusCode, envelope: &Envelope) -> Result<Response, ServerError> {
    let body = serde_json::to_vec(envelope)?;
    Ok(with_content_type(status, body, JSON_CONTENT_TYPE))
}

/// Raw binary response.
pub fn send_bytes(status: StatusCode, body: Vec<u8>) -> Response {
    with_content_type(status, body, BINARY_CONTENT_TYPE)
}

/// Generic server-error path. Every handler failure ends here after being logged.
pub fn handle_server_error(err: &ServerError) -> Response {
    let envelope = Envelope::error(err.to_string());
    match serde_json::to_vec(&envelope) {
        Ok(body) => with_content_type(StatusCode::INTERNAL_SERVER_ERROR, body, JSON_CONTENT_TYPE),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

fn with_content_type(status: StatusCode, body: Vec<u8>, content_type: &'static str) -> Response {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_envelope_has_only_status() {
        assert_eq!(serde_json::to_value(Envelope::ok()).unwrap(), json!({"status": "ok"}));
    }

    #[test]
    fn test_ok_with_data() {
        let envelope = Envelope::ok_with_data("rules", &vec!["rule.a", "rule.b"]).unwrap();
        assert!(envelope.is_ok());
        assert_eq!(
            serde_json::to_string(&envelope).unwrap(),
            r#"{"status":"ok","rules":["rule.a","rule.b"]}"#
        );
    }

    #[test]
    fn test_data_cannot_override_status() {
        let envelope = Envelope::ok_with_data("status", "broken").unwrap();
        assert_eq!(serde_json::to_value(&envelope).unwrap(), json!({"status": "ok"}));
    }

    #[test]
    fn test_error_envelope() {
        assert_eq!(
            serde_json::to_value(Envelope::error("boom")).unwrap(),
            json!({"status": "error", "details": "boom"})
        );
    }

    #[test]
    fn test_unrepresentable_payload_fails() {
        use std::collections::HashMap;
        // JSON object keys must be strings
        let mut payload = HashMap::new();
        payload.insert(vec![1u8], "value");
        assert!(Envelope::ok_with_data("data", &payload).is_err());
    }

    #[test]
    fn test_send_ok_sets_json_content_type() {
        let response = send_ok(&Envelope::ok()).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            JSON_CONTENT_TYPE
        );
    }

    #[test]
    fn test_server_error_response() {
        let err = ServerError::Encoding(EncodingError::TooLarge { limit: 8 });
        let response = handle_server_error(&err);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let binary = send_bytes(StatusCode::OK, vec![1, 2, 3]);
        assert_eq!(
            binary.headers().get(header::CONTENT_TYPE).unwrap(),
            BINARY_CONTENT_TYPE
        );
    }
}
