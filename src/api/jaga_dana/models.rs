use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::Transaction;

/// Request body for POST /generate-sar
#[derive(Debug, Clone, Serialize)]
pub struct SarRequest<'a> {
    pub transaction: &'a Transaction,
}

/// Response from POST /generate-sar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SarResponse {
    pub sar_draft: String,
}

/// Response from GET /
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

/// Error body the backend sends with non-success responses.
///
/// `detail` is usually a string, but validation failures carry a list of
/// error objects instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: Option<Value>,
}

impl ErrorResponse {
    /// Text to show for `detail`: strings as-is, anything else as compact JSON
    pub fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::Null => None,
            Value::String(text) if text.is_empty() => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Error type for backend operations
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Non-success status; carries the backend's `detail` text when present
    #[error("{detail}")]
    Status { status: u16, detail: String },
    /// Network/request error
    #[error("Request failed: {0}")]
    RequestError(String),
    /// Deserialization error
    #[error("Failed to parse response: {0}")]
    DeserializationError(String),
    /// The stream ended or broke mid-connection
    #[error("Stream error: {0}")]
    StreamError(String),
}

impl ApiError {
    /// Detail text used when the backend gives no `detail` of its own
    pub fn fallback_detail(status: u16) -> String {
        format!("HTTP error! status: {}", status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn detail_of(body: Value) -> Option<String> {
        serde_json::from_value::<ErrorResponse>(body)
            .unwrap()
            .detail_text()
    }

    #[test]
    fn test_detail_text() {
        assert_eq!(detail_of(json!({ "detail": "backend down" })).as_deref(), Some("backend down"));
        assert_eq!(
            detail_of(json!({ "detail": [{ "msg": "field required" }] })).as_deref(),
            Some(r#"[{"msg":"field required"}]"#)
        );
        assert_eq!(detail_of(json!({ "detail": "" })), None);
        assert_eq!(detail_of(json!({ "detail": null })), None);
        assert_eq!(detail_of(json!({})), None);
    }
}
