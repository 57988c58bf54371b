//! Crate-level error types for the WAHA client.

use crate::method::HttpMethod;
use log::{debug, warn};
use serde_json::Value;
use thiserror::Error;

/// Alias for `Result<T, WahaError>`.
pub type WahaResult<T> = Result<T, WahaError>;

/// Maximum number of characters of a non-JSON error body kept on the error.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Uniform error type used across the WAHA client.
#[derive(Debug, Error)]
pub enum WahaError {
    /// The API answered with an unexpected status and no usable JSON body.
    #[error("API request to {url} failed with status code {status}")]
    Status {
        url: String,
        status: u16,
        expected: u16,
        /// Text body (truncated), if any.
        body: String,
    },

    /// The API answered with an unexpected status and a JSON error body.
    #[error("API request to {url} failed with status code {status} and error description {body}")]
    Api {
        url: String,
        status: u16,
        expected: u16,
        body: Value,
    },

    /// The response did not match the expected model.
    #[error("response from {url} did not match the expected model: {source}")]
    Validation {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Endpoint defaults could not be turned into the request model.
    #[error("default {what} for {path} are not valid for the model: {source}")]
    InvalidDefaults {
        path: String,
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A body or params were passed to an endpoint that does not take them.
    #[error("endpoint {path} does not accept {what}")]
    Payload { path: String, what: &'static str },

    /// The endpoint needs a body or params and has no defaults to fall back on.
    #[error("endpoint {path} requires {what}")]
    MissingPayload { path: String, what: &'static str },

    #[error("query parameters must be a JSON object, got {0}")]
    InvalidQuery(String),

    #[error("method {0} not supported, allowed are {allowed}", allowed = HttpMethod::allowed_list())]
    UnsupportedMethod(String),

    #[error("expected path params {expected:?}, got {got:?}")]
    PathParams { expected: Vec<String>, got: Vec<String> },

    #[error("invalid value {value:?} for path param {name}")]
    InvalidPathValue { name: String, value: String },

    #[error("invalid URL {url}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("not configured: {0}")]
    NotConfigured(String),

    /// An OpenAPI document did not have the expected shape.
    #[error("schema error: {0}")]
    Schema(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WahaError {
    pub fn not_configured(msg: impl Into<String>) -> Self {
        Self::NotConfigured(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    /// Build the error for a response whose status did not match.
    ///
    /// A JSON body is kept as-is on [`WahaError::Api`]; anything else
    /// (non-JSON content type, or JSON that fails to decode) yields
    /// [`WahaError::Status`].
    pub fn from_response(
        url: &str,
        status: u16,
        expected: u16,
        content_type: Option<&str>,
        body: &[u8],
    ) -> Self {
        let is_json = content_type
            .map(|ct| ct.to_ascii_lowercase().contains("json"))
            .unwrap_or(false);

        if is_json {
            match serde_json::from_slice::<Value>(body) {
                Ok(json) => {
                    return Self::Api {
                        url: url.to_string(),
                        status,
                        expected,
                        body: json,
                    }
                }
                Err(e) => {
                    warn!(
                        "API response contained invalid json, url: {}, status: {}: {}",
                        url, status, e
                    );
                }
            }
        } else {
            debug!("No JSON response from API ({} {})", status, url);
        }

        Self::Status {
            url: url.to_string(),
            status,
            expected,
            body: String::from_utf8_lossy(body)
                .chars()
                .take(MAX_ERROR_BODY_CHARS)
                .collect(),
        }
    }

    /// HTTP status of a failed API call.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } | Self::Api { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Status the endpoint documents as success.
    pub fn expected_status(&self) -> Option<u16> {
        match self {
            Self::Status { expected, .. } | Self::Api { expected, .. } => Some(*expected),
            _ => None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Status { url, .. }
            | Self::Api { url, .. }
            | Self::Validation { url, .. }
            | Self::Url { url, .. } => Some(url.as_str()),
            _ => None,
        }
    }

    /// JSON error description returned by the API, if any.
    pub fn error_body(&self) -> Option<&Value> {
        match self {
            Self::Api { body, .. } => Some(body),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_body_becomes_api_error() {
        let body = br#"{"statusCode":422,"message":"Session already exists"}"#;
        let err = WahaError::from_response(
            "http://localhost:3000/api/sessions/start",
            422,
            201,
            Some("application/json; charset=utf-8"),
            body,
        );
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.expected_status(), Some(201));
        assert_eq!(
            err.error_body(),
            Some(&json!({"statusCode": 422, "message": "Session already exists"}))
        );
        assert!(err.to_string().contains("error description"));
    }

    #[test]
    fn test_plain_body_becomes_status_error() {
        let err = WahaError::from_response(
            "http://localhost:3000/api/nope",
            404,
            200,
            Some("text/html"),
            b"Not Found",
        );
        match &err {
            WahaError::Status { body, .. } => assert_eq!(body, "Not Found"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "API request to http://localhost:3000/api/nope failed with status code 404"
        );
        assert!(err.error_body().is_none());
    }

    #[test]
    fn test_broken_json_falls_back_to_status() {
        let err = WahaError::from_response("u", 500, 200, Some("application/json"), b"{oops");
        assert!(matches!(err, WahaError::Status { status: 500, .. }));
    }

    #[test]
    fn test_missing_content_type_is_not_json() {
        let err = WahaError::from_response("u", 500, 200, None, br#"{"a":1}"#);
        assert!(matches!(err, WahaError::Status { .. }));
    }

    #[test]
    fn test_long_body_truncated() {
        let body = "x".repeat(2_000);
        let err = WahaError::from_response("u", 502, 200, Some("text/plain"), body.as_bytes());
        match err {
            WahaError::Status { body, .. } => assert_eq!(body.len(), MAX_ERROR_BODY_CHARS),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_method_lists_allowed() {
        let msg = WahaError::UnsupportedMethod("FETCH".into()).to_string();
        assert!(msg.contains("FETCH"));
        assert!(msg.contains("GET"));
        assert!(msg.contains("PATCH"));
    }
}
