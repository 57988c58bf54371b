//! HTTP client for a WAHA server.
//!
//! Owns the reqwest client, builds URLs from the configured base, attaches
//! the API key, and turns responses into either a checked body or a
//! [`WahaError`].

use crate::config::WahaConfig;
use crate::error::{WahaError, WahaResult};
use crate::method::HttpMethod;
use bytes::Bytes;
use log::debug;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

pub const API_KEY_HEADER: &str = "X-Api-Key";

/// `Accept` sent unless an endpoint asks for another media type.
pub const DEFAULT_ACCEPT: &str = "application/json";

/// Low-level HTTP client for the WAHA REST API.
#[derive(Debug, Clone)]
pub struct WahaClient {
    http: reqwest::Client,
    config: WahaConfig,
}

/// A response that has been fully read.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl RawResponse {
    /// Pass the response through if `status == expected`, else turn it
    /// into an error.
    pub fn expect_status(self, expected: u16) -> WahaResult<Self> {
        if self.status == expected {
            return Ok(self);
        }
        Err(WahaError::from_response(
            &self.url,
            self.status,
            expected,
            self.content_type.as_deref(),
            &self.body,
        ))
    }

    /// Parse the body into `T`. An empty body is read as JSON `null`.
    pub fn json<T: DeserializeOwned>(&self) -> WahaResult<T> {
        let parsed = if self.body.iter().all(|b| b.is_ascii_whitespace()) {
            serde_json::from_value(Value::Null)
        } else {
            serde_json::from_slice(&self.body)
        };
        parsed.map_err(|e| WahaError::Validation {
            url: self.url.clone(),
            source: e,
        })
    }
}

impl WahaClient {
    /// Create a new client from configuration.
    pub fn new(config: &WahaConfig) -> WahaResult<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_sec as u64))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    /// Reuse an existing reqwest client (and its connection pool).
    pub fn with_http_client(config: &WahaConfig, http: reqwest::Client) -> WahaResult<Self> {
        config.validate()?;
        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &WahaConfig {
        &self.config
    }

    /// `{base_url}{path}` without doubled slashes.
    pub fn url(&self, path: &str) -> WahaResult<reqwest::Url> {
        let base = self.config.base_url.trim_end_matches('/');
        let full = if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        };
        reqwest::Url::parse(&full).map_err(|e| WahaError::Url {
            url: full,
            source: e,
        })
    }

    /// Send one request and read the whole response.
    ///
    /// `accept` replaces the default `application/json` media type. The
    /// status is not checked here; see [`RawResponse::expect_status`].
    pub async fn execute(
        &self,
        method: HttpMethod,
        path: &str,
        query: Option<&Value>,
        body: Option<&Value>,
        accept: Option<&str>,
    ) -> WahaResult<RawResponse> {
        let mut url = self.url(path)?;
        if let Some(q) = query {
            let pairs = query_pairs(q)?;
            if !pairs.is_empty() {
                url.query_pairs_mut().extend_pairs(pairs);
            }
        }
        debug!("{} {}", method, url);

        let mut req = self
            .http
            .request(method.into(), url.clone())
            .header(ACCEPT, accept.unwrap_or(DEFAULT_ACCEPT));

        if let Some(ref key) = self.config.api_key {
            req = req.header(API_KEY_HEADER, key.as_str());
        }
        if let Some(b) = body {
            req = req.json(b);
        }

        let resp = req.send().await?;
        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = resp.bytes().await?;
        debug!("{} {} -> {} ({} bytes)", method, url, status, body.len());

        Ok(RawResponse {
            url: url.to_string(),
            status,
            content_type,
            body,
        })
    }
}

/// Flatten a JSON object into query pairs.
///
/// Nulls are dropped, scalars stringified, arrays become repeated keys.
pub fn query_pairs(query: &Value) -> WahaResult<Vec<(String, String)>> {
    let obj = match query {
        Value::Null => return Ok(Vec::new()),
        Value::Object(obj) => obj,
        other => return Err(WahaError::InvalidQuery(other.to_string())),
    };

    let mut pairs = Vec::new();
    for (key, value) in obj {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    if let Some(s) = scalar_to_string(item) {
                        pairs.push((key.clone(), s));
                    }
                }
            }
            other => {
                if let Some(s) = scalar_to_string(other) {
                    pairs.push((key.clone(), s));
                }
            }
        }
    }
    Ok(pairs)
}

fn scalar_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null => None,
        nested => Some(nested.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(base: &str) -> WahaClient {
        WahaClient::new(&WahaConfig::new(base)).unwrap()
    }

    #[test]
    fn test_url_builder() {
        let c = client("http://localhost:3000");
        assert_eq!(
            c.url("/api/sessions/start").unwrap().as_str(),
            "http://localhost:3000/api/sessions/start"
        );

        let c = client("http://localhost:3000/");
        assert_eq!(
            c.url("/api/sessions/").unwrap().as_str(),
            "http://localhost:3000/api/sessions/"
        );
        assert_eq!(
            c.url("api/sendText").unwrap().as_str(),
            "http://localhost:3000/api/sendText"
        );
    }

    #[test]
    fn test_url_keeps_base_path_prefix() {
        let c = client("https://gw.example.com/waha");
        assert_eq!(
            c.url("/api/sendText").unwrap().as_str(),
            "https://gw.example.com/waha/api/sendText"
        );
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        assert!(WahaClient::new(&WahaConfig::new("nope")).is_err());
    }

    #[test]
    fn test_query_pairs() {
        let pairs = query_pairs(&json!({
            "all": true,
            "limit": 10,
            "phone": "123",
            "skip": null,
            "ids": ["a", "b"]
        }))
        .unwrap();
        assert!(pairs.contains(&("all".into(), "true".into())));
        assert!(pairs.contains(&("limit".into(), "10".into())));
        assert!(pairs.contains(&("phone".into(), "123".into())));
        assert!(pairs.contains(&("ids".into(), "a".into())));
        assert!(pairs.contains(&("ids".into(), "b".into())));
        assert!(!pairs.iter().any(|(k, _)| k == "skip"));
        assert!(query_pairs(&Value::Null).unwrap().is_empty());
        assert!(query_pairs(&json!([1, 2])).is_err());
    }

    fn raw(status: u16, ct: Option<&str>, body: &'static [u8]) -> RawResponse {
        RawResponse {
            url: "http://localhost:3000/api/x".into(),
            status,
            content_type: ct.map(String::from),
            body: Bytes::from_static(body),
        }
    }

    #[test]
    fn test_expect_status_exact_match() {
        assert!(raw(201, None, b"").expect_status(201).is_ok());
        // Any other success code is still a mismatch.
        let err = raw(200, Some("application/json"), b"{}")
            .expect_status(201)
            .unwrap_err();
        assert_eq!(err.status(), Some(200));
        assert_eq!(err.expected_status(), Some(201));
    }

    #[test]
    fn test_json_empty_body_is_null() {
        let v: Option<Value> = raw(200, None, b"  ").json().unwrap();
        assert!(v.is_none());
        let err = raw(200, None, b"").json::<Vec<u8>>().unwrap_err();
        assert!(matches!(err, WahaError::Validation { .. }));
    }
}
