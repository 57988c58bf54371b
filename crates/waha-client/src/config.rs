//! Connection settings for a WAHA instance.

use crate::error::{WahaError, WahaResult};
use serde::{Deserialize, Serialize};

pub const ENV_URL: &str = "WAHA_URL";
pub const ENV_API_KEY: &str = "WAHA_API_KEY";
pub const ENV_TIMEOUT_SEC: &str = "WAHA_TIMEOUT_SEC";

/// Where the WAHA server lives and how to talk to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WahaConfig {
    /// Server root, e.g. `http://localhost:3000`.
    #[serde(default = "default_base_url", alias = "waha_url", alias = "wahaUrl")]
    pub base_url: String,
    /// Sent as `X-Api-Key` when set.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Timeout in seconds for API calls.
    #[serde(default = "default_timeout")]
    pub timeout_sec: u32,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}
fn default_timeout() -> u32 {
    30
}

impl Default for WahaConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_sec: default_timeout(),
        }
    }
}

impl WahaConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Read `WAHA_URL`, `WAHA_API_KEY` and `WAHA_TIMEOUT_SEC`, falling back
    /// to defaults for anything unset, and validate the result.
    pub fn from_env() -> WahaResult<Self> {
        let cfg = Self::from_lookup(|key| std::env::var(key).ok())?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build settings from `lookup` (an environment stand-in) without
    /// validating them, so callers can layer overrides first.
    ///
    /// Unset and blank variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> WahaResult<Self> {
        let mut cfg = Self::default();
        if let Some(url) = lookup(ENV_URL).filter(|v| !v.trim().is_empty()) {
            cfg.base_url = url.trim().to_string();
        }
        cfg.api_key = lookup(ENV_API_KEY).filter(|v| !v.is_empty());
        if let Some(raw) = lookup(ENV_TIMEOUT_SEC).filter(|v| !v.trim().is_empty()) {
            cfg.timeout_sec = raw.trim().parse().map_err(|e| {
                WahaError::config(format!("{}={:?} is not a number: {}", ENV_TIMEOUT_SEC, raw, e))
            })?;
        }
        Ok(cfg)
    }

    pub fn validate(&self) -> WahaResult<()> {
        let url = url::Url::parse(&self.base_url).map_err(|e| WahaError::Url {
            url: self.base_url.clone(),
            source: e,
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(WahaError::config(format!(
                "base URL must be http or https, got {}",
                self.base_url
            )));
        }
        if self.timeout_sec == 0 {
            return Err(WahaError::config("timeout must be at least one second"));
        }
        Ok(())
    }
}
