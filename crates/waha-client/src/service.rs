//! High-level WAHA service facade.
//!
//! `WahaService` owns the configured client and hands out the endpoint
//! groups. Until [`WahaService::configure`] succeeds every accessor
//! returns [`WahaError::NotConfigured`].

use crate::api_client::WahaClient;
use crate::auth::WahaAuth;
use crate::chatting::WahaChatting;
use crate::config::WahaConfig;
use crate::contacts::WahaContacts;
use crate::error::{WahaError, WahaResult};
use crate::sessions::WahaSessions;
use crate::types::*;
use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared state type.
pub type WahaServiceState = Arc<Mutex<WahaService>>;

pub struct WahaService {
    config: Option<WahaConfig>,
    client: Option<WahaClient>,
    sessions: Option<WahaSessions>,
    auth: Option<WahaAuth>,
    chatting: Option<WahaChatting>,
    contacts: Option<WahaContacts>,
}

impl WahaService {
    /// Create an unconfigured service.
    pub fn new() -> Self {
        Self {
            config: None,
            client: None,
            sessions: None,
            auth: None,
            chatting: None,
            contacts: None,
        }
    }

    /// Build a configured service in one step.
    pub fn with_config(config: WahaConfig) -> WahaResult<Self> {
        let mut svc = Self::new();
        svc.configure(config)?;
        Ok(svc)
    }

    pub fn into_state(self) -> WahaServiceState {
        Arc::new(Mutex::new(self))
    }

    // ─── Configuration ───────────────────────────────────────────────

    pub fn configure(&mut self, config: WahaConfig) -> WahaResult<()> {
        let client = WahaClient::new(&config)?;
        self.install(config, client);
        Ok(())
    }

    /// Configure around a caller-owned reqwest client.
    pub fn configure_with_http_client(
        &mut self,
        config: WahaConfig,
        http: reqwest::Client,
    ) -> WahaResult<()> {
        let client = WahaClient::with_http_client(&config, http)?;
        self.install(config, client);
        Ok(())
    }

    fn install(&mut self, config: WahaConfig, client: WahaClient) {
        self.sessions = Some(WahaSessions::new(client.clone()));
        self.auth = Some(WahaAuth::new(client.clone()));
        self.chatting = Some(WahaChatting::new(client.clone()));
        self.contacts = Some(WahaContacts::new(client.clone()));
        self.client = Some(client);
        info!("WAHA client configured for {}", config.base_url);
        self.config = Some(config);
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    pub fn config(&self) -> Option<&WahaConfig> {
        self.config.as_ref()
    }

    // ─── Accessors ───────────────────────────────────────────────────

    pub fn client(&self) -> WahaResult<&WahaClient> {
        self.client
            .as_ref()
            .ok_or_else(|| WahaError::not_configured("WAHA client not configured"))
    }

    pub fn sessions(&self) -> WahaResult<&WahaSessions> {
        self.sessions
            .as_ref()
            .ok_or_else(|| WahaError::not_configured("Sessions not initialized"))
    }

    pub fn auth(&self) -> WahaResult<&WahaAuth> {
        self.auth
            .as_ref()
            .ok_or_else(|| WahaError::not_configured("Auth not initialized"))
    }

    pub fn chatting(&self) -> WahaResult<&WahaChatting> {
        self.chatting
            .as_ref()
            .ok_or_else(|| WahaError::not_configured("Chatting not initialized"))
    }

    pub fn contacts(&self) -> WahaResult<&WahaContacts> {
        self.contacts
            .as_ref()
            .ok_or_else(|| WahaError::not_configured("Contacts not initialized"))
    }

    // ─── Convenience ─────────────────────────────────────────────────

    /// Send `text` to a phone number (or chat id) from `session`.
    pub async fn send_text_to_phone(
        &self,
        session: &str,
        phone: &str,
        text: &str,
    ) -> WahaResult<WaMessage> {
        let req = MessageTextRequest::new(phone_to_chat_id(phone), text).in_session(session);
        self.chatting()?.send_text(&req).await
    }
}

impl Default for WahaService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_service() {
        let svc = WahaService::new();
        assert!(!svc.is_configured());
        assert!(svc.config().is_none());
    }

    #[test]
    fn test_accessors_fail_unconfigured() {
        let svc = WahaService::new();
        assert!(matches!(svc.sessions(), Err(WahaError::NotConfigured(_))));
        assert!(svc.auth().is_err());
        assert!(svc.chatting().is_err());
        assert!(svc.contacts().is_err());
        assert!(svc.client().is_err());
    }

    #[test]
    fn test_configure() {
        let mut svc = WahaService::new();
        svc.configure(WahaConfig::default()).unwrap();
        assert!(svc.is_configured());
        assert!(svc.sessions().is_ok());
        assert!(svc.auth().is_ok());
        assert!(svc.chatting().is_ok());
        assert!(svc.contacts().is_ok());
        assert_eq!(svc.config().unwrap().base_url, "http://localhost:3000");
    }

    #[test]
    fn test_configure_rejects_bad_url() {
        let mut svc = WahaService::new();
        assert!(svc.configure(WahaConfig::new("nope")).is_err());
        assert!(!svc.is_configured());
    }

    #[test]
    fn test_send_without_config() {
        let svc = WahaService::new();
        let err = tokio_test::block_on(svc.send_text_to_phone("default", "+1 555", "hi"))
            .unwrap_err();
        assert!(matches!(err, WahaError::NotConfigured(_)));
    }

    #[tokio::test]
    async fn test_shared_state() {
        let state = WahaService::with_config(WahaConfig::default())
            .unwrap()
            .into_state();
        let svc = state.lock().await;
        assert!(svc.is_configured());
    }
}
