//! Request and response models for the WAHA REST API.
//!
//! Field names follow WAHA's JSON exactly via serde renames. A few fields
//! that the published schema declares as `object` (`WAMessage.id`, `from`,
//! `to`) are modelled as strings, matching what the server actually sends.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Session name used when none is given.
pub const DEFAULT_SESSION: &str = "default";

fn default_session() -> String {
    DEFAULT_SESSION.to_string()
}

// ═══════════════════════════════════════════════════════════════════════
//  Sessions
// ═══════════════════════════════════════════════════════════════════════

/// Lifecycle state reported by the server for a session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WahaSessionStatus {
    Stopped,
    Starting,
    ScanQrCode,
    Working,
    Failed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhooks: Option<Vec<WebhookConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProxyConfig {
    /// `host:port` of the proxy.
    pub server: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WebhookConfig {
    pub url: String,
    /// Event names, e.g. `message`, `session.status`.
    pub events: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hmac: Option<HmacConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<WebhookRetries>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_headers: Option<Vec<CustomHeader>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HmacConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// Server-side webhook delivery retries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRetries {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_seconds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomHeader {
    pub name: String,
    pub value: String,
}

/// Body of `POST /api/sessions/start`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionStartRequest {
    #[serde(default = "default_session")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<SessionConfig>,
}

impl SessionStartRequest {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: None,
        }
    }
}

impl Default for SessionStartRequest {
    fn default() -> Self {
        Self::named(DEFAULT_SESSION)
    }
}

/// Body of `POST /api/sessions/stop`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionStopRequest {
    #[serde(default = "default_session")]
    pub name: String,
    /// Also log the device out.
    #[serde(default)]
    pub logout: bool,
}

impl SessionStopRequest {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            logout: false,
        }
    }
}

/// Body of `POST /api/sessions/logout`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionLogoutRequest {
    #[serde(default = "default_session")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionDto {
    pub name: String,
    pub status: WahaSessionStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionInfo {
    pub name: String,
    pub status: WahaSessionStatus,
    #[serde(default)]
    pub config: Option<SessionConfig>,
    #[serde(default)]
    pub me: Option<MeInfo>,
}

/// The WhatsApp account a session is logged in as.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MeInfo {
    pub id: String,
    #[serde(default)]
    pub push_name: Option<String>,
}

/// Query of `GET /api/sessions/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ListSessionsQuery {
    /// Include stopped sessions.
    #[serde(default)]
    pub all: bool,
}

// ═══════════════════════════════════════════════════════════════════════
//  Auth
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QrFormat {
    Image,
    Raw,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QrQuery {
    pub format: QrFormat,
}

impl Default for QrQuery {
    fn default() -> Self {
        Self {
            format: QrFormat::Image,
        }
    }
}

/// QR payload returned for `format=raw`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QrCodeValue {
    pub value: String,
}

/// Body of `POST /api/{session}/auth/request-code`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestCodeRequest {
    pub phone_number: String,
    /// Delivery method (`sms`, `voice`) for engines that support it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestCodeResponse {
    pub code: String,
}

// ═══════════════════════════════════════════════════════════════════════
//  Chatting
// ═══════════════════════════════════════════════════════════════════════

/// Body of `POST /api/sendText`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageTextRequest {
    #[serde(rename = "chatId")]
    pub chat_id: String,
    pub text: String,
    #[serde(default = "default_session")]
    pub session: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(rename = "linkPreview", default, skip_serializing_if = "Option::is_none")]
    pub link_preview: Option<bool>,
}

impl MessageTextRequest {
    pub fn new(chat_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            text: text.into(),
            session: default_session(),
            reply_to: None,
            link_preview: None,
        }
    }

    pub fn in_session(mut self, session: impl Into<String>) -> Self {
        self.session = session.into();
        self
    }

    pub fn replying_to(mut self, message_id: impl Into<String>) -> Self {
        self.reply_to = Some(message_id.into());
        self
    }
}

/// Body of `POST /api/sendSeen`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SendSeenRequest {
    pub chat_id: String,
    #[serde(default = "default_session")]
    pub session: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_ids: Option<Vec<String>>,
}

/// A message as returned by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaMessage {
    pub id: String,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub from_me: bool,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub has_media: bool,
    #[serde(default)]
    pub ack: Option<i32>,
    #[serde(default)]
    pub ack_name: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════
//  Contacts
// ═══════════════════════════════════════════════════════════════════════

/// Query of `GET /api/contacts/check-exists`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckNumberQuery {
    pub phone: String,
    #[serde(default = "default_session")]
    pub session: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NumberExistResult {
    pub number_exists: bool,
    #[serde(default)]
    pub chat_id: Option<String>,
}

/// Convert a phone number into a WAHA chat id (`<digits>@c.us`).
///
/// Anything that already carries a server part (`...@c.us`, `...@g.us`)
/// is returned unchanged.
pub fn phone_to_chat_id(phone: &str) -> String {
    if phone.contains('@') {
        return phone.to_string();
    }
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    format!("{}@c.us", digits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_session_status_names() {
        let s: WahaSessionStatus = serde_json::from_str("\"SCAN_QR_CODE\"").unwrap();
        assert_eq!(s, WahaSessionStatus::ScanQrCode);
        assert_eq!(
            serde_json::to_string(&WahaSessionStatus::Working).unwrap(),
            "\"WORKING\""
        );
        let s: WahaSessionStatus = serde_json::from_str("\"REBOOTING\"").unwrap();
        assert_eq!(s, WahaSessionStatus::Unknown);
    }

    #[test]
    fn test_start_request_defaults() {
        let req: SessionStartRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(req.name, "default");
        assert_eq!(serde_json::to_value(&req).unwrap(), json!({"name": "default"}));
    }

    #[test]
    fn test_start_request_with_webhook() {
        let req = SessionStartRequest {
            name: "work".into(),
            config: Some(SessionConfig {
                webhooks: Some(vec![WebhookConfig {
                    url: "https://hooks.example.com/waha".into(),
                    events: vec!["message".into()],
                    hmac: None,
                    retries: Some(WebhookRetries {
                        delay_seconds: Some(2),
                        attempts: Some(5),
                        policy: None,
                    }),
                    custom_headers: None,
                }]),
                ..SessionConfig::default()
            }),
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["config"]["webhooks"][0]["retries"]["delaySeconds"], 2);
        assert!(v["config"].get("proxy").is_none());
    }

    #[test]
    fn test_session_info_parses_me() {
        let info: SessionInfo = serde_json::from_value(json!({
            "name": "default",
            "status": "WORKING",
            "config": {"debug": false},
            "me": {"id": "11111111111@c.us", "pushName": "Alice"},
            "engine": {"engine": "WEBJS"}
        }))
        .unwrap();
        assert_eq!(info.status, WahaSessionStatus::Working);
        assert_eq!(info.me.unwrap().push_name.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_text_request_field_names() {
        let req = MessageTextRequest::new("123@c.us", "hi")
            .in_session("work")
            .replying_to("false_123@c.us_AAAA");
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(
            v,
            json!({
                "chatId": "123@c.us",
                "text": "hi",
                "session": "work",
                "reply_to": "false_123@c.us_AAAA"
            })
        );
    }

    #[test]
    fn test_message_id_is_string() {
        let msg: WaMessage = serde_json::from_value(json!({
            "id": "true_123@c.us_3EB0",
            "timestamp": 1700000000,
            "from": "999@c.us",
            "fromMe": true,
            "to": "123@c.us",
            "body": "hi",
            "hasMedia": false,
            "ack": 1,
            "ackName": "SERVER"
        }))
        .unwrap();
        assert_eq!(msg.id, "true_123@c.us_3EB0");
        assert!(msg.from_me);
        assert_eq!(msg.ack_name.as_deref(), Some("SERVER"));
    }

    #[test]
    fn test_phone_to_chat_id() {
        assert_eq!(phone_to_chat_id("+1 (234) 567-890"), "1234567890@c.us");
        assert_eq!(phone_to_chat_id("1234@g.us"), "1234@g.us");
    }
}
