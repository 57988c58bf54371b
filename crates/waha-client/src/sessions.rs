//! Session lifecycle: start, stop, logout, list, and account info.

use crate::api_client::WahaClient;
use crate::endpoint::{Endpoint, EndpointCall};
use crate::error::WahaResult;
use crate::method::HttpMethod;
use crate::types::*;
use lazy_static::lazy_static;
use log::info;
use serde_json::json;

lazy_static! {
    static ref START: Endpoint = Endpoint::new("/api/sessions/start", HttpMethod::Post, 201)
        .with_body_defaults::<SessionStartRequest>(json!({ "name": DEFAULT_SESSION }))
        .with_description("Start a session");
    static ref STOP: Endpoint = Endpoint::new("/api/sessions/stop", HttpMethod::Post, 201)
        .with_body_defaults::<SessionStopRequest>(json!({ "name": DEFAULT_SESSION }))
        .with_description("Stop a session");
    static ref LOGOUT: Endpoint = Endpoint::new("/api/sessions/logout", HttpMethod::Post, 201)
        .with_body_defaults::<SessionLogoutRequest>(json!({ "name": DEFAULT_SESSION }))
        .with_description("Log a session out and drop its credentials");
    static ref LIST: Endpoint = Endpoint::new("/api/sessions/", HttpMethod::Get, 200)
        .with_param_defaults::<ListSessionsQuery>(json!({ "all": false }))
        .with_description("List sessions");
    static ref ME: Endpoint = Endpoint::new("/api/sessions/{session}/me", HttpMethod::Get, 200)
        .with_description("Account the session is logged in as");
}

/// Session-related API operations.
#[derive(Debug, Clone)]
pub struct WahaSessions {
    client: WahaClient,
}

impl WahaSessions {
    pub fn new(client: WahaClient) -> Self {
        Self { client }
    }

    /// Start a session; `None` starts `"default"`.
    pub async fn start(&self, req: Option<SessionStartRequest>) -> WahaResult<SessionDto> {
        let body: SessionStartRequest = START.resolve_body(req)?;
        let dto: SessionDto = START
            .fetch(&self.client, EndpointCall::new().body(&body)?)
            .await?;
        info!("Started WAHA session '{}' ({:?})", dto.name, dto.status);
        Ok(dto)
    }

    /// Stop a session; `None` stops `"default"`.
    pub async fn stop(&self, req: Option<SessionStopRequest>) -> WahaResult<()> {
        let body: SessionStopRequest = STOP.resolve_body(req)?;
        STOP.send(&self.client, EndpointCall::new().body(&body)?).await?;
        info!("Stopped WAHA session '{}' (logout={})", body.name, body.logout);
        Ok(())
    }

    pub async fn logout(&self, req: Option<SessionLogoutRequest>) -> WahaResult<()> {
        let body: SessionLogoutRequest = LOGOUT.resolve_body(req)?;
        LOGOUT.send(&self.client, EndpointCall::new().body(&body)?).await?;
        info!("Logged out WAHA session '{}'", body.name);
        Ok(())
    }

    /// Running sessions.
    pub async fn list(&self) -> WahaResult<Vec<SessionInfo>> {
        let query: ListSessionsQuery = LIST.resolve_params(None)?;
        LIST.fetch(&self.client, EndpointCall::new().params(&query)?).await
    }

    /// All sessions when `all` is set, stopped ones included.
    pub async fn list_all(&self, all: bool) -> WahaResult<Vec<SessionInfo>> {
        let query = ListSessionsQuery { all };
        LIST.fetch(&self.client, EndpointCall::new().params(&query)?).await
    }

    /// `None` while the session is not authenticated.
    pub async fn me(&self, session: &str) -> WahaResult<Option<MeInfo>> {
        ME.fetch(&self.client, EndpointCall::new().arg("session", session)).await
    }
}
