//! Sending messages.

use crate::api_client::WahaClient;
use crate::endpoint::{Endpoint, EndpointCall};
use crate::error::WahaResult;
use crate::method::HttpMethod;
use crate::types::*;
use lazy_static::lazy_static;
use log::debug;

lazy_static! {
    static ref SEND_TEXT: Endpoint =
        Endpoint::new("/api/sendText", HttpMethod::Post, 201).with_body::<MessageTextRequest>();
    static ref SEND_SEEN: Endpoint =
        Endpoint::new("/api/sendSeen", HttpMethod::Post, 201).with_body::<SendSeenRequest>();
}

#[derive(Debug, Clone)]
pub struct WahaChatting {
    client: WahaClient,
}

impl WahaChatting {
    pub fn new(client: WahaClient) -> Self {
        Self { client }
    }

    pub async fn send_text(&self, req: &MessageTextRequest) -> WahaResult<WaMessage> {
        let msg: WaMessage = SEND_TEXT
            .fetch(&self.client, EndpointCall::new().body(req)?)
            .await?;
        debug!("Sent text {} to {} via '{}'", msg.id, req.chat_id, req.session);
        Ok(msg)
    }

    /// Mark messages in a chat as read.
    pub async fn send_seen(&self, req: &SendSeenRequest) -> WahaResult<()> {
        SEND_SEEN
            .send(&self.client, EndpointCall::new().body(req)?)
            .await?;
        Ok(())
    }
}
