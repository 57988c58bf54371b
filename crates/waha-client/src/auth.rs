//! Pairing a session with a phone: QR codes and pairing codes.

use crate::api_client::WahaClient;
use crate::endpoint::{Endpoint, EndpointCall};
use crate::error::WahaResult;
use crate::method::HttpMethod;
use crate::types::*;
use bytes::Bytes;
use lazy_static::lazy_static;
use log::info;
use serde_json::json;

lazy_static! {
    static ref QR_IMAGE: Endpoint = Endpoint::new("/api/{session}/auth/qr", HttpMethod::Get, 200)
        .with_param_defaults::<QrQuery>(json!({ "format": "image" }))
        .with_accept("image/png")
        .with_description("QR code for pairing, as a PNG");
    static ref QR_RAW: Endpoint = Endpoint::new("/api/{session}/auth/qr", HttpMethod::Get, 200)
        .with_param_defaults::<QrQuery>(json!({ "format": "raw" }))
        .with_description("QR code for pairing, as its text value");
    static ref REQUEST_CODE: Endpoint =
        Endpoint::new("/api/{session}/auth/request-code", HttpMethod::Post, 201)
            .with_body::<RequestCodeRequest>()
            .with_description("Request a pairing code for a phone number");
}

#[derive(Debug, Clone)]
pub struct WahaAuth {
    client: WahaClient,
}

impl WahaAuth {
    pub fn new(client: WahaClient) -> Self {
        Self { client }
    }

    /// QR code as an image (PNG bytes).
    pub async fn qr_image(&self, session: &str) -> WahaResult<Bytes> {
        QR_IMAGE
            .fetch_bytes(&self.client, EndpointCall::new().arg("session", session))
            .await
    }

    /// QR code as its raw text value, for rendering locally.
    pub async fn qr_raw(&self, session: &str) -> WahaResult<QrCodeValue> {
        QR_RAW
            .fetch(&self.client, EndpointCall::new().arg("session", session))
            .await
    }

    /// Ask the server for a pairing code to enter on the phone.
    pub async fn request_code(
        &self,
        session: &str,
        req: RequestCodeRequest,
    ) -> WahaResult<RequestCodeResponse> {
        let resp: RequestCodeResponse = REQUEST_CODE
            .fetch(
                &self.client,
                EndpointCall::new().arg("session", session).body(&req)?,
            )
            .await?;
        info!("Pairing code requested for session '{}'", session);
        Ok(resp)
    }
}
