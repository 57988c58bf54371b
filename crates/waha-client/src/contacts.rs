//! Contact lookups.
//!
//! Check whether phone numbers are registered on WhatsApp before
//! sending messages.

use crate::api_client::WahaClient;
use crate::endpoint::{Endpoint, EndpointCall};
use crate::error::WahaResult;
use crate::method::HttpMethod;
use crate::types::*;
use lazy_static::lazy_static;
use log::debug;

lazy_static! {
    static ref CHECK_EXISTS: Endpoint =
        Endpoint::new("/api/contacts/check-exists", HttpMethod::Get, 200)
            .with_params::<CheckNumberQuery>();
}

#[derive(Debug, Clone)]
pub struct WahaContacts {
    client: WahaClient,
}

impl WahaContacts {
    pub fn new(client: WahaClient) -> Self {
        Self { client }
    }

    /// Whether `phone` has a WhatsApp account, and its chat id if so.
    pub async fn check_exists(&self, phone: &str, session: &str) -> WahaResult<NumberExistResult> {
        let query = CheckNumberQuery {
            phone: phone.chars().filter(|c| c.is_ascii_digit()).collect(),
            session: session.to_string(),
        };
        let result: NumberExistResult = CHECK_EXISTS
            .fetch(&self.client, EndpointCall::new().params(&query)?)
            .await?;
        debug!("check-exists {} -> {}", query.phone, result.number_exists);
        Ok(result)
    }

    /// Shorthand for `check_exists(..).number_exists`.
    pub async fn is_on_whatsapp(&self, phone: &str, session: &str) -> WahaResult<bool> {
        Ok(self.check_exists(phone, session).await?.number_exists)
    }
}
