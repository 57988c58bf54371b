//! # waha-client: WhatsApp HTTP API (WAHA) client
//!
//! Async wrapper around a self-hosted WAHA server.
//!
//! ## Capabilities
//!
//! - **Endpoints** – declarative [`Endpoint`] descriptors (path template,
//!   method, expected status, default body / query) turned into typed calls.
//! - **Sessions** – start, stop, logout, list, and account info.
//! - **Auth** – QR code (image or raw value) and pairing-code requests.
//! - **Chatting** – send text, mark as seen.
//! - **Contacts** – check whether a number is on WhatsApp.
//! - **OpenAPI tooling** – format `openapi.json` and retype mislabeled
//!   `object` properties to `string` before model generation.

pub mod types;
pub mod error;
pub mod config;
pub mod method;
pub mod path;
pub mod api_client;
pub mod endpoint;
pub mod sessions;
pub mod auth;
pub mod chatting;
pub mod contacts;
pub mod openapi;
pub mod service;

// Re-exports
pub use api_client::{RawResponse, WahaClient};
pub use config::WahaConfig;
pub use endpoint::{Endpoint, EndpointCall};
pub use error::{WahaError, WahaResult};
pub use method::HttpMethod;
pub use service::{WahaService, WahaServiceState};
pub use types::*;
