//! Declarative endpoint descriptors.
//!
//! An [`Endpoint`] captures everything needed to call one WAHA route: the
//! path template, method, the status code the server documents for success,
//! and the request models for the JSON body and query parameters, each with
//! optional defaults. An [`EndpointCall`] carries the per-call path
//! arguments, params and body.
//!
//! ```ignore
//! let start = Endpoint::new("/api/sessions/start", HttpMethod::Post, 201)
//!     .with_body_defaults::<SessionStartRequest>(json!({ "name": "default" }));
//! let dto: SessionDto = start.fetch(&client, EndpointCall::new()).await?;
//! ```

use crate::api_client::{RawResponse, WahaClient};
use crate::error::{WahaError, WahaResult};
use crate::method::HttpMethod;
use crate::path::PathTemplate;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Reads a JSON value into the request model and writes it back out.
type Normalize = fn(&Value) -> serde_json::Result<Value>;

fn through_model<M: DeserializeOwned + Serialize>(value: &Value) -> serde_json::Result<Value> {
    serde_json::to_value(serde_json::from_value::<M>(value.clone())?)
}

/// Request model for a body or query string.
#[derive(Debug, Clone)]
struct RequestModel {
    defaults: Option<Value>,
    normalize: Normalize,
}

impl RequestModel {
    fn of<M: DeserializeOwned + Serialize>(defaults: Option<Value>) -> Self {
        Self {
            defaults,
            normalize: through_model::<M>,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Body,
    Params,
}

impl Slot {
    fn name(self) -> &'static str {
        match self {
            Slot::Body => "body",
            Slot::Params => "params",
        }
    }

    fn described(self) -> &'static str {
        match self {
            Slot::Body => "a body",
            Slot::Params => "query parameters",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Endpoint {
    path: PathTemplate,
    method: HttpMethod,
    expected_status: u16,
    /// `Some` when the endpoint takes a JSON body.
    body: Option<RequestModel>,
    /// `Some` when the endpoint takes query parameters.
    params: Option<RequestModel>,
    accept: Option<String>,
    description: Option<String>,
}

impl Endpoint {
    pub fn new(path: &str, method: HttpMethod, expected_status: u16) -> Self {
        Self {
            path: PathTemplate::parse(path),
            method,
            expected_status,
            body: None,
            params: None,
            accept: None,
            description: None,
        }
    }

    /// Like [`Endpoint::new`] with the method given by name (`"post"`, `"GET"`).
    pub fn parse(path: &str, method: &str, expected_status: u16) -> WahaResult<Self> {
        Ok(Self::new(path, method.parse()?, expected_status))
    }

    /// The endpoint takes a `B` body that every call must supply.
    pub fn with_body<B: DeserializeOwned + Serialize>(mut self) -> Self {
        self.body = Some(RequestModel::of::<B>(None));
        self
    }

    /// The endpoint takes a `B` body; `defaults` are read through `B` and
    /// sent when the call has none.
    pub fn with_body_defaults<B: DeserializeOwned + Serialize>(mut self, defaults: Value) -> Self {
        self.body = Some(RequestModel::of::<B>(Some(defaults)));
        self
    }

    /// The endpoint takes `P` query parameters that every call must supply.
    pub fn with_params<P: DeserializeOwned + Serialize>(mut self) -> Self {
        self.params = Some(RequestModel::of::<P>(None));
        self
    }

    pub fn with_param_defaults<P: DeserializeOwned + Serialize>(mut self, defaults: Value) -> Self {
        self.params = Some(RequestModel::of::<P>(Some(defaults)));
        self
    }

    /// Media type to ask for instead of JSON, e.g. `image/png`.
    pub fn with_accept(mut self, media_type: impl Into<String>) -> Self {
        self.accept = Some(media_type.into());
        self
    }

    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn path(&self) -> &PathTemplate {
        &self.path
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn expected_status(&self) -> u16 {
        self.expected_status
    }

    pub fn accept(&self) -> Option<&str> {
        self.accept.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn takes_body(&self) -> bool {
        self.body.is_some()
    }

    pub fn takes_params(&self) -> bool {
        self.params.is_some()
    }

    /// The caller's body, or the endpoint defaults read into `B`.
    pub fn resolve_body<B: DeserializeOwned>(&self, body: Option<B>) -> WahaResult<B> {
        match body {
            Some(b) => Ok(b),
            None => self.defaults_as(self.body.as_ref(), Slot::Body),
        }
    }

    /// The caller's params, or the endpoint defaults read into `P`.
    pub fn resolve_params<P: DeserializeOwned>(&self, params: Option<P>) -> WahaResult<P> {
        match params {
            Some(p) => Ok(p),
            None => self.defaults_as(self.params.as_ref(), Slot::Params),
        }
    }

    fn defaults_as<T: DeserializeOwned>(
        &self,
        model: Option<&RequestModel>,
        slot: Slot,
    ) -> WahaResult<T> {
        let value = model
            .and_then(|m| m.defaults.clone())
            .unwrap_or_else(|| Value::Object(Default::default()));
        serde_json::from_value(value).map_err(|e| self.invalid_defaults(slot, e))
    }

    /// The JSON to send for one slot: the caller's value, else the defaults
    /// run through the request model.
    fn payload(
        &self,
        model: Option<&RequestModel>,
        given: Option<Value>,
        slot: Slot,
    ) -> WahaResult<Option<Value>> {
        match (model, given) {
            (Some(_), Some(value)) => Ok(Some(value)),
            (Some(model), None) => match model.defaults {
                Some(ref defaults) => (model.normalize)(defaults)
                    .map(Some)
                    .map_err(|e| self.invalid_defaults(slot, e)),
                None => Err(WahaError::MissingPayload {
                    path: self.path.as_str().to_string(),
                    what: slot.described(),
                }),
            },
            (None, Some(_)) => Err(WahaError::Payload {
                path: self.path.as_str().to_string(),
                what: slot.described(),
            }),
            (None, None) => Ok(None),
        }
    }

    fn invalid_defaults(&self, slot: Slot, source: serde_json::Error) -> WahaError {
        WahaError::InvalidDefaults {
            path: self.path.as_str().to_string(),
            what: slot.name(),
            source,
        }
    }

    /// Issue the request and check the status.
    pub async fn send(&self, client: &WahaClient, call: EndpointCall) -> WahaResult<RawResponse> {
        let path = self.path.render(&call.path_args)?;
        let body = self.payload(self.body.as_ref(), call.body, Slot::Body)?;
        let params = self.payload(self.params.as_ref(), call.params, Slot::Params)?;

        client
            .execute(
                self.method,
                &path,
                params.as_ref(),
                body.as_ref(),
                self.accept.as_deref(),
            )
            .await?
            .expect_status(self.expected_status)
    }

    /// Issue the request and parse the body into `R`.
    pub async fn fetch<R: DeserializeOwned>(
        &self,
        client: &WahaClient,
        call: EndpointCall,
    ) -> WahaResult<R> {
        self.send(client, call).await?.json()
    }

    /// Issue the request and return the body untouched.
    pub async fn fetch_bytes(&self, client: &WahaClient, call: EndpointCall) -> WahaResult<Bytes> {
        Ok(self.send(client, call).await?.body)
    }
}

/// Per-call inputs for an [`Endpoint`].
#[derive(Debug, Clone, Default)]
pub struct EndpointCall {
    path_args: BTreeMap<String, String>,
    params: Option<Value>,
    body: Option<Value>,
}

impl EndpointCall {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a path argument, e.g. `arg("session", "default")`.
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_args.insert(name.into(), value.into());
        self
    }

    pub fn params<P: Serialize>(mut self, params: &P) -> WahaResult<Self> {
        self.params = Some(serde_json::to_value(params)?);
        Ok(self)
    }

    pub fn body<B: Serialize>(mut self, body: &B) -> WahaResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn path_args(&self) -> &BTreeMap<String, String> {
        &self.path_args
    }
}
