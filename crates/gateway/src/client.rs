//! Authenticated transport.
//!
//! [`GatewayClient`] is the seam between operation code and the network:
//! operations only build [`RequestDescriptor`]s, the client attaches the
//! credential headers and performs the call.  [`HttpGateway`] is the
//! reqwest-backed implementation; `mock::MockGateway` records calls in tests.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::{Credentials, FormValue, GatewayError, Method, RequestDescriptor};

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// A successful (2xx) gateway response.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    pub status: u16,
    /// Header names are lower-cased.
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl GatewayResponse {
    /// A 200 response carrying `value` as its JSON body.
    pub fn json(value: &Value) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("content-type".to_owned(), "application/json".to_owned());
        Self {
            status: 200,
            headers,
            body: value.to_string().into_bytes(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Parse the body as JSON.  Non-JSON bodies come back as a JSON string
    /// and an empty body as `null`.
    pub fn json_body(&self) -> Value {
        if self.body.is_empty() {
            return Value::Null;
        }
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&self.body).into_owned()))
    }
}

// ---------------------------------------------------------------------------
// Client trait
// ---------------------------------------------------------------------------

#[async_trait]
pub trait GatewayClient: Send + Sync {
    /// Perform `request` with the credential headers attached.
    ///
    /// # Errors
    /// Transport failures and non-2xx statuses are returned unmodified;
    /// nothing is retried.
    async fn send(
        &self,
        request: &RequestDescriptor,
        credentials: &Credentials,
    ) -> Result<GatewayResponse, GatewayError>;
}

// ---------------------------------------------------------------------------
// reqwest implementation
// ---------------------------------------------------------------------------

/// Tuning knobs for [`HttpGateway`].
#[derive(Debug, Clone)]
pub struct HttpGatewayConfig {
    /// Per-request timeout.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpGatewayConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("gowa-node/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

pub struct HttpGateway {
    client: reqwest::Client,
}

impl HttpGateway {
    pub fn new(config: HttpGatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Translate a descriptor into a ready-to-send reqwest request.
    pub fn build_request(
        &self,
        request: &RequestDescriptor,
        credentials: &Credentials,
    ) -> Result<reqwest::Request, GatewayError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self
            .client
            .request(method, &request.url)
            .header(ACCEPT, HeaderValue::from_static("application/json"));

        for (name, value) in credentials.headers() {
            let value = HeaderValue::from_str(&value)
                .map_err(|_| GatewayError::InvalidHeader { name })?;
            builder = builder.header(name, value);
        }

        if let Some(query) = &request.query {
            builder = builder.query(query);
        }

        if let Some(fields) = &request.form {
            builder = builder.multipart(build_form(fields)?);
        } else if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        Ok(builder.build()?)
    }
}

fn build_form(fields: &[(String, FormValue)]) -> Result<Form, GatewayError> {
    let mut form = Form::new();
    for (name, value) in fields {
        form = match value {
            FormValue::Text(text) => form.text(name.clone(), text.clone()),
            FormValue::File(file) => {
                let part = Part::bytes(file.data.clone())
                    .file_name(file.file_name.clone())
                    .mime_str(&file.mime_type)
                    .map_err(|_| GatewayError::InvalidMimeType(file.mime_type.clone()))?;
                form.part(name.clone(), part)
            }
        };
    }
    Ok(form)
}

#[async_trait]
impl GatewayClient for HttpGateway {
    #[instrument(skip_all, fields(method = %request.method, url = %request.url))]
    async fn send(
        &self,
        request: &RequestDescriptor,
        credentials: &Credentials,
    ) -> Result<GatewayResponse, GatewayError> {
        let http_request = self.build_request(request, credentials)?;
        debug!(
            device_scoped = credentials.device_id().is_some(),
            multipart = request.form.is_some(),
            "sending gateway request"
        );

        let response = self.client.execute(http_request).await?;
        let status = response.status();
        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.as_str().to_owned(), v.to_str().unwrap_or("").to_owned()))
            .collect();
        let body = response.bytes().await?.to_vec();

        if !status.is_success() {
            let body = String::from_utf8_lossy(&body).into_owned();
            warn!(status = status.as_u16(), "gateway returned an error status");
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(status = status.as_u16(), bytes = body.len(), "gateway responded");
        Ok(GatewayResponse {
            status: status.as_u16(),
            headers,
            body,
        })
    }
}
