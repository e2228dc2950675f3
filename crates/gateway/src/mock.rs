//! `MockGateway` — a test double for `GatewayClient`.
//!
//! Records every request it receives (together with the credential headers
//! the real transport would attach) and answers with a programmer-specified
//! response, so operation code can be tested without a network.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::{Credentials, GatewayClient, GatewayError, GatewayResponse, RequestDescriptor};

/// Behaviour injected into `MockGateway` at construction time.
pub enum MockBehaviour {
    /// Answer every call with this response.
    Respond(GatewayResponse),
    /// Fail every call with a non-2xx status.
    FailStatus { status: u16, body: String },
}

/// A request as seen by the mock.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub request: RequestDescriptor,
    /// Headers derived from the credentials at call time.
    pub headers: Vec<(&'static str, String)>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

pub struct MockGateway {
    pub behaviour: MockBehaviour,
    /// All requests seen by this gateway (in call order).
    pub calls: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockGateway {
    /// Create a mock that always answers 200 with the given JSON.
    pub fn returning_json(value: Value) -> Self {
        Self::responding(GatewayResponse::json(&value))
    }

    pub fn responding(response: GatewayResponse) -> Self {
        Self {
            behaviour: MockBehaviour::Respond(response),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock that always fails with the given status.
    pub fn failing(status: u16, body: impl Into<String>) -> Self {
        Self {
            behaviour: MockBehaviour::FailStatus {
                status,
                body: body.into(),
            },
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of requests this gateway has received.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// The most recent request, if any.
    pub fn last_call(&self) -> Option<RecordedRequest> {
        self.calls.lock().unwrap().last().cloned()
    }

    pub fn recorded(&self) -> Vec<RecordedRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GatewayClient for MockGateway {
    async fn send(
        &self,
        request: &RequestDescriptor,
        credentials: &Credentials,
    ) -> Result<GatewayResponse, GatewayError> {
        self.calls.lock().unwrap().push(RecordedRequest {
            request: request.clone(),
            headers: credentials.headers(),
        });

        match &self.behaviour {
            MockBehaviour::Respond(response) => Ok(response.clone()),
            MockBehaviour::FailStatus { status, body } => Err(GatewayError::Status {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}
