//! `GowaNode` — the node entry point.
//!
//! Per item: resolve `resource` and `operation`, parse the typed command,
//! build its request against the credential's base URL, send it through the
//! injected [`GatewayClient`] and normalise the answer into output values.

use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use gateway::{GatewayClient, GatewayResponse, RequestDescriptor, RequestFactory, ResponseFormat};
use serde_json::{json, Map, Value};
use tracing::{debug, info, instrument};

use crate::catalog::{self, NodeDescription, Resource};
use crate::command::Command;
use crate::item::Item;
use crate::params::Parameters;
use crate::traits::{ExecutableNode, ExecutionContext};
use crate::NodeError;

pub struct GowaNode {
    gateway: Arc<dyn GatewayClient>,
}

impl GowaNode {
    pub fn new(gateway: Arc<dyn GatewayClient>) -> Self {
        Self { gateway }
    }

    pub fn description() -> &'static NodeDescription {
        catalog::node_description()
    }

    /// Resolve and parse the command carried by `item`, falling back to the
    /// catalog defaults for `resource` and `operation`.
    pub fn command(item: &Item) -> Result<Command, NodeError> {
        let resource = match Parameters::new(item).optional_string("resource")? {
            Some(value) => value.parse::<Resource>()?,
            None => Resource::DEFAULT,
        };
        let operation = Parameters::scoped(item, resource, "").string("operation")?;
        Command::parse(resource, &operation, item)
    }

    /// Everything short of the network call: the command and its request.
    pub fn prepare(
        item: &Item,
        ctx: &ExecutionContext,
    ) -> Result<(Command, RequestDescriptor), NodeError> {
        let command = Self::command(item)?;
        let api = RequestFactory::new(&ctx.credentials)?;
        let request = command.request(&api);
        Ok((command, request))
    }
}

#[async_trait]
impl ExecutableNode for GowaNode {
    #[instrument(skip_all, fields(execution_id = %ctx.execution_id, item = item_index))]
    async fn execute(
        &self,
        item: &Item,
        item_index: usize,
        ctx: &ExecutionContext,
    ) -> Result<Vec<Value>, NodeError> {
        let (command, request) = Self::prepare(item, ctx)?;
        info!(
            resource = %command.resource(),
            operation = command.operation(),
            method = %request.method,
            "executing gateway operation"
        );

        let response = self.gateway.send(&request, &ctx.credentials).await?;

        let output = match request.response {
            ResponseFormat::Json => response.json_body(),
            ResponseFormat::Raw => media_envelope(command.media_path().unwrap_or_default(), &response),
        };
        let values = into_output_values(output);
        debug!(outputs = values.len(), "operation completed");
        Ok(values)
    }
}

/// A JSON array becomes one value per element; anything else one value.
pub fn into_output_values(value: Value) -> Vec<Value> {
    match value {
        Value::Array(values) => values,
        other => vec![other],
    }
}

/// Metadata envelope for a raw media download.  The payload is base64.
pub fn media_envelope(path: &str, response: &GatewayResponse) -> Value {
    let headers: Map<String, Value> = response
        .headers
        .iter()
        .map(|(name, value)| (name.clone(), Value::from(value.as_str())))
        .collect();

    json!({
        "path": path,
        "statusCode": response.status,
        "headers": headers,
        "contentType": response.header("content-type"),
        "contentLength": response.header("content-length"),
        "body": STANDARD.encode(&response.body),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn arrays_fan_out_into_values() {
        assert_eq!(
            into_output_values(json!([{ "a": 1 }, { "a": 2 }])),
            vec![json!({ "a": 1 }), json!({ "a": 2 })]
        );
        assert_eq!(into_output_values(json!({ "a": 1 })), vec![json!({ "a": 1 })]);
        assert!(into_output_values(json!([])).is_empty());
    }

    #[test]
    fn envelope_carries_metadata_and_base64_body() {
        let mut headers = BTreeMap::new();
        headers.insert("content-type".to_owned(), "image/jpeg".to_owned());
        let response = GatewayResponse {
            status: 200,
            headers,
            body: vec![0xff, 0xd8],
        };

        let envelope = media_envelope("statics/media/a.jpg", &response);
        assert_eq!(envelope["path"], "statics/media/a.jpg");
        assert_eq!(envelope["statusCode"], 200);
        assert_eq!(envelope["contentType"], "image/jpeg");
        assert_eq!(envelope["contentLength"], Value::Null);
        assert_eq!(envelope["body"], "/9g=");
    }

    #[test]
    fn missing_resource_and_operation_fall_back_to_send_text() {
        let item = Item::with_parameters(json!({ "phoneNumber": "628123", "message": "hi" }));
        let command = GowaNode::command(&item).unwrap();
        assert_eq!(command.resource(), Resource::Send);
        assert_eq!(command.operation(), "sendText");
    }

    #[test]
    fn unknown_resource_is_rejected() {
        let item = Item::with_parameters(json!({ "resource": "payments" }));
        let err = GowaNode::command(&item).unwrap_err();
        assert!(matches!(err, NodeError::UnknownResource(ref r) if r == "payments"));
    }
}
