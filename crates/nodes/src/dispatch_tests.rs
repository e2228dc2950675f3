//! Node-level tests: catalog consistency and end-to-end dispatch through
//! `GowaNode` with a recording `MockGateway`.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use gateway::mock::MockGateway;
use gateway::{Credentials, GatewayError, GatewayResponse, Method};
use serde_json::{json, Value};

use crate::catalog::{node_description, PropertyType, Resource};
use crate::command::Command;
use crate::item::{BinaryData, Item};
use crate::{ExecutableNode, ExecutionContext, GowaNode, NodeError};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn ctx(device_id: &str) -> ExecutionContext {
    ExecutionContext::new(
        Credentials::new("http://localhost:3000/", "user", "pass").with_device_id(device_id),
    )
}

fn node(gateway: &Arc<MockGateway>) -> GowaNode {
    GowaNode::new(gateway.clone())
}

fn item(parameters: Value) -> Item {
    Item::with_parameters(parameters)
}

// ---------------------------------------------------------------------------
// Catalog consistency
// ---------------------------------------------------------------------------

/// An item carrying a usable value for every field of `resource`/`operation`:
/// catalog defaults where they exist, a short placeholder otherwise.
fn filled_item(resource: Resource, operation: &str) -> Item {
    let mut parameters = serde_json::Map::new();
    for property in node_description()
        .properties
        .iter()
        .filter(|p| p.name != "resource" && p.name != "operation")
        .filter(|p| p.applies_to(resource, operation))
    {
        let value = match property.name {
            "mediaPath" => json!("statics/media/a.jpg"),
            _ if property.has_meaningful_default() => property.default.clone(),
            _ => match property.kind {
                PropertyType::Options => property
                    .options
                    .first()
                    .map(|o| o.value.clone())
                    .unwrap_or(Value::Null),
                _ => json!("1"),
            },
        };
        parameters.insert(property.name.to_owned(), value);
    }

    Item::with_parameters(Value::Object(parameters)).with_binary(
        "data",
        BinaryData {
            data: "AQID".into(),
            mime_type: "application/octet-stream".into(),
            file_name: None,
        },
    )
}

#[test]
fn every_catalog_operation_is_handled_by_its_parser() {
    for resource in Resource::ALL {
        for info in resource.operations() {
            let item = filled_item(resource, info.value);
            let command = Command::parse(resource, info.value, &item).unwrap_or_else(|e| {
                panic!("{resource}/{} did not parse from its own fields: {e}", info.value)
            });
            assert_eq!(command.resource(), resource);
            assert_eq!(command.operation(), info.value);
        }
    }
}

#[test]
fn parsers_reject_operations_outside_the_catalog() {
    for resource in Resource::ALL {
        let err = Command::parse(resource, "notAnOperation", &Item::default()).unwrap_err();
        assert!(matches!(err, NodeError::UnknownOperation { .. }), "{resource}");
    }

    // Operations of one resource are not valid for another.
    let err = Command::parse(Resource::Group, "sendText", &Item::default()).unwrap_err();
    assert!(matches!(err, NodeError::UnknownOperation { .. }));
}

#[test]
fn operation_selectors_match_the_catalog() {
    let description = node_description();
    for resource in Resource::ALL {
        let selector = description
            .properties
            .iter()
            .find(|p| p.name == "operation" && p.applies_to(resource, ""))
            .unwrap_or_else(|| panic!("no operation selector for {resource}"));

        let offered: Vec<Value> = selector.options.iter().map(|o| o.value.clone()).collect();
        let catalog: Vec<Value> = resource
            .operations()
            .iter()
            .map(|info| Value::from(info.value))
            .collect();
        assert_eq!(offered, catalog, "{resource}");
        assert!(catalog.contains(&selector.default), "{resource} default");
    }
}

#[test]
fn visibility_rules_reference_existing_operations_and_fields() {
    let description = node_description();
    let names: BTreeSet<&str> = description.properties.iter().map(|p| p.name).collect();

    for property in &description.properties {
        let show = &property.display_options.show;
        for resource in &show.resource {
            let known: BTreeSet<&str> = resource.operations().iter().map(|i| i.value).collect();
            for operation in &show.operation {
                assert!(
                    known.contains(operation),
                    "{} refers to unknown operation {resource}/{operation}",
                    property.name
                );
            }
        }
        for field in show.conditions.keys() {
            assert!(names.contains(field), "{} depends on unknown field {field}", property.name);
        }
    }
}

#[test]
fn field_names_are_unambiguous_per_operation() {
    let description = node_description();
    for resource in Resource::ALL {
        for info in resource.operations() {
            let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
            for property in description
                .properties
                .iter()
                .filter(|p| p.name != "resource" && p.applies_to(resource, info.value))
            {
                *seen.entry(property.name).or_default() += 1;
            }
            for (name, count) in seen {
                assert_eq!(count, 1, "{name} declared {count}x for {resource}/{}", info.value);
            }
        }
    }
}

#[test]
fn description_serialises_with_resource_selector_first() {
    let value = serde_json::to_value(node_description()).unwrap();
    assert_eq!(value["name"], "gowa");
    assert_eq!(value["displayName"], "GOWA");
    assert_eq!(value["credentials"][0]["name"], "goWhatsappApi");

    let resource = &value["properties"][0];
    assert_eq!(resource["name"], "resource");
    assert_eq!(resource["default"], "send");
    assert_eq!(resource["noDataExpression"], true);
    assert!(resource.get("displayOptions").is_none());
    assert_eq!(resource["options"].as_array().unwrap().len(), Resource::ALL.len());
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn send_text_posts_minimal_body() {
    let gateway = Arc::new(MockGateway::returning_json(json!({
        "code": "SUCCESS",
        "results": { "message_id": "3EB0" }
    })));

    let out = node(&gateway)
        .execute(
            &item(json!({
                "resource": "send",
                "operation": "sendText",
                "phoneNumber": "628123456789",
                "message": "hello",
            })),
            0,
            &ctx(""),
        )
        .await
        .unwrap();

    assert_eq!(out, vec![json!({ "code": "SUCCESS", "results": { "message_id": "3EB0" } })]);
    let call = gateway.last_call().unwrap();
    assert_eq!(call.request.method, Method::Post);
    assert_eq!(call.request.url, "http://localhost:3000/send/message");
    assert_eq!(
        Value::Object(call.request.body.unwrap()),
        json!({ "phone": "628123456789", "message": "hello" })
    );
}

#[tokio::test]
async fn device_header_is_sent_on_every_resource() {
    let gateway = Arc::new(MockGateway::returning_json(json!({ "code": "SUCCESS" })));
    let node = node(&gateway);
    let ctx = ctx("dev1");

    let items = [
        json!({ "resource": "app", "operation": "getStatus" }),
        json!({ "resource": "send", "operation": "sendPresence" }),
        json!({ "resource": "chat", "operation": "listChats" }),
        json!({ "resource": "device", "operation": "listDevices" }),
        json!({ "resource": "user", "operation": "getPrivacySettings" }),
        json!({ "resource": "newsletter", "operation": "unfollowNewsletter", "newsletterId": "1@newsletter" }),
    ];
    for (index, parameters) in items.iter().enumerate() {
        node.execute(&item(parameters.clone()), index, &ctx).await.unwrap();
    }

    let calls = gateway.recorded();
    assert_eq!(calls.len(), items.len());
    for call in calls {
        assert_eq!(call.header("X-Device-Id"), Some("dev1"), "{}", call.request.url);
        assert_eq!(call.header("Authorization"), Some("Basic dXNlcjpwYXNz"));
    }
}

#[tokio::test]
async fn device_header_is_absent_without_device_id() {
    let gateway = Arc::new(MockGateway::returning_json(json!({})));
    node(&gateway)
        .execute(&item(json!({ "resource": "app", "operation": "login" })), 0, &ctx("  "))
        .await
        .unwrap();

    let call = gateway.last_call().unwrap();
    assert_eq!(call.header("X-Device-Id"), None);
    assert!(call.header("Authorization").is_some());
}

#[tokio::test]
async fn list_responses_fan_out_into_items() {
    let gateway = Arc::new(MockGateway::returning_json(json!([
        { "id": "a" },
        { "id": "b" },
        { "id": "c" }
    ])));

    let out = node(&gateway)
        .execute(&item(json!({ "resource": "device", "operation": "listDevices" })), 0, &ctx(""))
        .await
        .unwrap();

    assert_eq!(out.len(), 3);
    assert_eq!(out[2], json!({ "id": "c" }));
}

#[tokio::test]
async fn media_download_returns_envelope() {
    let mut headers = BTreeMap::new();
    headers.insert("content-type".to_owned(), "image/jpeg".to_owned());
    headers.insert("content-length".to_owned(), "3".to_owned());
    let gateway = Arc::new(MockGateway::responding(GatewayResponse {
        status: 200,
        headers,
        body: vec![1, 2, 3],
    }));

    let out = node(&gateway)
        .execute(
            &item(json!({
                "resource": "app",
                "operation": "getMediaByPath",
                "mediaPath": "/statics/media/628123/a.jpg",
            })),
            0,
            &ctx(""),
        )
        .await
        .unwrap();

    let call = gateway.last_call().unwrap();
    assert_eq!(call.request.url, "http://localhost:3000/statics/media/628123/a.jpg");
    assert_eq!(
        out,
        vec![json!({
            "path": "statics/media/628123/a.jpg",
            "statusCode": 200,
            "headers": { "content-type": "image/jpeg", "content-length": "3" },
            "contentType": "image/jpeg",
            "contentLength": "3",
            "body": "AQID",
        })]
    );
}

#[tokio::test]
async fn configuration_errors_never_reach_the_gateway() {
    let gateway = Arc::new(MockGateway::returning_json(json!({})));
    let node = node(&gateway);
    let ctx = ctx("");

    let cases = [
        json!({ "resource": "app", "operation": "getMediaByPath", "mediaPath": "media/a.jpg" }),
        json!({ "resource": "send", "operation": "sendImage", "phoneNumber": "628", "imageSource": "file" }),
        json!({ "resource": "send", "operation": "sendText", "message": "no phone" }),
        json!({ "resource": "message", "operation": "starMessage" }),
        json!({ "resource": "calls" }),
    ];
    for (index, parameters) in cases.into_iter().enumerate() {
        let err = node.execute(&item(parameters), index, &ctx).await.unwrap_err();
        assert!(err.is_configuration(), "case {index}: {err}");
    }
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn file_upload_reads_named_binary_property() {
    let gateway = Arc::new(MockGateway::returning_json(json!({ "code": "SUCCESS" })));
    let upload = item(json!({
        "resource": "send",
        "operation": "sendAudio",
        "phoneNumber": "628123",
        "audioSource": "file",
        "audioFile": "voice",
    }))
    .with_binary(
        "voice",
        BinaryData {
            data: "T2dnUw==".into(),
            mime_type: "audio/ogg".into(),
            file_name: None,
        },
    );

    node(&gateway).execute(&upload, 0, &ctx("")).await.unwrap();

    let request = gateway.last_call().unwrap().request;
    assert_eq!(request.url, "http://localhost:3000/send/audio");
    assert!(request.body.is_none());
    let part = request.form_file_value("audio").unwrap();
    assert_eq!(part.data, b"OggS");
    assert_eq!(part.file_name, "file");
    assert_eq!(part.mime_type, "audio/ogg");
}

#[tokio::test]
async fn gateway_errors_pass_through_unmodified() {
    let gateway = Arc::new(MockGateway::failing(401, "unauthorized"));
    let err = node(&gateway)
        .execute(&item(json!({ "resource": "app", "operation": "getStatus" })), 0, &ctx(""))
        .await
        .unwrap_err();

    assert!(!err.is_configuration());
    match err {
        NodeError::Gateway(GatewayError::Status { status, body }) => {
            assert_eq!(status, 401);
            assert_eq!(body, "unauthorized");
        }
        other => panic!("expected gateway status error, got {other:?}"),
    }
    assert_eq!(gateway.call_count(), 1);
}

#[tokio::test]
async fn invalid_host_url_fails_before_sending() {
    let gateway = Arc::new(MockGateway::returning_json(json!({})));
    let ctx = ExecutionContext::new(Credentials::new("ftp://gateway", "user", "pass"));

    let err = node(&gateway)
        .execute(&item(json!({ "resource": "app", "operation": "getStatus" })), 0, &ctx)
        .await
        .unwrap_err();
    assert!(matches!(err, NodeError::Gateway(GatewayError::InvalidHostUrl { .. })));
    assert_eq!(gateway.call_count(), 0);
}
