//! Transport tests for `HttpGateway`.
//!
//! Requests are sent to a local `wiremock` server so header injection,
//! payload encoding and status handling are checked end to end.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::{
    BinaryPart, Credentials, GatewayClient, GatewayError, HttpGateway, HttpGatewayConfig,
    RequestFactory,
};

fn gateway() -> HttpGateway {
    HttpGateway::new(HttpGatewayConfig::default()).expect("client builds")
}

#[tokio::test]
async fn attaches_basic_auth_and_device_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app/status"))
        .and(header("Authorization", "Basic dXNlcjpwYXNz"))
        .and(header("X-Device-Id", "dev1"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": "SUCCESS" })))
        .expect(1)
        .mount(&server)
        .await;

    let creds = Credentials::new(server.uri(), "user", "pass").with_device_id("dev1");
    let api = RequestFactory::new(&creds).unwrap();

    let response = gateway().send(&api.get("/app/status"), &creds).await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.json_body()["code"], "SUCCESS");
}

#[test]
fn omits_device_header_when_device_id_is_empty() {
    let creds = Credentials::new("http://localhost:3000", "user", "pass").with_device_id("");
    let api = RequestFactory::new(&creds).unwrap();

    let request = gateway()
        .build_request(&api.get("/app/devices"), &creds)
        .unwrap();

    assert!(request.headers().get("x-device-id").is_none());
    assert_eq!(
        request.headers().get("authorization").unwrap(),
        "Basic dXNlcjpwYXNz"
    );
}

#[tokio::test]
async fn sends_json_body_for_post() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send/message"))
        .and(body_json(json!({ "phone": "628123456789", "message": "hello" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": { "message_id": "3EB0" } })))
        .expect(1)
        .mount(&server)
        .await;

    let creds = Credentials::new(server.uri(), "user", "pass");
    let api = RequestFactory::new(&creds).unwrap();
    let request = api
        .post("/send/message")
        .body_field("phone", "628123456789")
        .body_field("message", "hello");

    let response = gateway().send(&request, &creds).await.unwrap();
    assert_eq!(response.json_body()["results"]["message_id"], "3EB0");
}

#[tokio::test]
async fn encodes_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chats"))
        .and(query_param("limit", "50"))
        .and(query_param("has_media", "false"))
        .and(query_param("search", "team chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let creds = Credentials::new(server.uri(), "user", "pass");
    let api = RequestFactory::new(&creds).unwrap();
    let request = api
        .get("/chats")
        .query_param("limit", 50)
        .query_param("has_media", false)
        .query_param("search", "team chat");

    gateway().send(&request, &creds).await.unwrap();
}

#[test]
fn multipart_requests_use_form_content_type() {
    let creds = Credentials::new("http://localhost:3000", "user", "pass");
    let api = RequestFactory::new(&creds).unwrap();
    let request = api
        .post("/send/image")
        .form_text("phone", "628123456789")
        .form_file(
            "image",
            BinaryPart {
                data: b"\x89PNG".to_vec(),
                file_name: "pic.png".into(),
                mime_type: "image/png".into(),
            },
        );

    let http_request = gateway().build_request(&request, &creds).unwrap();
    let content_type = http_request
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.starts_with("multipart/form-data"));
}

#[test]
fn invalid_mime_type_is_rejected_before_sending() {
    let creds = Credentials::new("http://localhost:3000", "user", "pass");
    let api = RequestFactory::new(&creds).unwrap();
    let request = api.post("/user/avatar").form_file(
        "avatar",
        BinaryPart {
            data: vec![0],
            file_name: "file".into(),
            mime_type: "not a mime".into(),
        },
    );

    let err = gateway().build_request(&request, &creds).unwrap_err();
    assert!(matches!(err, GatewayError::InvalidMimeType(_)));
}

#[tokio::test]
async fn non_success_status_is_surfaced_unmodified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .expect(1)
        .mount(&server)
        .await;

    let creds = Credentials::new(server.uri(), "user", "wrong");
    let api = RequestFactory::new(&creds).unwrap();

    let err = gateway().send(&api.get("/app/login"), &creds).await.unwrap_err();
    match err {
        GatewayError::Status { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "unauthorized");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn raw_responses_keep_headers_and_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/statics/media/a.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/jpeg")
                .set_body_bytes(vec![0xff, 0xd8, 0xff]),
        )
        .mount(&server)
        .await;

    let creds = Credentials::new(server.uri(), "user", "pass");
    let api = RequestFactory::new(&creds).unwrap();

    let response = gateway()
        .send(&api.get("/statics/media/a.jpg").raw_response(), &creds)
        .await
        .unwrap();
    assert_eq!(response.header("Content-Type"), Some("image/jpeg"));
    assert_eq!(response.body, vec![0xff, 0xd8, 0xff]);
}

#[tokio::test]
async fn credential_test_request_hits_root() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let creds = Credentials::new(format!("{}/", server.uri()), "user", "pass");
    let response = gateway().send(&creds.test_request(), &creds).await.unwrap();
    assert_eq!(response.json_body(), json!("ok"));
}
