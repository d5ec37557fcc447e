//! HTTP transport behaviour against a mock server.

use std::time::Duration;

use graphgen_core::error::TransportError;
use graphgen_core::ports::{GraphqlRequest, Transport};
use graphgen_http::{HttpTransport, HttpTransportConfig};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport() -> HttpTransport {
    HttpTransport::new(HttpTransportConfig::default()).unwrap()
}

#[tokio::test]
async fn posts_query_and_decodes_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/subgraphs/name/tokens"))
        .and(body_json(json!({ "query": "{ tokens { id } }" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "tokens": [{ "id": "0x1" }] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/subgraphs/name/tokens", server.uri());
    let envelope = transport()
        .post(&url, &GraphqlRequest::new("{ tokens { id } }"))
        .await
        .unwrap();

    assert!(envelope.first_error().is_none());
    assert_eq!(
        envelope.into_sole_payload(),
        Some(json!([{ "id": "0x1" }]))
    );
}

#[tokio::test]
async fn graphql_errors_are_returned_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {},
            "errors": [{ "message": "not found" }, { "message": "other" }]
        })))
        .mount(&server)
        .await;

    let envelope = transport()
        .post(&server.uri(), &GraphqlRequest::new("{ token(id: \"0x1\") { id } }"))
        .await
        .unwrap();

    assert_eq!(envelope.error_count(), 2);
    assert_eq!(envelope.first_error().unwrap().message, "not found");
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = transport()
        .post(&server.uri(), &GraphqlRequest::new("{ tokens { id } }"))
        .await
        .unwrap_err();

    match err {
        TransportError::Status { status, body } => {
            assert_eq!(status, 502);
            assert_eq!(body, "bad gateway");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn undecodable_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = transport()
        .post(&server.uri(), &GraphqlRequest::new("{ tokens { id } }"))
        .await
        .unwrap_err();

    assert!(matches!(err, TransportError::Decode(_)));
}

#[tokio::test]
async fn configured_headers_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("authorization", "Bearer secret"))
        .and(header("x-api-key", "k1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "tokens": [] } })))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(HttpTransportConfig {
        bearer_token: Some("secret".into()),
        headers: vec![("x-api-key".into(), "k1".into())],
        ..HttpTransportConfig::default()
    })
    .unwrap();

    transport
        .post(&server.uri(), &GraphqlRequest::new("{ tokens { id } }"))
        .await
        .unwrap();
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": { "tokens": [] } }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let transport = HttpTransport::new(HttpTransportConfig {
        timeout: Duration::from_millis(100),
        ..HttpTransportConfig::default()
    })
    .unwrap();

    let err = transport
        .post(&server.uri(), &GraphqlRequest::new("{ tokens { id } }"))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Http(_)));
}

#[tokio::test]
async fn invalid_url_is_an_error() {
    let err = transport()
        .post("not a url", &GraphqlRequest::new("{ tokens { id } }"))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Http(message) if message.contains("invalid url")));
}
