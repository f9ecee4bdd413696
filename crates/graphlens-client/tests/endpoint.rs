//! Endpoint tests for graphlens-client against a mocked query API.

use graphlens_client::{ApiClient, ApiConfig, ApiError};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, timeout_secs: u64) -> ApiClient {
    ApiClient::new(&ApiConfig {
        base_url: server.uri(),
        timeout_secs,
    })
    .unwrap()
}

#[tokio::test]
async fn test_execute_success() {
    let server = MockServer::start().await;

    let body = json!({
        "columns": ["n"],
        "data": [
            { "n": { "_id": { "offset": 0, "table": 1 }, "_label": "Topic", "topic_id": 7 } }
        ],
        "execution_time_ms": 12.5
    });

    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_json(json!({ "query": "MATCH (n:Topic) RETURN n" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let client = client_for(&server, 5);
    let result = client.execute("MATCH (n:Topic) RETURN n").await.unwrap();

    assert_eq!(result.columns, vec!["n"]);
    assert_eq!(result.data.len(), 1);
    assert!((result.execution_time_ms - 12.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_server_error_carries_detail() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "detail": "Query execution failed: parser error" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, 5);
    let err = client.execute("MATCH oops").await.unwrap_err();

    match err {
        ApiError::Server { status, detail } => {
            assert_eq!(status, 400);
            assert!(detail.contains("parser error"));
        }
        other => panic!("expected Server error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_without_detail_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server, 5);
    let err = client.execute("RETURN 1").await.unwrap_err();

    match err {
        ApiError::Server { status, .. } => assert_eq!(status, 503),
        other => panic!("expected Server error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "columns": [], "data": [], "execution_time_ms": 0.0 }))
                .set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, 1);
    let err = client.execute("RETURN 1").await.unwrap_err();

    assert!(matches!(err, ApiError::Timeout), "got {err:?}");
}

#[tokio::test]
async fn test_network_error_on_unreachable_endpoint() {
    // Nothing is listening on this port.
    let client = ApiClient::new(&ApiConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        timeout_secs: 1,
    })
    .unwrap();

    let err = client.execute("RETURN 1").await.unwrap_err();
    assert!(
        matches!(err, ApiError::Network(_) | ApiError::Timeout),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_params_serialized_when_present() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_json(json!({
            "query": "MATCH (n:Verse) WHERE n.verse_key = $pk RETURN n",
            "params": { "pk": "2:255" }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "columns": [], "data": [], "execution_time_ms": 1.0 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, 5);
    let mut params = serde_json::Map::new();
    params.insert("pk".to_string(), json!("2:255"));

    client
        .execute_with_params("MATCH (n:Verse) WHERE n.verse_key = $pk RETURN n", Some(params))
        .await
        .unwrap();
}
