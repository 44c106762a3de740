//! Integration tests for `CatalogClient` using wiremock HTTP mocks.

use chrono::Utc;
use serde_json::json;
use vitrine_client::{
    auth_token, CatalogApi, CatalogClient, ClientError, ClientSettings, FilterCriteria,
    AUTH_HEADER,
};
use vitrine_core::FilterValue;
use wiremock::matchers::{body_json, body_partial_json, header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SECRET: &str = "test-secret";

/// No back-off so retry tests do not sleep.
fn test_client(base_url: &str, max_retries: u32) -> CatalogClient {
    let settings = ClientSettings {
        timeout_secs: 5,
        user_agent: "vitrine-test/0.1".to_owned(),
        max_retries,
        backoff_base_ms: 0,
    };
    CatalogClient::new(base_url, SECRET, &settings).expect("client construction should not fail")
}

fn today_token() -> String {
    auth_token(SECRET, Utc::now().date_naive())
}

#[tokio::test]
async fn list_ids_sends_bounds_and_auth_header() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header(AUTH_HEADER, today_token().as_str()))
        .and(body_json(json!({
            "action": "get_ids",
            "params": { "offset": 10, "limit": 3 }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "result": ["a", "b", "c"] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 0);
    let ids = client
        .list_ids(Some(10), Some(3))
        .await
        .expect("should list ids");

    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn list_ids_without_bounds_sends_empty_params() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_json(json!({ "action": "get_ids", "params": {} })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "result": ["a", "b", "a"] })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 0);
    let ids = client.list_ids(None, None).await.expect("should list ids");

    // The client reports what the server sent; dedup is the caller's job.
    assert_eq!(ids, vec!["a", "b", "a"]);
}

#[tokio::test]
async fn fetch_items_parses_products_with_missing_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_json(json!({
            "action": "get_items",
            "params": { "ids": ["1", "2"] }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [
                { "id": "1", "product": "Chair", "price": 1500.0, "brand": null },
                { "id": "2", "product": "Table", "price": 8000.0, "brand": "Ikea" },
                { "id": "1", "product": "Chair", "price": 1500.0, "brand": null }
            ]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 0);
    let ids = vec!["1".to_owned(), "2".to_owned()];
    let items = client.fetch_items(&ids).await.expect("should fetch items");

    assert_eq!(items.len(), 3);
    assert_eq!(items[0].product.as_deref(), Some("Chair"));
    assert!(items[0].brand.is_none());
    assert_eq!(items[1].brand.as_deref(), Some("Ikea"));
}

#[tokio::test]
async fn fetch_items_with_no_ids_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 0);
    let items = client.fetch_items(&[]).await.expect("empty ids is not an error");
    assert!(items.is_empty());
}

#[tokio::test]
async fn list_fields_and_list_field_values_use_distinct_shapes() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_json(json!({ "action": "get_fields", "params": {} })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "result": ["brand", "id", "price", "product"] })),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_json(json!({
            "action": "get_fields",
            "params": { "field": "price" }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "result": [500.0, null, 1500] })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 0);

    let fields = client.list_fields().await.expect("should list fields");
    assert_eq!(fields, vec!["brand", "id", "price", "product"]);

    let values = client
        .list_field_values("price", None, None)
        .await
        .expect("should list values");
    assert_eq!(values.len(), 3);
    assert_eq!(values[0].as_ref().and_then(FilterValue::as_f64), Some(500.0));
    assert!(values[1].is_none());
    assert_eq!(values[2], Some(FilterValue::from(1500)));
}

#[tokio::test]
async fn filter_ids_sends_single_field_criteria() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_json(json!({
            "action": "filter",
            "params": { "brand": "Piaget" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": ["x", "y"] })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 0);
    let criteria = FilterCriteria::new("brand", FilterValue::from("Piaget"));
    let ids = client.filter_ids(&criteria).await.expect("should filter");

    assert_eq!(ids, vec!["x", "y"]);
}

#[tokio::test]
async fn retries_server_error_then_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "action": "get_ids" })))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "action": "get_ids" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": ["ok"] })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 2);
    let ids = client
        .list_ids(Some(0), Some(1))
        .await
        .expect("third attempt should succeed");
    assert_eq!(ids, vec!["ok"]);
}

#[tokio::test]
async fn malformed_envelope_is_retried_then_exhausted() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unexpected": true })))
        .expect(3) // 1 initial + 2 retries
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 2);
    let result = client.list_fields().await;

    match result {
        Err(ClientError::ExhaustedRetries {
            action,
            attempts,
            source,
            ..
        }) => {
            assert_eq!(action, "get_fields");
            assert_eq!(attempts, 3);
            assert!(matches!(*source, ClientError::Deserialize { .. }));
        }
        other => panic!("expected ExhaustedRetries, got {other:?}"),
    }
}

#[tokio::test]
async fn exhausted_error_carries_correlation_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 1);
    let err = client
        .filter_ids(&FilterCriteria::new("price", FilterValue::from(100)))
        .await
        .expect_err("should fail");

    let error_id = err.error_id().expect("exhausted errors carry an id");
    assert!(
        err.to_string().contains(&error_id.to_string()),
        "message should mention the error id: {err}"
    );
}
