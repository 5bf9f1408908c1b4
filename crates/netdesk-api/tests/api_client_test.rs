#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use netdesk_api::types::{PackageCreate, PackageUpdate};
use netdesk_api::{ApiClient, Error, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let client = ApiClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

fn hotspot_json(id: u64) -> serde_json::Value {
    json!({
        "id": id,
        "type": "HOTSPOT",
        "name": "1 Hour",
        "price": 50,
        "downloadSpeed": 8,
        "uploadSpeed": 4,
        "sessionTime": 60,
        "routerIds": [],
        "isActive": true,
        "customerCount": 0,
        "voucherCount": 12,
        "createdAt": "2024-06-15T10:30:00Z"
    })
}

// ── Auth ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = MockServer::start().await;
    let token: SecretString = "s3cret".to_string().into();
    let client =
        ApiClient::from_token(&server.uri(), &token, &TransportConfig::default()).unwrap();

    Mock::given(method("GET"))
        .and(path("/packages"))
        .and(header("authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let packages = client.list_packages(None).await.unwrap();
    assert!(packages.is_empty());
}

#[tokio::test]
async fn test_unauthorized_maps_to_authentication() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.list_packages(None).await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

// ── Packages ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_packages_with_type_filter() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/packages"))
        .and(query_param("type", "HOTSPOT"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": [hotspot_json(7)] })),
        )
        .mount(&server)
        .await;

    let packages = client.list_packages(Some("HOTSPOT")).await.unwrap();

    assert_eq!(packages.len(), 1);
    assert_eq!(packages[0].id, "7");
    assert_eq!(packages[0].package_type, "HOTSPOT");
    assert_eq!(packages[0].session_time, Some(60));
    assert_eq!(packages[0].voucher_count, 12);
}

#[tokio::test]
async fn test_get_package() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/packages/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hotspot_json(7)))
        .mount(&server)
        .await;

    let pkg = client.get_package("7").await.unwrap();
    assert_eq!(pkg.name, "1 Hour");
    assert_eq!(pkg.created_at.as_deref(), Some("2024-06-15T10:30:00Z"));
}

#[tokio::test]
async fn test_create_package_sends_normalized_body() {
    let (server, client) = setup().await;

    let expected = json!({
        "type": "HOTSPOT",
        "name": "1 Hour",
        "price": 50.0,
        "downloadSpeed": 8,
        "uploadSpeed": 4,
        "sessionTime": 1,
        "sessionTimeUnit": "HOURS",
        "routerIds": []
    });

    Mock::given(method("POST"))
        .and(path("/packages"))
        .and(body_json(&expected))
        .respond_with(ResponseTemplate::new(201).set_body_json(hotspot_json(8)))
        .expect(1)
        .mount(&server)
        .await;

    let body = PackageCreate {
        package_type: "HOTSPOT".into(),
        name: "1 Hour".into(),
        price: 50.0,
        download_speed: 8,
        upload_speed: 4,
        session_time: Some(1),
        session_time_unit: Some("HOURS".into()),
        data_limit: None,
        data_limit_unit: None,
        router_ids: Vec::new(),
    };
    let created = client.create_package(&body).await.unwrap();
    assert_eq!(created.id, "8");
}

#[tokio::test]
async fn test_update_package_sends_partial_body() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/packages/7"))
        .and(body_json(json!({ "isActive": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(hotspot_json(7)))
        .expect(1)
        .mount(&server)
        .await;

    let body = PackageUpdate {
        is_active: Some(false),
        ..PackageUpdate::default()
    };
    client.update_package("7", &body).await.unwrap();
}

#[tokio::test]
async fn test_delete_package() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/packages/7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_package("7").await.unwrap();
}

#[tokio::test]
async fn test_package_stats_and_router_revenue() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/packages/7/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalClients": 10,
            "activeClients": 6,
            "expiredClients": 3,
            "suspendedClients": 1,
            "revenue": "1250.50"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/packages/7/router-revenue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "routerId": 1, "routerName": "core-1", "revenue": 1000 },
            { "routerId": 2, "routerName": "edge-2", "revenue": 250.5 }
        ])))
        .mount(&server)
        .await;

    let stats = client.get_package_stats("7").await.unwrap();
    assert_eq!(stats.total_clients, 10);
    assert!((stats.revenue - 1250.5).abs() < f64::EPSILON);

    let revenue = client.get_router_revenue("7").await.unwrap();
    assert_eq!(revenue.len(), 2);
    assert_eq!(revenue[1].router_name, "edge-2");
}

// ── Routers ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_routers_with_page_size() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/routers"))
        .and(query_param("pageSize", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "id": "r1", "name": "core-1", "ipAddress": "10.0.0.1" },
                { "id": "r2", "name": "edge-2" }
            ]
        })))
        .mount(&server)
        .await;

    let routers = client.list_routers(100).await.unwrap();
    assert_eq!(routers.len(), 2);
    assert_eq!(routers[0].ip_address.as_deref(), Some("10.0.0.1"));
    assert!(routers[1].ip_address.is_none());
}

// ── Errors ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_business_error_message_is_preserved() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/packages/7"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "message": "Package has customers assigned, cannot delete",
            "code": "PACKAGE_IN_USE"
        })))
        .mount(&server)
        .await;

    let err = client.delete_package("7").await.unwrap_err();
    assert_eq!(
        err.api_message(),
        Some("Package has customers assigned, cannot delete")
    );
    assert_eq!(err.api_error_code(), Some("PACKAGE_IN_USE"));
}

#[tokio::test]
async fn test_error_without_payload_has_no_message() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/packages/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<html>nope</html>"))
        .mount(&server)
        .await;

    let err = client.get_package("missing").await.unwrap_err();
    assert!(err.is_not_found());
    assert!(err.api_message().is_none());
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/packages"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client.list_packages(None).await;
    match result {
        Err(Error::Deserialization { ref body, .. }) => assert_eq!(body, "not json"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

// ── Timeouts ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_slow_response_reports_configured_timeout() {
    let server = MockServer::start().await;
    let transport = TransportConfig {
        timeout: std::time::Duration::from_secs(1),
        ..TransportConfig::default()
    };
    let client = ApiClient::from_transport(&server.uri(), &transport).unwrap();

    Mock::given(method("GET"))
        .and(path("/routers"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = client.list_routers(100).await.unwrap_err();
    assert!(
        matches!(err, Error::Timeout { timeout_secs: 1 }),
        "expected Timeout, got: {err:?}"
    );
}
