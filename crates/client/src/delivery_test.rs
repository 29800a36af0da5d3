use super::*;
use crate::test_support::MockIntake;
use pointcast_protocol::Point;

fn endpoint_for(host: String) -> EndpointConfig {
    EndpointConfig::new(host, "metrics", "scout", "secret")
}

fn one_series() -> Vec<PointSeries> {
    vec![PointSeries::new(
        "cpu.load",
        vec![Point::new(0.73).with_timestamp(1_700_000_000)],
    )]
}

// =============================================================================
// Construction
// =============================================================================

#[tokio::test]
async fn test_new_resolves_series_url() {
    let client = DeliveryClient::new(
        &endpoint_for("localhost:8086".into()),
        &TransportConfig::default(),
    )
    .unwrap();

    assert_eq!(
        client.url().as_str(),
        "http://localhost:8086/db/metrics/series?u=scout&p=secret"
    );
}

#[tokio::test]
async fn test_new_rejects_malformed_proxy() {
    let transport = TransportConfig::default().with_proxy("http://[not-a-proxy");
    let result = DeliveryClient::new(&endpoint_for("localhost:8086".into()), &transport);

    assert!(matches!(result, Err(ConfigError::InvalidProxy { .. })));
}

// =============================================================================
// Status mapping
// =============================================================================

#[tokio::test]
async fn test_deliver_200_is_success() {
    let intake = MockIntake::start(200, "OK", "").await;
    let client =
        DeliveryClient::new(&endpoint_for(intake.host()), &TransportConfig::default()).unwrap();

    client.deliver(&one_series()).await.unwrap();
}

#[tokio::test]
async fn test_deliver_204_is_success() {
    let intake = MockIntake::start(204, "No Content", "").await;
    let client =
        DeliveryClient::new(&endpoint_for(intake.host()), &TransportConfig::default()).unwrap();

    client.deliver(&one_series()).await.unwrap();
}

#[tokio::test]
async fn test_deliver_404_carries_body() {
    let intake = MockIntake::start(404, "Not Found", "database not found").await;
    let client =
        DeliveryClient::new(&endpoint_for(intake.host()), &TransportConfig::default()).unwrap();

    let err = client.deliver(&one_series()).await.unwrap_err();
    match err {
        DeliveryError::Server { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "database not found");
        }
        other => panic!("expected Server error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_deliver_500_carries_body() {
    let intake = MockIntake::start(500, "Internal Server Error", "shard offline").await;
    let client =
        DeliveryClient::new(&endpoint_for(intake.host()), &TransportConfig::default()).unwrap();

    let err = client.deliver(&one_series()).await.unwrap_err();
    match err {
        DeliveryError::Server { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "shard offline");
        }
        other => panic!("expected Server error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_deliver_connection_refused_is_transport_error() {
    // Bind then drop a listener so the port is free but unreachable.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let host = listener.local_addr().unwrap().to_string();
    drop(listener);

    let client = DeliveryClient::new(&endpoint_for(host), &TransportConfig::default()).unwrap();

    let err = client.deliver(&one_series()).await.unwrap_err();
    assert!(matches!(err, DeliveryError::Http(_)));
    assert!(!err.to_string().is_empty());
}

// =============================================================================
// Request shape
// =============================================================================

#[tokio::test]
async fn test_deliver_posts_one_json_request() {
    let intake = MockIntake::start(200, "OK", "").await;
    let client =
        DeliveryClient::new(&endpoint_for(intake.host()), &TransportConfig::default()).unwrap();

    client.deliver(&one_series()).await.unwrap();

    let requests = intake
        .wait_for_requests(1, std::time::Duration::from_secs(2))
        .await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].target, "/db/metrics/series?u=scout&p=secret");

    let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(
        body,
        serde_json::json!([{
            "name": "cpu.load",
            "columns": ["value", "time", "dimensions"],
            "points": [[0.73, 1_700_000_000, {}]],
        }])
    );
}
