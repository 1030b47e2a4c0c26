//! IpLocationResolver against a mock geolocation service.

use weather_core::location::IpLocationResolver;
use weather_core::{Coordinates, LocationError, LocationResolver};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_ip_lookup_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "lat": 52.52,
            "lon": 13.405
        })))
        .mount(&mock_server)
        .await;

    let resolver = IpLocationResolver::new(format!("{}/json/", mock_server.uri())).unwrap();
    let at = resolver.resolve().await.unwrap();

    assert_eq!(at, Coordinates::new(52.52, 13.405));
}

#[tokio::test]
async fn test_ip_lookup_failure_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "fail",
            "message": "private range"
        })))
        .mount(&mock_server)
        .await;

    let resolver = IpLocationResolver::new(format!("{}/json/", mock_server.uri())).unwrap();
    let err = resolver.resolve().await.unwrap_err();

    match err {
        LocationError::Unavailable(reason) => assert_eq!(reason, "private range"),
        other => panic!("expected Unavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn test_ip_lookup_garbage_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let resolver = IpLocationResolver::new(format!("{}/json/", mock_server.uri())).unwrap();
    assert!(matches!(resolver.resolve().await, Err(LocationError::Unavailable(_))));
}
