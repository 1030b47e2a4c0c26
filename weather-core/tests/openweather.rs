//! OpenWeatherFetcher against a mock HTTP server.

use weather_core::{FetchError, OpenWeatherFetcher, Unit, WeatherFetcher, WeatherQuery};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn paris_body() -> serde_json::Value {
    serde_json::json!({
        "coord": {"lon": 2.3488, "lat": 48.8534},
        "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
        "main": {"temp": 21.4, "feels_like": 20.9, "pressure": 1021, "humidity": 52},
        "visibility": 10000,
        "wind": {"speed": 3.6},
        "clouds": {"all": 0},
        "dt": 1760702400,
        "sys": {"country": "FR", "sunrise": 1760681460, "sunset": 1760720220},
        "name": "Paris",
        "cod": 200
    })
}

#[tokio::test]
async fn test_fetch_by_city_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Paris"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", "test_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_body()))
        .mount(&mock_server)
        .await;

    let fetcher = OpenWeatherFetcher::new(mock_server.uri(), "test_key");
    let weather = fetcher.fetch_by_city("  Paris ", Unit::Metric).await.unwrap();

    assert_eq!(weather.name, "Paris");
    assert_eq!(weather.country.as_deref(), Some("FR"));
    assert_eq!(weather.humidity, 52);
    assert_eq!(weather.unit, Unit::Metric);
    assert_eq!(weather.condition.unwrap().main, "Clear");
}

#[tokio::test]
async fn test_fetch_by_coords_sends_lat_lon_and_units() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("lat", "48.85"))
        .and(query_param("lon", "2.35"))
        .and(query_param("units", "imperial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = OpenWeatherFetcher::new(format!("{}/", mock_server.uri()), "test_key");
    let weather = fetcher.fetch_by_coords(48.85, 2.35, Unit::Imperial).await.unwrap();

    assert_eq!(weather.name, "Paris");
    assert_eq!(weather.unit, Unit::Imperial);
}

#[tokio::test]
async fn test_city_not_found_is_domain_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "cod": "404",
            "message": "city not found"
        })))
        .mount(&mock_server)
        .await;

    let fetcher = OpenWeatherFetcher::new(mock_server.uri(), "test_key");
    let err = fetcher
        .fetch(&WeatherQuery::city("Atlantis"), Unit::Metric)
        .await
        .unwrap_err();

    match err {
        FetchError::Api { code, message } => {
            assert_eq!(code, "404");
            assert_eq!(message, "city not found");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_key_is_domain_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401,
            "message": "Invalid API key. Please see https://openweathermap.org/faq#error401 for more info."
        })))
        .mount(&mock_server)
        .await;

    let fetcher = OpenWeatherFetcher::new(mock_server.uri(), "bad_key");
    let err = fetcher.fetch_by_city("Paris", Unit::Metric).await.unwrap_err();

    assert!(err.to_string().starts_with("Invalid API key."));
}

#[tokio::test]
async fn test_non_json_body_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&mock_server)
        .await;

    let fetcher = OpenWeatherFetcher::new(mock_server.uri(), "test_key");
    let err = fetcher.fetch_by_city("Paris", Unit::Metric).await.unwrap_err();

    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let mock_server = MockServer::start().await;
    let uri = mock_server.uri();
    drop(mock_server);

    let fetcher = OpenWeatherFetcher::new(uri, "test_key");
    let err = fetcher.fetch_by_city("Paris", Unit::Metric).await.unwrap_err();

    assert!(matches!(err, FetchError::Network(_)));
}
