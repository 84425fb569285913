//! The reqwest-backed fetcher against a mock OpenWeatherMap server

use cityweather::api::NullObserver;
use cityweather::{CityQuery, CityWeatherError, ReqwestClient, WeatherFetcher};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn paris_body() -> serde_json::Value {
    serde_json::json!({
        "coord": {"lon": 2.3488, "lat": 48.8534},
        "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
        "main": {
            "temp": 11.2, "feels_like": 10.4, "temp_min": 9.8, "temp_max": 12.6,
            "pressure": 1004, "humidity": 87
        },
        "wind": {"speed": 6.17, "deg": 220},
        "name": "Paris",
        "cod": 200
    })
}

/// The blocking client must not run on the async test runtime itself
async fn fetch_blocking(
    base_url: String,
    cities: &'static [&'static str],
) -> cityweather::api::FetchOutcome {
    tokio::task::spawn_blocking(move || {
        let client = ReqwestClient::new(Some(Duration::from_secs(5))).unwrap();
        let fetcher = WeatherFetcher::new(client, base_url, "secret key");
        let cities: Vec<CityQuery> = cities.iter().map(|c| CityQuery::new(c).unwrap()).collect();
        fetcher.fetch_all(&cities, &NullObserver)
    })
    .await
    .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_sends_metric_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Paris"))
        .and(query_param("appid", "secret key"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = fetch_blocking(format!("{}/data/2.5/weather", mock_server.uri()), &["Paris"]).await;

    assert!(outcome.failures.is_empty(), "{:?}", outcome.failures);
    let record = &outcome.records[0];
    assert_eq!(record.city, "Paris");
    assert_eq!(record.temperature, 11.2);
    assert_eq!(record.humidity, 87);
    assert_eq!(record.pressure, 1004);
    assert_eq!(record.condition, "Rain");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_not_found_uses_api_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("q", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_body()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("q", "Nowhereville"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({"cod": "404", "message": "city not found"})),
        )
        .mount(&mock_server)
        .await;

    let outcome = fetch_blocking(mock_server.uri(), &["Paris", "Nowhereville"]).await;

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(
        outcome.failures[0].error,
        CityWeatherError::fetch("Nowhereville", "city not found")
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unauthorized_and_server_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("q", "Oslo"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401,
            "message": "Invalid API key. Please see https://openweathermap.org/faq#error401 for more info."
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("q", "Lima"))
        .respond_with(ResponseTemplate::new(503).set_body_string("<html>busy</html>"))
        .mount(&mock_server)
        .await;

    let outcome = fetch_blocking(mock_server.uri(), &["Oslo", "Lima"]).await;

    assert!(outcome.records.is_empty());
    assert!(outcome.failures[0].error.to_string().contains("Invalid API key"));
    assert_eq!(
        outcome.failures[1].error,
        CityWeatherError::fetch("Lima", "request failed with status 503")
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_connection_refused_is_transport_error() {
    // a port nothing listens on any more
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}/weather", listener.local_addr().unwrap());
    drop(listener);

    let outcome = fetch_blocking(uri, &["Paris"]).await;

    assert!(outcome.records.is_empty());
    let error = &outcome.failures[0].error;
    assert!(matches!(error, CityWeatherError::Transport { .. }), "{error:?}");
    assert!(error.to_string().starts_with("An error occurred while fetching Paris"));
    assert!(!error.user_message().contains("secret"), "{error}");
}
