//! Weather API client for OpenWeatherMap integration
//!
//! This module provides the blocking HTTP client used to request current
//! weather for a city, the mapping from the OpenWeatherMap response into a
//! [`WeatherRecord`], and the sequential batch fetch that reports progress
//! through a [`FetchObserver`].

use crate::config::CityWeatherConfig;
use crate::models::{CityQuery, WeatherRecord};
use crate::{CityWeatherError, Result};
use anyhow::Context;
use reqwest::blocking::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Status code and body of one HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Minimal blocking HTTP seam used by [`WeatherFetcher`].
///
/// `Err` is reserved for transport failures (connection, TLS, timeout,
/// unreadable body); every HTTP status comes back as `Ok`.
pub trait HttpClient {
    fn get(&self, url: &str) -> std::result::Result<HttpResponse, String>;
}

impl<T: HttpClient + ?Sized> HttpClient for &T {
    fn get(&self, url: &str) -> std::result::Result<HttpResponse, String> {
        (**self).get(url)
    }
}

/// [`HttpClient`] backed by a blocking `reqwest` client
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    /// Create a client, applying the configured timeout if any
    pub fn new(timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            "cityweather/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> std::result::Result<HttpResponse, String> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| e.without_url().to_string())?;
        let status = response.status().as_u16();
        let body = response.text().map_err(|e| e.without_url().to_string())?;
        Ok(HttpResponse { status, body })
    }
}

/// Progress notifications emitted while a batch is fetched
#[derive(Debug)]
pub enum FetchEvent<'a> {
    /// The batch is about to start
    Started { total: usize },
    /// One city was processed, successfully or not
    Progress {
        city: &'a CityQuery,
        processed: usize,
        total: usize,
        error: Option<&'a CityWeatherError>,
    },
    /// All cities were processed
    Finished { succeeded: usize, failed: usize },
}

/// Receiver for [`FetchEvent`]s, implemented by the front end
pub trait FetchObserver {
    fn on_event(&self, event: FetchEvent<'_>);
}

/// Observer that ignores every event
pub struct NullObserver;

impl FetchObserver for NullObserver {
    fn on_event(&self, _event: FetchEvent<'_>) {}
}

/// A city that was skipped and the reason why
#[derive(Debug, Clone, PartialEq)]
pub struct FetchFailure {
    pub city: CityQuery,
    pub error: CityWeatherError,
}

/// Result of a batch fetch
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    /// Records in the order the cities were requested
    pub records: Vec<WeatherRecord>,
    /// Cities that were skipped, in request order
    pub failures: Vec<FetchFailure>,
}

/// Fetches current weather for cities through an injected [`HttpClient`]
pub struct WeatherFetcher<C> {
    client: C,
    base_url: String,
    api_key: String,
}

impl WeatherFetcher<ReqwestClient> {
    /// Build a fetcher with a real HTTP client from configuration
    pub fn from_config(config: &CityWeatherConfig) -> anyhow::Result<Self> {
        let timeout = config
            .weather
            .timeout_seconds
            .map(|secs| Duration::from_secs(secs.into()));
        if config.weather.api_key.is_none() {
            warn!("No API key configured; requests will be rejected by the weather API");
        }
        Ok(Self::new(
            ReqwestClient::new(timeout)?,
            config.weather.base_url.clone(),
            config.api_key().to_string(),
        ))
    }
}

impl<C: HttpClient> WeatherFetcher<C> {
    pub fn new(client: C, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Request URL for a city, metric units
    #[must_use]
    pub fn request_url(&self, city: &CityQuery) -> String {
        format!(
            "{}?q={}&appid={}&units=metric",
            self.base_url,
            urlencoding::encode(city.as_str()),
            urlencoding::encode(&self.api_key)
        )
    }

    /// Fetch the current weather for a single city
    #[instrument(skip_all, fields(city = %city))]
    pub fn fetch_city(&self, city: &CityQuery) -> Result<WeatherRecord> {
        let url = self.request_url(city);
        debug!("Weather API request URL: {}", redact_key(&url));

        let start_time = Instant::now();
        let response = self
            .client
            .get(&url)
            .map_err(|e| CityWeatherError::transport(city.as_str(), redact_key(&e)))?;

        debug!(
            "HTTP response received: {} in {:.3}s",
            response.status,
            start_time.elapsed().as_secs_f64()
        );

        if response.status != 200 {
            let message = openweathermap::error_message(&response.body)
                .unwrap_or_else(|| format!("request failed with status {}", response.status));
            debug!("Weather API returned {} for '{}': {}", response.status, city, message);
            return Err(CityWeatherError::fetch(city.as_str(), message));
        }

        let record = openweathermap::parse_current(city.as_str(), &response.body)
            .map_err(|message| CityWeatherError::fetch(city.as_str(), message))?;

        debug!(
            "Fetched '{}': {} humidity {}%",
            city,
            record.format_temperature(),
            record.humidity
        );
        Ok(record)
    }

    /// Fetch every city in order.
    ///
    /// A failing city is reported to the observer and recorded in
    /// [`FetchOutcome::failures`]; the batch always runs to the end.
    pub fn fetch_all(&self, cities: &[CityQuery], observer: &dyn FetchObserver) -> FetchOutcome {
        let total = cities.len();
        let start_time = Instant::now();
        info!("Fetching weather data for {} cities", total);
        observer.on_event(FetchEvent::Started { total });

        let mut outcome = FetchOutcome::default();
        for (index, city) in cities.iter().enumerate() {
            match self.fetch_city(city) {
                Ok(record) => {
                    outcome.records.push(record);
                    observer.on_event(FetchEvent::Progress {
                        city,
                        processed: index + 1,
                        total,
                        error: None,
                    });
                }
                Err(error) => {
                    observer.on_event(FetchEvent::Progress {
                        city,
                        processed: index + 1,
                        total,
                        error: Some(&error),
                    });
                    outcome.failures.push(FetchFailure {
                        city: city.clone(),
                        error,
                    });
                }
            }
        }

        info!(
            "Fetched {} of {} cities in {:.3}s",
            outcome.records.len(),
            total,
            start_time.elapsed().as_secs_f64()
        );
        observer.on_event(FetchEvent::Finished {
            succeeded: outcome.records.len(),
            failed: outcome.failures.len(),
        });
        outcome
    }
}

/// Hide the API key when logging request URLs
fn redact_key(url: &str) -> String {
    match url.find("appid=") {
        Some(start) => {
            let value_start = start + "appid=".len();
            let value_end = url[value_start..]
                .find('&')
                .map_or(url.len(), |offset| value_start + offset);
            format!("{}***{}", &url[..value_start], &url[value_end..])
        }
        None => url.to_string(),
    }
}

/// OpenWeatherMap API response structures
mod openweathermap {
    use super::WeatherRecord;
    use serde::Deserialize;

    /// Current weather response from the OpenWeatherMap API
    #[derive(Debug, Deserialize)]
    pub struct CurrentResponse {
        pub main: MainSection,
        pub weather: Vec<ConditionEntry>,
        pub coord: Coordinates,
        pub wind: WindSection,
    }

    #[derive(Debug, Deserialize)]
    pub struct MainSection {
        pub temp: f64,
        pub feels_like: f64,
        pub temp_min: f64,
        pub temp_max: f64,
        pub humidity: i64,
        pub pressure: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct ConditionEntry {
        pub main: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct Coordinates {
        pub lat: f64,
        pub lon: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct WindSection {
        pub speed: f64,
    }

    /// Error body returned with non-200 responses
    #[derive(Debug, Deserialize)]
    struct ErrorBody {
        message: Option<String>,
    }

    /// Extract the `message` field of an error body, if any
    pub fn error_message(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
    }

    /// Map a 200 body into a record for `city`
    pub fn parse_current(city: &str, body: &str) -> Result<WeatherRecord, String> {
        let response: CurrentResponse =
            serde_json::from_str(body).map_err(|e| format!("malformed response ({e})"))?;

        let condition = response
            .weather
            .into_iter()
            .next()
            .map(|w| w.main)
            .ok_or_else(|| "malformed response (empty weather list)".to_string())?;

        let humidity = u8::try_from(response.main.humidity)
            .ok()
            .filter(|h| *h <= 100)
            .ok_or_else(|| {
                format!(
                    "malformed response (humidity {} is outside 0-100)",
                    response.main.humidity
                )
            })?;

        let pressure = response.main.pressure;
        if !pressure.is_finite() || pressure < 0.0 || pressure > f64::from(u32::MAX) {
            return Err(format!("malformed response (pressure {pressure})"));
        }

        let record = WeatherRecord {
            city: city.to_string(),
            temperature: response.main.temp,
            feels_like: response.main.feels_like,
            temp_min: response.main.temp_min,
            temp_max: response.main.temp_max,
            humidity,
            pressure: pressure.round() as u32,
            wind_speed: response.wind.speed,
            condition,
            lat: response.coord.lat,
            lon: response.coord.lon,
        };
        record
            .validate()
            .map_err(|e| format!("malformed response ({e})"))?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    const PARIS_BODY: &str = r#"{
        "coord": {"lon": 2.3488, "lat": 48.8534},
        "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
        "main": {"temp": 18.5, "feels_like": 17.9, "temp_min": 17.1, "temp_max": 19.4,
                 "pressure": 1016, "humidity": 60},
        "wind": {"speed": 4.12, "deg": 250},
        "name": "Paris",
        "cod": 200
    }"#;

    /// Answers by city name, records every URL it was asked for
    struct ScriptedClient {
        responses: HashMap<&'static str, std::result::Result<HttpResponse, String>>,
        requested: RefCell<Vec<String>>,
    }

    impl ScriptedClient {
        fn new(entries: Vec<(&'static str, std::result::Result<HttpResponse, String>)>) -> Self {
            Self {
                responses: entries.into_iter().collect(),
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    impl HttpClient for ScriptedClient {
        fn get(&self, url: &str) -> std::result::Result<HttpResponse, String> {
            self.requested.borrow_mut().push(url.to_string());
            let query = url.split("q=").nth(1).unwrap_or_default();
            let city = query.split('&').next().unwrap_or_default();
            let city = urlencoding::decode(city).unwrap().into_owned();
            self.responses
                .get(city.as_str())
                .cloned()
                .unwrap_or_else(|| Ok(HttpResponse::new(404, r#"{"message":"city not found"}"#)))
        }
    }

    fn city(name: &str) -> CityQuery {
        CityQuery::new(name).unwrap()
    }

    #[test]
    fn test_request_url_encodes_parameters() {
        let fetcher = WeatherFetcher::new(
            ScriptedClient::new(vec![]),
            "https://api.example.com/weather",
            "key 1",
        );
        assert_eq!(
            fetcher.request_url(&city("Sao Paulo")),
            "https://api.example.com/weather?q=Sao%20Paulo&appid=key%201&units=metric"
        );
    }

    #[test]
    fn test_fetch_city_success() {
        let client = ScriptedClient::new(vec![("Paris", Ok(HttpResponse::new(200, PARIS_BODY)))]);
        let fetcher = WeatherFetcher::new(client, "http://test/weather", "k");

        let record = fetcher.fetch_city(&city("Paris")).unwrap();
        assert_eq!(record.city, "Paris");
        assert_eq!(record.temperature, 18.5);
        assert_eq!(record.feels_like, 17.9);
        assert_eq!(record.temp_min, 17.1);
        assert_eq!(record.temp_max, 19.4);
        assert_eq!(record.humidity, 60);
        assert_eq!(record.pressure, 1016);
        assert_eq!(record.wind_speed, 4.12);
        assert_eq!(record.condition, "Clouds");
        assert_eq!(record.lat, 48.8534);
        assert_eq!(record.lon, 2.3488);
    }

    #[test]
    fn test_fetch_city_uses_api_message() {
        let fetcher = WeatherFetcher::new(ScriptedClient::new(vec![]), "http://test/weather", "k");
        let err = fetcher.fetch_city(&city("Nowhereville")).unwrap_err();
        assert_eq!(err, CityWeatherError::fetch("Nowhereville", "city not found"));
    }

    #[test]
    fn test_fetch_city_generic_message_without_body() {
        let client = ScriptedClient::new(vec![("Oslo", Ok(HttpResponse::new(500, "oops")))]);
        let fetcher = WeatherFetcher::new(client, "http://test/weather", "k");
        let err = fetcher.fetch_city(&city("Oslo")).unwrap_err();
        assert_eq!(
            err,
            CityWeatherError::fetch("Oslo", "request failed with status 500")
        );
    }

    #[test]
    fn test_fetch_city_malformed_body() {
        let client = ScriptedClient::new(vec![
            ("Lima", Ok(HttpResponse::new(200, r#"{"main": {}}"#))),
            (
                "Quito",
                Ok(HttpResponse::new(200, PARIS_BODY.replace(r#""humidity": 60"#, r#""humidity": 130"#))),
            ),
            (
                "Bogota",
                Ok(HttpResponse::new(
                    200,
                    PARIS_BODY.replace(
                        r#"[{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}]"#,
                        "[]",
                    ),
                )),
            ),
        ]);
        let fetcher = WeatherFetcher::new(client, "http://test/weather", "k");

        for name in ["Lima", "Quito", "Bogota"] {
            let err = fetcher.fetch_city(&city(name)).unwrap_err();
            assert!(matches!(err, CityWeatherError::Fetch { .. }), "{name}: {err:?}");
            assert_eq!(err.city(), Some(name));
            assert!(err.to_string().contains("malformed response"));
        }
    }

    #[test]
    fn test_transport_error_hides_api_key() {
        let client = ScriptedClient::new(vec![(
            "Rome",
            Err("error sending request for url (http://test/weather?q=Rome&appid=SUPERSECRET&units=metric)"
                .to_string()),
        )]);
        let fetcher = WeatherFetcher::new(client, "http://test/weather", "SUPERSECRET");
        let err = fetcher.fetch_city(&city("Rome")).unwrap_err();
        assert!(!err.user_message().contains("SUPERSECRET"), "{err}");
        assert!(err.user_message().contains("appid=***&units=metric"));
    }

    #[test]
    fn test_fetch_city_transport_error() {
        let client = ScriptedClient::new(vec![("Rome", Err("connection refused".to_string()))]);
        let fetcher = WeatherFetcher::new(client, "http://test/weather", "k");
        let err = fetcher.fetch_city(&city("Rome")).unwrap_err();
        assert_eq!(err, CityWeatherError::transport("Rome", "connection refused"));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_fetch_all_requests_each_city_once_in_order() {
        let client = ScriptedClient::new(vec![("Paris", Ok(HttpResponse::new(200, PARIS_BODY)))]);
        let fetcher = WeatherFetcher::new(&client, "http://test/weather", "k");
        let cities = vec![city("Paris"), city("Atlantis"), city("Paris")];

        let outcome = fetcher.fetch_all(&cities, &NullObserver);

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].city, city("Atlantis"));
        let requested = client.requested.borrow();
        assert_eq!(requested.len(), 3);
        assert!(requested[1].contains("q=Atlantis"));
    }

    #[test]
    fn test_redact_key() {
        assert_eq!(
            redact_key("http://x/w?q=Paris&appid=secret&units=metric"),
            "http://x/w?q=Paris&appid=***&units=metric"
        );
        assert_eq!(redact_key("http://x/w?appid=secret"), "http://x/w?appid=***");
        assert_eq!(redact_key("http://x/w?q=Paris"), "http://x/w?q=Paris");
    }
}
