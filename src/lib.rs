//! `cityweather` - current weather for a list of cities, analyzed and charted
//!
//! This library provides the city list parser, the OpenWeatherMap fetcher,
//! the dataset and its summary statistics, the chart renderer and the
//! terminal shell that drives them.

pub mod analysis;
pub mod api;
pub mod charts;
pub mod cities;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod progress;
pub mod shell;

// Re-export core types for public API
pub use analysis::{AnalysisSummary, analyze};
pub use api::{FetchEvent, FetchObserver, HttpClient, HttpResponse, ReqwestClient, WeatherFetcher};
pub use charts::{Chart, ChartKind, ChartSize};
pub use cities::CityListParser;
pub use config::CityWeatherConfig;
pub use error::CityWeatherError;
pub use models::{CityQuery, Hemisphere, WeatherDataset, WeatherRecord};
pub use pipeline::{PipelineReport, WeatherPipeline};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, CityWeatherError>;
