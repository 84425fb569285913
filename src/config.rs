//! Configuration management for `cityweather`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::CityWeatherError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Plain environment variable holding the API key
pub const API_KEY_ENV: &str = "API_KEY";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CityWeatherConfig {
    /// Weather API configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Chart output configuration
    #[serde(default)]
    pub charts: ChartConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key
    pub api_key: Option<String>,
    /// Current-weather endpoint
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Request timeout in seconds; the HTTP client default applies when unset
    pub timeout_seconds: Option<u32>,
}

/// Chart output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Directory the SVG charts are written to
    #[serde(default = "default_chart_output_dir")]
    pub output_dir: PathBuf,
    /// Chart width in pixels
    #[serde(default = "default_chart_width")]
    pub width: u32,
    /// Chart height in pixels
    #[serde(default = "default_chart_height")]
    pub height: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5/weather".to_string()
}

fn default_chart_output_dir() -> PathBuf {
    PathBuf::from("charts")
}

fn default_chart_width() -> u32 {
    1000
}

fn default_chart_height() -> u32 {
    600
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            timeout_seconds: None,
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            output_dir: default_chart_output_dir(),
            width: default_chart_width(),
            height: default_chart_height(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl CityWeatherConfig {
    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // CITYWEATHER_WEATHER__BASE_URL -> weather.base_url
        builder = builder.add_source(
            Environment::with_prefix("CITYWEATHER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: CityWeatherConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        if config.weather.api_key.is_none() {
            config.weather.api_key = std::env::var(API_KEY_ENV).ok();
        }

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cityweather").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self
            .weather
            .api_key
            .as_deref()
            .is_some_and(|key| key.trim().is_empty())
        {
            self.weather.api_key = None;
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.timeout_seconds == Some(0) {
            self.weather.timeout_seconds = None;
        }
        if self.charts.output_dir.as_os_str().is_empty() {
            self.charts.output_dir = default_chart_output_dir();
        }
        if self.charts.width == 0 {
            self.charts.width = default_chart_width();
        }
        if self.charts.height == 0 {
            self.charts.height = default_chart_height();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// API key sent with every request; empty when none is configured
    #[must_use]
    pub fn api_key(&self) -> &str {
        self.weather.api_key.as_deref().unwrap_or_default()
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds.is_some_and(|t| t > 300) {
            return Err(
                CityWeatherError::config("Weather API timeout cannot exceed 300 seconds").into(),
            );
        }

        let (width, height) = (self.charts.width, self.charts.height);
        if !(200..=4000).contains(&width) || !(150..=4000).contains(&height) {
            return Err(CityWeatherError::config(format!(
                "Chart size {width}x{height} is out of range (200-4000 x 150-4000 pixels)"
            ))
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(CityWeatherError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(CityWeatherError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.weather.base_url.starts_with("http://")
            && !self.weather.base_url.starts_with("https://")
        {
            return Err(CityWeatherError::config(
                "Weather API base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }
}
