//! Error types and handling for the `cityweather` pipeline

use thiserror::Error;

/// Main error type for the `cityweather` pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CityWeatherError {
    /// The submitted city list contained no usable names
    #[error("Invalid input: {message}")]
    Input { message: String },

    /// Non-200 response or malformed body for a single city
    #[error("Error fetching data for {city}: {message}")]
    Fetch { city: String, message: String },

    /// Network failure while requesting a single city
    #[error("An error occurred while fetching {city}: {message}")]
    Transport { city: String, message: String },

    /// Every city failed, nothing left to analyze
    #[error("No weather data available for the selected cities.")]
    NoData,

    /// The analyzer was handed an empty dataset
    #[error("Cannot analyze an empty weather dataset")]
    EmptyDataset,

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Chart rendering errors
    #[error("Chart error: {message}")]
    Chart { message: String },

    /// I/O operation errors (writing charts)
    #[error("I/O error: {message}")]
    Io { message: String },
}

impl CityWeatherError {
    /// Create a new input error
    pub fn input<S: Into<String>>(message: S) -> Self {
        Self::Input {
            message: message.into(),
        }
    }

    /// Create a new per-city fetch error
    pub fn fetch<C: Into<String>, S: Into<String>>(city: C, message: S) -> Self {
        Self::Fetch {
            city: city.into(),
            message: message.into(),
        }
    }

    /// Create a new per-city transport error
    pub fn transport<C: Into<String>, S: Into<String>>(city: C, message: S) -> Self {
        Self::Transport {
            city: city.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new chart error
    pub fn chart<S: Into<String>>(message: S) -> Self {
        Self::Chart {
            message: message.into(),
        }
    }

    /// City the error refers to, if it is a per-city error
    #[must_use]
    pub fn city(&self) -> Option<&str> {
        match self {
            Self::Fetch { city, .. } | Self::Transport { city, .. } => Some(city),
            _ => None,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Input { message } => message.clone(),
            Self::Fetch { .. } | Self::Transport { .. } | Self::NoData => self.to_string(),
            Self::EmptyDataset => {
                "No weather data to analyze. Fetch at least one city first.".to_string()
            }
            Self::Config { .. } => {
                "Configuration error. Please check your config file and API key.".to_string()
            }
            Self::Chart { message } => format!("Unable to render chart: {message}"),
            Self::Io { message } => format!("Unable to write charts: {message}"),
        }
    }
}

impl From<std::io::Error> for CityWeatherError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let input_err = CityWeatherError::input("empty");
        assert!(matches!(input_err, CityWeatherError::Input { .. }));

        let fetch_err = CityWeatherError::fetch("Paris", "city not found");
        assert!(matches!(fetch_err, CityWeatherError::Fetch { .. }));
        assert_eq!(fetch_err.city(), Some("Paris"));

        let transport_err = CityWeatherError::transport("Oslo", "connection refused");
        assert_eq!(transport_err.city(), Some("Oslo"));
        assert_eq!(CityWeatherError::NoData.city(), None);
    }

    #[test]
    fn test_user_messages() {
        let input_err = CityWeatherError::input("Please enter at least one city name.");
        assert_eq!(input_err.user_message(), "Please enter at least one city name.");

        let fetch_err = CityWeatherError::fetch("Nowhereville", "city not found");
        assert_eq!(
            fetch_err.user_message(),
            "Error fetching data for Nowhereville: city not found"
        );

        assert_eq!(
            CityWeatherError::NoData.user_message(),
            "No weather data available for the selected cities."
        );
        assert_ne!(
            CityWeatherError::NoData.user_message(),
            input_err.user_message()
        );

        let config_err = CityWeatherError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CityWeatherError = io_err.into();
        assert!(matches!(err, CityWeatherError::Io { .. }));
        assert!(err.user_message().contains("file not found"));
    }
}
