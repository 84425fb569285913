//! Per-city weather record, city query and hemisphere model

use crate::CityWeatherError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A trimmed, non-empty city name submitted for lookup
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CityQuery(String);

impl CityQuery {
    /// Create a query from free text, trimming surrounding whitespace
    pub fn new(name: &str) -> crate::Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CityWeatherError::input("City name cannot be empty"));
        }
        Ok(Self(name.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CityQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CityQuery {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Current observation for one successfully fetched city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    /// City name as submitted by the user
    pub city: String,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Perceived temperature in Celsius
    pub feels_like: f64,
    /// Minimum temperature currently observed in the area, Celsius
    pub temp_min: f64,
    /// Maximum temperature currently observed in the area, Celsius
    pub temp_max: f64,
    /// Relative humidity in percent (0-100)
    pub humidity: u8,
    /// Atmospheric pressure in hPa
    pub pressure: u32,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Primary condition label, e.g. "Clouds"
    pub condition: String,
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
}

impl WeatherRecord {
    /// Hemisphere the city lies in
    #[must_use]
    pub fn region(&self) -> Hemisphere {
        Hemisphere::from_latitude(self.lat)
    }

    /// Difference between measured and perceived temperature
    #[must_use]
    pub fn temp_diff(&self) -> f64 {
        self.temperature - self.feels_like
    }

    /// Check the range invariants of a record
    pub fn validate(&self) -> Result<(), String> {
        if self.humidity > 100 {
            return Err(format!("humidity {} is outside 0-100", self.humidity));
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(format!("latitude {} is outside -90..90", self.lat));
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(format!("longitude {} is outside -180..180", self.lon));
        }
        Ok(())
    }

    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{:.1}°C", self.temperature)
    }

}

/// Northern or southern hemisphere, derived from latitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Hemisphere {
    Northern,
    Southern,
}

impl Hemisphere {
    pub const ALL: [Self; 2] = [Self::Northern, Self::Southern];

    /// The equator belongs to the northern hemisphere
    #[must_use]
    pub fn from_latitude(lat: f64) -> Self {
        if lat >= 0.0 {
            Self::Northern
        } else {
            Self::Southern
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Northern => "Northern Hemisphere",
            Self::Southern => "Southern Hemisphere",
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
pub(crate) fn sample_record(city: &str, temperature: f64, humidity: u8) -> WeatherRecord {
    WeatherRecord {
        city: city.to_string(),
        temperature,
        feels_like: temperature - 1.0,
        temp_min: temperature - 2.0,
        temp_max: temperature + 2.0,
        humidity,
        pressure: 1013,
        wind_speed: 3.5,
        condition: "Clear".to_string(),
        lat: 48.85,
        lon: 2.35,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, Hemisphere::Northern)]
    #[case(-0.0001, Hemisphere::Southern)]
    #[case(51.5, Hemisphere::Northern)]
    #[case(-33.87, Hemisphere::Southern)]
    #[case(90.0, Hemisphere::Northern)]
    #[case(-90.0, Hemisphere::Southern)]
    fn test_hemisphere_from_latitude(#[case] lat: f64, #[case] expected: Hemisphere) {
        assert_eq!(Hemisphere::from_latitude(lat), expected);
    }

    #[test]
    fn test_temp_diff() {
        let mut record = sample_record("Paris", 18.5, 60);
        record.feels_like = 17.25;
        assert!((record.temp_diff() - 1.25).abs() < 1e-9);
    }

    #[test]
    fn test_validate_rejects_out_of_range_values() {
        let record = sample_record("Paris", 18.5, 60);
        assert!(record.validate().is_ok());

        let mut bad = record.clone();
        bad.humidity = 101;
        assert!(bad.validate().unwrap_err().contains("humidity"));

        let mut bad = record.clone();
        bad.lat = 91.0;
        assert!(bad.validate().unwrap_err().contains("latitude"));

        let mut bad = record;
        bad.lon = -180.5;
        assert!(bad.validate().unwrap_err().contains("longitude"));
    }

    #[test]
    fn test_city_query_trims() {
        let query = CityQuery::new("  New York ").unwrap();
        assert_eq!(query.as_str(), "New York");
        assert!(CityQuery::new("   ").is_err());
    }

    #[test]
    fn test_formatting() {
        let record = sample_record("Paris", 18.5, 60);
        assert_eq!(record.format_temperature(), "18.5°C");
    }
}
