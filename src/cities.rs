//! City list parsing
//!
//! Turns the free-text, comma-separated city list typed by the user into
//! an ordered sequence of [`CityQuery`] values.

use crate::models::CityQuery;
use crate::{CityWeatherError, Result};

/// Message shown when nothing at all was entered
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter at least one city name.";

/// Message shown when the input only contained separators and blanks
pub const NO_VALID_CITY_MESSAGE: &str = "Please enter at least one valid city name.";

/// City list parsing utilities
pub struct CityListParser;

impl CityListParser {
    /// Parse a comma-separated city list.
    ///
    /// Pieces are trimmed and blank pieces dropped. Order and duplicates
    /// are kept as typed.
    pub fn parse(input: &str) -> Result<Vec<CityQuery>> {
        if input.trim().is_empty() {
            return Err(CityWeatherError::input(EMPTY_INPUT_MESSAGE));
        }

        let cities: Vec<CityQuery> = input
            .split(',')
            .filter_map(|piece| CityQuery::new(piece).ok())
            .collect();

        if cities.is_empty() {
            return Err(CityWeatherError::input(NO_VALID_CITY_MESSAGE));
        }

        Ok(cities)
    }
}
