//! Data models for the cityweather pipeline
//!
//! This module contains the core domain models organized by concern:
//! - Record: one city's observation, the city query and hemisphere buckets
//! - Dataset: the ordered table of records produced by one run

pub mod dataset;
pub mod record;

pub use dataset::WeatherDataset;
pub use record::{CityQuery, Hemisphere, WeatherRecord};
