//! Summary statistics over a weather dataset

use crate::models::WeatherDataset;
use crate::{CityWeatherError, Result};
use serde::Serialize;

/// Hottest city, driest city and the most common condition of a dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    pub hottest_city: String,
    pub hottest_temperature: f64,
    pub driest_city: String,
    pub driest_humidity: u8,
    pub most_common_condition: String,
}

/// Compute the summary of a non-empty dataset.
///
/// Ties are broken by dataset order: the first hottest row, the first
/// driest row, and among equally frequent conditions the one that
/// appears first.
pub fn analyze(dataset: &WeatherDataset) -> Result<AnalysisSummary> {
    let records = dataset.records();
    let first = records.first().ok_or(CityWeatherError::EmptyDataset)?;

    let mut hottest = first;
    let mut driest = first;
    for record in &records[1..] {
        if record.temperature > hottest.temperature {
            hottest = record;
        }
        if record.humidity < driest.humidity {
            driest = record;
        }
    }

    // (label, count) in order of first appearance
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for record in records {
        match counts.iter_mut().find(|(label, _)| *label == record.condition) {
            Some((_, count)) => *count += 1,
            None => counts.push((record.condition.as_str(), 1)),
        }
    }
    let mut modal = counts[0];
    for entry in &counts[1..] {
        if entry.1 > modal.1 {
            modal = *entry;
        }
    }

    Ok(AnalysisSummary {
        hottest_city: hottest.city.clone(),
        hottest_temperature: hottest.temperature,
        driest_city: driest.city.clone(),
        driest_humidity: driest.humidity,
        most_common_condition: modal.0.to_string(),
    })
}
