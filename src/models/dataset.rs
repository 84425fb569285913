//! Tabular collection of weather records

use super::{Hemisphere, WeatherRecord};
use serde::{Deserialize, Serialize};

/// Ordered rows of weather records, one per successfully fetched city
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherDataset {
    records: Vec<WeatherRecord>,
}

impl WeatherDataset {
    /// Fold fetched records into a dataset, keeping fetch order
    #[must_use]
    pub fn aggregate<I>(records: I) -> Self
    where
        I: IntoIterator<Item = WeatherRecord>,
    {
        Self {
            records: records.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn records(&self) -> &[WeatherRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WeatherRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Temperature column
    #[must_use]
    pub fn temperatures(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.temperature).collect()
    }

    /// Records falling in the given hemisphere, in dataset order
    pub fn in_region(&self, region: Hemisphere) -> impl Iterator<Item = &WeatherRecord> {
        self.records.iter().filter(move |r| r.region() == region)
    }

    /// Distinct condition labels in order of first appearance
    #[must_use]
    pub fn conditions(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for record in &self.records {
            if !seen.contains(&record.condition.as_str()) {
                seen.push(&record.condition);
            }
        }
        seen
    }
}

impl<'a> IntoIterator for &'a WeatherDataset {
    type Item = &'a WeatherRecord;
    type IntoIter = std::slice::Iter<'a, WeatherRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<WeatherRecord> for WeatherDataset {
    fn from_iter<T: IntoIterator<Item = WeatherRecord>>(iter: T) -> Self {
        Self::aggregate(iter)
    }
}
