//! Fetch → aggregate → analyze → render, for one submitted city list

use crate::analysis::{AnalysisSummary, analyze};
use crate::api::{FetchFailure, FetchObserver, HttpClient, WeatherFetcher};
use crate::charts::{self, Chart, ChartSize};
use crate::cities::CityListParser;
use crate::models::WeatherDataset;
use crate::{CityWeatherError, Result};
use chrono::{DateTime, Utc};
use tracing::{info, instrument};

/// Records gathered for one city list, before analysis
#[derive(Debug, Clone)]
pub struct FetchedBatch {
    pub dataset: WeatherDataset,
    pub failures: Vec<FetchFailure>,
    pub fetched_at: DateTime<Utc>,
}

/// Everything one run produces
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub dataset: WeatherDataset,
    pub failures: Vec<FetchFailure>,
    pub summary: AnalysisSummary,
    pub charts: Vec<Chart>,
    pub fetched_at: DateTime<Utc>,
}

/// Runs the whole analysis for a city list through a [`WeatherFetcher`]
pub struct WeatherPipeline<C> {
    fetcher: WeatherFetcher<C>,
    chart_size: ChartSize,
}

impl<C: HttpClient> WeatherPipeline<C> {
    pub fn new(fetcher: WeatherFetcher<C>, chart_size: ChartSize) -> Self {
        Self {
            fetcher,
            chart_size,
        }
    }

    /// Parse the list, fetch every city and aggregate the successes.
    ///
    /// Fails with an input error before any request when the list has no
    /// usable name, and with [`CityWeatherError::NoData`] when every city
    /// failed.
    #[instrument(skip_all)]
    pub fn fetch(&self, input: &str, observer: &dyn FetchObserver) -> Result<FetchedBatch> {
        let cities = CityListParser::parse(input)?;
        info!("Parsed {} cities", cities.len());

        let outcome = self.fetcher.fetch_all(&cities, observer);
        let dataset = WeatherDataset::aggregate(outcome.records);
        if dataset.is_empty() {
            info!("All {} cities failed, nothing to analyze", cities.len());
            return Err(CityWeatherError::NoData);
        }

        Ok(FetchedBatch {
            dataset,
            failures: outcome.failures,
            fetched_at: Utc::now(),
        })
    }

    /// Analyze a fetched batch and render its charts
    pub fn analyze(&self, batch: FetchedBatch) -> Result<PipelineReport> {
        let summary = analyze(&batch.dataset)?;
        let charts = charts::render_all(&batch.dataset, self.chart_size)?;
        info!(
            "Analyzed {} records, rendered {} charts",
            batch.dataset.len(),
            charts.len()
        );

        Ok(PipelineReport {
            dataset: batch.dataset,
            failures: batch.failures,
            summary,
            charts,
            fetched_at: batch.fetched_at,
        })
    }

    /// [`Self::fetch`] followed by [`Self::analyze`]
    pub fn run(&self, input: &str, observer: &dyn FetchObserver) -> Result<PipelineReport> {
        let batch = self.fetch(input, observer)?;
        self.analyze(batch)
    }
}
