//! Terminal front end
//!
//! A small state machine around [`WeatherPipeline`]: it waits for a city
//! list (Idle), fetches it (Fetching), then prints the table, the summary
//! and writes the charts (Displaying) before going back to Idle.

use crate::analysis::AnalysisSummary;
use crate::api::{FetchObserver, HttpClient};
use crate::charts::Chart;
use crate::models::WeatherDataset;
use crate::pipeline::{FetchedBatch, PipelineReport, WeatherPipeline};
use crate::{CityWeatherError, Result};
use console::style;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

pub const BANNER: &str = "Weather Data Analysis";
pub const EXAMPLE_HINT: &str =
    "For example: New York, London, Tokyo, Delhi, Sydney, Sao Paulo, Cairo, Moscow";
pub const PROMPT: &str = "Enter city names separated by commas";

/// Where the shell is in handling a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellState {
    Idle,
    Fetching,
    Displaying,
}

/// How a submission ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunStatus {
    /// The report was printed and the charts written
    Displayed {
        records: usize,
        failures: usize,
        charts: Vec<PathBuf>,
    },
    /// Input or no-data warning; nothing was analyzed
    Warned(CityWeatherError),
    /// Analysis, rendering or chart writing failed
    Failed(CityWeatherError),
}

/// Interactive driver of one [`WeatherPipeline`]
pub struct Shell<C> {
    pipeline: WeatherPipeline<C>,
    output_dir: PathBuf,
    state: ShellState,
}

impl<C: HttpClient> Shell<C> {
    pub fn new(pipeline: WeatherPipeline<C>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            pipeline,
            output_dir: output_dir.into(),
            state: ShellState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> ShellState {
        self.state
    }

    /// Handle one submitted city list and return to Idle.
    ///
    /// Only failures to write to `out` are returned as errors; every
    /// pipeline outcome is reported on `out` and summarized in the
    /// returned [`RunStatus`].
    pub fn submit<W: Write>(
        &mut self,
        input: &str,
        observer: &dyn FetchObserver,
        out: &mut W,
    ) -> io::Result<RunStatus> {
        self.state = ShellState::Fetching;
        let batch = match self.pipeline.fetch(input, observer) {
            Ok(batch) => batch,
            Err(err) => {
                self.state = ShellState::Idle;
                debug!("Submission halted: {}", err);
                writeln!(out, "{}", style(err.user_message()).yellow())?;
                return Ok(RunStatus::Warned(err));
            }
        };

        self.state = ShellState::Displaying;
        let status = self.display(batch, out);
        self.state = ShellState::Idle;
        status
    }

    fn display<W: Write>(&self, batch: FetchedBatch, out: &mut W) -> io::Result<RunStatus> {
        let report = match self.pipeline.analyze(batch) {
            Ok(report) => report,
            Err(err) => {
                error!("Analysis failed: {}", err);
                writeln!(out, "{}", style(err.user_message()).red())?;
                return Ok(RunStatus::Failed(err));
            }
        };

        print_report(&report, out)?;

        match write_charts(&report.charts, &self.output_dir) {
            Ok(paths) => {
                for (chart, path) in report.charts.iter().zip(&paths) {
                    print_section(out, chart.kind.title())?;
                    writeln!(out, "Saved to {}", path.display())?;
                }
                info!("Wrote {} charts to {}", paths.len(), self.output_dir.display());
                Ok(RunStatus::Displayed {
                    records: report.dataset.len(),
                    failures: report.failures.len(),
                    charts: paths,
                })
            }
            Err(err) => {
                error!("Writing charts failed: {}", err);
                writeln!(out, "{}", style(err.user_message()).red())?;
                Ok(RunStatus::Failed(err))
            }
        }
    }
}

/// Write every chart into `dir`, replacing files from earlier runs
pub fn write_charts(charts: &[Chart], dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    charts
        .iter()
        .map(|chart| -> Result<PathBuf> {
            let path = dir.join(chart.kind.file_name());
            fs::write(&path, &chart.svg)?;
            Ok(path)
        })
        .collect()
}

pub fn print_banner<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", style(BANNER).bold().cyan())?;
    writeln!(out, "{}", style(EXAMPLE_HINT).dim())?;
    writeln!(out)
}

fn print_section<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", style(title).bold().underlined())
}

fn print_report<W: Write>(report: &PipelineReport, out: &mut W) -> io::Result<()> {
    print_section(out, "Weather Data")?;
    writeln!(
        out,
        "Fetched at {}",
        report.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    print_table(&report.dataset, out)?;

    if !report.failures.is_empty() {
        let skipped: Vec<&str> = report.failures.iter().map(|f| f.city.as_str()).collect();
        writeln!(
            out,
            "{}",
            style(format!("Skipped {}: {}", skipped.len(), skipped.join(", "))).yellow()
        )?;
    }

    print_section(out, "Analysis Results")?;
    for line in summary_lines(&report.summary) {
        writeln!(out, "{}", style(line).green())?;
    }
    Ok(())
}

/// The three summary sentences shown after the table
#[must_use]
pub fn summary_lines(summary: &AnalysisSummary) -> [String; 3] {
    [
        format!(
            "City with the highest temperature: {} ({:.1}°C)",
            summary.hottest_city, summary.hottest_temperature
        ),
        format!(
            "City with the lowest humidity: {} ({}%)",
            summary.driest_city, summary.driest_humidity
        ),
        format!(
            "Most common weather condition: {}",
            summary.most_common_condition
        ),
    ]
}

const TABLE_HEADERS: [&str; 11] = [
    "City",
    "Temp (°C)",
    "Feels Like",
    "Min",
    "Max",
    "Humidity (%)",
    "Pressure (hPa)",
    "Wind (m/s)",
    "Condition",
    "Lat",
    "Lon",
];

/// Render the dataset as a fixed-width text table
pub fn print_table<W: Write>(dataset: &WeatherDataset, out: &mut W) -> io::Result<()> {
    let rows: Vec<[String; 11]> = dataset
        .iter()
        .map(|r| {
            [
                r.city.clone(),
                format!("{:.1}", r.temperature),
                format!("{:.1}", r.feels_like),
                format!("{:.1}", r.temp_min),
                format!("{:.1}", r.temp_max),
                r.humidity.to_string(),
                r.pressure.to_string(),
                format!("{:.1}", r.wind_speed),
                r.condition.clone(),
                format!("{:.2}", r.lat),
                format!("{:.2}", r.lon),
            ]
        })
        .collect();

    let mut widths = TABLE_HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header: Vec<String> = TABLE_HEADERS
        .iter()
        .zip(widths)
        .map(|(h, w)| pad(h, w))
        .collect();
    writeln!(out, "{}", style(header.join("  ").trim_end()).bold())?;

    for row in &rows {
        let cells: Vec<String> = row.iter().zip(widths).map(|(c, w)| pad(c, w)).collect();
        writeln!(out, "{}", cells.join("  ").trim_end())?;
    }
    Ok(())
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.chars().count());
    format!("{text}{}", " ".repeat(fill))
}
