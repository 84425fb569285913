//! Chart rendering
//!
//! Seven independent charts, each rendered from a [`WeatherDataset`] into
//! a standalone SVG document with `plotters`. Chart functions never modify
//! the dataset; derived columns (hemisphere, temperature minus feels-like)
//! are computed while drawing.

mod distribution;
mod pressure;
mod scatter;
pub mod stats;

use crate::models::WeatherDataset;
use crate::{CityWeatherError, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fmt;

pub use distribution::{hemisphere_box_plots, temperature_histogram};
pub use pressure::{
    humidity_over_pressure, temp_feels_like_over_pressure, temperature_over_pressure,
    wind_speed_over_pressure,
};
pub use scatter::temperature_vs_humidity;

/// Number of bins of the temperature histogram
pub const HISTOGRAM_BINS: usize = 10;

const CAPTION_FONT: (&str, u32) = ("sans-serif", 22);

pub(crate) type DrawResult = std::result::Result<(), Box<dyn std::error::Error>>;
pub(crate) type SvgArea<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// The seven charts, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    TemperatureVsHumidity,
    HemisphereBoxPlots,
    TemperatureHistogram,
    HumidityOverPressure,
    TemperatureOverPressure,
    TempFeelsLikeOverPressure,
    WindSpeedOverPressure,
}

impl ChartKind {
    pub const ALL: [Self; 7] = [
        Self::TemperatureVsHumidity,
        Self::HemisphereBoxPlots,
        Self::TemperatureHistogram,
        Self::HumidityOverPressure,
        Self::TemperatureOverPressure,
        Self::TempFeelsLikeOverPressure,
        Self::WindSpeedOverPressure,
    ];

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::TemperatureVsHumidity => "Temperature vs. Humidity",
            Self::HemisphereBoxPlots => "Temperature and Humidity by Hemisphere",
            Self::TemperatureHistogram => "Histogram of Temperatures Across Cities",
            Self::HumidityOverPressure => "Humidity over Pressure",
            Self::TemperatureOverPressure => "Temperature over Pressure",
            Self::TempFeelsLikeOverPressure => {
                "Variance between Temperature and Feels-Like Temperature over Pressure"
            }
            Self::WindSpeedOverPressure => "Wind Speed over Pressure",
        }
    }

    /// File name used when the chart is written to disk
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::TemperatureVsHumidity => "01_temperature_vs_humidity.svg",
            Self::HemisphereBoxPlots => "02_hemisphere_box_plots.svg",
            Self::TemperatureHistogram => "03_temperature_histogram.svg",
            Self::HumidityOverPressure => "04_humidity_over_pressure.svg",
            Self::TemperatureOverPressure => "05_temperature_over_pressure.svg",
            Self::TempFeelsLikeOverPressure => "06_temp_feels_like_over_pressure.svg",
            Self::WindSpeedOverPressure => "07_wind_speed_over_pressure.svg",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Output size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartSize {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
        }
    }
}

/// One rendered chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chart {
    pub kind: ChartKind,
    pub svg: String,
}

/// Render all seven charts in display order
pub fn render_all(dataset: &WeatherDataset, size: ChartSize) -> Result<Vec<Chart>> {
    ChartKind::ALL
        .iter()
        .map(|kind| render_kind(*kind, dataset, size))
        .collect()
}

/// Render a single chart by kind
pub fn render_kind(kind: ChartKind, dataset: &WeatherDataset, size: ChartSize) -> Result<Chart> {
    match kind {
        ChartKind::TemperatureVsHumidity => temperature_vs_humidity(dataset, size),
        ChartKind::HemisphereBoxPlots => hemisphere_box_plots(dataset, size),
        ChartKind::TemperatureHistogram => temperature_histogram(dataset, size),
        ChartKind::HumidityOverPressure => humidity_over_pressure(dataset, size),
        ChartKind::TemperatureOverPressure => temperature_over_pressure(dataset, size),
        ChartKind::TempFeelsLikeOverPressure => temp_feels_like_over_pressure(dataset, size),
        ChartKind::WindSpeedOverPressure => wind_speed_over_pressure(dataset, size),
    }
}

/// Draw into an in-memory SVG document.
///
/// An empty dataset yields a titled "No data" placeholder instead of
/// calling `draw`.
pub(crate) fn render<F>(
    kind: ChartKind,
    dataset: &WeatherDataset,
    size: ChartSize,
    draw: F,
) -> Result<Chart>
where
    F: FnOnce(&SvgArea<'_>) -> DrawResult,
{
    let to_error = |e: &dyn fmt::Display| CityWeatherError::chart(format!("{kind}: {e}"));

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (size.width, size.height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| to_error(&e))?;
        if dataset.is_empty() {
            draw_placeholder(&root, kind).map_err(|e| to_error(&e))?;
        } else {
            draw(&root).map_err(|e| to_error(&e))?;
        }
        root.present().map_err(|e| to_error(&e))?;
    }
    Ok(Chart { kind, svg })
}

fn draw_placeholder(root: &SvgArea<'_>, kind: ChartKind) -> DrawResult {
    let area = root.titled(kind.title(), CAPTION_FONT)?;
    let (width, height) = area.dim_in_pixel();
    let center = (
        i32::try_from(width / 2).unwrap_or(0),
        i32::try_from(height / 2).unwrap_or(0),
    );
    area.draw(&Text::new(
        "No data",
        center,
        TextStyle::from(("sans-serif", 20).into_font()).pos(Pos::new(HPos::Center, VPos::Center)),
    ))?;
    Ok(())
}
