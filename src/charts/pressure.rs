use super::distribution::BoxPanel;
use super::stats::padded_range;
use super::{CAPTION_FONT, Chart, ChartKind, ChartSize, DrawResult, SvgArea, render};
use crate::Result;
use crate::models::{WeatherDataset, WeatherRecord};
use plotters::prelude::*;
use std::collections::BTreeMap;

/// One measured column drawn against pressure
struct PressureSeries {
    kind: ChartKind,
    y_desc: &'static str,
    value: fn(&WeatherRecord) -> f64,
}

/// Line chart of humidity against pressure
pub fn humidity_over_pressure(dataset: &WeatherDataset, size: ChartSize) -> Result<Chart> {
    PressureSeries {
        kind: ChartKind::HumidityOverPressure,
        y_desc: "Humidity (%)",
        value: |r| f64::from(r.humidity),
    }
    .render(dataset, size)
}

/// Line chart of temperature against pressure
pub fn temperature_over_pressure(dataset: &WeatherDataset, size: ChartSize) -> Result<Chart> {
    PressureSeries {
        kind: ChartKind::TemperatureOverPressure,
        y_desc: "Temperature (°C)",
        value: |r| r.temperature,
    }
    .render(dataset, size)
}

/// Line chart of wind speed against pressure
pub fn wind_speed_over_pressure(dataset: &WeatherDataset, size: ChartSize) -> Result<Chart> {
    PressureSeries {
        kind: ChartKind::WindSpeedOverPressure,
        y_desc: "Wind Speed (m/s)",
        value: |r| r.wind_speed,
    }
    .render(dataset, size)
}

impl PressureSeries {
    fn render(&self, dataset: &WeatherDataset, size: ChartSize) -> Result<Chart> {
        render(self.kind, dataset, size, |root| self.draw(root, dataset))
    }

    fn draw(&self, root: &SvgArea<'_>, dataset: &WeatherDataset) -> DrawResult {
        let points: Vec<(f64, f64)> = dataset
            .iter()
            .map(|r| (f64::from(r.pressure), (self.value)(r)))
            .collect();
        let line = mean_by_pressure(dataset, self.value);

        let xs: Vec<f64> = points.iter().map(|(x, _)| *x).collect();
        let ys: Vec<f64> = points.iter().map(|(_, y)| *y).collect();

        let mut chart = ChartBuilder::on(root)
            .caption(self.kind.title(), CAPTION_FONT)
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(55)
            .build_cartesian_2d(padded_range(&xs), padded_range(&ys))?;

        chart
            .configure_mesh()
            .x_desc("Pressure (hPa)")
            .y_desc(self.y_desc)
            .x_label_formatter(&|x| format!("{x:.0}"))
            .draw()?;

        chart.draw_series(LineSeries::new(line, BLUE.stroke_width(2)))?;
        chart.draw_series(points.into_iter().map(|p| Circle::new(p, 4, BLUE.filled())))?;
        Ok(())
    }
}

/// Mean of `value` per distinct pressure, sorted by pressure
fn mean_by_pressure(dataset: &WeatherDataset, value: fn(&WeatherRecord) -> f64) -> Vec<(f64, f64)> {
    let mut groups: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for record in dataset {
        let entry = groups.entry(record.pressure).or_insert((0.0, 0));
        entry.0 += value(record);
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|(pressure, (sum, count))| (f64::from(pressure), sum / count as f64))
        .collect()
}

/// Box plot of temperature minus feels-like temperature, one box per
/// distinct pressure value.
pub fn temp_feels_like_over_pressure(dataset: &WeatherDataset, size: ChartSize) -> Result<Chart> {
    render(ChartKind::TempFeelsLikeOverPressure, dataset, size, |root| {
        draw_temp_feels_like(root, dataset)
    })
}

fn draw_temp_feels_like(root: &SvgArea<'_>, dataset: &WeatherDataset) -> DrawResult {
    let mut groups: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for record in dataset {
        groups.entry(record.pressure).or_default().push(record.temp_diff());
    }
    let labels: Vec<String> = groups.keys().map(ToString::to_string).collect();
    let values: Vec<Vec<f64>> = groups.into_values().collect();

    let panel = BoxPanel {
        caption: ChartKind::TempFeelsLikeOverPressure.title(),
        x_desc: "Pressure (hPa)",
        y_desc: "Temperature Difference (°C)",
    };
    panel.draw(root, &labels, &values)
}
