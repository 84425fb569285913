use super::stats::{gaussian_kde, histogram, padded_range, scott_bandwidth};
use super::{
    CAPTION_FONT, Chart, ChartKind, ChartSize, DrawResult, HISTOGRAM_BINS, SvgArea, render,
};
use crate::Result;
use crate::models::{Hemisphere, WeatherDataset};
use plotters::data::Quartiles;
use plotters::prelude::*;

const KDE_SAMPLES: usize = 200;

/// Two side-by-side box plots of temperature and humidity grouped by
/// hemisphere. Hemispheres without any record are left out.
pub fn hemisphere_box_plots(dataset: &WeatherDataset, size: ChartSize) -> Result<Chart> {
    render(ChartKind::HemisphereBoxPlots, dataset, size, |root| {
        draw_hemisphere_box_plots(root, dataset)
    })
}

fn draw_hemisphere_box_plots(root: &SvgArea<'_>, dataset: &WeatherDataset) -> DrawResult {
    let area = root.titled(ChartKind::HemisphereBoxPlots.title(), CAPTION_FONT)?;
    let panels = area.split_evenly((1, 2));

    let mut labels = Vec::new();
    let mut temperatures = Vec::new();
    let mut humidities = Vec::new();
    for region in Hemisphere::ALL {
        let records: Vec<_> = dataset.in_region(region).collect();
        if records.is_empty() {
            continue;
        }
        labels.push(region.label().to_string());
        temperatures.push(records.iter().map(|r| r.temperature).collect::<Vec<f64>>());
        humidities.push(records.iter().map(|r| f64::from(r.humidity)).collect::<Vec<f64>>());
    }

    let panel = BoxPanel {
        caption: "Temperature by Hemisphere",
        x_desc: "Region",
        y_desc: "Temperature (°C)",
    };
    panel.draw(&panels[0], &labels, &temperatures)?;

    let panel = BoxPanel {
        caption: "Humidity by Hemisphere",
        x_desc: "Region",
        y_desc: "Humidity (%)",
    };
    panel.draw(&panels[1], &labels, &humidities)?;
    Ok(())
}

/// A box plot with one box per labelled group on a categorical x axis
pub(super) struct BoxPanel<'a> {
    pub caption: &'a str,
    pub x_desc: &'a str,
    pub y_desc: &'a str,
}

impl BoxPanel<'_> {
    pub fn draw(&self, area: &SvgArea<'_>, labels: &[String], groups: &[Vec<f64>]) -> DrawResult {
        let all: Vec<f64> = groups.iter().flatten().copied().collect();
        let y_range = padded_range(&all);

        let mut chart = ChartBuilder::on(area)
            .caption(self.caption, ("sans-serif", 18))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(55)
            .build_cartesian_2d(
                labels.into_segmented(),
                y_range.start as f32..y_range.end as f32,
            )?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(self.x_desc)
            .y_desc(self.y_desc)
            .x_label_formatter(&segment_label)
            .draw()?;

        chart.draw_series(
            labels
                .iter()
                .zip(groups)
                .filter(|(_, values)| !values.is_empty())
                .map(|(label, values)| {
                    let quartiles = Quartiles::new(values.as_slice());
                    Boxplot::new_vertical(SegmentValue::CenterOf(label), &quartiles)
                        .width(30)
                        .whisker_width(0.5)
                        .style(BLUE.stroke_width(2))
                }),
        )?;
        Ok(())
    }
}

fn segment_label(value: &SegmentValue<&String>) -> String {
    match value {
        SegmentValue::CenterOf(label) | SegmentValue::Exact(label) => (*label).clone(),
        SegmentValue::Last => String::new(),
    }
}

/// Histogram of temperatures in ten equal-width bins with a Gaussian
/// kernel density curve scaled to counts.
pub fn temperature_histogram(dataset: &WeatherDataset, size: ChartSize) -> Result<Chart> {
    render(ChartKind::TemperatureHistogram, dataset, size, |root| {
        draw_temperature_histogram(root, dataset)
    })
}

fn draw_temperature_histogram(root: &SvgArea<'_>, dataset: &WeatherDataset) -> DrawResult {
    let temperatures = dataset.temperatures();
    let bins = histogram(&temperatures, HISTOGRAM_BINS);
    let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
        return Ok(());
    };
    let (x_lo, x_hi) = (first.start, last.end);
    let bin_width = first.end - first.start;

    // density scaled so its area matches the histogram's
    let curve: Vec<(f64, f64)> = scott_bandwidth(&temperatures)
        .map(|bandwidth| {
            let scale = temperatures.len() as f64 * bin_width;
            (0..=KDE_SAMPLES)
                .map(|i| {
                    let x = x_lo + (x_hi - x_lo) * i as f64 / KDE_SAMPLES as f64;
                    (x, gaussian_kde(&temperatures, bandwidth, x) * scale)
                })
                .collect()
        })
        .unwrap_or_default();

    let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0) as f64;
    let max_curve = curve.iter().map(|(_, y)| *y).fold(0.0_f64, f64::max);
    let y_max = (max_count.max(max_curve) * 1.1).max(1.0);

    let mut chart = ChartBuilder::on(root)
        .caption(ChartKind::TemperatureHistogram.title(), CAPTION_FONT)
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(x_lo..x_hi, 0.0..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Temperature (°C)")
        .y_desc("Frequency")
        .draw()?;

    chart.draw_series(bins.iter().map(|bin| {
        Rectangle::new(
            [(bin.start, 0.0), (bin.end, bin.count as f64)],
            BLUE.mix(0.5).filled(),
        )
    }))?;
    chart.draw_series(bins.iter().map(|bin| {
        Rectangle::new([(bin.start, 0.0), (bin.end, bin.count as f64)], BLACK)
    }))?;

    if !curve.is_empty() {
        chart.draw_series(LineSeries::new(curve, RED.stroke_width(2)))?;
    }
    Ok(())
}
