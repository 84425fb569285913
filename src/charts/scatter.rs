use super::stats::{linear_fit, padded_range};
use super::{CAPTION_FONT, Chart, ChartKind, ChartSize, DrawResult, SvgArea, render};
use crate::Result;
use crate::models::WeatherDataset;
use plotters::prelude::*;
use plotters::style::{Palette, Palette99};

/// Scatter of temperature against humidity, one colour per condition,
/// with a least-squares trend line when at least two distinct
/// temperatures exist.
pub fn temperature_vs_humidity(dataset: &WeatherDataset, size: ChartSize) -> Result<Chart> {
    render(ChartKind::TemperatureVsHumidity, dataset, size, |root| {
        draw_temperature_vs_humidity(root, dataset)
    })
}

fn draw_temperature_vs_humidity(root: &SvgArea<'_>, dataset: &WeatherDataset) -> DrawResult {
    let temperatures = dataset.temperatures();
    let humidities: Vec<f64> = dataset.iter().map(|r| f64::from(r.humidity)).collect();

    let x_range = padded_range(&temperatures);
    let fit = linear_fit(&temperatures, &humidities);

    // keep the trend line inside the plotting area
    let mut y_values = humidities.clone();
    if let Some(fit) = fit {
        y_values.push(fit.at(x_range.start));
        y_values.push(fit.at(x_range.end));
    }
    let y_range = padded_range(&y_values);

    let mut chart = ChartBuilder::on(root)
        .caption(ChartKind::TemperatureVsHumidity.title(), CAPTION_FONT)
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(x_range.clone(), y_range)?;

    chart
        .configure_mesh()
        .x_desc("Temperature (°C)")
        .y_desc("Humidity (%)")
        .draw()?;

    for (idx, condition) in dataset.conditions().into_iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        let points = dataset
            .iter()
            .filter(|r| r.condition == condition)
            .map(|r| (r.temperature, f64::from(r.humidity)));

        chart
            .draw_series(points.map(|p| Circle::new(p, 6, color.filled())))?
            .label(condition)
            .legend(move |(x, y)| Circle::new((x, y), 5, color.filled()));
    }

    if let Some(fit) = fit {
        let line = [x_range.start, x_range.end].map(|x| (x, fit.at(x)));
        chart
            .draw_series(LineSeries::new(line, RED.stroke_width(2)))?
            .label("Trend")
            .legend(|(x, y)| PathElement::new(vec![(x - 10, y), (x + 10, y)], RED.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}
