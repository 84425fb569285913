//! Numeric helpers behind the charts: trend line, binning, density

/// Arithmetic mean, `None` for an empty slice
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator)
#[must_use]
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(var.sqrt())
}

/// Least-squares line `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    #[must_use]
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Ordinary least-squares fit of `ys` on `xs`.
///
/// Returns `None` when there are fewer than two points or every `x` is equal.
#[must_use]
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> Option<LinearFit> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let mean_x = mean(xs)?;
    let mean_y = mean(ys)?;

    let mut sxx = 0.0_f64;
    let mut sxy = 0.0_f64;
    for (x, y) in xs.iter().zip(ys) {
        sxx += (x - mean_x) * (x - mean_x);
        sxy += (x - mean_x) * (y - mean_y);
    }
    if sxx.abs() < f64::EPSILON {
        return None;
    }

    let slope = sxy / sxx;
    Some(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

/// One histogram bin, `[start, end)` except the last which is closed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Split `values` into `bins` equal-width bins spanning their range.
///
/// A zero-width range is widened by 0.5 on each side.
#[must_use]
pub fn histogram(values: &[f64], bins: usize) -> Vec<Bin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let (mut lo, mut hi) = min_max(values);
    if (hi - lo).abs() < f64::EPSILON {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut result: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            start: lo + width * i as f64,
            end: lo + width * (i + 1) as f64,
            count: 0,
        })
        .collect();

    for value in values {
        let index = (((value - lo) / width).floor() as usize).min(bins - 1);
        result[index].count += 1;
    }
    result
}

/// Bandwidth of a Gaussian kernel by Scott's rule
#[must_use]
pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
    let std = sample_std_dev(values)?;
    let bandwidth = std * (values.len() as f64).powf(-0.2);
    (bandwidth > 0.0).then_some(bandwidth)
}

/// Gaussian kernel density estimate evaluated at `x`
#[must_use]
pub fn gaussian_kde(values: &[f64], bandwidth: f64, x: f64) -> f64 {
    let norm = 1.0 / ((2.0 * std::f64::consts::PI).sqrt() * bandwidth * values.len() as f64);
    values
        .iter()
        .map(|v| {
            let u = (x - v) / bandwidth;
            (-0.5 * u * u).exp()
        })
        .sum::<f64>()
        * norm
}

/// Smallest and largest value of a non-empty slice
#[must_use]
pub fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        })
}

/// Axis range around `values` with 10% padding (1.0 when flat)
#[must_use]
pub fn padded_range(values: &[f64]) -> std::ops::Range<f64> {
    if values.is_empty() {
        return 0.0..1.0;
    }
    let (lo, hi) = min_max(values);
    let padding = if (hi - lo).abs() > 1e-6 {
        (hi - lo) * 0.1
    } else {
        1.0
    };
    (lo - padding)..(hi + padding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_fit_exact_line() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [3.0, 5.0, 7.0, 9.0];
        let fit = linear_fit(&xs, &ys).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-9);
        assert!((fit.intercept - 1.0).abs() < 1e-9);
        assert!((fit.at(10.0) - 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_fit_degenerate() {
        assert!(linear_fit(&[1.0], &[2.0]).is_none());
        assert!(linear_fit(&[5.0, 5.0, 5.0], &[1.0, 2.0, 3.0]).is_none());
        assert!(linear_fit(&[1.0, 2.0], &[1.0]).is_none());
    }

    #[test]
    fn test_histogram_counts_every_value() {
        let values = [1.0, 2.0, 2.5, 9.0, 10.0];
        let bins = histogram(&values, 10);
        assert_eq!(bins.len(), 10);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        assert_eq!(bins[0].start, 1.0);
        assert!((bins[9].end - 10.0).abs() < 1e-9);
        // the maximum lands in the closed last bin
        assert_eq!(bins[9].count, 1);
        assert_eq!(bins[8].count, 1);
    }

    #[test]
    fn test_histogram_single_value() {
        let bins = histogram(&[18.5], 10);
        assert_eq!(bins.len(), 10);
        assert!((bins[0].start - 18.0).abs() < 1e-9);
        assert!((bins[9].end - 19.0).abs() < 1e-9);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 1);
    }

    #[test]
    fn test_kde_integrates_to_one() {
        let values = [10.0, 12.0, 15.0, 21.0];
        let bandwidth = scott_bandwidth(&values).unwrap();
        let step = 0.05;
        let area: f64 = (0..2000)
            .map(|i| -20.0 + step * f64::from(i))
            .map(|x| gaussian_kde(&values, bandwidth, x) * step)
            .sum();
        assert!((area - 1.0).abs() < 1e-3, "area was {area}");
    }

    #[test]
    fn test_scott_bandwidth_degenerate() {
        assert!(scott_bandwidth(&[3.0]).is_none());
        assert!(scott_bandwidth(&[3.0, 3.0]).is_none());
    }

    #[test]
    fn test_padded_range() {
        assert_eq!(padded_range(&[0.0, 10.0]), -1.0..11.0);
        assert_eq!(padded_range(&[5.0]), 4.0..6.0);
    }
}
