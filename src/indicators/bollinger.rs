//! Bollinger Bands indicator
//!
//! Middle Band = SMA(window)
//! Upper Band  = Middle + k * rolling std
//! Lower Band  = Middle - k * rolling std
//!
//! Rolling statistics are undefined until a full window of observations
//! exists; the first `window - 1` positions are `None`.

use serde::{Deserialize, Serialize};

use crate::core::PriceSeries;

/// Rolling window length in trading days
pub const BOLLINGER_WINDOW: usize = 20;

/// Band width in standard deviations
pub const BOLLINGER_K: f64 = 2.0;

/// Rolling mean, aligned with the input: position i holds the mean of
/// values[i + 1 - window ..= i], or None while the window is incomplete.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if i + 1 < window {
                return None;
            }
            let slice = &values[i + 1 - window..=i];
            Some(slice.iter().sum::<f64>() / window as f64)
        })
        .collect()
}

/// Rolling sample standard deviation (n - 1 denominator), aligned like
/// [`rolling_mean`].
pub fn rolling_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if i + 1 < window || window < 2 {
                return None;
            }
            let slice = &values[i + 1 - window..=i];
            let mean = slice.iter().sum::<f64>() / window as f64;
            let var = slice.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
                / (window - 1) as f64;
            Some(var.sqrt())
        })
        .collect()
}

/// Bollinger Band columns, date-aligned with the source series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BollingerBands {
    /// 20-period simple moving average of adjusted close
    pub sma: Vec<Option<f64>>,
    /// sma + 2 * rolling std
    pub upper: Vec<Option<f64>>,
    /// sma - 2 * rolling std
    pub lower: Vec<Option<f64>>,
    /// upper - lower
    pub distance: Vec<Option<f64>>,
}

impl BollingerBands {
    /// Compute bands over the adjusted-close column of a price series.
    pub fn from_series(series: &PriceSeries) -> Self {
        Self::from_values(&series.adj_closes())
    }

    /// Compute bands over a raw value slice with the standard 20/2 settings.
    pub fn from_values(values: &[f64]) -> Self {
        let sma = rolling_mean(values, BOLLINGER_WINDOW);
        let std = rolling_std(values, BOLLINGER_WINDOW);

        let upper: Vec<Option<f64>> = sma
            .iter()
            .zip(std.iter())
            .map(|(m, s)| match (m, s) {
                (Some(m), Some(s)) => Some(m + BOLLINGER_K * s),
                _ => None,
            })
            .collect();
        let lower: Vec<Option<f64>> = sma
            .iter()
            .zip(std.iter())
            .map(|(m, s)| match (m, s) {
                (Some(m), Some(s)) => Some(m - BOLLINGER_K * s),
                _ => None,
            })
            .collect();
        let distance: Vec<Option<f64>> = upper
            .iter()
            .zip(lower.iter())
            .map(|(u, l)| match (u, l) {
                (Some(u), Some(l)) => Some(u - l),
                _ => None,
            })
            .collect();

        Self {
            sma,
            upper,
            lower,
            distance,
        }
    }

    pub fn len(&self) -> usize {
        self.sma.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sma.is_empty()
    }

    /// True if no position has a defined band value
    pub fn is_all_undefined(&self) -> bool {
        self.sma.iter().all(|v| v.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_mean_alignment() {
        let values: Vec<f64> = (1..=25).map(|v| v as f64).collect();
        let mean = rolling_mean(&values, 20);

        assert_eq!(mean.len(), 25);
        for m in &mean[..19] {
            assert!(m.is_none());
        }
        // First defined window: mean of 1..=20
        assert!((mean[19].unwrap() - 10.5).abs() < 1e-12);
        // Next window: mean of 2..=21
        assert!((mean[20].unwrap() - 11.5).abs() < 1e-12);
    }

    #[test]
    fn test_rolling_std_is_sample_std() {
        // Alternating series: each 20-window has mean 1.0 and sample
        // variance 20 * 1 / 19.
        let values: Vec<f64> = (0..30).map(|i| if i % 2 == 0 { 0.0 } else { 2.0 }).collect();
        let std = rolling_std(&values, 20);

        let expected = (20.0 / 19.0_f64).sqrt();
        for s in std.iter().skip(19) {
            assert!((s.unwrap() - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_constant_series_has_zero_std() {
        let values = vec![5.0; 40];
        let std = rolling_std(&values, 20);
        assert!(std[39].unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_band_distance_is_four_std() {
        let values: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let bands = BollingerBands::from_values(&values);
        let std = rolling_std(&values, BOLLINGER_WINDOW);

        for i in 19..values.len() {
            let dist = bands.distance[i].unwrap();
            assert!((dist - 4.0 * std[i].unwrap()).abs() < 1e-9, "index {i}");
        }
    }

    #[test]
    fn test_bands_symmetric_around_sma() {
        let values: Vec<f64> = (0..40).map(|i| 50.0 + i as f64).collect();
        let bands = BollingerBands::from_values(&values);

        for i in 19..values.len() {
            let sma = bands.sma[i].unwrap();
            let up = bands.upper[i].unwrap() - sma;
            let down = sma - bands.lower[i].unwrap();
            assert!((up - down).abs() < 1e-9);
        }
    }

    #[test]
    fn test_nineteen_rows_all_undefined() {
        let values = vec![100.0; 19];
        let bands = BollingerBands::from_values(&values);

        assert_eq!(bands.len(), 19);
        assert!(bands.is_all_undefined());
    }

    #[test]
    fn test_empty_series() {
        let bands = BollingerBands::from_values(&[]);
        assert!(bands.is_empty());
        assert!(bands.is_all_undefined());
    }
}
