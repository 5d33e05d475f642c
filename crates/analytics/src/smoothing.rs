use crate::error::AnalyticsError;
use chrono::NaiveDate;
use core_types::ReturnSeries;
use serde::{Deserialize, Serialize};

/// One observation of a smoothed series. `value` is `None` inside the
/// warm-up period, where the trailing window is not yet fully populated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothedPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// A trailing rolling mean over one symbol's return series, for display.
///
/// The statistics engine never consumes smoothed values; this exists solely
/// so the presentation layer can show a de-noised view of each series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothedSeries {
    symbol: String,
    window: usize,
    points: Vec<SmoothedPoint>,
}

impl SmoothedSeries {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn points(&self) -> &[SmoothedPoint] {
        &self.points
    }

    /// The most recent defined smoothed value, if any window has filled.
    pub fn latest(&self) -> Option<(NaiveDate, f64)> {
        self.points
            .iter()
            .rev()
            .find_map(|p| p.value.map(|v| (p.date, v)))
    }

    pub fn min(&self) -> Option<f64> {
        self.points
            .iter()
            .filter_map(|p| p.value)
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.min(v))))
    }

    pub fn max(&self) -> Option<f64> {
        self.points
            .iter()
            .filter_map(|p| p.value)
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
    }
}

/// Computes the trailing rolling mean of a return series.
///
/// The value at index `i` is the mean of observations `i - window + 1 ..= i`
/// (right-aligned); the first `window - 1` points are undefined.
pub fn rolling_mean(
    series: &ReturnSeries,
    window: usize,
) -> Result<SmoothedSeries, AnalyticsError> {
    if window == 0 {
        return Err(AnalyticsError::InvalidParameters(
            "rolling window must be at least 1".to_string(),
        ));
    }

    let values = series.values();
    let mut running_sum = 0.0;
    let mut points = Vec::with_capacity(values.len());

    for (i, point) in series.points().iter().enumerate() {
        running_sum += values[i];
        if i >= window {
            running_sum -= values[i - window];
        }

        let value = if i + 1 >= window {
            Some(running_sum / window as f64)
        } else {
            None
        };

        points.push(SmoothedPoint { date: point.date, value });
    }

    Ok(SmoothedSeries {
        symbol: series.symbol().to_string(),
        window,
        points,
    })
}
