//! Vital history reshaped for the trend charts.

use crate::alert::SignalKind;
use crate::model::VitalSample;

/// One x-axis point of the vitals chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    /// Wall-clock label, `HH:MM` UTC.
    pub time: String,
    pub oximeter: f64,
    pub heart_rate: f64,
    pub temperature: f64,
}

/// Maps a history (oldest first) to chart points, preserving order.
pub fn chart_series(history: &[VitalSample]) -> Vec<ChartPoint> {
    history
        .iter()
        .map(|s| ChartPoint {
            time: s.timestamp.format("%H:%M").to_string(),
            oximeter: s.oximeter,
            heart_rate: s.heart_rate,
            temperature: s.temperature,
        })
        .collect()
}

/// Min / max / mean of one signal over a history window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Returns `None` for an empty history.
pub fn summarize(history: &[VitalSample], kind: SignalKind) -> Option<SignalSummary> {
    if history.is_empty() {
        return None;
    }
    let values = history.iter().map(|s| kind.value_of(s));
    let (min, max, sum) = values.fold(
        (f64::INFINITY, f64::NEG_INFINITY, 0.0),
        |(min, max, sum), v| (min.min(v), max.max(v), sum + v),
    );
    Some(SignalSummary {
        min,
        max,
        mean: sum / history.len() as f64,
    })
}
