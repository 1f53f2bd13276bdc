//! Per-signal status classification.
//!
//! Maps one vital-sign value to a status level and display label. The
//! function is total: out-of-domain input (negative oxygen, NaN) falls
//! through the same boundary checks as any other value, and there is no
//! validation layer.

use crate::model::{MotionStatus, VitalSample};

// ---------------------------------------------------------------------------
// Threshold table
// ---------------------------------------------------------------------------

/// Oximeter: normal at or above, percent.
pub const OXIMETER_NORMAL_MIN: f64 = 95.0;
/// Oximeter: warning at or above (and below normal), percent.
pub const OXIMETER_WARNING_MIN: f64 = 90.0;

pub const HEART_RATE_NORMAL: (f64, f64) = (60.0, 100.0);
pub const HEART_RATE_WARNING: (f64, f64) = (50.0, 120.0);

pub const TEMPERATURE_NORMAL: (f64, f64) = (36.0, 37.5);
pub const TEMPERATURE_WARNING: (f64, f64) = (35.0, 38.0);

pub const HUMIDITY_NORMAL: (f64, f64) = (40.0, 60.0);
pub const HUMIDITY_WARNING: (f64, f64) = (30.0, 70.0);

/// Gas: safe strictly below.
pub const GAS_SAFE_BELOW: f64 = 20.0;
/// Gas: warning up to and including.
pub const GAS_WARNING_MAX: f64 = 50.0;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The numeric signals a helmet reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Oximeter,
    HeartRate,
    Temperature,
    Humidity,
    GasLevel,
}

impl SignalKind {
    /// Display order on the dashboard.
    pub const ALL: [SignalKind; 5] = [
        SignalKind::Oximeter,
        SignalKind::HeartRate,
        SignalKind::Temperature,
        SignalKind::Humidity,
        SignalKind::GasLevel,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            SignalKind::Oximeter => "Oxygen",
            SignalKind::HeartRate => "Heart Rate",
            SignalKind::Temperature => "Temperature",
            SignalKind::Humidity => "Humidity",
            SignalKind::GasLevel => "Gas Level",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            SignalKind::Oximeter | SignalKind::Humidity => "%",
            SignalKind::HeartRate => "bpm",
            SignalKind::Temperature => "°C",
            SignalKind::GasLevel => "ppm",
        }
    }

    /// Reads this signal's value out of a sample.
    pub fn value_of(&self, sample: &VitalSample) -> f64 {
        match self {
            SignalKind::Oximeter => sample.oximeter,
            SignalKind::HeartRate => sample.heart_rate,
            SignalKind::Temperature => sample.temperature,
            SignalKind::Humidity => sample.humidity,
            SignalKind::GasLevel => sample.gas_level,
        }
    }
}

/// Status levels in ascending order of severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StatusLevel {
    Normal,
    Warning,
    Critical,
}

impl StatusLevel {
    /// Badge colour used by the dashboard.
    pub fn color(&self) -> &'static str {
        match self {
            StatusLevel::Normal => "green",
            StatusLevel::Warning => "amber",
            StatusLevel::Critical => "red",
        }
    }
}

/// Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub level: StatusLevel,
    /// Display text only; the bucket boundary is the contract.
    pub label: &'static str,
}

impl Classification {
    fn new(level: StatusLevel, label: &'static str) -> Self {
        Classification { level, label }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

fn within(value: f64, (lo, hi): (f64, f64)) -> bool {
    value >= lo && value <= hi
}

/// Classifies `value` for the given signal.
///
/// Boundaries, inclusive/exclusive exactly as listed:
///
/// | signal      | normal       | warning                  | critical        |
/// |-------------|--------------|--------------------------|-----------------|
/// | oximeter    | >= 95        | [90, 95)                 | < 90            |
/// | heart rate  | [60, 100]    | [50, 60) or (100, 120]   | < 50 or > 120   |
/// | temperature | [36, 37.5]   | [35, 36) or (37.5, 38]   | < 35 or > 38    |
/// | humidity    | [40, 60]     | [30, 40) or (60, 70]     | < 30 or > 70    |
/// | gas level   | < 20         | [20, 50]                 | > 50            |
pub fn classify(kind: SignalKind, value: f64) -> Classification {
    use StatusLevel::*;

    match kind {
        SignalKind::Oximeter => {
            if value >= OXIMETER_NORMAL_MIN {
                Classification::new(Normal, "Normal")
            } else if value >= OXIMETER_WARNING_MIN {
                Classification::new(Warning, "Low")
            } else {
                Classification::new(Critical, "Critical")
            }
        }
        SignalKind::HeartRate => banded(value, HEART_RATE_NORMAL, HEART_RATE_WARNING, "Abnormal"),
        SignalKind::Temperature => banded(value, TEMPERATURE_NORMAL, TEMPERATURE_WARNING, "Warning"),
        SignalKind::Humidity => banded(value, HUMIDITY_NORMAL, HUMIDITY_WARNING, "Warning"),
        SignalKind::GasLevel => {
            if value < GAS_SAFE_BELOW {
                Classification::new(Normal, "Safe")
            } else if value <= GAS_WARNING_MAX {
                Classification::new(Warning, "Warning")
            } else {
                Classification::new(Critical, "Danger")
            }
        }
    }
}

/// Two-sided signals: a closed normal band nested inside a closed warning
/// band. Anything outside both is critical.
fn banded(
    value: f64,
    normal: (f64, f64),
    warning: (f64, f64),
    warning_label: &'static str,
) -> Classification {
    if within(value, normal) {
        Classification::new(StatusLevel::Normal, "Normal")
    } else if within(value, warning) {
        Classification::new(StatusLevel::Warning, warning_label)
    } else {
        Classification::new(StatusLevel::Critical, "Critical")
    }
}

/// Badge for the accelerometer's motion verdict.
pub fn classify_motion(status: MotionStatus) -> Classification {
    match status {
        MotionStatus::Normal => Classification::new(StatusLevel::Normal, "Normal"),
        MotionStatus::Warning => Classification::new(StatusLevel::Warning, "Motion"),
        MotionStatus::FallDetected => Classification::new(StatusLevel::Critical, "Fall"),
    }
}

/// Classifies every numeric signal of a sample, in dashboard order.
pub fn classify_sample(sample: &VitalSample) -> Vec<(SignalKind, Classification)> {
    SignalKind::ALL
        .iter()
        .map(|&kind| (kind, classify(kind, kind.value_of(sample))))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
