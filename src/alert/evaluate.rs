//! Cross-signal alert evaluation.
//!
//! Alerts are transient: they are recomputed from each sample, never
//! persisted, and never turned into store events. Notification dispatch and
//! deduplication across evaluations are not done here.

use crate::model::{MotionStatus, Severity, VitalSample};

// ---------------------------------------------------------------------------
// Alert thresholds
// ---------------------------------------------------------------------------
//
// Independent of the classifier table. Only the dangerous side of each
// signal raises a banner (no low-gas or low-temperature alert).

/// Oxygen saturation strictly below this raises `LowOxygen`.
pub const ALERT_OXIMETER_BELOW: f64 = 90.0;
/// Heart rate strictly below this raises `AbnormalHeartRate`.
pub const ALERT_HEART_RATE_BELOW: f64 = 50.0;
/// Heart rate strictly above this raises `AbnormalHeartRate`.
pub const ALERT_HEART_RATE_ABOVE: f64 = 120.0;
/// Body temperature strictly above this raises `HighTemperature`.
pub const ALERT_TEMPERATURE_ABOVE: f64 = 38.0;
/// Gas level strictly above this raises `HighGasLevel`.
pub const ALERT_GAS_ABOVE: f64 = 50.0;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Alert conditions, in evaluation priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    LowOxygen,
    AbnormalHeartRate,
    HighTemperature,
    HighGasLevel,
    FallDetected,
}

impl AlertKind {
    pub fn title(&self) -> &'static str {
        match self {
            AlertKind::LowOxygen => "Low Oxygen",
            AlertKind::AbnormalHeartRate => "Abnormal Heart Rate",
            AlertKind::HighTemperature => "High Temperature",
            AlertKind::HighGasLevel => "High Gas Level",
            AlertKind::FallDetected => "Fall Detected",
        }
    }
}

/// A banner raised for one triggered condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub kind: AlertKind,
    pub description: String,
    pub severity: Severity,
}

impl Alert {
    fn new(kind: AlertKind, description: &str, severity: Severity) -> Self {
        Alert {
            kind,
            description: description.to_string(),
            severity,
        }
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Returns every alert the sample triggers, in priority order.
///
/// Conditions are independent; all five are checked and any number (0-5)
/// may fire together. No side effects.
pub fn evaluate(sample: &VitalSample) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if sample.oximeter < ALERT_OXIMETER_BELOW {
        alerts.push(Alert::new(
            AlertKind::LowOxygen,
            "Worker oxygen level is critically low!",
            Severity::Critical,
        ));
    }

    if sample.heart_rate < ALERT_HEART_RATE_BELOW || sample.heart_rate > ALERT_HEART_RATE_ABOVE {
        alerts.push(Alert::new(
            AlertKind::AbnormalHeartRate,
            "Worker heart rate is outside safe range!",
            Severity::High,
        ));
    }

    if sample.temperature > ALERT_TEMPERATURE_ABOVE {
        alerts.push(Alert::new(
            AlertKind::HighTemperature,
            "Worker body temperature is elevated!",
            Severity::High,
        ));
    }

    if sample.gas_level > ALERT_GAS_ABOVE {
        alerts.push(Alert::new(
            AlertKind::HighGasLevel,
            "Dangerous gas levels detected!",
            Severity::Critical,
        ));
    }

    if sample.accelerometer.motion_status == MotionStatus::FallDetected {
        alerts.push(Alert::new(
            AlertKind::FallDetected,
            "Worker may have fallen! Immediate response required.",
            Severity::Critical,
        ));
    }

    alerts
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::classify::{classify, SignalKind, StatusLevel};
    use crate::model::Accelerometer;
    use chrono::{TimeZone, Utc};

    fn sample(
        oximeter: f64,
        heart_rate: f64,
        temperature: f64,
        gas_level: f64,
        motion_status: MotionStatus,
    ) -> VitalSample {
        VitalSample {
            worker_id: "1".to_string(),
            oximeter,
            heart_rate,
            temperature,
            humidity: 50.0,
            gas_level,
            accelerometer: Accelerometer {
                x: 0.1,
                y: -0.2,
                z: 0.9,
                motion_status,
            },
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    fn kinds(alerts: &[Alert]) -> Vec<AlertKind> {
        alerts.iter().map(|a| a.kind).collect()
    }

    #[test]
    fn test_nominal_sample_raises_nothing() {
        let alerts = evaluate(&sample(98.0, 72.0, 36.5, 5.0, MotionStatus::Normal));
        assert!(alerts.is_empty(), "nominal sample should be quiet, got {:?}", alerts);
    }

    #[test]
    fn test_low_oxygen_alone() {
        let alerts = evaluate(&sample(85.0, 70.0, 36.0, 10.0, MotionStatus::Normal));
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::LowOxygen);
        assert_eq!(alerts[0].severity, Severity::Critical);
    }

    #[test]
    fn test_fall_fires_regardless_of_other_fields() {
        let alerts = evaluate(&sample(98.0, 72.0, 36.5, 5.0, MotionStatus::FallDetected));
        assert_eq!(kinds(&alerts), vec![AlertKind::FallDetected]);
        assert_eq!(alerts[0].severity, Severity::Critical);
    }

    #[test]
    fn test_motion_warning_is_not_an_alert() {
        let alerts = evaluate(&sample(98.0, 72.0, 36.5, 5.0, MotionStatus::Warning));
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_all_conditions_fire_in_priority_order() {
        let alerts = evaluate(&sample(80.0, 130.0, 39.0, 75.0, MotionStatus::FallDetected));
        assert_eq!(
            kinds(&alerts),
            vec![
                AlertKind::LowOxygen,
                AlertKind::AbnormalHeartRate,
                AlertKind::HighTemperature,
                AlertKind::HighGasLevel,
                AlertKind::FallDetected,
            ]
        );
        let severities: Vec<_> = alerts.iter().map(|a| a.severity).collect();
        assert_eq!(
            severities,
            vec![
                Severity::Critical,
                Severity::High,
                Severity::High,
                Severity::Critical,
                Severity::Critical,
            ]
        );
    }

    #[test]
    fn test_boundaries_are_strict() {
        // Exactly on every threshold: nothing fires.
        let alerts = evaluate(&sample(90.0, 120.0, 38.0, 50.0, MotionStatus::Normal));
        assert!(alerts.is_empty(), "thresholds are strict, got {:?}", alerts);
        let alerts = evaluate(&sample(90.0, 50.0, 38.0, 50.0, MotionStatus::Normal));
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_slow_heart_rate_fires() {
        let alerts = evaluate(&sample(98.0, 45.0, 36.5, 5.0, MotionStatus::Normal));
        assert_eq!(kinds(&alerts), vec![AlertKind::AbnormalHeartRate]);
    }

    #[test]
    fn test_low_temperature_is_critical_badge_but_no_alert() {
        // The classifier flags hypothermia; the evaluator only watches the hot side.
        let s = sample(98.0, 72.0, 34.0, 5.0, MotionStatus::Normal);
        assert_eq!(classify(SignalKind::Temperature, s.temperature).level, StatusLevel::Critical);
        assert!(evaluate(&s).is_empty());
    }

    #[test]
    fn test_repeated_evaluation_is_not_deduplicated() {
        let s = sample(85.0, 72.0, 36.5, 5.0, MotionStatus::Normal);
        assert_eq!(evaluate(&s), evaluate(&s));
        assert_eq!(evaluate(&s).len(), 1);
    }
}
