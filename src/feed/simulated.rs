//! Simulated helmet telemetry.
//!
//! Stands in for the helmet gateway until real devices are integrated.
//! Produces randomized but plausible vital samples (roughly four in five
//! nominal, the rest excursions), helmet state, and a backlog of safety
//! events. Seed it for deterministic tests; use `from_entropy` for demos.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::model::{
    Accelerometer, Event, EventStatus, EventType, Helmet, HelmetStatus, MotionStatus, Severity,
    VitalSample, Worker,
};

/// Probability that a generated sample is entirely nominal.
pub const NOMINAL_PROBABILITY: f64 = 0.8;

/// Delay between a seeded event and its seeded resolution.
pub const SEED_RESOLUTION_DELAY_MINUTES: i64 = 30;

/// Seeded events are spread across this many past days.
pub const SEED_EVENT_SPREAD_DAYS: i64 = 7;

// ============================================================================
// Generator
// ============================================================================

pub struct VitalGenerator {
    rng: StdRng,
}

impl VitalGenerator {
    /// Deterministic generator for tests and reproducible demos.
    pub fn seeded(seed: u64) -> Self {
        VitalGenerator {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        VitalGenerator {
            rng: StdRng::from_entropy(),
        }
    }

    /// One sample for `worker_id` stamped at `timestamp`.
    pub fn sample(&mut self, worker_id: &str, timestamp: DateTime<Utc>) -> VitalSample {
        let nominal = self.rng.gen_bool(NOMINAL_PROBABILITY);
        let rng = &mut self.rng;

        let (oximeter, heart_rate, temperature, gas_level): (f64, f64, f64, f64) = if nominal {
            (
                rng.gen_range(95.0..100.0),
                rng.gen_range(60.0..100.0),
                rng.gen_range(36.1..37.2),
                rng.gen_range(0.0..20.0),
            )
        } else {
            (
                rng.gen_range(85.0..95.0),
                rng.gen_range(50.0..150.0),
                rng.gen_range(35.0..39.0),
                rng.gen_range(20.0..100.0),
            )
        };

        let motion_status = if nominal {
            MotionStatus::Normal
        } else if rng.gen_bool(0.5) {
            MotionStatus::Warning
        } else {
            MotionStatus::FallDetected
        };

        VitalSample {
            worker_id: worker_id.to_string(),
            oximeter,
            heart_rate,
            temperature,
            humidity: rng.gen_range(40.0..60.0),
            gas_level,
            accelerometer: Accelerometer {
                x: rng.gen_range(-1.0..1.0),
                y: rng.gen_range(-1.0..1.0),
                z: rng.gen_range(-1.0..1.0),
                motion_status,
            },
            timestamp,
        }
    }

    /// `window` hourly samples, oldest first, the last one stamped `end`.
    pub fn history(&mut self, worker_id: &str, window: usize, end: DateTime<Utc>) -> Vec<VitalSample> {
        (0..window)
            .map(|i| {
                let hours_back = (window - 1 - i) as i64;
                self.sample(worker_id, end - Duration::hours(hours_back))
            })
            .collect()
    }

    /// Helmet state for a worker, mostly active, sometimes warning.
    pub fn helmet(&mut self, worker: &Worker, now: DateTime<Utc>) -> Helmet {
        let status = [
            HelmetStatus::Active,
            HelmetStatus::Active,
            HelmetStatus::Active,
            HelmetStatus::Warning,
        ]
        .choose(&mut self.rng)
        .copied()
        .unwrap_or(HelmetStatus::Active);

        Helmet {
            id: worker.helmet_id.clone(),
            worker_id: worker.id.clone(),
            battery_level: self.rng.gen_range(0..100),
            status,
            last_connected: now,
        }
    }

    /// `count` random events across `workers` within the past week,
    /// ordered newest first. Resolved events are closed out by
    /// `supervisor` half an hour after they occurred.
    pub fn events(
        &mut self,
        workers: &[Worker],
        count: usize,
        now: DateTime<Utc>,
        supervisor: &str,
    ) -> Vec<Event> {
        let mut events = Vec::with_capacity(count);

        for i in 0..count {
            let Some(worker) = workers.choose(&mut self.rng) else {
                break;
            };
            let event_type = *EventType::ALL.choose(&mut self.rng).unwrap_or(&EventType::Disconnected);
            let severity = *Severity::ALL.choose(&mut self.rng).unwrap_or(&Severity::Low);
            let status = *EventStatus::ALL.choose(&mut self.rng).unwrap_or(&EventStatus::New);

            let timestamp = now
                - Duration::days(self.rng.gen_range(0..SEED_EVENT_SPREAD_DAYS))
                - Duration::hours(self.rng.gen_range(0..24))
                - Duration::minutes(self.rng.gen_range(0..60));

            let (resolved_at, resolved_by) = if status == EventStatus::Resolved {
                (
                    Some(timestamp + Duration::minutes(SEED_RESOLUTION_DELAY_MINUTES)),
                    Some(supervisor.to_string()),
                )
            } else {
                (None, None)
            };

            events.push(Event {
                id: format!("E{}", i + 1),
                worker_id: worker.id.clone(),
                helmet_id: worker.helmet_id.clone(),
                event_type,
                severity,
                status,
                timestamp,
                description: event_description(event_type).to_string(),
                resolved_at,
                resolved_by,
            });
        }

        events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        events
    }
}

/// Canned description for a seeded event.
pub fn event_description(event_type: EventType) -> &'static str {
    match event_type {
        EventType::FallDetected => {
            "Worker may have fallen. Motion sensors detected sudden acceleration."
        }
        EventType::HighCoLevel => "High carbon monoxide level detected. Worker may be at risk.",
        EventType::LowOxygen => {
            "Low oxygen level detected. Worker may be experiencing breathing difficulties."
        }
        EventType::HighTemperature => {
            "High body temperature detected. Worker may be experiencing heat stress."
        }
        EventType::BatteryLow => "Helmet battery is low. Replacement or charging required soon.",
        EventType::Disconnected => "Helmet connection lost. Unable to monitor worker status.",
    }
}

// ============================================================================
// Tests
// ============================================================================
