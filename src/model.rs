//! VitalSample, Worker, Helmet, Event and HelmetError
//! core data structures and error handling
//!
//! Core data types for the helmet monitoring service.
//!
//! This module defines the shared domain model imported by all other modules.
//! It contains no logic beyond display labels and the event status workflow,
//! and no I/O.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Reading types
// ---------------------------------------------------------------------------

/// Motion state reported by the helmet accelerometer.
///
/// Exactly one state holds per sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionStatus {
    Normal,
    Warning,
    FallDetected,
}

/// Raw accelerometer axes plus the helmet's own motion verdict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accelerometer {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(rename = "status")]
    pub motion_status: MotionStatus,
}

/// One worker's instantaneous sensor readings.
///
/// Samples are immutable once produced; the feed supersedes them with the
/// next sample rather than mutating. Within a per-worker history the
/// timestamps are non-decreasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalSample {
    pub worker_id: String,
    /// Blood oxygen saturation, percent.
    pub oximeter: f64,
    /// Beats per minute.
    pub heart_rate: f64,
    /// Body temperature, degrees Celsius.
    pub temperature: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
    /// Ambient gas concentration, ppm-equivalent.
    pub gas_level: f64,
    pub accelerometer: Accelerometer,
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Directory types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    pub id: String,
    pub name: String,
    pub department: String,
    pub position: String,
    pub helmet_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HelmetStatus {
    Active,
    Inactive,
    Warning,
    Critical,
}

/// Connection and battery state of a physical helmet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Helmet {
    pub id: String,
    pub worker_id: String,
    /// Percent, 0-100.
    pub battery_level: u8,
    pub status: HelmetStatus,
    pub last_connected: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    FallDetected,
    HighCoLevel,
    LowOxygen,
    HighTemperature,
    BatteryLow,
    Disconnected,
}

impl EventType {
    pub const ALL: [EventType; 6] = [
        EventType::FallDetected,
        EventType::HighCoLevel,
        EventType::LowOxygen,
        EventType::HighTemperature,
        EventType::BatteryLow,
        EventType::Disconnected,
    ];

    /// Wire identifier, e.g. `high_co_level`.
    pub fn code(&self) -> &'static str {
        match self {
            EventType::FallDetected => "fall_detected",
            EventType::HighCoLevel => "high_co_level",
            EventType::LowOxygen => "low_oxygen",
            EventType::HighTemperature => "high_temperature",
            EventType::BatteryLow => "battery_low",
            EventType::Disconnected => "disconnected",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventType::FallDetected => "Fall Detected",
            EventType::HighCoLevel => "High CO Level",
            EventType::LowOxygen => "Low Oxygen",
            EventType::HighTemperature => "High Temperature",
            EventType::BatteryLow => "Battery Low",
            EventType::Disconnected => "Disconnected",
        }
    }

    pub fn from_code(code: &str) -> Option<EventType> {
        EventType::ALL.into_iter().find(|t| t.code() == code)
    }
}

/// Severity shared by persisted events and transient alerts, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }

    pub fn from_code(code: &str) -> Option<Severity> {
        Severity::ALL.into_iter().find(|s| s.code() == code)
    }
}

/// Supervisor workflow for an event: new -> acknowledged -> resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    New,
    Acknowledged,
    Resolved,
}

impl EventStatus {
    pub const ALL: [EventStatus; 3] = [
        EventStatus::New,
        EventStatus::Acknowledged,
        EventStatus::Resolved,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            EventStatus::New => "new",
            EventStatus::Acknowledged => "acknowledged",
            EventStatus::Resolved => "resolved",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventStatus::New => "New",
            EventStatus::Acknowledged => "Acknowledged",
            EventStatus::Resolved => "Resolved",
        }
    }

    pub fn from_code(code: &str) -> Option<EventStatus> {
        EventStatus::ALL.into_iter().find(|s| s.code() == code)
    }

    /// Whether a view should offer the transition to `next`.
    ///
    /// Only forward moves are offered. The store itself accepts any status;
    /// the workflow is a convention enforced here, at the edge.
    pub fn can_advance_to(&self, next: EventStatus) -> bool {
        next > *self
    }
}

/// A persisted safety-incident record owned by the event store.
///
/// `resolved_at` and `resolved_by` are set if and only if
/// `status == Resolved`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub worker_id: String,
    pub helmet_id: String,
    pub event_type: EventType,
    pub severity: Severity,
    pub status: EventStatus,
    pub timestamp: DateTime<Utc>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_by: Option<String>,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when talking to the data feed, event store or
/// session accessor, or when loading configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum HelmetError {
    /// No worker with this id in the directory.
    WorkerNotFound(String),
    /// No helmet with this id.
    HelmetNotFound(String),
    /// No event with this id in the store.
    EventNotFound(String),
    /// The feed could not produce data (transport or mock failure).
    FeedUnavailable(String),
    /// Email/password pair did not match any user.
    InvalidCredentials,
    /// Registration attempted with an email that is already taken.
    UserExists(String),
    /// Session file could not be read or written.
    SessionStorage(String),
    /// A filter value (date, status code) could not be parsed.
    InvalidFilter(String),
    /// Configuration file or environment value was malformed.
    Config(String),
}

impl HelmetError {
    /// True for the not-found family, which views turn into a redirect.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            HelmetError::WorkerNotFound(_)
                | HelmetError::HelmetNotFound(_)
                | HelmetError::EventNotFound(_)
        )
    }
}

impl fmt::Display for HelmetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HelmetError::WorkerNotFound(id) => write!(f, "Worker not found: {}", id),
            HelmetError::HelmetNotFound(id) => write!(f, "Helmet not found: {}", id),
            HelmetError::EventNotFound(id) => write!(f, "Event not found: {}", id),
            HelmetError::FeedUnavailable(msg) => write!(f, "Feed unavailable: {}", msg),
            HelmetError::InvalidCredentials => write!(f, "Invalid email or password"),
            HelmetError::UserExists(email) => {
                write!(f, "User with this email already exists: {}", email)
            }
            HelmetError::SessionStorage(msg) => write!(f, "Session storage error: {}", msg),
            HelmetError::InvalidFilter(msg) => write!(f, "Invalid filter: {}", msg),
            HelmetError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for HelmetError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_codes_round_trip_through_lookup() {
        for t in EventType::ALL {
            assert_eq!(EventType::from_code(t.code()), Some(t));
        }
        assert_eq!(EventType::from_code("earthquake"), None);
    }

    #[test]
    fn test_status_only_offers_forward_moves() {
        assert!(EventStatus::New.can_advance_to(EventStatus::Acknowledged));
        assert!(EventStatus::New.can_advance_to(EventStatus::Resolved));
        assert!(EventStatus::Acknowledged.can_advance_to(EventStatus::Resolved));
        assert!(!EventStatus::Resolved.can_advance_to(EventStatus::New));
        assert!(!EventStatus::Acknowledged.can_advance_to(EventStatus::Acknowledged));
    }

    #[test]
    fn test_event_serializes_with_wire_names() {
        let event = Event {
            id: "E1".to_string(),
            worker_id: "1".to_string(),
            helmet_id: "H001".to_string(),
            event_type: EventType::HighCoLevel,
            severity: Severity::High,
            status: EventStatus::New,
            timestamp: DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            description: "High carbon monoxide level detected.".to_string(),
            resolved_at: None,
            resolved_by: None,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["workerId"], "1");
        assert_eq!(json["eventType"], "high_co_level");
        assert_eq!(json["status"], "new");
        assert!(json.get("resolvedAt").is_none());
    }

    #[test]
    fn test_not_found_family() {
        assert!(HelmetError::EventNotFound("E9".into()).is_not_found());
        assert!(HelmetError::WorkerNotFound("9".into()).is_not_found());
        assert!(!HelmetError::FeedUnavailable("timeout".into()).is_not_found());
    }
}
