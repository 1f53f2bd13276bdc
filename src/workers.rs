//! Worker directory seed for the helmet monitoring service.
//!
//! Defines the canonical list of workers issued a helmet, along with their
//! department and the helmet they wear. The repository seeds itself from
//! here at start-up; all other modules should look workers up through the
//! data feed rather than hardcoding ids.

use crate::model::Worker;

// ---------------------------------------------------------------------------
// Worker metadata
// ---------------------------------------------------------------------------

/// Static directory entry for one worker.
pub struct WorkerRecord {
    /// Directory id, also used in routes (`/workers/<id>`).
    pub id: &'static str,
    pub name: &'static str,
    pub department: &'static str,
    pub position: &'static str,
    /// Helmet serial, `H` followed by three digits.
    pub helmet_id: &'static str,
}

impl WorkerRecord {
    pub fn to_worker(&self) -> Worker {
        Worker {
            id: self.id.to_string(),
            name: self.name.to_string(),
            department: self.department.to_string(),
            position: self.position.to_string(),
            helmet_id: self.helmet_id.to_string(),
        }
    }
}

/// All workers currently issued an instrumented helmet.
pub static WORKER_REGISTRY: &[WorkerRecord] = &[
    WorkerRecord {
        id: "1",
        name: "Alex Johnson",
        department: "Construction",
        position: "Site Manager",
        helmet_id: "H001",
    },
    WorkerRecord {
        id: "2",
        name: "Maria Rodriguez",
        department: "Electrical",
        position: "Lead Electrician",
        helmet_id: "H002",
    },
    WorkerRecord {
        id: "3",
        name: "David Chen",
        department: "Maintenance",
        position: "Technician",
        helmet_id: "H003",
    },
    WorkerRecord {
        id: "4",
        name: "Sarah Wilson",
        department: "Safety",
        position: "Inspector",
        helmet_id: "H004",
    },
];

/// Owned copies of every registry entry, in registry order.
pub fn all_workers() -> Vec<Worker> {
    WORKER_REGISTRY.iter().map(WorkerRecord::to_worker).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
