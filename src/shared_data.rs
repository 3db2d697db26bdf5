// src/shared_data.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::models::camera::CameraFeed;
use crate::models::intersection::{Intersection, IntersectionStatus};

/// Seconds since the unix epoch. A clock set before 1970 reads as 0.
pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// One committed phase edit, as written to the adjustment audit CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseAdjustment {
    pub timestamp: u64,
    pub intersection_id: String,
    pub status: IntersectionStatus,
    pub cycle_time: u64,
    pub active_phase: Option<String>,
    /// `phase_id=duration` pairs in cycle order, separated by `;`.
    pub phase_durations: String,
}

impl PhaseAdjustment {
    pub fn from_intersection(intersection: &Intersection, timestamp: u64) -> Self {
        let phase_durations = intersection
            .phases
            .iter()
            .map(|p| format!("{}={}", p.id, p.duration))
            .collect::<Vec<_>>()
            .join(";");
        Self {
            timestamp,
            intersection_id: intersection.id.clone(),
            status: intersection.status,
            cycle_time: intersection.cycle_time(),
            active_phase: intersection.active_phase().map(|p| p.id.clone()),
            phase_durations,
        }
    }
}

/// Aggregated view shown at the top of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficSummary {
    pub window_hours: u64,
    pub total_vehicles: u64,
    pub average_wait_time: f64,
    pub intersections_total: usize,
    pub intersections_by_status: BTreeMap<IntersectionStatus, usize>,
    pub violation_counts: BTreeMap<String, usize>,
    pub total_violations: usize,
    pub last_updated: u64,
}

/// Overall health derived from how many cameras are reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemHealth {
    Operational,
    Degraded,
    Offline,
}

impl fmt::Display for SystemHealth {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SystemHealth::Operational => write!(f, "operational"),
            SystemHealth::Degraded => write!(f, "degraded"),
            SystemHealth::Offline => write!(f, "offline"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub status: SystemHealth,
    pub cameras: Vec<CameraFeed>,
    pub cameras_online: usize,
    /// Violations recorded on the current UTC day.
    pub violations_today: usize,
    pub uptime_secs: u64,
    pub last_updated: u64,
}
