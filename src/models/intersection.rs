use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::control_system::phase_model;

/// Operational status of a signalised intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntersectionStatus {
    Active,
    Inactive,
    Maintenance,
}

impl fmt::Display for IntersectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IntersectionStatus::Active => write!(f, "active"),
            IntersectionStatus::Inactive => write!(f, "inactive"),
            IntersectionStatus::Maintenance => write!(f, "maintenance"),
        }
    }
}

impl FromStr for IntersectionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(IntersectionStatus::Active),
            "inactive" => Ok(IntersectionStatus::Inactive),
            "maintenance" => Ok(IntersectionStatus::Maintenance),
            other => Err(format!("unknown intersection status '{}'", other)),
        }
    }
}

/// Display colour of a phase. Derived from the intersection status and the
/// phase's active flag; see `phase_model::phase_color`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseColor {
    Red,
    Yellow,
    Green,
}

impl fmt::Display for PhaseColor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PhaseColor::Red => write!(f, "red"),
            PhaseColor::Yellow => write!(f, "yellow"),
            PhaseColor::Green => write!(f, "green"),
        }
    }
}

/// A timed interval in an intersection's signal cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    /// Unique within the owning intersection.
    pub id: String,
    pub name: String,
    /// Duration in seconds.
    pub duration: u32,
    pub active: bool,
    pub color: PhaseColor,
}

impl Phase {
    pub fn new(id: &str, name: &str, duration: u32, active: bool) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            duration,
            active,
            color: if active { PhaseColor::Green } else { PhaseColor::Red },
        }
    }
}

/// A single editable field of a phase.
#[derive(Debug, Clone, PartialEq)]
pub enum PhaseField {
    Name(String),
    Duration(u32),
    Active(bool),
}

/// Represents a signalised intersection and its phase cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intersection {
    pub id: String,
    pub name: String,
    pub status: IntersectionStatus,
    /// Unix seconds of the last change.
    pub last_updated: u64,
    /// Cycle order.
    pub phases: Vec<Phase>,
    pub vehicle_count: u32,
    /// Average wait time in seconds.
    pub avg_wait_time: f64,
}

impl Intersection {
    pub fn active_phase(&self) -> Option<&Phase> {
        phase_model::derive_active_phase(&self.phases)
    }

    pub fn next_phase(&self) -> Option<&Phase> {
        phase_model::derive_next_phase(&self.phases)
    }

    /// Sum of all phase durations, in seconds.
    pub fn cycle_time(&self) -> u64 {
        phase_model::total_cycle_time(&self.phases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!(
            "Maintenance".parse::<IntersectionStatus>(),
            Ok(IntersectionStatus::Maintenance)
        );
        assert!("broken".parse::<IntersectionStatus>().is_err());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&IntersectionStatus::Inactive).unwrap();
        assert_eq!(json, "\"inactive\"");
    }
}
