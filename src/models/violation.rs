use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationType {
    NoHelmet,
    NoSeatbelt,
    TripleRiding,
    WrongWay,
    RedLight,
    OverSpeeding,
}

impl ViolationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationType::NoHelmet => "no_helmet",
            ViolationType::NoSeatbelt => "no_seatbelt",
            ViolationType::TripleRiding => "triple_riding",
            ViolationType::WrongWay => "wrong_way",
            ViolationType::RedLight => "red_light",
            ViolationType::OverSpeeding => "over_speeding",
        }
    }
}

impl fmt::Display for ViolationType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViolationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "no_helmet" => Ok(ViolationType::NoHelmet),
            "no_seatbelt" => Ok(ViolationType::NoSeatbelt),
            "triple_riding" => Ok(ViolationType::TripleRiding),
            "wrong_way" => Ok(ViolationType::WrongWay),
            "red_light" => Ok(ViolationType::RedLight),
            "over_speeding" => Ok(ViolationType::OverSpeeding),
            other => Err(format!("unknown violation type '{}'", other)),
        }
    }
}

/// Review state of a recorded violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationStatus {
    Pending,
    Reviewed,
    Resolved,
}

impl fmt::Display for ViolationStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ViolationStatus::Pending => write!(f, "pending"),
            ViolationStatus::Reviewed => write!(f, "reviewed"),
            ViolationStatus::Resolved => write!(f, "resolved"),
        }
    }
}

impl FromStr for ViolationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ViolationStatus::Pending),
            "reviewed" => Ok(ViolationStatus::Reviewed),
            "resolved" => Ok(ViolationStatus::Resolved),
            other => Err(format!("unknown violation status '{}'", other)),
        }
    }
}

/// A traffic violation captured by a roadside camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub id: String,
    pub violation_type: ViolationType,
    pub license_plate: Option<String>,
    pub location: String,
    pub camera_id: String,
    /// Unix seconds.
    pub timestamp: u64,
    pub confidence: f64,
    pub status: ViolationStatus,
}
