use thiserror::Error;

/// Errors surfaced by the dashboard core. None of them are fatal: callers
/// report them and keep the session alive.
#[derive(Debug, Error)]
pub enum TrafficError {
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("failed to fetch data: {0}")]
    FetchFailed(String),

    #[error("phase duration {duration}s is outside {min}..={max}s")]
    InvalidDuration { duration: u32, min: u32, max: u32 },

    #[error("intersection '{id}' is invalid: {reason}")]
    InvalidIntersection { id: String, reason: String },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("no intersection is open for editing")]
    NoDraft,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl TrafficError {
    pub fn intersection_not_found(id: &str) -> Self {
        TrafficError::NotFound {
            entity: "intersection",
            id: id.to_string(),
        }
    }

    pub fn camera_not_found(id: &str) -> Self {
        TrafficError::NotFound {
            entity: "camera",
            id: id.to_string(),
        }
    }

    pub fn phase_not_found(id: &str) -> Self {
        TrafficError::NotFound {
            entity: "phase",
            id: id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TrafficError>;
