use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraStatus {
    Online,
    Offline,
    Error,
}

impl fmt::Display for CameraStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CameraStatus::Online => write!(f, "online"),
            CameraStatus::Offline => write!(f, "offline"),
            CameraStatus::Error => write!(f, "error"),
        }
    }
}

/// A roadside camera that reports violations. Violations refer to it by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraFeed {
    pub id: String,
    pub name: String,
    pub location: String,
    pub status: CameraStatus,
    /// Unix seconds of the last frame received, if any.
    #[serde(default)]
    pub last_active: Option<u64>,
    #[serde(default)]
    pub stream_url: Option<String>,
}

impl CameraFeed {
    pub fn is_online(&self) -> bool {
        self.status == CameraStatus::Online
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_may_be_omitted() {
        let json = r#"{"id":"cam-009","name":"Hebbal","location":"Hebbal Flyover","status":"error"}"#;
        let camera: CameraFeed = serde_json::from_str(json).unwrap();
        assert_eq!(camera.status, CameraStatus::Error);
        assert_eq!(camera.last_active, None);
        assert!(!camera.is_online());
    }
}
