use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::control_system::intersection_editor::PhaseBounds;
use crate::error::{Result, TrafficError};
use crate::global_variables::{
    CONFIG_ENV_VAR, DEFAULT_REFRESH_INTERVAL_SECS, DEFAULT_ROWS_PER_PAGE,
    DEFAULT_SUMMARY_WINDOW_HOURS, MAX_PHASE_DURATION, MAX_STORED_PHASE_DURATION,
    MIN_PHASE_DURATION,
};

/// Runtime settings of the dashboard. Every field is optional in the JSON
/// file; missing ones take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub refresh_interval_secs: u64,
    pub auto_refresh: bool,
    pub rows_per_page: usize,
    pub min_phase_duration: u32,
    pub max_phase_duration: u32,
    pub summary_window_hours: u64,
    /// Intersections as JSON. Used together with `violations_file`.
    pub intersections_file: Option<PathBuf>,
    /// Violations as CSV.
    pub violations_file: Option<PathBuf>,
    /// Camera feeds as JSON. Optional even when the other files are set.
    pub cameras_file: Option<PathBuf>,
    /// Where committed phase edits are appended, if anywhere.
    pub adjustment_log: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            auto_refresh: true,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            min_phase_duration: MIN_PHASE_DURATION,
            max_phase_duration: MAX_PHASE_DURATION,
            summary_window_hours: DEFAULT_SUMMARY_WINDOW_HOURS,
            intersections_file: None,
            violations_file: None,
            cameras_file: None,
            adjustment_log: None,
        }
    }
}

impl DashboardConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config: DashboardConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that would make every edit fail or overflow the
    /// summary window.
    pub fn validate(&self) -> Result<()> {
        if self.min_phase_duration == 0 {
            return Err(TrafficError::InvalidConfig(
                "min_phase_duration must be at least 1".to_string(),
            ));
        }
        if self.min_phase_duration > self.max_phase_duration {
            return Err(TrafficError::InvalidConfig(format!(
                "min_phase_duration {} exceeds max_phase_duration {}",
                self.min_phase_duration, self.max_phase_duration
            )));
        }
        if self.max_phase_duration > MAX_STORED_PHASE_DURATION {
            return Err(TrafficError::InvalidConfig(format!(
                "max_phase_duration {} exceeds {}",
                self.max_phase_duration, MAX_STORED_PHASE_DURATION
            )));
        }
        if self.rows_per_page == 0 {
            return Err(TrafficError::InvalidConfig(
                "rows_per_page must be at least 1".to_string(),
            ));
        }
        if self.summary_window_hours.checked_mul(3600).is_none() {
            return Err(TrafficError::InvalidConfig(format!(
                "summary_window_hours {} is too large",
                self.summary_window_hours
            )));
        }
        Ok(())
    }

    /// Loads the file named by `TRAFFIC_DASHBOARD_CONFIG`, or the defaults when
    /// the variable is unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => {
                info!("Loading dashboard config from {:?}", path);
                Self::load(PathBuf::from(path))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn phase_bounds(&self) -> PhaseBounds {
        PhaseBounds::new(self.min_phase_duration, self.max_phase_duration)
    }

    pub fn summary_window_secs(&self) -> u64 {
        self.summary_window_hours.saturating_mul(3600)
    }
}
