// Phase duration bounds accepted by the edit dialog (seconds)
pub const MIN_PHASE_DURATION: u32 = 5;
pub const MAX_PHASE_DURATION: u32 = 120;

// Hard ceiling for durations read from data files or allowed by config (one day)
pub const MAX_STORED_PHASE_DURATION: u32 = 86_400;

// Auto refresh
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30;

// Violations table
pub const DEFAULT_ROWS_PER_PAGE: usize = 10;

// Traffic summary look-back window
pub const DEFAULT_SUMMARY_WINDOW_HOURS: u64 = 24;

// Environment variable holding the path of the JSON config file
pub const CONFIG_ENV_VAR: &str = "TRAFFIC_DASHBOARD_CONFIG";

// Signal timing recommendations (seconds)
pub const BASE_GREEN_DURATION: u32 = 30;
pub const MAX_GREEN_DURATION: u32 = 90;
pub const MIN_GREEN_DURATION: u32 = 20;
