use serde::{Deserialize, Serialize};

use crate::global_variables::DEFAULT_ROWS_PER_PAGE;
use crate::models::violation::{Violation, ViolationStatus, ViolationType};

/// Query parameters of the violations table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolationQuery {
    /// Zero-based page index.
    pub page: usize,
    pub rows_per_page: usize,
    pub search_term: String,
    pub violation_type: Option<ViolationType>,
    pub status: Option<ViolationStatus>,
    pub camera_id: Option<String>,
    /// Inclusive unix-second bounds on the violation timestamp.
    pub start_time: Option<u64>,
    pub end_time: Option<u64>,
}

impl Default for ViolationQuery {
    fn default() -> Self {
        Self {
            page: 0,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            search_term: String::new(),
            violation_type: None,
            status: None,
            camera_id: None,
            start_time: None,
            end_time: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolationPage {
    pub violations: Vec<Violation>,
    /// Matches before pagination.
    pub total_count: usize,
    pub page: usize,
    pub rows_per_page: usize,
}

fn matches_search(violation: &Violation, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let plate_match = violation
        .license_plate
        .as_deref()
        .map(|plate| plate.to_lowercase().contains(needle))
        .unwrap_or(false);
    plate_match || violation.location.to_lowercase().contains(needle)
}

/// Filters by search term (plate or location), type, status, camera and time
/// range, orders newest first and cuts out the requested page.
pub fn query_violations(violations: &[Violation], query: &ViolationQuery) -> ViolationPage {
    let needle = query.search_term.trim().to_lowercase();
    let mut matched: Vec<&Violation> = violations
        .iter()
        .filter(|v| matches_search(v, &needle))
        .filter(|v| query.violation_type.map_or(true, |t| v.violation_type == t))
        .filter(|v| query.status.map_or(true, |s| v.status == s))
        .filter(|v| query.camera_id.as_deref().map_or(true, |c| v.camera_id == c))
        .filter(|v| query.start_time.map_or(true, |t| v.timestamp >= t))
        .filter(|v| query.end_time.map_or(true, |t| v.timestamp <= t))
        .collect();
    matched.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let total_count = matched.len();
    let offset = query.page.saturating_mul(query.rows_per_page);
    let page = matched
        .into_iter()
        .skip(offset)
        .take(query.rows_per_page)
        .cloned()
        .collect();

    ViolationPage {
        violations: page,
        total_count,
        page: query.page,
        rows_per_page: query.rows_per_page,
    }
}
