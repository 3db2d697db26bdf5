use std::collections::BTreeMap;

use crate::models::intersection::Intersection;
use crate::models::violation::Violation;
use crate::shared_data::TrafficSummary;

/// Aggregates the dashboard header figures. Violations older than
/// `window_secs` before `now` are left out of the counts.
pub fn summarize(
    intersections: &[Intersection],
    violations: &[Violation],
    window_secs: u64,
    now: u64,
) -> TrafficSummary {
    let total_vehicles: u64 = intersections.iter().map(|i| i.vehicle_count as u64).sum();
    let average_wait_time = if intersections.is_empty() {
        0.0
    } else {
        intersections.iter().map(|i| i.avg_wait_time).sum::<f64>() / intersections.len() as f64
    };

    let mut intersections_by_status = BTreeMap::new();
    for intersection in intersections {
        *intersections_by_status.entry(intersection.status).or_insert(0) += 1;
    }

    let threshold = now.saturating_sub(window_secs);
    let mut violation_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_violations = 0;
    for violation in violations.iter().filter(|v| v.timestamp >= threshold) {
        *violation_counts
            .entry(violation.violation_type.to_string())
            .or_insert(0) += 1;
        total_violations += 1;
    }

    TrafficSummary {
        window_hours: window_secs / 3600,
        total_vehicles,
        average_wait_time,
        intersections_total: intersections.len(),
        intersections_by_status,
        violation_counts,
        total_violations,
        last_updated: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::intersection::{IntersectionStatus, Phase};
    use crate::models::violation::{ViolationStatus, ViolationType};

    fn intersection(status: IntersectionStatus, vehicles: u32, wait: f64) -> Intersection {
        Intersection {
            id: "int".to_string(),
            name: "int".to_string(),
            status,
            last_updated: 0,
            phases: vec![Phase::new("p1", "Main", 30, true)],
            vehicle_count: vehicles,
            avg_wait_time: wait,
        }
    }

    fn violation(kind: ViolationType, timestamp: u64) -> Violation {
        Violation {
            id: format!("v-{}", timestamp),
            violation_type: kind,
            license_plate: None,
            location: "Silk Board Junction".to_string(),
            camera_id: "cam-004".to_string(),
            timestamp,
            confidence: 0.8,
            status: ViolationStatus::Pending,
        }
    }

    #[test]
    fn totals_and_status_breakdown() {
        let ints = vec![
            intersection(IntersectionStatus::Active, 40, 30.0),
            intersection(IntersectionStatus::Active, 20, 50.0),
            intersection(IntersectionStatus::Maintenance, 0, 10.0),
        ];
        let summary = summarize(&ints, &[], 3600, 10_000);
        assert_eq!(summary.total_vehicles, 60);
        assert!((summary.average_wait_time - 30.0).abs() < f64::EPSILON);
        assert_eq!(summary.intersections_by_status[&IntersectionStatus::Active], 2);
        assert_eq!(summary.intersections_by_status[&IntersectionStatus::Maintenance], 1);
        assert_eq!(summary.window_hours, 1);
    }

    #[test]
    fn old_violations_fall_outside_window() {
        let violations = vec![
            violation(ViolationType::NoHelmet, 9_500),
            violation(ViolationType::NoHelmet, 9_900),
            violation(ViolationType::WrongWay, 100),
        ];
        let summary = summarize(&[], &violations, 3600, 10_000);
        assert_eq!(summary.total_violations, 2);
        assert_eq!(summary.violation_counts["no_helmet"], 2);
        assert!(!summary.violation_counts.contains_key("wrong_way"));
        assert_eq!(summary.average_wait_time, 0.0);
    }
}
