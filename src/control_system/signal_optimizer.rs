use serde::{Deserialize, Serialize};

use crate::global_variables::{BASE_GREEN_DURATION, MAX_GREEN_DURATION, MIN_GREEN_DURATION};
use crate::models::intersection::{Intersection, PhaseColor};

// Per-intersection vehicle count above which the green duration applies.
const BUSY_INTERSECTION_VEHICLES: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingRecommendation {
    pub intersection_id: String,
    pub color: PhaseColor,
    /// Seconds.
    pub duration: u32,
    pub reason: String,
}

/// Green duration for a given average vehicle count, with the reason shown to
/// the operator.
pub fn recommend_green_duration(avg_vehicles: f64) -> (u32, &'static str) {
    if avg_vehicles > 50.0 {
        (
            (BASE_GREEN_DURATION * 3 / 2).min(MAX_GREEN_DURATION),
            "Heavy traffic detected - extended green time",
        )
    } else if avg_vehicles > 20.0 {
        (BASE_GREEN_DURATION, "Moderate traffic - standard timing")
    } else {
        (
            (BASE_GREEN_DURATION * 3 / 4).max(MIN_GREEN_DURATION),
            "Light traffic - reduced cycle time",
        )
    }
}

/// Suggests a signal state and duration per intersection from its current
/// vehicle count.
pub fn optimize_timings(intersections: &[Intersection]) -> Vec<TimingRecommendation> {
    if intersections.is_empty() {
        let (duration, reason) = recommend_green_duration(0.0);
        return vec![TimingRecommendation {
            intersection_id: "default_intersection".to_string(),
            color: PhaseColor::Green,
            duration,
            reason: reason.to_string(),
        }];
    }

    let network_avg = intersections
        .iter()
        .map(|i| i.vehicle_count as f64)
        .sum::<f64>()
        / intersections.len() as f64;
    let (green_duration, _) = recommend_green_duration(network_avg);

    intersections
        .iter()
        .map(|i| {
            let vehicles = i.vehicle_count as f64;
            let (color, duration) = if vehicles > BUSY_INTERSECTION_VEHICLES {
                (PhaseColor::Green, green_duration)
            } else {
                let red = (green_duration as f64 * 0.67) as u32;
                (PhaseColor::Red, red.max(MIN_GREEN_DURATION))
            };
            TimingRecommendation {
                intersection_id: i.id.clone(),
                color,
                duration,
                reason: format!("Average {:.1} vehicles per reading", vehicles),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::intersection::{IntersectionStatus, Phase};

    fn with_vehicles(id: &str, vehicle_count: u32) -> Intersection {
        Intersection {
            id: id.to_string(),
            name: id.to_string(),
            status: IntersectionStatus::Active,
            last_updated: 0,
            phases: vec![Phase::new("p1", "Main", 30, true)],
            vehicle_count,
            avg_wait_time: 0.0,
        }
    }

    #[test]
    fn green_duration_follows_density() {
        assert_eq!(recommend_green_duration(60.0).0, 45);
        assert_eq!(recommend_green_duration(30.0).0, 30);
        assert_eq!(recommend_green_duration(5.0).0, 22);
    }

    #[test]
    fn quiet_intersections_get_red() {
        let recs = optimize_timings(&[with_vehicles("int-001", 70), with_vehicles("int-002", 4)]);
        // network average 37 -> moderate, 30s green
        assert_eq!(recs[0].color, PhaseColor::Green);
        assert_eq!(recs[0].duration, 30);
        assert_eq!(recs[1].color, PhaseColor::Red);
        assert_eq!(recs[1].duration, 20);
    }

    #[test]
    fn empty_network_yields_default() {
        let recs = optimize_timings(&[]);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].intersection_id, "default_intersection");
        assert_eq!(recs[0].duration, 22);
    }
}
