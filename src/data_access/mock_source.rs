use async_trait::async_trait;
use log::debug;
use rand::Rng;

use crate::control_system::phase_model::recolor_phases;
use crate::data_access::TrafficDataSource;
use crate::error::Result;
use crate::global_variables::DEFAULT_SUMMARY_WINDOW_HOURS;
use crate::models::camera::{CameraFeed, CameraStatus};
use crate::models::intersection::{Intersection, IntersectionStatus, Phase};
use crate::models::violation::{Violation, ViolationStatus, ViolationType};
use crate::monitoring::system_status::build_system_status;
use crate::monitoring::traffic_summary::summarize;
use crate::monitoring::violations::{query_violations, ViolationPage, ViolationQuery};
use crate::shared_data::{current_timestamp, SystemStatus, TrafficSummary};

fn intersection(
    id: &str,
    name: &str,
    status: IntersectionStatus,
    phases: Vec<Phase>,
    vehicle_count: u32,
    avg_wait_time: f64,
    now: u64,
) -> Intersection {
    let mut intersection = Intersection {
        id: id.to_string(),
        name: name.to_string(),
        status,
        last_updated: now,
        phases,
        vehicle_count,
        avg_wait_time,
    };
    recolor_phases(intersection.status, &mut intersection.phases);
    intersection
}

/// The built-in dataset the dashboard starts from when no data files are
/// configured.
pub fn seed_intersections(now: u64) -> Vec<Intersection> {
    vec![
        intersection(
            "int-001",
            "MG Road & Brigade Road",
            IntersectionStatus::Active,
            vec![
                Phase::new("p1", "North-South Green", 45, true),
                Phase::new("p2", "East-West Green", 40, false),
                Phase::new("p3", "Pedestrian Crossing", 20, false),
            ],
            48,
            42.5,
            now,
        ),
        intersection(
            "int-002",
            "Indiranagar 100ft Road",
            IntersectionStatus::Active,
            vec![
                Phase::new("p1", "Main Road Green", 50, false),
                Phase::new("p2", "Side Road Green", 30, true),
            ],
            31,
            28.0,
            now,
        ),
        intersection(
            "int-003",
            "Koramangala 80ft Road",
            IntersectionStatus::Inactive,
            vec![
                Phase::new("p1", "North-South Green", 40, true),
                Phase::new("p2", "East-West Green", 40, false),
                Phase::new("p3", "Right Turn Arrow", 15, false),
            ],
            12,
            15.0,
            now,
        ),
        intersection(
            "int-004",
            "Silk Board Junction",
            IntersectionStatus::Maintenance,
            vec![
                Phase::new("p1", "Hosur Road Green", 60, true),
                Phase::new("p2", "Outer Ring Road Green", 55, false),
                Phase::new("p3", "BTM Layout Green", 35, false),
                Phase::new("p4", "Pedestrian Crossing", 20, false),
            ],
            76,
            88.0,
            now,
        ),
    ]
}

pub fn seed_violations(now: u64) -> Vec<Violation> {
    let entries: [(ViolationType, Option<&str>, &str, &str, u64, f64, ViolationStatus); 6] = [
        (ViolationType::NoHelmet, Some("KA01AB1234"), "MG Road & Brigade Road", "cam-001", 300, 0.94, ViolationStatus::Pending),
        (ViolationType::WrongWay, Some("KA05MN4321"), "100ft Road, Indiranagar", "cam-002", 1_800, 0.88, ViolationStatus::Pending),
        (ViolationType::TripleRiding, None, "MG Road & Brigade Road", "cam-001", 5_400, 0.81, ViolationStatus::Reviewed),
        (ViolationType::NoSeatbelt, Some("KA03XY9999"), "Koramangala 80ft Road", "cam-003", 9_000, 0.77, ViolationStatus::Pending),
        (ViolationType::RedLight, Some("KA51HJ2020"), "Silk Board Junction", "cam-004", 43_200, 0.97, ViolationStatus::Resolved),
        (ViolationType::OverSpeeding, Some("KA02CD5678"), "100ft Road, Indiranagar", "cam-002", 172_800, 0.90, ViolationStatus::Resolved),
    ];
    entries
        .iter()
        .enumerate()
        .map(|(i, &(violation_type, plate, location, camera_id, age, confidence, status))| Violation {
            id: format!("vio-{:03}", i + 1),
            violation_type,
            license_plate: plate.map(str::to_string),
            location: location.to_string(),
            camera_id: camera_id.to_string(),
            timestamp: now.saturating_sub(age),
            confidence,
            status,
        })
        .collect()
}

/// One camera per violation source in `seed_violations`.
pub fn seed_cameras(now: u64) -> Vec<CameraFeed> {
    let entries: [(&str, &str, &str, CameraStatus, Option<u64>, Option<&str>); 4] = [
        ("cam-001", "Main Intersection", "MG Road & Brigade Road", CameraStatus::Online, Some(0), Some("rtsp://example.com/stream1")),
        ("cam-002", "Downtown", "100ft Road, Indiranagar", CameraStatus::Online, Some(0), Some("rtsp://example.com/stream2")),
        ("cam-003", "Koramangala Junction", "Koramangala 80ft Road", CameraStatus::Offline, Some(3_600), Some("rtsp://example.com/stream3")),
        ("cam-004", "Silk Board Flyover", "Silk Board Junction", CameraStatus::Error, None, None),
    ];
    entries
        .iter()
        .map(|&(id, name, location, status, idle, stream_url)| CameraFeed {
            id: id.to_string(),
            name: name.to_string(),
            location: location.to_string(),
            status,
            last_active: idle.map(|secs| now.saturating_sub(secs)),
            stream_url: stream_url.map(str::to_string),
        })
        .collect()
}

/// In-memory source over the seeded dataset. With jitter enabled every fetch
/// regenerates the live figures (vehicle counts, wait times, timestamps),
/// which is what a periodic refresh observes.
pub struct MockDataSource {
    intersections: Vec<Intersection>,
    violations: Vec<Violation>,
    cameras: Vec<CameraFeed>,
    jitter: bool,
    summary_window_secs: u64,
    started_at: u64,
}

impl MockDataSource {
    pub fn new() -> Self {
        let now = current_timestamp();
        Self::with_data(seed_intersections(now), seed_violations(now))
            .with_cameras(seed_cameras(now))
    }

    pub fn with_data(intersections: Vec<Intersection>, violations: Vec<Violation>) -> Self {
        Self {
            intersections,
            violations,
            cameras: Vec::new(),
            jitter: false,
            summary_window_secs: DEFAULT_SUMMARY_WINDOW_HOURS * 3600,
            started_at: current_timestamp(),
        }
    }

    pub fn with_cameras(mut self, cameras: Vec<CameraFeed>) -> Self {
        self.cameras = cameras;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn with_summary_window(mut self, window_secs: u64) -> Self {
        self.summary_window_secs = window_secs;
        self
    }

    fn snapshot(&self) -> Vec<Intersection> {
        let mut intersections = self.intersections.clone();
        if self.jitter {
            let mut rng = rand::rng();
            let now = current_timestamp();
            for intersection in intersections.iter_mut() {
                intersection.vehicle_count = rng.random_range(5..80);
                intersection.avg_wait_time = rng.random_range(10.0..90.0);
                intersection.last_updated = now;
            }
            debug!("Regenerated live figures for {} intersections", intersections.len());
        }
        intersections
    }
}

impl Default for MockDataSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TrafficDataSource for MockDataSource {
    async fn fetch_intersections(&self) -> Result<Vec<Intersection>> {
        Ok(self.snapshot())
    }

    async fn fetch_violations_page(&self, query: &ViolationQuery) -> Result<ViolationPage> {
        Ok(query_violations(&self.violations, query))
    }

    async fn fetch_traffic_summary(&self) -> Result<TrafficSummary> {
        Ok(summarize(
            &self.snapshot(),
            &self.violations,
            self.summary_window_secs,
            current_timestamp(),
        ))
    }

    async fn fetch_cameras(&self) -> Result<Vec<CameraFeed>> {
        Ok(self.cameras.clone())
    }

    async fn fetch_system_status(&self) -> Result<SystemStatus> {
        Ok(build_system_status(
            &self.cameras,
            &self.violations,
            self.started_at,
            current_timestamp(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrafficError;
    use crate::models::intersection::PhaseColor;
    use crate::shared_data::SystemHealth;

    #[test]
    fn seeded_phases_hold_one_active_each() {
        for intersection in seed_intersections(0) {
            assert!(!intersection.phases.is_empty());
            assert_eq!(intersection.phases.iter().filter(|p| p.active).count(), 1);
        }
    }

    #[test]
    fn seeded_colours_follow_status() {
        let seeded = seed_intersections(0);
        assert_eq!(seeded[0].phases[0].color, PhaseColor::Green);
        assert_eq!(seeded[0].phases[1].color, PhaseColor::Red);
        assert!(seeded[3].phases.iter().all(|p| p.color == PhaseColor::Yellow));
        assert_eq!(seeded[0].cycle_time(), 105);
    }

    #[tokio::test]
    async fn fetches_without_jitter_are_stable() {
        let source = MockDataSource::new();
        let first = source.fetch_intersections().await.unwrap();
        let second = source.fetch_intersections().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn jitter_keeps_phases_and_ids() {
        let source = MockDataSource::new().with_jitter(true);
        let fetched = source.fetch_intersections().await.unwrap();
        let seeded = seed_intersections(0);
        for (live, seed) in fetched.iter().zip(seeded.iter()) {
            assert_eq!(live.id, seed.id);
            assert_eq!(live.phases, seed.phases);
            assert!((5..80).contains(&live.vehicle_count));
        }
    }

    #[tokio::test]
    async fn summary_counts_recent_violations() {
        let source = MockDataSource::new();
        let summary = source.fetch_traffic_summary().await.unwrap();
        assert_eq!(summary.intersections_total, 4);
        assert_eq!(summary.total_vehicles, 48 + 31 + 12 + 76);
        // the over-speeding record is two days old
        assert_eq!(summary.total_violations, 5);
    }

    #[test]
    fn every_violation_camera_is_seeded() {
        let cameras = seed_cameras(0);
        for violation in seed_violations(0) {
            assert!(cameras.iter().any(|c| c.id == violation.camera_id));
        }
    }

    #[tokio::test]
    async fn cameras_are_looked_up_by_id() {
        let source = MockDataSource::new();
        assert_eq!(source.fetch_cameras().await.unwrap().len(), 4);

        let camera = source.fetch_camera("cam-002").await.unwrap();
        assert_eq!(camera.name, "Downtown");

        let err = source.fetch_camera("cam-999").await.unwrap_err();
        assert!(matches!(err, TrafficError::NotFound { entity: "camera", .. }));
    }

    #[tokio::test]
    async fn system_status_reports_camera_health() {
        let source = MockDataSource::new();
        let status = source.fetch_system_status().await.unwrap();
        assert_eq!(status.status, SystemHealth::Degraded);
        assert_eq!(status.cameras_online, 2);
        assert_eq!(status.cameras.len(), 4);
        assert!(status.violations_today <= 5);
    }
}
