use async_trait::async_trait;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::task;

use crate::control_system::phase_model::{recolor_phases, validate_intersection};
use crate::data_access::TrafficDataSource;
use crate::error::{Result, TrafficError};
use crate::models::camera::CameraFeed;
use crate::models::intersection::Intersection;
use crate::models::violation::Violation;
use crate::monitoring::system_status::build_system_status;
use crate::monitoring::traffic_summary::summarize;
use crate::monitoring::violations::{query_violations, ViolationPage, ViolationQuery};
use crate::shared_data::{current_timestamp, SystemStatus, TrafficSummary};

/// Reads intersections from a JSON file and violations from a CSV file on
/// every fetch, plus cameras from an optional JSON file. Any read, parse or
/// validation failure is reported as `FetchFailed`.
#[derive(Debug, Clone)]
pub struct FileDataSource {
    intersections_path: PathBuf,
    violations_path: PathBuf,
    cameras_path: Option<PathBuf>,
    summary_window_secs: u64,
    started_at: u64,
}

fn read_intersections(path: &Path) -> Result<Vec<Intersection>> {
    let contents = fs::read_to_string(path)?;
    let mut intersections: Vec<Intersection> = serde_json::from_str(&contents)?;
    for intersection in intersections.iter_mut() {
        validate_intersection(intersection)?;
        // Stored colours are not trusted; they are always derived.
        recolor_phases(intersection.status, &mut intersection.phases);
    }
    Ok(intersections)
}

fn read_cameras(path: &Path) -> Result<Vec<CameraFeed>> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn read_violations(path: &Path) -> Result<Vec<Violation>> {
    let mut rdr = csv::Reader::from_path(path)?;
    let mut violations = Vec::new();
    for result in rdr.deserialize() {
        violations.push(result?);
    }
    Ok(violations)
}

// Runs a blocking read off the async workers and folds every failure into
// `FetchFailed`.
async fn load_blocking<T, F>(what: &'static str, path: PathBuf, read: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&Path) -> Result<T> + Send + 'static,
{
    let shown = path.display().to_string();
    let outcome = task::spawn_blocking(move || read(&path))
        .await
        .map_err(|e| TrafficError::FetchFailed(format!("{} reader panicked: {}", what, e)))?;
    match outcome {
        Ok(value) => {
            debug!("Loaded {} from {}", what, shown);
            Ok(value)
        }
        Err(e) => {
            warn!("Failed to load {} from {}: {}", what, shown, e);
            Err(TrafficError::FetchFailed(format!("{} ({}): {}", what, shown, e)))
        }
    }
}

impl FileDataSource {
    pub fn new(
        intersections_path: impl Into<PathBuf>,
        violations_path: impl Into<PathBuf>,
        summary_window_secs: u64,
    ) -> Self {
        Self {
            intersections_path: intersections_path.into(),
            violations_path: violations_path.into(),
            cameras_path: None,
            summary_window_secs,
            started_at: current_timestamp(),
        }
    }

    pub fn with_cameras(mut self, cameras_path: impl Into<PathBuf>) -> Self {
        self.cameras_path = Some(cameras_path.into());
        self
    }

    async fn violations(&self) -> Result<Vec<Violation>> {
        load_blocking("violations", self.violations_path.clone(), read_violations).await
    }
}

#[async_trait]
impl TrafficDataSource for FileDataSource {
    async fn fetch_intersections(&self) -> Result<Vec<Intersection>> {
        load_blocking(
            "intersections",
            self.intersections_path.clone(),
            read_intersections,
        )
        .await
    }

    async fn fetch_violations_page(&self, query: &ViolationQuery) -> Result<ViolationPage> {
        let violations = self.violations().await?;
        Ok(query_violations(&violations, query))
    }

    async fn fetch_traffic_summary(&self) -> Result<TrafficSummary> {
        let intersections = self.fetch_intersections().await?;
        let violations = self.violations().await?;
        Ok(summarize(
            &intersections,
            &violations,
            self.summary_window_secs,
            current_timestamp(),
        ))
    }

    async fn fetch_cameras(&self) -> Result<Vec<CameraFeed>> {
        match &self.cameras_path {
            Some(path) => load_blocking("cameras", path.clone(), read_cameras).await,
            None => Ok(Vec::new()),
        }
    }

    async fn fetch_system_status(&self) -> Result<SystemStatus> {
        let cameras = self.fetch_cameras().await?;
        let violations = self.violations().await?;
        Ok(build_system_status(
            &cameras,
            &violations,
            self.started_at,
            current_timestamp(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_access::mock_source::{seed_cameras, seed_intersections, seed_violations};
    use crate::models::intersection::{IntersectionStatus, PhaseColor};
    use crate::models::violation::ViolationType;
    use tempfile::tempdir;

    fn write_fixtures(dir: &Path) -> (PathBuf, PathBuf) {
        let intersections_path = dir.join("intersections.json");
        let violations_path = dir.join("violations.csv");

        let mut intersections = seed_intersections(1_000);
        // stale colour that must be re-derived on load
        intersections[0].phases[0].color = PhaseColor::Yellow;
        fs::write(
            &intersections_path,
            serde_json::to_string_pretty(&intersections).unwrap(),
        )
        .unwrap();

        let mut wtr = csv::Writer::from_path(&violations_path).unwrap();
        for violation in seed_violations(current_timestamp()) {
            wtr.serialize(violation).unwrap();
        }
        wtr.flush().unwrap();

        (intersections_path, violations_path)
    }

    #[tokio::test]
    async fn loads_intersections_and_rederives_colours() {
        let dir = tempdir().unwrap();
        let (ints, vios) = write_fixtures(dir.path());
        let source = FileDataSource::new(ints, vios, 86_400);

        let intersections = source.fetch_intersections().await.unwrap();
        assert_eq!(intersections.len(), 4);
        assert_eq!(intersections[0].phases[0].color, PhaseColor::Green);
        assert_eq!(intersections[3].status, IntersectionStatus::Maintenance);
    }

    #[tokio::test]
    async fn queries_violations_from_csv() {
        let dir = tempdir().unwrap();
        let (ints, vios) = write_fixtures(dir.path());
        let source = FileDataSource::new(ints, vios, 86_400);

        let query = ViolationQuery {
            violation_type: Some(ViolationType::WrongWay),
            ..ViolationQuery::default()
        };
        let page = source.fetch_violations_page(&query).await.unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.violations[0].license_plate.as_deref(), Some("KA05MN4321"));

        let unplated = source
            .fetch_violations_page(&ViolationQuery {
                violation_type: Some(ViolationType::TripleRiding),
                ..ViolationQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(unplated.violations[0].license_plate, None);
    }

    #[tokio::test]
    async fn missing_file_is_fetch_failed() {
        let dir = tempdir().unwrap();
        let source = FileDataSource::new(
            dir.path().join("absent.json"),
            dir.path().join("absent.csv"),
            86_400,
        );
        let err = source.fetch_intersections().await.unwrap_err();
        assert!(matches!(err, TrafficError::FetchFailed(_)));
        assert!(source.fetch_traffic_summary().await.is_err());
    }

    async fn rejected_with(dir: &Path, intersections: &[Intersection]) -> String {
        let (ints, vios) = write_fixtures(dir);
        fs::write(&ints, serde_json::to_string(intersections).unwrap()).unwrap();
        let source = FileDataSource::new(ints, vios, 86_400);
        match source.fetch_intersections().await {
            Err(TrafficError::FetchFailed(message)) => message,
            other => panic!("expected FetchFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn intersection_without_phases_is_rejected() {
        let dir = tempdir().unwrap();
        let mut intersections = seed_intersections(1_000);
        intersections[1].phases.clear();

        let message = rejected_with(dir.path(), &intersections).await;
        assert!(message.contains("int-002"), "{}", message);
        assert!(message.contains("no phases"), "{}", message);
    }

    #[tokio::test]
    async fn zero_or_oversized_duration_is_rejected() {
        let dir = tempdir().unwrap();
        let mut intersections = seed_intersections(1_000);
        intersections[0].phases[2].duration = 0;
        let message = rejected_with(dir.path(), &intersections).await;
        assert!(message.contains("int-001"), "{}", message);

        let mut intersections = seed_intersections(1_000);
        intersections[0].phases[0].duration = 4_000_000_000;
        intersections[0].phases[1].duration = 400_000_000;
        let message = rejected_with(dir.path(), &intersections).await;
        assert!(message.contains("int-001"), "{}", message);
    }

    #[tokio::test]
    async fn duplicate_phase_ids_are_rejected() {
        let dir = tempdir().unwrap();
        let mut intersections = seed_intersections(1_000);
        intersections[3].phases[3].id = "p1".to_string();

        let message = rejected_with(dir.path(), &intersections).await;
        assert!(message.contains("int-004"), "{}", message);
        assert!(message.contains("duplicate phase id 'p1'"), "{}", message);
    }

    #[tokio::test]
    async fn two_active_phases_are_rejected() {
        let dir = tempdir().unwrap();
        let mut intersections = seed_intersections(1_000);
        intersections[2].phases[1].active = true;

        let message = rejected_with(dir.path(), &intersections).await;
        assert!(message.contains("int-003"), "{}", message);
    }

    #[tokio::test]
    async fn cameras_load_from_optional_file() {
        let dir = tempdir().unwrap();
        let (ints, vios) = write_fixtures(dir.path());

        let without = FileDataSource::new(ints.clone(), vios.clone(), 86_400);
        assert!(without.fetch_cameras().await.unwrap().is_empty());

        let cameras_path = dir.path().join("cameras.json");
        fs::write(&cameras_path, serde_json::to_string(&seed_cameras(1_000)).unwrap()).unwrap();
        let source = FileDataSource::new(ints, vios, 86_400).with_cameras(cameras_path.clone());

        let camera = source.fetch_camera("cam-004").await.unwrap();
        assert_eq!(camera.location, "Silk Board Junction");
        assert!(matches!(
            source.fetch_camera("cam-404").await,
            Err(TrafficError::NotFound { entity: "camera", .. })
        ));

        let status = source.fetch_system_status().await.unwrap();
        assert_eq!(status.cameras_online, 2);
        assert_eq!(status.cameras.len(), 4);
    }
}
