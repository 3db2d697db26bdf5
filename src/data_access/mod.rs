//! Data access for the dashboard. The view session only ever talks to a
//! `TrafficDataSource`, so the phase logic can be exercised without any
//! transport behind it.

pub mod file_source;
pub mod mock_source;

use async_trait::async_trait;

use crate::error::{Result, TrafficError};
use crate::models::camera::CameraFeed;
use crate::models::intersection::Intersection;
use crate::monitoring::violations::{ViolationPage, ViolationQuery};
use crate::shared_data::{SystemStatus, TrafficSummary};

pub use file_source::FileDataSource;
pub use mock_source::MockDataSource;

#[async_trait]
pub trait TrafficDataSource: Send + Sync {
    async fn fetch_intersections(&self) -> Result<Vec<Intersection>>;
    async fn fetch_violations_page(&self, query: &ViolationQuery) -> Result<ViolationPage>;
    async fn fetch_traffic_summary(&self) -> Result<TrafficSummary>;
    async fn fetch_cameras(&self) -> Result<Vec<CameraFeed>>;
    async fn fetch_system_status(&self) -> Result<SystemStatus>;

    async fn fetch_camera(&self, id: &str) -> Result<CameraFeed> {
        self.fetch_cameras()
            .await?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| TrafficError::camera_not_found(id))
    }
}
