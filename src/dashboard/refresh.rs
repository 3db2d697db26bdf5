use log::{debug, info};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};

use crate::dashboard::session::{apply_fetch, TrafficLightsState};
use crate::data_access::TrafficDataSource;

/// Periodic reload of the intersection list. The task is aborted when this
/// handle is cancelled or dropped, so it never outlives its owner.
pub struct RefreshTask {
    handle: JoinHandle<()>,
}

impl RefreshTask {
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        source: Arc<dyn TrafficDataSource>,
        state: Arc<Mutex<TrafficLightsState>>,
        interval: Duration,
    ) -> Self {
        info!("Auto refresh every {:?}", interval);
        let handle = tokio::spawn(async move {
            loop {
                sleep(interval).await;
                let fetched = source.fetch_intersections().await;
                // failures are recorded in the view state
                if apply_fetch(&state, fetched).is_ok() {
                    debug!("Auto refresh applied");
                }
            }
        });
        Self { handle }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for RefreshTask {
    fn drop(&mut self) {
        self.handle.abort();
        debug!("Auto refresh stopped");
    }
}
