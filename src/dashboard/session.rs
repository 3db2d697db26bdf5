use log::{info, warn};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::config::DashboardConfig;
use crate::control_system::intersection_editor::{
    commit_edit, filter_intersections, IntersectionDraft, PhaseBounds,
};
use crate::dashboard::refresh::RefreshTask;
use crate::data_access::TrafficDataSource;
use crate::error::{Result, TrafficError};
use crate::models::intersection::{Intersection, IntersectionStatus, PhaseField};
use crate::monitoring::adjustment_log::log_phase_adjustment;
use crate::shared_data::{current_timestamp, PhaseAdjustment};

pub const LOAD_ERROR_MESSAGE: &str = "Failed to load traffic light data. Please try again later.";

/// What the Traffic Lights view renders from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrafficLightsState {
    pub intersections: Vec<Intersection>,
    pub loading: bool,
    pub error: Option<String>,
    pub last_refreshed: Option<u64>,
}

pub(crate) fn lock_state(state: &Mutex<TrafficLightsState>) -> MutexGuard<'_, TrafficLightsState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Stores a fetch result in the view state. A failure keeps the previous list
/// and sets the generic error message.
pub(crate) fn apply_fetch(
    state: &Mutex<TrafficLightsState>,
    fetched: Result<Vec<Intersection>>,
) -> Result<()> {
    let mut guard = lock_state(state);
    guard.loading = false;
    match fetched {
        Ok(intersections) => {
            guard.intersections = intersections;
            guard.error = None;
            guard.last_refreshed = Some(current_timestamp());
            Ok(())
        }
        Err(e) => {
            warn!("Loading intersections failed: {}", e);
            guard.error = Some(LOAD_ERROR_MESSAGE.to_string());
            match e {
                TrafficError::FetchFailed(_) => Err(e),
                other => Err(TrafficError::FetchFailed(other.to_string())),
            }
        }
    }
}

/// One open Traffic Lights view: the committed working set, at most one draft
/// under edit, and the optional auto refresh task.
pub struct TrafficLightsSession {
    source: Arc<dyn TrafficDataSource>,
    state: Arc<Mutex<TrafficLightsState>>,
    draft: Option<IntersectionDraft>,
    bounds: PhaseBounds,
    refresh_interval: Duration,
    refresh: Option<RefreshTask>,
    adjustment_log: Option<PathBuf>,
}

impl TrafficLightsSession {
    /// Auto refresh is not started here; see `set_auto_refresh`.
    pub fn new(source: Arc<dyn TrafficDataSource>, config: &DashboardConfig) -> Self {
        Self {
            source,
            state: Arc::new(Mutex::new(TrafficLightsState::default())),
            draft: None,
            bounds: config.phase_bounds(),
            refresh_interval: config.refresh_interval(),
            refresh: None,
            adjustment_log: config.adjustment_log.clone(),
        }
    }

    pub fn source(&self) -> Arc<dyn TrafficDataSource> {
        Arc::clone(&self.source)
    }

    pub async fn load(&self) -> Result<()> {
        lock_state(&self.state).loading = true;
        let fetched = self.source.fetch_intersections().await;
        apply_fetch(&self.state, fetched)
    }

    pub fn state(&self) -> TrafficLightsState {
        lock_state(&self.state).clone()
    }

    pub fn intersections(&self) -> Vec<Intersection> {
        lock_state(&self.state).intersections.clone()
    }

    pub fn filtered(&self, search: &str) -> Vec<Intersection> {
        let guard = lock_state(&self.state);
        filter_intersections(&guard.intersections, search)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn error(&self) -> Option<String> {
        lock_state(&self.state).error.clone()
    }

    /// Copies the committed intersection into a fresh draft, replacing any
    /// draft already open.
    pub fn open_draft(&mut self, intersection_id: &str) -> Result<&IntersectionDraft> {
        let intersection = lock_state(&self.state)
            .intersections
            .iter()
            .find(|i| i.id == intersection_id)
            .cloned()
            .ok_or_else(|| TrafficError::intersection_not_found(intersection_id))?;
        let draft = self.draft.insert(IntersectionDraft::new(intersection, self.bounds));
        Ok(&*draft)
    }

    pub fn draft(&self) -> Option<&IntersectionDraft> {
        self.draft.as_ref()
    }

    fn draft_mut(&mut self) -> Result<&mut IntersectionDraft> {
        self.draft.as_mut().ok_or(TrafficError::NoDraft)
    }

    pub fn set_phase_field(&mut self, phase_id: &str, field: PhaseField) -> Result<()> {
        self.draft_mut()?.set_phase_field(phase_id, field)
    }

    pub fn set_status(&mut self, status: IntersectionStatus) -> Result<()> {
        self.draft_mut()?.set_status(status);
        Ok(())
    }

    pub fn activate_phase(&mut self, phase_id: &str) -> Result<()> {
        self.draft_mut()?.activate_phase(phase_id)
    }

    pub fn cancel_draft(&mut self) {
        self.draft = None;
    }

    /// Writes the draft back into the working set. The draft stays open if the
    /// intersection has disappeared from the list in the meantime.
    pub fn commit(&mut self) -> Result<Intersection> {
        let draft = self.draft.as_ref().ok_or(TrafficError::NoDraft)?;
        let timestamp = current_timestamp();
        let committed = {
            let mut guard = lock_state(&self.state);
            commit_edit(&mut guard.intersections, draft.intersection().clone(), timestamp)?;
            guard
                .intersections
                .iter()
                .find(|i| i.id == draft.id())
                .cloned()
                .ok_or_else(|| TrafficError::intersection_not_found(draft.id()))?
        };
        self.draft = None;

        if let Some(path) = &self.adjustment_log {
            let record = PhaseAdjustment::from_intersection(&committed, timestamp);
            if let Err(e) = log_phase_adjustment(path, &record) {
                warn!("Could not record phase adjustment in {:?}: {}", path, e);
            }
        }
        Ok(committed)
    }

    /// Stops any running refresh task and, when enabled, starts a new one.
    /// Must be called from within a tokio runtime.
    pub fn set_auto_refresh(&mut self, enabled: bool) {
        if let Some(task) = self.refresh.take() {
            task.cancel();
        }
        if enabled {
            self.refresh = Some(RefreshTask::spawn(
                Arc::clone(&self.source),
                Arc::clone(&self.state),
                self.refresh_interval,
            ));
        }
    }

    pub fn is_auto_refreshing(&self) -> bool {
        self.refresh.as_ref().is_some_and(RefreshTask::is_running)
    }

    pub fn shutdown(&mut self) {
        if self.refresh.is_some() {
            info!("Closing traffic lights session");
        }
        self.set_auto_refresh(false);
        self.draft = None;
    }
}

impl Drop for TrafficLightsSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
