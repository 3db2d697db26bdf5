use log::info;

use crate::control_system::phase_model;
use crate::error::{Result, TrafficError};
use crate::global_variables::{MAX_PHASE_DURATION, MIN_PHASE_DURATION};
use crate::models::intersection::{Intersection, IntersectionStatus, Phase, PhaseField};

/// Inclusive duration range accepted when editing a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseBounds {
    pub min: u32,
    pub max: u32,
}

impl PhaseBounds {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn check(&self, duration: u32) -> Result<()> {
        if duration < self.min || duration > self.max {
            return Err(TrafficError::InvalidDuration {
                duration,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

impl Default for PhaseBounds {
    fn default() -> Self {
        Self::new(MIN_PHASE_DURATION, MAX_PHASE_DURATION)
    }
}

/// An uncommitted copy of one intersection, held by the edit dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionDraft {
    intersection: Intersection,
    bounds: PhaseBounds,
}

impl IntersectionDraft {
    pub fn new(intersection: Intersection, bounds: PhaseBounds) -> Self {
        Self {
            intersection,
            bounds,
        }
    }

    pub fn intersection(&self) -> &Intersection {
        &self.intersection
    }

    pub fn id(&self) -> &str {
        &self.intersection.id
    }

    pub fn set_phase_field(&mut self, phase_id: &str, field: PhaseField) -> Result<()> {
        if let PhaseField::Duration(duration) = field {
            self.bounds.check(duration)?;
        }
        phase_model::set_phase_field(&mut self.intersection, phase_id, field)
    }

    pub fn set_status(&mut self, status: IntersectionStatus) {
        phase_model::set_status(&mut self.intersection, status);
    }

    pub fn activate_phase(&mut self, phase_id: &str) -> Result<()> {
        self.set_phase_field(phase_id, PhaseField::Active(true))
    }

    pub fn active_phase(&self) -> Option<&Phase> {
        self.intersection.active_phase()
    }

    pub fn next_phase(&self) -> Option<&Phase> {
        self.intersection.next_phase()
    }

    pub fn cycle_time(&self) -> u64 {
        self.intersection.cycle_time()
    }

    pub fn into_intersection(self) -> Intersection {
        self.intersection
    }
}

/// Replaces the entry with the draft's id, leaving every other entry untouched
/// and in its original position.
pub fn commit_edit(
    intersections: &mut [Intersection],
    mut draft: Intersection,
    timestamp: u64,
) -> Result<()> {
    let slot = intersections
        .iter_mut()
        .find(|i| i.id == draft.id)
        .ok_or_else(|| TrafficError::intersection_not_found(&draft.id))?;
    draft.last_updated = timestamp;
    info!(
        "Committed intersection {}: status {}, cycle {}s",
        draft.id,
        draft.status,
        draft.cycle_time()
    );
    *slot = draft;
    Ok(())
}

/// Case-insensitive substring match on name or id, with the search taken as
/// given (surrounding whitespace is part of it). An empty search keeps all.
pub fn filter_intersections<'a>(intersections: &'a [Intersection], search: &str) -> Vec<&'a Intersection> {
    let needle = search.to_lowercase();
    intersections
        .iter()
        .filter(|i| {
            needle.is_empty()
                || i.name.to_lowercase().contains(&needle)
                || i.id.to_lowercase().contains(&needle)
        })
        .collect()
}
