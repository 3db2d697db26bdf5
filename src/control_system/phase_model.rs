use log::debug;
use std::collections::HashSet;

use crate::error::{Result, TrafficError};
use crate::global_variables::MAX_STORED_PHASE_DURATION;
use crate::models::intersection::{Intersection, IntersectionStatus, Phase, PhaseColor, PhaseField};

/// Returns the first phase flagged active, falling back to the first phase in
/// cycle order. `None` only when there are no phases at all.
pub fn derive_active_phase(phases: &[Phase]) -> Option<&Phase> {
    phases.iter().find(|p| p.active).or_else(|| phases.first())
}

/// Round-robin successor of the active phase. Without an active phase the
/// lookup behaves as if the active index were -1, so the first phase is next.
pub fn derive_next_phase(phases: &[Phase]) -> Option<&Phase> {
    if phases.is_empty() {
        return None;
    }
    let next_index = match phases.iter().position(|p| p.active) {
        Some(index) => (index + 1) % phases.len(),
        None => 0,
    };
    phases.get(next_index)
}

/// Summed in `u64` so no combination of `u32` durations can overflow.
pub fn total_cycle_time(phases: &[Phase]) -> u64 {
    phases.iter().map(|p| u64::from(p.duration)).sum()
}

/// Checks the data-model rules an intersection read from outside must meet:
/// at least one phase, unique phase ids, durations within
/// `1..=MAX_STORED_PHASE_DURATION` and at most one active phase.
pub fn validate_intersection(intersection: &Intersection) -> Result<()> {
    let invalid = |reason: String| TrafficError::InvalidIntersection {
        id: intersection.id.clone(),
        reason,
    };
    if intersection.phases.is_empty() {
        return Err(invalid("no phases".to_string()));
    }
    let mut seen = HashSet::new();
    for phase in &intersection.phases {
        if !seen.insert(phase.id.as_str()) {
            return Err(invalid(format!("duplicate phase id '{}'", phase.id)));
        }
        if phase.duration == 0 || phase.duration > MAX_STORED_PHASE_DURATION {
            return Err(invalid(format!(
                "phase '{}' duration {}s outside 1..={}s",
                phase.id, phase.duration, MAX_STORED_PHASE_DURATION
            )));
        }
    }
    let active = intersection.phases.iter().filter(|p| p.active).count();
    if active > 1 {
        return Err(invalid(format!("{} phases flagged active", active)));
    }
    Ok(())
}

pub fn phase_color(status: IntersectionStatus, active: bool) -> PhaseColor {
    match status {
        IntersectionStatus::Active if active => PhaseColor::Green,
        IntersectionStatus::Active => PhaseColor::Red,
        IntersectionStatus::Inactive | IntersectionStatus::Maintenance => PhaseColor::Yellow,
    }
}

/// Re-derives every phase colour from the status and each phase's active flag.
pub fn recolor_phases(status: IntersectionStatus, phases: &mut [Phase]) {
    for phase in phases.iter_mut() {
        phase.color = phase_color(status, phase.active);
    }
}

/// Replaces one field of one phase; other phases are left as they are, except
/// that activating a phase deactivates all the others.
pub fn set_phase_field(
    intersection: &mut Intersection,
    phase_id: &str,
    field: PhaseField,
) -> Result<()> {
    let index = intersection
        .phases
        .iter()
        .position(|p| p.id == phase_id)
        .ok_or_else(|| TrafficError::phase_not_found(phase_id))?;

    match field {
        PhaseField::Name(name) => {
            intersection.phases[index].name = name;
        }
        PhaseField::Duration(duration) => {
            if duration == 0 {
                return Err(TrafficError::InvalidDuration {
                    duration,
                    min: 1,
                    max: u32::MAX,
                });
            }
            debug!(
                "Phase {} at {}: duration {} -> {}s",
                phase_id, intersection.id, intersection.phases[index].duration, duration
            );
            intersection.phases[index].duration = duration;
        }
        PhaseField::Active(true) => {
            for (i, phase) in intersection.phases.iter_mut().enumerate() {
                phase.active = i == index;
            }
            recolor_phases(intersection.status, &mut intersection.phases);
        }
        PhaseField::Active(false) => {
            intersection.phases[index].active = false;
            recolor_phases(intersection.status, &mut intersection.phases);
        }
    }
    Ok(())
}

pub fn set_status(intersection: &mut Intersection, status: IntersectionStatus) {
    if intersection.status != status {
        debug!(
            "Intersection {}: status {} -> {}",
            intersection.id, intersection.status, status
        );
    }
    intersection.status = status;
    recolor_phases(status, &mut intersection.phases);
}
