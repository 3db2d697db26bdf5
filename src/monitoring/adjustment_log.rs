use serde::Serialize;
use std::fs::OpenOptions;
use std::path::Path;

use crate::error::Result;
use crate::shared_data::PhaseAdjustment;

// Appends one record, writing the header row only when the file is new.
fn log_to_csv<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    let file_exists = path.exists();
    let file = OpenOptions::new().append(true).create(true).open(path)?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);
    wtr.serialize(record)?;
    wtr.flush()?;
    Ok(())
}

pub fn log_phase_adjustment(path: &Path, record: &PhaseAdjustment) -> Result<()> {
    log_to_csv(path, record)
}

pub fn read_phase_adjustments(path: &Path) -> Result<Vec<PhaseAdjustment>> {
    let mut rdr = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for result in rdr.deserialize() {
        records.push(result?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::intersection::IntersectionStatus;
    use tempfile::tempdir;

    fn adjustment(id: &str, cycle_time: u64) -> PhaseAdjustment {
        PhaseAdjustment {
            timestamp: 1_700_000_000,
            intersection_id: id.to_string(),
            status: IntersectionStatus::Active,
            cycle_time,
            active_phase: Some("p1".to_string()),
            phase_durations: "p1=45;p2=40".to_string(),
        }
    }

    #[test]
    fn appends_rows_under_a_single_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("phase_adjustments.csv");

        log_phase_adjustment(&path, &adjustment("int-001", 85)).unwrap();
        log_phase_adjustment(&path, &adjustment("int-002", 90)).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.matches("intersection_id").count(), 1);

        let records = read_phase_adjustments(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].intersection_id, "int-002");
        assert_eq!(records[1].cycle_time, 90);
    }
}
