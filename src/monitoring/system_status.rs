use crate::models::camera::CameraFeed;
use crate::models::violation::Violation;
use crate::shared_data::{SystemHealth, SystemStatus};

const SECS_PER_DAY: u64 = 86_400;

/// All cameras online is operational, none online is offline. A site with no
/// cameras registered has nothing failing and reads as operational.
pub fn system_health(cameras: &[CameraFeed]) -> SystemHealth {
    let online = cameras.iter().filter(|c| c.is_online()).count();
    if online == cameras.len() {
        SystemHealth::Operational
    } else if online == 0 {
        SystemHealth::Offline
    } else {
        SystemHealth::Degraded
    }
}

pub fn build_system_status(
    cameras: &[CameraFeed],
    violations: &[Violation],
    started_at: u64,
    now: u64,
) -> SystemStatus {
    let today = now / SECS_PER_DAY;
    let violations_today = violations
        .iter()
        .filter(|v| v.timestamp / SECS_PER_DAY == today)
        .count();

    SystemStatus {
        status: system_health(cameras),
        cameras: cameras.to_vec(),
        cameras_online: cameras.iter().filter(|c| c.is_online()).count(),
        violations_today,
        uptime_secs: now.saturating_sub(started_at),
        last_updated: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::camera::CameraStatus;
    use crate::models::violation::{ViolationStatus, ViolationType};

    fn camera(id: &str, status: CameraStatus) -> CameraFeed {
        CameraFeed {
            id: id.to_string(),
            name: id.to_string(),
            location: "MG Road & Brigade Road".to_string(),
            status,
            last_active: None,
            stream_url: None,
        }
    }

    fn violation_at(ts: u64) -> Violation {
        Violation {
            id: format!("v{}", ts),
            violation_type: ViolationType::RedLight,
            license_plate: None,
            location: "MG Road & Brigade Road".to_string(),
            camera_id: "cam-001".to_string(),
            timestamp: ts,
            confidence: 0.9,
            status: ViolationStatus::Pending,
        }
    }

    #[test]
    fn health_follows_online_cameras() {
        let online = camera("cam-001", CameraStatus::Online);
        let offline = camera("cam-002", CameraStatus::Offline);
        let broken = camera("cam-003", CameraStatus::Error);

        assert_eq!(system_health(&[online.clone()]), SystemHealth::Operational);
        assert_eq!(system_health(&[online, offline.clone()]), SystemHealth::Degraded);
        assert_eq!(system_health(&[offline, broken]), SystemHealth::Offline);
        assert_eq!(system_health(&[]), SystemHealth::Operational);
    }

    #[test]
    fn violations_today_uses_the_utc_day() {
        // 10:00 UTC on day 20_000
        let now = 20_000 * SECS_PER_DAY + 36_000;
        let violations = vec![
            violation_at(20_000 * SECS_PER_DAY),
            violation_at(now - 60),
            // 23:59:59 the day before
            violation_at(20_000 * SECS_PER_DAY - 1),
        ];
        let cameras = vec![camera("cam-001", CameraStatus::Online)];

        let status = build_system_status(&cameras, &violations, now - 7_200, now);
        assert_eq!(status.violations_today, 2);
        assert_eq!(status.uptime_secs, 7_200);
        assert_eq!(status.cameras_online, 1);
        assert_eq!(status.last_updated, now);
    }
}
