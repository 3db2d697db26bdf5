pub mod adjustment_log;
pub mod system_status;
pub mod traffic_summary;
pub mod violations;
