pub mod config;
pub mod control_system;
pub mod dashboard;
pub mod data_access;
pub mod error;
pub mod global_variables;
pub mod models;
pub mod monitoring;
pub mod shared_data;

pub use error::{Result, TrafficError};
