pub mod cli;
pub mod refresh;
pub mod session;

pub use session::{TrafficLightsSession, TrafficLightsState};
