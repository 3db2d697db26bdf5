pub mod intersection_editor;
pub mod phase_model;
pub mod signal_optimizer;
