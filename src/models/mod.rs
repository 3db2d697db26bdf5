pub mod camera;
pub mod intersection;
pub mod violation;
