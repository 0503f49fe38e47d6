//! Airflow visualization: a vehicle in a tunnel of drifting particles.

mod scene;
mod viewer;

pub use scene::{
    render_offline, Aabb, Camera, CarPart, FieldConfig, Light, Particle, Scene, SceneError,
    SceneSnapshot, Vec3, MAX_PARTICLES, MAX_SNAPSHOT_FRAMES,
};
pub use viewer::{Viewer, ViewerError, ViewerState, DEFAULT_FRAME_INTERVAL};
