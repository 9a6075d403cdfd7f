mod raycast;

pub use raycast::{
    HIT_EPSILON, MARCH_STEP, RaycastConfig, Raycaster, brightness, wall_height,
};
