//! Task-specific environments.
//!
//! Each task wraps [`TabletopEnv`](crate::base::TabletopEnv) and supplies
//! its own scene content, action decoding, reward, and termination.

mod grasp_auto;
mod grasp_explicit;
mod lift;
mod reach;

pub use grasp_auto::GraspAutoEnv;
pub use grasp_explicit::GraspExplicitEnv;
pub use lift::LiftEnv;
pub use reach::ReachEnv;

use glam::Vec3;
use sim::Pose;

/// Shared grasp scoring: success when any object sits above
/// `success_height` with its center within `proximity` of the end
/// effector, otherwise failure.
#[must_use]
pub fn grasp_reward(
    ee_pos: Vec3,
    objects: &[Pose],
    success_height: f32,
    proximity: f32,
    fail: f32,
    success: f32,
) -> f32 {
    for object in objects {
        if object.pos.z > success_height && object.pos.distance(ee_pos) < proximity {
            return success;
        }
    }
    fail
}
