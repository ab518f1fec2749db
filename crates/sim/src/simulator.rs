//! The simulator trait: every primitive the environments consume.
//!
//! The physics engine is an external collaborator. Environments talk to this
//! trait and nothing else, so swapping the engine (or substituting the
//! kinematic test double) never touches environment code.

use glam::Vec3;
use image::RgbaImage;

use crate::camera::Camera;
use crate::types::{
    BodyId, Color, GripperCommand, ObjectShape, Pose, SimSnapshot,
};
use crate::SimError;

/// Stepping parameters applied to the live session.
#[derive(Clone, Copy, Debug)]
pub struct SimConfig {
    /// Physics timestep in seconds.
    pub timestep: f32,
    /// Constraint solver iterations per step.
    pub solver_iterations: u32,
    pub gravity: Vec3,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            timestep: 1.0 / 120.0,
            solver_iterations: 150,
            gravity: Vec3::new(0.0, 0.0, -9.81),
        }
    }
}

/// Parameters of the end-effector rig spawned by [`Simulator::spawn_gripper`].
#[derive(Clone, Copy, Debug)]
pub struct GripperSpec {
    pub pose: Pose,
    /// Maximum end-effector travel per solver step.
    pub max_travel: f32,
    /// Objects within this distance of the end effector attach on close.
    pub grasp_radius: f32,
    /// Finger separation when fully open.
    pub open_width: f32,
}

impl Default for GripperSpec {
    fn default() -> Self {
        Self {
            pose: Pose::from_pos(Vec3::new(0.5, 0.0, 0.0)),
            max_travel: 0.05,
            grasp_radius: 0.1,
            open_width: 0.08,
        }
    }
}

/// Blocking, single-owner simulator session.
///
/// All calls are synchronous; faults are fatal to the caller's episode and
/// there is no retry or recovery at this layer.
pub trait Simulator {
    /// Clear the scene to empty, dropping every body and the gripper.
    fn reset_scene(&mut self);

    /// Apply stepping parameters to the live session.
    fn configure(&mut self, config: &SimConfig);

    /// Spawn a static collision body (table, tray wall).
    fn spawn_static_box(&mut self, pose: Pose, half_extents: Vec3, color: Color) -> BodyId;

    /// Spawn a dynamic task object.
    fn spawn_object(&mut self, shape: ObjectShape, pose: Pose, color: Color) -> BodyId;

    /// Spawn the end-effector rig. At most one gripper exists per scene.
    fn spawn_gripper(&mut self, spec: &GripperSpec);

    /// Advance physics by one timestep.
    fn step(&mut self) -> Result<(), SimError>;

    /// One position-control solve step: drive the end effector toward
    /// `target` (travel-clamped), set the wrist angle, apply the gripper
    /// command. The arm joint chain is the engine's concern; callers only
    /// see the end effector.
    fn position_control(
        &mut self,
        target: Vec3,
        wrist: f32,
        gripper: GripperCommand,
    ) -> Result<(), SimError>;

    fn end_effector_pose(&self) -> Result<Pose, SimError>;

    /// Current finger separation in meters.
    fn gripper_width(&self) -> Result<f32, SimError>;

    fn wrist_angle(&self) -> Result<f32, SimError>;

    fn body_pose(&self, id: BodyId) -> Result<Pose, SimError>;

    fn body_velocity(&self, id: BodyId) -> Result<Vec3, SimError>;

    /// Object currently rigidly attached to the gripper, if any.
    fn held_object(&self) -> Option<BodyId>;

    /// Capture the full dynamic state of the scene.
    fn save_state(&self) -> Result<SimSnapshot, SimError>;

    /// Restore a snapshot previously captured from this scene.
    fn restore_state(&mut self, snapshot: &SimSnapshot) -> Result<(), SimError>;

    /// Produce a schematic frame of the scene for pixel observations and
    /// video export.
    fn render(&self, camera: &Camera, width: u32, height: u32) -> RgbaImage;
}
