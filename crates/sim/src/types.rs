//! Shared body and state types exchanged across the simulator boundary.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Handle for a body spawned into the scene.
///
/// Ids are dense indices assigned in spawn order and stay valid until the
/// next [`reset_scene`](crate::Simulator::reset_scene).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl BodyId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Position and orientation of a body.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub pos: Vec3,
    pub rot: Quat,
}

impl Pose {
    #[must_use]
    pub fn new(pos: Vec3, rot: Quat) -> Self {
        Self { pos, rot }
    }

    #[must_use]
    pub fn from_pos(pos: Vec3) -> Self {
        Self {
            pos,
            rot: Quat::IDENTITY,
        }
    }
}

/// Collision shape of a spawned body.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ObjectShape {
    Cuboid { half_extents: Vec3 },
    Ball { radius: f32 },
    Cylinder { half_height: f32, radius: f32 },
}

impl ObjectShape {
    /// Conservative bounding radius, used for schematic frame painting.
    #[must_use]
    pub fn bounding_radius(&self) -> f32 {
        match *self {
            ObjectShape::Cuboid { half_extents } => half_extents.length(),
            ObjectShape::Ball { radius } => radius,
            ObjectShape::Cylinder {
                half_height,
                radius,
            } => (half_height * half_height + radius * radius).sqrt(),
        }
    }
}

/// RGBA body color, used only for rendered frames.
pub type Color = [u8; 4];

/// Gripper drive command decoded from the action's gripper dimension.
///
/// Positive commands close, negative commands open, values near zero hold
/// the current target.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum GripperCommand {
    Open,
    Close,
    Hold,
}

impl GripperCommand {
    /// Decode a scalar command. The dead zone keeps noisy near-zero
    /// commands from toggling the fingers.
    #[must_use]
    pub fn from_scalar(value: f32) -> Self {
        if value > 0.1 {
            GripperCommand::Close
        } else if value < -0.1 {
            GripperCommand::Open
        } else {
            GripperCommand::Hold
        }
    }
}

/// Dynamic state of one body, captured in snapshots.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct BodyState {
    pub id: BodyId,
    pub pose: Pose,
    pub linvel: Vec3,
    pub angvel: Vec3,
}

/// Gripper state captured in snapshots.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct GripperState {
    pub pose: Pose,
    pub wrist: f32,
    pub width: f32,
    pub attached: Option<BodyId>,
}

/// Full dynamic-state snapshot of a scene.
///
/// Restoring a snapshot onto the scene it was taken from reproduces body
/// poses, velocities, and the gripper attachment. Snapshots do not carry
/// scene topology; restoring onto a differently loaded scene is an error.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub bodies: Vec<BodyState>,
    pub gripper: Option<GripperState>,
}
