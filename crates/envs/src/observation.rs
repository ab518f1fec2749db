//! Observation assembly.
//!
//! State layout is fixed so drivers and scripted policies can index into
//! it: end-effector position, end-effector orientation quaternion, gripper
//! width, then one `[pos, quat]` block per task object in spawn order.

use serde::{Deserialize, Serialize};
use sim::{Pose, Simulator};

use crate::scene::LoadedScene;
use crate::EnvError;

/// Offset of the end-effector position in the state vector.
pub const EE_POS: usize = 0;
/// Offset of the end-effector orientation quaternion.
pub const EE_QUAT: usize = 3;
/// Offset of the gripper width scalar.
pub const GRIPPER_WIDTH: usize = 7;
/// Offset of the first object block.
pub const OBJECTS_START: usize = 8;
/// Length of one object block (position + quaternion).
pub const OBJECT_STRIDE: usize = 7;

/// One environment observation.
///
/// `state` is always populated; `image` carries the flattened RGB frame
/// normalized to `[0, 1]` in the pixel modes.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Observation {
    pub state: Vec<f32>,
    pub image: Option<Vec<f32>>,
}

impl Observation {
    /// End-effector position slice of the state vector.
    #[must_use]
    pub fn ee_pos(&self) -> &[f32] {
        &self.state[EE_POS..EE_POS + 3]
    }

    /// Position slice of object `index`, if present.
    #[must_use]
    pub fn object_pos(&self, index: usize) -> Option<&[f32]> {
        let start = OBJECTS_START + index * OBJECT_STRIDE;
        self.state.get(start..start + 3)
    }
}

fn push_pose(state: &mut Vec<f32>, pose: Pose) {
    state.extend_from_slice(&pose.pos.to_array());
    state.extend_from_slice(&pose.rot.to_array());
}

/// Assemble the full state vector for the loaded scene.
pub fn full_state(sim: &dyn Simulator, scene: &LoadedScene) -> Result<Vec<f32>, EnvError> {
    let mut state = Vec::with_capacity(OBJECTS_START + scene.objects.len() * OBJECT_STRIDE);
    push_pose(&mut state, sim.end_effector_pose()?);
    state.push(sim.gripper_width()?);
    for object in &scene.objects {
        push_pose(&mut state, sim.body_pose(object.id)?);
    }
    Ok(state)
}

/// Reduced state for the plain pixel mode: end-effector position and
/// gripper width only.
pub fn reduced_state(sim: &dyn Simulator) -> Result<Vec<f32>, EnvError> {
    let pose = sim.end_effector_pose()?;
    let mut state = Vec::with_capacity(4);
    state.extend_from_slice(&pose.pos.to_array());
    state.push(sim.gripper_width()?);
    Ok(state)
}

/// Flatten a rendered frame to RGB floats in `[0, 1]`.
#[must_use]
pub fn normalize_frame(frame: &image::RgbaImage) -> Vec<f32> {
    let mut out = Vec::with_capacity((frame.width() * frame.height() * 3) as usize);
    for pixel in frame.pixels() {
        out.push(f32::from(pixel[0]) / 255.0);
        out.push(f32::from(pixel[1]) / 255.0);
        out.push(f32::from(pixel[2]) / 255.0);
    }
    out
}
