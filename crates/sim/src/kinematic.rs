//! Deterministic kinematic test double.
//!
//! Same trait surface as the engine binding, no physics: objects stay
//! where they are placed, the gripper moves first-order toward its target,
//! and an attached object rigidly follows the gripper. Keeps environment
//! and collection tests independent of the engine.

use glam::{Quat, Vec3};
use image::RgbaImage;

use crate::camera::Camera;
use crate::painter::{paint, PaintBody};
use crate::simulator::{GripperSpec, SimConfig, Simulator};
use crate::types::{
    BodyId, BodyState, Color, GripperCommand, GripperState, ObjectShape, Pose, SimSnapshot,
};
use crate::SimError;

const WIDTH_RATE: f32 = 0.02;

struct MockBody {
    pose: Pose,
    linvel: Vec3,
    shape: ObjectShape,
    color: Color,
    is_static: bool,
}

struct MockGripper {
    pos: Vec3,
    wrist: f32,
    width: f32,
    target_open: bool,
    max_travel: f32,
    grasp_radius: f32,
    open_width: f32,
    attached: Option<(BodyId, Vec3)>,
}

/// Kinematic scene double (feature `mock`).
#[derive(Default)]
pub struct KinematicSim {
    bodies: Vec<MockBody>,
    gripper: Option<MockGripper>,
}

impl KinematicSim {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn gripper(&self) -> Result<&MockGripper, SimError> {
        self.gripper.as_ref().ok_or(SimError::GripperMissing)
    }

    fn body(&self, id: BodyId) -> Result<&MockBody, SimError> {
        self.bodies.get(id.index()).ok_or(SimError::UnknownBody(id))
    }
}

impl Simulator for KinematicSim {
    fn reset_scene(&mut self) {
        self.bodies.clear();
        self.gripper = None;
    }

    fn configure(&mut self, _config: &SimConfig) {}

    fn spawn_static_box(&mut self, pose: Pose, half_extents: Vec3, color: Color) -> BodyId {
        self.bodies.push(MockBody {
            pose,
            linvel: Vec3::ZERO,
            shape: ObjectShape::Cuboid { half_extents },
            color,
            is_static: true,
        });
        BodyId(self.bodies.len() as u32 - 1)
    }

    fn spawn_object(&mut self, shape: ObjectShape, pose: Pose, color: Color) -> BodyId {
        self.bodies.push(MockBody {
            pose,
            linvel: Vec3::ZERO,
            shape,
            color,
            is_static: false,
        });
        BodyId(self.bodies.len() as u32 - 1)
    }

    fn spawn_gripper(&mut self, spec: &GripperSpec) {
        self.gripper = Some(MockGripper {
            pos: spec.pose.pos,
            wrist: 0.0,
            width: spec.open_width,
            target_open: true,
            max_travel: spec.max_travel,
            grasp_radius: spec.grasp_radius,
            open_width: spec.open_width,
            attached: None,
        });
    }

    fn step(&mut self) -> Result<(), SimError> {
        let Some(gripper) = self.gripper.as_mut() else {
            return Ok(());
        };
        let target_width = if gripper.target_open {
            gripper.open_width
        } else {
            0.0
        };
        let delta = (target_width - gripper.width).clamp(-WIDTH_RATE, WIDTH_RATE);
        gripper.width += delta;

        if let Some((id, offset)) = gripper.attached {
            let pos = gripper.pos + offset;
            if let Some(body) = self.bodies.get_mut(id.index()) {
                body.pose.pos = pos;
            }
        }
        Ok(())
    }

    fn position_control(
        &mut self,
        target: Vec3,
        wrist: f32,
        gripper: GripperCommand,
    ) -> Result<(), SimError> {
        let rig = self.gripper.as_mut().ok_or(SimError::GripperMissing)?;
        let delta = target - rig.pos;
        let dist = delta.length();
        rig.pos += if dist > rig.max_travel {
            delta * (rig.max_travel / dist)
        } else {
            delta
        };
        rig.wrist = wrist;

        match gripper {
            GripperCommand::Close => {
                rig.target_open = false;
                if rig.attached.is_none() {
                    let mut nearest: Option<(usize, f32)> = None;
                    for (i, body) in self.bodies.iter().enumerate() {
                        if body.is_static {
                            continue;
                        }
                        let d = body.pose.pos.distance(rig.pos);
                        if d <= rig.grasp_radius
                            && nearest.map_or(true, |(_, best)| d < best)
                        {
                            nearest = Some((i, d));
                        }
                    }
                    if let Some((i, _)) = nearest {
                        let offset = self.bodies[i].pose.pos - rig.pos;
                        rig.attached = Some((BodyId(i as u32), offset));
                    }
                }
            }
            GripperCommand::Open => {
                rig.target_open = true;
                rig.attached = None;
            }
            GripperCommand::Hold => {}
        }
        Ok(())
    }

    fn end_effector_pose(&self) -> Result<Pose, SimError> {
        let rig = self.gripper()?;
        Ok(Pose::new(
            rig.pos,
            Quat::from_rotation_z(rig.wrist) * Quat::from_rotation_x(std::f32::consts::PI),
        ))
    }

    fn gripper_width(&self) -> Result<f32, SimError> {
        Ok(self.gripper()?.width)
    }

    fn wrist_angle(&self) -> Result<f32, SimError> {
        Ok(self.gripper()?.wrist)
    }

    fn body_pose(&self, id: BodyId) -> Result<Pose, SimError> {
        Ok(self.body(id)?.pose)
    }

    fn body_velocity(&self, id: BodyId) -> Result<Vec3, SimError> {
        Ok(self.body(id)?.linvel)
    }

    fn held_object(&self) -> Option<BodyId> {
        self.gripper
            .as_ref()
            .and_then(|g| g.attached.map(|(id, _)| id))
    }

    fn save_state(&self) -> Result<SimSnapshot, SimError> {
        let bodies = self
            .bodies
            .iter()
            .enumerate()
            .map(|(i, body)| BodyState {
                id: BodyId(i as u32),
                pose: body.pose,
                linvel: body.linvel,
                angvel: Vec3::ZERO,
            })
            .collect();
        let gripper = self.gripper.as_ref().map(|rig| GripperState {
            pose: Pose::from_pos(rig.pos),
            wrist: rig.wrist,
            width: rig.width,
            attached: rig.attached.map(|(id, _)| id),
        });
        Ok(SimSnapshot { bodies, gripper })
    }

    fn restore_state(&mut self, snapshot: &SimSnapshot) -> Result<(), SimError> {
        if snapshot.bodies.len() != self.bodies.len() {
            return Err(SimError::SnapshotMismatch(format!(
                "snapshot has {} bodies, scene has {}",
                snapshot.bodies.len(),
                self.bodies.len()
            )));
        }
        for state in &snapshot.bodies {
            let body = self
                .bodies
                .get_mut(state.id.index())
                .ok_or(SimError::UnknownBody(state.id))?;
            body.pose = state.pose;
            body.linvel = state.linvel;
        }
        if let Some(state) = &snapshot.gripper {
            let rig = self.gripper.as_mut().ok_or(SimError::GripperMissing)?;
            rig.pos = state.pose.pos;
            rig.wrist = state.wrist;
            rig.width = state.width;
            rig.attached = state.attached.map(|id| {
                let offset = self.bodies[id.index()].pose.pos - rig.pos;
                (id, offset)
            });
            rig.target_open = state.attached.is_none();
        }
        Ok(())
    }

    fn render(&self, camera: &Camera, width: u32, height: u32) -> RgbaImage {
        let mut paint_bodies: Vec<PaintBody> = self
            .bodies
            .iter()
            .map(|body| PaintBody {
                pose: body.pose,
                shape: body.shape,
                color: body.color,
                is_static: body.is_static,
            })
            .collect();
        if let Ok(pose) = self.end_effector_pose() {
            paint_bodies.push(PaintBody {
                pose,
                shape: ObjectShape::Ball { radius: 0.03 },
                color: [40, 40, 40, 255],
                is_static: false,
            });
        }
        paint(&paint_bodies, camera, width, height)
    }
}
