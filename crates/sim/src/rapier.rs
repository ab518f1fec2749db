//! Production binding over the `rapier3d` rigid-body engine.
//!
//! Owns one engine session: pipeline, island manager, broad/narrow phase,
//! and the body/collider/joint sets. The end effector is a kinematic
//! position-based body; `position_control` advances it toward the target
//! with a per-step travel clamp, and grasping inserts or removes a fixed
//! impulse joint between the gripper and the held object.

use glam::{Quat, Vec3};
use image::RgbaImage;
use rapier3d::na::{Isometry3, Translation3, UnitQuaternion, Vector3};
use rapier3d::prelude::*;

use crate::camera::Camera;
use crate::painter::{paint, PaintBody};
use crate::simulator::{GripperSpec, SimConfig, Simulator};
use crate::types::{
    BodyId, BodyState, Color, GripperCommand, GripperState, ObjectShape, Pose, SimSnapshot,
};
use crate::SimError;

const WIDTH_RATE: f32 = 0.02;
const OBJECT_DENSITY: f32 = 400.0;
const OBJECT_FRICTION: f32 = 0.8;

struct TrackedBody {
    handle: RigidBodyHandle,
    shape: ObjectShape,
    color: Color,
    is_static: bool,
}

struct GripperRig {
    handle: RigidBodyHandle,
    max_travel: f32,
    grasp_radius: f32,
    open_width: f32,
    width: f32,
    target_open: bool,
    wrist: f32,
    command: GripperCommand,
    attached: Option<(BodyId, ImpulseJointHandle)>,
}

/// Live `rapier3d` session (feature `rapier`).
pub struct RapierSim {
    pipeline: PhysicsPipeline,
    gravity: Vector3<f32>,
    integration_parameters: IntegrationParameters,
    islands: IslandManager,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    tracked: Vec<TrackedBody>,
    gripper: Option<GripperRig>,
}

impl RapierSim {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pipeline: PhysicsPipeline::new(),
            gravity: Vector3::new(0.0, 0.0, -9.81),
            integration_parameters: IntegrationParameters::default(),
            islands: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            tracked: Vec::new(),
            gripper: None,
        }
    }

    fn tracked_body(&self, id: BodyId) -> Result<&TrackedBody, SimError> {
        self.tracked.get(id.index()).ok_or(SimError::UnknownBody(id))
    }

    fn rigid_body(&self, id: BodyId) -> Result<&RigidBody, SimError> {
        let tracked = self.tracked_body(id)?;
        self.bodies
            .get(tracked.handle)
            .ok_or(SimError::UnknownBody(id))
    }

    fn gripper_rig(&self) -> Result<&GripperRig, SimError> {
        self.gripper.as_ref().ok_or(SimError::GripperMissing)
    }

    fn gripper_orientation(wrist: f32) -> Quat {
        Quat::from_rotation_z(wrist) * Quat::from_rotation_x(std::f32::consts::PI)
    }

    fn attach_nearest(&mut self) {
        let (gripper_handle, grasp_radius) = match self.gripper.as_ref() {
            Some(rig) if rig.attached.is_none() => (rig.handle, rig.grasp_radius),
            _ => return,
        };
        let Some(gripper_body) = self.bodies.get(gripper_handle) else {
            return;
        };
        let gripper_pos = to_vec3(gripper_body.translation());

        let mut nearest: Option<(usize, f32)> = None;
        for (i, tracked) in self.tracked.iter().enumerate() {
            if tracked.is_static {
                continue;
            }
            let Some(body) = self.bodies.get(tracked.handle) else {
                continue;
            };
            let dist = to_vec3(body.translation()).distance(gripper_pos);
            if dist <= grasp_radius && nearest.map_or(true, |(_, best)| dist < best) {
                nearest = Some((i, dist));
            }
        }
        if let Some((index, _)) = nearest {
            self.attach_object(BodyId(index as u32));
        }
    }

    /// Insert the fixed attachment joint between the gripper and `id`,
    /// preserving their current relative pose.
    fn attach_object(&mut self, id: BodyId) {
        let Some(rig) = self.gripper.as_ref() else {
            return;
        };
        let gripper_handle = rig.handle;
        let Some(tracked) = self.tracked.get(id.index()) else {
            return;
        };
        let object_handle = tracked.handle;
        let (Some(gripper_body), Some(object_body)) =
            (self.bodies.get(gripper_handle), self.bodies.get(object_handle))
        else {
            return;
        };
        let relative = gripper_body.position().inv_mul(object_body.position());
        let joint = FixedJointBuilder::new()
            .local_frame1(relative)
            .local_frame2(Isometry3::identity())
            .build();
        let joint_handle = self
            .impulse_joints
            .insert(gripper_handle, object_handle, joint, true);
        if let Some(rig) = self.gripper.as_mut() {
            rig.attached = Some((id, joint_handle));
        }
        tracing::debug!(object = id.index(), "gripper attached object");
    }

    fn detach(&mut self) {
        if let Some(rig) = self.gripper.as_mut() {
            if let Some((id, joint)) = rig.attached.take() {
                self.impulse_joints.remove(joint, true);
                tracing::debug!(object = id.index(), "gripper released object");
            }
        }
    }
}

impl Default for RapierSim {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulator for RapierSim {
    fn reset_scene(&mut self) {
        self.islands = IslandManager::new();
        self.broad_phase = BroadPhaseBvh::new();
        self.narrow_phase = NarrowPhase::new();
        self.bodies = RigidBodySet::new();
        self.colliders = ColliderSet::new();
        self.impulse_joints = ImpulseJointSet::new();
        self.multibody_joints = MultibodyJointSet::new();
        self.ccd_solver = CCDSolver::new();
        self.tracked.clear();
        self.gripper = None;
    }

    fn configure(&mut self, config: &SimConfig) {
        self.integration_parameters.dt = config.timestep;
        self.integration_parameters.num_solver_iterations =
            std::num::NonZeroUsize::new(config.solver_iterations.max(1) as usize).unwrap();
        self.gravity = Vector3::new(config.gravity.x, config.gravity.y, config.gravity.z);
    }

    fn spawn_static_box(&mut self, pose: Pose, half_extents: Vec3, color: Color) -> BodyId {
        let handle = self
            .bodies
            .insert(RigidBodyBuilder::fixed().position(to_isometry(pose)).build());
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .friction(OBJECT_FRICTION)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        self.tracked.push(TrackedBody {
            handle,
            shape: ObjectShape::Cuboid { half_extents },
            color,
            is_static: true,
        });
        BodyId(self.tracked.len() as u32 - 1)
    }

    fn spawn_object(&mut self, shape: ObjectShape, pose: Pose, color: Color) -> BodyId {
        let handle = self.bodies.insert(
            RigidBodyBuilder::dynamic()
                .position(to_isometry(pose))
                .linear_damping(0.2)
                .angular_damping(0.4)
                .build(),
        );
        let builder = match shape {
            ObjectShape::Cuboid { half_extents } => {
                ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
            ObjectShape::Ball { radius } => ColliderBuilder::ball(radius),
            ObjectShape::Cylinder {
                half_height,
                radius,
            } => ColliderBuilder::cylinder(half_height, radius),
        };
        let collider = builder
            .density(OBJECT_DENSITY)
            .friction(OBJECT_FRICTION)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        self.tracked.push(TrackedBody {
            handle,
            shape,
            color,
            is_static: false,
        });
        BodyId(self.tracked.len() as u32 - 1)
    }

    fn spawn_gripper(&mut self, spec: &GripperSpec) {
        let handle = self.bodies.insert(
            RigidBodyBuilder::kinematic_position_based()
                .position(to_isometry(Pose::new(
                    spec.pose.pos,
                    Self::gripper_orientation(0.0),
                )))
                .build(),
        );
        // Sensor collider: the rig tracks proximity but never bulldozes
        // objects; contact-level finger dynamics are the arm backend's job.
        let collider = ColliderBuilder::ball(0.03).sensor(true).build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        self.gripper = Some(GripperRig {
            handle,
            max_travel: spec.max_travel,
            grasp_radius: spec.grasp_radius,
            open_width: spec.open_width,
            width: spec.open_width,
            target_open: true,
            wrist: 0.0,
            command: GripperCommand::Hold,
            attached: None,
        });
    }

    fn step(&mut self) -> Result<(), SimError> {
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &(),
        );

        let mut want_attach = false;
        if let Some(rig) = self.gripper.as_mut() {
            let target_width = if rig.target_open { rig.open_width } else { 0.0 };
            rig.width += (target_width - rig.width).clamp(-WIDTH_RATE, WIDTH_RATE);
            want_attach = matches!(rig.command, GripperCommand::Close) && rig.attached.is_none();
        }
        if want_attach {
            self.attach_nearest();
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
        let body = self
            .bodies
            .get_mut(rig.handle)
            .ok_or(SimError::GripperMissing)?;
        let current = to_vec3(body.translation());
        let delta = target - current;
        let dist = delta.length();
        let next = current
            + if dist > rig.max_travel {
                delta * (rig.max_travel / dist)
            } else {
                delta
            };
        rig.wrist = wrist;
        rig.command = gripper;
        body.set_next_kinematic_position(to_isometry(Pose::new(
            next,
            Self::gripper_orientation(wrist),
        )));

        match gripper {
            GripperCommand::Close => rig.target_open = false,
            GripperCommand::Open => rig.target_open = true,
            GripperCommand::Hold => {}
        }
        if matches!(gripper, GripperCommand::Open) {
            self.detach();
        }
        Ok(())
    }

    fn end_effector_pose(&self) -> Result<Pose, SimError> {
        let rig = self.gripper_rig()?;
        let body = self.bodies.get(rig.handle).ok_or(SimError::GripperMissing)?;
        Ok(Pose::new(
            to_vec3(body.translation()),
            to_quat(body.rotation()),
        ))
    }

    fn gripper_width(&self) -> Result<f32, SimError> {
        Ok(self.gripper_rig()?.width)
    }

    fn wrist_angle(&self) -> Result<f32, SimError> {
        Ok(self.gripper_rig()?.wrist)
    }

    fn body_pose(&self, id: BodyId) -> Result<Pose, SimError> {
        let body = self.rigid_body(id)?;
        Ok(Pose::new(
            to_vec3(body.translation()),
            to_quat(body.rotation()),
        ))
    }

    fn body_velocity(&self, id: BodyId) -> Result<Vec3, SimError> {
        Ok(to_vec3(self.rigid_body(id)?.linvel()))
    }

    fn held_object(&self) -> Option<BodyId> {
        self.gripper
            .as_ref()
            .and_then(|rig| rig.attached.map(|(id, _)| id))
    }

    fn save_state(&self) -> Result<SimSnapshot, SimError> {
        let mut states = Vec::with_capacity(self.tracked.len());
        for (i, tracked) in self.tracked.iter().enumerate() {
            let body = self
                .bodies
                .get(tracked.handle)
                .ok_or(SimError::UnknownBody(BodyId(i as u32)))?;
            states.push(BodyState {
                id: BodyId(i as u32),
                pose: Pose::new(to_vec3(body.translation()), to_quat(body.rotation())),
                linvel: to_vec3(body.linvel()),
                angvel: to_vec3(body.angvel()),
            });
        }
        let gripper = match self.gripper.as_ref() {
            Some(rig) => {
                let body = self.bodies.get(rig.handle).ok_or(SimError::GripperMissing)?;
                Some(GripperState {
                    pose: Pose::new(to_vec3(body.translation()), to_quat(body.rotation())),
                    wrist: rig.wrist,
                    width: rig.width,
                    attached: rig.attached.map(|(id, _)| id),
                })
            }
            None => None,
        };
        Ok(SimSnapshot {
            bodies: states,
            gripper,
        })
    }

    fn restore_state(&mut self, snapshot: &SimSnapshot) -> Result<(), SimError> {
        if snapshot.bodies.len() != self.tracked.len() {
            return Err(SimError::SnapshotMismatch(format!(
                "snapshot has {} bodies, scene has {}",
                snapshot.bodies.len(),
                self.tracked.len()
            )));
        }
        for state in &snapshot.bodies {
            let tracked = self.tracked_body(state.id)?;
            let handle = tracked.handle;
            let body = self
                .bodies
                .get_mut(handle)
                .ok_or(SimError::UnknownBody(state.id))?;
            body.set_position(to_isometry(state.pose), true);
            body.set_linvel(to_na(state.linvel), true);
            body.set_angvel(to_na(state.angvel), true);
        }

        // Reconcile the attachment joint with the snapshot.
        let snapshot_attached = snapshot.gripper.as_ref().and_then(|g| g.attached);
        let current_attached = self.held_object();
        if current_attached != snapshot_attached {
            self.detach();
        }
        if let Some(state) = &snapshot.gripper {
            let rig = self.gripper.as_mut().ok_or(SimError::GripperMissing)?;
            rig.wrist = state.wrist;
            rig.width = state.width;
            rig.target_open = state.attached.is_none();
            let handle = rig.handle;
            let body = self
                .bodies
                .get_mut(handle)
                .ok_or(SimError::GripperMissing)?;
            body.set_position(to_isometry(state.pose), true);
            if let Some(target) = snapshot_attached {
                if self.held_object().is_none() {
                    self.attach_object(target);
                }
            }
        }
        Ok(())
    }

    fn render(&self, camera: &Camera, width: u32, height: u32) -> RgbaImage {
        let mut paint_bodies: Vec<PaintBody> = Vec::with_capacity(self.tracked.len() + 1);
        for tracked in &self.tracked {
            let Some(body) = self.bodies.get(tracked.handle) else {
                continue;
            };
            paint_bodies.push(PaintBody {
                pose: Pose::new(to_vec3(body.translation()), to_quat(body.rotation())),
                shape: tracked.shape,
                color: tracked.color,
                is_static: tracked.is_static,
            });
        }
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

fn to_isometry(pose: Pose) -> Isometry3<f32> {
    Isometry3::from_parts(
        Translation3::new(pose.pos.x, pose.pos.y, pose.pos.z),
        UnitQuaternion::from_quaternion(rapier3d::na::Quaternion::new(
            pose.rot.w, pose.rot.x, pose.rot.y, pose.rot.z,
        )),
    )
}

fn to_vec3(v: &Vector3<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn to_na(v: Vec3) -> Vector3<f32> {
    Vector3::new(v.x, v.y, v.z)
}

fn to_quat(q: &UnitQuaternion<f32>) -> Quat {
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}
