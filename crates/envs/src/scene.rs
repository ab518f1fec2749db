//! Scene population: robot variant, support surfaces, and object placement.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sim::{BodyId, GripperSpec, ObjectShape, Pose, SimConfig, Simulator};

use crate::config::EnvConfig;
use crate::EnvError;

/// Which end-effector rig to spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RobotVariant {
    Standard,
    /// Wider finger span; larger grasp radius and open width.
    WideGripper,
}

/// One object to place.
#[derive(Clone, Debug)]
pub struct ObjectSpec {
    pub name: String,
    pub shape: ObjectShape,
    pub color: [u8; 4],
}

impl ObjectSpec {
    #[must_use]
    pub fn cube(name: &str, half: f32, color: [u8; 4]) -> Self {
        Self {
            name: name.to_owned(),
            shape: ObjectShape::Cuboid {
                half_extents: Vec3::splat(half),
            },
            color,
        }
    }
}

/// Declarative scene description consumed by `load`.
#[derive(Clone, Debug)]
pub struct SceneSpec {
    pub robot: RobotVariant,
    /// Placement volume for sampled objects.
    pub placement_low: Vec3,
    pub placement_high: Vec3,
    /// Minimum pairwise distance between sampled placements.
    pub min_spacing: f32,
    /// Bound on rejection-sampling attempts before giving up.
    pub max_placement_attempts: u32,
    pub objects: Vec<ObjectSpec>,
    /// Spawn the tray under the placement volume.
    pub tray: bool,
}

impl Default for SceneSpec {
    fn default() -> Self {
        Self {
            robot: RobotVariant::Standard,
            placement_low: Vec3::new(0.78, -0.125, -0.2),
            placement_high: Vec3::new(0.82, 0.075, -0.2),
            min_spacing: 0.12,
            max_placement_attempts: 1000,
            objects: Vec::new(),
            tray: false,
        }
    }
}

/// A placed object: spec name plus the body id assigned at load.
#[derive(Clone, Debug)]
pub struct PlacedObject {
    pub name: String,
    pub id: BodyId,
}

/// Body-id mapping produced by scene load. Fixed until the next reset.
#[derive(Clone, Debug, Default)]
pub struct LoadedScene {
    pub objects: Vec<PlacedObject>,
    /// Top surface height of the table.
    pub table_top: f32,
}

/// Sample non-overlapping positions in the placement volume.
///
/// Uniform rejection sampling with a bounded attempt budget, so an
/// infeasible spacing fails instead of retrying forever.
pub fn sample_positions(
    rng: &mut SmallRng,
    spec: &SceneSpec,
    count: usize,
) -> Result<Vec<Vec3>, EnvError> {
    let mut positions: Vec<Vec3> = Vec::with_capacity(count);
    let mut attempts = 0;
    while positions.len() < count {
        if attempts >= spec.max_placement_attempts {
            return Err(EnvError::PlacementInfeasible {
                placed: positions.len(),
                requested: count,
                attempts,
            });
        }
        attempts += 1;
        let candidate = Vec3::new(
            rng.random_range(spec.placement_low.x..=spec.placement_high.x),
            rng.random_range(spec.placement_low.y..=spec.placement_high.y),
            rng.random_range(spec.placement_low.z..=spec.placement_high.z),
        );
        let clear = positions
            .iter()
            .all(|p| p.distance(candidate) >= spec.min_spacing);
        if clear {
            positions.push(candidate);
        }
    }
    Ok(positions)
}

/// Populate the simulator scene and return the body-id mapping.
///
/// Spawns the table (and tray walls when requested), samples object
/// placements, drops the objects, and spawns the gripper at the configured
/// initial pose.
pub fn load(
    sim: &mut dyn Simulator,
    config: &EnvConfig,
    spec: &SceneSpec,
    rng: &mut SmallRng,
) -> Result<LoadedScene, EnvError> {
    sim.reset_scene();
    sim.configure(&SimConfig {
        timestep: config.timestep,
        solver_iterations: config.solver_iterations,
        gravity: Vec3::new(0.0, 0.0, -9.81),
    });

    // Table under the whole workspace, top flush with the placement floor.
    let table_top = spec.placement_low.z - 0.02;
    let center = (config.pos_low() + config.pos_high()) * 0.5;
    sim.spawn_static_box(
        Pose::from_pos(Vec3::new(center.x, center.y, table_top - 0.05)),
        Vec3::new(0.6, 0.8, 0.05),
        [140, 110, 80, 255],
    );

    if spec.tray {
        let tray_center = (spec.placement_low + spec.placement_high) * 0.5;
        let tray_half = ((spec.placement_high - spec.placement_low) * 0.5)
            .max(Vec3::splat(0.06))
            + Vec3::new(0.04, 0.04, 0.0);
        for side in 0..4 {
            let along_x = side < 2;
            let sign = if side % 2 == 0 { 1.0 } else { -1.0 };
            let (offset, wall_half) = if along_x {
                (
                    Vec3::new(sign * tray_half.x, 0.0, 0.02),
                    Vec3::new(0.01, tray_half.y, 0.03),
                )
            } else {
                (
                    Vec3::new(0.0, sign * tray_half.y, 0.02),
                    Vec3::new(tray_half.x, 0.01, 0.03),
                )
            };
            sim.spawn_static_box(
                Pose::from_pos(tray_center + offset),
                wall_half,
                [90, 90, 95, 255],
            );
        }
    }

    let positions = sample_positions(rng, spec, spec.objects.len())?;
    let mut objects = Vec::with_capacity(spec.objects.len());
    for (object, pos) in spec.objects.iter().zip(positions) {
        let id = sim.spawn_object(object.shape, Pose::from_pos(pos), object.color);
        objects.push(PlacedObject {
            name: object.name.clone(),
            id,
        });
    }

    let (grasp_radius, open_width) = match spec.robot {
        RobotVariant::Standard => (0.1, 0.08),
        RobotVariant::WideGripper => (0.14, 0.12),
    };
    sim.spawn_gripper(&GripperSpec {
        pose: Pose::from_pos(config.pos_init()),
        max_travel: config.max_step_travel,
        grasp_radius,
        open_width,
    });

    tracing::debug!(
        objects = objects.len(),
        table_top,
        "scene loaded"
    );
    Ok(LoadedScene { objects, table_top })
}
