//! Multi-object lift scene: a bowl and a handful of colored cubes.

use glam::Vec3;
use image::RgbaImage;
use sim::{GripperCommand, ObjectShape, Simulator};

use crate::base::TabletopEnv;
use crate::config::EnvConfig;
use crate::env::{Env, Step, StepInfo};
use crate::observation::Observation;
use crate::scene::{ObjectSpec, RobotVariant, SceneSpec};
use crate::EnvError;

const ACTION_DIM: usize = 4;
const CUBE_HALF: f32 = 0.025;

/// Fixed palette for the cubes, cycled by object index.
const CUBE_COLORS: [[u8; 4]; 6] = [
    [255, 0, 0, 255],
    [0, 255, 0, 255],
    [0, 0, 255, 255],
    [255, 255, 0, 255],
    [255, 255, 255, 255],
    [0, 0, 0, 255],
];

/// Bowl plus `num_objects` cubes; constant placeholder reward.
///
/// Action layout: `[dx, dy, dz, gripper]`. Drivers that need success
/// statistics read [`object_positions`](LiftEnv::object_positions) and
/// apply their own criterion.
pub struct LiftEnv {
    base: TabletopEnv,
}

impl LiftEnv {
    #[must_use]
    pub fn new(sim: Box<dyn Simulator>, config: EnvConfig, num_objects: usize) -> Self {
        let mut objects = vec![ObjectSpec {
            name: "bowl".to_owned(),
            shape: ObjectShape::Cylinder {
                half_height: 0.02,
                radius: 0.07,
            },
            color: [200, 200, 210, 255],
        }];
        for i in 0..num_objects {
            objects.push(ObjectSpec::cube(
                &format!("cube_{i}"),
                CUBE_HALF,
                CUBE_COLORS[i % CUBE_COLORS.len()],
            ));
        }
        let scene = SceneSpec {
            robot: RobotVariant::WideGripper,
            placement_low: Vec3::new(0.55, -0.3, -0.2),
            placement_high: Vec3::new(0.85, 0.3, -0.2),
            objects,
            ..SceneSpec::default()
        };
        Self {
            base: TabletopEnv::new(sim, config, scene),
        }
    }

    pub fn base_mut(&mut self) -> &mut TabletopEnv {
        &mut self.base
    }

    /// Positions of every placed object, bowl first.
    pub fn object_positions(&self) -> Result<Vec<Vec3>, EnvError> {
        Ok(self
            .base
            .object_poses()?
            .into_iter()
            .map(|pose| pose.pos)
            .collect())
    }
}

impl Env for LiftEnv {
    fn reset(&mut self) -> Result<Observation, EnvError> {
        self.base.reset()
    }

    fn step(&mut self, action: &[f32]) -> Result<Step, EnvError> {
        TabletopEnv::check_action(action, ACTION_DIM)?;
        let delta = Vec3::new(action[0], action[1], action[2]);
        let target = self.base.clipped_target(delta);
        let gripper = GripperCommand::from_scalar(action[3]);
        self.base.drive(target, self.base.wrist(), gripper)?;
        self.base.commit_prev_pos()?;
        Ok(Step {
            observation: self.base.observe()?,
            // Placeholder reward; lift success is judged by the driver.
            reward: 1.0,
            done: false,
            info: StepInfo::default(),
        })
    }

    fn render(&mut self, width: u32, height: u32) -> RgbaImage {
        self.base.render_frame(width, height)
    }

    fn observation_size(&self) -> usize {
        self.base.state_size()
    }

    fn action_size(&self) -> usize {
        ACTION_DIM
    }

    fn config(&self) -> &EnvConfig {
        self.base.config()
    }
}
