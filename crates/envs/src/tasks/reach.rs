//! Free-space reaching, the base debugging task.

use glam::Vec3;
use image::RgbaImage;
use sim::{GripperCommand, Simulator};

use crate::base::TabletopEnv;
use crate::config::EnvConfig;
use crate::env::{Env, Step, StepInfo};
use crate::observation::Observation;
use crate::scene::SceneSpec;
use crate::EnvError;

const ACTION_DIM: usize = 4;

/// Position control with no objects and no task reward.
///
/// Action layout: `[dx, dy, dz, gripper]`.
pub struct ReachEnv {
    base: TabletopEnv,
}

impl ReachEnv {
    #[must_use]
    pub fn new(sim: Box<dyn Simulator>, config: EnvConfig) -> Self {
        let scene = SceneSpec::default();
        Self {
            base: TabletopEnv::new(sim, config, scene),
        }
    }

    pub fn base_mut(&mut self) -> &mut TabletopEnv {
        &mut self.base
    }
}

impl Env for ReachEnv {
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
            reward: 0.0,
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
