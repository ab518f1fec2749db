//! Grasping with an automatic grasp-and-raise sequence.
//!
//! The policy controls planar motion, descent, and wrist rotation; once
//! the end effector crosses the descent trigger height the environment
//! takes over, closes the gripper, raises it, and terminates the episode.

use glam::Vec3;
use image::RgbaImage;
use sim::{GripperCommand, Simulator};

use crate::base::TabletopEnv;
use crate::config::EnvConfig;
use crate::env::{Env, Step, StepInfo};
use crate::observation::Observation;
use crate::scene::{ObjectSpec, SceneSpec};
use crate::tasks::grasp_reward;
use crate::EnvError;

const ACTION_DIM: usize = 4;

const REWARD_NEGATIVE: f32 = -1.0;
const REWARD_POSITIVE: f32 = 10.0;
/// End-effector height that triggers the automatic grasp sequence.
const GRASP_TRIGGER_HEIGHT: f32 = -0.16;
/// Objects above this height count as lifted.
const SUCCESS_HEIGHT: f32 = -0.1;
/// Gripper-object proximity for success.
const SUCCESS_PROXIMITY: f32 = 0.1;
const CLOSE_REPEATS: u32 = 10;
const RAISE_REPEATS: u32 = 50;
const RAISE_DELTA: f32 = 0.05;

/// Single object in a tray; terminates via the automatic sequence.
///
/// Action layout: `[dx, dy, dz, dwrist]`; the gripper stays open until
/// the sequence fires. Reward is −1 per step and ±(−1/+10) at
/// termination.
pub struct GraspAutoEnv {
    base: TabletopEnv,
    wrist: f32,
}

impl GraspAutoEnv {
    #[must_use]
    pub fn new(sim: Box<dyn Simulator>, config: EnvConfig) -> Self {
        let scene = SceneSpec {
            objects: vec![ObjectSpec::cube("target", 0.025, [220, 120, 40, 255])],
            tray: true,
            ..SceneSpec::default()
        };
        Self {
            base: TabletopEnv::new(sim, config, scene),
            wrist: 0.0,
        }
    }

    pub fn base_mut(&mut self) -> &mut TabletopEnv {
        &mut self.base
    }

    fn reward(&self) -> Result<f32, EnvError> {
        let ee = self.base.end_effector_pos()?;
        let objects = self.base.object_poses()?;
        Ok(grasp_reward(
            ee,
            &objects,
            SUCCESS_HEIGHT,
            SUCCESS_PROXIMITY,
            REWARD_NEGATIVE,
            REWARD_POSITIVE,
        ))
    }

    /// Close on the current position, then raise in clipped increments.
    fn grasp_and_raise(&mut self) -> Result<(), EnvError> {
        let hold = self.base.end_effector_pos()?;
        for _ in 0..CLOSE_REPEATS {
            self.base.drive(hold, self.wrist, GripperCommand::Close)?;
        }
        for _ in 0..RAISE_REPEATS {
            let mut target = self.base.end_effector_pos()?;
            target.z += RAISE_DELTA;
            let target = target.clamp(
                self.base.config().pos_low(),
                self.base.config().pos_high(),
            );
            self.base.drive(target, self.wrist, GripperCommand::Close)?;
        }
        Ok(())
    }
}

impl Env for GraspAutoEnv {
    fn reset(&mut self) -> Result<Observation, EnvError> {
        self.wrist = 0.0;
        self.base.reset()
    }

    fn step(&mut self, action: &[f32]) -> Result<Step, EnvError> {
        TabletopEnv::check_action(action, ACTION_DIM)?;
        let delta = Vec3::new(action[0], action[1], action[2]);
        self.wrist = (self.wrist + action[3]).clamp(-std::f32::consts::PI, std::f32::consts::PI);
        let target = self.base.clipped_target(delta);
        self.base.drive(target, self.wrist, GripperCommand::Open)?;

        let ee = self.base.end_effector_pos()?;
        let (reward, done, info) = if ee.z < GRASP_TRIGGER_HEIGHT {
            self.grasp_and_raise()?;
            let reward = self.reward()?;
            let success = if reward > 0.0 { 1.0 } else { 0.0 };
            tracing::debug!(reward, success, "grasp sequence finished");
            (
                reward,
                true,
                StepInfo {
                    grasp_success: Some(success),
                },
            )
        } else {
            (
                REWARD_NEGATIVE,
                false,
                StepInfo {
                    grasp_success: Some(0.0),
                },
            )
        };

        self.base.commit_prev_pos()?;
        Ok(Step {
            observation: self.base.observe()?,
            reward,
            done,
            info,
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
