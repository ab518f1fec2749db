//! Grasping with an explicit termination action and a gripper toggle.
//!
//! The policy owns the whole episode: it decides when to open or close
//! the fingers and when to terminate. Closing from the open state runs a
//! short close-and-lift transition; reward is only scored at termination.

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

const ACTION_DIM: usize = 6;

const REWARD_FAIL: f32 = 0.0;
const REWARD_SUCCESS: f32 = 1.0;
const SUCCESS_HEIGHT: f32 = -0.1;
const SUCCESS_PROXIMITY: f32 = 0.1;
/// Drive repeats used for open/close transitions.
const TRANSITION_REPEATS: u32 = 5;
const LIFT_REPEATS: u32 = 5;
const LIFT_DELTA: f32 = 0.05;

/// Single tray object, 6-dim action:
/// `[dx, dy, dz, dwrist, gripper, terminate]`.
///
/// `gripper > 0.5` opens, `< -0.5` closes, in between holds the current
/// state. `terminate > 0.5` ends the episode and scores it.
pub struct GraspExplicitEnv {
    base: TabletopEnv,
    wrist: f32,
    gripper_open: bool,
}

impl GraspExplicitEnv {
    #[must_use]
    pub fn new(sim: Box<dyn Simulator>, config: EnvConfig) -> Self {
        let scene = SceneSpec {
            objects: vec![ObjectSpec::cube("target", 0.025, [60, 140, 220, 255])],
            tray: true,
            ..SceneSpec::default()
        };
        Self {
            base: TabletopEnv::new(sim, config, scene),
            wrist: 0.0,
            gripper_open: true,
        }
    }

    pub fn base_mut(&mut self) -> &mut TabletopEnv {
        &mut self.base
    }

    #[must_use]
    pub fn gripper_open(&self) -> bool {
        self.gripper_open
    }

    fn reward(&self) -> Result<f32, EnvError> {
        let ee = self.base.end_effector_pos()?;
        let objects = self.base.object_poses()?;
        Ok(grasp_reward(
            ee,
            &objects,
            SUCCESS_HEIGHT,
            SUCCESS_PROXIMITY,
            REWARD_FAIL,
            REWARD_SUCCESS,
        ))
    }

    /// Apply the gripper toggle and drive toward `target`.
    fn apply_gripper(&mut self, target: Vec3, command: f32) -> Result<(), EnvError> {
        let wrist = self.wrist;
        if command > 0.5 {
            if self.gripper_open {
                self.base.drive(target, wrist, GripperCommand::Open)?;
            } else {
                // Closed and asked to open: release in place.
                for _ in 0..TRANSITION_REPEATS {
                    self.base.drive(target, wrist, GripperCommand::Open)?;
                }
                self.gripper_open = true;
            }
        } else if command < -0.5 {
            if !self.gripper_open {
                self.base.drive(target, wrist, GripperCommand::Close)?;
            } else {
                // Open and asked to close: close, then lift a little.
                for _ in 0..TRANSITION_REPEATS {
                    self.base.drive(target, wrist, GripperCommand::Close)?;
                }
                for _ in 0..LIFT_REPEATS {
                    let mut raise = self.base.end_effector_pos()?;
                    raise.z += LIFT_DELTA;
                    let raise = raise.clamp(
                        self.base.config().pos_low(),
                        self.base.config().pos_high(),
                    );
                    self.base.drive(raise, wrist, GripperCommand::Close)?;
                }
                self.gripper_open = false;
            }
        } else {
            let hold = if self.gripper_open {
                GripperCommand::Open
            } else {
                GripperCommand::Close
            };
            self.base.drive(target, wrist, hold)?;
        }
        Ok(())
    }
}

impl Env for GraspExplicitEnv {
    fn reset(&mut self) -> Result<Observation, EnvError> {
        self.wrist = 0.0;
        let obs = self.base.reset()?;
        self.gripper_open = true;
        Ok(obs)
    }

    fn step(&mut self, action: &[f32]) -> Result<Step, EnvError> {
        TabletopEnv::check_action(action, ACTION_DIM)?;
        let delta = Vec3::new(action[0], action[1], action[2]);
        self.wrist = (self.wrist + action[3]).clamp(-std::f32::consts::PI, std::f32::consts::PI);
        let target = self.base.clipped_target(delta);
        self.apply_gripper(target, action[4])?;

        let (reward, done, info) = if action[5] > 0.5 {
            let reward = self.reward()?;
            let success = if reward > 0.0 { 1.0 } else { 0.0 };
            (
                reward,
                true,
                StepInfo {
                    grasp_success: Some(success),
                },
            )
        } else {
            (
                REWARD_FAIL,
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
