#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::cast_precision_loss)]
//! # Scripted control policies
//!
//! Open-loop and rule-based controllers that drive the environments to
//! collect demonstration trajectories, plus the key mapping used for
//! manual teleoperation. Policies read the fixed state layout documented
//! in [`envs::observation`].

pub mod keymap;
pub mod random;
pub mod scripted;

pub use keymap::{KeyMap, TeleopCommand};
pub use random::RandomPolicy;
pub use scripted::{ActionLayout, ScriptedGraspPolicy, WaypointPolicy};

use envs::Observation;

/// A controller producing one action per step.
pub trait Policy {
    /// Called once per episode with the initial observation.
    fn reset(&mut self, obs: &Observation);

    /// Produce the action for step `t`.
    fn act(&mut self, obs: &Observation, t: usize) -> Vec<f32>;
}
