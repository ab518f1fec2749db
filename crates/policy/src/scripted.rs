//! Rule-based grasping controllers.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use envs::Observation;

use crate::Policy;

fn ee_pos(obs: &Observation) -> Vec3 {
    let p = obs.ee_pos();
    Vec3::new(p[0], p[1], p[2])
}

fn object_pos(obs: &Observation, index: usize) -> Vec3 {
    obs.object_pos(index)
        .map_or(Vec3::ZERO, |p| Vec3::new(p[0], p[1], p[2]))
}

/// Which action layout the policy emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionLayout {
    /// `[dx, dy, dz, dwrist]`; the environment grasps automatically.
    AutoGrasp,
    /// `[dx, dy, dz, dwrist, gripper, terminate]`; the policy closes
    /// the gripper and terminates explicitly.
    ExplicitGrasp,
}

impl ActionLayout {
    #[must_use]
    pub fn action_dim(self) -> usize {
        match self {
            ActionLayout::AutoGrasp => 4,
            ActionLayout::ExplicitGrasp => 6,
        }
    }
}

/// Distance-phased grasping: approach in the plane, descend when
/// aligned, close, raise, terminate.
///
/// The grasp distance threshold is re-randomized each episode and every
/// translation command carries Gaussian noise, so repeated episodes
/// produce varied but mostly successful demonstrations.
pub struct ScriptedGraspPolicy {
    layout: ActionLayout,
    rng: SmallRng,
    noise_scale: f32,
    gain: f32,
    dist_thresh: f32,
    xy_align_thresh: f32,
    gripper_open: bool,
}

impl ScriptedGraspPolicy {
    #[must_use]
    pub fn new(layout: ActionLayout, seed: u64) -> Self {
        Self {
            layout,
            rng: SmallRng::seed_from_u64(seed),
            noise_scale: 0.1,
            gain: 7.0,
            dist_thresh: 0.04,
            xy_align_thresh: 0.02,
            gripper_open: true,
        }
    }

    fn noise(&mut self) -> f32 {
        let n: f32 = self.rng.sample(StandardNormal);
        n * self.noise_scale
    }
}

impl Policy for ScriptedGraspPolicy {
    fn reset(&mut self, _obs: &Observation) {
        let n: f32 = self.rng.sample(StandardNormal);
        self.dist_thresh = 0.04 + n * 0.01;
        self.gripper_open = true;
    }

    fn act(&mut self, obs: &Observation, _t: usize) -> Vec<f32> {
        let ee = ee_pos(obs);
        let object = object_pos(obs, 0);
        let dist = object.distance(ee);

        let mut delta;
        let mut gripper = 0.0;
        let mut terminate = 0.0;
        if dist > self.dist_thresh && self.gripper_open {
            // Approach: zero out descent until aligned in the plane.
            delta = (object - ee) * self.gain;
            let xy_diff = (object - ee).truncate().length();
            if xy_diff > self.xy_align_thresh {
                delta.z = 0.0;
            }
        } else if self.gripper_open {
            delta = (object - ee) * self.gain;
            gripper = -0.7;
            self.gripper_open = false;
        } else {
            delta = Vec3::new(0.0, 0.0, 0.7);
            terminate = 0.7;
        }

        delta.x += self.noise();
        delta.y += self.noise();
        delta.z += self.noise();

        match self.layout {
            ActionLayout::AutoGrasp => vec![delta.x, delta.y, delta.z, 0.0],
            ActionLayout::ExplicitGrasp => {
                vec![delta.x, delta.y, delta.z, 0.0, gripper, terminate]
            }
        }
    }
}

const APPROACH_END: usize = 50;
const DESCEND_END: usize = 70;
const CLOSE_END: usize = 85;

/// Timed open-loop grasping toward a target captured at reset.
///
/// Phase schedule per episode step: planar approach, descend, close,
/// raise. The target is the first object's position perturbed uniformly,
/// so repeated episodes sweep the neighborhood of the object.
pub struct WaypointPolicy {
    rng: SmallRng,
    object_index: usize,
    target: Vec3,
    gain: f32,
    jitter: f32,
}

impl WaypointPolicy {
    #[must_use]
    pub fn new(object_index: usize, seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            object_index,
            target: Vec3::ZERO,
            gain: 3.0,
            jitter: 0.05,
        }
    }

    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.target
    }
}

impl Policy for WaypointPolicy {
    fn reset(&mut self, obs: &Observation) {
        let jitter = Vec3::new(
            self.rng.random_range(-self.jitter..=self.jitter),
            self.rng.random_range(-self.jitter..=self.jitter),
            self.rng.random_range(-self.jitter..=self.jitter),
        );
        self.target = object_pos(obs, self.object_index) + jitter;
    }

    fn act(&mut self, obs: &Observation, t: usize) -> Vec<f32> {
        let ee = ee_pos(obs);
        let (mut delta, gripper) = if t < APPROACH_END {
            let mut d = (self.target - ee) * self.gain;
            d.z = 0.0;
            (d, 0.0)
        } else if t < DESCEND_END {
            let mut d = (self.target - ee) * self.gain;
            d.z *= 2.0;
            (d, 0.0)
        } else if t < CLOSE_END {
            (Vec3::ZERO, 1.0)
        } else {
            (Vec3::new(0.0, 0.0, 1.0), 1.0)
        };
        delta = delta.clamp(Vec3::splat(-1.0), Vec3::splat(1.0));
        vec![delta.x, delta.y, delta.z, gripper]
    }
}
