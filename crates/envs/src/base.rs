//! Base tabletop machinery shared by the task environments.
//!
//! Owns the simulator session, the scene description, and the per-step
//! bookkeeping (previous end-effector position, wrist angle). Tasks wrap
//! this and supply action decoding, reward, and termination.

use glam::Vec3;
use image::RgbaImage;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use sim::{Camera, GripperCommand, Pose, Simulator};

use crate::config::{EnvConfig, ObservationMode};
use crate::observation::{self, Observation};
use crate::scene::{self, LoadedScene, SceneSpec};
use crate::EnvError;

/// User-supplied customization run at the end of every reset.
pub type ResetHook = Box<dyn FnMut(&mut dyn Simulator)>;

/// Simulator session plus the shared reset/step plumbing.
pub struct TabletopEnv {
    sim: Box<dyn Simulator>,
    config: EnvConfig,
    scene_spec: SceneSpec,
    camera: Camera,
    rng: SmallRng,
    scene: LoadedScene,
    prev_pos: Vec3,
    wrist: f32,
    reset_hook: Option<ResetHook>,
}

impl TabletopEnv {
    #[must_use]
    pub fn new(sim: Box<dyn Simulator>, config: EnvConfig, scene_spec: SceneSpec) -> Self {
        let camera = Camera::framing(config.pos_low(), config.pos_high());
        let rng = SmallRng::seed_from_u64(config.seed.unwrap_or_else(rand::random));
        let prev_pos = config.pos_init();
        Self {
            sim,
            config,
            scene_spec,
            camera,
            rng,
            scene: LoadedScene::default(),
            prev_pos,
            wrist: 0.0,
            reset_hook: None,
        }
    }

    /// Install a hook invoked at the end of every reset.
    pub fn set_reset_hook(&mut self, hook: ResetHook) {
        self.reset_hook = Some(hook);
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn scene(&self) -> &LoadedScene {
        &self.scene
    }

    pub fn sim_mut(&mut self) -> &mut dyn Simulator {
        self.sim.as_mut()
    }

    pub fn sim(&self) -> &dyn Simulator {
        self.sim.as_ref()
    }

    /// Rebuild the scene, settle, and move the end effector to its initial
    /// pose. Returns the initial observation.
    pub fn reset(&mut self) -> Result<Observation, EnvError> {
        self.scene = scene::load(
            self.sim.as_mut(),
            &self.config,
            &self.scene_spec,
            &mut self.rng,
        )?;

        // Let dropped objects settle before control starts.
        for _ in 0..self.config.settle_steps {
            self.sim.step()?;
        }

        let init = self.config.pos_init();
        self.wrist = 0.0;
        self.sim
            .position_control(init, 0.0, GripperCommand::Open)?;
        self.sim.step()?;
        self.prev_pos = self.sim.end_effector_pose()?.pos;

        if let Some(hook) = self.reset_hook.as_mut() {
            hook(self.sim.as_mut());
        }
        self.observe()
    }

    /// Clip a scaled position delta against the workspace bounds.
    ///
    /// Targets are always relative to the previous end-effector position,
    /// never absolute.
    pub fn clipped_target(&self, delta: Vec3) -> Vec3 {
        (self.prev_pos + delta * self.config.action_scale)
            .clamp(self.config.pos_low(), self.config.pos_high())
    }

    /// Run the position-control primitive for the configured repeat count.
    pub fn drive(
        &mut self,
        target: Vec3,
        wrist: f32,
        gripper: GripperCommand,
    ) -> Result<(), EnvError> {
        self.wrist = wrist;
        for _ in 0..self.config.action_repeat {
            self.sim.position_control(target, wrist, gripper)?;
            self.sim.step()?;
        }
        Ok(())
    }

    /// Record the end-effector position for the next step's delta.
    pub fn commit_prev_pos(&mut self) -> Result<(), EnvError> {
        self.prev_pos = self.sim.end_effector_pose()?.pos;
        Ok(())
    }

    pub fn prev_pos(&self) -> Vec3 {
        self.prev_pos
    }

    pub fn wrist(&self) -> f32 {
        self.wrist
    }

    pub fn end_effector_pos(&self) -> Result<Vec3, EnvError> {
        Ok(self.sim.end_effector_pose()?.pos)
    }

    /// Poses of the task objects in spawn order.
    pub fn object_poses(&self) -> Result<Vec<Pose>, EnvError> {
        self.scene
            .objects
            .iter()
            .map(|object| Ok(self.sim.body_pose(object.id)?))
            .collect()
    }

    /// Assemble the observation for the configured mode.
    pub fn observe(&mut self) -> Result<Observation, EnvError> {
        match self.config.observation_mode {
            ObservationMode::State => Ok(Observation {
                state: observation::full_state(self.sim.as_ref(), &self.scene)?,
                image: None,
            }),
            ObservationMode::Pixels => {
                let frame = self.render_frame(self.config.image_dim, self.config.image_dim);
                Ok(Observation {
                    state: observation::reduced_state(self.sim.as_ref())?,
                    image: Some(observation::normalize_frame(&frame)),
                })
            }
            ObservationMode::PixelsDebug => {
                let frame = self.render_frame(self.config.image_dim, self.config.image_dim);
                Ok(Observation {
                    state: observation::full_state(self.sim.as_ref(), &self.scene)?,
                    image: Some(observation::normalize_frame(&frame)),
                })
            }
        }
    }

    /// Length of the state vector for the loaded scene.
    #[must_use]
    pub fn state_size(&self) -> usize {
        match self.config.observation_mode {
            ObservationMode::State | ObservationMode::PixelsDebug => {
                observation::OBJECTS_START
                    + self.scene_spec.objects.len() * observation::OBJECT_STRIDE
            }
            ObservationMode::Pixels => 4,
        }
    }

    pub fn render_frame(&mut self, width: u32, height: u32) -> RgbaImage {
        self.sim.render(&self.camera, width, height)
    }

    /// Validate an action length against the expected dimension.
    pub fn check_action(action: &[f32], expected: usize) -> Result<(), EnvError> {
        if action.len() == expected {
            Ok(())
        } else {
            Err(EnvError::MalformedAction {
                expected,
                got: action.len(),
            })
        }
    }

    /// Snapshot the live scene state.
    pub fn save_state(&self) -> Result<sim::SimSnapshot, EnvError> {
        Ok(self.sim.save_state()?)
    }

    /// Restore a snapshot and return the fresh observation.
    pub fn load_state(&mut self, snapshot: &sim::SimSnapshot) -> Result<Observation, EnvError> {
        self.sim.restore_state(snapshot)?;
        self.prev_pos = self.sim.end_effector_pose()?.pos;
        self.observe()
    }
}
