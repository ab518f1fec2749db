#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
//! # Simulator binding
//!
//! Physics stepping, end-effector position control, collision handling,
//! and frame production live behind the [`Simulator`] trait; everything
//! above this crate treats the engine as a black box.
//!
//! Two backends are provided:
//!
//! - [`RapierSim`] binds the `rapier3d` rigid-body engine and is the
//!   production session (feature `rapier`, on by default).
//! - [`KinematicSim`] is a deterministic first-order double with the same
//!   trait surface and no engine dependency (feature `mock`), used by the
//!   environment and collection tests.
//!
//! The scene model is z-up: gravity points along -z and object "height" is
//! the z coordinate throughout.

pub mod camera;
pub mod painter;
pub mod simulator;
pub mod types;

#[cfg(feature = "mock")]
pub mod kinematic;
#[cfg(feature = "rapier")]
pub mod rapier;

pub use camera::Camera;
pub use simulator::{GripperSpec, SimConfig, Simulator};
pub use types::{
    BodyId, BodyState, Color, GripperCommand, GripperState, ObjectShape, Pose, SimSnapshot,
};

#[cfg(feature = "mock")]
pub use kinematic::KinematicSim;
#[cfg(feature = "rapier")]
pub use rapier::RapierSim;

/// Simulator-level faults. Fatal to the caller's episode; no retry or
/// recovery exists at this layer.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("unknown body id {0:?}")]
    UnknownBody(BodyId),
    #[error("no gripper has been spawned into the scene")]
    GripperMissing,
    #[error("snapshot does not match the loaded scene: {0}")]
    SnapshotMismatch(String),
}
