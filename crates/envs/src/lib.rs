#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]
//! # Tabletop manipulation environments
//!
//! Gym-style environments over a live simulator session: a shared
//! reset/step contract ([`Env`]), observation assembly for state and
//! pixel modes, scene population with rejection-sampled object placement,
//! and the task variants built on top.
//!
//! The simulator is a black box behind [`sim::Simulator`]; this crate is
//! configuration, observation extraction, and reward bookkeeping.

pub mod base;
pub mod config;
pub mod env;
pub mod observation;
pub mod scene;
pub mod tasks;

pub use base::{ResetHook, TabletopEnv};
pub use config::{EnvConfig, ObservationMode};
pub use env::{Env, Step, StepInfo};
pub use observation::Observation;
pub use scene::{LoadedScene, ObjectSpec, PlacedObject, RobotVariant, SceneSpec};
pub use tasks::{GraspAutoEnv, GraspExplicitEnv, LiftEnv, ReachEnv};

/// Environment faults. There is no retry or partial-failure handling:
/// an error aborts the call and the caller decides whether the episode
/// loop (or the process) dies.
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error("malformed action: expected {expected} dims, got {got}")]
    MalformedAction { expected: usize, got: usize },
    #[error(
        "object placement infeasible: placed {placed} of {requested} after {attempts} attempts"
    )]
    PlacementInfeasible {
        placed: usize,
        requested: usize,
        attempts: u32,
    },
    #[error(transparent)]
    Sim(#[from] sim::SimError),
}
