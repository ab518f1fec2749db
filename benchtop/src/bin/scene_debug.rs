#![deny(clippy::all, clippy::pedantic)]
//! Load a scene and idle-step it, logging object state periodically.
//!
//! Sandbox utility for checking that spawned bodies settle where they
//! should before wiring a task around them.

use anyhow::Result;
use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use envs::scene::{self, ObjectSpec, SceneSpec};
use envs::EnvConfig;
use sim::Simulator;

#[derive(Parser, Debug)]
#[command(about = "Idle-step a loaded scene and log body state")]
struct Args {
    /// Steps to run; 0 runs until interrupted.
    #[arg(long, default_value_t = 0)]
    steps: u64,

    /// Log every N steps.
    #[arg(long, default_value_t = 120)]
    log_interval: u64,

    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> Result<()> {
    benchtop::init_tracing();
    let args = Args::parse();

    let config = EnvConfig::default();
    let spec = SceneSpec {
        objects: vec![
            ObjectSpec::cube("cube_a", 0.025, [255, 0, 0, 255]),
            ObjectSpec::cube("cube_b", 0.025, [0, 0, 255, 255]),
        ],
        tray: true,
        min_spacing: 0.05,
        ..SceneSpec::default()
    };

    let mut sim = benchtop::new_sim();
    let mut rng = SmallRng::seed_from_u64(args.seed);
    let loaded = scene::load(sim.as_mut(), &config, &spec, &mut rng)?;
    tracing::info!(objects = loaded.objects.len(), "scene loaded");

    let mut step = 0u64;
    loop {
        sim.step()?;
        step += 1;
        if step % args.log_interval == 0 {
            for object in &loaded.objects {
                let pose = sim.body_pose(object.id)?;
                let speed = sim.body_velocity(object.id)?.length();
                tracing::info!(
                    name = %object.name,
                    x = pose.pos.x,
                    y = pose.pos.y,
                    z = pose.pos.z,
                    speed,
                    "body state"
                );
            }
        }
        if args.steps > 0 && step >= args.steps {
            break;
        }
    }
    tracing::info!(step, "scene debug finished");
    Ok(())
}
