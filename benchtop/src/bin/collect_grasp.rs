#![deny(clippy::all, clippy::pedantic)]
//! Randomized scripted grasping collection.
//!
//! Runs the timed waypoint policy against the lift scene for a fixed
//! number of episodes, counts lifted objects, flushes trajectory batches
//! at the configured interval, and optionally exports episode GIFs.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use collect::{BatchWriter, Trajectory, VideoWriter};
use envs::{Env, LiftEnv, ObservationMode};
use policy::{Policy, WaypointPolicy};

/// Index of the graspable cube in the lift scene (the bowl is object 0).
const TARGET_OBJECT: usize = 1;
/// An object above this height counts as lifted.
const LIFT_HEIGHT: f32 = -0.1;
const GIF_FRAME_DELAY_MS: u32 = 100;

#[derive(Parser, Debug)]
#[command(about = "Collect randomized scripted grasping trajectories")]
struct Args {
    /// Output directory for batches and videos.
    #[arg(long, default_value = "data/grasp")]
    out_dir: PathBuf,

    /// Number of episodes to collect.
    #[arg(long, default_value_t = 100)]
    num_trajectories: usize,

    /// Steps per episode.
    #[arg(long, default_value_t = 100)]
    episode_length: usize,

    /// Save a GIF every N episodes; 0 disables video saving.
    #[arg(long, default_value_t = 0)]
    video_save_frequency: usize,

    /// Episodes per flushed batch file.
    #[arg(long, default_value_t = 10)]
    flush_interval: usize,

    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> Result<()> {
    benchtop::init_tracing();
    let args = Args::parse();

    let config = benchtop::collection_config(ObservationMode::State, 256, Some(args.seed));
    let params = config.params();
    let mut env = LiftEnv::new(benchtop::new_sim(), config, 1);
    let mut policy = WaypointPolicy::new(TARGET_OBJECT, args.seed);
    let mut writer = BatchWriter::new(&args.out_dir, "grasp", args.flush_interval, &params)?;
    let mut video = VideoWriter::new();

    let mut num_grasps = 0usize;
    for episode in 0..args.num_trajectories {
        let mut obs = env.reset()?;
        policy.reset(&obs);
        let save_video =
            args.video_save_frequency > 0 && episode % args.video_save_frequency == 0;

        let mut trajectory = Trajectory::with_label("cube_0");
        for t in 0..args.episode_length {
            if save_video {
                video.push(env.render(256, 256));
            }
            let action = policy.act(&obs, t);
            let step = env.step(&action)?;
            trajectory.push(&obs, &action, &step);
            obs = step.observation;
        }

        let lifted = env.object_positions()?[TARGET_OBJECT].z > LIFT_HEIGHT;
        if lifted {
            num_grasps += 1;
        }
        writer.push(trajectory)?;

        if save_video {
            let path = args.out_dir.join(format!("episode_{episode}.gif"));
            video.save_gif(&path, GIF_FRAME_DELAY_MS)?;
        }
        tracing::info!(episode, num_grasps, lifted, "episode finished");
    }

    let batches = writer.finish()?;
    tracing::info!(
        batches,
        num_grasps,
        attempts = args.num_trajectories,
        "collection finished"
    );
    Ok(())
}
