#![deny(clippy::all, clippy::pedantic)]
//! Scripted demonstration collector.
//!
//! Fixed-length episodes of the distance-phased grasp policy against the
//! explicit-termination grasp task, recording state trajectories, a flat
//! image dataset, and optional episode GIFs.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use collect::{BatchWriter, ImageDataset, Trajectory, VideoWriter};
use envs::{Env, GraspExplicitEnv, ObservationMode};
use policy::{ActionLayout, Policy, ScriptedGraspPolicy};

const GIF_FRAME_DELAY_MS: u32 = 100;

#[derive(Parser, Debug)]
#[command(about = "Collect scripted grasping demonstrations with images")]
struct Args {
    /// Dataset name; prefixes every output file.
    #[arg(long, default_value = "grasp_demos")]
    name: String,

    /// Output directory.
    #[arg(long, default_value = "data/demos")]
    out_dir: PathBuf,

    #[arg(long, default_value_t = 100)]
    num_trajectories: usize,

    /// Steps per trajectory; every trajectory has exactly this length.
    #[arg(long, default_value_t = 75)]
    num_timesteps: usize,

    /// Episodes per flushed batch file.
    #[arg(long, default_value_t = 50)]
    flush_interval: usize,

    /// Save a GIF every N episodes; 0 disables video saving.
    #[arg(long, default_value_t = 0)]
    video_save_frequency: usize,

    /// Halve the observation image resolution.
    #[arg(long)]
    downsample: bool,

    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> Result<()> {
    benchtop::init_tracing();
    let args = Args::parse();

    let image_dim: u32 = if args.downsample { 48 } else { 96 };
    let config =
        benchtop::collection_config(ObservationMode::PixelsDebug, image_dim, Some(args.seed));
    let params = config.params();
    let mut env = GraspExplicitEnv::new(benchtop::new_sim(), config);
    let mut policy = ScriptedGraspPolicy::new(ActionLayout::ExplicitGrasp, args.seed);

    std::fs::create_dir_all(&args.out_dir)?;
    let mut writer = BatchWriter::new(&args.out_dir, &args.name, args.flush_interval, &params)?;
    let frame_len = (image_dim * image_dim * 3) as usize;
    let mut dataset = ImageDataset::new(args.num_trajectories, args.num_timesteps, frame_len);
    let mut video = VideoWriter::new();

    let mut successes = 0usize;
    for episode in 0..args.num_trajectories {
        let mut obs = env.reset()?;
        policy.reset(&obs);
        let save_video =
            args.video_save_frequency > 0 && episode % args.video_save_frequency == 0;

        let mut trajectory = Trajectory::with_label(&args.name);
        let mut episode_success = false;
        for t in 0..args.num_timesteps {
            let frame = env.render(image_dim, image_dim);
            dataset.set_frame(episode, t, &benchtop::frame_to_rgb(&frame))?;
            if save_video {
                video.push(frame);
            }

            let action = policy.act(&obs, t);
            let step = env.step(&action)?;
            trajectory.push(&obs, &action, &step);
            episode_success |= step.info.grasp_success.unwrap_or(0.0) > 0.5;
            obs = step.observation;
        }
        if episode_success {
            successes += 1;
        }
        writer.push(trajectory)?;

        if save_video {
            let path = args.out_dir.join(format!("{}_{episode}.gif", args.name));
            video.save_gif(&path, GIF_FRAME_DELAY_MS)?;
        }
        tracing::info!(episode, successes, "trajectory recorded");
    }

    let batches = writer.finish()?;
    let images_path = args.out_dir.join(format!("{}_images.bin", args.name));
    dataset.save(&images_path)?;
    tracing::info!(
        batches,
        successes,
        attempts = args.num_trajectories,
        "demo collection finished"
    );
    Ok(())
}
