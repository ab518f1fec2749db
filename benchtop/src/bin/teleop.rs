#![deny(clippy::all, clippy::pedantic)]
//! Interactive keyboard teleoperation.
//!
//! Raw-mode terminal loop: WASD-style keys translate the end effector,
//! `h`/`l` close and open the gripper, `x` locks the current translation,
//! `r` resets the episode, `q` quits.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode};
use crossterm::terminal;

use envs::{Env, LiftEnv, ObservationMode};
use policy::{KeyMap, TeleopCommand};

#[derive(Parser, Debug)]
#[command(about = "Drive an environment from the keyboard")]
struct Args {
    /// Number of cubes in the scene.
    #[arg(long, default_value_t = 2)]
    num_objects: usize,

    /// Poll interval for key events, in milliseconds.
    #[arg(long, default_value_t = 100)]
    poll_ms: u64,

    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    benchtop::init_tracing();
    let args = Args::parse();

    let config = benchtop::collection_config(ObservationMode::State, 256, args.seed);
    let mut env = LiftEnv::new(benchtop::new_sim(), config, args.num_objects);
    env.reset()?;
    tracing::info!(
        obs_size = env.observation_size(),
        action_size = env.action_size(),
        "teleop ready: wasd/ik move, h/l grip, x lock, r reset, q quit"
    );

    let keymap = KeyMap;
    let mut gripper = -1.0_f32;
    let mut locked = false;
    let mut locked_action: Option<Vec<f32>> = None;

    terminal::enable_raw_mode()?;
    let result = run_loop(
        &mut env,
        keymap,
        &mut gripper,
        &mut locked,
        &mut locked_action,
        args.poll_ms,
    );
    terminal::disable_raw_mode()?;
    result
}

fn run_loop(
    env: &mut LiftEnv,
    keymap: KeyMap,
    gripper: &mut f32,
    locked: &mut bool,
    locked_action: &mut Option<Vec<f32>>,
    poll_ms: u64,
) -> Result<()> {
    loop {
        let mut command = None;
        if event::poll(Duration::from_millis(poll_ms))? {
            if let Event::Key(key) = event::read()? {
                if let KeyCode::Char(c) = key.code {
                    command = keymap.decode(c);
                }
            }
        }

        match command {
            Some(TeleopCommand::Quit) => break,
            Some(TeleopCommand::Reset) => {
                env.reset()?;
                *locked_action = None;
                tracing::info!("reset");
                continue;
            }
            Some(TeleopCommand::ToggleLock) => {
                *locked = !*locked;
                if !*locked {
                    *locked_action = None;
                }
                tracing::info!(locked = *locked, "lock toggled");
                continue;
            }
            Some(TeleopCommand::OpenGripper) => *gripper = -1.0,
            Some(TeleopCommand::CloseGripper) => *gripper = 1.0,
            _ => {}
        }

        let action = match command {
            Some(cmd @ TeleopCommand::Move(_)) => {
                let action = keymap.to_action(cmd, *gripper);
                if *locked {
                    *locked_action = Some(action.clone());
                }
                Some(action)
            }
            Some(TeleopCommand::OpenGripper | TeleopCommand::CloseGripper) => {
                Some(vec![0.0, 0.0, 0.0, *gripper])
            }
            _ => locked_action.clone(),
        };

        if let Some(action) = action {
            let step = env.step(&action)?;
            let ee = step.observation.ee_pos();
            tracing::info!(
                x = ee[0],
                y = ee[1],
                z = ee[2],
                gripper = *gripper,
                "stepped"
            );
        }
    }
    Ok(())
}
