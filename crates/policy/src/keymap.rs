//! Keyboard-to-action mapping for manual teleoperation.
//!
//! Decoupled from the terminal layer so the mapping is testable; the
//! teleop binary feeds key characters in and turns commands into env
//! actions.

use glam::Vec3;

/// One decoded teleop command.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TeleopCommand {
    /// Translate the end effector.
    Move(Vec3),
    OpenGripper,
    CloseGripper,
    /// Keep applying the last translation until toggled off.
    ToggleLock,
    Reset,
    Quit,
}

/// Character-to-command mapping with the standard WASD layout:
/// `w`/`s` raise and lower, `a`/`d` move sideways, `i`/`k` move
/// forward and back, `h`/`l` close and open the gripper.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyMap;

impl KeyMap {
    /// Decode a key character; unknown keys map to `None`.
    #[must_use]
    pub fn decode(self, key: char) -> Option<TeleopCommand> {
        match key {
            'w' => Some(TeleopCommand::Move(Vec3::new(0.0, 0.0, 1.0))),
            's' => Some(TeleopCommand::Move(Vec3::new(0.0, 0.0, -1.0))),
            'a' => Some(TeleopCommand::Move(Vec3::new(0.0, -1.0, 0.0))),
            'd' => Some(TeleopCommand::Move(Vec3::new(0.0, 1.0, 0.0))),
            'i' => Some(TeleopCommand::Move(Vec3::new(1.0, 0.0, 0.0))),
            'k' => Some(TeleopCommand::Move(Vec3::new(-1.0, 0.0, 0.0))),
            'h' => Some(TeleopCommand::CloseGripper),
            'l' => Some(TeleopCommand::OpenGripper),
            'x' => Some(TeleopCommand::ToggleLock),
            'r' => Some(TeleopCommand::Reset),
            'q' => Some(TeleopCommand::Quit),
            _ => None,
        }
    }

    /// Turn a command into a 4-dim `[dx, dy, dz, gripper]` action.
    /// `Move` keeps the current gripper command; the gripper keys keep
    /// the current position.
    #[must_use]
    pub fn to_action(self, command: TeleopCommand, gripper: f32) -> Vec<f32> {
        match command {
            TeleopCommand::Move(delta) => vec![delta.x, delta.y, delta.z, gripper],
            TeleopCommand::CloseGripper => vec![0.0, 0.0, 0.0, 1.0],
            TeleopCommand::OpenGripper => vec![0.0, 0.0, 0.0, -1.0],
            TeleopCommand::ToggleLock
            | TeleopCommand::Reset
            | TeleopCommand::Quit => vec![0.0, 0.0, 0.0, gripper],
        }
    }
}
