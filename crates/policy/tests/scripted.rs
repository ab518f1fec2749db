//! Scripted policy phase behavior and the teleop key mapping.

use envs::Observation;
use glam::Vec3;
use policy::{
    ActionLayout, KeyMap, Policy, RandomPolicy, ScriptedGraspPolicy, TeleopCommand,
    WaypointPolicy,
};

/// Build a state observation with the end effector at `ee` and one
/// object at `object`.
fn obs(ee: Vec3, object: Vec3) -> Observation {
    let mut state = vec![0.0; 15];
    state[0..3].copy_from_slice(&ee.to_array());
    state[6] = 1.0; // identity quaternion w
    state[7] = 0.08; // gripper width
    state[8..11].copy_from_slice(&object.to_array());
    state[14] = 1.0;
    Observation {
        state,
        image: None,
    }
}

#[test]
fn scripted_policy_zeroes_descent_until_aligned() {
    let mut policy = ScriptedGraspPolicy::new(ActionLayout::ExplicitGrasp, 4);
    let far = obs(Vec3::new(0.5, 0.0, 0.0), Vec3::new(0.8, 0.1, -0.2));
    policy.reset(&far);
    let action = policy.act(&far, 0);
    assert_eq!(action.len(), 6);
    // Large planar offset: descent is suppressed up to the injected noise.
    assert!(action[2].abs() < 0.5, "descent too early: {}", action[2]);
    // Neither closing nor terminating while far away.
    assert!(action[4] > -0.5);
    assert!(action[5] < 0.5);
}

#[test]
fn scripted_policy_closes_then_terminates() {
    let mut policy = ScriptedGraspPolicy::new(ActionLayout::ExplicitGrasp, 4);
    let near = obs(
        Vec3::new(0.8, 0.1, -0.199),
        Vec3::new(0.8, 0.1, -0.2),
    );
    policy.reset(&near);

    let close_action = policy.act(&near, 5);
    assert!(close_action[4] < -0.5, "expected close: {close_action:?}");
    assert!(close_action[5] < 0.5);

    let terminate_action = policy.act(&near, 6);
    assert!(
        terminate_action[5] > 0.5,
        "expected terminate: {terminate_action:?}"
    );
}

#[test]
fn scripted_policy_auto_layout_is_four_dims() {
    let mut policy = ScriptedGraspPolicy::new(ActionLayout::AutoGrasp, 1);
    let o = obs(Vec3::new(0.5, 0.0, 0.0), Vec3::new(0.8, 0.0, -0.2));
    policy.reset(&o);
    assert_eq!(policy.act(&o, 0).len(), 4);
    assert_eq!(ActionLayout::AutoGrasp.action_dim(), 4);
    assert_eq!(ActionLayout::ExplicitGrasp.action_dim(), 6);
}

#[test]
fn waypoint_policy_follows_the_phase_schedule() {
    let mut policy = WaypointPolicy::new(0, 12);
    let o = obs(Vec3::new(0.5, 0.0, 0.0), Vec3::new(0.8, 0.1, -0.2));
    policy.reset(&o);

    // Approach phase: no descent.
    let approach = policy.act(&o, 10);
    assert_eq!(approach.len(), 4);
    assert!(approach[2].abs() < f32::EPSILON);
    assert!(approach[3].abs() < f32::EPSILON);

    // Descend phase: vertical motion allowed, gripper still open.
    let descend = policy.act(&o, 60);
    assert!(descend[2] < 0.0);
    assert!(descend[3].abs() < f32::EPSILON);

    // Close phase: no motion, gripper closing.
    let close = policy.act(&o, 75);
    assert!(close[0].abs() < f32::EPSILON);
    assert!(close[3] > 0.5);

    // Raise phase.
    let raise = policy.act(&o, 90);
    assert!(raise[2] > 0.5);
    assert!(raise[3] > 0.5);
}

#[test]
fn waypoint_target_tracks_the_requested_object() {
    let mut policy = WaypointPolicy::new(0, 2);
    let o = obs(Vec3::new(0.5, 0.0, 0.0), Vec3::new(0.8, 0.1, -0.2));
    policy.reset(&o);
    let target = policy.target();
    assert!(target.distance(Vec3::new(0.8, 0.1, -0.2)) <= 0.05 * 3.0_f32.sqrt() + 1e-5);
}

#[test]
fn random_policy_stays_in_bounds() {
    let mut policy = RandomPolicy::new(6, 99);
    let o = obs(Vec3::ZERO, Vec3::ZERO);
    policy.reset(&o);
    for t in 0..50 {
        let action = policy.act(&o, t);
        assert_eq!(action.len(), 6);
        assert!(action.iter().all(|v| (-1.0..=1.0).contains(v)));
    }
}

#[test]
fn keymap_decodes_the_standard_layout() {
    let keymap = KeyMap;
    assert_eq!(
        keymap.decode('w'),
        Some(TeleopCommand::Move(Vec3::new(0.0, 0.0, 1.0)))
    );
    assert_eq!(keymap.decode('h'), Some(TeleopCommand::CloseGripper));
    assert_eq!(keymap.decode('l'), Some(TeleopCommand::OpenGripper));
    assert_eq!(keymap.decode('r'), Some(TeleopCommand::Reset));
    assert_eq!(keymap.decode('q'), Some(TeleopCommand::Quit));
    assert_eq!(keymap.decode('?'), None);
}

#[test]
fn keymap_actions_preserve_gripper_state() {
    let keymap = KeyMap;
    let action = keymap.to_action(TeleopCommand::Move(Vec3::new(0.0, 1.0, 0.0)), 1.0);
    assert_eq!(action, vec![0.0, 1.0, 0.0, 1.0]);

    let action = keymap.to_action(TeleopCommand::CloseGripper, -1.0);
    assert!((action[3] - 1.0).abs() < f32::EPSILON);
}
