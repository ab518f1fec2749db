#![cfg(feature = "mock")]
//! Behavior of the kinematic test double: attach/detach, travel clamping,
//! and snapshot round-trips.

use glam::Vec3;
use sim::{
    GripperCommand, GripperSpec, KinematicSim, ObjectShape, Pose, Simulator,
};

fn scene_with_cube() -> (KinematicSim, sim::BodyId) {
    let mut sim = KinematicSim::new();
    sim.spawn_static_box(
        Pose::from_pos(Vec3::new(0.5, 0.0, -0.3)),
        Vec3::new(0.5, 0.5, 0.05),
        [100, 100, 100, 255],
    );
    let cube = sim.spawn_object(
        ObjectShape::Cuboid {
            half_extents: Vec3::splat(0.025),
        },
        Pose::from_pos(Vec3::new(0.5, 0.0, -0.2)),
        [255, 0, 0, 255],
    );
    sim.spawn_gripper(&GripperSpec {
        pose: Pose::from_pos(Vec3::new(0.5, 0.0, 0.0)),
        ..GripperSpec::default()
    });
    (sim, cube)
}

#[test]
fn position_control_clamps_travel() {
    let (mut sim, _) = scene_with_cube();
    let start = sim.end_effector_pose().unwrap().pos;
    sim.position_control(
        start + Vec3::new(1.0, 0.0, 0.0),
        0.0,
        GripperCommand::Hold,
    )
    .unwrap();
    sim.step().unwrap();
    let moved = sim.end_effector_pose().unwrap().pos;
    let travel = moved.distance(start);
    assert!(travel <= 0.05 + 1e-5, "travel {travel} exceeds clamp");
}

#[test]
fn close_far_from_object_attaches_nothing() {
    let (mut sim, _) = scene_with_cube();
    sim.position_control(Vec3::new(0.5, 0.0, 0.0), 0.0, GripperCommand::Close)
        .unwrap();
    sim.step().unwrap();
    assert!(sim.held_object().is_none());
}

#[test]
fn close_within_range_attaches_and_object_follows() {
    let (mut sim, cube) = scene_with_cube();
    // Walk the gripper down to the cube, then close.
    for _ in 0..10 {
        sim.position_control(Vec3::new(0.5, 0.0, -0.18), 0.0, GripperCommand::Hold)
            .unwrap();
        sim.step().unwrap();
    }
    sim.position_control(Vec3::new(0.5, 0.0, -0.18), 0.0, GripperCommand::Close)
        .unwrap();
    sim.step().unwrap();
    assert_eq!(sim.held_object(), Some(cube));

    // Raise; the attached cube must rise with the gripper.
    for _ in 0..10 {
        sim.position_control(Vec3::new(0.5, 0.0, 0.2), 0.0, GripperCommand::Close)
            .unwrap();
        sim.step().unwrap();
    }
    let cube_z = sim.body_pose(cube).unwrap().pos.z;
    assert!(cube_z > -0.1, "cube did not rise: z = {cube_z}");

    // Opening releases.
    sim.position_control(Vec3::new(0.5, 0.0, 0.2), 0.0, GripperCommand::Open)
        .unwrap();
    sim.step().unwrap();
    assert!(sim.held_object().is_none());
}

#[test]
fn snapshot_roundtrip_restores_poses_and_attachment() {
    let (mut sim, cube) = scene_with_cube();
    for _ in 0..10 {
        sim.position_control(Vec3::new(0.5, 0.0, -0.18), 0.0, GripperCommand::Close)
            .unwrap();
        sim.step().unwrap();
    }
    assert_eq!(sim.held_object(), Some(cube));
    let snapshot = sim.save_state().unwrap();
    let cube_pose = sim.body_pose(cube).unwrap();

    // Diverge: release and move away.
    sim.position_control(Vec3::new(0.6, 0.2, 0.1), 0.0, GripperCommand::Open)
        .unwrap();
    for _ in 0..20 {
        sim.position_control(Vec3::new(0.6, 0.2, 0.1), 0.0, GripperCommand::Hold)
            .unwrap();
        sim.step().unwrap();
    }
    assert!(sim.held_object().is_none());

    sim.restore_state(&snapshot).unwrap();
    assert_eq!(sim.held_object(), Some(cube));
    let restored = sim.body_pose(cube).unwrap();
    assert!(restored.pos.distance(cube_pose.pos) < 1e-5);
}

#[test]
fn snapshot_from_other_scene_is_rejected() {
    let (sim_a, _) = scene_with_cube();
    let snapshot = sim_a.save_state().unwrap();

    let mut sim_b = KinematicSim::new();
    sim_b.spawn_gripper(&GripperSpec::default());
    assert!(sim_b.restore_state(&snapshot).is_err());
}

#[test]
fn gripper_width_closes_over_steps() {
    let (mut sim, _) = scene_with_cube();
    let open = sim.gripper_width().unwrap();
    sim.position_control(Vec3::new(0.5, 0.0, 0.0), 0.0, GripperCommand::Close)
        .unwrap();
    for _ in 0..10 {
        sim.step().unwrap();
    }
    let closed = sim.gripper_width().unwrap();
    assert!(closed < open);
    assert!(closed >= 0.0);
}
