#![cfg(feature = "rapier")]
//! Engine-backed session: gravity settling, kinematic end-effector
//! control, and proximity grasping.

use glam::Vec3;
use sim::{
    GripperCommand, GripperSpec, ObjectShape, Pose, RapierSim, SimConfig, Simulator,
};

fn tabletop() -> (RapierSim, sim::BodyId) {
    let mut sim = RapierSim::new();
    sim.configure(&SimConfig {
        timestep: 1.0 / 120.0,
        solver_iterations: 30,
        gravity: Vec3::new(0.0, 0.0, -9.81),
    });
    sim.spawn_static_box(
        Pose::from_pos(Vec3::new(0.5, 0.0, -0.3)),
        Vec3::new(0.6, 0.8, 0.05),
        [100, 100, 100, 255],
    );
    let cube = sim.spawn_object(
        ObjectShape::Cuboid {
            half_extents: Vec3::splat(0.025),
        },
        Pose::from_pos(Vec3::new(0.5, 0.0, 0.0)),
        [255, 0, 0, 255],
    );
    sim.spawn_gripper(&GripperSpec {
        pose: Pose::from_pos(Vec3::new(0.5, 0.0, 0.2)),
        ..GripperSpec::default()
    });
    (sim, cube)
}

#[test]
fn dropped_object_falls_and_settles_on_table() {
    let (mut sim, cube) = tabletop();
    for _ in 0..400 {
        sim.step().unwrap();
    }
    let pos = sim.body_pose(cube).unwrap().pos;
    assert!(pos.z.is_finite());
    // Fell from 0.0 toward the table top at -0.25.
    assert!(pos.z < -0.1, "cube did not fall: z = {}", pos.z);
    assert!(pos.z > -0.35, "cube fell through the table: z = {}", pos.z);
}

#[test]
fn end_effector_tracks_target() {
    let (mut sim, _) = tabletop();
    let target = Vec3::new(0.6, 0.1, 0.1);
    for _ in 0..60 {
        sim.position_control(target, 0.0, GripperCommand::Hold).unwrap();
        sim.step().unwrap();
    }
    let ee = sim.end_effector_pose().unwrap().pos;
    assert!(ee.distance(target) < 0.02, "end effector at {ee}");
}

#[test]
fn closing_near_object_attaches_it() {
    let (mut sim, cube) = tabletop();
    // Let the cube settle first.
    for _ in 0..300 {
        sim.step().unwrap();
    }
    let cube_pos = sim.body_pose(cube).unwrap().pos;
    let hover = cube_pos + Vec3::new(0.0, 0.0, 0.05);
    for _ in 0..80 {
        sim.position_control(hover, 0.0, GripperCommand::Hold).unwrap();
        sim.step().unwrap();
    }
    for _ in 0..20 {
        sim.position_control(hover, 0.0, GripperCommand::Close).unwrap();
        sim.step().unwrap();
    }
    assert_eq!(sim.held_object(), Some(cube));

    // Lift and verify the object comes along.
    let lifted = hover + Vec3::new(0.0, 0.0, 0.3);
    for _ in 0..120 {
        sim.position_control(lifted, 0.0, GripperCommand::Close).unwrap();
        sim.step().unwrap();
    }
    let raised = sim.body_pose(cube).unwrap().pos.z;
    assert!(raised > cube_pos.z + 0.1, "cube not lifted: z = {raised}");
}

#[test]
fn wrist_angle_is_reported_back() {
    let (mut sim, _) = tabletop();
    sim.position_control(Vec3::new(0.5, 0.0, 0.2), 0.7, GripperCommand::Hold)
        .unwrap();
    sim.step().unwrap();
    assert!((sim.wrist_angle().unwrap() - 0.7).abs() < 1e-6);
}
