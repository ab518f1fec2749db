//! Frame painting: dimensions, determinism, and visibility.

use glam::Vec3;
use sim::camera::Camera;
use sim::painter::{paint, PaintBody};
use sim::types::{ObjectShape, Pose};

fn demo_bodies() -> Vec<PaintBody> {
    vec![
        PaintBody {
            pose: Pose::from_pos(Vec3::new(0.7, 0.0, -0.3)),
            shape: ObjectShape::Cuboid {
                half_extents: Vec3::new(0.6, 0.8, 0.05),
            },
            color: [140, 110, 80, 255],
            is_static: true,
        },
        PaintBody {
            pose: Pose::from_pos(Vec3::new(0.7, 0.0, -0.2)),
            shape: ObjectShape::Ball { radius: 0.04 },
            color: [255, 0, 0, 255],
            is_static: false,
        },
    ]
}

fn workspace_camera() -> Camera {
    Camera::framing(Vec3::new(0.4, -0.6, -0.36), Vec3::new(1.0, 0.4, 0.25))
}

#[test]
fn frame_has_requested_dimensions() {
    let frame = paint(&demo_bodies(), &workspace_camera(), 48, 48);
    assert_eq!(frame.dimensions(), (48, 48));
}

#[test]
fn painting_is_deterministic() {
    let camera = workspace_camera();
    let a = paint(&demo_bodies(), &camera, 64, 64);
    let b = paint(&demo_bodies(), &camera, 64, 64);
    assert_eq!(a.as_raw(), b.as_raw());
}

#[test]
fn bodies_in_view_change_pixels() {
    let camera = workspace_camera();
    let empty = paint(&[], &camera, 64, 64);
    let painted = paint(&demo_bodies(), &camera, 64, 64);
    assert_ne!(empty.as_raw(), painted.as_raw());
}

#[test]
fn camera_eye_sits_at_distance() {
    let camera = workspace_camera();
    let eye = camera.eye();
    let dist = eye.distance(camera.target);
    assert!((dist - camera.distance).abs() < 1e-4);
}
