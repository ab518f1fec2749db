//! Schematic frame painting.
//!
//! Produces the frames behind pixel observations and video export: bodies
//! are depth-sorted and splatted as filled primitives through a pinhole
//! projection. This is deliberately not a rendering engine; a real
//! renderer plugs in behind the [`Simulator`](crate::Simulator) trait.

use glam::Vec3;
use image::{Rgba, RgbaImage};

use crate::camera::Camera;
use crate::types::{Color, ObjectShape, Pose};

const BACKGROUND: Color = [210, 210, 214, 255];
const NEAR_PLANE: f32 = 0.05;

/// One body to paint.
#[derive(Clone, Copy, Debug)]
pub struct PaintBody {
    pub pose: Pose,
    pub shape: ObjectShape,
    pub color: Color,
    /// Static bodies are painted as projected slabs, dynamic ones as discs.
    pub is_static: bool,
}

/// Resolved projection for one frame.
struct View {
    eye: Vec3,
    right: Vec3,
    up: Vec3,
    forward: Vec3,
    focal: f32,
    width: u32,
    height: u32,
}

impl View {
    fn new(camera: &Camera, width: u32, height: u32) -> Self {
        let (right, up, forward) = camera.basis();
        let focal = (height as f32 * 0.5) / (camera.fov_deg.to_radians() * 0.5).tan();
        Self {
            eye: camera.eye(),
            right,
            up,
            forward,
            focal,
            width,
            height,
        }
    }

    /// Project a world point to pixel coordinates and view depth.
    fn project(&self, point: Vec3) -> Option<(f32, f32, f32)> {
        let rel = point - self.eye;
        let depth = rel.dot(self.forward);
        if depth < NEAR_PLANE {
            return None;
        }
        let x = self.width as f32 * 0.5 + rel.dot(self.right) * self.focal / depth;
        let y = self.height as f32 * 0.5 - rel.dot(self.up) * self.focal / depth;
        Some((x, y, depth))
    }
}

/// Paint the scene into a fresh RGBA frame.
#[must_use]
pub fn paint(bodies: &[PaintBody], camera: &Camera, width: u32, height: u32) -> RgbaImage {
    let mut frame = RgbaImage::from_pixel(width, height, Rgba(BACKGROUND));
    if width == 0 || height == 0 {
        return frame;
    }
    let view = View::new(camera, width, height);

    // Painter's order: far bodies first.
    let mut order: Vec<usize> = (0..bodies.len()).collect();
    order.sort_by(|&a, &b| {
        let da = (bodies[a].pose.pos - view.eye).dot(view.forward);
        let db = (bodies[b].pose.pos - view.eye).dot(view.forward);
        db.partial_cmp(&da).unwrap_or(std::cmp::Ordering::Equal)
    });

    for idx in order {
        let body = &bodies[idx];
        if body.is_static {
            paint_slab(&mut frame, body, &view);
        } else {
            paint_disc(&mut frame, body, &view);
        }
    }
    frame
}

fn paint_disc(frame: &mut RgbaImage, body: &PaintBody, view: &View) {
    let Some((cx, cy, depth)) = view.project(body.pose.pos) else {
        return;
    };
    let radius = (body.shape.bounding_radius() * view.focal / depth).max(1.0);

    let x0 = (cx - radius).floor().max(0.0) as u32;
    let x1 = (cx + radius).ceil().min(view.width as f32 - 1.0) as u32;
    let y0 = (cy - radius).floor().max(0.0) as u32;
    let y1 = (cy + radius).ceil().min(view.height as f32 - 1.0) as u32;
    let r2 = radius * radius;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            if dx * dx + dy * dy <= r2 {
                frame.put_pixel(x, y, Rgba(body.color));
            }
        }
    }
}

fn paint_slab(frame: &mut RgbaImage, body: &PaintBody, view: &View) {
    let ObjectShape::Cuboid { half_extents } = body.shape else {
        paint_disc(frame, body, view);
        return;
    };

    let mut min_x = f32::MAX;
    let mut max_x = f32::MIN;
    let mut min_y = f32::MAX;
    let mut max_y = f32::MIN;
    let mut visible = false;
    for sx in [-1.0, 1.0] {
        for sy in [-1.0, 1.0] {
            for sz in [-1.0, 1.0] {
                let corner = body.pose.pos
                    + body.pose.rot
                        * Vec3::new(
                            sx * half_extents.x,
                            sy * half_extents.y,
                            sz * half_extents.z,
                        );
                if let Some((px, py, _)) = view.project(corner) {
                    visible = true;
                    min_x = min_x.min(px);
                    max_x = max_x.max(px);
                    min_y = min_y.min(py);
                    max_y = max_y.max(py);
                }
            }
        }
    }
    if !visible {
        return;
    }

    let x0 = min_x.floor().max(0.0) as u32;
    let x1 = max_x.ceil().min(view.width as f32 - 1.0) as u32;
    let y0 = min_y.floor().max(0.0) as u32;
    let y1 = max_y.ceil().min(view.height as f32 - 1.0) as u32;
    for y in y0..=y1 {
        for x in x0..=x1 {
            frame.put_pixel(x, y, Rgba(body.color));
        }
    }
}
