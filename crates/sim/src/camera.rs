//! Orbit camera describing the viewpoint for schematic frames.

use glam::Vec3;

/// Look-at orbit camera (z-up).
///
/// Mirrors the parameterization used to frame the workspace: a target
/// point, a distance, and pitch/yaw angles in degrees.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub target: Vec3,
    pub distance: f32,
    /// Downward tilt in degrees; -90 looks straight down.
    pub pitch_deg: f32,
    /// Rotation around the vertical axis in degrees.
    pub yaw_deg: f32,
    /// Vertical field of view in degrees.
    pub fov_deg: f32,
}

impl Camera {
    /// Camera centered between the workspace bounds, matching the default
    /// framing used for observation rendering.
    #[must_use]
    pub fn framing(pos_low: Vec3, pos_high: Vec3) -> Self {
        let mut target = (pos_low + pos_high) * 0.5;
        target.z = -0.1;
        Self {
            target,
            distance: 0.8,
            pitch_deg: -45.0,
            yaw_deg: 0.0,
            fov_deg: 60.0,
        }
    }

    /// World-space eye position.
    #[must_use]
    pub fn eye(&self) -> Vec3 {
        let pitch = self.pitch_deg.to_radians();
        let yaw = self.yaw_deg.to_radians();
        let horizontal = self.distance * pitch.cos();
        let offset = Vec3::new(
            -horizontal * yaw.cos(),
            -horizontal * yaw.sin(),
            -self.distance * pitch.sin(),
        );
        self.target + offset
    }

    /// Orthonormal view basis (right, up, forward) looking at the target.
    #[must_use]
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = (self.target - self.eye()).normalize_or_zero();
        let world_up = Vec3::Z;
        let right = forward.cross(world_up).normalize_or_zero();
        let up = right.cross(forward);
        (right, up, forward)
    }
}
