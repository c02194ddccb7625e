//! # Scene Cameras
//!
//! Yaw/pitch cameras. The renderer only needs the view and projection
//! matrices; gameplay reads the horizontal facing through [`Camera::yaw`].
//!
//! # Coordinate System
//! Right-handed, Y-up. A yaw of zero looks down +X and positive yaw turns
//! towards +Z, matching the movement basis in [`crate::character`].

use crate::foundation::math::{utils, Mat4, Point3, Vec3, UP};

/// Pitch stays just short of straight up or down so the view basis never degenerates
const MAX_PITCH: f32 = 89.0_f32 * (std::f32::consts::PI / 180.0);

/// 3D perspective camera
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Horizontal facing in radians
    pub yaw: f32,

    /// Vertical look angle in radians, positive looks up
    pub pitch: f32,

    /// Field of view angle in radians
    pub fov: f32,

    /// Aspect ratio (width / height) for projection calculations
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a new perspective camera looking down +X
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Field of view angle in degrees
    /// * `aspect` - Aspect ratio (width / height) of the viewport
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Update camera position in world space
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        log::trace!("Camera position updated to: {:?}", position);
    }

    /// Turn by the given yaw and pitch deltas, clamping pitch
    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw = (self.yaw + delta_yaw).rem_euclid(std::f32::consts::TAU);
        self.pitch = (self.pitch + delta_pitch).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Point the camera at `target`
    ///
    /// Looking straight up or down keeps the current yaw.
    pub fn look_at(&mut self, target: Vec3) {
        let direction = target - self.position;
        let horizontal = (direction.x * direction.x + direction.z * direction.z).sqrt();
        if horizontal > f32::EPSILON {
            self.yaw = direction.z.atan2(direction.x);
        }
        self.pitch = direction.y.atan2(horizontal).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Unit view direction
    pub fn forward(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(cos_yaw * cos_pitch, sin_pitch, sin_yaw * cos_pitch)
    }

    /// Update camera aspect ratio for viewport changes
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if (self.aspect - aspect).abs() > 0.01 {
            log::info!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
    }

    /// World-to-camera transformation
    pub fn get_view_matrix(&self) -> Mat4 {
        let eye = Point3::from(self.position);
        Mat4::look_at_rh(&eye, &(eye + self.forward()), &UP)
    }

    /// Perspective projection matrix
    pub fn get_projection_matrix(&self) -> Mat4 {
        Mat4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(Vec3::new(0.0, 2.0, 0.0), 75.0, 16.0 / 9.0, 0.1, 100.0)
    }
}
