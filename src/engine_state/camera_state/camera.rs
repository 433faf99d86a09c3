//! # Camera Implementation
//!
//! This module contains the core camera implementation including:
//! - First-person yaw/pitch orientation driven by mouse motion
//! - Projection matrix handling
//! - GPU uniform buffer layout
//!
//! Yaw 0 and pitch 0 look along -Z. Positive yaw turns left, positive pitch
//! looks up.

use cgmath::*;
use std::f32::consts::FRAC_PI_2;

/// Transformation matrix to convert from OpenGL's coordinate system to WGPU's.
///
/// Scales and translates the Z coordinate from [-1, 1] to [0, 1].
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Pitch limit, just short of straight up or down so the view matrix stays defined
pub const SAFE_FRAC_PI_2: f32 = FRAC_PI_2 - 0.0001;

/// A first-person camera in 3D space.
#[derive(Debug, Clone)]
pub struct Camera {
    /// The eye position in world space
    pub position: Point3<f32>,
    /// Rotation around the Y axis
    pub yaw: Rad<f32>,
    /// Rotation around the camera's X axis
    pub pitch: Rad<f32>,
}

impl Camera {
    /// Creates a new camera with the specified position and orientation.
    ///
    /// # Arguments
    /// * `position` - Initial eye position
    /// * `yaw` - Initial yaw; 0 looks along -Z
    /// * `pitch` - Initial pitch; clamped to the safe range
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        let mut camera = Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
        };
        camera.clamp_pitch();
        camera
    }

    /// Unit vector the camera looks along.
    pub fn get_view_vec(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.0.sin_cos();
        Vector3::new(-yaw_sin * pitch_cos, pitch_sin, -yaw_cos * pitch_cos).normalize()
    }

    /// Turns the camera by a mouse movement.
    ///
    /// Moving the mouse right turns right, moving it down looks down.
    ///
    /// # Arguments
    /// * `delta_x` - Horizontal movement in pixels
    /// * `delta_y` - Vertical movement in pixels
    /// * `sensitivity` - Radians per pixel
    pub fn rotate(&mut self, delta_x: f32, delta_y: f32, sensitivity: f32) {
        self.yaw -= Rad(delta_x * sensitivity);
        self.pitch -= Rad(delta_y * sensitivity);
        self.clamp_pitch();
    }

    fn clamp_pitch(&mut self) {
        if self.pitch < -Rad(SAFE_FRAC_PI_2) {
            self.pitch = -Rad(SAFE_FRAC_PI_2);
        } else if self.pitch > Rad(SAFE_FRAC_PI_2) {
            self.pitch = Rad(SAFE_FRAC_PI_2);
        }
    }

    /// Calculates the view matrix for this camera.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.get_view_vec(), Vector3::unit_y())
    }
}

/// A camera's projection matrix and related parameters.
#[derive(Debug, Clone)]
pub struct Projection {
    /// Aspect ratio (width / height)
    aspect: f32,
    /// Vertical field of view in radians
    fovy: Rad<f32>,
    /// Near clipping plane distance
    znear: f32,
    /// Far clipping plane distance
    zfar: f32,
}

impl Projection {
    /// Creates a new projection with the given parameters.
    ///
    /// # Arguments
    /// * `width` - Viewport width in pixels
    /// * `height` - Viewport height in pixels
    /// * `fovy` - Vertical field of view
    /// * `znear` - Near clipping plane distance
    /// * `zfar` - Far clipping plane distance
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: aspect_ratio(width, height),
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    /// Updates the projection's aspect ratio for viewport resizing.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = aspect_ratio(width, height);
    }

    /// Calculates the projection matrix in WGPU clip space.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

/// GPU-friendly representation of camera data for shaders.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    // cgmath types are not Pod, so matrices are stored as plain arrays
    view_proj: [[f32; 4]; 4],
    position: [f32; 4],
    light_direction: [f32; 4],
}

impl CameraUniform {
    /// Creates a uniform with an identity matrix and the given light direction.
    ///
    /// # Arguments
    /// * `light_direction` - Direction towards the light, normalized here
    pub fn new(light_direction: Vector3<f32>) -> Self {
        let light = light_direction.normalize();
        Self {
            view_proj: Matrix4::identity().into(),
            position: [0.0, 0.0, 0.0, 1.0],
            light_direction: [light.x, light.y, light.z, 0.0],
        }
    }

    /// Updates the view-projection matrix and eye position.
    pub fn update_view_proj_and_pos(&mut self, camera: &Camera, projection: &Projection) {
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
        self.position = [camera.position.x, camera.position.y, camera.position.z, 1.0];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn default_orientation_looks_down_negative_z() {
        let camera = Camera::new(Point3::new(0.0, 1.5, 0.0), Rad(0.0), Rad(0.0));
        let view = camera.get_view_vec();
        assert!((view - Vector3::new(0.0, 0.0, -1.0)).magnitude() < EPSILON);
    }

    #[test]
    fn mouse_right_turns_right() {
        let mut camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Rad(0.0), Rad(0.0));
        // A quarter turn at 0.002 rad per pixel.
        camera.rotate(FRAC_PI_2 / 0.002, 0.0, 0.002);

        let view = camera.get_view_vec();
        assert!((view - Vector3::new(1.0, 0.0, 0.0)).magnitude() < 1e-3);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Rad(0.0), Rad(0.0));
        camera.rotate(0.0, -100_000.0, 0.002);
        assert_eq!(camera.pitch, Rad(SAFE_FRAC_PI_2));
        assert!(camera.get_view_vec().y > 0.999);

        camera.rotate(0.0, 200_000.0, 0.002);
        assert_eq!(camera.pitch, -Rad(SAFE_FRAC_PI_2));
    }

    #[test]
    fn zero_height_viewport_keeps_a_finite_aspect() {
        let projection = Projection::new(800, 0, Deg(75.0), 0.1, 1000.0);
        assert!(projection.aspect.is_finite());
    }
}
