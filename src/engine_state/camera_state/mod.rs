//! # Camera State Management
//!
//! This module is the look controller of the sandbox:
//! - Orientation from raw mouse motion while the pointer is locked
//! - The facing direction consumed by the simulation
//! - Eye placement on top of the avatar
//! - View and projection matrices for the renderer
//!
//! ## Core Components
//! - `Camera`: eye position plus yaw and pitch
//! - `Projection`: perspective projection settings
//! - `CameraUniform`: GPU representation of camera data for shaders

use cgmath::{Deg, Point3, Rad, Vector3};

use crate::config::CameraConfig;

pub mod camera;

/// Direction towards the scene's directional light.
const LIGHT_DIRECTION: Vector3<f32> = Vector3::new(10.0, 20.0, 10.0);

/// Manages the camera: orientation, eye position, projection and shader data.
pub struct CameraState {
    /// The current camera position and orientation
    pub camera: camera::Camera,
    /// Perspective projection for the current surface size
    pub projection: camera::Projection,
    /// GPU-optimized camera data for shaders
    pub camera_uniform: camera::CameraUniform,
    /// Whether mouse motion turns the camera (pointer locked)
    look_enabled: bool,
    /// Radians per pixel of mouse motion
    sensitivity: f32,
}

impl CameraState {
    /// Creates a camera at `eye`, looking along -Z.
    ///
    /// # Arguments
    /// * `config` - Field of view, clip planes and mouse sensitivity
    /// * `eye` - Initial eye position
    /// * `width` - Surface width in pixels
    /// * `height` - Surface height in pixels
    pub fn new(config: &CameraConfig, eye: Point3<f32>, width: u32, height: u32) -> Self {
        let camera = camera::Camera::new(eye, Rad(0.0), Rad(0.0));
        let projection = camera::Projection::new(
            width,
            height,
            Deg(config.fov_degrees),
            config.znear,
            config.zfar,
        );

        let mut camera_uniform = camera::CameraUniform::new(LIGHT_DIRECTION);
        camera_uniform.update_view_proj_and_pos(&camera, &projection);

        Self {
            camera,
            projection,
            camera_uniform,
            look_enabled: false,
            sensitivity: config.mouse_sensitivity,
        }
    }

    /// Enables or disables mouse look, following the pointer lock.
    pub fn set_look_enabled(&mut self, enabled: bool) {
        self.look_enabled = enabled;
    }

    pub fn is_look_enabled(&self) -> bool {
        self.look_enabled
    }

    /// Applies mouse motion gathered since the last frame.
    ///
    /// Motion is ignored while the pointer is not locked.
    pub fn intake_mouse_delta(&mut self, delta: Option<(f64, f64)>) {
        if !self.look_enabled {
            return;
        }
        if let Some((delta_x, delta_y)) = delta {
            self.camera
                .rotate(delta_x as f32, delta_y as f32, self.sensitivity);
        }
    }

    /// Unit vector the camera looks along.
    pub fn facing(&self) -> Vector3<f32> {
        self.camera.get_view_vec()
    }

    /// Moves the eye to a new position.
    pub fn follow(&mut self, eye: Point3<f32>) {
        self.camera.position = eye;
    }

    /// Updates the projection for a new surface size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.resize(width, height);
    }

    /// Recomputes the shader data from the current camera and projection.
    pub fn update_uniform(&mut self) -> &camera::CameraUniform {
        self.camera_uniform
            .update_view_proj_and_pos(&self.camera, &self.projection);
        &self.camera_uniform
    }
}
