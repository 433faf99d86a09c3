//! Rendering system for the sandbox.
//!
//! Owns the WebGPU surface, device and queue, mirrors the world into a
//! `Scene` of box instances, and draws it once per frame.

use log::{debug, error, warn};
use wgpu::{Device, Queue, Surface, SurfaceConfiguration};
use web_time::Instant;

use pipeline_manager::PipelineManager;
pub use scene::Scene;

use super::{
    buffer_state::BufferState,
    camera_state::camera::CameraUniform,
    simulation::{SimulationState, WorldEvent},
    voxels::world::World,
};

mod block_renderer;
mod pipeline_manager;
pub mod scene;
mod texture;
pub mod vertex;

pub const CAMERA_BUFFER_NAME: &str = "camera uniform";
pub const CUBE_VERTEX_BUFFER_NAME: &str = "cube vertices";
pub const INSTANCE_BUFFER_NAME: &str = "block instances";

/// Manages the entire rendering pipeline.
///
/// This struct is the main entry point for all rendering operations.
pub struct SceneRenderer {
    /// The WebGPU surface being rendered to
    pub surface: Surface<'static>,
    /// Configuration for the surface (size, format, etc.)
    pub surface_config: SurfaceConfiguration,
    pub device: Device,
    pub queue: Queue,
    buffer_state: BufferState,
    pipeline_manager: PipelineManager,
    scene: Scene,
}

impl SceneRenderer {
    /// Creates the renderer for an already configured surface.
    ///
    /// # Arguments
    /// * `surface` - The WebGPU surface to render to
    /// * `surface_config` - Configuration the surface was configured with
    /// * `device` - The WebGPU device
    /// * `queue` - The WebGPU queue
    /// * `camera_uniform` - Initial camera data
    /// * `scene` - Instances mirroring the initial world
    pub fn new(
        surface: Surface<'static>,
        surface_config: SurfaceConfiguration,
        device: Device,
        queue: Queue,
        camera_uniform: &CameraUniform,
        scene: Scene,
    ) -> Self {
        let mut buffer_state = BufferState::new(device.clone(), queue.clone());
        let pipeline_manager = PipelineManager::new(
            &device,
            &surface_config,
            surface_config.format,
            &mut buffer_state,
            camera_uniform,
        );

        Self {
            surface,
            surface_config,
            device,
            queue,
            buffer_state,
            pipeline_manager,
            scene,
        }
    }

    /// Handles window resize events.
    ///
    /// Zero-sized windows (minimised) are ignored; the surface keeps its last size.
    ///
    /// # Returns
    /// `true` if the surface was reconfigured
    pub fn resize_surface(&mut self, size: winit::dpi::PhysicalSize<u32>) -> bool {
        if size.width == 0 || size.height == 0 {
            return false;
        }

        self.surface_config.width = size.width;
        self.surface_config.height = size.height;
        self.surface.configure(&self.device, &self.surface_config);
        self.pipeline_manager
            .resize(&self.device, &self.surface_config);
        true
    }

    /// Mirrors the world changes of one frame into the scene.
    pub fn apply_world_events(&mut self, events: &[WorldEvent], world: &World) {
        if !events.is_empty() {
            self.scene.apply_events(events, world);
            debug!("Scene holds {} blocks", self.scene.block_count());
        }
    }

    /// Uploads the camera data for the next frame.
    pub fn update_camera(&mut self, camera_uniform: &CameraUniform) {
        self.buffer_state
            .write_buffer(CAMERA_BUFFER_NAME, bytemuck::bytes_of(camera_uniform));
    }

    /// Renders a new frame.
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped; other
    /// acquisition failures are logged and the frame skipped.
    pub fn render(&mut self, simulation: &SimulationState, now: Instant) {
        let instances = self.scene.instances(simulation, now);
        self.buffer_state
            .write_buffer(INSTANCE_BUFFER_NAME, bytemuck::cast_slice(&instances));

        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(err @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                warn!("Surface {err:?}, reconfiguring");
                self.surface.configure(&self.device, &self.surface_config);
                return;
            }
            Err(err) => {
                error!("Error getting current frame: {:?}", err);
                return;
            }
        };

        self.pipeline_manager.render(
            frame,
            &self.device,
            &self.queue,
            &self.buffer_state,
            instances.len() as u32,
        );
    }
}
