//! Frame encoding.
//!
//! The pipeline manager owns the depth buffer and the box renderer, and turns a
//! surface texture into one submitted render pass per frame.

use wgpu::{Device, Queue, SurfaceConfiguration, SurfaceTexture, TextureFormat};

use crate::engine_state::{buffer_state::BufferState, camera_state::camera::CameraUniform};

use super::{block_renderer::BlockRenderer, texture::DepthTexture};

/// Sky colour behind the scene.
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.35,
    g: 0.6,
    b: 0.9,
    a: 1.0,
};

/// Manages the render pass and the resources it draws with.
pub struct PipelineManager {
    /// Depth texture used for depth testing
    pub depth_texture: DepthTexture,
    /// Renderer for every box in the scene
    pub block_renderer: BlockRenderer,
}

impl PipelineManager {
    /// Creates a new `PipelineManager` instance.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `config` - Surface configuration containing size and format
    /// * `texture_format` - The texture format to use for rendering
    /// * `buffer_state` - Registry the renderer's buffers are created in
    /// * `camera_uniform` - Initial camera data
    pub fn new(
        device: &Device,
        config: &SurfaceConfiguration,
        texture_format: TextureFormat,
        buffer_state: &mut BufferState,
        camera_uniform: &CameraUniform,
    ) -> Self {
        let depth_texture = DepthTexture::new(device, config, "DEPTH TEXTURE");
        let block_renderer =
            BlockRenderer::new(device, buffer_state, texture_format, camera_uniform);

        Self {
            depth_texture,
            block_renderer,
        }
    }

    /// Renders a frame into `frame` and presents it.
    ///
    /// # Arguments
    /// * `frame` - The acquired surface texture
    /// * `device` - The WebGPU device
    /// * `queue` - The WebGPU queue for command submission
    /// * `buffer_state` - Registry holding the already written frame data
    /// * `instance_count` - Number of boxes in the instance buffer
    pub fn render(
        &self,
        frame: SurfaceTexture,
        device: &Device,
        queue: &Queue,
        buffer_state: &BufferState,
        instance_count: u32,
    ) {
        let view = frame.texture.create_view(&Default::default());
        let mut encoder = device.create_command_encoder(&Default::default());
        {
            let depth_stencil_attachment = Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            });
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment,
                ..Default::default()
            });
            self.block_renderer
                .render(&mut rpass, buffer_state, instance_count);
        }

        queue.submit([encoder.finish()]);
        frame.present();
    }

    /// Recreates the depth texture for a new surface size.
    pub fn resize(&mut self, device: &Device, config: &SurfaceConfiguration) {
        self.depth_texture = DepthTexture::new(device, config, "DEPTH TEXTURE");
    }
}
