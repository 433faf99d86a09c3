//! Box renderer.
//!
//! Draws every box in the scene with one instanced draw call: the shared unit
//! cube from the vertex buffer, once per entry in the instance buffer.
//!
//! # Bindings
//!
//! - Group 0, binding 0: camera uniform (view-projection, eye, light direction)
//! - Vertex buffer 0: cube vertices
//! - Vertex buffer 1: instances

use bytemuck::Zeroable;
use wgpu::{util::DeviceExt, BindGroup, Device, RenderPass, RenderPipeline, TextureFormat};

use crate::engine_state::{buffer_state::BufferState, camera_state::camera::CameraUniform};

use super::{
    texture::DepthTexture,
    vertex::{cube_vertices, Instance, Vertex},
    CAMERA_BUFFER_NAME, CUBE_VERTEX_BUFFER_NAME, INSTANCE_BUFFER_NAME,
};

/// Instances the instance buffer can hold before it first has to grow.
const INITIAL_INSTANCE_CAPACITY: usize = 256;

/// Renders instanced boxes with Lambert shading.
pub struct BlockRenderer {
    render_pipeline: RenderPipeline,
    camera_bind_group: BindGroup,
    vertex_count: u32,
}

impl BlockRenderer {
    /// Creates the pipeline and the buffers it draws from.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `buffer_state` - Registry the camera, cube and instance buffers are created in
    /// * `texture_format` - Format of the surface being rendered to
    /// * `camera_uniform` - Initial camera data
    pub fn new(
        device: &Device,
        buffer_state: &mut BufferState,
        texture_format: TextureFormat,
        camera_uniform: &CameraUniform,
    ) -> Self {
        let vertices = cube_vertices();
        buffer_state.create_buffer_init(
            CUBE_VERTEX_BUFFER_NAME,
            wgpu::util::BufferInitDescriptor {
                label: Some("Cube Vertex Buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );
        buffer_state.create_buffer_init(
            INSTANCE_BUFFER_NAME,
            wgpu::util::BufferInitDescriptor {
                label: Some("Instance Buffer"),
                contents: bytemuck::cast_slice(&[Instance::zeroed(); INITIAL_INSTANCE_CAPACITY]),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            },
        );

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::bytes_of(camera_uniform),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("camera_bind_group_layout"),
            });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });
        buffer_state.insert_buffer(
            CAMERA_BUFFER_NAME,
            camera_buffer,
            std::mem::size_of::<CameraUniform>() as u64,
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Block Render Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Block Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/block.wgsl").into()),
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Block Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::desc(), Instance::desc()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: texture_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(DepthTexture::depth_stencil_state()),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        Self {
            render_pipeline,
            camera_bind_group,
            vertex_count: vertices.len() as u32,
        }
    }

    /// Records the draw of `instance_count` boxes.
    ///
    /// Nothing is drawn if a buffer is missing from the registry.
    pub fn render(
        &self,
        render_pass: &mut RenderPass<'_>,
        buffer_state: &BufferState,
        instance_count: u32,
    ) {
        let (Some(vertex_buffer), Some(instance_buffer)) = (
            buffer_state.get_buffer(CUBE_VERTEX_BUFFER_NAME),
            buffer_state.get_buffer(INSTANCE_BUFFER_NAME),
        ) else {
            log::error!("Block buffers missing, skipping draw");
            return;
        };

        render_pass.set_pipeline(&self.render_pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, instance_buffer.slice(..));
        render_pass.draw(0..self.vertex_count, 0..instance_count);
    }
}
