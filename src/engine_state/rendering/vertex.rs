//! Vertex and instance data layouts for box rendering.
//!
//! Every visible object is an axis-aligned box: one shared unit cube mesh drawn
//! once per `Instance`, which moves, scales and colours it.

/// A vertex of the unit cube.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes)
/// - Normal: [f32; 3] (12 bytes)
///
/// Total size: 24 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position relative to the cube centre, each component ±0.5
    position: [f32; 3],
    /// Outward face normal
    normal: [f32; 3],
}

impl Vertex {
    pub const fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }

    /// Returns the vertex buffer layout description for the shader pipeline.
    ///
    /// # Shader Attributes
    /// - `location = 0`: position (vec3<f32>)
    /// - `location = 1`: normal (vec3<f32>)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Per-instance placement of the unit cube.
///
/// # Memory Layout
/// - Offset: [f32; 3] (12 bytes)
/// - Scale: [f32; 3] (12 bytes)
/// - Color: [f32; 4] (16 bytes)
///
/// Total size: 40 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Instance {
    /// Box centre in world space
    pub offset: [f32; 3],
    /// Box size along each axis
    pub scale: [f32; 3],
    /// Linear RGBA colour
    pub color: [f32; 4],
}

impl Instance {
    /// Returns the instance buffer layout description for the shader pipeline.
    ///
    /// # Shader Attributes
    /// - `location = 2`: offset (vec3<f32>)
    /// - `location = 3`: scale (vec3<f32>)
    /// - `location = 4`: color (vec4<f32>)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
            wgpu::vertex_attr_array![2 => Float32x3, 3 => Float32x3, 4 => Float32x4];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Instance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRIBUTES,
        }
    }
}

/// The 36 vertices of a unit cube centred on the origin, counter-clockwise
/// when seen from outside.
pub fn cube_vertices() -> Vec<Vertex> {
    // Each face: normal, then the two in-plane axes (u, v) with u × v = normal.
    const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];
    const CORNERS: [(f32, f32); 6] = [
        (-0.5, -0.5),
        (0.5, -0.5),
        (0.5, 0.5),
        (-0.5, -0.5),
        (0.5, 0.5),
        (-0.5, 0.5),
    ];

    FACES
        .iter()
        .flat_map(|&(normal, u, v)| {
            CORNERS.iter().map(move |&(a, b)| {
                let position =
                    std::array::from_fn(|axis| normal[axis] * 0.5 + u[axis] * a + v[axis] * b);
                Vertex::new(position, normal)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use cgmath::{InnerSpace, Vector3};

    use super::*;

    #[test]
    fn cube_triangles_wind_outward() {
        let vertices = cube_vertices();
        assert_eq!(vertices.len(), 36);

        for triangle in vertices.chunks(3) {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|v| Vector3::from(v.position));
            let winding_normal = (b - a).cross(c - a).normalize();
            let face_normal = Vector3::from(triangle[0].normal);
            assert!((winding_normal - face_normal).magnitude() < 1e-6);
        }
    }

    #[test]
    fn cube_spans_one_unit() {
        for vertex in cube_vertices() {
            assert!(vertex.position.iter().all(|c| c.abs() == 0.5));
        }
    }
}
