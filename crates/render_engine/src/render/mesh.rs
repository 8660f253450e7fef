//! CPU-side mesh data staged for GPU buffer upload

use bytemuck::Pod;

/// Vertex and index data ready to upload into GPU buffers
///
/// Vertex data is kept as raw bytes with an explicit stride so one mesh
/// type serves every vertex format in the closed set. Indices are
/// uniformly 32-bit.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    /// Tightly packed vertex data
    pub vertex_bytes: Vec<u8>,
    /// Size of one vertex in bytes
    pub stride: u32,
    /// Triangle/patch/point indices
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Pack a typed vertex slice and index list into upload-ready form
    #[must_use]
    pub fn from_vertices<V: Pod>(vertices: &[V], indices: Vec<u32>) -> Self {
        Self {
            vertex_bytes: bytemuck::cast_slice(vertices).to_vec(),
            stride: std::mem::size_of::<V>() as u32,
            indices,
        }
    }

    /// Number of vertices in the buffer
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        if self.stride == 0 {
            return 0;
        }
        self.vertex_bytes.len() / self.stride as usize
    }

    /// Number of indices
    #[must_use]
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// Where an entity's geometry comes from
#[derive(Debug, Clone)]
pub enum MeshSource {
    /// Generated in-process (static arrays or procedural point clouds)
    Inline(fn() -> MeshData),
    /// Loaded through the external model collaborator
    Model(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytemuck::{Pod, Zeroable};

    #[repr(C)]
    #[derive(Clone, Copy, Pod, Zeroable)]
    struct TestVertex {
        position: [f32; 3],
    }

    #[test]
    fn test_from_vertices_packs_stride_and_counts() {
        let vertices = [
            TestVertex { position: [0.0, 0.0, 0.0] },
            TestVertex { position: [1.0, 0.0, 0.0] },
            TestVertex { position: [0.0, 1.0, 0.0] },
        ];
        let mesh = MeshData::from_vertices(&vertices, vec![0, 1, 2]);

        assert_eq!(mesh.stride, 12);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.index_count(), 3);
        assert_eq!(mesh.vertex_bytes.len(), 36);
    }
}
