//! Closed set of vertex formats used by the scene
//!
//! Every entity declares exactly one format; its input layout and bound
//! stride are derived from the same table, so they cannot drift apart.

use bytemuck::{Pod, Zeroable};

use crate::gpu::{AttributeFormat, VertexAttribute};

/// Position-only vertex
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct VertexPosition {
    /// Position in model space
    pub position: [f32; 3],
}

/// Position + color vertex
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct VertexPositionColor {
    /// Position in model space
    pub position: [f32; 3],
    /// RGB vertex color
    pub color: [f32; 3],
}

/// Full surface vertex with tangent frame, used by model-loaded meshes
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct VertexFull {
    /// Position in model space
    pub position: [f32; 3],
    /// Texture coordinates
    pub texcoord: [f32; 2],
    /// Surface normal
    pub normal: [f32; 3],
    /// Surface tangent
    pub tangent: [f32; 3],
    /// Surface binormal
    pub binormal: [f32; 3],
}

const POSITION_ATTRIBUTES: [VertexAttribute; 1] = [VertexAttribute {
    semantic: "POSITION",
    format: AttributeFormat::Float3,
    offset: 0,
}];

const POSITION_COLOR_ATTRIBUTES: [VertexAttribute; 2] = [
    VertexAttribute {
        semantic: "POSITION",
        format: AttributeFormat::Float3,
        offset: 0,
    },
    VertexAttribute {
        semantic: "COLOR",
        format: AttributeFormat::Float3,
        offset: 12,
    },
];

const FULL_ATTRIBUTES: [VertexAttribute; 5] = [
    VertexAttribute {
        semantic: "POSITION",
        format: AttributeFormat::Float3,
        offset: 0,
    },
    VertexAttribute {
        semantic: "TEXCOORD",
        format: AttributeFormat::Float2,
        offset: 12,
    },
    VertexAttribute {
        semantic: "NORMAL",
        format: AttributeFormat::Float3,
        offset: 20,
    },
    VertexAttribute {
        semantic: "TANGENT",
        format: AttributeFormat::Float3,
        offset: 32,
    },
    VertexAttribute {
        semantic: "BINORMAL",
        format: AttributeFormat::Float3,
        offset: 44,
    },
];

/// Vertex format declared by an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexFormat {
    /// [`VertexPosition`]
    Position,
    /// [`VertexPositionColor`]
    PositionColor,
    /// [`VertexFull`]
    Full,
}

impl VertexFormat {
    /// Vertex stride in bytes
    #[must_use]
    pub const fn stride(self) -> u32 {
        match self {
            Self::Position => std::mem::size_of::<VertexPosition>() as u32,
            Self::PositionColor => std::mem::size_of::<VertexPositionColor>() as u32,
            Self::Full => std::mem::size_of::<VertexFull>() as u32,
        }
    }

    /// Input-layout attribute table for this format
    #[must_use]
    pub const fn attributes(self) -> &'static [VertexAttribute] {
        match self {
            Self::Position => &POSITION_ATTRIBUTES,
            Self::PositionColor => &POSITION_COLOR_ATTRIBUTES,
            Self::Full => &FULL_ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strides_match_pod_sizes() {
        assert_eq!(VertexFormat::Position.stride(), 12);
        assert_eq!(VertexFormat::PositionColor.stride(), 24);
        assert_eq!(VertexFormat::Full.stride(), 56);
    }

    #[test]
    fn test_attribute_offsets_are_packed() {
        for format in [
            VertexFormat::Position,
            VertexFormat::PositionColor,
            VertexFormat::Full,
        ] {
            let mut expected_offset = 0;
            for attribute in format.attributes() {
                assert_eq!(attribute.offset, expected_offset, "{format:?}");
                expected_offset += attribute.format.size();
            }
            // No trailing padding: the attributes span the whole stride
            assert_eq!(expected_offset, format.stride(), "{format:?}");
        }
    }
}
