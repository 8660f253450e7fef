//! GPU device abstraction
//!
//! The engine never talks to a concrete graphics API. Everything an
//! entity needs from the device — resource creation, per-draw pipeline
//! binding, and teardown — goes through the [`GpuDevice`] trait, which
//! models a stateful immediate-mode context: bindings persist across
//! draw calls until overwritten, which is why entities must explicitly
//! null-bind every stage they do not use.
//!
//! All GPU-touching calls are confined to the single thread that owns
//! the device; the trait is deliberately `&mut self` throughout.

mod trace;

pub use trace::{TraceCommand, TraceDevice};

use bitflags::bitflags;
use thiserror::Error;

/// Programmable pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Vertex shader stage (always active for every entity)
    Vertex,
    /// Hull shader stage (tessellation control)
    Hull,
    /// Domain shader stage (tessellation evaluation)
    Domain,
    /// Geometry shader stage
    Geometry,
    /// Pixel shader stage
    Pixel,
}

impl Stage {
    /// All stages in fixed binding order
    pub const ALL: [Self; 5] = [
        Self::Vertex,
        Self::Hull,
        Self::Domain,
        Self::Geometry,
        Self::Pixel,
    ];

    /// Conventional two-letter file prefix for compiled shader blobs
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Vertex => "VS",
            Self::Hull => "HS",
            Self::Domain => "DS",
            Self::Geometry => "GS",
            Self::Pixel => "PS",
        }
    }

    /// Dense index for per-stage storage
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Vertex => 0,
            Self::Hull => 1,
            Self::Domain => 2,
            Self::Geometry => 3,
            Self::Pixel => 4,
        }
    }

    /// The stage as a single-bit [`StageSet`]
    #[must_use]
    pub const fn flag(self) -> StageSet {
        match self {
            Self::Vertex => StageSet::VERTEX,
            Self::Hull => StageSet::HULL,
            Self::Domain => StageSet::DOMAIN,
            Self::Geometry => StageSet::GEOMETRY,
            Self::Pixel => StageSet::PIXEL,
        }
    }
}

bitflags! {
    /// Set of active pipeline stages declared by an entity
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StageSet: u8 {
        /// Vertex shader
        const VERTEX = 1;
        /// Hull shader
        const HULL = 1 << 1;
        /// Domain shader
        const DOMAIN = 1 << 2;
        /// Geometry shader
        const GEOMETRY = 1 << 3;
        /// Pixel shader
        const PIXEL = 1 << 4;
    }
}

/// Primitive topology bound before each draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTopology {
    /// Unconnected points
    PointList,
    /// Unconnected triangles
    TriangleList,
    /// 3-control-point patches (tessellated triangles)
    PatchList3,
    /// 4-control-point patches (tessellated quads)
    PatchList4,
    /// 16-control-point patches (bicubic surfaces)
    PatchList16,
}

impl PrimitiveTopology {
    /// Control points per patch, if this is a patch topology
    #[must_use]
    pub const fn control_points(self) -> Option<u32> {
        match self {
            Self::PointList | Self::TriangleList => None,
            Self::PatchList3 => Some(3),
            Self::PatchList4 => Some(4),
            Self::PatchList16 => Some(16),
        }
    }
}

/// Face culling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    /// No culling
    None,
    /// Cull front faces
    Front,
    /// Cull back faces
    Back,
}

/// Polygon fill mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMode {
    /// Filled polygons
    Solid,
    /// Wireframe rendering
    Wireframe,
}

/// Rasterizer state description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterizerDesc {
    /// Face culling mode
    pub cull: CullMode,
    /// Polygon fill mode
    pub fill: FillMode,
}

impl Default for RasterizerDesc {
    fn default() -> Self {
        Self {
            cull: CullMode::None,
            fill: FillMode::Solid,
        }
    }
}

impl RasterizerDesc {
    /// Solid fill with no culling (the scene default)
    #[must_use]
    pub const fn solid() -> Self {
        Self {
            cull: CullMode::None,
            fill: FillMode::Solid,
        }
    }

    /// Wireframe fill with no culling
    #[must_use]
    pub const fn wireframe() -> Self {
        Self {
            cull: CullMode::None,
            fill: FillMode::Wireframe,
        }
    }
}

/// Sampler state description (default linear filtering / wrap addressing)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SamplerDesc;

/// Scalar format of a single vertex attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeFormat {
    /// Two 32-bit floats
    Float2,
    /// Three 32-bit floats
    Float3,
}

impl AttributeFormat {
    /// Size of the attribute in bytes
    #[must_use]
    pub const fn size(self) -> u32 {
        match self {
            Self::Float2 => 8,
            Self::Float3 => 12,
        }
    }
}

/// One element of an input-layout description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Shader-facing semantic name
    pub semantic: &'static str,
    /// Scalar format
    pub format: AttributeFormat,
    /// Byte offset from the start of the vertex
    pub offset: u32,
}

slotmap::new_key_type! {
    /// Opaque handle to a compiled shader object
    pub struct ShaderHandle;
    /// Opaque handle to a GPU buffer
    pub struct BufferHandle;
    /// Opaque handle to an input layout
    pub struct InputLayoutHandle;
    /// Opaque handle to a rasterizer state object
    pub struct RasterizerHandle;
    /// Opaque handle to a sampler state object
    pub struct SamplerHandle;
    /// Opaque handle to a texture resource view
    pub struct TextureHandle;
}

/// Errors surfaced by the device collaborator
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Shader bytecode was rejected during compilation
    #[error("shader compilation rejected: {0}")]
    ShaderCompile(String),

    /// A buffer, layout, or state object could not be created
    #[error("resource creation failed: {0}")]
    CreationFailed(String),

    /// A texture could not be loaded or its view created
    #[error("texture load failed: {0}")]
    TextureLoad(String),
}

/// Logical GPU device and immediate rendering context
///
/// Creation calls may fail and are only used during an entity's Loading
/// phase. Per-frame binding calls are infallible: by the time an entity
/// renders, every handle it passes is one this device handed out.
/// Destruction calls are idempotent; destroying a stale handle is a
/// no-op.
pub trait GpuDevice {
    // --- resource creation -------------------------------------------------

    /// Compile a shader object for the given stage from raw bytecode
    fn create_shader(&mut self, stage: Stage, bytecode: &[u8]) -> Result<ShaderHandle, DeviceError>;

    /// Create an input layout validated against the vertex shader bytecode
    fn create_input_layout(
        &mut self,
        attributes: &[VertexAttribute],
        vs_bytecode: &[u8],
    ) -> Result<InputLayoutHandle, DeviceError>;

    /// Create an immutable vertex buffer with initial data
    fn create_vertex_buffer(&mut self, data: &[u8]) -> Result<BufferHandle, DeviceError>;

    /// Create an immutable index buffer with initial data
    fn create_index_buffer(&mut self, indices: &[u32]) -> Result<BufferHandle, DeviceError>;

    /// Create a constant buffer of the given size with undefined contents
    fn create_constant_buffer(&mut self, size: usize) -> Result<BufferHandle, DeviceError>;

    /// Create a rasterizer state object
    fn create_rasterizer_state(&mut self, desc: RasterizerDesc)
        -> Result<RasterizerHandle, DeviceError>;

    /// Create a sampler state object
    fn create_sampler_state(&mut self, desc: SamplerDesc) -> Result<SamplerHandle, DeviceError>;

    /// Load a texture by name and create its shader resource view
    fn create_texture(&mut self, name: &str) -> Result<TextureHandle, DeviceError>;

    // --- per-frame context calls -------------------------------------------

    /// Upload new contents into a constant buffer
    fn update_constant_buffer(&mut self, buffer: BufferHandle, data: &[u8]);

    /// Bind the primitive topology for subsequent draws
    fn set_primitive_topology(&mut self, topology: PrimitiveTopology);

    /// Bind a rasterizer state
    fn set_rasterizer_state(&mut self, state: RasterizerHandle);

    /// Bind the vertex buffer at slot 0 with a fixed stride
    fn set_vertex_buffer(&mut self, buffer: BufferHandle, stride: u32);

    /// Bind the index buffer (32-bit indices)
    fn set_index_buffer(&mut self, buffer: BufferHandle);

    /// Bind an input layout
    fn set_input_layout(&mut self, layout: InputLayoutHandle);

    /// Bind a shader to a stage, or explicitly disable the stage
    ///
    /// Passing `None` unbinds the stage. The context is stateful across
    /// draws, so callers must null-bind every stage they do not use.
    fn set_stage_shader(&mut self, stage: Stage, shader: Option<ShaderHandle>);

    /// Bind a constant buffer to a stage slot
    fn set_constant_buffer(&mut self, stage: Stage, slot: u32, buffer: BufferHandle);

    /// Bind a sampler to a stage slot
    fn set_sampler(&mut self, stage: Stage, slot: u32, sampler: SamplerHandle);

    /// Bind a texture view to a stage slot
    fn set_texture(&mut self, stage: Stage, slot: u32, texture: TextureHandle);

    /// Issue one indexed draw call
    fn draw_indexed(&mut self, index_count: u32, base_vertex: i32, base_index: u32);

    // --- teardown ----------------------------------------------------------

    /// Release a shader object (no-op on stale handles)
    fn destroy_shader(&mut self, shader: ShaderHandle);

    /// Release a buffer (no-op on stale handles)
    fn destroy_buffer(&mut self, buffer: BufferHandle);

    /// Release an input layout (no-op on stale handles)
    fn destroy_input_layout(&mut self, layout: InputLayoutHandle);

    /// Release a rasterizer state (no-op on stale handles)
    fn destroy_rasterizer_state(&mut self, state: RasterizerHandle);

    /// Release a sampler state (no-op on stale handles)
    fn destroy_sampler_state(&mut self, sampler: SamplerHandle);

    /// Release a texture view (no-op on stale handles)
    fn destroy_texture(&mut self, texture: TextureHandle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order_is_fixed() {
        assert_eq!(Stage::ALL[0], Stage::Vertex);
        assert_eq!(Stage::ALL[4], Stage::Pixel);
        for (i, stage) in Stage::ALL.iter().enumerate() {
            assert_eq!(stage.index(), i);
        }
    }

    #[test]
    fn test_patch_control_points() {
        assert_eq!(PrimitiveTopology::PatchList3.control_points(), Some(3));
        assert_eq!(PrimitiveTopology::PatchList4.control_points(), Some(4));
        assert_eq!(PrimitiveTopology::PatchList16.control_points(), Some(16));
        assert_eq!(PrimitiveTopology::PointList.control_points(), None);
        assert_eq!(PrimitiveTopology::TriangleList.control_points(), None);
    }

    #[test]
    fn test_stage_flags_are_disjoint() {
        let mut seen = StageSet::empty();
        for stage in Stage::ALL {
            assert!(!seen.intersects(stage.flag()));
            seen |= stage.flag();
        }
        assert_eq!(seen, StageSet::all());
    }
}
