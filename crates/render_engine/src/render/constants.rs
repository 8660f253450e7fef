//! Constant-buffer payload types
//!
//! A closed set of fixed-layout blobs uploaded verbatim to the GPU once
//! per frame. Padding fields exist only to satisfy the 16-byte alignment
//! rule for constant buffers and carry no meaning.

use bytemuck::{Pod, Zeroable};

use crate::foundation::math::{Mat4, Vec3};
use crate::gpu::Stage;

/// Model/view/projection matrix triple
///
/// Matrices are stored pre-transposed for the target shader convention;
/// the setters on [`crate::render::Renderable`] perform the transpose.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ModelViewProjection {
    /// Transposed world matrix
    pub model: [[f32; 4]; 4],
    /// Transposed view matrix
    pub view: [[f32; 4]; 4],
    /// Transposed projection matrix
    pub projection: [[f32; 4]; 4],
}

impl Default for ModelViewProjection {
    fn default() -> Self {
        let identity: [[f32; 4]; 4] = Mat4::identity().into();
        Self {
            model: identity,
            view: identity,
            projection: identity,
        }
    }
}

/// Camera world position
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct CameraPosition {
    /// Camera position in world space
    pub position: [f32; 3],
    /// Alignment padding
    pub padding: f32,
}

/// Total elapsed scene time
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct TimePayload {
    /// Total seconds since scene start
    pub time: f32,
    /// Alignment padding
    pub padding: [f32; 3],
}

/// Single scalar factor (tessellation or displacement power)
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ScalarPayload {
    /// The scalar value
    pub value: f32,
    /// Alignment padding
    pub padding: [f32; 3],
}

/// Inverse view matrix for ray generation
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct InverseView {
    /// Transposed inverse view matrix
    pub inverse_view: [[f32; 4]; 4],
}

impl Default for InverseView {
    fn default() -> Self {
        Self {
            inverse_view: Mat4::identity().into(),
        }
    }
}

/// Entity transform mirrored into shader-visible form
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct OffsetPayload {
    /// World position
    pub position: [f32; 3],
    /// Euler rotation
    pub rotation: [f32; 3],
    /// Per-axis scale
    pub scale: [f32; 3],
    /// Alignment padding
    pub padding: [f32; 3],
}

/// Which payload a constant buffer carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// [`ModelViewProjection`]
    Mvp,
    /// [`CameraPosition`]
    Camera,
    /// [`TimePayload`]
    Time,
    /// [`ScalarPayload`]
    Scalar,
    /// [`InverseView`]
    InverseView,
    /// [`OffsetPayload`]
    Offset,
}

impl PayloadKind {
    /// Size of the payload blob in bytes
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::Mvp => std::mem::size_of::<ModelViewProjection>(),
            Self::Camera => std::mem::size_of::<CameraPosition>(),
            Self::Time => std::mem::size_of::<TimePayload>(),
            Self::Scalar => std::mem::size_of::<ScalarPayload>(),
            Self::InverseView => std::mem::size_of::<InverseView>(),
            Self::Offset => std::mem::size_of::<OffsetPayload>(),
        }
    }
}

/// One constant buffer an entity declares, with its fixed slot contract
///
/// Slot indices are part of the shader interface and never change at
/// runtime; a buffer may feed several stages at different slots.
#[derive(Debug, Clone)]
pub struct ConstantSpec {
    /// Payload carried by this buffer
    pub kind: PayloadKind,
    /// `(stage, slot)` pairs the buffer is bound to every frame
    pub bindings: Vec<(Stage, u32)>,
}

impl ConstantSpec {
    /// Declare a constant buffer bound at the given stage slots
    #[must_use]
    pub fn new(kind: PayloadKind, bindings: &[(Stage, u32)]) -> Self {
        Self {
            kind,
            bindings: bindings.to_vec(),
        }
    }
}

/// Current values for every payload an entity can hold
///
/// Entities only upload the subset their config declares, but holding
/// all of them keeps the setter surface uniform across entity kinds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstantValues {
    /// Matrix triple
    pub mvp: ModelViewProjection,
    /// Camera world position
    pub camera: CameraPosition,
    /// Elapsed time
    pub time: TimePayload,
    /// Tessellation/displacement scalar
    pub scalar: ScalarPayload,
    /// Inverse view matrix
    pub inverse_view: InverseView,
    /// Mirrored transform
    pub offset: OffsetPayload,
}

impl ConstantValues {
    /// The raw bytes to upload for one payload kind
    #[must_use]
    pub fn bytes(&self, kind: PayloadKind) -> &[u8] {
        match kind {
            PayloadKind::Mvp => bytemuck::bytes_of(&self.mvp),
            PayloadKind::Camera => bytemuck::bytes_of(&self.camera),
            PayloadKind::Time => bytemuck::bytes_of(&self.time),
            PayloadKind::Scalar => bytemuck::bytes_of(&self.scalar),
            PayloadKind::InverseView => bytemuck::bytes_of(&self.inverse_view),
            PayloadKind::Offset => bytemuck::bytes_of(&self.offset),
        }
    }

    /// Write the camera position payload
    pub fn set_camera_position(&mut self, position: Vec3) {
        self.camera.position = position.into();
    }
}
