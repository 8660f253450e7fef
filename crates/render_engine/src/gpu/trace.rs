//! Tracing reference implementation of the device trait
//!
//! [`TraceDevice`] keeps every created resource in a slotmap and records
//! each context call as a [`TraceCommand`]. It backs the headless demo
//! and the protocol tests: assertions run against the recorded command
//! stream instead of a live GPU.

use slotmap::SlotMap;

use super::{
    BufferHandle, DeviceError, GpuDevice, InputLayoutHandle, PrimitiveTopology, RasterizerDesc,
    RasterizerHandle, SamplerDesc, SamplerHandle, ShaderHandle, Stage, TextureHandle,
    VertexAttribute,
};

/// One recorded context call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceCommand {
    /// `update_constant_buffer`
    UpdateConstantBuffer {
        /// Target buffer
        buffer: BufferHandle,
        /// Byte length of the uploaded payload
        len: usize,
    },
    /// `set_primitive_topology`
    SetTopology(PrimitiveTopology),
    /// `set_rasterizer_state`
    SetRasterizer(RasterizerHandle),
    /// `set_vertex_buffer`
    SetVertexBuffer {
        /// Bound buffer
        buffer: BufferHandle,
        /// Vertex stride in bytes
        stride: u32,
    },
    /// `set_index_buffer`
    SetIndexBuffer(BufferHandle),
    /// `set_input_layout`
    SetInputLayout(InputLayoutHandle),
    /// `set_stage_shader` — `None` is an explicit null bind
    SetStageShader {
        /// Target stage
        stage: Stage,
        /// Bound shader, or `None` to disable the stage
        shader: Option<ShaderHandle>,
    },
    /// `set_constant_buffer`
    SetConstantBuffer {
        /// Target stage
        stage: Stage,
        /// Slot index
        slot: u32,
        /// Bound buffer
        buffer: BufferHandle,
    },
    /// `set_sampler`
    SetSampler {
        /// Target stage
        stage: Stage,
        /// Slot index
        slot: u32,
        /// Bound sampler
        sampler: SamplerHandle,
    },
    /// `set_texture`
    SetTexture {
        /// Target stage
        stage: Stage,
        /// Slot index
        slot: u32,
        /// Bound texture view
        texture: TextureHandle,
    },
    /// `draw_indexed`
    DrawIndexed {
        /// Index count
        index_count: u32,
        /// Base vertex location
        base_vertex: i32,
        /// First index location
        base_index: u32,
    },
}

#[derive(Debug)]
struct ShaderRecord {
    stage: Stage,
    #[allow(dead_code)] // retained for inspection while debugging traces
    bytecode_len: usize,
}

#[derive(Debug)]
struct BufferRecord {
    #[allow(dead_code)] // retained for inspection while debugging traces
    kind: BufferKind,
    size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BufferKind {
    Vertex,
    Index,
    Constant,
}

/// Recording device used by tests and the headless demo
#[derive(Default)]
pub struct TraceDevice {
    shaders: SlotMap<ShaderHandle, ShaderRecord>,
    buffers: SlotMap<BufferHandle, BufferRecord>,
    layouts: SlotMap<InputLayoutHandle, usize>,
    rasterizers: SlotMap<RasterizerHandle, RasterizerDesc>,
    samplers: SlotMap<SamplerHandle, SamplerDesc>,
    textures: SlotMap<TextureHandle, String>,
    commands: Vec<TraceCommand>,
    draw_count: u64,
    fail_shader_compiles: bool,
    fail_texture_loads: bool,
}

impl TraceDevice {
    /// Create an empty trace device
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded context calls since the last [`Self::clear_commands`]
    #[must_use]
    pub fn commands(&self) -> &[TraceCommand] {
        &self.commands
    }

    /// Discard the recorded command stream (resource state is kept)
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Total draw calls issued over the device's lifetime
    #[must_use]
    pub fn draw_count(&self) -> u64 {
        self.draw_count
    }

    /// Number of currently live resources of all kinds
    #[must_use]
    pub fn live_resources(&self) -> usize {
        self.shaders.len()
            + self.buffers.len()
            + self.layouts.len()
            + self.rasterizers.len()
            + self.samplers.len()
            + self.textures.len()
    }

    /// Number of currently live shader objects
    #[must_use]
    pub fn live_shaders(&self) -> usize {
        self.shaders.len()
    }

    /// Stage a shader handle was created for, if it is still live
    #[must_use]
    pub fn shader_stage(&self, shader: ShaderHandle) -> Option<Stage> {
        self.shaders.get(shader).map(|record| record.stage)
    }

    /// Make subsequent `create_shader` calls fail (fault injection)
    pub fn set_fail_shader_compiles(&mut self, fail: bool) {
        self.fail_shader_compiles = fail;
    }

    /// Make subsequent `create_texture` calls fail (fault injection)
    pub fn set_fail_texture_loads(&mut self, fail: bool) {
        self.fail_texture_loads = fail;
    }

    fn record(&mut self, command: TraceCommand) {
        self.commands.push(command);
    }
}

impl GpuDevice for TraceDevice {
    fn create_shader(&mut self, stage: Stage, bytecode: &[u8]) -> Result<ShaderHandle, DeviceError> {
        if self.fail_shader_compiles {
            return Err(DeviceError::ShaderCompile(format!(
                "injected failure for {} stage",
                stage.prefix()
            )));
        }
        if bytecode.is_empty() {
            return Err(DeviceError::ShaderCompile(format!(
                "empty bytecode for {} stage",
                stage.prefix()
            )));
        }
        Ok(self.shaders.insert(ShaderRecord {
            stage,
            bytecode_len: bytecode.len(),
        }))
    }

    fn create_input_layout(
        &mut self,
        attributes: &[VertexAttribute],
        vs_bytecode: &[u8],
    ) -> Result<InputLayoutHandle, DeviceError> {
        if attributes.is_empty() || vs_bytecode.is_empty() {
            return Err(DeviceError::CreationFailed(
                "input layout requires attributes and vertex bytecode".to_string(),
            ));
        }
        Ok(self.layouts.insert(attributes.len()))
    }

    fn create_vertex_buffer(&mut self, data: &[u8]) -> Result<BufferHandle, DeviceError> {
        if data.is_empty() {
            return Err(DeviceError::CreationFailed(
                "vertex buffer with no initial data".to_string(),
            ));
        }
        Ok(self.buffers.insert(BufferRecord {
            kind: BufferKind::Vertex,
            size: data.len(),
        }))
    }

    fn create_index_buffer(&mut self, indices: &[u32]) -> Result<BufferHandle, DeviceError> {
        if indices.is_empty() {
            return Err(DeviceError::CreationFailed(
                "index buffer with no initial data".to_string(),
            ));
        }
        Ok(self.buffers.insert(BufferRecord {
            kind: BufferKind::Index,
            size: indices.len() * std::mem::size_of::<u32>(),
        }))
    }

    fn create_constant_buffer(&mut self, size: usize) -> Result<BufferHandle, DeviceError> {
        if size == 0 || size % 16 != 0 {
            return Err(DeviceError::CreationFailed(format!(
                "constant buffer size {size} is not a positive multiple of 16"
            )));
        }
        Ok(self.buffers.insert(BufferRecord {
            kind: BufferKind::Constant,
            size,
        }))
    }

    fn create_rasterizer_state(
        &mut self,
        desc: RasterizerDesc,
    ) -> Result<RasterizerHandle, DeviceError> {
        Ok(self.rasterizers.insert(desc))
    }

    fn create_sampler_state(&mut self, desc: SamplerDesc) -> Result<SamplerHandle, DeviceError> {
        Ok(self.samplers.insert(desc))
    }

    fn create_texture(&mut self, name: &str) -> Result<TextureHandle, DeviceError> {
        if self.fail_texture_loads {
            return Err(DeviceError::TextureLoad(format!("injected failure for '{name}'")));
        }
        Ok(self.textures.insert(name.to_string()))
    }

    fn update_constant_buffer(&mut self, buffer: BufferHandle, data: &[u8]) {
        debug_assert!(
            self.buffers.get(buffer).is_some_and(|b| b.size == data.len()),
            "constant upload size must match buffer size"
        );
        self.record(TraceCommand::UpdateConstantBuffer {
            buffer,
            len: data.len(),
        });
    }

    fn set_primitive_topology(&mut self, topology: PrimitiveTopology) {
        self.record(TraceCommand::SetTopology(topology));
    }

    fn set_rasterizer_state(&mut self, state: RasterizerHandle) {
        self.record(TraceCommand::SetRasterizer(state));
    }

    fn set_vertex_buffer(&mut self, buffer: BufferHandle, stride: u32) {
        self.record(TraceCommand::SetVertexBuffer { buffer, stride });
    }

    fn set_index_buffer(&mut self, buffer: BufferHandle) {
        self.record(TraceCommand::SetIndexBuffer(buffer));
    }

    fn set_input_layout(&mut self, layout: InputLayoutHandle) {
        self.record(TraceCommand::SetInputLayout(layout));
    }

    fn set_stage_shader(&mut self, stage: Stage, shader: Option<ShaderHandle>) {
        debug_assert!(
            shader.is_none_or(|s| self.shaders.get(s).is_some_and(|r| r.stage == stage)),
            "shader bound to a stage it was not compiled for"
        );
        self.record(TraceCommand::SetStageShader { stage, shader });
    }

    fn set_constant_buffer(&mut self, stage: Stage, slot: u32, buffer: BufferHandle) {
        self.record(TraceCommand::SetConstantBuffer { stage, slot, buffer });
    }

    fn set_sampler(&mut self, stage: Stage, slot: u32, sampler: SamplerHandle) {
        self.record(TraceCommand::SetSampler { stage, slot, sampler });
    }

    fn set_texture(&mut self, stage: Stage, slot: u32, texture: TextureHandle) {
        self.record(TraceCommand::SetTexture { stage, slot, texture });
    }

    fn draw_indexed(&mut self, index_count: u32, base_vertex: i32, base_index: u32) {
        self.draw_count += 1;
        self.record(TraceCommand::DrawIndexed {
            index_count,
            base_vertex,
            base_index,
        });
    }

    fn destroy_shader(&mut self, shader: ShaderHandle) {
        self.shaders.remove(shader);
    }

    fn destroy_buffer(&mut self, buffer: BufferHandle) {
        self.buffers.remove(buffer);
    }

    fn destroy_input_layout(&mut self, layout: InputLayoutHandle) {
        self.layouts.remove(layout);
    }

    fn destroy_rasterizer_state(&mut self, state: RasterizerHandle) {
        self.rasterizers.remove(state);
    }

    fn destroy_sampler_state(&mut self, sampler: SamplerHandle) {
        self.samplers.remove(sampler);
    }

    fn destroy_texture(&mut self, texture: TextureHandle) {
        self.textures.remove(texture);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destroy_is_idempotent() {
        let mut device = TraceDevice::new();
        let shader = device.create_shader(Stage::Vertex, b"code").unwrap();
        assert_eq!(device.live_shaders(), 1);

        device.destroy_shader(shader);
        assert_eq!(device.live_shaders(), 0);

        // Second destroy of the same handle is a no-op
        device.destroy_shader(shader);
        assert_eq!(device.live_shaders(), 0);
    }

    #[test]
    fn test_constant_buffer_size_must_align() {
        let mut device = TraceDevice::new();
        assert!(device.create_constant_buffer(48).is_ok());
        assert!(device.create_constant_buffer(20).is_err());
        assert!(device.create_constant_buffer(0).is_err());
    }

    #[test]
    fn test_shader_compile_fault_injection() {
        let mut device = TraceDevice::new();
        device.set_fail_shader_compiles(true);
        assert!(device.create_shader(Stage::Pixel, b"code").is_err());

        device.set_fail_shader_compiles(false);
        assert!(device.create_shader(Stage::Pixel, b"code").is_ok());
    }

    #[test]
    fn test_draw_calls_are_counted_and_recorded() {
        let mut device = TraceDevice::new();
        device.draw_indexed(6, 0, 0);
        device.draw_indexed(36, 0, 0);

        assert_eq!(device.draw_count(), 2);
        assert_eq!(
            device.commands().last(),
            Some(&TraceCommand::DrawIndexed {
                index_count: 36,
                base_vertex: 0,
                base_index: 0
            })
        );
    }
}
