//! The generic renderable entity and its resource lifecycle
//!
//! One type drives every entity kind in the scene; all variation lives
//! in [`EntityConfig`]. The lifecycle is a small state machine:
//!
//! - construction fans out one bytecode fetch per active stage,
//! - `poll_loading` compiles each blob as it arrives (the vertex blob
//!   also drives input-layout creation) and, once every fetch has
//!   reported in, builds the remaining resources and uploads the mesh,
//! - the readiness flag is written last, after the index count,
//! - `render` is a strict no-op until that flag is set, then rebinds the
//!   complete pipeline every call,
//! - `release` clears the flag first and destroys each handle under its
//!   own guard, so it is safe to call at any point and safe to repeat.
//!
//! Any failure while loading is fatal for the entity and never retried.

use std::mem;

use log::{debug, warn};

use crate::assets::{spawn_fetches, AssetSources, PendingFetches};
use crate::error::RenderResult;
use crate::foundation::math::{Mat4, Transform, Vec3};
use crate::gpu::{
    BufferHandle, GpuDevice, InputLayoutHandle, RasterizerHandle, SamplerDesc, SamplerHandle,
    ShaderHandle, Stage, TextureHandle,
};
use crate::render::config::{EntityConfig, Motion};
use crate::render::constants::ConstantValues;
use crate::render::mesh::{MeshData, MeshSource};

/// Where an entity is in its resource lifecycle
enum LoadPhase {
    /// No build in progress and no resources promised
    Idle,
    /// Fetches in flight; shaders compile as blobs arrive
    Loading(PendingFetches),
    /// All resources built, readiness flag set
    Ready,
    /// A load step failed; the entity stays dormant until released
    Failed,
}

/// Every device handle an entity can hold
///
/// All optional: loading fills them in piecemeal and release takes them
/// back piecemeal, so any subset may be live at a given moment.
#[derive(Default)]
struct GpuResources {
    shaders: [Option<ShaderHandle>; 5],
    input_layout: Option<InputLayoutHandle>,
    vertex_buffer: Option<BufferHandle>,
    index_buffer: Option<BufferHandle>,
    constant_buffers: Vec<BufferHandle>,
    rasterizer: Option<RasterizerHandle>,
    sampler: Option<SamplerHandle>,
    texture: Option<TextureHandle>,
}

/// A single scene entity: one config, one mesh, one pipeline
pub struct Renderable {
    config: EntityConfig,
    assets: AssetSources,
    values: ConstantValues,
    transform: Transform,
    motion: Motion,
    resources: GpuResources,
    phase: LoadPhase,
    index_count: u32,
    loading_complete: bool,
}

impl Renderable {
    /// Create an entity and start fetching its shader bytecode
    ///
    /// Returns immediately; the fetches run on worker threads and are
    /// consumed by [`Self::poll_loading`] on the render thread.
    #[must_use]
    pub fn new(config: EntityConfig, assets: AssetSources) -> Self {
        let checked = config.validate();
        debug_assert!(
            checked.is_ok(),
            "entity config '{}' fails validation: {checked:?}",
            config.label
        );

        let transform = config.transform.clone();
        let motion = config.motion;
        let mut entity = Self {
            config,
            assets,
            values: ConstantValues::default(),
            transform,
            motion,
            resources: GpuResources::default(),
            phase: LoadPhase::Idle,
            index_count: 0,
            loading_complete: false,
        };
        entity.sync_transform();
        entity.create_device_dependent_resources();
        entity
    }

    /// Begin (or re-begin, after device loss) building GPU resources
    ///
    /// Resets the index count and readiness flag, then issues the same
    /// fetch fan-out construction performed.
    pub fn create_device_dependent_resources(&mut self) {
        self.loading_complete = false;
        self.index_count = 0;

        let pending = spawn_fetches(&self.assets.bytes, self.config.shader_requests());
        debug!(
            "'{}': fetching {} shader blobs",
            self.config.label,
            pending.outstanding()
        );
        self.phase = LoadPhase::Loading(pending);
    }

    /// Consume completed fetches and finish setup once all have arrived
    ///
    /// Called once per frame from the render thread. Cheap when nothing
    /// has arrived; a no-op outside the Loading phase. An error leaves
    /// the entity in a dormant failed state and is not retried.
    pub fn poll_loading(&mut self, device: &mut dyn GpuDevice) -> RenderResult<()> {
        let mut pending = match mem::replace(&mut self.phase, LoadPhase::Idle) {
            LoadPhase::Loading(pending) => pending,
            other => {
                self.phase = other;
                return Ok(());
            }
        };

        loop {
            match pending.poll() {
                Ok(Some((stage, bytes))) => {
                    if let Err(error) = self.compile_arrival(device, stage, &bytes) {
                        warn!("'{}': {error}", self.config.label);
                        self.phase = LoadPhase::Failed;
                        return Err(error);
                    }
                }
                Ok(None) => {
                    if pending.is_drained() {
                        break;
                    }
                    self.phase = LoadPhase::Loading(pending);
                    return Ok(());
                }
                Err(error) => {
                    warn!("'{}': {error}", self.config.label);
                    self.phase = LoadPhase::Failed;
                    return Err(error.into());
                }
            }
        }

        // Every stage has reported in: build the rest of the pipeline
        // and upload geometry in one pass.
        if let Err(error) = self.finish_setup(device) {
            warn!("'{}': {error}", self.config.label);
            self.phase = LoadPhase::Failed;
            return Err(error);
        }

        self.phase = LoadPhase::Ready;
        // The flag is written after everything else, including the
        // index count, so render never observes a half-built pipeline.
        self.loading_complete = true;
        debug!(
            "'{}': ready, {} indices",
            self.config.label, self.index_count
        );
        Ok(())
    }

    /// Compile one arrived blob; the vertex blob also fixes the input layout
    fn compile_arrival(
        &mut self,
        device: &mut dyn GpuDevice,
        stage: Stage,
        bytes: &[u8],
    ) -> RenderResult<()> {
        let shader = device.create_shader(stage, bytes)?;
        self.resources.shaders[stage.index()] = Some(shader);

        if stage == Stage::Vertex {
            let layout =
                device.create_input_layout(self.config.vertex_format.attributes(), bytes)?;
            self.resources.input_layout = Some(layout);
        }
        Ok(())
    }

    /// Build constant buffers, state objects, texture, and geometry
    fn finish_setup(&mut self, device: &mut dyn GpuDevice) -> RenderResult<()> {
        for spec in &self.config.constants {
            let buffer = device.create_constant_buffer(spec.kind.size())?;
            self.resources.constant_buffers.push(buffer);
        }

        self.resources.rasterizer = Some(device.create_rasterizer_state(self.config.rasterizer)?);

        if let Some(binding) = &self.config.texture {
            self.resources.sampler = Some(device.create_sampler_state(SamplerDesc)?);
            self.resources.texture = Some(device.create_texture(binding.file)?);
        }

        let mesh = self.resolve_mesh()?;
        debug_assert_eq!(
            mesh.stride,
            self.config.vertex_format.stride(),
            "'{}': mesh stride disagrees with declared vertex format",
            self.config.label
        );
        self.resources.vertex_buffer = Some(device.create_vertex_buffer(&mesh.vertex_bytes)?);
        self.resources.index_buffer = Some(device.create_index_buffer(&mesh.indices)?);
        self.index_count = mesh.index_count();
        Ok(())
    }

    fn resolve_mesh(&self) -> RenderResult<MeshData> {
        match &self.config.mesh {
            MeshSource::Inline(generate) => Ok(generate()),
            MeshSource::Model(name) => Ok(self.assets.models.load_model(name)?),
        }
    }

    /// Advance motion and refresh the shader-visible transform payloads
    pub fn update(&mut self, delta_seconds: f32, total_seconds: f32) {
        match self.motion {
            Motion::Static => {}
            Motion::Spin(rate) => self.transform.rotation += rate * delta_seconds,
            Motion::Linear(velocity) => self.transform.position += velocity * delta_seconds,
        }
        self.values.time.time = total_seconds;
        self.sync_transform();
    }

    /// Recompute the model matrix and offset payload from the transform
    fn sync_transform(&mut self) {
        self.values.mvp.model = self.transform.world_matrix().transpose().into();
        self.values.offset.position = self.transform.position.into();
        self.values.offset.rotation = self.transform.rotation.into();
        self.values.offset.scale = self.transform.scale.into();
    }

    /// Store the camera's view and projection matrices (transposed on copy)
    pub fn set_view_projection(&mut self, view: &Mat4, projection: &Mat4) {
        self.values.mvp.view = view.transpose().into();
        self.values.mvp.projection = projection.transpose().into();
    }

    /// Store the camera's world position
    pub fn set_camera_position(&mut self, position: Vec3) {
        self.values.set_camera_position(position);
    }

    /// Store the inverse view matrix (transposed on copy)
    pub fn set_inverse_view(&mut self, inverse_view: &Mat4) {
        self.values.inverse_view.inverse_view = inverse_view.transpose().into();
    }

    /// Store the tessellation/displacement scalar
    pub fn set_scalar(&mut self, value: f32) {
        self.values.scalar.value = value;
    }

    /// Upload constants, rebind the full pipeline, and draw
    ///
    /// Strict no-op until the readiness flag is set. Every stage is
    /// (re)bound on every call, active or not: the context is stateful
    /// across draws and remembers whatever the previous entity left
    /// behind, so unused stages get an explicit null bind.
    pub fn render(&self, device: &mut dyn GpuDevice) {
        if !self.loading_complete {
            return;
        }
        let (Some(vertex_buffer), Some(index_buffer), Some(input_layout)) = (
            self.resources.vertex_buffer,
            self.resources.index_buffer,
            self.resources.input_layout,
        ) else {
            return;
        };

        for (spec, &buffer) in self
            .config
            .constants
            .iter()
            .zip(&self.resources.constant_buffers)
        {
            device.update_constant_buffer(buffer, self.values.bytes(spec.kind));
        }

        device.set_primitive_topology(self.config.topology);
        if let Some(rasterizer) = self.resources.rasterizer {
            device.set_rasterizer_state(rasterizer);
        }
        device.set_vertex_buffer(vertex_buffer, self.config.vertex_format.stride());
        device.set_index_buffer(index_buffer);
        device.set_input_layout(input_layout);

        for stage in Stage::ALL {
            device.set_stage_shader(stage, self.resources.shaders[stage.index()]);
        }

        for (spec, &buffer) in self
            .config
            .constants
            .iter()
            .zip(&self.resources.constant_buffers)
        {
            for &(stage, slot) in &spec.bindings {
                device.set_constant_buffer(stage, slot, buffer);
            }
        }

        if let Some(binding) = &self.config.texture {
            if let (Some(sampler), Some(texture)) = (self.resources.sampler, self.resources.texture)
            {
                device.set_sampler(binding.stage, binding.slot, sampler);
                device.set_texture(binding.stage, binding.slot, texture);
            }
        }

        device.draw_indexed(self.index_count, 0, 0);
    }

    /// Destroy every live device resource this entity holds
    ///
    /// The readiness flag drops before any handle is touched, and each
    /// handle is destroyed under its own guard, so release is safe to
    /// call mid-load, after failure, and any number of times.
    pub fn release(&mut self, device: &mut dyn GpuDevice) {
        self.loading_complete = false;
        // Dropping an in-flight Loading phase discards its fetch results.
        self.phase = LoadPhase::Idle;

        for shader in &mut self.resources.shaders {
            if let Some(handle) = shader.take() {
                device.destroy_shader(handle);
            }
        }
        if let Some(handle) = self.resources.input_layout.take() {
            device.destroy_input_layout(handle);
        }
        if let Some(handle) = self.resources.vertex_buffer.take() {
            device.destroy_buffer(handle);
        }
        if let Some(handle) = self.resources.index_buffer.take() {
            device.destroy_buffer(handle);
        }
        for handle in self.resources.constant_buffers.drain(..) {
            device.destroy_buffer(handle);
        }
        if let Some(handle) = self.resources.rasterizer.take() {
            device.destroy_rasterizer_state(handle);
        }
        if let Some(handle) = self.resources.sampler.take() {
            device.destroy_sampler_state(handle);
        }
        if let Some(handle) = self.resources.texture.take() {
            device.destroy_texture(handle);
        }
    }

    /// True once the readiness flag is set
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.loading_complete
    }

    /// True if a load step failed; the entity will never become ready
    #[must_use]
    pub fn has_failed(&self) -> bool {
        matches!(self.phase, LoadPhase::Failed)
    }

    /// Index count of the uploaded mesh (0 until ready)
    #[must_use]
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// The entity's log label
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.config.label
    }

    /// Current world transform
    #[must_use]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Mutable world transform, for scene-level placement rules
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// Current motion
    #[must_use]
    pub fn motion(&self) -> Motion {
        self.motion
    }

    /// Replace the motion, for scene-level respawn rules
    pub fn set_motion(&mut self, motion: Motion) {
        self.motion = motion;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use approx::assert_relative_eq;

    use crate::assets::{ByteSource, GridModelSource, MemoryByteSource};
    use crate::error::RenderError;
    use crate::gpu::{PrimitiveTopology, RasterizerDesc, StageSet, TraceCommand, TraceDevice};
    use crate::render::config::TextureBinding;
    use crate::render::constants::{ConstantSpec, PayloadKind};
    use crate::render::vertex::{VertexFormat, VertexPosition};

    fn triangle_mesh() -> MeshData {
        MeshData::from_vertices(
            &[
                VertexPosition { position: [0.0, 0.0, 0.0] },
                VertexPosition { position: [1.0, 0.0, 0.0] },
                VertexPosition { position: [0.0, 1.0, 0.0] },
            ],
            vec![0, 1, 2],
        )
    }

    fn assets_with_blobs(names: &[&str]) -> AssetSources {
        let mut source = MemoryByteSource::new();
        for name in names {
            source.insert(*name, vec![0xAB; 16]);
        }
        let bytes: Arc<dyn ByteSource> = Arc::new(source);
        AssetSources::new(bytes, Arc::new(GridModelSource::new(4)))
    }

    fn basic_config() -> EntityConfig {
        EntityConfig {
            label: "triangle",
            shader_base: "Triangle",
            stages: StageSet::VERTEX | StageSet::PIXEL,
            topology: PrimitiveTopology::TriangleList,
            vertex_format: VertexFormat::Position,
            rasterizer: RasterizerDesc::solid(),
            constants: vec![ConstantSpec::new(
                PayloadKind::Mvp,
                &[(Stage::Vertex, 0)],
            )],
            texture: None,
            mesh: MeshSource::Inline(triangle_mesh),
            motion: Motion::Static,
            transform: Transform::identity(),
        }
    }

    /// Pump poll_loading until the entity settles (ready or error)
    fn pump(entity: &mut Renderable, device: &mut TraceDevice) -> RenderResult<()> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !entity.is_ready() {
            entity.poll_loading(device)?;
            if entity.is_ready() {
                break;
            }
            assert!(Instant::now() < deadline, "entity never became ready");
            std::thread::sleep(Duration::from_millis(1));
        }
        Ok(())
    }

    #[test]
    fn test_render_is_a_no_op_until_ready() {
        let mut device = TraceDevice::new();
        let mut entity = Renderable::new(
            basic_config(),
            assets_with_blobs(&["VS_Triangle.cso", "PS_Triangle.cso"]),
        );

        entity.render(&mut device);
        assert!(device.commands().is_empty());
        assert_eq!(device.draw_count(), 0);

        pump(&mut entity, &mut device).unwrap();
        assert!(entity.is_ready());
        assert_eq!(entity.index_count(), 3);

        entity.render(&mut device);
        assert_eq!(device.draw_count(), 1);
    }

    #[test]
    fn test_render_rebinds_every_stage_every_call() {
        let mut device = TraceDevice::new();
        let mut entity = Renderable::new(
            basic_config(),
            assets_with_blobs(&["VS_Triangle.cso", "PS_Triangle.cso"]),
        );
        pump(&mut entity, &mut device).unwrap();
        device.clear_commands();

        entity.render(&mut device);

        let stage_binds: Vec<(Stage, bool)> = device
            .commands()
            .iter()
            .filter_map(|command| match command {
                TraceCommand::SetStageShader { stage, shader } => {
                    Some((*stage, shader.is_some()))
                }
                _ => None,
            })
            .collect();
        assert_eq!(
            stage_binds,
            vec![
                (Stage::Vertex, true),
                (Stage::Hull, false),
                (Stage::Domain, false),
                (Stage::Geometry, false),
                (Stage::Pixel, true),
            ]
        );

        // Constant upload precedes the draw, draw comes last
        assert!(matches!(
            device.commands().first(),
            Some(TraceCommand::UpdateConstantBuffer { len: 192, .. })
        ));
        assert!(matches!(
            device.commands().last(),
            Some(TraceCommand::DrawIndexed {
                index_count: 3,
                base_vertex: 0,
                base_index: 0
            })
        ));
    }

    #[test]
    fn test_tessellated_pipeline_null_binds_only_geometry() {
        let mut config = basic_config();
        config.label = "patch";
        config.shader_base = "Patch";
        config.stages = StageSet::VERTEX | StageSet::HULL | StageSet::DOMAIN | StageSet::PIXEL;
        config.topology = PrimitiveTopology::PatchList4;

        let mut device = TraceDevice::new();
        let mut entity = Renderable::new(
            config,
            assets_with_blobs(&[
                "VS_Patch.cso",
                "HS_Patch.cso",
                "DS_Patch.cso",
                "PS_Patch.cso",
            ]),
        );
        pump(&mut entity, &mut device).unwrap();
        device.clear_commands();

        entity.render(&mut device);

        for command in device.commands() {
            if let TraceCommand::SetStageShader { stage, shader } = command {
                assert_eq!(shader.is_none(), *stage == Stage::Geometry, "{stage:?}");
            }
        }
        assert!(device
            .commands()
            .contains(&TraceCommand::SetTopology(PrimitiveTopology::PatchList4)));
    }

    #[test]
    fn test_constant_buffers_bind_at_declared_slots() {
        let mut config = basic_config();
        config.constants = vec![
            ConstantSpec::new(PayloadKind::Mvp, &[(Stage::Vertex, 0), (Stage::Pixel, 0)]),
            ConstantSpec::new(PayloadKind::Time, &[(Stage::Pixel, 1)]),
        ];

        let mut device = TraceDevice::new();
        let mut entity = Renderable::new(
            config,
            assets_with_blobs(&["VS_Triangle.cso", "PS_Triangle.cso"]),
        );
        pump(&mut entity, &mut device).unwrap();
        device.clear_commands();

        entity.render(&mut device);

        let binds: Vec<(Stage, u32)> = device
            .commands()
            .iter()
            .filter_map(|command| match command {
                TraceCommand::SetConstantBuffer { stage, slot, .. } => Some((*stage, *slot)),
                _ => None,
            })
            .collect();
        assert_eq!(
            binds,
            vec![(Stage::Vertex, 0), (Stage::Pixel, 0), (Stage::Pixel, 1)]
        );
    }

    #[test]
    fn test_texture_and_sampler_bind_together() {
        let mut config = basic_config();
        config.texture = Some(TextureBinding {
            file: "rock.dds",
            stage: Stage::Pixel,
            slot: 0,
        });

        let mut device = TraceDevice::new();
        let mut entity = Renderable::new(
            config,
            assets_with_blobs(&["VS_Triangle.cso", "PS_Triangle.cso"]),
        );
        pump(&mut entity, &mut device).unwrap();
        device.clear_commands();

        entity.render(&mut device);

        assert!(device.commands().iter().any(|command| matches!(
            command,
            TraceCommand::SetSampler { stage: Stage::Pixel, slot: 0, .. }
        )));
        assert!(device.commands().iter().any(|command| matches!(
            command,
            TraceCommand::SetTexture { stage: Stage::Pixel, slot: 0, .. }
        )));
    }

    #[test]
    fn test_release_is_idempotent_and_render_goes_quiet() {
        let mut device = TraceDevice::new();
        let mut entity = Renderable::new(
            basic_config(),
            assets_with_blobs(&["VS_Triangle.cso", "PS_Triangle.cso"]),
        );
        pump(&mut entity, &mut device).unwrap();
        assert!(device.live_resources() > 0);

        entity.release(&mut device);
        assert!(!entity.is_ready());
        assert_eq!(device.live_resources(), 0);

        entity.release(&mut device);
        assert_eq!(device.live_resources(), 0);

        device.clear_commands();
        entity.render(&mut device);
        assert!(device.commands().is_empty());
    }

    #[test]
    fn test_release_mid_load_drops_partial_resources() {
        let mut device = TraceDevice::new();
        let mut entity = Renderable::new(
            basic_config(),
            assets_with_blobs(&["VS_Triangle.cso", "PS_Triangle.cso"]),
        );

        // Give workers a moment, take at most one arrival, then release.
        std::thread::sleep(Duration::from_millis(5));
        let _ = entity.poll_loading(&mut device);
        entity.release(&mut device);

        assert!(!entity.is_ready());
        assert_eq!(device.live_resources(), 0);
    }

    #[test]
    fn test_device_loss_cycle_restores_readiness() {
        let mut device = TraceDevice::new();
        let mut entity = Renderable::new(
            basic_config(),
            assets_with_blobs(&["VS_Triangle.cso", "PS_Triangle.cso"]),
        );
        pump(&mut entity, &mut device).unwrap();

        entity.release(&mut device);
        assert!(!entity.is_ready());
        assert_eq!(entity.index_count(), 3);

        entity.create_device_dependent_resources();
        assert_eq!(entity.index_count(), 0);
        pump(&mut entity, &mut device).unwrap();

        assert!(entity.is_ready());
        assert_eq!(entity.index_count(), 3);
        entity.render(&mut device);
        assert_eq!(device.draw_count(), 1);
    }

    #[test]
    fn test_missing_blob_is_fatal_and_unretried() {
        let mut device = TraceDevice::new();
        let mut entity = Renderable::new(
            basic_config(),
            assets_with_blobs(&["VS_Triangle.cso"]), // no pixel blob
        );

        let error = pump(&mut entity, &mut device).unwrap_err();
        assert!(matches!(error, RenderError::Fetch(_)));
        assert!(entity.has_failed());
        assert!(!entity.is_ready());

        // Subsequent polls are silent no-ops
        entity.poll_loading(&mut device).unwrap();
        assert!(!entity.is_ready());

        entity.render(&mut device);
        assert_eq!(device.draw_count(), 0);
    }

    #[test]
    fn test_compile_failure_is_fatal() {
        let mut device = TraceDevice::new();
        device.set_fail_shader_compiles(true);
        let mut entity = Renderable::new(
            basic_config(),
            assets_with_blobs(&["VS_Triangle.cso", "PS_Triangle.cso"]),
        );

        let error = pump(&mut entity, &mut device).unwrap_err();
        assert!(matches!(error, RenderError::Device(_)));
        assert!(entity.has_failed());

        // Release still cleans up whatever was created before the fault
        entity.release(&mut device);
        assert_eq!(device.live_resources(), 0);
    }

    #[test]
    fn test_texture_creation_failure_is_fatal() {
        let mut config = basic_config();
        config.texture = Some(TextureBinding {
            file: "rock.dds",
            stage: Stage::Pixel,
            slot: 0,
        });

        let mut device = TraceDevice::new();
        device.set_fail_texture_loads(true);
        let mut entity = Renderable::new(
            config,
            assets_with_blobs(&["VS_Triangle.cso", "PS_Triangle.cso"]),
        );

        let error = pump(&mut entity, &mut device).unwrap_err();
        assert!(matches!(error, RenderError::Device(_)));
        assert!(entity.has_failed());
        assert!(!entity.is_ready());
        assert_eq!(entity.index_count(), 0);

        // Shaders, constant buffers, and state objects created before
        // the fault are still reclaimed by release
        assert!(device.live_resources() > 0);
        entity.release(&mut device);
        assert_eq!(device.live_resources(), 0);

        entity.render(&mut device);
        assert_eq!(device.draw_count(), 0);
    }

    #[test]
    fn test_entities_load_independently() {
        let mut device = TraceDevice::new();
        let mut good = Renderable::new(
            basic_config(),
            assets_with_blobs(&["VS_Triangle.cso", "PS_Triangle.cso"]),
        );
        let mut bad = Renderable::new(basic_config(), assets_with_blobs(&["VS_Triangle.cso"]));

        pump(&mut good, &mut device).unwrap();
        assert!(pump(&mut bad, &mut device).is_err());

        good.render(&mut device);
        bad.render(&mut device);
        assert_eq!(device.draw_count(), 1);
    }

    #[test]
    fn test_releasing_one_entity_leaves_the_other_ready() {
        let mut device = TraceDevice::new();
        let mut first = Renderable::new(
            basic_config(),
            assets_with_blobs(&["VS_Triangle.cso", "PS_Triangle.cso"]),
        );
        let mut second = Renderable::new(
            basic_config(),
            assets_with_blobs(&["VS_Triangle.cso", "PS_Triangle.cso"]),
        );
        pump(&mut first, &mut device).unwrap();
        pump(&mut second, &mut device).unwrap();

        first.release(&mut device);

        assert!(second.is_ready());
        second.render(&mut device);
        assert_eq!(device.draw_count(), 1);
    }

    #[test]
    fn test_spin_motion_integrates_rotation() {
        let mut config = basic_config();
        config.motion = Motion::Spin(Vec3::new(0.0, 0.0, 1.0));
        let mut entity = Renderable::new(
            config,
            assets_with_blobs(&["VS_Triangle.cso", "PS_Triangle.cso"]),
        );

        entity.update(0.5, 0.5);
        assert_relative_eq!(entity.transform().rotation.z, 0.5);

        entity.update(0.25, 0.75);
        assert_relative_eq!(entity.transform().rotation.z, 0.75);
    }

    #[test]
    fn test_linear_motion_integrates_position() {
        let mut config = basic_config();
        config.motion = Motion::Linear(Vec3::new(0.0, -1.0, 0.0));
        let mut entity = Renderable::new(
            config,
            assets_with_blobs(&["VS_Triangle.cso", "PS_Triangle.cso"]),
        );

        entity.update(0.5, 0.5);
        assert_relative_eq!(entity.transform().position.y, -0.5);
    }

    #[test]
    fn test_setters_transpose_matrices_into_payloads() {
        let mut entity = Renderable::new(
            basic_config(),
            assets_with_blobs(&["VS_Triangle.cso", "PS_Triangle.cso"]),
        );

        let view = Mat4::new_translation(&Vec3::new(1.0, 2.0, 3.0));
        let projection = Mat4::identity();
        entity.set_view_projection(&view, &projection);

        let expected: [[f32; 4]; 4] = view.transpose().into();
        assert_eq!(entity.values.mvp.view, expected);

        entity.set_camera_position(Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(entity.values.camera.position, [4.0, 5.0, 6.0]);

        entity.set_scalar(7.5);
        assert_relative_eq!(entity.values.scalar.value, 7.5);
    }

    #[test]
    fn test_update_mirrors_transform_into_offset_payload() {
        let mut config = basic_config();
        config.transform = Transform::new(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(0.1, 0.2, 0.3),
            Vec3::new(2.0, 2.0, 2.0),
        );
        let mut entity = Renderable::new(
            config,
            assets_with_blobs(&["VS_Triangle.cso", "PS_Triangle.cso"]),
        );

        entity.update(0.0, 1.0);
        assert_eq!(entity.values.offset.position, [1.0, 2.0, 3.0]);
        assert_eq!(entity.values.offset.scale, [2.0, 2.0, 2.0]);
        assert_relative_eq!(entity.values.time.time, 1.0);
    }
}
