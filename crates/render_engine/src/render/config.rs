//! Per-entity render configuration
//!
//! All per-kind variation in the scene is data: one config describes an
//! entity's shader set, topology, vertex format, constant-buffer slot
//! contract, optional texture, geometry source and motion. A single
//! renderable type interprets it.

use crate::foundation::math::{Transform, Vec3};
use crate::gpu::{PrimitiveTopology, RasterizerDesc, Stage, StageSet};
use crate::render::constants::ConstantSpec;
use crate::render::mesh::MeshSource;
use crate::render::vertex::VertexFormat;

/// A texture and the sampler slot it is bound to
#[derive(Debug, Clone)]
pub struct TextureBinding {
    /// Image file name passed to the device
    pub file: &'static str,
    /// Stage the texture and sampler are bound to
    pub stage: Stage,
    /// Resource slot at that stage
    pub slot: u32,
}

/// How an entity moves each frame
#[derive(Debug, Clone, Copy)]
pub enum Motion {
    /// Transform never changes
    Static,
    /// Euler rotation advances at the given radians per second
    Spin(Vec3),
    /// Position advances at the given units per second
    Linear(Vec3),
}

/// Complete description of one entity kind
#[derive(Debug, Clone)]
pub struct EntityConfig {
    /// Name used in logs
    pub label: &'static str,
    /// Shader family name; per-stage file names derive from it
    pub shader_base: &'static str,
    /// Programmable stages this entity's pipeline uses
    pub stages: StageSet,
    /// Primitive topology set before every draw
    pub topology: PrimitiveTopology,
    /// Vertex format, fixing both stride and input layout
    pub vertex_format: VertexFormat,
    /// Rasterizer state description
    pub rasterizer: RasterizerDesc,
    /// Constant buffers and their fixed slot contract
    pub constants: Vec<ConstantSpec>,
    /// Optional texture + sampler binding
    pub texture: Option<TextureBinding>,
    /// Where geometry comes from
    pub mesh: MeshSource,
    /// Frame-to-frame motion
    pub motion: Motion,
    /// Initial world transform
    pub transform: Transform,
}

/// Reason a config fails validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFault {
    /// The vertex stage is missing from the stage set
    MissingVertexStage,
    /// A patch-list topology without both tessellation stages
    PatchWithoutTessellation,
    /// A constant buffer bound at a stage the pipeline does not use
    BindingOnInactiveStage(Stage),
    /// The texture bound at a stage the pipeline does not use
    TextureOnInactiveStage(Stage),
}

impl EntityConfig {
    /// File name of this entity's shader blob for one stage
    ///
    /// Follows the compiled-shader naming scheme: stage prefix,
    /// underscore, family name, `.cso`.
    #[must_use]
    pub fn shader_file(&self, stage: Stage) -> String {
        format!("{}_{}.cso", stage.prefix(), self.shader_base)
    }

    /// All `(stage, file)` fetch requests for this entity
    #[must_use]
    pub fn shader_requests(&self) -> Vec<(Stage, String)> {
        Stage::ALL
            .into_iter()
            .filter(|stage| self.stages.contains(stage.flag()))
            .map(|stage| (stage, self.shader_file(stage)))
            .collect()
    }

    /// Check the internal consistency rules a config must satisfy
    ///
    /// Configs are authored in code, so a fault here is a programming
    /// error; the catalog tests run this over every entry.
    pub fn validate(&self) -> Result<(), ConfigFault> {
        if !self.stages.contains(StageSet::VERTEX) {
            return Err(ConfigFault::MissingVertexStage);
        }

        let is_patch = matches!(
            self.topology,
            PrimitiveTopology::PatchList3
                | PrimitiveTopology::PatchList4
                | PrimitiveTopology::PatchList16
        );
        if is_patch && !self.stages.contains(StageSet::HULL | StageSet::DOMAIN) {
            return Err(ConfigFault::PatchWithoutTessellation);
        }

        for spec in &self.constants {
            for &(stage, _) in &spec.bindings {
                if !self.stages.contains(stage.flag()) {
                    return Err(ConfigFault::BindingOnInactiveStage(stage));
                }
            }
        }

        if let Some(texture) = &self.texture {
            if !self.stages.contains(texture.stage.flag()) {
                return Err(ConfigFault::TextureOnInactiveStage(texture.stage));
            }
        }

        Ok(())
    }
}
