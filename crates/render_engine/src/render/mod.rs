//! Entity rendering: configs, constant payloads, meshes, and the
//! lifecycle-driven renderable itself

pub mod config;
pub mod constants;
pub mod entity;
pub mod mesh;
pub mod vertex;

pub use config::{EntityConfig, Motion, TextureBinding};
pub use constants::{ConstantSpec, ConstantValues, PayloadKind};
pub use entity::Renderable;
pub use mesh::{MeshData, MeshSource};
pub use vertex::VertexFormat;
