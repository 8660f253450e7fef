//! # Render Engine
//!
//! A per-entity GPU resource lifecycle engine for a stateful
//! immediate-mode pipeline.
//!
//! ## Features
//!
//! - **Async Shader Loading**: Per-stage bytecode fetch fan-out with
//!   compile-on-arrival and a single setup step at the join
//! - **Readiness Gating**: Entities draw nothing until every resource
//!   they need exists; the readiness flag is the last thing written
//! - **Full Pipeline Rebinding**: Every draw rebinds all five stages,
//!   explicitly null-binding the ones it does not use
//! - **Device-Loss Recovery**: Idempotent release plus full recreation
//!   from retained configs and asset sources
//! - **Data-Driven Scene**: One renderable type, twelve catalog configs
//! - **Headless Testing**: A tracing device records the command stream
//!   so the whole protocol is testable without a GPU
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use render_engine::assets::{AssetSources, ByteSource, DirByteSource, GridModelSource};
//! use render_engine::foundation::time::Timer;
//! use render_engine::gpu::TraceDevice;
//! use render_engine::scene::{CameraFrame, SceneComposer};
//!
//! let bytes: Arc<dyn ByteSource> = Arc::new(DirByteSource::new("shaders"));
//! let assets = AssetSources::new(bytes, Arc::new(GridModelSource::new(50)));
//!
//! let mut device = TraceDevice::new();
//! let mut scene = SceneComposer::new(assets, 10, 0xC0FFEE);
//! let mut timer = Timer::new();
//!
//! let camera = CameraFrame {
//!     view: render_engine::foundation::math::Mat4::identity(),
//!     projection: render_engine::foundation::math::Mat4::identity(),
//!     position: render_engine::foundation::math::Vec3::new(0.0, 1.5, 8.0),
//! };
//!
//! loop {
//!     timer.tick();
//!     scene.poll_loading(&mut device);
//!     scene.update(&mut device, timer.delta_time(), timer.total_time());
//!     scene.render(&mut device, &camera);
//! }
//! ```

pub mod assets;
pub mod error;
pub mod foundation;
pub mod gpu;
pub mod render;
pub mod scene;

pub use error::{RenderError, RenderResult};

/// Commonly used types, importable in one line
pub mod prelude {
    pub use crate::assets::{AssetSources, ByteSource, ModelSource};
    pub use crate::error::{RenderError, RenderResult};
    pub use crate::foundation::math::{Mat4, Transform, Vec3};
    pub use crate::foundation::time::Timer;
    pub use crate::gpu::{GpuDevice, PrimitiveTopology, Stage, StageSet, TraceDevice};
    pub use crate::render::{EntityConfig, Motion, Renderable};
    pub use crate::scene::{CameraFrame, SceneComposer};
}
