//! Top-level error type for the rendering protocol
//!
//! Every fault that can occur while building an entity's device-dependent
//! resources funnels into [`RenderError`]. The failure model is strict:
//! any error during the Loading phase is fatal for that entity, is never
//! retried, and propagates to the caller. Steady-state `update`/`render`
//! calls are infallible by design.

use thiserror::Error;

use crate::assets::{FetchError, ModelError};
use crate::gpu::DeviceError;

/// Errors raised while creating an entity's device-dependent resources
#[derive(Debug, Error)]
pub enum RenderError {
    /// A shader bytecode fetch failed or its worker was lost
    #[error("shader bytecode fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// The GPU device rejected a resource creation call
    #[error("device resource creation failed: {0}")]
    Device(#[from] DeviceError),

    /// The external model loader could not supply mesh data
    #[error("model load failed: {0}")]
    Model(#[from] ModelError),
}

/// Convenience alias for fallible setup paths
pub type RenderResult<T> = Result<T, RenderError>;
