//! Asset collaborators: shader bytecode fetch and model loading
//!
//! Shader blobs are fetched asynchronously at entity construction time:
//! one worker per blob, results handed back over a channel and polled
//! from the render thread. Workers only move bytes — every call that
//! touches a GPU object happens on the thread that owns the device.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use thiserror::Error;

use crate::gpu::Stage;
use crate::render::mesh::MeshData;
use crate::render::vertex::VertexFull;

/// Errors from the byte-fetch collaborator
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The named blob does not exist at the source
    #[error("shader blob '{name}' not found")]
    NotFound {
        /// Requested resource name
        name: String,
    },

    /// The source failed while reading the blob
    #[error("i/o failure reading '{name}': {message}")]
    Io {
        /// Requested resource name
        name: String,
        /// Underlying failure description
        message: String,
    },

    /// A fetch worker terminated without delivering a result
    #[error("a shader fetch worker terminated without reporting")]
    WorkerLost,
}

/// Errors from the model-load collaborator
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    /// The named model is not available
    #[error("model '{name}' is not available")]
    NotFound {
        /// Requested model name
        name: String,
    },
}

/// Asynchronous byte-fetch collaborator
///
/// Implementations must be callable from fetch worker threads.
pub trait ByteSource: Send + Sync {
    /// Fetch the raw bytes of a named resource
    fn fetch(&self, name: &str) -> Result<Vec<u8>, FetchError>;
}

/// Byte source reading blobs from a directory on disk
pub struct DirByteSource {
    root: PathBuf,
}

impl DirByteSource {
    /// Create a source rooted at the given directory
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ByteSource for DirByteSource {
    fn fetch(&self, name: &str) -> Result<Vec<u8>, FetchError> {
        let path = self.root.join(name);
        std::fs::read(&path).map_err(|error| {
            if error.kind() == std::io::ErrorKind::NotFound {
                FetchError::NotFound {
                    name: name.to_string(),
                }
            } else {
                FetchError::Io {
                    name: name.to_string(),
                    message: error.to_string(),
                }
            }
        })
    }
}

/// In-memory byte source for embedded blobs and tests
#[derive(Default)]
pub struct MemoryByteSource {
    blobs: HashMap<String, Vec<u8>>,
}

impl MemoryByteSource {
    /// Create an empty source
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named blob
    pub fn insert(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.blobs.insert(name.into(), bytes);
    }
}

impl ByteSource for MemoryByteSource {
    fn fetch(&self, name: &str) -> Result<Vec<u8>, FetchError> {
        self.blobs
            .get(name)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                name: name.to_string(),
            })
    }
}

/// Opaque model-load collaborator returning upload-ready mesh data
pub trait ModelSource: Send + Sync {
    /// Load the named model's vertex and index data
    fn load_model(&self, name: &str) -> Result<MeshData, ModelError>;
}

/// Procedural stand-in for the external model loader
///
/// Synthesizes a regular grid of full surface vertices with a gentle
/// height ripple, regardless of the requested name. Mesh-file parsing is
/// outside this crate's scope.
pub struct GridModelSource {
    resolution: u32,
}

impl GridModelSource {
    /// Create a grid generator with `resolution` quads per side
    #[must_use]
    pub fn new(resolution: u32) -> Self {
        Self {
            resolution: resolution.max(1),
        }
    }
}

impl ModelSource for GridModelSource {
    fn load_model(&self, _name: &str) -> Result<MeshData, ModelError> {
        let side = self.resolution + 1;
        let mut vertices = Vec::with_capacity((side * side) as usize);

        for row in 0..side {
            for col in 0..side {
                let u = col as f32 / self.resolution as f32;
                let v = row as f32 / self.resolution as f32;
                let height = 0.05
                    * (u * std::f32::consts::TAU * 2.0).sin()
                    * (v * std::f32::consts::TAU * 2.0).cos();
                vertices.push(VertexFull {
                    position: [u - 0.5, height, v - 0.5],
                    texcoord: [u, v],
                    normal: [0.0, 1.0, 0.0],
                    tangent: [1.0, 0.0, 0.0],
                    binormal: [0.0, 0.0, 1.0],
                });
            }
        }

        let mut indices = Vec::with_capacity((self.resolution * self.resolution * 6) as usize);
        for row in 0..self.resolution {
            for col in 0..self.resolution {
                let top_left = row * side + col;
                let top_right = top_left + 1;
                let bottom_left = top_left + side;
                let bottom_right = bottom_left + 1;
                indices.extend_from_slice(&[
                    top_left,
                    bottom_left,
                    top_right,
                    top_right,
                    bottom_left,
                    bottom_right,
                ]);
            }
        }

        Ok(MeshData::from_vertices(&vertices, indices))
    }
}

/// Shared asset collaborators cloned into every entity
///
/// Entities keep these so device-loss recovery can re-issue the exact
/// fetches construction performed.
#[derive(Clone)]
pub struct AssetSources {
    /// Shader bytecode fetcher
    pub bytes: Arc<dyn ByteSource>,
    /// Mesh-file loader
    pub models: Arc<dyn ModelSource>,
}

impl AssetSources {
    /// Bundle a byte source and model source
    #[must_use]
    pub fn new(bytes: Arc<dyn ByteSource>, models: Arc<dyn ModelSource>) -> Self {
        Self { bytes, models }
    }
}

/// In-flight fan-out of shader bytecode fetches for one entity
///
/// Holds the receiving end of the worker channel plus the number of
/// results still expected. Dropping this cancels nothing (workers run to
/// completion) but discards their results, which is exactly the release
/// semantics the protocol wants.
pub struct PendingFetches {
    rx: Receiver<(Stage, Result<Vec<u8>, FetchError>)>,
    outstanding: usize,
}

impl PendingFetches {
    /// Take the next completed fetch, if any has arrived
    ///
    /// Never blocks. `Ok(None)` means nothing is ready yet; an `Err` is
    /// a failed fetch or a lost worker and is fatal for the entity.
    pub fn poll(&mut self) -> Result<Option<(Stage, Vec<u8>)>, FetchError> {
        match self.rx.try_recv() {
            Ok((stage, Ok(bytes))) => {
                self.outstanding -= 1;
                Ok(Some((stage, bytes)))
            }
            Ok((_, Err(error))) => {
                self.outstanding -= 1;
                Err(error)
            }
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => {
                if self.outstanding == 0 {
                    Ok(None)
                } else {
                    Err(FetchError::WorkerLost)
                }
            }
        }
    }

    /// Number of fetches that have not reported back yet
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// True once every fetch has reported back
    #[must_use]
    pub fn is_drained(&self) -> bool {
        self.outstanding == 0
    }
}

/// Start one fetch worker per requested shader blob
///
/// Results arrive in completion order, not request order; the stages of
/// a pipeline have no load-order dependency on each other.
#[must_use]
pub fn spawn_fetches(
    source: &Arc<dyn ByteSource>,
    requests: Vec<(Stage, String)>,
) -> PendingFetches {
    let (tx, rx) = mpsc::channel();
    let outstanding = requests.len();

    for (stage, name) in requests {
        let tx = tx.clone();
        let source = Arc::clone(source);
        thread::spawn(move || {
            let result = source.fetch(&name);
            // The receiver may already have been released; that is fine.
            let _ = tx.send((stage, result));
        });
    }

    PendingFetches { rx, outstanding }
}
