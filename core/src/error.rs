//! Error types for tessellation and mesh assembly.
//!
//! Every variant is a programmer error: a misuse of the builder protocol or
//! malformed input geometry. Construction aborts at the point of detection
//! instead of producing a mesh that would fail later on the GPU.

use thiserror::Error;

use crate::mesh::{AttributeChannel, Topology};

/// Errors raised by the tessellator, the configuration pool and meshes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("topology {0:?} cannot be converted to triangles")]
    UnsupportedTopology(Topology),
    #[error("{channel:?} data has {actual} components, expected {expected}")]
    AttributeSizeMismatch {
        channel: AttributeChannel,
        actual: usize,
        expected: usize,
    },
    #[error("segment '{0}' must contain at least one vertex or have draw commands")]
    EmptySegment(String),
    #[error("segment '{0}' is already attached to the mesh")]
    DuplicateSegment(String),
    #[error("segment '{0}' was not found")]
    SegmentNotFound(String),
    #[error("unknown renderable configuration handle: {0}")]
    InvalidHandle(u32),
    #[error("invalid component count {count} for {channel:?}")]
    InvalidComponentCount {
        channel: AttributeChannel,
        count: usize,
    },
    #[error("segment index {index} out of range (mesh has {len} segments)")]
    SegmentIndexOutOfRange { index: usize, len: usize },
    #[error("the extension has not been registered: {0}")]
    UnknownExtension(String),
    #[error("the extension has already been registered: {0}")]
    ExtensionAlreadyRegistered(String),
    #[error("the filename must have an extension: {0}")]
    MissingExtension(String),
    #[error("failed to read '{filename}': {message}")]
    ReaderFailed { filename: String, message: String },
}

impl MeshError {
    pub(crate) fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }
}

pub type MeshResult<T> = Result<T, MeshError>;
