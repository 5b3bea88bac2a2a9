//! Materials attached to meshes and segments.
//!
//! - [`MaterialLight`] - fixed-function style lighting response
//! - [`SegmentMaterial`] - per-segment opacity, textures and lighting
//! - [`MeshMaterial`] - per-mesh material reference handed to the renderer
//!
//! Texture entries are file names only. Loading them is the renderer's job.

mod types;

pub use types::{Face, MaterialLight, MeshMaterial, SegmentMaterial, TextureType};
