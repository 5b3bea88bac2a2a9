//! Mesh data types, assembly and procedural shapes.
//!
//! This module provides:
//!
//! - [`RenderableConfiguration`] - Numeric layout of one vertex record
//! - [`Topology`] and [`Segment`] - Finished batches of flat attribute arrays
//! - [`Mesh`] - Validated segment collection with aggregate flags and bounds
//! - [`DrawPlan`] - How a renderer should submit a mesh
//! - [`MeshReader`] - Extension-dispatched model loading
//! - [`generators`] - Procedural shapes built through the tessellator

mod assembly;
mod data;
mod draw;
pub mod generators;
mod layout;
mod reader;

pub use assembly::Mesh;
pub use data::{DrawCommands, Segment, SegmentId, Topology};
pub use draw::{DrawCall, DrawPlan, DrawStrategy};
pub use layout::{AttributeChannel, NumericKind, RenderableConfiguration};
pub use reader::{MeshReader, ModelReader};
