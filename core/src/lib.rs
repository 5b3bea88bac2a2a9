//! # Tessellator Core
//!
//! Immediate-mode primitive tessellation and mesh assembly.
//!
//! Geometry is issued vertex by vertex into a [`Tessellator`], which groups
//! it into batches, re-triangulates strips, fans and quads, and snapshots
//! each batch into an immutable [`Segment`]. Segments are validated against
//! an interned [`RenderableConfiguration`] and collected into a [`Mesh`]
//! that renderers consume through its [`DrawPlan`].

pub mod error;
pub mod material;
pub mod math;
pub mod mesh;
pub mod pool;
pub mod profiling;
pub mod tessellator;

pub use error::{MeshError, MeshResult};
pub use mesh::{DrawPlan, Mesh, RenderableConfiguration, Segment, Topology};
pub use pool::{ConfigHandle, SharedConfigurationPool};
pub use tessellator::{Tessellator, TessellatorOptions};

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the library version once at startup.
pub fn init() {
    log::info!("Tessellator Core v{} initialized", VERSION);
}
