//! # Tessellator Demos
//!
//! Helpers shared by the demo binaries.
//!
//! ## Available Demos
//!
//! - `mesh_report` - Generate procedural shapes and print the assembled mesh

use std::fmt;

use tessellator_core::mesh::generators::{
    ConstructionInfo, CubeMap, DynamicMesh, PrimitiveCylinder, PrimitiveFrustum,
    SimpleOrientationAxis,
};
use tessellator_core::mesh::{AttributeChannel, DrawPlan, DrawStrategy};
use tessellator_core::{
    Mesh, MeshError, MeshResult, SharedConfigurationPool, Tessellator, TessellatorOptions,
};

/// Demos library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Procedural shapes the demos can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    CubeMap,
    Frustum,
    Axis,
    Cylinder,
}

impl Shape {
    pub const ALL: [Self; 4] = [Self::CubeMap, Self::Frustum, Self::Axis, Self::Cylinder];

    pub fn generator(&self) -> &'static dyn DynamicMesh {
        match self {
            Self::CubeMap => &CubeMap,
            Self::Frustum => &PrimitiveFrustum,
            Self::Axis => &SimpleOrientationAxis,
            Self::Cylinder => &PrimitiveCylinder,
        }
    }
}

/// Build every shape into one mesh on `pool`.
///
/// The first shape resets the tessellator, later shapes are appended.
pub fn build_shapes(
    shapes: &[Shape],
    info: &ConstructionInfo,
    pool: SharedConfigurationPool,
) -> MeshResult<Mesh> {
    let mut tessellator = Tessellator::with_options(
        pool,
        TessellatorOptions {
            convert_to_triangles: info.convert_to_triangles,
            ..TessellatorOptions::default()
        },
    );
    for (i, shape) in shapes.iter().enumerate() {
        log::debug!("Generating {:?}", shape);
        shape.generator().create(i == 0, info, &mut tessellator)?;
    }
    tessellator.build_mesh()
}

/// Human-readable summary of a mesh and its draw plan.
pub fn describe(mesh: &Mesh) -> MeshResult<String> {
    let plan = mesh.draw_plan()?;
    let mut out = String::new();
    write_report(&mut out, mesh, &plan)
        .map_err(|_| MeshError::InvalidState("failed to format mesh report".to_string()))?;
    Ok(out)
}

fn write_report(out: &mut impl fmt::Write, mesh: &Mesh, plan: &DrawPlan) -> fmt::Result {
    writeln!(
        out,
        "mesh: {} segments, {} vertices, configuration #{}",
        mesh.segment_count(),
        mesh.total_vertices(),
        plan.config().id()
    )?;
    if let Some(bounds) = mesh.bounds() {
        writeln!(
            out,
            "bounds: min ({:.3}, {:.3}, {:.3}) max ({:.3}, {:.3}, {:.3})",
            bounds.min.x, bounds.min.y, bounds.min.z, bounds.max.x, bounds.max.y, bounds.max.z
        )?;
    }
    for channel in AttributeChannel::ALL {
        let bytes = plan.vertex_buffer_size(channel);
        if bytes > 0 {
            writeln!(
                out,
                "  {:?}: {} components, {} bytes",
                channel,
                plan.configuration().components(channel),
                bytes
            )?;
        }
    }
    match plan.strategy() {
        DrawStrategy::Indexed(indexes) => {
            writeln!(out, "draw: indexed ({} indices)", indexes.len())?
        }
        DrawStrategy::Arrays { .. } => writeln!(out, "draw: arrays")?,
    }
    for (segment, call) in mesh.segments().iter().zip(plan.draws()) {
        writeln!(
            out,
            "  {:<28} {:?} first {} count {}",
            segment.name(),
            call.topology,
            call.first,
            call.count
        )?;
    }
    Ok(())
}
