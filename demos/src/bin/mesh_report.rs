//! # Mesh Report
//!
//! Generates procedural shapes through the tessellator and prints the
//! assembled mesh: segments, vertex buffers and draw calls.
//!
//! ```bash
//! cargo run -p tessellator-demos --bin mesh_report -- --shape cylinder --slices 32
//! cargo run -p tessellator-demos --bin mesh_report -- --shape frustum --shape axis --no-convert
//! ```

use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tessellator_core::SharedConfigurationPool;
use tessellator_core::math::{Color, Vec3};
use tessellator_core::mesh::generators::{ConstructionInfo, Quality};
use tessellator_demos::{Shape, build_shapes, describe};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CliShape {
    CubeMap,
    Frustum,
    Axis,
    Cylinder,
    All,
}

/// Print a report of procedurally generated meshes.
#[derive(Parser, Debug)]
#[command(name = "mesh_report", version)]
struct Args {
    /// Shapes to generate, appended into one mesh in order.
    #[arg(long = "shape", value_enum, default_values_t = [CliShape::All])]
    shapes: Vec<CliShape>,

    /// Keep strips, fans and quads instead of converting them to triangles.
    #[arg(long)]
    no_convert: bool,

    /// Slices around the cylinder.
    #[arg(long, default_value = "16")]
    slices: u32,

    /// Extent along X, Y and Z.
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], default_values_t = [1.0, 1.0, 1.0])]
    size: Vec<f32>,

    /// Frustum top scale along X and Z.
    #[arg(long, default_value = "1.0")]
    taper: f32,
}

impl Args {
    fn shapes(&self) -> Vec<Shape> {
        self.shapes
            .iter()
            .flat_map(|shape| match shape {
                CliShape::CubeMap => vec![Shape::CubeMap],
                CliShape::Frustum => vec![Shape::Frustum],
                CliShape::Axis => vec![Shape::Axis],
                CliShape::Cylinder => vec![Shape::Cylinder],
                CliShape::All => Shape::ALL.to_vec(),
            })
            .collect()
    }

    fn construction_info(&self) -> ConstructionInfo {
        let size = match self.size.as_slice() {
            &[x, y, z] => Vec3::new(x, y, z),
            _ => Vec3::new(1.0, 1.0, 1.0),
        };
        ConstructionInfo::new()
            .with_convert_to_triangles(!self.no_convert)
            .with_size(size)
            .with_radius(Vec3::new(self.taper, 1.0, self.taper))
            .with_quality(Quality::new(self.slices, 1, 1))
            .with_color(0, Color::rgb(0.8, 0.3, 0.2))
            .with_color(1, Color::GREEN)
            .with_color(2, Color::BLUE)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    tessellator_core::init();

    let args = Args::parse();
    let shapes = args.shapes();
    log::info!("Building {:?}", shapes);

    let pool = SharedConfigurationPool::new();
    let report =
        build_shapes(&shapes, &args.construction_info(), pool).and_then(|mesh| describe(&mesh));
    match report {
        Ok(report) => {
            print!("{report}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("Failed to build mesh: {}", err);
            ExitCode::FAILURE
        }
    }
}
