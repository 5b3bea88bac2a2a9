//! Procedural shapes built through the tessellator.
//!
//! Each generator implements [`DynamicMesh`] and issues its geometry with the
//! regular batch protocol, so the output honours the tessellator's
//! `convert_to_triangles` setting and local position like hand-written
//! geometry would. Every batch is kept as a segment; call
//! [`Tessellator::build_mesh`] afterwards to assemble them.
//!
//! # Example
//!
//! ```
//! use tessellator_core::mesh::generators::{ConstructionInfo, DynamicMesh, PrimitiveFrustum};
//! use tessellator_core::pool::SharedConfigurationPool;
//! use tessellator_core::tessellator::Tessellator;
//!
//! let mut tessellator = Tessellator::new(SharedConfigurationPool::new());
//! PrimitiveFrustum
//!     .create(true, &ConstructionInfo::default(), &mut tessellator)
//!     .unwrap();
//!
//! let mesh = tessellator.build_mesh().unwrap();
//! assert_eq!(mesh.total_vertices(), 36);
//! ```

use std::f32::consts::TAU;

use crate::error::MeshResult;
use crate::math::{Color, Vec3};
use crate::mesh::{AttributeChannel, Topology};
use crate::tessellator::Tessellator;

/// Subdivision counts along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Quality {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl Quality {
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }
}

/// Parameters shared by every generator.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructionInfo {
    /// Applied to the tessellator when the generator resets it.
    pub convert_to_triangles: bool,
    /// Offset added to every generated vertex.
    pub local_position: Vec3,
    /// Full extent along each axis.
    pub size: Vec3,
    /// Per-axis radius scale. Frustums scale their top face by it.
    pub radius: Vec3,
    pub quality: Quality,
    colors: Vec<Color>,
}

impl ConstructionInfo {
    pub fn new() -> Self {
        Self {
            convert_to_triangles: true,
            local_position: Vec3::zeros(),
            size: Vec3::new(1.0, 1.0, 1.0),
            radius: Vec3::new(1.0, 1.0, 1.0),
            quality: Quality::new(16, 1, 1),
            colors: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_size(mut self, size: Vec3) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn with_radius(mut self, radius: Vec3) -> Self {
        self.radius = radius;
        self
    }

    #[must_use]
    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    #[must_use]
    pub fn with_local_position(mut self, position: Vec3) -> Self {
        self.local_position = position;
        self
    }

    #[must_use]
    pub fn with_convert_to_triangles(mut self, convert: bool) -> Self {
        self.convert_to_triangles = convert;
        self
    }

    /// Set the color at `index`, padding earlier slots with white.
    pub fn set_color(&mut self, index: usize, color: Color) {
        if self.colors.len() <= index {
            self.colors.resize(index + 1, Color::WHITE);
        }
        self.colors[index] = color;
    }

    #[must_use]
    pub fn with_color(mut self, index: usize, color: Color) -> Self {
        self.set_color(index, color);
        self
    }

    /// Color at `index`, white when unset.
    pub fn color(&self, index: usize) -> Color {
        self.colors.get(index).copied().unwrap_or(Color::WHITE)
    }
}

impl Default for ConstructionInfo {
    fn default() -> Self {
        Self::new()
    }
}

/// A shape that can be regenerated into a tessellator.
pub trait DynamicMesh {
    /// Issue the shape's batches into `tessellator`.
    ///
    /// With `reset` the tessellator is cleared first and takes
    /// `info.convert_to_triangles`; otherwise the shape is appended to the
    /// current session.
    fn create(
        &self,
        reset: bool,
        info: &ConstructionInfo,
        tessellator: &mut Tessellator,
    ) -> MeshResult<()>;
}

fn prepare(reset: bool, info: &ConstructionInfo, tessellator: &mut Tessellator) {
    if reset {
        tessellator.set_convert_to_triangles(info.convert_to_triangles);
        tessellator.reset();
    }
    tessellator.set_local_position(info.local_position);
}

/// Unit cube whose 3D texture coordinates equal its corners, for sampling
/// cube-map textures.
#[derive(Debug, Clone, Copy, Default)]
pub struct CubeMap;

/// Counter-clockwise corners of each face: +Z, +X, -Z, -X, +Y, -Y.
const CUBE_FACES: [[[f32; 3]; 4]; 6] = [
    [[1.0, 1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, -1.0, 1.0], [1.0, -1.0, 1.0]],
    [[1.0, 1.0, -1.0], [1.0, 1.0, 1.0], [1.0, -1.0, 1.0], [1.0, -1.0, -1.0]],
    [[-1.0, 1.0, -1.0], [1.0, 1.0, -1.0], [1.0, -1.0, -1.0], [-1.0, -1.0, -1.0]],
    [[-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0]],
    [[1.0, 1.0, -1.0], [-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0], [1.0, 1.0, 1.0]],
    [[1.0, -1.0, 1.0], [-1.0, -1.0, 1.0], [-1.0, -1.0, -1.0], [1.0, -1.0, -1.0]],
];

impl DynamicMesh for CubeMap {
    fn create(
        &self,
        reset: bool,
        info: &ConstructionInfo,
        tessellator: &mut Tessellator,
    ) -> MeshResult<()> {
        crate::profile_function!();
        prepare(reset, info, tessellator);
        tessellator
            .config_mut()
            .set_components(AttributeChannel::TexCoord, 3)?;

        tessellator.start(Topology::Quads)?;
        for corner in CUBE_FACES.iter().flatten() {
            let [x, y, z] = *corner;
            tessellator.add_tex_coord_3d(x, y, z)?;
            tessellator.add_vertex(Vec3::new(x, y, z))?;
        }
        tessellator.stop()?;
        tessellator.add_segment("Cube Map")?;
        Ok(())
    }
}

/// Box whose top face is scaled by `radius.x` / `radius.z`.
///
/// A radius of one gives a box, zero gives a pyramid.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveFrustum;

impl DynamicMesh for PrimitiveFrustum {
    fn create(
        &self,
        reset: bool,
        info: &ConstructionInfo,
        tessellator: &mut Tessellator,
    ) -> MeshResult<()> {
        crate::profile_function!();
        let bottom_x = info.size.x * 0.5;
        let bottom_z = info.size.z * 0.5;
        let half_y = info.size.y * 0.5;
        let top_x = bottom_x * info.radius.x;
        let top_z = bottom_z * info.radius.z;
        let color = info.color(0);

        prepare(reset, info, tessellator);
        tessellator.start(Topology::Quads)?;

        let sides = [
            // +Z
            [
                Vec3::new(top_x, half_y, top_z),
                Vec3::new(-top_x, half_y, top_z),
                Vec3::new(-bottom_x, -half_y, bottom_z),
                Vec3::new(bottom_x, -half_y, bottom_z),
            ],
            // +X
            [
                Vec3::new(top_x, half_y, -top_z),
                Vec3::new(top_x, half_y, top_z),
                Vec3::new(bottom_x, -half_y, bottom_z),
                Vec3::new(bottom_x, -half_y, -bottom_z),
            ],
            // -Z
            [
                Vec3::new(-top_x, half_y, -top_z),
                Vec3::new(top_x, half_y, -top_z),
                Vec3::new(bottom_x, -half_y, -bottom_z),
                Vec3::new(-bottom_x, -half_y, -bottom_z),
            ],
            // -X
            [
                Vec3::new(-top_x, half_y, top_z),
                Vec3::new(-top_x, half_y, -top_z),
                Vec3::new(-bottom_x, -half_y, -bottom_z),
                Vec3::new(-bottom_x, -half_y, bottom_z),
            ],
        ];
        for face in &sides {
            for (i, corner) in face.iter().enumerate() {
                tessellator.add_color(color)?;
                if i == 0 {
                    tessellator.add_normal_from_triangle(&face[0], &face[1], &face[2])?;
                } else {
                    tessellator.add_normal_again()?;
                }
                tessellator.add_vertex(*corner)?;
            }
        }

        let caps = [
            (
                Vec3::y(),
                [
                    Vec3::new(top_x, half_y, -top_z),
                    Vec3::new(-top_x, half_y, -top_z),
                    Vec3::new(-top_x, half_y, top_z),
                    Vec3::new(top_x, half_y, top_z),
                ],
            ),
            (
                -Vec3::y(),
                [
                    Vec3::new(bottom_x, -half_y, bottom_z),
                    Vec3::new(-bottom_x, -half_y, bottom_z),
                    Vec3::new(-bottom_x, -half_y, -bottom_z),
                    Vec3::new(bottom_x, -half_y, -bottom_z),
                ],
            ),
        ];
        for (normal, face) in &caps {
            for corner in face {
                tessellator.add_color(color)?;
                tessellator.add_normal(*normal)?;
                tessellator.add_vertex(*corner)?;
            }
        }

        tessellator.stop()?;
        tessellator.add_segment("Primitive Frustum")?;
        Ok(())
    }
}

/// Three unit lines along +X, +Y and +Z, colored with colors 0, 1 and 2.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleOrientationAxis;

impl DynamicMesh for SimpleOrientationAxis {
    fn create(
        &self,
        reset: bool,
        info: &ConstructionInfo,
        tessellator: &mut Tessellator,
    ) -> MeshResult<()> {
        prepare(reset, info, tessellator);
        tessellator.start(Topology::Lines)?;
        for (i, axis) in [Vec3::x(), Vec3::y(), Vec3::z()].into_iter().enumerate() {
            let color = info.color(i);
            tessellator.add_color(color)?;
            tessellator.add_vertex(Vec3::zeros())?;
            tessellator.add_color(color)?;
            tessellator.add_vertex(axis)?;
        }
        tessellator.stop()?;
        tessellator.add_segment("Simple Orientation Axis")?;
        Ok(())
    }
}

/// Capped cylinder along Y with `quality.x` slices (at least 3).
///
/// The side is a quad strip and each cap a triangle fan, giving three
/// segments.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveCylinder;

impl PrimitiveCylinder {
    pub const MIN_SLICES: u32 = 3;
}

impl DynamicMesh for PrimitiveCylinder {
    fn create(
        &self,
        reset: bool,
        info: &ConstructionInfo,
        tessellator: &mut Tessellator,
    ) -> MeshResult<()> {
        crate::profile_function!();
        let slices = info.quality.x.max(Self::MIN_SLICES);
        let radius_x = info.size.x * 0.5 * info.radius.x;
        let radius_z = info.size.z * 0.5 * info.radius.z;
        let half_y = info.size.y * 0.5;
        let color = info.color(0);

        // Angle grows clockwise seen from +Y so the strip faces outward.
        let rim: Vec<(f32, f32)> = (0..=slices)
            .map(|i| {
                let angle = TAU * i as f32 / slices as f32;
                (angle.cos(), -angle.sin())
            })
            .collect();

        prepare(reset, info, tessellator);

        tessellator.start(Topology::QuadStrip)?;
        for &(c, s) in &rim {
            let normal = Vec3::new(c, 0.0, s);
            for y in [-half_y, half_y] {
                tessellator.add_color(color)?;
                tessellator.add_normal(normal)?;
                tessellator.add_vertex(Vec3::new(c * radius_x, y, s * radius_z))?;
            }
        }
        tessellator.stop()?;
        tessellator.add_segment("Primitive Cylinder Side")?;

        let caps = [
            ("Primitive Cylinder Top", half_y, Vec3::y(), false),
            ("Primitive Cylinder Bottom", -half_y, -Vec3::y(), true),
        ];
        for (name, y, normal, reversed) in caps {
            tessellator.start(Topology::TriangleFan)?;
            tessellator.add_color(color)?;
            tessellator.add_normal(normal)?;
            tessellator.add_vertex(Vec3::new(0.0, y, 0.0))?;
            let points: Box<dyn Iterator<Item = &(f32, f32)>> = if reversed {
                Box::new(rim.iter().rev())
            } else {
                Box::new(rim.iter())
            };
            for &(c, s) in points {
                tessellator.add_color(color)?;
                tessellator.add_normal(normal)?;
                tessellator.add_vertex(Vec3::new(c * radius_x, y, s * radius_z))?;
            }
            tessellator.stop()?;
            tessellator.add_segment(name)?;
        }
        Ok(())
    }
}
