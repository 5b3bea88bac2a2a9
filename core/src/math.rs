//! Math type aliases and the plain value types carried by vertex records.
//!
//! Vectors are `nalgebra` aliases (always f32). [`Color`] and [`Aabb`] are
//! small value types with no behavior beyond arithmetic.

pub use nalgebra;

/// 2D vector (f32).
pub type Vec2 = nalgebra::Vector2<f32>;

/// 3D vector (f32).
pub type Vec3 = nalgebra::Vector3<f32>;

/// 4D vector (f32).
pub type Vec4 = nalgebra::Vector4<f32>;

/// Linear RGBA color.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    /// Create a color from all four components.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Components as `[r, g, b, a]`.
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<[f32; 4]> for Color {
    fn from(c: [f32; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

/// Axis-aligned bounding box.
///
/// An `Aabb` always contains at least one point. Code that tracks a box
/// incrementally holds an `Option<Aabb>` and starts from `None`, so there is
/// no sentinel min/max state to get wrong.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create a box from corners. Components are reordered so `min <= max`.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.inf(&b),
            max: a.sup(&b),
        }
    }

    /// Degenerate box around a single point.
    pub fn from_point(p: Vec3) -> Self {
        Self { min: p, max: p }
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Option<Self> {
        points.into_iter().fold(None, |acc: Option<Self>, p| match acc {
            Some(mut aabb) => {
                aabb.expand(p);
                Some(aabb)
            }
            None => Some(Self::from_point(p)),
        })
    }

    /// Grow the box to include `p`.
    pub fn expand(&mut self, p: Vec3) {
        self.min = self.min.inf(&p);
        self.max = self.max.sup(&p);
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn contains(&self, p: &Vec3) -> bool {
        (0..3).all(|i| p[i] >= self.min[i] && p[i] <= self.max[i])
    }
}

/// Fold a point into an optional box, creating the box on first use.
pub fn expand_bounds(bounds: &mut Option<Aabb>, p: Vec3) {
    match bounds {
        Some(aabb) => aabb.expand(p),
        None => *bounds = Some(Aabb::from_point(p)),
    }
}

/// Unit normal of the counter-clockwise triangle `(p1, p2, p3)`.
///
/// Uses the right-hand rule with `p2` as the base: `(p3 - p2) x (p1 - p2)`.
/// Degenerate triangles yield the zero vector.
pub fn triangle_normal(p1: &Vec3, p2: &Vec3, p3: &Vec3) -> Vec3 {
    let index = p3 - p2;
    let middle = p1 - p2;
    index
        .cross(&middle)
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(Vec3::zeros)
}
