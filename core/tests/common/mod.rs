//! Shared helpers for tessellator integration tests.

#![allow(dead_code)]

use tessellator_core::math::{Vec3, triangle_normal};
use tessellator_core::pool::SharedConfigurationPool;
use tessellator_core::{Tessellator, TessellatorOptions};

/// Initialise logging once; repeated calls are harmless.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Fresh tessellator on an isolated pool.
pub fn tessellator(convert_to_triangles: bool) -> Tessellator {
    init_logging();
    Tessellator::with_options(
        SharedConfigurationPool::new(),
        TessellatorOptions {
            convert_to_triangles,
            ..TessellatorOptions::default()
        },
    )
}

/// Points on a unit circle in the z = 0 plane, counter-clockwise seen from +Z.
pub fn circle(count: usize) -> Vec<Vec3> {
    (0..count)
        .map(|i| {
            let angle = std::f32::consts::TAU * i as f32 / count as f32;
            Vec3::new(angle.cos(), angle.sin(), 0.0)
        })
        .collect()
}

/// Zig-zag strip in the z = 0 plane: even vertices on y = 0, odd on y = 1.
pub fn strip(count: usize) -> Vec<Vec3> {
    (0..count)
        .map(|i| Vec3::new((i / 2) as f32, (i % 2) as f32, 0.0))
        .collect()
}

/// Split a flat 3-component position buffer into triangles.
pub fn triangles(vertices: &[f32]) -> Vec<[Vec3; 3]> {
    vertices
        .chunks_exact(9)
        .map(|t| {
            [
                Vec3::new(t[0], t[1], t[2]),
                Vec3::new(t[3], t[4], t[5]),
                Vec3::new(t[6], t[7], t[8]),
            ]
        })
        .collect()
}

/// Normal of a counter-clockwise triangle.
pub fn normal_of(tri: &[Vec3; 3]) -> Vec3 {
    triangle_normal(&tri[0], &tri[1], &tri[2])
}
