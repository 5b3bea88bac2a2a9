//! Integration tests for the batch protocol and re-triangulation.
//!
//! ```bash
//! cargo test -p tessellator-core --test tessellation_tests
//! ```

mod common;

use rstest::rstest;

use common::{circle, normal_of, strip, tessellator, triangles};
use tessellator_core::math::{Aabb, Color, Vec3};
use tessellator_core::{MeshError, Topology};

// ============================================================================
// Triangle Counts
// ============================================================================

#[rstest]
#[case::quads(Topology::Quads, 8, 4)]
#[case::quad_strip_single(Topology::QuadStrip, 4, 2)]
#[case::quad_strip(Topology::QuadStrip, 8, 6)]
#[case::quad_strip_odd(Topology::QuadStrip, 7, 4)]
#[case::triangle_strip(Topology::TriangleStrip, 6, 4)]
#[case::triangle_strip_odd(Topology::TriangleStrip, 5, 3)]
#[case::triangle_strip_single(Topology::TriangleStrip, 3, 1)]
#[case::fan(Topology::TriangleFan, 6, 4)]
#[case::fan_single(Topology::TriangleFan, 3, 1)]
fn test_converted_triangle_count(
    #[case] topology: Topology,
    #[case] vertices: usize,
    #[case] expected_triangles: usize,
) {
    let mut t = tessellator(true);
    t.start(topology).unwrap();
    for p in strip(vertices) {
        t.add_vertex(p).unwrap();
    }
    t.stop().unwrap();

    let segment = t.create_segment("s").unwrap();
    assert_eq!(segment.topology(), Topology::Triangles);
    assert_eq!(segment.element_count(), expected_triangles * 3);
    assert_eq!(segment.primitive_count(), Some(expected_triangles));
}

// ============================================================================
// Winding
// ============================================================================

#[rstest]
#[case::quads(Topology::Quads, vec![
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
])]
#[case::quad_strip(Topology::QuadStrip, strip(8))]
#[case::triangle_strip(Topology::TriangleStrip, strip(7))]
#[case::fan(Topology::TriangleFan, circle(7))]
fn test_counter_clockwise_input_stays_counter_clockwise(
    #[case] topology: Topology,
    #[case] points: Vec<Vec3>,
) {
    let mut t = tessellator(true);
    t.start(topology).unwrap();
    for p in &points {
        t.add_vertex(*p).unwrap();
    }
    t.stop().unwrap();

    let segment = t.create_segment("s").unwrap();
    let tris = triangles(segment.vertices().unwrap());
    assert!(!tris.is_empty());
    for (i, tri) in tris.iter().enumerate() {
        let normal = normal_of(tri);
        assert!(normal.z > 0.99, "triangle {i} of {topology:?} is wound clockwise: {tri:?}");
    }
}

#[test]
fn test_quad_emits_expected_corner_order() {
    let corners = [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    ];
    let mut t = tessellator(true);
    t.start(Topology::Quads).unwrap();
    for c in &corners {
        t.add_vertex(*c).unwrap();
    }
    t.stop().unwrap();

    let tris = triangles(t.vertices());
    assert_eq!(tris[0], [corners[0], corners[1], corners[2]]);
    assert_eq!(tris[1], [corners[2], corners[3], corners[0]]);
}

// ============================================================================
// Bounding Box
// ============================================================================

#[rstest]
#[case::points(Topology::Points)]
#[case::lines(Topology::Lines)]
#[case::polygon(Topology::Polygon)]
#[case::quad_strip(Topology::QuadStrip)]
#[case::fan(Topology::TriangleFan)]
fn test_bounds_cover_every_added_vertex(#[case] topology: Topology) {
    let points: Vec<Vec3> = (0..5)
        .map(|i| Vec3::new(i as f32 - 2.0, (i * i) as f32, -(i as f32)))
        .collect();

    let mut t = tessellator(true);
    t.start(topology).unwrap();
    for p in &points {
        t.add_vertex(*p).unwrap();
    }
    t.stop().unwrap();

    // The fifth vertex of the quad strip is dropped but still counted.
    assert_eq!(t.bounds(), Aabb::from_points(points.iter().copied()));
}

#[test]
fn test_bounds_empty_until_first_vertex() {
    let mut t = tessellator(true);
    t.start(Topology::Points).unwrap();
    assert!(t.bounds().is_none());
    t.add_vertex(Vec3::new(1.0, 2.0, 3.0)).unwrap();
    t.stop().unwrap();
    let bounds = t.bounds().unwrap();
    assert_eq!(bounds.size(), Vec3::zeros());
}

// ============================================================================
// Primitive Mode
// ============================================================================

#[rstest]
#[case::converted_fan(true, Topology::TriangleFan, Topology::Triangles)]
#[case::raw_fan(false, Topology::TriangleFan, Topology::TriangleFan)]
#[case::converted_quads(true, Topology::Quads, Topology::Triangles)]
#[case::lines_untouched(true, Topology::Lines, Topology::Lines)]
#[case::polygon_untouched(true, Topology::Polygon, Topology::Polygon)]
fn test_output_topology(
    #[case] convert: bool,
    #[case] input: Topology,
    #[case] expected: Topology,
) {
    let mut t = tessellator(convert);
    t.start(input).unwrap();
    for p in circle(4) {
        t.add_vertex(p).unwrap();
    }
    t.stop().unwrap();

    assert_eq!(t.create_segment("s").unwrap().topology(), expected);
    assert_eq!(t.topology(), Some(expected));
}

#[test]
fn test_raw_batch_keeps_every_vertex() {
    let mut t = tessellator(false);
    t.start(Topology::TriangleStrip).unwrap();
    for p in strip(5) {
        t.add_vertex(p).unwrap();
    }
    t.stop().unwrap();
    assert_eq!(t.create_segment("s").unwrap().element_count(), 5);
}

// ============================================================================
// Attribute Channels
// ============================================================================

#[test]
fn test_attributes_follow_their_vertices() {
    let mut t = tessellator(true);
    t.start(Topology::TriangleFan).unwrap();
    for (i, p) in circle(4).into_iter().enumerate() {
        t.add_color(Color::rgb(i as f32, 0.0, 0.0)).unwrap();
        t.add_normal(Vec3::z()).unwrap();
        t.add_tex_coord(i as f32, 0.0).unwrap();
        t.add_vertex(p).unwrap();
    }
    t.stop().unwrap();

    let segment = t.create_segment("fan").unwrap();
    assert_eq!(segment.element_count(), 6);
    assert_eq!(segment.colors().unwrap().len(), 6 * 4);
    assert_eq!(segment.normals().unwrap().len(), 6 * 3);
    let s: Vec<f32> = segment
        .tex_coords()
        .unwrap()
        .chunks(2)
        .map(|st| st[0])
        .collect();
    assert_eq!(s, vec![0.0, 1.0, 2.0, 0.0, 2.0, 3.0]);
    let reds: Vec<f32> = segment.colors().unwrap().chunks(4).map(|c| c[0]).collect();
    assert_eq!(reds, s);
}

#[test]
fn test_attributes_may_trail_their_vertex() {
    let mut t = tessellator(true);
    t.start(Topology::TriangleFan).unwrap();
    for (p, blue) in circle(3).into_iter().zip([0.1, 0.2, 0.3]) {
        t.add_vertex(p).unwrap();
        t.add_color(Color::rgb(0.0, 0.0, blue)).unwrap();
    }
    t.stop().unwrap();

    let segment = t.create_segment("fan").unwrap();
    let blues: Vec<f32> = segment.colors().unwrap().chunks(4).map(|c| c[2]).collect();
    assert_eq!(blues, vec![0.1, 0.2, 0.3]);
}

#[test]
fn test_attribute_left_behind_is_rejected() {
    let mut t = tessellator(true);
    t.start(Topology::TriangleFan).unwrap();
    t.add_color(Color::RED).unwrap();
    let points = circle(4);
    for p in &points[..3] {
        t.add_vertex(*p).unwrap();
    }
    assert!(matches!(
        t.add_vertex(points[3]),
        Err(MeshError::InvalidState(_))
    ));
}

#[test]
fn test_segment_without_channel_data_omits_it() {
    let mut t = tessellator(true);
    t.start(Topology::Triangles).unwrap();
    for p in circle(3) {
        t.add_vertex(p).unwrap();
    }
    t.stop().unwrap();

    let segment = t.create_segment("plain").unwrap();
    assert!(segment.colors().is_none());
    assert!(segment.normals().is_none());
    assert!(segment.tex_coords().is_none());
    assert_eq!(segment.vertices().unwrap().len(), 9);
}

// ============================================================================
// Protocol Errors
// ============================================================================

#[test]
fn test_unmatched_stop_is_rejected() {
    let mut t = tessellator(true);
    assert!(matches!(t.stop(), Err(MeshError::InvalidState(_))));

    t.start(Topology::Lines).unwrap();
    t.stop().unwrap();
    assert!(matches!(t.stop(), Err(MeshError::InvalidState(_))));
}

#[test]
fn test_staged_counts_must_match() {
    let mut t = tessellator(true);
    t.start_staged(Topology::Quads).unwrap();
    t.add_color(Color::RED).unwrap();
    for p in circle(4) {
        t.add_vertex(p).unwrap();
    }
    assert!(matches!(t.add_quad(), Err(MeshError::InvalidState(_))));
    for _ in 0..3 {
        t.add_color(Color::RED).unwrap();
    }
    t.add_quad().unwrap();
    t.stop().unwrap();
    assert_eq!(t.create_segment("q").unwrap().element_count(), 6);
}

#[test]
fn test_staged_triangles_in_triangle_batch() {
    let mut t = tessellator(true);
    t.start_staged(Topology::Triangles).unwrap();
    for _ in 0..2 {
        for p in circle(3) {
            t.add_vertex(p).unwrap();
        }
        t.add_triangle().unwrap();
    }
    t.stop().unwrap();

    let segment = t.create_segment("tris").unwrap();
    assert_eq!(segment.topology(), Topology::Triangles);
    assert_eq!(segment.element_count(), 6);
}

#[test]
fn test_staged_raw_quads() {
    let mut t = tessellator(false);
    t.start_staged(Topology::Quads).unwrap();
    for p in circle(4) {
        t.add_vertex(p).unwrap();
    }
    t.add_quad().unwrap();
    t.stop().unwrap();

    let segment = t.create_segment("raw").unwrap();
    assert_eq!(segment.topology(), Topology::Quads);
    assert_eq!(segment.element_count(), 4);
}

#[rstest]
#[case(Topology::Points)]
#[case(Topology::Lines)]
#[case(Topology::LineStrip)]
#[case(Topology::LineLoop)]
#[case(Topology::Polygon)]
fn test_staged_incompatible_topology(#[case] topology: Topology) {
    let mut t = tessellator(true);
    assert_eq!(
        t.start_staged(topology),
        Err(MeshError::UnsupportedTopology(topology))
    );
    assert!(!t.is_building());
}

#[test]
fn test_rejected_vertex_leaves_bounds_alone() {
    let mut t = tessellator(true);
    t.start_staged(Topology::Quads).unwrap();
    for p in circle(4) {
        t.add_vertex(p).unwrap();
    }
    let before = t.bounds();
    assert!(matches!(
        t.add_vertex(Vec3::new(10.0, 10.0, 10.0)),
        Err(MeshError::InvalidState(_))
    ));
    assert_eq!(t.bounds(), before);
}
