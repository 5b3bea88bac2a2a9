//! Validated collections of segments.

use std::sync::Arc;

use crate::error::{MeshError, MeshResult};
use crate::material::MeshMaterial;
use crate::math::{Aabb, Color};
use crate::pool::{ConfigHandle, SharedConfigurationPool};

use super::data::Segment;
use super::draw::DrawPlan;
use super::layout::{AttributeChannel, RenderableConfiguration};

/// A renderable collection of segments sharing one vertex layout.
///
/// Every attached segment has been checked against the mesh's
/// [`RenderableConfiguration`]: each present attribute array holds exactly
/// `element_count × width` floats. Segments are identified by their
/// [`SegmentId`](super::SegmentId), so the same segment cannot be attached
/// twice while two equal clones can.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tessellator_core::mesh::{
///     AttributeChannel, Mesh, RenderableConfiguration, Segment, Topology,
/// };
/// use tessellator_core::pool::SharedConfigurationPool;
///
/// let pool = SharedConfigurationPool::new();
/// let handle = pool.intern(&RenderableConfiguration::new());
///
/// let mut mesh = Mesh::new(pool);
/// mesh.set_renderable_config(handle).unwrap();
///
/// let segment = Arc::new(
///     Segment::new("tri", Topology::Triangles)
///         .with_element_count(3)
///         .with_data(AttributeChannel::Position, vec![0.0; 9]),
/// );
/// mesh.add_segment(Arc::clone(&segment)).unwrap();
///
/// assert_eq!(mesh.total_vertices(), 3);
/// assert!(mesh.has_vertices());
/// assert!(mesh.add_segment(segment).is_err());
/// ```
#[derive(Debug)]
pub struct Mesh {
    pool: SharedConfigurationPool,
    config: Option<ConfigHandle>,
    segments: Vec<Arc<Segment>>,
    total_vertices: usize,
    has_colors: bool,
    has_normals: bool,
    has_tex_coords: bool,
    has_vertices: bool,
    indexes: Option<Vec<u32>>,
    bounds: Option<Aabb>,
    material: MeshMaterial,
}

impl Mesh {
    /// Create an empty mesh resolving configuration handles through `pool`.
    pub fn new(pool: SharedConfigurationPool) -> Self {
        Self {
            pool,
            config: None,
            segments: Vec::new(),
            total_vertices: 0,
            has_colors: false,
            has_normals: false,
            has_tex_coords: false,
            has_vertices: false,
            indexes: None,
            bounds: None,
            material: MeshMaterial::new(),
        }
    }

    pub fn pool(&self) -> &SharedConfigurationPool {
        &self.pool
    }

    /// Bind the vertex layout. Fails if `handle` was not issued by the pool.
    pub fn set_renderable_config(&mut self, handle: ConfigHandle) -> MeshResult<()> {
        if !self.pool.contains(handle) {
            return Err(MeshError::InvalidHandle(handle.id()));
        }
        self.config = Some(handle);
        Ok(())
    }

    pub fn renderable_config(&self) -> Option<ConfigHandle> {
        self.config
    }

    /// Resolve the bound handle to its configuration.
    pub fn configuration(&self) -> MeshResult<RenderableConfiguration> {
        let handle = self.require_config()?;
        self.pool.get(handle)
    }

    /// Validate and attach a segment, returning the attached reference.
    pub fn add_segment(&mut self, segment: impl Into<Arc<Segment>>) -> MeshResult<Arc<Segment>> {
        let segment = segment.into();
        let config = self.configuration()?;

        if self.position_of(&segment).is_some() {
            return Err(MeshError::DuplicateSegment(segment.name().to_string()));
        }
        if segment.element_count() == 0 && !segment.has_draw_commands() {
            return Err(MeshError::EmptySegment(segment.name().to_string()));
        }
        for channel in AttributeChannel::ALL {
            if let Some(data) = segment.data(channel) {
                let expected = segment.element_count() * config.components(channel);
                if data.len() != expected {
                    return Err(MeshError::AttributeSizeMismatch {
                        channel,
                        actual: data.len(),
                        expected,
                    });
                }
            }
        }

        self.total_vertices += segment.element_count();
        self.segments.push(Arc::clone(&segment));
        self.refresh_flags();
        log::debug!(
            "Attached segment '{}' ({} vertices, {:?})",
            segment.name(),
            segment.element_count(),
            segment.topology()
        );
        Ok(segment)
    }

    /// Detach a previously attached segment.
    pub fn remove_segment(&mut self, segment: &Arc<Segment>) -> MeshResult<Arc<Segment>> {
        let position = self
            .position_of(segment)
            .ok_or_else(|| MeshError::SegmentNotFound(segment.name().to_string()))?;
        let removed = self.segments.remove(position);
        self.total_vertices -= removed.element_count();
        self.refresh_flags();
        Ok(removed)
    }

    pub fn segment(&self, index: usize) -> MeshResult<&Arc<Segment>> {
        self.segments
            .get(index)
            .ok_or(MeshError::SegmentIndexOutOfRange {
                index,
                len: self.segments.len(),
            })
    }

    /// First attached segment with the given name.
    pub fn segment_by_name(&self, name: &str) -> Option<&Arc<Segment>> {
        self.segments.iter().find(|s| s.name() == name)
    }

    pub fn segments(&self) -> &[Arc<Segment>] {
        &self.segments
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Sum of the element counts of every attached segment.
    pub fn total_vertices(&self) -> usize {
        self.total_vertices
    }

    pub fn has_colors(&self) -> bool {
        self.has_colors
    }

    pub fn has_normals(&self) -> bool {
        self.has_normals
    }

    pub fn has_tex_coords(&self) -> bool {
        self.has_tex_coords
    }

    pub fn has_vertices(&self) -> bool {
        self.has_vertices
    }

    pub fn has_indexes(&self) -> bool {
        self.indexes.as_ref().is_some_and(|i| !i.is_empty())
    }

    /// Whether any segment carries data for `channel`.
    pub fn has_channel(&self, channel: AttributeChannel) -> bool {
        match channel {
            AttributeChannel::Color => self.has_colors,
            AttributeChannel::Normal => self.has_normals,
            AttributeChannel::TexCoord => self.has_tex_coords,
            AttributeChannel::Position => self.has_vertices,
        }
    }

    /// Replace the shared index array. Indices address the concatenated
    /// vertex stream of all segments.
    pub fn set_indexes(&mut self, indexes: Option<Vec<u32>>) {
        self.indexes = indexes;
    }

    pub fn indexes(&self) -> Option<&[u32]> {
        self.indexes.as_deref()
    }

    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Option<Aabb>) {
        self.bounds = bounds;
    }

    pub fn material(&self) -> &MeshMaterial {
        &self.material
    }

    pub fn set_material(&mut self, material: MeshMaterial) {
        self.material = material;
    }

    /// Unique texture file names across all segment materials, in order of
    /// first use.
    pub fn textures(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for material in self.segments.iter().filter_map(|s| s.material()) {
            for (_, filename) in material.textures() {
                if !names.iter().any(|n| n == filename) {
                    names.push(filename.to_string());
                }
            }
        }
        names
    }

    /// Replace the color array of every segment with `color`.
    pub fn set_all_colors(&mut self, color: Color) -> MeshResult<()> {
        for index in 0..self.segments.len() {
            self.set_segment_colors(index, color)?;
        }
        Ok(())
    }

    /// Replace the color array of one segment with `color`.
    ///
    /// Segments are immutable, so the attached segment is swapped for a
    /// recolored copy at the same position. The copy keeps the segment's
    /// [`SegmentId`](super::SegmentId), so handles to the original still
    /// address it.
    pub fn set_segment_colors(&mut self, index: usize, color: Color) -> MeshResult<()> {
        let config = self.configuration()?;
        let len = self.segments.len();
        let slot = self
            .segments
            .get_mut(index)
            .ok_or(MeshError::SegmentIndexOutOfRange { index, len })?;

        let width = config.components(AttributeChannel::Color);
        let rgba = color.to_array();
        let colors: Vec<f32> = (0..slot.element_count())
            .flat_map(|_| rgba[..width].iter().copied())
            .collect();
        *slot = Arc::new(slot.with_replaced_data(AttributeChannel::Color, colors));
        self.refresh_flags();
        Ok(())
    }

    /// Detach everything and forget the configuration, bounds and indices.
    pub fn reset(&mut self) {
        self.config = None;
        self.segments.clear();
        self.total_vertices = 0;
        self.indexes = None;
        self.bounds = None;
        self.refresh_flags();
    }

    /// Describe how a renderer should draw this mesh.
    pub fn draw_plan(&self) -> MeshResult<DrawPlan> {
        crate::profile_function!();
        crate::profile_plot!("draw_plan_segments", self.segments.len());
        DrawPlan::for_mesh(self)
    }

    pub(super) fn require_config(&self) -> MeshResult<ConfigHandle> {
        self.config
            .ok_or_else(|| MeshError::invalid_state("mesh has no renderable configuration"))
    }

    fn position_of(&self, segment: &Segment) -> Option<usize> {
        self.segments.iter().position(|s| s.id() == segment.id())
    }

    fn refresh_flags(&mut self) {
        let any = |channel| self.segments.iter().any(|s| s.has_data(channel));
        self.has_colors = any(AttributeChannel::Color);
        self.has_normals = any(AttributeChannel::Normal);
        self.has_tex_coords = any(AttributeChannel::TexCoord);
        self.has_vertices = any(AttributeChannel::Position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{SegmentMaterial, TextureType};
    use crate::mesh::Topology;

    fn mesh_with_default_config() -> Mesh {
        let pool = SharedConfigurationPool::new();
        let handle = pool.intern(&RenderableConfiguration::new());
        let mut mesh = Mesh::new(pool);
        mesh.set_renderable_config(handle).unwrap();
        mesh
    }

    fn triangles(name: &str, count: usize) -> Arc<Segment> {
        Arc::new(
            Segment::new(name, Topology::Triangles)
                .with_element_count(count)
                .with_data(AttributeChannel::Position, vec![0.0; count * 3]),
        )
    }

    #[test]
    fn test_add_requires_config() {
        let mut mesh = Mesh::new(SharedConfigurationPool::new());
        let err = mesh.add_segment(triangles("a", 3)).unwrap_err();
        assert!(matches!(err, MeshError::InvalidState(_)));
    }

    #[test]
    fn test_set_unknown_config_fails() {
        let pool = SharedConfigurationPool::new();
        let other = SharedConfigurationPool::new();
        other.intern(&RenderableConfiguration::new());
        other.intern(&RenderableConfiguration::new().with_vertex_components(4).unwrap());
        let foreign =
            other.intern(&RenderableConfiguration::new().with_color_components(3).unwrap());

        let mut mesh = Mesh::new(pool);
        assert_eq!(
            mesh.set_renderable_config(foreign),
            Err(MeshError::InvalidHandle(2))
        );
    }

    #[test]
    fn test_duplicate_identity_rejected_but_equal_copy_accepted() {
        let mut mesh = mesh_with_default_config();
        let segment = triangles("a", 3);
        mesh.add_segment(Arc::clone(&segment)).unwrap();
        assert_eq!(
            mesh.add_segment(Arc::clone(&segment)).unwrap_err(),
            MeshError::DuplicateSegment("a".to_string())
        );

        let copy = Arc::new(Segment::clone(&segment));
        mesh.add_segment(copy).unwrap();
        assert_eq!(mesh.segment_count(), 2);
        assert_eq!(mesh.total_vertices(), 6);
    }

    #[test]
    fn test_empty_segment_rejected() {
        let mut mesh = mesh_with_default_config();
        let err = mesh
            .add_segment(Segment::new("empty", Topology::Points))
            .unwrap_err();
        assert_eq!(err, MeshError::EmptySegment("empty".to_string()));
    }

    #[test]
    fn test_short_array_rejected() {
        let mut mesh = mesh_with_default_config();
        let segment = Segment::new("short", Topology::Triangles)
            .with_element_count(3)
            .with_data(AttributeChannel::Position, vec![0.0; 8]);
        assert_eq!(
            mesh.add_segment(segment).unwrap_err(),
            MeshError::AttributeSizeMismatch {
                channel: AttributeChannel::Position,
                actual: 8,
                expected: 9,
            }
        );
        assert_eq!(mesh.total_vertices(), 0);
        assert!(!mesh.has_vertices());
    }

    #[test]
    fn test_remove_recomputes_flags() {
        let mut mesh = mesh_with_default_config();
        let plain = triangles("plain", 3);
        let colored = Arc::new(
            Segment::new("colored", Topology::Triangles)
                .with_element_count(3)
                .with_data(AttributeChannel::Color, vec![1.0; 12])
                .with_data(AttributeChannel::Position, vec![0.0; 9]),
        );
        mesh.add_segment(Arc::clone(&plain)).unwrap();
        mesh.add_segment(Arc::clone(&colored)).unwrap();
        assert!(mesh.has_colors());

        mesh.remove_segment(&colored).unwrap();
        assert!(!mesh.has_colors());
        assert!(mesh.has_vertices());
        assert_eq!(
            mesh.remove_segment(&colored).unwrap_err(),
            MeshError::SegmentNotFound("colored".to_string())
        );
    }

    #[test]
    fn test_segment_lookup() {
        let mut mesh = mesh_with_default_config();
        mesh.add_segment(triangles("first", 3)).unwrap();
        mesh.add_segment(triangles("second", 6)).unwrap();
        assert_eq!(mesh.segment(1).unwrap().name(), "second");
        assert_eq!(
            mesh.segment(5).unwrap_err(),
            MeshError::SegmentIndexOutOfRange { index: 5, len: 2 }
        );
        assert_eq!(
            mesh.segment_by_name("first").map(|s| s.element_count()),
            Some(3)
        );
        assert!(mesh.segment_by_name("third").is_none());
    }

    #[test]
    fn test_set_segment_colors_uses_config_width() {
        let pool = SharedConfigurationPool::new();
        let handle = pool.intern(&RenderableConfiguration::new().with_color_components(3).unwrap());
        let mut mesh = Mesh::new(pool);
        mesh.set_renderable_config(handle).unwrap();
        let original = triangles("a", 3);
        mesh.add_segment(Arc::clone(&original)).unwrap();

        mesh.set_all_colors(Color::RED).unwrap();
        let recolored = mesh.segment(0).unwrap();
        assert_eq!(
            recolored.colors(),
            Some(&[1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0][..])
        );
        assert!(mesh.has_colors());
        assert!(original.colors().is_none());
    }

    #[test]
    fn test_recolored_segment_keeps_identity() {
        let mut mesh = mesh_with_default_config();
        let segment = triangles("a", 3);
        mesh.add_segment(Arc::clone(&segment)).unwrap();
        mesh.set_all_colors(Color::RED).unwrap();

        assert_eq!(mesh.segment(0).unwrap().id(), segment.id());
        assert_eq!(
            mesh.add_segment(Arc::clone(&segment)).unwrap_err(),
            MeshError::DuplicateSegment("a".to_string())
        );
        assert_eq!(mesh.total_vertices(), 3);

        let removed = mesh.remove_segment(&segment).unwrap();
        assert!(removed.has_data(AttributeChannel::Color));
        assert_eq!(mesh.segment_count(), 0);
        assert_eq!(mesh.total_vertices(), 0);
        assert!(!mesh.has_colors());
    }

    #[test]
    fn test_textures_are_unique() {
        let mut mesh = mesh_with_default_config();
        let material = SegmentMaterial::new()
            .with_texture(TextureType::Diffuse, "wall.png")
            .with_texture(TextureType::Normal, "wall_n.png");
        for name in ["a", "b"] {
            let segment = Segment::new(name, Topology::Triangles)
                .with_element_count(3)
                .with_data(AttributeChannel::Position, vec![0.0; 9])
                .with_material(material.clone());
            mesh.add_segment(segment).unwrap();
        }
        assert_eq!(mesh.textures(), vec!["wall.png", "wall_n.png"]);
    }

    #[test]
    fn test_indexes_flag() {
        let mut mesh = mesh_with_default_config();
        assert!(!mesh.has_indexes());
        mesh.set_indexes(Some(Vec::new()));
        assert!(!mesh.has_indexes());
        mesh.set_indexes(Some(vec![0, 1, 2]));
        assert!(mesh.has_indexes());
    }

    #[test]
    fn test_reset() {
        let mut mesh = mesh_with_default_config();
        mesh.add_segment(triangles("a", 3)).unwrap();
        mesh.reset();
        assert_eq!(mesh.segment_count(), 0);
        assert_eq!(mesh.total_vertices(), 0);
        assert!(mesh.renderable_config().is_none());
        assert!(!mesh.has_vertices());
    }
}
