//! Primitive topologies and immutable tessellation segments.
//!
//! This module provides:
//! - [`Topology`] - How a vertex stream is assembled into primitives
//! - [`Segment`] - One finished batch of flat attribute arrays plus draw metadata
//! - [`DrawCommands`] - Caller-supplied geometry replayed instead of array data

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::MeshResult;
use crate::material::SegmentMaterial;
use crate::tessellator::Tessellator;

use super::layout::AttributeChannel;

/// Primitive topology of a vertex stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Topology {
    /// Each vertex is a separate point.
    Points,
    /// Every two vertices form a line.
    Lines,
    /// Vertices form a connected strip of lines.
    LineStrip,
    /// A line strip closed back to its first vertex.
    LineLoop,
    /// Every three vertices form a triangle.
    #[default]
    Triangles,
    /// Vertices form a connected strip of triangles.
    TriangleStrip,
    /// Every vertex after the second forms a triangle with the first one.
    TriangleFan,
    /// Every four vertices form an independent quad.
    Quads,
    /// Vertex pairs form a connected strip of quads.
    QuadStrip,
    /// All vertices form a single convex polygon.
    Polygon,
}

impl Topology {
    pub const ALL: [Self; 10] = [
        Self::Points,
        Self::Lines,
        Self::LineStrip,
        Self::LineLoop,
        Self::Triangles,
        Self::TriangleStrip,
        Self::TriangleFan,
        Self::Quads,
        Self::QuadStrip,
        Self::Polygon,
    ];

    /// Whether the sliding-window converter can turn this topology into a
    /// triangle list.
    pub fn is_convertible(&self) -> bool {
        matches!(
            self,
            Self::TriangleStrip | Self::TriangleFan | Self::Quads | Self::QuadStrip
        )
    }

    /// Whether explicit quad/triangle emission makes sense for this topology.
    ///
    /// Points, lines and polygons have no quad or triangle grouping.
    pub fn supports_bulk_emission(&self) -> bool {
        !matches!(
            self,
            Self::Points | Self::Lines | Self::LineStrip | Self::LineLoop | Self::Polygon
        )
    }

    /// Get the number of vertices per primitive (for non-strip topologies).
    pub fn vertices_per_primitive(&self) -> Option<u32> {
        match self {
            Self::Points => Some(1),
            Self::Lines => Some(2),
            Self::Triangles => Some(3),
            Self::Quads => Some(4),
            _ => None, // Variable
        }
    }
}

/// Geometry issued by the caller at draw time instead of array data.
///
/// A segment carrying draw commands may have no vertices of its own; an
/// immediate-mode renderer replays the commands into a tessellator each
/// time the segment is drawn.
pub trait DrawCommands: fmt::Debug + Send + Sync {
    /// Issue the segment's geometry into `tessellator`.
    fn record(&self, tessellator: &mut Tessellator) -> MeshResult<()>;
}

static NEXT_SEGMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a segment within a [`Mesh`](super::Mesh).
///
/// Every [`Segment::new`] and every clone gets a fresh id. A mesh recoloring
/// an attached segment keeps its id, so handles taken before the recolor
/// still find it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId(u64);

impl SegmentId {
    fn next() -> Self {
        Self(NEXT_SEGMENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// An immutable batch of flat attribute arrays.
///
/// Each present array holds `element_count × width` floats, where the width
/// comes from the owning mesh's
/// [`RenderableConfiguration`](super::RenderableConfiguration). Empty arrays
/// are stored as absent.
///
/// # Example
///
/// ```
/// use tessellator_core::mesh::{AttributeChannel, Segment, Topology};
///
/// let segment = Segment::new("triangle", Topology::Triangles)
///     .with_element_count(3)
///     .with_data(AttributeChannel::Position, vec![0.0; 9]);
///
/// assert_eq!(segment.vertices().map(<[f32]>::len), Some(9));
/// assert!(segment.colors().is_none());
/// ```
#[derive(Debug)]
pub struct Segment {
    id: SegmentId,
    name: String,
    topology: Topology,
    element_count: usize,
    min_index: u32,
    max_index: Option<u32>,
    colors: Option<Vec<f32>>,
    normals: Option<Vec<f32>>,
    tex_coords: Option<Vec<f32>>,
    vertices: Option<Vec<f32>>,
    material: Option<SegmentMaterial>,
    draw_commands: Option<Arc<dyn DrawCommands>>,
}

impl Segment {
    /// Create an empty segment.
    pub fn new(name: impl Into<String>, topology: Topology) -> Self {
        Self {
            id: SegmentId::next(),
            name: name.into(),
            topology,
            element_count: 0,
            min_index: 0,
            max_index: None,
            colors: None,
            normals: None,
            tex_coords: None,
            vertices: None,
            material: None,
            draw_commands: None,
        }
    }

    /// Set the number of vertex records.
    #[must_use]
    pub fn with_element_count(mut self, element_count: usize) -> Self {
        self.element_count = element_count;
        self
    }

    /// Set the range of vertex indices this segment covers.
    #[must_use]
    pub fn with_index_range(mut self, min_index: u32, max_index: Option<u32>) -> Self {
        self.min_index = min_index;
        self.max_index = max_index;
        self
    }

    /// Set the flat data for a channel. An empty vector clears the channel.
    #[must_use]
    pub fn with_data(mut self, channel: AttributeChannel, data: Vec<f32>) -> Self {
        let data = (!data.is_empty()).then_some(data);
        match channel {
            AttributeChannel::Color => self.colors = data,
            AttributeChannel::Normal => self.normals = data,
            AttributeChannel::TexCoord => self.tex_coords = data,
            AttributeChannel::Position => self.vertices = data,
        }
        self
    }

    #[must_use]
    pub fn with_material(mut self, material: SegmentMaterial) -> Self {
        self.material = Some(material);
        self
    }

    #[must_use]
    pub fn with_draw_commands(mut self, commands: Arc<dyn DrawCommands>) -> Self {
        self.draw_commands = Some(commands);
        self
    }

    /// Copy with `channel` replaced, keeping this segment's identity.
    pub(crate) fn with_replaced_data(&self, channel: AttributeChannel, data: Vec<f32>) -> Self {
        let mut copy = self.clone();
        copy.id = self.id;
        copy.with_data(channel, data)
    }

    pub fn id(&self) -> SegmentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn element_count(&self) -> usize {
        self.element_count
    }

    /// First vertex index of the batch.
    pub fn min_index(&self) -> u32 {
        self.min_index
    }

    /// Last vertex index of the batch, `None` when nothing was emitted.
    pub fn max_index(&self) -> Option<u32> {
        self.max_index
    }

    /// Flat data for `channel`, if present.
    pub fn data(&self, channel: AttributeChannel) -> Option<&[f32]> {
        match channel {
            AttributeChannel::Color => self.colors.as_deref(),
            AttributeChannel::Normal => self.normals.as_deref(),
            AttributeChannel::TexCoord => self.tex_coords.as_deref(),
            AttributeChannel::Position => self.vertices.as_deref(),
        }
    }

    /// Flat data for `channel` as raw bytes, ready for upload.
    pub fn data_bytes(&self, channel: AttributeChannel) -> Option<&[u8]> {
        self.data(channel).map(bytemuck::cast_slice)
    }

    pub fn has_data(&self, channel: AttributeChannel) -> bool {
        self.data(channel).is_some()
    }

    pub fn colors(&self) -> Option<&[f32]> {
        self.colors.as_deref()
    }

    pub fn normals(&self) -> Option<&[f32]> {
        self.normals.as_deref()
    }

    pub fn tex_coords(&self) -> Option<&[f32]> {
        self.tex_coords.as_deref()
    }

    pub fn vertices(&self) -> Option<&[f32]> {
        self.vertices.as_deref()
    }

    pub fn material(&self) -> Option<&SegmentMaterial> {
        self.material.as_ref()
    }

    pub fn draw_commands(&self) -> Option<&Arc<dyn DrawCommands>> {
        self.draw_commands.as_ref()
    }

    pub fn has_draw_commands(&self) -> bool {
        self.draw_commands.is_some()
    }

    /// Number of whole primitives, for fixed-size topologies.
    pub fn primitive_count(&self) -> Option<usize> {
        self.topology
            .vertices_per_primitive()
            .map(|n| self.element_count / n as usize)
    }
}

impl Clone for Segment {
    fn clone(&self) -> Self {
        Self {
            id: SegmentId::next(),
            name: self.name.clone(),
            topology: self.topology,
            element_count: self.element_count,
            min_index: self.min_index,
            max_index: self.max_index,
            colors: self.colors.clone(),
            normals: self.normals.clone(),
            tex_coords: self.tex_coords.clone(),
            vertices: self.vertices.clone(),
            material: self.material.clone(),
            draw_commands: self.draw_commands.clone(),
        }
    }
}
