//! Flat attribute storage for a construction session.

use std::ops::Range;

use crate::math::{Color, Vec3, Vec4};
use crate::mesh::AttributeChannel;

/// Lengths of every channel buffer at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct BufferMarks {
    colors: usize,
    normals: usize,
    tex_coords: usize,
    vertices: usize,
}

impl BufferMarks {
    fn get(&self, channel: AttributeChannel) -> usize {
        match channel {
            AttributeChannel::Color => self.colors,
            AttributeChannel::Normal => self.normals,
            AttributeChannel::TexCoord => self.tex_coords,
            AttributeChannel::Position => self.vertices,
        }
    }
}

/// Range of each channel buffer written by one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct BatchSpan {
    start: BufferMarks,
    end: BufferMarks,
}

impl BatchSpan {
    pub(crate) fn range(&self, channel: AttributeChannel) -> Range<usize> {
        self.start.get(channel)..self.end.get(channel)
    }
}

/// Growing per-channel `f32` buffers plus the vertex index list.
///
/// Every emitted vertex is assigned the next index from a session-wide
/// cursor, so indices stay unique across batches.
#[derive(Debug, Default)]
pub(crate) struct StreamBuffers {
    colors: Vec<f32>,
    normals: Vec<f32>,
    tex_coords: Vec<f32>,
    vertices: Vec<f32>,
    vertex_indexes: Vec<u32>,
    cursor: u32,
    batch_start: BufferMarks,
    element_count: usize,
    max_index: Option<u32>,
}

impl StreamBuffers {
    /// Reserve room for `vertices` records of the widest layout.
    pub(crate) fn with_capacity(vertices: usize) -> Self {
        Self {
            colors: Vec::with_capacity(vertices * 4),
            normals: Vec::with_capacity(vertices * 3),
            tex_coords: Vec::with_capacity(vertices * 3),
            vertices: Vec::with_capacity(vertices * 4),
            vertex_indexes: Vec::with_capacity(vertices),
            ..Self::default()
        }
    }

    /// Drop all data, keeping the allocations.
    pub(crate) fn clear(&mut self) {
        self.colors.clear();
        self.normals.clear();
        self.tex_coords.clear();
        self.vertices.clear();
        self.vertex_indexes.clear();
        self.cursor = 0;
        self.batch_start = BufferMarks::default();
        self.element_count = 0;
        self.max_index = None;
    }

    /// Begin a new batch. Returns the index its first vertex will receive.
    pub(crate) fn begin_batch(&mut self) -> u32 {
        self.batch_start = self.marks();
        self.element_count = 0;
        self.max_index = None;
        self.cursor
    }

    /// Span of the buffers written since [`Self::begin_batch`].
    pub(crate) fn batch_span(&self) -> BatchSpan {
        BatchSpan {
            start: self.batch_start,
            end: self.marks(),
        }
    }

    pub(crate) fn element_count(&self) -> usize {
        self.element_count
    }

    pub(crate) fn max_index(&self) -> Option<u32> {
        self.max_index
    }

    pub(crate) fn push_color(&mut self, color: &Color, components: usize) {
        self.colors.extend_from_slice(&color.to_array()[..components]);
    }

    pub(crate) fn push_normal(&mut self, normal: &Vec3) {
        self.normals.extend_from_slice(normal.as_slice());
    }

    pub(crate) fn push_tex_coord(&mut self, tex_coord: &Vec3, components: usize) {
        self.tex_coords
            .extend_from_slice(&tex_coord.as_slice()[..components]);
    }

    /// Append a position and assign it the next vertex index.
    pub(crate) fn push_vertex(&mut self, vertex: &Vec4, components: usize) {
        self.vertices.extend_from_slice(&vertex.as_slice()[..components]);
        self.vertex_indexes.push(self.cursor);
        self.max_index = Some(self.cursor);
        self.cursor += 1;
        self.element_count += 1;
    }

    pub(crate) fn data(&self, channel: AttributeChannel) -> &[f32] {
        match channel {
            AttributeChannel::Color => &self.colors,
            AttributeChannel::Normal => &self.normals,
            AttributeChannel::TexCoord => &self.tex_coords,
            AttributeChannel::Position => &self.vertices,
        }
    }

    pub(crate) fn vertex_indexes(&self) -> &[u32] {
        &self.vertex_indexes
    }

    fn marks(&self) -> BufferMarks {
        BufferMarks {
            colors: self.colors.len(),
            normals: self.normals.len(),
            tex_coords: self.tex_coords.len(),
            vertices: self.vertices.len(),
        }
    }
}
