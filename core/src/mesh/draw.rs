//! Draw planning for assembled meshes.
//!
//! A [`DrawPlan`] is what a renderer needs to issue draw calls for a
//! [`Mesh`]: the vertex layout handle, one `(topology, first, count)` range
//! per segment and the buffer sizes to allocate. Whether the mesh is drawn
//! through its shared index array or straight from the vertex arrays is
//! decided once, when the plan is built.

use crate::error::MeshResult;
use crate::pool::ConfigHandle;

use super::assembly::Mesh;
use super::data::Topology;
use super::layout::{AttributeChannel, RenderableConfiguration};

/// How a mesh is submitted to the GPU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawStrategy {
    /// Draw through the mesh's shared index array.
    Indexed(Vec<u32>),
    /// Draw straight from the vertex arrays. `first_elements[i]` is the
    /// first vertex of segment `i` in the concatenated stream.
    Arrays { first_elements: Vec<usize> },
}

/// One draw call covering a single segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    pub topology: Topology,
    /// First vertex (or index, when indexed) of the range.
    pub first: usize,
    pub count: usize,
}

/// Draw description of a mesh at the time it was planned.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawPlan {
    config: ConfigHandle,
    configuration: RenderableConfiguration,
    strategy: DrawStrategy,
    element_counts: Vec<usize>,
    topologies: Vec<Topology>,
    channels: Vec<AttributeChannel>,
    total_vertices: usize,
}

impl DrawPlan {
    /// Plan `mesh`. Fails if the mesh has no configuration bound.
    pub fn for_mesh(mesh: &Mesh) -> MeshResult<Self> {
        let config = mesh.require_config()?;
        let configuration = mesh.pool().get(config)?;

        let element_counts: Vec<usize> =
            mesh.segments().iter().map(|s| s.element_count()).collect();
        let topologies = mesh.segments().iter().map(|s| s.topology()).collect();
        let channels = AttributeChannel::ALL
            .into_iter()
            .filter(|&channel| mesh.has_channel(channel))
            .collect();

        let strategy = match mesh.indexes() {
            Some(indexes) if !indexes.is_empty() => DrawStrategy::Indexed(indexes.to_vec()),
            _ => DrawStrategy::Arrays {
                first_elements: running_offsets(&element_counts),
            },
        };

        Ok(Self {
            config,
            configuration,
            strategy,
            element_counts,
            topologies,
            channels,
            total_vertices: mesh.total_vertices(),
        })
    }

    pub fn config(&self) -> ConfigHandle {
        self.config
    }

    pub fn configuration(&self) -> &RenderableConfiguration {
        &self.configuration
    }

    pub fn strategy(&self) -> &DrawStrategy {
        &self.strategy
    }

    pub fn is_indexed(&self) -> bool {
        matches!(self.strategy, DrawStrategy::Indexed(_))
    }

    pub fn element_counts(&self) -> &[usize] {
        &self.element_counts
    }

    pub fn topologies(&self) -> &[Topology] {
        &self.topologies
    }

    /// Channels present in at least one segment.
    pub fn channels(&self) -> &[AttributeChannel] {
        &self.channels
    }

    pub fn total_vertices(&self) -> usize {
        self.total_vertices
    }

    /// Size in bytes of the vertex buffer for `channel`, zero when absent.
    pub fn vertex_buffer_size(&self, channel: AttributeChannel) -> u64 {
        if !self.channels.contains(&channel) {
            return 0;
        }
        self.total_vertices as u64 * self.configuration.channel_size(channel) as u64
    }

    /// Size in bytes of the index buffer, zero when not indexed.
    pub fn index_buffer_size(&self) -> u64 {
        match &self.strategy {
            DrawStrategy::Indexed(indexes) => (indexes.len() * std::mem::size_of::<u32>()) as u64,
            DrawStrategy::Arrays { .. } => 0,
        }
    }

    /// One draw call per segment, in attachment order.
    pub fn draws(&self) -> Vec<DrawCall> {
        let firsts = match &self.strategy {
            DrawStrategy::Arrays { first_elements } => first_elements.clone(),
            DrawStrategy::Indexed(_) => running_offsets(&self.element_counts),
        };
        firsts
            .into_iter()
            .zip(&self.element_counts)
            .zip(&self.topologies)
            .map(|((first, &count), &topology)| DrawCall {
                topology,
                first,
                count,
            })
            .collect()
    }
}

fn running_offsets(counts: &[usize]) -> Vec<usize> {
    counts
        .iter()
        .scan(0usize, |next, &count| {
            let first = *next;
            *next += count;
            Some(first)
        })
        .collect()
}
