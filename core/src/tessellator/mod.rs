//! Immediate-mode geometry builder.
//!
//! A [`Tessellator`] accepts a stream of per-vertex attributes grouped into
//! batches (`start` .. `stop`), one batch per primitive topology, and turns
//! each finished batch into an immutable [`Segment`]. Strips, fans and quads
//! are re-triangulated on the fly when `convert_to_triangles` is set, so the
//! resulting segments only need a triangle-list draw path.
//!
//! # Example
//!
//! ```
//! use tessellator_core::math::Vec3;
//! use tessellator_core::mesh::Topology;
//! use tessellator_core::pool::SharedConfigurationPool;
//! use tessellator_core::tessellator::Tessellator;
//!
//! let mut tessellator = Tessellator::new(SharedConfigurationPool::new());
//! tessellator.start(Topology::Quads).unwrap();
//! tessellator.add_vertex(Vec3::new(1.0, 1.0, 0.0)).unwrap();
//! tessellator.add_vertex(Vec3::new(-1.0, 1.0, 0.0)).unwrap();
//! tessellator.add_vertex(Vec3::new(-1.0, -1.0, 0.0)).unwrap();
//! tessellator.add_vertex(Vec3::new(1.0, -1.0, 0.0)).unwrap();
//! tessellator.stop().unwrap();
//!
//! let quad = tessellator.create_segment("quad").unwrap();
//! assert_eq!(quad.topology(), Topology::Triangles);
//! assert_eq!(quad.element_count(), 6);
//! ```

mod buffers;
mod conversion;

pub use conversion::{ConversionMode, ConversionState};

use std::sync::Arc;

use crate::error::{MeshError, MeshResult};
use crate::math::{self, Aabb, Color, Vec2, Vec3, Vec4};
use crate::mesh::{AttributeChannel, Mesh, RenderableConfiguration, Segment, Topology};
use crate::pool::{ConfigHandle, SharedConfigurationPool};

use buffers::{BatchSpan, StreamBuffers};

/// Builder options that survive [`Tessellator::reset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TessellatorOptions {
    /// Re-triangulate strips, fans and quads into triangle lists.
    pub convert_to_triangles: bool,
    /// Number of vertex records to reserve room for up front.
    pub initial_capacity: usize,
}

impl Default for TessellatorOptions {
    fn default() -> Self {
        Self {
            convert_to_triangles: true,
            initial_capacity: 1024,
        }
    }
}

/// Summary of one finished batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchRecord {
    /// Output topology, `Triangles` when the batch was converted.
    pub topology: Topology,
    pub element_count: usize,
    pub min_index: u32,
    pub max_index: Option<u32>,
    span: BatchSpan,
}

/// The batch currently being built.
#[derive(Debug, Clone)]
struct ActiveBatch {
    topology: Topology,
    min_index: u32,
}

/// Stateful builder that turns immediate-mode vertex streams into segments.
///
/// The tessellator is single-threaded and meant to be reused: call
/// [`reset`](Self::reset) between construction sessions to keep the buffer
/// allocations.
#[derive(Debug)]
pub struct Tessellator {
    options: TessellatorOptions,
    pool: SharedConfigurationPool,
    config: RenderableConfiguration,
    buffers: StreamBuffers,
    conversion: Option<ConversionState>,
    batch: Option<ActiveBatch>,
    batches: Vec<BatchRecord>,
    segments: Vec<Arc<Segment>>,
    bounds: Option<Aabb>,
    local_position: Vec3,
    last_normal: Vec3,
}

impl Tessellator {
    /// Create a tessellator with default options.
    pub fn new(pool: SharedConfigurationPool) -> Self {
        Self::with_options(pool, TessellatorOptions::default())
    }

    pub fn with_options(pool: SharedConfigurationPool, options: TessellatorOptions) -> Self {
        Self {
            buffers: StreamBuffers::with_capacity(options.initial_capacity),
            options,
            pool,
            config: RenderableConfiguration::new(),
            conversion: None,
            batch: None,
            batches: Vec::new(),
            segments: Vec::new(),
            bounds: None,
            local_position: Vec3::zeros(),
            last_normal: Vec3::zeros(),
        }
    }

    pub fn options(&self) -> &TessellatorOptions {
        &self.options
    }

    pub fn pool(&self) -> &SharedConfigurationPool {
        &self.pool
    }

    pub fn convert_to_triangles(&self) -> bool {
        self.options.convert_to_triangles
    }

    /// Takes effect from the next [`start`](Self::start).
    pub fn set_convert_to_triangles(&mut self, convert: bool) {
        self.options.convert_to_triangles = convert;
    }

    /// Discard everything built so far and return to idle.
    ///
    /// The options and buffer allocations are kept.
    pub fn reset(&mut self) {
        self.buffers.clear();
        self.conversion = None;
        self.batch = None;
        self.batches.clear();
        self.segments.clear();
        self.bounds = None;
        self.config = RenderableConfiguration::new();
        self.local_position = Vec3::zeros();
        self.last_normal = Vec3::zeros();
    }

    pub fn is_building(&self) -> bool {
        self.batch.is_some()
    }

    /// Begin a batch of `topology`.
    pub fn start(&mut self, topology: Topology) -> MeshResult<()> {
        let conversion = (self.options.convert_to_triangles && topology.is_convertible())
            .then(|| ConversionState::new(topology));
        self.begin(topology, conversion)
    }

    /// Begin a batch whose primitives are emitted explicitly with
    /// [`add_quad`](Self::add_quad) and [`add_triangle`](Self::add_triangle).
    ///
    /// Points, lines and polygons have no quads or triangles to emit and
    /// fail with [`MeshError::UnsupportedTopology`].
    pub fn start_staged(&mut self, topology: Topology) -> MeshResult<()> {
        if !topology.supports_bulk_emission() {
            return Err(MeshError::UnsupportedTopology(topology));
        }
        let triangulate = self.options.convert_to_triangles && topology.is_convertible();
        self.begin(topology, Some(ConversionState::staged(topology, triangulate)))
    }

    fn begin(&mut self, topology: Topology, conversion: Option<ConversionState>) -> MeshResult<()> {
        if self.batch.is_some() {
            return Err(MeshError::invalid_state(
                "start called while a batch is already being built",
            ));
        }
        let min_index = self.buffers.begin_batch();
        log::debug!(
            "Starting {:?} batch at vertex {} (conversion: {:?})",
            topology,
            min_index,
            conversion.as_ref().map(ConversionState::mode)
        );
        self.conversion = conversion;
        self.batch = Some(ActiveBatch {
            topology,
            min_index,
        });
        Ok(())
    }

    /// Finish the current batch.
    pub fn stop(&mut self) -> MeshResult<()> {
        let batch = self
            .batch
            .take()
            .ok_or_else(|| MeshError::invalid_state("stop called without a matching start"))?;

        let mut topology = batch.topology;
        if let Some(mut conversion) = self.conversion.take() {
            crate::profile_scope!("flush_conversion");
            conversion.finish(&mut self.buffers, &self.config);
            if conversion.is_triangulating() {
                topology = Topology::Triangles;
            }
        }

        let record = BatchRecord {
            topology,
            element_count: self.buffers.element_count(),
            min_index: batch.min_index,
            max_index: self.buffers.max_index(),
            span: self.buffers.batch_span(),
        };
        log::debug!(
            "Finished {:?} batch with {} vertices",
            record.topology,
            record.element_count
        );
        self.batches.push(record);
        Ok(())
    }

    pub fn add_color(&mut self, color: Color) -> MeshResult<()> {
        self.require_building()?;
        match self.conversion.as_mut() {
            Some(conversion) => {
                conversion.push_color(color)?;
                conversion.convert(&mut self.buffers, &self.config)?;
            }
            None => {
                let width = self.config.components(AttributeChannel::Color);
                self.buffers.push_color(&color, width);
            }
        }
        Ok(())
    }

    /// Add an opaque color.
    pub fn add_color_rgb(&mut self, r: f32, g: f32, b: f32) -> MeshResult<()> {
        self.add_color(Color::rgb(r, g, b))
    }

    pub fn add_normal(&mut self, normal: Vec3) -> MeshResult<()> {
        self.require_building()?;
        self.last_normal = normal;
        match self.conversion.as_mut() {
            Some(conversion) => {
                conversion.push_normal(normal)?;
                conversion.convert(&mut self.buffers, &self.config)?;
            }
            None => self.buffers.push_normal(&normal),
        }
        Ok(())
    }

    /// Add the normal of the counter-clockwise triangle `p1, p2, p3`.
    pub fn add_normal_from_triangle(&mut self, p1: &Vec3, p2: &Vec3, p3: &Vec3) -> MeshResult<()> {
        self.add_normal(math::triangle_normal(p1, p2, p3))
    }

    /// Repeat the most recent normal.
    pub fn add_normal_again(&mut self) -> MeshResult<()> {
        self.add_normal(self.last_normal)
    }

    pub fn add_tex_coord(&mut self, s: f32, t: f32) -> MeshResult<()> {
        self.push_tex_coord(Vec3::new(s, t, 0.0))
    }

    /// Add a 3-component texture coordinate, switching the working
    /// configuration to 3-component texcoords.
    pub fn add_tex_coord_3d(&mut self, s: f32, t: f32, r: f32) -> MeshResult<()> {
        self.require_building()?;
        self.config.set_components(AttributeChannel::TexCoord, 3)?;
        self.push_tex_coord(Vec3::new(s, t, r))
    }

    fn push_tex_coord(&mut self, tex_coord: Vec3) -> MeshResult<()> {
        self.require_building()?;
        match self.conversion.as_mut() {
            Some(conversion) => {
                conversion.push_tex_coord(tex_coord)?;
                conversion.convert(&mut self.buffers, &self.config)?;
            }
            None => {
                let width = self.config.components(AttributeChannel::TexCoord);
                self.buffers.push_tex_coord(&tex_coord, width);
            }
        }
        Ok(())
    }

    pub fn add_vertex(&mut self, position: Vec3) -> MeshResult<()> {
        self.add_vertex_4d(position.push(1.0))
    }

    /// Add a vertex in the z = 0 plane.
    pub fn add_vertex_2d(&mut self, position: Vec2) -> MeshResult<()> {
        self.add_vertex_4d(Vec4::new(position.x, position.y, 0.0, 1.0))
    }

    /// Add a homogeneous vertex. The local position offsets x, y and z.
    pub fn add_vertex_4d(&mut self, position: Vec4) -> MeshResult<()> {
        self.require_building()?;
        let offset = self.local_position;
        let vertex = Vec4::new(
            position.x + offset.x,
            position.y + offset.y,
            position.z + offset.z,
            position.w,
        );

        match self.conversion.as_mut() {
            Some(conversion) => {
                conversion.push_vertex(vertex)?;
                math::expand_bounds(&mut self.bounds, vertex.xyz());
                conversion.convert(&mut self.buffers, &self.config)?;
            }
            None => {
                let width = self.config.components(AttributeChannel::Position);
                self.buffers.push_vertex(&vertex, width);
                math::expand_bounds(&mut self.bounds, vertex.xyz());
            }
        }
        Ok(())
    }

    /// Emit the four staged vertices as a quad.
    pub fn add_quad(&mut self) -> MeshResult<()> {
        self.require_building()?;
        let conversion = self
            .conversion
            .as_mut()
            .ok_or_else(|| MeshError::invalid_state("add_quad requires a staged batch"))?;
        conversion.emit_quad(&mut self.buffers, &self.config)
    }

    /// Emit the three staged vertices as a triangle.
    pub fn add_triangle(&mut self) -> MeshResult<()> {
        self.require_building()?;
        let conversion = self
            .conversion
            .as_mut()
            .ok_or_else(|| MeshError::invalid_state("add_triangle requires a staged batch"))?;
        conversion.emit_triangle(&mut self.buffers, &self.config)
    }

    /// Snapshot the most recently finished batch into a new segment.
    ///
    /// The tessellator keeps its data; calling this twice yields two
    /// distinct segments with equal contents.
    pub fn create_segment(&self, name: impl Into<String>) -> MeshResult<Segment> {
        crate::profile_function!();
        if self.is_building() {
            return Err(MeshError::invalid_state(
                "create_segment called while a batch is being built",
            ));
        }
        let record = self
            .batches
            .last()
            .ok_or_else(|| {
                MeshError::invalid_state("create_segment called before any batch finished")
            })?;

        let mut segment = Segment::new(name, record.topology)
            .with_element_count(record.element_count)
            .with_index_range(record.min_index, record.max_index);
        for channel in AttributeChannel::ALL {
            let data = &self.buffers.data(channel)[record.span.range(channel)];
            segment = segment.with_data(channel, data.to_vec());
        }
        log::debug!(
            "Created segment '{}' ({:?}, {} vertices)",
            segment.name(),
            segment.topology(),
            segment.element_count()
        );
        crate::profile_plot!("segment_vertices", record.element_count);
        Ok(segment)
    }

    /// Create a segment from the last batch and keep it for
    /// [`build_mesh`](Self::build_mesh).
    pub fn add_segment(&mut self, name: impl Into<String>) -> MeshResult<Arc<Segment>> {
        let segment = Arc::new(self.create_segment(name)?);
        self.segments.push(Arc::clone(&segment));
        Ok(segment)
    }

    /// Segments kept by [`add_segment`](Self::add_segment).
    pub fn segments(&self) -> &[Arc<Segment>] {
        &self.segments
    }

    /// Assemble the kept segments into a validated mesh.
    ///
    /// The kept segment list is drained; buffers and bounds stay until
    /// [`reset`](Self::reset).
    pub fn build_mesh(&mut self) -> MeshResult<Mesh> {
        crate::profile_function!();
        if self.is_building() {
            return Err(MeshError::invalid_state(
                "build_mesh called while a batch is being built",
            ));
        }
        let handle = self.get_or_add_config_to_pool();
        let mut mesh = Mesh::new(self.pool.clone());
        mesh.set_renderable_config(handle)?;
        mesh.set_bounds(self.bounds);
        for segment in std::mem::take(&mut self.segments) {
            mesh.add_segment(segment)?;
        }
        log::debug!(
            "Built mesh with {} segments and {} vertices",
            mesh.segment_count(),
            mesh.total_vertices()
        );
        Ok(mesh)
    }

    /// Intern the working configuration.
    pub fn get_or_add_config_to_pool(&self) -> ConfigHandle {
        self.pool.intern(&self.config)
    }

    pub fn config(&self) -> &RenderableConfiguration {
        &self.config
    }

    /// Mutable access to the working configuration.
    ///
    /// Changing component widths mid-batch makes the batch's arrays
    /// inconsistent; configure before the first `start`.
    pub fn config_mut(&mut self) -> &mut RenderableConfiguration {
        &mut self.config
    }

    pub fn set_config(&mut self, config: RenderableConfiguration) {
        self.config = config;
    }

    /// Offset applied to every subsequent vertex.
    pub fn set_local_position(&mut self, position: Vec3) {
        self.local_position = position;
    }

    pub fn local_position(&self) -> Vec3 {
        self.local_position
    }

    /// Bounds of every vertex added since the last reset.
    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }

    /// Topology of the batch being built, or of the last finished batch.
    pub fn topology(&self) -> Option<Topology> {
        match &self.batch {
            Some(batch) => Some(batch.topology),
            None => self.batches.last().map(|record| record.topology),
        }
    }

    /// Vertices emitted by the batch being built, or by the last finished
    /// batch.
    pub fn element_count(&self) -> usize {
        self.buffers.element_count()
    }

    pub fn batches(&self) -> &[BatchRecord] {
        &self.batches
    }

    pub fn colors(&self) -> &[f32] {
        self.buffers.data(AttributeChannel::Color)
    }

    pub fn normals(&self) -> &[f32] {
        self.buffers.data(AttributeChannel::Normal)
    }

    pub fn tex_coords(&self) -> &[f32] {
        self.buffers.data(AttributeChannel::TexCoord)
    }

    pub fn vertices(&self) -> &[f32] {
        self.buffers.data(AttributeChannel::Position)
    }

    /// Index assigned to every emitted vertex, in emission order.
    pub fn vertex_indexes(&self) -> &[u32] {
        self.buffers.vertex_indexes()
    }

    fn require_building(&self) -> MeshResult<()> {
        if self.batch.is_none() {
            return Err(MeshError::invalid_state(
                "vertex data added outside of start/stop",
            ));
        }
        Ok(())
    }
}
