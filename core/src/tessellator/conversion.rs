//! Sliding-window re-triangulation of strips, fans and quads.
//!
//! The converter holds up to four pending values per attribute channel. Once
//! enough vertices have arrived for the batch topology, it emits whole
//! triangles into the output buffers and slides the window:
//!
//! | Topology                     | Trigger | Emitted slots      | Slide                    |
//! |------------------------------|---------|--------------------|--------------------------|
//! | `Quads`                      | 4       | 0,1,2 then 2,3,0   | window emptied           |
//! | `QuadStrip`, `TriangleStrip` | 4       | 3,1,0 then 0,2,3   | slots 2,3 move to 0,1    |
//! | `TriangleFan`                | 3       | 0,1,2              | slot 2 moves to 1        |
//!
//! The strip ordering keeps the winding of the source strip; a renderer that
//! culls back faces depends on it.
//!
//! A *staged* converter never fires on its own. Values accumulate until the
//! caller emits an explicit quad or triangle.

use crate::error::{MeshError, MeshResult};
use crate::math::{Color, Vec3, Vec4};
use crate::mesh::{AttributeChannel, RenderableConfiguration, Topology};

use super::buffers::StreamBuffers;

const QUAD_TRIANGLES: [usize; 6] = [0, 1, 2, 2, 3, 0];
const QUAD_RAW: [usize; 4] = [0, 1, 2, 3];
const STRIP_TRIANGLES: [usize; 6] = [3, 1, 0, 0, 2, 3];
const SINGLE_TRIANGLE: [usize; 3] = [0, 1, 2];
const STRIP_TAIL: [usize; 3] = [2, 1, 0];

/// Up to four pending values of one channel.
#[derive(Debug, Clone)]
struct Window<T> {
    channel: AttributeChannel,
    slots: [T; 4],
    held: usize,
    has_data: bool,
}

impl<T: Copy> Window<T> {
    fn new(channel: AttributeChannel, fill: T) -> Self {
        Self {
            channel,
            slots: [fill; 4],
            held: 0,
            has_data: false,
        }
    }

    fn push(&mut self, value: T) -> MeshResult<()> {
        if self.held == self.slots.len() {
            return Err(MeshError::invalid_state(format!(
                "{:?} window already holds {} pending values",
                self.channel, self.held
            )));
        }
        self.slots[self.held] = value;
        self.held += 1;
        self.has_data = true;
        Ok(())
    }

    /// Move slots 2,3 to 0,1.
    fn slide_pair(&mut self) {
        self.slots[0] = self.slots[2];
        self.slots[1] = self.slots[3];
        self.held = self.held.saturating_sub(2);
    }

    /// Keep the fan center, move slot 2 to 1.
    fn slide_fan(&mut self) {
        self.slots[1] = self.slots[2];
        self.held = self.held.saturating_sub(1);
    }

    fn clear(&mut self) {
        self.held = 0;
    }

    /// Channels without data are not required to match the vertex count.
    fn is_ready(&self, count: usize) -> bool {
        !self.has_data || self.held == count
    }
}

/// How a [`ConversionState`] emits triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionMode {
    /// Emit automatically whenever the window holds enough vertices.
    Sliding,
    /// Emit only on explicit
    /// [`Tessellator::add_quad`](super::Tessellator::add_quad) /
    /// [`Tessellator::add_triangle`](super::Tessellator::add_triangle) calls.
    Staged,
}

/// Per-batch re-triangulation state.
#[derive(Debug, Clone)]
pub struct ConversionState {
    topology: Topology,
    mode: ConversionMode,
    triangulate: bool,
    emitted: bool,
    colors: Window<Color>,
    normals: Window<Vec3>,
    tex_coords: Window<Vec3>,
    vertices: Window<Vec4>,
}

impl ConversionState {
    /// Converter that re-triangulates `topology` as vertices arrive.
    pub fn new(topology: Topology) -> Self {
        Self::with_mode(topology, ConversionMode::Sliding, true)
    }

    /// Converter that holds values until the caller emits a primitive.
    ///
    /// When `triangulate` is false quads are emitted as four raw vertices.
    pub fn staged(topology: Topology, triangulate: bool) -> Self {
        Self::with_mode(topology, ConversionMode::Staged, triangulate)
    }

    fn with_mode(topology: Topology, mode: ConversionMode, triangulate: bool) -> Self {
        Self {
            topology,
            mode,
            triangulate,
            emitted: false,
            colors: Window::new(AttributeChannel::Color, Color::WHITE),
            normals: Window::new(AttributeChannel::Normal, Vec3::zeros()),
            tex_coords: Window::new(AttributeChannel::TexCoord, Vec3::zeros()),
            vertices: Window::new(AttributeChannel::Position, Vec4::zeros()),
        }
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn mode(&self) -> ConversionMode {
        self.mode
    }

    /// Whether the batch output is a triangle list.
    pub fn is_triangulating(&self) -> bool {
        self.triangulate
    }

    /// Number of vertices waiting in the window.
    pub fn held_vertices(&self) -> usize {
        self.vertices.held
    }

    pub fn push_color(&mut self, color: Color) -> MeshResult<()> {
        self.colors.push(color)
    }

    pub fn push_normal(&mut self, normal: Vec3) -> MeshResult<()> {
        self.normals.push(normal)
    }

    pub fn push_tex_coord(&mut self, tex_coord: Vec3) -> MeshResult<()> {
        self.tex_coords.push(tex_coord)
    }

    pub fn push_vertex(&mut self, vertex: Vec4) -> MeshResult<()> {
        self.vertices.push(vertex)
    }

    /// Emit every complete primitive the window holds.
    ///
    /// Emission waits until every channel with data holds a value for the
    /// triggering vertex, so attributes may follow their vertex. A channel
    /// that falls further behind or runs ahead fails with
    /// [`MeshError::InvalidState`]. Returns the number of vertices written to
    /// `out`. Staged converters never emit here.
    pub(crate) fn convert(
        &mut self,
        out: &mut StreamBuffers,
        config: &RenderableConfiguration,
    ) -> MeshResult<usize> {
        if self.mode == ConversionMode::Staged {
            return Ok(0);
        }
        let trigger = match self.topology {
            Topology::Quads | Topology::QuadStrip | Topology::TriangleStrip => 4,
            Topology::TriangleFan => 3,
            other => return Err(MeshError::UnsupportedTopology(other)),
        };
        if self.vertices.held < trigger {
            return Ok(0);
        }
        if !self.channels_ready(trigger) {
            if self.vertices.held > trigger || self.channels_ahead(trigger) {
                return Err(MeshError::invalid_state(format!(
                    "attributes out of step with vertices in a {:?} batch",
                    self.topology
                )));
            }
            return Ok(0);
        }

        match self.topology {
            Topology::Quads => {
                self.emit(&QUAD_TRIANGLES, out, config);
                self.clear();
                Ok(QUAD_TRIANGLES.len())
            }
            Topology::TriangleFan => {
                self.emit(&SINGLE_TRIANGLE, out, config);
                self.colors.slide_fan();
                self.normals.slide_fan();
                self.tex_coords.slide_fan();
                self.vertices.slide_fan();
                Ok(SINGLE_TRIANGLE.len())
            }
            _ => {
                self.emit(&STRIP_TRIANGLES, out, config);
                self.colors.slide_pair();
                self.normals.slide_pair();
                self.tex_coords.slide_pair();
                self.vertices.slide_pair();
                Ok(STRIP_TRIANGLES.len())
            }
        }
    }

    /// Emit the staged quad.
    pub(crate) fn emit_quad(
        &mut self,
        out: &mut StreamBuffers,
        config: &RenderableConfiguration,
    ) -> MeshResult<()> {
        self.check_staged("quad", Topology::Quads, 4)?;
        if self.triangulate {
            self.emit(&QUAD_TRIANGLES, out, config);
        } else {
            self.emit(&QUAD_RAW, out, config);
        }
        self.clear();
        Ok(())
    }

    /// Emit the staged triangle.
    pub(crate) fn emit_triangle(
        &mut self,
        out: &mut StreamBuffers,
        config: &RenderableConfiguration,
    ) -> MeshResult<()> {
        self.check_staged("triangle", Topology::Triangles, 3)?;
        self.emit(&SINGLE_TRIANGLE, out, config);
        self.clear();
        Ok(())
    }

    /// Flush what can still be emitted at the end of a batch.
    ///
    /// A triangle strip stopped with three vertices pending emits its
    /// trailing triangle. Strips and fans always retain the vertices shared
    /// with their last primitive; anything beyond that is dropped. Returns
    /// the number of dropped vertices.
    pub(crate) fn finish(
        &mut self,
        out: &mut StreamBuffers,
        config: &RenderableConfiguration,
    ) -> usize {
        if self.mode == ConversionMode::Sliding
            && self.topology == Topology::TriangleStrip
            && self.vertices.held == 3
            && self.channels_ready(3)
        {
            self.emit(&STRIP_TAIL, out, config);
            self.clear();
        }
        let retained = match self.topology {
            Topology::QuadStrip | Topology::TriangleStrip | Topology::TriangleFan
                if self.emitted && self.mode == ConversionMode::Sliding =>
            {
                2
            }
            _ => 0,
        };
        let dropped = self.vertices.held.saturating_sub(retained);
        if dropped > 0 {
            log::warn!(
                "Discarding {} pending vertices at the end of a {:?} batch",
                dropped,
                self.topology
            );
        }
        self.clear();
        dropped
    }

    fn check_staged(&self, primitive: &str, native: Topology, count: usize) -> MeshResult<()> {
        if self.mode != ConversionMode::Staged {
            return Err(MeshError::invalid_state(format!(
                "explicit {primitive} emission requires a staged batch"
            )));
        }
        if !self.topology.supports_bulk_emission() {
            return Err(MeshError::invalid_state(format!(
                "cannot emit a {primitive} into a {:?} batch",
                self.topology
            )));
        }
        if !self.triangulate && self.topology != native {
            return Err(MeshError::invalid_state(format!(
                "cannot emit a {primitive} into a non-triangulated {:?} batch",
                self.topology
            )));
        }
        if self.vertices.held != count || !self.channels_ready(count) {
            return Err(MeshError::invalid_state(format!(
                "a {primitive} needs {count} staged values per channel, found {} vertices",
                self.vertices.held
            )));
        }
        Ok(())
    }

    fn channels_ready(&self, count: usize) -> bool {
        self.colors.is_ready(count)
            && self.normals.is_ready(count)
            && self.tex_coords.is_ready(count)
    }

    fn channels_ahead(&self, count: usize) -> bool {
        self.colors.held > count || self.normals.held > count || self.tex_coords.held > count
    }

    /// Write the given window slots to `out`, channel by channel.
    fn emit(&mut self, order: &[usize], out: &mut StreamBuffers, config: &RenderableConfiguration) {
        self.emitted = true;
        if self.colors.has_data {
            let width = config.components(AttributeChannel::Color);
            for &slot in order {
                out.push_color(&self.colors.slots[slot], width);
            }
        }
        if self.normals.has_data {
            for &slot in order {
                out.push_normal(&self.normals.slots[slot]);
            }
        }
        if self.tex_coords.has_data {
            let width = config.components(AttributeChannel::TexCoord);
            for &slot in order {
                out.push_tex_coord(&self.tex_coords.slots[slot], width);
            }
        }
        if self.vertices.has_data {
            let width = config.components(AttributeChannel::Position);
            for &slot in order {
                out.push_vertex(&self.vertices.slots[slot], width);
            }
        }
    }

    fn clear(&mut self) {
        self.colors.clear();
        self.normals.clear();
        self.tex_coords.clear();
        self.vertices.clear();
    }
}
