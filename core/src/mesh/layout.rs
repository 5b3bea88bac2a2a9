//! Vertex record layout descriptions.
//!
//! A [`RenderableConfiguration`] describes the numeric shape of one vertex
//! record: how many components each attribute channel carries and which
//! numeric kind they are stored as. Renderers use it to pick a GPU vertex
//! layout without inspecting the attribute data.
//!
//! Configurations repeat heavily across meshes (most meshes share the
//! `{float3 normal, float2 texcoord, float3 position}` shape), so they are
//! interned in a [`ConfigurationPool`](crate::pool::ConfigurationPool) and
//! referenced by handle.
//!
//! # Example
//!
//! ```
//! use tessellator_core::mesh::{AttributeChannel, NumericKind, RenderableConfiguration};
//!
//! let config = RenderableConfiguration::new()
//!     .with_color_components(3)
//!     .unwrap()
//!     .with_kind(AttributeChannel::Color, NumericKind::UnsignedByte);
//!
//! assert_eq!(config.components(AttributeChannel::Color), 3);
//! assert_eq!(config.channel_size(AttributeChannel::Color), 3);
//! assert_eq!(config.stride(), 3 + 12 + 8 + 12);
//! ```

use crate::error::{MeshError, MeshResult};

/// One attribute channel of a vertex record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeChannel {
    /// Vertex color (3 or 4 components).
    Color,
    /// Vertex normal (always 3 components).
    Normal,
    /// Texture coordinate (2 or 3 components).
    TexCoord,
    /// Vertex position (3 or 4 components).
    Position,
}

impl AttributeChannel {
    /// All channels in record order.
    pub const ALL: [Self; 4] = [Self::Color, Self::Normal, Self::TexCoord, Self::Position];

    /// Component counts a configuration may declare for this channel.
    pub fn allowed_components(&self) -> &'static [usize] {
        match self {
            Self::Color => &[3, 4],
            Self::Normal => &[3],
            Self::TexCoord => &[2, 3],
            Self::Position => &[3, 4],
        }
    }
}

/// Numeric representation of a channel's components.
///
/// These mirror the component types a graphics API accepts for vertex
/// attributes. The tessellator always produces `f32` data; the kind only
/// tells the renderer how to convert it on upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NumericKind {
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    HalfFloat,
    #[default]
    Float,
    Double,
    /// 16.16 fixed point.
    Fixed,
}

impl NumericKind {
    /// Size in bytes of a single component.
    pub fn size(&self) -> usize {
        match self {
            Self::Byte | Self::UnsignedByte => 1,
            Self::Short | Self::UnsignedShort | Self::HalfFloat => 2,
            Self::Int | Self::UnsignedInt | Self::Float | Self::Fixed => 4,
            Self::Double => 8,
        }
    }
}

/// Numeric layout of one vertex record.
///
/// Equality and hashing are structural over every field, which is what the
/// configuration pool interns on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderableConfiguration {
    color_components: usize,
    color_kind: NumericKind,
    normal_kind: NumericKind,
    tex_coord_components: usize,
    tex_coord_kind: NumericKind,
    vertex_components: usize,
    vertex_kind: NumericKind,
}

impl RenderableConfiguration {
    /// Float RGBA color, float normal, float2 texcoord, float3 position.
    pub fn new() -> Self {
        Self {
            color_components: 4,
            color_kind: NumericKind::Float,
            normal_kind: NumericKind::Float,
            tex_coord_components: 2,
            tex_coord_kind: NumericKind::Float,
            vertex_components: 3,
            vertex_kind: NumericKind::Float,
        }
    }

    /// Number of components declared for `channel`.
    pub fn components(&self, channel: AttributeChannel) -> usize {
        match channel {
            AttributeChannel::Color => self.color_components,
            AttributeChannel::Normal => 3,
            AttributeChannel::TexCoord => self.tex_coord_components,
            AttributeChannel::Position => self.vertex_components,
        }
    }

    /// Numeric kind declared for `channel`.
    pub fn kind(&self, channel: AttributeChannel) -> NumericKind {
        match channel {
            AttributeChannel::Color => self.color_kind,
            AttributeChannel::Normal => self.normal_kind,
            AttributeChannel::TexCoord => self.tex_coord_kind,
            AttributeChannel::Position => self.vertex_kind,
        }
    }

    /// Set the component count for `channel`.
    ///
    /// Fails with [`MeshError::InvalidComponentCount`] if the channel does not
    /// allow `count` components.
    pub fn set_components(&mut self, channel: AttributeChannel, count: usize) -> MeshResult<()> {
        if !channel.allowed_components().contains(&count) {
            return Err(MeshError::InvalidComponentCount { channel, count });
        }
        match channel {
            AttributeChannel::Color => self.color_components = count,
            AttributeChannel::Normal => {}
            AttributeChannel::TexCoord => self.tex_coord_components = count,
            AttributeChannel::Position => self.vertex_components = count,
        }
        Ok(())
    }

    /// Set the numeric kind for `channel`.
    pub fn set_kind(&mut self, channel: AttributeChannel, kind: NumericKind) {
        match channel {
            AttributeChannel::Color => self.color_kind = kind,
            AttributeChannel::Normal => self.normal_kind = kind,
            AttributeChannel::TexCoord => self.tex_coord_kind = kind,
            AttributeChannel::Position => self.vertex_kind = kind,
        }
    }

    pub fn with_color_components(mut self, count: usize) -> MeshResult<Self> {
        self.set_components(AttributeChannel::Color, count)?;
        Ok(self)
    }

    pub fn with_tex_coord_components(mut self, count: usize) -> MeshResult<Self> {
        self.set_components(AttributeChannel::TexCoord, count)?;
        Ok(self)
    }

    pub fn with_vertex_components(mut self, count: usize) -> MeshResult<Self> {
        self.set_components(AttributeChannel::Position, count)?;
        Ok(self)
    }

    pub fn with_kind(mut self, channel: AttributeChannel, kind: NumericKind) -> Self {
        self.set_kind(channel, kind);
        self
    }

    /// Size in bytes of `channel` within one record.
    pub fn channel_size(&self, channel: AttributeChannel) -> usize {
        self.components(channel) * self.kind(channel).size()
    }

    /// Size in bytes of a full interleaved record (all four channels).
    pub fn stride(&self) -> usize {
        AttributeChannel::ALL
            .iter()
            .map(|&channel| self.channel_size(channel))
            .sum()
    }
}

impl Default for RenderableConfiguration {
    fn default() -> Self {
        Self::new()
    }
}
