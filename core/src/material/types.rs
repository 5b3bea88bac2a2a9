//! Material data types.

use std::collections::BTreeMap;

use crate::math::Color;

/// Which polygon faces a material applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Face {
    Front,
    Back,
    #[default]
    FrontAndBack,
}

/// Texture slot a file is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextureType {
    Ambient,
    Diffuse,
    Specular,
    Normal,
    Height,
    Emissive,
    /// Cube map used for environment reflections.
    Environment,
}

/// Lighting response of a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialLight {
    pub face: Face,
    /// Specular exponent. Larger values give a smaller highlight.
    pub shininess: u32,
    pub ambient: Color,
    pub diffuse: Color,
    pub emission: Color,
    pub specular: Color,
}

impl MaterialLight {
    pub fn new() -> Self {
        Self {
            face: Face::FrontAndBack,
            shininess: 0,
            ambient: Color::new(0.2, 0.2, 0.2, 1.0),
            diffuse: Color::new(0.8, 0.8, 0.8, 1.0),
            emission: Color::BLACK,
            specular: Color::BLACK,
        }
    }

    #[must_use]
    pub fn with_diffuse(mut self, diffuse: Color) -> Self {
        self.diffuse = diffuse;
        self
    }

    #[must_use]
    pub fn with_specular(mut self, specular: Color, shininess: u32) -> Self {
        self.specular = specular;
        self.shininess = shininess;
        self
    }
}

impl Default for MaterialLight {
    fn default() -> Self {
        Self::new()
    }
}

/// Material of a single segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentMaterial {
    pub opaque: bool,
    pub light: MaterialLight,
    textures: BTreeMap<TextureType, String>,
}

impl SegmentMaterial {
    pub fn new() -> Self {
        Self {
            opaque: true,
            light: MaterialLight::new(),
            textures: BTreeMap::new(),
        }
    }

    /// Bind `filename` to `texture_type`, returning the previous file name.
    pub fn set_texture(
        &mut self,
        texture_type: TextureType,
        filename: impl Into<String>,
    ) -> Option<String> {
        self.textures.insert(texture_type, filename.into())
    }

    #[must_use]
    pub fn with_texture(mut self, texture_type: TextureType, filename: impl Into<String>) -> Self {
        self.set_texture(texture_type, filename);
        self
    }

    pub fn texture(&self, texture_type: TextureType) -> Option<&str> {
        self.textures.get(&texture_type).map(String::as_str)
    }

    /// All bound textures, ordered by [`TextureType`].
    pub fn textures(&self) -> impl Iterator<Item = (TextureType, &str)> {
        self.textures.iter().map(|(t, f)| (*t, f.as_str()))
    }
}

impl Default for SegmentMaterial {
    fn default() -> Self {
        Self::new()
    }
}

/// Material reference carried by a whole mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshMaterial {
    pub name: Option<String>,
    pub light: MaterialLight,
    pub opaque: bool,
}

impl MeshMaterial {
    pub fn new() -> Self {
        Self {
            name: None,
            light: MaterialLight::new(),
            opaque: true,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl Default for MeshMaterial {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_light_defaults() {
        let light = MaterialLight::default();
        assert_eq!(light.face, Face::FrontAndBack);
        assert_eq!(light.shininess, 0);
        assert_eq!(light.ambient, Color::new(0.2, 0.2, 0.2, 1.0));
        assert_eq!(light.diffuse, Color::new(0.8, 0.8, 0.8, 1.0));
        assert_eq!(light.emission, Color::BLACK);
        assert_eq!(light.specular, Color::BLACK);
    }

    #[test]
    fn segment_material_textures() {
        let mut mat = SegmentMaterial::new().with_texture(TextureType::Diffuse, "crate.png");
        assert!(mat.opaque);
        assert_eq!(mat.texture(TextureType::Diffuse), Some("crate.png"));
        assert_eq!(
            mat.set_texture(TextureType::Diffuse, "crate2.png"),
            Some("crate.png".to_string())
        );
        mat.set_texture(TextureType::Ambient, "ao.png");

        let all: Vec<_> = mat.textures().collect();
        assert_eq!(
            all,
            vec![(TextureType::Ambient, "ao.png"), (TextureType::Diffuse, "crate2.png")]
        );
    }

    #[test]
    fn mesh_material_builder() {
        let mat = MeshMaterial::new().with_name("stone");
        assert_eq!(mat.name.as_deref(), Some("stone"));
        assert!(mat.opaque);
    }
}
