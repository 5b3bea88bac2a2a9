//! Extension-dispatched model loading.
//!
//! [`MeshReader`] owns one [`ModelReader`] per file extension. Loading a file
//! strips leading path separators, picks the reader registered for the text
//! after the last `.` and lets it fill the target mesh through a
//! tessellator.

use std::collections::HashMap;

use crate::error::{MeshError, MeshResult};
use crate::tessellator::Tessellator;

use super::assembly::Mesh;

/// Parses one model format into segments.
///
/// Implementations report I/O and parse failures as
/// [`MeshError::ReaderFailed`].
pub trait ModelReader: Send + Sync {
    fn load(
        &self,
        filename: &str,
        tessellator: &mut Tessellator,
        mesh: &mut Mesh,
    ) -> MeshResult<()>;
}

/// Registry of model readers keyed by file extension.
///
/// Extensions are matched case-sensitively and without the leading dot.
#[derive(Default)]
pub struct MeshReader {
    readers: HashMap<String, Box<dyn ModelReader>>,
}

impl MeshReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_extension(
        &mut self,
        extension: impl Into<String>,
        reader: Box<dyn ModelReader>,
    ) -> MeshResult<()> {
        let extension = extension.into();
        if self.readers.contains_key(&extension) {
            return Err(MeshError::ExtensionAlreadyRegistered(extension));
        }
        log::debug!("Registered model reader for .{}", extension);
        self.readers.insert(extension, reader);
        Ok(())
    }

    pub fn unregister_extension(&mut self, extension: &str) -> MeshResult<Box<dyn ModelReader>> {
        self.readers
            .remove(extension)
            .ok_or_else(|| MeshError::UnknownExtension(extension.to_string()))
    }

    pub fn is_registered(&self, extension: &str) -> bool {
        self.readers.contains_key(extension)
    }

    /// Load `filename` into `mesh` with the reader registered for its
    /// extension.
    pub fn load(
        &self,
        filename: &str,
        tessellator: &mut Tessellator,
        mesh: &mut Mesh,
    ) -> MeshResult<()> {
        crate::profile_function!();
        let filename = filename.trim_start_matches(['/', '\\']);
        let (_, extension) = filename
            .rsplit_once('.')
            .ok_or_else(|| MeshError::MissingExtension(filename.to_string()))?;
        let reader = self
            .readers
            .get(extension)
            .ok_or_else(|| MeshError::UnknownExtension(extension.to_string()))?;
        log::debug!("Loading model {}", filename);
        reader.load(filename, tessellator, mesh)
    }
}

impl std::fmt::Debug for MeshReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut extensions: Vec<&str> = self.readers.keys().map(String::as_str).collect();
        extensions.sort_unstable();
        f.debug_struct("MeshReader")
            .field("extensions", &extensions)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use crate::mesh::Topology;
    use crate::pool::SharedConfigurationPool;

    /// Emits a single triangle named after the file.
    struct TriangleReader;

    impl ModelReader for TriangleReader {
        fn load(
            &self,
            filename: &str,
            tessellator: &mut Tessellator,
            mesh: &mut Mesh,
        ) -> MeshResult<()> {
            tessellator.start(Topology::Triangles)?;
            tessellator.add_vertex(Vec3::new(0.0, 0.0, 0.0))?;
            tessellator.add_vertex(Vec3::new(1.0, 0.0, 0.0))?;
            tessellator.add_vertex(Vec3::new(0.0, 1.0, 0.0))?;
            tessellator.stop()?;
            mesh.set_renderable_config(tessellator.get_or_add_config_to_pool())?;
            mesh.add_segment(tessellator.create_segment(filename)?)?;
            Ok(())
        }
    }

    struct FailingReader;

    impl ModelReader for FailingReader {
        fn load(&self, filename: &str, _: &mut Tessellator, _: &mut Mesh) -> MeshResult<()> {
            Err(MeshError::ReaderFailed {
                filename: filename.to_string(),
                message: "truncated header".to_string(),
            })
        }
    }

    fn setup() -> (Tessellator, Mesh) {
        let pool = SharedConfigurationPool::new();
        (Tessellator::new(pool.clone()), Mesh::new(pool))
    }

    #[test]
    fn test_load_dispatches_by_extension() {
        let mut reader = MeshReader::new();
        reader
            .register_extension("tri", Box::new(TriangleReader))
            .unwrap();
        let (mut tessellator, mut mesh) = setup();

        reader
            .load("//models/a.tri", &mut tessellator, &mut mesh)
            .unwrap();
        assert_eq!(mesh.segment_count(), 1);
        assert_eq!(mesh.segment(0).unwrap().name(), "models/a.tri");
    }

    #[test]
    fn test_registration_errors() {
        let mut reader = MeshReader::new();
        reader.register_extension("obj", Box::new(TriangleReader)).unwrap();
        assert_eq!(
            reader.register_extension("obj", Box::new(TriangleReader)),
            Err(MeshError::ExtensionAlreadyRegistered("obj".to_string()))
        );
        assert!(reader.unregister_extension("obj").is_ok());
        assert!(!reader.is_registered("obj"));
        assert!(matches!(
            reader.unregister_extension("obj"),
            Err(MeshError::UnknownExtension(ext)) if ext == "obj"
        ));
    }

    #[test]
    fn test_load_errors() {
        let mut reader = MeshReader::new();
        reader.register_extension("bad", Box::new(FailingReader)).unwrap();
        let (mut tessellator, mut mesh) = setup();

        assert_eq!(
            reader.load("/noextension", &mut tessellator, &mut mesh),
            Err(MeshError::MissingExtension("noextension".to_string()))
        );
        assert_eq!(
            reader.load("model.ply", &mut tessellator, &mut mesh),
            Err(MeshError::UnknownExtension("ply".to_string()))
        );
        assert!(matches!(
            reader.load("model.bad", &mut tessellator, &mut mesh),
            Err(MeshError::ReaderFailed { .. })
        ));
    }
}
