use super::grid::TileIndex;
use crate::core::config::TileNaming;
use crate::prelude::{Arc, HashMap};
use crate::TileError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Everything a resolver needs to locate one tile resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileKey {
    pub index: TileIndex,
    /// Zero-padded index (`"01"`..`"64"`)
    pub formatted: String,
    /// Resource name after applying the naming convention
    pub name: String,
}

impl TileKey {
    pub fn new(index: TileIndex, naming: &TileNaming) -> Self {
        let formatted = index.format();
        let name = naming.file_name(&formatted);
        Self {
            index,
            formatted,
            name,
        }
    }
}

/// A resolved, loadable tile resource. Cloning shares the underlying bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct TileHandle {
    /// Where the resource came from (file path or bundle key)
    pub source: String,
    pub data: Arc<Vec<u8>>,
    /// Pixel dimensions, when the resolver decoded the image
    pub dimensions: Option<(u32, u32)>,
}

impl TileHandle {
    pub fn new(source: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            source: source.into(),
            data: Arc::new(data),
            dimensions: None,
        }
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.dimensions = Some((width, height));
        self
    }

    pub fn byte_len(&self) -> usize {
        self.data.len()
    }
}

/// Turns a tile key into a loadable resource.
#[async_trait]
pub trait TileResolver: Send + Sync {
    async fn resolve(&self, key: &TileKey) -> std::result::Result<TileHandle, TileError>;
}

/// Resolver over tiles bundled in memory, keyed by the formatted index
#[derive(Debug, Default, Clone)]
pub struct InMemoryResolver {
    tiles: HashMap<String, Arc<Vec<u8>>>,
}

impl InMemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, formatted: impl Into<String>, data: Vec<u8>) {
        self.tiles.insert(formatted.into(), Arc::new(data));
    }

    pub fn with_tile(mut self, formatted: impl Into<String>, data: Vec<u8>) -> Self {
        self.insert(formatted, data);
        self
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

#[async_trait]
impl TileResolver for InMemoryResolver {
    async fn resolve(&self, key: &TileKey) -> std::result::Result<TileHandle, TileError> {
        let data = self
            .tiles
            .get(&key.formatted)
            .ok_or_else(|| TileError::NotFound(key.name.clone()))?;

        Ok(TileHandle {
            source: key.name.clone(),
            data: Arc::clone(data),
            dimensions: None,
        })
    }
}

/// Resolver reading `<root>/<prefix><key>.<extension>` from disk.
///
/// The read is synchronous inside the returned future; it runs on whichever
/// executor the loader's spawner polls it on.
#[derive(Debug, Clone)]
pub struct FileTileResolver {
    root: PathBuf,
}

impl FileTileResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &TileKey) -> PathBuf {
        self.root.join(&key.name)
    }
}

#[async_trait]
impl TileResolver for FileTileResolver {
    async fn resolve(&self, key: &TileKey) -> std::result::Result<TileHandle, TileError> {
        let path = self.path_for(key);
        let source = path.display().to_string();

        let data = std::fs::read(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => TileError::NotFound(source.clone()),
            _ => TileError::Io(format!("{}: {}", source, e)),
        })?;

        let dimensions = decode_dimensions(&data).map_err(|reason| {
            TileError::Decode(format!("{}: {}", source, reason))
        })?;

        Ok(TileHandle {
            source,
            data: Arc::new(data),
            dimensions,
        })
    }
}

/// Check that the bytes form a usable image, returning its size when known
#[cfg(feature = "decode")]
fn decode_dimensions(data: &[u8]) -> std::result::Result<Option<(u32, u32)>, String> {
    use image::GenericImageView;

    let image = image::load_from_memory(data).map_err(|e| e.to_string())?;
    Ok(Some(image.dimensions()))
}

/// Without a decoder only the file signature can be checked
#[cfg(not(feature = "decode"))]
fn decode_dimensions(data: &[u8]) -> std::result::Result<Option<(u32, u32)>, String> {
    const SIGNATURES: [&[u8]; 4] = [
        &[0xFF, 0xD8, 0xFF],
        &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A],
        b"GIF8",
        b"RIFF",
    ];

    if SIGNATURES.iter().any(|signature| data.starts_with(signature)) {
        Ok(None)
    } else {
        Err("unrecognized image signature".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_key_naming() {
        let key = TileKey::new(TileIndex(3), &TileNaming::default());
        assert_eq!(key.formatted, "03");
        assert_eq!(key.name, "terrain_z2_03.jpg");
    }

    #[test]
    fn test_in_memory_resolver() {
        let resolver = InMemoryResolver::new().with_tile("05", vec![1, 2, 3]);
        let naming = TileNaming::default();

        let handle = block_on(resolver.resolve(&TileKey::new(TileIndex(5), &naming))).unwrap();
        assert_eq!(*handle.data, vec![1, 2, 3]);
        assert_eq!(handle.source, "terrain_z2_05.jpg");

        let missing = block_on(resolver.resolve(&TileKey::new(TileIndex(6), &naming)));
        assert_eq!(
            missing,
            Err(TileError::NotFound("terrain_z2_06.jpg".to_string()))
        );
    }

    #[test]
    fn test_file_resolver_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = FileTileResolver::new(dir.path());
        let key = TileKey::new(TileIndex(42), &TileNaming::default());

        let result = block_on(resolver.resolve(&key));
        assert!(matches!(result, Err(TileError::NotFound(_))));
    }

    #[test]
    fn test_file_resolver_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let naming = TileNaming::default();
        let key = TileKey::new(TileIndex(1), &naming);
        std::fs::write(dir.path().join(&key.name), b"definitely not an image").unwrap();

        let result = block_on(FileTileResolver::new(dir.path()).resolve(&key));
        assert!(matches!(result, Err(TileError::Decode(_))));
    }

    #[cfg(feature = "decode")]
    #[test]
    fn test_file_resolver_decodes_png() {
        let dir = tempfile::tempdir().unwrap();
        let naming = TileNaming {
            prefix: "tile_".to_string(),
            extension: "png".to_string(),
        };
        let key = TileKey::new(TileIndex(2), &naming);

        let image = image::RgbImage::from_pixel(4, 3, image::Rgb([10, 20, 30]));
        image.save(dir.path().join(&key.name)).unwrap();

        let handle = block_on(FileTileResolver::new(dir.path()).resolve(&key)).unwrap();
        assert_eq!(handle.dimensions, Some((4, 3)));
        assert!(handle.byte_len() > 0);
        assert!(handle.source.ends_with("tile_02.png"));
    }
}
