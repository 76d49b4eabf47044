//! Packaged asset stores
//!
//! A store is read-only and keyed by a relative, `/`-separated name.

use crate::AssetError;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Open handle on one asset.
///
/// Dropping it releases whatever the store opened.
pub struct AssetReader {
    inner: Box<dyn Read>,
    declared_len: Option<u64>,
}

impl AssetReader {
    pub fn new(inner: impl Read + 'static, declared_len: Option<u64>) -> Self {
        Self {
            inner: Box::new(inner),
            declared_len,
        }
    }

    /// Size the store reported when the asset was opened, if it knows one.
    pub fn declared_len(&self) -> Option<u64> {
        self.declared_len
    }
}

impl Read for AssetReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

/// Read-only packaged asset store.
pub trait AssetSource {
    fn open(&self, name: &str) -> Result<AssetReader, AssetError>;
}

impl<S: AssetSource + ?Sized> AssetSource for &S {
    fn open(&self, name: &str) -> Result<AssetReader, AssetError> {
        (**self).open(name)
    }
}

impl<S: AssetSource + ?Sized> AssetSource for Box<S> {
    fn open(&self, name: &str) -> Result<AssetReader, AssetError> {
        (**self).open(name)
    }
}

/// Reject names that could escape the store.
pub(crate) fn validate_name(name: &str) -> Result<(), AssetError> {
    let valid = !name.is_empty()
        && !name.contains('\\')
        && name
            .split('/')
            .all(|part| !part.is_empty() && part != "." && part != "..");
    if valid {
        Ok(())
    } else {
        Err(AssetError::InvalidName {
            name: name.to_string(),
        })
    }
}

/// Assets packaged as files under a directory.
#[derive(Debug, Clone)]
pub struct DirAssetStore {
    root: PathBuf,
}

impl DirAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for DirAssetStore {
    fn open(&self, name: &str) -> Result<AssetReader, AssetError> {
        validate_name(name)?;
        let path = name
            .split('/')
            .fold(self.root.clone(), |path, part| path.join(part));

        let file = File::open(&path).map_err(|err| AssetError::from_io(name, err))?;
        let metadata = file
            .metadata()
            .map_err(|err| AssetError::from_io(name, err))?;
        if !metadata.is_file() {
            return Err(AssetError::NotFound {
                name: name.to_string(),
            });
        }

        tracing::trace!(asset = name, path = %path.display(), "opened asset file");
        Ok(AssetReader::new(file, Some(metadata.len())))
    }
}

/// Assets held in memory, e.g. compiled into the binary.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetStore {
    assets: HashMap<String, Arc<[u8]>>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) {
        self.assets.insert(name.into(), bytes.into());
    }

    pub fn with(mut self, name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        self.insert(name, bytes);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.assets.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl AssetSource for MemoryAssetStore {
    fn open(&self, name: &str) -> Result<AssetReader, AssetError> {
        validate_name(name)?;
        let bytes = self
            .assets
            .get(name)
            .cloned()
            .ok_or_else(|| AssetError::NotFound {
                name: name.to_string(),
            })?;
        let len = bytes.len() as u64;
        Ok(AssetReader::new(Cursor::new(bytes), Some(len)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn validate_name_rejects_escapes() {
        for bad in ["", "/etc/passwd", "../secret.js", "a/../b.js", "a//b.js", "./a.js", "a\\b.js"] {
            assert!(
                matches!(validate_name(bad), Err(AssetError::InvalidName { .. })),
                "{bad:?} should be rejected"
            );
        }
        assert!(validate_name("payload.js").is_ok());
        assert!(validate_name("scripts/boot.js").is_ok());
    }

    #[test]
    fn dir_store_opens_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("scripts")).unwrap();
        fs::write(dir.path().join("scripts/boot.js"), b"boot()").unwrap();

        let store = DirAssetStore::new(dir.path());
        let mut reader = store.open("scripts/boot.js").unwrap();
        assert_eq!(reader.declared_len(), Some(6));

        let mut text = String::new();
        reader.read_to_string(&mut text).unwrap();
        assert_eq!(text, "boot()");
    }

    #[test]
    fn dir_store_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirAssetStore::new(dir.path());
        assert!(matches!(
            store.open("payload.js"),
            Err(AssetError::NotFound { name }) if name == "payload.js"
        ));
    }

    #[test]
    fn dir_store_directory_is_not_an_asset() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("payload.js")).unwrap();
        let store = DirAssetStore::new(dir.path());
        assert!(store.open("payload.js").is_err());
    }

    #[test]
    fn memory_store_lookup() {
        let store = MemoryAssetStore::new().with("payload.js", b"1+1".to_vec());
        assert!(store.contains("payload.js"));
        assert_eq!(store.len(), 1);

        let reader = store.open("payload.js").unwrap();
        assert_eq!(reader.declared_len(), Some(3));
        assert!(matches!(
            store.open("other.js"),
            Err(AssetError::NotFound { .. })
        ));
    }
}
