//! Asset loading
//!
//! Reads one packaged asset to completion and decodes it as UTF-8.

use crate::{AssetError, AssetSource, ScriptPayload};
use std::io::Read;

/// Upper bound on the up-front allocation taken from a declared size.
const MAX_PREALLOC: u64 = 16 * 1024 * 1024;

/// Loads script assets from a packaged store.
#[derive(Debug, Clone)]
pub struct AssetLoader<S> {
    source: S,
}

impl<S: AssetSource> AssetLoader<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Read the whole asset and decode it.
    ///
    /// Keeps reading past short reads until EOF; the store's declared size
    /// only sizes the buffer.
    pub fn load(&self, name: &str) -> Result<ScriptPayload, AssetError> {
        let mut reader = self.source.open(name)?;
        let declared = reader.declared_len();

        let capacity = declared.unwrap_or(0).min(MAX_PREALLOC) as usize;
        let mut bytes = Vec::with_capacity(capacity);
        reader.read_to_end(&mut bytes).map_err(|source| AssetError::Io {
            name: name.to_string(),
            source,
        })?;
        drop(reader);

        if let Some(declared) = declared {
            if declared != bytes.len() as u64 {
                tracing::debug!(
                    asset = name,
                    declared,
                    read = bytes.len(),
                    "asset size differs from declared size"
                );
            }
        }

        let text = String::from_utf8(bytes).map_err(|source| AssetError::InvalidUtf8 {
            name: name.to_string(),
            source,
        })?;

        tracing::debug!(asset = name, bytes = text.len(), "loaded asset");
        Ok(ScriptPayload::new(name, text))
    }

    /// Load `name`, or log the failure and fall back to an empty payload.
    ///
    /// Startup keeps going without the script rather than aborting.
    pub fn load_or_empty(&self, name: &str) -> ScriptPayload {
        match self.load(name) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(asset = name, error = %err, "asset load failed, continuing with empty payload");
                ScriptPayload::empty(name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AssetReader, DirAssetStore, MemoryAssetStore};
    use std::cell::Cell;
    use std::io::{self, ErrorKind};
    use std::rc::Rc;

    /// Serves each asset in fixed-size pieces, like a transport that
    /// returns fewer bytes than requested.
    struct ChunkedStore {
        bytes: Vec<u8>,
        chunk: usize,
        interrupt_first: bool,
        reads: Rc<Cell<usize>>,
    }

    struct ChunkedReader {
        bytes: Vec<u8>,
        pos: usize,
        chunk: usize,
        interrupt: bool,
        reads: Rc<Cell<usize>>,
    }

    impl Read for ChunkedReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.interrupt {
                self.interrupt = false;
                return Err(io::Error::from(ErrorKind::Interrupted));
            }
            let remaining = &self.bytes[self.pos..];
            let n = remaining.len().min(buf.len()).min(self.chunk);
            buf[..n].copy_from_slice(&remaining[..n]);
            self.pos += n;
            if n > 0 {
                self.reads.set(self.reads.get() + 1);
            }
            Ok(n)
        }
    }

    impl AssetSource for ChunkedStore {
        fn open(&self, _name: &str) -> Result<AssetReader, AssetError> {
            let reader = ChunkedReader {
                bytes: self.bytes.clone(),
                pos: 0,
                chunk: self.chunk,
                interrupt: self.interrupt_first,
                reads: self.reads.clone(),
            };
            Ok(AssetReader::new(reader, Some(self.bytes.len() as u64)))
        }
    }

    struct FailingStore;

    impl AssetSource for FailingStore {
        fn open(&self, _name: &str) -> Result<AssetReader, AssetError> {
            struct Broken;
            impl Read for Broken {
                fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                    Err(io::Error::new(ErrorKind::Other, "device gone"))
                }
            }
            Ok(AssetReader::new(Broken, Some(10)))
        }
    }

    #[test]
    fn load_returns_exact_content() {
        let store = MemoryAssetStore::new().with("payload.js", b"1+1".to_vec());
        let payload = AssetLoader::new(store).load("payload.js").unwrap();
        assert_eq!(payload.source(), "1+1");
        assert_eq!(payload.name(), "payload.js");
    }

    #[test]
    fn load_keeps_multibyte_and_nul() {
        let text = "const s = \"h\u{e9}llo \u{1f600} \u{4e16}\u{754c}\";\0\n// \u{0}end";
        let store = MemoryAssetStore::new().with("payload.js", text.as_bytes().to_vec());
        let payload = AssetLoader::new(store).load("payload.js").unwrap();
        assert_eq!(payload.source(), text);
        assert_eq!(payload.len(), text.len());
    }

    #[test]
    fn load_survives_short_reads() {
        let reads = Rc::new(Cell::new(0));
        let store = ChunkedStore {
            bytes: b"let a = 1;\nlet b = 2;\n".to_vec(),
            chunk: 12,
            interrupt_first: false,
            reads: reads.clone(),
        };
        let payload = AssetLoader::new(store).load("payload.js").unwrap();
        assert_eq!(payload.source(), "let a = 1;\nlet b = 2;\n");
        assert_eq!(reads.get(), 2);
    }

    #[test]
    fn load_splits_multibyte_across_reads() {
        let text = "\u{1f600}\u{1f600}\u{1f600}";
        let store = ChunkedStore {
            bytes: text.as_bytes().to_vec(),
            chunk: 3,
            interrupt_first: true,
            reads: Rc::new(Cell::new(0)),
        };
        let payload = AssetLoader::new(store).load("payload.js").unwrap();
        assert_eq!(payload.source(), text);
    }

    #[test]
    fn load_missing_asset_fails() {
        let loader = AssetLoader::new(MemoryAssetStore::new());
        let err = loader.load("payload.js").unwrap_err();
        assert!(matches!(err, AssetError::NotFound { .. }));
        assert_eq!(err.asset_name(), "payload.js");
    }

    #[test]
    fn load_invalid_utf8_fails() {
        let store = MemoryAssetStore::new().with("payload.js", vec![b'a', 0xff, 0xfe]);
        let err = AssetLoader::new(store).load("payload.js").unwrap_err();
        assert!(matches!(err, AssetError::InvalidUtf8 { .. }));
    }

    #[test]
    fn load_read_error_fails() {
        let err = AssetLoader::new(FailingStore).load("payload.js").unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }

    #[test]
    fn load_or_empty_falls_back() {
        let loader = AssetLoader::new(MemoryAssetStore::new());
        let payload = loader.load_or_empty("payload.js");
        assert!(payload.is_empty());
        assert_eq!(payload.name(), "payload.js");

        let undecodable = AssetLoader::new(MemoryAssetStore::new().with("payload.js", vec![0xc3u8]));
        assert!(undecodable.load_or_empty("payload.js").is_empty());
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("payload.js"), "console.log('\u{2713}')").unwrap();
        let loader = AssetLoader::new(DirAssetStore::new(dir.path()));
        assert_eq!(
            loader.load("payload.js").unwrap().source(),
            "console.log('\u{2713}')"
        );
    }
}
