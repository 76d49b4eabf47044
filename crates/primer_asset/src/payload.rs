//! Script payload

use std::fmt;
use std::sync::Arc;

/// Immutable script text loaded from one packaged asset.
///
/// Clones share the same buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct ScriptPayload {
    name: Arc<str>,
    source: Arc<str>,
}

impl ScriptPayload {
    pub fn new(name: impl Into<Arc<str>>, source: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Empty payload standing in for an asset that failed to load.
    pub fn empty(name: impl Into<Arc<str>>) -> Self {
        Self::new(name, "")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }
}

// Script bodies can be large; keep Debug output to the metadata.
impl fmt::Debug for ScriptPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptPayload")
            .field("name", &self.name)
            .field("len", &self.source.len())
            .finish()
    }
}
