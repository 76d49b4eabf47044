use std::io;
use std::string::FromUtf8Error;
use thiserror::Error;

/// Errors that can occur while loading a packaged asset.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset name '{name}' is not a relative packaged path")]
    InvalidName { name: String },

    #[error("asset '{name}' not found")]
    NotFound { name: String },

    #[error("failed to read asset '{name}'")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("asset '{name}' is not valid UTF-8")]
    InvalidUtf8 {
        name: String,
        #[source]
        source: FromUtf8Error,
    },
}

impl AssetError {
    /// Map an I/O error for `name`, folding `NotFound` into its own variant.
    pub(crate) fn from_io(name: &str, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            AssetError::NotFound {
                name: name.to_string(),
            }
        } else {
            AssetError::Io {
                name: name.to_string(),
                source,
            }
        }
    }

    /// Name of the asset the error refers to.
    pub fn asset_name(&self) -> &str {
        match self {
            AssetError::InvalidName { name }
            | AssetError::NotFound { name }
            | AssetError::Io { name, .. }
            | AssetError::InvalidUtf8 { name, .. } => name,
        }
    }
}
