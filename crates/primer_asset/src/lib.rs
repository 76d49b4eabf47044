//! Primer Asset Store
//!
//! Read-only packaged assets and the loader that turns one of them into
//! script text.
//!
//! - [`AssetSource`]: open-by-name over a packaged store
//! - [`DirAssetStore`] / [`MemoryAssetStore`]: the two stores we ship
//! - [`AssetLoader`]: read-to-completion + UTF-8 decode into a [`ScriptPayload`]

mod error;
mod loader;
mod payload;
mod source;

pub use error::AssetError;
pub use loader::AssetLoader;
pub use payload::ScriptPayload;
pub use source::{AssetReader, AssetSource, DirAssetStore, MemoryAssetStore};
