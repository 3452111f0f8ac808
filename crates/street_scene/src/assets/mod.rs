//! Asset management
//!
//! Image decoding for textures, and the mesh-provider seam through which the
//! scene loads its two models.

pub mod image_loader;
pub mod model;
pub mod obj_loader;

pub use image_loader::ImageData;
pub use model::{MeshProvider, ModelAsset, ModelHandle};
pub use obj_loader::{ObjMeshProvider, ObjModel};

use thiserror::Error;

/// Asset errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Asset not found
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Asset failed to load or decode
    #[error("Failed to load asset: {0}")]
    LoadFailed(String),

    /// Asset contents were malformed
    #[error("Invalid asset format: {0}")]
    InvalidFormat(String),

    /// Graphics resources for an asset could not be created
    #[error("Graphics resource setup failed: {0}")]
    GraphicsSetup(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
