//! Image loading utilities for texture data
//!
//! Decodes PNG and JPEG files into RGBA8 rows ordered bottom-up, which is the
//! row order the fixed-function pipeline expects for texture uploads.

use std::path::Path;
use crate::assets::AssetError;

/// Loaded image data ready for upload
#[derive(Debug, Clone)]
pub struct ImageData {
    /// Raw RGBA pixel data, bottom row first
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl ImageData {
    /// Load an image from a file path and flip it vertically
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path_ref = path.as_ref();

        log::debug!("Loading image from: {:?}", path_ref);

        if !path_ref.is_file() {
            return Err(AssetError::NotFound(path_ref.display().to_string()));
        }

        let img = image::open(path_ref)
            .map_err(|e| AssetError::LoadFailed(format!("Failed to load image {}: {}", path_ref.display(), e)))?;

        let rgba_img = img.flipv().to_rgba8();
        let (width, height) = rgba_img.dimensions();

        log::info!("Loaded image {}x{} from {:?}", width, height, path_ref);

        Ok(Self {
            data: rgba_img.into_raw(),
            width,
            height,
        })
    }

    /// Get the size of the image data in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn fixture_dir() -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("street_scene_images_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_flips_rows() {
        let path = fixture_dir().join("two_rows.png");
        let mut img = RgbImage::new(1, 2);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(0, 1, Rgb([0, 0, 255]));
        img.save(&path).unwrap();

        let loaded = ImageData::from_file(&path).unwrap();
        assert_eq!((loaded.width, loaded.height), (1, 2));
        assert_eq!(loaded.size_bytes(), 8);
        // The bottom (blue) row now comes first
        assert_eq!(&loaded.data[0..4], &[0, 0, 255, 255]);
        assert_eq!(&loaded.data[4..8], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let result = ImageData::from_file(fixture_dir().join("missing.jpg"));
        assert!(matches!(result, Err(AssetError::NotFound(_))));
    }

    #[test]
    fn test_garbage_file_fails_to_decode() {
        let path = fixture_dir().join("garbage.png");
        std::fs::write(&path, b"not an image").unwrap();
        assert!(matches!(ImageData::from_file(&path), Err(AssetError::LoadFailed(_))));
    }
}
