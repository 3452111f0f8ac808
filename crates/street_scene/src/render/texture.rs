//! Texture management
//!
//! The scene uses a fixed palette of five textures. [`TextureManager::setup`]
//! decodes all of them before it touches the graphics context, so a missing
//! file never leaves a half-built texture set behind.

use std::path::Path;

use crate::assets::{AssetError, ImageData};
use super::context::{GraphicsContext, TextureEnvMode, TextureFilter, TextureId, TextureWrap};

/// Symbolic texture slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    /// Bark, used on the streetlight poles
    Tree,
    /// Ground surface
    Asphalt,
    /// Building facades
    Building,
    /// Road markings
    Road,
    /// Front wall
    Brick,
}

/// Number of texture slots
pub const SLOT_COUNT: usize = 5;

impl TextureSlot {
    /// All slots in upload order
    pub const ALL: [Self; SLOT_COUNT] = [Self::Tree, Self::Asphalt, Self::Building, Self::Road, Self::Brick];

    /// Backing image file, relative to the texture directory
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Tree => "tree.jpg",
            Self::Asphalt => "asphalt.jpg",
            Self::Building => "building.png",
            Self::Road => "road.jpeg",
            Self::Brick => "brick.jpg",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Sampling state applied to every scene texture
const FILTER: TextureFilter = TextureFilter::Nearest;
const WRAP: TextureWrap = TextureWrap::Repeat;

/// Owner of the scene's texture objects
#[derive(Debug, Default)]
pub struct TextureManager {
    textures: Option<[TextureId; SLOT_COUNT]>,
}

impl TextureManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode every slot's image and upload the whole set
    ///
    /// Errors are returned before any texture call is issued.
    pub fn setup(&mut self, ctx: &mut dyn GraphicsContext, texture_dir: &Path) -> Result<(), AssetError> {
        let images = TextureSlot::ALL
            .iter()
            .map(|slot| ImageData::from_file(texture_dir.join(slot.file_name())))
            .collect::<Result<Vec<_>, _>>()?;

        ctx.texture_env_mode(TextureEnvMode::Add);

        let ids: [TextureId; SLOT_COUNT] = ctx
            .gen_textures(SLOT_COUNT)
            .try_into()
            .map_err(|ids: Vec<TextureId>| {
                AssetError::GraphicsSetup(format!("expected {} texture names, got {}", SLOT_COUNT, ids.len()))
            })?;

        for (slot, image) in TextureSlot::ALL.iter().zip(&images) {
            log::debug!("Uploading {:?}: {}x{}, {} bytes", slot, image.width, image.height, image.size_bytes());
            ctx.bind_texture(ids[slot.index()]);
            ctx.upload_mipmapped_rgba(image.width, image.height, &image.data);
            ctx.texture_filter(FILTER, FILTER);
            ctx.texture_wrap(WRAP, WRAP);
        }

        log::info!("Uploaded {} scene textures from {:?}", ids.len(), texture_dir);
        self.textures = Some(ids);
        Ok(())
    }

    /// Texture name for a slot, if the set is loaded
    pub fn id(&self, slot: TextureSlot) -> Option<TextureId> {
        self.textures.map(|ids| ids[slot.index()])
    }

    /// Bind a slot's texture
    pub fn bind(&self, ctx: &mut dyn GraphicsContext, slot: TextureSlot) {
        if let Some(id) = self.id(slot) {
            ctx.bind_texture(id);
        }
    }

    /// Whether the texture set has been uploaded
    pub fn is_loaded(&self) -> bool {
        self.textures.is_some()
    }

    /// Delete the texture objects
    pub fn release(&mut self, ctx: &mut dyn GraphicsContext) {
        if let Some(ids) = self.textures.take() {
            ctx.delete_textures(&ids);
            log::debug!("Deleted {} scene textures", ids.len());
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::TextureSlot;
    use image::{Rgb, RgbImage};
    use std::path::PathBuf;

    /// Write a tiny image for every slot into a fresh directory
    pub fn write_texture_set(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("street_scene_textures_{}_{}", tag, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        for slot in TextureSlot::ALL {
            RgbImage::from_pixel(2, 2, Rgb([120, 120, 120])).save(dir.join(slot.file_name())).unwrap();
        }
        dir
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::write_texture_set;
    use super::*;
    use crate::render::recording::{GlCall, RecordingContext};

    #[test]
    fn test_setup_uploads_every_slot() {
        let dir = write_texture_set("full");
        let mut ctx = RecordingContext::new();
        let mut textures = TextureManager::new();

        textures.setup(&mut ctx, &dir).unwrap();

        assert!(textures.is_loaded());
        assert_eq!(ctx.count(|c| matches!(c, GlCall::UploadTexture { width: 2, height: 2 })), 5);
        assert_eq!(
            ctx.count(|c| *c == GlCall::TextureFilter(TextureFilter::Nearest, TextureFilter::Nearest)),
            5
        );
        assert_eq!(ctx.count(|c| *c == GlCall::TextureWrap(TextureWrap::Repeat, TextureWrap::Repeat)), 5);
    }

    #[test]
    fn test_missing_image_touches_nothing() {
        let dir = write_texture_set("missing");
        std::fs::remove_file(dir.join(TextureSlot::Brick.file_name())).unwrap();

        let mut ctx = RecordingContext::new();
        let mut textures = TextureManager::new();

        assert!(textures.setup(&mut ctx, &dir).is_err());
        assert!(!textures.is_loaded());
        assert!(ctx.calls().is_empty());
    }

    #[test]
    fn test_bind_is_a_lookup() {
        let dir = write_texture_set("bind");
        let mut ctx = RecordingContext::new();
        let mut textures = TextureManager::new();
        textures.setup(&mut ctx, &dir).unwrap();
        ctx.clear_calls();

        textures.bind(&mut ctx, TextureSlot::Road);
        assert_eq!(ctx.calls(), &[GlCall::BindTexture(textures.id(TextureSlot::Road).unwrap())]);
    }

    #[test]
    fn test_release_deletes_once() {
        let dir = write_texture_set("release");
        let mut ctx = RecordingContext::new();
        let mut textures = TextureManager::new();
        textures.setup(&mut ctx, &dir).unwrap();

        textures.release(&mut ctx);
        textures.release(&mut ctx);
        assert_eq!(ctx.count(|c| matches!(c, GlCall::DeleteTextures(_))), 1);
        assert!(textures.id(TextureSlot::Tree).is_none());
    }
}
