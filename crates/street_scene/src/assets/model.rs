//! Loaded-model ownership
//!
//! A [`MeshProvider`] turns a file into a [`ModelAsset`]; the scene never looks
//! inside one. [`ModelHandle`] is the single owner of a model and guarantees
//! that `release` runs exactly once, either explicitly or on drop.

use std::path::{Path, PathBuf};

use crate::assets::AssetError;
use crate::render::GraphicsContext;

/// A drawable model produced by a mesh importer
///
/// The scene calls `load`, then `initialize_graphics_resources`, then `draw`
/// any number of times, and finally `release`.
pub trait ModelAsset {
    /// Parse the backing file
    fn load(&mut self) -> Result<(), AssetError>;

    /// Create whatever the model needs on the graphics side
    fn initialize_graphics_resources(&mut self, ctx: &mut dyn GraphicsContext) -> Result<(), AssetError>;

    /// Issue the model's draw calls under the current transform
    fn draw(&self, ctx: &mut dyn GraphicsContext);

    /// Free everything the model holds
    fn release(&mut self);
}

/// Factory for models stored under an asset directory
pub trait MeshProvider {
    /// Create an unloaded model for `file_name` inside `directory`
    fn open(&self, directory: &Path, file_name: &str) -> Result<Box<dyn ModelAsset>, AssetError>;
}

/// Exclusive owner of one loaded model
pub struct ModelHandle {
    model: Box<dyn ModelAsset>,
    source: PathBuf,
    released: bool,
}

impl ModelHandle {
    /// Open and parse a model
    ///
    /// A model that fails to parse is released before the error is returned.
    pub fn load(provider: &dyn MeshProvider, directory: &Path, file_name: &str) -> Result<Self, AssetError> {
        let source = directory.join(file_name);
        log::info!("Loading model {:?}", source);

        let mut handle = Self {
            model: provider.open(directory, file_name)?,
            source,
            released: false,
        };
        handle.model.load()?;
        Ok(handle)
    }

    /// Path of the backing file
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Create graphics resources for the model
    pub fn initialize(&mut self, ctx: &mut dyn GraphicsContext) -> Result<(), AssetError> {
        self.model.initialize_graphics_resources(ctx)
    }

    /// Draw the model
    pub fn draw(&self, ctx: &mut dyn GraphicsContext) {
        if self.released {
            log::warn!("Skipping draw of released model {:?}", self.source);
            return;
        }
        self.model.draw(ctx);
    }

    /// Release the model now; later calls and the drop are no-ops
    pub fn release(&mut self) {
        if !self.released {
            log::debug!("Releasing model {:?}", self.source);
            self.model.release();
            self.released = true;
        }
    }

    /// Whether `release` has run
    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Drop for ModelHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("source", &self.source)
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Stub provider shared by the model and scene tests

    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Lifecycle events observed by stub models
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ModelEvent {
        Load(String),
        Initialize(String),
        Draw(String),
        Release(String),
    }

    /// Shared event log
    pub type EventLog = Rc<RefCell<Vec<ModelEvent>>>;

    /// Provider whose models record their lifecycle; files listed in
    /// `failing` fail to load, files in `failing_init` fail graphics setup
    #[derive(Default)]
    pub struct StubProvider {
        pub events: EventLog,
        pub failing: Vec<String>,
        pub failing_init: Vec<String>,
    }

    impl StubProvider {
        pub fn failing(file_name: &str) -> Self {
            Self { failing: vec![file_name.to_string()], ..Self::default() }
        }

        pub fn failing_initialize(file_name: &str) -> Self {
            Self { failing_init: vec![file_name.to_string()], ..Self::default() }
        }

        pub fn count(&self, matches: impl Fn(&ModelEvent) -> bool) -> usize {
            self.events.borrow().iter().filter(|event| matches(event)).count()
        }
    }

    struct StubModel {
        name: String,
        fail: bool,
        fail_init: bool,
        events: EventLog,
    }

    impl ModelAsset for StubModel {
        fn load(&mut self) -> Result<(), AssetError> {
            self.events.borrow_mut().push(ModelEvent::Load(self.name.clone()));
            if self.fail {
                Err(AssetError::NotFound(self.name.clone()))
            } else {
                Ok(())
            }
        }

        fn initialize_graphics_resources(&mut self, _ctx: &mut dyn GraphicsContext) -> Result<(), AssetError> {
            self.events.borrow_mut().push(ModelEvent::Initialize(self.name.clone()));
            if self.fail_init {
                Err(AssetError::GraphicsSetup(self.name.clone()))
            } else {
                Ok(())
            }
        }

        fn draw(&self, _ctx: &mut dyn GraphicsContext) {
            self.events.borrow_mut().push(ModelEvent::Draw(self.name.clone()));
        }

        fn release(&mut self) {
            self.events.borrow_mut().push(ModelEvent::Release(self.name.clone()));
        }
    }

    impl MeshProvider for StubProvider {
        fn open(&self, _directory: &Path, file_name: &str) -> Result<Box<dyn ModelAsset>, AssetError> {
            Ok(Box::new(StubModel {
                name: file_name.to_string(),
                fail: self.failing.iter().any(|f| f == file_name),
                fail_init: self.failing_init.iter().any(|f| f == file_name),
                events: Rc::clone(&self.events),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{ModelEvent, StubProvider};
    use super::*;
    use crate::render::RecordingContext;

    #[test]
    fn test_drop_releases_once() {
        let provider = StubProvider::default();
        {
            let _handle = ModelHandle::load(&provider, Path::new("models"), "car.obj").unwrap();
        }
        assert_eq!(provider.count(|e| matches!(e, ModelEvent::Release(_))), 1);
    }

    #[test]
    fn test_explicit_release_is_not_repeated_on_drop() {
        let provider = StubProvider::default();
        let mut handle = ModelHandle::load(&provider, Path::new("models"), "car.obj").unwrap();
        handle.release();
        handle.release();
        assert!(handle.is_released());
        drop(handle);
        assert_eq!(provider.count(|e| matches!(e, ModelEvent::Release(_))), 1);
    }

    #[test]
    fn test_failed_load_still_releases() {
        let provider = StubProvider::failing("broken.obj");
        let result = ModelHandle::load(&provider, Path::new("models"), "broken.obj");
        assert!(result.is_err());
        assert_eq!(provider.count(|e| matches!(e, ModelEvent::Release(_))), 1);
    }

    #[test]
    fn test_released_model_is_not_drawn() {
        let provider = StubProvider::default();
        let mut ctx = RecordingContext::new();
        let mut handle = ModelHandle::load(&provider, Path::new("models"), "car.obj").unwrap();
        handle.draw(&mut ctx);
        handle.release();
        handle.draw(&mut ctx);
        assert_eq!(provider.count(|e| matches!(e, ModelEvent::Draw(_))), 1);
    }
}
