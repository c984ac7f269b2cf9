//! Process-wide model cache.
//!
//! [`ModelRegistry::ensure_loaded`] runs the expensive load once and hands out
//! shared references afterwards. A failed load caches nothing, so the next
//! request retries it. The registry is immutable once loaded and lives until
//! process exit.

pub mod error;
pub mod loader;
#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use error::{ModelLoadError, NotInitializedError};
pub use loader::{ArtifactLoader, ArtifactPaths, ModelLoader, ModelSet, RegistryConfig};

use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tracing::{debug, error, info};

pub struct ModelRegistry {
    loader: Box<dyn ModelLoader>,
    models: OnceLock<ModelSet>,
    init_lock: Mutex<()>,
    load_attempts: AtomicUsize,
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("loaded", &self.is_loaded())
            .field("load_attempts", &self.load_count())
            .finish()
    }
}

impl ModelRegistry {
    /// Registry backed by the on-disk artifacts (or stubs) in `config`.
    pub fn new(config: RegistryConfig) -> Self {
        Self::with_loader(ArtifactLoader::new(config))
    }

    pub fn with_loader<L: ModelLoader + 'static>(loader: L) -> Self {
        Self {
            loader: Box::new(loader),
            models: OnceLock::new(),
            init_lock: Mutex::new(()),
            load_attempts: AtomicUsize::new(0),
        }
    }

    /// Loads every model on first call; later calls return the cached set.
    pub fn ensure_loaded(&self) -> Result<&ModelSet, ModelLoadError> {
        if let Some(models) = self.models.get() {
            return Ok(models);
        }

        let _guard = self.init_lock.lock();
        if let Some(models) = self.models.get() {
            debug!("Models loaded by a concurrent caller");
            return Ok(models);
        }

        let attempt = self.load_attempts.fetch_add(1, Ordering::SeqCst) + 1;
        info!(attempt, "Loading models");

        match self.loader.load() {
            Ok(loaded) => Ok(self.models.get_or_init(|| loaded)),
            Err(e) => {
                error!(attempt, error = %e, "Model load failed");
                Err(e)
            }
        }
    }

    /// Cached models, without attempting a load.
    pub fn models(&self) -> Result<&ModelSet, NotInitializedError> {
        self.models.get().ok_or(NotInitializedError {
            component: "model registry",
        })
    }

    pub fn is_loaded(&self) -> bool {
        self.models.get().is_some()
    }

    /// Number of times the expensive load path has run (successful or not).
    pub fn load_count(&self) -> usize {
        self.load_attempts.load(Ordering::SeqCst)
    }
}
