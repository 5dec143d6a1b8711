//! The Stowage facade.
//!
//! [`Stowage`] owns the backing [`ObjectStore`], the configuration, and the
//! key generator. Individual operations are implemented in the
//! [`crate::ops`] submodules as inherent methods on this type.

use std::sync::Arc;

use stowage_store::ObjectStore;

use crate::config::StowageConfig;
use crate::keygen::{KeyGenerator, UuidKeyGenerator};

/// Facade over an S3-compatible object store.
///
/// All fields are `Arc`-wrapped for cheap cloning and shared ownership
/// across tasks.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use stowage_core::{Stowage, StowageConfig};
/// use stowage_store::MemoryStore;
///
/// let stowage = Stowage::new(Arc::new(MemoryStore::new()), StowageConfig::default());
/// assert_eq!(stowage.config().max_size_mb, 100);
/// ```
#[derive(Debug, Clone)]
pub struct Stowage {
    /// Backend the facade operates on.
    pub(crate) store: Arc<dyn ObjectStore>,
    /// Upload limits and bucket defaults.
    pub(crate) config: Arc<StowageConfig>,
    /// Source of object keys for new uploads.
    pub(crate) keys: Arc<dyn KeyGenerator>,
}

impl Stowage {
    /// Create a facade over `store` with the given configuration.
    ///
    /// Keys for new objects come from [`UuidKeyGenerator`]; use
    /// [`Stowage::with_key_generator`] to override that.
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>, config: StowageConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
            keys: Arc::new(UuidKeyGenerator),
        }
    }

    /// Replace the key generator.
    #[must_use]
    pub fn with_key_generator(mut self, keys: Arc<dyn KeyGenerator>) -> Self {
        self.keys = keys;
        self
    }

    /// Returns a reference to the backing store.
    #[must_use]
    pub fn store(&self) -> &dyn ObjectStore {
        self.store.as_ref()
    }

    /// Returns a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &StowageConfig {
        &self.config
    }
}
