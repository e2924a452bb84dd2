use std::path::PathBuf;

use crate::{BlobStack, EngineConfig, ResourceCache, ResourceHandle, ResourceId, Result};

/// Engine: owns the blob store stack and the resource cache in front of it.
///
/// Nothing here is global; embedders create one `Engine` and pass `engine.cache`
/// (or the engine itself) to whatever needs resources.
pub struct Engine {
    pub stores: BlobStack,
    pub cache: ResourceCache,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(EngineConfig::default())
    }
}

impl Engine {
    pub const NAME: &str = "portal";

    pub fn new(config: EngineConfig) -> Self {
        log::info!("Starting {} engine...", Self::NAME);

        let stores = BlobStack::new();
        // base first: the last mounted store has the highest priority
        if let Some(base) = &config.base_dir {
            stores.mount_dir(base.clone(), "base");
        }
        if let Some(over) = &config.override_dir {
            stores.mount_dir(over.clone(), "override");
        }

        let cache = ResourceCache::new(stores.clone(), config.eviction);
        log::info!(
            "Engine initialization complete (stores: {:?}, eviction: {:?}).",
            stores.debug_list_tiers(),
            config.eviction
        );
        Engine { stores, cache }
    }

    /// Mount a directory above every store mounted so far.
    pub fn mount_dir(&self, root: impl Into<PathBuf>, name: impl Into<String>) {
        self.stores.mount_dir(root, name);
    }

    pub fn unmount(&self, name: &str) {
        self.stores.unmount(name);
    }

    pub fn get(&self, id: ResourceId) -> Result<ResourceHandle> {
        self.cache.get(id)
    }
}
