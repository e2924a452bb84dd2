use std::path::PathBuf;

/// What the cache does with entries once they are published.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EvictionPolicy {
    /// Keep every resource for the lifetime of the cache.
    #[default]
    Never,
    /// Keep at most `capacity` resources, dropping the least recently requested first.
    /// Handles already given out stay valid.
    LeastRecentlyUsed { capacity: usize },
}

/// Engine configuration. All fields are optional; the default is an empty,
/// never-evicting engine that blobs can be mounted into later.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Directory of the base blob store.
    pub base_dir: Option<PathBuf>,
    /// Directory whose blobs take priority over the base store.
    pub override_dir: Option<PathBuf>,
    pub eviction: EvictionPolicy,
}

impl EngineConfig {
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn with_override_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.override_dir = Some(dir.into());
        self
    }

    pub fn with_eviction(mut self, eviction: EvictionPolicy) -> Self {
        self.eviction = eviction;
        self
    }
}
