//! Sources d'octets bruts pour les resources, avec support de plusieurs "tiers".
//!
//! - `BlobStore` est un trait objet (Send + Sync) qui répond à `fetch(id)`.
//! - `BlobStack` empile des stores et résout un id en ordre de priorité
//!   (dernier monté = priorité la plus haute, ex: override au-dessus de base).
//! - Un store qui ne connaît pas l'id répond `Ok(None)` ; une erreur I/O est une vraie erreur.

use std::{
    collections::HashMap,
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::RwLock;

use crate::{ResourceError, ResourceId, Result};

/// Trait minimal pour un store (peut être monté dans un `BlobStack`).
pub trait BlobStore: Send + Sync + 'static {
    /// Octets du blob `id`, ou `None` si ce store ne le contient pas.
    fn fetch(&self, id: ResourceId) -> Result<Option<Vec<u8>>>;

    /// Nom (pour debug).
    fn name(&self) -> &str;
}

/// Store en mémoire, pratique pour les tests ou pour injecter des blobs générés.
pub struct MemoryStore {
    name: String,
    blobs: RwLock<HashMap<ResourceId, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new(name: impl Into<String>) -> Self {
        MemoryStore {
            name: name.into(),
            blobs: RwLock::new(HashMap::new()),
        }
    }

    pub fn insert(&self, id: ResourceId, data: Vec<u8>) {
        self.blobs.write().insert(id, data);
    }

    pub fn with(self, id: ResourceId, data: Vec<u8>) -> Self {
        self.insert(id, data);
        self
    }
}

impl BlobStore for MemoryStore {
    fn fetch(&self, id: ResourceId) -> Result<Option<Vec<u8>>> {
        Ok(self.blobs.read().get(&id).cloned())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Store adossé à un répertoire : un fichier par blob, nommé par l'id en
/// huit chiffres hexadécimaux majuscules (ex: `06001234`).
pub struct DirStore {
    root: PathBuf,
    name: String,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        DirStore {
            root: root.into(),
            name: name.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, id: ResourceId) -> PathBuf {
        self.root.join(format!("{:08X}", id.0))
    }
}

impl BlobStore for DirStore {
    fn fetch(&self, id: ResourceId) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(id);
        match std::fs::read(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ResourceError::Io {
                store: self.name.clone(),
                id,
                source,
            }),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Pile de stores. Priorité : le dernier store monté gagne.
#[derive(Clone, Default)]
pub struct BlobStack {
    tiers: Arc<RwLock<Vec<Arc<dyn BlobStore>>>>,
}

impl BlobStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pile à deux niveaux : `override_store` est interrogé avant `base`.
    pub fn tiered(override_store: Arc<dyn BlobStore>, base: Arc<dyn BlobStore>) -> Self {
        let stack = Self::new();
        stack.mount(base);
        stack.mount(override_store);
        stack
    }

    /// Monte un store au-dessus de ceux déjà présents.
    pub fn mount(&self, store: Arc<dyn BlobStore>) {
        log::info!("mounting blob store {}", store.name());
        self.tiers.write().push(store);
    }

    /// Monte un répertoire (convenience).
    pub fn mount_dir(&self, root: impl Into<PathBuf>, name: impl Into<String>) {
        self.mount(Arc::new(DirStore::new(root, name)));
    }

    /// Démonte tous les stores portant ce nom.
    pub fn unmount(&self, name: &str) {
        self.tiers.write().retain(|store| store.name() != name);
    }

    /// Interroge les stores du plus prioritaire au moins prioritaire.
    pub fn fetch(&self, id: ResourceId) -> Result<Option<Vec<u8>>> {
        let tiers = self.tiers.read().clone();
        for store in tiers.iter().rev() {
            if let Some(data) = store.fetch(id)? {
                log::debug!("{id} served by {} ({} bytes)", store.name(), data.len());
                return Ok(Some(data));
            }
        }
        Ok(None)
    }

    /// Noms des stores (ordre: basse -> haute priorité).
    pub fn debug_list_tiers(&self) -> Vec<String> {
        self.tiers
            .read()
            .iter()
            .map(|store| store.name().to_string())
            .collect()
    }
}

impl BlobStore for BlobStack {
    fn fetch(&self, id: ResourceId) -> Result<Option<Vec<u8>>> {
        BlobStack::fetch(self, id)
    }

    fn name(&self) -> &str {
        "stack"
    }
}
