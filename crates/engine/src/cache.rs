use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use parking_lot::Mutex;

use crate::{
    BlobStack, EvictionPolicy, ResourceError, ResourceHandle, ResourceId, Result, decode_resource,
};

/// One id's entry. Its lock is held for the whole fetch + decode, so concurrent
/// first requests for the same id wait for the first one instead of decoding again.
#[derive(Default)]
struct Slot {
    handle: Mutex<Option<ResourceHandle>>,
    last_used: AtomicU64,
}

/// Id -> decoded resource map in front of a [`BlobStack`].
///
/// This is the context decoders receive to resolve the ids they reference,
/// e.g. a region's scenes. Resource kinds never reference each other in a cycle,
/// which keeps the per-slot locking free of deadlocks.
pub struct ResourceCache {
    stores: BlobStack,
    policy: EvictionPolicy,
    slots: Mutex<HashMap<ResourceId, Arc<Slot>>>,
    clock: AtomicU64,
}

impl ResourceCache {
    pub fn new(stores: BlobStack, policy: EvictionPolicy) -> Self {
        ResourceCache {
            stores,
            policy,
            slots: Mutex::new(HashMap::new()),
            clock: AtomicU64::new(0),
        }
    }

    pub fn stores(&self) -> &BlobStack {
        &self.stores
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    /// Return the cached resource for `id`, fetching and decoding it on first use.
    ///
    /// Failures are returned as-is and leave nothing behind: a later call tries again.
    pub fn get(&self, id: ResourceId) -> Result<ResourceHandle> {
        let slot = self.slots.lock().entry(id).or_default().clone();

        let mut handle = slot.handle.lock();
        if let Some(existing) = handle.as_ref() {
            log::debug!("cache hit {id}");
            self.touch(&slot);
            return Ok(existing.clone());
        }

        log::debug!("cache miss {id}");
        let loaded = self.load(id);
        match loaded {
            Ok(resource) => {
                *handle = Some(resource.clone());
                self.touch(&slot);
                drop(handle);
                self.enforce_policy();
                Ok(resource)
            }
            Err(err) => {
                log::warn!("failed to load {id}: {err}");
                drop(handle);
                self.discard_empty(id, &slot);
                Err(err)
            }
        }
    }

    fn load(&self, id: ResourceId) -> Result<ResourceHandle> {
        let bytes = self.stores.fetch(id)?.ok_or(ResourceError::NotFound(id))?;
        let resource = decode_resource(self, id, &bytes)?;
        Ok(Arc::new(resource))
    }

    /// Whether `id` currently has a published resource.
    pub fn contains(&self, id: ResourceId) -> bool {
        let slot = self.slots.lock().get(&id).cloned();
        slot.is_some_and(|slot| slot.handle.lock().is_some())
    }

    /// Number of published resources. Entries being decoded right now are not counted.
    pub fn len(&self) -> usize {
        self.published().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn touch(&self, slot: &Slot) {
        let now = self.clock.fetch_add(1, Ordering::Relaxed);
        slot.last_used.store(now, Ordering::Relaxed);
    }

    /// Ids and last-use ticks of published entries. Slots locked by an
    /// in-flight decode are skipped rather than waited on.
    fn published(&self) -> Vec<(ResourceId, u64)> {
        let slots = self.slots.lock();
        slots
            .iter()
            .filter(|(_, slot)| slot.handle.try_lock().is_some_and(|handle| handle.is_some()))
            .map(|(id, slot)| (*id, slot.last_used.load(Ordering::Relaxed)))
            .collect()
    }

    fn enforce_policy(&self) {
        let EvictionPolicy::LeastRecentlyUsed { capacity } = self.policy else {
            return;
        };

        let mut published = self.published();
        if published.len() <= capacity {
            return;
        }
        published.sort_by_key(|(_, last_used)| *last_used);
        let excess = published.len() - capacity;

        let mut slots = self.slots.lock();
        for (id, _) in published.into_iter().take(excess) {
            log::debug!("evicting {id}");
            slots.remove(&id);
        }
    }

    /// Drop a slot whose load failed, unless another caller is already waiting on it.
    fn discard_empty(&self, id: ResourceId, slot: &Arc<Slot>) {
        let mut slots = self.slots.lock();
        let unshared = slots
            .get(&id)
            .is_some_and(|current| Arc::ptr_eq(current, slot) && Arc::strong_count(slot) == 2);
        if unshared {
            slots.remove(&id);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::AtomicUsize,
        thread,
        time::Duration,
    };

    use super::*;
    use crate::test_support::{RegionFixture, scene_record, texture_record};
    use crate::{BlobStore, MemoryStore, TYPE_A8};

    /// Wraps a store and counts how often each id is asked for.
    struct CountingStore {
        inner: MemoryStore,
        fetches: Mutex<HashMap<ResourceId, usize>>,
        total: AtomicUsize,
        delay: Duration,
    }

    impl CountingStore {
        fn new(inner: MemoryStore) -> Self {
            CountingStore {
                inner,
                fetches: Mutex::new(HashMap::new()),
                total: AtomicUsize::new(0),
                delay: Duration::ZERO,
            }
        }

        fn count(&self, id: u32) -> usize {
            self.fetches.lock().get(&ResourceId(id)).copied().unwrap_or(0)
        }
    }

    impl BlobStore for CountingStore {
        fn fetch(&self, id: ResourceId) -> Result<Option<Vec<u8>>> {
            *self.fetches.lock().entry(id).or_default() += 1;
            self.total.fetch_add(1, Ordering::SeqCst);
            thread::sleep(self.delay);
            self.inner.fetch(id)
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    fn texture(id: u32) -> Vec<u8> {
        texture_record(id, TYPE_A8, 1, 1, 1, &[id as u8])
    }

    fn setup(store: CountingStore, policy: EvictionPolicy) -> (Arc<CountingStore>, ResourceCache) {
        let _ = env_logger::builder().is_test(true).try_init();
        let store = Arc::new(store);
        let stack = BlobStack::new();
        stack.mount(store.clone());
        (store, ResourceCache::new(stack, policy))
    }

    fn textures(ids: &[u32]) -> MemoryStore {
        let store = MemoryStore::new("base");
        for id in ids {
            store.insert(ResourceId(*id), texture(*id));
        }
        store
    }

    #[test]
    fn repeated_get_returns_same_handle() {
        let (store, cache) = setup(
            CountingStore::new(textures(&[0x0600_0001])),
            EvictionPolicy::Never,
        );

        let a = cache.get(ResourceId(0x0600_0001)).unwrap();
        let b = cache.get(ResourceId(0x0600_0001)).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(store.count(0x0600_0001), 1);
        assert!(cache.contains(ResourceId(0x0600_0001)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn absent_everywhere_is_not_found() {
        let (_, cache) = setup(CountingStore::new(MemoryStore::new("base")), EvictionPolicy::Never);
        assert!(matches!(
            cache.get(ResourceId(0xAABB_CCDD)),
            Err(ResourceError::NotFound(ResourceId(0xAABB_CCDD)))
        ));
        assert!(cache.is_empty());
    }

    #[test]
    fn override_tier_is_preferred() {
        let base = Arc::new(MemoryStore::new("base").with(
            ResourceId(0x0600_0001),
            texture_record(0x0600_0001, TYPE_A8, 1, 1, 1, &[1]),
        ));
        let over = Arc::new(MemoryStore::new("override").with(
            ResourceId(0x0600_0001),
            texture_record(0x0600_0001, TYPE_A8, 1, 1, 1, &[2]),
        ));
        let cache = ResourceCache::new(BlobStack::tiered(over, base), EvictionPolicy::Never);

        let handle = cache.get(ResourceId(0x0600_0001)).unwrap();
        assert_eq!(handle.as_texture().unwrap().image.pixels(), &[2]);
    }

    #[test]
    fn failed_decode_is_not_cached_and_retried() {
        let store = MemoryStore::new("base").with(ResourceId(0x0600_0001), vec![0; 3]);
        let (counting, cache) = setup(CountingStore::new(store), EvictionPolicy::Never);

        assert!(matches!(
            cache.get(ResourceId(0x0600_0001)),
            Err(ResourceError::OutOfBounds { .. })
        ));
        assert!(!cache.contains(ResourceId(0x0600_0001)));

        counting.inner.insert(ResourceId(0x0600_0001), texture(0x0600_0001));
        assert!(cache.get(ResourceId(0x0600_0001)).is_ok());
        assert_eq!(counting.count(0x0600_0001), 2);
    }

    #[test]
    fn concurrent_first_requests_decode_once() {
        let mut store = CountingStore::new(textures(&[0x0600_0001]));
        store.delay = Duration::from_millis(20);
        let (store, cache) = setup(store, EvictionPolicy::Never);

        let handles: Vec<ResourceHandle> = thread::scope(|s| {
            let workers: Vec<_> = (0..8)
                .map(|_| s.spawn(|| cache.get(ResourceId(0x0600_0001)).unwrap()))
                .collect();
            workers.into_iter().map(|w| w.join().unwrap()).collect()
        });

        assert_eq!(store.count(0x0600_0001), 1);
        assert!(handles.iter().all(|h| Arc::ptr_eq(h, &handles[0])));
    }

    #[test]
    fn region_resolves_scenes_once() {
        let mut fixture = RegionFixture::new(0x1300_0001);
        fixture.scene_types = vec![vec![0x1200_0001], vec![0x1200_0001, 0x1200_0002]];
        let store = MemoryStore::new("base")
            .with(ResourceId(0x1300_0001), fixture.build())
            .with(ResourceId(0x1200_0001), scene_record(0x1200_0001, &[0x0100_0001]))
            .with(ResourceId(0x1200_0002), scene_record(0x1200_0002, &[]));
        let (store, cache) = setup(CountingStore::new(store), EvictionPolicy::Never);

        let region = cache.get(ResourceId(0x1300_0001)).unwrap();
        let region = region.as_region().unwrap();
        let scene = cache.get(ResourceId(0x1200_0001)).unwrap();

        assert!(Arc::ptr_eq(&region.scene_types[0].scenes[0], &scene));
        assert_eq!(store.count(0x1200_0001), 1);
        assert_eq!(store.count(0x1200_0002), 1);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn lru_keeps_recent_entries() {
        let ids = [0x0600_0001, 0x0600_0002, 0x0600_0003];
        let (store, cache) = setup(
            CountingStore::new(textures(&ids)),
            EvictionPolicy::LeastRecentlyUsed { capacity: 2 },
        );

        let first = cache.get(ResourceId(ids[0])).unwrap();
        cache.get(ResourceId(ids[1])).unwrap();
        cache.get(ResourceId(ids[0])).unwrap();
        cache.get(ResourceId(ids[2])).unwrap();

        assert_eq!(cache.len(), 2);
        assert!(cache.contains(ResourceId(ids[0])));
        assert!(!cache.contains(ResourceId(ids[1])));
        assert!(cache.contains(ResourceId(ids[2])));

        // evicted handles stay usable by their holders
        assert_eq!(first.as_texture().unwrap().image.pixels(), &[1]);

        cache.get(ResourceId(ids[1])).unwrap();
        assert_eq!(store.count(ids[1]), 2);
        assert_eq!(store.total.load(Ordering::SeqCst), 4);
    }
}
