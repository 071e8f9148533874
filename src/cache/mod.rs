//! C12: the conversion/optimization cache (§4.11). "Keyed by a structural
//! fingerprint of the input automaton... Stores the converted/optimized
//! result. Eviction is size-bounded LRU; invalidation is implicit because
//! keys are content-addressed." Also §5's "only shared state in the
//! system": a single lock around get/put, with misses computed outside it.

pub mod fingerprint;

pub use fingerprint::{fingerprint_of, Fingerprint, Fingerprintable};

use std::collections::HashMap;
use std::sync::Mutex;

/// A size-bounded LRU keyed by [`Fingerprint`], storing an arbitrary
/// conversion result `V` (a cloned automaton, a minimized one, a parse
/// forest — whatever the call site converts to). Generic over `V` rather
/// than one cache per automaton kind, since §4.11 describes one cache
/// concept reused by every converter.
pub struct ConversionCache<V> {
    inner: Mutex<Inner<V>>,
    capacity: usize,
}

struct Inner<V> {
    entries: HashMap<Fingerprint, V>,
    /// Most-recently-used at the back. A `Vec` is adequate at the capacities
    /// this cache is sized for (§4.11 doesn't specify a bound; a few hundred
    /// to a few thousand entries is the expected order of magnitude) — an
    /// intrusive linked list would only pay off at a scale this cache isn't
    /// built for.
    order: Vec<Fingerprint>,
}

impl<V: Clone> ConversionCache<V> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "a zero-capacity cache can never retain an entry");
        ConversionCache { inner: Mutex::new(Inner { entries: HashMap::new(), order: Vec::new() }), capacity }
    }

    /// Returns a clone of the cached value for `key`, promoting it to
    /// most-recently-used, or `None` on a miss.
    pub fn get(&self, key: &Fingerprint) -> Option<V> {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        let value = inner.entries.get(key).cloned()?;
        touch(&mut inner.order, *key);
        Some(value)
    }

    /// Inserts `value` under `key`, evicting the least-recently-used entry
    /// first if the cache is at capacity. Called after the caller has
    /// already computed `value` outside the lock (§5: "cache misses release
    /// the lock during the computation; concurrent duplicate computations
    /// are permitted").
    pub fn put(&self, key: Fingerprint, value: V) {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        if !inner.entries.contains_key(&key) && inner.entries.len() >= self.capacity {
            if let Some(oldest) = inner.order.first().copied() {
                inner.entries.remove(&oldest);
                inner.order.remove(0);
            }
        }
        inner.entries.insert(key, value);
        touch(&mut inner.order, key);
        #[cfg(feature = "log")]
        log::trace!("cache::put: {} entries (capacity {})", inner.entries.len(), self.capacity);
    }

    /// Looks up `key`; on a miss, calls `compute` (without holding the lock)
    /// and stores the result before returning it. The canonical call
    /// pattern for a conversion site: `cache.get_or_insert_with(fp, || expensive_convert())`.
    pub fn get_or_insert_with(&self, key: Fingerprint, compute: impl FnOnce() -> V) -> V {
        if let Some(hit) = self.get(&key) {
            return hit;
        }
        let value = compute();
        self.put(key, value.clone());
        value
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("cache lock poisoned").entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn touch(order: &mut Vec<Fingerprint>, key: Fingerprint) {
    if let Some(pos) = order.iter().position(|k| *k == key) {
        order.remove(pos);
    }
    order.push(key);
}
