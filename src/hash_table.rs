//! HashTable: separate chaining over `DynamicArray` buckets.
//!
//! Layout
//! - `Chains` owns the buckets, the entry count, the hasher and the
//!   configuration, and implements every algorithm.
//! - `HashTable` wraps `Chains` with a debug-only reentrancy check around
//!   each public entry point. Hash functions, key/value operations and
//!   `apply_if` callbacks are user code and run while buckets are being
//!   updated.
//!
//! Resizing
//! - Capacity is always a power of two; the bucket for a key is
//!   `hash(key) & (capacity - 1)`.
//! - Insert grows when the load *before* the insert is `>= max_load`.
//!   Erase shrinks when the load *before* the erase is `<= min_load`.
//!   Each call resizes at most once.
//! - A resize first allocates the new buckets and reserves, per bucket,
//!   room for every entry that will move there. Only then are entries
//!   moved (never copied) out of the old buckets. An allocation failure
//!   therefore leaves the table exactly as it was.

use crate::config::TableConfig;
use crate::dynamic_array::{load_of, ArrayError, DynamicArray};
use crate::entry::{Entry, EntryOps};
use crate::hash_funcs::{Hashed, KeyHasher};
use crate::ops::{ElementOps, NativeOps};
use crate::reentrancy::ReentryCheck;
use core::fmt;
use core::hash::Hash;
use thiserror::Error;

/// One chain of entries sharing a bucket index.
pub type Bucket<K, V, KO, VO> = DynamicArray<Entry<K, V, KO, VO>, EntryOps>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InsertError {
    #[error("an entry with this key is already present")]
    DuplicateKey,
    #[error("bucket storage failure: {0}")]
    Storage(#[from] ArrayError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EraseError {
    #[error("table is empty")]
    Empty,
    #[error("key is not present")]
    MissingKey,
    #[error("bucket storage failure: {0}")]
    Storage(#[from] ArrayError),
}

struct Chains<K, V, H, KO, VO>
where
    KO: ElementOps<K> + Clone,
    VO: ElementOps<V> + Clone,
{
    buckets: Vec<Bucket<K, V, KO, VO>>,
    size: usize,
    hasher: H,
    config: TableConfig,
}

fn alloc_buckets<K, V, KO, VO>(
    capacity: usize,
    config: &TableConfig,
) -> Result<Vec<Bucket<K, V, KO, VO>>, ArrayError>
where
    KO: ElementOps<K> + Clone,
    VO: ElementOps<V> + Clone,
{
    // On error the partially built vector drops, releasing every bucket
    // made so far.
    let mut buckets = Vec::new();
    buckets.try_reserve_exact(capacity)?;
    for _ in 0..capacity {
        buckets.push(DynamicArray::with_config(EntryOps, config.bucket)?);
    }
    Ok(buckets)
}

impl<K, V, H, KO, VO> Chains<K, V, H, KO, VO>
where
    H: KeyHasher<K>,
    KO: ElementOps<K> + Clone,
    VO: ElementOps<V> + Clone,
{
    fn new(hasher: H, config: TableConfig) -> Result<Self, ArrayError> {
        config.validate()?;
        let buckets = alloc_buckets(config.initial_capacity, &config)?;
        Ok(Self {
            buckets,
            size: 0,
            hasher,
            config,
        })
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    fn index_for(&self, key: &K, capacity: usize) -> usize {
        (self.hasher.hash_key(key) as usize) & (capacity - 1)
    }

    #[inline]
    fn bucket_index(&self, key: &K) -> usize {
        self.index_for(key, self.capacity())
    }

    /// Bucket index and position within the bucket of `key`.
    fn locate(&self, key: &K) -> Option<(usize, usize)> {
        let b = self.bucket_index(key);
        self.buckets[b]
            .iter()
            .position(|e| e.key_matches(key))
            .map(|pos| (b, pos))
    }

    fn lookup(&self, key: &K) -> Option<&V> {
        let (b, pos) = self.locate(key)?;
        self.buckets[b].at(pos).map(Entry::value)
    }

    fn lookup_mut(&mut self, key: &K) -> Option<&mut V> {
        let (b, pos) = self.locate(key)?;
        self.buckets[b].at_mut(pos).map(Entry::value_mut)
    }

    fn insert_with<F>(&mut self, key: &K, make: F) -> Result<(), InsertError>
    where
        F: FnOnce() -> Entry<K, V, KO, VO>,
    {
        if self.locate(key).is_some() {
            return Err(InsertError::DuplicateKey);
        }
        let at_limit = load_of(self.size, self.capacity()).map_or(true, |l| l >= self.config.max_load);
        if at_limit {
            let target = self.capacity().saturating_mul(self.config.growth_factor);
            self.resize(target)?;
        }
        let b = self.bucket_index(key);
        let bucket = &mut self.buckets[b];
        let before = bucket.len();
        if let Err(e) = bucket.push_moved(make()) {
            // If the entry landed before the chain failed to grow, take it
            // back out so the table stays as it was.
            if bucket.len() > before {
                bucket.discard_last();
            }
            return Err(e.into());
        }
        self.size += 1;
        Ok(())
    }

    fn erase(&mut self, key: &K) -> Result<(), EraseError> {
        if self.size == 0 {
            return Err(EraseError::Empty);
        }
        if self.locate(key).is_none() {
            return Err(EraseError::MissingKey);
        }
        let at_floor = load_of(self.size, self.capacity()).is_some_and(|l| l <= self.config.min_load);
        if at_floor {
            let target = (self.capacity() / self.config.growth_factor).max(1);
            if target != self.capacity() {
                self.resize(target)?;
            }
        }
        let (b, pos) = self.locate(key).ok_or(EraseError::MissingKey)?;
        self.buckets[b].erase(pos)?;
        self.size -= 1;
        Ok(())
    }

    fn apply_if<P, M>(&mut self, mut key_pred: P, mut value_fn: M) -> usize
    where
        P: FnMut(&K) -> bool,
        M: FnMut(&mut V),
    {
        let mut changed = 0;
        for bucket in &mut self.buckets {
            for e in bucket.iter_mut() {
                if key_pred(e.key()) {
                    value_fn(e.value_mut());
                    changed += 1;
                }
            }
        }
        changed
    }

    fn resize(&mut self, new_capacity: usize) -> Result<(), ArrayError> {
        debug_assert!(new_capacity.is_power_of_two());
        match self.try_rehash(new_capacity) {
            Ok(()) => Ok(()),
            Err(e) => {
                log::warn!(
                    "hash table resize {} -> {} failed, table unchanged: {}",
                    self.capacity(),
                    new_capacity,
                    e
                );
                Err(e)
            }
        }
    }

    fn try_rehash(&mut self, new_capacity: usize) -> Result<(), ArrayError> {
        // Phase 1: every allocation. Target indices are computed once, so
        // the hash function runs a single time per entry.
        let mut fresh = alloc_buckets::<K, V, KO, VO>(new_capacity, &self.config)?;
        let mut targets = Vec::new();
        targets.try_reserve_exact(self.size)?;
        let mut counts = Vec::new();
        counts.try_reserve_exact(new_capacity)?;
        counts.resize(new_capacity, 0usize);
        for bucket in &self.buckets {
            for e in bucket {
                let t = self.index_for(e.key(), new_capacity);
                counts[t] += 1;
                targets.push(t);
            }
        }
        for (bucket, &n) in fresh.iter_mut().zip(&counts) {
            if n > 0 {
                bucket.reserve_for(n)?;
            }
        }

        // Phase 2: move. Storage is already reserved, so nothing below
        // allocates or fails.
        log::debug!(
            "hash table rehash: {} -> {} buckets, {} entries",
            self.capacity(),
            new_capacity,
            self.size
        );
        let old = core::mem::replace(&mut self.buckets, fresh);
        let mut targets = targets.into_iter();
        for bucket in old {
            for e in bucket.into_elements() {
                let Some(t) = targets.next() else {
                    unreachable!("one target per entry");
                };
                let moved = self.buckets[t].push_moved(e);
                debug_assert!(moved.is_ok(), "bucket storage was reserved");
            }
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ArrayError> {
        let fresh = alloc_buckets(self.config.initial_capacity, &self.config)?;
        // Old entries are destroyed here, in bucket order.
        self.buckets = fresh;
        self.size = 0;
        Ok(())
    }
}

/// Separate-chaining hash table.
///
/// Keys are hashed with `H`; keys and values are copied, compared and
/// destroyed through the operation sets carried by each entry (`KO` for
/// keys, `VO` for values).
pub struct HashTable<K, V, H = Hashed, KO = NativeOps, VO = NativeOps>
where
    KO: ElementOps<K> + Clone,
    VO: ElementOps<V> + Clone,
{
    chains: Chains<K, V, H, KO, VO>,
    reentrancy: ReentryCheck,
}

impl<K, V> HashTable<K, V>
where
    K: Hash + Clone + PartialEq,
    V: Clone + PartialEq,
{
    /// Table hashing with hashbrown's default hasher, using `Clone` and
    /// `PartialEq` for keys and values.
    pub fn native() -> Result<Self, ArrayError> {
        Self::new(Hashed::default())
    }
}

impl<K, V, H, KO, VO> HashTable<K, V, H, KO, VO>
where
    H: KeyHasher<K>,
    KO: ElementOps<K> + Clone,
    VO: ElementOps<V> + Clone,
{
    pub fn new(hasher: H) -> Result<Self, ArrayError> {
        Self::with_config(hasher, TableConfig::DEFAULT)
    }

    pub fn with_config(hasher: H, config: TableConfig) -> Result<Self, ArrayError> {
        Ok(Self {
            chains: Chains::new(hasher, config)?,
            reentrancy: ReentryCheck::new(),
        })
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.chains.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chains.size == 0
    }

    /// Number of buckets; always a power of two.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.chains.capacity()
    }

    pub fn config(&self) -> &TableConfig {
        &self.chains.config
    }

    /// `len / capacity`, or `None` for a zero capacity.
    pub fn load_factor(&self) -> Option<f64> {
        load_of(self.chains.size, self.chains.capacity())
    }

    pub fn bucket_index(&self, key: &K) -> usize {
        let _g = self.reentrancy.enter("bucket_index");
        self.chains.bucket_index(key)
    }

    /// The chain stored at bucket `index`.
    pub fn bucket(&self, index: usize) -> Option<&Bucket<K, V, KO, VO>> {
        self.chains.buckets.get(index)
    }

    /// Borrow the stored value for `key`.
    pub fn lookup(&self, key: &K) -> Option<&V> {
        let _g = self.reentrancy.enter("lookup");
        self.chains.lookup(key)
    }

    pub fn lookup_mut(&mut self, key: &K) -> Option<&mut V> {
        let _g = self.reentrancy.enter("lookup_mut");
        self.chains.lookup_mut(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        let _g = self.reentrancy.enter("contains_key");
        self.chains.locate(key).is_some()
    }

    /// Store a deep copy of `entry`.
    ///
    /// Duplicate keys are rejected, never overwritten. On any error the
    /// table is left as it was.
    pub fn insert(&mut self, entry: &Entry<K, V, KO, VO>) -> Result<(), InsertError> {
        let _g = self.reentrancy.enter("insert");
        self.chains.insert_with(entry.key(), || entry.copy())
    }

    /// Remove and destroy the entry for `key`.
    pub fn erase(&mut self, key: &K) -> Result<(), EraseError> {
        let _g = self.reentrancy.enter("erase");
        self.chains.erase(key)
    }

    /// Apply `value_fn` to every value whose key satisfies `key_pred`, in
    /// bucket order. Returns how many values were passed to `value_fn`.
    pub fn apply_if<P, M>(&mut self, key_pred: P, value_fn: M) -> usize
    where
        P: FnMut(&K) -> bool,
        M: FnMut(&mut V),
    {
        let _g = self.reentrancy.enter("apply_if");
        self.chains.apply_if(key_pred, value_fn)
    }

    /// Destroy every entry and return to the initial capacity.
    pub fn clear(&mut self) -> Result<(), ArrayError> {
        let _g = self.reentrancy.enter("clear");
        self.chains.clear()
    }

    /// Entries in bucket order, then insertion order within a bucket.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.chains
            .buckets
            .iter()
            .flat_map(|b| b.iter())
            .map(|e| (e.key(), e.value()))
    }
}

impl<K, V, H, KO, VO> HashTable<K, V, H, KO, VO>
where
    H: KeyHasher<K>,
    KO: ElementOps<K> + Clone + Default,
    VO: ElementOps<V> + Clone + Default,
{
    /// Store copies of `key` and `value` under default operation sets.
    pub fn insert_pair(&mut self, key: &K, value: &V) -> Result<(), InsertError> {
        let _g = self.reentrancy.enter("insert_pair");
        self.chains.insert_with(key, || {
            Entry::with_ops(key, value, KO::default(), VO::default())
        })
    }
}

impl<K, V, H, KO, VO> fmt::Debug for HashTable<K, V, H, KO, VO>
where
    K: fmt::Debug,
    V: fmt::Debug,
    KO: ElementOps<K> + Clone,
    VO: ElementOps<V> + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self
            .chains
            .buckets
            .iter()
            .flat_map(|b| b.iter())
            .map(|e| (e.key(), e.value()));
        f.debug_map().entries(entries).finish()
    }
}
