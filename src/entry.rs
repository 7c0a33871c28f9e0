//! Entry: a key/value slot that carries its own operation sets.
//!
//! Every entry knows how to copy, compare and destroy its key and value,
//! so buckets can duplicate or release entries without any outside
//! context. Dropping an entry routes the key and the value through their
//! destroy operations, key first.

use crate::ops::{ElementOps, NativeOps};
use core::fmt;
use core::mem::ManuallyDrop;

pub struct Entry<K, V, KO = NativeOps, VO = NativeOps>
where
    KO: ElementOps<K>,
    VO: ElementOps<V>,
{
    key: ManuallyDrop<K>,
    value: ManuallyDrop<V>,
    key_ops: KO,
    value_ops: VO,
}

impl<K, V> Entry<K, V>
where
    K: Clone + PartialEq,
    V: Clone + PartialEq,
{
    /// Entry holding clones of `key` and `value`.
    pub fn new(key: &K, value: &V) -> Self {
        Self::with_ops(key, value, NativeOps, NativeOps)
    }
}

impl<K, V, KO, VO> Entry<K, V, KO, VO>
where
    KO: ElementOps<K>,
    VO: ElementOps<V>,
{
    /// Entry holding deep copies of `key` and `value`, made with the given
    /// operation sets, which the entry then keeps.
    pub fn with_ops(key: &K, value: &V, key_ops: KO, value_ops: VO) -> Self {
        let key = key_ops.copy(key);
        let value = value_ops.copy(value);
        Self::from_owned(key, value, key_ops, value_ops)
    }

    /// Adopt an owned key and value without copying them.
    pub fn from_owned(key: K, value: V, key_ops: KO, value_ops: VO) -> Self {
        Self {
            key: ManuallyDrop::new(key),
            value: ManuallyDrop::new(value),
            key_ops,
            value_ops,
        }
    }

    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    pub fn key_ops(&self) -> &KO {
        &self.key_ops
    }

    pub fn value_ops(&self) -> &VO {
        &self.value_ops
    }

    /// Whether this entry's key equals `key` under the key equality.
    #[inline]
    pub fn key_matches(&self, key: &K) -> bool {
        self.key_ops.eq(&self.key, key)
    }

    /// Key *and* value equal, using this entry's operations.
    pub fn equals(&self, other: &Self) -> bool {
        self.key_ops.eq(&self.key, &other.key) && self.value_ops.eq(&self.value, &other.value)
    }

    /// Release key then value through their destroy operations.
    pub fn destroy(self) {
        drop(self)
    }

    /// Take the key and value back without destroying them.
    pub fn into_parts(self) -> (K, V) {
        let mut this = ManuallyDrop::new(self);
        // SAFETY: `this` is never dropped, so key and value are read out
        // exactly once and the op sets are dropped in place exactly once.
        unsafe {
            let key = ManuallyDrop::take(&mut this.key);
            let value = ManuallyDrop::take(&mut this.value);
            core::ptr::drop_in_place(&mut this.key_ops);
            core::ptr::drop_in_place(&mut this.value_ops);
            (key, value)
        }
    }
}

impl<K, V, KO, VO> Entry<K, V, KO, VO>
where
    KO: ElementOps<K> + Clone,
    VO: ElementOps<V> + Clone,
{
    /// Deep copy of key, value and both operation sets.
    pub fn copy(&self) -> Self {
        Self::with_ops(
            &self.key,
            &self.value,
            self.key_ops.clone(),
            self.value_ops.clone(),
        )
    }
}

impl<K, V, KO, VO> Drop for Entry<K, V, KO, VO>
where
    KO: ElementOps<K>,
    VO: ElementOps<V>,
{
    fn drop(&mut self) {
        // SAFETY: the fields are not used again; `into_parts` bypasses this
        // impl entirely.
        let (key, value) = unsafe {
            (
                ManuallyDrop::take(&mut self.key),
                ManuallyDrop::take(&mut self.value),
            )
        };
        self.key_ops.destroy(key);
        self.value_ops.destroy(value);
    }
}

impl<K, V, KO, VO> Clone for Entry<K, V, KO, VO>
where
    KO: ElementOps<K> + Clone,
    VO: ElementOps<V> + Clone,
{
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl<K, V, KO, VO> PartialEq for Entry<K, V, KO, VO>
where
    KO: ElementOps<K>,
    VO: ElementOps<V>,
{
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl<K, V, KO, VO> fmt::Debug for Entry<K, V, KO, VO>
where
    K: fmt::Debug,
    V: fmt::Debug,
    KO: ElementOps<K>,
    VO: ElementOps<V>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("key", &*self.key)
            .field("value", &*self.value)
            .finish()
    }
}

/// Operation set buckets use for their entries; every call is forwarded
/// to the entry's own operations.
#[derive(Copy, Clone, Debug, Default)]
pub struct EntryOps;

impl<K, V, KO, VO> ElementOps<Entry<K, V, KO, VO>> for EntryOps
where
    KO: ElementOps<K> + Clone,
    VO: ElementOps<V> + Clone,
{
    #[inline]
    fn copy(&self, e: &Entry<K, V, KO, VO>) -> Entry<K, V, KO, VO> {
        e.copy()
    }

    #[inline]
    fn eq(&self, a: &Entry<K, V, KO, VO>, b: &Entry<K, V, KO, VO>) -> bool {
        a.equals(b)
    }

    #[inline]
    fn destroy(&self, e: Entry<K, V, KO, VO>) {
        e.destroy()
    }
}
