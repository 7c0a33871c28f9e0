//! Debug-only reentrancy check.
//!
//! `HashTable` calls user code (hash function, key/value operations,
//! `apply_if` callbacks) while its buckets are mid-update. Those callbacks
//! must not call back into the same table. In debug builds, entering twice
//! panics and names both operations; in release builds this is a no-op.
//! The marker field keeps the owning table `!Send + !Sync`.
//!
//! In safe code the borrow checker already rules out re-entry into the
//! `&mut self` operations. What remains is shared re-entry (a hasher that
//! reaches its own table through an `Rc`/`Weak` and calls `lookup`) and
//! callers going through raw pointers. The check catches both.

use core::cell::Cell;
use core::marker::PhantomData;

#[derive(Debug)]
pub(crate) struct ReentryCheck {
    #[cfg(debug_assertions)]
    active: Cell<Option<&'static str>>,
    _nosend: PhantomData<*mut ()>,
}

impl ReentryCheck {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(None),
            _nosend: PhantomData,
        }
    }

    /// Mark `op` as running until the returned guard drops.
    #[inline]
    pub(crate) fn enter(&self, op: &'static str) -> ReentryGuard<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(outer) = self.active.get() {
                panic!("reentrant call: `{op}` entered while `{outer}` is running");
            }
            self.active.set(Some(op));
            ReentryGuard { owner: self }
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = op;
            ReentryGuard { _z: PhantomData }
        }
    }
}

impl Default for ReentryCheck {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) struct ReentryGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a ReentryCheck,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl Drop for ReentryGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.owner.active.set(None);
    }
}
