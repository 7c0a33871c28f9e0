//! Operation sets: how a container copies, compares and destroys the
//! elements it owns.
//!
//! Containers never call `Clone`, `PartialEq` or `Drop` on their elements
//! directly; every deep copy, equality check and release goes through the
//! `ElementOps` value they were built with. Two implementations ship:
//! - `NativeOps`: zero-sized, forwards to the element's own `Clone` and
//!   `PartialEq`; destroy is a plain drop.
//! - `FnOps<T>`: an explicit table of function pointers, for callers that
//!   want to supply the behavior per container.

use core::fmt;
use core::marker::PhantomData;

/// Copy / equality / destroy for one element type.
pub trait ElementOps<T> {
    /// Produce an owned deep copy of `value`.
    fn copy(&self, value: &T) -> T;

    /// Equality as seen by the container.
    fn eq(&self, a: &T, b: &T) -> bool;

    /// Release an owned element. The default simply drops it.
    #[inline]
    fn destroy(&self, value: T) {
        drop(value);
    }
}

/// Operations backed by the element type's own `Clone` and `PartialEq`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct NativeOps;

impl<T: Clone + PartialEq> ElementOps<T> for NativeOps {
    #[inline]
    fn copy(&self, value: &T) -> T {
        value.clone()
    }

    #[inline]
    fn eq(&self, a: &T, b: &T) -> bool {
        a == b
    }
}

/// Explicit operation table made of plain function pointers.
pub struct FnOps<T> {
    copy: fn(&T) -> T,
    eq: fn(&T, &T) -> bool,
    destroy: fn(T),
    _pd: PhantomData<fn(T) -> T>,
}

impl<T> FnOps<T> {
    pub const fn new(copy: fn(&T) -> T, eq: fn(&T, &T) -> bool, destroy: fn(T)) -> Self {
        Self {
            copy,
            eq,
            destroy,
            _pd: PhantomData,
        }
    }

    /// Table whose destroy is a plain drop.
    pub const fn with_drop(copy: fn(&T) -> T, eq: fn(&T, &T) -> bool) -> Self {
        Self::new(copy, eq, drop::<T>)
    }
}

// Manual impls: derives would put bounds on `T`.
impl<T> Clone for FnOps<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FnOps<T> {}

impl<T> fmt::Debug for FnOps<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnOps").finish_non_exhaustive()
    }
}

impl<T> ElementOps<T> for FnOps<T> {
    #[inline]
    fn copy(&self, value: &T) -> T {
        (self.copy)(value)
    }

    #[inline]
    fn eq(&self, a: &T, b: &T) -> bool {
        (self.eq)(a, b)
    }

    #[inline]
    fn destroy(&self, value: T) {
        (self.destroy)(value)
    }
}
