//! DynamicArray: owned, growable sequence whose elements are copied,
//! compared and destroyed through a per-container `ElementOps`.
//!
//! Capacity is tracked explicitly and changes only at two points:
//! - after `push_back` appends, it grows by `growth_factor` when
//!   `len / capacity > max_load`;
//! - before `erase` removes, it shrinks by `growth_factor` when
//!   `len / capacity < min_load`.
//!
//! The backing `Vec` always holds at least `capacity` slots, so an append
//! never reallocates; only the explicit grow step asks the allocator for
//! memory, through `try_reserve_exact`, and reports failure instead of
//! aborting.

use crate::config::{ArrayConfig, ConfigError};
use crate::ops::{ElementOps, NativeOps};
use core::fmt;
use std::collections::TryReserveError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArrayError {
    #[error("index {index} out of bounds for length {len}")]
    OutOfBounds { index: usize, len: usize },
    #[error("allocation failed: {0}")]
    Alloc(#[from] TryReserveError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub struct DynamicArray<T, O: ElementOps<T> = NativeOps> {
    data: Vec<T>,
    capacity: usize,
    ops: O,
    config: ArrayConfig,
}

impl<T: Clone + PartialEq> DynamicArray<T> {
    /// Array using the element type's own `Clone`/`PartialEq`.
    pub fn native() -> Result<Self, ArrayError> {
        Self::new(NativeOps)
    }
}

impl<T, O: ElementOps<T>> DynamicArray<T, O> {
    pub fn new(ops: O) -> Result<Self, ArrayError> {
        Self::with_config(ops, ArrayConfig::DEFAULT)
    }

    pub fn with_config(ops: O, config: ArrayConfig) -> Result<Self, ArrayError> {
        config.validate()?;
        let mut data = Vec::new();
        data.try_reserve_exact(config.initial_capacity)?;
        Ok(Self {
            data,
            capacity: config.initial_capacity,
            ops,
            config,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// `len / capacity`, or `None` for a zero capacity.
    pub fn load_factor(&self) -> Option<f64> {
        load_of(self.len(), self.capacity)
    }

    pub fn ops(&self) -> &O {
        &self.ops
    }

    pub fn config(&self) -> &ArrayConfig {
        &self.config
    }

    /// Borrow the element at `index` (the stored element, not a copy).
    #[inline]
    pub fn at(&self, index: usize) -> Option<&T> {
        self.data.get(index)
    }

    #[inline]
    pub fn at_mut(&mut self, index: usize) -> Option<&mut T> {
        self.data.get_mut(index)
    }

    /// Index of the first element equal to `value` under the configured
    /// equality.
    pub fn find(&self, value: &T) -> Option<usize> {
        self.data.iter().position(|e| self.ops.eq(e, value))
    }

    /// Append a deep copy of `value`.
    ///
    /// If the grow step that follows the append fails to allocate, the
    /// element stays in the array and `ArrayError::Alloc` is returned; the
    /// array is then at its load limit and the caller decides whether that
    /// is fatal. Once the array is full, further appends retry the grow
    /// first and are rejected, unapplied, while it keeps failing.
    pub fn push_back(&mut self, value: &T) -> Result<(), ArrayError> {
        let copy = self.ops.copy(value);
        self.push_moved(copy)
    }

    /// Append an already-owned element without copying it.
    ///
    /// A full array (left there by an earlier failed grow) must grow
    /// before the append; if that fails, `value` is destroyed and nothing
    /// is appended.
    pub(crate) fn push_moved(&mut self, value: T) -> Result<(), ArrayError> {
        if self.len() >= self.capacity {
            if let Err(e) = self.grow() {
                self.ops.destroy(value);
                return Err(e);
            }
        }
        self.data.push(value);
        if exceeds(self.len(), self.capacity, self.config.max_load) {
            self.grow()?;
        }
        Ok(())
    }

    /// Remove and destroy the element at `index`, shifting later elements
    /// one slot left.
    ///
    /// The shrink check runs on the length *before* the removal.
    pub fn erase(&mut self, index: usize) -> Result<(), ArrayError> {
        let len = self.len();
        if index >= len {
            return Err(ArrayError::OutOfBounds { index, len });
        }
        if below(len, self.capacity, self.config.min_load) {
            self.shrink();
        }
        let removed = self.data.remove(index);
        self.ops.destroy(removed);
        Ok(())
    }

    /// Destroy every element, front to back.
    ///
    /// Leaves the array with the same capacity a sequence of `erase(0)`
    /// calls would, without the quadratic shifting.
    pub fn clear(&mut self) {
        let mut capacity = self.capacity;
        for len in (1..=self.len()).rev() {
            if below(len, capacity, self.config.min_load) {
                capacity = shrunk(capacity, self.config.growth_factor, len);
            }
        }
        for e in self.data.drain(..) {
            self.ops.destroy(e);
        }
        if capacity != self.capacity {
            log::trace!("dynamic array cleared: capacity {} -> {}", self.capacity, capacity);
            self.capacity = capacity;
            self.data.shrink_to(capacity);
        }
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    /// Reserve backing storage so that `additional` further appends cannot
    /// allocate. Logical capacity is unchanged; it still follows the grow
    /// rule as the appends happen.
    pub(crate) fn reserve_for(&mut self, additional: usize) -> Result<(), ArrayError> {
        let mut capacity = self.capacity;
        for len in self.len() + 1..=self.len() + additional {
            if exceeds(len, capacity, self.config.max_load) {
                capacity = capacity.saturating_mul(self.config.growth_factor);
            }
        }
        let needed = capacity.saturating_sub(self.len());
        self.data.try_reserve_exact(needed)?;
        Ok(())
    }

    /// Destroy the last element without running the shrink check. Undoes a
    /// `push_moved` whose grow step failed.
    pub(crate) fn discard_last(&mut self) {
        if let Some(e) = self.data.pop() {
            self.ops.destroy(e);
        }
    }

    /// Give up ownership of every element without destroying any of them.
    pub(crate) fn into_elements(mut self) -> Vec<T> {
        core::mem::take(&mut self.data)
    }

    fn grow(&mut self) -> Result<(), ArrayError> {
        let new_capacity = self.capacity.saturating_mul(self.config.growth_factor);
        let additional = new_capacity.saturating_sub(self.len());
        if let Err(e) = self.data.try_reserve_exact(additional) {
            log::warn!(
                "dynamic array growth {} -> {} failed: {}",
                self.capacity,
                new_capacity,
                e
            );
            return Err(ArrayError::Alloc(e));
        }
        log::trace!("dynamic array grow: {} -> {}", self.capacity, new_capacity);
        self.capacity = new_capacity;
        Ok(())
    }

    fn shrink(&mut self) {
        let new_capacity = shrunk(self.capacity, self.config.growth_factor, self.len());
        if new_capacity == self.capacity {
            return;
        }
        log::trace!("dynamic array shrink: {} -> {}", self.capacity, new_capacity);
        self.capacity = new_capacity;
        self.data.shrink_to(new_capacity);
    }
}

impl<T, O: ElementOps<T>> Drop for DynamicArray<T, O> {
    fn drop(&mut self) {
        for e in self.data.drain(..) {
            self.ops.destroy(e);
        }
    }
}

impl<T: fmt::Debug, O: ElementOps<T>> fmt::Debug for DynamicArray<T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicArray")
            .field("capacity", &self.capacity)
            .field("elements", &self.data)
            .finish()
    }
}

impl<'a, T, O: ElementOps<T>> IntoIterator for &'a DynamicArray<T, O> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub(crate) fn load_of(len: usize, capacity: usize) -> Option<f64> {
    if capacity == 0 {
        return None;
    }
    Some(len as f64 / capacity as f64)
}

#[inline]
fn exceeds(len: usize, capacity: usize, max_load: f64) -> bool {
    load_of(len, capacity).map_or(true, |l| l > max_load)
}

#[inline]
fn below(len: usize, capacity: usize, min_load: f64) -> bool {
    load_of(len, capacity).is_some_and(|l| l < min_load)
}

// Never below the live length, never zero.
#[inline]
fn shrunk(capacity: usize, factor: usize, len: usize) -> usize {
    (capacity / factor).max(len).max(1)
}
