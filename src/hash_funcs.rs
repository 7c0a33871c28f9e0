//! Key hashing for `HashTable`.
//!
//! A table hashes keys through `KeyHasher<K>`. Any `Fn(&K) -> u64`
//! qualifies, so plain functions such as `hash_int` below can be handed
//! to a table directly. `Hashed<S>` adapts a `BuildHasher` for keys that
//! implement `Hash`; `Hashed::default()` uses hashbrown's default builder.
//!
//! The table only needs the hash to be deterministic for equal keys. The
//! primitive functions here are identity-like and make bucket placement
//! easy to predict in tests.

use core::hash::{BuildHasher, Hash};
use hashbrown::DefaultHashBuilder;

pub trait KeyHasher<K: ?Sized> {
    fn hash_key(&self, key: &K) -> u64;
}

impl<K: ?Sized, F> KeyHasher<K> for F
where
    F: Fn(&K) -> u64,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self(key)
    }
}

/// Hash keys with a `BuildHasher`.
#[derive(Clone, Debug, Default)]
pub struct Hashed<S = DefaultHashBuilder>(pub S);

impl<K, S> KeyHasher<K> for Hashed<S>
where
    K: ?Sized + Hash,
    S: BuildHasher,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self.0.hash_one(key)
    }
}

/// Integers hash to themselves; negatives sign-extend.
pub fn hash_int(key: &i32) -> u64 {
    *key as i64 as u64
}

/// Bytes hash to their numeric value.
pub fn hash_char(key: &u8) -> u64 {
    u64::from(*key)
}

/// Floats hash to their value truncated toward zero; NaN hashes to 0.
pub fn hash_float(key: &f32) -> u64 {
    *key as i64 as u64
}

/// Doubles hash to their value truncated toward zero; NaN hashes to 0.
pub fn hash_double(key: &f64) -> u64 {
    *key as i64 as u64
}
