//! opsmap: a separate-chaining hash table whose keys and values are
//! copied, compared and destroyed through operation sets chosen per
//! container.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a hash table for arbitrary key/value types where the table
//!   never assumes anything about its elements beyond the operations it
//!   was handed, built from small layers with one contract each.
//! - Layers:
//!   - `ElementOps<T>`: copy / equality / destroy for one element type.
//!     `NativeOps` forwards to `Clone`/`PartialEq`/`Drop`; `FnOps<T>` is
//!     an explicit table of function pointers.
//!   - `DynamicArray<T, O>`: owned sequence with an explicit capacity that
//!     grows after an append pushes the load over `max_load` and shrinks
//!     before an erase when the load is under `min_load`.
//!   - `Entry<K, V, KO, VO>`: key/value slot that carries its own
//!     operation sets, so a bucket can copy or destroy it without context.
//!   - `HashTable<K, V, H, KO, VO>`: power-of-two array of
//!     `DynamicArray<Entry>` buckets plus the resize protocol.
//!
//! Constraints
//! - Single-threaded: `HashTable` is `!Send`/`!Sync`.
//! - Unique keys: a duplicate insert fails; it never overwrites.
//! - Capacity is always a power of two; bucket index is
//!   `hash(key) & (capacity - 1)`.
//! - Resize timing looks at the load *before* the operation, and resizes
//!   at most once per call.
//! - Allocation failure is reported, never turned into an abort, on every
//!   path that grows storage.
//!
//! Resize atomicity
//! - All allocation for a resize happens before any entry moves; entries
//!   are then moved, not copied. A failed resize leaves the table exactly
//!   as it was.
//!
//! Reentrancy
//! - User code (hash function, element operations, `apply_if` callbacks)
//!   must not call back into the table it is running for. Debug builds
//!   panic on such calls.

pub mod config;
pub mod dynamic_array;
pub mod entry;
pub mod hash_funcs;
pub mod hash_table;
#[cfg(test)]
mod hash_table_proptest;
pub mod ops;
mod reentrancy;

// Public surface
pub use config::{ArrayConfig, ConfigError, TableConfig};
pub use dynamic_array::{ArrayError, DynamicArray};
pub use entry::{Entry, EntryOps};
pub use hash_funcs::{hash_char, hash_double, hash_float, hash_int, Hashed, KeyHasher};
pub use hash_table::{Bucket, EraseError, HashTable, InsertError};
pub use ops::{ElementOps, FnOps, NativeOps};
