//! chained-hashmap: a single-threaded hash map using separate chaining,
//! with load-factor driven rescaling and generation-checked cursors.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a plain associative container whose full traversal stays
//!   O(len) because the bucket array is kept proportional to the number
//!   of entries, in both directions.
//! - Layers:
//!   - Bucket store: `Vec<Bucket<K, V>>`, each bucket an insertion-ordered
//!     chain of `(key, value, hash)` entries, indexed by
//!     `hash % capacity`.
//!   - ResizePolicy: the band `capacity / shrink <= len <= capacity * expand`
//!     and the capacity a rebuild allocates, `max(min, len * expand)`.
//!   - Cursor protocol: `(bucket, slot)` positions plus before-begin and
//!     after-end sentinels, stamped with the map's structural generation.
//!   - ChainedHashMap<K, V, S>: the public operations.
//!
//! Constraints
//! - Single-threaded: no locks, no atomics. Shared use across threads
//!   needs external synchronization.
//! - Unique keys, first-insert-wins: inserting an existing key keeps the
//!   stored value and reports the existing entry.
//! - O(1) expected lookups; a pathological hasher degrades to a linear
//!   scan of one chain, never to a corrupted table.
//!
//! Rescaling
//! - Every insert of a new key and every successful removal checks the
//!   band against the count the mutation produces. Inserts rebuild before
//!   the push so the new entry lands directly in its final slot; removals
//!   rebuild after the entry is taken out. Either way the band holds once
//!   the call returns.
//! - Capacity never drops below `ResizePolicy::min_capacity`, and the
//!   band is not enforced from below at that floor.
//!
//! Hashing
//! - Each entry caches the `u64` hash computed at insertion. Rebuilds
//!   re-index from the cached hash, so `K: Hash` runs once per stored key,
//!   and `get_or_default` hashes once for both its lookup and its insert.
//!
//! Cursor invalidation
//! - Inserting a new key, removing a key, rebuilding and clearing bump the
//!   generation. Cursors from an older generation fail with
//!   `MapError::InvalidatedCursor` rather than resolving to whatever entry
//!   moved into their slot. Writing a value in place keeps cursors valid.
//! - The borrowing iterators (`iter`, `iter_mut`, `keys`, ...) walk the
//!   same order and are protected by the borrow checker instead.
//!
//! Notes and non-goals
//! - No open addressing, no custom allocators, no persistence.
//! - Traversal order is bucket index, then insertion order within a
//!   bucket; it is not stable across rebuilds.

mod bucket;
mod chained_hash_map;
mod chained_hash_map_proptest;
pub mod cursor;
mod error;
mod generation;
pub mod iter;
pub mod policy;

// Public surface
pub use chained_hash_map::{ChainedHashMap, InsertOutcome};
pub use cursor::{Cursor, Position};
pub use error::{MapError, PolicyError};
pub use policy::ResizePolicy;
