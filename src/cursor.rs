//! Cursors: generation-stamped `(bucket, slot)` positions into a
//! `ChainedHashMap`.

use crate::bucket::Bucket;
use crate::chained_hash_map::ChainedHashMap;
use crate::error::MapError;

/// Logical traversal position.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Position {
    /// Precedes the first entry; advancing it yields `begin()`.
    BeforeBegin,
    /// Entry `slot` of bucket `bucket`.
    At { bucket: usize, slot: usize },
    /// Past the last entry. Also the result of a missed `find`.
    AfterEnd,
}

/// A position into a map, valid until the next structural change
/// (inserting a new key, removing a key, a rebuild, or `clear`).
///
/// Cursors do not borrow the map. Every accessor takes the map and
/// checks the cursor's generation first, returning
/// `MapError::InvalidatedCursor` once the map has changed shape.
/// Changing a value in place does not invalidate cursors.
///
/// A cursor carries no identity of the map that minted it; using it
/// with a different map is a logic error that may resolve to an
/// unrelated entry or report `InvalidatedCursor`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Cursor {
    position: Position,
    generation: u64,
}

impl Cursor {
    pub(crate) fn new(position: Position, generation: u64) -> Self {
        Cursor {
            position,
            generation,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_end(&self) -> bool {
        self.position == Position::AfterEnd
    }

    pub fn is_before_begin(&self) -> bool {
        self.position == Position::BeforeBegin
    }

    pub fn key<'a, K, V, S>(&self, map: &'a ChainedHashMap<K, V, S>) -> Result<&'a K, MapError> {
        map.cursor_entry(*self).map(|e| &e.key)
    }

    pub fn value<'a, K, V, S>(&self, map: &'a ChainedHashMap<K, V, S>) -> Result<&'a V, MapError> {
        map.cursor_entry(*self).map(|e| &e.value)
    }

    pub fn entry<'a, K, V, S>(
        &self,
        map: &'a ChainedHashMap<K, V, S>,
    ) -> Result<(&'a K, &'a V), MapError> {
        map.cursor_entry(*self).map(|e| (&e.key, &e.value))
    }

    pub fn value_mut<'a, K, V, S>(
        &self,
        map: &'a mut ChainedHashMap<K, V, S>,
    ) -> Result<&'a mut V, MapError> {
        map.cursor_entry_mut(*self).map(|e| &mut e.value)
    }

    /// The next position in traversal order. `AfterEnd` advances to itself.
    pub fn advance<K, V, S>(&self, map: &ChainedHashMap<K, V, S>) -> Result<Cursor, MapError> {
        map.cursor_advance(*self)
    }
}

/// Successor of `pos` over `buckets`: the next slot in the same bucket,
/// else the first slot of the next non-empty bucket, else `AfterEnd`.
pub(crate) fn next_position<K, V>(buckets: &[Bucket<K, V>], pos: Position) -> Position {
    let scan_from = match pos {
        Position::BeforeBegin => 0,
        Position::AfterEnd => return Position::AfterEnd,
        Position::At { bucket, slot } => {
            let within = buckets.get(bucket).map(Bucket::len).unwrap_or(0);
            if slot + 1 < within {
                return Position::At {
                    bucket,
                    slot: slot + 1,
                };
            }
            bucket + 1
        }
    };
    buckets
        .iter()
        .enumerate()
        .skip(scan_from)
        .find(|(_, b)| !b.is_empty())
        .map(|(bucket, _)| Position::At { bucket, slot: 0 })
        .unwrap_or(Position::AfterEnd)
}
