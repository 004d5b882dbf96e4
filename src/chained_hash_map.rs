//! ChainedHashMap: separate-chaining table with band-bounded rescaling and
//! generation-checked cursors.

use crate::bucket::{Bucket, Entry};
use crate::cursor::{next_position, Cursor, Position};
use crate::error::MapError;
use crate::generation::Generation;
use crate::iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
use crate::policy::ResizePolicy;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;

/// Result of `insert`/`insert_with`. Either way the cursor points at the
/// entry now stored under the key.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InsertOutcome {
    /// The key was absent; a new entry was appended.
    Inserted(Cursor),
    /// The key was already present; its value was left untouched.
    Existing(Cursor),
}

impl InsertOutcome {
    pub fn cursor(self) -> Cursor {
        match self {
            InsertOutcome::Inserted(c) | InsertOutcome::Existing(c) => c,
        }
    }

    pub fn is_inserted(self) -> bool {
        matches!(self, InsertOutcome::Inserted(_))
    }
}

/// Hash map using separate chaining.
///
/// Entries live in `capacity` buckets, each an insertion-ordered chain.
/// The table is rebuilt whenever a mutation would leave the element
/// count outside the band described by its `ResizePolicy`, so traversal
/// stays O(len) and lookups O(1) expected.
///
/// Keys are unique and first-insert-wins: inserting an existing key
/// never replaces its value.
#[derive(Clone)]
pub struct ChainedHashMap<K, V, S = RandomState> {
    hasher: S,
    buckets: Vec<Bucket<K, V>>,
    len: usize,
    policy: ResizePolicy,
    generation: Generation,
}

fn empty_buckets<K, V>(capacity: usize) -> Vec<Bucket<K, V>> {
    (0..capacity).map(|_| Bucket::default()).collect()
}

#[inline]
fn bucket_for(hash: u64, capacity: usize) -> usize {
    (hash % capacity as u64) as usize
}

impl<K, V> ChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    pub fn with_policy(policy: ResizePolicy) -> Self {
        Self::with_policy_and_hasher(policy, Default::default())
    }
}

impl<K, V, S> Default for ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

// Operations that never hash a key.
impl<K, V, S> ChainedHashMap<K, V, S> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.buckets.len() as f64
    }

    pub fn policy(&self) -> &ResizePolicy {
        &self.policy
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Drop every entry and return to the policy's minimum capacity.
    pub fn clear(&mut self) {
        self.buckets = empty_buckets(self.policy.min_capacity());
        self.len = 0;
        self.generation.bump();
    }

    pub fn begin(&self) -> Cursor {
        self.cursor(next_position(&self.buckets, Position::BeforeBegin))
    }

    pub fn end(&self) -> Cursor {
        self.cursor(Position::AfterEnd)
    }

    pub fn before_begin(&self) -> Cursor {
        self.cursor(Position::BeforeBegin)
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.buckets, self.len)
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(&mut self.buckets, self.len)
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    #[inline]
    fn cursor(&self, position: Position) -> Cursor {
        Cursor::new(position, self.generation.current())
    }

    fn slot(&self, cursor: Cursor) -> Result<(usize, usize), MapError> {
        self.generation.check(cursor.generation())?;
        match cursor.position() {
            Position::At { bucket, slot } => {
                match self.buckets.get(bucket).map(Bucket::len) {
                    Some(len) if slot < len => Ok((bucket, slot)),
                    // Only reachable with a cursor minted by another map.
                    _ => Err(MapError::InvalidatedCursor {
                        cursor: cursor.generation(),
                        map: self.generation.current(),
                    }),
                }
            }
            Position::BeforeBegin | Position::AfterEnd => Err(MapError::SentinelCursor),
        }
    }

    pub(crate) fn cursor_entry(&self, cursor: Cursor) -> Result<&Entry<K, V>, MapError> {
        let (bucket, slot) = self.slot(cursor)?;
        Ok(&self.buckets[bucket][slot])
    }

    pub(crate) fn cursor_entry_mut(
        &mut self,
        cursor: Cursor,
    ) -> Result<&mut Entry<K, V>, MapError> {
        let (bucket, slot) = self.slot(cursor)?;
        Ok(&mut self.buckets[bucket][slot])
    }

    pub(crate) fn cursor_advance(&self, cursor: Cursor) -> Result<Cursor, MapError> {
        self.generation.check(cursor.generation())?;
        Ok(self.cursor(next_position(&self.buckets, cursor.position())))
    }

    /// Move every entry into `capacity` fresh buckets, keeping traversal
    /// encounter order. Uses the cached hashes; `K: Hash` is not called.
    fn rebuild(&mut self, capacity: usize) {
        let mut fresh = empty_buckets(capacity);
        let old = core::mem::take(&mut self.buckets);
        for entry in old.into_iter().flatten() {
            fresh[bucket_for(entry.hash, capacity)].push(entry);
        }
        self.buckets = fresh;
        self.generation.bump();
        debug_assert_eq!(
            self.buckets.iter().map(Bucket::len).sum::<usize>(),
            self.len,
            "rebuild lost or duplicated entries"
        );
    }

    /// Store a key known to be absent and return its `(bucket, slot)`.
    /// Growth is decided against the post-insert count before the push,
    /// so the returned slot is final.
    fn push_absent(&mut self, hash: u64, key: K, value: V) -> (usize, usize) {
        let count = self.len + 1;
        if let Some(capacity) = self.policy.rebuild_target(count, self.buckets.len()) {
            self.rebuild(capacity);
        }
        let bucket = bucket_for(hash, self.buckets.len());
        let slot = self.buckets[bucket].push(Entry { key, value, hash });
        self.len = count;
        self.generation.bump();
        (bucket, slot)
    }
}

impl<K, V, S> ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_policy_and_hasher(ResizePolicy::default(), hasher)
    }

    pub fn with_policy_and_hasher(policy: ResizePolicy, hasher: S) -> Self {
        Self {
            hasher,
            buckets: empty_buckets(policy.min_capacity()),
            len: 0,
            policy,
            generation: Generation::new(),
        }
    }

    /// Build from an ordered sequence; later duplicates of a key are
    /// ignored.
    pub fn from_iter_with_hasher<I>(iter: I, hasher: S) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = Self::with_hasher(hasher);
        map.extend(iter);
        map
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    fn locate<Q>(&self, hash: u64, q: &Q) -> Option<(usize, usize)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let bucket = bucket_for(hash, self.buckets.len());
        self.buckets[bucket]
            .position(hash, q)
            .map(|slot| (bucket, slot))
    }

    /// Cursor to the entry for `q`, or `end()` if absent.
    pub fn find<Q>(&self, q: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.locate(self.make_hash(q), q) {
            Some((bucket, slot)) => self.cursor(Position::At { bucket, slot }),
            None => self.end(),
        }
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.locate(self.make_hash(q), q).is_some()
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let (bucket, slot) = self.locate(self.make_hash(q), q)?;
        Some(&self.buckets[bucket][slot].value)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let (bucket, slot) = self.locate(self.make_hash(q), q)?;
        Some(&mut self.buckets[bucket][slot].value)
    }

    /// Checked read access: `MapError::KeyNotFound` if absent. Never
    /// inserts.
    pub fn at<Q>(&self, q: &Q) -> Result<&V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).ok_or(MapError::KeyNotFound)
    }

    /// Insert `key -> value` unless `key` is already present, in which
    /// case the stored value is kept and `value` is dropped.
    pub fn insert(&mut self, key: K, value: V) -> InsertOutcome {
        self.insert_with(key, || value)
    }

    /// Like `insert`, but `default` only runs when the key is absent.
    pub fn insert_with<F>(&mut self, key: K, default: F) -> InsertOutcome
    where
        F: FnOnce() -> V,
    {
        let hash = self.make_hash(&key);
        if let Some((bucket, slot)) = self.locate(hash, &key) {
            return InsertOutcome::Existing(self.cursor(Position::At { bucket, slot }));
        }
        let (bucket, slot) = self.push_absent(hash, key, default());
        InsertOutcome::Inserted(self.cursor(Position::At { bucket, slot }))
    }

    /// Mutable access to the value for `key`, inserting `default()` first
    /// if absent. The key is hashed once for both the lookup and the
    /// insert.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let hash = self.make_hash(&key);
        let (bucket, slot) = match self.locate(hash, &key) {
            Some(found) => found,
            None => self.push_absent(hash, key, default()),
        };
        &mut self.buckets[bucket][slot].value
    }

    /// Mutable access to the value for `key`, inserting `V::default()`
    /// first if absent.
    pub fn get_or_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    /// Remove `q` if present. Absent keys are a no-op.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let (bucket, slot) = self.locate(self.make_hash(q), q)?;
        let entry = self.buckets[bucket].remove(slot);
        self.len -= 1;
        self.generation.bump();
        if let Some(capacity) = self.policy.rebuild_target(self.len, self.buckets.len()) {
            self.rebuild(capacity);
        }
        Some((entry.key, entry.value))
    }

    /// Walk the whole table and assert every structural invariant.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let capacity = self.buckets.len();
        assert!(capacity >= self.policy.min_capacity());
        assert!(
            self.policy.admits(self.len, capacity),
            "len {} outside band for capacity {}",
            self.len,
            capacity
        );
        let mut seen: Vec<&K> = Vec::with_capacity(self.len);
        for (i, b) in self.buckets.iter().enumerate() {
            for e in b.iter() {
                assert_eq!(e.hash, self.make_hash(&e.key), "stale cached hash");
                assert_eq!(bucket_for(e.hash, capacity), i, "entry in wrong bucket");
                assert!(!seen.contains(&&e.key), "duplicate key");
                seen.push(&e.key);
            }
        }
        assert_eq!(seen.len(), self.len);
    }
}

impl<K, V, S> fmt::Debug for ChainedHashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Map equality: same keys with equal values, regardless of capacity or
/// bucket order.
impl<K, V, S> PartialEq for ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, S> Eq for ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S> Extend<(K, V)> for ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self::from_iter_with_hasher(iter, S::default())
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for ChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChainedHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut ChainedHashMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, S> IntoIterator for ChainedHashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.buckets, self.len)
    }
}
