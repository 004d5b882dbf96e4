//! Bucket storage: one chain of entries per hash index.

use core::borrow::Borrow;
use core::ops::{Index, IndexMut};

/// A stored key/value pair. The key is fixed at insertion; `hash` is the
/// full hash computed once at that point and reused to re-index the entry
/// on every rebuild.
#[derive(Debug, Clone)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) hash: u64,
}

/// Ordered chain of entries sharing `hash % capacity`. Order is insertion
/// order; removal shifts later entries down to keep it.
#[derive(Debug, Clone)]
pub(crate) struct Bucket<K, V> {
    entries: Vec<Entry<K, V>>,
}

impl<K, V> Default for Bucket<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K, V> Bucket<K, V> {
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Slot of the entry whose key equals `q`. The cached hash is compared
    /// first so that `Eq` only runs on probable matches.
    pub(crate) fn position<Q>(&self, hash: u64, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.entries
            .iter()
            .position(|e| e.hash == hash && e.key.borrow() == q)
    }

    /// Append and return the new slot.
    pub(crate) fn push(&mut self, entry: Entry<K, V>) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    /// Remove the entry at `slot`, preserving the order of the rest.
    pub(crate) fn remove(&mut self, slot: usize) -> Entry<K, V> {
        self.entries.remove(slot)
    }

    #[inline]
    pub(crate) fn get(&self, slot: usize) -> Option<&Entry<K, V>> {
        self.entries.get(slot)
    }

    #[cfg(test)]
    pub(crate) fn iter(&self) -> core::slice::Iter<'_, Entry<K, V>> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> core::slice::IterMut<'_, Entry<K, V>> {
        self.entries.iter_mut()
    }
}

impl<K, V> Index<usize> for Bucket<K, V> {
    type Output = Entry<K, V>;

    fn index(&self, slot: usize) -> &Entry<K, V> {
        &self.entries[slot]
    }
}

impl<K, V> IndexMut<usize> for Bucket<K, V> {
    fn index_mut(&mut self, slot: usize) -> &mut Entry<K, V> {
        &mut self.entries[slot]
    }
}

impl<K, V> IntoIterator for Bucket<K, V> {
    type Item = Entry<K, V>;
    type IntoIter = std::vec::IntoIter<Entry<K, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
