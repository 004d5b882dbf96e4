#![cfg(test)]

// Property tests for ChainedHashMap kept inside the crate so they can call
// the full-table invariant walker.

use crate::chained_hash_map::{ChainedHashMap, InsertOutcome};
use crate::cursor::Cursor;
use crate::error::MapError;
use proptest::prelude::*;
use std::collections::hash_map::RandomState;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations: indices shrink to earlier keys, the pool
// shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i32),
    InsertWith(usize, i32),
    GetOrDefault(usize, i32),
    Remove(usize),
    Find(usize),
    At(usize),
    Contains(String),
    Mutate(usize, i32),
    Iterate,
    Clear,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=40).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::InsertWith(i, v)),
            2 => (idx.clone(), -50..50i32).prop_map(|(i, d)| Op::GetOrDefault(i, d)),
            5 => idx.clone().prop_map(Op::Remove),
            2 => idx.clone().prop_map(Op::Find),
            2 => idx.clone().prop_map(Op::At),
            1 => prop_oneof![contains_pool, "[a-z]{0,4}"].prop_map(Op::Contains),
            2 => (idx.clone(), -50..50i32).prop_map(|(i, d)| Op::Mutate(i, d)),
            1 => Just(Op::Iterate),
            1 => Just(Op::Clear),
        ];
        proptest::collection::vec(op, 1..150).prop_map(move |ops| (pool.clone(), ops))
    })
}

// State-machine equivalence against std::collections::HashMap with
// first-insert-wins semantics. After every op:
// - the table invariants hold (band, bucket placement, uniqueness, len);
// - len/is_empty match the model;
// - the generation moved iff the key set changed or a rebuild ran;
// - cursors minted before a generation change report InvalidatedCursor,
//   cursors minted since still resolve to their key.
fn run_state_machine<S>(
    mut sut: ChainedHashMap<Key, i32, S>,
    pool: &[String],
    ops: Vec<Op>,
) -> Result<(), TestCaseError>
where
    S: BuildHasher,
{
    let mut model: HashMap<Key, i32> = HashMap::new();
    let mut held: Vec<(Key, Cursor)> = Vec::new();
    let mut stale: Vec<Cursor> = Vec::new();

    for op in ops {
        let gen_before = sut.end().generation();
        let keys_before = model.len();
        let mut keyset_changed = false;

        match op {
            Op::Insert(i, v) => {
                let k = key_from(pool, i);
                let already = model.contains_key(&k);
                match sut.insert(k.clone(), v) {
                    InsertOutcome::Inserted(c) => {
                        prop_assert!(!already, "inserted over an existing key");
                        prop_assert_eq!(c.value(&sut), Ok(&v));
                        model.insert(k, v);
                        keyset_changed = true;
                    }
                    InsertOutcome::Existing(c) => {
                        prop_assert!(already, "reported existing for a new key");
                        prop_assert_eq!(c.value(&sut).ok(), model.get(&k));
                    }
                }
            }
            Op::InsertWith(i, v) => {
                let k = key_from(pool, i);
                let already = model.contains_key(&k);
                let mut ran = false;
                let out = sut.insert_with(k.clone(), || {
                    ran = true;
                    v
                });
                prop_assert_eq!(ran, !already, "closure must run only on a miss");
                prop_assert_eq!(out.is_inserted(), !already);
                if !already {
                    model.insert(k, v);
                    keyset_changed = true;
                }
            }
            Op::GetOrDefault(i, d) => {
                let k = key_from(pool, i);
                keyset_changed = !model.contains_key(&k);
                let slot = sut.get_or_default(k.clone());
                *slot = slot.saturating_add(d);
                let mv = model.entry(k).or_default();
                *mv = mv.saturating_add(d);
            }
            Op::Remove(i) => {
                let k = key_from(pool, i);
                let got = sut.remove(&k);
                prop_assert_eq!(got, model.remove(&k));
                keyset_changed = got.is_some();
            }
            Op::Find(i) => {
                let k = key_from(pool, i);
                let c = sut.find(&k);
                prop_assert_eq!(!c.is_end(), model.contains_key(&k));
                if !c.is_end() {
                    prop_assert_eq!(c.key(&sut), Ok(&k));
                    held.push((k, c));
                }
            }
            Op::At(i) => {
                let k = key_from(pool, i);
                match model.get(&k) {
                    Some(v) => {
                        prop_assert_eq!(sut.at(&k), Ok(v));
                    }
                    None => {
                        prop_assert_eq!(sut.at(&k), Err(MapError::KeyNotFound));
                    }
                }
            }
            Op::Contains(s) => {
                let has_model = model.keys().any(|k| k.0 == s);
                prop_assert_eq!(sut.contains_key(s.as_str()), has_model);
            }
            Op::Mutate(i, d) => {
                let k = key_from(pool, i);
                let c = sut.find(&k);
                if let Ok(v) = c.value_mut(&mut sut) {
                    *v = v.saturating_add(d);
                    let mv = model.get_mut(&k).expect("present in model");
                    *mv = mv.saturating_add(d);
                } else {
                    prop_assert!(!model.contains_key(&k));
                }
            }
            Op::Iterate => {
                let mut walked = Vec::new();
                let mut c = sut.begin();
                while !c.is_end() {
                    let (k, v) = c.entry(&sut).expect("live cursor");
                    walked.push((k.clone(), *v));
                    c = c.advance(&sut).expect("live cursor");
                }
                let iterated: Vec<_> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(&walked, &iterated);
                let s_keys: BTreeSet<_> = walked.iter().map(|(k, _)| k.clone()).collect();
                prop_assert_eq!(s_keys.len(), walked.len(), "key visited twice");
                let m_keys: BTreeSet<_> = model.keys().cloned().collect();
                prop_assert_eq!(s_keys, m_keys);
            }
            Op::Clear => {
                sut.clear();
                model.clear();
                keyset_changed = true;
                prop_assert_eq!(sut.capacity(), sut.policy().min_capacity());
            }
        }

        sut.assert_invariants();
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());

        let gen_after = sut.end().generation();
        if keyset_changed {
            prop_assert_ne!(gen_before, gen_after);
        } else {
            prop_assert_eq!(gen_before, gen_after, "generation moved without a structural change");
            prop_assert_eq!(keys_before, model.len());
        }
        if gen_before != gen_after {
            stale.extend(held.drain(..).map(|(_, c)| c));
        }
        for c in &stale {
            let invalidated = matches!(c.value(&sut), Err(MapError::InvalidatedCursor { .. }));
            prop_assert!(invalidated, "stale cursor resolved");
        }
        for (k, c) in &held {
            prop_assert_eq!(c.key(&sut), Ok(k));
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let sut: ChainedHashMap<Key, i32> = ChainedHashMap::new();
        run_state_machine(sut, &pool, ops)?;
    }
}

// Collision variant using a constant hasher: every key shares one chain,
// stressing equality resolution and stable in-chain removal.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let sut: ChainedHashMap<Key, i32, ConstBuildHasher> =
            ChainedHashMap::with_hasher(ConstBuildHasher);
        run_state_machine(sut, &pool, ops)?;
    }
}

// Building from a sequence keeps the first value for every repeated key.
proptest! {
    #[test]
    fn prop_from_iter_first_occurrence_wins(pairs in proptest::collection::vec((0u8..32, any::<i32>()), 0..200)) {
        let map: ChainedHashMap<u8, i32> = pairs.iter().copied().collect();
        let mut first: HashMap<u8, i32> = HashMap::new();
        for (k, v) in &pairs {
            first.entry(*k).or_insert(*v);
        }
        prop_assert_eq!(map.len(), first.len());
        for (k, v) in &first {
            prop_assert_eq!(map.get(k), Some(v));
        }
        map.assert_invariants();

        let rebuilt = ChainedHashMap::from_iter_with_hasher(pairs, RandomState::new());
        prop_assert!(rebuilt == map);
    }
}

// Key hashes are cached: rebuilds never call `Hash` again.
proptest! {
    #[test]
    fn prop_hash_runs_once_per_new_key(keys in proptest::collection::vec(any::<u16>(), 0..300)) {
        use std::cell::Cell;
        use std::rc::Rc;

        #[derive(Clone, Default)]
        struct Counting {
            calls: Rc<Cell<usize>>,
        }
        impl BuildHasher for Counting {
            type Hasher = std::collections::hash_map::DefaultHasher;
            fn build_hasher(&self) -> Self::Hasher {
                self.calls.set(self.calls.get() + 1);
                Default::default()
            }
        }

        let hasher = Counting::default();
        let calls = hasher.calls.clone();
        let mut m = ChainedHashMap::with_hasher(hasher);
        for k in &keys {
            m.insert(*k, ());
        }
        prop_assert_eq!(calls.get(), keys.len());
        let distinct: BTreeSet<_> = keys.iter().collect();
        prop_assert_eq!(m.len(), distinct.len());
        for k in &distinct {
            m.remove(*k);
        }
        prop_assert_eq!(calls.get(), keys.len() + distinct.len());
        prop_assert!(m.is_empty());
    }
}
