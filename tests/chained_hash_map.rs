// ChainedHashMap integration suite.
//
// Each test states what behavior is verified and which invariants it
// relies on. The core invariants exercised:
// - Uniqueness: first insert wins; later inserts of the key report the
//   existing entry and leave its value alone.
// - Round-trip: a stored value is read back until changed or removed.
// - Capacity band: growth past capacity * 2, shrink below capacity / 4,
//   never below the floor of 4.
// - Traversal: begin..end visits every live entry exactly once.
// - Cursors: structural changes invalidate them; value writes do not.
use chained_hashmap::{ChainedHashMap, InsertOutcome, MapError, Position, ResizePolicy};
use std::collections::hash_map::RandomState;
use std::collections::BTreeSet;

// Test: growth scenario from an empty map.
// Assumes: default policy (expand 2, shrink 4, floor 4).
// Verifies: 20 inserts leave len 20, capacity inside the band, and a full
// traversal yields 20 distinct entries.
#[test]
fn twenty_inserts_grow_and_traverse() {
    let mut m = ChainedHashMap::new();
    for k in 1..=20 {
        assert!(m.insert(k, k.to_string()).is_inserted());
        assert!(m.len() <= m.capacity() * 2);
    }
    assert_eq!(m.len(), 20);
    assert!(m.capacity() > 4);

    let mut seen = BTreeSet::new();
    let mut c = m.begin();
    while !c.is_end() {
        let (k, v) = c.entry(&m).unwrap();
        assert_eq!(*v, k.to_string());
        assert!(seen.insert(*k), "key {k} visited twice");
        c = c.advance(&m).unwrap();
    }
    assert_eq!(seen, (1..=20).collect());
}

// Test: literal-list construction.
// Assumes: duplicates in the list are inserted in order with the normal
// insert rule.
// Verifies: [(1,"a"),(2,"b"),(1,"c")] holds two keys and 1 -> "a".
#[test]
fn literal_list_keeps_first_occurrence() {
    let m = ChainedHashMap::from([(1, "a"), (2, "b"), (1, "c")]);
    assert_eq!(m.len(), 2);
    assert_eq!(m.find(&1).value(&m), Ok(&"a"));
    assert_eq!(m.at(&2), Ok(&"b"));
}

// Test: checked access on an empty map.
// Verifies: `at` fails with KeyNotFound for any key and inserts nothing.
#[test]
fn at_on_empty_map_is_key_not_found() {
    let m: ChainedHashMap<String, u8> = ChainedHashMap::new();
    for k in ["", "a", "zzz"] {
        assert_eq!(m.at(k), Err(MapError::KeyNotFound));
    }
    assert!(m.is_empty());
}

// Test: shrink scenario.
// Assumes: default policy.
// Verifies: after 20 inserts and 17 removals the capacity has shrunk and
// the 3 survivors keep their values.
#[test]
fn mass_removal_shrinks_and_keeps_survivors() {
    let mut m = ChainedHashMap::new();
    for k in 0..20u32 {
        m.insert(k, k * k);
    }
    let grown = m.capacity();
    for k in 0..17u32 {
        assert_eq!(m.remove(&k), Some(k * k));
    }
    assert!(m.capacity() < grown);
    assert!(m.capacity() >= 4);
    assert_eq!(m.len(), 3);
    for k in 17..20u32 {
        assert_eq!(m.at(&k), Ok(&(k * k)));
    }
}

// Test: idempotent erase.
// Verifies: removing an absent key leaves len, capacity, and every entry
// unchanged, and does not invalidate outstanding cursors.
#[test]
fn removing_absent_key_changes_nothing() {
    let mut m: ChainedHashMap<String, i32> =
        (0..10).map(|i| (format!("k{i}"), i)).collect();
    let snapshot = m.clone();
    let cursor = m.find("k3");
    let cap = m.capacity();

    assert_eq!(m.remove("missing"), None);
    assert_eq!(m.remove("missing"), None);

    assert_eq!(m, snapshot);
    assert_eq!(m.capacity(), cap);
    assert_eq!(cursor.value(&m), Ok(&3));
}

// Test: index access.
// Verifies: `get_or_default` inserts a default on a miss, returns the
// stored value on a hit, and the value is writable in place.
#[test]
fn get_or_default_counts_words() {
    let text = "the quick brown fox jumps over the lazy dog the end";
    let mut counts: ChainedHashMap<&str, usize> = ChainedHashMap::new();
    for word in text.split_whitespace() {
        *counts.get_or_default(word) += 1;
    }
    assert_eq!(counts.get("the"), Some(&3));
    assert_eq!(counts.get("fox"), Some(&1));
    assert_eq!(counts.len(), 9);
    assert_eq!(counts.values().sum::<usize>(), 11);
}

// Test: insert reports the entry location either way.
// Verifies: Inserted on a new key, Existing (same cursor) on a repeat,
// value unchanged by the repeat.
#[test]
fn insert_reports_location() {
    let mut m = ChainedHashMap::new();
    let first = m.insert("k", 1);
    let again = m.insert("k", 2);
    match (first, again) {
        (InsertOutcome::Inserted(a), InsertOutcome::Existing(b)) => {
            assert_eq!(a, b);
            assert!(matches!(a.position(), Position::At { .. }));
            assert_eq!(b.value(&m), Ok(&1));
        }
        other => panic!("unexpected outcomes: {other:?}"),
    }
}

// Test: cursor invalidation contract.
// Assumes: insert of a new key and removal are structural changes.
// Verifies: old cursors fail with InvalidatedCursor; freshly found cursors
// work; in-place writes keep cursors valid.
#[test]
fn stale_cursor_fails_fast() {
    let mut m = ChainedHashMap::new();
    for k in 0..8 {
        m.insert(k, k);
    }
    let c = m.find(&3);
    *c.value_mut(&mut m).unwrap() += 100;
    assert_eq!(c.value(&m), Ok(&103));

    // Crosses capacity * 2 and rebuilds.
    m.insert(8, 8);
    assert!(matches!(
        c.value(&m),
        Err(MapError::InvalidatedCursor { .. })
    ));
    assert!(matches!(
        c.advance(&m),
        Err(MapError::InvalidatedCursor { .. })
    ));

    let c = m.find(&3);
    assert_eq!(c.value(&m), Ok(&103));
    m.remove(&0);
    assert!(c.key(&m).is_err());
}

// Test: sentinels.
// Verifies: end() is what a miss returns; neither sentinel dereferences;
// advancing before_begin reaches begin; advancing end stays at end.
#[test]
fn sentinel_cursors() {
    let mut m = ChainedHashMap::new();
    assert_eq!(m.before_begin().advance(&m), Ok(m.end()));
    m.insert('x', 1);
    assert_eq!(m.find(&'y'), m.end());
    assert_eq!(m.end().value(&m), Err(MapError::SentinelCursor));
    assert_eq!(m.before_begin().key(&m), Err(MapError::SentinelCursor));
    assert_eq!(m.before_begin().advance(&m), Ok(m.begin()));
    assert_eq!(m.end().advance(&m), Ok(m.end()));
}

// Test: copy semantics.
// Verifies: a clone carries the same entries, policy, and hasher, and
// the two maps evolve independently afterwards.
#[test]
fn clone_is_deep() {
    let policy = ResizePolicy::new(3, 8, 6).unwrap();
    let mut a = ChainedHashMap::with_policy(policy);
    a.extend((0..30).map(|i| (i, vec![i])));
    let mut b = a.clone();
    assert_eq!(a, b);
    assert_eq!(b.policy(), &policy);
    assert_eq!(b.capacity(), a.capacity());

    b.get_mut(&0).unwrap().push(99);
    for i in 1..30 {
        b.remove(&i);
    }
    assert_eq!(a.len(), 30);
    assert_eq!(a.get(&0), Some(&vec![0]));
    assert_eq!(b.get(&0), Some(&vec![0, 99]));
}

// Test: explicit hasher construction.
// Verifies: from_iter_with_hasher stores the given hasher and applies the
// first-occurrence rule.
#[test]
fn from_iter_with_hasher() {
    let pairs = vec![("a", 1), ("b", 2), ("a", 3)];
    let m = ChainedHashMap::from_iter_with_hasher(pairs, RandomState::new());
    assert_eq!(m.len(), 2);
    assert_eq!(m.get("a"), Some(&1));
    let _: &RandomState = m.hasher();
}

// Test: clear.
// Verifies: entries are gone, capacity returns to the policy floor, and the
// map accepts new entries afterwards.
#[test]
fn clear_resets() {
    let mut m: ChainedHashMap<u64, ()> = (0..1000).map(|i| (i, ())).collect();
    assert!(m.capacity() >= 500);
    m.clear();
    assert!(m.is_empty());
    assert_eq!(m.capacity(), 4);
    assert_eq!(m.iter().count(), 0);
    m.insert(1, ());
    assert!(m.contains_key(&1));
}

// Test: borrowing and owning iteration.
// Verifies: iter, iter_mut, keys, values_mut, and into_iter agree with the
// cursor walk and with each other.
#[test]
fn iterators_agree_with_cursor_walk() {
    let mut m: ChainedHashMap<i32, i32> = (0..50).map(|i| (i, i)).collect();
    for (_, v) in m.iter_mut() {
        *v *= 2;
    }
    for v in m.values_mut() {
        *v += 1;
    }

    let mut walked = Vec::new();
    let mut c = m.begin();
    while !c.is_end() {
        walked.push(*c.key(&m).unwrap());
        c = c.advance(&m).unwrap();
    }
    let keys: Vec<i32> = m.keys().copied().collect();
    assert_eq!(walked, keys);
    assert_eq!(m.iter().len(), 50);

    let by_ref: Vec<(i32, i32)> = (&m).into_iter().map(|(k, v)| (*k, *v)).collect();
    let owned: Vec<(i32, i32)> = m.into_iter().collect();
    assert_eq!(by_ref, owned);
    assert!(owned.iter().all(|&(k, v)| v == 2 * k + 1));
}

// Test: Debug output.
// Verifies: the map formats like a std map.
#[test]
fn debug_format() {
    let m = ChainedHashMap::from([("k", 7)]);
    assert_eq!(format!("{m:?}"), "{\"k\": 7}");
}
