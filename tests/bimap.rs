// BiMap unit test suite over the default hash stores.
//
// Each test documents what behavior is being verified. The core invariants
// exercised:
// - Cardinality: both directions always hold the same number of keys.
// - Cross-consistency: every pair is reachable from either side and the
//   two lookups agree.
// - Injectivity: a unique store rejects a second pair sharing its key,
//   reporting the blocking pair's handle.
// - Ownership: clones share nothing; a moved-from map is empty and usable;
//   the inverse view is the same data with roles swapped.
use bidi_map::{swap, BiMap, Handle, NotFound};
use std::cell::Cell;
use std::hash::{Hash, Hasher};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

fn assert_consistent<L, R>(m: &BiMap<L, R>)
where
    L: Eq + Hash + std::fmt::Debug,
    R: Eq + Hash + std::fmt::Debug,
{
    assert_eq!(m.len(), m.inverse().len());
    for (l, r) in m {
        assert_eq!(m.get(l), Some(r));
        assert_eq!(m.inverse().get(r), Some(l));
    }
    for (r, l) in m.inverse() {
        assert_eq!(m.get(l), Some(r));
    }
}

// Test: two distinct pairs land in both directions.
#[test]
fn emplace_two_pairs_visible_from_both_sides() {
    let mut m = BiMap::new();
    assert!(m.emplace("a", 1).1);
    assert!(m.emplace("b", 2).1);
    assert_eq!(m.len(), 2);
    assert_eq!(m.get("a"), Some(&1));
    assert_eq!(m.inverse().get(&2), Some(&"b"));
    assert_consistent(&m);
}

// Test: a repeated left key is rejected.
// Verifies: `(existing handle, false)`; the stored partner is unchanged.
#[test]
fn duplicate_left_key_rejected_with_existing_handle() {
    let mut m = BiMap::new();
    let (h, inserted) = m.emplace("a", 1);
    assert!(inserted);
    assert_eq!(m.emplace("a", 2), (h, false));
    assert_eq!(m.len(), 1);
    assert_eq!(m.get("a"), Some(&1));
    assert!(!m.inverse().contains(&2));
}

// Test: a repeated right key is rejected through the pair that owns it.
#[test]
fn duplicate_right_key_rejected_with_owning_pair() {
    let mut m = BiMap::new();
    let (h, _) = m.emplace("a", 1);
    let (blocking, inserted) = m.emplace("z", 1);
    assert!(!inserted);
    assert_eq!(blocking, h);
    assert_eq!(m.pair(blocking), Some((&"a", &1)));
    assert!(!m.contains("z"));
}

// Test: erase by key removes the pair from both directions.
#[test]
fn remove_key_clears_both_sides() {
    let mut m = BiMap::new();
    m.emplace("a", 1);
    m.emplace("b", 2);
    assert_eq!(m.remove_key("a"), 1);
    assert_eq!(m.len(), 1);
    assert!(!m.inverse().contains(&1));
    assert_eq!(m.remove_key("a"), 0);
    assert_consistent(&m);
}

// Test: erase through the inverse orientation.
#[test]
fn remove_through_inverse() {
    let mut m: BiMap<String, u32> = BiMap::new();
    m.emplace("x".to_string(), 7);
    m.emplace("y".to_string(), 8);
    assert_eq!(m.inverse_mut().remove_key(&7), 1);
    assert!(!m.contains("x"));
    assert_eq!(m.get("y"), Some(&8));
    assert_consistent(&m);
}

// Test: handle-based removal and stale handles.
// Verifies: removal returns both keys; a stale handle does not alias a
// pair inserted later and removing it again is a no-op.
#[test]
fn remove_by_handle_and_stale_handles() {
    let mut m = BiMap::new();
    let (h, _) = m.emplace("a", 1);
    assert_eq!(m.remove(h), Some(("a", 1)));
    assert_eq!(m.remove(h), None);
    let (h2, _) = m.emplace("a", 1);
    assert_ne!(h, h2);
    assert_eq!(m.pair(h), None);
    assert_eq!(m.pair(h2), Some((&"a", &1)));
    assert_eq!(m.remove(Handle::null()), None);
    assert_eq!(m.len(), 1);
}

// Test: partner handles resolve in the inverse orientation.
#[test]
fn partner_handle_resolves_through_inverse() {
    let mut m = BiMap::new();
    let (h, _) = m.emplace("a", 1);
    let p = m.partner(h).expect("live pair has a partner");
    assert_eq!(m.inverse().pair(p), Some((&1, &"a")));
    assert_eq!(m.inverse().partner(p), Some(h));
    assert_eq!(m.inverse().find(&1), Some(p));
}

// Test: `at` is the checked accessor in both orientations.
#[test]
fn at_reports_not_found() {
    let m: BiMap<&str, i32> = [("a", 1)].into();
    assert_eq!(m.at("a"), Ok(&1));
    assert_eq!(m.at("b"), Err(NotFound));
    assert_eq!(m.inverse().at(&1), Ok(&"a"));
    assert_eq!(m.inverse().at(&2), Err(NotFound));
}

// Test: inverse of the inverse is the original orientation over the
// same data, and mutation through the inverse is visible forward.
#[test]
fn inverse_is_an_involution_over_shared_data() {
    let mut m = BiMap::new();
    m.emplace("a", 1);
    assert_eq!(m.inverse().inverse().get("a"), Some(&1));
    assert!(m.inverse().inverse() == m.view());
    assert!(m.inverse_mut().emplace(2, "b").1);
    assert_eq!(m.get("b"), Some(&2));
    assert_consistent(&m);
}

// Test: copies share nothing with the original.
#[test]
fn clone_is_independent() {
    let mut a = BiMap::new();
    a.emplace("a", 1);
    a.emplace("b", 2);
    let mut b = a.clone();
    assert_eq!(a, b);
    b.emplace("c", 3);
    b.remove_key("a");
    assert_eq!(a.len(), 2);
    assert_eq!(a.get("a"), Some(&1));
    assert!(!a.contains("c"));
    assert_ne!(a, b);
    assert_consistent(&a);
    assert_consistent(&b);
}

// Test: handles from the original resolve to the same pair in a clone.
#[test]
fn clone_keeps_handles_meaningful() {
    let mut a = BiMap::new();
    let (h, _) = a.emplace("a", 1);
    let b = a.clone();
    assert_eq!(b.pair(h), Some((&"a", &1)));
}

// Test: move leaves the source empty and usable.
#[test]
fn take_leaves_empty_usable_map() {
    let mut a = BiMap::new();
    a.emplace("a", 1);
    let b = std::mem::take(&mut a);
    assert!(a.is_empty());
    assert!(a.inverse().is_empty());
    assert_eq!(b.get("a"), Some(&1));
    assert!(a.emplace("a", 1).1, "moved-from map accepts the moved key again");
    assert_eq!(b.len(), 1);
}

// Test: swap exchanges the contents of both directions.
#[test]
fn swap_exchanges_both_directions() {
    let mut a: BiMap<&str, i32> = [("a", 1)].into();
    let mut b: BiMap<&str, i32> = [("x", 9), ("y", 8)].into();
    a.swap(&mut b);
    assert_eq!(a.len(), 2);
    assert_eq!(a.inverse().get(&9), Some(&"x"));
    assert_eq!(b.get("a"), Some(&1));
    swap(&mut a, &mut b);
    assert_eq!(a.get("a"), Some(&1));
    assert_eq!(b.inverse().get(&8), Some(&"y"));
}

// Test: unique-store equality ignores insertion order but not partners.
#[test]
fn equality_compares_pairs() {
    let a: BiMap<&str, i32> = [("a", 1), ("b", 2)].into();
    let b: BiMap<&str, i32> = [("b", 2), ("a", 1)].into();
    let c: BiMap<&str, i32> = [("a", 2), ("b", 1)].into();
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_ne!(a, BiMap::new());
}

// Test: re-labelling an owned map and copying an inverse view.
#[test]
fn into_inverse_and_owned_inverse_copy() {
    let m: BiMap<&str, i32> = [("a", 1), ("b", 2)].into();
    let copy = m.inverse().to_owned();
    assert_eq!(copy.get(&2), Some(&"b"));
    let inv = m.into_inverse();
    assert_eq!(inv, copy);
}

// Test: iteration yields every pair exactly once, in either orientation.
#[test]
fn iteration_covers_each_pair_once() {
    let m: BiMap<u32, u32> = (0..50).map(|i| (i, i * 10)).collect();
    assert_eq!(m.len(), 50);
    let mut seen: Vec<(u32, u32)> = m.iter().map(|(l, r)| (*l, *r)).collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..50).map(|i| (i, i * 10)).collect::<Vec<_>>());
    assert_eq!(m.inverse().iter().count(), 50);
    assert_eq!(m.iter().size_hint(), (50, Some(50)));
    assert_eq!(m.iter().len(), 50);
    assert_eq!(m.inverse().iter().skip(20).len(), 30);
}

// Test: equal_range on unique stores holds at most one pair.
#[test]
fn equal_range_on_unique_store() {
    let m: BiMap<&str, i32> = [("a", 1)].into();
    assert_eq!(m.equal_range("a").collect::<Vec<_>>(), vec![(&"a", &1)]);
    assert_eq!(m.equal_range("b").count(), 0);
}

// Test: clear empties both directions together.
#[test]
fn clear_empties_both_sides() {
    let mut m: BiMap<u8, u8> = [(1, 2), (3, 4)].into();
    m.clear();
    assert!(m.is_empty());
    assert!(m.inverse().is_empty());
    assert!(m.emplace(1, 2).1);
}

// Test: retain removes filtered pairs from both sides.
#[test]
fn retain_filters_pairs() {
    let mut m: BiMap<u32, String> = (0..10).map(|i| (i, format!("v{i}"))).collect();
    assert_eq!(m.retain(|l, _| l % 3 == 0), 6);
    assert_eq!(m.len(), 4);
    assert!(m.inverse().contains("v9"));
    assert!(!m.inverse().contains("v4"));
    assert_consistent(&m);
}

// Test: extend and collect drop rejected pairs like emplace does.
#[test]
fn extend_skips_rejected_pairs() {
    let mut m: BiMap<&str, i32> = BiMap::with_capacity(4);
    m.extend([("a", 1), ("a", 2), ("b", 1), ("c", 3)]);
    assert_eq!(m.len(), 2);
    assert_eq!(m.get("a"), Some(&1));
    assert_eq!(m.get("c"), Some(&3));
    assert_consistent(&m);
}

// Test: Debug renders the pairs as a map.
#[test]
fn debug_output() {
    let m: BiMap<&str, i32> = [("only", 1)].into();
    assert_eq!(format!("{m:?}"), r#"{"only": 1}"#);
    assert_eq!(format!("{:?}", m.inverse()), r#"{1: "only"}"#);
}

// Key whose `Hash` panics on a chosen call, to fail the second phase of
// an insertion.
#[derive(Debug, Clone)]
struct Fuse {
    id: u32,
    hashes: Rc<Cell<u32>>,
    blow_at: u32,
}

impl PartialEq for Fuse {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for Fuse {}

impl Hash for Fuse {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let n = self.hashes.get() + 1;
        self.hashes.set(n);
        if n == self.blow_at {
            panic!("hash fuse blown");
        }
        self.id.hash(state);
    }
}

// Test: a panic while inserting the right key rolls back the left slot.
// Assumes: emplace hashes the right key once to look it up and once to
// insert it.
// Verifies: the panic propagates; afterwards both directions agree and
// the left key can be inserted again.
#[test]
fn panicking_inverse_insert_rolls_back() {
    let mut m: BiMap<&str, Fuse> = BiMap::new();
    let calm = Fuse {
        id: 1,
        hashes: Rc::new(Cell::new(0)),
        blow_at: 0,
    };
    assert!(m.emplace("a", calm).1);

    let bomb = Fuse {
        id: 2,
        hashes: Rc::new(Cell::new(0)),
        blow_at: 2,
    };
    let res = catch_unwind(AssertUnwindSafe(|| m.emplace("b", bomb)));
    assert!(res.is_err(), "the key's panic must propagate");

    assert_eq!(m.len(), 1);
    assert_eq!(m.inverse().len(), 1);
    assert!(!m.contains("b"), "left slot was rolled back");
    let retry = Fuse {
        id: 2,
        hashes: Rc::new(Cell::new(0)),
        blow_at: 0,
    };
    assert!(m.emplace("b", retry).1);
    assert_eq!(m.len(), 2);
}
