#![cfg(test)]

// Property tests for the base stores kept inside the crate so the same
// state machine can drive every conformer through the store traits.

use crate::error::InsertError;
use crate::handle_hash_map::HandleHashMap;
use crate::handle_sorted_map::{HandleSortedMap, HandleSortedMultiMap};
use crate::store::{BaseMap, Handle, Lookup, OrderedLookup};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::hash::Hasher;

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

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Remove(usize),
    Find(usize),
    Contains(String),
    Mutate(usize, i32),
    Iterate,
    Clear,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            3 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Find),
            2 => prop_oneof![contains_pool, "[a-z]{0,5}"].prop_map(OpI::Contains),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Iterate),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

// State-machine equivalence of a unique-key store against std HashMap:
// - duplicate keys are rejected and leave the stored value alone;
// - `find`/`contains` agree with the model, for owned and borrowed queries;
// - `remove(handle)` returns the model's pair and invalidates the handle;
// - `iter` yields each live entry once; stale handles never resolve.
fn run_unique<M>(mut sut: M, pool: &[String], ops: Vec<OpI>) -> Result<(), TestCaseError>
where
    M: BaseMap<Key = Key, Value = i32> + Lookup<Key> + Lookup<str>,
{
    let mut model: HashMap<Key, i32> = HashMap::new();
    let mut live: HashMap<Key, Handle> = HashMap::new();
    let mut stale: Vec<Handle> = Vec::new();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = key_from(pool, i);
                let already = model.contains_key(&k);
                match sut.insert(k.clone(), v) {
                    Ok(h) => {
                        prop_assert!(!already, "insert must fail on duplicate");
                        prop_assert!(live.insert(k.clone(), h).is_none());
                        model.insert(k, v);
                    }
                    Err(InsertError::DuplicateKey) => {
                        prop_assert!(already, "duplicate error only when key exists");
                        let h = live[&k];
                        prop_assert_eq!(sut.value(h), model.get(&k));
                    }
                }
            }
            OpI::Remove(i) => {
                let k = key_from(pool, i);
                if let Some(h) = live.remove(&k) {
                    let (kk, vv) = sut.remove(h).expect("handle valid for removal");
                    prop_assert!(kk == k);
                    prop_assert_eq!(Some(vv), model.remove(&kk));
                    stale.push(h);
                } else {
                    prop_assert!(Lookup::<Key>::find(&sut, &k).is_none());
                }
            }
            OpI::Find(i) => {
                let k = key_from(pool, i);
                let found = Lookup::<Key>::find(&sut, &k);
                prop_assert_eq!(found, live.get(&k).copied());
                prop_assert_eq!(Lookup::<str>::find(&sut, k.0.as_str()), found);
                let range: Vec<Handle> = Lookup::<Key>::equal_range(&sut, &k).collect();
                prop_assert_eq!(range, found.into_iter().collect::<Vec<_>>());
            }
            OpI::Contains(s) => {
                let has = Lookup::<str>::contains(&sut, s.as_str());
                prop_assert_eq!(has, model.keys().any(|k| k.0 == s));
            }
            OpI::Mutate(i, d) => {
                let k = key_from(pool, i);
                if let Some(&h) = live.get(&k) {
                    let vr = sut.value_mut(h).expect("live handle should resolve");
                    *vr = vr.saturating_add(d);
                    if let Some(mv) = model.get_mut(&k) {
                        *mv = mv.saturating_add(d);
                    }
                }
            }
            OpI::Iterate => {
                let s_keys: BTreeSet<_> = sut.iter().map(|(_, k, _)| k.clone()).collect();
                let m_keys: BTreeSet<_> = model.keys().cloned().collect();
                prop_assert_eq!(s_keys, m_keys);
                for (h, k, v) in sut.iter() {
                    prop_assert_eq!(live.get(k), Some(&h));
                    prop_assert_eq!(model.get(k), Some(v));
                }
            }
            OpI::Clear => {
                sut.clear();
                stale.extend(live.drain().map(|(_, h)| h));
                model.clear();
            }
        }

        for &h in &stale {
            prop_assert!(sut.key(h).is_none());
            prop_assert!(sut.value(h).is_none());
        }
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
    }
    Ok(())
}

// Collision variant using a constant hasher to stress equality resolution.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl std::hash::BuildHasher for ConstBuildHasher {
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
    fn prop_hash_store_state_machine((pool, ops) in arb_scenario()) {
        let sut: HandleHashMap<Key, i32> = HandleHashMap::new();
        run_unique(sut, &pool, ops)?;
    }

    // Worst-case collisions: every key lands in one bucket.
    #[test]
    fn prop_hash_store_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let sut: HandleHashMap<Key, i32, ConstBuildHasher> =
            HandleHashMap::with_hasher(ConstBuildHasher);
        run_unique(sut, &pool, ops)?;
    }

    #[test]
    fn prop_sorted_store_state_machine((pool, ops) in arb_scenario()) {
        let sut: HandleSortedMap<Key, i32> = HandleSortedMap::new();
        run_unique(sut, &pool, ops)?;
    }
}

// Ordered stores against BTreeMap: sorted iteration in both directions and
// bound queries that agree with `BTreeMap::range`.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_sorted_store_bounds(
        inserts in proptest::collection::vec((0u8..40, any::<i16>()), 0..40),
        removes in proptest::collection::vec(0u8..40, 0..20),
        needle in 0u8..45,
        hi in 0u8..45,
    ) {
        let mut sut: HandleSortedMap<u8, i16> = HandleSortedMap::new();
        let mut model: BTreeMap<u8, i16> = BTreeMap::new();
        for (k, v) in inserts {
            let ok = sut.insert(k, v).is_ok();
            prop_assert_eq!(ok, !model.contains_key(&k));
            model.entry(k).or_insert(v);
        }
        for k in removes {
            if let Some(h) = sut.find(&k) {
                prop_assert_eq!(sut.remove(h), model.remove_entry(&k));
            }
        }

        let fwd: Vec<(u8, i16)> = sut.iter().map(|(_, k, v)| (*k, *v)).collect();
        let expect: Vec<(u8, i16)> = model.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(&fwd, &expect);
        let back: Vec<u8> = sut.iter().rev().map(|(_, k, _)| *k).collect();
        let expect_back: Vec<u8> = model.keys().rev().copied().collect();
        prop_assert_eq!(back, expect_back);

        let lower: Vec<u8> = sut.lower_bound(&needle).map(|(_, k, _)| *k).collect();
        prop_assert_eq!(lower, model.range(needle..).map(|(k, _)| *k).collect::<Vec<_>>());
        let upper: Vec<u8> = sut.upper_bound(&needle).map(|(_, k, _)| *k).collect();
        let expect_upper: Vec<u8> = model
            .range((std::ops::Bound::Excluded(needle), std::ops::Bound::Unbounded))
            .map(|(k, _)| *k)
            .collect();
        prop_assert_eq!(upper, expect_upper);
        if needle <= hi {
            let within: Vec<u8> = sut.range(needle..hi).map(|(_, k, _)| *k).collect();
            prop_assert_eq!(within, model.range(needle..hi).map(|(k, _)| *k).collect::<Vec<_>>());
        } else {
            prop_assert_eq!(sut.range(needle..hi).count(), 0);
        }
    }

    // Multi-valued store against a sorted Vec model that keeps equal keys in
    // insertion order; removal by handle takes exactly that slot.
    #[test]
    fn prop_sorted_multi_store(
        ops in proptest::collection::vec((any::<bool>(), 0u8..6, 0usize..64), 1..80),
    ) {
        let mut sut: HandleSortedMultiMap<u8, u32> = HandleSortedMultiMap::new();
        let mut model: Vec<(u8, u32, Handle)> = Vec::new();
        let mut next = 0u32;
        for (insert, k, pick) in ops {
            if insert || model.is_empty() {
                let h = sut.insert(k, next).expect("multi store accepts duplicates");
                let at = model.partition_point(|e| e.0 <= k);
                model.insert(at, (k, next, h));
                next += 1;
            } else {
                let (k, v, h) = model.remove(pick % model.len());
                prop_assert_eq!(sut.remove(h), Some((k, v)));
                prop_assert!(sut.value(h).is_none());
            }
            let got: Vec<(u8, u32)> = sut.iter().map(|(_, k, v)| (*k, *v)).collect();
            let want: Vec<(u8, u32)> = model.iter().map(|e| (e.0, e.1)).collect();
            prop_assert_eq!(got, want);
            let run: Vec<Handle> = sut.equal_range(&k).collect();
            let want_run: Vec<Handle> = model.iter().filter(|e| e.0 == k).map(|e| e.2).collect();
            prop_assert_eq!(run, want_run);
        }
    }
}
