//! serde support: a map serializes as a sequence of `(left, right)` pairs in
//! iteration order. Deserializing emplaces each pair and fails on the first
//! pair a unique store rejects.

use crate::bimap::BiMap;
use crate::store::{BaseMap, Handle, Lookup};
use core::fmt;
use core::marker::PhantomData;
use serde::de::{self, Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};

// Upper bound on what a claimed sequence length may preallocate.
const MAX_PREALLOC: usize = 4096;

impl<L, R, F, I> Serialize for BiMap<L, R, F, I>
where
    L: Serialize,
    R: Serialize,
    F: BaseMap<Key = L, Value = Handle>,
    I: BaseMap<Key = R, Value = Handle>,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

struct PairsVisitor<L, R, F, I> {
    marker: PhantomData<fn() -> BiMap<L, R, F, I>>,
}

impl<'de, L, R, F, I> Visitor<'de> for PairsVisitor<L, R, F, I>
where
    L: Deserialize<'de>,
    R: Deserialize<'de>,
    F: BaseMap<Key = L, Value = Handle> + Lookup<L>,
    I: BaseMap<Key = R, Value = Handle> + Lookup<R>,
{
    type Value = BiMap<L, R, F, I>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a sequence of (left, right) pairs")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut map = BiMap::default();
        if let Some(n) = seq.size_hint() {
            map.reserve(n.min(MAX_PREALLOC));
        }
        let mut index = 0usize;
        while let Some((left, right)) = seq.next_element::<(L, R)>()? {
            if !map.emplace(left, right).1 {
                return Err(de::Error::custom(format_args!(
                    "pair {index} repeats a key already in the map"
                )));
            }
            index += 1;
        }
        Ok(map)
    }
}

impl<'de, L, R, F, I> Deserialize<'de> for BiMap<L, R, F, I>
where
    L: Deserialize<'de>,
    R: Deserialize<'de>,
    F: BaseMap<Key = L, Value = Handle> + Lookup<L>,
    I: BaseMap<Key = R, Value = Handle> + Lookup<R>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(PairsVisitor {
            marker: PhantomData,
        })
    }
}
