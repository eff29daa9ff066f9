#![cfg(feature = "serde")]

use bidi_map::{BiMap, OrderedBiMap};
use serde::de::value::{Error as ValueError, SeqDeserializer};
use serde::Deserialize;

// Yields nothing but claims an enormous length, like a length-prefixed
// format whose header lies.
struct ClaimsHuge;

impl Iterator for ClaimsHuge {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX / 2, Some(usize::MAX / 2))
    }
}

#[test]
fn ordered_map_serializes_as_sorted_pairs() {
    let m: OrderedBiMap<u32, String> = [(2, "two".to_string()), (1, "one".to_string())].into();
    let json = serde_json::to_string(&m).expect("serialize");
    assert_eq!(json, r#"[[1,"one"],[2,"two"]]"#);
}

#[test]
fn round_trip_preserves_pairs() {
    let m: BiMap<String, u32> = (0..20).map(|i| (format!("k{i}"), i)).collect();
    let json = serde_json::to_string(&m).expect("serialize");
    let back: BiMap<String, u32> = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, m);
    assert_eq!(back.inverse().get(&7).map(String::as_str), Some("k7"));
}

#[test]
fn duplicate_right_key_is_rejected() {
    let err = serde_json::from_str::<BiMap<String, u32>>(r#"[["a",1],["b",1]]"#)
        .expect_err("second pair repeats right key 1");
    assert!(err.to_string().contains("pair 1 repeats a key"), "{err}");
}

#[test]
fn malformed_input_is_an_error() {
    assert!(serde_json::from_str::<BiMap<String, u32>>(r#"{"a":1}"#).is_err());
    assert!(serde_json::from_str::<BiMap<String, u32>>("[[1]]").is_err());
}

#[test]
fn claimed_length_does_not_drive_allocation() {
    let de = SeqDeserializer::<_, ValueError>::new(ClaimsHuge);
    let m: BiMap<u8, u8> = Deserialize::deserialize(de).expect("empty sequence");
    assert!(m.is_empty());
}
