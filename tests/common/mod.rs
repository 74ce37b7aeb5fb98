use proptest::prelude::*;
use std::collections::BTreeMap as StdMap;

// Asserts that every argument equals the first.
#[allow(unused_macros)]
macro_rules! assert_eq_all {
    ( $x:expr, $( $y:expr ),+ $(,)? ) => {{
        let x = $x;
        $( assert_eq!(x, $y); )+
    }};
}

#[allow(dead_code)]
pub(super) fn assert_eq_iters<I: Iterator, J: Iterator<Item = I::Item>>(
    mut i: I,
    mut j: J,
) where
    I::Item: std::fmt::Debug + Eq, // same inferred for J::Item
{
    loop {
        match (i.next(), j.next()) {
            (None, None) => return,
            (a, b) => assert_eq!(a, b),
        }
    }
}

// Builds the std map holding what a ThreadedMap holds after inserting v in
// order: the first value given for a key is the one kept.
#[allow(dead_code)]
pub(super) fn first_wins<K: Ord, V>(v: Vec<(K, V)>) -> StdMap<K, V> {
    let mut m = StdMap::new();
    for (k, x) in v {
        m.entry(k).or_insert(x);
    }
    m
}

#[allow(dead_code)]
pub(super) type U16Pairs = Vec<(u16, u16)>;

#[allow(dead_code)]
pub(super) type U16Seq = Vec<u16>;

#[allow(dead_code)]
pub(super) fn small_int_pairs() -> impl Strategy<Value = U16Pairs> {
    prop::collection::vec((0u16..1024u16, 0u16..1024u16), 0..512)
}

#[allow(dead_code)]
pub(super) fn small_int_seq() -> impl Strategy<Value = U16Seq> {
    prop::collection::vec(0u16..1024u16, 0..512)
}

#[allow(dead_code)]
pub(super) fn string_u16_pairs() -> impl Strategy<Value = Vec<(String, u16)>> {
    prop::collection::vec(("[a-z]{0,2}", 0u16..1024u16), 0..512)
}

// Keys in ascending order, a worst case for an unbalanced tree.
#[allow(dead_code)]
pub(super) fn sorted_pairs() -> impl Strategy<Value = U16Pairs> {
    small_int_pairs().prop_map(|mut v| {
        v.sort_by_key(|e| e.0);
        v
    })
}
