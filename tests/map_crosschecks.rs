use proptest::prelude::*;
use std::collections::BTreeMap as StdMap;
use threaded_collections::ThreadedMap;

#[macro_use]
mod common;
use common::*;

struct Maps<K, V> {
    threaded_map: ThreadedMap<K, V>,
    std_map: StdMap<K, V>, // std::collections::BTreeMap, first insert wins
}

// ThreadedMap's Clone needs K: Ord, which derive(Clone) would not require
impl<K: Clone + Ord, V: Clone> Clone for Maps<K, V> {
    fn clone(&self) -> Self {
        Maps {
            threaded_map: self.threaded_map.clone(),
            std_map: self.std_map.clone(),
        }
    }
}

impl<K, V> Maps<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    fn new(v: Vec<(K, V)>) -> Maps<K, V> {
        Maps {
            threaded_map: ThreadedMap::from_iter(v.clone()),
            std_map: first_wins(v),
        }
    }

    fn new_overlapping(
        u: Vec<(K, V)>,
        v: Vec<(K, V)>,
    ) -> (Maps<K, V>, Maps<K, V>) {
        let m1 = Self::new(u);

        let mut m2 = m1.clone();
        m2.threaded_map.extend(v.clone());
        for (k, x) in v {
            m2.std_map.entry(k).or_insert(x);
        }

        (m1, m2)
    }

    fn chk(&self)
    where
        K: Eq + std::fmt::Debug,
        V: Eq + std::fmt::Debug,
    {
        assert_eq!(self.threaded_map.len(), self.std_map.len());
        assert_eq!(self.threaded_map.is_empty(), self.std_map.is_empty());
        assert_eq_iters(self.threaded_map.iter(), self.std_map.iter());
    }
}

fn check_insert(v: U16Pairs) {
    let mut m = ThreadedMap::new();
    let mut s = StdMap::new();

    for (k, x) in v {
        let fresh = !s.contains_key(&k);
        if fresh {
            s.insert(k, x);
        }
        assert_eq!(m.insert(k, x), fresh);
        assert_eq!(m.len(), s.len());
    }

    assert_eq_iters(m.iter(), s.iter());
}

fn check_get(v: U16Pairs) {
    let maps = Maps::new(v);
    maps.chk();

    for i in 0..1024 {
        assert_eq!(maps.threaded_map.get(&i), maps.std_map.get(&i));
        assert_eq!(
            maps.threaded_map.get_key_value(&i),
            maps.std_map.get_key_value(&i)
        );
        assert_eq_all!(
            maps.threaded_map.contains_key(&i),
            maps.std_map.contains_key(&i),
            maps.threaded_map.get(&i).is_some()
        );
        assert_eq!(
            maps.threaded_map.value_of(&i),
            maps.std_map.get(&i).copied().unwrap_or_default()
        );
    }
}

fn check_get_mut(v: U16Pairs, i: u16) {
    let mut maps = Maps::new(v);

    if let Some(x) = maps.threaded_map.get_mut(&i) {
        *x = 10101;
    }
    if let Some(x) = maps.std_map.get_mut(&i) {
        *x = 10101;
    }

    maps.chk();
}

fn check_cursor(v: U16Pairs) {
    let maps = Maps::new(v);

    let mut c = maps.threaded_map.cursor();
    assert_eq!(c.step(), None);

    c.reset();
    let mut keys = Vec::new();
    while let Some(k) = c.step() {
        keys.push(*k);
    }

    assert_eq!(keys.len(), maps.threaded_map.len());
    assert!(keys.windows(2).all(|w| w[0] < w[1]));
    assert_eq_iters(keys.iter(), maps.std_map.keys());
    assert_eq!(c.step(), None);
}

fn check_next_key(v: U16Pairs) {
    let maps = Maps::new(v);

    for i in 0..1024 {
        let expected = if maps.std_map.contains_key(&i) {
            maps.std_map.range(i + 1..).next().map(|e| e.0)
        } else {
            None
        };
        assert_eq!(maps.threaded_map.next_key(&i), expected);
    }
}

fn check_successor(v: U16Pairs) {
    let maps = Maps::new(v);
    let m = &maps.threaded_map;

    for i in 0..1024 {
        match m.successor(&i) {
            None => {
                // only a missing key or the greatest key has no right link
                assert!(
                    !m.contains_key(&i)
                        || m.last_key_value().map(|e| e.0) == Some(&i)
                );
            }
            Some(k) => {
                assert!(m.contains_key(&i));
                assert!(*k > i);
            }
        }
    }

    // the right link of the greatest key is always empty
    if let Some((k, _)) = m.last_key_value() {
        assert_eq!(m.successor(k), None);
    }
}

fn check_first_last(v: U16Pairs) {
    let maps = Maps::new(v);
    assert_eq!(
        maps.threaded_map.first_key_value(),
        maps.std_map.first_key_value()
    );
    assert_eq!(
        maps.threaded_map.last_key_value(),
        maps.std_map.last_key_value()
    );
}

fn check_extend(u: U16Pairs, v: U16Pairs) {
    let (m1, m2) = Maps::new_overlapping(u, v);
    m1.chk();
    m2.chk();
}

fn check_clone_independence(u: U16Pairs, v: U16Pairs) {
    let m1 = Maps::new(u);
    let mut copy = m1.threaded_map.clone();
    assert_eq!(copy, m1.threaded_map);

    copy.extend(v);
    m1.chk(); // unaffected by inserts into the copy

    let mut orig = m1.threaded_map.clone();
    let copy = orig.clone();
    orig.clear();
    assert!(orig.is_empty());
    assert_eq_iters(copy.iter(), m1.std_map.iter());
}

fn check_clone_from(u: U16Pairs, v: U16Pairs) {
    let m1 = Maps::new(u);
    let mut m2 = Maps::new(v);

    m2.threaded_map.clone_from(&m1.threaded_map);
    m2.std_map.clone_from(&m1.std_map);
    m2.chk();
}

fn check_into_iter(v: Vec<(String, u16)>) {
    let maps = Maps::new(v);
    assert_eq!(maps.threaded_map.len(), maps.std_map.len());
    let mut cnt = maps.threaded_map.len();
    for (x, y) in maps.threaded_map.into_iter().zip(maps.std_map) {
        assert_eq!(x, y);
        cnt -= 1;
    }
    assert_eq!(cnt, 0);
}

fn check_keys_values(v: U16Pairs) {
    let maps = Maps::new(v);
    assert_eq_iters(maps.threaded_map.keys(), maps.std_map.keys());
    assert_eq_iters(maps.threaded_map.values(), maps.std_map.values());
    assert_eq!(maps.threaded_map.keys().len(), maps.std_map.len());
}

fn check_cmp(u: U16Pairs, v: U16Pairs) {
    let m1 = Maps::new(u);
    let m2 = Maps::new(v);

    assert_eq!(
        m1.threaded_map == m2.threaded_map,
        m1.std_map == m2.std_map
    );
    assert_eq!(
        m1.threaded_map.cmp(&m2.threaded_map),
        m1.std_map.cmp(&m2.std_map)
    );
}

#[test]
fn test_clear_empty() {
    let mut m: ThreadedMap<u8, u8> = ThreadedMap::new();
    m.clear();
    assert_eq!(m.len(), 0);

    let mut c = m.cursor();
    c.reset();
    assert_eq!(c.step(), None);
}

#[test]
fn test_map_send() {
    use std::sync::mpsc;
    use std::thread;

    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let m: ThreadedMap<_, _> = (0u16..1024).map(|i| (i, i)).collect();
        tx.send(m).unwrap();
    });

    let received = rx.recv().unwrap();
    assert!(received.keys().copied().eq(0..1024));
}

#[test]
fn test_shared_readers() {
    use std::thread;

    let m: ThreadedMap<_, _> =
        (0u16..512).map(|i| ((i * 37) % 512, i)).collect();

    // read-only cursors from several threads at once
    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                let mut c = m.cursor();
                c.reset();
                let mut cnt = 0u16;
                while let Some(&k) = c.step() {
                    assert_eq!(k, cnt);
                    cnt += 1;
                }
                assert_eq!(cnt, 512);
            });
        }
    });
}

proptest! {
    #[test]
    fn test_insert(v in small_int_pairs()) {
        check_insert(v);
    }

    #[test]
    fn test_insert_sorted(v in sorted_pairs()) {
        check_insert(v);
    }

    #[test]
    fn test_get(v in small_int_pairs()) {
        check_get(v);
    }

    #[test]
    fn test_get_mut(v in small_int_pairs(), i in 0u16..1024) {
        check_get_mut(v, i);
    }

    #[test]
    fn test_cursor(v in small_int_pairs()) {
        check_cursor(v);
    }

    #[test]
    fn test_next_key(v in small_int_pairs()) {
        check_next_key(v);
    }

    #[test]
    fn test_successor(v in small_int_pairs()) {
        check_successor(v);
    }

    #[test]
    fn test_first_last(v in small_int_pairs()) {
        check_first_last(v);
    }

    #[test]
    fn test_extend(u in small_int_pairs(), v in small_int_pairs()) {
        check_extend(u, v);
    }

    #[test]
    fn test_clone_independence(u in small_int_pairs(), v in small_int_pairs()) {
        check_clone_independence(u, v);
    }

    #[test]
    fn test_clone_from(u in small_int_pairs(), v in small_int_pairs()) {
        check_clone_from(u, v);
    }

    #[test]
    fn test_into_iter(v in string_u16_pairs()) {
        check_into_iter(v);
    }

    #[test]
    fn test_keys_values(v in small_int_pairs()) {
        check_keys_values(v);
    }

    #[test]
    fn test_cmp(u in small_int_pairs(), v in small_int_pairs()) {
        check_cmp(u, v);
    }
}

#[cfg(feature = "serde")]
mod serde {
    #![allow(unused_imports)]
    use super::*;
    use crate::common::*;
    use proptest::prelude::*;
    use serde_test::{assert_de_tokens, assert_tokens, Token};

    fn make_tokens(m: &StdMap<u16, u16>) -> Vec<Token> {
        let mut ts = vec![Token::Map { len: Some(m.len()) }];
        for (&k, &v) in m.iter() {
            ts.push(Token::U16(k));
            ts.push(Token::U16(v));
        }
        ts.push(Token::MapEnd);
        ts
    }

    fn check_serde(v: U16Pairs) {
        let m = Maps::new(v);
        let ts = make_tokens(&m.std_map);
        assert_tokens(&m.threaded_map, &ts);
    }

    // a repeated key in the input keeps its first value
    #[test]
    fn test_de_repeated_key() {
        let m = ThreadedMap::from([(1u16, 10u16), (2, 20)]);
        assert_de_tokens(
            &m,
            &[
                Token::Map { len: Some(3) },
                Token::U16(2),
                Token::U16(20),
                Token::U16(1),
                Token::U16(10),
                Token::U16(2),
                Token::U16(99),
                Token::MapEnd,
            ],
        );
    }

    proptest! {
        #[test]
        fn test_serde(v in small_int_pairs()) {
            check_serde(v);
        }
    }
}
