use super::{NodeId, ThreadedMap};
use std::fmt::{Debug, Formatter};
use std::iter::FusedIterator;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Position {
    // never reset
    Idle,
    At(NodeId),
    Done,
}

/// A resettable, forward-only position in a [`ThreadedMap`].
///
/// A cursor follows the map's threads, so stepping through the whole map
/// takes no memory beyond the cursor itself.  Cursors borrow the map
/// immutably; any number of them may walk the same map independently, and
/// the map cannot be modified while one is alive.
///
/// # Examples
/// ```
/// use threaded_collections::ThreadedMap;
///
/// let m = ThreadedMap::from([(30, 'c'), (10, 'a'), (20, 'b')]);
/// let mut c = m.cursor();
/// c.reset();
///
/// let mut keys = Vec::new();
/// while let Some(k) = c.step() {
///     keys.push(*k);
/// }
/// assert_eq!(keys, [10, 20, 30]);
///
/// // a reset starts over
/// c.reset();
/// assert_eq!(c.step_entry(), Some((&10, &'a')));
/// ```
pub struct Cursor<'a, K, V> {
    map: &'a ThreadedMap<K, V>,
    pos: Position,
}

impl<'a, K, V> Cursor<'a, K, V> {
    pub(super) fn new(map: &'a ThreadedMap<K, V>) -> Self {
        Cursor {
            map,
            pos: Position::Idle,
        }
    }

    /// Places the cursor on the least key of the map.
    ///
    /// On an empty map the cursor is left exhausted.
    pub fn reset(&mut self) {
        let map = self.map;
        self.pos = match map.root {
            Some(id) => Position::At(map.leftmost(id)),
            None => Position::Done,
        };
    }

    /// Returns the key under the cursor and advances to the next greater key.
    ///
    /// Returns `None`, without moving, if the cursor has not been reset or has
    /// passed the greatest key.
    pub fn step(&mut self) -> Option<&'a K> {
        self.step_entry().map(|(k, _)| k)
    }

    /// Like [`step`](Cursor::step), but returns the value along with the key.
    pub fn step_entry(&mut self) -> Option<(&'a K, &'a V)> {
        let Position::At(id) = self.pos else {
            return None;
        };

        let map = self.map;
        self.pos = match map.in_order_next(id) {
            Some(next) => Position::At(next),
            None => Position::Done,
        };
        Some(map.entry_at(id))
    }

    /// Returns the key the next call to [`step`](Cursor::step) would return.
    pub fn peek(&self) -> Option<&'a K> {
        let map = self.map;
        match self.pos {
            Position::At(id) => Some(&map.node(id).key),
            Position::Idle | Position::Done => None,
        }
    }

    /// Returns true once the cursor has been reset.
    pub fn is_active(&self) -> bool {
        self.pos != Position::Idle
    }
}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        Cursor {
            map: self.map,
            pos: self.pos,
        }
    }
}

impl<K: Debug, V> Debug for Cursor<'_, K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.pos {
            Position::Idle => f.write_str("Cursor(IDLE)"),
            Position::Done => f.write_str("Cursor(DONE)"),
            Position::At(_) => {
                f.write_fmt(format_args!("Cursor(at {:?})", self.peek()))
            }
        }
    }
}

/// An iterator over the entries of a [`ThreadedMap`], sorted by key.
///
/// Created by [`ThreadedMap::iter`].
pub struct Iter<'a, K, V> {
    cursor: Cursor<'a, K, V>,
    len: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(super) fn new(map: &'a ThreadedMap<K, V>) -> Self {
        let mut cursor = map.cursor();
        cursor.reset();
        Iter {
            cursor,
            len: map.len(),
        }
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            cursor: self.cursor.clone(),
            len: self.len,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.step_entry().map(|entry| {
            self.len -= 1;
            entry
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.len
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// An iterator over the keys of a [`ThreadedMap`], in sorted order.
pub struct Keys<'a, K, V>(Iter<'a, K, V>);

impl<'a, K, V> Keys<'a, K, V> {
    pub(super) fn new(iter: Iter<'a, K, V>) -> Self {
        Keys(iter)
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// An iterator over the values of a [`ThreadedMap`], ordered by key.
pub struct Values<'a, K, V>(Iter<'a, K, V>);

impl<'a, K, V> Values<'a, K, V> {
    pub(super) fn new(iter: Iter<'a, K, V>) -> Self {
        Values(iter)
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}

/// An owning iterator over the entries of a [`ThreadedMap`], sorted by key.
pub struct IntoIter<K, V> {
    entries: std::vec::IntoIter<(K, V)>,
}

impl<K, V> IntoIter<K, V> {
    pub(super) fn new(map: ThreadedMap<K, V>) -> Self {
        // find the order first, then move the entries out of the arena
        let mut order = Vec::with_capacity(map.len());
        let mut curr = map.root.map(|id| map.leftmost(id));
        while let Some(id) = curr {
            order.push(id);
            curr = map.in_order_next(id);
        }

        let mut slots: Vec<_> =
            map.nodes.into_iter().map(|n| Some((n.key, n.val))).collect();
        let entries: Vec<_> =
            order.into_iter().filter_map(|id| slots[id.0].take()).collect();

        IntoIter {
            entries: entries.into_iter(),
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.entries.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}
