use super::{Cursor, IntoIter, Keys, ThreadedMap};
use std::borrow::Borrow;
use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;

/// A sorted set of values stored in a right-threaded binary search tree.
///
/// The implementation is a thin wrapper around [`ThreadedMap`].  As with the
/// map, inserting a value equal to one already in the set keeps the original.
///
/// # Examples
/// ```
/// use threaded_collections::ThreadedSet;
///
/// let mut s = ThreadedSet::new();
/// assert!(s.insert(3));
/// assert!(s.insert(1));
/// assert!(!s.insert(3));
/// assert!(s.iter().copied().eq([1, 3]));
/// ```
pub struct ThreadedSet<T> {
    map: ThreadedMap<T, ()>,
}

impl<T> ThreadedSet<T> {
    /// Makes a new, empty set.
    pub fn new() -> Self {
        ThreadedSet {
            map: ThreadedMap::new(),
        }
    }

    /// Removes all the values from self.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Returns the number of values in self.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if self has no values.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the least value in the set.
    pub fn first(&self) -> Option<&T> {
        self.map.first_key_value().map(|(k, _)| k)
    }

    /// Returns the greatest value in the set.
    pub fn last(&self) -> Option<&T> {
        self.map.last_key_value().map(|(k, _)| k)
    }

    /// Returns an idle cursor over the set; see [`ThreadedMap::cursor`].
    pub fn cursor(&self) -> Cursor<'_, T, ()> {
        self.map.cursor()
    }

    /// Returns an iterator over the values of the set, in ascending order.
    pub fn iter(&self) -> Keys<'_, T, ()> {
        self.map.keys()
    }
}

impl<T: Ord> ThreadedSet<T> {
    /// Inserts value and returns true if self did not already hold an equal
    /// value.  Otherwise the set is unchanged and false is returned.
    pub fn insert(&mut self, value: T) -> bool {
        self.map.insert(value, ())
    }

    /// Tests if self contains the given value.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.contains_key(value)
    }

    /// Returns a reference to the stored value equal to value, if any.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.get_key_value(value).map(|(k, _)| k)
    }

    /// Follows the right link of value's node once; see
    /// [`ThreadedMap::successor`].
    pub fn successor<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.successor(value)
    }

    /// Returns the least value greater than value, provided value is in the
    /// set.
    pub fn next_value<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.next_key(value)
    }
}

impl<T: Clone + Ord> Clone for ThreadedSet<T> {
    fn clone(&self) -> Self {
        ThreadedSet {
            map: self.map.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.map.clone_from(&source.map);
    }
}

impl<T: Debug> Debug for ThreadedSet<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> Default for ThreadedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> PartialEq for ThreadedSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<T: Eq> Eq for ThreadedSet<T> {}

impl<T: PartialOrd> PartialOrd for ThreadedSet<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord> Ord for ThreadedSet<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Hash> Hash for ThreadedSet<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.map.hash(state);
    }
}

impl<T: Ord> Extend<T> for ThreadedSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.map.extend(iter.into_iter().map(|v| (v, ())));
    }
}

impl<T: Ord> FromIterator<T> for ThreadedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut s = ThreadedSet::new();
        s.extend(iter);
        s
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for ThreadedSet<T> {
    fn from(vs: [T; N]) -> Self {
        ThreadedSet::from_iter(vs)
    }
}

impl<'a, T> IntoIterator for &'a ThreadedSet<T> {
    type Item = &'a T;
    type IntoIter = Keys<'a, T, ()>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator over the values of a [`ThreadedSet`], in ascending
/// order.
pub struct SetIntoIter<T>(IntoIter<T, ()>);

impl<T> Iterator for SetIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(v, _)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<T> DoubleEndedIterator for SetIntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(v, _)| v)
    }
}

impl<T> ExactSizeIterator for SetIntoIter<T> {}

impl<T> FusedIterator for SetIntoIter<T> {}

impl<T> IntoIterator for ThreadedSet<T> {
    type Item = T;
    type IntoIter = SetIntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        SetIntoIter(self.map.into_iter())
    }
}
