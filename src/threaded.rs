#![warn(missing_docs)]
//! Maps and sets stored in right-threaded binary search trees.

use std::borrow::Borrow;
use std::cmp::Ordering::*;
use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};

use tracing::{debug, trace};

mod cursor;
mod dump;
mod threaded_set;

pub use cursor::{Cursor, IntoIter, Iter, Keys, Values};
pub use threaded_set::{SetIntoIter, ThreadedSet};

#[cfg(test)]
macro_rules! chk_map {
    ( $x:expr ) => {{
        $x.chk();
    }};
}

#[cfg(not(test))]
macro_rules! chk_map {
    ( $x:expr ) => {{}};
}

// Index of a node in its map's arena.  Ids are never reused: nodes are only
// ever appended, and the arena is released as a whole.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct NodeId(usize);

// The right link of a node.  A `Child` owns the subtree below it.  A `Thread`
// only names the in-order successor, which is owned by some other node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Right {
    Empty,
    Child(NodeId),
    Thread(NodeId),
}

impl Right {
    fn child(self) -> Option<NodeId> {
        match self {
            Right::Child(id) => Some(id),
            Right::Empty | Right::Thread(_) => None,
        }
    }

    // the node reached by following the link once, whatever its kind
    fn target(self) -> Option<NodeId> {
        match self {
            Right::Child(id) | Right::Thread(id) => Some(id),
            Right::Empty => None,
        }
    }
}

struct Node<K, V> {
    key: K,
    val: V,
    left: Option<NodeId>,
    right: Right,
}

/// A map from keys to values sorted by key, stored in a right-threaded
/// binary search tree.
///
/// A node without a right subtree keeps a *thread* to its in-order successor
/// in place of the missing child.  Walking the threads visits the entries in
/// ascending order without recursion, a stack, or parent links, which is how
/// [`Cursor`] and [`Iter`] are implemented.
///
/// The tree is never rebalanced, so lookups and insertions take time
/// proportional to the depth of the tree: logarithmic for random insertion
/// orders, linear in the worst case (e.g., keys inserted in sorted order).
///
/// Unlike [`std::collections::BTreeMap`], inserting a key that is already
/// present does not replace the stored value.  The first value inserted for a
/// key is the one that is kept.  There is no way to remove a single entry;
/// [`clear`](ThreadedMap::clear) empties the whole map.
///
/// # Examples
/// ```
/// use threaded_collections::ThreadedMap;
///
/// let mut m = ThreadedMap::new();
/// for k in [50, 25, 75, 10, 30] {
///     m.insert(k, k * 10);
/// }
///
/// assert_eq!(m.get(&30), Some(&300));
/// assert_eq!(m.successor(&30), Some(&50));
/// assert!(m.keys().copied().eq([10, 25, 30, 50, 75]));
/// ```
pub struct ThreadedMap<K, V> {
    nodes: Vec<Node<K, V>>,
    root: Option<NodeId>,
}

impl<K, V> ThreadedMap<K, V> {
    /// Creates a new, empty map.
    /// # Examples
    /// ```
    /// use threaded_collections::ThreadedMap;
    /// let m: ThreadedMap<usize, usize> = ThreadedMap::new();
    /// assert!(m.is_empty());
    /// ```
    pub fn new() -> Self {
        ThreadedMap {
            nodes: Vec::new(),
            root: None,
        }
    }

    /// Drops all entries from the map.
    ///
    /// Clearing an empty map does nothing.
    pub fn clear(&mut self) {
        if !self.is_empty() {
            debug!(len = self.len(), "clearing threaded map");
        }
        self.root = None;
        self.nodes.clear();
    }

    /// Returns the number of entries in self.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if self contains no entries, false otherwise.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns a cursor over the keys of the map.
    ///
    /// The cursor starts out idle: [`Cursor::step`] yields nothing until
    /// [`Cursor::reset`] places it on the least key.  Any number of cursors
    /// can walk the same map at once.
    ///
    /// # Examples
    /// ```
    /// use threaded_collections::ThreadedMap;
    ///
    /// let m = ThreadedMap::from([(2, 'b'), (1, 'a')]);
    /// let mut c = m.cursor();
    /// assert_eq!(c.step(), None);
    ///
    /// c.reset();
    /// assert_eq!(c.step(), Some(&1));
    /// assert_eq!(c.step(), Some(&2));
    /// assert_eq!(c.step(), None);
    /// ```
    pub fn cursor(&self) -> Cursor<'_, K, V> {
        Cursor::new(self)
    }

    /// Creates an iterator over the map entries, sorted by key.
    ///
    /// # Examples
    /// ```
    /// use threaded_collections::ThreadedMap;
    ///
    /// let m = ThreadedMap::from([(0,1), (1,2), (2, 3)]);
    /// for (i, (k, v)) in m.iter().enumerate() {
    ///     assert_eq!(&i, k);
    ///     assert_eq!(&(i+1), v);
    /// }
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self)
    }

    /// Produces an iterator over the keys of the map, in sorted order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Produces an iterator over the values of the map, ordered by their
    /// associated keys.
    ///
    /// # Examples
    /// ```
    /// use threaded_collections::ThreadedMap;
    ///
    /// let m = ThreadedMap::from([(0,0), (1,1), (2,2)]);
    /// let sum_values: u32 = m.values().sum();
    /// assert_eq!(sum_values, 3);
    /// ```
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    /// Returns the key-value pair for the least key in the map.
    ///
    /// # Examples
    /// ```
    /// use threaded_collections::ThreadedMap;
    ///
    /// let m = ThreadedMap::from([(2,0), (1,0)]);
    /// assert_eq!(m.first_key_value(), Some((&1, &0)));
    /// ```
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.root.map(|id| self.entry_at(self.leftmost(id)))
    }

    /// Returns the key-value pair for the greatest key in the map.
    ///
    /// # Examples
    /// ```
    /// use threaded_collections::ThreadedMap;
    ///
    /// let m = ThreadedMap::from([(2,0), (1,0)]);
    /// assert_eq!(m.last_key_value(), Some((&2, &0)));
    /// ```
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let mut curr = self.root?;
        while let Some(r) = self.node(curr).right.child() {
            curr = r;
        }
        Some(self.entry_at(curr))
    }

    fn node(&self, id: NodeId) -> &Node<K, V> {
        &self.nodes[id.0]
    }

    fn entry_at(&self, id: NodeId) -> (&K, &V) {
        let n = self.node(id);
        (&n.key, &n.val)
    }

    // Least node of the subtree rooted at id.
    fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(l) = self.node(id).left {
            id = l;
        }
        id
    }

    // In-order successor of id.  A thread names it directly; an owned right
    // subtree holds it as its least node.
    fn in_order_next(&self, id: NodeId) -> Option<NodeId> {
        match self.node(id).right {
            Right::Empty => None,
            Right::Thread(t) => Some(t),
            Right::Child(c) => Some(self.leftmost(c)),
        }
    }

    fn push_node(&mut self, key: K, val: V, right: Right) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            key,
            val,
            left: None,
            right,
        });
        id
    }
}

impl<K: Ord, V> ThreadedMap<K, V> {
    // Locates the node holding key.  Once the search has to go right of a
    // node without an owned right subtree, the key cannot be in the tree:
    // that node is the greatest key below the target.
    fn find<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut curr = self.root;
        while let Some(id) = curr {
            let n = self.node(id);
            curr = match key.cmp(n.key.borrow()) {
                Equal => return Some(id),
                Less => n.left,
                Greater => n.right.child(),
            };
        }

        None
    }

    /// Inserts a key-value pair into the map if the key is not already
    /// present.
    ///
    /// Returns true if the pair was inserted.  If the map already has an
    /// entry for the key, the map is left unchanged, the passed pair is
    /// dropped, and false is returned.
    ///
    /// # Examples
    /// ```
    /// use threaded_collections::ThreadedMap;
    ///
    /// let mut m = ThreadedMap::new();
    /// assert!(m.insert(0, "a"));
    /// assert!(!m.insert(0, "b"));
    /// assert_eq!(m.get(&0), Some(&"a"));
    /// assert_eq!(m.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, val: V) -> bool {
        let Some(mut parent) = self.root else {
            self.root = Some(self.push_node(key, val, Right::Empty));
            trace!("inserted root of threaded map");
            return true; // *** EARLY RETURN ***
        };

        let mut depth = 1usize;
        loop {
            let (ord, left, right) = {
                let n = self.node(parent);
                (key.cmp(&n.key), n.left, n.right)
            };

            match ord {
                Equal => {
                    trace!(depth, "duplicate key left in place");
                    return false;
                }

                Less => match left {
                    Some(l) => parent = l,
                    None => {
                        // Nothing lies between the new key and its parent, so
                        // the parent is the new node's successor.
                        let id =
                            self.push_node(key, val, Right::Thread(parent));
                        self.nodes[parent.0].left = Some(id);
                        trace!(depth, "inserted left child");
                        break;
                    }
                },

                Greater => match right {
                    Right::Child(r) => parent = r,
                    inherited => {
                        // The new node now sits between parent and parent's
                        // old successor (if any), so it takes over the
                        // parent's thread and the parent gets a real child.
                        let id = self.push_node(key, val, inherited);
                        self.nodes[parent.0].right = Right::Child(id);
                        trace!(depth, "inserted right child");
                        break;
                    }
                },
            }

            depth += 1;
        }

        chk_map!(self);
        true
    }

    /// Tests if self contains an entry for the given key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Returns a reference to the value associated with key.
    ///
    /// # Example
    /// ```
    /// use threaded_collections::ThreadedMap;
    ///
    /// let mut m = ThreadedMap::new();
    /// m.insert(0, 100);
    ///
    /// assert_eq!(m.get(&0), Some(&100));
    /// assert_eq!(m.get(&1), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|id| &self.node(id).val)
    }

    /// Returns the stored key and the value associated with key.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|id| self.entry_at(id))
    }

    /// Returns a mutable reference to the value associated with key.
    ///
    /// # Example
    /// ```
    /// use threaded_collections::ThreadedMap;
    ///
    /// let mut m = ThreadedMap::new();
    /// m.insert(1, 7);
    ///
    /// if let Some(v) = m.get_mut(&1) {
    ///     *v = 2;
    /// }
    /// assert_eq!(m.get(&1), Some(&2));
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.find(key)?;
        Some(&mut self.nodes[id.0].val)
    }

    /// Returns a copy of the value associated with key, or `V::default()` if
    /// the map has no entry for key.
    ///
    /// # Example
    /// ```
    /// use threaded_collections::ThreadedMap;
    ///
    /// let m = ThreadedMap::from([(1, 7)]);
    /// assert_eq!(m.value_of(&1), 7);
    /// assert_eq!(m.value_of(&2), 0);
    /// ```
    pub fn value_of<Q>(&self, key: &Q) -> V
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        V: Clone + Default,
    {
        self.get(key).cloned().unwrap_or_default()
    }

    /// Returns the key found by following the right link of key's node once.
    ///
    /// When key's node has no right subtree, the link is a thread and the
    /// result is the next greater key in the map.  When the node does have a
    /// right subtree, the result is the key at the *root* of that subtree,
    /// which is not necessarily the next greater key (see
    /// [`next_key`](ThreadedMap::next_key)).  Returns `None` if key is not in
    /// the map or is the greatest key with no right subtree.
    ///
    /// # Example
    /// ```
    /// use threaded_collections::ThreadedMap;
    ///
    /// let m: ThreadedMap<_, _> = [50, 75, 60].into_iter().map(|k| (k, ())).collect();
    /// assert_eq!(m.successor(&60), Some(&75)); // thread
    /// assert_eq!(m.successor(&50), Some(&75)); // root of the right subtree
    /// assert_eq!(m.successor(&75), None);
    /// ```
    pub fn successor<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.find(key)?;
        self.node(id).right.target().map(|t| &self.node(t).key)
    }

    /// Returns the least key greater than key, provided key is in the map.
    ///
    /// # Example
    /// ```
    /// use threaded_collections::ThreadedMap;
    ///
    /// let m: ThreadedMap<_, _> = [50, 75, 60].into_iter().map(|k| (k, ())).collect();
    /// assert_eq!(m.next_key(&50), Some(&60));
    /// assert_eq!(m.next_key(&75), None);
    /// assert_eq!(m.next_key(&55), None);
    /// ```
    pub fn next_key<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.find(key)?;
        self.in_order_next(id).map(|t| &self.node(t).key)
    }

    #[cfg(test)]
    fn chk(&self) {
        // Walk the owning edges only, collecting the nodes in order.
        let mut seen = vec![false; self.nodes.len()];
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut spine = Vec::new();
        let mut curr = self.root;
        loop {
            while let Some(id) = curr {
                assert!(!seen[id.0], "node {id:?} owned twice");
                seen[id.0] = true;
                spine.push(id);
                curr = self.node(id).left;
            }

            match spine.pop() {
                None => break,
                Some(id) => {
                    order.push(id);
                    curr = self.node(id).right.child();
                }
            }
        }

        // every node is owned, keys are in order
        assert_eq!(order.len(), self.len());
        for w in order.windows(2) {
            assert!(self.node(w[0]).key < self.node(w[1]).key);
        }

        // every thread names the in-order successor
        for (i, &id) in order.iter().enumerate() {
            let next = order.get(i + 1).copied();
            match self.node(id).right {
                Right::Child(_) => (),
                Right::Thread(t) => assert_eq!(Some(t), next),
                Right::Empty => assert_eq!(None, next),
            }
            assert_eq!(self.in_order_next(id), next);
        }
    }
}

impl<K: Clone + Ord, V: Clone> ThreadedMap<K, V> {
    // Inserts the entries of src into self, visiting each node of src before
    // its owned children.  Threads are never followed.
    fn replay_from(&mut self, src: &Self) {
        debug!(len = src.len(), "replaying threaded map");
        self.nodes.reserve(src.len());

        let mut work: Vec<NodeId> = src.root.into_iter().collect();
        while let Some(id) = work.pop() {
            let n = src.node(id);
            self.insert(n.key.clone(), n.val.clone());

            // push right first so the left subtree is replayed first
            if let Some(r) = n.right.child() {
                work.push(r);
            }
            if let Some(l) = n.left {
                work.push(l);
            }
        }
    }
}

impl<K: Clone + Ord, V: Clone> Clone for ThreadedMap<K, V> {
    /// Builds an independent map with the same entries by re-inserting
    /// self's entries, parents before children.
    fn clone(&self) -> Self {
        let mut res = ThreadedMap::new();
        res.replay_from(self);
        res
    }

    /// Clears self and then re-inserts the entries of source.
    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.replay_from(source);
    }
}

// Pending output of the structural Debug format.
enum Emit {
    Node(NodeId),
    Thread(NodeId),
    Text(&'static str),
}

impl<K, V> ThreadedMap<K, V> {
    // Writes the subtree at id as `({key: val} left right)`.  The tree may be
    // as deep as it is long, so pending pieces go on a heap stack.
    fn fmt_node(&self, id: NodeId, f: &mut Formatter<'_>) -> std::fmt::Result
    where
        K: Debug,
        V: Debug,
    {
        let mut work = vec![Emit::Node(id)];
        while let Some(next) = work.pop() {
            match next {
                Emit::Text(s) => f.write_str(s)?,
                Emit::Thread(t) => {
                    f.write_fmt(format_args!("->{:?}", self.node(t).key))?
                }
                Emit::Node(id) => {
                    let n = self.node(id);
                    f.write_fmt(format_args!(
                        "({{{:?}: {:?}}} ",
                        n.key, n.val
                    ))?;

                    // pushed in reverse of the order they are written
                    work.push(Emit::Text(")"));
                    work.push(match n.right {
                        Right::Empty => Emit::Text("."),
                        Right::Child(r) => Emit::Node(r),
                        Right::Thread(t) => Emit::Thread(t),
                    });
                    work.push(Emit::Text(" "));
                    work.push(match n.left {
                        None => Emit::Text("."),
                        Some(l) => Emit::Node(l),
                    });
                }
            }
        }

        Ok(())
    }
}

impl<K: Debug, V: Debug> Debug for ThreadedMap<K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.root {
            None => f.write_str("ThreadedMap(EMPTY)"),
            Some(id) => {
                // show the tree shape, threads included
                f.write_fmt(format_args!("ThreadedMap(#{}, ", self.len()))?;
                self.fmt_node(id, f)?;
                f.write_str(")")
            }
        }
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for ThreadedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for ThreadedMap<K, V> {}

impl<K: PartialOrd, V: PartialOrd> PartialOrd for ThreadedMap<K, V> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<K: Ord, V: Ord> Ord for ThreadedMap<K, V> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<K: Hash, V: Hash> Hash for ThreadedMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for (k, v) in self {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl<K, Q, V> std::ops::Index<&Q> for ThreadedMap<K, V>
where
    K: Borrow<Q> + Ord,
    Q: Ord + ?Sized,
{
    type Output = V;

    fn index(&self, index: &Q) -> &Self::Output {
        match self.get(index) {
            Some(v) => v,
            None => panic!("Key not found in ThreadedMap"),
        }
    }
}

impl<K, V> Default for ThreadedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Inserts each pair in turn.  Pairs whose key is already in the map are
/// dropped.
impl<K: Ord, V> Extend<(K, V)> for ThreadedMap<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for ThreadedMap<K, V> {
    fn from(vs: [(K, V); N]) -> Self {
        ThreadedMap::from_iter(vs)
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for ThreadedMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut m = ThreadedMap::new();
        m.extend(iter);
        m
    }
}

impl<K, V> From<ThreadedMap<K, V>> for Vec<(K, V)> {
    fn from(value: ThreadedMap<K, V>) -> Self {
        value.into_iter().collect()
    }
}

impl<'a, K, V> IntoIterator for &'a ThreadedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> IntoIterator for ThreadedMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}
