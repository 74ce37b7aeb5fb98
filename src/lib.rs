//! # Ordered collections on right-threaded binary search trees
//!
//! `threaded-collections` provides [`ThreadedMap`] and [`ThreadedSet`], sorted
//! collections stored in binary search trees whose otherwise-empty right links
//! are *threads* to each node's in-order successor.  The threads let a
//! [`Cursor`] or an iterator walk the entries in ascending order using no
//! memory beyond its own position.
//!
//! The trees are not balanced and entries cannot be removed individually.
//! Inserting an existing key keeps the original entry.  If you need removal,
//! replacement, or guaranteed logarithmic depth, use
//! [`std::collections::BTreeMap`] instead.
//!
//! ```
//! use threaded_collections::ThreadedMap;
//!
//! let mut m = ThreadedMap::new();
//! m.insert("pear", 3);
//! m.insert("apple", 1);
//! m.insert("fig", 2);
//!
//! let mut c = m.cursor();
//! c.reset();
//! assert_eq!(c.step(), Some(&"apple"));
//! assert_eq!(c.step(), Some(&"fig"));
//! assert_eq!(c.step(), Some(&"pear"));
//! assert_eq!(c.step(), None);
//! ```

pub mod threaded;
pub use threaded::Cursor;
pub use threaded::ThreadedMap;
pub use threaded::ThreadedSet;

#[cfg(feature = "serde")]
mod serde;
