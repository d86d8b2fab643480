//! Ordered maps over binary search trees.
//!
//! [`AvlTreeMap`] keeps its tree height-balanced (AVL): after every insert
//! or remove, each node's subtrees differ in height by at most one.
//! [`BstMap`] uses the same structural engine without balancing.
//!
//! Nodes live in an arena owned by the map and refer to each other by
//! handle; the parent link is a plain back-reference used for navigation.
//!
//! ```
//! use avl_bst::{AvlTreeMap, Error};
//!
//! let mut map = AvlTreeMap::new();
//! for key in [5, 3, 8, 1, 4, 7, 9] {
//!     map.insert(key, key * 10);
//! }
//! assert_eq!(map.keys().copied().collect::<Vec<_>>(), [1, 3, 4, 5, 7, 8, 9]);
//! assert_eq!(map.at(&4), Ok(&40));
//! assert_eq!(map.at(&6), Err(Error::KeyNotFound));
//!
//! let mut cursor = map.find(&7);
//! cursor.move_next();
//! assert_eq!(cursor.key(), Some(&8));
//! ```

#![forbid(unsafe_code)]

mod bst;
mod compare;
mod cursor;
mod error;
mod map;
mod raw;

pub use bst::BstMap;
pub use compare::{Compare, Natural};
pub use cursor::{Cursor, Iter, NodeRef};
pub use error::{Error, Result};
pub use map::AvlTreeMap;

#[cfg(test)]
mod tests;
