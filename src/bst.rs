//! An ordered map over an unbalanced binary search tree.

use std::fmt;
use std::ops::Index;

use crate::compare::{Compare, Natural};
use crate::cursor::{Cursor, Iter, NodeRef};
use crate::error::{Error, Result};
use crate::raw::{Placement, RawTree};

/// An ordered map over a plain binary search tree.
///
/// Shares the structural engine with [`AvlTreeMap`](crate::AvlTreeMap) but
/// never rotates, so its height depends on insertion order: ascending inserts
/// degrade it to a chain.
///
/// ```
/// use avl_bst::BstMap;
/// let mut map = BstMap::new();
/// for key in 1..=4 {
///     map.insert(key, key * key);
/// }
/// assert_eq!(map.at(&3), Ok(&9));
/// assert_eq!(map.height(), 4);
/// assert!(!map.is_balanced());
/// ```
#[derive(Clone)]
pub struct BstMap<K, V, C = Natural> {
    raw: RawTree<K, V>,
    cmp: C,
}

impl<K: Ord, V> BstMap<K, V> {
    /// Creates an empty map ordered by `K`'s own [`Ord`].
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<K, V, C: Compare<K>> BstMap<K, V, C> {
    /// Creates an empty map ordered by `cmp`.
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            raw: RawTree::new(),
            cmp,
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.raw.find(key, &self.cmp).map(|node| &self.raw.node(node).value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let node = self.raw.find(key, &self.cmp)?;
        Some(&mut self.raw.node_mut(node).value)
    }

    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.find(key).get().ok()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.raw.find(key, &self.cmp).is_some()
    }

    /// Returns the value for the key, or [`Error::KeyNotFound`].
    pub fn at(&self, key: &K) -> Result<&V> {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns the value for the key mutably, or [`Error::KeyNotFound`].
    pub fn at_mut(&mut self, key: &K) -> Result<&mut V> {
        self.get_mut(key).ok_or(Error::KeyNotFound)
    }

    pub fn find(&self, key: &K) -> Cursor<'_, K, V> {
        Cursor::new(&self.raw, self.raw.find(key, &self.cmp))
    }

    /// Inserts at the key's position, overwriting the value of an equal key.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.raw.insert_positional(key, value, &self.cmp) {
            Placement::Overwritten(old) => Some(old),
            Placement::Created(_) => None,
        }
    }

    /// Removes a key; a node with two children is replaced by its predecessor.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let node = self.raw.find(key, &self.cmp)?;
        let removed = self.raw.remove_structural(node);
        Some((removed.key, removed.value))
    }

    /// Asserts that the internal tree structure is consistent.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        self.raw.check_consistency(&self.cmp);
    }
}

impl<K, V, C> BstMap<K, V, C> {
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns the number of levels in the tree. Walks every node.
    pub fn height(&self) -> usize {
        self.raw.height_diagnostic(self.raw.root())
    }

    pub fn clear(&mut self) {
        self.raw.clear();
    }

    pub fn begin(&self) -> Cursor<'_, K, V> {
        Cursor::new(&self.raw, self.raw.first())
    }

    pub fn end(&self) -> Cursor<'_, K, V> {
        Cursor::new(&self.raw, None)
    }

    pub fn first(&self) -> Option<(&K, &V)> {
        self.begin().get().ok()
    }

    pub fn last(&self) -> Option<(&K, &V)> {
        Cursor::new(&self.raw, self.raw.last()).get().ok()
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.raw)
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator {
        self.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator {
        self.iter().map(|(_, value)| value)
    }

    pub fn traverse_level_order<F: FnMut(&K, &V)>(&self, f: F) {
        self.raw.traverse_level_order(f);
    }

    pub fn root(&self) -> Option<NodeRef<'_, K, V>> {
        self.raw.root().map(|root| NodeRef::new(&self.raw, root))
    }

    /// Returns true if no node's subtrees differ in height by more than one.
    pub fn is_balanced(&self) -> bool {
        self.raw.is_balanced_diagnostic()
    }

    pub fn equal_paths(&self) -> bool {
        self.raw.equal_paths()
    }
}

impl<K: Ord, V> Default for BstMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C: Compare<K>> Index<&K> for BstMap<K, V, C> {
    type Output = V;

    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for BstMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, C: Compare<K>> Extend<(K, V)> for BstMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a BstMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for BstMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
