//! An ordered map implemented with an AVL tree.

use std::cmp;
use std::fmt;
use std::mem;
use std::ops::Index;

use log::trace;

use crate::compare::{Compare, Natural};
use crate::cursor::{Cursor, Iter, NodeRef};
use crate::error::{Error, Result};
use crate::raw::{Dir, Handle, Placement, RawTree};

/// An ordered map implemented with an AVL tree.
///
/// Every node keeps `height(left) - height(right)` within `-1..=1`, so
/// lookup, insertion and removal are O(log n).
///
/// ```
/// use avl_bst::AvlTreeMap;
/// let mut map = AvlTreeMap::new();
/// map.insert(0, "zero");
/// map.insert(1, "one");
/// map.insert(2, "two");
/// assert_eq!(map.get(&1), Some(&"one"));
/// map.remove(&1);
/// assert!(map.get(&1).is_none());
/// assert!(map.is_balanced());
/// ```
#[derive(Clone)]
pub struct AvlTreeMap<K, V, C = Natural> {
    raw: RawTree<K, V>,
    cmp: C,
}

impl<K: Ord, V> AvlTreeMap<K, V> {
    /// Creates an empty map ordered by `K`'s own [`Ord`].
    /// No memory is allocated until the first item is inserted.
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<K, V, C: Compare<K>> AvlTreeMap<K, V, C> {
    /// Creates an empty map ordered by `cmp`.
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            raw: RawTree::new(),
            cmp,
        }
    }

    /// Returns a reference to the value corresponding to the key.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.raw.find(key, &self.cmp).map(|node| &self.raw.node(node).value)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let node = self.raw.find(key, &self.cmp)?;
        Some(&mut self.raw.node_mut(node).value)
    }

    /// Returns references to the key-value pair corresponding to the key.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.raw.find(key, &self.cmp).map(|node| {
            let node = self.raw.node(node);
            (&node.key, &node.value)
        })
    }

    /// Returns true if the map contains a value for the key.
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

    /// Returns a cursor at the key, or [`end`](Self::end) if it is absent.
    pub fn find(&self, key: &K) -> Cursor<'_, K, V> {
        Cursor::new(&self.raw, self.raw.find(key, &self.cmp))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the key was present its value is overwritten and the old value is
    /// returned; the shape of the tree does not change.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.raw.insert_positional(key, value, &self.cmp) {
            Placement::Overwritten(old) => Some(old),
            Placement::Created(leaf) => {
                self.rebalance_after_insert(leaf);
                None
            }
        }
    }

    /// Removes a key from the map.
    /// Returns the value at the key if the key was previously in the map.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the map.
    /// Returns the stored key and value if the key was previously in the map.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let node = self.raw.find(key, &self.cmp)?;
        Some(self.remove_node(node))
    }

    /// Asserts that the internal tree structure is consistent.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        let heights = self.raw.check_consistency(&self.cmp);
        let height_of = |link: Option<Handle>| link.map_or(0, |node| heights[node.to_index()] as isize);

        self.raw.postorder(|handle| {
            let node = self.raw.node(handle);
            // Check stored balance against recomputed heights
            assert_eq!(
                node.balance as isize,
                height_of(node.left) - height_of(node.right),
                "stored balance is stale"
            );
            // Check AVL condition (nearly balance)
            assert!((-1..=1).contains(&node.balance), "node is out of balance");
        });

        assert_eq!(self.height(), self.raw.height_diagnostic(self.raw.root()));
    }
}

impl<K, V, C> AvlTreeMap<K, V, C> {
    /// Returns true if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns the number of levels in the tree; 0 for an empty map.
    ///
    /// Follows the taller side at each node, so this is O(log n).
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut current = self.raw.root();
        while let Some(handle) = current {
            let node = self.raw.node(handle);
            height += 1;
            current = if node.balance >= 0 { node.left } else { node.right };
        }
        height
    }

    /// Clears the map, deallocating all memory.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns a cursor at the smallest key, or at the end if the map is empty.
    pub fn begin(&self) -> Cursor<'_, K, V> {
        Cursor::new(&self.raw, self.raw.first())
    }

    /// Returns the end cursor.
    pub fn end(&self) -> Cursor<'_, K, V> {
        Cursor::new(&self.raw, None)
    }

    /// Returns the entry with the smallest key.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.begin().get().ok()
    }

    /// Returns the entry with the largest key.
    pub fn last(&self) -> Option<(&K, &V)> {
        Cursor::new(&self.raw, self.raw.last()).get().ok()
    }

    /// Gets an iterator over the entries of the map in sorted order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.raw)
    }

    /// Gets an iterator over the keys of the map in sorted order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator {
        self.iter().map(|(key, _)| key)
    }

    /// Gets an iterator over the values of the map in key order.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator {
        self.iter().map(|(_, value)| value)
    }

    /// Returns a read-only view of the root node.
    pub fn root(&self) -> Option<NodeRef<'_, K, V>> {
        self.raw.root().map(|root| NodeRef::new(&self.raw, root))
    }

    /// Visits all entries level by level, from the root down.
    pub fn traverse_level_order<F: FnMut(&K, &V)>(&self, f: F) {
        self.raw.traverse_level_order(f);
    }

    /// Recomputes every subtree height and checks the AVL condition,
    /// without trusting the stored balances.
    pub fn is_balanced(&self) -> bool {
        self.raw.is_balanced_diagnostic()
    }

    /// Returns true if all leaves are at the same depth.
    pub fn equal_paths(&self) -> bool {
        self.raw.equal_paths()
    }

    fn remove_node(&mut self, node: Handle) -> (K, V) {
        if self.raw.node(node).has_two_children() {
            let pred = self
                .raw
                .predecessor(node)
                .expect("node with a left subtree has a predecessor");
            self.swap_nodes(node, pred);
        }
        // At most one child left, so this is a plain splice.
        let removed = self.raw.remove_structural(node);
        if let Some((parent, dir)) = removed.slot {
            self.rebalance_after_remove(parent, dir);
        }
        (removed.key, removed.value)
    }

    // Exchanges tree positions together with balances, so that each position
    // keeps the balance that describes it.
    fn swap_nodes(&mut self, a: Handle, b: Handle) {
        trace!("swapping {:?} with predecessor {:?}", a, b);
        self.raw.node_swap(a, b);
        let (a, b) = self.raw.node_pair_mut(a, b);
        mem::swap(&mut a.balance, &mut b.balance);
    }

    fn adjust_balance(&mut self, node: Handle, delta: i8) -> i8 {
        let node = self.raw.node_mut(node);
        node.balance += delta;
        node.balance
    }

    /// Retraces from a freshly attached leaf towards the root.
    ///
    /// Stops at the first ancestor whose height did not change, or right after
    /// the first (single or double) rotation, which restores the height the
    /// subtree had before the insert.
    fn rebalance_after_insert(&mut self, leaf: Handle) {
        let mut child = leaf;
        while let Some((parent, dir)) = self.raw.parent_slot(child) {
            match self.adjust_balance(parent, dir.weight()) {
                0 => break,
                -1 | 1 => child = parent,
                _ => {
                    self.rebalance_node(parent);
                    break;
                }
            }
        }
    }

    /// Retraces after the subtree on `dir` side of `parent` lost a level.
    ///
    /// A rotation does not end the walk: the rotated subtree may still be one
    /// level shorter, and then its parent needs the same treatment. The walk
    /// ends at the root or at the first subtree whose height is unchanged.
    fn rebalance_after_remove(&mut self, parent: Handle, dir: Dir) {
        let mut slot = Some((parent, dir));
        while let Some((node, dir)) = slot {
            let subtree = match self.adjust_balance(node, -dir.weight()) {
                -1 | 1 => break,
                0 => node,
                _ => {
                    let subtree = self.rebalance_node(node);
                    if self.raw.node(subtree).balance != 0 {
                        break;
                    }
                    subtree
                }
            };
            slot = self.raw.parent_slot(subtree);
        }
    }

    /// Restores the AVL condition at `node` if its balance is +2 or -2.
    /// Returns the root of the subtree that `node` used to root.
    fn rebalance_node(&mut self, node: Handle) -> Handle {
        let balance = self.raw.node(node).balance;
        debug_assert!((-2..=2).contains(&balance), "balance {} out of range", balance);
        if balance > 1 {
            let left = self.raw.node(node).left.expect("left-heavy node has a left child");
            if self.raw.node(left).balance < 0 {
                // Left-Right
                self.rotate_left(left);
            }
            self.rotate_right(node)
        } else if balance < -1 {
            let right = self.raw.node(node).right.expect("right-heavy node has a right child");
            if self.raw.node(right).balance > 0 {
                // Right-Left
                self.rotate_right(right);
            }
            self.rotate_left(node)
        } else {
            node
        }
    }

    /// Promotes the right child of `node` into its place and returns it.
    fn rotate_left(&mut self, node: Handle) -> Handle {
        let right = self.raw.node(node).right.expect("rotate_left requires a right child");
        trace!("rotate left at {:?}", node);
        let slot = self.raw.parent_slot(node);
        let inner = self.raw.node(right).left;

        self.raw.node_mut(node).right = inner;
        if let Some(inner) = inner {
            self.raw.node_mut(inner).parent = Some(node);
        }

        self.raw.node_mut(right).parent = slot.map(|(parent, _)| parent);
        self.raw.replace_child_or_set_root(slot, Some(right));

        self.raw.node_mut(right).left = Some(node);
        self.raw.node_mut(node).parent = Some(right);

        let (node, promoted) = self.raw.node_pair_mut(node, right);
        node.balance = node.balance + 1 - cmp::min(promoted.balance, 0);
        promoted.balance = promoted.balance + 1 + cmp::max(node.balance, 0);
        right
    }

    /// Promotes the left child of `node` into its place and returns it.
    fn rotate_right(&mut self, node: Handle) -> Handle {
        let left = self.raw.node(node).left.expect("rotate_right requires a left child");
        trace!("rotate right at {:?}", node);
        let slot = self.raw.parent_slot(node);
        let inner = self.raw.node(left).right;

        self.raw.node_mut(node).left = inner;
        if let Some(inner) = inner {
            self.raw.node_mut(inner).parent = Some(node);
        }

        self.raw.node_mut(left).parent = slot.map(|(parent, _)| parent);
        self.raw.replace_child_or_set_root(slot, Some(left));

        self.raw.node_mut(left).right = Some(node);
        self.raw.node_mut(node).parent = Some(left);

        let (node, promoted) = self.raw.node_pair_mut(node, left);
        node.balance = node.balance - 1 - cmp::max(promoted.balance, 0);
        promoted.balance = promoted.balance - 1 + cmp::min(node.balance, 0);
        left
    }
}

impl<K: Ord, V> Default for AvlTreeMap<K, V> {
    /// Creates an empty map.
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C: Compare<K>> Index<&K> for AvlTreeMap<K, V, C> {
    type Output = V;

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the map. Use [`AvlTreeMap::at`]
    /// for a fallible lookup.
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for AvlTreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, C: Compare<K>> Extend<(K, V)> for AvlTreeMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a AvlTreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for AvlTreeMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
