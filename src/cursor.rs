//! Positions in a tree and iteration over its entries.

use std::fmt;
use std::iter::FusedIterator;
use std::ptr;

use crate::error::{Error, Result};
use crate::raw::{Handle, RawTree};

/// A position in a map: either at an entry or at the end.
///
/// Obtained from `begin()`, `end()` or `find()`. Moving forward follows the
/// in-order successor, so a walk from `begin()` to `end()` visits every entry
/// once in ascending key order.
pub struct Cursor<'a, K, V> {
    tree: &'a RawTree<K, V>,
    current: Option<Handle>,
}

impl<'a, K, V> Cursor<'a, K, V> {
    pub(crate) fn new(tree: &'a RawTree<K, V>, current: Option<Handle>) -> Self {
        Self { tree, current }
    }

    /// Returns true if the cursor is past the last entry.
    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// Returns the entry under the cursor, or [`Error::InvalidState`] at the end.
    pub fn get(&self) -> Result<(&'a K, &'a V)> {
        let handle = self.current.ok_or(Error::InvalidState)?;
        let node = self.tree.node(handle);
        Ok((&node.key, &node.value))
    }

    pub fn key(&self) -> Option<&'a K> {
        self.current.map(|handle| &self.tree.node(handle).key)
    }

    pub fn value(&self) -> Option<&'a V> {
        self.current.map(|handle| &self.tree.node(handle).value)
    }

    /// Returns a read-only view of the node under the cursor.
    pub fn node(&self) -> Option<NodeRef<'a, K, V>> {
        self.current.map(|handle| NodeRef::new(self.tree, handle))
    }

    /// Advances to the next entry in key order. Stays at the end.
    pub fn move_next(&mut self) {
        self.current = self.current.and_then(|handle| self.tree.successor(handle));
    }

    /// Steps back to the previous entry in key order.
    /// Moving back from the first entry, or from the end, yields the end.
    pub fn move_prev(&mut self) {
        self.current = self.current.and_then(|handle| self.tree.predecessor(handle));
    }
}

// Auto derived clone seems to have an invalid type bound of K: Clone, V: Clone
impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Cursor<'_, K, V> {}

impl<K, V> PartialEq for Cursor<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.tree, other.tree) && self.current == other.current
    }
}

impl<K, V> Eq for Cursor<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Cursor<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.get() {
            Ok((key, value)) => f.debug_tuple("Cursor").field(key).field(value).finish(),
            Err(_) => f.write_str("Cursor(end)"),
        }
    }
}

/// Read-only view of a tree node: its entry, balance and links.
///
/// This is what a tree printer walks.
pub struct NodeRef<'a, K, V> {
    tree: &'a RawTree<K, V>,
    handle: Handle,
}

impl<'a, K, V> NodeRef<'a, K, V> {
    pub(crate) fn new(tree: &'a RawTree<K, V>, handle: Handle) -> Self {
        Self { tree, handle }
    }

    pub fn key(&self) -> &'a K {
        &self.tree.node(self.handle).key
    }

    pub fn value(&self) -> &'a V {
        &self.tree.node(self.handle).value
    }

    /// `height(left) - height(right)` as maintained by the AVL engine.
    /// Always zero in an unbalanced [`BstMap`](crate::BstMap).
    pub fn balance(&self) -> i8 {
        self.tree.node(self.handle).balance
    }

    pub fn left(&self) -> Option<NodeRef<'a, K, V>> {
        self.link(self.tree.node(self.handle).left)
    }

    pub fn right(&self) -> Option<NodeRef<'a, K, V>> {
        self.link(self.tree.node(self.handle).right)
    }

    pub fn parent(&self) -> Option<NodeRef<'a, K, V>> {
        self.link(self.tree.node(self.handle).parent)
    }

    fn link(&self, link: Option<Handle>) -> Option<NodeRef<'a, K, V>> {
        link.map(|handle| NodeRef::new(self.tree, handle))
    }
}

impl<K, V> Clone for NodeRef<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for NodeRef<'_, K, V> {}

impl<K, V> PartialEq for NodeRef<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.tree, other.tree) && self.handle == other.handle
    }
}

impl<K, V> Eq for NodeRef<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for NodeRef<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", self.key())
            .field("value", self.value())
            .field("balance", &self.balance())
            .finish()
    }
}

/// An iterator over the entries of a map in ascending key order.
pub struct Iter<'a, K, V> {
    tree: &'a RawTree<K, V>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(tree: &'a RawTree<K, V>) -> Self {
        Self {
            tree,
            front: tree.first(),
            back: tree.last(),
            remaining: tree.len(),
        }
    }

    pub(crate) fn fmt_keys(&self, f: &mut fmt::Formatter) -> fmt::Result
    where
        K: fmt::Debug,
    {
        f.debug_list().entries(self.clone().map(|(k, _)| k)).finish()
    }
}

// Auto derived clone seems to have an invalid type bound of K: Clone, V: Clone
impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug, V> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_keys(f)
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front?;
        self.remaining -= 1;
        self.front = self.tree.successor(handle);
        let node = self.tree.node(handle);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back?;
        self.remaining -= 1;
        self.back = self.tree.predecessor(handle);
        let node = self.tree.node(handle);
        Some((&node.key, &node.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}
