use std::cmp::{self, Ordering};
use std::collections::VecDeque;
use std::mem;

use log::{debug, trace};

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Dir, Link, Node};
use crate::compare::Compare;

/// Outcome of [`RawTree::insert_positional`].
pub(crate) enum Placement<V> {
    /// A new leaf was attached.
    Created(Handle),
    /// The key was present; its value was replaced and the old one is returned.
    Overwritten(V),
}

/// A node taken out of the tree by [`RawTree::remove_structural`].
pub(crate) struct Removed<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    /// The parent the node was detached from and the side it hung on.
    pub(crate) slot: Option<(Handle, Dir)>,
}

/// The unbalanced binary search tree engine.
///
/// Owns every node through its arena. Placement and lookup take the
/// comparator as an argument; navigation only follows links.
#[derive(Clone)]
pub(crate) struct RawTree<K, V> {
    nodes: Arena<Node<K, V>>,
    root: Link,
    num_nodes: usize,
}

#[allow(clippy::enum_variant_names)]
enum Direction {
    FromParent,
    FromLeft,
    FromRight,
}

impl<K, V> RawTree<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            num_nodes: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.num_nodes
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub(crate) fn root(&self) -> Link {
        self.root
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<K, V> {
        self.nodes.get(handle)
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut Node<K, V> {
        self.nodes.get_mut(handle)
    }

    pub(crate) fn node_pair_mut(
        &mut self,
        a: Handle,
        b: Handle,
    ) -> (&mut Node<K, V>, &mut Node<K, V>) {
        self.nodes.get_pair_mut(a, b)
    }

    pub(crate) fn find<C: Compare<K>>(&self, key: &K, cmp: &C) -> Link {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.node(handle);
            current = match cmp.compare(key, &node.key) {
                Ordering::Equal => break,
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        current
    }

    /// Descends to the key's position. Overwrites the value of an equal key,
    /// otherwise attaches a new leaf. Never rebalances.
    pub(crate) fn insert_positional<C: Compare<K>>(
        &mut self,
        key: K,
        value: V,
        cmp: &C,
    ) -> Placement<V> {
        let mut slot: Option<(Handle, Dir)> = None;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get_mut(handle);
            let dir = match cmp.compare(&key, &node.key) {
                Ordering::Equal => {
                    return Placement::Overwritten(mem::replace(&mut node.value, value));
                }
                Ordering::Less => Dir::Left,
                Ordering::Greater => Dir::Right,
            };
            slot = Some((handle, dir));
            current = node.child(dir);
        }

        let handle = self.nodes.alloc(Node::new(slot.map(|(parent, _)| parent), key, value));
        self.replace_child_or_set_root(slot, Some(handle));
        self.num_nodes += 1;
        Placement::Created(handle)
    }

    /// Returns the parent of `handle` and the side `handle` hangs on.
    pub(crate) fn parent_slot(&self, handle: Handle) -> Option<(Handle, Dir)> {
        let parent = self.node(handle).parent?;
        let parent_node = self.node(parent);
        if parent_node.left == Some(handle) {
            Some((parent, Dir::Left))
        } else {
            assert_eq!(parent_node.right, Some(handle), "parent does not link back to child");
            Some((parent, Dir::Right))
        }
    }

    /// Points the parent's child link (or the root) at `child`.
    /// The child's own parent link is left to the caller.
    #[inline]
    pub(crate) fn replace_child_or_set_root(&mut self, slot: Option<(Handle, Dir)>, child: Link) {
        match slot {
            Some((parent, dir)) => self.node_mut(parent).set_child(dir, child),
            None => self.root = child,
        }
    }

    pub(crate) fn first(&self) -> Link {
        self.root.map(|root| self.outermost(root, Dir::Left))
    }

    pub(crate) fn last(&self) -> Link {
        self.root.map(|root| self.outermost(root, Dir::Right))
    }

    pub(crate) fn predecessor(&self, handle: Handle) -> Link {
        self.step(handle, Dir::Left)
    }

    pub(crate) fn successor(&self, handle: Handle) -> Link {
        self.step(handle, Dir::Right)
    }

    fn outermost(&self, mut handle: Handle, dir: Dir) -> Handle {
        while let Some(child) = self.node(handle).child(dir) {
            handle = child;
        }
        handle
    }

    // In-order neighbour of `handle` towards `dir`: the innermost node of the
    // subtree on that side, or else the first ancestor reached from `!dir`.
    fn step(&self, handle: Handle, dir: Dir) -> Link {
        if let Some(child) = self.node(handle).child(dir) {
            return Some(self.outermost(child, !dir));
        }
        let mut current = handle;
        while let Some((parent, side)) = self.parent_slot(current) {
            if side == !dir {
                return Some(parent);
            }
            current = parent;
        }
        None
    }

    /// Removes `handle` from the tree and frees its slot.
    ///
    /// A node with two children first trades places with its predecessor,
    /// which leaves it with at most a left child.
    pub(crate) fn remove_structural(&mut self, handle: Handle) -> Removed<K, V> {
        if self.node(handle).has_two_children() {
            let pred = self
                .predecessor(handle)
                .expect("node with a left subtree has a predecessor");
            trace!("swapping {:?} with predecessor {:?}", handle, pred);
            self.node_swap(handle, pred);
        }
        self.splice(handle)
    }

    // Unlinks a node with at most one child, promoting that child.
    fn splice(&mut self, handle: Handle) -> Removed<K, V> {
        let node = self.node(handle);
        debug_assert!(!node.has_two_children(), "spliced node has two children");
        let child = node.left.or(node.right);
        let slot = self.parent_slot(handle);

        if let Some(child) = child {
            self.node_mut(child).parent = slot.map(|(parent, _)| parent);
        }
        self.replace_child_or_set_root(slot, child);

        let node = self.nodes.take(handle);
        self.num_nodes -= 1;
        debug_assert_eq!(self.nodes.len(), self.num_nodes);
        Removed {
            key: node.key,
            value: node.value,
            slot,
        }
    }

    /// Exchanges the structural positions of `a` and `b`.
    ///
    /// Keys, values and balances stay with their nodes. Works when one node
    /// is the direct parent of the other.
    pub(crate) fn node_swap(&mut self, a: Handle, b: Handle) {
        if a == b {
            return;
        }

        let (a_parent, a_left, a_right) = self.links(a);
        let (b_parent, b_left, b_right) = self.links(b);
        let a_slot = self.parent_slot(a);
        let b_slot = self.parent_slot(b);

        // A link to one of the pair becomes a link to the other.
        let exchange = |link: Link| match link {
            Some(handle) if handle == a => Some(b),
            Some(handle) if handle == b => Some(a),
            other => other,
        };

        // Neighbours outside the pair.
        if let Some((parent, dir)) = a_slot.filter(|&(parent, _)| parent != b) {
            self.node_mut(parent).set_child(dir, Some(b));
        }
        if let Some((parent, dir)) = b_slot.filter(|&(parent, _)| parent != a) {
            self.node_mut(parent).set_child(dir, Some(a));
        }
        for child in [a_left, a_right].into_iter().flatten().filter(|&child| child != b) {
            self.node_mut(child).parent = Some(b);
        }
        for child in [b_left, b_right].into_iter().flatten().filter(|&child| child != a) {
            self.node_mut(child).parent = Some(a);
        }

        let node = self.node_mut(a);
        node.parent = exchange(b_parent);
        node.left = exchange(b_left);
        node.right = exchange(b_right);

        let node = self.node_mut(b);
        node.parent = exchange(a_parent);
        node.left = exchange(a_left);
        node.right = exchange(a_right);

        if self.root == Some(a) {
            self.root = Some(b);
        } else if self.root == Some(b) {
            self.root = Some(a);
        }
    }

    fn links(&self, handle: Handle) -> (Link, Link, Link) {
        let node = self.node(handle);
        (node.parent, node.left, node.right)
    }

    /// Destroys all nodes, children before parents.
    pub(crate) fn clear(&mut self) {
        if self.num_nodes > 0 {
            debug!("clearing tree with {} nodes", self.num_nodes);
        }
        let mut order = Vec::with_capacity(self.num_nodes);
        self.postorder(|handle| order.push(handle));
        for handle in order {
            drop(self.nodes.take(handle));
        }
        self.nodes.clear();
        self.root = None;
        self.num_nodes = 0;
    }

    /// Height in levels of the subtree at `start`, recomputed from scratch.
    /// An empty subtree has height 0, a leaf height 1.
    pub(crate) fn height_diagnostic(&self, start: Link) -> usize {
        match start {
            None => 0,
            Some(start) => self.subtree_heights(start)[start.to_index()],
        }
    }

    /// Whether every node's subtrees differ in height by at most one,
    /// recomputed from scratch without looking at stored balances.
    pub(crate) fn is_balanced_diagnostic(&self) -> bool {
        let Some(root) = self.root else {
            return true;
        };
        let heights = self.subtree_heights(root);
        let height_of = |link: Link| link.map_or(0, |handle| heights[handle.to_index()]);

        let mut balanced = true;
        self.postorder(|handle| {
            let node = self.node(handle);
            if height_of(node.left).abs_diff(height_of(node.right)) > 1 {
                balanced = false;
            }
        });
        balanced
    }

    /// Whether all leaves sit at the same depth.
    pub(crate) fn equal_paths(&self) -> bool {
        let Some(root) = self.root else {
            return true;
        };
        let mut leaf_depth = None;
        let mut stack = vec![(root, 0usize)];
        while let Some((handle, depth)) = stack.pop() {
            let node = self.node(handle);
            if node.is_leaf() {
                match leaf_depth {
                    None => leaf_depth = Some(depth),
                    Some(expected) if expected != depth => return false,
                    Some(_) => {}
                }
            }
            stack.extend(node.left.map(|left| (left, depth + 1)));
            stack.extend(node.right.map(|right| (right, depth + 1)));
        }
        true
    }

    pub(crate) fn traverse_level_order<F: FnMut(&K, &V)>(&self, mut f: F) {
        let mut queue: VecDeque<Handle> = self.root.into_iter().collect();
        while let Some(handle) = queue.pop_front() {
            let node = self.node(handle);
            f(&node.key, &node.value);
            queue.extend(node.left);
            queue.extend(node.right);
        }
    }

    // Heights of every node below `start`, indexed by handle.
    fn subtree_heights(&self, start: Handle) -> Vec<usize> {
        let mut heights = vec![0; self.nodes.slot_count()];
        self.traverse(start, |_| {}, |_| {}, |handle| {
            let node = self.node(handle);
            let left = node.left.map_or(0, |left| heights[left.to_index()]);
            let right = node.right.map_or(0, |right| heights[right.to_index()]);
            heights[handle.to_index()] = 1 + cmp::max(left, right);
        });
        heights
    }

    /// Asserts link consistency, strict key order and the node count.
    /// Returns the recomputed height of every node, indexed by handle.
    #[cfg(any(test, feature = "consistency_check"))]
    pub(crate) fn check_consistency<C: Compare<K>>(&self, cmp: &C) -> Vec<usize> {
        // Check root link
        if let Some(root) = self.root {
            assert!(self.node(root).parent.is_none(), "root has a parent");
        }

        let mut num_nodes = 0;
        let mut last_seen: Link = None;
        let mut check_links = |handle: Handle| {
            let node = self.node(handle);
            for child in [node.left, node.right].into_iter().flatten() {
                assert_eq!(self.node(child).parent, Some(handle), "child does not link back to parent");
            }
            num_nodes += 1;
        };
        let mut check_order = |handle: Handle| {
            if let Some(last) = last_seen {
                assert_eq!(
                    cmp.compare(&self.node(last).key, &self.node(handle).key),
                    Ordering::Less,
                    "keys are not strictly ascending in order"
                );
            }
            last_seen = Some(handle);
        };
        if let Some(root) = self.root {
            self.traverse(root, &mut check_links, &mut check_order, |_| {});
        }

        assert_eq!(num_nodes, self.num_nodes);
        assert_eq!(self.nodes.len(), self.num_nodes, "arena holds unreachable nodes");

        match self.root {
            None => Vec::new(),
            Some(root) => self.subtree_heights(root),
        }
    }

    pub(crate) fn postorder<F: FnMut(Handle)>(&self, f: F) {
        if let Some(root) = self.root {
            self.traverse(root, |_| {}, |_| {}, f);
        }
    }

    // Walks the subtree at `start` without recursion, calling each visitor
    // when a node is entered, after its left subtree and after its right one.
    fn traverse<Pre, In, Post>(&self, start: Handle, mut preorder: Pre, mut inorder: In, mut postorder: Post)
    where
        Pre: FnMut(Handle),
        In: FnMut(Handle),
        Post: FnMut(Handle),
    {
        let mut handle = start;
        let mut dir = Direction::FromParent;
        loop {
            match dir {
                Direction::FromParent => {
                    preorder(handle);
                    if let Some(left) = self.node(handle).left {
                        handle = left;
                    } else {
                        dir = Direction::FromLeft;
                    }
                }
                Direction::FromLeft => {
                    inorder(handle);
                    if let Some(right) = self.node(handle).right {
                        handle = right;
                        dir = Direction::FromParent;
                    } else {
                        dir = Direction::FromRight;
                    }
                }
                Direction::FromRight => {
                    postorder(handle);
                    if handle == start {
                        break;
                    }
                    let (parent, side) = self.parent_slot(handle).expect("non-root node has a parent");
                    dir = match side {
                        Dir::Left => Direction::FromLeft,
                        Dir::Right => Direction::FromRight,
                    };
                    handle = parent;
                }
            }
        }
    }
}
