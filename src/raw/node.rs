use std::ops::Not;

use super::handle::Handle;

pub(crate) type Link = Option<Handle>;

/// Side of a parent a child hangs on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Dir {
    Left,
    Right,
}

impl Dir {
    /// Change in `height(left) - height(right)` of a parent whose child on
    /// this side grew by one level.
    #[inline]
    pub(crate) fn weight(self) -> i8 {
        match self {
            Dir::Left => 1,
            Dir::Right => -1,
        }
    }
}

impl Not for Dir {
    type Output = Dir;

    fn not(self) -> Self::Output {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

/// A tree node.
///
/// `left` and `right` are the structural edges; `parent` only points back.
/// `balance` is `height(left) - height(right)` and is maintained by the AVL
/// engine; the plain BST engine leaves it at zero.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) parent: Link,
    pub(crate) left: Link,
    pub(crate) right: Link,
    pub(crate) balance: i8,
}

impl<K, V> Node<K, V> {
    pub(crate) fn new(parent: Link, key: K, value: V) -> Self {
        Node {
            key,
            value,
            parent,
            left: None,
            right: None,
            balance: 0,
        }
    }

    #[inline]
    pub(crate) fn child(&self, dir: Dir) -> Link {
        match dir {
            Dir::Left => self.left,
            Dir::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, dir: Dir, child: Link) {
        match dir {
            Dir::Left => self.left = child,
            Dir::Right => self.right = child,
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub(crate) fn has_two_children(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }
}
