//! Orderings over keys.

use std::cmp::Ordering;

/// A strict total order over `K`.
///
/// Every `Fn(&K, &K) -> Ordering` closure is a comparator:
///
/// ```
/// use avl_bst::AvlTreeMap;
///
/// let mut map = AvlTreeMap::with_comparator(|a: &i32, b: &i32| b.cmp(a));
/// map.insert(1, "one");
/// map.insert(2, "two");
/// assert_eq!(map.first(), Some((&2, &"two")));
/// ```
pub trait Compare<K: ?Sized> {
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// The key type's own [`Ord`] order. This is the default comparator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Natural;

impl<K: Ord + ?Sized> Compare<K> for Natural {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

impl<K: ?Sized, F> Compare<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}
