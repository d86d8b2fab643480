use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::{AvlTreeMap, BstMap, Error};

const N: i32 = 1_000;

fn keys<C>(map: &AvlTreeMap<i32, i32, C>) -> Vec<i32> {
    map.keys().copied().collect()
}

#[test]
fn test_new() {
    let map_i32 = AvlTreeMap::<i32, ()>::new();
    assert!(map_i32.is_empty());
    map_i32.check_consistency();

    let map_i8 = AvlTreeMap::<i8, ()>::new();
    assert!(map_i8.is_empty());
    map_i8.check_consistency();

    let map_string = AvlTreeMap::<String, String>::new();
    assert!(map_string.is_empty());
    map_string.check_consistency();
}

#[test]
fn test_rebalance() {
    {
        //     3 ->   2
        //    /      / \
        //   2      1   3
        //  /
        // 1
        let mut map = AvlTreeMap::new();
        map.insert(3, ());
        map.insert(2, ());
        map.insert(1, ());
        map.check_consistency();
        assert_eq!(map.height(), 2);
        assert_eq!(map.root().map(|root| *root.key()), Some(2));
    }
    {
        //     3   ->     3 ->   2
        //    / \        /      / \
        //   2   4      2      1   3
        //  /          /
        // 1          1
        let mut map = AvlTreeMap::new();
        map.insert(3, ());
        map.insert(2, ());
        map.insert(4, ());
        map.insert(1, ());
        map.check_consistency();
        assert_eq!(map.height(), 3);
        map.remove(&4);
        map.check_consistency();
        assert_eq!(map.height(), 2);
    }
    {
        //   3  ->   2
        //  /       / \
        // 1       1   3
        //  \
        //   2
        let mut map = AvlTreeMap::new();
        map.insert(3, ());
        map.insert(1, ());
        map.insert(2, ());
        map.check_consistency();
        assert_eq!(map.height(), 2);
        assert_eq!(map.root().map(|root| *root.key()), Some(2));
    }
    {
        //   3   ->   3  ->   2
        //  / \      /       / \
        // 1   4    1       1   3
        //  \        \
        //   2        2
        let mut map = AvlTreeMap::new();
        map.insert(3, ());
        map.insert(1, ());
        map.insert(4, ());
        map.insert(2, ());
        map.check_consistency();
        assert_eq!(map.height(), 3);
        map.remove(&4);
        map.check_consistency();
        assert_eq!(map.height(), 2);
    }
    {
        // 1 ->    2
        //  \     / \
        //   2   1   3
        //    \
        //     3
        let mut map = AvlTreeMap::new();
        map.insert(1, ());
        map.insert(2, ());
        map.insert(3, ());
        map.check_consistency();
        assert_eq!(map.height(), 2);
    }
    {
        //   1     -> 1     ->    2
        //  / \        \         / \
        // 0   2        2       1   3
        //      \        \
        //       3        3
        let mut map = AvlTreeMap::new();
        map.insert(1, ());
        map.insert(0, ());
        map.insert(2, ());
        map.insert(3, ());
        map.check_consistency();
        assert_eq!(map.height(), 3);
        map.remove(&0);
        map.check_consistency();
        assert_eq!(map.height(), 2);
    }
    {
        // 1   ->  2
        //  \     / \
        //   3   1   3
        //  /
        // 2
        let mut map = AvlTreeMap::new();
        map.insert(1, ());
        map.insert(3, ());
        map.insert(2, ());
        map.check_consistency();
        assert_eq!(map.height(), 2);
    }
    {
        //   1   ->  1   ->  2
        //  / \       \     / \
        // 0   3       3   1   3
        //    /       /
        //   2       2
        let mut map = AvlTreeMap::new();
        map.insert(1, ());
        map.insert(0, ());
        map.insert(3, ());
        map.insert(2, ());
        map.check_consistency();
        assert_eq!(map.height(), 3);
        map.remove(&0);
        map.check_consistency();
        assert_eq!(map.height(), 2);
    }
}

#[test]
fn test_remove_rotates_at_several_levels() {
    // A minimal (Fibonacci) AVL tree of height 5: removing its shallowest
    // leaf forces a rotation at more than one ancestor.
    let mut map = AvlTreeMap::new();
    for key in [8, 5, 11, 3, 7, 10, 12, 2, 4, 6, 9, 1] {
        map.insert(key, ());
        map.check_consistency();
    }
    assert_eq!(map.height(), 5);
    map.remove(&12);
    map.check_consistency();
    assert!(map.is_balanced());
    assert_eq!(map.height(), 4);
    assert_eq!(map.len(), 11);
}

#[test]
fn test_insert() {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let mut values: Vec<i32> = (0..N).map(|_| rng.gen()).collect();
    values.sort();
    values.dedup();

    let mut map = AvlTreeMap::new();
    for value in &values {
        assert_eq!(map.insert(*value, *value), None);
        map.check_consistency();
    }
    assert!(map.len() == values.len());

    for value in &values {
        assert_eq!(map.insert(*value, value.wrapping_add(1)), Some(*value));
    }
    assert!(map.len() == values.len());
    map.check_consistency();
}

#[test]
fn test_insert_sorted_range() {
    let mut map = AvlTreeMap::new();
    for value in 0..N {
        assert!(map.insert(value, value).is_none());
        map.check_consistency();
    }
    assert!(map.len() == N as usize);
    assert!(map.height() > 0);
    // 1.44 * log2(n) bounds any AVL tree
    assert!(map.height() <= 15);
    assert!(map.get(&-42).is_none());
}

#[test]
fn test_insert_shuffled_range() {
    use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

    let mut values: Vec<i32> = (0..N).collect();
    let mut rng = StdRng::seed_from_u64(0);
    values.shuffle(&mut rng);

    let mut map = AvlTreeMap::new();
    for value in &values {
        assert!(map.insert(*value, "foo").is_none());
        map.check_consistency();
    }
    assert!(map.len() == values.len());

    for value in &values {
        assert_eq!(map.insert(*value, "bar"), Some("foo"));
    }
    assert!(map.len() == values.len());
    assert!(map.get(&-42).is_none());
}

#[test]
fn test_overwrite_keeps_shape() {
    let mut map: AvlTreeMap<_, _> = (0..31).map(|key| (key, 0)).collect();
    let mut before = Vec::new();
    map.traverse_level_order(|key, _| before.push(*key));

    map.insert(17, 1);
    let mut after = Vec::new();
    map.traverse_level_order(|key, _| after.push(*key));

    assert_eq!(before, after);
    assert_eq!(map[&17], 1);
    assert_eq!(map.len(), 31);
}

#[test]
fn test_get() {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let values: Vec<i32> = (0..N).map(|_| rng.gen()).collect();

    let mut map = AvlTreeMap::new();
    assert!(map.get(&42).is_none());
    for value in &values {
        map.insert(*value, value.wrapping_add(1));
    }

    for value in &values {
        let got = map.get(value);
        assert_eq!(got, Some(&value.wrapping_add(1)));
        let got = map.get_key_value(value);
        assert_eq!(got, Some((value, &(value.wrapping_add(1)))));
        assert_eq!(map.at(value), Ok(&value.wrapping_add(1)));
        assert_eq!(map.find(value).key(), Some(value));
    }
}

#[test]
fn test_at() {
    let mut map = AvlTreeMap::new();
    assert_eq!(map.at(&1), Err(Error::KeyNotFound));
    map.insert(1, String::from("one"));
    map.at_mut(&1).unwrap().push('!');
    assert_eq!(map.at(&1).map(String::as_str), Ok("one!"));
    assert_eq!(map.at_mut(&2), Err(Error::KeyNotFound));
    assert_eq!(Error::KeyNotFound.to_string(), "key not found");
}

#[test]
#[should_panic(expected = "no entry found for key")]
fn test_index_panics_on_missing_key() {
    let map: AvlTreeMap<i32, i32> = AvlTreeMap::new();
    let _value = map[&7];
}

#[test]
fn test_clear() {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let mut values: Vec<i32> = (0..N).map(|_| rng.gen()).collect();
    values.sort();
    values.dedup();

    let mut map = AvlTreeMap::new();
    for value in &values {
        map.insert(*value, String::from("foo"));
    }
    assert!(!map.is_empty());
    assert!(map.len() == values.len());

    map.clear();
    assert!(map.is_empty());
    assert!(map.len() == 0);
    map.clear();
    assert!(map.is_empty());

    for value in &values {
        assert!(map.insert(*value, String::from("bar")).is_none());
    }
    assert!(!map.is_empty());
    assert!(map.len() == values.len());
    map.check_consistency();
}

#[test]
fn test_remove() {
    use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let mut values: Vec<i32> = (0..N).map(|_| rng.gen()).collect();
    values.sort();
    values.dedup();

    let mut map = AvlTreeMap::new();
    for value in &values {
        map.insert(*value, 42);
    }

    values.shuffle(&mut rng);
    for value in &values {
        assert!(map.get(value).is_some());
        assert_eq!(map.remove(value), Some(42));
        assert!(map.get(value).is_none());
        assert!(map.find(value).is_end());
        map.check_consistency();
    }
    assert!(map.is_empty());
    assert!(map.len() == 0);
}

#[test]
fn test_remove_entry_returns_stored_key() {
    let mut map = AvlTreeMap::with_comparator(|a: &String, b: &String| {
        a.to_lowercase().cmp(&b.to_lowercase())
    });
    map.insert(String::from("Alpha"), 1);
    assert_eq!(map.remove_entry(&String::from("ALPHA")), Some((String::from("Alpha"), 1)));
    assert!(map.is_empty());
}

#[test]
fn test_map_iter() {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let mut values: Vec<i32> = (0..N).map(|_| rng.gen()).collect();

    let mut map = AvlTreeMap::new();
    for value in &values {
        map.insert(*value, value.wrapping_add(42));
    }

    values.sort();
    values.dedup();

    let mut map_iter = map.iter();
    for value in &values {
        let kv = map_iter.next();
        assert!(kv.is_some());
        let (&key, &mapped) = kv.unwrap();
        assert_eq!(key, *value);
        assert_eq!(mapped, value.wrapping_add(42));
    }
    assert!(map_iter.next().is_none());

    let mut value_iter = values.iter();
    for (&key, &mapped) in &map {
        let value = value_iter.next();
        assert!(value.is_some());
        let value = value.unwrap();
        assert_eq!(key, *value);
        assert_eq!(mapped, value.wrapping_add(42));
    }
    assert!(value_iter.next().is_none());

    let reversed: Vec<i32> = map.keys().rev().copied().collect();
    assert_eq!(reversed, values.iter().rev().copied().collect::<Vec<_>>());

    let mut cursor = map.begin();
    for value in &values {
        assert_eq!(cursor.get().map(|(k, _)| *k), Ok(*value));
        cursor.move_next();
    }
    assert_eq!(cursor, map.end());
}

#[test]
fn test_predecessor_inverts_successor() {
    let map: AvlTreeMap<_, _> = (0..200).map(|key| (key * 3, ())).collect();
    let mut cursor = map.begin();
    let mut back = map.begin();
    back.move_prev();
    assert!(back.is_end());

    while !cursor.is_end() {
        let mut next = cursor;
        next.move_next();
        if !next.is_end() {
            let mut round_trip = next;
            round_trip.move_prev();
            assert_eq!(round_trip, cursor);
        }
        cursor = next;
    }

    let mut last = map.find(&597);
    last.move_next();
    assert!(last.is_end());
}

#[test]
fn test_custom_comparator() {
    let mut map = AvlTreeMap::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    for key in 0..100 {
        map.insert(key, ());
    }
    map.check_consistency();
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), (0..100).rev().collect::<Vec<_>>());
}

#[test]
fn test_debug_and_clone() {
    let map: AvlTreeMap<_, _> = [(2, 'b'), (1, 'a')].into_iter().collect();
    assert_eq!(format!("{:?}", map), "{1: 'a', 2: 'b'}");
    let mut copy = map.clone();
    copy.insert(3, 'c');
    copy.check_consistency();
    assert_eq!(map.len(), 2);
    assert_eq!(copy.len(), 3);
    assert_eq!(format!("{:?}", map.iter()), "[1, 2]");
}

#[test]
fn test_equal_paths() {
    let full: AvlTreeMap<_, _> = (1..=7).map(|key| (key, ())).collect();
    assert!(full.equal_paths());
    let mut ragged = full.clone();
    ragged.insert(8, ());
    assert!(!ragged.equal_paths());
    assert!(AvlTreeMap::<i32, ()>::new().equal_paths());
}

#[test]
fn scenario_a_mixed_inserts() {
    let mut map = AvlTreeMap::new();
    for key in [5, 3, 8, 1, 4, 7, 9] {
        map.insert(key, key);
    }
    assert_eq!(keys(&map), vec![1, 3, 4, 5, 7, 8, 9]);
    assert!(map.is_balanced());
    map.check_consistency();
}

#[test]
fn scenario_b_ascending_inserts() {
    let mut map = AvlTreeMap::new();
    for key in 1..=7 {
        map.insert(key, key);
        assert!(map.is_balanced());
        map.check_consistency();
    }
    // ceil(log2(8)) == 3
    assert!(map.height() <= 3);

    let mut bst = BstMap::new();
    for key in 1..=7 {
        bst.insert(key, key);
    }
    assert_eq!(bst.height(), 7);
    assert!(!bst.is_balanced());
}

#[test]
fn scenario_c_remove_node_with_two_children() {
    let mut map = AvlTreeMap::new();
    for key in [10, 20, 30, 40, 50, 25] {
        map.insert(key, key);
        map.check_consistency();
    }
    //       30
    //      /  \
    //    20    40
    //   /  \     \
    //  10  25    50
    let root = map.root().unwrap();
    assert_eq!(*root.key(), 30);
    assert_eq!(root.left().map(|n| *n.key()), Some(20));

    map.remove(&30);
    map.check_consistency();
    assert!(map.is_balanced());

    let root = map.root().unwrap();
    assert_eq!(*root.key(), 25);
    assert_eq!(root.left().map(|n| *n.key()), Some(20));
    assert_eq!(root.right().map(|n| *n.key()), Some(40));
    assert_eq!(keys(&map), vec![10, 20, 25, 40, 50]);
}

#[test]
fn scenario_d_remove_missing_key() {
    let mut map: AvlTreeMap<i32, i32> = AvlTreeMap::new();
    assert_eq!(map.remove(&99), None);
    assert!(map.is_empty());

    for key in [2, 1, 3] {
        map.insert(key, key);
    }
    assert_eq!(map.remove(&99), None);
    assert_eq!(keys(&map), vec![1, 2, 3]);
    map.check_consistency();
}

#[test]
fn test_bst_map() {
    use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

    let mut values: Vec<i32> = (0..N).collect();
    let mut rng = StdRng::seed_from_u64(0);
    values.shuffle(&mut rng);

    let mut map = BstMap::new();
    for value in &values {
        assert!(map.insert(*value, *value).is_none());
    }
    map.check_consistency();
    assert_eq!(map.insert(values[0], -1), Some(values[0]));
    assert_eq!(map[&values[0]], -1);
    assert_eq!(map.at(&N), Err(Error::KeyNotFound));

    values.shuffle(&mut rng);
    for value in &values[..N as usize / 2] {
        assert!(map.remove(value).is_some());
        assert!(map.find(value).is_end());
        map.check_consistency();
    }
    assert_eq!(map.len(), N as usize / 2);

    let mut expected: Vec<i32> = values[N as usize / 2..].to_vec();
    expected.sort();
    assert_eq!(map.iter().map(|(k, _)| *k).collect::<Vec<_>>(), expected);

    map.clear();
    assert!(map.is_empty());
    assert!(map.begin().is_end());
}

#[test]
fn test_bst_map_deep_chain() {
    // Diagnostics must not recurse on a degenerate tree.
    let map: BstMap<_, _> = (0..10_000).map(|key| (key, ())).collect();
    assert_eq!(map.height(), 10_000);
    assert!(!map.is_balanced());
    assert!(map.equal_paths());
    assert_eq!(map.iter().count(), 10_000);
}

#[derive(Clone, Debug)]
enum Op {
    Insert(u16, u32),
    Remove(u16),
    Get(u16),
    Clear,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        10 => (0u16..512, any::<u32>()).prop_map(|(key, value)| Op::Insert(key, value)),
        6 => (0u16..512).prop_map(Op::Remove),
        3 => (0u16..512).prop_map(Op::Get),
        1 => Just(Op::Clear),
    ]
}

proptest! {
    #[test]
    fn btree_equivalence(ops in prop::collection::vec(op_strategy(), 0..400)) {
        let mut model = BTreeMap::new();
        let mut map = AvlTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    prop_assert_eq!(map.insert(key, value), model.insert(key, value));
                }
                Op::Remove(key) => {
                    prop_assert_eq!(map.remove(&key), model.remove(&key));
                    prop_assert!(map.find(&key).is_end());
                }
                Op::Get(key) => {
                    prop_assert_eq!(map.get(&key), model.get(&key));
                }
                Op::Clear => {
                    map.clear();
                    model.clear();
                }
            }
            map.check_consistency();
            prop_assert!(map.is_balanced());
            prop_assert_eq!(map.len(), model.len());
        }

        prop_assert!(map.iter().eq(model.iter()));
    }

    #[test]
    fn removing_everything_empties_the_map(
        keys in prop::collection::vec(any::<i16>(), 0..300),
        seed in any::<u64>(),
    ) {
        use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

        let mut map: AvlTreeMap<_, _> = keys.iter().map(|&key| (key, ())).collect();
        let mut order = keys.clone();
        order.shuffle(&mut StdRng::seed_from_u64(seed));
        for key in &order {
            map.remove(key);
            map.check_consistency();
        }
        prop_assert!(map.is_empty());
        prop_assert!(map.begin().is_end());
    }

    #[test]
    fn bst_map_matches_model(ops in prop::collection::vec(op_strategy(), 0..200)) {
        let mut model = BTreeMap::new();
        let mut map = BstMap::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    prop_assert_eq!(map.insert(key, value), model.insert(key, value));
                }
                Op::Remove(key) => {
                    prop_assert_eq!(map.remove(&key), model.remove(&key));
                }
                Op::Get(key) => {
                    prop_assert_eq!(map.get(&key), model.get(&key));
                }
                Op::Clear => {
                    map.clear();
                    model.clear();
                }
            }
            map.check_consistency();
        }

        prop_assert!(map.iter().eq(model.iter()));
    }
}
