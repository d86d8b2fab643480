use avl_bst::{AvlTreeMap, BstMap, Error};

fn main() {
    let mut map = AvlTreeMap::new();
    map.insert(0, "zero");
    map.insert(1, "one");
    map.insert(2, "two");
    map.insert(2, "two");
    map.insert(3, "three");
    map.insert(4, "four");
    map.insert(5, "five");
    assert_eq!(map.get(&1), Some(&"one"));
    map.remove(&1);
    assert!(map.get(&1).is_none());
    assert_eq!(map.at(&1), Err(Error::KeyNotFound));

    for (k, v) in &map {
        println!("{k} => {v}");
    }

    let mut cursor = map.find(&3);
    cursor.move_prev();
    println!("before 3: {:?}", cursor.get());

    let mut bst = BstMap::new();
    for x in 0..5 {
        bst.insert(x, ());
    }
    println!(
        "heights: avl {}, bst {}",
        map.height(),
        bst.height()
    );
}
