use std::fmt::Display;

use avl_bst::{AvlTreeMap, NodeRef};

fn print_node<K: Display, V>(node: NodeRef<'_, K, V>, prefix: &str, is_left: bool, out: &mut String) {
    if let Some(right) = node.right() {
        let extension = if is_left { "│   " } else { "    " };
        print_node(right, &format!("{prefix}{extension}"), false, out);
    }
    let branch = if node.parent().is_none() {
        "──"
    } else if is_left {
        "└──"
    } else {
        "┌──"
    };
    out.push_str(&format!("{prefix}{branch} {} ({:+})\n", node.key(), node.balance()));
    if let Some(left) = node.left() {
        let extension = if is_left { "    " } else { "│   " };
        print_node(left, &format!("{prefix}{extension}"), true, out);
    }
}

fn print_tree<K: Display, V>(map: &AvlTreeMap<K, V>) {
    let mut out = String::new();
    if let Some(root) = map.root() {
        print_node(root, "", true, &mut out);
    }
    print!("{out}");
}

fn main() {
    let mut map = AvlTreeMap::new();
    for key in 1..=6 {
        map.insert(key, key.to_string());
    }
    print_tree(&map);

    println!("Level-order traversal:");
    map.traverse_level_order(|k, v| {
        println!("Key: {}, Value: {}", k, v);
    });

    map.remove(&4);
    println!("After removing 4:");
    print_tree(&map);
}
