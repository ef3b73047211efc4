// crates/citydex-core/src/trie.rs

//! Prefix trie used by the catalog's name index.

use std::collections::HashMap;

#[derive(Debug)]
struct Node<T> {
    /// Every item whose key passes through this node, in insertion order.
    items: Vec<T>,
    children: HashMap<char, Node<T>>,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            children: HashMap::new(),
        }
    }
}

/// A trie mapping string keys to items, answering prefix queries in
/// O(prefix length).
///
/// Each node stores the full item list for its key path, so an item is
/// duplicated once per character of its key. That memory trade buys `search`
/// a ready-made slice with no subtree walk. The catalog keeps the per-node
/// payload small by indexing positions (`u32`) into its snapshot rather than
/// whole cities.
///
/// There is no removal: the catalog rebuilds the index wholesale on reload.
#[derive(Debug)]
pub struct PrefixIndex<T> {
    root: Node<T>,
}

impl<T> Default for PrefixIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PrefixIndex<T> {
    pub fn new() -> Self {
        Self {
            root: Node::default(),
        }
    }

    /// Index `item` under `key`.
    ///
    /// The item is appended at every node along the key path, so any prefix
    /// of `key` will find it. Inserting with an empty key touches nothing.
    pub fn insert(&mut self, item: T, key: &str)
    where
        T: Clone,
    {
        let mut current = &mut self.root;
        for ch in key.chars() {
            current = current.children.entry(ch).or_default();
            current.items.push(item.clone());
        }
    }

    /// All items whose key starts with `prefix`, in insertion order.
    ///
    /// An empty prefix stops at the root, which carries no items; callers
    /// that want "everything" should not go through the trie.
    pub fn search(&self, prefix: &str) -> &[T] {
        let mut current = &self.root;
        for ch in prefix.chars() {
            match current.children.get(&ch) {
                Some(next) => current = next,
                None => return &[],
            }
        }
        &current.items
    }
}
