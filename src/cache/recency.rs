//! Recency List Module
//!
//! Arena-backed doubly linked list tracking access order for LRU eviction.

use std::collections::HashMap;
use std::hash::Hash;

type Slot<K, V> = Option<Node<K, V>>;

#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

// == Recency List ==
/// Key/value storage ordered from least to most recently used.
///
/// Nodes live in a `Vec` and link to each other by slot index; a key → slot
/// map gives direct access, so promote, remove and pop-oldest are all `O(1)`.
/// Vacated slots are recycled through a free list.
///
/// - Head = least recently used (eviction candidate)
/// - Tail = most recently used
#[derive(Debug)]
pub struct RecencyList<K, V> {
    index: HashMap<K, usize>,
    nodes: Vec<Slot<K, V>>,
    free_list: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<K, V> RecencyList<K, V>
where
    K: Eq + Hash + Clone,
{
    // == Constructor ==
    /// Creates an empty list with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: HashMap::with_capacity(capacity),
            nodes: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            head: None,
            tail: None,
        }
    }

    // == Length ==
    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // == Contains ==
    /// Checks if a key is stored, without touching it.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    // == Get ==
    /// Returns the value for `key` and marks it most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let index = *self.index.get(key)?;
        self.promote(index);
        self.node(index).map(|node| &node.value)
    }

    // == Peek ==
    /// Returns the value for `key` without changing its position.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let index = *self.index.get(key)?;
        self.node(index).map(|node| &node.value)
    }

    // == Insert ==
    /// Inserts or overwrites `key`, placing it at the most recently used end.
    ///
    /// Returns the previous value when the key was already present. Never
    /// evicts; capacity is the caller's concern.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&index) = self.index.get(&key) {
            let previous = self
                .node_mut(index)
                .map(|node| std::mem::replace(&mut node.value, value));
            self.promote(index);
            return previous;
        }

        let index = self.allocate(key.clone(), value);
        self.attach_back(index);
        self.index.insert(key, index);
        None
    }

    // == Remove ==
    /// Removes `key` from anywhere in the order.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let index = self.index.remove(key)?;
        self.release(index).map(|node| node.value)
    }

    // == Pop Oldest ==
    /// Removes and returns the least recently used entry.
    ///
    /// Returns None if the list is empty.
    pub fn pop_oldest(&mut self) -> Option<(K, V)> {
        let index = self.head?;
        let node = self.release(index)?;
        self.index.remove(&node.key);
        Some((node.key, node.value))
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    pub fn peek_oldest(&self) -> Option<&K> {
        self.head.and_then(|index| self.node(index)).map(|node| &node.key)
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.index.clear();
        self.nodes.clear();
        self.free_list.clear();
        self.head = None;
        self.tail = None;
    }

    // == Iter ==
    /// Iterates entries from least to most recently used.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            current: self.head,
        }
    }

    fn node(&self, index: usize) -> Option<&Node<K, V>> {
        self.nodes.get(index).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, index: usize) -> Option<&mut Node<K, V>> {
        self.nodes.get_mut(index).and_then(Option::as_mut)
    }

    fn allocate(&mut self, key: K, value: V) -> usize {
        let node = Node {
            key,
            value,
            prev: None,
            next: None,
        };
        if let Some(index) = self.free_list.pop() {
            self.nodes[index] = Some(node);
            index
        } else {
            self.nodes.push(Some(node));
            self.nodes.len() - 1
        }
    }

    /// Unlinks the slot and returns its node, recycling the slot.
    fn release(&mut self, index: usize) -> Option<Node<K, V>> {
        self.detach(index);
        let node = self.nodes.get_mut(index)?.take()?;
        self.free_list.push(index);
        Some(node)
    }

    fn promote(&mut self, index: usize) {
        if self.tail == Some(index) {
            return;
        }
        self.detach(index);
        self.attach_back(index);
    }

    fn detach(&mut self, index: usize) {
        let (prev, next) = match self.node(index) {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev.and_then(|p| self.node_mut(p)) {
            Some(prev_node) => prev_node.next = next,
            None => self.head = next,
        }

        match next.and_then(|n| self.node_mut(n)) {
            Some(next_node) => next_node.prev = prev,
            None => self.tail = prev,
        }

        if let Some(node) = self.node_mut(index) {
            node.prev = None;
            node.next = None;
        }
    }

    fn attach_back(&mut self, index: usize) {
        let old_tail = self.tail;
        if let Some(node) = self.node_mut(index) {
            node.prev = old_tail;
            node.next = None;
        }

        match old_tail.and_then(|t| self.node_mut(t)) {
            Some(tail_node) => tail_node.next = Some(index),
            None => self.head = Some(index),
        }

        self.tail = Some(index);
    }

    /// Walks the links and panics if they disagree with the index.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let mut seen = 0;
        let mut prev = None;
        let mut current = self.head;
        while let Some(index) = current {
            let node = self.node(index).expect("linked slot is vacant");
            assert_eq!(node.prev, prev, "broken back-link");
            assert_eq!(self.index.get(&node.key), Some(&index), "index disagrees");
            seen += 1;
            assert!(seen <= self.index.len(), "cycle in recency list");
            prev = current;
            current = node.next;
        }
        assert_eq!(self.tail, prev, "tail is not the last node");
        assert_eq!(seen, self.index.len(), "orphaned index entries");
    }
}

// == Iterator ==
/// Iterator over entries from least to most recently used.
pub struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    current: Option<usize>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V>
where
    K: Eq + Hash + Clone,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.current?)?;
        self.current = node.next;
        Some((&node.key, &node.value))
    }
}
