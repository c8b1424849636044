// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Ordered doubly-linked list holding the active regions of the sweep,
// bottom to top. The head node carries no key and closes the ring.
//
// The order is not a fixed property of the keys: the sweep compares edges
// at the current event, so every operation that needs it takes the
// comparison as an argument. Inserting next to a known neighbour stays
// O(1) in the common case.

use crate::pool::{Handle, Pool};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct NodeId(Handle);

#[derive(Clone, Debug)]
struct DictNode<K> {
    key: Option<K>,
    next: NodeId,
    prev: NodeId,
}

pub struct Dict<K> {
    nodes: Pool<DictNode<K>>,
    head: NodeId,
}

impl<K: Copy> Default for Dict<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy> Dict<K> {
    pub fn new() -> Self {
        let mut dict = Dict {
            nodes: Pool::new(),
            head: NodeId::default(),
        };
        dict.init_head();
        dict
    }

    fn init_head(&mut self) {
        let head = NodeId(self.nodes.insert(DictNode {
            key: None,
            next: NodeId::default(),
            prev: NodeId::default(),
        }));
        let node = &mut self.nodes[head.0];
        node.next = head;
        node.prev = head;
        self.head = head;
    }

    /// Remove every node, keeping storage.
    pub fn reset(&mut self) {
        self.nodes.reset();
        self.init_head();
    }

    #[inline]
    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn is_empty(&self) -> bool {
        self.min() == self.head
    }

    /// Insert `key` in order, searching backwards from the head.
    pub fn insert<F>(&mut self, key: K, leq: F) -> NodeId
    where
        F: Fn(K, K) -> bool,
    {
        self.insert_before(self.head, key, leq)
    }

    /// Insert `key` below `node`, walking down until a node with a key not
    /// above it is found.
    pub fn insert_before<F>(&mut self, node: NodeId, key: K, leq: F) -> NodeId
    where
        F: Fn(K, K) -> bool,
    {
        let mut node = node;
        loop {
            node = self.nodes[node.0].prev;
            match self.nodes[node.0].key {
                None => break,
                Some(k) if leq(k, key) => break,
                Some(_) => {}
            }
        }

        let next = self.nodes[node.0].next;
        let new_node = NodeId(self.nodes.insert(DictNode {
            key: Some(key),
            next,
            prev: node,
        }));
        self.nodes[node.0].next = new_node;
        self.nodes[next.0].prev = new_node;
        new_node
    }

    pub fn delete(&mut self, node: NodeId) {
        debug_assert!(node != self.head, "the head node is permanent");
        let (next, prev) = {
            let n = &self.nodes[node.0];
            (n.next, n.prev)
        };
        self.nodes[next.0].prev = prev;
        self.nodes[prev.0].next = next;
        self.nodes.remove(node.0);
    }

    /// First node from the bottom whose key is not below the search key;
    /// `is_at_or_above(k)` answers "search key <= k". Returns the head when
    /// no such node exists.
    pub fn search<F>(&self, is_at_or_above: F) -> NodeId
    where
        F: Fn(K) -> bool,
    {
        let mut node = self.head;
        loop {
            node = self.nodes[node.0].next;
            match self.nodes[node.0].key {
                None => return node,
                Some(k) if is_at_or_above(k) => return node,
                Some(_) => {}
            }
        }
    }

    /// Key of `node`; `None` for the head.
    #[inline]
    pub fn key(&self, node: NodeId) -> Option<K> {
        self.nodes[node.0].key
    }

    #[inline]
    pub fn min(&self) -> NodeId {
        self.nodes[self.head.0].next
    }

    #[inline]
    pub fn max(&self) -> NodeId {
        self.nodes[self.head.0].prev
    }

    #[inline]
    pub fn succ(&self, node: NodeId) -> NodeId {
        self.nodes[node.0].next
    }

    #[inline]
    pub fn pred(&self, node: NodeId) -> NodeId {
        self.nodes[node.0].prev
    }
}
