//! Balanced index over triplet coordinates
//!
//! An AVL tree keyed by `(row, col)` whose payload is the slot number of the
//! entry in the parallel triplet arrays. Nodes live in an arena and link to
//! each other by position, so the tree owns no raw pointers; freed nodes are
//! recycled through a free list.
//!
//! Triplet insertion order is arbitrary, so an unbalanced tree would degrade
//! to a linked list. AVL rebalancing keeps `find`, `insert` and `remove` at
//! O(log n) in the worst case.

use std::cmp::Ordering;

use crate::error::{Result, SparseError};

const NIL: usize = usize::MAX;

#[derive(Debug, Clone)]
struct Node {
    key: (usize, usize),
    slot: usize,
    left: usize,
    right: usize,
    height: u32,
}

/// Ordered map from `(row, col)` to a storage slot
#[derive(Debug, Clone)]
pub struct IndexTree {
    nodes: Vec<Node>,
    free: Vec<usize>,
    root: usize,
    len: usize,
}

impl Default for IndexTree {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexTree {
    /// Creates an empty index
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: NIL,
            len: 0,
        }
    }

    /// Creates an empty index with room for `capacity` keys
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut tree = Self::new();
        tree.reserve(capacity)?;
        Ok(tree)
    }

    /// Number of keys in the index
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the index holds no keys
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the tree; an empty tree has height 0
    pub fn height(&self) -> usize {
        self.h(self.root) as usize
    }

    /// Ensures `additional` more keys can be inserted without reallocating
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        let needed = additional.saturating_sub(self.free.len());
        let spare = self.nodes.capacity() - self.nodes.len();
        if needed > spare {
            self.nodes
                .try_reserve_exact(needed)
                .map_err(SparseError::out_of_memory(self.nodes.len() + needed))?;
        }
        Ok(())
    }

    /// Looks up the slot stored for `(row, col)`
    pub fn find(&self, row: usize, col: usize) -> Option<usize> {
        self.locate((row, col)).map(|n| self.nodes[n].slot)
    }

    /// Re-points an existing key at a different slot
    ///
    /// Returns false if the key is not present.
    pub fn set_slot(&mut self, row: usize, col: usize, slot: usize) -> bool {
        match self.locate((row, col)) {
            Some(n) => {
                self.nodes[n].slot = slot;
                true
            }
            None => false,
        }
    }

    /// Inserts a new key
    ///
    /// The key must not already be present; callers look it up first and
    /// treat an existing key as an overwrite target.
    pub fn insert(&mut self, row: usize, col: usize, slot: usize) -> Result<()> {
        let key = (row, col);
        if self.locate(key).is_some() {
            return Err(SparseError::domain(format!(
                "duplicate index key ({}, {})",
                row, col
            )));
        }

        let id = self.alloc_node(key, slot)?;
        self.root = self.insert_at(self.root, id);
        self.len += 1;
        Ok(())
    }

    /// Removes a key, returning the slot it pointed at
    pub fn remove(&mut self, row: usize, col: usize) -> Option<usize> {
        let mut removed = None;
        self.root = self.remove_at(self.root, (row, col), &mut removed);
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Drops every key while keeping the arena allocation
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.root = NIL;
        self.len = 0;
    }

    /// In-order iterator over `((row, col), slot)` pairs
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            tree: self,
            stack: Vec::new(),
            cursor: self.root,
        }
    }

    fn locate(&self, key: (usize, usize)) -> Option<usize> {
        let mut n = self.root;
        while n != NIL {
            let node = &self.nodes[n];
            match key.cmp(&node.key) {
                Ordering::Less => n = node.left,
                Ordering::Greater => n = node.right,
                Ordering::Equal => return Some(n),
            }
        }
        None
    }

    fn alloc_node(&mut self, key: (usize, usize), slot: usize) -> Result<usize> {
        let node = Node {
            key,
            slot,
            left: NIL,
            right: NIL,
            height: 1,
        };

        if let Some(id) = self.free.pop() {
            self.nodes[id] = node;
            return Ok(id);
        }

        if self.nodes.len() == self.nodes.capacity() {
            let requested = self.nodes.len() + 1;
            self.nodes
                .try_reserve(1)
                .map_err(SparseError::out_of_memory(requested))?;
        }
        self.nodes.push(node);
        Ok(self.nodes.len() - 1)
    }

    fn insert_at(&mut self, n: usize, id: usize) -> usize {
        if n == NIL {
            return id;
        }

        if self.nodes[id].key < self.nodes[n].key {
            let left = self.insert_at(self.nodes[n].left, id);
            self.nodes[n].left = left;
        } else {
            let right = self.insert_at(self.nodes[n].right, id);
            self.nodes[n].right = right;
        }

        self.rebalance(n)
    }

    fn remove_at(&mut self, n: usize, key: (usize, usize), removed: &mut Option<usize>) -> usize {
        if n == NIL {
            return NIL;
        }

        match key.cmp(&self.nodes[n].key) {
            Ordering::Less => {
                let left = self.remove_at(self.nodes[n].left, key, removed);
                self.nodes[n].left = left;
            }
            Ordering::Greater => {
                let right = self.remove_at(self.nodes[n].right, key, removed);
                self.nodes[n].right = right;
            }
            Ordering::Equal => {
                *removed = Some(self.nodes[n].slot);
                let (left, right) = (self.nodes[n].left, self.nodes[n].right);
                self.free.push(n);

                if left == NIL {
                    return right;
                }
                if right == NIL {
                    return left;
                }

                // Successor takes the removed node's place
                let (rest, successor) = self.detach_min(right);
                self.nodes[successor].left = left;
                self.nodes[successor].right = rest;
                return self.rebalance(successor);
            }
        }

        self.rebalance(n)
    }

    /// Unlinks the minimum of subtree `n`; returns (new subtree root, min node)
    fn detach_min(&mut self, n: usize) -> (usize, usize) {
        let left = self.nodes[n].left;
        if left == NIL {
            return (self.nodes[n].right, n);
        }

        let (rest, min) = self.detach_min(left);
        self.nodes[n].left = rest;
        (self.rebalance(n), min)
    }

    fn h(&self, n: usize) -> u32 {
        if n == NIL {
            0
        } else {
            self.nodes[n].height
        }
    }

    fn balance_factor(&self, n: usize) -> i64 {
        self.h(self.nodes[n].left) as i64 - self.h(self.nodes[n].right) as i64
    }

    fn update_height(&mut self, n: usize) {
        let height = 1 + self.h(self.nodes[n].left).max(self.h(self.nodes[n].right));
        self.nodes[n].height = height;
    }

    fn rotate_right(&mut self, n: usize) -> usize {
        let l = self.nodes[n].left;
        self.nodes[n].left = self.nodes[l].right;
        self.nodes[l].right = n;
        self.update_height(n);
        self.update_height(l);
        l
    }

    fn rotate_left(&mut self, n: usize) -> usize {
        let r = self.nodes[n].right;
        self.nodes[n].right = self.nodes[r].left;
        self.nodes[r].left = n;
        self.update_height(n);
        self.update_height(r);
        r
    }

    fn rebalance(&mut self, n: usize) -> usize {
        self.update_height(n);
        let balance = self.balance_factor(n);

        if balance > 1 {
            let l = self.nodes[n].left;
            if self.balance_factor(l) < 0 {
                let new_left = self.rotate_left(l);
                self.nodes[n].left = new_left;
            }
            return self.rotate_right(n);
        }

        if balance < -1 {
            let r = self.nodes[n].right;
            if self.balance_factor(r) > 0 {
                let new_right = self.rotate_right(r);
                self.nodes[n].right = new_right;
            }
            return self.rotate_left(n);
        }

        n
    }
}

/// In-order iterator over an [`IndexTree`]
pub struct Iter<'a> {
    tree: &'a IndexTree,
    stack: Vec<usize>,
    cursor: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = ((usize, usize), usize);

    fn next(&mut self) -> Option<Self::Item> {
        while self.cursor != NIL {
            self.stack.push(self.cursor);
            self.cursor = self.tree.nodes[self.cursor].left;
        }

        let n = self.stack.pop()?;
        let node = &self.tree.nodes[n];
        self.cursor = node.right;
        Some((node.key, node.slot))
    }
}
