use super::BucketQueue;
use crate::arena::SliceArena;
use crate::bucket::NodeBucket;
use crate::distance::{BALANCED_ORDER, Dist};
use crate::node::{NodeEntry, SearchId};

const NIL: u32 = u32::MAX;

#[derive(Debug)]
struct TreeNode {
    key: Dist,
    left: u32,
    right: u32,
    height: u8,
    bucket: NodeBucket,
}

/// AVL tree of buckets keyed by `f`.
///
/// Tree nodes live in a vector and link to each other by index, so a
/// bucket keeps its index through rotations. Only the minimum is ever
/// removed; it is cached once located and dropped from the cache on pop.
#[derive(Debug)]
pub struct TreeQueue {
    nodes: Vec<TreeNode>,
    free: Vec<u32>,
    root: u32,
    front: Option<u32>,
    arena: SliceArena,
    sid: SearchId,
}

impl Default for TreeQueue {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: NIL,
            front: None,
            arena: SliceArena::default(),
            sid: SearchId::NONE,
        }
    }
}

impl TreeQueue {
    /// Number of distinct `f` values queued.
    #[cfg(test)]
    fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    #[inline]
    fn height(&self, n: u32) -> i32 {
        if n == NIL {
            0
        } else {
            i32::from(self.nodes[n as usize].height)
        }
    }

    #[inline]
    fn update(&mut self, n: u32) {
        let node = &self.nodes[n as usize];
        let h = 1 + self.height(node.left).max(self.height(node.right));
        self.nodes[n as usize].height = h as u8;
    }

    fn rotate_right(&mut self, n: u32) -> u32 {
        let l = self.nodes[n as usize].left;
        self.nodes[n as usize].left = self.nodes[l as usize].right;
        self.nodes[l as usize].right = n;
        self.update(n);
        self.update(l);
        l
    }

    fn rotate_left(&mut self, n: u32) -> u32 {
        let r = self.nodes[n as usize].right;
        self.nodes[n as usize].right = self.nodes[r as usize].left;
        self.nodes[r as usize].left = n;
        self.update(n);
        self.update(r);
        r
    }

    fn rebalance(&mut self, n: u32) -> u32 {
        self.update(n);
        let (left, right) = {
            let node = &self.nodes[n as usize];
            (node.left, node.right)
        };
        let balance = self.height(left) - self.height(right);
        if balance > 1 {
            let l = &self.nodes[left as usize];
            if self.height(l.left) < self.height(l.right) {
                self.nodes[n as usize].left = self.rotate_left(left);
            }
            return self.rotate_right(n);
        }
        if balance < -1 {
            let r = &self.nodes[right as usize];
            if self.height(r.right) < self.height(r.left) {
                self.nodes[n as usize].right = self.rotate_right(right);
            }
            return self.rotate_left(n);
        }
        n
    }

    fn alloc(&mut self, key: Dist) -> u32 {
        let mut bucket = NodeBucket::default();
        bucket.claim(self.sid);
        let node = TreeNode {
            key,
            left: NIL,
            right: NIL,
            height: 1,
            bucket,
        };
        match self.free.pop() {
            Some(i) => {
                self.nodes[i as usize] = node;
                i
            }
            None => {
                self.nodes.push(node);
                (self.nodes.len() - 1) as u32
            }
        }
    }

    /// Insert `key` below `n` unless present. Returns the new subtree root
    /// and the index holding `key`.
    fn insert(&mut self, n: u32, key: Dist) -> (u32, u32) {
        if n == NIL {
            let i = self.alloc(key);
            return (i, i);
        }
        let here = self.nodes[n as usize].key;
        if key == here {
            return (n, n);
        }
        let found = if key < here {
            let (child, found) = self.insert(self.nodes[n as usize].left, key);
            self.nodes[n as usize].left = child;
            found
        } else {
            let (child, found) = self.insert(self.nodes[n as usize].right, key);
            self.nodes[n as usize].right = child;
            found
        };
        (self.rebalance(n), found)
    }

    /// Unlink the minimum below `n`. Returns the new subtree root.
    fn remove_min(&mut self, n: u32) -> u32 {
        let left = self.nodes[n as usize].left;
        if left == NIL {
            self.free.push(n);
            return self.nodes[n as usize].right;
        }
        let child = self.remove_min(left);
        self.nodes[n as usize].left = child;
        self.rebalance(n)
    }

    fn locate_front(&mut self) -> Option<u32> {
        if self.front.is_none() && self.root != NIL {
            let mut n = self.root;
            while self.nodes[n as usize].left != NIL {
                n = self.nodes[n as usize].left;
            }
            self.front = Some(n);
        }
        self.front
    }
}

impl BucketQueue for TreeQueue {
    const MERGE_ORDER: u32 = BALANCED_ORDER;

    fn setup_search(&mut self, sid: SearchId) {
        self.sid = sid;
        self.nodes.clear();
        self.free.clear();
        self.root = NIL;
        self.front = None;
        self.arena.reset();
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.root == NIL
    }

    fn top(&mut self) -> Option<(Dist, &[NodeEntry])> {
        let n = self.locate_front()?;
        let node = &self.nodes[n as usize];
        Some((node.key, node.bucket.entries(&self.arena)))
    }

    fn pop(&mut self) {
        let Some(n) = self.locate_front() else {
            return;
        };
        self.nodes[n as usize].bucket.release(&mut self.arena);
        self.root = self.remove_min(self.root);
        self.front = None;
    }

    fn merge_bucket(&mut self, f: Dist, entries: &[NodeEntry]) {
        let (root, n) = self.insert(self.root, f);
        self.root = root;
        if self.front.is_some_and(|front| f < self.nodes[front as usize].key) {
            self.front = Some(n);
        }
        self.nodes[n as usize].bucket.append(entries, &mut self.arena);
    }
}
