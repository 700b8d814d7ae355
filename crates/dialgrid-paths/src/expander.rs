//! Node expansion: grid bits to relaxed successors filed by relative `f`.

use dialgrid_core::{GridBackend, Point};

use crate::bucket::ScratchBuckets;
use crate::distance::{Dist, f_hash, octile};
use crate::node::{Dir, NodeEntry, NodeId, SearchId, blocked_mask};
use crate::search::SearchStats;
use crate::state::NodeArray;

/// Expands nodes for one driver.
///
/// Successors whose `f` equals the `f` being expanded go to a pending list
/// and are expanded in the same pass; the others land in one of five scratch
/// buckets for the driver to merge into its queue.
#[derive(Debug)]
pub(crate) struct BucketExpander {
    pub(crate) scratch: ScratchBuckets,
    pending: Vec<NodeEntry>,
    deltas: [i32; 8],
    goal: NodeId,
    goal_pos: Point,
    pub(crate) stats: SearchStats,
}

impl BucketExpander {
    pub(crate) fn new(row_stride: u32) -> Self {
        Self {
            scratch: ScratchBuckets::default(),
            pending: Vec::with_capacity(64),
            deltas: Dir::ALL.map(|d| d.id_delta(row_stride)),
            goal: NodeId::MAX,
            goal_pos: Point::ZERO,
            stats: SearchStats::default(),
        }
    }

    pub(crate) fn setup(&mut self, goal: NodeId, goal_pos: Point) {
        self.goal = goal;
        self.goal_pos = goal_pos;
        self.scratch.clear_all();
        self.pending.clear();
        self.stats = SearchStats::default();
    }

    /// Expand the seeded start node, whose `f` is `f`. Returns `true` once
    /// the goal is reached.
    pub(crate) fn expand_start<G: GridBackend + ?Sized>(
        &mut self,
        grid: &G,
        nodes: &mut NodeArray,
        sid: SearchId,
        start: NodeId,
        f: Dist,
    ) -> bool {
        self.stats.expanded += 1;
        self.expand_node(grid, nodes, sid, start, 0, f) || self.drain(grid, nodes, sid, f)
    }

    /// Expand a bucket popped from the queue. `entries` all share `f`.
    pub(crate) fn expand_bucket<G: GridBackend + ?Sized>(
        &mut self,
        grid: &G,
        nodes: &mut NodeArray,
        sid: SearchId,
        entries: &[NodeEntry],
        f: Dist,
    ) -> bool {
        self.pending.clear();
        self.pending.extend_from_slice(entries);
        self.drain(grid, nodes, sid, f)
    }

    fn drain<G: GridBackend + ?Sized>(
        &mut self,
        grid: &G,
        nodes: &mut NodeArray,
        sid: SearchId,
        f: Dist,
    ) -> bool {
        while let Some(entry) = self.pending.pop() {
            let id = entry.id();
            let node = &mut nodes[id];
            if node.is_closed() {
                continue;
            }
            node.close();
            self.stats.expanded += 1;
            if self.expand_node(grid, nodes, sid, id, entry.dir().behind(), f) {
                self.pending.clear();
                return true;
            }
        }
        false
    }

    fn expand_node<G: GridBackend + ?Sized>(
        &mut self,
        grid: &G,
        nodes: &mut NodeArray,
        sid: SearchId,
        id: NodeId,
        skip: u8,
        f: Dist,
    ) -> bool {
        let g = nodes[id].g;
        let blocked = blocked_mask(grid.region3x3(id)) | skip;
        for dir in Dir::ALL {
            if blocked & dir.required() != 0 {
                continue;
            }
            let succ = id.wrapping_add_signed(self.deltas[dir as usize]);
            let new_g = g + dir.cost();
            let node = &mut nodes[succ];
            if succ == self.goal {
                // Adjacent to the goal, so new_g equals f: nothing cheaper is open.
                node.sid = sid;
                node.g = new_g;
                node.f = new_g;
                node.pred = id;
                return true;
            }
            if !node.can_push(sid, new_g) {
                continue;
            }
            node.sid = sid;
            node.g = new_g;
            node.f = new_g + octile(node.pos, self.goal_pos);
            node.pred = id;
            self.stats.generated += 1;

            let entry = NodeEntry::new(succ, dir);
            match f_hash(node.f - f) {
                0 => self.pending.push(entry),
                hash => self.scratch.push(hash, entry),
            }
        }
        false
    }
}
