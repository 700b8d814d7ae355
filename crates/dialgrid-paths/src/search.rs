use std::sync::Arc;

use dialgrid_core::{BitGrid, GridBackend, GridError, Point};

use crate::distance::octile;
use crate::expander::BucketExpander;
use crate::node::{Node, NodeId, SearchId};
use crate::queue::{BucketQueue, HeapQueue};
use crate::state::NodeArray;

/// Counters for the most recent query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStats {
    /// Nodes expanded, the start included.
    pub expanded: u64,
    /// Successors stamped or improved.
    pub generated: u64,
    /// Buckets popped from the queue.
    pub buckets: u64,
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Shortest-path driver over a shared grid.
///
/// `Search` owns all per-query state (node records, queue, arenas, scratch
/// buckets) so repeated queries allocate nothing after warm-up. Each query
/// bumps the search id instead of clearing the records. Use one `Search` per
/// thread; the grid itself is shared through an `Arc`.
///
/// ```
/// use dialgrid_paths::Search;
/// use dialgrid_core::Point;
///
/// let mut search: Search = Search::build(&[true; 25], 5, 5).unwrap();
/// let path = search.find_path(Point::new(0, 0), Point::new(4, 4));
/// assert_eq!(path.len(), 5);
/// ```
#[derive(Debug)]
pub struct Search<G: GridBackend = BitGrid, Q: BucketQueue = HeapQueue> {
    grid: Arc<G>,
    nodes: NodeArray,
    queue: Q,
    expander: BucketExpander,
    sid: SearchId,
    stats: SearchStats,
}

impl<G: GridBackend, Q: BucketQueue> Search<G, Q> {
    /// Create a driver for a shared grid.
    pub fn new(grid: Arc<G>) -> Self {
        let nodes = NodeArray::new(grid.as_ref());
        let expander = BucketExpander::new(grid.row_stride());
        log::debug!(
            "search driver ready: {}x{} grid, {} node records",
            grid.width(),
            grid.height(),
            nodes.len()
        );
        Self {
            grid,
            nodes,
            queue: Q::default(),
            expander,
            sid: SearchId::NONE,
            stats: SearchStats::default(),
        }
    }

    /// Build the grid from a row-major boolean array (`bits[y * width + x]`)
    /// and a driver over it.
    pub fn build(bits: &[bool], width: u32, height: u32) -> Result<Self, GridError> {
        Ok(Self::new(Arc::new(G::build(bits, width, height)?)))
    }

    #[inline]
    pub fn grid(&self) -> &Arc<G> {
        &self.grid
    }

    /// Counters of the last query.
    #[inline]
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Id of the last query. Records stamped with it are live.
    #[inline]
    pub fn search_id(&self) -> SearchId {
        self.sid
    }

    /// The search record of a cell, or `None` outside the grid.
    pub fn node(&self, p: Point) -> Option<&Node> {
        self.grid
            .range()
            .contains(p)
            .then(|| &self.nodes[self.grid.node_id(p)])
    }

    /// Find a shortest octile path from `start` to `goal`.
    ///
    /// The path lists every cell from `start` to `goal` inclusive, each one
    /// step from the last. It is empty when `start == goal` or when the goal
    /// is unreachable.
    ///
    /// # Panics
    ///
    /// If either endpoint lies outside the grid. Endpoints on blocked cells
    /// are not checked; the result is then unspecified.
    pub fn find_path(&mut self, start: Point, goal: Point) -> Vec<Point> {
        let range = self.grid.range();
        assert!(range.contains(start), "start {start} outside grid {range}");
        assert!(range.contains(goal), "goal {goal} outside grid {range}");
        self.stats = SearchStats::default();
        self.next_search_id();
        if start == goal {
            return Vec::new();
        }

        let sid = self.sid;
        let start_id = self.grid.node_id(start);
        let goal_id = self.grid.node_id(goal);
        let Self {
            grid,
            nodes,
            queue,
            expander,
            ..
        } = self;
        let grid = grid.as_ref();

        queue.setup_search(sid);
        expander.setup(goal_id, goal);
        nodes.seed(start_id, sid);

        let f_start = octile(start, goal);
        let mut found = expander.expand_start(grid, nodes, sid, start_id, f_start);
        if !found {
            queue.merge_bucket_array(f_start, &mut expander.scratch);
        }
        let mut buckets = 0;
        while !found {
            let Some((f, entries)) = queue.top() else {
                break;
            };
            found = expander.expand_bucket(grid, nodes, sid, entries, f);
            queue.pop();
            buckets += 1;
            if !found {
                queue.merge_bucket_array(f, &mut expander.scratch);
            }
        }

        self.stats = SearchStats {
            buckets,
            ..self.expander.stats
        };
        log::trace!(
            "search {} {start} -> {goal}: found={found} expanded={} generated={} buckets={}",
            sid.0,
            self.stats.expanded,
            self.stats.generated,
            self.stats.buckets
        );
        if found {
            self.reconstruct(goal_id)
        } else {
            Vec::new()
        }
    }

    fn next_search_id(&mut self) {
        self.sid = match self.sid.0.checked_add(1) {
            Some(n) => SearchId(n),
            None => {
                log::debug!("search id wrapped, resetting node stamps");
                self.nodes.reset_stamps();
                SearchId(1)
            }
        };
    }

    fn reconstruct(&self, goal: NodeId) -> Vec<Point> {
        let mut path = Vec::new();
        let mut id = goal;
        loop {
            let node = &self.nodes[id];
            path.push(node.pos);
            if node.pred == id {
                break;
            }
            id = node.pred;
        }
        path.reverse();
        path
    }
}
