use std::ops::{Index, IndexMut};

use dialgrid_core::GridBackend;

use crate::node::{Node, NodeId, SearchId};

/// One search record per node id of a grid backend.
///
/// Allocated once per driver; searches invalidate it by bumping the search
/// id instead of clearing it.
#[derive(Clone, Debug)]
pub(crate) struct NodeArray {
    nodes: Vec<Node>,
}

impl NodeArray {
    pub(crate) fn new<G: GridBackend + ?Sized>(grid: &G) -> Self {
        let nodes = (0..grid.node_count() as u32)
            .map(|id| Node {
                pos: grid.node_point(id),
                ..Node::default()
            })
            .collect();
        Self { nodes }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Stamp `id` as the closed start node of search `sid`.
    #[inline]
    pub(crate) fn seed(&mut self, id: NodeId, sid: SearchId) {
        let n = &mut self.nodes[id as usize];
        n.sid = sid;
        n.g = 0;
        n.f = 0;
        n.pred = id;
    }

    /// Mark every record as untouched. Needed once the search id wraps.
    pub(crate) fn reset_stamps(&mut self) {
        for n in &mut self.nodes {
            n.sid = SearchId::NONE;
        }
    }
}

impl Index<NodeId> for NodeArray {
    type Output = Node;

    #[inline]
    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }
}

impl IndexMut<NodeId> for NodeArray {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id as usize]
    }
}
