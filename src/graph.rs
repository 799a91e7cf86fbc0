//! Undirected settlement graph over grid cells

use std::collections::{BTreeSet, HashMap, VecDeque};

use serde::Serialize;

use crate::error::GraphError;
use crate::grid::CellPos;

/// Handle to a graph node. Only [`SettlementGraph::add_node`] hands these out.
///
/// Handles are dense indices and carry no graph identity. A handle from one
/// graph passed to another is only rejected when its index is out of range
/// there; otherwise it names whatever node sits at that index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(u32);

impl NodeId {
    pub fn raw(self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettlementGraph {
    positions: Vec<CellPos>,
    lookup: HashMap<CellPos, NodeId>,
    links: Vec<BTreeSet<NodeId>>,
}

impl SettlementGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cell as an isolated node. Adding the same cell twice returns the
    /// handle from the first call.
    pub fn add_node(&mut self, pos: CellPos) -> NodeId {
        if let Some(&id) = self.lookup.get(&pos) {
            return id;
        }
        let id = NodeId(self.positions.len() as u32);
        self.positions.push(pos);
        self.links.push(BTreeSet::new());
        self.lookup.insert(pos, id);
        id
    }

    /// Links two nodes in both directions. Returns `false` when the link
    /// already existed.
    pub fn link(&mut self, a: NodeId, b: NodeId) -> Result<bool, GraphError> {
        self.check(a)?;
        self.check(b)?;
        if a == b {
            return Err(GraphError::SelfLink(a));
        }
        let inserted = self.links[a.index()].insert(b);
        self.links[b.index()].insert(a);
        Ok(inserted)
    }

    pub fn is_linked(&self, a: NodeId, b: NodeId) -> Result<bool, GraphError> {
        self.check(b)?;
        Ok(self.neighbors(a)?.contains(&b))
    }

    pub fn neighbors(&self, node: NodeId) -> Result<&BTreeSet<NodeId>, GraphError> {
        self.links
            .get(node.index())
            .ok_or(GraphError::UnknownNode(node))
    }

    pub fn position(&self, node: NodeId) -> Result<CellPos, GraphError> {
        self.positions
            .get(node.index())
            .copied()
            .ok_or(GraphError::UnknownNode(node))
    }

    pub fn node(&self, pos: CellPos) -> Option<NodeId> {
        self.lookup.get(&pos).copied()
    }

    /// All node handles in insertion order
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = NodeId> + '_ {
        (0..self.positions.len() as u32).map(NodeId)
    }

    pub fn positions(&self) -> &[CellPos] {
        &self.positions
    }

    pub fn node_count(&self) -> usize {
        self.positions.len()
    }

    pub fn edge_count(&self) -> usize {
        self.links.iter().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Every link once, as `(lower, higher)` handle pairs in sorted order
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        let mut edges = Vec::with_capacity(self.edge_count());
        for (index, neighbors) in self.links.iter().enumerate() {
            let node = NodeId(index as u32);
            edges.extend(neighbors.range(node..).filter(|&&n| n != node).map(|&n| (node, n)));
        }
        edges
    }

    /// Breadth-first walk over existing links from every node in `starts`,
    /// stepping only onto nodes accepted by `allow`. The starts themselves are
    /// always visited and come first in the returned order.
    pub fn reachable_from<F>(&self, starts: &[NodeId], mut allow: F) -> Result<Vec<NodeId>, GraphError>
    where
        F: FnMut(NodeId) -> bool,
    {
        let mut visited = vec![false; self.positions.len()];
        let mut queue = VecDeque::new();
        let mut order = Vec::new();
        for &start in starts {
            self.check(start)?;
            if !visited[start.index()] {
                visited[start.index()] = true;
                queue.push_back(start);
            }
        }

        while let Some(node) = queue.pop_front() {
            order.push(node);
            for &next in &self.links[node.index()] {
                if !visited[next.index()] && allow(next) {
                    visited[next.index()] = true;
                    queue.push_back(next);
                }
            }
        }
        Ok(order)
    }

    pub fn component_count(&self) -> usize {
        let mut seen = vec![false; self.positions.len()];
        let mut components = 0;
        let mut stack = Vec::new();
        for root in 0..self.positions.len() {
            if seen[root] {
                continue;
            }
            components += 1;
            seen[root] = true;
            stack.push(root);
            while let Some(index) = stack.pop() {
                for next in &self.links[index] {
                    if !seen[next.index()] {
                        seen[next.index()] = true;
                        stack.push(next.index());
                    }
                }
            }
        }
        components
    }

    /// True when the graph forms a single component. An empty graph counts
    /// as connected.
    pub fn is_connected(&self) -> bool {
        self.component_count() <= 1
    }

    fn check(&self, node: NodeId) -> Result<(), GraphError> {
        if node.index() < self.positions.len() {
            Ok(())
        } else {
            Err(GraphError::UnknownNode(node))
        }
    }
}
