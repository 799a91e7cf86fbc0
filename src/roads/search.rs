use crate::config::GraphConfig;
use crate::error::GraphError;
use crate::graph::{NodeId, SettlementGraph};
use crate::grid::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Satisfied,
    /// The ring hit its iteration cap or the grid diagonal before the target
    /// count was met
    Exhausted,
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub candidates: Vec<NodeId>,
    pub status: SearchStatus,
    pub iterations: u32,
}

/// Expanding square annulus around a node.
///
/// Each pass tests the Chebyshev band `[range, range + floor(width) - 1]`,
/// then moves `range` past the band and widens the next one by
/// `ring_width_increment`.
pub struct AnnulusSearch {
    target: usize,
    width_increment: f64,
    max_iterations: u32,
    max_range: u32,
}

impl AnnulusSearch {
    pub fn new(grid: &Grid, config: &GraphConfig) -> Self {
        Self {
            target: config.max_connections_per_node,
            width_increment: config.ring_width_increment,
            max_iterations: config.max_ring_iterations,
            max_range: grid.diagonal(),
        }
    }

    pub fn candidates(
        &self,
        graph: &SettlementGraph,
        node: NodeId,
    ) -> Result<SearchResult, GraphError> {
        let origin = graph.position(node)?;
        let linked = graph.neighbors(node)?;
        let positions = graph.positions();

        let mut candidates = Vec::new();
        let mut range: u32 = 1;
        let mut width: f64 = 1.0;
        let mut iterations = 0;

        loop {
            let lower = range;
            let upper = range + width.floor() as u32 - 1;
            for (other, &pos) in graph.nodes().zip(positions) {
                if other == node || linked.contains(&other) {
                    continue;
                }
                let (dr, dc) = origin.offset_to(pos);
                let in_rows = (lower..=upper).contains(&dr) && dc <= upper;
                let in_cols = (lower..=upper).contains(&dc) && dr <= upper;
                if in_rows || in_cols {
                    candidates.push(other);
                }
            }
            iterations += 1;

            if candidates.len() >= self.target {
                return Ok(SearchResult {
                    candidates,
                    status: SearchStatus::Satisfied,
                    iterations,
                });
            }
            if iterations >= self.max_iterations || range > self.max_range {
                return Ok(SearchResult {
                    candidates,
                    status: SearchStatus::Exhausted,
                    iterations,
                });
            }

            range += width.floor() as u32;
            width += self.width_increment;
        }
    }
}
