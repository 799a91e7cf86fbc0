//! Settlement graph construction
//!
//! Suburb centers become nodes, city centers are chained into a backbone, and
//! the backbone grows breadth-first by linking each frontier node to a few
//! nearby nodes found with an expanding square annulus. Whatever the frontier
//! never reaches is bridged in afterwards, so the finished graph is always a
//! single component.

mod repair;
mod search;

pub use search::{AnnulusSearch, SearchResult, SearchStatus};

use std::cmp::Reverse;
use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::config::GraphConfig;
use crate::error::GenError;
use crate::graph::{NodeId, SettlementGraph};
use crate::grid::{CellPos, Grid};
use crate::population::PopulationField;

pub fn build_settlement_graph<R: Rng>(
    grid: &Grid,
    field: &PopulationField,
    config: &GraphConfig,
    rng: &mut R,
) -> Result<SettlementGraph, GenError> {
    Ok(RoadBuilder::new(grid, field, config).build(rng)?.graph)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoadStats {
    pub frontier_rounds: usize,
    pub island_seeds: usize,
    pub exhausted_searches: usize,
    pub zero_candidate_nodes: usize,
    pub bridges: usize,
    pub absorbed: usize,
}

#[derive(Debug, Clone)]
pub struct RoadNetwork {
    pub graph: SettlementGraph,
    pub stats: RoadStats,
}

pub struct RoadBuilder<'a> {
    grid: &'a Grid,
    field: &'a PopulationField,
    config: &'a GraphConfig,
}

impl<'a> RoadBuilder<'a> {
    pub fn new(grid: &'a Grid, field: &'a PopulationField, config: &'a GraphConfig) -> Self {
        Self {
            grid,
            field,
            config,
        }
    }

    pub fn build<R: Rng>(&self, rng: &mut R) -> Result<RoadNetwork, GenError> {
        self.config.validate()?;
        let mut stats = RoadStats::default();

        let mut graph = self.seed_nodes();
        let majors = self.link_backbone(&mut graph)?;
        let mut connected: BTreeSet<NodeId> = majors.iter().copied().collect();

        self.expand(&mut graph, &majors, &mut connected, &mut stats, rng)?;
        repair::connect_components(&mut graph, &mut connected, &mut stats)?;

        tracing::info!(
            target: "landmass::roads",
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            islands = stats.island_seeds,
            bridges = stats.bridges,
            exhausted = stats.exhausted_searches,
            "settlement graph built"
        );
        Ok(RoadNetwork { graph, stats })
    }

    /// Every suburb center becomes an isolated node, most populous first.
    fn seed_nodes(&self) -> SettlementGraph {
        let mut ordered: Vec<CellPos> = self.field.suburb_centers().iter().copied().collect();
        ordered.sort_by_key(|&pos| Reverse(self.field.population(pos).unwrap_or(0)));

        let mut graph = SettlementGraph::new();
        for pos in ordered {
            graph.add_node(pos);
        }
        graph
    }

    /// Chains the city centers in discovery order.
    fn link_backbone(&self, graph: &mut SettlementGraph) -> Result<Vec<NodeId>, GenError> {
        let majors: Vec<NodeId> = self
            .field
            .cities()
            .iter()
            .filter_map(|city| graph.node(city.center()))
            .collect();
        for pair in majors.windows(2) {
            graph.link(pair[1], pair[0])?;
        }
        Ok(majors)
    }

    /// Breadth-first expansion from the backbone. When the frontier dies out
    /// the next unprocessed node seeds an island frontier; island links are
    /// made the same way but do not count as connected.
    fn expand<R: Rng>(
        &self,
        graph: &mut SettlementGraph,
        majors: &[NodeId],
        connected: &mut BTreeSet<NodeId>,
        stats: &mut RoadStats,
        rng: &mut R,
    ) -> Result<(), GenError> {
        let search = AnnulusSearch::new(self.grid, self.config);
        let mut unprocessed: BTreeSet<NodeId> = graph.nodes().collect();
        let mut frontier: Vec<NodeId> = majors.to_vec();
        let mut on_backbone = true;

        while !unprocessed.is_empty() {
            if frontier.is_empty() {
                let Some(&seed) = unprocessed.first() else {
                    break;
                };
                if on_backbone {
                    tracing::debug!(
                        target: "landmass::roads",
                        leftover = unprocessed.len(),
                        "backbone frontier exhausted"
                    );
                }
                on_backbone = false;
                stats.island_seeds += 1;
                frontier.push(seed);
            }

            let mut next = BTreeSet::new();
            for &node in &frontier {
                let result = search.candidates(graph, node)?;
                if result.status == SearchStatus::Exhausted {
                    stats.exhausted_searches += 1;
                    tracing::debug!(
                        target: "landmass::roads",
                        node = node.raw(),
                        found = result.candidates.len(),
                        iterations = result.iterations,
                        "ring search exhausted"
                    );
                }
                if result.candidates.is_empty() {
                    stats.zero_candidate_nodes += 1;
                }

                let allowed = rng.gen_range(1..=self.config.max_connections_per_node - 1);
                let count = allowed.min(result.candidates.len());
                let picks: Vec<NodeId> = result
                    .candidates
                    .choose_multiple(rng, count)
                    .copied()
                    .collect();
                for candidate in picks {
                    graph.link(node, candidate)?;
                    if on_backbone {
                        connected.insert(candidate);
                    }
                    next.insert(candidate);
                }

                unprocessed.remove(&node);
            }

            frontier = next
                .into_iter()
                .filter(|node| unprocessed.contains(node))
                .collect();
            stats.frontier_rounds += 1;
        }
        Ok(())
    }
}
