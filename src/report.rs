use serde::Serialize;

use crate::engine::StageReport;
use crate::grid::Grid;
use crate::population::PopulationField;
use crate::roads::{RoadNetwork, RoadStats};

/// Summary of one generation run
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub scenario: String,
    pub seed: u64,
    pub rows: u32,
    pub cols: u32,
    pub cities: usize,
    pub suburbs: usize,
    pub total_population: u64,
    pub nodes: usize,
    pub edges: usize,
    pub components: usize,
    pub roads: RoadStats,
    pub stages: Vec<StageReport>,
}

impl GenerationReport {
    pub fn new(
        scenario: &str,
        seed: u64,
        grid: &Grid,
        field: &PopulationField,
        network: &RoadNetwork,
        stages: Vec<StageReport>,
    ) -> Self {
        Self {
            scenario: scenario.to_string(),
            seed,
            rows: grid.rows(),
            cols: grid.cols(),
            cities: field.cities().len(),
            suburbs: field.suburb_count(),
            total_population: field.total_population(),
            nodes: network.graph.node_count(),
            edges: network.graph.edge_count(),
            components: network.graph.component_count(),
            roads: network.stats.clone(),
            stages,
        }
    }

    pub fn summary_line(&self) -> String {
        format!(
            "Scenario '{}' (seed {}): {}x{} cells, {} cities, {} suburbs, population {}, {} roads across {} component(s)",
            self.scenario,
            self.seed,
            self.rows,
            self.cols,
            self.cities,
            self.suburbs,
            self.total_population,
            self.edges,
            self.components,
        )
    }
}
