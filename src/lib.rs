pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod grid;
pub mod population;
pub mod report;
pub mod rng;
pub mod roads;
pub mod scenario;

pub use config::{GraphConfig, PopulationConfig};
pub use engine::{Engine, EngineSettings, Landmass};
pub use error::{GenError, GraphError};
pub use graph::{NodeId, SettlementGraph};
pub use grid::{Cell, CellPos, Grid};
pub use population::{generate_population, City, PopulationField, Suburb};
pub use roads::build_settlement_graph;
pub use scenario::Scenario;

/// Builds the cell grid for a `length` x `width` landmass.
pub fn create_grid(length: f64, width: f64, cell_size: f64) -> Result<Grid, GenError> {
    Grid::new(length, width, cell_size)
}
