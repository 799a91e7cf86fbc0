use std::time::Instant;

use serde::Serialize;

use crate::config::{GraphConfig, PopulationConfig};
use crate::error::GenError;
use crate::grid::Grid;
use crate::population::{PopulationField, PopulationGenerator};
use crate::report::GenerationReport;
use crate::rng::{RngManager, ROAD_STREAM};
use crate::roads::{RoadBuilder, RoadNetwork};

pub struct EngineSettings {
    pub scenario_name: String,
    pub seed: u64,
}

/// Runs population diffusion and road building over a grid from one seed.
pub struct Engine {
    rng: RngManager,
    settings: EngineSettings,
}

impl Engine {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            rng: RngManager::new(settings.seed),
            settings,
        }
    }

    pub fn run(
        &self,
        grid: Grid,
        population: &PopulationConfig,
        roads: &GraphConfig,
    ) -> Result<Landmass, GenError> {
        let mut stages = Vec::with_capacity(2);

        let field = timed(&mut stages, "population", || {
            PopulationGenerator::new(population).generate(&grid, &self.rng)
        })?;
        let network = timed(&mut stages, "roads", || {
            let mut rng = self.rng.stream(ROAD_STREAM);
            RoadBuilder::new(&grid, &field, roads).build(&mut rng)
        })?;

        let report = GenerationReport::new(
            &self.settings.scenario_name,
            self.settings.seed,
            &grid,
            &field,
            &network,
            stages,
        );
        Ok(Landmass {
            grid,
            population: field,
            roads: network,
            report,
        })
    }
}

fn timed<T>(
    stages: &mut Vec<StageReport>,
    name: &'static str,
    stage: impl FnOnce() -> Result<T, GenError>,
) -> Result<T, GenError> {
    let start = Instant::now();
    let output = stage()?;
    stages.push(StageReport {
        name,
        duration_ms: start.elapsed().as_secs_f64() * 1_000.0,
    });
    Ok(output)
}

#[derive(Clone, Debug, Serialize)]
pub struct StageReport {
    pub name: &'static str,
    pub duration_ms: f64,
}

pub struct Landmass {
    pub grid: Grid,
    pub population: PopulationField,
    pub roads: RoadNetwork,
    pub report: GenerationReport,
}
