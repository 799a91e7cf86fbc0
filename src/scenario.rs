use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::config::{GraphConfig, LoggingConfig, PopulationConfig};
use crate::engine::{Engine, EngineSettings, Landmass};
use crate::error::GenError;
use crate::grid::Grid;

fn default_length() -> f64 {
    100_000.0
}

fn default_width() -> f64 {
    100_000.0
}

fn default_cell_size() -> f64 {
    1_000.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub seed: u64,
    #[serde(default)]
    pub landmass: LandmassDimensions,
    #[serde(default)]
    pub population: PopulationConfig,
    #[serde(default)]
    pub roads: GraphConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Landmass extent and cell size in world units
#[derive(Debug, Clone, Deserialize)]
pub struct LandmassDimensions {
    #[serde(default = "default_length")]
    pub length: f64,
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_cell_size")]
    pub cell_size: f64,
}

impl Default for LandmassDimensions {
    fn default() -> Self {
        Self {
            length: default_length(),
            width: default_width(),
            cell_size: default_cell_size(),
        }
    }
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        scenario
            .validate()
            .with_context(|| format!("Invalid scenario {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    pub fn build_grid(&self) -> Result<Grid, GenError> {
        Grid::new(
            self.landmass.length,
            self.landmass.width,
            self.landmass.cell_size,
        )
    }

    /// Checks the grid and both stage configs without generating anything
    pub fn validate(&self) -> Result<(), GenError> {
        let grid = self.build_grid()?;
        self.population.validate(grid.cell_count())?;
        self.roads.validate()
    }

    pub fn seed(&self, override_seed: Option<u64>) -> u64 {
        override_seed.unwrap_or(self.seed)
    }

    pub fn run(&self, override_seed: Option<u64>) -> Result<Landmass, GenError> {
        let engine = Engine::new(EngineSettings {
            scenario_name: self.name.clone(),
            seed: self.seed(override_seed),
        });
        engine.run(self.build_grid()?, &self.population, &self.roads)
    }
}
