//! Generation options for the population and road stages

use serde::{Deserialize, Serialize};

use crate::error::GenError;
use crate::population::{PhasedRangeStep, RangeStep, UnitRangeStep};

fn default_city_count() -> usize {
    8
}

fn default_city_population_min() -> u64 {
    20_000
}

fn default_city_population_max() -> u64 {
    80_000
}

fn default_initial_suburb_pct() -> f64 {
    0.05
}

fn default_suburb_pct_decay_step() -> f64 {
    0.002
}

fn default_suburb_pct_min() -> f64 {
    0.005
}

fn default_max_suburbs_per_city() -> usize {
    64
}

fn default_samples_per_ring_min() -> u32 {
    3
}

fn default_samples_per_ring_max() -> u32 {
    4
}

fn default_max_ring_attempts() -> u32 {
    32
}

fn default_max_connections() -> usize {
    2
}

fn default_ring_width_increment() -> f64 {
    0.3
}

fn default_max_ring_iterations() -> u32 {
    256
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationConfig {
    #[serde(default = "default_city_count")]
    pub city_count: usize,
    #[serde(default = "default_city_population_min")]
    pub city_population_min: u64,
    #[serde(default = "default_city_population_max")]
    pub city_population_max: u64,
    /// Share of a city's total handed to its center suburb
    #[serde(default = "default_initial_suburb_pct")]
    pub initial_suburb_pct: f64,
    #[serde(default = "default_suburb_pct_decay_step")]
    pub suburb_pct_decay_step: f64,
    #[serde(default = "default_suburb_pct_min")]
    pub suburb_pct_min: f64,
    /// Includes the center suburb
    #[serde(default = "default_max_suburbs_per_city")]
    pub max_suburbs_per_city: usize,
    #[serde(default = "default_samples_per_ring_min")]
    pub samples_per_ring_min: u32,
    #[serde(default = "default_samples_per_ring_max")]
    pub samples_per_ring_max: u32,
    /// Draws allowed per ring. A ring that places nothing within its draws
    /// ends the city's growth with `CityFinish::RingStarved`.
    #[serde(default = "default_max_ring_attempts")]
    pub max_ring_attempts: u32,
    #[serde(default)]
    pub range_step: RangeStepConfig,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            city_count: default_city_count(),
            city_population_min: default_city_population_min(),
            city_population_max: default_city_population_max(),
            initial_suburb_pct: default_initial_suburb_pct(),
            suburb_pct_decay_step: default_suburb_pct_decay_step(),
            suburb_pct_min: default_suburb_pct_min(),
            max_suburbs_per_city: default_max_suburbs_per_city(),
            samples_per_ring_min: default_samples_per_ring_min(),
            samples_per_ring_max: default_samples_per_ring_max(),
            max_ring_attempts: default_max_ring_attempts(),
            range_step: RangeStepConfig::default(),
        }
    }
}

impl PopulationConfig {
    /// Checks the options against the grid they will run on
    pub fn validate(&self, cell_count: usize) -> Result<(), GenError> {
        if self.city_count > cell_count {
            return Err(GenError::invalid(format!(
                "city_count {} exceeds the {} cells of the grid",
                self.city_count, cell_count
            )));
        }
        if self.city_population_min > self.city_population_max {
            return Err(GenError::invalid(format!(
                "city_population_min {} is greater than city_population_max {}",
                self.city_population_min, self.city_population_max
            )));
        }
        for (label, value) in [
            ("initial_suburb_pct", self.initial_suburb_pct),
            ("suburb_pct_decay_step", self.suburb_pct_decay_step),
            ("suburb_pct_min", self.suburb_pct_min),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(GenError::invalid(format!(
                    "{label} must be within [0, 1], got {value}"
                )));
            }
        }
        if self.suburb_pct_min > self.initial_suburb_pct {
            return Err(GenError::invalid(format!(
                "suburb_pct_min {} is greater than initial_suburb_pct {}",
                self.suburb_pct_min, self.initial_suburb_pct
            )));
        }
        if self.max_suburbs_per_city == 0 {
            return Err(GenError::invalid(
                "max_suburbs_per_city must be at least 1",
            ));
        }
        if self.samples_per_ring_min == 0 || self.samples_per_ring_min > self.samples_per_ring_max
        {
            return Err(GenError::invalid(format!(
                "samples per ring range {}..={} is empty",
                self.samples_per_ring_min, self.samples_per_ring_max
            )));
        }
        if self.max_ring_attempts == 0 {
            return Err(GenError::invalid("max_ring_attempts must be at least 1"));
        }
        self.range_step.validate()
    }
}

/// How far the ring search jumps between iterations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RangeStepConfig {
    Unit,
    Phased {
        threshold_fraction: f64,
        small_step: u32,
        large_step: u32,
    },
}

impl Default for RangeStepConfig {
    fn default() -> Self {
        RangeStepConfig::Phased {
            threshold_fraction: 0.25,
            small_step: 1,
            large_step: 2,
        }
    }
}

impl RangeStepConfig {
    fn validate(&self) -> Result<(), GenError> {
        match self {
            RangeStepConfig::Unit => Ok(()),
            RangeStepConfig::Phased {
                threshold_fraction,
                small_step,
                large_step,
            } => {
                if !threshold_fraction.is_finite() || *threshold_fraction < 0.0 {
                    return Err(GenError::invalid(format!(
                        "range step threshold_fraction must be non-negative, got {threshold_fraction}"
                    )));
                }
                if *small_step == 0 || *large_step == 0 {
                    return Err(GenError::invalid("range step increments must be at least 1"));
                }
                Ok(())
            }
        }
    }

    pub fn build(&self) -> Box<dyn RangeStep> {
        match *self {
            RangeStepConfig::Unit => Box::new(UnitRangeStep),
            RangeStepConfig::Phased {
                threshold_fraction,
                small_step,
                large_step,
            } => Box::new(PhasedRangeStep {
                threshold_fraction,
                small_step,
                large_step,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    #[serde(default = "default_max_connections")]
    pub max_connections_per_node: usize,
    #[serde(default = "default_ring_width_increment")]
    pub ring_width_increment: f64,
    /// Growth steps allowed per annulus search, on top of the grid diagonal bound
    #[serde(default = "default_max_ring_iterations")]
    pub max_ring_iterations: u32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_connections_per_node: default_max_connections(),
            ring_width_increment: default_ring_width_increment(),
            max_ring_iterations: default_max_ring_iterations(),
        }
    }
}

impl GraphConfig {
    pub fn validate(&self) -> Result<(), GenError> {
        if self.max_connections_per_node < 2 {
            return Err(GenError::invalid(format!(
                "max_connections_per_node must be at least 2, got {}",
                self.max_connections_per_node
            )));
        }
        if !self.ring_width_increment.is_finite() || self.ring_width_increment <= 0.0 {
            return Err(GenError::invalid(format!(
                "ring_width_increment must be positive, got {}",
                self.ring_width_increment
            )));
        }
        if self.max_ring_iterations == 0 {
            return Err(GenError::invalid("max_ring_iterations must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(PopulationConfig::default().validate(10_000).is_ok());
        assert!(GraphConfig::default().validate().is_ok());
    }

    #[test]
    fn test_city_count_bounded_by_cells() {
        let config = PopulationConfig {
            city_count: 5,
            ..PopulationConfig::default()
        };

        assert!(config.validate(5).is_ok());
        assert!(matches!(
            config.validate(4),
            Err(GenError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_population_range_and_percentages() {
        let inverted = PopulationConfig {
            city_population_min: 10,
            city_population_max: 5,
            ..PopulationConfig::default()
        };
        assert!(inverted.validate(100).is_err());

        let floor_above_start = PopulationConfig {
            initial_suburb_pct: 0.01,
            suburb_pct_min: 0.02,
            ..PopulationConfig::default()
        };
        assert!(floor_above_start.validate(100).is_err());

        let over_one = PopulationConfig {
            initial_suburb_pct: 1.5,
            ..PopulationConfig::default()
        };
        assert!(over_one.validate(100).is_err());
    }

    #[test]
    fn test_graph_config_bounds() {
        let single = GraphConfig {
            max_connections_per_node: 1,
            ..GraphConfig::default()
        };
        assert!(single.validate().is_err());

        let flat = GraphConfig {
            ring_width_increment: 0.0,
            ..GraphConfig::default()
        };
        assert!(flat.validate().is_err());
    }

    #[test]
    fn test_partial_yaml_takes_defaults() {
        let config: PopulationConfig =
            serde_yaml::from_str("city_count: 3\nrange_step:\n  kind: unit\n").unwrap();

        assert_eq!(config.city_count, 3);
        assert_eq!(config.range_step, RangeStepConfig::Unit);
        assert_eq!(config.max_suburbs_per_city, 64);

        let graph: GraphConfig = serde_yaml::from_str("ring_width_increment: 0.5\n").unwrap();
        assert_eq!(graph.max_connections_per_node, 2);
        assert_eq!(graph.ring_width_increment, 0.5);
    }
}
