//! Population diffusion
//!
//! Cities are seeded on random cells, then each one hands out shrinking
//! shares of its budget to suburbs sampled on rings of growing radius around
//! its center.

mod field;
mod range_step;
mod settlement;

pub use field::PopulationField;
pub use range_step::{PhasedRangeStep, RangeStep, UnitRangeStep};
pub use settlement::{City, CityFinish, Suburb};

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::config::PopulationConfig;
use crate::error::GenError;
use crate::grid::{CellPos, Grid};
use crate::rng::{RngExt, RngManager, CITY_GROWTH_STREAM, CITY_PLACEMENT_STREAM};

/// Runs the diffusion generator with the configured range step.
pub fn generate_population(
    grid: &Grid,
    config: &PopulationConfig,
    seed: u64,
) -> Result<PopulationField, GenError> {
    PopulationGenerator::new(config).generate(grid, &RngManager::new(seed))
}

pub struct PopulationGenerator<'a> {
    config: &'a PopulationConfig,
    range_step: Box<dyn RangeStep>,
}

impl<'a> PopulationGenerator<'a> {
    pub fn new(config: &'a PopulationConfig) -> Self {
        Self {
            config,
            range_step: config.range_step.build(),
        }
    }

    /// Replaces the range step named in the config
    pub fn with_range_step(mut self, range_step: impl RangeStep + 'static) -> Self {
        self.range_step = Box::new(range_step);
        self
    }

    pub fn generate(&self, grid: &Grid, rng: &RngManager) -> Result<PopulationField, GenError> {
        self.config.validate(grid.cell_count())?;

        let mut placement = rng.stream(CITY_PLACEMENT_STREAM);
        let mut claimed = Claims::new(grid.cell_count());
        let centers = self.place_centers(grid, &mut placement, &mut claimed);
        let budgets: Vec<u64> = centers
            .iter()
            .map(|_| {
                placement.gen_range(self.config.city_population_min..=self.config.city_population_max)
            })
            .collect();

        let mut cities = Vec::with_capacity(centers.len());
        for (index, (&center, &total)) in centers.iter().zip(&budgets).enumerate() {
            let mut growth = rng.entity_stream(CITY_GROWTH_STREAM, index as u64);
            let city = self.grow_city(grid, center, total, &mut claimed, &mut growth);
            if city.finish_reason() == Some(CityFinish::RingStarved) {
                tracing::debug!(
                    target: "landmass::population",
                    city = index,
                    suburbs = city.suburbs().len(),
                    allocated = city.allocated_population(),
                    total,
                    "city finished early, ring sampling exhausted"
                );
            }
            cities.push(city);
        }

        let field = PopulationField::from_cities(grid, cities)?;
        tracing::info!(
            target: "landmass::population",
            cities = field.cities().len(),
            suburbs = field.suburb_count(),
            population = field.total_population(),
            "population generated"
        );
        Ok(field)
    }

    /// Draws distinct cells until `city_count` centers are picked. Spacing
    /// between centers is not enforced.
    fn place_centers(
        &self,
        grid: &Grid,
        rng: &mut ChaCha8Rng,
        claimed: &mut Claims,
    ) -> Vec<CellPos> {
        let mut centers = Vec::with_capacity(self.config.city_count);
        while centers.len() < self.config.city_count {
            let index = rng.gen_range(0..grid.cell_count());
            let Some(pos) = grid.pos_at(index) else {
                continue;
            };
            if claimed.claim(index) {
                centers.push(pos);
            }
        }
        centers
    }

    fn grow_city(
        &self,
        grid: &Grid,
        center: CellPos,
        total: u64,
        claimed: &mut Claims,
        rng: &mut ChaCha8Rng,
    ) -> City {
        let config = self.config;
        let mut budget = Budget::new(total, config);
        let center_population = budget.take();
        let mut city = City::new(Suburb::new(center, center_population), total);
        let longest = grid.longest_dimension();
        let mut range: u32 = 1;

        let finish = loop {
            if budget.remaining == 0 {
                break CityFinish::BudgetSpent;
            }
            if city.suburbs().len() >= config.max_suburbs_per_city {
                break CityFinish::SuburbLimit;
            }
            if claimed.is_full() || (range > grid.rows() && range > grid.cols()) {
                break CityFinish::GridExhausted;
            }

            let target = rng.gen_range(config.samples_per_ring_min..=config.samples_per_ring_max);
            let radius = range as f64 + 0.5;
            let mut placed = 0;
            let mut attempts = 0;
            let mut ring_end = None;

            while placed < target {
                if attempts == config.max_ring_attempts {
                    if placed == 0 {
                        ring_end = Some(CityFinish::RingStarved);
                    }
                    break;
                }
                attempts += 1;

                let (dx, dy) = rng.point_in_disk(radius);
                let Some(pos) = grid.offset(center, dy.round() as i64, dx.round() as i64) else {
                    continue;
                };
                let Some(index) = grid.index_of(pos) else {
                    continue;
                };
                if claimed.is_claimed(index) {
                    continue;
                }

                if budget.next_share() == 0 {
                    ring_end = Some(CityFinish::ZeroAllocation);
                    break;
                }
                claimed.claim(index);
                city.push_suburb(Suburb::new(pos, budget.take()));
                placed += 1;

                if budget.remaining == 0 || city.suburbs().len() >= config.max_suburbs_per_city {
                    break;
                }
            }

            if let Some(reason) = ring_end {
                break reason;
            }
            range = range.saturating_add(self.range_step.increment(range, longest).max(1));
        };

        city.finish(finish);
        city
    }
}

/// Cells taken by a city center or suburb, shared by every city
struct Claims {
    cells: Vec<bool>,
    free: usize,
}

impl Claims {
    fn new(cell_count: usize) -> Self {
        Self {
            cells: vec![false; cell_count],
            free: cell_count,
        }
    }

    fn is_claimed(&self, index: usize) -> bool {
        self.cells[index]
    }

    /// Returns false if the cell was already taken
    fn claim(&mut self, index: usize) -> bool {
        if self.cells[index] {
            return false;
        }
        self.cells[index] = true;
        self.free -= 1;
        true
    }

    fn is_full(&self) -> bool {
        self.free == 0
    }
}

/// Remaining people of one city and the decaying share handed to the next
/// suburb.
struct Budget {
    total: u64,
    remaining: u64,
    pct: f64,
    decay_step: f64,
    pct_min: f64,
}

impl Budget {
    fn new(total: u64, config: &PopulationConfig) -> Self {
        Self {
            total,
            remaining: total,
            pct: config.initial_suburb_pct,
            decay_step: config.suburb_pct_decay_step,
            pct_min: config.suburb_pct_min,
        }
    }

    fn next_share(&self) -> u64 {
        ((self.total as f64 * self.pct).floor() as u64).min(self.remaining)
    }

    fn take(&mut self) -> u64 {
        let share = self.next_share();
        self.remaining -= share;
        self.pct = (self.pct - self.decay_step).max(self.pct_min);
        share
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PopulationConfig {
        PopulationConfig {
            city_count: 3,
            city_population_min: 10_000,
            city_population_max: 10_000,
            initial_suburb_pct: 0.2,
            suburb_pct_decay_step: 0.05,
            suburb_pct_min: 0.02,
            ..PopulationConfig::default()
        }
    }

    #[test]
    fn test_budget_decays_to_floor_and_never_overdraws() {
        let config = PopulationConfig {
            initial_suburb_pct: 0.25,
            suburb_pct_decay_step: 0.125,
            suburb_pct_min: 0.0625,
            ..config()
        };
        let mut budget = Budget::new(10_000, &config);

        assert_eq!(budget.take(), 2_500);
        assert_eq!(budget.take(), 1_250);
        assert_eq!(budget.take(), 625);
        assert_eq!(budget.take(), 625);
        assert_eq!(budget.pct, 0.0625);

        while budget.remaining > 0 {
            budget.take();
        }
        assert_eq!(budget.next_share(), 0);
    }

    #[test]
    fn test_centers_are_distinct_and_claimed() {
        let grid = Grid::new(3.0, 3.0, 1.0).unwrap();
        let config = PopulationConfig {
            city_count: 9,
            ..config()
        };
        let generator = PopulationGenerator::new(&config);
        let mut rng = RngManager::new(11).stream(CITY_PLACEMENT_STREAM);
        let mut claimed = Claims::new(grid.cell_count());

        let mut centers = generator.place_centers(&grid, &mut rng, &mut claimed);
        centers.sort();
        centers.dedup();

        assert_eq!(centers.len(), 9);
        assert!(claimed.is_full());
        assert!(!claimed.claim(4));
    }

    #[test]
    fn test_cities_respect_budget_and_suburb_limit() {
        let grid = Grid::new(40.0, 40.0, 1.0).unwrap();
        let config = PopulationConfig {
            max_suburbs_per_city: 6,
            ..config()
        };

        let field = generate_population(&grid, &config, 5).unwrap();

        assert_eq!(field.cities().len(), 3);
        for city in field.cities() {
            assert!(city.suburbs().len() <= 6);
            assert!(city.allocated_population() <= city.total_population());
            assert!(city.finish_reason().is_some());
        }
    }

    #[test]
    fn test_unit_range_step_can_be_plugged_in() {
        let grid = Grid::new(20.0, 20.0, 1.0).unwrap();
        let config = config();

        let phased = PopulationGenerator::new(&config)
            .generate(&grid, &RngManager::new(3))
            .unwrap();
        let unit = PopulationGenerator::new(&config)
            .with_range_step(UnitRangeStep)
            .generate(&grid, &RngManager::new(3))
            .unwrap();

        let centers = |field: &PopulationField| -> Vec<CellPos> {
            field.cities().iter().map(City::center).collect()
        };
        assert_eq!(centers(&phased), centers(&unit));
    }

    #[test]
    fn test_starved_ring_finishes_city_early() {
        let grid = Grid::new(30.0, 30.0, 1.0).unwrap();
        let config = PopulationConfig {
            city_count: 4,
            max_ring_attempts: 1,
            ..config()
        };

        let mut starved = 0;
        for seed in 0..10 {
            let field = generate_population(&grid, &config, seed).unwrap();
            for city in field.cities() {
                if city.finish_reason() != Some(CityFinish::RingStarved) {
                    continue;
                }
                starved += 1;
                assert!(city.suburbs().len() < config.max_suburbs_per_city);
                assert!(city.allocated_population() < city.total_population());
                assert_eq!(city.center_suburb().population(), 2_000);
            }
        }
        assert!(starved > 0);
    }

    #[test]
    fn test_suburb_limit_of_one_keeps_center_share() {
        let grid = Grid::new(10.0, 10.0, 1.0).unwrap();
        let config = PopulationConfig {
            city_count: 1,
            max_suburbs_per_city: 1,
            ..config()
        };

        let field = generate_population(&grid, &config, 2).unwrap();
        let city = &field.cities()[0];

        assert_eq!(city.finish_reason(), Some(CityFinish::SuburbLimit));
        assert_eq!(city.suburbs().len(), 1);
        assert_eq!(city.center_suburb().population(), 2_000);
        assert_eq!(field.population(city.center()), Some(2_000));
    }

    #[test]
    fn test_full_grid_counts_as_exhausted() {
        let grid = Grid::new(1.0, 1.0, 1.0).unwrap();
        let config = PopulationConfig {
            city_count: 1,
            ..config()
        };

        let field = generate_population(&grid, &config, 6).unwrap();
        let city = &field.cities()[0];

        assert_eq!(city.finish_reason(), Some(CityFinish::GridExhausted));
        assert_eq!(city.center_suburb().population(), 10_000);
    }
}
